//! Core types and scoring for the PHQ-9 companion
//!
//! This crate holds the pure questionnaire scoring functions, the data model
//! shared with the remote analysis service, and the `AnalysisService` trait
//! that client implementations and test fakes plug into.

pub mod error;
pub mod scoring;
pub mod service;
pub mod types;

pub use error::{Error, Result};
pub use scoring::{
    calculate_total_score, get_severity_level, score_responses, should_recommend_ai_analysis,
    validate_responses, MAX_ITEM_SCORE, QUESTION_COUNT, RECOMMENDATION_THRESHOLD,
};
pub use service::AnalysisService;
pub use types::*;
