//! Remote analysis integration for the PHQ-9 companion
//!
//! This crate provides the reqwest-backed implementation of the
//! `AnalysisService` trait.

mod client;
mod config;


pub use client::AnalysisClient;
pub use config::AnalysisConfig;

// Re-export core types for convenience
pub use phq_core::{
    AnalysisRequest, AnalysisResponse, AnalysisService, ConnectionDiagnostics, Error, ProbeReport,
    ProbeTarget, Result,
};
