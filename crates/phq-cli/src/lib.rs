//! Diagnostic harness and terminal output for the PHQ-9 companion

mod harness;
mod ui;


pub use harness::{
    CustomDataOutcome, DebugHarness, DiagnosticReport, DiagnosticTask, SubmissionOutcome,
    SAMPLE_RESPONSES,
};
pub use ui::{
    display_banner, format_connectivity, format_custom_outcome, format_report, format_score,
};

// Re-export core types
pub use phq_core::{Error, Result};
