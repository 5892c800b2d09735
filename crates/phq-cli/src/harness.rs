//! Diagnostic harness sequencing the scorer and the analysis service

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use phq_core::{
    calculate_total_score, score_responses, AnalysisResponse, AnalysisService,
    ConnectionDiagnostics, ScoreResult,
};

/// Fixed synthetic questionnaire used by the full diagnostic run (total 8)
pub const SAMPLE_RESPONSES: [i32; 9] = [1, 1, 2, 1, 0, 1, 1, 0, 1];

/// How a submission made by the harness ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SubmissionOutcome {
    Success { response: AnalysisResponse },
    Failure { message: String },
}

/// Everything gathered by one full diagnostic run
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub service_available: bool,
    pub endpoint_available: bool,
    pub connection: ConnectionDiagnostics,
    pub sample_score: ScoreResult,
    /// `None` when the endpoint was unavailable and nothing was sent
    pub submission: Option<SubmissionOutcome>,
}

/// Result of a custom-data test
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomDataOutcome {
    pub success: bool,
    pub summary: String,
    pub score: Option<ScoreResult>,
    pub response: Option<AnalysisResponse>,
}

/// Handle to a spawned harness operation.
///
/// The callback runs at most once. Cancelling or dropping the handle aborts
/// the operation and guarantees the callback is not delivered afterwards.
pub struct DiagnosticTask {
    handle: Option<JoinHandle<()>>,
}

impl DiagnosticTask {
    fn spawn<T, Fut, F>(work: Fut, on_done: F) -> Self
    where
        Fut: Future<Output = T> + Send + 'static,
        T: Send + 'static,
        F: FnOnce(T) + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            let outcome = work.await;
            on_done(outcome);
        });

        Self {
            handle: Some(handle),
        }
    }

    /// Abandon the operation
    pub fn cancel(&self) {
        if let Some(handle) = &self.handle {
            handle.abort();
        }
    }

    /// Let the operation run to completion without holding the handle
    pub fn detach(mut self) {
        self.handle.take();
    }

    /// Wait for the operation. Returns true if the callback was delivered.
    pub async fn join(mut self) -> bool {
        match self.handle.take() {
            Some(handle) => handle.await.is_ok(),
            None => false,
        }
    }
}

impl Drop for DiagnosticTask {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

/// Sequences probes, scoring and submissions for manual verification
pub struct DebugHarness<S: ?Sized> {
    service: Arc<S>,
}

impl<S: ?Sized> Clone for DebugHarness<S> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
        }
    }
}

impl<S> DebugHarness<S>
where
    S: AnalysisService + ?Sized + 'static,
{
    pub fn new(service: Arc<S>) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &Arc<S> {
        &self.service
    }

    /// Probe, dump connection detail, and submit the sample questionnaire
    /// when the endpoint is up
    pub async fn run_full_diagnostic(&self) -> DiagnosticReport {
        let started_at = Utc::now();
        info!("starting full diagnostic run");

        let service_available = self.service.is_service_available().await;
        info!(service_available, "liveness probe finished");

        let endpoint_available = self.service.is_endpoint_available().await;
        info!(endpoint_available, "endpoint probe finished");

        let connection = self.service.debug_connection().await;
        let sample_score = ScoreResult::from_total(calculate_total_score(&SAMPLE_RESPONSES));

        let submission = if endpoint_available {
            let outcome = match self
                .service
                .submit_for_analysis(sample_score.total, &SAMPLE_RESPONSES)
                .await
            {
                Ok(response) => SubmissionOutcome::Success { response },
                Err(e) => SubmissionOutcome::Failure {
                    message: e.to_string(),
                },
            };
            Some(outcome)
        } else {
            warn!("analysis endpoint unavailable, skipping sample submission");
            None
        };

        DiagnosticReport {
            started_at,
            finished_at: Utc::now(),
            service_available,
            endpoint_available,
            connection,
            sample_score,
            submission,
        }
    }

    pub async fn quick_connectivity_check(&self) -> bool {
        self.service.is_service_available().await
    }

    /// Validate caller-supplied answers, then submit them.
    ///
    /// Invalid answers fail immediately without touching the network.
    pub async fn test_with_custom_data(&self, responses: &[i32]) -> CustomDataOutcome {
        let score = match score_responses(responses) {
            Ok(score) => score,
            Err(e) => {
                warn!(error = %e, "custom data rejected before submission");
                return CustomDataOutcome {
                    success: false,
                    summary: e.to_string(),
                    score: None,
                    response: None,
                };
            }
        };

        match self.service.submit_for_analysis(score.total, responses).await {
            Ok(response) => CustomDataOutcome {
                success: true,
                summary: summarize(&score, &response),
                score: Some(score),
                response: Some(response),
            },
            Err(e) => CustomDataOutcome {
                success: false,
                summary: format!("Analysis failed: {}", e),
                score: Some(score),
                response: None,
            },
        }
    }

    pub fn spawn_full_diagnostic<F>(&self, on_done: F) -> DiagnosticTask
    where
        F: FnOnce(DiagnosticReport) + Send + 'static,
    {
        let harness = self.clone();
        DiagnosticTask::spawn(async move { harness.run_full_diagnostic().await }, on_done)
    }

    pub fn spawn_connectivity_check<F>(&self, on_done: F) -> DiagnosticTask
    where
        F: FnOnce(bool) + Send + 'static,
    {
        let harness = self.clone();
        DiagnosticTask::spawn(
            async move { harness.quick_connectivity_check().await },
            on_done,
        )
    }

    pub fn spawn_custom_data_test<F>(&self, responses: Vec<i32>, on_done: F) -> DiagnosticTask
    where
        F: FnOnce(CustomDataOutcome) + Send + 'static,
    {
        let harness = self.clone();
        DiagnosticTask::spawn(
            async move { harness.test_with_custom_data(&responses).await },
            on_done,
        )
    }
}

fn summarize(score: &ScoreResult, response: &AnalysisResponse) -> String {
    let mut parts = vec![format!("Score {} ({})", score.total, score.severity)];

    if let Some(severity) = &response.severity {
        parts.push(format!("service severity: {}", severity));
    }
    if let Some(state) = &response.emotional_state {
        parts.push(format!("emotional state: {}", state));
    }
    if let Some(recommendations) = &response.recommendations {
        parts.push(format!("{} recommendation(s)", recommendations.len()));
    }
    if response.is_empty() {
        parts.push("service returned no analysis fields".to_string());
    }

    parts.join("; ")
}
