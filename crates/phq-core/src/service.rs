//! Capability trait for the remote analysis service

use async_trait::async_trait;
use std::sync::Arc;

use crate::{AnalysisResponse, ConnectionDiagnostics, Result};

/// Trait for anything that can probe and submit to the analysis service.
///
/// Implementations resolve every transport, status and parse problem into
/// the returned value; nothing panics or hangs past this boundary.
#[async_trait]
pub trait AnalysisService: Send + Sync {
    /// Lightweight liveness check against the service base path
    async fn is_service_available(&self) -> bool;

    /// Check that the submission route itself is routed and enabled
    async fn is_endpoint_available(&self) -> bool;

    /// Submit a scored questionnaire. Responses are forwarded as given.
    async fn submit_for_analysis(
        &self,
        total_score: i32,
        responses: &[i32],
    ) -> Result<AnalysisResponse>;

    /// Run both probes and report raw detail. Diagnostic only.
    async fn debug_connection(&self) -> ConnectionDiagnostics;
}

#[async_trait]
impl<T: AnalysisService + ?Sized> AnalysisService for Arc<T> {
    async fn is_service_available(&self) -> bool {
        (**self).is_service_available().await
    }

    async fn is_endpoint_available(&self) -> bool {
        (**self).is_endpoint_available().await
    }

    async fn submit_for_analysis(
        &self,
        total_score: i32,
        responses: &[i32],
    ) -> Result<AnalysisResponse> {
        (**self).submit_for_analysis(total_score, responses).await
    }

    async fn debug_connection(&self) -> ConnectionDiagnostics {
        (**self).debug_connection().await
    }
}
