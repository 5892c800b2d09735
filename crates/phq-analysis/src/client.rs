//! Analysis service client implementation

use async_trait::async_trait;
use reqwest::redirect::Policy;
use reqwest::{Client, StatusCode};
use std::time::Instant;
use tokio::time::timeout;
use tracing::{debug, info, warn};
use url::Url;

use phq_core::{
    AnalysisRequest, AnalysisResponse, AnalysisService, ConnectionDiagnostics, Error, ProbeReport,
    ProbeTarget, Result,
};

use crate::config::AnalysisConfig;

const SNIPPET_LEN: usize = 200;
const UNREADABLE_BODY: &str = "error body could not be read";

/// Analysis service client
///
/// The underlying `reqwest::Client` pools connections and is safe to share;
/// every call is otherwise independent.
pub struct AnalysisClient {
    config: AnalysisConfig,
    client: Client,
    service_url: Url,
    endpoint_url: Url,
}

impl AnalysisClient {
    /// Create a new client from configuration
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        let service_url = config.service_url()?;
        let endpoint_url = config.endpoint_url()?;

        let client = Client::builder()
            .timeout(config.request_timeout())
            .connect_timeout(config.probe_timeout())
            .redirect(Policy::none())
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;

        Ok(Self {
            config,
            client,
            service_url,
            endpoint_url,
        })
    }

    /// Create a new client from environment variables
    pub fn from_env() -> Result<Self> {
        let config = AnalysisConfig::from_env()?;
        Self::new(config)
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn service_url(&self) -> &Url {
        &self.service_url
    }

    pub fn endpoint_url(&self) -> &Url {
        &self.endpoint_url
    }

    async fn probe(&self, url: &Url) -> Result<StatusCode> {
        debug!(%url, "probing analysis service");
        let response = self
            .client
            .get(url.clone())
            .timeout(self.config.probe_timeout())
            .send()
            .await
            .map_err(|e| transport_error(&e))?;
        Ok(response.status())
    }

    async fn probe_with_detail(&self, target: ProbeTarget, url: &Url) -> ProbeReport {
        let started = Instant::now();
        let outcome = self
            .client
            .get(url.clone())
            .timeout(self.config.probe_timeout())
            .send()
            .await;

        let (status, body_snippet, error) = match outcome {
            Ok(response) => {
                let status = response.status();
                match response.text().await {
                    Ok(body) => (Some(status), Some(snippet(&body)), None),
                    Err(e) => (Some(status), None, Some(transport_error(&e).to_string())),
                }
            }
            Err(e) => (None, None, Some(transport_error(&e).to_string())),
        };

        let elapsed_ms = started.elapsed().as_millis() as u64;
        let available = status.is_some_and(|status| match target {
            ProbeTarget::Service => service_reachable(status),
            ProbeTarget::Endpoint => endpoint_routed(status),
        });

        info!(
            target: "phq::diagnostics",
            probe = %target,
            %url,
            status = status.map(|s| s.as_u16()),
            elapsed_ms,
            available,
            snippet = body_snippet.as_deref().unwrap_or(""),
            error = error.as_deref().unwrap_or(""),
            "probe completed"
        );

        ProbeReport {
            target,
            url: url.to_string(),
            status: status.map(|s| s.as_u16()),
            elapsed_ms,
            body_snippet,
            error,
            available,
        }
    }

    async fn perform_submission(&self, request: &AnalysisRequest) -> Result<AnalysisResponse> {
        let response = self
            .client
            .post(self.endpoint_url.clone())
            .header("Accept", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| transport_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            let message = match response.text().await {
                Ok(body) => rejection_message(&body),
                Err(e) => {
                    debug!(error = %e, %status, "could not read error body");
                    UNREADABLE_BODY.to_string()
                }
            };
            return Err(Error::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await.map_err(|e| transport_error(&e))?;

        serde_json::from_str::<AnalysisResponse>(&body).map_err(|e| {
            Error::MalformedResponse(format!("{}; body: {}", e, snippet(&body)))
        })
    }
}

#[async_trait]
impl AnalysisService for AnalysisClient {
    async fn is_service_available(&self) -> bool {
        match self.probe(&self.service_url).await {
            Ok(status) => service_reachable(status),
            Err(e) => {
                debug!(error = %e, "liveness probe failed");
                false
            }
        }
    }

    async fn is_endpoint_available(&self) -> bool {
        match self.probe(&self.endpoint_url).await {
            Ok(status) => endpoint_routed(status),
            Err(e) => {
                debug!(error = %e, "endpoint probe failed");
                false
            }
        }
    }

    async fn submit_for_analysis(
        &self,
        total_score: i32,
        responses: &[i32],
    ) -> Result<AnalysisResponse> {
        let request = AnalysisRequest::new(total_score, responses);
        debug!(total = total_score, url = %self.endpoint_url, "submitting questionnaire");

        let result = match timeout(self.config.request_timeout(), self.perform_submission(&request))
            .await
        {
            Ok(result) => result,
            Err(_) => Err(Error::Timeout(format!(
                "no response from {} within {} ms",
                self.endpoint_url, self.config.request_timeout_ms
            ))),
        };

        match &result {
            Ok(response) => info!(
                remote_severity = response.severity.as_deref().unwrap_or("none"),
                "analysis received"
            ),
            Err(e) => warn!(error = %e, "analysis submission failed"),
        }

        result
    }

    async fn debug_connection(&self) -> ConnectionDiagnostics {
        let (service, endpoint) = tokio::join!(
            self.probe_with_detail(ProbeTarget::Service, &self.service_url),
            self.probe_with_detail(ProbeTarget::Endpoint, &self.endpoint_url),
        );

        ConnectionDiagnostics { service, endpoint }
    }
}

/// Any 2xx or 3xx answer means the service is up
fn service_reachable(status: StatusCode) -> bool {
    status.is_success() || status.is_redirection()
}

/// 405 means the route exists but only accepts POST
fn endpoint_routed(status: StatusCode) -> bool {
    service_reachable(status) || status == StatusCode::METHOD_NOT_ALLOWED
}

fn transport_error(err: &reqwest::Error) -> Error {
    let detail = error_chain(err);
    if err.is_timeout() {
        Error::Timeout(detail)
    } else {
        Error::Network(detail)
    }
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

fn rejection_message(body: &str) -> String {
    if body.trim().is_empty() {
        return "no error details provided".to_string();
    }

    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["error", "message", "detail"] {
            if let Some(text) = value.get(key).and_then(|v| v.as_str()) {
                return text.to_string();
            }
        }
    }

    snippet(body)
}

fn snippet(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() <= SNIPPET_LEN {
        trimmed.to_string()
    } else {
        let head: String = trimmed.chars().take(SNIPPET_LEN).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert!(service_reachable(StatusCode::OK));
        assert!(service_reachable(StatusCode::FOUND));
        assert!(!service_reachable(StatusCode::NOT_FOUND));
        assert!(!service_reachable(StatusCode::SERVICE_UNAVAILABLE));

        assert!(endpoint_routed(StatusCode::METHOD_NOT_ALLOWED));
        assert!(endpoint_routed(StatusCode::NO_CONTENT));
        assert!(!endpoint_routed(StatusCode::NOT_FOUND));
        assert!(!endpoint_routed(StatusCode::BAD_GATEWAY));
    }

    #[test]
    fn test_rejection_message_prefers_json_fields() {
        assert_eq!(rejection_message(r#"{"error":"model offline"}"#), "model offline");
        assert_eq!(rejection_message(r#"{"message":"quota exceeded"}"#), "quota exceeded");
        assert_eq!(rejection_message(r#"{"detail":"bad total"}"#), "bad total");
        assert_eq!(rejection_message("   "), "no error details provided");
        assert_eq!(rejection_message("Bad Gateway"), "Bad Gateway");
        assert_eq!(
            rejection_message(r#"{"detail":[{"loc":["body"]}]}"#),
            r#"{"detail":[{"loc":["body"]}]}"#
        );
    }

    #[test]
    fn test_snippet_truncates_on_char_boundary() {
        let body = "é".repeat(SNIPPET_LEN + 10);
        let cut = snippet(&body);
        assert!(cut.ends_with("..."));
        assert_eq!(cut.chars().count(), SNIPPET_LEN + 3);
        assert_eq!(snippet("  short  "), "short");
    }

    #[test]
    fn test_client_rejects_bad_base_url() {
        let err = AnalysisClient::new(AnalysisConfig::new("not a url"))
            .err()
            .unwrap();
        assert!(matches!(err, Error::Configuration(_)));
    }
}
