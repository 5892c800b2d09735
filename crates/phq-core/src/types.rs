//! Data model shared by the scorer, the analysis client and the harness

use serde::{Deserialize, Serialize};

use crate::scoring::{
    calculate_total_score, get_severity_level, invalid_responses, should_recommend_ai_analysis,
    validate_responses,
};
use crate::{Error, Result};

/// Severity band derived from a PHQ-9 total score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Minimal,
    Mild,
    Moderate,
    #[serde(rename = "Moderately Severe")]
    ModeratelySevere,
    Severe,
}

impl Severity {
    /// Get the display label for this band
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Minimal => "Minimal",
            Severity::Mild => "Mild",
            Severity::Moderate => "Moderate",
            Severity::ModeratelySevere => "Moderately Severe",
            Severity::Severe => "Severe",
        }
    }

    /// All bands in ascending order
    pub fn all() -> Vec<Severity> {
        vec![
            Severity::Minimal,
            Severity::Mild,
            Severity::Moderate,
            Severity::ModeratelySevere,
            Severity::Severe,
        ]
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Nine validated questionnaire answers, each in 0..=3
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct QuestionnaireResponse(Vec<i32>);

impl QuestionnaireResponse {
    /// Validate and wrap a sequence of answers
    pub fn new(answers: Vec<i32>) -> Result<Self> {
        if validate_responses(&answers) {
            Ok(Self(answers))
        } else {
            Err(invalid_responses(&answers))
        }
    }

    pub fn answers(&self) -> &[i32] {
        &self.0
    }

    pub fn total(&self) -> i32 {
        calculate_total_score(&self.0)
    }
}

impl TryFrom<Vec<i32>> for QuestionnaireResponse {
    type Error = Error;

    fn try_from(answers: Vec<i32>) -> Result<Self> {
        Self::new(answers)
    }
}

/// Locally computed outcome of one scoring pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub total: i32,
    pub severity: Severity,
    pub recommend_analysis: bool,
}

impl ScoreResult {
    /// Classify an already computed total
    pub fn from_total(total: i32) -> Self {
        Self {
            total,
            severity: get_severity_level(total),
            recommend_analysis: should_recommend_ai_analysis(total),
        }
    }
}

/// Body of a submission to the analysis endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub total: i32,
    pub responses: Vec<i32>,
}

impl AnalysisRequest {
    pub fn new(total: i32, responses: &[i32]) -> Self {
        Self {
            total,
            responses: responses.to_vec(),
        }
    }
}

impl From<&QuestionnaireResponse> for AnalysisRequest {
    fn from(response: &QuestionnaireResponse) -> Self {
        Self::new(response.total(), response.answers())
    }
}

/// Structured reply from the analysis service.
///
/// Every field may be absent; `severity` is the service's own label and is
/// never reconciled with the locally computed [`Severity`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    #[serde(default)]
    pub emotional_state: Option<String>,
    #[serde(default)]
    pub recommendations: Option<Vec<String>>,
    #[serde(default)]
    pub severity: Option<String>,
}

impl AnalysisResponse {
    /// True when the service returned none of the three fields
    pub fn is_empty(&self) -> bool {
        self.emotional_state.is_none() && self.recommendations.is_none() && self.severity.is_none()
    }
}

/// Which route a probe targeted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeTarget {
    Service,
    Endpoint,
}

impl std::fmt::Display for ProbeTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProbeTarget::Service => write!(f, "service"),
            ProbeTarget::Endpoint => write!(f, "endpoint"),
        }
    }
}

/// Raw detail captured by a single diagnostic probe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeReport {
    pub target: ProbeTarget,
    pub url: String,
    pub status: Option<u16>,
    pub elapsed_ms: u64,
    pub body_snippet: Option<String>,
    pub error: Option<String>,
    pub available: bool,
}

/// Result of `debug_connection`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionDiagnostics {
    pub service: ProbeReport,
    pub endpoint: ProbeReport,
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_yaml_snapshot;

    #[test]
    fn test_severity_labels() {
        assert_eq!(Severity::Minimal.label(), "Minimal");
        assert_eq!(Severity::ModeratelySevere.to_string(), "Moderately Severe");
        assert_eq!(Severity::Severe.to_string(), "Severe");
    }

    #[test]
    fn test_severity_ordering() {
        let all = Severity::all();
        assert_eq!(all.len(), 5);
        assert!(all.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn test_questionnaire_response_rejects_short_input() {
        let err = QuestionnaireResponse::new(vec![1; 8]).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        // same wording as the one-pass scorer
        let scored = crate::score_responses(&[1; 8]).unwrap_err();
        assert_eq!(err.to_string(), scored.to_string());
    }

    #[test]
    fn test_questionnaire_response_total() {
        let response = QuestionnaireResponse::try_from(vec![1, 1, 2, 1, 0, 1, 1, 0, 1]).unwrap();
        assert_eq!(response.total(), 8);

        let request = AnalysisRequest::from(&response);
        assert_eq!(request.total, 8);
        assert_eq!(request.responses, response.answers());
    }

    #[test]
    fn test_request_wire_shape() {
        let request = AnalysisRequest::new(8, &[1, 1, 2, 1, 0, 1, 1, 0, 1]);
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"total": 8, "responses": [1, 1, 2, 1, 0, 1, 1, 0, 1]})
        );
    }

    #[test]
    fn test_response_with_nulls() {
        let response: AnalysisResponse = serde_json::from_str(
            r#"{"emotional_state":null,"recommendations":null,"severity":"Mild"}"#,
        )
        .unwrap();
        assert_eq!(response.emotional_state, None);
        assert_eq!(response.recommendations, None);
        assert_eq!(response.severity.as_deref(), Some("Mild"));
        assert!(!response.is_empty());
    }

    #[test]
    fn test_response_missing_keys_is_empty() {
        let response: AnalysisResponse = serde_json::from_str("{}").unwrap();
        assert!(response.is_empty());
    }

    #[test]
    fn test_response_wrong_type_is_error() {
        let parsed = serde_json::from_str::<AnalysisResponse>(r#"{"recommendations":"rest"}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_score_result_snapshot() {
        let result = ScoreResult {
            total: 17,
            severity: Severity::ModeratelySevere,
            recommend_analysis: true,
        };

        assert_yaml_snapshot!(result, @r###"
        total: 17
        severity: Moderately Severe
        recommend_analysis: true
        "###);
    }
}
