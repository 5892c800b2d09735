//! PHQ-9 questionnaire scoring
//!
//! Pure functions only. Item order is significant to the instrument but never
//! interpreted here; only the sum matters.

use crate::{Error, Result, ScoreResult, Severity};

/// Number of items in the questionnaire
pub const QUESTION_COUNT: usize = 9;

/// Highest answer allowed for a single item
pub const MAX_ITEM_SCORE: i32 = 3;

/// Lowest total for which remote analysis is suggested
pub const RECOMMENDATION_THRESHOLD: i32 = 5;

/// Check that there are exactly nine answers, each in 0..=3
pub fn validate_responses(responses: &[i32]) -> bool {
    responses.len() == QUESTION_COUNT
        && responses
            .iter()
            .all(|answer| (0..=MAX_ITEM_SCORE).contains(answer))
}

/// Sum of all answers. Does not re-validate; saturates instead of
/// overflowing on arbitrary input.
pub fn calculate_total_score(responses: &[i32]) -> i32 {
    responses
        .iter()
        .fold(0i32, |total, answer| total.saturating_add(*answer))
}

/// Map a total score to its severity band.
///
/// Cutoffs 4/9/14/19 are the instrument's standard thresholds.
pub fn get_severity_level(total_score: i32) -> Severity {
    match total_score {
        i32::MIN..=4 => Severity::Minimal,
        5..=9 => Severity::Mild,
        10..=14 => Severity::Moderate,
        15..=19 => Severity::ModeratelySevere,
        _ => Severity::Severe,
    }
}

/// Whether the score warrants a remote analysis request
pub fn should_recommend_ai_analysis(total_score: i32) -> bool {
    total_score >= RECOMMENDATION_THRESHOLD
}

/// Validate then score a questionnaire in one pass
pub fn score_responses(responses: &[i32]) -> Result<ScoreResult> {
    if !validate_responses(responses) {
        return Err(invalid_responses(responses));
    }

    Ok(ScoreResult::from_total(calculate_total_score(responses)))
}

pub(crate) fn invalid_responses(responses: &[i32]) -> Error {
    Error::Validation(format!(
        "expected {} answers between 0 and {}, got {:?}",
        QUESTION_COUNT, MAX_ITEM_SCORE, responses
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_wrong_length() {
        for len in [0, 1, 8, 10, 18] {
            let responses = vec![0; len];
            assert!(!validate_responses(&responses), "length {len} accepted");
        }
    }

    #[test]
    fn test_validate_accepts_in_range_values() {
        assert!(validate_responses(&[0; 9]));
        assert!(validate_responses(&[3; 9]));
        assert!(validate_responses(&[0, 1, 2, 3, 0, 1, 2, 3, 0]));
    }

    #[test]
    fn test_validate_rejects_out_of_range_values() {
        let mut responses = [1; 9];
        for bad in [-1, 4, 100, i32::MIN] {
            for position in 0..9 {
                responses[position] = bad;
                assert!(!validate_responses(&responses));
                responses[position] = 1;
            }
        }
    }

    #[test]
    fn test_total_is_sum() {
        assert_eq!(calculate_total_score(&[0; 9]), 0);
        assert_eq!(calculate_total_score(&[3; 9]), 27);
        assert_eq!(calculate_total_score(&[1, 1, 2, 1, 0, 1, 1, 0, 1]), 8);
    }

    #[test]
    fn test_total_does_not_revalidate() {
        assert_eq!(calculate_total_score(&[5, 5]), 10);
        assert_eq!(calculate_total_score(&[]), 0);
    }

    #[test]
    fn test_total_saturates_on_extreme_input() {
        assert_eq!(calculate_total_score(&[i32::MAX, 1]), i32::MAX);
        assert_eq!(calculate_total_score(&[i32::MIN, -1]), i32::MIN);
        assert_eq!(calculate_total_score(&[i32::MAX, i32::MAX, -5]), i32::MAX - 5);
    }

    #[test]
    fn test_every_valid_questionnaire_totals_within_range() {
        let combinations = 4u32.pow(QUESTION_COUNT as u32);
        for mut code in 0..combinations {
            let mut responses = [0i32; QUESTION_COUNT];
            let mut expected = 0;
            for slot in responses.iter_mut() {
                *slot = (code % 4) as i32;
                expected += *slot;
                code /= 4;
            }

            assert!(validate_responses(&responses));
            let total = calculate_total_score(&responses);
            assert_eq!(total, expected);
            assert!((0..=27).contains(&total), "total {total} out of range");
        }
    }

    #[test]
    fn test_severity_boundaries() {
        let cases = [
            (0, Severity::Minimal),
            (4, Severity::Minimal),
            (5, Severity::Mild),
            (9, Severity::Mild),
            (10, Severity::Moderate),
            (14, Severity::Moderate),
            (15, Severity::ModeratelySevere),
            (19, Severity::ModeratelySevere),
            (20, Severity::Severe),
            (27, Severity::Severe),
        ];

        for (score, expected) in cases {
            assert_eq!(get_severity_level(score), expected, "score {score}");
        }
        assert_eq!(get_severity_level(15).label(), "Moderately Severe");
    }

    #[test]
    fn test_severity_is_monotonic() {
        let levels: Vec<_> = (-3..=40).map(get_severity_level).collect();
        assert!(levels.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[test]
    fn test_severity_is_deterministic() {
        for score in 0..=27 {
            let first = get_severity_level(score);
            for _ in 0..5 {
                assert_eq!(get_severity_level(score), first);
            }
        }
    }

    #[test]
    fn test_recommendation_threshold() {
        assert!(!should_recommend_ai_analysis(0));
        assert!(!should_recommend_ai_analysis(4));
        assert!(should_recommend_ai_analysis(5));
        assert!(should_recommend_ai_analysis(27));
    }

    #[test]
    fn test_mild_scenario() {
        let result = score_responses(&[1, 1, 2, 1, 0, 1, 1, 0, 1]).unwrap();
        assert_eq!(result.total, 8);
        assert_eq!(result.severity, Severity::Mild);
        assert!(result.recommend_analysis);
    }

    #[test]
    fn test_score_responses_rejects_invalid() {
        let err = score_responses(&[1, 1, 1]).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }
}
