//! Response normalization — the first pipeline stage.
//!
//! Maps every raw answer onto a `[0,1]` score and builds the canonical
//! [`NormalizedAssessment`] that the aggregator and the consistency
//! validator both consume. Unrecognized categorical labels resolve to
//! the configured neutral score; that leniency is deliberate, the
//! engine never rejects a submission over a vocabulary drift.

use tracing::trace;

use crate::assessment::{
    AssessmentResponse, NormalizedAssessment, NormalizedResponse, QuestionType, ResponseValue,
};
use crate::config::NormalizerConfig;

/// Linear map of a 1–10 scale answer onto `[0,1]`; `reverse` scores
/// `11 - v` first for reverse-keyed questions.
///
/// The engine does not validate the input range. Values outside
/// `[1,10]` are the caller's contract violation and produce results
/// outside `[0,1]`; boundary validation belongs to the submission
/// layer.
#[inline]
pub fn score_scale(value: f64, reverse: bool) -> f64 {
    let v = if reverse { 11.0 - value } else { value };
    (v - 1.0) / 9.0
}

/// Fixed-table frequency scoring with a neutral fallback for unknown
/// labels.
pub fn score_frequency(label: &str, config: &NormalizerConfig) -> f64 {
    config
        .frequency_scores
        .get(label)
        .copied()
        .unwrap_or(config.neutral_score)
}

/// Resolve a categorical choice through the question's own map, then
/// the generic option table, then the neutral fallback.
pub fn score_choice(question_id: &str, label: &str, config: &NormalizerConfig) -> f64 {
    config
        .choice_maps
        .get(question_id)
        .and_then(|map| map.get(label))
        .or_else(|| config.fallback_choice_scores.get(label))
        .copied()
        .unwrap_or(config.neutral_score)
}

/// Build the canonical normalized assessment.
///
/// Text answers and malformed values (a textual scale answer) carry no
/// normalized score; they stay in the assessment for the signal view
/// but never reach a dimension mean.
pub fn normalize(
    responses: &[AssessmentResponse],
    config: &NormalizerConfig,
) -> NormalizedAssessment {
    let normalized = responses
        .iter()
        .map(|response| {
            let score = score_response(response, config);
            trace!(
                question_id = %response.question_id,
                question_type = %response.question_type,
                normalized = ?score,
                "normalized response"
            );
            NormalizedResponse {
                question_id: response.question_id.clone(),
                dimension: response.dimension,
                question_type: response.question_type,
                raw: response.value.clone(),
                normalized: score,
                weight: response.weight,
            }
        })
        .collect();
    NormalizedAssessment::new(normalized)
}

fn score_response(response: &AssessmentResponse, config: &NormalizerConfig) -> Option<f64> {
    match (response.question_type, &response.value) {
        (QuestionType::Scale, ResponseValue::Number(v)) => {
            let reverse = config
                .reverse_scored
                .iter()
                .any(|id| id == &response.question_id);
            Some(score_scale(*v, reverse))
        }
        (QuestionType::Frequency, ResponseValue::Text(label)) => {
            Some(score_frequency(label, config))
        }
        (QuestionType::MultipleChoice, ResponseValue::Text(label)) => {
            Some(score_choice(&response.question_id, label, config))
        }
        // Numeric frequency / multiple-choice answers arrive pre-scored
        // by the submission layer and pass through untouched.
        (QuestionType::Frequency | QuestionType::MultipleChoice, ResponseValue::Number(v)) => {
            Some(*v)
        }
        (QuestionType::Scale, ResponseValue::Text(_)) | (QuestionType::Text, _) => None,
    }
}
