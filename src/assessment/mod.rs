//! Input and output data model for the scoring pipeline.
//!
//! The types here form the engine's computation boundary: raw
//! [`AssessmentResponse`] lists come in from the submission layer, a
//! [`CoherenceResult`] goes out to persistence and the dashboard. Wire
//! names are camelCase because the consuming dashboard contract is.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ── Dimensions ───────────────────────────────────────────────────

/// The four coherence dimensions.
///
/// - `psi` — internal consistency: alignment between stated values and
///   daily actions.
/// - `rho` — accumulated wisdom: capacity to learn from experience.
/// - `q` — moral activation: willingness to act despite discomfort.
/// - `f` — social belonging: depth and breadth of supportive ties.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Dimension {
    Psi,
    Rho,
    Q,
    F,
}

/// How a question was asked, which decides how its answer is normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum QuestionType {
    Scale,
    MultipleChoice,
    Frequency,
    Text,
}

// ── Raw input ────────────────────────────────────────────────────

/// A raw answer value: numeric (scale points, counts, pre-scored
/// choices) or textual (frequency labels, choice keys, free text).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseValue {
    Number(f64),
    Text(String),
}

impl ResponseValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Number(_) => None,
            Self::Text(s) => Some(s.as_str()),
        }
    }
}

impl From<f64> for ResponseValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for ResponseValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

/// One raw assessment answer as submitted. Read-only to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentResponse {
    pub question_id: String,
    pub value: ResponseValue,
    pub dimension: Dimension,
    pub question_type: QuestionType,
    /// Per-response weight override; falls back to the configured
    /// per-question table, then 1.0.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

// ── Canonical normalized form ────────────────────────────────────

/// A single response after normalization.
///
/// Keeps both the raw value (counts and rates are consumed raw by the
/// aggregator's signal reads) and the normalized `[0,1]` score, which is
/// absent for text answers and malformed values.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedResponse {
    pub question_id: String,
    pub dimension: Dimension,
    pub question_type: QuestionType,
    pub raw: ResponseValue,
    pub normalized: Option<f64>,
    pub weight: Option<f64>,
}

/// The canonical normalized assessment, built once by the normalizer and
/// consumed by every downstream component (aggregator and validator
/// alike).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NormalizedAssessment {
    responses: Vec<NormalizedResponse>,
}

impl NormalizedAssessment {
    pub fn new(responses: Vec<NormalizedResponse>) -> Self {
        Self { responses }
    }

    pub fn responses(&self) -> &[NormalizedResponse] {
        &self.responses
    }

    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }

    pub fn len(&self) -> usize {
        self.responses.len()
    }

    /// All responses belonging to one dimension.
    pub fn for_dimension(&self, dimension: Dimension) -> impl Iterator<Item = &NormalizedResponse> {
        self.responses
            .iter()
            .filter(move |r| r.dimension == dimension)
    }

    /// Raw numeric value of the response with this question id, if any.
    /// Counts and rates (network size, bold actions, procrastination)
    /// are read through here, bypassing normalization.
    pub fn raw_number(&self, question_id: &str) -> Option<f64> {
        self.responses
            .iter()
            .find(|r| r.question_id == question_id)
            .and_then(|r| r.raw.as_number())
    }

    /// Signal view used by the consistency validator: the normalized
    /// score when one exists, otherwise the raw numeric value.
    pub fn signal(&self, question_id: &str) -> Option<f64> {
        self.responses
            .iter()
            .find(|r| r.question_id == question_id)
            .and_then(|r| r.normalized.or_else(|| r.raw.as_number()))
    }
}

// ── Score history ────────────────────────────────────────────────

/// One persisted coherence score, supplied by the caller for trend
/// estimation. `score` is the 0–100 percentage. The engine sorts its own
/// copy and never mutates the source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalScorePoint {
    pub score: f64,
    pub timestamp: DateTime<Utc>,
}

// ── Output ───────────────────────────────────────────────────────

/// Aggregated per-dimension scores, nominally in `[0,1]`.
///
/// `q` is clamped by the aggregator. `rho` may exceed 1.0 when the
/// learning-speed bonus applies; that overshoot is deliberate and
/// surfaced as-is.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DimensionScores {
    pub psi: f64,
    pub rho: f64,
    pub q: f64,
    pub f: f64,
}

/// Integer percent view of the dimension scores, rounded independently
/// of the overall computation. `rho` may exceed 100 (see
/// [`DimensionScores`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DimensionPercents {
    pub psi: u32,
    pub rho: u32,
    pub q: u32,
    pub f: u32,
}

/// The four additive terms of the governing formula, kept for
/// explainability in dashboards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Components {
    /// Ψ
    pub base_alignment: f64,
    /// ρ·Ψ
    pub wisdom_multiplier: f64,
    /// q_optimal(Q)
    pub optimal_courage: f64,
    /// f·Ψ
    pub relationship_multiplier: f64,
}

/// Result of scoring one assessment. Created fresh per invocation,
/// immutable, JSON-serializable.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoherenceResult {
    /// Raw coherence value; theoretical range `[0, ~3.5]`.
    pub overall: f64,
    /// `round(overall / max_coherence * 100)`, clamped into `[0,100]`.
    pub percentage: u8,
    pub dimensions: DimensionPercents,
    pub components: Components,
    /// Weekly rate of change; present only when history was supplied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub derivative: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TriageStatus>,
}

/// Five-way triage classification used to prioritize coach attention.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TriageStatus {
    Critical,
    Warning,
    Stable,
    Thriving,
    Breakthrough,
}

impl TriageStatus {
    /// Ordinal for consumers that sort clients by health.
    /// Higher = healthier: critical=0 … breakthrough=4.
    #[inline]
    pub fn health_ordinal(self) -> u8 {
        match self {
            Self::Critical => 0,
            Self::Warning => 1,
            Self::Stable => 2,
            Self::Thriving => 3,
            Self::Breakthrough => 4,
        }
    }

    /// True for the two states that should surface in coach alerts.
    #[inline]
    pub fn needs_attention(self) -> bool {
        matches!(self, Self::Critical | Self::Warning)
    }
}

#[cfg(test)]
mod tests {
    use super::{AssessmentResponse, Dimension, QuestionType, ResponseValue, TriageStatus};
    use std::str::FromStr;

    #[test]
    fn response_value_deserializes_untagged() {
        let numeric: ResponseValue = serde_json::from_str("7.5").unwrap();
        assert_eq!(numeric.as_number(), Some(7.5));

        let label: ResponseValue = serde_json::from_str("\"Usually\"").unwrap();
        assert_eq!(label.as_text(), Some("Usually"));
    }

    #[test]
    fn assessment_response_uses_camel_case_wire_names() {
        let json = r#"{
            "questionId": "values_alignment",
            "value": 8,
            "dimension": "psi",
            "questionType": "scale"
        }"#;
        let parsed: AssessmentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.question_id, "values_alignment");
        assert_eq!(parsed.dimension, Dimension::Psi);
        assert_eq!(parsed.question_type, QuestionType::Scale);
        assert_eq!(parsed.weight, None);
    }

    #[test]
    fn triage_status_round_trips_through_strings() {
        for (status, text) in [
            (TriageStatus::Critical, "critical"),
            (TriageStatus::Breakthrough, "breakthrough"),
        ] {
            assert_eq!(status.to_string(), text);
            assert_eq!(TriageStatus::from_str(text).unwrap(), status);
        }
    }

    #[test]
    fn health_ordinal_orders_states_from_critical_to_breakthrough() {
        assert!(TriageStatus::Critical.health_ordinal() < TriageStatus::Warning.health_ordinal());
        assert!(TriageStatus::Stable.health_ordinal() < TriageStatus::Breakthrough.health_ordinal());
        assert!(TriageStatus::Warning.needs_attention());
        assert!(!TriageStatus::Thriving.needs_attention());
    }
}
