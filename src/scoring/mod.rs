//! The scoring pipeline: normalize → aggregate → combine, with trend
//! estimation and triage classification layered on when history is
//! available, and consistency validation off to the side.

pub mod aggregator;
pub mod classifier;
pub mod combiner;
pub mod normalizer;
pub mod trend;
pub mod validator;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::assessment::{
    AssessmentResponse, CoherenceResult, HistoricalScorePoint, NormalizedAssessment, TriageStatus,
};
use crate::config::ScoringConfig;
use validator::Inconsistency;

/// Deterministic coherence scoring engine.
///
/// Holds the tuning configuration; every method is a pure function of
/// its arguments and that configuration — no I/O, no shared state, no
/// ambient clock. One engine can score any number of assessments, from
/// any number of threads.
#[derive(Debug, Clone, Default)]
pub struct CoherenceEngine {
    config: ScoringConfig,
}

impl CoherenceEngine {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Build the canonical normalized assessment (stage 1). Exposed so
    /// callers can feed the same normalized form to [`Self::validate`].
    pub fn normalize(&self, responses: &[AssessmentResponse]) -> NormalizedAssessment {
        normalizer::normalize(responses, &self.config.normalizer)
    }

    /// Score one assessment without trend context. `derivative` and
    /// `status` stay unset.
    pub fn score(&self, responses: &[AssessmentResponse]) -> CoherenceResult {
        let assessment = self.normalize(responses);
        let dimensions = aggregator::aggregate(&assessment, &self.config.aggregator);
        let result = combiner::combine(&dimensions, &self.config.combiner);
        debug!(
            overall = result.overall,
            percentage = result.percentage,
            "scored assessment"
        );
        result
    }

    /// Score one assessment and derive trend and triage status from the
    /// caller-supplied score history. `now` anchors the regression
    /// window; pass the submission instant.
    pub fn score_with_history(
        &self,
        responses: &[AssessmentResponse],
        history: &[HistoricalScorePoint],
        now: DateTime<Utc>,
    ) -> CoherenceResult {
        let mut result = self.score(responses);
        let derivative = trend::weekly_derivative(
            f64::from(result.percentage),
            history,
            now,
            &self.config.trend,
        );
        let status = classifier::classify(
            f64::from(result.percentage),
            derivative,
            &self.config.classifier,
        );
        result.derivative = Some(derivative);
        result.status = Some(status);
        result
    }

    /// Ad-hoc trend query: weekly derivative for a current percentage
    /// and its history, without rescoring.
    pub fn trend(
        &self,
        current_percentage: f64,
        history: &[HistoricalScorePoint],
        now: DateTime<Utc>,
    ) -> f64 {
        trend::weekly_derivative(current_percentage, history, now, &self.config.trend)
    }

    /// Ad-hoc classification of an existing (percentage, derivative)
    /// pair.
    pub fn classify(&self, percentage: f64, derivative: f64) -> TriageStatus {
        classifier::classify(percentage, derivative, &self.config.classifier)
    }

    /// Run the consistency rules. Diagnostic only — the outcome never
    /// alters a score.
    pub fn validate(&self, assessment: &NormalizedAssessment) -> Vec<Inconsistency> {
        validator::check(assessment, &self.config.validator)
    }
}
