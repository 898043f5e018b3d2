//! Consistency validation — qualitative contradiction detection.
//!
//! Runs off the main scoring path and never influences the score.
//! Rules are configuration data checked in order against the
//! assessment's signal view; a rule whose signals are absent simply
//! does not fire. Purely diagnostic, never errors.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::assessment::NormalizedAssessment;
use crate::config::{ConsistencyRule, SignalCondition, ValidatorConfig};

/// Severity of a detected inconsistency.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
}

/// One detected contradiction between responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Inconsistency {
    pub kind: String,
    pub severity: Severity,
    pub message: String,
}

/// Check every configured rule, in order. Returns an empty list when
/// the answers tell one consistent story.
pub fn check(assessment: &NormalizedAssessment, config: &ValidatorConfig) -> Vec<Inconsistency> {
    let detected: Vec<Inconsistency> = config
        .rules
        .iter()
        .filter(|rule| rule_holds(rule, assessment))
        .map(|rule| Inconsistency {
            kind: rule.kind.clone(),
            severity: rule.severity,
            message: rule.message.clone(),
        })
        .collect();
    if !detected.is_empty() {
        debug!(count = detected.len(), "detected response inconsistencies");
    }
    detected
}

fn rule_holds(rule: &ConsistencyRule, assessment: &NormalizedAssessment) -> bool {
    !rule.conditions.is_empty()
        && rule
            .conditions
            .iter()
            .all(|condition| condition_holds(condition, assessment))
}

fn condition_holds(condition: &SignalCondition, assessment: &NormalizedAssessment) -> bool {
    let Some(value) = assessment.signal(&condition.signal) else {
        return false;
    };
    condition.above.is_none_or(|threshold| value > threshold)
        && condition.below.is_none_or(|threshold| value < threshold)
}
