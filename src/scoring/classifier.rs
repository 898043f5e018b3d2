//! Triage classification — maps (percentage, weekly derivative) to one
//! of five states.
//!
//! This is the single canonical classifier; every consumer that needs a
//! status injects thresholds into this function instead of carrying its
//! own cut points. Precedence is fixed, first match wins:
//! critical → warning → breakthrough → thriving → stable.

use crate::assessment::TriageStatus;
use crate::config::ClassifierThresholds;

/// Classify a coherence percentage and weekly derivative.
#[inline]
pub fn classify(percentage: f64, derivative: f64, t: &ClassifierThresholds) -> TriageStatus {
    if percentage < t.critical_score
        || (percentage < t.warning_score && derivative < t.critical_slope)
    {
        TriageStatus::Critical
    } else if percentage < t.warning_score || derivative < t.warning_slope {
        TriageStatus::Warning
    } else if percentage > t.breakthrough_score && derivative > t.breakthrough_slope {
        TriageStatus::Breakthrough
    } else if percentage > t.thriving_score && derivative > t.thriving_slope {
        TriageStatus::Thriving
    } else {
        TriageStatus::Stable
    }
}

#[cfg(test)]
mod tests {
    use super::classify;
    use crate::assessment::TriageStatus;
    use crate::config::ClassifierThresholds;

    fn status(percentage: f64, derivative: f64) -> TriageStatus {
        classify(percentage, derivative, &ClassifierThresholds::default())
    }

    #[test]
    fn reference_cases_classify_as_documented() {
        assert_eq!(status(35.0, -0.04), TriageStatus::Critical);
        assert_eq!(status(55.0, -0.02), TriageStatus::Warning);
        assert_eq!(status(65.0, 0.01), TriageStatus::Stable);
        assert_eq!(status(75.0, 0.02), TriageStatus::Thriving);
        assert_eq!(status(90.0, 0.05), TriageStatus::Breakthrough);
    }

    #[test]
    fn low_score_is_critical_regardless_of_trend() {
        assert_eq!(status(39.9, 0.1), TriageStatus::Critical);
    }

    #[test]
    fn mid_score_with_steep_decline_escalates_to_critical() {
        assert_eq!(status(55.0, -0.04), TriageStatus::Critical);
        // Same decline above the warning band stays warning.
        assert_eq!(status(65.0, -0.04), TriageStatus::Warning);
    }

    #[test]
    fn healthy_score_with_mild_decline_is_warning() {
        assert_eq!(status(75.0, -0.02), TriageStatus::Warning);
    }

    #[test]
    fn high_score_needs_momentum_for_breakthrough() {
        assert_eq!(status(90.0, 0.01), TriageStatus::Thriving);
        assert_eq!(status(90.0, 0.0), TriageStatus::Stable);
    }

    #[test]
    fn thresholds_are_exclusive_at_the_boundary() {
        // Exactly at the cut points: not below, not above.
        assert_eq!(status(40.0, 0.0), TriageStatus::Warning);
        assert_eq!(status(60.0, 0.0), TriageStatus::Stable);
        assert_eq!(status(70.0, 0.02), TriageStatus::Stable);
        assert_eq!(status(85.0, 0.05), TriageStatus::Thriving);
    }
}
