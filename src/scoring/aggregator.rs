//! Dimension aggregation — combines normalized responses into one
//! score per dimension.
//!
//! Quantitative signals (learning speed, bold-action count,
//! procrastination rate, support-network size) are read from the raw
//! value of the response carrying the configured question id and are
//! excluded from their dimension's mean, generalizing the network-size
//! exclusion on F. A dimension with no responses at all scores the
//! neutral default.

use tracing::debug;

use crate::assessment::{Dimension, DimensionScores, NormalizedAssessment, NormalizedResponse};
use crate::config::AggregatorConfig;

/// Aggregate the four dimension scores from a normalized assessment.
pub fn aggregate(assessment: &NormalizedAssessment, config: &AggregatorConfig) -> DimensionScores {
    let scores = DimensionScores {
        psi: psi_score(assessment, config),
        rho: rho_score(assessment, config),
        q: q_score(assessment, config),
        f: f_score(assessment, config),
    };
    debug!(
        psi = scores.psi,
        rho = scores.rho,
        q = scores.q,
        f = scores.f,
        "aggregated dimension scores"
    );
    scores
}

fn is_signal(question_id: &str, config: &AggregatorConfig) -> bool {
    question_id == config.learning_speed_id
        || question_id == config.bold_action_id
        || question_id == config.procrastination_id
        || question_id == config.network_id
}

/// Normalized, non-signal responses of one dimension.
fn scored<'a>(
    assessment: &'a NormalizedAssessment,
    dimension: Dimension,
    config: &'a AggregatorConfig,
) -> impl Iterator<Item = (&'a NormalizedResponse, f64)> {
    assessment
        .for_dimension(dimension)
        .filter(|r| !is_signal(&r.question_id, config))
        .filter_map(|r| r.normalized.map(|score| (r, score)))
}

fn weighted_mean(pairs: &[(f64, f64)]) -> Option<f64> {
    let total_weight: f64 = pairs.iter().map(|(weight, _)| weight).sum();
    if total_weight <= 0.0 {
        return None;
    }
    let weighted_sum: f64 = pairs.iter().map(|(weight, score)| weight * score).sum();
    Some(weighted_sum / total_weight)
}

/// PSI — internal consistency. Weighted mean; a response's own weight
/// wins over the static per-question table, anything else weighs 1.0.
fn psi_score(assessment: &NormalizedAssessment, config: &AggregatorConfig) -> f64 {
    let pairs: Vec<(f64, f64)> = scored(assessment, Dimension::Psi, config)
        .map(|(r, score)| {
            let weight = r
                .weight
                .or_else(|| config.psi_weights.get(&r.question_id).copied())
                .unwrap_or(1.0);
            (weight, score)
        })
        .collect();
    weighted_mean(&pairs).unwrap_or(config.neutral_score)
}

/// RHO — accumulated wisdom. Mean of normalized responses, then the
/// learning-speed multiplicative bonus when that signal is present.
/// The bonus is applied without a clamp; rho can exceed 1.0. That
/// overshoot is a known characteristic of the model, surfaced as-is.
fn rho_score(assessment: &NormalizedAssessment, config: &AggregatorConfig) -> f64 {
    let pairs: Vec<(f64, f64)> = scored(assessment, Dimension::Rho, config)
        .map(|(r, score)| (r.weight.unwrap_or(1.0), score))
        .collect();
    let base = weighted_mean(&pairs).unwrap_or(config.neutral_score);

    match assessment.raw_number(&config.learning_speed_id) {
        Some(speed) => base * (1.0 + (speed - 0.5) * config.learning_speed_gain),
        None => base,
    }
}

/// Q — moral activation. Plain mean, plus a capped bold-action bonus,
/// minus the procrastination penalty; clamped into `[0,1]`.
fn q_score(assessment: &NormalizedAssessment, config: &AggregatorConfig) -> f64 {
    let pairs: Vec<(f64, f64)> = scored(assessment, Dimension::Q, config)
        .map(|(_, score)| (1.0, score))
        .collect();
    let mut score = weighted_mean(&pairs).unwrap_or(config.neutral_score);

    if let Some(count) = assessment.raw_number(&config.bold_action_id) {
        score += (count * config.bold_action_step).min(config.bold_action_cap);
    }
    if let Some(rate) = assessment.raw_number(&config.procrastination_id) {
        score -= rate * config.procrastination_penalty;
    }
    score.clamp(0.0, 1.0)
}

/// F — social belonging. Quality (mean of the non-network F responses,
/// 0 when absent) blended with a saturating quantity curve over the
/// support-network size: additional contacts carry diminishing value.
fn f_score(assessment: &NormalizedAssessment, config: &AggregatorConfig) -> f64 {
    let has_any = assessment.for_dimension(Dimension::F).next().is_some()
        || assessment.raw_number(&config.network_id).is_some();
    if !has_any {
        return config.neutral_score;
    }

    let pairs: Vec<(f64, f64)> = scored(assessment, Dimension::F, config)
        .map(|(_, score)| (1.0, score))
        .collect();
    let quality = weighted_mean(&pairs).unwrap_or(0.0);

    let network_size = assessment.raw_number(&config.network_id).unwrap_or(0.0);
    let quantity = 1.0 - (-network_size / config.network_saturation).exp();

    config.f_quality_weight * quality + config.f_quantity_weight * quantity
}

#[cfg(test)]
mod tests {
    use super::aggregate;
    use crate::assessment::{
        AssessmentResponse, Dimension, NormalizedAssessment, QuestionType, ResponseValue,
    };
    use crate::config::{AggregatorConfig, NormalizerConfig};
    use crate::scoring::normalizer::normalize;

    fn scale(id: &str, dimension: Dimension, value: f64) -> AssessmentResponse {
        AssessmentResponse {
            question_id: id.to_string(),
            value: ResponseValue::Number(value),
            dimension,
            question_type: QuestionType::Scale,
            weight: None,
        }
    }

    fn signal(id: &str, dimension: Dimension, value: f64) -> AssessmentResponse {
        AssessmentResponse {
            question_id: id.to_string(),
            value: ResponseValue::Number(value),
            dimension,
            question_type: QuestionType::Text,
            weight: None,
        }
    }

    fn build(responses: &[AssessmentResponse]) -> NormalizedAssessment {
        normalize(responses, &NormalizerConfig::default())
    }

    #[test]
    fn empty_assessment_scores_neutral_on_every_dimension() {
        let scores = aggregate(&build(&[]), &AggregatorConfig::default());
        assert_eq!(scores.psi, 0.5);
        assert_eq!(scores.rho, 0.5);
        assert_eq!(scores.q, 0.5);
        assert_eq!(scores.f, 0.5);
    }

    #[test]
    fn psi_uses_static_weight_table_then_default_weight() {
        let config = AggregatorConfig::default();
        // values_action_alignment weighs 1.5 in the default table; the
        // unknown question weighs 1.0.
        let assessment = build(&[
            scale("values_action_alignment", Dimension::Psi, 10.0),
            scale("morning_routine", Dimension::Psi, 1.0),
        ]);
        let scores = aggregate(&assessment, &config);
        // (1.5*1.0 + 1.0*0.0) / 2.5
        assert!((scores.psi - 0.6).abs() < 1e-12);
    }

    #[test]
    fn psi_response_weight_overrides_static_table() {
        let config = AggregatorConfig::default();
        let mut weighted = scale("values_action_alignment", Dimension::Psi, 10.0);
        weighted.weight = Some(3.0);
        let assessment = build(&[weighted, scale("morning_routine", Dimension::Psi, 1.0)]);
        let scores = aggregate(&assessment, &config);
        // (3.0*1.0 + 1.0*0.0) / 4.0
        assert!((scores.psi - 0.75).abs() < 1e-12);
    }

    #[test]
    fn rho_learning_speed_bonus_scales_the_base() {
        let config = AggregatorConfig::default();
        let assessment = build(&[
            scale("lesson_integration", Dimension::Rho, 10.0),
            signal("learning_speed_average", Dimension::Rho, 1.0),
        ]);
        let scores = aggregate(&assessment, &config);
        // base 1.0, bonus 1 + (1.0 - 0.5) * 0.2 = 1.1 — deliberately above 1.0
        assert!((scores.rho - 1.1).abs() < 1e-12);
    }

    #[test]
    fn rho_without_signal_is_plain_mean() {
        let assessment = build(&[scale("lesson_integration", Dimension::Rho, 5.5)]);
        let scores = aggregate(&assessment, &AggregatorConfig::default());
        assert!((scores.rho - 0.5).abs() < 1e-12);
    }

    #[test]
    fn q_bold_action_bonus_is_capped() {
        let config = AggregatorConfig::default();
        let assessment = build(&[
            scale("discomfort_tolerance", Dimension::Q, 5.5),
            signal("bold_action_count", Dimension::Q, 20.0),
        ]);
        let scores = aggregate(&assessment, &config);
        // 0.5 + min(20 * 0.05, 0.25)
        assert!((scores.q - 0.75).abs() < 1e-12);
    }

    #[test]
    fn q_procrastination_penalty_can_push_to_the_floor() {
        let config = AggregatorConfig::default();
        let assessment = build(&[
            scale("discomfort_tolerance", Dimension::Q, 1.9),
            signal("procrastination_rate", Dimension::Q, 1.0),
        ]);
        let scores = aggregate(&assessment, &config);
        // 0.1 - 0.3 clamps to 0
        assert_eq!(scores.q, 0.0);
    }

    #[test]
    fn q_is_clamped_to_unit_interval() {
        let config = AggregatorConfig::default();
        let assessment = build(&[
            scale("discomfort_tolerance", Dimension::Q, 10.0),
            signal("bold_action_count", Dimension::Q, 10.0),
        ]);
        let scores = aggregate(&assessment, &config);
        assert_eq!(scores.q, 1.0);
    }

    #[test]
    fn f_network_curve_saturates_with_diminishing_returns() {
        let config = AggregatorConfig::default();
        let small = build(&[signal("support_network_size", Dimension::F, 3.0)]);
        let large = build(&[signal("support_network_size", Dimension::F, 30.0)]);
        let small_f = aggregate(&small, &config).f;
        let large_f = aggregate(&large, &config).f;
        // quality absent -> 0.3 * quantity
        assert!((small_f - 0.3 * (1.0 - (-1.0f64).exp())).abs() < 1e-12);
        assert!(large_f > small_f);
        assert!(large_f < 0.3 + 1e-9);
    }

    #[test]
    fn f_blends_quality_over_quantity() {
        let config = AggregatorConfig::default();
        let assessment = build(&[
            scale("relationship_depth", Dimension::F, 10.0),
            signal("support_network_size", Dimension::F, 3.0),
        ]);
        let scores = aggregate(&assessment, &config);
        let expected = 0.7 * 1.0 + 0.3 * (1.0 - (-1.0f64).exp());
        assert!((scores.f - expected).abs() < 1e-12);
    }

    #[test]
    fn f_quality_only_scores_without_network_quantity() {
        let assessment = build(&[scale("relationship_depth", Dimension::F, 10.0)]);
        let scores = aggregate(&assessment, &AggregatorConfig::default());
        assert!((scores.f - 0.7).abs() < 1e-12);
    }

    #[test]
    fn signals_are_excluded_from_dimension_means() {
        let config = AggregatorConfig::default();
        // The procrastination signal sits in Q but must not join the mean.
        let assessment = build(&[
            scale("discomfort_tolerance", Dimension::Q, 10.0),
            signal("procrastination_rate", Dimension::Q, 0.0),
        ]);
        let scores = aggregate(&assessment, &config);
        assert_eq!(scores.q, 1.0);
    }
}
