//! Coherence combination — the governing nonlinear formula.
//!
//! `Coherence = Ψ + ρ·Ψ + q_optimal(Q) + f·Ψ`. Wisdom and belonging
//! amplify internal consistency multiplicatively; moral activation
//! enters through a saturating transform that rewards balanced courage
//! rather than maximal impulsiveness.

use crate::assessment::{Components, CoherenceResult, DimensionPercents, DimensionScores};
use crate::config::CombinerConfig;

/// Saturating (Michaelis–Menten-style) transform of raw moral
/// activation: `q_max·q / (km + q + q²/ki)`.
///
/// With the default constants `q_optimal(1) = 0.5`, not 1.0 — the true
/// contribution ceiling is half the nominal cap used in the percentage
/// denominator (see [`CombinerConfig::max_coherence`]).
#[inline]
pub fn q_optimal(q: f64, config: &CombinerConfig) -> f64 {
    config.q_max * q / (config.km + q + q * q / config.ki)
}

/// Combine the four dimension scores into a [`CoherenceResult`].
///
/// Pure and idempotent: identical inputs produce bit-identical results.
/// `derivative` and `status` are left unset; the pipeline fills them
/// when history is available.
pub fn combine(scores: &DimensionScores, config: &CombinerConfig) -> CoherenceResult {
    let base_alignment = scores.psi;
    let wisdom_multiplier = scores.rho * scores.psi;
    let optimal_courage = q_optimal(scores.q, config);
    let relationship_multiplier = scores.f * scores.psi;

    let overall = base_alignment + wisdom_multiplier + optimal_courage + relationship_multiplier;
    let percentage = (overall / config.max_coherence * 100.0).round().clamp(0.0, 100.0) as u8;

    CoherenceResult {
        overall,
        percentage,
        dimensions: DimensionPercents {
            psi: percent(scores.psi),
            rho: percent(scores.rho),
            q: percent(scores.q),
            f: percent(scores.f),
        },
        components: Components {
            base_alignment,
            wisdom_multiplier,
            optimal_courage,
            relationship_multiplier,
        },
        derivative: None,
        status: None,
    }
}

/// Integer percent, rounded independently of the overall computation.
#[inline]
fn percent(score: f64) -> u32 {
    (score * 100.0).round().max(0.0) as u32
}
