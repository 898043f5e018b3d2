//! Trend estimation — weekly rate of change of the coherence
//! percentage.
//!
//! Dense recent history gets an ordinary least-squares fit over the
//! regression window; sparse history falls back to a two-point rate
//! against the oldest recorded score. `now` is an explicit parameter so
//! the computation stays reproducible — the engine never reads the
//! ambient clock.

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::assessment::HistoricalScorePoint;
use crate::config::TrendConfig;

const SECONDS_PER_DAY: f64 = 86_400.0;
const DAYS_PER_WEEK: f64 = 7.0;

/// Weekly derivative of the normalized (0–1) coherence score.
///
/// Returns exactly `0.0` when history holds fewer than two points, when
/// every regression x is identical (zero-variance guard) or when the
/// fallback span is empty — never NaN or infinity.
pub fn weekly_derivative(
    current_percentage: f64,
    history: &[HistoricalScorePoint],
    now: DateTime<Utc>,
    config: &TrendConfig,
) -> f64 {
    if history.len() < 2 {
        return 0.0;
    }

    // The caller's list is a value; sort our own copy.
    let mut points = history.to_vec();
    points.sort_by_key(|p| p.timestamp);

    let window_start = now - Duration::days(config.window_days);
    let recent: Vec<&HistoricalScorePoint> = points
        .iter()
        .filter(|p| p.timestamp >= window_start)
        .collect();

    let derivative = if recent.len() >= 2 {
        let origin = recent[0].timestamp;
        let xs: Vec<f64> = recent
            .iter()
            .map(|p| days_between(origin, p.timestamp))
            .collect();
        let ys: Vec<f64> = recent.iter().map(|p| p.score / 100.0).collect();
        ols_slope(&xs, &ys) * DAYS_PER_WEEK
    } else {
        // Sparse recent data: two-point rate against the oldest score.
        let oldest = points[0];
        let weeks = days_between(oldest.timestamp, now) / DAYS_PER_WEEK;
        if weeks <= 0.0 {
            0.0
        } else {
            (current_percentage - oldest.score) / weeks / 100.0
        }
    };

    debug!(
        points = history.len(),
        in_window = recent.len(),
        derivative,
        "estimated weekly derivative"
    );
    derivative
}

#[inline]
fn days_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_seconds() as f64 / SECONDS_PER_DAY
}

/// Ordinary least-squares slope. Zero-variance x (identical
/// timestamps) would divide by zero; guarded to 0.
fn ols_slope(xs: &[f64], ys: &[f64]) -> f64 {
    let n = xs.len() as f64;
    let sum_x: f64 = xs.iter().sum();
    let sum_y: f64 = ys.iter().sum();
    let sum_xy: f64 = xs.iter().zip(ys).map(|(x, y)| x * y).sum();
    let sum_x2: f64 = xs.iter().map(|x| x * x).sum();

    let denominator = n * sum_x2 - sum_x * sum_x;
    if denominator.abs() < f64::EPSILON {
        return 0.0;
    }
    (n * sum_xy - sum_x * sum_y) / denominator
}
