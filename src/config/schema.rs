use crate::error::ConfigError;
use crate::scoring::validator::Severity;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

// ── Top-level config ──────────────────────────────────────────────

/// Every tunable of the scoring engine: normalization tables, dimension
/// coefficients, combiner constants, trend window, classifier thresholds
/// and validator rules.
///
/// `Default` yields the canonical production values; a practice-level
/// TOML tuning file can override any subset (every section and field has
/// a serde default).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    #[serde(default)]
    pub normalizer: NormalizerConfig,

    #[serde(default)]
    pub aggregator: AggregatorConfig,

    #[serde(default)]
    pub combiner: CombinerConfig,

    #[serde(default)]
    pub trend: TrendConfig,

    #[serde(default)]
    pub classifier: ClassifierThresholds,

    #[serde(default)]
    pub validator: ValidatorConfig,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            normalizer: NormalizerConfig::default(),
            aggregator: AggregatorConfig::default(),
            combiner: CombinerConfig::default(),
            trend: TrendConfig::default(),
            classifier: ClassifierThresholds::default(),
            validator: ValidatorConfig::default(),
        }
    }
}

impl ScoringConfig {
    /// Load a TOML tuning file and validate it.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read tuning file {}", path.display()))?;
        let config: Self = toml::from_str(&raw)
            .with_context(|| format!("failed to parse tuning file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML string (tests, embedded tuning profiles).
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the scoring math cannot make sense of.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.combiner.max_coherence <= 0.0 {
            return Err(ConfigError::Validation(
                "combiner.max_coherence must be positive".into(),
            ));
        }
        if self.combiner.km <= 0.0 || self.combiner.ki <= 0.0 {
            return Err(ConfigError::Validation(
                "combiner.km and combiner.ki must be positive".into(),
            ));
        }
        if self.trend.window_days < 1 {
            return Err(ConfigError::Validation(
                "trend.window_days must be at least 1".into(),
            ));
        }
        if self.aggregator.network_saturation <= 0.0 {
            return Err(ConfigError::Validation(
                "aggregator.network_saturation must be positive".into(),
            ));
        }
        if self.classifier.critical_score > self.classifier.warning_score {
            return Err(ConfigError::Validation(
                "classifier.critical_score must not exceed warning_score".into(),
            ));
        }
        Ok(())
    }
}

// ── Normalizer tables ─────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizerConfig {
    /// Question ids whose 1–10 scale is reverse-keyed (`11 - v` first).
    #[serde(default)]
    pub reverse_scored: Vec<String>,

    /// Score for unrecognized categorical labels.
    #[serde(default = "default_neutral_score")]
    pub neutral_score: f64,

    /// Frequency label scores. Unknown labels fall back to
    /// `neutral_score` — silent leniency, not an error.
    #[serde(default = "default_frequency_scores")]
    pub frequency_scores: BTreeMap<String, f64>,

    /// Per-question choice maps, keyed by question id then option key.
    /// This is the one canonical multiple-choice contract; numeric
    /// multiple-choice values are treated as already pre-scored.
    #[serde(default = "default_choice_maps")]
    pub choice_maps: BTreeMap<String, BTreeMap<String, f64>>,

    /// Generic option table used when a question has no dedicated map.
    #[serde(default = "default_fallback_choice_scores")]
    pub fallback_choice_scores: BTreeMap<String, f64>,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            reverse_scored: Vec::new(),
            neutral_score: default_neutral_score(),
            frequency_scores: default_frequency_scores(),
            choice_maps: default_choice_maps(),
            fallback_choice_scores: default_fallback_choice_scores(),
        }
    }
}

fn default_frequency_scores() -> BTreeMap<String, f64> {
    BTreeMap::from([
        ("Always".into(), 1.0),
        ("Usually".into(), 0.75),
        ("Sometimes".into(), 0.5),
        ("Rarely".into(), 0.25),
        ("Never".into(), 0.0),
    ])
}

fn default_choice_maps() -> BTreeMap<String, BTreeMap<String, f64>> {
    BTreeMap::from([(
        "pattern_recognition_speed".into(),
        BTreeMap::from([
            ("immediately".into(), 1.0),
            ("within_days".into(), 0.8),
            ("within_weeks".into(), 0.6),
            ("after_months".into(), 0.3),
            ("dont_notice".into(), 0.0),
        ]),
    )])
}

fn default_fallback_choice_scores() -> BTreeMap<String, f64> {
    BTreeMap::from([
        ("option_1".into(), 1.0),
        ("option_2".into(), 0.75),
        ("option_3".into(), 0.5),
        ("option_4".into(), 0.25),
        ("option_5".into(), 0.0),
    ])
}

fn default_neutral_score() -> f64 {
    0.5
}

// ── Dimension aggregation ─────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregatorConfig {
    /// Score used when a dimension has no responses at all.
    #[serde(default = "default_neutral_score")]
    pub neutral_score: f64,

    /// Question id of the learning-speed signal feeding the RHO bonus.
    #[serde(default = "default_learning_speed_id")]
    pub learning_speed_id: String,

    /// RHO bonus gain: `base * (1 + (speed - 0.5) * gain)`, unclamped.
    #[serde(default = "default_learning_speed_gain")]
    pub learning_speed_gain: f64,

    /// Question id of the bold-action count feeding the Q bonus.
    #[serde(default = "default_bold_action_id")]
    pub bold_action_id: String,

    /// Q bonus per bold action, and its cap.
    #[serde(default = "default_bold_action_step")]
    pub bold_action_step: f64,
    #[serde(default = "default_bold_action_cap")]
    pub bold_action_cap: f64,

    /// Question id of the procrastination rate feeding the Q penalty.
    #[serde(default = "default_procrastination_id")]
    pub procrastination_id: String,

    /// Q penalty factor applied to the procrastination rate.
    #[serde(default = "default_procrastination_penalty")]
    pub procrastination_penalty: f64,

    /// Question id of the support-network size feeding F quantity.
    #[serde(default = "default_network_id")]
    pub network_id: String,

    /// Saturation constant of the F quantity curve `1 - e^(-n/sat)`.
    #[serde(default = "default_network_saturation")]
    pub network_saturation: f64,

    /// F blend: quality weighted higher than quantity — relationship
    /// depth matters more than breadth.
    #[serde(default = "default_f_quality_weight")]
    pub f_quality_weight: f64,
    #[serde(default = "default_f_quantity_weight")]
    pub f_quantity_weight: f64,

    /// Static per-question weights for PSI. A response's own `weight`
    /// field wins over this table; anything else weighs 1.0.
    #[serde(default = "default_psi_weights")]
    pub psi_weights: BTreeMap<String, f64>,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            neutral_score: default_neutral_score(),
            learning_speed_id: default_learning_speed_id(),
            learning_speed_gain: default_learning_speed_gain(),
            bold_action_id: default_bold_action_id(),
            bold_action_step: default_bold_action_step(),
            bold_action_cap: default_bold_action_cap(),
            procrastination_id: default_procrastination_id(),
            procrastination_penalty: default_procrastination_penalty(),
            network_id: default_network_id(),
            network_saturation: default_network_saturation(),
            f_quality_weight: default_f_quality_weight(),
            f_quantity_weight: default_f_quantity_weight(),
            psi_weights: default_psi_weights(),
        }
    }
}

fn default_psi_weights() -> BTreeMap<String, f64> {
    BTreeMap::from([
        ("values_action_alignment".into(), 1.5),
        ("commitment_keeping".into(), 1.3),
        ("self_image_accuracy".into(), 1.0),
        ("value_clarity".into(), 0.8),
    ])
}

fn default_learning_speed_id() -> String {
    "learning_speed_average".into()
}

fn default_learning_speed_gain() -> f64 {
    0.2
}

fn default_bold_action_id() -> String {
    "bold_action_count".into()
}

fn default_bold_action_step() -> f64 {
    0.05
}

fn default_bold_action_cap() -> f64 {
    0.25
}

fn default_procrastination_id() -> String {
    "procrastination_rate".into()
}

fn default_procrastination_penalty() -> f64 {
    0.3
}

fn default_network_id() -> String {
    "support_network_size".into()
}

fn default_network_saturation() -> f64 {
    3.0
}

fn default_f_quality_weight() -> f64 {
    0.7
}

fn default_f_quantity_weight() -> f64 {
    0.3
}

// ── Coherence combiner ────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombinerConfig {
    /// `q_optimal` saturation constants: `q_max·q / (km + q + q²/ki)`.
    #[serde(default = "default_q_max")]
    pub q_max: f64,
    #[serde(default = "default_km")]
    pub km: f64,
    #[serde(default = "default_ki")]
    pub ki: f64,

    /// Percentage denominator. Declared theoretical maximum is 4.0
    /// (Ψ=ρ=q=f=1), but `q_optimal(1) = 0.5`, so the attainable
    /// ceiling of `overall` is ~3.5 and 100% is out of reach under
    /// realistic inputs. Recalibrating reinterprets every stored
    /// historical score, so the declared value stays until the product
    /// decides otherwise.
    #[serde(default = "default_max_coherence")]
    pub max_coherence: f64,
}

impl Default for CombinerConfig {
    fn default() -> Self {
        Self {
            q_max: default_q_max(),
            km: default_km(),
            ki: default_ki(),
            max_coherence: default_max_coherence(),
        }
    }
}

fn default_q_max() -> f64 {
    1.0
}

fn default_km() -> f64 {
    0.5
}

fn default_ki() -> f64 {
    2.0
}

fn default_max_coherence() -> f64 {
    4.0
}

// ── Trend estimation ──────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendConfig {
    /// Regression window: points no older than this many days before
    /// `now` qualify for the least-squares path.
    #[serde(default = "default_window_days")]
    pub window_days: i64,
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            window_days: default_window_days(),
        }
    }
}

fn default_window_days() -> i64 {
    7
}

// ── Status classification ─────────────────────────────────────────

/// Cut points of the canonical triage classifier. Derivative thresholds
/// are weekly rates (daily thresholds −0.005/0.005/0.001 scaled by 7).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ClassifierThresholds {
    #[serde(default = "default_critical_score")]
    pub critical_score: f64,
    #[serde(default = "default_critical_slope")]
    pub critical_slope: f64,
    #[serde(default = "default_warning_score")]
    pub warning_score: f64,
    #[serde(default = "default_warning_slope")]
    pub warning_slope: f64,
    #[serde(default = "default_breakthrough_score")]
    pub breakthrough_score: f64,
    #[serde(default = "default_breakthrough_slope")]
    pub breakthrough_slope: f64,
    #[serde(default = "default_thriving_score")]
    pub thriving_score: f64,
    #[serde(default = "default_thriving_slope")]
    pub thriving_slope: f64,
}

impl Default for ClassifierThresholds {
    fn default() -> Self {
        Self {
            critical_score: default_critical_score(),
            critical_slope: default_critical_slope(),
            warning_score: default_warning_score(),
            warning_slope: default_warning_slope(),
            breakthrough_score: default_breakthrough_score(),
            breakthrough_slope: default_breakthrough_slope(),
            thriving_score: default_thriving_score(),
            thriving_slope: default_thriving_slope(),
        }
    }
}

fn default_critical_score() -> f64 {
    40.0
}

fn default_critical_slope() -> f64 {
    -0.035
}

fn default_warning_score() -> f64 {
    60.0
}

fn default_warning_slope() -> f64 {
    -0.01
}

fn default_breakthrough_score() -> f64 {
    85.0
}

fn default_breakthrough_slope() -> f64 {
    0.035
}

fn default_thriving_score() -> f64 {
    70.0
}

fn default_thriving_slope() -> f64 {
    0.007
}

// ── Consistency validation ────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidatorConfig {
    /// Pairwise contradiction rules, checked in order.
    #[serde(default = "default_rules")]
    pub rules: Vec<ConsistencyRule>,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            rules: default_rules(),
        }
    }
}

/// One contradiction rule: fires when every condition holds against the
/// assessment's signal view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsistencyRule {
    pub kind: String,
    pub severity: Severity,
    pub message: String,
    pub conditions: Vec<SignalCondition>,
}

/// Threshold test on one named signal. A condition on an absent signal
/// never holds, so rules degrade silently on sparse data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalCondition {
    pub signal: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub above: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub below: Option<f64>,
}

fn default_rules() -> Vec<ConsistencyRule> {
    vec![
        ConsistencyRule {
            kind: "commitment_sabotage".into(),
            severity: Severity::Warning,
            message: "Reports consistently kept commitments alongside frequent self-sabotage"
                .into(),
            conditions: vec![
                SignalCondition {
                    signal: "commitment_keeping".into(),
                    above: Some(0.8),
                    below: None,
                },
                SignalCondition {
                    signal: "self_sabotage_frequency".into(),
                    above: Some(0.6),
                    below: None,
                },
            ],
        },
        ConsistencyRule {
            kind: "courage_avoidance".into(),
            severity: Severity::Warning,
            message: "Reports acting boldly despite fear while procrastinating most of the time"
                .into(),
            conditions: vec![
                SignalCondition {
                    signal: "acts_despite_fear".into(),
                    above: Some(0.8),
                    below: None,
                },
                SignalCondition {
                    signal: "procrastination_rate".into(),
                    above: Some(0.7),
                    below: None,
                },
            ],
        },
        ConsistencyRule {
            kind: "pattern_blindness".into(),
            severity: Severity::Info,
            message: "Reports rapid pattern recognition alongside frequently repeated mistakes"
                .into(),
            conditions: vec![
                SignalCondition {
                    signal: "pattern_recognition_speed".into(),
                    above: Some(0.8),
                    below: None,
                },
                SignalCondition {
                    signal: "repeated_mistakes".into(),
                    above: Some(0.6),
                    below: None,
                },
            ],
        },
    ]
}
