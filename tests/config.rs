use std::io::Write as _;

use tempfile::NamedTempFile;

use cohera::{CoherenceEngine, ScoringConfig, TriageStatus};

#[test]
fn tuning_file_loads_and_applies() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
        [combiner]
        max_coherence = 3.5

        [classifier]
        breakthrough_score = 80.0
        breakthrough_slope = 0.02

        [normalizer.frequency_scores]
        Always = 1.0
        Often = 0.8
        "#
    )
    .unwrap();

    let config = ScoringConfig::load(file.path()).unwrap();
    assert_eq!(config.combiner.max_coherence, 3.5);
    assert_eq!(config.normalizer.frequency_scores["Often"], 0.8);
    // Untouched sections keep their defaults.
    assert_eq!(config.trend.window_days, 7);
    assert_eq!(config.aggregator.procrastination_penalty, 0.3);

    let engine = CoherenceEngine::new(config);
    assert_eq!(engine.classify(82.0, 0.03), TriageStatus::Breakthrough);
}

#[test]
fn missing_tuning_file_reports_the_path() {
    let err = ScoringConfig::load(std::path::Path::new("/nonexistent/tuning.toml")).unwrap_err();
    assert!(err.to_string().contains("/nonexistent/tuning.toml"));
}

#[test]
fn malformed_toml_is_a_parse_error() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "[combiner\nmax_coherence = 3.5").unwrap();
    assert!(ScoringConfig::load(file.path()).is_err());
}

#[test]
fn invalid_tuning_fails_validation_on_load() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
        [trend]
        window_days = 0
        "#
    )
    .unwrap();
    let err = ScoringConfig::load(file.path()).unwrap_err();
    assert!(err.to_string().contains("window_days"));
}

#[test]
fn default_config_survives_a_toml_round_trip() {
    let rendered = toml::to_string(&ScoringConfig::default()).unwrap();
    let parsed = ScoringConfig::from_toml_str(&rendered).unwrap();

    assert_eq!(parsed.combiner.max_coherence, 4.0);
    assert_eq!(parsed.classifier.critical_score, 40.0);
    assert_eq!(
        parsed.normalizer.choice_maps["pattern_recognition_speed"]["within_weeks"],
        0.6
    );
    assert_eq!(parsed.aggregator.psi_weights["values_action_alignment"], 1.5);
    assert_eq!(parsed.validator.rules.len(), 3);
    assert_eq!(parsed.validator.rules[0].kind, "commitment_sabotage");
}

#[test]
fn alternate_classifier_thresholds_can_be_injected() {
    // The legacy threshold set from the surrounding system, expressed
    // as tuning data instead of a second classifier implementation.
    let config = ScoringConfig::from_toml_str(
        r#"
        [classifier]
        critical_score = 40.0
        critical_slope = -0.05
        warning_score = 60.0
        warning_slope = -0.01
        breakthrough_score = 90.0
        breakthrough_slope = 0.05
        thriving_score = 80.0
        thriving_slope = 0.02
        "#,
    )
    .unwrap();
    let engine = CoherenceEngine::new(config);

    assert_eq!(engine.classify(85.0, 0.03), TriageStatus::Thriving);
    assert_eq!(engine.classify(95.0, 0.06), TriageStatus::Breakthrough);
}
