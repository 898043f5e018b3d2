pub mod schema;

pub use schema::{
    AggregatorConfig, ClassifierThresholds, CombinerConfig, ConsistencyRule, NormalizerConfig,
    ScoringConfig, SignalCondition, TrendConfig, ValidatorConfig,
};
