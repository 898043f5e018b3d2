#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    clippy::return_self_not_must_use
)]

//! Cohera — deterministic coherence scoring engine for coaching
//! assessments.
//!
//! Converts raw assessment answers into a normalized multi-dimensional
//! coherence score, derives a weekly trend from historical scores, and
//! classifies the client into a five-way triage state. The engine is a
//! pure computation boundary: no I/O, no persistence, no clock — the
//! surrounding system supplies responses, history and `now`, and
//! receives a JSON-serializable [`CoherenceResult`].
//!
//! ```
//! use cohera::{AssessmentResponse, CoherenceEngine, Dimension, QuestionType};
//!
//! let engine = CoherenceEngine::default();
//! let responses = vec![AssessmentResponse {
//!     question_id: "values_action_alignment".into(),
//!     value: 8.0.into(),
//!     dimension: Dimension::Psi,
//!     question_type: QuestionType::Scale,
//!     weight: None,
//! }];
//! let result = engine.score(&responses);
//! assert!(result.percentage <= 100);
//! ```

pub mod assessment;
pub mod config;
pub mod error;
pub mod scoring;

pub use assessment::{
    AssessmentResponse, CoherenceResult, Dimension, DimensionScores, HistoricalScorePoint,
    NormalizedAssessment, QuestionType, ResponseValue, TriageStatus,
};
pub use config::ScoringConfig;
pub use error::{CoheraError, ConfigError};
pub use scoring::CoherenceEngine;
pub use scoring::validator::{Inconsistency, Severity};
