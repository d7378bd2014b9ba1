//! Cognitive load module
//!
//! Maps behavioral indicators, optionally conditioned on a writer profile
//! snapshot, to one of four load levels.

pub mod classifier;
pub mod types;

pub use classifier::{level_for_score, LoadClassifier, LoadScore};
pub use types::{
    EmotionalState, IndependenceTrend, LoadEstimate, LoadLevel, ProductivityPattern,
    WriterProfileSnapshot, INSUFFICIENT_DATA_FACTOR,
};
