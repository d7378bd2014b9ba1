//! Intervention module
//!
//! Decides whether to surface a supportive nudge, which one, and how strict
//! to be about it given how earlier nudges were received.

pub mod content;
pub mod engine;
pub mod threshold;
pub mod types;

pub use engine::{DecisionEngine, DecisionRequest};
pub use threshold::dynamic_threshold;
pub use types::{
    ActionDirective, DeclineReason, Intervention, InterventionDecision, InterventionHistory,
    InterventionPriority, InterventionType,
};
