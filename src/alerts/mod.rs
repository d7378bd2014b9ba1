//! Educator alerts module
//!
//! Converts assessments and process insights into prioritized alert
//! candidates for the supervising educator.

pub mod composer;
pub mod types;

pub use composer::{compose_queue, deadline_priority, AlertComposer};
pub use types::{
    AlertCategory, AlertPriority, AlertSubject, AlertTrigger, AlertType, EducatorAlert,
};
