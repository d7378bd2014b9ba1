//! Writing telemetry module
//!
//! Turns raw editor telemetry (edit operations, event timing, cursor movement)
//! into per-session behavioral indicators.

pub mod extractor;
pub mod input;
pub mod types;

pub use extractor::SignalExtractor;
pub use input::{parse_array, parse_ndjson, parse_record};
pub use types::{BehavioralIndicators, EditKind, EditOperation, TelemetryRecord};
