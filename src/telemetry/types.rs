//! Writing telemetry types
//!
//! Raw session telemetry as captured by the editor client, and the
//! behavioral indicators derived from it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of a discrete edit operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditKind {
    Add,
    Delete,
}

/// A single edit applied to the document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditOperation {
    /// Whether text was inserted or removed
    #[serde(rename = "type")]
    pub kind: EditKind,
    /// Number of characters affected
    pub length: u32,
    /// Character offset in the document
    pub position: i64,
}

impl EditOperation {
    pub fn add(position: i64, length: u32) -> Self {
        Self {
            kind: EditKind::Add,
            length,
            position,
        }
    }

    pub fn delete(position: i64, length: u32) -> Self {
        Self {
            kind: EditKind::Delete,
            length,
            position,
        }
    }
}

/// One writing session's raw activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryRecord {
    /// Session identifier
    pub session_id: String,
    /// When the session started
    pub started_at: DateTime<Utc>,
    /// Characters inserted during the session
    #[serde(default)]
    pub chars_added: u32,
    /// Characters removed during the session
    #[serde(default)]
    pub chars_deleted: u32,
    /// Words inserted during the session
    #[serde(default)]
    pub words_added: u32,
    /// Words removed during the session
    #[serde(default)]
    pub words_deleted: u32,
    /// Timestamps of every captured event
    #[serde(default)]
    pub event_timestamps: Vec<DateTime<Utc>>,
    /// Discrete edit operations in capture order
    #[serde(default)]
    pub edits: Vec<EditOperation>,
    /// Cursor positions in capture order, if the client reports them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor_positions: Option<Vec<i64>>,
    /// Total session duration in milliseconds
    #[serde(default)]
    pub duration_ms: u64,
}

impl TelemetryRecord {
    /// Create an empty record for a session
    pub fn new(session_id: impl Into<String>, started_at: DateTime<Utc>) -> Self {
        Self {
            session_id: session_id.into(),
            started_at,
            chars_added: 0,
            chars_deleted: 0,
            words_added: 0,
            words_deleted: 0,
            event_timestamps: Vec::new(),
            edits: Vec::new(),
            cursor_positions: None,
            duration_ms: 0,
        }
    }

    /// True when the record carries no activity at all
    pub fn is_empty(&self) -> bool {
        self.chars_added == 0
            && self.chars_deleted == 0
            && self.words_added == 0
            && self.words_deleted == 0
            && self.event_timestamps.is_empty()
            && self.edits.is_empty()
            && self
                .cursor_positions
                .as_ref()
                .map_or(true, |positions| positions.is_empty())
            && self.duration_ms == 0
    }

    /// Session duration in minutes
    pub fn duration_minutes(&self) -> f64 {
        self.duration_ms as f64 / 60_000.0
    }
}

/// Behavioral indicators derived from one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehavioralIndicators {
    /// Deleted chars / added chars, capped at 5
    pub deletion_ratio: f64,
    /// Gaps between consecutive events of at least 3 seconds, in seconds
    pub pause_patterns: Vec<f64>,
    /// Non-overlapping add → delete → add triples at nearby positions
    pub revision_cycles: u32,
    /// Cursor jumping back and forth across the document
    pub cursor_thrashing: bool,
    /// Words added per minute
    pub word_production_rate: f64,
    /// Session length in minutes
    pub time_on_task: f64,
    /// Sustained low output despite meaningful elapsed time
    pub progress_stagnation: bool,
    /// False only for the insufficient-data sentinel
    pub sufficient_data: bool,
}

impl BehavioralIndicators {
    /// Zeroed indicators for a session with no telemetry
    pub fn insufficient() -> Self {
        Self {
            deletion_ratio: 0.0,
            pause_patterns: Vec::new(),
            revision_cycles: 0,
            cursor_thrashing: false,
            word_production_rate: 0.0,
            time_on_task: 0.0,
            progress_stagnation: false,
            sufficient_data: false,
        }
    }

    /// Mean pause length in seconds, 0 when there were no pauses
    pub fn mean_pause_sec(&self) -> f64 {
        if self.pause_patterns.is_empty() {
            return 0.0;
        }
        self.pause_patterns.iter().sum::<f64>() / self.pause_patterns.len() as f64
    }
}
