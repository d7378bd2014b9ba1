//! Signal extraction
//!
//! Converts a raw telemetry record into normalized behavioral indicators.

use crate::telemetry::types::{BehavioralIndicators, EditKind, EditOperation, TelemetryRecord};

/// Deletion ratio ceiling
pub const MAX_DELETION_RATIO: f64 = 5.0;

/// Minimum gap between events to count as a pause (milliseconds)
pub const PAUSE_THRESHOLD_MS: i64 = 3_000;

/// Maximum distance between the first and last add of a revision cycle
pub const REVISION_POSITION_WINDOW: u64 = 50;

/// Number of trailing cursor positions inspected for thrashing
pub const CURSOR_WINDOW: usize = 10;

/// A cursor move longer than this counts as a jump
pub const CURSOR_JUMP_DISTANCE: u64 = 100;

/// Share of jumps among consecutive moves that marks thrashing
pub const CURSOR_THRASH_SHARE: f64 = 0.7;

/// Fewer cursor samples than this never count as thrashing
pub const MIN_CURSOR_SAMPLES: usize = 5;

/// Stagnation: words/min below this...
const STAGNATION_RATE: f64 = 2.0;
/// ...after this many minutes...
const STAGNATION_MIN_MINUTES: f64 = 5.0;
/// ...with fewer total words than this
const STAGNATION_MAX_WORDS: u32 = 50;

/// Extractor for writing-session indicators
pub struct SignalExtractor;

impl SignalExtractor {
    /// Derive indicators from a telemetry record.
    ///
    /// `prior_cursor` is cursor history from earlier in the writing session;
    /// the record's own positions are appended to it before the thrashing check.
    /// An empty record yields [`BehavioralIndicators::insufficient`].
    pub fn extract(record: &TelemetryRecord, prior_cursor: Option<&[i64]>) -> BehavioralIndicators {
        if record.is_empty() {
            log::trace!("session {} has no telemetry", record.session_id);
            return BehavioralIndicators::insufficient();
        }

        let time_on_task = record.duration_minutes();
        let deletion_ratio = compute_deletion_ratio(record.chars_added, record.chars_deleted);
        let pause_patterns = detect_pauses(record);
        let revision_cycles = count_revision_cycles(&record.edits);

        let mut cursor: Vec<i64> = prior_cursor.map(|p| p.to_vec()).unwrap_or_default();
        if let Some(positions) = &record.cursor_positions {
            cursor.extend_from_slice(positions);
        }
        let cursor_thrashing = detect_cursor_thrashing(&cursor);

        let word_production_rate = compute_word_production_rate(record.words_added, time_on_task);
        let progress_stagnation =
            detect_stagnation(word_production_rate, time_on_task, record.words_added);

        BehavioralIndicators {
            deletion_ratio,
            pause_patterns,
            revision_cycles,
            cursor_thrashing,
            word_production_rate,
            time_on_task,
            progress_stagnation,
            sufficient_data: true,
        }
    }
}

/// `min(deleted / max(1, added), 5)`
fn compute_deletion_ratio(chars_added: u32, chars_deleted: u32) -> f64 {
    let ratio = chars_deleted as f64 / chars_added.max(1) as f64;
    ratio.clamp(0.0, MAX_DELETION_RATIO)
}

/// Gaps of at least 3s between consecutive events, in seconds
fn detect_pauses(record: &TelemetryRecord) -> Vec<f64> {
    let mut timestamps = record.event_timestamps.clone();
    timestamps.sort();

    timestamps
        .windows(2)
        .filter_map(|pair| {
            let gap_ms = (pair[1] - pair[0]).num_milliseconds();
            (gap_ms >= PAUSE_THRESHOLD_MS).then(|| gap_ms as f64 / 1000.0)
        })
        .collect()
}

/// Count non-overlapping add → delete → add triples whose adds are close together
fn count_revision_cycles(edits: &[EditOperation]) -> u32 {
    let mut cycles = 0;
    let mut i = 0;

    while i + 2 < edits.len() {
        let (first, second, third) = (&edits[i], &edits[i + 1], &edits[i + 2]);
        let is_cycle = first.kind == EditKind::Add
            && second.kind == EditKind::Delete
            && third.kind == EditKind::Add
            && first.position.abs_diff(third.position) < REVISION_POSITION_WINDOW;

        if is_cycle {
            cycles += 1;
            i += 3;
        } else {
            i += 1;
        }
    }

    cycles
}

/// At least 70% of the moves among the last 10 positions are long jumps
fn detect_cursor_thrashing(positions: &[i64]) -> bool {
    if positions.len() < MIN_CURSOR_SAMPLES {
        return false;
    }

    let recent = &positions[positions.len().saturating_sub(CURSOR_WINDOW)..];
    let moves = recent.len() - 1;
    let jumps = recent
        .windows(2)
        .filter(|pair| pair[1].abs_diff(pair[0]) > CURSOR_JUMP_DISTANCE)
        .count();

    jumps as f64 / moves as f64 >= CURSOR_THRASH_SHARE
}

/// Words per minute, with the duration floored at one minute
fn compute_word_production_rate(words_added: u32, duration_minutes: f64) -> f64 {
    words_added as f64 / duration_minutes.max(1.0)
}

fn detect_stagnation(word_production_rate: f64, time_on_task: f64, words_added: u32) -> bool {
    word_production_rate < STAGNATION_RATE
        && time_on_task > STAGNATION_MIN_MINUTES
        && words_added < STAGNATION_MAX_WORDS
}
