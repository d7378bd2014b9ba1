//! Stage segmentation
//!
//! Assigns each session to a writing stage from its word counts and position
//! in the session sequence, then measures how time was split across stages.

use crate::process::types::{AnalyzedSession, TimeDistribution, WritingStage};

/// Stage for the session at `index` of `total`. Rules are checked in order.
pub fn classify_stage(session: &AnalyzedSession, index: usize, total: usize) -> WritingStage {
    let added = session.words_added as f64;
    let deleted = session.words_deleted as f64;

    if index == 0 && session.words_added < 100 {
        WritingStage::Planning
    } else if deleted > added * 0.5 {
        WritingStage::Revising
    } else if session.words_added > 100 && deleted < added * 0.2 {
        WritingStage::Drafting
    } else if index + 2 >= total && session.words_added < 50 {
        WritingStage::Polishing
    } else {
        WritingStage::Editing
    }
}

/// Percentage of total minutes spent in each stage, rounded to whole percent
pub fn time_distribution(sessions: &[AnalyzedSession], stages: &[WritingStage]) -> TimeDistribution {
    let total: f64 = sessions.iter().map(|s| s.duration_minutes).sum();
    if total <= 0.0 {
        return TimeDistribution::default();
    }

    let share = |stage: WritingStage| -> f64 {
        let minutes: f64 = sessions
            .iter()
            .zip(stages)
            .filter(|(_, s)| **s == stage)
            .map(|(session, _)| session.duration_minutes)
            .sum();
        (minutes / total * 100.0).round()
    };

    TimeDistribution {
        planning: share(WritingStage::Planning),
        drafting: share(WritingStage::Drafting),
        revising: share(WritingStage::Revising),
        editing: share(WritingStage::Editing),
        polishing: share(WritingStage::Polishing),
    }
}
