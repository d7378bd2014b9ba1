//! Writing quality heuristics
//!
//! Three 0-100 scores built from a base value plus additive bonuses and
//! penalties. They describe process quality, not the text itself.

use crate::process::types::{AnalyzedSession, QualityScores};

/// Sessions adding more than this many words count as substantive
const SUBSTANTIVE_WORDS: u32 = 50;

/// Deletion ratios in this range count as moderate revision
const MODERATE_REVISION: std::ops::RangeInclusive<f64> = 0.2..=0.8;

pub fn quality_scores(sessions: &[AnalyzedSession]) -> QualityScores {
    if sessions.is_empty() {
        return QualityScores::default();
    }
    QualityScores {
        coherence_score: coherence_score(sessions),
        development_score: development_score(sessions),
        revision_quality: revision_quality(sessions),
    }
}

fn share(sessions: &[AnalyzedSession], predicate: impl Fn(&AnalyzedSession) -> bool) -> f64 {
    sessions.iter().filter(|s| predicate(*s)).count() as f64 / sessions.len() as f64
}

fn net_words(session: &AnalyzedSession) -> i64 {
    i64::from(session.words_added) - i64::from(session.words_deleted)
}

/// Share of consecutive sessions whose net word count holds or grows over
/// the previous one. A single session counts as growth when it nets words.
fn net_growth(sessions: &[AnalyzedSession]) -> f64 {
    if sessions.len() < 2 {
        return share(sessions, |s| net_words(s) > 0);
    }
    let steps = sessions.len() - 1;
    let growing = sessions
        .windows(2)
        .filter(|pair| net_words(&pair[1]) >= net_words(&pair[0]))
        .count();
    growing as f64 / steps as f64
}

/// Rewards session-over-session net growth, penalizes cursor-thrashing sessions
fn coherence_score(sessions: &[AnalyzedSession]) -> f64 {
    let growth = net_growth(sessions);
    let thrashing = sessions
        .iter()
        .filter(|s| s.indicators.cursor_thrashing)
        .count() as f64;

    (65.0 + 25.0 * growth - 5.0 * thrashing).clamp(0.0, 100.0).round()
}

/// Rewards total volume and a steady run of substantive sessions
fn development_score(sessions: &[AnalyzedSession]) -> f64 {
    let total_words: u64 = sessions.iter().map(|s| u64::from(s.words_added)).sum();
    let volume_bonus: f64 = if total_words >= 1500 {
        20.0
    } else if total_words >= 750 {
        12.0
    } else if total_words >= 300 {
        6.0
    } else {
        0.0
    };

    let substantive = share(sessions, |s| s.words_added > SUBSTANTIVE_WORDS);
    let consistency: f64 = if substantive >= 0.7 {
        15.0
    } else if substantive >= 0.4 {
        5.0
    } else {
        -10.0
    };

    (60.0 + volume_bonus + consistency).clamp(0.0, 100.0).round()
}

/// Rewards moderate revision spread across some, but not all, sessions
fn revision_quality(sessions: &[AnalyzedSession]) -> f64 {
    let moderate = share(sessions, |s| {
        s.indicators.sufficient_data && MODERATE_REVISION.contains(&s.indicators.deletion_ratio)
    });

    let adjustment: f64 = if (0.3..=0.7).contains(&moderate) {
        20.0
    } else if moderate > 0.7 {
        5.0
    } else {
        -10.0
    };

    (65.0 + adjustment).clamp(0.0, 100.0).round()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load::LoadEstimate;
    use crate::telemetry::BehavioralIndicators;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn session(added: u32, deleted: u32, deletion_ratio: f64, thrashing: bool) -> AnalyzedSession {
        let mut indicators = BehavioralIndicators::insufficient();
        indicators.sufficient_data = true;
        indicators.deletion_ratio = deletion_ratio;
        indicators.cursor_thrashing = thrashing;
        AnalyzedSession {
            session_id: "s".to_string(),
            started_at: Utc.with_ymd_and_hms(2024, 3, 4, 9, 0, 0).unwrap(),
            duration_minutes: 20.0,
            words_added: added,
            words_deleted: deleted,
            indicators,
            estimate: LoadEstimate::insufficient_data(),
        }
    }

    #[test]
    fn test_empty_sessions_score_zero() {
        assert_eq!(quality_scores(&[]), QualityScores::default());
    }

    #[test]
    fn test_coherence() {
        let growing = [session(200, 20, 0.1, false), session(300, 10, 0.05, false)];
        assert_eq!(coherence_score(&growing), 90.0);

        let mixed = [session(200, 20, 0.1, true), session(10, 40, 0.9, true)];
        assert_eq!(coherence_score(&mixed), 55.0);

        let single = [session(10, 40, 0.9, false)];
        assert_eq!(coherence_score(&single), 65.0);
    }

    #[test]
    fn test_coherence_compares_consecutive_sessions() {
        // every session nets words, but the second nets far fewer
        let slowing = [
            session(500, 0, 0.0, false),
            session(60, 0, 0.0, false),
            session(300, 0, 0.0, false),
        ];
        assert_eq!(coherence_score(&slowing), 78.0);
    }

    #[test]
    fn test_huge_word_counts_do_not_overflow() {
        let sessions = [
            session(u32::MAX, 0, 0.0, false),
            session(u32::MAX, u32::MAX, 1.0, false),
        ];
        let scores = quality_scores(&sessions);
        assert_eq!(scores.development_score, 95.0);
        assert_eq!(scores.coherence_score, 65.0);
    }

    #[test]
    fn test_development() {
        let rich = [
            session(600, 0, 0.0, false),
            session(700, 0, 0.0, false),
            session(300, 0, 0.0, false),
        ];
        assert_eq!(development_score(&rich), 95.0);

        let thin = [session(20, 0, 0.0, false), session(30, 0, 0.0, false)];
        assert_eq!(development_score(&thin), 50.0);
    }

    #[test]
    fn test_revision_quality() {
        let balanced = [
            session(100, 40, 0.4, false),
            session(100, 5, 0.05, false),
            session(100, 50, 0.5, false),
            session(100, 0, 0.0, false),
        ];
        assert_eq!(revision_quality(&balanced), 85.0);

        let constant = [session(100, 40, 0.4, false), session(100, 50, 0.5, false)];
        assert_eq!(revision_quality(&constant), 70.0);

        let none = [session(100, 0, 0.0, false)];
        assert_eq!(revision_quality(&none), 55.0);
    }
}
