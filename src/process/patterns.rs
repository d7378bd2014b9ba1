//! Session tagging and writing-pattern voting

use crate::load::LoadLevel;
use crate::process::types::{
    AnalyzedSession, PatternClassification, SessionTag, WritingPatternType,
};

/// Cap on pattern confidence
const MAX_PATTERN_CONFIDENCE: f64 = 0.95;

/// Share of sessions a non-dominant pattern must appear in to be reported
const SECONDARY_PATTERN_SHARE: f64 = 0.3;

/// Tag a session by its dominant behavior. Rules are checked in order.
pub fn tag_session(session: &AnalyzedSession) -> SessionTag {
    let indicators = &session.indicators;

    if !session.has_activity() {
        SessionTag::Stagnant
    } else if indicators.word_production_rate < 5.0 && indicators.progress_stagnation {
        SessionTag::Stagnant
    } else if indicators.deletion_ratio > 0.7 {
        SessionTag::RevisionHeavy
    } else if session.estimate.level.is_elevated() {
        SessionTag::Struggling
    } else if session.words_added > 200 && indicators.deletion_ratio < 0.3 {
        SessionTag::Productive
    } else {
        SessionTag::Exploratory
    }
}

/// Weighted votes a single session casts for each pattern type
fn session_votes(session: &AnalyzedSession, tag: SessionTag) -> [f64; 6] {
    let mut votes = [0.0; 6];
    let mut vote = |pattern: WritingPatternType, weight: f64| votes[pattern.index()] += weight;
    let indicators = &session.indicators;

    match tag {
        SessionTag::Productive => {
            vote(WritingPatternType::Linear, 1.0);
            vote(WritingPatternType::Steady, 0.5);
        }
        SessionTag::RevisionHeavy => {
            vote(WritingPatternType::Recursive, 1.0);
            if indicators.deletion_ratio > 1.5 {
                vote(WritingPatternType::Perfectionist, 1.0);
            }
        }
        SessionTag::Struggling => {
            if indicators.revision_cycles > 2 {
                vote(WritingPatternType::Perfectionist, 0.5);
            } else {
                vote(WritingPatternType::Exploratory, 0.5);
            }
        }
        SessionTag::Stagnant => vote(WritingPatternType::Burst, 0.5),
        SessionTag::Exploratory => vote(WritingPatternType::Exploratory, 1.0),
    }

    // Timing
    let rate = indicators.word_production_rate;
    if rate > 30.0 && indicators.time_on_task < 20.0 {
        vote(WritingPatternType::Burst, 1.0);
    } else if (10.0..=30.0).contains(&rate) && indicators.time_on_task >= 20.0 {
        vote(WritingPatternType::Steady, 1.0);
    }

    if tag == SessionTag::Productive && session.estimate.level == LoadLevel::Low {
        vote(WritingPatternType::Linear, 0.5);
    }

    votes
}

fn evidence(pattern: WritingPatternType) -> &'static [&'static str] {
    match pattern {
        WritingPatternType::Linear => &[
            "Sustained forward progress across sessions",
            "Little deletion relative to new text",
        ],
        WritingPatternType::Recursive => &[
            "Frequent returns to earlier text",
            "Deletion ratio above 70% in multiple sessions",
        ],
        WritingPatternType::Perfectionist => &[
            "Heavy deletion of freshly written text",
            "Repeated revision of the same passages",
        ],
        WritingPatternType::Exploratory => &[
            "Output varies from session to session",
            "Ideas are tried out before committing to them",
        ],
        WritingPatternType::Burst => &[
            "Short sessions with high output",
            "Long quiet stretches between productive sessions",
        ],
        WritingPatternType::Steady => &[
            "Consistent production rate",
            "Regular, sustained writing sessions",
        ],
    }
}

fn classification(pattern: WritingPatternType, score: f64, sessions: usize) -> PatternClassification {
    PatternClassification {
        pattern,
        confidence: (score / sessions as f64).min(MAX_PATTERN_CONFIDENCE),
        evidence: evidence(pattern).iter().map(|e| e.to_string()).collect(),
    }
}

/// Dominant and secondary patterns for tagged sessions.
///
/// `sessions` and `tags` are parallel and non-empty.
pub fn classify_patterns(
    sessions: &[AnalyzedSession],
    tags: &[SessionTag],
) -> (PatternClassification, Vec<PatternClassification>) {
    let mut scores = [0.0; 6];
    let mut appearances = [0usize; 6];

    for (session, tag) in sessions.iter().zip(tags) {
        let votes = session_votes(session, *tag);
        for (i, weight) in votes.iter().enumerate() {
            scores[i] += weight;
            if *weight > 0.0 {
                appearances[i] += 1;
            }
        }
    }

    // Strictly greater keeps the earliest type on ties
    let mut dominant = WritingPatternType::Exploratory;
    let mut best = f64::MIN;
    for pattern in WritingPatternType::ALL {
        if scores[pattern.index()] > best {
            best = scores[pattern.index()];
            dominant = pattern;
        }
    }

    let count = sessions.len();
    let mut secondary: Vec<(f64, PatternClassification)> = WritingPatternType::ALL
        .into_iter()
        .filter(|p| *p != dominant)
        .filter(|p| appearances[p.index()] as f64 / count as f64 >= SECONDARY_PATTERN_SHARE)
        .map(|p| (scores[p.index()], classification(p, scores[p.index()], count)))
        .collect();
    secondary.sort_by(|a, b| b.0.total_cmp(&a.0));

    (
        classification(dominant, best, count),
        secondary.into_iter().map(|(_, c)| c).collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load::LoadEstimate;
    use crate::telemetry::BehavioralIndicators;
    use chrono::{TimeZone, Utc};

    fn session(words_added: u32, deletion_ratio: f64, rate: f64, minutes: f64, level: LoadLevel) -> AnalyzedSession {
        AnalyzedSession {
            session_id: "s".to_string(),
            started_at: Utc.with_ymd_and_hms(2024, 3, 4, 9, 0, 0).unwrap(),
            duration_minutes: minutes,
            words_added,
            words_deleted: (words_added as f64 * deletion_ratio) as u32,
            indicators: BehavioralIndicators {
                deletion_ratio,
                pause_patterns: vec![],
                revision_cycles: 0,
                cursor_thrashing: false,
                word_production_rate: rate,
                time_on_task: minutes,
                progress_stagnation: false,
                sufficient_data: true,
            },
            estimate: LoadEstimate {
                level,
                confidence: 0.7,
                factors: vec![],
                score: 50.0,
            },
        }
    }

    #[test]
    fn test_tag_rules_in_order() {
        let productive = session(300, 0.1, 15.0, 20.0, LoadLevel::Optimal);
        assert_eq!(tag_session(&productive), SessionTag::Productive);

        let revision = session(100, 0.9, 15.0, 20.0, LoadLevel::High);
        assert_eq!(tag_session(&revision), SessionTag::RevisionHeavy);

        let struggling = session(100, 0.5, 15.0, 20.0, LoadLevel::High);
        assert_eq!(tag_session(&struggling), SessionTag::Struggling);

        let exploratory = session(100, 0.5, 15.0, 20.0, LoadLevel::Optimal);
        assert_eq!(tag_session(&exploratory), SessionTag::Exploratory);

        let mut stagnant = session(10, 0.0, 1.0, 20.0, LoadLevel::High);
        stagnant.indicators.progress_stagnation = true;
        assert_eq!(tag_session(&stagnant), SessionTag::Stagnant);

        let idle = session(0, 0.0, 0.0, 20.0, LoadLevel::Optimal);
        assert_eq!(tag_session(&idle), SessionTag::Stagnant);
    }

    #[test]
    fn test_linear_writer() {
        let sessions: Vec<_> = (0..4)
            .map(|_| session(400, 0.1, 20.0, 25.0, LoadLevel::Optimal))
            .collect();
        let tags: Vec<_> = sessions.iter().map(tag_session).collect();
        let (dominant, secondary) = classify_patterns(&sessions, &tags);

        // linear 4.0 vs steady 4 * (0.5 + 1.0) = 6.0
        assert_eq!(dominant.pattern, WritingPatternType::Steady);
        assert!((dominant.confidence - 0.95).abs() < 1e-9);
        assert_eq!(secondary.len(), 1);
        assert_eq!(secondary[0].pattern, WritingPatternType::Linear);
        assert!(!dominant.evidence.is_empty());
    }

    #[test]
    fn test_recursive_writer() {
        let sessions = vec![
            session(150, 0.9, 8.0, 25.0, LoadLevel::Optimal),
            session(150, 0.8, 8.0, 25.0, LoadLevel::Optimal),
            session(150, 0.4, 8.0, 25.0, LoadLevel::Optimal),
        ];
        let tags: Vec<_> = sessions.iter().map(tag_session).collect();
        let (dominant, secondary) = classify_patterns(&sessions, &tags);

        assert_eq!(dominant.pattern, WritingPatternType::Recursive);
        assert!((dominant.confidence - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(secondary[0].pattern, WritingPatternType::Exploratory);
    }

    #[test]
    fn test_burst_writer() {
        let sessions = vec![
            session(500, 0.1, 50.0, 10.0, LoadLevel::Optimal),
            session(450, 0.1, 45.0, 10.0, LoadLevel::Optimal),
        ];
        let tags: Vec<_> = sessions.iter().map(tag_session).collect();
        let (dominant, _) = classify_patterns(&sessions, &tags);
        // linear 2.0 + burst 2.0: tie keeps linear; steady 1.0
        assert_eq!(dominant.pattern, WritingPatternType::Linear);

        let more = vec![
            sessions[0].clone(),
            session(100, 0.5, 40.0, 5.0, LoadLevel::Optimal),
        ];
        let tags: Vec<_> = more.iter().map(tag_session).collect();
        let (dominant, _) = classify_patterns(&more, &tags);
        assert_eq!(dominant.pattern, WritingPatternType::Burst);
    }
}
