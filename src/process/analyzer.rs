//! Process analyzer
//!
//! Aggregates the sessions of one assignment into `WritingProcessInsights`.

use crate::load::WriterProfileSnapshot;
use crate::process::patterns::{classify_patterns, tag_session};
use crate::process::quality::quality_scores;
use crate::process::rules;
use crate::process::stages::{classify_stage, time_distribution};
use crate::process::struggle::{detect_struggle_points, productive_periods};
use crate::process::types::{AnalyzedSession, SessionStage, WritingProcessInsights};
use crate::telemetry::TelemetryRecord;

/// Multi-session process analysis
pub struct ProcessAnalyzer;

impl ProcessAnalyzer {
    /// Analyze sessions in the order given. Zero sessions yields
    /// `WritingProcessInsights::empty()`.
    pub fn analyze(sessions: &[AnalyzedSession]) -> WritingProcessInsights {
        if sessions.is_empty() {
            log::debug!("no sessions to analyze, returning default insights");
            return WritingProcessInsights::empty();
        }

        let tags: Vec<_> = sessions.iter().map(tag_session).collect();
        let stages: Vec<_> = sessions
            .iter()
            .enumerate()
            .map(|(i, s)| classify_stage(s, i, sessions.len()))
            .collect();

        let (dominant, secondary) = classify_patterns(sessions, &tags);
        let distribution = time_distribution(sessions, &stages);
        let quality = quality_scores(sessions);
        let struggle_points = detect_struggle_points(sessions, &tags);

        let session_stages = sessions
            .iter()
            .zip(stages.iter().zip(&tags))
            .map(|(session, (stage, tag))| SessionStage {
                session_id: session.session_id.clone(),
                stage: *stage,
                tag: *tag,
            })
            .collect();

        log::debug!(
            "analyzed {} sessions: dominant={:?} ({:.2}), struggles={}",
            sessions.len(),
            dominant.pattern,
            dominant.confidence,
            struggle_points.len()
        );

        WritingProcessInsights {
            session_count: sessions.len(),
            strengths: rules::strengths(dominant.pattern, &quality),
            improvement_areas: rules::improvement_areas(
                dominant.pattern,
                &distribution,
                &struggle_points,
            ),
            recommendations: rules::recommendations(
                dominant.pattern,
                &distribution,
                &struggle_points,
            ),
            dominant_pattern: dominant,
            secondary_patterns: secondary,
            session_stages,
            time_distribution: distribution,
            quality,
            productive_periods: productive_periods(sessions),
            struggle_points,
        }
    }

    /// Extract, classify and analyze raw telemetry records. Records are put
    /// in start-time order first; equal start times keep their input order.
    pub fn analyze_records(
        records: &[TelemetryRecord],
        profile: Option<&WriterProfileSnapshot>,
    ) -> WritingProcessInsights {
        let profile = WriterProfileSnapshot::usable(profile);
        let mut sessions: Vec<_> = records
            .iter()
            .map(|r| AnalyzedSession::from_record(r, profile))
            .collect();
        sessions.sort_by_key(|s| s.started_at);
        Self::analyze(&sessions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::types::{
        SessionTag, StruggleType, WritingPatternType, WritingStage, NO_DATA_IMPROVEMENT_AREA,
    };
    use crate::telemetry::EditOperation;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn record(id: &str, start: DateTime<Utc>, minutes: i64, words_added: u32, words_deleted: u32) -> TelemetryRecord {
        let mut r = TelemetryRecord::new(id, start);
        r.words_added = words_added;
        r.words_deleted = words_deleted;
        r.chars_added = words_added * 5;
        r.chars_deleted = words_deleted * 5;
        r.duration_ms = (minutes * 60_000) as u64;
        r.event_timestamps = (0..=minutes)
            .map(|m| start + Duration::minutes(m))
            .collect();
        r.edits = vec![EditOperation::add(0, r.chars_added)];
        r
    }

    #[test]
    fn test_zero_sessions() {
        let insights = ProcessAnalyzer::analyze(&[]);
        assert_eq!(insights.dominant_pattern.pattern, WritingPatternType::Exploratory);
        assert_eq!(insights.dominant_pattern.confidence, 0.0);
        assert_eq!(insights.improvement_areas, vec![NO_DATA_IMPROVEMENT_AREA.to_string()]);
        assert_eq!(ProcessAnalyzer::analyze_records(&[], None), insights);
    }

    #[test]
    fn test_full_assignment() {
        let day = Utc.with_ymd_and_hms(2024, 3, 4, 9, 0, 0).unwrap();
        let records = vec![
            record("plan", day, 20, 60, 0),
            record("draft-1", day + Duration::hours(5), 30, 500, 20),
            record("draft-2", day + Duration::days(1), 30, 450, 30),
            record("revise", day + Duration::days(2), 25, 120, 100),
            record("polish", day + Duration::days(3), 10, 20, 5),
        ];
        let insights = ProcessAnalyzer::analyze_records(&records, None);

        assert_eq!(insights.session_count, 5);
        let stages: Vec<_> = insights.session_stages.iter().map(|s| s.stage).collect();
        assert_eq!(
            stages,
            vec![
                WritingStage::Planning,
                WritingStage::Drafting,
                WritingStage::Drafting,
                WritingStage::Revising,
                WritingStage::Polishing,
            ]
        );
        assert_eq!(insights.session_stages[1].tag, SessionTag::Productive);

        let dist = &insights.time_distribution;
        let total = dist.planning + dist.drafting + dist.revising + dist.editing + dist.polishing;
        assert!((total - 100.0).abs() <= 2.0);

        assert!(!insights.strengths.is_empty());
        assert!(!insights.improvement_areas.is_empty());
        assert!(!insights.recommendations.for_writer.is_empty());
        assert!(!insights.recommendations.for_educator.is_empty());
        assert!(!insights.productive_periods.is_empty());
        assert!(insights.dominant_pattern.confidence <= 0.95);
    }

    #[test]
    fn test_records_are_ordered_by_start() {
        let day = Utc.with_ymd_and_hms(2024, 3, 4, 9, 0, 0).unwrap();
        let records = vec![
            record("later", day + Duration::days(1), 30, 500, 20),
            record("first", day, 20, 40, 0),
        ];
        let insights = ProcessAnalyzer::analyze_records(&records, None);
        assert_eq!(insights.session_stages[0].session_id, "first");
        assert_eq!(insights.session_stages[0].stage, WritingStage::Planning);
    }

    #[test]
    fn test_idle_sessions_become_struggles() {
        let day = Utc.with_ymd_and_hms(2024, 3, 4, 14, 0, 0).unwrap();
        let records = vec![
            TelemetryRecord::new("idle-1", day),
            TelemetryRecord::new("idle-2", day + Duration::days(1)),
            record("recovered", day + Duration::days(2), 30, 500, 10),
        ];
        let insights = ProcessAnalyzer::analyze_records(&records, None);

        assert_eq!(insights.struggle_points.len(), 2);
        assert!(insights
            .struggle_points
            .iter()
            .all(|p| p.struggle_type == StruggleType::Stagnation));
        assert!(!insights.struggle_points[0].resolved);
        assert!(insights.struggle_points[1].resolved);
        assert_eq!(insights.unresolved_struggles().count(), 1);
    }
}
