//! Writing-process types
//!
//! Inputs and outputs of the multi-session process analysis for one assignment.

use crate::load::{LoadClassifier, LoadEstimate, WriterProfileSnapshot};
use crate::telemetry::{BehavioralIndicators, SignalExtractor, TelemetryRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Phase of the writing process a session belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WritingStage {
    Planning,
    #[default]
    Drafting,
    Revising,
    Editing,
    Polishing,
}

/// Per-session behavior tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionTag {
    Productive,
    Struggling,
    Stagnant,
    RevisionHeavy,
    Exploratory,
}

impl SessionTag {
    pub fn is_struggle(&self) -> bool {
        matches!(self, SessionTag::Struggling | SessionTag::Stagnant)
    }
}

/// Writing pattern across an assignment's sessions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WritingPatternType {
    Linear,
    Recursive,
    Perfectionist,
    Exploratory,
    Burst,
    Steady,
}

impl WritingPatternType {
    /// All pattern types in tie-break order
    pub const ALL: [WritingPatternType; 6] = [
        WritingPatternType::Linear,
        WritingPatternType::Recursive,
        WritingPatternType::Perfectionist,
        WritingPatternType::Exploratory,
        WritingPatternType::Burst,
        WritingPatternType::Steady,
    ];

    pub fn index(&self) -> usize {
        match self {
            WritingPatternType::Linear => 0,
            WritingPatternType::Recursive => 1,
            WritingPatternType::Perfectionist => 2,
            WritingPatternType::Exploratory => 3,
            WritingPatternType::Burst => 4,
            WritingPatternType::Steady => 5,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WritingPatternType::Linear => "linear",
            WritingPatternType::Recursive => "recursive",
            WritingPatternType::Perfectionist => "perfectionist",
            WritingPatternType::Exploratory => "exploratory",
            WritingPatternType::Burst => "burst",
            WritingPatternType::Steady => "steady",
        }
    }
}

/// A pattern with its confidence and supporting evidence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternClassification {
    pub pattern: WritingPatternType,
    /// 0-1
    pub confidence: f64,
    pub evidence: Vec<String>,
}

/// Stage and tag assigned to one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionStage {
    pub session_id: String,
    pub stage: WritingStage,
    pub tag: SessionTag,
}

/// Percentage of total minutes spent in each stage (rounded)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeDistribution {
    pub planning: f64,
    pub drafting: f64,
    pub revising: f64,
    pub editing: f64,
    pub polishing: f64,
}

impl TimeDistribution {
    pub fn get(&self, stage: WritingStage) -> f64 {
        match stage {
            WritingStage::Planning => self.planning,
            WritingStage::Drafting => self.drafting,
            WritingStage::Revising => self.revising,
            WritingStage::Editing => self.editing,
            WritingStage::Polishing => self.polishing,
        }
    }
}

/// 0-100 writing quality heuristics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QualityScores {
    pub coherence_score: f64,
    pub development_score: f64,
    pub revision_quality: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StruggleType {
    /// Session classified as high or overload
    HighLoad,
    /// Session with no meaningful progress
    Stagnation,
}

/// A session where the writer struggled
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrugglePoint {
    pub session_id: String,
    pub timestamp: DateTime<Utc>,
    pub struggle_type: StruggleType,
    pub duration_minutes: f64,
    /// The next session was productive
    pub resolved: bool,
}

/// Time-of-day bucket (UTC hour of session start)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl TimeOfDay {
    /// Morning 5-12, afternoon 12-17, evening 17-21, night otherwise
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            5..=11 => TimeOfDay::Morning,
            12..=16 => TimeOfDay::Afternoon,
            17..=20 => TimeOfDay::Evening,
            _ => TimeOfDay::Night,
        }
    }
}

/// Productivity within one time-of-day bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductivePeriod {
    pub time_of_day: TimeOfDay,
    pub sessions: u32,
    pub total_words: u64,
    pub total_minutes: f64,
    /// total words / total minutes
    pub words_per_minute: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recommendations {
    pub for_writer: Vec<String>,
    pub for_educator: Vec<String>,
}

/// Aggregate view of a writer's process on one assignment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WritingProcessInsights {
    pub session_count: usize,
    pub dominant_pattern: PatternClassification,
    pub secondary_patterns: Vec<PatternClassification>,
    pub session_stages: Vec<SessionStage>,
    pub time_distribution: TimeDistribution,
    pub quality: QualityScores,
    pub struggle_points: Vec<StrugglePoint>,
    pub productive_periods: Vec<ProductivePeriod>,
    pub strengths: Vec<String>,
    pub improvement_areas: Vec<String>,
    pub recommendations: Recommendations,
}

/// Improvement area reported when there is nothing to analyse
pub const NO_DATA_IMPROVEMENT_AREA: &str = "No data available for analysis";

impl WritingProcessInsights {
    /// Default insights for an assignment with no sessions
    pub fn empty() -> Self {
        Self {
            session_count: 0,
            dominant_pattern: PatternClassification {
                pattern: WritingPatternType::Exploratory,
                confidence: 0.0,
                evidence: Vec::new(),
            },
            secondary_patterns: Vec::new(),
            session_stages: Vec::new(),
            time_distribution: TimeDistribution::default(),
            quality: QualityScores::default(),
            struggle_points: Vec::new(),
            productive_periods: Vec::new(),
            strengths: Vec::new(),
            improvement_areas: vec![NO_DATA_IMPROVEMENT_AREA.to_string()],
            recommendations: Recommendations::default(),
        }
    }

    pub fn unresolved_struggles(&self) -> impl Iterator<Item = &StrugglePoint> {
        self.struggle_points.iter().filter(|p| !p.resolved)
    }
}

/// One session with everything the analyzer derives per session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzedSession {
    pub session_id: String,
    pub started_at: DateTime<Utc>,
    pub duration_minutes: f64,
    pub words_added: u32,
    pub words_deleted: u32,
    pub indicators: BehavioralIndicators,
    pub estimate: LoadEstimate,
}

impl AnalyzedSession {
    /// Run extraction and classification for a stored telemetry record
    pub fn from_record(record: &TelemetryRecord, profile: Option<&WriterProfileSnapshot>) -> Self {
        let indicators = SignalExtractor::extract(record, None);
        let estimate = LoadClassifier::classify(&indicators, profile);
        Self {
            session_id: record.session_id.clone(),
            started_at: record.started_at,
            duration_minutes: record.duration_minutes(),
            words_added: record.words_added,
            words_deleted: record.words_deleted,
            indicators,
            estimate,
        }
    }

    /// No recorded activity at all
    pub fn has_activity(&self) -> bool {
        self.indicators.sufficient_data && (self.words_added > 0 || self.words_deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_of_day_buckets() {
        assert_eq!(TimeOfDay::from_hour(4), TimeOfDay::Night);
        assert_eq!(TimeOfDay::from_hour(5), TimeOfDay::Morning);
        assert_eq!(TimeOfDay::from_hour(11), TimeOfDay::Morning);
        assert_eq!(TimeOfDay::from_hour(12), TimeOfDay::Afternoon);
        assert_eq!(TimeOfDay::from_hour(17), TimeOfDay::Evening);
        assert_eq!(TimeOfDay::from_hour(21), TimeOfDay::Night);
        assert_eq!(TimeOfDay::from_hour(0), TimeOfDay::Night);
    }

    #[test]
    fn test_pattern_index_matches_order() {
        for (i, pattern) in WritingPatternType::ALL.iter().enumerate() {
            assert_eq!(pattern.index(), i);
        }
    }

    #[test]
    fn test_empty_insights() {
        let insights = WritingProcessInsights::empty();
        assert_eq!(insights.dominant_pattern.pattern, WritingPatternType::Exploratory);
        assert_eq!(insights.dominant_pattern.confidence, 0.0);
        assert_eq!(insights.improvement_areas, vec![NO_DATA_IMPROVEMENT_AREA.to_string()]);
        assert_eq!(insights.unresolved_struggles().count(), 0);
    }

    #[test]
    fn test_stage_serialization() {
        assert_eq!(serde_json::to_string(&WritingStage::Polishing).unwrap(), "\"polishing\"");
        assert_eq!(serde_json::to_string(&SessionTag::RevisionHeavy).unwrap(), "\"revision_heavy\"");
    }
}
