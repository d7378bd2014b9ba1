//! Writing process module
//!
//! Looks across all sessions of one assignment: which pattern the writer
//! follows, how time splits across stages, where they got stuck and when
//! they write best.

pub mod analyzer;
pub mod patterns;
pub mod quality;
pub mod rules;
pub mod stages;
pub mod struggle;
pub mod types;

pub use analyzer::ProcessAnalyzer;
pub use types::{
    AnalyzedSession, PatternClassification, ProductivePeriod, QualityScores, Recommendations,
    SessionStage, SessionTag, StrugglePoint, StruggleType, TimeDistribution, TimeOfDay,
    WritingPatternType, WritingProcessInsights, WritingStage, NO_DATA_IMPROVEMENT_AREA,
};
