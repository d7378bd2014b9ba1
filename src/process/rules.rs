//! Strengths, improvement areas and recommendations
//!
//! Fixed rule tables keyed on the dominant pattern, the stage time
//! distribution and the struggle-point count. Every pattern row and every
//! struggle band carries text, so each list is non-empty whenever there is
//! at least one session.

use crate::process::types::{
    QualityScores, Recommendations, StrugglePoint, TimeDistribution, WritingPatternType,
};

/// Guidance attached to a dominant pattern
pub struct PatternGuidance {
    pub strength: &'static str,
    pub improvement_area: &'static str,
    pub writer_recommendation: &'static str,
    pub educator_recommendation: &'static str,
}

pub fn pattern_guidance(pattern: WritingPatternType) -> &'static PatternGuidance {
    match pattern {
        WritingPatternType::Linear => &PatternGuidance {
            strength: "Builds the draft in a clear, sequential order",
            improvement_area: "Revisiting earlier sections as ideas evolve",
            writer_recommendation: "Schedule a read-through of earlier sections before finishing",
            educator_recommendation: "Encourage a structured revision pass before submission",
        },
        WritingPatternType::Recursive => &PatternGuidance {
            strength: "Revisits and refines ideas throughout the process",
            improvement_area: "Moving forward before the current section is perfect",
            writer_recommendation: "Set a word goal for new text before returning to revise",
            educator_recommendation: "Discuss when revision helps and when it stalls progress",
        },
        WritingPatternType::Perfectionist => &PatternGuidance {
            strength: "Pays close attention to precision and wording",
            improvement_area: "Tolerating imperfect first drafts",
            writer_recommendation: "Try timed freewriting without deleting anything",
            educator_recommendation: "Reassure the writer that early drafts are meant to be rough",
        },
        WritingPatternType::Exploratory => &PatternGuidance {
            strength: "Willing to explore several directions before committing",
            improvement_area: "Settling on a clear focus for the piece",
            writer_recommendation: "Write a one-sentence thesis before the next session",
            educator_recommendation: "Help the writer narrow the topic to a single main argument",
        },
        WritingPatternType::Burst => &PatternGuidance {
            strength: "Produces large amounts of text when engaged",
            improvement_area: "Spreading work evenly across the available time",
            writer_recommendation: "Plan shorter, regular sessions instead of long bursts",
            educator_recommendation: "Suggest interim milestones to spread the workload",
        },
        WritingPatternType::Steady => &PatternGuidance {
            strength: "Maintains a consistent, sustainable writing pace",
            improvement_area: "Reserving time for deeper revision",
            writer_recommendation: "Keep the current routine and add a dedicated revision session",
            educator_recommendation: "Acknowledge the consistent routine and push for deeper revision",
        },
    }
}

/// A stage-distribution rule
struct StageRule {
    applies: fn(&TimeDistribution) -> bool,
    improvement_area: &'static str,
    writer_recommendation: &'static str,
}

const STAGE_RULES: &[StageRule] = &[
    StageRule {
        applies: little_planning,
        improvement_area: "Spending more time planning before drafting",
        writer_recommendation: "Start the next session with a five-minute outline",
    },
    StageRule {
        applies: little_revision,
        improvement_area: "Building in dedicated revision time",
        writer_recommendation: "Set aside one session only for revising",
    },
    StageRule {
        applies: heavy_editing,
        improvement_area: "Separating drafting from sentence-level editing",
        writer_recommendation: "Hold line edits until the full draft exists",
    },
];

fn little_planning(dist: &TimeDistribution) -> bool {
    dist.planning < 10.0
}

fn little_revision(dist: &TimeDistribution) -> bool {
    dist.revising < 10.0
}

fn heavy_editing(dist: &TimeDistribution) -> bool {
    dist.editing > 50.0
}

/// Educator follow-up by struggle-point count
fn struggle_band(struggles: usize) -> &'static str {
    match struggles {
        0 => "No intervention needed; continue routine monitoring",
        1 | 2 => "Check in briefly about recent sticking points",
        _ => "Schedule a one-on-one conference to address recurring struggles",
    }
}

const STRONG_SCORE: f64 = 75.0;

pub fn strengths(pattern: WritingPatternType, quality: &QualityScores) -> Vec<String> {
    let mut strengths = vec![pattern_guidance(pattern).strength.to_string()];
    if quality.coherence_score >= STRONG_SCORE {
        strengths.push("Document grows steadily from session to session".to_string());
    }
    if quality.development_score >= STRONG_SCORE {
        strengths.push("Substantial, consistent output across sessions".to_string());
    }
    if quality.revision_quality >= STRONG_SCORE {
        strengths.push("Balanced revision habits".to_string());
    }
    strengths
}

pub fn improvement_areas(
    pattern: WritingPatternType,
    distribution: &TimeDistribution,
    struggles: &[StrugglePoint],
) -> Vec<String> {
    let mut areas = vec![pattern_guidance(pattern).improvement_area.to_string()];
    areas.extend(
        STAGE_RULES
            .iter()
            .filter(|rule| (rule.applies)(distribution))
            .map(|rule| rule.improvement_area.to_string()),
    );
    if struggles.len() >= 3 {
        areas.push("Developing strategies for getting unstuck".to_string());
    }
    areas
}

pub fn recommendations(
    pattern: WritingPatternType,
    distribution: &TimeDistribution,
    struggles: &[StrugglePoint],
) -> Recommendations {
    let guidance = pattern_guidance(pattern);

    let mut for_writer = vec![guidance.writer_recommendation.to_string()];
    for_writer.extend(
        STAGE_RULES
            .iter()
            .filter(|rule| (rule.applies)(distribution))
            .map(|rule| rule.writer_recommendation.to_string()),
    );

    let for_educator = vec![
        struggle_band(struggles.len()).to_string(),
        guidance.educator_recommendation.to_string(),
    ];

    Recommendations {
        for_writer,
        for_educator,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::types::StruggleType;
    use chrono::{TimeZone, Utc};

    fn balanced() -> TimeDistribution {
        TimeDistribution {
            planning: 15.0,
            drafting: 40.0,
            revising: 20.0,
            editing: 20.0,
            polishing: 5.0,
        }
    }

    fn struggle() -> StrugglePoint {
        StrugglePoint {
            session_id: "s".to_string(),
            timestamp: Utc.with_ymd_and_hms(2024, 3, 4, 9, 0, 0).unwrap(),
            struggle_type: StruggleType::HighLoad,
            duration_minutes: 30.0,
            resolved: false,
        }
    }

    #[test]
    fn test_every_pattern_yields_guidance() {
        for pattern in WritingPatternType::ALL {
            let quality = QualityScores::default();
            assert!(!strengths(pattern, &quality).is_empty());
            assert!(!improvement_areas(pattern, &balanced(), &[]).is_empty());
            let recs = recommendations(pattern, &balanced(), &[]);
            assert!(!recs.for_writer.is_empty());
            assert_eq!(recs.for_educator.len(), 2);
        }
    }

    #[test]
    fn test_stage_rules_apply() {
        let dist = TimeDistribution {
            planning: 0.0,
            drafting: 30.0,
            revising: 5.0,
            editing: 65.0,
            polishing: 0.0,
        };
        let areas = improvement_areas(WritingPatternType::Burst, &dist, &[]);
        assert_eq!(areas.len(), 4);
        assert_eq!(areas[1], "Spending more time planning before drafting");

        let recs = recommendations(WritingPatternType::Burst, &dist, &[]);
        assert_eq!(recs.for_writer.len(), 4);
    }

    #[test]
    fn test_struggle_bands() {
        let one = recommendations(WritingPatternType::Steady, &balanced(), &[struggle()]);
        assert_eq!(one.for_educator[0], "Check in briefly about recent sticking points");

        let many = vec![struggle(), struggle(), struggle()];
        let recs = recommendations(WritingPatternType::Steady, &balanced(), &many);
        assert!(recs.for_educator[0].starts_with("Schedule a one-on-one"));
        let areas = improvement_areas(WritingPatternType::Steady, &balanced(), &many);
        assert!(areas.contains(&"Developing strategies for getting unstuck".to_string()));
    }

    #[test]
    fn test_quality_strengths() {
        let quality = QualityScores {
            coherence_score: 90.0,
            development_score: 60.0,
            revision_quality: 85.0,
        };
        assert_eq!(strengths(WritingPatternType::Linear, &quality).len(), 3);
    }
}
