//! Intervention content selection
//!
//! Content is chosen from an ordered rule table: the first rule whose level
//! matches and whose predicate holds wins. The message is then personalised
//! with an optional supportive prefix and a stage-specific lead-in.

use crate::intervention::types::{ActionDirective, InterventionPriority, InterventionType};
use crate::load::{EmotionalState, LoadLevel, WriterProfileSnapshot};
use crate::process::WritingStage;
use crate::telemetry::BehavioralIndicators;

/// Prefix for writers who prefer a supportive tone
pub const SUPPORTIVE_PREFIX: &str = "You're doing great. ";

/// Inputs the rule predicates can look at
pub struct ContentContext<'a> {
    pub indicators: &'a BehavioralIndicators,
    pub profile: Option<&'a WriterProfileSnapshot>,
}

/// Static content for one rule
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContentTemplate {
    pub intervention_type: InterventionType,
    pub priority: InterventionPriority,
    pub message: &'static str,
    pub action: Option<ActionDirective>,
}

/// One row of the rule table
pub struct ContentRule {
    pub name: &'static str,
    pub level: LoadLevel,
    pub applies: fn(&ContentContext<'_>) -> bool,
    pub template: ContentTemplate,
}

fn always(_: &ContentContext<'_>) -> bool {
    true
}

fn cursor_thrashing(ctx: &ContentContext<'_>) -> bool {
    ctx.indicators.cursor_thrashing
}

fn heavy_deletion(ctx: &ContentContext<'_>) -> bool {
    ctx.indicators.deletion_ratio > 2.0
}

fn stagnating(ctx: &ContentContext<'_>) -> bool {
    ctx.indicators.progress_stagnation
}

fn frustrated(ctx: &ContentContext<'_>) -> bool {
    ctx.profile
        .is_some_and(|p| p.emotional_state == EmotionalState::Frustrated)
}

/// Priority-ordered content rules
pub const CONTENT_RULES: &[ContentRule] = &[
    ContentRule {
        name: "overload_focus",
        level: LoadLevel::Overload,
        applies: cursor_thrashing,
        template: ContentTemplate {
            intervention_type: InterventionType::ProcessQuestion,
            priority: InterventionPriority::High,
            message: "What is the one idea you want to focus on right now? Try writing just that sentence.",
            action: None,
        },
    },
    ContentRule {
        name: "overload_imperfect_draft",
        level: LoadLevel::Overload,
        applies: heavy_deletion,
        template: ContentTemplate {
            intervention_type: InterventionType::GentlePrompt,
            priority: InterventionPriority::High,
            message: "It's okay if this draft isn't perfect. Try writing freely for a few minutes without deleting anything.",
            action: Some(ActionDirective::StartFreewriting),
        },
    },
    ContentRule {
        name: "overload_break",
        level: LoadLevel::Overload,
        applies: always,
        template: ContentTemplate {
            intervention_type: InterventionType::BreakSuggestion,
            priority: InterventionPriority::High,
            message: "You've been working hard. A short break can help you come back with fresh eyes.",
            action: Some(ActionDirective::TakeBreak),
        },
    },
    ContentRule {
        name: "high_main_point",
        level: LoadLevel::High,
        applies: stagnating,
        template: ContentTemplate {
            intervention_type: InterventionType::ProcessQuestion,
            priority: InterventionPriority::Medium,
            message: "What is the main point you want your reader to take away from this section?",
            action: None,
        },
    },
    ContentRule {
        name: "high_encouragement",
        level: LoadLevel::High,
        applies: frustrated,
        template: ContentTemplate {
            intervention_type: InterventionType::Encouragement,
            priority: InterventionPriority::Medium,
            message: "Writing is hard work, and every sentence you write moves your draft forward.",
            action: None,
        },
    },
    ContentRule {
        name: "high_peer_examples",
        level: LoadLevel::High,
        applies: always,
        template: ContentTemplate {
            intervention_type: InterventionType::ResourceSuggestion,
            priority: InterventionPriority::Medium,
            message: "Looking at how other writers approached this assignment might spark some ideas.",
            action: Some(ActionDirective::ViewPeerExamples),
        },
    },
    ContentRule {
        name: "low_getting_started",
        level: LoadLevel::Low,
        applies: stagnating,
        template: ContentTemplate {
            intervention_type: InterventionType::GentlePrompt,
            priority: InterventionPriority::Low,
            message: "Getting started is often the hardest part. Try jotting down three ideas you want to include.",
            action: Some(ActionDirective::StartOutline),
        },
    },
];

/// First matching rule for the level, if any
pub fn select_rule(level: LoadLevel, ctx: &ContentContext<'_>) -> Option<&'static ContentRule> {
    CONTENT_RULES
        .iter()
        .find(|rule| rule.level == level && (rule.applies)(ctx))
}

/// Lead-in phrase for the writer's current stage
pub fn stage_lead_in(stage: WritingStage) -> &'static str {
    match stage {
        WritingStage::Planning => "As you plan, ",
        WritingStage::Drafting => "While you draft, ",
        WritingStage::Revising => "As you revise, ",
        WritingStage::Editing => "While you edit, ",
        WritingStage::Polishing => "As you polish, ",
    }
}

/// Final message: supportive prefix, stage lead-in, then the template text
pub fn compose_message(
    template: &ContentTemplate,
    stage: WritingStage,
    profile: Option<&WriterProfileSnapshot>,
) -> String {
    let mut message = String::new();
    if profile.is_some_and(|p| p.prefers("supportive")) {
        message.push_str(SUPPORTIVE_PREFIX);
    }
    message.push_str(stage_lead_in(stage));
    message.push_str(&lowercase_first(template.message));
    message
}

fn lowercase_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn indicators() -> BehavioralIndicators {
        BehavioralIndicators {
            deletion_ratio: 1.0,
            pause_patterns: vec![],
            revision_cycles: 0,
            cursor_thrashing: false,
            word_production_rate: 10.0,
            time_on_task: 20.0,
            progress_stagnation: false,
            sufficient_data: true,
        }
    }

    fn pick(level: LoadLevel, ind: &BehavioralIndicators, profile: Option<&WriterProfileSnapshot>) -> Option<&'static str> {
        let ctx = ContentContext {
            indicators: ind,
            profile,
        };
        select_rule(level, &ctx).map(|rule| rule.name)
    }

    #[test]
    fn test_overload_rule_order() {
        let mut ind = indicators();
        ind.cursor_thrashing = true;
        ind.deletion_ratio = 3.0;
        assert_eq!(pick(LoadLevel::Overload, &ind, None), Some("overload_focus"));

        ind.cursor_thrashing = false;
        assert_eq!(pick(LoadLevel::Overload, &ind, None), Some("overload_imperfect_draft"));

        ind.deletion_ratio = 1.0;
        assert_eq!(pick(LoadLevel::Overload, &ind, None), Some("overload_break"));
    }

    #[test]
    fn test_high_rule_order() {
        let frustrated = WriterProfileSnapshot {
            emotional_state: EmotionalState::Frustrated,
            ..Default::default()
        };
        let mut ind = indicators();
        ind.progress_stagnation = true;
        assert_eq!(pick(LoadLevel::High, &ind, Some(&frustrated)), Some("high_main_point"));

        ind.progress_stagnation = false;
        assert_eq!(pick(LoadLevel::High, &ind, Some(&frustrated)), Some("high_encouragement"));
        assert_eq!(pick(LoadLevel::High, &ind, None), Some("high_peer_examples"));
    }

    #[test]
    fn test_low_and_optimal() {
        let mut ind = indicators();
        assert_eq!(pick(LoadLevel::Low, &ind, None), None);
        ind.progress_stagnation = true;
        assert_eq!(pick(LoadLevel::Low, &ind, None), Some("low_getting_started"));
        assert_eq!(pick(LoadLevel::Optimal, &ind, None), None);
    }

    #[test]
    fn test_every_eligible_level_has_a_fallback() {
        let ind = indicators();
        assert!(pick(LoadLevel::Overload, &ind, None).is_some());
        assert!(pick(LoadLevel::High, &ind, None).is_some());
    }

    #[test]
    fn test_compose_message() {
        let template = &CONTENT_RULES[2].template;
        let plain = compose_message(template, WritingStage::Drafting, None);
        assert_eq!(
            plain,
            "While you draft, you've been working hard. A short break can help you come back with fresh eyes."
        );

        let supportive = WriterProfileSnapshot {
            preferred_responses: vec!["supportive".to_string()],
            ..Default::default()
        };
        let message = compose_message(template, WritingStage::Revising, Some(&supportive));
        assert!(message.starts_with("You're doing great. As you revise, you've"));
    }
}
