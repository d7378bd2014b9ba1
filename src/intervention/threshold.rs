//! Adaptive confidence threshold
//!
//! Tightens or relaxes the confidence a decreasing-independence writer's
//! load estimate must reach before a nudge is shown, based on how past
//! nudges were received.

use crate::config::DecisionConfig;
use crate::intervention::types::InterventionHistory;
use crate::load::WriterProfileSnapshot;

/// Compute the dynamic threshold, clamped to the configured bounds.
pub fn dynamic_threshold(
    history: &InterventionHistory,
    profile: Option<&WriterProfileSnapshot>,
    config: &DecisionConfig,
) -> f64 {
    let mut threshold = config.base_threshold;

    // Nudges have not been helping
    if history.effectiveness_score < 50.0 && history.total_interventions > 5 {
        threshold += 0.10;
    }
    if history.effectiveness_score > 80.0 {
        threshold -= 0.05;
    }

    if profile
        .and_then(|p| p.independent_work_per_day)
        .is_some_and(|frequency| frequency < 2.0)
    {
        threshold += 0.10;
    }

    if history.acceptance_rate().is_some_and(|rate| rate < 0.3) {
        threshold += 0.15;
    }

    threshold.clamp(config.min_threshold, config.max_threshold)
}
