//! Intervention decision engine
//!
//! A pure decision function over a load estimate and an externally persisted
//! history snapshot. Steps run in order and the first refusal wins:
//! cooldown, trailing-window cap, eligibility by level (with the adaptive
//! threshold for writers whose independence trend is decreasing), content.

use crate::config::{shifted, DecisionConfig};
use crate::intervention::content::{compose_message, select_rule, ContentContext};
use crate::intervention::threshold::dynamic_threshold;
use crate::intervention::types::{
    DeclineReason, Intervention, InterventionDecision, InterventionHistory,
};
use crate::load::{IndependenceTrend, LoadEstimate, LoadLevel, WriterProfileSnapshot};
use crate::process::WritingStage;
use crate::telemetry::BehavioralIndicators;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

/// Minimum confidence for an overload nudge
const OVERLOAD_MIN_CONFIDENCE: f64 = 0.7;
/// Minimum confidence for a high-load nudge
const HIGH_MIN_CONFIDENCE: f64 = 0.8;
/// High load also needs this much time on task unless stagnating
const HIGH_MIN_MINUTES: f64 = 30.0;
/// Low load needs this much time on task alongside stagnation
const LOW_MIN_MINUTES: f64 = 10.0;

/// Everything one decision looks at
#[derive(Debug, Clone, Copy)]
pub struct DecisionRequest<'a> {
    pub estimate: &'a LoadEstimate,
    pub indicators: &'a BehavioralIndicators,
    pub profile: Option<&'a WriterProfileSnapshot>,
    pub history: &'a InterventionHistory,
    pub stage: WritingStage,
    pub now: DateTime<Utc>,
}

/// Rate-limited, cooldown-aware nudge decisions
#[derive(Debug, Clone, Default)]
pub struct DecisionEngine {
    config: DecisionConfig,
}

impl DecisionEngine {
    pub fn new(config: DecisionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DecisionConfig {
        &self.config
    }

    /// Cooldown required after the last intervention for a given level
    pub fn required_cooldown(&self, level: LoadLevel) -> f64 {
        match level {
            LoadLevel::Overload => self.config.overload_cooldown_minutes,
            LoadLevel::High => self.config.high_cooldown_minutes,
            LoadLevel::Low | LoadLevel::Optimal => self.config.default_cooldown_minutes,
        }
    }

    /// Decide whether to nudge the writer now.
    ///
    /// The caller persists a delivered intervention through the logging
    /// collaborator; this function never mutates the history.
    pub fn decide(&self, request: &DecisionRequest<'_>) -> InterventionDecision {
        let estimate = request.estimate;
        let profile = WriterProfileSnapshot::usable(request.profile);

        if let Some(reason) = self.check_rate_limits(estimate.level, request.history, request.now) {
            log::debug!("intervention declined: {}", reason);
            return InterventionDecision::Declined { reason };
        }

        let threshold = dynamic_threshold(request.history, profile, &self.config);

        if !is_eligible(estimate, request.indicators) {
            return InterventionDecision::Declined {
                reason: DeclineReason::NotEligible {
                    level: estimate.level,
                },
            };
        }

        // Writers trending toward dependence must clear the adaptive threshold
        let decreasing = profile
            .is_some_and(|p| p.independence_trend == IndependenceTrend::Decreasing);
        if decreasing && estimate.confidence < threshold {
            let reason = DeclineReason::BelowThreshold {
                confidence: estimate.confidence,
                threshold,
            };
            log::debug!("intervention declined: {}", reason);
            return InterventionDecision::Declined { reason };
        }

        let ctx = ContentContext {
            indicators: request.indicators,
            profile,
        };
        let Some(rule) = select_rule(estimate.level, &ctx) else {
            return InterventionDecision::Declined {
                reason: DeclineReason::NotEligible {
                    level: estimate.level,
                },
            };
        };

        let template = &rule.template;
        let intervention = Intervention {
            id: Uuid::new_v4().to_string(),
            intervention_type: template.intervention_type,
            priority: template.priority,
            message: compose_message(template, request.stage, profile),
            action: template.action,
            dismissable: true,
            created_at: request.now,
            expires_at: shifted(
                request.now,
                Duration::try_minutes(self.config.intervention_expiry_minutes),
            ),
        };

        log::debug!(
            "intervening with {} ({:?})",
            rule.name,
            intervention.intervention_type
        );

        InterventionDecision::Intervene {
            intervention,
            reason: format!(
                "{} load detected, {:.0}% confidence",
                estimate.level,
                estimate.confidence * 100.0
            ),
            threshold,
        }
    }

    fn check_rate_limits(
        &self,
        level: LoadLevel,
        history: &InterventionHistory,
        now: DateTime<Utc>,
    ) -> Option<DeclineReason> {
        let required = self.required_cooldown(level);
        if let Some(elapsed) = history.minutes_since_last(now) {
            if elapsed < required {
                return Some(DeclineReason::CooldownActive {
                    remaining_minutes: required - elapsed,
                });
            }
        }

        if history.interventions_in_window >= self.config.hourly_limit {
            return Some(DeclineReason::HourlyLimitReached {
                interventions: history.interventions_in_window,
                limit: self.config.hourly_limit,
            });
        }

        None
    }
}

fn is_eligible(estimate: &LoadEstimate, indicators: &BehavioralIndicators) -> bool {
    match estimate.level {
        LoadLevel::Overload => estimate.confidence >= OVERLOAD_MIN_CONFIDENCE,
        LoadLevel::High => {
            estimate.confidence >= HIGH_MIN_CONFIDENCE
                && (indicators.progress_stagnation || indicators.time_on_task > HIGH_MIN_MINUTES)
        }
        LoadLevel::Low => {
            indicators.progress_stagnation && indicators.time_on_task > LOW_MIN_MINUTES
        }
        LoadLevel::Optimal => false,
    }
}
