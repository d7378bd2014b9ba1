//! Intervention types
//!
//! Nudges, the history snapshot that rate-limits them, and the decision
//! returned by the engine.

use crate::load::LoadLevel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of nudge shown to the writer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterventionType {
    GentlePrompt,
    ProcessQuestion,
    ResourceSuggestion,
    BreakSuggestion,
    Encouragement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterventionPriority {
    Low,
    Medium,
    High,
}

/// Follow-up action the editor client can offer alongside the message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionDirective {
    StartFreewriting,
    TakeBreak,
    ViewPeerExamples,
    StartOutline,
}

/// A nudge to surface to the writer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intervention {
    pub id: String,
    #[serde(rename = "type")]
    pub intervention_type: InterventionType,
    pub priority: InterventionPriority,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<ActionDirective>,
    pub dismissable: bool,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

/// Read-only snapshot of a writer's intervention history for one assignment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterventionHistory {
    /// When the most recent intervention was delivered
    pub last_intervention_at: Option<DateTime<Utc>>,
    /// Interventions delivered inside the trailing window
    pub interventions_in_window: u32,
    /// Interventions delivered over the whole history
    pub total_interventions: u32,
    pub accepted_count: u32,
    pub dismissed_count: u32,
    /// 0-100
    pub effectiveness_score: f64,
}

impl Default for InterventionHistory {
    fn default() -> Self {
        Self {
            last_intervention_at: None,
            interventions_in_window: 0,
            total_interventions: 0,
            accepted_count: 0,
            dismissed_count: 0,
            effectiveness_score: 50.0,
        }
    }
}

impl InterventionHistory {
    /// Accepted / (accepted + dismissed), `None` before any response
    pub fn acceptance_rate(&self) -> Option<f64> {
        let responded = u64::from(self.accepted_count) + u64::from(self.dismissed_count);
        (responded > 0).then(|| self.accepted_count as f64 / responded as f64)
    }

    /// Minutes since the last intervention, never negative
    pub fn minutes_since_last(&self, now: DateTime<Utc>) -> Option<f64> {
        self.last_intervention_at
            .map(|last| ((now - last).num_milliseconds() as f64 / 60_000.0).max(0.0))
    }
}

/// Why the engine declined to intervene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DeclineReason {
    CooldownActive { remaining_minutes: f64 },
    HourlyLimitReached { interventions: u32, limit: u32 },
    NotEligible { level: LoadLevel },
    BelowThreshold { confidence: f64, threshold: f64 },
}

impl fmt::Display for DeclineReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeclineReason::CooldownActive { remaining_minutes } => write!(
                f,
                "cooldown active ({:.1} minutes remaining)",
                remaining_minutes
            ),
            DeclineReason::HourlyLimitReached {
                interventions,
                limit,
            } => write!(f, "hourly limit reached ({}/{})", interventions, limit),
            DeclineReason::NotEligible { level } => {
                write!(f, "{} load does not warrant intervention", level)
            }
            DeclineReason::BelowThreshold {
                confidence,
                threshold,
            } => write!(
                f,
                "confidence {:.0}% below adaptive threshold {:.0}%",
                confidence * 100.0,
                threshold * 100.0
            ),
        }
    }
}

/// Outcome of one decision call.
///
/// The engine keeps no state: callers must log delivered interventions through
/// the logging collaborator before the next call, otherwise cooldown and
/// hourly limits cannot see them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum InterventionDecision {
    Intervene {
        intervention: Intervention,
        reason: String,
        threshold: f64,
    },
    Declined {
        reason: DeclineReason,
    },
}

impl InterventionDecision {
    pub fn should_intervene(&self) -> bool {
        matches!(self, InterventionDecision::Intervene { .. })
    }

    pub fn intervention(&self) -> Option<&Intervention> {
        match self {
            InterventionDecision::Intervene { intervention, .. } => Some(intervention),
            InterventionDecision::Declined { .. } => None,
        }
    }

    /// Human-readable reason
    pub fn reason(&self) -> String {
        match self {
            InterventionDecision::Intervene { reason, .. } => reason.clone(),
            InterventionDecision::Declined { reason } => reason.to_string(),
        }
    }

    /// Remaining cooldown, when declined for cooldown
    pub fn cooldown_minutes(&self) -> Option<f64> {
        match self {
            InterventionDecision::Declined {
                reason: DeclineReason::CooldownActive { remaining_minutes },
            } => Some(*remaining_minutes),
            _ => None,
        }
    }
}
