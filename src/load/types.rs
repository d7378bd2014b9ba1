//! Cognitive load types
//!
//! Load estimates produced by the classifier and the writer profile snapshot
//! that conditions them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse cognitive load level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadLevel {
    Low,
    Optimal,
    High,
    Overload,
}

impl LoadLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoadLevel::Low => "low",
            LoadLevel::Optimal => "optimal",
            LoadLevel::High => "high",
            LoadLevel::Overload => "overload",
        }
    }

    /// High or overload
    pub fn is_elevated(&self) -> bool {
        matches!(self, LoadLevel::High | LoadLevel::Overload)
    }
}

impl fmt::Display for LoadLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Factor attached to the insufficient-data estimate
pub const INSUFFICIENT_DATA_FACTOR: &str = "Insufficient data for analysis";

/// Confidence of the insufficient-data estimate
pub const INSUFFICIENT_DATA_CONFIDENCE: f64 = 0.3;

/// Classifier output for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadEstimate {
    pub level: LoadLevel,
    /// In [0.5, 1.0], except the insufficient-data estimate (0.3)
    pub confidence: f64,
    /// Human-readable contributing factors, in evaluation order
    pub factors: Vec<String>,
    /// Underlying 0-100 load score
    pub score: f64,
}

impl LoadEstimate {
    /// Estimate returned when a session has no usable telemetry
    pub fn insufficient_data() -> Self {
        Self {
            level: LoadLevel::Optimal,
            confidence: INSUFFICIENT_DATA_CONFIDENCE,
            factors: vec![INSUFFICIENT_DATA_FACTOR.to_string()],
            score: 50.0,
        }
    }

    pub fn is_insufficient_data(&self) -> bool {
        self.factors.len() == 1 && self.factors[0] == INSUFFICIENT_DATA_FACTOR
    }
}

/// Direction of a writer's independence over recent sessions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndependenceTrend {
    Increasing,
    #[default]
    Stable,
    Decreasing,
    #[serde(other)]
    Unknown,
}

/// Writer's current self-reported or inferred emotional state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmotionalState {
    #[default]
    Neutral,
    Frustrated,
    Confident,
    Anxious,
    Engaged,
    #[serde(other)]
    Unknown,
}

/// How a writer typically distributes output over time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductivityPattern {
    Steady,
    Burst,
    DeadlineDriven,
    #[default]
    #[serde(other)]
    Unknown,
}

/// Upper bound of the reflection depth scale
pub const MAX_REFLECTION_DEPTH: f64 = 5.0;

/// Read-only snapshot of a writer's historical profile
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterProfileSnapshot {
    /// Average reflection depth, 0-5
    pub reflection_depth_avg: Option<f64>,
    pub independence_trend: IndependenceTrend,
    pub emotional_state: EmotionalState,
    pub productivity_pattern: ProductivityPattern,
    /// Preferred nudge tones, e.g. "supportive"
    pub preferred_responses: Vec<String>,
    /// Sessions per day completed without assistance
    pub independent_work_per_day: Option<f64>,
}

impl WriterProfileSnapshot {
    /// Whether all numeric fields are finite and within range
    pub fn is_valid(&self) -> bool {
        let depth_ok = self
            .reflection_depth_avg
            .map_or(true, |d| d.is_finite() && (0.0..=MAX_REFLECTION_DEPTH).contains(&d));
        let frequency_ok = self
            .independent_work_per_day
            .map_or(true, |f| f.is_finite() && f >= 0.0);
        depth_ok && frequency_ok
    }

    /// The profile if it is usable, `None` otherwise. Malformed profiles are
    /// treated exactly like an absent profile.
    pub fn usable(profile: Option<&Self>) -> Option<&Self> {
        match profile {
            Some(p) if p.is_valid() => Some(p),
            Some(_) => {
                log::warn!("ignoring malformed writer profile snapshot");
                None
            }
            None => None,
        }
    }

    /// Parse a profile from JSON, yielding `None` for anything malformed
    pub fn from_json_lenient(json: &str) -> Option<Self> {
        serde_json::from_str::<Self>(json)
            .ok()
            .filter(|profile| profile.is_valid())
    }

    pub fn prefers(&self, tone: &str) -> bool {
        self.preferred_responses
            .iter()
            .any(|r| r.eq_ignore_ascii_case(tone))
    }
}
