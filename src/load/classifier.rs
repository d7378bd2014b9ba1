//! Cognitive load classification
//!
//! A documented threshold heuristic, not a statistical model. The score starts
//! at a neutral 50 and receives additive adjustments in a fixed order, then
//! profile-conditioned multipliers, then clamping and bucketing. Evaluation
//! order is part of the contract: the multipliers act on the running sum.

use crate::load::types::{
    EmotionalState, LoadEstimate, LoadLevel, ProductivityPattern, WriterProfileSnapshot,
};
use crate::telemetry::BehavioralIndicators;

/// Neutral starting score on the 0-100 scale
const NEUTRAL_SCORE: f64 = 50.0;

/// Starting confidence before evidence is counted
const BASE_CONFIDENCE: f64 = 0.6;
/// Confidence gained per additive factor
const CONFIDENCE_PER_FACTOR: f64 = 0.05;
const MIN_CONFIDENCE: f64 = 0.5;
const MAX_CONFIDENCE: f64 = 1.0;

const OVERLOAD_THRESHOLD: f64 = 80.0;
const HIGH_THRESHOLD: f64 = 65.0;
const LOW_THRESHOLD: f64 = 35.0;

/// Reflection depth below this counts as low (0-5 scale)
const LOW_REFLECTION_DEPTH: f64 = 2.5;
/// Burst writers are still warming up before this many minutes
const BURST_WARMUP_MINUTES: f64 = 15.0;

/// Running score plus the evidence that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct LoadScore {
    /// Clamped 0-100 load score
    pub score: f64,
    /// Clamped confidence
    pub confidence: f64,
    pub factors: Vec<String>,
}

struct Tally {
    score: f64,
    confidence: f64,
    factors: Vec<String>,
}

impl Tally {
    fn new() -> Self {
        Self {
            score: NEUTRAL_SCORE,
            confidence: BASE_CONFIDENCE,
            factors: Vec::new(),
        }
    }

    fn add(&mut self, delta: f64, factor: &str) {
        self.score += delta;
        self.factors.push(factor.to_string());
    }

    fn scale(&mut self, multiplier: f64, factor: &str) {
        self.score *= multiplier;
        self.factors.push(factor.to_string());
    }
}

/// Classifier mapping indicators to a load level
pub struct LoadClassifier;

impl LoadClassifier {
    /// Classify a session's indicators, optionally conditioned on a writer profile.
    ///
    /// Malformed profiles are ignored. Insufficient-data indicators map to
    /// [`LoadEstimate::insufficient_data`].
    pub fn classify(
        indicators: &BehavioralIndicators,
        profile: Option<&WriterProfileSnapshot>,
    ) -> LoadEstimate {
        if !indicators.sufficient_data {
            return LoadEstimate::insufficient_data();
        }

        let LoadScore {
            score,
            confidence,
            mut factors,
        } = Self::score(indicators, profile);

        let level = level_for_score(score);
        if factors.is_empty() {
            factors.push(default_factor(level).to_string());
        }

        log::debug!(
            "classified load {} (score {:.1}, confidence {:.2})",
            level,
            score,
            confidence
        );

        LoadEstimate {
            level,
            confidence,
            factors,
            score,
        }
    }

    /// Compute the clamped load score without bucketing
    pub fn score(
        indicators: &BehavioralIndicators,
        profile: Option<&WriterProfileSnapshot>,
    ) -> LoadScore {
        let mut tally = Tally::new();

        // Deletion behaviour
        if indicators.deletion_ratio > 2.0 {
            tally.add(20.0, "High deletion ratio indicates frequent rewriting");
            if indicators.deletion_ratio > 3.0 {
                tally.add(10.0, "Very high deletion ratio suggests difficulty committing to text");
            }
        } else if indicators.deletion_ratio < 0.3 {
            tally.add(-10.0, "Low deletion ratio indicates confident text production");
        }

        // Pauses
        let mean_pause = indicators.mean_pause_sec();
        if mean_pause > 10.0 {
            tally.add(15.0, "Long pauses suggest difficulty formulating ideas");
        } else if mean_pause > 5.0 {
            tally.add(5.0, "Moderate pauses between writing bursts");
        }

        // Revision cycles
        if indicators.revision_cycles > 5 {
            tally.add(15.0, "Frequent revision cycles on the same passage");
        } else if indicators.revision_cycles > 2 {
            tally.add(5.0, "Several revision cycles on the same passage");
        }

        if indicators.cursor_thrashing {
            tally.add(10.0, "Erratic cursor movement suggests difficulty focusing");
        }

        // Production rate
        if indicators.word_production_rate < 5.0 {
            tally.add(15.0, "Very low word production rate");
        } else if indicators.word_production_rate < 10.0 {
            tally.add(5.0, "Below-average word production rate");
        } else if indicators.word_production_rate > 30.0 {
            tally.add(-10.0, "High word production rate indicates fluent writing");
        }

        if indicators.progress_stagnation {
            tally.add(15.0, "Little progress despite sustained time on task");
        }

        // Fatigue
        if indicators.time_on_task > 60.0 {
            tally.add(10.0, "Extended session length may cause fatigue");
        } else if indicators.time_on_task > 30.0 {
            tally.add(5.0, "Long writing session");
        }

        tally.confidence += CONFIDENCE_PER_FACTOR * tally.factors.len() as f64;
        if indicators.progress_stagnation {
            tally.confidence += 0.1;
        }

        if let Some(profile) = WriterProfileSnapshot::usable(profile) {
            if profile
                .reflection_depth_avg
                .is_some_and(|depth| depth < LOW_REFLECTION_DEPTH)
            {
                tally.scale(1.1, "Historically limited reflection depth");
            }

            match profile.emotional_state {
                EmotionalState::Frustrated => {
                    tally.scale(1.2, "Writer reported frustration");
                    tally.confidence += 0.1;
                }
                EmotionalState::Confident => {
                    tally.scale(0.9, "Writer reports feeling confident");
                }
                _ => {}
            }

            if profile.productivity_pattern == ProductivityPattern::Burst
                && indicators.time_on_task < BURST_WARMUP_MINUTES
            {
                tally.scale(0.8, "Burst writer still warming up");
            }
        }

        let Tally {
            score,
            confidence,
            factors,
        } = tally;
        LoadScore {
            score: score.clamp(0.0, 100.0),
            confidence: confidence.clamp(MIN_CONFIDENCE, MAX_CONFIDENCE),
            factors,
        }
    }
}

/// Bucket a clamped score into a level
pub fn level_for_score(score: f64) -> LoadLevel {
    if score >= OVERLOAD_THRESHOLD {
        LoadLevel::Overload
    } else if score >= HIGH_THRESHOLD {
        LoadLevel::High
    } else if score <= LOW_THRESHOLD {
        LoadLevel::Low
    } else {
        LoadLevel::Optimal
    }
}

fn default_factor(level: LoadLevel) -> &'static str {
    match level {
        LoadLevel::Overload => "Multiple indicators of cognitive overload",
        LoadLevel::High => "Elevated cognitive load indicators",
        LoadLevel::Low => "Low engagement with the writing task",
        LoadLevel::Optimal => "Balanced writing activity",
    }
}
