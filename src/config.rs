//! Engine configuration
//!
//! Rate-limit and alert tunables. Classifier and extractor thresholds are
//! fixed constants in their own modules and are intentionally absent here.

use crate::error::CoreError;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Upper bound for every configured window and lifetime (one year)
pub const MAX_SPAN_MINUTES: i64 = 525_600;

/// `now` shifted by `span`, or `None` when either leaves chrono's range
pub(crate) fn shifted(now: DateTime<Utc>, span: Option<Duration>) -> Option<DateTime<Utc>> {
    span.and_then(|d| now.checked_add_signed(d))
}

/// Tunables for the intervention decision engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionConfig {
    /// Cooldown when the current load is overload
    pub overload_cooldown_minutes: f64,
    /// Cooldown when the current load is high
    pub high_cooldown_minutes: f64,
    /// Cooldown for every other level
    pub default_cooldown_minutes: f64,
    /// Maximum interventions inside the trailing history window
    pub hourly_limit: u32,
    /// Trailing window used when fetching intervention history
    pub history_window_minutes: i64,
    /// Starting point of the dynamic confidence threshold
    pub base_threshold: f64,
    pub min_threshold: f64,
    pub max_threshold: f64,
    /// Lifetime of an issued intervention
    pub intervention_expiry_minutes: i64,
}

impl Default for DecisionConfig {
    fn default() -> Self {
        Self {
            overload_cooldown_minutes: 5.0,
            high_cooldown_minutes: 10.0,
            default_cooldown_minutes: 15.0,
            hourly_limit: 4,
            history_window_minutes: 60,
            base_threshold: 0.75,
            min_threshold: 0.6,
            max_threshold: 0.95,
            intervention_expiry_minutes: 15,
        }
    }
}

/// Tunables for the alert composer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    /// Minimum load confidence for a cognitive-overload alert
    pub overload_min_confidence: f64,
    /// Minimum unresolved struggle points for a writing-struggle alert
    pub min_unresolved_struggles: usize,
    /// Summed struggle minutes above which the struggle alert is high priority
    pub struggle_high_priority_minutes: f64,
    pub overload_alert_ttl_hours: i64,
    pub struggle_alert_ttl_days: i64,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            overload_min_confidence: 0.8,
            min_unresolved_struggles: 2,
            struggle_high_priority_minutes: 60.0,
            overload_alert_ttl_hours: 2,
            struggle_alert_ttl_days: 7,
        }
    }
}

/// Top-level engine configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub decision: DecisionConfig,
    pub alerts: AlertConfig,
}

impl EngineConfig {
    /// Load and validate a configuration from JSON. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to pretty JSON
    pub fn to_json(&self) -> Result<String, CoreError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check ranges and orderings
    pub fn validate(&self) -> Result<(), CoreError> {
        let d = &self.decision;
        let cooldowns = [
            d.overload_cooldown_minutes,
            d.high_cooldown_minutes,
            d.default_cooldown_minutes,
        ];
        if cooldowns.iter().any(|c| !c.is_finite() || *c < 0.0) {
            return Err(CoreError::InvalidConfig(
                "cooldown minutes must be finite and non-negative".to_string(),
            ));
        }
        if d.history_window_minutes <= 0 || d.history_window_minutes > MAX_SPAN_MINUTES {
            return Err(CoreError::InvalidConfig(format!(
                "history_window_minutes must be within 1..={}",
                MAX_SPAN_MINUTES
            )));
        }
        if !(0.0..=1.0).contains(&d.min_threshold)
            || !(0.0..=1.0).contains(&d.max_threshold)
            || d.min_threshold > d.max_threshold
        {
            return Err(CoreError::InvalidConfig(format!(
                "threshold bounds [{}, {}] must be ordered and within [0, 1]",
                d.min_threshold, d.max_threshold
            )));
        }
        if !d.base_threshold.is_finite() {
            return Err(CoreError::InvalidConfig(
                "base_threshold must be finite".to_string(),
            ));
        }
        if !(0..=MAX_SPAN_MINUTES).contains(&d.intervention_expiry_minutes) {
            return Err(CoreError::InvalidConfig(format!(
                "intervention_expiry_minutes must be within 0..={}",
                MAX_SPAN_MINUTES
            )));
        }

        let a = &self.alerts;
        if !(0.0..=1.0).contains(&a.overload_min_confidence) {
            return Err(CoreError::InvalidConfig(
                "overload_min_confidence must be within [0, 1]".to_string(),
            ));
        }
        if a.min_unresolved_struggles == 0 {
            return Err(CoreError::InvalidConfig(
                "min_unresolved_struggles must be at least 1".to_string(),
            ));
        }
        let ttl_ok = |value: i64, minutes_per_unit: i64| {
            (0..=MAX_SPAN_MINUTES / minutes_per_unit).contains(&value)
        };
        if !ttl_ok(a.overload_alert_ttl_hours, 60) || !ttl_ok(a.struggle_alert_ttl_days, 1_440) {
            return Err(CoreError::InvalidConfig(
                "alert lifetimes must be non-negative and at most one year".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_validate() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.decision.hourly_limit, 4);
        assert_eq!(config.decision.high_cooldown_minutes, 10.0);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = EngineConfig::from_json(r#"{"decision": {"hourly_limit": 2}}"#).unwrap();
        assert_eq!(config.decision.hourly_limit, 2);
        assert_eq!(config.decision.base_threshold, 0.75);
        assert_eq!(config.alerts, AlertConfig::default());
    }

    #[test]
    fn test_inverted_threshold_bounds_rejected() {
        let json = r#"{"decision": {"min_threshold": 0.9, "max_threshold": 0.6}}"#;
        let err = EngineConfig::from_json(json).unwrap_err();
        assert!(matches!(err, CoreError::InvalidConfig(_)));
    }

    #[test]
    fn test_spans_beyond_a_year_rejected() {
        let cases = [
            r#"{"decision": {"intervention_expiry_minutes": 9223372036854775807}}"#,
            r#"{"decision": {"history_window_minutes": 525601}}"#,
            r#"{"alerts": {"overload_alert_ttl_hours": 8761}}"#,
            r#"{"alerts": {"struggle_alert_ttl_days": 366}}"#,
        ];
        for json in cases {
            let err = EngineConfig::from_json(json).unwrap_err();
            assert!(matches!(err, CoreError::InvalidConfig(_)), "{}", json);
        }

        let year = r#"{"decision": {"intervention_expiry_minutes": 525600}, "alerts": {"struggle_alert_ttl_days": 365}}"#;
        assert!(EngineConfig::from_json(year).is_ok());
    }

    #[test]
    fn test_shifted_out_of_range_is_none() {
        let now = Utc.with_ymd_and_hms(2024, 3, 4, 15, 0, 0).unwrap();
        assert_eq!(shifted(now, Duration::try_minutes(i64::MAX)), None);
        assert_eq!(shifted(DateTime::<Utc>::MAX_UTC, Duration::try_minutes(1)), None);
        assert_eq!(
            shifted(now, Duration::try_minutes(15)),
            Some(now + Duration::minutes(15))
        );
    }

    #[test]
    fn test_json_roundtrip() {
        let config = EngineConfig::default();
        let json = config.to_json().unwrap();
        assert_eq!(EngineConfig::from_json(&json).unwrap(), config);
    }
}
