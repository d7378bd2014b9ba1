//! Alert composition
//!
//! Turns load estimates, process insights and external triggers into
//! educator alerts. The composer never filters or deduplicates; batching and
//! quiet hours belong to the delivery side.

use crate::alerts::types::{
    AlertCategory, AlertPriority, AlertSubject, AlertTrigger, AlertType, EducatorAlert,
};
use crate::config::{shifted, AlertConfig};
use crate::intervention::InterventionDecision;
use crate::load::{LoadEstimate, LoadLevel};
use crate::process::WritingProcessInsights;
use chrono::{DateTime, Duration, Utc};
use serde_json::{json, Value};
use uuid::Uuid;

/// Deadline-risk priority is urgent inside this many hours...
const DEADLINE_URGENT_HOURS: f64 = 24.0;
/// ...and high inside this many
const DEADLINE_HIGH_HOURS: f64 = 48.0;

const PATTERN_CHANGE_TTL_DAYS: i64 = 7;
const BREAKTHROUGH_TTL_DAYS: i64 = 3;
const SUPPORT_REQUEST_TTL_HOURS: i64 = 24;

#[derive(Debug, Clone, Default)]
pub struct AlertComposer {
    config: AlertConfig,
}

impl AlertComposer {
    pub fn new(config: AlertConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AlertConfig {
        &self.config
    }

    /// Overload alert: only for overload at or above the configured confidence
    pub fn overload_alert(
        &self,
        subject: &AlertSubject,
        estimate: &LoadEstimate,
        decision: Option<&InterventionDecision>,
        now: DateTime<Utc>,
    ) -> Option<EducatorAlert> {
        if estimate.level != LoadLevel::Overload
            || estimate.confidence < self.config.overload_min_confidence
        {
            return None;
        }

        let intervention = decision.and_then(|d| d.intervention());
        let mut action_items = vec![
            "Check in with the writer about the current task".to_string(),
            "Consider breaking the assignment into smaller steps".to_string(),
        ];
        if intervention.is_none() {
            action_items.push("No automated support was shown; a personal message may help".to_string());
        }

        Some(alert(
            AlertType::CognitiveOverload,
            AlertPriority::High,
            AlertCategory::ImmediateAttention,
            subject,
            format!(
                "Writer shows signs of cognitive overload ({:.0}% confidence)",
                estimate.confidence * 100.0
            ),
            json!({
                "level": estimate.level,
                "confidence": estimate.confidence,
                "score": estimate.score,
                "factors": estimate.factors,
                "intervention": intervention,
            }),
            action_items,
            now,
            shifted(now, Duration::try_hours(self.config.overload_alert_ttl_hours)),
        ))
    }

    /// Struggle alert: only when enough struggle points remain unresolved
    pub fn struggle_alert(
        &self,
        subject: &AlertSubject,
        insights: &WritingProcessInsights,
        now: DateTime<Utc>,
    ) -> Option<EducatorAlert> {
        let unresolved: Vec<_> = insights.unresolved_struggles().collect();
        if unresolved.len() < self.config.min_unresolved_struggles {
            return None;
        }

        let total_minutes: f64 = unresolved.iter().map(|p| p.duration_minutes).sum();
        let priority = if total_minutes > self.config.struggle_high_priority_minutes {
            AlertPriority::High
        } else {
            AlertPriority::Medium
        };

        Some(alert(
            AlertType::WritingStruggle,
            priority,
            AlertCategory::AcademicSupport,
            subject,
            format!(
                "Writer has {} unresolved struggle points ({:.0} minutes in total)",
                unresolved.len(),
                total_minutes
            ),
            json!({
                "struggle_points": unresolved,
                "total_minutes": total_minutes,
                "dominant_pattern": insights.dominant_pattern.pattern,
            }),
            vec![
                "Review the sessions where the writer got stuck".to_string(),
                "Offer a conference or targeted feedback".to_string(),
            ],
            now,
            shifted(now, Duration::try_days(self.config.struggle_alert_ttl_days)),
        ))
    }

    /// Alert for an externally detected event, from fixed templates
    pub fn trigger_alert(
        &self,
        subject: &AlertSubject,
        trigger: &AlertTrigger,
        now: DateTime<Utc>,
    ) -> EducatorAlert {
        match trigger {
            AlertTrigger::PatternChange { previous, current } => alert(
                AlertType::PatternChange,
                AlertPriority::Medium,
                AlertCategory::ProgressMonitoring,
                subject,
                format!(
                    "Writing pattern changed from {} to {}",
                    previous.as_str(),
                    current.as_str()
                ),
                json!({ "previous": previous, "current": current }),
                vec!["Look at recent sessions for what changed".to_string()],
                now,
                shifted(now, Duration::try_days(PATTERN_CHANGE_TTL_DAYS)),
            ),
            AlertTrigger::Breakthrough { description } => alert(
                AlertType::Breakthrough,
                AlertPriority::Low,
                AlertCategory::PositiveReinforcement,
                subject,
                format!("Writer made a breakthrough: {}", description),
                json!({ "description": description }),
                vec!["Acknowledge the progress".to_string()],
                now,
                shifted(now, Duration::try_days(BREAKTHROUGH_TTL_DAYS)),
            ),
            AlertTrigger::DeadlineRisk {
                deadline,
                completion_percent,
            } => {
                let completion_percent = clamp_percent(*completion_percent);
                let hours_left = (*deadline - now).num_minutes() as f64 / 60.0;
                let priority = deadline_priority(hours_left);
                let category = if priority == AlertPriority::Urgent {
                    AlertCategory::ImmediateAttention
                } else {
                    AlertCategory::AcademicSupport
                };
                alert(
                    AlertType::DeadlineRisk,
                    priority,
                    category,
                    subject,
                    format!(
                        "Assignment is {:.0}% complete with {:.0} hours until the deadline",
                        completion_percent,
                        hours_left.max(0.0)
                    ),
                    json!({
                        "deadline": deadline,
                        "hours_remaining": hours_left,
                        "completion_percent": completion_percent,
                    }),
                    vec![
                        "Confirm the writer has a plan to finish".to_string(),
                        "Consider whether an extension is appropriate".to_string(),
                    ],
                    now,
                    Some(*deadline),
                )
            }
            AlertTrigger::SupportRequest { message } => alert(
                AlertType::SupportRequest,
                AlertPriority::High,
                AlertCategory::ImmediateAttention,
                subject,
                format!("Writer asked for help: {}", message),
                json!({ "request": message }),
                vec!["Respond to the writer's request".to_string()],
                now,
                shifted(now, Duration::try_hours(SUPPORT_REQUEST_TTL_HOURS)),
            ),
        }
    }
}

/// Percentages outside [0, 100] are clamped; non-finite values read as zero
fn clamp_percent(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

/// Urgent under 24h, high under 48h, otherwise medium
pub fn deadline_priority(hours_left: f64) -> AlertPriority {
    if hours_left < DEADLINE_URGENT_HOURS {
        AlertPriority::Urgent
    } else if hours_left < DEADLINE_HIGH_HOURS {
        AlertPriority::High
    } else {
        AlertPriority::Medium
    }
}

/// Highest priority first; equal priorities keep their input order
pub fn compose_queue(mut alerts: Vec<EducatorAlert>) -> Vec<EducatorAlert> {
    alerts.sort_by(|a, b| b.priority.cmp(&a.priority));
    alerts
}

#[allow(clippy::too_many_arguments)]
fn alert(
    alert_type: AlertType,
    priority: AlertPriority,
    category: AlertCategory,
    subject: &AlertSubject,
    message: String,
    data: Value,
    action_items: Vec<String>,
    now: DateTime<Utc>,
    expires_at: Option<DateTime<Utc>>,
) -> EducatorAlert {
    log::debug!(
        "composed {:?} alert ({:?}) for writer {}",
        alert_type,
        priority,
        subject.writer_id
    );
    EducatorAlert {
        id: Uuid::new_v4().to_string(),
        alert_type,
        priority,
        category,
        subject: subject.clone(),
        message,
        data,
        action_items,
        created_at: now,
        expires_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::{StrugglePoint, StruggleType, WritingPatternType};
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 4, 15, 0, 0).unwrap()
    }

    fn subject() -> AlertSubject {
        AlertSubject::new("writer-1", "essay-1")
    }

    fn estimate(level: LoadLevel, confidence: f64) -> LoadEstimate {
        LoadEstimate {
            level,
            confidence,
            factors: vec!["Erratic cursor movement suggests difficulty focusing".to_string()],
            score: 90.0,
        }
    }

    fn struggle(minutes: f64, resolved: bool) -> StrugglePoint {
        StrugglePoint {
            session_id: "s".to_string(),
            timestamp: now(),
            struggle_type: StruggleType::HighLoad,
            duration_minutes: minutes,
            resolved,
        }
    }

    #[test]
    fn test_overload_alert_requires_confidence() {
        let composer = AlertComposer::default();

        let alert = composer
            .overload_alert(&subject(), &estimate(LoadLevel::Overload, 0.85), None, now())
            .unwrap();
        assert_eq!(alert.alert_type, AlertType::CognitiveOverload);
        assert_eq!(alert.priority, AlertPriority::High);
        assert_eq!(alert.category, AlertCategory::ImmediateAttention);
        assert_eq!(alert.expires_at, Some(now() + Duration::hours(2)));
        assert_eq!(alert.subject, subject());

        assert!(composer
            .overload_alert(&subject(), &estimate(LoadLevel::Overload, 0.79), None, now())
            .is_none());
        assert!(composer
            .overload_alert(&subject(), &estimate(LoadLevel::High, 0.95), None, now())
            .is_none());
    }

    #[test]
    fn test_struggle_alert_thresholds() {
        let composer = AlertComposer::default();
        let mut insights = WritingProcessInsights::empty();

        insights.struggle_points = vec![struggle(30.0, false), struggle(90.0, true)];
        assert!(composer.struggle_alert(&subject(), &insights, now()).is_none());

        insights.struggle_points = vec![struggle(30.0, false), struggle(20.0, false)];
        let medium = composer.struggle_alert(&subject(), &insights, now()).unwrap();
        assert_eq!(medium.priority, AlertPriority::Medium);
        assert_eq!(medium.category, AlertCategory::AcademicSupport);
        assert_eq!(medium.expires_at, Some(now() + Duration::days(7)));

        insights.struggle_points = vec![struggle(45.0, false), struggle(20.0, false)];
        let high = composer.struggle_alert(&subject(), &insights, now()).unwrap();
        assert_eq!(high.priority, AlertPriority::High);
        assert_eq!(high.data["total_minutes"], json!(65.0));
    }

    #[test]
    fn test_deadline_priority() {
        assert_eq!(deadline_priority(3.0), AlertPriority::Urgent);
        assert_eq!(deadline_priority(24.0), AlertPriority::High);
        assert_eq!(deadline_priority(47.9), AlertPriority::High);
        assert_eq!(deadline_priority(48.0), AlertPriority::Medium);

        let composer = AlertComposer::default();
        let trigger = AlertTrigger::DeadlineRisk {
            deadline: now() + Duration::hours(10),
            completion_percent: 40.0,
        };
        let alert = composer.trigger_alert(&subject(), &trigger, now());
        assert_eq!(alert.priority, AlertPriority::Urgent);
        assert_eq!(alert.category, AlertCategory::ImmediateAttention);
        assert_eq!(alert.expires_at, Some(now() + Duration::hours(10)));
    }

    #[test]
    fn test_deadline_completion_is_clamped() {
        let composer = AlertComposer::default();
        let deadline = now() + Duration::hours(72);

        let over = composer.trigger_alert(
            &subject(),
            &AlertTrigger::DeadlineRisk {
                deadline,
                completion_percent: 150.0,
            },
            now(),
        );
        assert_eq!(over.data["completion_percent"], json!(100.0));
        assert!(over.message.starts_with("Assignment is 100% complete"));

        let nan = composer.trigger_alert(
            &subject(),
            &AlertTrigger::DeadlineRisk {
                deadline,
                completion_percent: f64::NAN,
            },
            now(),
        );
        assert_eq!(nan.data["completion_percent"], json!(0.0));
        assert!(nan.message.starts_with("Assignment is 0% complete"));
    }

    #[test]
    fn test_unrepresentable_ttl_leaves_alert_open() {
        let composer = AlertComposer::new(AlertConfig {
            overload_alert_ttl_hours: i64::MAX,
            ..Default::default()
        });
        let alert = composer
            .overload_alert(&subject(), &estimate(LoadLevel::Overload, 0.9), None, now())
            .unwrap();
        assert_eq!(alert.expires_at, None);
    }

    #[test]
    fn test_trigger_templates() {
        let composer = AlertComposer::default();
        let change = composer.trigger_alert(
            &subject(),
            &AlertTrigger::PatternChange {
                previous: WritingPatternType::Steady,
                current: WritingPatternType::Burst,
            },
            now(),
        );
        assert_eq!(change.message, "Writing pattern changed from steady to burst");
        assert_eq!(change.category, AlertCategory::ProgressMonitoring);

        let win = composer.trigger_alert(
            &subject(),
            &AlertTrigger::Breakthrough {
                description: "finished the first full draft".to_string(),
            },
            now(),
        );
        assert_eq!(win.priority, AlertPriority::Low);
        assert_eq!(win.category, AlertCategory::PositiveReinforcement);

        let help = composer.trigger_alert(
            &subject(),
            &AlertTrigger::SupportRequest {
                message: "stuck on the conclusion".to_string(),
            },
            now(),
        );
        assert_eq!(help.alert_type, AlertType::SupportRequest);
        assert_eq!(help.priority, AlertPriority::High);
    }

    #[test]
    fn test_queue_is_stable_by_priority() {
        let composer = AlertComposer::default();
        let breakthrough = |d: &str| {
            composer.trigger_alert(
                &subject(),
                &AlertTrigger::Breakthrough {
                    description: d.to_string(),
                },
                now(),
            )
        };
        let urgent = composer.trigger_alert(
            &subject(),
            &AlertTrigger::DeadlineRisk {
                deadline: now() + Duration::hours(2),
                completion_percent: 10.0,
            },
            now(),
        );

        let queue = compose_queue(vec![breakthrough("one"), urgent, breakthrough("two")]);
        let order: Vec<_> = queue.iter().map(|a| a.priority).collect();
        assert_eq!(
            order,
            vec![AlertPriority::Urgent, AlertPriority::Low, AlertPriority::Low]
        );
        assert!(queue[1].message.ends_with("one"));
        assert!(queue[2].message.ends_with("two"));
    }
}
