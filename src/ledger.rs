//! In-memory ledger
//!
//! A JSON-persistable implementation of all collaborator traits, used by the
//! CLI and in tests. The intervention and alert logs keep a bounded number of
//! entries, oldest dropped first.

use crate::alerts::EducatorAlert;
use crate::collaborators::{AlertDelivery, InterventionLog, WritingDataSource};
use crate::error::CoreError;
use crate::intervention::{Intervention, InterventionHistory};
use crate::load::WriterProfileSnapshot;
use crate::telemetry::TelemetryRecord;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};

/// Default number of entries kept per log
pub const DEFAULT_LOG_CAPACITY: usize = 1_000;

/// Effectiveness reported before any response was recorded
const NEUTRAL_EFFECTIVENESS: f64 = 50.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSession {
    pub writer_id: String,
    pub assignment_id: String,
    pub record: TelemetryRecord,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterventionResponse {
    pub accepted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_taken: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggedIntervention {
    pub writer_id: String,
    pub assignment_id: String,
    pub document_id: String,
    pub intervention: Intervention,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<InterventionResponse>,
}

impl LoggedIntervention {
    fn belongs_to(&self, writer_id: &str, assignment_id: &str) -> bool {
        self.writer_id == writer_id && self.assignment_id == assignment_id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveredAlert {
    pub educator_id: String,
    pub alert: EducatorAlert,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InMemoryLedger {
    profiles: HashMap<String, WriterProfileSnapshot>,
    sessions: Vec<StoredSession>,
    interventions: VecDeque<LoggedIntervention>,
    alerts: VecDeque<DeliveredAlert>,
    log_capacity: usize,
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_CAPACITY)
    }
}

impl InMemoryLedger {
    pub fn new(log_capacity: usize) -> Self {
        Self {
            profiles: HashMap::new(),
            sessions: Vec::new(),
            interventions: VecDeque::with_capacity(log_capacity.min(DEFAULT_LOG_CAPACITY)),
            alerts: VecDeque::new(),
            log_capacity,
        }
    }

    pub fn set_profile(&mut self, writer_id: impl Into<String>, profile: WriterProfileSnapshot) {
        self.profiles.insert(writer_id.into(), profile);
    }

    pub fn record_session(
        &mut self,
        writer_id: impl Into<String>,
        assignment_id: impl Into<String>,
        record: TelemetryRecord,
    ) {
        self.sessions.push(StoredSession {
            writer_id: writer_id.into(),
            assignment_id: assignment_id.into(),
            record,
        });
    }

    pub fn interventions(&self) -> impl Iterator<Item = &LoggedIntervention> {
        self.interventions.iter()
    }

    pub fn delivered_alerts(&self) -> impl Iterator<Item = &DeliveredAlert> {
        self.alerts.iter()
    }

    /// Load ledger state from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Save ledger state to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl WritingDataSource for InMemoryLedger {
    fn fetch_writer_profile(
        &self,
        writer_id: &str,
    ) -> Result<Option<WriterProfileSnapshot>, CoreError> {
        Ok(self.profiles.get(writer_id).cloned())
    }

    fn fetch_intervention_history(
        &self,
        writer_id: &str,
        assignment_id: &str,
        window_minutes: i64,
        now: DateTime<Utc>,
    ) -> Result<InterventionHistory, CoreError> {
        // an unrepresentable window start covers all of history
        let window_start =
            Duration::try_minutes(window_minutes).and_then(|w| now.checked_sub_signed(w));
        let mut history = InterventionHistory::default();

        for entry in self
            .interventions
            .iter()
            .filter(|e| e.belongs_to(writer_id, assignment_id))
            .filter(|e| e.intervention.created_at <= now)
        {
            let delivered_at = entry.intervention.created_at;
            history.total_interventions += 1;
            if window_start.map_or(true, |start| delivered_at > start) {
                history.interventions_in_window += 1;
            }
            if history.last_intervention_at.map_or(true, |last| delivered_at > last) {
                history.last_intervention_at = Some(delivered_at);
            }
            match &entry.response {
                Some(r) if r.accepted => history.accepted_count += 1,
                Some(_) => history.dismissed_count += 1,
                None => {}
            }
        }

        history.effectiveness_score = history
            .acceptance_rate()
            .map_or(NEUTRAL_EFFECTIVENESS, |rate| rate * 100.0);
        Ok(history)
    }

    fn fetch_session_history(
        &self,
        writer_id: &str,
        assignment_id: &str,
    ) -> Result<Vec<TelemetryRecord>, CoreError> {
        let mut records: Vec<_> = self
            .sessions
            .iter()
            .filter(|s| s.writer_id == writer_id && s.assignment_id == assignment_id)
            .map(|s| s.record.clone())
            .collect();
        records.sort_by_key(|r| r.started_at);
        Ok(records)
    }
}

impl InterventionLog for InMemoryLedger {
    fn log_intervention_delivery(
        &mut self,
        intervention: &Intervention,
        writer_id: &str,
        assignment_id: &str,
        document_id: &str,
    ) -> Result<(), CoreError> {
        self.interventions.push_back(LoggedIntervention {
            writer_id: writer_id.to_string(),
            assignment_id: assignment_id.to_string(),
            document_id: document_id.to_string(),
            intervention: intervention.clone(),
            response: None,
        });
        while self.interventions.len() > self.log_capacity {
            self.interventions.pop_front();
        }
        Ok(())
    }

    fn log_intervention_response(
        &mut self,
        intervention_id: &str,
        writer_id: &str,
        assignment_id: &str,
        accepted: bool,
        action_taken: Option<&str>,
    ) -> Result<(), CoreError> {
        let entry = self
            .interventions
            .iter_mut()
            .find(|e| e.intervention.id == intervention_id && e.belongs_to(writer_id, assignment_id))
            .ok_or_else(|| CoreError::not_found("intervention", intervention_id))?;

        entry.response = Some(InterventionResponse {
            accepted,
            action_taken: action_taken.map(str::to_string),
        });
        Ok(())
    }
}

impl AlertDelivery for InMemoryLedger {
    fn deliver_alert(&mut self, alert: &EducatorAlert, educator_id: &str) -> Result<(), CoreError> {
        self.alerts.push_back(DeliveredAlert {
            educator_id: educator_id.to_string(),
            alert: alert.clone(),
        });
        while self.alerts.len() > self.log_capacity {
            self.alerts.pop_front();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intervention::{InterventionPriority, InterventionType};
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 4, 15, 0, 0).unwrap()
    }

    fn intervention(id: &str, created_at: DateTime<Utc>) -> Intervention {
        Intervention {
            id: id.to_string(),
            intervention_type: InterventionType::GentlePrompt,
            priority: InterventionPriority::Medium,
            message: "Keep going".to_string(),
            action: None,
            dismissable: true,
            created_at,
            expires_at: None,
        }
    }

    #[test]
    fn test_history_for_new_writer() {
        let ledger = InMemoryLedger::default();
        let history = ledger
            .fetch_intervention_history("w", "a", 60, now())
            .unwrap();
        assert_eq!(history, InterventionHistory::default());
        assert_eq!(ledger.fetch_writer_profile("w").unwrap(), None);
    }

    #[test]
    fn test_history_derivation() {
        let mut ledger = InMemoryLedger::default();
        let times = [
            now() - Duration::minutes(200),
            now() - Duration::minutes(50),
            now() - Duration::minutes(10),
        ];
        for (i, at) in times.iter().enumerate() {
            let id = format!("i{}", i);
            ledger
                .log_intervention_delivery(&intervention(&id, *at), "w", "a", "doc")
                .unwrap();
        }
        // another assignment does not count
        ledger
            .log_intervention_delivery(&intervention("x", now()), "w", "other", "doc")
            .unwrap();

        ledger.log_intervention_response("i0", "w", "a", true, Some("started_outline")).unwrap();
        ledger.log_intervention_response("i1", "w", "a", false, None).unwrap();
        ledger.log_intervention_response("i2", "w", "a", true, None).unwrap();

        let history = ledger
            .fetch_intervention_history("w", "a", 60, now())
            .unwrap();
        assert_eq!(history.total_interventions, 3);
        assert_eq!(history.interventions_in_window, 2);
        assert_eq!(history.last_intervention_at, Some(times[2]));
        assert_eq!(history.accepted_count, 2);
        assert_eq!(history.dismissed_count, 1);
        assert!((history.effectiveness_score - 200.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_response_is_not_found() {
        let mut ledger = InMemoryLedger::default();
        ledger
            .log_intervention_delivery(&intervention("i0", now()), "w", "a", "doc")
            .unwrap();

        let err = ledger
            .log_intervention_response("missing", "w", "a", true, None)
            .unwrap_err();
        assert!(err.is_not_found());

        // right id, wrong writer
        let err = ledger
            .log_intervention_response("i0", "someone-else", "a", true, None)
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_session_history() {
        let mut ledger = InMemoryLedger::default();
        assert!(ledger.fetch_session_history("w", "a").unwrap().is_empty());

        ledger.record_session("w", "a", TelemetryRecord::new("late", now()));
        ledger.record_session("w", "a", TelemetryRecord::new("early", now() - Duration::days(1)));
        ledger.record_session("w", "b", TelemetryRecord::new("elsewhere", now()));

        let ids: Vec<_> = ledger
            .fetch_session_history("w", "a")
            .unwrap()
            .into_iter()
            .map(|r| r.session_id)
            .collect();
        assert_eq!(ids, vec!["early".to_string(), "late".to_string()]);
    }

    #[test]
    fn test_log_capacity() {
        let mut ledger = InMemoryLedger::new(2);
        for i in 0..3 {
            ledger
                .log_intervention_delivery(&intervention(&format!("i{}", i), now()), "w", "a", "doc")
                .unwrap();
        }
        let ids: Vec<_> = ledger.interventions().map(|e| e.intervention.id.as_str()).collect();
        assert_eq!(ids, vec!["i1", "i2"]);
    }

    #[test]
    fn test_alert_log_capacity() {
        let mut ledger = InMemoryLedger::new(2);
        let composer = crate::alerts::AlertComposer::default();
        let subject = crate::alerts::AlertSubject::new("w", "a");
        for i in 0..3 {
            let trigger = crate::alerts::AlertTrigger::SupportRequest {
                message: format!("request {}", i),
            };
            let alert = composer.trigger_alert(&subject, &trigger, now());
            ledger.deliver_alert(&alert, "educator-1").unwrap();
        }
        let messages: Vec<_> = ledger
            .delivered_alerts()
            .map(|d| d.alert.message.as_str())
            .collect();
        assert_eq!(
            messages,
            vec!["Writer asked for help: request 1", "Writer asked for help: request 2"]
        );
    }

    #[test]
    fn test_unbounded_window_counts_everything() {
        let mut ledger = InMemoryLedger::default();
        ledger
            .log_intervention_delivery(&intervention("old", now() - Duration::days(400)), "w", "a", "doc")
            .unwrap();
        let history = ledger
            .fetch_intervention_history("w", "a", i64::MAX, now())
            .unwrap();
        assert_eq!(history.interventions_in_window, 1);
    }

    #[test]
    fn test_json_persistence() {
        let mut ledger = InMemoryLedger::default();
        ledger.set_profile("w", WriterProfileSnapshot::default());
        ledger.record_session("w", "a", TelemetryRecord::new("s1", now()));
        ledger
            .log_intervention_delivery(&intervention("i0", now()), "w", "a", "doc")
            .unwrap();

        let json = ledger.to_json().unwrap();
        let restored = InMemoryLedger::from_json(&json).unwrap();

        assert_eq!(
            restored.fetch_writer_profile("w").unwrap(),
            Some(WriterProfileSnapshot::default())
        );
        assert_eq!(restored.fetch_session_history("w", "a").unwrap().len(), 1);
        assert_eq!(restored.interventions().count(), 1);
    }
}
