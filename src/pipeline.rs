//! Pipeline orchestration
//!
//! This module provides the public API for Draftpulse. It wires the
//! collaborators around the pure components:
//! telemetry → signal extraction → load classification → intervention
//! decision → alert candidates, plus whole-assignment process analysis.

use crate::alerts::{compose_queue, AlertComposer, AlertSubject, EducatorAlert};
use crate::collaborators::{AlertDelivery, InterventionLog, WritingDataSource};
use crate::config::EngineConfig;
use crate::error::CoreError;
use crate::intervention::{DecisionEngine, DecisionRequest, InterventionDecision, InterventionHistory};
use crate::load::{LoadClassifier, LoadEstimate, WriterProfileSnapshot};
use crate::process::{ProcessAnalyzer, WritingProcessInsights, WritingStage};
use crate::telemetry::{BehavioralIndicators, SignalExtractor, TelemetryRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where a live session belongs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
    pub writer_id: String,
    pub assignment_id: String,
    pub document_id: String,
    #[serde(default)]
    pub stage: WritingStage,
}

impl SessionContext {
    pub fn new(
        writer_id: impl Into<String>,
        assignment_id: impl Into<String>,
        document_id: impl Into<String>,
    ) -> Self {
        Self {
            writer_id: writer_id.into(),
            assignment_id: assignment_id.into(),
            document_id: document_id.into(),
            stage: WritingStage::default(),
        }
    }

    pub fn with_stage(mut self, stage: WritingStage) -> Self {
        self.stage = stage;
        self
    }

    fn subject(&self) -> AlertSubject {
        AlertSubject::new(self.writer_id.clone(), self.assignment_id.clone())
    }
}

/// Result of assessing one live session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionAssessment {
    pub session_id: String,
    pub indicators: BehavioralIndicators,
    pub estimate: LoadEstimate,
    pub decision: InterventionDecision,
    /// Overload alert candidate, if one fired
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert: Option<EducatorAlert>,
}

/// Result of analyzing one assignment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentAnalysis {
    pub insights: WritingProcessInsights,
    /// Struggle alert candidate, if one fired
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert: Option<EducatorAlert>,
}

/// Orchestrates assessments and analyses for one engine configuration.
///
/// Holds no per-writer state. Everything that affects a decision comes from
/// the collaborators (or the explicit arguments of the pure entry points).
#[derive(Debug, Clone, Default)]
pub struct WritingMonitor {
    config: EngineConfig,
    engine: DecisionEngine,
    composer: AlertComposer,
}

impl WritingMonitor {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            engine: DecisionEngine::new(config.decision.clone()),
            composer: AlertComposer::new(config.alerts.clone()),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Assess a session against explicit profile and history snapshots.
    ///
    /// Nothing is logged; the caller owns persistence of the decision.
    pub fn assess(
        &self,
        context: &SessionContext,
        record: &TelemetryRecord,
        prior_cursor: Option<&[i64]>,
        profile: Option<&WriterProfileSnapshot>,
        history: &InterventionHistory,
        now: DateTime<Utc>,
    ) -> SessionAssessment {
        let profile = WriterProfileSnapshot::usable(profile);

        // Stage 1: behavioral indicators
        let indicators = SignalExtractor::extract(record, prior_cursor);

        // Stage 2: load estimate
        let estimate = LoadClassifier::classify(&indicators, profile);

        // Stage 3: intervention decision
        let decision = self.engine.decide(&DecisionRequest {
            estimate: &estimate,
            indicators: &indicators,
            profile,
            history,
            stage: context.stage,
            now,
        });

        // Stage 4: overload alert candidate
        let alert = self
            .composer
            .overload_alert(&context.subject(), &estimate, Some(&decision), now);

        SessionAssessment {
            session_id: record.session_id.clone(),
            indicators,
            estimate,
            decision,
            alert,
        }
    }

    /// Fetch snapshots, assess the session and log the delivery of any
    /// intervention issued.
    pub fn assess_session<S>(
        &self,
        store: &mut S,
        context: &SessionContext,
        record: &TelemetryRecord,
        prior_cursor: Option<&[i64]>,
        now: DateTime<Utc>,
    ) -> Result<SessionAssessment, CoreError>
    where
        S: WritingDataSource + InterventionLog,
    {
        let profile = store.fetch_writer_profile(&context.writer_id)?;
        let history = store.fetch_intervention_history(
            &context.writer_id,
            &context.assignment_id,
            self.config.decision.history_window_minutes,
            now,
        )?;

        let assessment = self.assess(context, record, prior_cursor, profile.as_ref(), &history, now);

        match assessment.decision.intervention() {
            Some(intervention) => {
                store.log_intervention_delivery(
                    intervention,
                    &context.writer_id,
                    &context.assignment_id,
                    &context.document_id,
                )?;
                log::info!(
                    "issued {:?} intervention {} to writer {} ({})",
                    intervention.intervention_type,
                    intervention.id,
                    context.writer_id,
                    assessment.decision.reason()
                );
            }
            None => log::debug!(
                "no intervention for writer {}: {}",
                context.writer_id,
                assessment.decision.reason()
            ),
        }
        if assessment.alert.is_some() {
            log::info!("overload alert composed for writer {}", context.writer_id);
        }

        Ok(assessment)
    }

    /// Analyze explicit session records for one assignment
    pub fn analyze(
        &self,
        subject: &AlertSubject,
        records: &[TelemetryRecord],
        profile: Option<&WriterProfileSnapshot>,
        now: DateTime<Utc>,
    ) -> AssignmentAnalysis {
        let insights = ProcessAnalyzer::analyze_records(records, profile);
        let alert = self.composer.struggle_alert(subject, &insights, now);
        AssignmentAnalysis { insights, alert }
    }

    /// Fetch the session history and profile, then analyze the assignment
    pub fn analyze_assignment<S: WritingDataSource>(
        &self,
        store: &S,
        writer_id: &str,
        assignment_id: &str,
        now: DateTime<Utc>,
    ) -> Result<AssignmentAnalysis, CoreError> {
        let records = store.fetch_session_history(writer_id, assignment_id)?;
        let profile = store.fetch_writer_profile(writer_id)?;
        let subject = AlertSubject::new(writer_id, assignment_id);

        let analysis = self.analyze(&subject, &records, profile.as_ref(), now);
        log::info!(
            "analyzed {} sessions for writer {} on {}: {} pattern",
            analysis.insights.session_count,
            writer_id,
            assignment_id,
            analysis.insights.dominant_pattern.pattern.as_str()
        );
        Ok(analysis)
    }

    /// Record whether the writer accepted an intervention
    pub fn record_response<L: InterventionLog>(
        &self,
        log: &mut L,
        intervention_id: &str,
        writer_id: &str,
        assignment_id: &str,
        accepted: bool,
        action_taken: Option<&str>,
    ) -> Result<(), CoreError> {
        log.log_intervention_response(
            intervention_id,
            writer_id,
            assignment_id,
            accepted,
            action_taken,
        )?;
        log::debug!(
            "recorded response to {}: {}",
            intervention_id,
            if accepted { "accepted" } else { "dismissed" }
        );
        Ok(())
    }

    /// Deliver alerts to one educator in priority order. Returns how many
    /// were handed over.
    pub fn deliver_alerts<D: AlertDelivery>(
        &self,
        sink: &mut D,
        alerts: Vec<EducatorAlert>,
        educator_id: &str,
    ) -> Result<usize, CoreError> {
        let queue = compose_queue(alerts);
        for alert in &queue {
            sink.deliver_alert(alert, educator_id)?;
        }
        if !queue.is_empty() {
            log::info!("delivered {} alerts to educator {}", queue.len(), educator_id);
        }
        Ok(queue.len())
    }
}
