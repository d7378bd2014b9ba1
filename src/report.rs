//! Report encoding
//!
//! Wraps assessments and assignment analyses in a JSON envelope that records
//! who produced them and when.

use crate::error::CoreError;
use crate::pipeline::{AssignmentAnalysis, SessionAssessment};
use crate::{ENGINE_VERSION, PRODUCER_NAME};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Current report format version
pub const REPORT_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportProducer {
    pub name: String,
    pub version: String,
    pub instance_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    SessionAssessment,
    AssignmentAnalysis,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report<T> {
    pub report_version: String,
    pub kind: ReportKind,
    pub producer: ReportProducer,
    pub computed_at_utc: String,
    pub body: T,
}

/// Encoder for report envelopes
pub struct ReportEncoder {
    instance_id: String,
}

impl Default for ReportEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportEncoder {
    /// Create a new encoder with a unique instance ID
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create an encoder with a specific instance ID
    pub fn with_instance_id(instance_id: String) -> Self {
        Self { instance_id }
    }

    fn envelope<T>(&self, kind: ReportKind, body: T, computed_at: DateTime<Utc>) -> Report<T> {
        Report {
            report_version: REPORT_VERSION.to_string(),
            kind,
            producer: ReportProducer {
                name: PRODUCER_NAME.to_string(),
                version: ENGINE_VERSION.to_string(),
                instance_id: self.instance_id.clone(),
            },
            computed_at_utc: computed_at.to_rfc3339(),
            body,
        }
    }

    pub fn encode_assessment<'a>(
        &self,
        assessment: &'a SessionAssessment,
        computed_at: DateTime<Utc>,
    ) -> Report<&'a SessionAssessment> {
        self.envelope(ReportKind::SessionAssessment, assessment, computed_at)
    }

    pub fn encode_analysis<'a>(
        &self,
        analysis: &'a AssignmentAnalysis,
        computed_at: DateTime<Utc>,
    ) -> Report<&'a AssignmentAnalysis> {
        self.envelope(ReportKind::AssignmentAnalysis, analysis, computed_at)
    }

    /// Encode an assessment to a JSON string
    pub fn assessment_to_json(
        &self,
        assessment: &SessionAssessment,
        computed_at: DateTime<Utc>,
    ) -> Result<String, CoreError> {
        let report = self.encode_assessment(assessment, computed_at);
        serde_json::to_string_pretty(&report).map_err(CoreError::JsonError)
    }

    /// Encode an analysis to a JSON string
    pub fn analysis_to_json(
        &self,
        analysis: &AssignmentAnalysis,
        computed_at: DateTime<Utc>,
    ) -> Result<String, CoreError> {
        let report = self.encode_analysis(analysis, computed_at);
        serde_json::to_string_pretty(&report).map_err(CoreError::JsonError)
    }
}
