//! Educator alert types

use crate::process::WritingPatternType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    CognitiveOverload,
    WritingStruggle,
    PatternChange,
    Breakthrough,
    DeadlineRisk,
    SupportRequest,
}

/// Ordered low < medium < high < urgent
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertPriority {
    Low,
    Medium,
    High,
    Urgent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertCategory {
    ImmediateAttention,
    AcademicSupport,
    ProgressMonitoring,
    PositiveReinforcement,
}

/// Writer and assignment an alert is about
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AlertSubject {
    pub writer_id: String,
    pub assignment_id: String,
}

impl AlertSubject {
    pub fn new(writer_id: impl Into<String>, assignment_id: impl Into<String>) -> Self {
        Self {
            writer_id: writer_id.into(),
            assignment_id: assignment_id.into(),
        }
    }
}

/// A candidate alert for the supervising educator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EducatorAlert {
    pub id: String,
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    pub priority: AlertPriority,
    pub category: AlertCategory,
    pub subject: AlertSubject,
    pub message: String,
    /// Structured detail for the delivery layer
    pub data: Value,
    pub action_items: Vec<String>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl EducatorAlert {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map_or(false, |at| now >= at)
    }
}

/// Externally detected events that become alerts as-is
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "trigger", rename_all = "snake_case")]
pub enum AlertTrigger {
    PatternChange {
        previous: WritingPatternType,
        current: WritingPatternType,
    },
    Breakthrough {
        description: String,
    },
    DeadlineRisk {
        deadline: DateTime<Utc>,
        /// 0-100
        completion_percent: f64,
    },
    SupportRequest {
        message: String,
    },
}
