//! External collaborators
//!
//! The core never performs I/O itself. Profile and history lookups happen
//! through [`WritingDataSource`] before a computation; delivery and response
//! logging through [`InterventionLog`] and alert hand-off through
//! [`AlertDelivery`] happen after it.

use crate::alerts::EducatorAlert;
use crate::error::CoreError;
use crate::intervention::{Intervention, InterventionHistory};
use crate::load::WriterProfileSnapshot;
use crate::telemetry::TelemetryRecord;
use chrono::{DateTime, Utc};

/// Read-only lookups the core depends on
pub trait WritingDataSource {
    /// Profile snapshot for a writer, `None` when the writer has no profile
    fn fetch_writer_profile(
        &self,
        writer_id: &str,
    ) -> Result<Option<WriterProfileSnapshot>, CoreError>;

    /// History for one writer and assignment as of `now`, counting
    /// deliveries in the trailing `window_minutes` toward the hourly cap
    fn fetch_intervention_history(
        &self,
        writer_id: &str,
        assignment_id: &str,
        window_minutes: i64,
        now: DateTime<Utc>,
    ) -> Result<InterventionHistory, CoreError>;

    /// All recorded sessions for one assignment, in start order. Empty when
    /// nothing has been recorded yet.
    fn fetch_session_history(
        &self,
        writer_id: &str,
        assignment_id: &str,
    ) -> Result<Vec<TelemetryRecord>, CoreError>;
}

/// Append-only log of interventions and the writer's responses.
///
/// Deliveries must be logged before the next decision for the same writer,
/// since rate limiting is derived entirely from this history.
pub trait InterventionLog {
    fn log_intervention_delivery(
        &mut self,
        intervention: &Intervention,
        writer_id: &str,
        assignment_id: &str,
        document_id: &str,
    ) -> Result<(), CoreError>;

    /// Fails with [`CoreError::NotFound`] for an intervention that was never
    /// delivered to this writer and assignment
    fn log_intervention_response(
        &mut self,
        intervention_id: &str,
        writer_id: &str,
        assignment_id: &str,
        accepted: bool,
        action_taken: Option<&str>,
    ) -> Result<(), CoreError>;
}

/// Hands alerts to whatever notifies educators
pub trait AlertDelivery {
    fn deliver_alert(&mut self, alert: &EducatorAlert, educator_id: &str) -> Result<(), CoreError>;
}
