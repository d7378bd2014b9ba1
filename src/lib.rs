//! Draftpulse - Cognitive-load and writing-process engine for writing tutors
//!
//! Draftpulse turns editor telemetry into behavioral indicators, classifies
//! the writer's cognitive load, decides whether a supportive nudge is
//! warranted, and summarizes a writer's process across an assignment:
//! telemetry → signal extraction → load classification → intervention
//! decision / process analysis → educator alerts.
//!
//! ## Modules
//!
//! - **Live assessment**: [`telemetry`], [`load`], [`intervention`]
//! - **Assignment analysis**: [`process`]
//! - **Educator alerts**: [`alerts`]
//! - **Integration**: [`collaborators`], [`ledger`], [`pipeline`], [`report`]

pub mod alerts;
pub mod collaborators;
pub mod config;
pub mod error;
pub mod intervention;
pub mod ledger;
pub mod load;
pub mod pipeline;
pub mod process;
pub mod report;
pub mod telemetry;

pub use alerts::{AlertComposer, AlertTrigger, EducatorAlert};
pub use collaborators::{AlertDelivery, InterventionLog, WritingDataSource};
pub use config::EngineConfig;
pub use error::CoreError;
pub use intervention::{DecisionEngine, Intervention, InterventionDecision, InterventionHistory};
pub use ledger::InMemoryLedger;
pub use load::{LoadClassifier, LoadEstimate, LoadLevel, WriterProfileSnapshot};
pub use pipeline::{AssignmentAnalysis, SessionAssessment, SessionContext, WritingMonitor};
pub use process::{ProcessAnalyzer, WritingProcessInsights, WritingStage};
pub use report::ReportEncoder;
pub use telemetry::{BehavioralIndicators, SignalExtractor, TelemetryRecord};

/// Engine version embedded in all reports
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for reports
pub const PRODUCER_NAME: &str = "draftpulse";
