//! Draftpulse CLI - Command-line interface for Draftpulse
//!
//! Commands:
//! - assess: Assess one writing session (load estimate, nudge decision, alert)
//! - analyze: Analyze all sessions of an assignment
//! - config: Print the effective engine configuration
//! - doctor: Diagnose configuration and ledger files

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use draftpulse::alerts::AlertSubject;
use draftpulse::telemetry::{parse_array, parse_ndjson, parse_record};
use draftpulse::{
    CoreError, EngineConfig, InMemoryLedger, InterventionHistory, ReportEncoder, SessionContext,
    WriterProfileSnapshot, WritingMonitor, WritingStage, ENGINE_VERSION, PRODUCER_NAME,
};

/// Draftpulse - cognitive-load and writing-process engine
#[derive(Parser)]
#[command(name = "draftpulse")]
#[command(version = ENGINE_VERSION)]
#[command(about = "Assess writing sessions and analyze writing processes", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Assess one writing session
    Assess {
        /// Telemetry record JSON (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Writer profile snapshot JSON
        #[arg(long)]
        profile: Option<PathBuf>,

        /// Intervention history snapshot JSON (ignored with --ledger)
        #[arg(long)]
        history: Option<PathBuf>,

        /// Ledger file; read for profile/history and updated with deliveries
        #[arg(long)]
        ledger: Option<PathBuf>,

        /// Engine configuration JSON
        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(long, default_value = "writer")]
        writer_id: String,

        #[arg(long, default_value = "assignment")]
        assignment_id: String,

        #[arg(long, default_value = "document")]
        document_id: String,

        /// Current writing stage
        #[arg(long, value_enum, default_value = "drafting")]
        stage: StageArg,

        /// Evaluation time (RFC 3339); defaults to the current time
        #[arg(long)]
        now: Option<String>,
    },

    /// Analyze all sessions of an assignment
    Analyze {
        /// Telemetry records (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Input format
        #[arg(long, default_value = "ndjson")]
        input_format: InputFormat,

        /// Writer profile snapshot JSON
        #[arg(long)]
        profile: Option<PathBuf>,

        /// Engine configuration JSON
        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(long, default_value = "writer")]
        writer_id: String,

        #[arg(long, default_value = "assignment")]
        assignment_id: String,

        /// Evaluation time (RFC 3339); defaults to the current time
        #[arg(long)]
        now: Option<String>,
    },

    /// Print the effective engine configuration
    Config {
        /// Configuration file to validate and print; defaults otherwise
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Diagnose configuration and ledger files
    Doctor {
        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(long)]
        ledger: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, ValueEnum)]
enum InputFormat {
    /// Newline-delimited JSON (one record per line)
    Ndjson,
    /// JSON array of records
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum StageArg {
    Planning,
    Drafting,
    Revising,
    Editing,
    Polishing,
}

impl From<StageArg> for WritingStage {
    fn from(stage: StageArg) -> Self {
        match stage {
            StageArg::Planning => WritingStage::Planning,
            StageArg::Drafting => WritingStage::Drafting,
            StageArg::Revising => WritingStage::Revising,
            StageArg::Editing => WritingStage::Editing,
            StageArg::Polishing => WritingStage::Polishing,
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e)).unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), DraftpulseCliError> {
    match cli.command {
        Commands::Assess {
            input,
            output,
            profile,
            history,
            ledger,
            config,
            writer_id,
            assignment_id,
            document_id,
            stage,
            now,
        } => {
            let context =
                SessionContext::new(writer_id, assignment_id, document_id).with_stage(stage.into());
            cmd_assess(
                &input,
                &output,
                profile.as_deref(),
                history.as_deref(),
                ledger.as_deref(),
                config.as_deref(),
                &context,
                now.as_deref(),
            )
        }

        Commands::Analyze {
            input,
            output,
            input_format,
            profile,
            config,
            writer_id,
            assignment_id,
            now,
        } => cmd_analyze(
            &input,
            &output,
            input_format,
            profile.as_deref(),
            config.as_deref(),
            AlertSubject::new(writer_id, assignment_id),
            now.as_deref(),
        ),

        Commands::Config { config } => {
            let config = load_config(config.as_deref())?;
            println!("{}", config.to_json()?);
            Ok(())
        }

        Commands::Doctor {
            config,
            ledger,
            json,
        } => cmd_doctor(config.as_deref(), ledger.as_deref(), json),
    }
}

#[allow(clippy::too_many_arguments)]
fn cmd_assess(
    input: &Path,
    output: &Path,
    profile: Option<&Path>,
    history: Option<&Path>,
    ledger: Option<&Path>,
    config: Option<&Path>,
    context: &SessionContext,
    now: Option<&str>,
) -> Result<(), DraftpulseCliError> {
    let now = parse_now(now)?;
    let monitor = WritingMonitor::new(load_config(config)?);
    let record = parse_record(&read_input(input)?)?;

    let assessment = match ledger {
        Some(ledger_path) => {
            let mut store = if ledger_path.exists() {
                InMemoryLedger::from_json(&fs::read_to_string(ledger_path)?)?
            } else {
                InMemoryLedger::default()
            };
            if let Some(profile) = load_profile(profile)? {
                store.set_profile(context.writer_id.clone(), profile);
            }
            let assessment = monitor.assess_session(&mut store, context, &record, None, now)?;
            fs::write(ledger_path, store.to_json()?)?;
            assessment
        }
        None => {
            let profile = load_profile(profile)?;
            let history = match history {
                Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
                None => InterventionHistory::default(),
            };
            monitor.assess(context, &record, None, profile.as_ref(), &history, now)
        }
    };

    let json = ReportEncoder::new().assessment_to_json(&assessment, now)?;
    write_output(output, &json)
}

fn cmd_analyze(
    input: &Path,
    output: &Path,
    input_format: InputFormat,
    profile: Option<&Path>,
    config: Option<&Path>,
    subject: AlertSubject,
    now: Option<&str>,
) -> Result<(), DraftpulseCliError> {
    let now = parse_now(now)?;
    let monitor = WritingMonitor::new(load_config(config)?);

    let input_data = read_input(input)?;
    let records = match input_format {
        InputFormat::Ndjson => parse_ndjson(&input_data)?,
        InputFormat::Json => parse_array(&input_data)?,
    };
    if records.is_empty() {
        log::warn!("no telemetry records in input; reporting default insights");
    }

    let profile = load_profile(profile)?;
    let analysis = monitor.analyze(&subject, &records, profile.as_ref(), now);

    let json = ReportEncoder::new().analysis_to_json(&analysis, now)?;
    write_output(output, &json)
}

fn cmd_doctor(
    config: Option<&Path>,
    ledger: Option<&Path>,
    json: bool,
) -> Result<(), DraftpulseCliError> {
    let mut checks: Vec<DoctorCheck> = Vec::new();

    checks.push(DoctorCheck {
        name: "engine_version".to_string(),
        status: CheckStatus::Ok,
        message: format!("Draftpulse version {}", ENGINE_VERSION),
    });

    // Check configuration
    checks.push(match config {
        None => DoctorCheck {
            name: "config".to_string(),
            status: CheckStatus::Ok,
            message: "Using default configuration".to_string(),
        },
        Some(path) => match load_config(Some(path)) {
            Ok(_) => DoctorCheck {
                name: "config".to_string(),
                status: CheckStatus::Ok,
                message: format!("Configuration valid: {}", path.display()),
            },
            Err(e) => DoctorCheck {
                name: "config".to_string(),
                status: CheckStatus::Error,
                message: format!("Invalid configuration: {}", CliError::from(e).message),
            },
        },
    });

    // Check ledger file if provided
    if let Some(path) = ledger {
        let check = if !path.exists() {
            DoctorCheck {
                name: "ledger".to_string(),
                status: CheckStatus::Warning,
                message: "Ledger file does not exist; it will be created on first assess".to_string(),
            }
        } else {
            match fs::read_to_string(path).map(|content| InMemoryLedger::from_json(&content)) {
                Ok(Ok(store)) => DoctorCheck {
                    name: "ledger".to_string(),
                    status: CheckStatus::Ok,
                    message: format!(
                        "Ledger loaded ({} logged interventions)",
                        store.interventions().count()
                    ),
                },
                Ok(Err(e)) => DoctorCheck {
                    name: "ledger".to_string(),
                    status: CheckStatus::Error,
                    message: format!("Invalid ledger JSON: {}", e),
                },
                Err(e) => DoctorCheck {
                    name: "ledger".to_string(),
                    status: CheckStatus::Error,
                    message: format!("Cannot read ledger file: {}", e),
                },
            }
        };
        checks.push(check);
    }

    // Check stdin is available (for piped input)
    let stdin_check = if atty::is(atty::Stream::Stdin) {
        DoctorCheck {
            name: "stdin".to_string(),
            status: CheckStatus::Ok,
            message: "stdin is a TTY (interactive mode)".to_string(),
        }
    } else {
        DoctorCheck {
            name: "stdin".to_string(),
            status: CheckStatus::Ok,
            message: "stdin is a pipe (ready for --input -)".to_string(),
        }
    };
    checks.push(stdin_check);

    let report = DoctorReport {
        producer: PRODUCER_NAME.to_string(),
        version: ENGINE_VERSION.to_string(),
        checks,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Draftpulse Doctor Report");
        println!("========================");
        println!("Producer: {}", report.producer);
        println!("Version:  {}", report.version);
        println!("\nChecks:");
        for check in &report.checks {
            let status_icon = match check.status {
                CheckStatus::Ok => "[OK]",
                CheckStatus::Warning => "[WARN]",
                CheckStatus::Error => "[ERR]",
            };
            println!("  {} {}: {}", status_icon, check.name, check.message);
        }
    }

    let has_errors = report.checks.iter().any(|c| matches!(c.status, CheckStatus::Error));
    if has_errors {
        Err(DraftpulseCliError::DoctorFailed)
    } else {
        Ok(())
    }
}

// Helpers

fn read_input(input: &Path) -> Result<String, DraftpulseCliError> {
    if input.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(input)?)
    }
}

fn write_output(output: &Path, data: &str) -> Result<(), DraftpulseCliError> {
    if output.to_string_lossy() == "-" {
        println!("{}", data);
    } else {
        fs::write(output, data)?;
    }
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig, DraftpulseCliError> {
    match path {
        Some(path) => Ok(EngineConfig::from_json(&fs::read_to_string(path)?)?),
        None => Ok(EngineConfig::default()),
    }
}

/// Malformed profiles degrade to "no profile" rather than failing
fn load_profile(path: Option<&Path>) -> Result<Option<WriterProfileSnapshot>, DraftpulseCliError> {
    let Some(path) = path else {
        return Ok(None);
    };
    let profile = WriterProfileSnapshot::from_json_lenient(&fs::read_to_string(path)?);
    if profile.is_none() {
        log::warn!("ignoring malformed profile {}", path.display());
    }
    Ok(profile)
}

fn parse_now(now: Option<&str>) -> Result<DateTime<Utc>, DraftpulseCliError> {
    match now {
        Some(value) => DateTime::parse_from_rfc3339(value)
            .map(|t| t.with_timezone(&Utc))
            .map_err(|e| DraftpulseCliError::InvalidTime(format!("{}: {}", value, e))),
        None => Ok(Utc::now()),
    }
}

// Error types

#[derive(Debug)]
enum DraftpulseCliError {
    Io(io::Error),
    Core(CoreError),
    Json(serde_json::Error),
    InvalidTime(String),
    DoctorFailed,
}

impl From<io::Error> for DraftpulseCliError {
    fn from(e: io::Error) -> Self {
        DraftpulseCliError::Io(e)
    }
}

impl From<CoreError> for DraftpulseCliError {
    fn from(e: CoreError) -> Self {
        DraftpulseCliError::Core(e)
    }
}

impl From<serde_json::Error> for DraftpulseCliError {
    fn from(e: serde_json::Error) -> Self {
        DraftpulseCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    hint: Option<String>,
}

impl From<DraftpulseCliError> for CliError {
    fn from(e: DraftpulseCliError) -> Self {
        match e {
            DraftpulseCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            DraftpulseCliError::Core(e) => {
                let (code, hint) = match &e {
                    CoreError::NotFound { .. } => ("NOT_FOUND", "Check the writer, assignment and intervention ids"),
                    CoreError::ParseError(_) => ("PARSE_ERROR", "Ensure input contains telemetry records"),
                    CoreError::JsonError(_) => ("JSON_ERROR", "Check JSON syntax"),
                    CoreError::InvalidConfig(_) => ("INVALID_CONFIG", "Run 'draftpulse config' for a valid template"),
                    CoreError::Collaborator(_) => ("COLLABORATOR_ERROR", "Check the ledger file"),
                };
                CliError {
                    code: code.to_string(),
                    message: e.to_string(),
                    hint: Some(hint.to_string()),
                }
            }
            DraftpulseCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            DraftpulseCliError::InvalidTime(msg) => CliError {
                code: "INVALID_TIME".to_string(),
                message: msg,
                hint: Some("Use RFC 3339, e.g. 2024-03-04T15:00:00Z".to_string()),
            },
            DraftpulseCliError::DoctorFailed => CliError {
                code: "DOCTOR_FAILED".to_string(),
                message: "One or more checks failed".to_string(),
                hint: Some("Review the doctor report for details".to_string()),
            },
        }
    }
}

#[derive(serde::Serialize)]
struct DoctorReport {
    producer: String,
    version: String,
    checks: Vec<DoctorCheck>,
}

#[derive(serde::Serialize)]
struct DoctorCheck {
    name: String,
    status: CheckStatus,
    message: String,
}

#[derive(serde::Serialize)]
enum CheckStatus {
    Ok,
    Warning,
    Error,
}
