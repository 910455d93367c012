//! Intel CLI - Command-line interface for Candidate Intel
//!
//! Commands:
//! - evaluate: Run the full pipeline on one request
//! - summarize: Summarize a raw telemetry session
//! - check: Run the consistency rules over a response set
//! - tiers: Print a tier table
//! - doctor: Diagnose configuration and environment

use clap::{Parser, Subcommand};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use candidate_intel::consistency::ConsistencyChecker;
use candidate_intel::scoring::algorithms;
use candidate_intel::telemetry::{SessionSummarizer, TelemetryAdapter};
use candidate_intel::{
    evaluate_json, AssessmentPipeline, PipelineConfig, ResponseSet, ScoringError, TierTable,
    VERSION,
};

/// Intel - Scoring pipeline for assessment responses and interaction telemetry
#[derive(Parser)]
#[command(name = "intel")]
#[command(version = VERSION)]
#[command(about = "Score assessment submissions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a request {config?, responses, session?, cohort?}
    Evaluate {
        /// Input file path (use - for stdin)
        #[arg(short, long, default_value = "-")]
        input: PathBuf,

        /// Pipeline config file, replaces the request's config
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Pretty-print the record
        #[arg(long)]
        pretty: bool,
    },

    /// Summarize a raw telemetry session envelope
    Summarize {
        /// Input file path (use - for stdin)
        #[arg(short, long, default_value = "-")]
        input: PathBuf,

        /// Pipeline config file (telemetry thresholds are used)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Pretty-print the summary
        #[arg(long)]
        pretty: bool,
    },

    /// Check a response set for contradictions
    Check {
        /// Input file path (use - for stdin)
        #[arg(short, long, default_value = "-")]
        input: PathBuf,

        /// Pretty-print the report
        #[arg(long)]
        pretty: bool,
    },

    /// Print the tier table of a vertical
    Tiers {
        /// Vertical preset (default, financial, hiring, retention)
        #[arg(long, default_value = "default")]
        vertical: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Diagnose configuration and environment
    Doctor {
        /// Check a pipeline config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("INTEL_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), IntelCliError> {
    match cli.command {
        Commands::Evaluate {
            input,
            config,
            pretty,
        } => cmd_evaluate(&input, config.as_deref(), pretty),
        Commands::Summarize {
            input,
            config,
            pretty,
        } => cmd_summarize(&input, config.as_deref(), pretty),
        Commands::Check { input, pretty } => cmd_check(&input, pretty),
        Commands::Tiers { vertical, json } => cmd_tiers(&vertical, json),
        Commands::Doctor { config, json } => cmd_doctor(config.as_deref(), json),
    }
}

fn cmd_evaluate(input: &Path, config: Option<&Path>, pretty: bool) -> Result<(), IntelCliError> {
    let input_data = read_input(input)?;
    if input_data.trim().is_empty() {
        return Err(IntelCliError::EmptyInput);
    }

    let request = match config {
        Some(path) => {
            let config = load_config(path)?;
            let mut request: serde_json::Value = serde_json::from_str(&input_data)?;
            match request.as_object_mut() {
                Some(obj) => {
                    obj.insert("config".to_string(), serde_json::to_value(config)?);
                }
                None => {
                    return Err(IntelCliError::ParseError(
                        "Request must be a JSON object".to_string(),
                    ))
                }
            }
            request.to_string()
        }
        None => input_data,
    };

    let record = evaluate_json(&request)?;
    if pretty {
        let value: serde_json::Value = serde_json::from_str(&record)?;
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("{}", record);
    }
    Ok(())
}

fn cmd_summarize(input: &Path, config: Option<&Path>, pretty: bool) -> Result<(), IntelCliError> {
    let input_data = read_input(input)?;
    if input_data.trim().is_empty() {
        return Err(IntelCliError::EmptyInput);
    }

    let telemetry = match config {
        Some(path) => load_config(path)?.telemetry,
        None => Default::default(),
    };
    let session = TelemetryAdapter::parse_session(&input_data)?;
    let summary = SessionSummarizer::new(telemetry)?.summarize(&session);

    print_json(&summary, pretty)
}

fn cmd_check(input: &Path, pretty: bool) -> Result<(), IntelCliError> {
    let input_data = read_input(input)?;
    if input_data.trim().is_empty() {
        return Err(IntelCliError::EmptyInput);
    }

    let responses = ResponseSet::from_json(&input_data)?;
    let report = ConsistencyChecker::new().check(&responses);

    print_json(&report, pretty)
}

fn cmd_tiers(vertical: &str, json: bool) -> Result<(), IntelCliError> {
    let table = TierTable::for_vertical(vertical)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&table)?);
    } else {
        println!("Tier table: {}", vertical);
        for tier in table.tiers() {
            println!("  {:>3}+  {}", tier.min, tier.name);
        }
    }
    Ok(())
}

fn cmd_doctor(config: Option<&Path>, json: bool) -> Result<(), IntelCliError> {
    let mut checks: Vec<DoctorCheck> = Vec::new();

    checks.push(DoctorCheck {
        name: "version".to_string(),
        status: CheckStatus::Ok,
        message: format!("Intel version {}", VERSION),
    });

    checks.push(DoctorCheck {
        name: "algorithms".to_string(),
        status: CheckStatus::Ok,
        message: format!(
            "Registered: {}",
            algorithms::ALGORITHMS
                .iter()
                .map(|a| format!("{} ({})", a.name, a.title))
                .collect::<Vec<_>>()
                .join(", ")
        ),
    });

    if let Some(path) = config {
        checks.push(check_config(path));
    }

    let stdin_check = if atty::is(atty::Stream::Stdin) {
        DoctorCheck {
            name: "stdin".to_string(),
            status: CheckStatus::Ok,
            message: "stdin is a TTY (pass --input to read a file)".to_string(),
        }
    } else {
        DoctorCheck {
            name: "stdin".to_string(),
            status: CheckStatus::Ok,
            message: "stdin is a pipe (ready to read requests)".to_string(),
        }
    };
    checks.push(stdin_check);

    let report = DoctorReport {
        version: VERSION.to_string(),
        checks,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Intel Doctor Report");
        println!("===================");
        println!("Version: {}", report.version);
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

    let has_errors = report
        .checks
        .iter()
        .any(|c| matches!(c.status, CheckStatus::Error));
    if has_errors {
        Err(IntelCliError::DoctorFailed)
    } else {
        Ok(())
    }
}

fn check_config(path: &Path) -> DoctorCheck {
    if !path.exists() {
        return DoctorCheck {
            name: "config".to_string(),
            status: CheckStatus::Warning,
            message: "Config file does not exist".to_string(),
        };
    }

    let (status, message) = match load_config(path) {
        Ok(config) => match AssessmentPipeline::new(config) {
            Ok(pipeline) => (
                CheckStatus::Ok,
                format!(
                    "Config valid ({}, {} tiers)",
                    pipeline.scorer().algorithm().title,
                    pipeline.scorer().tiers().tiers().len()
                ),
            ),
            Err(e) => (CheckStatus::Error, format!("Invalid configuration: {}", e)),
        },
        Err(e) => (CheckStatus::Error, format!("Cannot load config: {}", e)),
    };
    DoctorCheck {
        name: "config".to_string(),
        status,
        message,
    }
}

// Helper functions

fn read_input(input: &Path) -> Result<String, IntelCliError> {
    if input.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(input)?)
    }
}

/// Read and parse a config file; validation is left to the pipeline
fn load_config(path: &Path) -> Result<PipelineConfig, IntelCliError> {
    let content = fs::read_to_string(path)?;
    Ok(PipelineConfig::from_json(&content)?)
}

fn print_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<(), IntelCliError> {
    let output = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", output);
    Ok(())
}

// Error types

#[derive(Debug)]
enum IntelCliError {
    Io(io::Error),
    Scoring(ScoringError),
    Json(serde_json::Error),
    EmptyInput,
    DoctorFailed,
    ParseError(String),
}

impl std::fmt::Display for IntelCliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IntelCliError::Io(e) => write!(f, "{}", e),
            IntelCliError::Scoring(e) => write!(f, "{}", e),
            IntelCliError::Json(e) => write!(f, "{}", e),
            IntelCliError::EmptyInput => write!(f, "Input is empty"),
            IntelCliError::DoctorFailed => write!(f, "One or more health checks failed"),
            IntelCliError::ParseError(msg) => write!(f, "{}", msg),
        }
    }
}

impl From<io::Error> for IntelCliError {
    fn from(e: io::Error) -> Self {
        IntelCliError::Io(e)
    }
}

impl From<ScoringError> for IntelCliError {
    fn from(e: ScoringError) -> Self {
        IntelCliError::Scoring(e)
    }
}

impl From<serde_json::Error> for IntelCliError {
    fn from(e: serde_json::Error) -> Self {
        IntelCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<IntelCliError> for CliError {
    fn from(e: IntelCliError) -> Self {
        match e {
            IntelCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            IntelCliError::Scoring(e) if e.is_configuration() => CliError {
                code: "CONFIG_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Run 'intel doctor --config <file>' for details".to_string()),
            },
            IntelCliError::Scoring(e) => CliError {
                code: "PARSE_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check the request shape".to_string()),
            },
            IntelCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            IntelCliError::EmptyInput => CliError {
                code: "EMPTY_INPUT".to_string(),
                message: "No input provided".to_string(),
                hint: Some("Pass --input <file> or pipe JSON on stdin".to_string()),
            },
            IntelCliError::DoctorFailed => CliError {
                code: "DOCTOR_FAILED".to_string(),
                message: "One or more health checks failed".to_string(),
                hint: Some("Review the doctor report for details".to_string()),
            },
            IntelCliError::ParseError(msg) => CliError {
                code: "PARSE_ERROR".to_string(),
                message: msg,
                hint: Some("Check input format".to_string()),
            },
        }
    }
}

// Report types

#[derive(serde::Serialize)]
struct DoctorReport {
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
#[serde(rename_all = "lowercase")]
enum CheckStatus {
    Ok,
    Warning,
    Error,
}
