use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use inspection_engine::config::AppConfig;
use inspection_engine::error::AppError;
use inspection_engine::telemetry;
use inspection_engine::workflows::inspection::checklist::{
    inspection_router, ChecklistResponse, ChecklistSnapshot, InspectionService, InspectionSession,
    QuestionCatalog, QuestionId,
};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

mod infra;

#[derive(Clone)]
struct AppState {
    readiness: Arc<AtomicBool>,
}

#[derive(Parser, Debug)]
#[command(
    name = "Municipal Inspection Engine",
    about = "Run the compliance evaluation and recommendation engine from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Offline checklist tooling for demos and spot checks
    Checklist {
        #[command(subcommand)]
        command: ChecklistCommand,
    },
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Subcommand, Debug)]
enum ChecklistCommand {
    /// Replay a recorded session from JSON and print the derived outcome
    Evaluate(EvaluateArgs),
}

#[derive(Args, Debug)]
struct EvaluateArgs {
    /// Recorded session (catalog, responses, conditional fields, flags)
    #[arg(long)]
    input: PathBuf,
    /// Evaluation date (YYYY-MM-DD, defaults to today)
    #[arg(long, value_parser = parse_date)]
    today: Option<NaiveDate>,
}

/// On-disk shape accepted by `checklist evaluate`.
#[derive(Debug, Deserialize)]
struct RecordedSession {
    catalog: QuestionCatalog,
    #[serde(default)]
    responses: Vec<ChecklistResponse>,
    #[serde(default)]
    conditional_fields: BTreeMap<QuestionId, BTreeMap<String, String>>,
    #[serde(default)]
    expired_flags: BTreeMap<QuestionId, bool>,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => run_server(args).await,
        Command::Checklist {
            command: ChecklistCommand::Evaluate(args),
        } => run_checklist_evaluate(args),
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

async fn run_server(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let repository = Arc::new(infra::InMemorySessions::default());
    let gateway = Arc::new(infra::RecordKeeperStub::default());
    let service = Arc::new(InspectionService::new(repository, gateway));

    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
    };

    let app = Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .with_state(state)
        .merge(inspection_router(service));

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "inspection engine ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn run_checklist_evaluate(args: EvaluateArgs) -> Result<(), AppError> {
    let raw = std::fs::read_to_string(&args.input)?;
    let recorded: RecordedSession =
        serde_json::from_str(&raw).map_err(|err| AppError::InvalidInput(err.to_string()))?;

    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let session = replay_session(recorded);
    let snapshot = session.snapshot(today);

    render_snapshot(&snapshot, today);
    Ok(())
}

/// Rebuild a session by replaying the recorded edits through the engine, so
/// the printed outcome reflects exactly what the live mutations derive.
fn replay_session(recorded: RecordedSession) -> InspectionSession {
    let mut session = InspectionSession::new(recorded.catalog);

    for response in recorded.responses {
        session.set_response(&response.question_id, &response.response);
        if !response.notes.is_empty() {
            session.set_notes(&response.question_id, &response.notes);
        }
        if !response.remarks.is_empty() {
            session.set_remarks(&response.question_id, &response.remarks);
        }
    }

    for (question_id, fields) in recorded.conditional_fields {
        for (name, value) in fields {
            session.set_field(&question_id, &name, &value);
        }
    }

    for (question_id, expired) in recorded.expired_flags {
        session.set_expired_flag(&question_id, expired);
    }

    session
}

fn render_snapshot(snapshot: &ChecklistSnapshot, today: NaiveDate) {
    println!("Inspection checklist evaluation (as of {today})");
    println!("Compliance status: {}", snapshot.verdict.label());
    println!(
        "Progress: {}/{} answered ({}%)",
        snapshot.progress.answered, snapshot.progress.total, snapshot.progress.percentage
    );

    if snapshot.recommendations.is_empty() {
        println!("\nRecommendations: none");
    } else {
        println!("\nRecommendations");
        for recommendation in &snapshot.recommendations {
            println!(
                "- [{}] {} ({})",
                recommendation.kind.label(),
                recommendation.message,
                recommendation.action.label()
            );
        }
    }

    if snapshot.expiring_documents.is_empty() {
        println!("\nExpiring documents: none");
    } else {
        println!("\nExpiring documents");
        for (question_id, expiry) in &snapshot.expiring_documents {
            println!(
                "- question {}: {} expires {} ({} day(s) left)",
                question_id.0, expiry.field_name, expiry.expires_on, expiry.days_until
            );
        }
    }
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}
