use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use axum_prometheus::PrometheusMetricLayer;
use chrono::{Local, Utc};
use clap::{Args, Parser, Subcommand};
use evidly_audit::config::AppConfig;
use evidly_audit::error::AppError;
use evidly_audit::telemetry;
use evidly_audit::workflows::audit::{
    demo, AuditChecklist, AuditError, AuditResults, AuditWorkflow, FileDraftStore, HistoryRecord,
    ItemVerdict, MemoryDraftStore, Severity,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Deserialize;
use serde_json::json;
use std::fs::File;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
struct AppState {
    readiness: Arc<AtomicBool>,
    metrics: PrometheusHandle,
}

#[derive(Parser, Debug)]
#[command(
    name = "Evidly Self-Audit Engine",
    about = "Run the self-audit engine as a service or drive it from the command line",
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
    /// Inspect or demo the self-audit walkthrough
    Audit {
        #[command(subcommand)]
        command: AuditCommand,
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
enum AuditCommand {
    /// Print the canonical checklist sections and items
    Checklist,
    /// Report the resumable draft at the configured draft path, if any
    Status,
    /// Run a seeded demo audit and print the results and trend
    Demo(DemoArgs),
}

#[derive(Args, Debug)]
struct DemoArgs {
    /// Auditor name recorded on the demo history entry
    #[arg(long, default_value = "Demo Auditor")]
    auditor: String,
    /// Write the corrective-action plan to a CSV file
    #[arg(long)]
    csv_out: Option<PathBuf>,
    /// Include the full failed-item listing in the output
    #[arg(long)]
    list_failures: bool,
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
        Command::Audit {
            command: AuditCommand::Checklist,
        } => {
            run_checklist();
            Ok(())
        }
        Command::Audit {
            command: AuditCommand::Status,
        } => run_audit_status(),
        Command::Audit {
            command: AuditCommand::Demo(args),
        } => run_audit_demo(args),
    }
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

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: prometheus_handle,
    };

    let app = Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/audit/report", post(audit_report_endpoint))
        .layer(prometheus_layer)
        .with_state(state);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "self-audit engine ready");

    axum::serve(listener, app).await?;
    Ok(())
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

async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[derive(Debug, Deserialize)]
struct AuditReportRequest {
    answers: Vec<AnswerInput>,
    /// Score only the answered subset instead of requiring a complete audit.
    #[serde(default)]
    allow_partial: bool,
}

#[derive(Debug, Deserialize)]
struct AnswerInput {
    /// Stable checklist item id, e.g. `s0-i2`.
    item: String,
    verdict: ItemVerdict,
    #[serde(default)]
    severity: Option<Severity>,
    #[serde(default)]
    notes: Option<String>,
    #[serde(default)]
    evidence: Vec<String>,
}

/// Replay a submitted answer set through a fresh walkthrough and return the
/// finalized results payload. Stateless: nothing is persisted server-side.
async fn audit_report_endpoint(
    Json(payload): Json<AuditReportRequest>,
) -> Result<Json<AuditResults>, AppError> {
    let AuditReportRequest {
        answers,
        allow_partial,
    } = payload;

    let checklist = AuditChecklist::standard();
    let mut workflow = AuditWorkflow::new(MemoryDraftStore::new());
    let now = Utc::now();
    workflow.start(now);

    for answer in answers {
        let (section, item) = checklist
            .locate(&answer.item)
            .ok_or(AuditError::UnknownItem(answer.item.clone()))?;
        workflow.set_status(section, item, answer.verdict)?;

        if answer.verdict == ItemVerdict::Fail {
            if let Some(severity) = answer.severity {
                workflow.set_severity(section, item, severity)?;
            }
            if let Some(notes) = answer.notes {
                workflow.set_notes(section, item, notes)?;
            }
            for reference in answer.evidence {
                workflow.attach_evidence(section, item, reference)?;
            }
        }
    }

    let results = if allow_partial {
        workflow.finish_early(Utc::now())?
    } else {
        workflow.finish(Utc::now())?
    };

    Ok(Json(results))
}

fn run_checklist() {
    let checklist = AuditChecklist::standard();
    println!(
        "Self-inspection checklist: {} sections, {} items",
        checklist.section_count(),
        checklist.total_items()
    );

    for section in checklist.sections() {
        println!(
            "\nSection {}: {} ({})",
            section.id + 1,
            section.name,
            section.citation
        );
        for item in &section.items {
            println!("- [{}] {}", item.id, item.text);
        }
    }
}

fn run_audit_status() -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let draft_path = config.audit.draft_path;
    let mut workflow = AuditWorkflow::new(FileDraftStore::new(&draft_path));

    if !workflow.has_draft() {
        println!("No saved draft at {}", draft_path.display());
        return Ok(());
    }

    workflow.resume(Utc::now())?;
    let progress = workflow
        .progress()
        .ok_or(AuditError::NoActiveSession)?;

    println!("Saved draft at {}", draft_path.display());
    println!(
        "Progress: {}/{} items answered ({}%), {} of {} sections complete",
        progress.answered,
        progress.total,
        progress.percent_complete,
        progress.completed_sections,
        progress.section_count
    );
    println!(
        "Current section: {} of {}; live score {}%",
        progress.current_section + 1,
        progress.section_count,
        progress.live_score
    );
    Ok(())
}

fn run_audit_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        auditor,
        csv_out,
        list_failures,
    } = args;

    let now = Utc::now();
    let session = demo::demo_session(now);
    let results = AuditResults::from_session(&session, now);

    println!("Self-audit demo walkthrough");
    println!(
        "Overall score: {}% ({}) — {} failed of {} scored items",
        results.score,
        results.band.label(),
        results.failed_items,
        results.scored_items
    );

    println!("\nScore by section");
    for entry in &results.section_scores {
        println!("- {}: {}% ({})", entry.name, entry.score, entry.band.label());
    }

    if list_failures {
        println!("\nFailed items");
        for failure in results.failures() {
            println!(
                "- [{}] {} ({}): {}",
                failure.severity_label, failure.text, failure.section, failure.notes
            );
        }
    }

    if results.action_plan.is_empty() {
        println!("\nCorrective action plan: nothing to correct");
    } else {
        println!("\nCorrective action plan");
        for (index, action) in results.action_plan.iter().enumerate() {
            println!("{}. {}", index + 1, action);
        }
    }

    let mut history = demo::demo_history();
    let today = Local::now().date_naive();
    let record_id = format!("h{}", history.records().len() + 1);
    history.push(HistoryRecord::from_session(record_id, &session, auditor, today));

    if let Some(trend) = history.trend() {
        println!(
            "\nTrend across {} audits: {}% -> {}% ({}{})",
            trend.audits,
            trend.earliest,
            trend.latest,
            if trend.delta >= 0 { "+" } else { "" },
            trend.delta
        );
    }

    if let Some(path) = csv_out {
        let file = File::create(&path)?;
        results.write_action_plan_csv(file)?;
        println!("\nCorrective-action plan written to {}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answer(item: &str, verdict: ItemVerdict) -> AnswerInput {
        AnswerInput {
            item: item.to_string(),
            verdict,
            severity: None,
            notes: None,
            evidence: Vec::new(),
        }
    }

    fn full_answer_set() -> Vec<AnswerInput> {
        let checklist = AuditChecklist::standard();
        checklist
            .sections()
            .iter()
            .flat_map(|section| section.items.iter())
            .map(|item| answer(&item.id, ItemVerdict::Pass))
            .collect()
    }

    #[tokio::test]
    async fn report_endpoint_scores_complete_submission() {
        let request = AuditReportRequest {
            answers: full_answer_set(),
            allow_partial: false,
        };

        let Json(body) = audit_report_endpoint(Json(request))
            .await
            .expect("complete submission finalizes");

        assert_eq!(body.score, 100);
        assert_eq!(body.failed_items, 0);
        assert_eq!(body.section_scores.len(), 7);
    }

    #[tokio::test]
    async fn report_endpoint_rejects_incomplete_submission() {
        let mut answers = full_answer_set();
        answers.truncate(answers.len() - 3);
        let request = AuditReportRequest {
            answers,
            allow_partial: false,
        };

        let err = audit_report_endpoint(Json(request))
            .await
            .expect_err("incomplete submission rejected");

        match err {
            AppError::Audit(AuditError::Unanswered(count)) => assert_eq!(count, 3),
            other => panic!("expected unanswered error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn report_endpoint_allows_partial_scoring() {
        let mut fail = answer("s0-i0", ItemVerdict::Fail);
        fail.severity = Some(Severity::Major);
        fail.notes = Some("Walk-in at 45°F".to_string());
        let request = AuditReportRequest {
            answers: vec![answer("s0-i1", ItemVerdict::Pass), fail],
            allow_partial: true,
        };

        let Json(body) = audit_report_endpoint(Json(request))
            .await
            .expect("partial submission allowed");

        // Two scored items, one major fail: round(100 * (20 - 5) / 20).
        assert_eq!(body.score, 75);
        assert_eq!(body.scored_items, 2);
        assert_eq!(body.failed_items, 1);
    }

    #[tokio::test]
    async fn report_endpoint_rejects_unknown_item() {
        let request = AuditReportRequest {
            answers: vec![answer("s9-i9", ItemVerdict::Pass)],
            allow_partial: true,
        };

        let err = audit_report_endpoint(Json(request))
            .await
            .expect_err("unknown item rejected");

        match err {
            AppError::Audit(AuditError::UnknownItem(id)) => assert_eq!(id, "s9-i9"),
            other => panic!("expected unknown item error, got {other:?}"),
        }
    }
}
