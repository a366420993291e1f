use std::io::Write;
use std::sync::Arc;

use aicomplyr_core::config::ComplianceConfig;
use aicomplyr_core::overrides::OverrideLedger;
use aicomplyr_core::report::render;
use aicomplyr_core::store::{Dataset, MemoryStore};
use aicomplyr_core::{ReportGenerator, ReportRequest};
use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use tracing::info;

mod args;
mod error;
mod server;
mod telemetry;

use args::{Command, OutputFormat, ReportArgs, ServeArgs};

#[tokio::main]
async fn main() -> Result<()> {
    let args = args::Args::parse();
    telemetry::init_tracing();

    let config = match &args.config {
        Some(path) => ComplianceConfig::load(path)?,
        None => ComplianceConfig::default(),
    };

    match args.command {
        Command::Report(report_args) => {
            let code = run_report(report_args, config)?;
            std::process::exit(code);
        }
        Command::Serve(serve_args) => serve(serve_args, config).await,
    }
}

fn run_report(args: ReportArgs, config: ComplianceConfig) -> Result<i32> {
    let dataset = Dataset::load(&args.data)?;
    let store = Arc::new(MemoryStore::from_dataset(&dataset));
    let generator = ReportGenerator::new(store, config);

    let request = ReportRequest {
        project_id: args.project,
        enterprise_id: args.enterprise,
        workspace_id: args.workspace,
        include_details: !args.no_details,
        compliance_framework: args.framework,
    };

    let report = generator
        .compute(&request, Utc::now())
        .with_context(|| format!("report for project {}", args.project))?;

    let output = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&report)?,
        OutputFormat::Text => render::render_text(&report),
    };

    match args.out {
        Some(path) => std::fs::write(&path, &output)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(output.as_bytes())?;
            stdout.flush()?;
        }
    }

    Ok(report.overall_status.exit_code())
}

async fn serve(args: ServeArgs, config: ComplianceConfig) -> Result<()> {
    let dataset = match &args.data {
        Some(path) => Dataset::load(path)?,
        None => Dataset::default(),
    };

    let store = Arc::new(MemoryStore::from_dataset(&dataset));
    let state = server::AppState {
        generator: Arc::new(ReportGenerator::new(store, config)),
        overrides: Arc::new(OverrideLedger::from_dataset(&dataset)),
    };

    let listener = tokio::net::TcpListener::bind(args.bind)
        .await
        .with_context(|| format!("failed to bind {}", args.bind))?;
    info!(addr = %args.bind, "listening");

    axum::serve(listener, server::router(state))
        .await
        .context("server error")
}
