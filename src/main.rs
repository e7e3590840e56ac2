//! health-monitor - standalone health supervisor
//!
//! Runs the monitor against this host until interrupted

#![allow(missing_docs)]

use clap::Parser;
use health_monitor::monitoring::collaborators::ErrorCounters;
use health_monitor::utils::logging::{init_tracing, parse_level};
use health_monitor::{HealthMonitor, HealthState, MonitorConfig, Result};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
#[cfg(feature = "metrics")]
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tracing::{error, info, warn};

#[derive(Debug, Parser)]
#[command(name = "health-monitor", version, about = "Periodic health checks with alerting and auto-recovery")]
struct Args {
    /// YAML configuration file; environment variables are used when absent
    #[arg(short, long, env = "HEALTH_MONITOR_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (overridden by RUST_LOG)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    json: bool,

    /// Run a single health-check cycle, print the results and exit
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    match run(args).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<ExitCode> {
    // A missing .env file is not an error
    dotenvy::dotenv().ok();

    init_tracing(parse_level(&args.log_level)?, args.json)?;

    let config = match &args.config {
        Some(path) => MonitorConfig::from_file(path).await?,
        None => MonitorConfig::from_env()?.validated()?,
    };

    let monitor = HealthMonitor::builder(config)
        .error_stats(Arc::new(ErrorCounters::new()))
        .build()?;

    if args.once {
        return run_once(&monitor).await;
    }

    spawn_event_logger(&monitor);

    #[cfg(feature = "metrics")]
    let exporter = health_monitor::PrometheusExporter::new()?;
    #[cfg(feature = "metrics")]
    let exporter_task = exporter.spawn(&monitor);

    monitor.start().await;
    info!(overall = %monitor.get_overall_health(), "Monitoring, press Ctrl-C to stop");

    tokio::signal::ctrl_c().await?;
    monitor.stop();
    drop(monitor);

    #[cfg(feature = "metrics")]
    {
        // Ends once the periodic tasks release their monitor clones
        if tokio::time::timeout(Duration::from_secs(5), exporter_task)
            .await
            .is_err()
        {
            warn!("Prometheus exporter did not stop in time");
        }
        log_final_metrics(&exporter);
    }

    Ok(ExitCode::SUCCESS)
}

#[cfg(feature = "metrics")]
fn log_final_metrics(exporter: &health_monitor::PrometheusExporter) {
    match exporter.render() {
        Ok(text) => tracing::debug!("Final metrics:\n{}", text),
        Err(e) => warn!("Failed to render metrics: {}", e),
    }
}

/// One cycle, printed as JSON; the exit code reflects overall health
async fn run_once(monitor: &HealthMonitor) -> Result<ExitCode> {
    monitor.start().await;
    monitor.stop();

    let report = serde_json::json!({
        "overall": monitor.get_overall_health(),
        "checks": monitor.get_health_status(),
        "metrics": monitor.get_metrics(Some(1)).pop(),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(match monitor.get_overall_health() {
        HealthState::Healthy => ExitCode::SUCCESS,
        HealthState::Warning | HealthState::Critical => ExitCode::FAILURE,
    })
}

fn spawn_event_logger(monitor: &HealthMonitor) {
    let mut alerts = monitor.subscribe_alerts();
    tokio::spawn(async move {
        loop {
            match alerts.recv().await {
                Ok(alert) => match alert.level {
                    health_monitor::AlertLevel::Critical => {
                        error!(id = %alert.id, "[CRITICAL] {}", alert.message)
                    }
                    health_monitor::AlertLevel::Warning => {
                        warn!(id = %alert.id, "[WARNING] {}", alert.message)
                    }
                },
                Err(RecvError::Lagged(skipped)) => warn!(skipped, "Alert logger lagged"),
                Err(RecvError::Closed) => break,
            }
        }
    });
}
