use std::process::ExitCode;

use anyhow::{Context, Result};
use biasgate_core::report::{self, ActionsProgress};
use biasgate_core::scan::orchestrator;
use biasgate_core::{
    fileset, outcome, AnalysisClient, AnalyzerSettings, ExitStatus, HttpAnalysisClient,
    NoopAnalysisClient, RunSummary, ScanConfig,
};
use clap::{Parser, Subcommand};
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "biasgate", author, version, about = "BiasClear CI scan gate")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Scan files matching the configured glob pattern
    Scan {
        /// Glob pattern of files to scan (overrides SCAN_PATHS)
        #[arg(long, value_name = "GLOB")]
        paths: Option<String>,
        /// Minimum acceptable truth score (overrides SCAN_THRESHOLD)
        #[arg(long, value_name = "SCORE")]
        threshold: Option<u32>,
        /// Analyzer domain label (overrides SCAN_DOMAIN)
        #[arg(long, value_name = "DOMAIN")]
        domain: Option<String>,
        /// Fail the run on below-threshold files (overrides SCAN_FAIL_ON_BIAS)
        #[arg(long, value_name = "BOOL")]
        fail_on_bias: Option<bool>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    init_tracing();
    let cli = Cli::parse();
    let status = match cli.command.unwrap_or(Commands::Scan {
        paths: None,
        threshold: None,
        domain: None,
        fail_on_bias: None,
    }) {
        Commands::Scan {
            paths,
            threshold,
            domain,
            fail_on_bias,
        } => run_scan(paths, threshold, domain, fail_on_bias).await?,
    };
    Ok(ExitCode::from(status.code() as u8))
}

async fn run_scan(
    paths: Option<String>,
    threshold: Option<u32>,
    domain: Option<String>,
    fail_on_bias: Option<bool>,
) -> Result<ExitStatus> {
    let mut config = ScanConfig::from_env().context("invalid scan configuration")?;
    if let Some(paths) = paths {
        config.paths = paths;
    }
    if let Some(threshold) = threshold {
        config.threshold = threshold;
    }
    if let Some(domain) = domain {
        config.domain = domain;
    }
    if let Some(fail_on_bias) = fail_on_bias {
        config.fail_on_bias = fail_on_bias;
    }

    let files = fileset::resolve(&config.paths)?;
    let mut output_sink = report::output_sink_from_env();

    if files.is_empty() {
        println!("::notice::No files matched pattern '{}'", config.paths);
        output_sink.append("total_files", "0")?;
        output_sink.append("flagged_files", "0")?;
        output_sink.append("avg_score", "100")?;
        output_sink.append("report", "[]")?;
        return Ok(ExitStatus::Success);
    }

    println!(
        "🔍 BiasClear scanning {} file(s) in domain '{}'",
        files.len(),
        config.domain
    );
    println!(
        "   Threshold: {} | Fail on bias: {}",
        config.threshold, config.fail_on_bias
    );
    println!("   Pattern: {}", config.paths);
    println!();

    let client = build_client()?;
    let run_report = orchestrator::run(&files, &config, client.as_ref(), &ActionsProgress).await;
    let summary = RunSummary::derive(&run_report, &config);
    let flagged = run_report.flagged(config.threshold);

    println!();
    println!("{}", "━".repeat(60));
    println!(
        "📊 BiasClear Results: {} scanned, {} flagged, avg score {}",
        summary.total_scanned,
        summary.total_flagged,
        report::avg_display(&summary)
    );
    println!("{}", "━".repeat(60));

    for (name, value) in report::step_outputs(&run_report, &summary)? {
        output_sink.append(&name, &value)?;
    }
    let markdown = report::summary_markdown(&flagged, &summary);
    report::summary_sink_from_env().write_summary(&markdown)?;

    let status = outcome::decide(&flagged, config.threshold, config.fail_on_bias);
    match status {
        ExitStatus::Failure { below_threshold } => println!(
            "\n❌ {} file(s) scored below threshold ({})",
            below_threshold, config.threshold
        ),
        ExitStatus::Success => println!("\n✅ All files passed BiasClear scan"),
    }
    Ok(status)
}

fn build_client() -> Result<Box<dyn AnalysisClient>> {
    let settings = AnalyzerSettings::from_env();
    if settings.endpoint.is_some() {
        Ok(Box::new(HttpAnalysisClient::new(&settings)?))
    } else {
        warn!("no analyzer endpoint configured, verdicts default to clean");
        Ok(Box::new(NoopAnalysisClient))
    }
}

fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,tokio=warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .try_init();
}
