use std::fmt::Write as _;
use std::fs::OpenOptions;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::scan::{RunReport, RunSummary, ScanProgress, ScannedFile, Tier};

/// Fixed footer closing every job summary.
const ATTRIBUTION: &str = "*Powered by [BiasClear](https://github.com/bws82/biasclear) — structural bias detection built on Persistent Influence Theory*";

const CONSOLE_VALUE_LIMIT: usize = 100;

/// Ordered machine-readable step outputs for a run.
///
/// `report` is the full result sequence serialized as JSON, failures
/// included, and round-trips back into the same records.
pub fn step_outputs(report: &RunReport, summary: &RunSummary) -> Result<Vec<(String, String)>> {
    let serialized = serde_json::to_string(report).context("failed to serialize run report")?;
    Ok(vec![
        ("total_files".to_string(), summary.total_scanned.to_string()),
        ("flagged_files".to_string(), summary.total_flagged.to_string()),
        ("avg_score".to_string(), avg_display(summary)),
        ("report".to_string(), serialized),
    ])
}

/// Display form of the average score: one decimal place, or the literal
/// `100` when nothing was scanned, matching the report format.
pub fn avg_display(summary: &RunSummary) -> String {
    if summary.total_scanned == 0 {
        "100".to_string()
    } else {
        format!("{:.1}", summary.avg_score)
    }
}

/// Render the markdown job summary: metrics table, flagged-file table or
/// clean-pass note, attribution footer.
pub fn summary_markdown(flagged: &[&ScannedFile], summary: &RunSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "## 🔍 BiasClear Scan Results");
    let _ = writeln!(out);
    let _ = writeln!(out, "| Metric | Value |");
    let _ = writeln!(out, "|--------|-------|");
    let _ = writeln!(out, "| Files scanned | {} |", summary.total_scanned);
    let _ = writeln!(out, "| Files flagged | {} |", summary.total_flagged);
    let _ = writeln!(out, "| Average truth score | {}/100 |", avg_display(summary));
    let _ = writeln!(out, "| Threshold | {} |", summary.threshold);
    let _ = writeln!(out, "| Domain | {} |", summary.domain);
    let _ = writeln!(out);

    if flagged.is_empty() {
        let _ = writeln!(out, "### ✅ All files passed");
        let _ = writeln!(out);
    } else {
        let _ = writeln!(out, "### ⚠️ Flagged Files");
        let _ = writeln!(out);
        let _ = writeln!(out, "| File | Score | Flags |");
        let _ = writeln!(out, "|------|-------|-------|");
        for record in flagged {
            let _ = writeln!(
                out,
                "| `{}` | {} | {} |",
                record.file.display(),
                record.truth_score,
                record.top_flag_names()
            );
        }
        let _ = writeln!(out);
    }

    let _ = writeln!(out, "---");
    out.push_str(ATTRIBUTION);
    out
}

/// Append-only destination for machine-readable step outputs.
pub trait OutputSink {
    fn append(&mut self, name: &str, value: &str) -> Result<()>;
}

/// Append-only destination for the markdown job summary.
pub trait SummarySink {
    fn write_summary(&mut self, markdown: &str) -> Result<()>;
}

/// Select the output sink: the `GITHUB_OUTPUT` file when set, otherwise the
/// console fallback for local runs.
pub fn output_sink_from_env() -> Box<dyn OutputSink> {
    match configured_path("GITHUB_OUTPUT") {
        Some(path) => Box::new(FileOutputSink::new(path)),
        None => Box::new(ConsoleOutputSink),
    }
}

/// Select the summary sink: the `GITHUB_STEP_SUMMARY` file when set,
/// otherwise stdout.
pub fn summary_sink_from_env() -> Box<dyn SummarySink> {
    match configured_path("GITHUB_STEP_SUMMARY") {
        Some(path) => Box::new(FileSummarySink::new(path)),
        None => Box::new(ConsoleSummarySink),
    }
}

fn configured_path(var: &str) -> Option<PathBuf> {
    std::env::var(var)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
}

/// Writes `name=value` lines to a key=value file, using a heredoc-style
/// delimiter block for multiline values so embedded line breaks cannot
/// corrupt the format.
pub struct FileOutputSink {
    path: PathBuf,
}

impl FileOutputSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl OutputSink for FileOutputSink {
    fn append(&mut self, name: &str, value: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("failed to open output file {}", self.path.display()))?;
        if value.contains('\n') {
            let delimiter = unique_delimiter(value);
            writeln!(file, "{name}<<{delimiter}\n{value}\n{delimiter}")
        } else {
            writeln!(file, "{name}={value}")
        }
        .with_context(|| format!("failed to write output `{name}`"))?;
        Ok(())
    }
}

/// Pick a delimiter that does not occur in the value.
fn unique_delimiter(value: &str) -> String {
    let mut counter = 0usize;
    loop {
        let candidate = format!("ghadelimiter_{counter}");
        if !value.contains(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}

/// Local fallback: prints outputs to stdout, truncated for display only.
pub struct ConsoleOutputSink;

impl OutputSink for ConsoleOutputSink {
    fn append(&mut self, name: &str, value: &str) -> Result<()> {
        println!("  [output] {name}={}", truncate_for_display(value));
        Ok(())
    }
}

fn truncate_for_display(value: &str) -> String {
    if value.chars().count() <= CONSOLE_VALUE_LIMIT {
        return value.to_string();
    }
    let truncated: String = value.chars().take(CONSOLE_VALUE_LIMIT).collect();
    format!("{truncated}...")
}

/// Appends the markdown summary to the job-summary file.
pub struct FileSummarySink {
    path: PathBuf,
}

impl FileSummarySink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SummarySink for FileSummarySink {
    fn write_summary(&mut self, markdown: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("failed to open summary file {}", self.path.display()))?;
        writeln!(file, "{markdown}")
            .with_context(|| format!("failed to write summary to {}", self.path.display()))?;
        Ok(())
    }
}

/// Local fallback: prints the full markdown summary to stdout.
pub struct ConsoleSummarySink;

impl SummarySink for ConsoleSummarySink {
    fn write_summary(&mut self, markdown: &str) -> Result<()> {
        println!("\n{markdown}");
        Ok(())
    }
}

/// Progress emitter for CI logs: one tier-classified line per file, plus a
/// `::warning` annotation ahead of the status line for every flagged file.
#[derive(Debug, Default, Clone)]
pub struct ActionsProgress;

impl ScanProgress for ActionsProgress {
    fn file_skipped(&self, file: &Path) {
        println!("  ⏭ {} (empty, skipped)", file.display());
    }

    fn file_failed(&self, file: &Path, error: &str) {
        println!("  ⚠️  {}: scan failed ({error})", file.display());
    }

    fn file_flagged(&self, record: &ScannedFile) {
        println!(
            "::warning file={}::BiasClear: score {}/100, {} pattern(s) detected: {}",
            record.file.display(),
            record.truth_score,
            record.flag_count,
            record.top_flag_names()
        );
    }

    fn file_scanned(&self, record: &ScannedFile, tier: Tier) {
        let glyph = match tier {
            Tier::Flagged => "🔴",
            Tier::Warn => "🟡",
            Tier::Clean => "🟢",
        };
        println!(
            "  {glyph} {}: score {}, {} flag(s)",
            record.file.display(),
            record.truth_score,
            record.flag_count
        );
    }
}
