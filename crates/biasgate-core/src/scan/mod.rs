use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::analysis::Flag;
use crate::config::ScanConfig;

pub mod orchestrator;

/// Flags carried on a scanned record are capped at the first five.
pub const MAX_REPORT_FLAGS: usize = 5;
/// Annotations and summary tables list at most the first three flag names.
pub const MAX_LISTED_FLAGS: usize = 3;

const WARN_SCORE: u32 = 90;

/// Display tier for a scanned file; reporting-only, never affects outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Flagged,
    Warn,
    Clean,
}

impl Tier {
    /// Classify a scanned file: flagged files are always the flagged tier,
    /// the rest split at a score of 90.
    pub fn classify(flagged: bool, truth_score: u32) -> Self {
        if flagged {
            Self::Flagged
        } else if truth_score < WARN_SCORE {
            Self::Warn
        } else {
            Self::Clean
        }
    }
}

/// Record for a file the analyzer scanned successfully.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScannedFile {
    pub file: PathBuf,
    pub truth_score: u32,
    pub bias_detected: bool,
    /// Total flags reported by the analyzer, before the cap on `flags`.
    pub flag_count: usize,
    pub flags: Vec<Flag>,
}

impl ScannedFile {
    /// Build a record from an analyzer verdict, keeping the first five flags.
    pub fn from_verdict(file: PathBuf, verdict: crate::analysis::Verdict) -> Self {
        let flag_count = verdict.flags.len();
        let mut flags = verdict.flags;
        flags.truncate(MAX_REPORT_FLAGS);
        Self {
            file,
            truth_score: verdict.truth_score,
            bias_detected: verdict.bias_detected,
            flag_count,
            flags,
        }
    }

    /// A file is flagged when bias was detected or its score is below threshold.
    pub fn is_flagged(&self, threshold: u32) -> bool {
        self.bias_detected || self.truth_score < threshold
    }

    /// Comma-separated names of the first three flags.
    pub fn top_flag_names(&self) -> String {
        self.flags
            .iter()
            .take(MAX_LISTED_FLAGS)
            .map(|flag| flag.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Record for a file whose read or analysis failed; excluded from all counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailedFile {
    pub file: PathBuf,
    pub error: String,
    /// Always true on the wire; kept so serialized records match the report format.
    pub skipped: bool,
}

/// Per-file outcome, one of two variants so consumers handle both exhaustively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FileResult {
    Scanned(ScannedFile),
    Failed(FailedFile),
}

impl FileResult {
    pub fn file(&self) -> &Path {
        match self {
            Self::Scanned(record) => &record.file,
            Self::Failed(record) => &record.file,
        }
    }

    pub fn as_scanned(&self) -> Option<&ScannedFile> {
        match self {
            Self::Scanned(record) => Some(record),
            Self::Failed(_) => None,
        }
    }
}

/// Ordered run results in file-discovery order; read-only once produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunReport {
    pub results: Vec<FileResult>,
}

impl RunReport {
    /// Successfully scanned records, in order.
    pub fn scanned(&self) -> impl Iterator<Item = &ScannedFile> {
        self.results.iter().filter_map(FileResult::as_scanned)
    }

    /// Scanned records that are flagged under the given threshold, in order.
    pub fn flagged(&self, threshold: u32) -> Vec<&ScannedFile> {
        self.scanned()
            .filter(|record| record.is_flagged(threshold))
            .collect()
    }
}

/// Scalar run summary, derived solely from the report and configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub total_scanned: usize,
    pub total_flagged: usize,
    pub avg_score: f64,
    pub threshold: u32,
    pub domain: String,
}

impl RunSummary {
    /// Mean scanned truth score rounded to one decimal; 100 when nothing was
    /// scanned, so an empty or all-failed run never registers as a failure.
    pub fn derive(report: &RunReport, config: &ScanConfig) -> Self {
        let total_scanned = report.scanned().count();
        let total_flagged = report.flagged(config.threshold).len();
        let avg_score = if total_scanned == 0 {
            100.0
        } else {
            let total: u64 = report.scanned().map(|r| u64::from(r.truth_score)).sum();
            round_one_decimal(total as f64 / total_scanned as f64)
        };
        Self {
            total_scanned,
            total_flagged,
            avg_score,
            threshold: config.threshold,
            domain: config.domain.clone(),
        }
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Streaming observer for per-file progress; callbacks fire in file order as
/// processing proceeds so long scans show live output.
pub trait ScanProgress: Send + Sync {
    /// Content was empty after trimming; the file is excluded from the run.
    fn file_skipped(&self, file: &Path);
    /// Read or analysis failed; a `Failed` record was appended.
    fn file_failed(&self, file: &Path, error: &str);
    /// The record is flagged; fires before `file_scanned` for the same file.
    fn file_flagged(&self, record: &ScannedFile);
    /// A `Scanned` record was appended.
    fn file_scanned(&self, record: &ScannedFile, tier: Tier);
}

/// Observer that discards all progress events.
#[derive(Debug, Default, Clone)]
pub struct SilentProgress;

impl ScanProgress for SilentProgress {
    fn file_skipped(&self, _file: &Path) {}
    fn file_failed(&self, _file: &Path, _error: &str) {}
    fn file_flagged(&self, _record: &ScannedFile) {}
    fn file_scanned(&self, _record: &ScannedFile, _tier: Tier) {}
}
