use std::{fs, io, path::Path, path::PathBuf};

use tracing::{debug, instrument, warn};

use super::{FailedFile, FileResult, RunReport, ScanProgress, ScannedFile, Tier};
use crate::analysis::AnalysisClient;
use crate::config::ScanConfig;

/// Scan candidate files strictly sequentially, in discovery order.
///
/// Per-file read and analysis failures are converted to `Failed` records and
/// never abort the run; the analyzer call is the only await point. Progress
/// callbacks fire as each file completes, interleaved with processing.
#[instrument(name = "scan_run", skip_all, fields(files = files.len(), domain = %config.domain))]
pub async fn run(
    files: &[PathBuf],
    config: &ScanConfig,
    client: &dyn AnalysisClient,
    progress: &dyn ScanProgress,
) -> RunReport {
    let mut results = Vec::new();

    for file in files {
        let text = match read_lenient(file) {
            Ok(text) => text,
            Err(err) => {
                record_failure(&mut results, progress, file, &err.to_string());
                continue;
            }
        };
        if text.trim().is_empty() {
            debug!(file = %file.display(), "empty after trimming, skipped");
            progress.file_skipped(file);
            continue;
        }

        match client.analyze(&text, &config.domain).await {
            Ok(verdict) => {
                let record = ScannedFile::from_verdict(file.clone(), verdict);
                let flagged = record.is_flagged(config.threshold);
                if flagged {
                    progress.file_flagged(&record);
                }
                progress.file_scanned(&record, Tier::classify(flagged, record.truth_score));
                results.push(FileResult::Scanned(record));
            }
            Err(err) => {
                record_failure(&mut results, progress, file, &format!("{err:#}"));
            }
        }
    }

    debug!(results = results.len(), "scan run completed");
    RunReport { results }
}

fn record_failure(
    results: &mut Vec<FileResult>,
    progress: &dyn ScanProgress,
    file: &Path,
    error: &str,
) {
    warn!(file = %file.display(), error, "scan failed");
    progress.file_failed(file, error);
    results.push(FileResult::Failed(FailedFile {
        file: file.to_path_buf(),
        error: error.to_string(),
        skipped: true,
    }));
}

/// Read file content as text; undecodable bytes are replaced rather than
/// raising, so a stray binary match degrades instead of failing.
fn read_lenient(path: &Path) -> io::Result<String> {
    let bytes = fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
