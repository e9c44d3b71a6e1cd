use crate::scan::ScannedFile;

/// Terminal status of a run, mapped onto the process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    /// Below-threshold flagged files exist and fail-on-bias is enabled.
    Failure { below_threshold: usize },
}

impl ExitStatus {
    pub fn code(&self) -> i32 {
        match self {
            Self::Success => 0,
            Self::Failure { .. } => 1,
        }
    }
}

/// Decide the run outcome from the flagged files.
///
/// Only the subset of flagged files whose score is strictly below threshold
/// can fail the run; a file flagged purely on detection with a score still at
/// or above threshold appears in reports but never causes failure. The filter
/// is deliberately derived from the flagged list, not the full scanned set.
pub fn decide(flagged: &[&ScannedFile], threshold: u32, fail_on_bias: bool) -> ExitStatus {
    if !fail_on_bias || flagged.is_empty() {
        return ExitStatus::Success;
    }
    let below_threshold = flagged
        .iter()
        .filter(|record| record.truth_score < threshold)
        .count();
    if below_threshold > 0 {
        ExitStatus::Failure { below_threshold }
    } else {
        ExitStatus::Success
    }
}
