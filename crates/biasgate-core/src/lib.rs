pub mod analysis;
pub mod config;
pub mod fileset;
pub mod outcome;
pub mod report;
pub mod scan;

pub use analysis::{
    AnalysisClient, AnalyzerSettings, Flag, HttpAnalysisClient, NoopAnalysisClient, Verdict,
};
pub use config::{ConfigError, ScanConfig};
pub use outcome::{decide, ExitStatus};
pub use scan::{
    FailedFile, FileResult, RunReport, RunSummary, ScanProgress, ScannedFile, SilentProgress, Tier,
};
