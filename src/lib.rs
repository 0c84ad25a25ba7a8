mod config;
mod error;
mod logging;
pub mod naming;
pub mod retention;

pub use config::{DirectoryPaths, RetentionConfig, DEFAULT_MAX_REPORTS, DEFAULT_MAX_SCREENSHOTS};
pub use error::{Result, RetentionError};
pub use logging::LogContext;
pub use retention::{
	CleanupOutcome, CleanupPlan, CleanupReport, CleanupTarget, EntryRemover, FailedDeletion,
	FsRemover, OutcomeStatus, RetentionManager, ScreenshotStrategy,
};
