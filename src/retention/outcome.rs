use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Artifact collection a cleanup operation worked on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CleanupTarget {
	Reports,
	Logs,
	Screenshots,
}

impl CleanupTarget {
	pub fn as_str(&self) -> &'static str {
		match self {
			CleanupTarget::Reports => "reports",
			CleanupTarget::Logs => "logs",
			CleanupTarget::Screenshots => "screenshots",
		}
	}

	/// Singular noun used in log messages
	pub fn entry_label(&self) -> &'static str {
		match self {
			CleanupTarget::Reports => "report",
			CleanupTarget::Logs => "log",
			CleanupTarget::Screenshots => "screenshot folder",
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OutcomeStatus {
	/// The directory was scanned and evictions attempted
	Completed,
	/// The root directory does not exist; nothing was touched
	DirectoryMissing,
	/// The root exists but could not be listed; nothing was touched
	ListingFailed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedDeletion {
	pub path: PathBuf,
	pub reason: String,
}

/// What a single cleanup operation did
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanupOutcome {
	pub target: CleanupTarget,
	pub directory: PathBuf,
	pub status: OutcomeStatus,
	/// Entries inside the retention window, newest first
	pub kept: Vec<PathBuf>,
	/// Entries removed (or, in a dry run, that would have been removed)
	pub deleted: Vec<PathBuf>,
	pub failed: Vec<FailedDeletion>,
}

impl CleanupOutcome {
	pub fn new(target: CleanupTarget, directory: &Path) -> Self {
		Self {
			target,
			directory: directory.to_path_buf(),
			status: OutcomeStatus::Completed,
			kept: Vec::new(),
			deleted: Vec::new(),
			failed: Vec::new(),
		}
	}

	pub fn directory_missing(target: CleanupTarget, directory: &Path) -> Self {
		Self { status: OutcomeStatus::DirectoryMissing, ..Self::new(target, directory) }
	}

	pub fn listing_failed(target: CleanupTarget, directory: &Path, reason: String) -> Self {
		Self { status: OutcomeStatus::ListingFailed { reason }, ..Self::new(target, directory) }
	}

	/// True when every eviction that was attempted succeeded
	pub fn is_clean(&self) -> bool {
		self.failed.is_empty() && !matches!(self.status, OutcomeStatus::ListingFailed { .. })
	}
}

/// Summary of one invocation of the cleanup process
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanupReport {
	pub run_id: Uuid,
	pub started_at: DateTime<Utc>,
	pub finished_at: Option<DateTime<Utc>>,
	pub dry_run: bool,
	pub outcomes: Vec<CleanupOutcome>,
}

impl CleanupReport {
	pub fn start(dry_run: bool) -> Self {
		Self {
			run_id: Uuid::new_v4(),
			started_at: Utc::now(),
			finished_at: None,
			dry_run,
			outcomes: Vec::new(),
		}
	}

	pub fn finish(&mut self) {
		self.finished_at = Some(Utc::now());
	}

	pub fn outcome(&self, target: CleanupTarget) -> Option<&CleanupOutcome> {
		self.outcomes.iter().find(|o| o.target == target)
	}

	pub fn total_deleted(&self) -> usize {
		self.outcomes.iter().map(|o| o.deleted.len()).sum()
	}

	pub fn total_failed(&self) -> usize {
		self.outcomes.iter().map(|o| o.failed.len()).sum()
	}

	pub fn to_json(&self) -> Result<String, serde_json::Error> {
		serde_json::to_string_pretty(self)
	}
}
