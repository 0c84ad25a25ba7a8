use super::listing::{self, Entry, FilePattern};
use super::outcome::{
	CleanupOutcome, CleanupReport, CleanupTarget, FailedDeletion, OutcomeStatus,
};
use super::remover::{EntryRemover, FsRemover};
use super::strategy::ScreenshotStrategy;
use crate::config::RetentionConfig;
use crate::error::{Result, RetentionError};
use crate::logging::LogContext;
use crate::naming::{self, TimestampToken, TokenSource};
use std::io;
use std::path::Path;
use tracing::{debug, error, info, info_span, warn};

/// Parameters for a full cleanup run. `None` counts fall back to configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupPlan {
	/// Reports to keep; also used as the number of logs to keep
	pub reports: Option<usize>,
	pub strategy: ScreenshotStrategy,
	/// Only used by [`ScreenshotStrategy::LastExecution`]
	pub max_screenshots: Option<usize>,
	/// Only used by [`ScreenshotStrategy::MatchReports`]
	pub reports_to_match: Option<usize>,
}

/// Enforces bounded retention over reports, logs and screenshot folders
///
/// Every call re-scans the filesystem. Individual deletion failures are
/// logged and recorded in the returned [`CleanupOutcome`]; they never abort
/// the operation.
pub struct RetentionManager<R = FsRemover> {
	config: RetentionConfig,
	log: LogContext,
	remover: R,
	dry_run: bool,
}

impl RetentionManager<FsRemover> {
	pub fn new(config: RetentionConfig, log: LogContext) -> Self {
		Self::with_remover(config, log, FsRemover)
	}
}

impl<R: EntryRemover> RetentionManager<R> {
	pub fn with_remover(config: RetentionConfig, log: LogContext, remover: R) -> Self {
		Self { config, log, remover, dry_run: false }
	}

	/// Report what would be deleted without touching the filesystem
	pub fn dry_run(mut self, dry_run: bool) -> Self {
		self.dry_run = dry_run;
		self
	}

	pub fn config(&self) -> &RetentionConfig {
		&self.config
	}

	/// Reports, then logs (with the reports count), then screenshots
	pub fn run(&self, plan: &CleanupPlan) -> CleanupReport {
		self.log.scope(|| {
			let mut report = CleanupReport::start(self.dry_run);
			let span = info_span!("cleanup", run_id = %report.run_id, dry_run = self.dry_run);
			let _enter = span.enter();

			info!("Starting cleanup process");

			report.outcomes.push(self.reports_outcome(plan.reports));
			report.outcomes.push(self.logs_outcome(plan.reports));
			report.outcomes.push(self.screenshots_outcome(
				plan.strategy,
				plan.max_screenshots,
				plan.reports_to_match,
			));
			report.finish();

			info!(
				"Cleanup process completed ({} deleted, {} failed)",
				report.total_deleted(),
				report.total_failed()
			);
			report
		})
	}

	/// Keep the `keep_count` most recently modified `*.html` reports
	pub fn clean_reports(&self, keep_count: Option<usize>) -> CleanupOutcome {
		self.log.scope(|| self.reports_outcome(keep_count))
	}

	/// Keep the `keep_count` most recently modified `test_execution_*.log` files
	pub fn clean_logs(&self, keep_count: Option<usize>) -> CleanupOutcome {
		self.log.scope(|| self.logs_outcome(keep_count))
	}

	pub fn clean_screenshots(
		&self, strategy: ScreenshotStrategy, max_screenshots: Option<usize>,
		reports_to_match: Option<usize>,
	) -> CleanupOutcome {
		self.log
			.scope(|| self.screenshots_outcome(strategy, max_screenshots, reports_to_match))
	}

	/// Select the screenshot strategy by name.
	///
	/// An unknown name is logged as an error and returned without deleting
	/// anything.
	pub fn clean_screenshots_named(
		&self, strategy: &str, max_screenshots: Option<usize>, reports_to_match: Option<usize>,
	) -> Result<CleanupOutcome> {
		self.log.scope(|| {
			let strategy = strategy.parse::<ScreenshotStrategy>().map_err(|e| {
				error!("{}", e);
				e
			})?;
			Ok(self.screenshots_outcome(strategy, max_screenshots, reports_to_match))
		})
	}

	fn reports_outcome(&self, keep_count: Option<usize>) -> CleanupOutcome {
		let keep = keep_count.unwrap_or(self.config.max_reports_to_keep);
		self.clean_files(CleanupTarget::Reports, &self.config.paths.reports, FilePattern::REPORTS, keep)
	}

	fn logs_outcome(&self, keep_count: Option<usize>) -> CleanupOutcome {
		let keep = keep_count.unwrap_or(self.config.max_reports_to_keep);
		self.clean_files(CleanupTarget::Logs, &self.config.paths.logs, FilePattern::LOGS, keep)
	}

	fn screenshots_outcome(
		&self, strategy: ScreenshotStrategy, max_screenshots: Option<usize>,
		reports_to_match: Option<usize>,
	) -> CleanupOutcome {
		let target = CleanupTarget::Screenshots;
		let dir = &self.config.paths.screenshots;
		let folders = match self.scan(target, dir, listing::list_folders) {
			Ok(folders) => folders,
			Err(outcome) => return outcome,
		};

		let mut outcome = CleanupOutcome::new(target, dir);
		match strategy {
			ScreenshotStrategy::MatchReports => {
				let count = reports_to_match.unwrap_or(self.config.max_reports_to_keep);
				self.match_reports(folders, count, &mut outcome);
			}
			ScreenshotStrategy::LastExecution => {
				let keep = max_screenshots.unwrap_or(self.config.max_screenshots_to_keep);
				self.last_execution(folders, keep, &mut outcome);
			}
		}
		outcome
	}

	fn clean_files(
		&self, target: CleanupTarget, dir: &Path, pattern: FilePattern, keep: usize,
	) -> CleanupOutcome {
		let mut files = match self.scan(target, dir, |dir| listing::list_files(dir, pattern)) {
			Ok(files) => files,
			Err(outcome) => return outcome,
		};

		info!("Cleaning up {}, keeping {} most recent", target.as_str(), keep);

		listing::newest_first(&mut files);
		let mut outcome = CleanupOutcome::new(target, dir);
		self.evict_beyond(files, keep, &mut outcome);
		outcome
	}

	/// Keep folders whose names embed the token of one of the `count` newest
	/// reports. Everything else goes, including folders newer than any report.
	fn match_reports(&self, folders: Vec<Entry>, count: usize, outcome: &mut CleanupOutcome) {
		info!("Cleaning up screenshots to match {} recent reports", count);

		let tokens = match self.recent_report_tokens(count) {
			Ok(tokens) => tokens,
			Err(e) => {
				error!(
					"Failed to list reports in {}, leaving screenshots untouched: {}",
					self.config.paths.reports.display(),
					e
				);
				outcome.status = OutcomeStatus::ListingFailed { reason: e.to_string() };
				return;
			}
		};

		if tokens.is_empty() {
			warn!(
				"No reports found in {}; no screenshot folder can match",
				self.config.paths.reports.display()
			);
		}

		for folder in folders {
			if tokens.iter().any(|token| token.matches(&folder.name)) {
				debug!("Keeping screenshot folder: {}", folder.path.display());
				outcome.kept.push(folder.path);
			} else {
				self.evict(&folder, outcome.target.entry_label(), outcome);
			}
		}
	}

	fn last_execution(&self, mut folders: Vec<Entry>, keep: usize, outcome: &mut CleanupOutcome) {
		info!("Cleaning up screenshots, keeping {} most recent folders", keep);

		listing::newest_first(&mut folders);
		self.evict_beyond(folders, keep, outcome);
	}

	fn recent_report_tokens(&self, count: usize) -> io::Result<Vec<TimestampToken>> {
		let mut reports =
			listing::list_files(&self.config.paths.reports, FilePattern::REPORTS)?.unwrap_or_default();
		listing::newest_first(&mut reports);

		let tokens = reports
			.iter()
			.take(count)
			.map(|report| {
				let token = naming::timestamp_token(&report.name, report.timestamp);
				if token.source == TokenSource::ModifiedTime {
					debug!(
						"No timestamp in report name {}, matching on modification time {}",
						report.name, token.value
					);
				}
				token
			})
			.collect();
		Ok(tokens)
	}

	/// Missing roots and unreadable roots both end the operation early with
	/// nothing deleted.
	fn scan<F>(
		&self, target: CleanupTarget, dir: &Path, list: F,
	) -> std::result::Result<Vec<Entry>, CleanupOutcome>
	where F: FnOnce(&Path) -> io::Result<Option<Vec<Entry>>> {
		match list(dir) {
			Ok(Some(entries)) => Ok(entries),
			Ok(None) => {
				info!("{} directory does not exist: {}", target.as_str(), dir.display());
				Err(CleanupOutcome::directory_missing(target, dir))
			}
			Err(e) => {
				error!("Failed to list {} directory {}: {}", target.as_str(), dir.display(), e);
				Err(CleanupOutcome::listing_failed(target, dir, e.to_string()))
			}
		}
	}

	/// `entries` must already be sorted newest first.
	fn evict_beyond(&self, entries: Vec<Entry>, keep: usize, outcome: &mut CleanupOutcome) {
		let mut entries = entries.into_iter();
		outcome.kept.extend(entries.by_ref().take(keep).map(|entry| entry.path));

		let label = format!("old {}", outcome.target.entry_label());
		for entry in entries {
			self.evict(&entry, &label, outcome);
		}
	}

	/// `label` names the entry in log lines.
	fn evict(&self, entry: &Entry, label: &str, outcome: &mut CleanupOutcome) {
		if self.dry_run {
			info!("Would delete {}: {}", label, entry.path.display());
			outcome.deleted.push(entry.path.clone());
			return;
		}

		let result = match outcome.target {
			CleanupTarget::Screenshots => self.remover.remove_dir_all(&entry.path),
			CleanupTarget::Reports | CleanupTarget::Logs => self.remover.remove_file(&entry.path),
		};

		match result {
			Ok(()) => {
				info!("Deleted {}: {}", label, entry.path.display());
				outcome.deleted.push(entry.path.clone());
			}
			Err(e) => {
				let kind = outcome.target.entry_label();
				error!("{}", RetentionError::deletion_failed(kind, &entry.path, &e));
				outcome.failed.push(FailedDeletion {
					path: entry.path.clone(),
					reason: e.to_string(),
				});
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::cell::RefCell;
	use std::path::PathBuf;
	use std::time::{Duration, SystemTime};
	use tracing::Level;

	/// Records removals without touching the filesystem
	#[derive(Default)]
	struct RecordingRemover {
		removed: RefCell<Vec<PathBuf>>,
	}

	impl EntryRemover for RecordingRemover {
		fn remove_file(&self, path: &Path) -> io::Result<()> {
			self.removed.borrow_mut().push(path.to_path_buf());
			Ok(())
		}

		fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
			self.removed.borrow_mut().push(path.to_path_buf());
			Ok(())
		}
	}

	fn entries(names: &[&str]) -> Vec<Entry> {
		let base = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000_000);
		names
			.iter()
			.enumerate()
			.map(|(i, name)| Entry {
				path: PathBuf::from("/artifacts").join(name),
				name: name.to_string(),
				timestamp: base - Duration::from_secs(i as u64),
			})
			.collect()
	}

	fn manager(remover: &RecordingRemover) -> RetentionManager<&RecordingRemover> {
		let log = LogContext::with_writer(Level::ERROR, std::io::sink);
		RetentionManager::with_remover(RetentionConfig::default(), log, remover)
	}

	#[test]
	fn test_evict_beyond_keeps_the_head() {
		let remover = RecordingRemover::default();
		let manager = manager(&remover);
		let mut outcome = CleanupOutcome::new(CleanupTarget::Reports, Path::new("/artifacts"));

		manager.evict_beyond(entries(&["a", "b", "c", "d"]), 2, &mut outcome);

		assert_eq!(outcome.kept, vec![PathBuf::from("/artifacts/a"), PathBuf::from("/artifacts/b")]);
		assert_eq!(outcome.deleted, vec![PathBuf::from("/artifacts/c"), PathBuf::from("/artifacts/d")]);
		assert_eq!(*remover.removed.borrow(), outcome.deleted);
	}

	#[test]
	fn test_evict_beyond_with_zero_keeps_nothing() {
		let remover = RecordingRemover::default();
		let manager = manager(&remover);
		let mut outcome = CleanupOutcome::new(CleanupTarget::Logs, Path::new("/artifacts"));

		manager.evict_beyond(entries(&["a", "b"]), 0, &mut outcome);

		assert!(outcome.kept.is_empty());
		assert_eq!(outcome.deleted.len(), 2);
	}

	#[test]
	fn test_dry_run_never_calls_the_remover() {
		let remover = RecordingRemover::default();
		let manager = manager(&remover).dry_run(true);
		let mut outcome = CleanupOutcome::new(CleanupTarget::Screenshots, Path::new("/artifacts"));

		manager.evict_beyond(entries(&["a", "b", "c"]), 1, &mut outcome);

		assert_eq!(outcome.deleted.len(), 2);
		assert!(remover.removed.borrow().is_empty());
	}
}
