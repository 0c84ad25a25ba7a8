//! Common test utilities for run-retention

#![allow(dead_code)]

use run_retention::{naming, EntryRemover, FsRemover, LogContext, RetentionConfig, RetentionManager};
use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};
use tempfile::TempDir;
use tracing::Level;

/// A project root with `reports/`, `logs/` and `screenshots/` beneath it
pub struct ArtifactTree {
	pub temp_dir: TempDir,
	pub config: RetentionConfig,
}

impl ArtifactTree {
	/// Root with all three artifact directories created
	pub fn new() -> Self {
		let tree = Self::without_directories();
		fs::create_dir_all(tree.reports_dir()).expect("Failed to create reports dir");
		fs::create_dir_all(tree.logs_dir()).expect("Failed to create logs dir");
		fs::create_dir_all(tree.screenshots_dir()).expect("Failed to create screenshots dir");
		tree
	}

	/// Root with none of the artifact directories present
	pub fn without_directories() -> Self {
		let temp_dir = TempDir::new().expect("Failed to create temp directory");
		let config = RetentionConfig::for_root(temp_dir.path());
		Self { temp_dir, config }
	}

	pub fn reports_dir(&self) -> &Path {
		&self.config.paths.reports
	}

	pub fn logs_dir(&self) -> &Path {
		&self.config.paths.logs
	}

	pub fn screenshots_dir(&self) -> &Path {
		&self.config.paths.screenshots
	}

	/// Write a report modified `age` ago
	pub fn add_report(&self, name: &str, age: Duration) -> PathBuf {
		let path = self.reports_dir().join(name);
		write_file_with_mtime(&path, "<html></html>", SystemTime::now() - age);
		path
	}

	/// Write an execution log modified `age` ago
	pub fn add_log(&self, name: &str, age: Duration) -> PathBuf {
		let path = self.logs_dir().join(name);
		write_file_with_mtime(&path, "INFO - run finished", SystemTime::now() - age);
		path
	}

	/// Create a screenshot folder holding a single capture
	pub fn add_screenshot_folder(&self, name: &str) -> PathBuf {
		let path = self.screenshots_dir().join(name);
		fs::create_dir_all(&path).expect("Failed to create screenshot folder");
		let capture = naming::screenshot_file_name("test_login", Some("failure"), &chrono::Local::now());
		fs::write(path.join(capture), b"\x89PNG").expect("Failed to write screenshot");
		path
	}

	pub fn manager(&self, log: LogContext) -> RetentionManager {
		RetentionManager::new(self.config.clone(), log)
	}

	pub fn manager_with<R: EntryRemover>(&self, log: LogContext, remover: R) -> RetentionManager<R> {
		RetentionManager::with_remover(self.config.clone(), log, remover)
	}
}

/// Sorted names of the entries directly under `dir`
pub fn names_in(dir: &Path) -> Vec<String> {
	let mut names: Vec<String> = fs::read_dir(dir)
		.expect("Failed to read dir")
		.map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
		.collect();
	names.sort();
	names
}

pub fn write_file_with_mtime(path: &Path, content: &str, modified: SystemTime) {
	fs::write(path, content).expect("Failed to write file");
	OpenOptions::new()
		.write(true)
		.open(path)
		.and_then(|file| file.set_modified(modified))
		.expect("Failed to set modification time");
}

pub fn minutes(n: u64) -> Duration {
	Duration::from_secs(n * 60)
}

/// In-memory sink for log output
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl io::Write for CapturedLogs {
	fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
		self.0.lock().unwrap().extend_from_slice(buf);
		Ok(buf.len())
	}

	fn flush(&mut self) -> io::Result<()> {
		Ok(())
	}
}

impl CapturedLogs {
	pub fn contents(&self) -> String {
		String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
	}

	/// Lines logged at error level
	pub fn errors(&self) -> Vec<String> {
		self.contents()
			.lines()
			.filter(|line| line.contains("ERROR"))
			.map(str::to_string)
			.collect()
	}
}

/// Log context capturing everything at debug level and above
pub fn capture_logs() -> (LogContext, CapturedLogs) {
	let logs = CapturedLogs::default();
	let writer = logs.clone();
	let context = LogContext::with_writer(Level::DEBUG, move || writer.clone());
	(context, logs)
}

/// Log context that discards output
pub fn quiet_logs() -> LogContext {
	LogContext::with_writer(Level::ERROR, io::sink)
}

/// Fails on chosen paths, deletes everything else
pub struct FailingRemover {
	pub failing: Vec<PathBuf>,
}

impl FailingRemover {
	pub fn failing_on(paths: &[&Path]) -> Self {
		Self { failing: paths.iter().map(|p| p.to_path_buf()).collect() }
	}

	fn check(&self, path: &Path) -> io::Result<()> {
		if self.failing.iter().any(|p| p == path) {
			return Err(io::Error::new(io::ErrorKind::PermissionDenied, "entry is locked"));
		}
		Ok(())
	}
}

impl EntryRemover for FailingRemover {
	fn remove_file(&self, path: &Path) -> io::Result<()> {
		self.check(path)?;
		FsRemover.remove_file(path)
	}

	fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
		self.check(path)?;
		FsRemover.remove_dir_all(path)
	}
}
