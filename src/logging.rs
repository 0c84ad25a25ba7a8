//! Logging context handed to the retention manager
//!
//! A [`LogContext`] owns a `tracing` dispatcher instead of installing a
//! process-wide subscriber. It is built once at start-up, passed to
//! [`RetentionManager::new`](crate::RetentionManager::new), and every cleanup
//! operation runs inside [`LogContext::scope`]. Dropping the last clone closes
//! the execution log file.

use crate::error::Result;
use crate::naming;
use chrono::Local;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{Dispatch, Level};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::{self, MakeWriter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Registry;

#[derive(Clone)]
pub struct LogContext {
	dispatch: Dispatch,
	log_file: Option<PathBuf>,
}

impl LogContext {
	/// Log to stderr only
	pub fn stderr(level: Level) -> Self {
		let subscriber = Registry::default()
			.with(LevelFilter::from_level(level))
			.with(fmt::layer().with_writer(std::io::stderr));

		Self { dispatch: Dispatch::new(subscriber), log_file: None }
	}

	/// Log to stderr and to a new `test_execution_<timestamp>.log` in `logs_dir`.
	///
	/// The directory is created when missing. The file is opened in append
	/// mode so two runs within the same second share one file.
	pub fn with_log_file(level: Level, logs_dir: &Path) -> Result<Self> {
		fs::create_dir_all(logs_dir)?;

		let timestamp = naming::format_timestamp(&Local::now());
		let path = logs_dir.join(naming::log_file_name(&timestamp));
		let file = OpenOptions::new().create(true).append(true).open(&path)?;

		let subscriber = Registry::default()
			.with(LevelFilter::from_level(level))
			.with(fmt::layer().with_writer(std::io::stderr))
			.with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)));

		Ok(Self {
			dispatch: Dispatch::new(subscriber),
			log_file: Some(path),
		})
	}

	/// Log into an arbitrary writer without colors.
	///
	/// Useful for capturing output in tests.
	pub fn with_writer<W>(level: Level, make_writer: W) -> Self
	where W: for<'a> MakeWriter<'a> + Send + Sync + 'static {
		let subscriber = Registry::default()
			.with(LevelFilter::from_level(level))
			.with(fmt::layer().with_ansi(false).with_writer(make_writer));

		Self { dispatch: Dispatch::new(subscriber), log_file: None }
	}

	/// Path of the execution log file, if one is being written
	pub fn log_file(&self) -> Option<&Path> {
		self.log_file.as_deref()
	}

	/// Run `f` with this context as the active subscriber on the current thread
	pub fn scope<T>(&self, f: impl FnOnce() -> T) -> T {
		tracing::dispatcher::with_default(&self.dispatch, f)
	}
}

impl std::fmt::Debug for LogContext {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("LogContext").field("log_file", &self.log_file).finish()
	}
}
