//! Retention configuration
//!
//! Defaults mirror the test framework's settings: artifacts live under
//! `reports/`, `logs/` and `screenshots/` beneath the project root, and five
//! of each are kept. A JSON file may override any field.

use crate::error::{Result, RetentionError};
use crate::retention::ScreenshotStrategy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

pub const DEFAULT_MAX_REPORTS: usize = 5;
pub const DEFAULT_MAX_SCREENSHOTS: usize = 5;

/// Directories holding the three artifact collections
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectoryPaths {
	pub reports: PathBuf,
	pub logs: PathBuf,
	pub screenshots: PathBuf,
}

impl Default for DirectoryPaths {
	fn default() -> Self {
		Self {
			reports: PathBuf::from("reports"),
			logs: PathBuf::from("logs"),
			screenshots: PathBuf::from("screenshots"),
		}
	}
}

impl DirectoryPaths {
	/// Standard layout beneath a project root
	pub fn under(root: &Path) -> Self {
		let mut paths = Self::default();
		paths.resolve_against(root);
		paths
	}

	/// Make relative paths relative to `root`; absolute paths are kept.
	fn resolve_against(&mut self, root: &Path) {
		for dir in [&mut self.reports, &mut self.logs, &mut self.screenshots] {
			if dir.is_relative() {
				*dir = root.join(&*dir);
			}
		}
	}
}

/// Configuration for the retention manager
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetentionConfig {
	pub paths: DirectoryPaths,

	/// Reports (and logs) kept when no explicit count is given
	pub max_reports_to_keep: usize,

	/// Screenshot folders kept by the `last_execution` strategy
	pub max_screenshots_to_keep: usize,

	pub screenshot_strategy: ScreenshotStrategy,
}

impl Default for RetentionConfig {
	fn default() -> Self {
		Self {
			paths: DirectoryPaths::default(),
			max_reports_to_keep: DEFAULT_MAX_REPORTS,
			max_screenshots_to_keep: DEFAULT_MAX_SCREENSHOTS,
			screenshot_strategy: ScreenshotStrategy::default(),
		}
	}
}

impl RetentionConfig {
	/// Default configuration rooted at `root`
	pub fn for_root(root: &Path) -> Self {
		Self { paths: DirectoryPaths::under(root), ..Default::default() }
	}

	/// Load configuration from a JSON file, falling back to defaults when
	/// no file is given or the file does not exist.
	pub fn load(root: &Path, path: Option<&Path>) -> Result<Self> {
		let mut config = match path {
			Some(path) if path.exists() => {
				let content = std::fs::read_to_string(path)
					.map_err(|e| RetentionError::config_load(path, &e.to_string()))?;
				serde_json::from_str::<Self>(&content)
					.map_err(|e| RetentionError::config_load(path, &e.to_string()))?
			}
			Some(path) => {
				warn!("Config file {} not found, using defaults", path.display());
				Self::default()
			}
			None => Self::default(),
		};

		config.paths.resolve_against(root);
		config.validate()?;
		Ok(config)
	}

	/// Validate configuration parameters
	pub fn validate(&self) -> Result<()> {
		if self.max_reports_to_keep == 0 {
			return Err(RetentionError::configuration_error(
				"max_reports_to_keep",
				"must be greater than 0",
				">= 1",
				"0",
			));
		}

		if self.max_screenshots_to_keep == 0 {
			return Err(RetentionError::configuration_error(
				"max_screenshots_to_keep",
				"must be greater than 0",
				">= 1",
				"0",
			));
		}

		for dir in [&self.paths.reports, &self.paths.logs, &self.paths.screenshots] {
			if dir.as_os_str().is_empty() {
				return Err(RetentionError::InvalidPath { path: dir.display().to_string() });
			}
		}

		Ok(())
	}
}
