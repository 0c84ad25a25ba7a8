use std::path::Path;
use thiserror::Error;

/// Retention error types
///
/// Per-entry deletion failures are recorded in the cleanup outcome and logged;
/// they only surface as `DeletionFailed` values inside the manager. Everything
/// else here is returned from configuration loading, logging setup or strategy
/// parsing.
#[derive(Error, Debug)]
pub enum RetentionError {
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	#[error("JSON serialization error: {0}")]
	Json(#[from] serde_json::Error),

	#[error("Invalid path: {path}")]
	InvalidPath { path: String },

	#[error(
		"Configuration error: {parameter} - {reason} (expected: {expected}, actual: {actual})"
	)]
	ConfigurationError {
		parameter: String,
		reason: String,
		expected: String,
		actual: String,
	},

	#[error("Failed to load configuration from {path}: {cause}")]
	ConfigLoad { path: String, cause: String },

	#[error("Unknown screenshot cleanup strategy: {name} (expected one of: {expected})")]
	UnknownStrategy { name: String, expected: String },

	#[error("Failed to delete {kind} {path}: {cause}")]
	DeletionFailed {
		kind: String,
		path: String,
		cause: String,
	},
}

impl RetentionError {
	/// Check if this error is related to configuration issues
	pub fn is_configuration_error(&self) -> bool {
		matches!(
			self,
			RetentionError::ConfigurationError { .. }
				| RetentionError::ConfigLoad { .. }
				| RetentionError::InvalidPath { .. }
				| RetentionError::UnknownStrategy { .. }
		)
	}

	/// Get error category for logging
	pub fn category(&self) -> &'static str {
		match self {
			RetentionError::Io(_) => "io",
			RetentionError::Json(_) => "serialization",
			RetentionError::InvalidPath { .. } => "configuration",
			RetentionError::ConfigurationError { .. } => "configuration",
			RetentionError::ConfigLoad { .. } => "configuration",
			RetentionError::UnknownStrategy { .. } => "strategy",
			RetentionError::DeletionFailed { .. } => "deletion",
		}
	}

	/// Create a configuration error
	pub fn configuration_error(
		parameter: &str, reason: &str, expected: &str, actual: &str,
	) -> Self {
		RetentionError::ConfigurationError {
			parameter: parameter.to_string(),
			reason: reason.to_string(),
			expected: expected.to_string(),
			actual: actual.to_string(),
		}
	}

	/// Create a configuration load error for a config file
	pub fn config_load(path: &Path, cause: &str) -> Self {
		RetentionError::ConfigLoad {
			path: path.display().to_string(),
			cause: cause.to_string(),
		}
	}

	/// Create a deletion error for a single entry
	pub fn deletion_failed(kind: &str, path: &Path, io_err: &std::io::Error) -> Self {
		RetentionError::DeletionFailed {
			kind: kind.to_string(),
			path: path.display().to_string(),
			cause: io_err.to_string(),
		}
	}
}

pub type Result<T> = std::result::Result<T, RetentionError>;
