//! Artifact naming conventions shared by the test pipeline and the cleanup
//!
//! Reports, execution logs and screenshot folders all embed a local timestamp
//! in `YYYY-MM-DD_HH-MM-SS` form. Screenshot folders are correlated with
//! reports through that embedded text, see [`timestamp_token`].

use chrono::{DateTime, Local, TimeZone};
use std::fmt::Display;
use std::time::SystemTime;
use thiserror::Error;

/// Timestamp layout embedded in artifact names
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Time-of-day layout used inside screenshot file names (microsecond precision)
pub const SCREENSHOT_TIME_FORMAT: &str = "%H-%M-%S-%6f";

/// Prefix the HTML reporter puts in front of report timestamps
pub const REPORT_PREFIX: &str = "playwright_report_";

pub const REPORT_EXTENSION: &str = "html";
pub const LOG_FILE_PREFIX: &str = "test_execution_";
pub const LOG_FILE_EXTENSION: &str = "log";
pub const SCREENSHOT_PREFIX: &str = "screenshot_";
pub const SCREENSHOT_EXTENSION: &str = "png";

/// Format a point in time the way artifact names embed it
pub fn format_timestamp<Tz>(at: &DateTime<Tz>) -> String
where
	Tz: TimeZone,
	Tz::Offset: Display,
{
	at.format(TIMESTAMP_FORMAT).to_string()
}

/// Format a filesystem timestamp in local time
pub fn format_system_time(at: SystemTime) -> String {
	format_timestamp(&DateTime::<Local>::from(at))
}

/// `<prefix><timestamp>.html`
pub fn report_file_name(prefix: &str, timestamp: &str) -> String {
	format!("{prefix}{timestamp}.{REPORT_EXTENSION}")
}

/// `test_execution_<timestamp>.log`
pub fn log_file_name(timestamp: &str) -> String {
	format!("{LOG_FILE_PREFIX}{timestamp}.{LOG_FILE_EXTENSION}")
}

/// Screenshot folders are named by the run timestamp alone
pub fn screenshot_folder_name(timestamp: &str) -> String {
	timestamp.to_string()
}

/// `screenshot_<test>[_<description>]_<HH-MM-SS-micros>.png`
pub fn screenshot_file_name(
	test_name: &str, description: Option<&str>, at: &DateTime<Local>,
) -> String {
	let description = description.map(|d| format!("_{d}")).unwrap_or_default();
	format!(
		"{SCREENSHOT_PREFIX}{test_name}{description}_{}.{SCREENSHOT_EXTENSION}",
		at.format(SCREENSHOT_TIME_FORMAT)
	)
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
	#[error("no '_' separator in {file_name}")]
	MissingSeparator { file_name: String },
}

/// Where a timestamp token came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
	FileName,
	ModifiedTime,
}

/// Text used to correlate screenshot folders with a report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimestampToken {
	pub value: String,
	pub source: TokenSource,
}

impl TimestampToken {
	/// Whether a screenshot folder name embeds this token
	pub fn matches(&self, folder_name: &str) -> bool {
		folder_name.contains(&self.value)
	}
}

/// Everything after the first `_`, minus the final extension. May be empty,
/// in which case it matches every folder.
pub fn token_from_file_name(file_name: &str) -> Result<String, TokenError> {
	let (_, rest) = file_name.split_once('_').ok_or_else(|| TokenError::MissingSeparator {
		file_name: file_name.to_string(),
	})?;
	let token = rest.rsplit_once('.').map_or(rest, |(stem, _)| stem);
	Ok(token.to_string())
}

/// Derive the token for a report, falling back to its modification time
pub fn timestamp_token(file_name: &str, modified: SystemTime) -> TimestampToken {
	match token_from_file_name(file_name) {
		Ok(value) => TimestampToken { value, source: TokenSource::FileName },
		Err(_) => TimestampToken {
			value: format_system_time(modified),
			source: TokenSource::ModifiedTime,
		},
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_token_from_file_name() {
		assert_eq!(
			token_from_file_name("report_2024-05-01_10-00-00.html").unwrap(),
			"2024-05-01_10-00-00"
		);
		// Only the first separator splits; the prefix's own underscores stay in the token
		assert_eq!(
			token_from_file_name("playwright_report_2024-05-01_10-00-00.html").unwrap(),
			"report_2024-05-01_10-00-00"
		);
		// No extension keeps the whole remainder
		assert_eq!(token_from_file_name("run_42").unwrap(), "42");
		// Only the last extension is stripped
		assert_eq!(token_from_file_name("run_a.b.html").unwrap(), "a.b");
	}

	#[test]
	fn test_token_errors() {
		assert_eq!(
			token_from_file_name("reportfinal.html"),
			Err(TokenError::MissingSeparator { file_name: "reportfinal.html".to_string() })
		);
		// A bare separator parses to an empty token rather than failing
		assert_eq!(token_from_file_name("report_.html").unwrap(), "");
		assert!(timestamp_token("report_.html", SystemTime::now()).matches("adhoc"));
	}

	#[test]
	fn test_timestamp_token_fallback() {
		let modified = SystemTime::now();
		let parsed = timestamp_token("report_abc.html", modified);
		assert_eq!(parsed.source, TokenSource::FileName);
		assert_eq!(parsed.value, "abc");

		let fallback = timestamp_token("reportfinal.html", modified);
		assert_eq!(fallback.source, TokenSource::ModifiedTime);
		assert_eq!(fallback.value, format_system_time(modified));
		assert!(fallback.matches(&format!("run_{}", fallback.value)));
	}

	#[test]
	fn test_artifact_names() {
		let at = Local.with_ymd_and_hms(2024, 5, 1, 9, 8, 7).unwrap();
		let ts = format_timestamp(&at);
		assert_eq!(ts, "2024-05-01_09-08-07");
		assert_eq!(
			report_file_name(REPORT_PREFIX, &ts),
			"playwright_report_2024-05-01_09-08-07.html"
		);
		assert_eq!(log_file_name(&ts), "test_execution_2024-05-01_09-08-07.log");
		assert_eq!(screenshot_folder_name(&ts), ts);
		assert_eq!(
			screenshot_file_name("test_login", Some("after_submit"), &at),
			"screenshot_test_login_after_submit_09-08-07-000000.png"
		);
		assert_eq!(
			screenshot_file_name("test_login", None, &at),
			"screenshot_test_login_09-08-07-000000.png"
		);
	}
}
