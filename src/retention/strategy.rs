use crate::error::RetentionError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How screenshot folders are selected for eviction
#[derive(
	Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum ScreenshotStrategy {
	/// Keep folders whose names embed the timestamp of a recent report
	#[default]
	#[value(name = "match_reports")]
	MatchReports,
	/// Keep the most recently created folders
	#[value(name = "last_execution")]
	LastExecution,
}

const STRATEGY_NAMES: [(ScreenshotStrategy, &str); 2] = [
	(ScreenshotStrategy::MatchReports, "match_reports"),
	(ScreenshotStrategy::LastExecution, "last_execution"),
];

impl ScreenshotStrategy {
	pub fn as_str(&self) -> &'static str {
		match self {
			ScreenshotStrategy::MatchReports => "match_reports",
			ScreenshotStrategy::LastExecution => "last_execution",
		}
	}

	fn expected_names() -> String {
		STRATEGY_NAMES
			.iter()
			.map(|(_, name)| *name)
			.collect::<Vec<_>>()
			.join(", ")
	}
}

impl fmt::Display for ScreenshotStrategy {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for ScreenshotStrategy {
	type Err = RetentionError;

	fn from_str(name: &str) -> Result<Self, Self::Err> {
		STRATEGY_NAMES
			.iter()
			.find(|(_, candidate)| *candidate == name)
			.map(|(strategy, _)| *strategy)
			.ok_or_else(|| RetentionError::UnknownStrategy {
				name: name.to_string(),
				expected: Self::expected_names(),
			})
	}
}
