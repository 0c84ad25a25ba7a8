use clap::Parser;
use run_retention::{CleanupPlan, LogContext, RetentionConfig, RetentionManager, ScreenshotStrategy};
use std::path::PathBuf;
use tracing::Level;

#[derive(Parser)]
#[command(name = "run-retention")]
#[command(about = "Cleanup old reports, logs and screenshots left behind by test runs")]
struct Cli {
	/// Number of most recent reports (and logs) to keep; 0 keeps none
	#[arg(long)]
	reports: Option<usize>,

	/// Screenshot cleanup strategy
	#[arg(long, value_enum)]
	screenshots: Option<ScreenshotStrategy>,

	/// Maximum number of screenshot folders to keep with 'last_execution'
	#[arg(long)]
	max_screenshots: Option<usize>,

	/// Number of reports to match screenshots with when using 'match_reports'
	#[arg(long)]
	reports_to_match: Option<usize>,

	/// Project root holding the reports, logs and screenshots directories
	#[arg(long, default_value = ".")]
	root: PathBuf,

	/// JSON configuration file
	#[arg(short, long)]
	config: Option<PathBuf>,

	/// Report what would be deleted without deleting anything
	#[arg(long)]
	dry_run: bool,

	/// Print the run summary as JSON on stdout
	#[arg(long)]
	json: bool,

	/// Enable verbose logging
	#[arg(short, long)]
	verbose: bool,

	/// Do not write a test_execution_<timestamp>.log file
	#[arg(long)]
	no_log_file: bool,
}

fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();

	let level = if cli.verbose {
		Level::DEBUG
	} else {
		Level::INFO
	};

	// The log file location depends on the config, so loading logs to stderr
	let config =
		LogContext::stderr(level).scope(|| RetentionConfig::load(&cli.root, cli.config.as_deref()))?;
	let log = if cli.no_log_file {
		LogContext::stderr(level)
	} else {
		LogContext::with_log_file(level, &config.paths.logs)?
	};

	let plan = CleanupPlan {
		reports: cli.reports,
		strategy: cli.screenshots.unwrap_or(config.screenshot_strategy),
		max_screenshots: cli.max_screenshots,
		reports_to_match: cli.reports_to_match,
	};

	let manager = RetentionManager::new(config, log).dry_run(cli.dry_run);
	let report = manager.run(&plan);

	if cli.json {
		println!("{}", report.to_json()?);
	}

	Ok(())
}
