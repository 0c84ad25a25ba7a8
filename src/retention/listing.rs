//! Directory scans for the three artifact collections
//!
//! Scans are shallow. A missing root is reported as `Ok(None)` so callers can
//! treat it as "nothing to clean"; any other failure to read the root is an
//! error. Entries whose metadata cannot be read are skipped with a warning.

use std::fs::{self, Metadata};
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::warn;

/// A file or folder found directly under a scanned root
#[derive(Debug, Clone)]
pub struct Entry {
	pub path: PathBuf,
	pub name: String,
	/// mtime for files, creation time for folders
	pub timestamp: SystemTime,
}

/// Shell-style `<prefix>*<suffix>` file name pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilePattern {
	pub prefix: &'static str,
	pub suffix: &'static str,
}

impl FilePattern {
	/// `*.html`
	pub const REPORTS: FilePattern = FilePattern { prefix: "", suffix: ".html" };
	/// `test_execution_*.log`
	pub const LOGS: FilePattern = FilePattern { prefix: "test_execution_", suffix: ".log" };

	/// Leading dots are never matched by the wildcard, as with a shell glob.
	pub fn matches(&self, name: &str) -> bool {
		if self.prefix.is_empty() && name.starts_with('.') {
			return false;
		}
		name.len() >= self.prefix.len() + self.suffix.len()
			&& name.starts_with(self.prefix)
			&& name.ends_with(self.suffix)
	}
}

/// List regular files in `dir` matching `pattern`, stamped with their mtime
pub fn list_files(dir: &Path, pattern: FilePattern) -> io::Result<Option<Vec<Entry>>> {
	scan(dir, |name, metadata| {
		if metadata.is_file() && pattern.matches(name) {
			Some(metadata.modified())
		} else {
			None
		}
	})
}

/// List immediate subdirectories of `dir`, stamped with their creation time
pub fn list_folders(dir: &Path) -> io::Result<Option<Vec<Entry>>> {
	scan(dir, |_, metadata| {
		if metadata.is_dir() {
			Some(creation_time(metadata))
		} else {
			None
		}
	})
}

/// Stable sort, most recent first. Equal timestamps keep listing order.
pub fn newest_first(entries: &mut [Entry]) {
	entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}

/// Creation time where the platform records it, modification time otherwise
pub fn creation_time(metadata: &Metadata) -> io::Result<SystemTime> {
	metadata.created().or_else(|_| metadata.modified())
}

fn scan<F>(dir: &Path, select: F) -> io::Result<Option<Vec<Entry>>>
where F: Fn(&str, &Metadata) -> Option<io::Result<SystemTime>> {
	let read_dir = match fs::read_dir(dir) {
		Ok(read_dir) => read_dir,
		Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
		Err(e) => return Err(e),
	};

	let mut entries = Vec::new();
	for dir_entry in read_dir {
		let dir_entry = match dir_entry {
			Ok(dir_entry) => dir_entry,
			Err(e) => {
				warn!("Skipping unreadable entry in {}: {}", dir.display(), e);
				continue;
			}
		};

		let path = dir_entry.path();
		let name = dir_entry.file_name().to_string_lossy().into_owned();

		// Follows symlinks
		let metadata = match fs::metadata(&path) {
			Ok(metadata) => metadata,
			Err(e) => {
				warn!("Skipping {}: failed to read metadata: {}", path.display(), e);
				continue;
			}
		};

		match select(&name, &metadata) {
			Some(Ok(timestamp)) => entries.push(Entry { path, name, timestamp }),
			Some(Err(e)) => {
				warn!("Skipping {}: failed to read timestamp: {}", path.display(), e);
			}
			None => {}
		}
	}

	Ok(Some(entries))
}
