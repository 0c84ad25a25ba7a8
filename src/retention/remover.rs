use std::io;
use std::path::Path;

/// Deletes filesystem entries on behalf of the retention manager
///
/// Implementations must not panic; every failure is reported through the
/// returned `io::Result` so the manager can log it and move on.
pub trait EntryRemover {
	/// Remove a single regular file
	fn remove_file(&self, path: &Path) -> io::Result<()>;

	/// Remove a directory and everything beneath it
	fn remove_dir_all(&self, path: &Path) -> io::Result<()>;
}

/// Removes entries from the local filesystem
#[derive(Debug, Default, Clone, Copy)]
pub struct FsRemover;

impl EntryRemover for FsRemover {
	fn remove_file(&self, path: &Path) -> io::Result<()> {
		std::fs::remove_file(path)
	}

	fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
		std::fs::remove_dir_all(path)
	}
}

impl<R: EntryRemover + ?Sized> EntryRemover for &R {
	fn remove_file(&self, path: &Path) -> io::Result<()> {
		(**self).remove_file(path)
	}

	fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
		(**self).remove_dir_all(path)
	}
}
