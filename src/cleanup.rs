use std::{
    ffi::OsStr,
    fs,
    path::{Path, PathBuf},
};

use log::{debug, warn};

/// The name prefix of the files created by this crate.
pub const TRANSIENT_PREFIX: &str = "fahren_";
/// The suffix of weight blobs, which survive cleanups.
pub const BLOB_SUFFIX: &str = ".bin";

/// Removes the transient files left around by a model once it's shut down.
///
/// Cleanups are best effort, a failure must never surface to the caller.
pub trait WorkspaceCleanup {
    fn sweep(&mut self);
}

impl<C: WorkspaceCleanup + ?Sized> WorkspaceCleanup for &mut C {
    fn sweep(&mut self) {
        (**self).sweep()
    }
}

/// Whether the file `name` is a transient file that should be removed.
///
/// Names are matched byte by byte, they need not be valid utf-8.
///
/// # Arguments
/// * `name` - A file name, without its directory.
pub fn is_transient<S: AsRef<OsStr>>(name: S) -> bool {
    let name = name.as_ref().as_encoded_bytes();
    name.starts_with(TRANSIENT_PREFIX.as_bytes()) && !name.ends_with(BLOB_SUFFIX.as_bytes())
}

/// A cleanup that leaves everything in place.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCleanup;

impl WorkspaceCleanup for NoCleanup {
    fn sweep(&mut self) {}
}

/// A cleanup that removes the transient entries of a directory.
///
/// Every matching entry gets unlinked, symlinks included. Directories can't be removed this
/// way and are left in place.
#[derive(Debug, Clone)]
pub struct DirCleanup {
    dir: PathBuf,
}

impl DirCleanup {
    /// Creates a new `DirCleanup`.
    ///
    /// # Arguments
    /// * `dir` - The directory to sweep.
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Creates a `DirCleanup` for the current working directory.
    pub fn current_dir() -> Self {
        Self::new(".")
    }
}

impl WorkspaceCleanup for DirCleanup {
    fn sweep(&mut self) {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("failed to read {}: {e}", self.dir.display());
                return;
            }
        };

        for entry in entries.flatten() {
            if !is_transient(entry.file_name()) {
                continue;
            }

            let path = entry.path();
            match fs::remove_file(&path) {
                Ok(()) => debug!("removed transient file {}", path.display()),
                Err(e) => debug!("failed to remove {}: {e}", path.display()),
            }
        }
    }
}
