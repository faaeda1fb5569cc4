//! Advisory lock marker guarding against concurrent backup runs.
//!
//! The marker is a zero-byte file whose presence alone means "backup in
//! progress". It is cooperative and single-host: nothing stops a process
//! that ignores the marker, and there is no cross-host story.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;
use tracing::{debug, warn};

/// The lock marker already existed when a run tried to take it.
///
/// Carried through the `anyhow` chain so the process boundary can map lock
/// contention to its own exit code.
#[derive(Debug, Error)]
#[error("lock marker already exists at {} (another run in progress? `mirrorlock unlock` removes a stale one)", .path.display())]
pub struct LockHeldError {
    pub path: PathBuf,
}

/// Exclusive single-run lock backed by the marker file.
///
/// Acquisition creates the marker atomically and fails fast when it is
/// already present; there is no waiting or retry. The marker is removed
/// when the guard drops, so every exit path releases the lock. Call
/// [`LockGuard::release`] on the happy path so a removal failure surfaces as
/// an error instead of being swallowed by `Drop`.
#[derive(Debug)]
pub struct LockGuard {
    path: PathBuf,
    released: bool,
}

impl LockGuard {
    /// Create the marker and take the lock.
    pub fn acquire(path: &Path) -> Result<Self> {
        match fs::OpenOptions::new().write(true).create_new(true).open(path) {
            Ok(_) => {
                debug!(path = %path.display(), "lock marker created");
                Ok(Self {
                    path: path.to_path_buf(),
                    released: false,
                })
            }
            Err(err) if err.kind() == ErrorKind::AlreadyExists => Err(LockHeldError {
                path: path.to_path_buf(),
            }
            .into()),
            Err(err) => {
                Err(err).with_context(|| format!("create lock marker {}", path.display()))
            }
        }
    }

    /// Remove the marker, reporting failures. Consumes the guard.
    pub fn release(mut self) -> Result<()> {
        self.released = true;
        fs::remove_file(&self.path)
            .with_context(|| format!("remove lock marker {}", self.path.display()))?;
        debug!(path = %self.path.display(), "lock marker removed");
        Ok(())
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if let Err(err) = fs::remove_file(&self.path) {
            warn!(path = %self.path.display(), error = %err, "failed to remove lock marker");
        }
    }
}

/// Remove a marker left behind by a run that died without releasing.
///
/// Returns whether a marker was actually removed. Only hard kills (SIGKILL,
/// power loss) strand a marker now that release is guard-backed, so removal
/// is logged loudly.
pub fn remove_stale_marker(path: &Path) -> Result<bool> {
    if !path.exists() {
        debug!(path = %path.display(), "no lock marker to remove");
        return Ok(false);
    }
    fs::remove_file(path).with_context(|| format!("remove lock marker {}", path.display()))?;
    warn!(path = %path.display(), "removed stale lock marker");
    Ok(true)
}
