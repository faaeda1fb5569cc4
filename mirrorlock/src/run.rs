//! Orchestration for a full backup run.

use anyhow::Result;
use tracing::{debug, info};

use crate::io::filelist::load_selected;
use crate::io::layout::BackupLayout;
use crate::io::lock::LockGuard;
use crate::io::tools::ToolRunner;

/// Result of one backup invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The filtered path set was empty; no lock was taken and no tool ran.
    NothingToDo,
    /// The full sequence completed; `mirrored` source paths went to rsync.
    Completed { mirrored: usize },
}

/// Execute one backup run: filter the path list, then mirror, snapshot and
/// restrict under the lock.
///
/// The sequence is strictly ordered and fail-fast: the first failing step
/// aborts the rest. The lock is released on every exit path, so a tool
/// failure propagates to the caller after the marker is gone.
pub fn run_backup<T: ToolRunner>(
    layout: &BackupLayout,
    account: &str,
    tools: &T,
) -> Result<RunOutcome> {
    let sources = load_selected(layout)?;
    if sources.is_empty() {
        info!("path list selected nothing; leaving destination untouched");
        return Ok(RunOutcome::NothingToDo);
    }
    debug!(
        sources = sources.len(),
        dest = %layout.dest_dir.display(),
        "starting backup sequence"
    );

    let guard = LockGuard::acquire(&layout.lock_path)?;
    tools.mirror(&sources, &layout.dest_dir)?;
    tools.snapshot_acls(&layout.dest_dir, &layout.acl_snapshot_path)?;
    tools.restrict_acls(&layout.dest_dir, account)?;
    guard.release()?;

    info!(mirrored = sources.len(), "backup completed");
    Ok(RunOutcome::Completed {
        mirrored: sources.len(),
    })
}
