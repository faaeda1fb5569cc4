//! Subprocess adapters for the external backup tools.
//!
//! The [`ToolRunner`] trait decouples the run sequence from the real
//! `rsync`/`getfacl`/`setfacl` binaries. Tests use a recording runner that
//! captures invocations without spawning anything; the system runner here
//! re-executes the installed binaries, since reimplementing rsync or POSIX
//! ACL handling in-process is out of scope.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::{Context, Result, anyhow};
use tracing::{debug, info, instrument};

use crate::core::cmdline::{
    FIND_BIN, GETFACL_BIN, RSYNC_BIN, SETFACL_BIN, mirror_args, restrict_dirs_args,
    restrict_files_args, snapshot_args,
};

/// Abstraction over the external tool sequence of a backup run.
pub trait ToolRunner {
    /// Mirror `sources` into `dest`, deleting destination entries that no
    /// longer exist in any source.
    fn mirror(&self, sources: &[PathBuf], dest: &Path) -> Result<()>;

    /// Recursively capture `dest`'s current ACLs into `snapshot`.
    fn snapshot_acls(&self, dest: &Path, snapshot: &Path) -> Result<()>;

    /// Grant `account` read-only entries on everything under `dest`, plus
    /// read+execute on directories so the account can traverse the tree.
    fn restrict_acls(&self, dest: &Path, account: &str) -> Result<()>;
}

/// Runner that spawns the system binaries.
pub struct SystemToolRunner;

impl ToolRunner for SystemToolRunner {
    #[instrument(skip_all, fields(sources = sources.len()))]
    fn mirror(&self, sources: &[PathBuf], dest: &Path) -> Result<()> {
        // rsync's progress output is noise in a scheduled run; its stderr
        // still reaches the operator.
        let mut cmd = Command::new(RSYNC_BIN);
        cmd.args(mirror_args(sources, dest)).stdout(Stdio::null());
        run_checked(RSYNC_BIN, cmd)?;
        info!(dest = %dest.display(), "mirror completed");
        Ok(())
    }

    fn snapshot_acls(&self, dest: &Path, snapshot: &Path) -> Result<()> {
        let out = File::create(snapshot)
            .with_context(|| format!("create acl snapshot {}", snapshot.display()))?;
        let mut cmd = Command::new(GETFACL_BIN);
        cmd.args(snapshot_args()).current_dir(dest).stdout(out);
        run_checked(GETFACL_BIN, cmd)?;
        info!(snapshot = %snapshot.display(), "acl snapshot written");
        Ok(())
    }

    fn restrict_acls(&self, dest: &Path, account: &str) -> Result<()> {
        let mut files = Command::new(SETFACL_BIN);
        files.args(restrict_files_args(account)).current_dir(dest);
        run_checked(SETFACL_BIN, files)?;

        let mut dirs = Command::new(FIND_BIN);
        dirs.args(restrict_dirs_args(account)).current_dir(dest);
        run_checked(FIND_BIN, dirs)?;

        info!(account, dest = %dest.display(), "destination acls restricted");
        Ok(())
    }
}

/// Run a prepared command to completion, failing on a non-zero exit.
///
/// Blocks until the child exits; there is deliberately no timeout, so a
/// hung tool hangs the whole run. stderr is inherited so the tool's own
/// diagnostics reach the operator directly.
fn run_checked(tool: &str, mut cmd: Command) -> Result<()> {
    debug!(tool, "spawning");
    let status = cmd.status().with_context(|| format!("spawn {tool}"))?;
    if !status.success() {
        return Err(match status.code() {
            Some(code) => anyhow!("{tool} failed with exit status {code}"),
            None => anyhow!("{tool} terminated by signal"),
        });
    }
    debug!(tool, "finished");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_checked_accepts_a_clean_exit() {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", "exit 0"]);
        run_checked("sh", cmd).expect("clean exit");
    }

    #[test]
    fn run_checked_reports_the_exit_status() {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", "exit 7"]);
        let err = run_checked("sh", cmd).unwrap_err();
        assert!(err.to_string().contains("sh failed with exit status 7"));
    }

    #[test]
    fn run_checked_reports_spawn_failures() {
        let cmd = Command::new("mirrorlock-no-such-binary");
        let err = run_checked("mirrorlock-no-such-binary", cmd).unwrap_err();
        assert!(err.to_string().contains("spawn mirrorlock-no-such-binary"));
    }
}
