//! Fixed filesystem layout derived from the backup base directory.
//!
//! The file names under the base are part of the deployment contract: other
//! tooling (cron jobs, monitoring, restore scripts) knows them by name, so
//! they are constants here, never configuration.

use std::path::PathBuf;

/// Compiled-in deployment default for the base directory.
pub const DEFAULT_BASE: &str = "/home/backup";
/// Compiled-in deployment default for the backup account.
pub const DEFAULT_ACCOUNT: &str = "backup";

/// Destination directory name under the base.
pub const DEST_DIR_NAME: &str = "backupdata";
/// Path-list file name under the base.
pub const FILELIST_NAME: &str = "filelist";
/// Lock marker file name under the base.
pub const LOCK_FILE_NAME: &str = ".backup-in-progress";
/// ACL snapshot file name under the destination directory.
pub const ACL_SNAPSHOT_NAME: &str = "acls.bak";

/// All canonical paths a backup run touches, resolved once from the base.
#[derive(Debug, Clone)]
pub struct BackupLayout {
    pub base: PathBuf,
    pub dest_dir: PathBuf,
    pub filelist_path: PathBuf,
    pub lock_path: PathBuf,
    pub acl_snapshot_path: PathBuf,
}

impl BackupLayout {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        let base = base.into();
        let dest_dir = base.join(DEST_DIR_NAME);
        Self {
            filelist_path: base.join(FILELIST_NAME),
            lock_path: base.join(LOCK_FILE_NAME),
            acl_snapshot_path: dest_dir.join(ACL_SNAPSHOT_NAME),
            dest_dir,
            base,
        }
    }
}
