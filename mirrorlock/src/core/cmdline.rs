//! Wire-format argument builders for the external tools.
//!
//! The argument shapes here are compatibility contracts: existing deployments
//! pair this tool with the exact `rsync`/`getfacl`/`setfacl` invocations
//! below, so changes to flags or ordering are breaking changes. Building the
//! vectors in pure functions keeps the wire shape unit-testable without
//! spawning anything; [`crate::io::tools`] does the spawning.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

pub const RSYNC_BIN: &str = "rsync";
pub const GETFACL_BIN: &str = "getfacl";
pub const SETFACL_BIN: &str = "setfacl";
pub const FIND_BIN: &str = "find";

/// Every external binary a full run needs, in invocation order.
pub const REQUIRED_TOOLS: [&str; 4] = [RSYNC_BIN, GETFACL_BIN, SETFACL_BIN, FIND_BIN];

/// `rsync -aRPEXA --delete --exclude=<dest> <sources...> <dest>`
///
/// Archive mode with relative paths, progress, and extended attribute/ACL
/// preservation; destination entries that no longer exist in any source are
/// deleted. The destination itself is always excluded so a listed ancestor of
/// the destination can never turn the mirror into a source of itself.
pub fn mirror_args(sources: &[PathBuf], dest: &Path) -> Vec<OsString> {
    let mut exclude = OsString::from("--exclude=");
    exclude.push(dest.as_os_str());

    let mut args = vec![OsString::from("-aRPEXA"), OsString::from("--delete"), exclude];
    args.extend(sources.iter().map(|source| source.as_os_str().to_os_string()));
    args.push(dest.as_os_str().to_os_string());
    args
}

/// `getfacl -R .`, run with the destination as working directory and stdout
/// redirected into the snapshot file.
pub fn snapshot_args() -> Vec<OsString> {
    vec![OsString::from("-R"), OsString::from(".")]
}

/// `setfacl -R -m u:<account>:r .`, adding read-only entries for the backup
/// account on everything under the destination.
pub fn restrict_files_args(account: &str) -> Vec<OsString> {
    vec![
        OsString::from("-R"),
        OsString::from("-m"),
        OsString::from(format!("u:{account}:r")),
        OsString::from("."),
    ]
}

/// `find . -type d -exec setfacl -m u:<account>:rx {} ;`. Directories
/// additionally get execute so the account can traverse the tree.
pub fn restrict_dirs_args(account: &str) -> Vec<OsString> {
    vec![
        OsString::from("."),
        OsString::from("-type"),
        OsString::from("d"),
        OsString::from("-exec"),
        OsString::from(SETFACL_BIN),
        OsString::from("-m"),
        OsString::from(format!("u:{account}:rx")),
        OsString::from("{}"),
        OsString::from(";"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn os(values: &[&str]) -> Vec<OsString> {
        values.iter().copied().map(OsString::from).collect()
    }

    #[test]
    fn mirror_args_match_wire_format() {
        let sources = vec![PathBuf::from("/etc"), PathBuf::from("/home/alice")];
        let dest = Path::new("/home/backup/backupdata");
        assert_eq!(
            mirror_args(&sources, dest),
            os(&[
                "-aRPEXA",
                "--delete",
                "--exclude=/home/backup/backupdata",
                "/etc",
                "/home/alice",
                "/home/backup/backupdata",
            ])
        );
    }

    #[test]
    fn mirror_args_always_exclude_the_destination() {
        let sources = vec![PathBuf::from("/tmp/exists")];
        let dest = Path::new("/srv/backupdata");
        let args = mirror_args(&sources, dest);
        assert!(args.contains(&OsString::from("--exclude=/srv/backupdata")));
    }

    #[test]
    fn snapshot_args_match_wire_format() {
        assert_eq!(snapshot_args(), os(&["-R", "."]));
    }

    #[test]
    fn restrict_files_args_match_wire_format() {
        assert_eq!(restrict_files_args("backup"), os(&["-R", "-m", "u:backup:r", "."]));
    }

    #[test]
    fn restrict_dirs_args_match_wire_format() {
        assert_eq!(
            restrict_dirs_args("backup"),
            os(&[".", "-type", "d", "-exec", "setfacl", "-m", "u:backup:rx", "{}", ";"])
        );
    }
}
