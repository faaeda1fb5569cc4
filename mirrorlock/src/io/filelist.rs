//! Path-list loading and existence filtering.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::debug;

use crate::core::filelist::candidate_paths;
use crate::io::layout::BackupLayout;

/// Load the path list and return the effective source set, in file order.
///
/// Candidates that do not exist right now are dropped. Existence is checked
/// exactly once here and not re-verified before use; a path that disappears
/// between this check and the mirror invocation is rsync's to report.
pub fn load_selected(layout: &BackupLayout) -> Result<Vec<PathBuf>> {
    let contents = fs::read_to_string(&layout.filelist_path)
        .with_context(|| format!("read path list {}", layout.filelist_path.display()))?;

    let mut selected = Vec::new();
    let mut skipped = 0usize;
    for candidate in candidate_paths(&contents) {
        let path = PathBuf::from(candidate);
        if path.exists() {
            selected.push(path);
        } else {
            skipped += 1;
            debug!(path = candidate, "skipping listed path that does not exist");
        }
    }
    debug!(selected = selected.len(), skipped, "path list filtered");
    Ok(selected)
}
