//! Read-only inspection of a backup base directory.
//!
//! Nothing here takes the lock or touches the destination; `gather_status`
//! only reads, so it stays safe to call while a run is in flight.

use std::fmt::Write as _;
use std::path::PathBuf;

use crate::core::cmdline::REQUIRED_TOOLS;
use crate::io::filelist::load_selected;
use crate::io::layout::BackupLayout;

/// Whether one external tool resolves on `PATH`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolStatus {
    pub name: &'static str,
    /// Resolved binary path, or `None` when lookup failed.
    pub path: Option<PathBuf>,
}

/// Snapshot of everything `status` reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    pub base: PathBuf,
    pub account: String,
    pub filelist_present: bool,
    /// Selected path count, or `None` when the list is missing or unreadable.
    pub selected: Option<usize>,
    pub dest_present: bool,
    pub lock_held: bool,
    pub tools: Vec<ToolStatus>,
}

/// Inspect `layout` without modifying anything under it.
pub fn gather_status(layout: &BackupLayout, account: &str) -> StatusReport {
    let filelist_present = layout.filelist_path.exists();
    let selected = load_selected(layout).ok().map(|sources| sources.len());
    let tools = REQUIRED_TOOLS
        .iter()
        .map(|&name| ToolStatus {
            name,
            path: which::which(name).ok(),
        })
        .collect();

    StatusReport {
        base: layout.base.clone(),
        account: account.to_owned(),
        filelist_present,
        selected,
        dest_present: layout.dest_dir.is_dir(),
        lock_held: layout.lock_path.exists(),
        tools,
    }
}

impl StatusReport {
    /// Render the report as the human-readable block `status` prints.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "base:        {}", self.base.display());
        let _ = writeln!(out, "account:     {}", self.account);
        let path_list = match (self.filelist_present, self.selected) {
            (false, _) => "missing".to_owned(),
            (true, None) => "unreadable".to_owned(),
            (true, Some(n)) => format!("{n} selected"),
        };
        let _ = writeln!(out, "path list:   {path_list}");
        let _ = writeln!(
            out,
            "destination: {}",
            if self.dest_present { "present" } else { "missing" }
        );
        let _ = writeln!(
            out,
            "lock:        {}",
            if self.lock_held { "held" } else { "free" }
        );
        let _ = writeln!(out, "tools:");
        for tool in &self.tools {
            match &tool.path {
                Some(path) => {
                    let _ = writeln!(out, "  {}: {}", tool.name, path.display());
                }
                None => {
                    let _ = writeln!(out, "  {}: missing", tool.name);
                }
            }
        }
        out
    }
}
