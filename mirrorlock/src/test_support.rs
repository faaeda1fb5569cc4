//! Shared fixtures for unit and integration tests.
//!
//! `ScratchBase` stands in for the real base directory and
//! `RecordingToolRunner` stands in for the external tools, so tests never
//! invoke rsync, getfacl or setfacl.

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use tempfile::TempDir;

use crate::io::layout::BackupLayout;
use crate::io::tools::ToolRunner;

/// Temporary base directory wired into a [`BackupLayout`].
///
/// Only the base itself exists on creation; the destination directory, path
/// list and lock marker appear when a test (or the code under test) makes
/// them.
pub struct ScratchBase {
    _temp: TempDir,
    pub layout: BackupLayout,
}

impl ScratchBase {
    pub fn new() -> Result<Self> {
        let temp = TempDir::new().context("create scratch base directory")?;
        let layout = BackupLayout::new(temp.path());
        Ok(Self {
            _temp: temp,
            layout,
        })
    }

    /// Write the path list with one entry per line.
    pub fn write_filelist(&self, lines: &[&str]) -> Result<()> {
        let mut contents = lines.join("\n");
        contents.push('\n');
        fs::write(&self.layout.filelist_path, contents).with_context(|| {
            format!(
                "write path list {}",
                self.layout.filelist_path.display()
            )
        })
    }

    /// Create a small file under the base and return its absolute path,
    /// suitable for listing in the path list.
    pub fn create_source_file(&self, name: &str) -> Result<PathBuf> {
        let path = self.layout.base.join(name);
        fs::write(&path, b"scratch contents")
            .with_context(|| format!("write source file {}", path.display()))?;
        Ok(path)
    }
}

/// One recorded invocation of an external tool step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolCall {
    Mirror {
        sources: Vec<PathBuf>,
        dest: PathBuf,
    },
    SnapshotAcls {
        dest: PathBuf,
        snapshot: PathBuf,
    },
    RestrictAcls {
        dest: PathBuf,
        account: String,
    },
}

/// Which step a [`RecordingToolRunner`] should fail at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailOn {
    Mirror,
    SnapshotAcls,
    RestrictAcls,
}

/// [`ToolRunner`] that records calls instead of spawning processes, with an
/// optional injected failure.
///
/// A failing step is still recorded, so tests can assert both where the
/// sequence stopped and what ran before it.
pub struct RecordingToolRunner {
    calls: RefCell<Vec<ToolCall>>,
    fail_on: Option<FailOn>,
}

impl RecordingToolRunner {
    pub fn new() -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            fail_on: None,
        }
    }

    pub fn failing_on(step: FailOn) -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            fail_on: Some(step),
        }
    }

    pub fn calls(&self) -> Vec<ToolCall> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: ToolCall, step: FailOn) -> Result<()> {
        self.calls.borrow_mut().push(call);
        if self.fail_on == Some(step) {
            return Err(anyhow!("{step:?} failed (injected)"));
        }
        Ok(())
    }
}

impl Default for RecordingToolRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolRunner for RecordingToolRunner {
    fn mirror(&self, sources: &[PathBuf], dest: &Path) -> Result<()> {
        self.record(
            ToolCall::Mirror {
                sources: sources.to_vec(),
                dest: dest.to_path_buf(),
            },
            FailOn::Mirror,
        )
    }

    fn snapshot_acls(&self, dest: &Path, snapshot: &Path) -> Result<()> {
        self.record(
            ToolCall::SnapshotAcls {
                dest: dest.to_path_buf(),
                snapshot: snapshot.to_path_buf(),
            },
            FailOn::SnapshotAcls,
        )
    }

    fn restrict_acls(&self, dest: &Path, account: &str) -> Result<()> {
        self.record(
            ToolCall::RestrictAcls {
                dest: dest.to_path_buf(),
                account: account.to_owned(),
            },
            FailOn::RestrictAcls,
        )
    }
}
