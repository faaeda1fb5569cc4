//! Stable exit codes for mirrorlock CLI commands.

/// Command succeeded, including the empty-path-set no-op.
pub const OK: i32 = 0;
/// Command failed: unreadable path list, bad layout, or an external tool error.
pub const FAILED: i32 = 1;
/// `mirrorlock run` found the lock marker already present.
pub const LOCKED: i32 = 2;
