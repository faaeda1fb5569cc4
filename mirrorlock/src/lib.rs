//! Serialized rsync backup runner with ACL lockdown.
//!
//! This crate mirrors a curated list of paths into a destination directory,
//! snapshots the destination's ACLs and then restricts them to a single
//! read-only account, all under a lock marker that keeps runs from
//! overlapping. The architecture enforces a strict separation:
//!
//! - **[`core`]**: Pure logic (path list filtering, external command
//!   argument construction). No I/O, fully testable in isolation.
//! - **[`io`]**: Side-effecting operations (filesystem layout, lock marker,
//!   process execution). Isolated behind seams to enable mocking in tests.
//!
//! Orchestration modules ([`run`], [`status`]) coordinate core logic with
//! I/O to implement CLI commands.

pub mod core;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod run;
pub mod status;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
