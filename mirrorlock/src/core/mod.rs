//! Deterministic, pure logic shared by the backup commands.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! data and return deterministic outputs suitable for tests.

pub mod cmdline;
pub mod filelist;
