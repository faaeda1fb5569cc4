//! I/O helpers for backup commands.

pub mod filelist;
pub mod layout;
pub mod lock;
pub mod tools;
