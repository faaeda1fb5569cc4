//! Pure selection rules for the backup path list.
//!
//! A path list is plain UTF-8 text, one path per line. Blank lines and lines
//! whose first character is `#` are operator commentary, never paths. This
//! module only does deterministic string work; the exists-on-disk filter
//! lives in [`crate::io::filelist`].

/// Return the candidate paths of a path-list file, in file order.
///
/// Keeps every line that is non-empty and does not start with `#`. Duplicates
/// are allowed and order is preserved, because both end up as rsync source
/// arguments and rsync's behavior depends on argument order.
pub fn candidate_paths(contents: &str) -> Vec<&str> {
    contents
        .lines()
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect()
}
