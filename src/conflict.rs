//! Name-collision handling for file moves.
//!
//! When a destination path is already taken, a parenthesized counter is
//! appended to the file's base name (`a.txt` becomes `a (1).txt`, then
//! `a (2).txt`, and so on) until a free name is found.
//!
//! The check and the later move are not atomic: another process may create
//! the chosen path in between. Callers treat that case as a recoverable move
//! failure.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Splits a file name into `(base, extension)`, the extension keeping its
/// leading dot.
///
/// Leading dots belong to the base, so `.gitignore` has no extension. A name
/// ending in a dot yields `"."` as its extension.
///
/// # Examples
///
/// ```
/// use reorg::conflict::split_extension;
///
/// assert_eq!(split_extension("notes.txt"), ("notes", ".txt"));
/// assert_eq!(split_extension("archive.tar.gz"), ("archive.tar", ".gz"));
/// assert_eq!(split_extension(".gitignore"), (".gitignore", ""));
/// assert_eq!(split_extension("README"), ("README", ""));
/// ```
pub fn split_extension(name: &str) -> (&str, &str) {
    let leading_dots = name.len() - name.trim_start_matches('.').len();
    match name[leading_dots..].rfind('.') {
        Some(index) => name.split_at(leading_dots + index),
        None => (name, ""),
    }
}

/// Returns the extension of `name` without its dot, or `None` if it has none.
///
/// A trailing dot (`"file."`) counts as no extension.
pub fn extension_of(name: &str) -> Option<&str> {
    let (_, extension) = split_extension(name);
    extension.strip_prefix('.').filter(|ext| !ext.is_empty())
}

/// Returns a path derived from `desired` that does not exist right now.
///
/// `desired` itself is expected to be occupied; the first candidate tried is
/// `"<base> (1)<extension>"`.
///
/// # Examples
///
/// ```no_run
/// use reorg::conflict::resolve_conflict;
/// use std::path::Path;
///
/// // With /data/txt/a.txt present:
/// let free = resolve_conflict(Path::new("/data/txt/a.txt"));
/// assert_eq!(free, Path::new("/data/txt/a (1).txt"));
/// ```
pub fn resolve_conflict(desired: &Path) -> PathBuf {
    let parent = desired.parent().unwrap_or_else(|| Path::new(""));
    let file_name = desired.file_name().unwrap_or_default();

    // Non-UTF-8 names keep their raw bytes and get the counter appended.
    let (base, extension) = match file_name.to_str() {
        Some(name) => {
            let (base, extension) = split_extension(name);
            (OsString::from(base), extension.to_string())
        }
        None => (file_name.to_os_string(), String::new()),
    };

    let mut counter: u64 = 1;
    loop {
        let mut candidate_name = base.clone();
        candidate_name.push(format!(" ({}){}", counter, extension));
        let candidate = parent.join(candidate_name);
        if !candidate.exists() {
            return candidate;
        }
        counter += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_split_extension_rules() {
        assert_eq!(split_extension("photo.png"), ("photo", ".png"));
        assert_eq!(split_extension("file."), ("file", "."));
        assert_eq!(split_extension("..hidden"), ("..hidden", ""));
        assert_eq!(split_extension(".config.toml"), (".config", ".toml"));
        assert_eq!(split_extension(""), ("", ""));
    }

    #[test]
    fn test_extension_of_strips_exactly_one_dot() {
        assert_eq!(extension_of("notes.txt"), Some("txt"));
        assert_eq!(extension_of("weird..md"), Some("md"));
        assert_eq!(extension_of("Makefile"), None);
        assert_eq!(extension_of("trailing."), None);
        assert_eq!(extension_of(".gitattributes"), None);
    }

    #[test]
    fn test_resolve_conflict_first_candidate() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let desired = temp_dir.path().join("a.txt");
        fs::write(&desired, "first").expect("Failed to write file");

        assert_eq!(resolve_conflict(&desired), temp_dir.path().join("a (1).txt"));
    }

    #[test]
    fn test_resolve_conflict_skips_taken_counters() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = temp_dir.path();
        fs::write(base.join("a.txt"), "0").expect("Failed to write file");
        fs::write(base.join("a (1).txt"), "1").expect("Failed to write file");
        fs::write(base.join("a (2).txt"), "2").expect("Failed to write file");

        assert_eq!(resolve_conflict(&base.join("a.txt")), base.join("a (3).txt"));
    }

    #[test]
    fn test_resolve_conflict_without_extension() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let desired = temp_dir.path().join("LICENSE");
        fs::write(&desired, "mit").expect("Failed to write file");

        assert_eq!(resolve_conflict(&desired), temp_dir.path().join("LICENSE (1)"));
    }

    #[test]
    fn test_resolve_conflict_dotfile() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let desired = temp_dir.path().join(".env");
        fs::write(&desired, "KEY=1").expect("Failed to write file");

        assert_eq!(resolve_conflict(&desired), temp_dir.path().join(".env (1)"));
    }
}
