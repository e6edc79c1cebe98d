//! Filesystem path helpers.

use std::path::{Path, PathBuf};

/// Normalize a path to absolute form.
///
/// Tries `canonicalize()` first, then falls back to joining relative
/// paths onto the current directory.
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
        }
    })
}

/// Last segment of a URL path, ignoring empty segments.
///
/// `"/a/b/logo.png"` and `"logo.png/"` both yield `"logo.png"`.
pub fn last_segment(url_path: &str) -> Option<&str> {
    url_path.rsplit('/').find(|s| !s.is_empty())
}

/// Whether a file name is safe to serve straight from the docroot.
pub fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\'])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_keeps_absolute() {
        let dir = tempfile::TempDir::new().unwrap();
        let norm = normalize_path(dir.path());
        assert!(norm.is_absolute());
        assert!(norm.exists());
    }

    #[test]
    fn test_last_segment() {
        assert_eq!(last_segment("/a/b/logo.png"), Some("logo.png"));
        assert_eq!(last_segment("logo.png/"), Some("logo.png"));
        assert_eq!(last_segment("/"), None);
    }

    #[test]
    fn test_plain_file_name() {
        assert!(is_plain_file_name("logo.png"));
        assert!(!is_plain_file_name(".."));
        assert!(!is_plain_file_name("a/b"));
        assert!(!is_plain_file_name(""));
    }
}
