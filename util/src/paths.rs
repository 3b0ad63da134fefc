use crate::config;
use std::path::{Component, Path, PathBuf};

/// Report storage root (absolute), from `config::report_storage_root()`.
/// If relative in env, resolve against current_dir().
pub fn storage_root() -> PathBuf {
    absolutize(PathBuf::from(config::report_storage_root()))
}

/// Resolve a possibly relative path against the current working directory.
pub fn absolutize(p: PathBuf) -> PathBuf {
    if p.is_absolute() {
        p
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(p)
    }
}

/// True when `key` is a relative path made only of normal segments
/// (no `..`, no root, no drive prefix).
pub fn is_safe_relative(key: &str) -> bool {
    let trimmed = key.trim();
    if trimmed.is_empty() {
        return false;
    }
    Path::new(trimmed)
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

/// Folder holding every report of one assignment: {root}/{assignment}
pub fn assignment_dir(root: &Path, assignment: &str) -> PathBuf {
    root.join(assignment.trim())
}

/// Relative location of `path` under `root`, always with forward slashes.
///
/// `None` when `path` is outside `root` or is not valid UTF-8; a lossy
/// conversion would name a file that does not exist.
pub fn relative_location(root: &Path, path: &Path) -> Option<String> {
    path.strip_prefix(root)
        .ok()
        .and_then(Path::to_str)
        .map(|rel| rel.replace('\\', "/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safe_relative_accepts_nested_keys() {
        assert!(is_safe_relative("lab1"));
        assert!(is_safe_relative("2025/lab1"));
        assert!(is_safe_relative("  lab-2 "));
    }

    #[test]
    fn safe_relative_rejects_escapes() {
        assert!(!is_safe_relative(""));
        assert!(!is_safe_relative("   "));
        assert!(!is_safe_relative("../etc"));
        assert!(!is_safe_relative("lab1/../../x"));
        assert!(!is_safe_relative("/abs/path"));
    }

    #[test]
    fn relative_location_uses_forward_slashes() {
        let root = Path::new("/data/testresult");
        let file = root.join("lab1").join("bob@school.org").join("result.xml");
        assert_eq!(
            relative_location(root, &file).as_deref(),
            Some("lab1/bob@school.org/result.xml")
        );
        assert_eq!(relative_location(root, Path::new("/elsewhere/x.xml")), None);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn relative_location_rejects_non_utf8_names() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let root = Path::new("/data/testresult");
        let file = root.join("lab1").join(OsStr::from_bytes(b"res\xffult.xml"));
        assert_eq!(relative_location(root, &file), None);
    }

    #[test]
    fn assignment_dir_trims_key() {
        let root = Path::new("/r");
        assert_eq!(assignment_dir(root, " lab1 "), PathBuf::from("/r/lab1"));
    }
}
