pub mod metadata;

use crate::SUPPORTED_EXTENSION;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum LocateError {
    #[error("{0} does not exist")]
    NotFound(PathBuf),
    #[error("{0} is not a directory")]
    NotADirectory(PathBuf),
}

/// Refuse to work on anything but an existing directory.
pub fn validate_root(root: &Path) -> Result<(), LocateError> {
    if !root.exists() {
        return Err(LocateError::NotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(LocateError::NotADirectory(root.to_path_buf()));
    }
    Ok(())
}

/// Whether a path carries the supported audio extension (any case).
pub fn is_candidate(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(SUPPORTED_EXTENSION))
}

/// Lazily walk `root` recursively and yield every candidate audio file.
///
/// Each call starts a fresh walk. Order is whatever the directory listing
/// gives and must not be relied on. Anything that is not a candidate file,
/// including unreadable directories, is skipped and left where it is.
pub fn list_candidates(root: &Path, follow_links: bool) -> impl Iterator<Item = PathBuf> + use<> {
    WalkDir::new(root)
        .follow_links(follow_links)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(e) => Some(e),
            Err(e) => {
                log::warn!("Skipping unreadable entry: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file() && is_candidate(entry.path()))
        .map(walkdir::DirEntry::into_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::fs;
    use tempfile::tempdir;

    fn names(root: &Path) -> HashSet<String> {
        list_candidates(root, false)
            .map(|p| p.strip_prefix(root).unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_is_candidate_case_insensitive() {
        assert!(is_candidate(Path::new("/music/a.mp3")));
        assert!(is_candidate(Path::new("/music/a.MP3")));
        assert!(is_candidate(Path::new("/music/a.Mp3")));
        assert!(!is_candidate(Path::new("/music/a.flac")));
        assert!(!is_candidate(Path::new("/music/a.mp3.txt")));
        assert!(!is_candidate(Path::new("/music/mp3")));
    }

    #[test]
    fn test_lists_nested_candidates_only() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let nested = root.join("disc 1").join("extras");
        fs::create_dir_all(&nested).unwrap();
        fs::write(root.join("top.mp3"), b"x").unwrap();
        fs::write(root.join("LOUD.MP3"), b"x").unwrap();
        fs::write(root.join("cover.jpg"), b"x").unwrap();
        fs::write(nested.join("deep.mp3"), b"x").unwrap();
        // A directory with the right extension is not a candidate
        fs::create_dir_all(root.join("folder.mp3")).unwrap();

        let expected: HashSet<String> = ["top.mp3", "LOUD.MP3", "disc 1/extras/deep.mp3"]
            .iter()
            .map(|s| Path::new(s).to_string_lossy().into_owned())
            .collect();
        assert_eq!(names(root), expected);
    }

    #[test]
    fn test_each_call_is_a_fresh_walk() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("one.mp3"), b"x").unwrap();
        assert_eq!(list_candidates(dir.path(), false).count(), 1);

        fs::write(dir.path().join("two.mp3"), b"x").unwrap();
        assert_eq!(list_candidates(dir.path(), false).count(), 2);
    }

    #[test]
    fn test_validate_root() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("a.mp3");
        fs::write(&file, b"x").unwrap();

        assert!(validate_root(dir.path()).is_ok());
        assert!(matches!(
            validate_root(&dir.path().join("missing")),
            Err(LocateError::NotFound(_))
        ));
        assert!(matches!(validate_root(&file), Err(LocateError::NotADirectory(_))));
    }
}
