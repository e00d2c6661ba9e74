//! Symlink cycle detection along the descent path.

use std::path::{Path, PathBuf};

use dashmap::DashMap;

use seqscan_core::DirectoryError;

/// Detects directory symlinks that lead back to one of their own ancestors.
///
/// Only the chain from the walk root down to the directory being read is
/// considered, so a second link to a directory elsewhere in the tree (such as
/// `latest -> v003`) is walked normally. Real paths are cached per path as
/// reached from the root.
#[derive(Debug)]
pub struct CycleDetector {
    root: PathBuf,
    real_paths: DashMap<PathBuf, Option<PathBuf>>,
    cycles: DashMap<PathBuf, PathBuf>,
}

impl CycleDetector {
    /// Create a detector for a walk starting at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            real_paths: DashMap::new(),
            cycles: DashMap::new(),
        }
    }

    /// Canonical path of `path`, cached.
    fn real_path(&self, path: &Path) -> Option<PathBuf> {
        if let Some(real) = self.real_paths.get(path) {
            return real.clone();
        }
        let real = path.canonicalize().ok();
        self.real_paths.insert(path.to_path_buf(), real.clone());
        real
    }

    /// Check whether descending into `child`, found while reading `dir`,
    /// would revisit `dir` or one of its ancestors up to the root.
    /// Cycles are recorded.
    pub fn closes_cycle(&self, dir: &Path, child: &Path) -> bool {
        let Some(target) = self.real_path(child) else {
            return false;
        };

        let is_cycle = dir
            .ancestors()
            .take_while(|ancestor| ancestor.starts_with(&self.root))
            .filter_map(|ancestor| self.real_path(ancestor))
            .any(|real| real == target);

        if is_cycle {
            self.cycles.insert(child.to_path_buf(), target);
        }
        is_cycle
    }

    /// Number of cycles found.
    pub fn len(&self) -> usize {
        self.cycles.len()
    }

    /// Check if no cycle was found.
    pub fn is_empty(&self) -> bool {
        self.cycles.is_empty()
    }

    /// Recorded cycles as directory errors, sorted by link path.
    pub fn cycle_errors(&self) -> Vec<DirectoryError> {
        let mut errors: Vec<DirectoryError> = self
            .cycles
            .iter()
            .map(|entry| DirectoryError::symlink_cycle(entry.key().clone(), entry.value().clone()))
            .collect();
        errors.sort();
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seqscan_core::DirectoryErrorKind;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_plain_subdirectory_is_not_a_cycle() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("v003/beauty")).unwrap();

        let detector = CycleDetector::new(temp.path());
        assert!(!detector.closes_cycle(temp.path(), &temp.path().join("v003")));
        assert!(!detector.closes_cycle(&temp.path().join("v003"), &temp.path().join("v003/beauty")));
        assert!(detector.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_alias_is_not_a_cycle() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("v003")).unwrap();
        std::os::unix::fs::symlink(temp.path().join("v003"), temp.path().join("latest")).unwrap();

        let detector = CycleDetector::new(temp.path());
        assert!(!detector.closes_cycle(temp.path(), &temp.path().join("latest")));
        assert!(!detector.closes_cycle(temp.path(), &temp.path().join("v003")));
        assert!(detector.cycle_errors().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_link_to_ancestor_is_a_cycle() {
        let temp = TempDir::new().unwrap();
        let shot = temp.path().join("sh010");
        fs::create_dir(&shot).unwrap();
        std::os::unix::fs::symlink(temp.path(), shot.join("up")).unwrap();

        let detector = CycleDetector::new(temp.path());
        assert!(detector.closes_cycle(&shot, &shot.join("up")));
        assert_eq!(detector.len(), 1);

        let errors = detector.cycle_errors();
        assert_eq!(errors[0].path, shot.join("up"));
        assert_eq!(errors[0].kind, DirectoryErrorKind::SymlinkCycle);
    }
}
