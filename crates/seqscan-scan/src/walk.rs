//! Path enumeration using jwalk.
//!
//! Each root is walked depth-first in sorted listing order. Files passing the
//! [`FileFilter`] are collected per parent directory; directories are kept
//! even when they hold no matching file so statistics count them. Walk errors
//! never abort the walk: they are collected as [`DirectoryError`]s.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use indexmap::IndexMap;
use jwalk::{Parallelism, WalkDir};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use seqscan_core::{DirectoryError, DirectoryErrorKind, ScanConfig};

use crate::cycle::CycleDetector;
use crate::filter::FileFilter;

/// Filtered files of one directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirListing {
    /// Directory path as reached from the root.
    pub directory: PathBuf,
    /// File names in listing order.
    pub names: Vec<String>,
    /// Matching files reported as orphans without tokenizing: names that
    /// are not valid UTF-8, and broken symlinks.
    pub untokenized: Vec<PathBuf>,
}

/// Everything found under one root.
#[derive(Debug, Clone, Default)]
pub struct Enumeration {
    /// Directories in walk order, the root first.
    pub listings: Vec<DirListing>,
    /// Access errors, sorted and deduplicated.
    pub errors: Vec<DirectoryError>,
    /// The walk stopped early because the token was cancelled.
    pub cancelled: bool,
}

/// Walk `root` and collect filtered file names per directory.
pub fn enumerate_root(
    root: &Path,
    config: &ScanConfig,
    filter: &FileFilter,
    cancel: &CancellationToken,
) -> Enumeration {
    let mut enumeration = Enumeration::default();

    match std::fs::metadata(root) {
        Ok(metadata) if metadata.is_dir() => {}
        Ok(_) => {
            warn!("Root is not a directory: {}", root.display());
            enumeration.errors.push(DirectoryError::not_a_directory(root));
            return enumeration;
        }
        Err(err) => {
            warn!("Cannot access root {}: {err}", root.display());
            enumeration.errors.push(DirectoryError::from_io(root, &err));
            return enumeration;
        }
    }

    let detector = Arc::new(CycleDetector::new(root));

    let mut walker = WalkDir::new(root)
        .parallelism(Parallelism::Serial)
        .sort(true)
        .skip_hidden(!config.include_hidden)
        .follow_links(config.follow_symlinks)
        .min_depth(0)
        .max_depth(if config.recursive { usize::MAX } else { 1 });

    if config.recursive && config.follow_symlinks {
        let tracker = Arc::clone(&detector);
        walker = walker.process_read_dir(move |depth, dir, _state, children| {
            // The root entry itself is passed in once with no depth.
            if depth.is_none() {
                return;
            }
            for entry in children.iter_mut().flatten() {
                if !entry.file_type().is_dir() {
                    continue;
                }
                let child = entry.path();
                if tracker.closes_cycle(dir, &child) {
                    debug!("Not descending into {}: symlink cycle", child.display());
                    entry.read_children_path = None;
                }
            }
        });
    }

    let mut dirs: IndexMap<PathBuf, DirListing> = IndexMap::new();
    dirs.insert(
        root.to_path_buf(),
        DirListing {
            directory: root.to_path_buf(),
            ..DirListing::default()
        },
    );

    for entry_result in walker {
        if cancel.is_cancelled() {
            enumeration.cancelled = true;
            break;
        }

        let entry = match entry_result {
            Ok(e) => e,
            Err(err) => {
                if let Some(path) = err.path().filter(|p| is_broken_link(p)) {
                    if let Some(listing) = untokenized_entry(&mut dirs, path, config, filter) {
                        listing.untokenized.push(path.to_path_buf());
                    }
                    continue;
                }
                let error = walk_error(&err);
                warn!("Skipping inaccessible path: {error}");
                enumeration.errors.push(error);
                continue;
            }
        };

        if entry.depth() == 0 {
            continue;
        }

        let path = entry.path();
        let file_type = entry.file_type();

        if file_type.is_dir() {
            // Directories cut off by cycle detection are never read.
            if config.recursive && entry.read_children_path.is_some() {
                dirs.entry(path.clone()).or_insert_with(|| DirListing {
                    directory: path,
                    ..DirListing::default()
                });
            }
            continue;
        }

        if file_type.is_symlink() {
            if is_broken_link(&path) {
                if let Some(listing) = untokenized_entry(&mut dirs, &path, config, filter) {
                    listing.untokenized.push(path);
                }
                continue;
            }
            // Unfollowed links still count when they point at a file.
            if !path.is_file() {
                continue;
            }
        } else if !file_type.is_file() {
            continue;
        }

        let file_name = entry.file_name();
        if !filter.matches(file_name) {
            continue;
        }

        let parent = entry.parent_path().to_path_buf();
        let listing = dirs.entry(parent.clone()).or_insert_with(|| DirListing {
            directory: parent,
            ..DirListing::default()
        });
        match file_name.to_str() {
            Some(name) => listing.names.push(name.to_string()),
            None => listing.untokenized.push(path),
        }
    }

    enumeration.listings = dirs.into_values().collect();
    enumeration.errors.extend(detector.cycle_errors());
    enumeration.errors.sort();
    enumeration.errors.dedup();
    enumeration
}

/// A symlink whose target does not exist.
fn is_broken_link(path: &Path) -> bool {
    std::fs::symlink_metadata(path).is_ok_and(|m| m.file_type().is_symlink()) && !path.exists()
}

/// Listing of the directory holding `path`, if its name passes the filters.
fn untokenized_entry<'a>(
    dirs: &'a mut IndexMap<PathBuf, DirListing>,
    path: &Path,
    config: &ScanConfig,
    filter: &FileFilter,
) -> Option<&'a mut DirListing> {
    let name = path.file_name()?;
    if config.should_skip_hidden(&name.to_string_lossy()) || !filter.matches(name) {
        return None;
    }
    let parent = path.parent()?.to_path_buf();
    Some(dirs.entry(parent.clone()).or_insert_with(|| DirListing {
        directory: parent,
        ..DirListing::default()
    }))
}

/// Convert a jwalk error into a directory error.
fn walk_error(err: &jwalk::Error) -> DirectoryError {
    let path = err.path().map(Path::to_path_buf).unwrap_or_default();
    if let Some(ancestor) = err.loop_ancestor() {
        return DirectoryError::symlink_cycle(path, ancestor);
    }
    match err.io_error() {
        Some(io) => DirectoryError::from_io(path, io),
        None => DirectoryError::new(path, err.to_string(), DirectoryErrorKind::ReadError),
    }
}
