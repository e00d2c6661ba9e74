//! Scan result container and statistics.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::DirectoryError;
use crate::group::DirectoryGroups;
use crate::sequence::Sequence;

/// Summary statistics for a scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanStats {
    /// Directories whose entries were grouped.
    pub dirs_scanned: u64,
    /// Files that passed the mask and extension filters.
    pub files_matched: u64,
    /// Sequences detected.
    pub sequences: u64,
    /// Files that joined no sequence.
    pub orphans: u64,
}

impl ScanStats {
    /// Create new empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Update stats with one grouped directory.
    pub fn record_dir(&mut self, groups: &DirectoryGroups) {
        self.dirs_scanned += 1;
        self.files_matched += groups.file_count() as u64;
        self.sequences += groups.sequences.len() as u64;
        self.orphans += groups.orphans.len() as u64;
    }

    /// Add another set of stats.
    pub fn merge(&mut self, other: &ScanStats) {
        self.dirs_scanned += other.dirs_scanned;
        self.files_matched += other.files_matched;
        self.sequences += other.sequences;
        self.orphans += other.orphans;
    }
}

/// Outcome of one scan. Created fresh per scan and not mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    /// Detected sequences, in root order then key order.
    pub seqs: Vec<Sequence>,
    /// Files that joined no sequence.
    pub orphans: Vec<PathBuf>,
    /// Per-directory errors encountered while enumerating.
    pub errors: Vec<DirectoryError>,
    /// Summary statistics.
    pub stats: ScanStats,
    /// The scan was cancelled; the result covers only part of the tree.
    #[serde(default)]
    pub cancelled: bool,
}

impl ScanResult {
    /// Create an empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one directory's groups.
    pub fn push_groups(&mut self, groups: DirectoryGroups) {
        self.stats.record_dir(&groups);
        self.seqs.extend(groups.sequences);
        self.orphans.extend(groups.orphans);
    }

    /// Append another result (used to concatenate roots in order).
    pub fn append(&mut self, other: ScanResult) {
        self.seqs.extend(other.seqs);
        self.orphans.extend(other.orphans);
        self.errors.extend(other.errors);
        self.stats.merge(&other.stats);
        self.cancelled |= other.cancelled;
    }

    /// The sequence containing `path`, if any.
    pub fn find(&self, path: &Path) -> Option<&Sequence> {
        self.seqs.iter().find(|seq| seq.contains(path))
    }

    /// Number of sequences.
    #[must_use]
    pub fn len(&self) -> usize {
        self.seqs.len()
    }

    /// Check if no sequence was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seqs.is_empty()
    }

    /// Files in sequences plus orphans.
    pub fn total_files(&self) -> usize {
        self.seqs.iter().map(Sequence::frame_count).sum::<usize>() + self.orphans.len()
    }

    /// Check if any directory could not be read.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

impl std::fmt::Display for ScanResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ScanResult(seqs={}, orphans={}, errors={})",
            self.seqs.len(),
            self.orphans.len(),
            self.errors.len()
        )
    }
}
