//! Scan progress reporting.

use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use seqscan_core::DirectoryGroups;

/// Progress information during a scan.
#[derive(Debug, Clone)]
pub struct ScanProgress {
    /// Number of directories grouped so far.
    pub dirs_scanned: u64,
    /// Number of files that passed the filters so far.
    pub files_matched: u64,
    /// Number of sequences detected so far.
    pub sequences_found: u64,
    /// Directory most recently grouped.
    pub current_dir: PathBuf,
    /// Number of directory errors encountered.
    pub errors_count: u64,
    /// Time elapsed since scan started.
    pub elapsed: Duration,
}

impl ScanProgress {
    /// Create initial progress state.
    pub fn new() -> Self {
        Self {
            dirs_scanned: 0,
            files_matched: 0,
            sequences_found: 0,
            current_dir: PathBuf::new(),
            errors_count: 0,
            elapsed: Duration::ZERO,
        }
    }

    /// Calculate scan rate in files per second.
    pub fn files_per_second(&self) -> f64 {
        if self.elapsed.as_secs_f64() > 0.0 {
            self.files_matched as f64 / self.elapsed.as_secs_f64()
        } else {
            0.0
        }
    }
}

impl Default for ScanProgress {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared progress counters, updated from grouping workers.
#[derive(Debug)]
pub(crate) struct ProgressTracker {
    start_time: Instant,
    dirs_scanned: AtomicU64,
    files_matched: AtomicU64,
    sequences_found: AtomicU64,
    errors_count: AtomicU64,
    current_dir: Mutex<PathBuf>,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            dirs_scanned: AtomicU64::new(0),
            files_matched: AtomicU64::new(0),
            sequences_found: AtomicU64::new(0),
            errors_count: AtomicU64::new(0),
            current_dir: Mutex::new(PathBuf::new()),
        }
    }

    pub fn record_dir(&self, directory: &std::path::Path, groups: &DirectoryGroups) {
        self.dirs_scanned.fetch_add(1, Ordering::Relaxed);
        self.files_matched
            .fetch_add(groups.file_count() as u64, Ordering::Relaxed);
        self.sequences_found
            .fetch_add(groups.sequences.len() as u64, Ordering::Relaxed);
        if let Ok(mut current) = self.current_dir.lock() {
            *current = directory.to_path_buf();
        }
    }

    pub fn record_errors(&self, count: usize) {
        self.errors_count.fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> ScanProgress {
        ScanProgress {
            dirs_scanned: self.dirs_scanned.load(Ordering::Relaxed),
            files_matched: self.files_matched.load(Ordering::Relaxed),
            sequences_found: self.sequences_found.load(Ordering::Relaxed),
            current_dir: self
                .current_dir
                .lock()
                .map(|current| current.clone())
                .unwrap_or_default(),
            errors_count: self.errors_count.load(Ordering::Relaxed),
            elapsed: self.start_time.elapsed(),
        }
    }
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new()
    }
}
