//! Parallel scan engine: enumerate each root, group each directory.

use std::path::Path;
use std::time::Instant;

use rayon::prelude::*;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use seqscan_core::{
    DirectoryGroups, GroupOptions, ScanConfig, ScanError, ScanResult, group_directory,
};

use crate::filter::FileFilter;
use crate::progress::{ProgressTracker, ScanProgress};
use crate::walk::{DirListing, enumerate_root};

/// Scan engine using jwalk for traversal and rayon for grouping.
///
/// One engine can run several scans; they share its progress channel and
/// cancellation token.
pub struct ScanEngine {
    progress_tx: broadcast::Sender<ScanProgress>,
    cancel: CancellationToken,
}

impl ScanEngine {
    /// Create a new engine.
    pub fn new() -> Self {
        let (progress_tx, _) = broadcast::channel(100);
        Self {
            progress_tx,
            cancel: CancellationToken::new(),
        }
    }

    /// Subscribe to scan progress updates.
    pub fn subscribe(&self) -> broadcast::Receiver<ScanProgress> {
        self.progress_tx.subscribe()
    }

    /// Token checked between directories. Cancelling it makes running and
    /// future scans return partial results.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Cancel the scan.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Scan every root of `config`.
    ///
    /// Only configuration problems are returned as errors; unreadable
    /// directories end up in [`ScanResult::errors`].
    pub fn scan(&self, config: &ScanConfig) -> Result<ScanResult, ScanError> {
        config.validate()?;
        let filter = FileFilter::new(config)?;
        let options = GroupOptions::from(config);
        let tracker = ProgressTracker::new();
        let start = Instant::now();

        let run = || -> Vec<ScanResult> {
            config
                .roots
                .par_iter()
                .map(|root| self.scan_root(root, config, &filter, &options, &tracker))
                .collect()
        };

        let per_root = match config.threads {
            0 => run(),
            n => rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build()
                .map_err(|e| ScanError::invalid_config(format!("Cannot build thread pool: {e}")))?
                .install(run),
        };

        let mut result = ScanResult::new();
        for root_result in per_root {
            result.append(root_result);
        }

        info!(
            roots = config.roots.len(),
            sequences = result.seqs.len(),
            orphans = result.orphans.len(),
            errors = result.errors.len(),
            cancelled = result.cancelled,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Scan finished"
        );

        Ok(result)
    }

    fn scan_root(
        &self,
        root: &Path,
        config: &ScanConfig,
        filter: &FileFilter,
        options: &GroupOptions,
        tracker: &ProgressTracker,
    ) -> ScanResult {
        let start = Instant::now();
        debug!(root = %root.display(), recursive = config.recursive, "Scanning root");

        let enumeration = enumerate_root(root, config, filter, &self.cancel);
        tracker.record_errors(enumeration.errors.len());

        let grouped: Vec<_> = enumeration
            .listings
            .into_par_iter()
            .map(|listing| self.group_listing(listing, options, tracker))
            .collect();

        let mut result = ScanResult::new();
        result.cancelled = enumeration.cancelled;
        for groups in grouped {
            match groups {
                Some(groups) => result.push_groups(groups),
                None => result.cancelled = true,
            }
        }
        result.errors = enumeration.errors;

        info!(
            root = %root.display(),
            dirs = result.stats.dirs_scanned,
            sequences = result.seqs.len(),
            orphans = result.orphans.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Root scanned"
        );

        result
    }

    fn group_listing(
        &self,
        listing: DirListing,
        options: &GroupOptions,
        tracker: &ProgressTracker,
    ) -> Option<DirectoryGroups> {
        if self.cancel.is_cancelled() {
            return None;
        }

        let mut groups = group_directory(&listing.directory, listing.names, options);
        if !listing.untokenized.is_empty() {
            groups.orphans.extend(listing.untokenized);
            groups.orphans.sort();
        }

        tracker.record_dir(&listing.directory, &groups);
        let _ = self.progress_tx.send(tracker.snapshot());

        Some(groups)
    }
}

impl Default for ScanEngine {
    fn default() -> Self {
        Self::new()
    }
}
