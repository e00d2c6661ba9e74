//! Filesystem scanning engine for seqscan.
//!
//! This crate walks root directories with jwalk, filters file names, and
//! hands each directory's listing to the grouper in `seqscan-core`.
//!
//! # Overview
//!
//! - **Sorted, deterministic walk** via jwalk, with symlink cycle detection
//! - **Parallel grouping** of directories and roots via rayon
//! - **Progress updates** via broadcast channels
//! - **Cooperative cancellation** returning partial results
//!
//! # Example
//!
//! ```rust,no_run
//! use seqscan_scan::Scanner;
//!
//! let result = Scanner::get_seq("/renders/sh010", true).unwrap();
//! for seq in &result.seqs {
//!     println!("{} {}-{} missing {}", seq.pattern(), seq.start, seq.end, seq.missing_count());
//! }
//! for orphan in &result.orphans {
//!     println!("orphan: {}", orphan.display());
//! }
//! ```
//!
//! # Progress Monitoring
//!
//! ```rust,no_run
//! use seqscan_scan::{ScanConfig, ScanEngine};
//!
//! let engine = ScanEngine::new();
//! let mut progress_rx = engine.subscribe();
//!
//! // Handle progress on a separate thread
//! std::thread::spawn(move || {
//!     while let Ok(progress) = progress_rx.blocking_recv() {
//!         println!("Grouped {} directories", progress.dirs_scanned);
//!     }
//! });
//!
//! let result = engine.scan(&ScanConfig::new(["/renders"])).unwrap();
//! ```

mod cycle;
mod engine;
mod filter;
mod progress;
mod scanner;
mod walk;

pub use cycle::CycleDetector;
pub use engine::ScanEngine;
pub use filter::FileFilter;
pub use progress::ScanProgress;
pub use scanner::Scanner;
pub use walk::{DirListing, Enumeration, enumerate_root};

// Re-export core types for convenience
pub use seqscan_core::{
    DirectoryError, DirectoryErrorKind, FrameRange, FrameSelection, ScanConfig,
    ScanConfigBuilder, ScanError, ScanResult, ScanStats, Sequence, SequenceKey,
};

pub use tokio_util::sync::CancellationToken;
