//! seqscan - numbered file sequence detection.
//!
//! Scans directories for files that differ only by a frame number, such as
//! `beauty.0001.exr` .. `beauty.0240.exr`, and reports each group as a
//! [`Sequence`] with its frame range and missing frames. Files that join no
//! sequence are reported as orphans.
//!
//! ```rust,no_run
//! use seqscan::Scanner;
//!
//! let scanner = Scanner::new(["/renders/sh010"], true, "*", 1).unwrap();
//! for seq in &scanner {
//!     println!("{seq}");
//! }
//! ```
//!
//! The filesystem-independent pieces live in [`seqscan_core`]; the walker,
//! engine and [`Scanner`] live in [`seqscan_scan`].

pub use seqscan_core;
pub use seqscan_scan;

pub use seqscan_core::{
    DirectoryError, DirectoryErrorKind, FrameRange, FrameSelection, ScanConfig,
    ScanConfigBuilder, ScanError, ScanResult, ScanStats, Sequence, SequenceKey, Token, tokenize,
};
pub use seqscan_scan::{CancellationToken, ScanEngine, ScanProgress, Scanner};
