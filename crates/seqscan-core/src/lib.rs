//! Core types and algorithms for seqscan.
//!
//! This crate holds the filesystem-independent half of sequence detection:
//! the scan configuration, the error taxonomy, the filename tokenizer, the
//! per-directory grouper and the range & gap calculator.

mod config;
mod error;
mod group;
mod result;
mod sequence;
mod token;

pub use config::{
    DEFAULT_MASK, DEFAULT_MIN_LEN, ScanConfig, ScanConfigBuilder, VFX_IMAGE_EXTENSIONS,
};
pub use error::{DirectoryError, DirectoryErrorKind, ScanError};
pub use group::{DirectoryGroups, GroupOptions, group_directory};
pub use result::{ScanResult, ScanStats};
pub use sequence::{FrameRange, MAX_EXPAND, PLACEHOLDER, Sequence, SequenceKey, missing_ranges};
pub use token::{
    DigitRun, FrameSelection, ParsedName, Token, digit_runs, most_varying_index, split_extension,
    tokenize,
};
