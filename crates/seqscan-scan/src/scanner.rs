//! Immutable snapshot of one scan.

use std::fmt;
use std::path::{Path, PathBuf};

use seqscan_core::{ScanConfig, ScanConfigBuilder, ScanError, ScanResult, Sequence};

use crate::engine::ScanEngine;

/// The outcome of scanning a set of roots, together with the config used.
///
/// A `Scanner` never rescans; build a new one to pick up filesystem changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scanner {
    config: ScanConfig,
    /// Sequences, orphans and errors found by the scan.
    pub result: ScanResult,
}

impl Scanner {
    /// Scan `roots` with a glob `mask` and a minimum frame-field width.
    ///
    /// ```rust,no_run
    /// use seqscan_scan::Scanner;
    ///
    /// let scanner = Scanner::new(["/renders/sh010"], true, "*.exr", 4).unwrap();
    /// for seq in &scanner.result.seqs {
    ///     println!("{seq}");
    /// }
    /// ```
    pub fn new<I, P>(roots: I, recursive: bool, mask: &str, min_len: usize) -> Result<Self, ScanError>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let config = ScanConfig::builder()
            .roots(roots.into_iter().map(Into::into).collect::<Vec<PathBuf>>())
            .recursive(recursive)
            .mask(mask)
            .min_len(min_len)
            .build()?;
        Self::with_config(config)
    }

    /// Scan with a fully specified config.
    pub fn with_config(config: ScanConfig) -> Result<Self, ScanError> {
        let result = ScanEngine::new().scan(&config)?;
        Ok(Self { config, result })
    }

    /// Start a config builder seeded with one root.
    ///
    /// ```rust,no_run
    /// use seqscan_scan::Scanner;
    ///
    /// let config = Scanner::path("/renders").vfx_images().min_frames(2usize).build().unwrap();
    /// let scanner = Scanner::with_config(config).unwrap();
    /// ```
    pub fn path(root: impl Into<PathBuf>) -> ScanConfigBuilder {
        let mut builder = ScanConfig::builder();
        builder.root(root);
        builder
    }

    /// Scan the directory containing `path`, without descending.
    ///
    /// The result holds every sequence of that directory; use
    /// [`Scanner::sequence_of`] to get only the one `path` belongs to.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ScanError> {
        Self::scan_directory(containing_dir(path.as_ref())?)
    }

    /// The sequence `path` belongs to, or `None` if it is an orphan.
    pub fn sequence_of(path: impl AsRef<Path>) -> Result<Option<Sequence>, ScanError> {
        let path = path.as_ref();
        let directory = containing_dir(path)?;
        let Some(name) = path.file_name() else {
            return Ok(None);
        };
        let scanned = directory.join(name);
        let scanner = Self::scan_directory(directory)?;
        Ok(scanner.result.find(&scanned).cloned())
    }

    fn scan_directory(directory: PathBuf) -> Result<Self, ScanError> {
        let config = ScanConfig::builder()
            .root(directory)
            .recursive(false)
            .build()?;
        Self::with_config(config)
    }

    /// Scan `path` with the default mask and `min_len`.
    pub fn get_seq(path: impl Into<PathBuf>, recursive: bool) -> Result<ScanResult, ScanError> {
        Self::get_seqs([path], recursive)
    }

    /// Scan several roots with the default mask and `min_len`.
    pub fn get_seqs<I, P>(roots: I, recursive: bool) -> Result<ScanResult, ScanError>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut config = ScanConfig::new(roots);
        config.recursive = recursive;
        Ok(Self::with_config(config)?.result)
    }

    /// Config this scan ran with.
    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Number of sequences found.
    #[must_use]
    pub fn len(&self) -> usize {
        self.result.len()
    }

    /// Check if no sequence was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.result.is_empty()
    }

    /// Iterate the sequences found.
    pub fn iter(&self) -> std::slice::Iter<'_, Sequence> {
        self.result.seqs.iter()
    }
}

impl<'a> IntoIterator for &'a Scanner {
    type Item = &'a Sequence;
    type IntoIter = std::slice::Iter<'a, Sequence>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for Scanner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Scanner(roots={}, seqs={}, orphans={}, errors={})",
            self.config.roots.len(),
            self.result.seqs.len(),
            self.result.orphans.len(),
            self.result.errors.len()
        )
    }
}

/// Directory holding the regular file `path`; `.` for bare file names.
fn containing_dir(path: &Path) -> Result<PathBuf, ScanError> {
    let metadata = std::fs::metadata(path).map_err(|e| ScanError::io(path, e))?;
    if !metadata.is_file() {
        return Err(ScanError::NotARegularFile {
            path: path.to_path_buf(),
        });
    }
    Ok(match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    })
}
