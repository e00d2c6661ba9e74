//! Scan configuration types.

use std::path::PathBuf;

use derive_builder::{Builder, UninitializedFieldError};
use globset::Glob;
use serde::{Deserialize, Serialize};

use crate::error::ScanError;
use crate::token::FrameSelection;

/// Default glob mask: every file.
pub const DEFAULT_MASK: &str = "*";

/// Default minimum digit-run width.
pub const DEFAULT_MIN_LEN: usize = 1;

/// Image extensions commonly written by renderers and compositors.
pub const VFX_IMAGE_EXTENSIONS: &[&str] =
    &["exr", "dpx", "tif", "tiff", "png", "jpg", "jpeg", "tga", "hdr"];

/// Configuration for sequence scanning.
#[derive(Debug, Clone, PartialEq, Eq, Builder, Serialize, Deserialize)]
#[builder(
    setter(into),
    build_fn(validate = "Self::validate", error = "ScanError")
)]
pub struct ScanConfig {
    /// Root directories to scan, in output order.
    #[builder(default)]
    #[serde(default)]
    pub roots: Vec<PathBuf>,

    /// Descend into subdirectories.
    #[builder(default = "true")]
    #[serde(default = "default_true")]
    pub recursive: bool,

    /// Shell glob applied to the file name only.
    #[builder(default = "DEFAULT_MASK.to_string()")]
    #[serde(default = "default_mask")]
    pub mask: String,

    /// Minimum digit count for a numeric run to be a frame field candidate.
    #[builder(default = "DEFAULT_MIN_LEN")]
    #[serde(default = "default_min_len")]
    pub min_len: usize,

    /// Minimum number of frames for a group to be reported as a sequence.
    /// Smaller groups are reported as orphans.
    #[builder(default = "1")]
    #[serde(default = "default_min_frames")]
    pub min_frames: usize,

    /// Which numeric run is the frame field.
    #[builder(default)]
    #[serde(default)]
    pub selection: FrameSelection,

    /// Extension allow-list (case-insensitive, no leading dot). Empty = any.
    #[builder(default)]
    #[serde(default)]
    pub extensions: Vec<String>,

    /// Follow symbolic links to directories (cycles are detected and skipped).
    #[builder(default = "true")]
    #[serde(default = "default_true")]
    pub follow_symlinks: bool,

    /// Include hidden files and directories (starting with `.`).
    #[builder(default = "true")]
    #[serde(default = "default_true")]
    pub include_hidden: bool,

    /// Number of threads for grouping (0 = rayon default pool).
    #[builder(default = "0")]
    #[serde(default)]
    pub threads: usize,
}

fn default_true() -> bool {
    true
}

fn default_mask() -> String {
    DEFAULT_MASK.to_string()
}

fn default_min_len() -> usize {
    DEFAULT_MIN_LEN
}

fn default_min_frames() -> usize {
    1
}

impl From<UninitializedFieldError> for ScanError {
    fn from(err: UninitializedFieldError) -> Self {
        ScanError::invalid_config(err.to_string())
    }
}

impl ScanConfigBuilder {
    fn validate(&self) -> Result<(), ScanError> {
        if let Some(min_len) = self.min_len {
            check_min_len(min_len)?;
        }
        if let Some(min_frames) = self.min_frames {
            check_min_frames(min_frames)?;
        }
        if let Some(ref roots) = self.roots {
            check_roots(roots)?;
        }
        if let Some(ref mask) = self.mask {
            check_mask(mask)?;
        }
        if let Some(ref extensions) = self.extensions {
            check_extensions(extensions)?;
        }
        Ok(())
    }

    /// Append a single root directory.
    pub fn root(&mut self, root: impl Into<PathBuf>) -> &mut Self {
        self.roots.get_or_insert_with(Vec::new).push(root.into());
        self
    }

    /// Restrict the scan to common VFX image formats.
    pub fn vfx_images(&mut self) -> &mut Self {
        self.extensions(
            VFX_IMAGE_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect::<Vec<_>>(),
        )
    }
}

impl ScanConfig {
    /// Create a new scan config builder.
    pub fn builder() -> ScanConfigBuilder {
        ScanConfigBuilder::default()
    }

    /// Create a config for the given roots with default settings.
    pub fn new<I, P>(roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            roots: roots.into_iter().map(Into::into).collect(),
            recursive: true,
            mask: DEFAULT_MASK.to_string(),
            min_len: DEFAULT_MIN_LEN,
            min_frames: 1,
            selection: FrameSelection::default(),
            extensions: Vec::new(),
            follow_symlinks: true,
            include_hidden: true,
            threads: 0,
        }
    }

    /// Validate a config that did not come through the builder
    /// (constructed by hand or deserialized).
    pub fn validate(&self) -> Result<(), ScanError> {
        check_min_len(self.min_len)?;
        check_min_frames(self.min_frames)?;
        check_roots(&self.roots)?;
        check_mask(&self.mask)?;
        check_extensions(&self.extensions)
    }

    /// Extension allow-list, lowercased and without leading dots.
    pub fn normalized_extensions(&self) -> Vec<String> {
        self.extensions
            .iter()
            .map(|ext| ext.trim_start_matches('.').to_ascii_lowercase())
            .collect()
    }

    /// Check if hidden entries should be skipped.
    pub fn should_skip_hidden(&self, name: &str) -> bool {
        !self.include_hidden && name.starts_with('.')
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self::new(Vec::<PathBuf>::new())
    }
}

fn check_min_len(min_len: usize) -> Result<(), ScanError> {
    if min_len < 1 {
        return Err(ScanError::invalid_config("min_len must be at least 1"));
    }
    Ok(())
}

fn check_min_frames(min_frames: usize) -> Result<(), ScanError> {
    if min_frames < 1 {
        return Err(ScanError::invalid_config("min_frames must be at least 1"));
    }
    Ok(())
}

fn check_roots(roots: &[PathBuf]) -> Result<(), ScanError> {
    if roots.iter().any(|root| root.as_os_str().is_empty()) {
        return Err(ScanError::invalid_config("Root path cannot be empty"));
    }
    Ok(())
}

fn check_mask(mask: &str) -> Result<(), ScanError> {
    if mask.is_empty() {
        return Err(ScanError::invalid_config("Mask cannot be empty"));
    }
    Glob::new(mask)
        .map(|_| ())
        .map_err(|e| ScanError::invalid_config(format!("Invalid mask {mask:?}: {e}")))
}

fn check_extensions(extensions: &[String]) -> Result<(), ScanError> {
    for ext in extensions {
        let bare = ext.trim_start_matches('.');
        if bare.is_empty() {
            return Err(ScanError::invalid_config("Extension cannot be empty"));
        }
        Glob::new(&format!("*.{bare}")).map_err(|e| {
            ScanError::invalid_config(format!("Invalid extension {ext:?}: {e}"))
        })?;
    }
    Ok(())
}
