//! File name filtering: glob mask plus optional extension allow-list.

use std::path::Path;

use globset::{Glob, GlobBuilder, GlobMatcher, GlobSet, GlobSetBuilder};

use seqscan_core::{ScanConfig, ScanError};

/// Compiled mask and extension filters, applied to file names only.
#[derive(Debug, Clone)]
pub struct FileFilter {
    mask: GlobMatcher,
    extensions: Option<GlobSet>,
}

impl FileFilter {
    /// Compile the filters of `config`.
    pub fn new(config: &ScanConfig) -> Result<Self, ScanError> {
        let mask = Glob::new(&config.mask)
            .map_err(|e| ScanError::invalid_config(format!("Invalid mask {:?}: {e}", config.mask)))?
            .compile_matcher();

        let extensions = if config.extensions.is_empty() {
            None
        } else {
            let mut builder = GlobSetBuilder::new();
            for ext in config.normalized_extensions() {
                let glob = GlobBuilder::new(&format!("*.{ext}"))
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| {
                        ScanError::invalid_config(format!("Invalid extension {ext:?}: {e}"))
                    })?;
                builder.add(glob);
            }
            Some(builder.build().map_err(|e| {
                ScanError::invalid_config(format!("Invalid extension list: {e}"))
            })?)
        };

        Ok(Self { mask, extensions })
    }

    /// Check a file name (not a full path) against both filters.
    pub fn matches(&self, name: impl AsRef<Path>) -> bool {
        let name = name.as_ref();
        self.mask.is_match(name)
            && self
                .extensions
                .as_ref()
                .is_none_or(|extensions| extensions.is_match(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(mask: &str, extensions: &[&str]) -> FileFilter {
        let config = ScanConfig::builder()
            .mask(mask)
            .extensions(extensions.iter().map(|e| e.to_string()).collect::<Vec<_>>())
            .build()
            .unwrap();
        FileFilter::new(&config).unwrap()
    }

    #[test]
    fn test_default_matches_everything() {
        let f = filter("*", &[]);
        assert!(f.matches("kz.0001.tif"));
        assert!(f.matches("readme"));
    }

    #[test]
    fn test_mask() {
        let f = filter("*.exr", &[]);
        assert!(f.matches("beauty.0001.exr"));
        assert!(!f.matches("beauty.0001.png"));

        let f = filter("shot_??.png", &[]);
        assert!(f.matches("shot_01.png"));
        assert!(!f.matches("shot_001.png"));

        let f = filter("img[0-4]*", &[]);
        assert!(f.matches("img3.png"));
        assert!(!f.matches("img7.png"));
    }

    #[test]
    fn test_extensions_case_insensitive() {
        let f = filter("*", &["exr", ".jpg"]);
        assert!(f.matches("a.EXR"));
        assert!(f.matches("b.jpg"));
        assert!(!f.matches("c.png"));
    }

    #[test]
    fn test_mask_and_extensions_combine() {
        let f = filter("beauty*", &["exr"]);
        assert!(f.matches("beauty.1.exr"));
        assert!(!f.matches("depth.1.exr"));
        assert!(!f.matches("beauty.1.png"));
    }
}
