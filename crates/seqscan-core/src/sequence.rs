//! Sequence types and the range & gap calculator.

use std::collections::BTreeMap;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use compact_str::CompactString;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::error::ScanError;

/// Character repeated `padding` times in place of the frame field.
pub const PLACEHOLDER: char = '#';

/// Largest range [`Sequence::expand`] will materialize.
pub const MAX_EXPAND: u64 = 1_000_000;

/// Grouping identity of a sequence.
///
/// Padding is part of the key, so `img.1.png` and `img.01.png` never merge.
/// The derived ordering (directory, prefix, suffix, padding) is the output
/// order of sequences within a root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SequenceKey {
    /// Directory containing every member.
    pub directory: PathBuf,
    /// Literal text before the frame field.
    pub prefix: CompactString,
    /// Literal text after the frame field.
    pub suffix: CompactString,
    /// Width of the frame field.
    pub padding: usize,
}

impl SequenceKey {
    /// Create a new key.
    pub fn new(
        directory: impl Into<PathBuf>,
        prefix: impl Into<CompactString>,
        suffix: impl Into<CompactString>,
        padding: usize,
    ) -> Self {
        Self {
            directory: directory.into(),
            prefix: prefix.into(),
            suffix: suffix.into(),
            padding,
        }
    }

    /// Canonical file name template, e.g. `kz.####.tif`.
    pub fn pattern(&self) -> String {
        let mut pattern =
            String::with_capacity(self.prefix.len() + self.padding + self.suffix.len());
        pattern.push_str(&self.prefix);
        pattern.extend(std::iter::repeat_n(PLACEHOLDER, self.padding));
        pattern.push_str(&self.suffix);
        pattern
    }

    /// File name for `frame`, zero-padded to the key's width.
    pub fn format_frame(&self, frame: u64) -> String {
        format!(
            "{}{:0width$}{}",
            self.prefix,
            frame,
            self.suffix,
            width = self.padding
        )
    }
}

/// Inclusive range of frame numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FrameRange {
    /// First frame.
    pub start: u64,
    /// Last frame.
    pub end: u64,
}

impl FrameRange {
    /// Create a new range. `start` must not exceed `end`.
    pub fn new(start: u64, end: u64) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    /// Number of frames in the range.
    pub fn len(&self) -> u64 {
        (self.end - self.start).saturating_add(1)
    }

    /// Ranges are never empty.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Check if `frame` lies in the range.
    pub fn contains(&self, frame: u64) -> bool {
        (self.start..=self.end).contains(&frame)
    }

    /// Iterate every frame.
    pub fn iter(&self) -> RangeInclusive<u64> {
        self.start..=self.end
    }
}

/// Gaps between consecutive frames of a sorted, distinct frame list.
pub fn missing_ranges(frames: impl IntoIterator<Item = u64>) -> Vec<FrameRange> {
    frames
        .into_iter()
        .tuple_windows()
        .filter(|&(a, b)| b - a > 1)
        .map(|(a, b)| FrameRange::new(a + 1, b - 1))
        .collect()
}

/// One detected sequence.
///
/// Deserializing rebuilds the derived fields from `key` and `members`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SequenceData")]
pub struct Sequence {
    key: SequenceKey,
    pattern: String,
    /// First frame (smallest frame number present).
    pub start: u64,
    /// Last frame (largest frame number present).
    pub end: u64,
    members: BTreeMap<u64, PathBuf>,
    missing: Vec<FrameRange>,
}

/// Serialized fields a [`Sequence`] is rebuilt from.
#[derive(Deserialize)]
struct SequenceData {
    key: SequenceKey,
    members: BTreeMap<u64, PathBuf>,
}

impl TryFrom<SequenceData> for Sequence {
    type Error = String;

    fn try_from(data: SequenceData) -> Result<Self, Self::Error> {
        Sequence::from_members(data.key, data.members)
            .ok_or_else(|| "sequence has no members".to_string())
    }
}

impl Sequence {
    /// Build a sequence from its members. Returns `None` if `members` is empty.
    pub fn from_members(key: SequenceKey, members: BTreeMap<u64, PathBuf>) -> Option<Self> {
        let (&start, _) = members.first_key_value()?;
        let (&end, _) = members.last_key_value()?;
        let missing = missing_ranges(members.keys().copied());
        let pattern = key.pattern();

        Some(Self {
            key,
            pattern,
            start,
            end,
            members,
            missing,
        })
    }

    /// Grouping key.
    pub fn key(&self) -> &SequenceKey {
        &self.key
    }

    /// File name template with `#` per frame digit, e.g. `kz.####.tif`.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Template joined with the containing directory.
    pub fn path_pattern(&self) -> PathBuf {
        self.key.directory.join(&self.pattern)
    }

    /// Directory containing the members.
    pub fn directory(&self) -> &Path {
        &self.key.directory
    }

    /// Literal text before the frame field.
    pub fn prefix(&self) -> &str {
        &self.key.prefix
    }

    /// Literal text after the frame field.
    pub fn suffix(&self) -> &str {
        &self.key.suffix
    }

    /// Width of the frame field.
    pub fn padding(&self) -> usize {
        self.key.padding
    }

    /// Frame number to file path.
    pub fn members(&self) -> &BTreeMap<u64, PathBuf> {
        &self.members
    }

    /// Existing frame numbers, ascending.
    pub fn frames(&self) -> impl Iterator<Item = u64> + '_ {
        self.members.keys().copied()
    }

    /// Number of existing frames.
    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.members.len()
    }

    /// Size of `[start, end]`, present or not.
    #[must_use]
    pub fn range_count(&self) -> u64 {
        (self.end - self.start).saturating_add(1)
    }

    /// Gaps as inclusive ranges, ascending.
    pub fn missing(&self) -> &[FrameRange] {
        &self.missing
    }

    /// Every missing frame number, ascending.
    pub fn missing_frames(&self) -> impl Iterator<Item = u64> + '_ {
        self.missing.iter().flat_map(FrameRange::iter)
    }

    /// Number of missing frames.
    pub fn missing_count(&self) -> u64 {
        self.missing
            .iter()
            .fold(0u64, |acc, range| acc.saturating_add(range.len()))
    }

    /// True when no frame in `[start, end]` is missing.
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }

    /// File name for `frame` under this sequence's template.
    pub fn format_frame(&self, frame: u64) -> String {
        self.key.format_frame(frame)
    }

    /// Path of an existing frame.
    pub fn get_file(&self, frame: u64) -> Option<&Path> {
        self.members.get(&frame).map(PathBuf::as_path)
    }

    /// Path of the first frame.
    pub fn first_file(&self) -> Option<&Path> {
        self.get_file(self.start)
    }

    /// Path of the last frame.
    pub fn last_file(&self) -> Option<&Path> {
        self.get_file(self.end)
    }

    /// Check if `path` is one of the members.
    pub fn contains(&self, path: &Path) -> bool {
        self.frame_of(path).is_some()
    }

    /// Frame number of the member at `path`.
    pub fn frame_of(&self, path: &Path) -> Option<u64> {
        if path.parent() != Some(self.directory()) {
            return None;
        }
        let digits = path
            .file_name()?
            .to_str()?
            .strip_prefix(self.prefix())?
            .strip_suffix(self.suffix())?;
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let frame = digits.parse().ok()?;
        // Padding is part of the name, so `kz.005.tif` is not frame 5 of `kz.####.tif`.
        (self.get_file(frame) == Some(path)).then_some(frame)
    }

    /// Every path in `[start, end]`, including missing frames.
    pub fn expand(&self) -> Result<Vec<PathBuf>, ScanError> {
        let count = self.range_count();
        if count > MAX_EXPAND {
            return Err(ScanError::RangeTooLarge {
                count,
                max: MAX_EXPAND,
            });
        }
        Ok((self.start..=self.end)
            .map(|frame| self.key.directory.join(self.format_frame(frame)))
            .collect())
    }

    /// Paths of existing frames, ascending.
    pub fn expand_existing(&self) -> Vec<&Path> {
        self.members.values().map(PathBuf::as_path).collect()
    }

    /// Serialize to compact JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to indented JSON.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl std::fmt::Display for Sequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.missing.is_empty() {
            write!(f, "Seq(\"{}\", range: {}-{})", self.pattern, self.start, self.end)
        } else {
            write!(
                f,
                "Seq(\"{}\", range: {}-{}, missed: {})",
                self.pattern,
                self.start,
                self.end,
                self.missing_count()
            )
        }
    }
}
