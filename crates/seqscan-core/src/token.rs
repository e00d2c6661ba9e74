//! Filename tokenization: digit runs, extension split and frame-field selection.
//!
//! A file name such as `shot010.cam01.0042.exr` is split into its stem
//! (`shot010.cam01.0042`) and extension (`.exr`). Every maximal run of ASCII
//! digits in the stem whose width is at least `min_len` is a candidate frame
//! field. One candidate is selected by a [`FrameSelection`] strategy; the other
//! runs stay literal text in the token prefix or suffix.

use std::collections::HashSet;

use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Strategy for choosing the frame field among several candidate runs.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum FrameSelection {
    /// Last candidate run, closest to the extension.
    #[default]
    Rightmost,
    /// First candidate run.
    Leftmost,
    /// Within a family of names sharing the same literal text, the run with
    /// the most distinct values. Ties go to the rightmost run.
    MostVarying,
}

impl FrameSelection {
    /// Pick a candidate index for a name considered on its own.
    ///
    /// `MostVarying` needs a family of names to decide; alone it behaves
    /// like `Rightmost`.
    pub fn select_index(self, candidates: usize) -> Option<usize> {
        if candidates == 0 {
            return None;
        }
        match self {
            Self::Rightmost | Self::MostVarying => Some(candidates - 1),
            Self::Leftmost => Some(0),
        }
    }
}

/// A maximal run of ASCII digits, as byte offsets into a file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DigitRun {
    /// Byte offset of the first digit.
    pub start: usize,
    /// Number of digits.
    pub len: usize,
}

impl DigitRun {
    /// Byte offset one past the last digit.
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    /// The digits of this run inside `name`.
    pub fn text<'a>(&self, name: &'a str) -> &'a str {
        &name[self.start..self.end()]
    }
}

/// The parse of one file name around its frame field.
///
/// `prefix + numeric_text + suffix` is always the original file name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    /// Literal text before the frame field.
    pub prefix: CompactString,
    /// Frame digits exactly as they appear, leading zeros included.
    pub numeric_text: CompactString,
    /// Frame number.
    pub value: u64,
    /// Literal text after the frame field, extension included.
    pub suffix: CompactString,
}

impl Token {
    /// Width of the frame field including leading zeros.
    pub fn padding(&self) -> usize {
        self.numeric_text.len()
    }

    /// Rebuild the file name this token was parsed from.
    pub fn file_name(&self) -> String {
        let mut name =
            String::with_capacity(self.prefix.len() + self.numeric_text.len() + self.suffix.len());
        name.push_str(&self.prefix);
        name.push_str(&self.numeric_text);
        name.push_str(&self.suffix);
        name
    }
}

/// All maximal digit runs in `text`.
///
/// ASCII digits are single bytes in UTF-8 and never occur inside a multi-byte
/// sequence, so byte offsets are always valid char boundaries.
pub fn digit_runs(text: &str) -> Vec<DigitRun> {
    let mut runs = Vec::new();
    let mut run_start = None;

    for (pos, byte) in text.bytes().enumerate() {
        match (byte.is_ascii_digit(), run_start) {
            (true, None) => run_start = Some(pos),
            (false, Some(start)) => {
                runs.push(DigitRun { start, len: pos - start });
                run_start = None;
            }
            _ => {}
        }
    }

    if let Some(start) = run_start {
        runs.push(DigitRun { start, len: text.len() - start });
    }

    runs
}

/// Split a file name into stem and extension (extension keeps its dot).
///
/// The extension is the text after the last dot when that dot is not the
/// first character and the text is non-empty and not purely numeric, so
/// `render.0001` has no extension and `.hidden` is all stem.
pub fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(pos) if pos > 0 => {
            let ext = &name[pos + 1..];
            if ext.is_empty() || ext.bytes().all(|b| b.is_ascii_digit()) {
                (name, "")
            } else {
                (&name[..pos], &name[pos..])
            }
        }
        _ => (name, ""),
    }
}

/// A file name with its candidate frame fields located.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedName {
    name: String,
    candidates: Vec<(DigitRun, u64)>,
}

impl ParsedName {
    /// Locate every candidate run of at least `min_len` digits in the stem.
    ///
    /// Runs whose value does not fit a `u64` are not candidates.
    pub fn parse(name: impl Into<String>, min_len: usize) -> Self {
        let name = name.into();
        let (stem, _) = split_extension(&name);
        let candidates = digit_runs(stem)
            .into_iter()
            .filter(|run| run.len >= min_len)
            .filter_map(|run| run.text(&name).parse::<u64>().ok().map(|value| (run, value)))
            .collect();
        Self { name, candidates }
    }

    /// The full file name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of candidate frame fields.
    pub fn candidate_count(&self) -> usize {
        self.candidates.len()
    }

    /// Whether the name can belong to a sequence at all.
    pub fn has_candidates(&self) -> bool {
        !self.candidates.is_empty()
    }

    /// Value of the candidate at `idx`.
    pub fn value_at(&self, idx: usize) -> Option<u64> {
        self.candidates.get(idx).map(|&(_, value)| value)
    }

    /// Literal text between candidates (candidate count + 1 segments).
    ///
    /// Names with equal segments differ only in their candidate digits and
    /// form one family for [`FrameSelection::MostVarying`].
    pub fn literal_segments(&self) -> Vec<&str> {
        let mut segments = Vec::with_capacity(self.candidates.len() + 1);
        let mut pos = 0;
        for (run, _) in &self.candidates {
            segments.push(&self.name[pos..run.start]);
            pos = run.end();
        }
        segments.push(&self.name[pos..]);
        segments
    }

    /// Build the token that uses candidate `idx` as its frame field.
    pub fn token(&self, idx: usize) -> Option<Token> {
        let &(run, value) = self.candidates.get(idx)?;
        Some(Token {
            prefix: CompactString::new(&self.name[..run.start]),
            numeric_text: CompactString::new(run.text(&self.name)),
            value,
            suffix: CompactString::new(&self.name[run.end()..]),
        })
    }

    /// Build the token picked by `selection` for this name alone.
    pub fn select(&self, selection: FrameSelection) -> Option<Token> {
        selection
            .select_index(self.candidates.len())
            .and_then(|idx| self.token(idx))
    }
}

/// Tokenize a single file name. `None` means the file is an orphan.
pub fn tokenize(name: &str, min_len: usize, selection: FrameSelection) -> Option<Token> {
    ParsedName::parse(name, min_len).select(selection)
}

/// Index of the candidate with the most distinct values across a family.
///
/// All names must share the same literal segments (and therefore the same
/// candidate count). Ties go to the rightmost index.
pub fn most_varying_index(family: &[&ParsedName]) -> Option<usize> {
    let count = family.first()?.candidate_count();
    if count == 0 {
        return None;
    }

    let mut best_idx = count - 1;
    let mut best_distinct = 0;
    let mut distinct: HashSet<u64> = HashSet::with_capacity(family.len());

    for idx in 0..count {
        distinct.clear();
        distinct.extend(family.iter().filter_map(|name| name.value_at(idx)));
        if distinct.len() >= best_distinct {
            best_distinct = distinct.len();
            best_idx = idx;
        }
    }

    Some(best_idx)
}
