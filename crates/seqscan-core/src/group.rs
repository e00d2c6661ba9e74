//! Per-directory grouping of file names into sequences.
//!
//! Grouping is scoped to one directory: names are tokenized, bucketed by
//! [`SequenceKey`] and each bucket becomes a [`Sequence`]. Names without a
//! frame field, and buckets below `min_frames`, come back as orphans.
//! Output order depends only on the input names, never on hash iteration.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use crate::config::ScanConfig;
use crate::sequence::{Sequence, SequenceKey};
use crate::token::{FrameSelection, ParsedName, Token, most_varying_index};

/// Settings that affect grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupOptions {
    /// Minimum digit-run width.
    pub min_len: usize,
    /// Minimum frames per sequence.
    pub min_frames: usize,
    /// Frame field selection strategy.
    pub selection: FrameSelection,
}

impl Default for GroupOptions {
    fn default() -> Self {
        Self {
            min_len: 1,
            min_frames: 1,
            selection: FrameSelection::default(),
        }
    }
}

impl From<&ScanConfig> for GroupOptions {
    fn from(config: &ScanConfig) -> Self {
        Self {
            min_len: config.min_len,
            min_frames: config.min_frames,
            selection: config.selection,
        }
    }
}

/// Grouping outcome for one directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryGroups {
    /// Sequences ordered by key.
    pub sequences: Vec<Sequence>,
    /// Full paths of files that joined no sequence, sorted.
    pub orphans: Vec<PathBuf>,
}

impl DirectoryGroups {
    /// Number of files accounted for.
    pub fn file_count(&self) -> usize {
        self.sequences.iter().map(Sequence::frame_count).sum::<usize>() + self.orphans.len()
    }
}

/// Group the files named `names` inside `directory`.
pub fn group_directory<I, S>(directory: &Path, names: I, options: &GroupOptions) -> DirectoryGroups
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let parsed: Vec<ParsedName> = names
        .into_iter()
        .map(|name| ParsedName::parse(name, options.min_len))
        .collect();

    let mut orphans = Vec::new();
    let mut buckets: BTreeMap<SequenceKey, BTreeMap<u64, PathBuf>> = BTreeMap::new();

    for (name, token) in select_tokens(&parsed, options.selection) {
        match token {
            Some(token) => {
                let padding = token.padding();
                let key = SequenceKey::new(directory, token.prefix, token.suffix, padding);
                buckets
                    .entry(key)
                    .or_default()
                    .insert(token.value, directory.join(name.name()));
            }
            None => orphans.push(directory.join(name.name())),
        }
    }

    let mut sequences = Vec::with_capacity(buckets.len());
    for (key, members) in buckets {
        if members.len() < options.min_frames {
            orphans.extend(members.into_values());
            continue;
        }
        if let Some(sequence) = Sequence::from_members(key, members) {
            sequences.push(sequence);
        }
    }

    orphans.sort();
    DirectoryGroups { sequences, orphans }
}

/// Pair each parsed name with its token under `selection`.
fn select_tokens(
    parsed: &[ParsedName],
    selection: FrameSelection,
) -> Vec<(&ParsedName, Option<Token>)> {
    match selection {
        FrameSelection::Rightmost | FrameSelection::Leftmost => parsed
            .iter()
            .map(|name| (name, name.select(selection)))
            .collect(),
        FrameSelection::MostVarying => {
            let mut families: HashMap<Vec<&str>, Vec<&ParsedName>> = HashMap::new();
            for name in parsed.iter().filter(|n| n.has_candidates()) {
                families.entry(name.literal_segments()).or_default().push(name);
            }

            let chosen: HashMap<Vec<&str>, usize> = families
                .into_iter()
                .filter_map(|(segments, family)| {
                    most_varying_index(&family).map(|idx| (segments, idx))
                })
                .collect();

            parsed
                .iter()
                .map(|name| {
                    let token = chosen
                        .get(&name.literal_segments())
                        .and_then(|&idx| name.token(idx));
                    (name, token)
                })
                .collect()
        }
    }
}
