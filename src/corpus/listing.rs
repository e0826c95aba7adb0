//! Listing-scheme corpora (EMODB): a flat directory where each file name
//! carries its emotion code, e.g. `03a01Wa.wav` is anger (`W`).

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::layout::ListingLayout;
use super::{index_error, Corpus, CorpusItem};
use crate::error::{DatasetError, Result};
use crate::types::Split;

/// Position of the emotion code counted from the end of the file name.
const CODE_OFFSET_FROM_END: usize = 6;

#[derive(Debug, Clone)]
pub struct ListingCorpus {
    root: PathBuf,
    layout: ListingLayout,
    entries: Vec<(String, usize)>,
}

impl ListingCorpus {
    /// Lists `root`, sorts by file name and keeps the slice for `split`.
    pub fn open(root: impl Into<PathBuf>, layout: ListingLayout, split: Split) -> Result<Self> {
        let root = root.into();
        let names = list_audio_files(&root, &layout.extension)?;
        Self::from_names(root, layout, split, names)
    }

    /// Builds the corpus from an already collected set of file names.
    pub fn from_names(
        root: PathBuf,
        layout: ListingLayout,
        split: Split,
        mut names: Vec<String>,
    ) -> Result<Self> {
        names.sort();
        let delimiter = (names.len() as f64 * layout.training_fraction) as usize;
        let selected: Vec<String> = match split {
            Split::Training => names.drain(..delimiter).collect(),
            Split::Validation => names.drain(delimiter..).collect(),
            Split::All => names,
        };

        let mut entries = Vec::with_capacity(selected.len());
        for name in selected {
            let label = emotion_code(&name)
                .and_then(|code| layout.label_for(code))
                .ok_or_else(|| {
                    DatasetError::config(format!(
                        "{}: file {name:?} does not carry a known emotion code",
                        layout.name
                    ))
                })?;
            entries.push((name, label));
        }
        debug!(
            corpus = %layout.name,
            ?split,
            items = entries.len(),
            "listing corpus indexed"
        );

        Ok(Self {
            root,
            layout,
            entries,
        })
    }

    pub fn file_names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Corpus for ListingCorpus {
    fn name(&self) -> &str {
        &self.layout.name
    }

    fn emotions(&self) -> &[String] {
        &self.layout.emotions
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn resolve(&self, idx: usize) -> Result<CorpusItem> {
        let (name, label) = self
            .entries
            .get(idx)
            .ok_or_else(|| index_error(idx, self.entries.len()))?;
        Ok(CorpusItem {
            index: idx,
            path: self.root.join(name),
            label: *label,
            cell: None,
        })
    }
}

fn emotion_code(file_name: &str) -> Option<char> {
    file_name.chars().rev().nth(CODE_OFFSET_FROM_END - 1)
}

fn list_audio_files(root: &Path, extension: &str) -> Result<Vec<String>> {
    let io_error = |source| DatasetError::Io {
        path: root.to_path_buf(),
        source,
    };
    let mut names = Vec::new();
    for entry in fs::read_dir(root).map_err(io_error)? {
        let entry = entry.map_err(io_error)?;
        let path = entry.path();
        let matches_extension = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(extension));
        if !path.is_file() || !matches_extension {
            continue;
        }
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            names.push(name.to_string());
        }
    }
    Ok(names)
}
