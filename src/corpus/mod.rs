pub mod grid;
pub mod layout;
pub mod listing;

use std::path::{Path, PathBuf};

use crate::error::{DatasetError, Result};
use crate::types::Split;

pub use grid::GridCorpus;
pub use layout::{ActorPartition, CorpusLayout, GridLayout, ListingLayout, EMODB, EMOVO};
pub use listing::ListingCorpus;

/// Maps sample indices to audio files and emotion labels.
///
/// Implementations are pure: the same index always resolves to the same item.
pub trait Corpus: Send + Sync {
    fn name(&self) -> &str;

    /// Emotion labels in label order.
    fn emotions(&self) -> &[String];

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Resolves `idx` in `[0, len)`; anything else is [`DatasetError::Index`].
    fn resolve(&self, idx: usize) -> Result<CorpusItem>;
}

/// A resolved sample: where to load it from and which label it carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusItem {
    pub index: usize,
    pub path: PathBuf,
    pub label: usize,
    /// Present for grid corpora only.
    pub cell: Option<GridCell>,
}

/// The (actor, emotion, sentence type) coordinates of a grid item.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GridCell {
    pub actor: String,
    pub emotion: String,
    pub sentence_type: String,
}

/// Opens the corpus described by `layout` under `root` for one split.
pub fn open_corpus(layout: &CorpusLayout, root: &Path, split: Split) -> Result<Box<dyn Corpus>> {
    layout.validate()?;
    Ok(match layout {
        CorpusLayout::Grid(grid) => Box::new(GridCorpus::new(root, grid.clone(), split)),
        CorpusLayout::Listing(listing) => {
            Box::new(ListingCorpus::open(root, listing.clone(), split)?)
        }
    })
}

/// Converts a caller-supplied signed index into a valid position.
pub fn checked_index(index: i64, len: usize) -> Result<usize> {
    usize::try_from(index)
        .ok()
        .filter(|&idx| idx < len)
        .ok_or(DatasetError::Index { index, len })
}

pub(crate) fn index_error(idx: usize, len: usize) -> DatasetError {
    DatasetError::Index {
        index: i64::try_from(idx).unwrap_or(i64::MAX),
        len,
    }
}
