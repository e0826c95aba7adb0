//! Grid-scheme corpora (EMOVO): every actor records every emotion for every
//! sentence type, so an index decomposes arithmetically into a triple.

use std::path::{Path, PathBuf};

use super::layout::GridLayout;
use super::{index_error, Corpus, CorpusItem, GridCell};
use crate::error::Result;
use crate::types::Split;

#[derive(Debug, Clone)]
pub struct GridCorpus {
    root: PathBuf,
    layout: GridLayout,
    actors: Vec<String>,
}

impl GridCorpus {
    /// Selects the actor subset for `split` once, up front.
    ///
    /// Layouts without a partition read the full actor set for every split.
    pub fn new(root: impl Into<PathBuf>, layout: GridLayout, split: Split) -> Self {
        let actors = match (&layout.partition, split) {
            (Some(partition), Split::Training) => partition.training.clone(),
            (Some(partition), Split::Validation) => partition.validation.clone(),
            _ => layout.actors.clone(),
        };
        Self {
            root: root.into(),
            layout,
            actors,
        }
    }

    pub fn actors(&self) -> &[String] {
        &self.actors
    }

    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Splits `idx` into `(actor, emotion, sentence_type)` positions.
    pub fn decompose(&self, idx: usize) -> Result<(usize, usize, usize)> {
        let len = self.len();
        if idx >= len {
            return Err(index_error(idx, len));
        }
        let per_actor = self.layout.per_actor();
        let types = self.layout.sentence_types.len();
        let actor = idx / per_actor;
        let rem = idx % per_actor;
        Ok((actor, rem / types, rem % types))
    }

    fn file_name(&self, actor: &str, emotion: &str, sentence_type: &str) -> String {
        let prefix: String = emotion.chars().take(3).collect();
        format!("{prefix}-{actor}-{sentence_type}.wav")
    }
}

impl Corpus for GridCorpus {
    fn name(&self) -> &str {
        &self.layout.name
    }

    fn emotions(&self) -> &[String] {
        &self.layout.emotions
    }

    fn len(&self) -> usize {
        self.layout.per_actor() * self.actors.len()
    }

    fn resolve(&self, idx: usize) -> Result<CorpusItem> {
        let (actor_idx, emotion_idx, type_idx) = self.decompose(idx)?;
        let actor = &self.actors[actor_idx];
        let emotion = &self.layout.emotions[emotion_idx];
        let sentence_type = &self.layout.sentence_types[type_idx];
        let path = self
            .root
            .join(actor)
            .join(self.file_name(actor, emotion, sentence_type));
        Ok(CorpusItem {
            index: idx,
            path,
            label: emotion_idx,
            cell: Some(GridCell {
                actor: actor.clone(),
                emotion: emotion.clone(),
                sentence_type: sentence_type.clone(),
            }),
        })
    }
}
