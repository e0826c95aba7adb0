//! Map-style dataset over an emotional speech corpus.

use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::audio::decoder::{AudioDecoder, SymphoniaDecoder};
use crate::config::{canonicalize_dir, DatasetConfig};
use crate::corpus::{open_corpus, Corpus, CorpusItem, CorpusLayout};
use crate::error::Result;
use crate::features::{FeatureExtractor, NON_FINITE_FILL};
use crate::types::Sample;

pub struct EmotionDataset<D = SymphoniaDecoder> {
    corpus: Box<dyn Corpus>,
    extractor: FeatureExtractor,
    decoder: D,
    warned_non_finite: AtomicBool,
}

impl EmotionDataset<SymphoniaDecoder> {
    /// Opens the dataset described by `config` with the symphonia backend.
    pub fn open(config: &DatasetConfig) -> Result<Self> {
        Self::with_decoder(config, SymphoniaDecoder)
    }
}

impl<D: AudioDecoder> EmotionDataset<D> {
    /// Validates the configuration, resolves the layout and selects the split.
    ///
    /// Missing audio files are not detected here; they surface from [`Self::get`].
    pub fn with_decoder(config: &DatasetConfig, decoder: D) -> Result<Self> {
        let extractor = FeatureExtractor::new(config.extractor)?;
        let layout = CorpusLayout::lookup(&config.corpus)?;
        let root = canonicalize_dir(&config.root_dir)?;
        let corpus = open_corpus(&layout, &root, config.split)?;
        info!(
            corpus = corpus.name(),
            root = %root.display(),
            split = ?config.split,
            mode = ?config.extractor.mode,
            items = corpus.len(),
            "dataset opened"
        );
        Ok(Self::from_parts(corpus, extractor, decoder))
    }

    pub fn from_parts(corpus: Box<dyn Corpus>, extractor: FeatureExtractor, decoder: D) -> Self {
        Self {
            corpus,
            extractor,
            decoder,
            warned_non_finite: AtomicBool::new(false),
        }
    }

    pub fn len(&self) -> usize {
        self.corpus.len()
    }

    pub fn is_empty(&self) -> bool {
        self.corpus.is_empty()
    }

    pub fn corpus(&self) -> &dyn Corpus {
        self.corpus.as_ref()
    }

    pub fn extractor(&self) -> &FeatureExtractor {
        &self.extractor
    }

    /// Where item `idx` lives and which label it carries, without loading it.
    pub fn item(&self, idx: usize) -> Result<CorpusItem> {
        self.corpus.resolve(idx)
    }

    /// Loads and featurizes item `idx`.
    pub fn get(&self, idx: usize) -> Result<Sample> {
        let item = self.corpus.resolve(idx)?;
        let clip = self.decoder.decode(&item.path)?;
        debug!(
            index = idx,
            path = %item.path.display(),
            label = item.label,
            channels = clip.channel_count(),
            source_rate = clip.sample_rate,
            "loaded item"
        );
        let extraction = self.extractor.extract(&clip)?;
        if extraction.replaced_non_finite > 0 && !self.warned_non_finite.swap(true, Ordering::Relaxed)
        {
            warn!(
                index = idx,
                replaced = extraction.replaced_non_finite,
                fill = NON_FINITE_FILL,
                "non-finite mel energies replaced before log scaling"
            );
        }
        Ok(Sample {
            features: extraction.features,
            label: item.label,
        })
    }

    /// Loads many items in parallel; results keep the order of `indices`.
    pub fn get_many(&self, indices: &[usize]) -> Vec<Result<Sample>> {
        indices.par_iter().map(|&idx| self.get(idx)).collect()
    }

    /// The mono, resampled, cut/padded waveform of item `idx`.
    pub fn waveform(&self, idx: usize) -> Result<(CorpusItem, Vec<f32>)> {
        let item = self.corpus.resolve(idx)?;
        let clip = self.decoder.decode(&item.path)?;
        let waveform = self.extractor.prepare_waveform(&clip)?;
        Ok((item, waveform))
    }
}
