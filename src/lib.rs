//! Corpus indexing and feature extraction for emotional speech datasets
//! (EMOVO, EMODB).
//!
//! An index resolves to an audio file and an emotion label; the file is
//! decoded, collapsed to mono, resampled, cut or padded to a fixed length and
//! optionally turned into a log-mel spectrogram.

pub mod audio;
pub mod cli;
pub mod config;
pub mod corpus;
pub mod dataset;
pub mod error;
pub mod features;
pub mod types;

pub use config::{DatasetConfig, ExtractorConfig};
pub use corpus::{Corpus, CorpusItem, CorpusLayout};
pub use dataset::EmotionDataset;
pub use error::{DatasetError, Result};
pub use features::{Extraction, FeatureExtractor};
pub use types::{AudioClip, FeatureMode, FeatureTensor, Sample, Split};
