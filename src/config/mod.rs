use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DatasetError, Result};
use crate::types::{FeatureMode, Split};

pub const DEFAULT_SAMPLE_RATE: u32 = 16_000;
pub const DEFAULT_AUDIO_LENGTH_SECS: u32 = 8;
pub const DEFAULT_N_FFT: usize = 2048;
pub const DEFAULT_HOP_LENGTH: usize = 512;
pub const DEFAULT_N_MELS: usize = 128;

/// Parameters of the resample -> cut/pad -> log-mel pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Target sample rate in Hz.
    pub sample_rate: u32,
    /// Fixed clip length in seconds.
    pub audio_length: u32,
    pub n_fft: usize,
    pub hop_length: usize,
    pub n_mels: usize,
    pub mode: FeatureMode,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            audio_length: DEFAULT_AUDIO_LENGTH_SECS,
            n_fft: DEFAULT_N_FFT,
            hop_length: DEFAULT_HOP_LENGTH,
            n_mels: DEFAULT_N_MELS,
            mode: FeatureMode::default(),
        }
    }
}

impl ExtractorConfig {
    /// Number of samples every emitted waveform has.
    pub fn target_len(&self) -> usize {
        self.sample_rate as usize * self.audio_length as usize
    }

    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(DatasetError::config("sample_rate must be positive"));
        }
        if self.audio_length == 0 {
            return Err(DatasetError::config("audio_length must be positive"));
        }
        if !self.mode.needs_spectrogram() {
            return Ok(());
        }
        if self.n_fft == 0 || self.hop_length == 0 || self.n_mels == 0 {
            return Err(DatasetError::config(format!(
                "n_fft ({}), hop_length ({}) and n_mels ({}) must be positive",
                self.n_fft, self.hop_length, self.n_mels
            )));
        }
        if self.hop_length > self.target_len() {
            return Err(DatasetError::config(format!(
                "hop_length ({}) exceeds the fixed clip length of {} samples",
                self.hop_length,
                self.target_len()
            )));
        }
        if self.n_fft > self.target_len() {
            return Err(DatasetError::config(format!(
                "n_fft ({}) exceeds the fixed clip length of {} samples ({} Hz x {} s)",
                self.n_fft,
                self.target_len(),
                self.sample_rate,
                self.audio_length
            )));
        }
        Ok(())
    }
}

/// Everything needed to open a dataset: which corpus, where, which split,
/// and how items are turned into features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Built-in corpus name (`emovo`, `emodb`) or a path to a layout JSON file.
    #[serde(default = "default_corpus")]
    pub corpus: String,
    pub root_dir: PathBuf,
    #[serde(default)]
    pub split: Split,
    #[serde(flatten)]
    pub extractor: ExtractorConfig,
}

fn default_corpus() -> String {
    "emovo".to_string()
}

impl DatasetConfig {
    pub fn new(corpus: impl Into<String>, root_dir: impl Into<PathBuf>) -> Self {
        Self {
            corpus: corpus.into(),
            root_dir: root_dir.into(),
            split: Split::default(),
            extractor: ExtractorConfig::default(),
        }
    }

    pub fn with_split(mut self, split: Split) -> Self {
        self.split = split;
        self
    }

    pub fn with_mode(mut self, mode: FeatureMode) -> Self {
        self.extractor.mode = mode;
        self
    }

    pub fn with_extractor(mut self, extractor: ExtractorConfig) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path).map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&data)
            .map_err(|err| DatasetError::config(format!("{}: {err}", path.display())))
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw)
            .map_err(|err| DatasetError::config(format!("failed to parse dataset config: {err}")))
    }
}

/// Canonical form of the corpus root; must be an existing directory.
pub fn canonicalize_dir(path: &Path) -> Result<PathBuf> {
    let canonical = path.canonicalize().map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if canonical.is_dir() {
        Ok(canonical)
    } else {
        Err(DatasetError::config(format!(
            "corpus root {:?} is not a directory",
            canonical
        )))
    }
}
