mod mel;
pub mod waveform;

pub use mel::{power_to_db, AMPLITUDE_FLOOR, NON_FINITE_FILL};

use ndarray::{Array1, Array2, Axis};
use tracing::trace;

use crate::audio::resample;
use crate::config::ExtractorConfig;
use crate::error::{DatasetError, Result};
use crate::types::{AudioClip, FeatureMode, FeatureTensor};

/// Turns decoded clips into model-ready features.
///
/// Immutable once built: every call works on its own buffers, so one
/// extractor can serve many threads.
#[derive(Debug, Clone)]
pub struct FeatureExtractor {
    config: ExtractorConfig,
}

/// Output of one extraction.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub features: FeatureTensor,
    /// Non-finite mel energies replaced with [`NON_FINITE_FILL`].
    pub replaced_non_finite: usize,
}

impl FeatureExtractor {
    /// Validates `config` up front so misconfiguration fails before any item loads.
    pub fn new(config: ExtractorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Collapse to mono, resample and cut/pad to the fixed clip length.
    pub fn prepare_waveform(&self, clip: &AudioClip) -> Result<Vec<f32>> {
        if clip.sample_rate == 0 {
            return Err(DatasetError::InvalidClip("clip has a zero sample rate".into()));
        }
        let mono = waveform::collapse_channels(clip)?;
        let resampled = resample::resample(&mono, clip.sample_rate, self.config.sample_rate)
            .map_err(|err| DatasetError::InvalidClip(format!("{err:#}")))?;
        trace!(
            source_rate = clip.sample_rate,
            target_rate = self.config.sample_rate,
            frames = resampled.len(),
            "resampled clip"
        );
        Ok(waveform::cut_or_pad(&resampled, self.config.target_len()))
    }

    pub fn extract(&self, clip: &AudioClip) -> Result<Extraction> {
        let fitted = self.prepare_waveform(clip)?;

        let mut replaced_non_finite = 0;
        let features = match self.config.mode {
            FeatureMode::Raw => FeatureTensor::Raw(with_channel_axis(fitted)),
            FeatureMode::LogMel => {
                let log_mel = mel::log_mel_spectrogram(&fitted, &self.config);
                replaced_non_finite = log_mel.replaced;
                FeatureTensor::LogMel(log_mel.values.insert_axis(Axis(0)))
            }
            FeatureMode::Both => {
                let log_mel = mel::log_mel_spectrogram(&fitted, &self.config);
                replaced_non_finite = log_mel.replaced;
                FeatureTensor::Both {
                    audio: with_channel_axis(fitted),
                    log_mel: log_mel.values.insert_axis(Axis(0)),
                }
            }
        };

        Ok(Extraction {
            features,
            replaced_non_finite,
        })
    }
}

fn with_channel_axis(samples: Vec<f32>) -> Array2<f32> {
    Array1::from_vec(samples).insert_axis(Axis(0))
}
