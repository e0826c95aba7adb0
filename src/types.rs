//! Core types shared by the corpus indexer and the feature pipeline

use clap::ValueEnum;
use ndarray::{Array1, Array2, Array3, ArrayView1, Axis};
use serde::{Deserialize, Serialize};

/// Decoded audio, planar `[channels, frames]`, samples in [-1.0, 1.0]
#[derive(Debug, Clone)]
pub struct AudioClip {
    pub samples: Array2<f32>,
    /// Source sample rate in Hz (e.g., 48000 for EMOVO)
    pub sample_rate: u32,
}

impl AudioClip {
    pub fn new(samples: Array2<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Single-channel clip from a flat sample buffer
    pub fn mono(samples: Vec<f32>, sample_rate: u32) -> Self {
        let samples = Array1::from_vec(samples).insert_axis(Axis(0));
        Self {
            samples,
            sample_rate,
        }
    }

    pub fn channel_count(&self) -> usize {
        self.samples.len_of(Axis(0))
    }

    pub fn frames(&self) -> usize {
        self.samples.len_of(Axis(1))
    }

    pub fn channel(&self, index: usize) -> ArrayView1<'_, f32> {
        self.samples.row(index)
    }

    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frames() as f64 / self.sample_rate as f64
    }
}

/// Which fixed partition of a corpus a dataset reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Split {
    #[default]
    Training,
    Validation,
    All,
}

/// Feature view emitted for every item of a dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum FeatureMode {
    /// Fixed-length waveform `[1, length]`
    Raw,
    /// Log-mel spectrogram `[1, n_mels, frames]`
    #[default]
    LogMel,
    /// Both views at once
    Both,
}

impl FeatureMode {
    pub fn needs_spectrogram(self) -> bool {
        matches!(self, FeatureMode::LogMel | FeatureMode::Both)
    }
}

/// Model-ready features with a leading size-1 channel axis
#[derive(Debug, Clone)]
pub enum FeatureTensor {
    Raw(Array2<f32>),
    LogMel(Array3<f32>),
    Both {
        audio: Array2<f32>,
        log_mel: Array3<f32>,
    },
}

impl FeatureTensor {
    pub fn audio(&self) -> Option<&Array2<f32>> {
        match self {
            FeatureTensor::Raw(audio) | FeatureTensor::Both { audio, .. } => Some(audio),
            FeatureTensor::LogMel(_) => None,
        }
    }

    pub fn log_mel(&self) -> Option<&Array3<f32>> {
        match self {
            FeatureTensor::LogMel(log_mel) | FeatureTensor::Both { log_mel, .. } => Some(log_mel),
            FeatureTensor::Raw(_) => None,
        }
    }
}

/// One training example handed to the ML runtime
#[derive(Debug, Clone)]
pub struct Sample {
    pub features: FeatureTensor,
    /// Emotion label in `[0, emotions.len())`
    pub label: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mono_clip_has_single_channel() {
        let clip = AudioClip::mono(vec![0.0; 480], 48_000);
        assert_eq!(clip.channel_count(), 1);
        assert_eq!(clip.frames(), 480);
        assert!((clip.duration_secs() - 0.01).abs() < 1e-9);
    }

    #[test]
    fn feature_views_match_variant() {
        let audio = Array2::zeros((1, 4));
        let log_mel = Array3::zeros((1, 2, 3));
        let both = FeatureTensor::Both {
            audio: audio.clone(),
            log_mel: log_mel.clone(),
        };
        assert!(both.audio().is_some() && both.log_mel().is_some());
        assert!(FeatureTensor::Raw(audio).log_mel().is_none());
        assert!(FeatureTensor::LogMel(log_mel).audio().is_none());
    }
}
