#![allow(dead_code)]

use std::f32::consts::PI;
use std::fs;
use std::path::Path;

use anyhow::Result;
use emospeech::{ExtractorConfig, FeatureMode};
use hound::{SampleFormat, WavSpec, WavWriter};

pub const SOURCE_RATE: u32 = 16_000;

/// Small pipeline parameters so tests stay fast.
pub fn small_extractor(mode: FeatureMode) -> ExtractorConfig {
    ExtractorConfig {
        sample_rate: 8_000,
        audio_length: 1,
        n_fft: 256,
        hop_length: 128,
        n_mels: 32,
        mode,
    }
}

pub fn write_tone(path: &Path, frequency: f32, seconds: f32, channels: u16) -> Result<()> {
    let frames = (SOURCE_RATE as f32 * seconds) as usize;
    let samples = (0..frames).map(|i| {
        let t = i as f32 / SOURCE_RATE as f32;
        0.5 * (2.0 * PI * frequency * t).sin()
    });
    write_wav(path, samples, channels)
}

pub fn write_silence(path: &Path, seconds: f32) -> Result<()> {
    let frames = (SOURCE_RATE as f32 * seconds) as usize;
    write_wav(path, std::iter::repeat(0.0).take(frames), 1)
}

fn write_wav(path: &Path, samples: impl Iterator<Item = f32>, channels: u16) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let spec = WavSpec {
        channels,
        sample_rate: SOURCE_RATE,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(path, spec)?;
    for sample in samples {
        let value = (sample * i16::MAX as f32) as i16;
        for _ in 0..channels {
            writer.write_sample(value)?;
        }
    }
    writer.finalize()?;
    Ok(())
}
