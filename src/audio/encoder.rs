use anyhow::{Context, Result};
use std::path::Path;

/// Write mono samples as a 16-bit PCM WAV file
pub fn encode_wav<P: AsRef<Path>>(samples: &[f32], sample_rate: u32, path: P) -> Result<()> {
    let path = path.as_ref();

    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(path, spec)
        .with_context(|| format!("Failed to create WAV file: {}", path.display()))?;

    for &sample in samples {
        let clamped = sample.clamp(-1.0, 1.0);
        writer
            .write_sample((clamped * 32767.0) as i16)
            .context("Failed to write audio sample")?;
    }

    writer.finalize().context("Failed to finalize WAV file")?;

    Ok(())
}
