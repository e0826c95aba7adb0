use crate::error::{DatasetError, Result as DatasetResult};
use crate::types::AudioClip;
use anyhow::{ensure, Context, Result};
use ndarray::Array2;
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Audio backend consumed by the dataset: path in, multi-channel clip out.
pub trait AudioDecoder: Send + Sync {
    fn decode(&self, path: &Path) -> DatasetResult<AudioClip>;
}

/// Decodes WAV, FLAC, OGG and MP3 through symphonia.
#[derive(Debug, Clone, Copy, Default)]
pub struct SymphoniaDecoder;

impl AudioDecoder for SymphoniaDecoder {
    fn decode(&self, path: &Path) -> DatasetResult<AudioClip> {
        decode_audio(path).map_err(|err| DatasetError::Decode {
            path: path.to_path_buf(),
            reason: format!("{err:#}"),
        })
    }
}

/// Decode an audio file to planar f32 samples, one row per channel
pub fn decode_audio<P: AsRef<Path>>(path: P) -> Result<AudioClip> {
    let path = path.as_ref();

    // Open the file
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open audio file: {}", path.display()))?;

    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    // Extension hint for the probe
    let mut hint = Hint::new();
    if let Some(extension) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(extension);
    }

    // Probe the container format
    let probe_result = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .context("Failed to probe audio format")?;

    let mut format = probe_result.format;

    // First track with a real codec
    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .context("No audio tracks found in file")?;

    let track_id = track.id;
    let sample_rate = track
        .codec_params
        .sample_rate
        .context("Sample rate not specified in audio file")?;
    ensure!(sample_rate > 0, "Audio file reports a zero sample rate");
    let declared_channels = track
        .codec_params
        .channels
        .map(|channels| channels.count())
        .unwrap_or(1);

    // Decoder for that track
    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .context("Failed to create decoder")?;

    // One growing buffer per channel
    let mut planar: Vec<Vec<f32>> = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(err))
                if err.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                // End of stream
                break;
            }
            Err(err) => return Err(err).context("Failed to read packet"),
        };

        // Skip packets from other tracks
        if packet.track_id() != track_id {
            continue;
        }

        let decoded = decoder
            .decode(&packet)
            .context("Failed to decode audio packet")?;

        let spec = *decoded.spec();
        let channels = spec.channels.count();
        if planar.is_empty() {
            planar = vec![Vec::new(); channels];
        }
        ensure!(
            planar.len() == channels,
            "Channel count changed mid-stream ({} -> {})",
            planar.len(),
            channels
        );

        // Convert to f32, then split the interleaved frames per channel
        let mut interleaved = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
        interleaved.copy_interleaved_ref(decoded);
        deinterleave_into(interleaved.samples(), &mut planar);
    }

    // Empty stream: keep the declared channel layout
    if planar.is_empty() {
        planar = vec![Vec::new(); declared_channels.max(1)];
    }

    Ok(AudioClip::new(to_array(planar)?, sample_rate))
}

fn deinterleave_into(interleaved: &[f32], planar: &mut [Vec<f32>]) {
    let channels = planar.len();
    for frame in interleaved.chunks_exact(channels) {
        for (channel, &sample) in planar.iter_mut().zip(frame) {
            channel.push(sample);
        }
    }
}

fn to_array(planar: Vec<Vec<f32>>) -> Result<Array2<f32>> {
    let channels = planar.len();
    let frames = planar.first().map_or(0, Vec::len);
    let flat: Vec<f32> = planar.into_iter().flatten().collect();
    Array2::from_shape_vec((channels, frames), flat).context("Decoded channels differ in length")
}
