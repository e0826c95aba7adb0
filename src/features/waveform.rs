//! Pure waveform stages: channel collapse and cut/pad to a fixed length.

use ndarray::Axis;

use crate::error::{DatasetError, Result};
use crate::types::AudioClip;

/// Averages all channels into one; a mono clip is copied as is.
pub fn collapse_channels(clip: &AudioClip) -> Result<Vec<f32>> {
    if clip.channel_count() == 0 {
        return Err(DatasetError::InvalidClip("clip has no channels".into()));
    }
    if clip.channel_count() == 1 {
        return Ok(clip.channel(0).to_vec());
    }
    clip.samples
        .mean_axis(Axis(0))
        .map(|mono| mono.to_vec())
        .ok_or_else(|| DatasetError::InvalidClip("clip has no channels".into()))
}

/// Truncates to the first `target_len` samples or zero-pads at the end.
pub fn cut_or_pad(samples: &[f32], target_len: usize) -> Vec<f32> {
    let mut fitted = Vec::with_capacity(target_len);
    let kept = samples.len().min(target_len);
    fitted.extend_from_slice(&samples[..kept]);
    fitted.resize(target_len, 0.0);
    fitted
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2};

    #[test]
    fn averages_channels() {
        let clip = AudioClip::new(array![[1.0, 0.5, -1.0], [0.0, 0.5, 1.0]], 16_000);
        assert_eq!(collapse_channels(&clip).unwrap(), vec![0.5, 0.5, 0.0]);
    }

    #[test]
    fn mono_is_unchanged() {
        let clip = AudioClip::mono(vec![0.1, -0.2, 0.3], 16_000);
        assert_eq!(collapse_channels(&clip).unwrap(), vec![0.1, -0.2, 0.3]);
    }

    #[test]
    fn channelless_clip_is_invalid() {
        let clip = AudioClip::new(Array2::zeros((0, 10)), 16_000);
        assert!(matches!(
            collapse_channels(&clip),
            Err(DatasetError::InvalidClip(_))
        ));
    }

    #[test]
    fn truncates_to_prefix() {
        let input: Vec<f32> = (0..20).map(|i| i as f32).collect();
        let fitted = cut_or_pad(&input, 10);
        assert_eq!(fitted, input[..10].to_vec());
    }

    #[test]
    fn pads_with_trailing_zeros() {
        let input = vec![0.25; 7];
        let fitted = cut_or_pad(&input, 10);
        assert_eq!(&fitted[..7], &input[..]);
        assert_eq!(&fitted[7..], &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn length_is_always_target() {
        for len in [0, 1, 9, 10, 11, 1_000] {
            assert_eq!(cut_or_pad(&vec![1.0; len], 10).len(), 10);
        }
    }

    #[test]
    fn input_buffer_is_not_aliased() {
        let input = vec![1.0; 4];
        let mut fitted = cut_or_pad(&input, 4);
        fitted[0] = 0.0;
        assert_eq!(input[0], 1.0);
    }
}
