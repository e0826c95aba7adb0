use anyhow::{ensure, Result};
use dasp::interpolate::sinc::Sinc;
use dasp::interpolate::Interpolator;
use dasp::{ring_buffer, signal, Signal};
use std::f64::consts::PI;

/// Ring buffer length of the sinc interpolator; half of it is look-ahead.
const SINC_DEPTH: usize = 64;
/// Zero crossings on each side of the anti-alias kernel.
const LOWPASS_ZERO_CROSSINGS: f64 = 6.0;
/// Fraction of the target Nyquist frequency kept by the anti-alias filter.
const ROLLOFF: f64 = 0.99;

/// Band-limited resample of `samples` from `source_rate` to `target_rate`.
///
/// Always runs the interpolator, including when the rates already match.
/// Output length is `ceil(len * target_rate / source_rate)`.
pub fn resample(samples: &[f32], source_rate: u32, target_rate: u32) -> Result<Vec<f32>> {
    ensure!(source_rate > 0, "source sample rate must be positive");
    ensure!(target_rate > 0, "target sample rate must be positive");
    if samples.is_empty() {
        return Ok(Vec::new());
    }

    let output_len = resampled_len(samples.len(), source_rate, target_rate);
    let input: Vec<f64> = samples.iter().map(|&s| s as f64).collect();
    let input = if target_rate < source_rate {
        let cutoff = 0.5 * ROLLOFF * target_rate as f64 / source_rate as f64;
        low_pass(&input, cutoff)
    } else {
        input
    };

    let mut source = signal::from_iter(input);
    let mut sinc = Sinc::new(ring_buffer::Fixed::from([0.0f64; SINC_DEPTH]));
    // Sinc reads its ring buffer at SINC_DEPTH / 2; fill up to just before
    // that slot so the first output lands on the first input sample.
    for _ in 0..SINC_DEPTH / 2 - 1 {
        sinc.next_source_frame(source.next());
    }
    let converted = source.from_hz_to_hz(sinc, source_rate as f64, target_rate as f64);
    Ok(converted.take(output_len).map(|s| s as f32).collect())
}

/// Number of samples `resample` produces for an input of `len` samples.
pub fn resampled_len(len: usize, source_rate: u32, target_rate: u32) -> usize {
    let scaled = len as u64 * target_rate as u64;
    scaled.div_ceil(source_rate.max(1) as u64) as usize
}

/// Hann-windowed sinc low-pass; `cutoff` is in cycles per sample (0, 0.5].
fn low_pass(input: &[f64], cutoff: f64) -> Vec<f64> {
    let kernel = low_pass_kernel(cutoff);
    let half = kernel.len() / 2;
    let len = input.len();
    (0..len)
        .map(|i| {
            kernel
                .iter()
                .enumerate()
                .filter_map(|(k, weight)| {
                    let j = (i + k).checked_sub(half)?;
                    input.get(j).map(|x| x * weight)
                })
                .sum()
        })
        .collect()
}

fn low_pass_kernel(cutoff: f64) -> Vec<f64> {
    let half = (LOWPASS_ZERO_CROSSINGS / (2.0 * cutoff)).ceil() as isize;
    let width = (half + 1) as f64;
    let mut kernel: Vec<f64> = (-half..=half)
        .map(|n| {
            let n = n as f64;
            let x = 2.0 * cutoff * n;
            let sinc = if x == 0.0 {
                1.0
            } else {
                (PI * x).sin() / (PI * x)
            };
            let window = 0.5 * (1.0 + (PI * n / width).cos());
            2.0 * cutoff * sinc * window
        })
        .collect();
    let gain: f64 = kernel.iter().sum();
    kernel.iter_mut().for_each(|w| *w /= gain);
    kernel
}
