use aus::analysis;
use aus::analysis::mel::MelFilterbank;
use aus::spectrum;
use aus::WindowType;
use ndarray::Array2;

use crate::config::ExtractorConfig;

/// Substitute for NaN/Inf mel energies, applied before the log.
pub const NON_FINITE_FILL: f64 = 1e-5;
/// Smallest power passed to `log10`.
pub const AMPLITUDE_FLOOR: f64 = 1e-10;
const MIN_FREQ: f64 = 0.0;

pub(crate) struct LogMel {
    /// `[n_mels, frames]` in decibels
    pub values: Array2<f32>,
    /// How many mel energies were non-finite and got replaced
    pub replaced: usize,
}

pub(crate) fn log_mel_spectrogram(waveform: &[f32], config: &ExtractorConfig) -> LogMel {
    let audio_f64: Vec<f64> = waveform.iter().map(|&s| s as f64).collect();
    let framed = centered_frames(&audio_f64, config.n_fft, config.hop_length);

    let stft = spectrum::rstft(
        &framed,
        config.n_fft,
        config.hop_length,
        WindowType::Hanning,
    );
    let (magnitude, _) = spectrum::complex_to_polar_rstft(&stft);
    let power = analysis::make_power_spectrogram(&magnitude);

    let freqs = spectrum::rfftfreq(config.n_fft, config.sample_rate);
    let filterbank = MelFilterbank::new(
        MIN_FREQ,
        (config.sample_rate as f64) / 2.0,
        config.n_mels,
        &freqs,
        false,
    );
    let mel = analysis::mel::make_mel_spectrogram(&power, &filterbank);

    let frames = mel.len();
    let mut values = Array2::zeros((config.n_mels, frames));
    let mut replaced = 0;
    for (t, frame) in mel.iter().enumerate() {
        for (m, &energy) in frame.iter().take(config.n_mels).enumerate() {
            let energy = if energy.is_finite() {
                energy
            } else {
                replaced += 1;
                NON_FINITE_FILL
            };
            values[[m, t]] = power_to_db(energy) as f32;
        }
    }

    LogMel { values, replaced }
}

/// Reflect-pads `n_fft / 2` on both sides and trims the tail so `rstft` sees
/// exactly `1 + len / hop` full-width frames, the first one centred on sample 0.
fn centered_frames(audio: &[f64], n_fft: usize, hop: usize) -> Vec<f64> {
    let mut padded = reflect_pad(audio, n_fft / 2);
    if padded.len() >= n_fft {
        let frames = 1 + (padded.len() - n_fft) / hop;
        padded.truncate((frames - 1) * hop + n_fft);
    }
    padded
}

/// Mirror padding without repeating the edge sample; `pad` is clamped to `len - 1`.
fn reflect_pad(audio: &[f64], pad: usize) -> Vec<f64> {
    if audio.is_empty() {
        return Vec::new();
    }
    let pad = pad.min(audio.len().saturating_sub(1));
    let mut padded = Vec::with_capacity(audio.len() + 2 * pad);
    padded.extend(audio[1..=pad].iter().rev());
    padded.extend_from_slice(audio);
    padded.extend(audio[audio.len() - 1 - pad..audio.len() - 1].iter().rev());
    padded
}

/// `10 * log10(max(power, AMPLITUDE_FLOOR))`
pub fn power_to_db(power: f64) -> f64 {
    10.0 * power.max(AMPLITUDE_FLOOR).log10()
}
