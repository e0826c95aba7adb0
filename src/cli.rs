use std::path::PathBuf;

use anyhow::{ensure, Context, Result};
use clap::{Args, Parser, Subcommand};
use ndarray::{ArrayBase, Data, Dimension};
use serde::Serialize;

use crate::config::DatasetConfig;
use crate::types::{FeatureMode, FeatureTensor, Split};

#[derive(Parser, Debug)]
#[command(
    name = "emospeech",
    version,
    about = "Index emotional speech corpora and extract model-ready features"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the number of items in a split, or where one index resolves.
    Inspect(InspectArgs),
    /// Run the feature pipeline for one item and summarize the result.
    Extract(ExtractArgs),
    /// Run every item of a split through the pipeline and report failures.
    Scan(ScanArgs),
    /// Write the resampled, fixed-length waveform of one item to a WAV file.
    Render(RenderArgs),
}

#[derive(Args, Debug, Clone)]
pub struct DatasetArgs {
    /// JSON dataset configuration used as the base; flags override it.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
    /// Built-in corpus (emovo, emodb) or path to a layout JSON file.
    #[arg(long)]
    pub corpus: Option<String>,
    /// Root directory of the corpus audio files.
    #[arg(long = "root", value_name = "DIR")]
    pub root_dir: Option<PathBuf>,
    #[arg(long, value_enum)]
    pub split: Option<Split>,
    #[arg(long, value_enum)]
    pub mode: Option<FeatureMode>,
    /// Target sample rate in Hz.
    #[arg(long)]
    pub sample_rate: Option<u32>,
    /// Fixed clip length in seconds.
    #[arg(long)]
    pub audio_length: Option<u32>,
    #[arg(long)]
    pub n_fft: Option<usize>,
    #[arg(long)]
    pub hop_length: Option<usize>,
    #[arg(long)]
    pub n_mels: Option<usize>,
}

impl DatasetArgs {
    /// Config file (if any) with command-line overrides applied on top.
    pub fn to_config(&self) -> Result<DatasetConfig> {
        let mut config = match &self.config {
            Some(path) => DatasetConfig::from_file(path)
                .with_context(|| format!("Failed to load dataset config {:?}", path))?,
            None => {
                let root = self
                    .root_dir
                    .clone()
                    .context("Provide the corpus root via --root or --config")?;
                DatasetConfig::new(self.corpus.as_deref().unwrap_or("emovo"), root)
            }
        };

        if let Some(corpus) = &self.corpus {
            config.corpus = corpus.clone();
        }
        if let Some(root) = &self.root_dir {
            config.root_dir = root.clone();
        }
        if let Some(split) = self.split {
            config.split = split;
        }
        let extractor = &mut config.extractor;
        if let Some(mode) = self.mode {
            extractor.mode = mode;
        }
        if let Some(sample_rate) = self.sample_rate {
            extractor.sample_rate = sample_rate;
        }
        if let Some(audio_length) = self.audio_length {
            extractor.audio_length = audio_length;
        }
        if let Some(n_fft) = self.n_fft {
            extractor.n_fft = n_fft;
        }
        if let Some(hop_length) = self.hop_length {
            extractor.hop_length = hop_length;
        }
        if let Some(n_mels) = self.n_mels {
            extractor.n_mels = n_mels;
        }
        Ok(config)
    }
}

#[derive(Args, Debug, Clone)]
pub struct InspectArgs {
    #[command(flatten)]
    pub dataset: DatasetArgs,
    /// Item to resolve; omit to print the split size.
    #[arg(long, allow_negative_numbers = true)]
    pub index: Option<i64>,
}

#[derive(Args, Debug, Clone)]
pub struct ExtractArgs {
    #[command(flatten)]
    pub dataset: DatasetArgs,
    #[arg(long, allow_negative_numbers = true)]
    pub index: i64,
    /// Print the summary as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ScanArgs {
    #[command(flatten)]
    pub dataset: DatasetArgs,
    /// Worker threads; defaults to one per core.
    #[arg(long)]
    pub jobs: Option<usize>,
}

impl ScanArgs {
    pub fn worker_count(&self) -> Result<Option<usize>> {
        if let Some(jobs) = self.jobs {
            ensure!(jobs > 0, "--jobs must be positive");
        }
        Ok(self.jobs)
    }
}

#[derive(Args, Debug, Clone)]
pub struct RenderArgs {
    #[command(flatten)]
    pub dataset: DatasetArgs,
    #[arg(long, allow_negative_numbers = true)]
    pub index: i64,
    /// Destination WAV file.
    #[arg(long, value_name = "PATH")]
    pub output: PathBuf,
}

/// Shape and value range of one feature view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewSummary {
    pub shape: Vec<usize>,
    pub min: f32,
    pub max: f32,
    pub mean: f32,
}

impl ViewSummary {
    pub fn of<S, D>(array: &ArrayBase<S, D>) -> Self
    where
        S: Data<Elem = f32>,
        D: Dimension,
    {
        let (min, max) = array
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        let mean = if array.is_empty() {
            0.0
        } else {
            array.iter().sum::<f32>() / array.len() as f32
        };
        Self {
            shape: array.shape().to_vec(),
            min,
            max,
            mean,
        }
    }
}

/// What `extract` reports for one item.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractSummary {
    pub index: usize,
    pub path: PathBuf,
    pub label: usize,
    pub emotion: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio: Option<ViewSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_mel: Option<ViewSummary>,
}

impl ExtractSummary {
    pub fn views(features: &FeatureTensor) -> (Option<ViewSummary>, Option<ViewSummary>) {
        (
            features.audio().map(ViewSummary::of),
            features.log_mel().map(ViewSummary::of),
        )
    }
}
