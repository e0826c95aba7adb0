use anyhow::{bail, Context, Result};
use clap::Parser;
use emospeech::audio::encoder::encode_wav;
use emospeech::cli::{
    Cli, Command, ExtractArgs, ExtractSummary, InspectArgs, RenderArgs, ScanArgs,
};
use emospeech::corpus::{checked_index, CorpusItem};
use emospeech::EmotionDataset;
use rayon::prelude::*;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Command::Inspect(args) => handle_inspect(&args),
        Command::Extract(args) => handle_extract(&args),
        Command::Scan(args) => handle_scan(&args),
        Command::Render(args) => handle_render(&args),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn open_dataset(args: &emospeech::cli::DatasetArgs) -> Result<EmotionDataset> {
    let config = args.to_config()?;
    EmotionDataset::open(&config).with_context(|| {
        format!(
            "Failed to open {} corpus at {:?}",
            config.corpus, config.root_dir
        )
    })
}

fn handle_inspect(args: &InspectArgs) -> Result<()> {
    let dataset = open_dataset(&args.dataset)?;
    let Some(index) = args.index else {
        println!("{} items", dataset.len());
        return Ok(());
    };
    let idx = checked_index(index, dataset.len())?;
    let item = dataset.item(idx)?;
    print_item(&item, dataset.corpus().emotions());
    Ok(())
}

fn print_item(item: &CorpusItem, emotions: &[String]) {
    println!("index:   {}", item.index);
    println!("path:    {}", item.path.display());
    println!(
        "label:   {} ({})",
        item.label,
        emotions.get(item.label).map(String::as_str).unwrap_or("?")
    );
    if let Some(cell) = &item.cell {
        println!(
            "cell:    actor={} emotion={} sentence_type={}",
            cell.actor, cell.emotion, cell.sentence_type
        );
    }
}

fn handle_extract(args: &ExtractArgs) -> Result<()> {
    let dataset = open_dataset(&args.dataset)?;
    let idx = checked_index(args.index, dataset.len())?;
    let item = dataset.item(idx)?;
    let sample = dataset
        .get(idx)
        .with_context(|| format!("Failed to extract features for item {}", idx))?;

    let (audio, log_mel) = ExtractSummary::views(&sample.features);
    let summary = ExtractSummary {
        index: idx,
        path: item.path,
        emotion: dataset
            .corpus()
            .emotions()
            .get(sample.label)
            .cloned()
            .unwrap_or_default(),
        label: sample.label,
        audio,
        log_mel,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }
    println!("index:   {}", summary.index);
    println!("path:    {}", summary.path.display());
    println!("label:   {} ({})", summary.label, summary.emotion);
    for (name, view) in [("audio", &summary.audio), ("log_mel", &summary.log_mel)] {
        if let Some(view) = view {
            println!(
                "{:<8} shape={:?} min={:.3} max={:.3} mean={:.3}",
                format!("{}:", name),
                view.shape,
                view.min,
                view.max,
                view.mean
            );
        }
    }
    Ok(())
}

fn handle_scan(args: &ScanArgs) -> Result<()> {
    let dataset = open_dataset(&args.dataset)?;
    let workers = args.worker_count()?;
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers.unwrap_or(0))
        .build()
        .context("Failed to create worker pool")?;
    info!(
        items = dataset.len(),
        workers = pool.current_num_threads(),
        "scanning dataset"
    );

    let failures: Vec<(usize, String)> = pool.install(|| {
        (0..dataset.len())
            .into_par_iter()
            .filter_map(|idx| match dataset.get(idx) {
                Ok(_) => None,
                Err(err) => Some((idx, err.to_string())),
            })
            .collect()
    });

    for (idx, err) in &failures {
        error!(index = idx, "{}", err);
    }
    println!(
        "scanned {} items, {} failed",
        dataset.len(),
        failures.len()
    );
    if !failures.is_empty() {
        bail!("{} of {} items failed to load", failures.len(), dataset.len());
    }
    Ok(())
}

fn handle_render(args: &RenderArgs) -> Result<()> {
    let dataset = open_dataset(&args.dataset)?;
    let idx = checked_index(args.index, dataset.len())?;
    let (item, waveform) = dataset
        .waveform(idx)
        .with_context(|| format!("Failed to prepare waveform for item {}", idx))?;
    let sample_rate = dataset.extractor().config().sample_rate;
    encode_wav(&waveform, sample_rate, &args.output)
        .with_context(|| format!("Failed to write {:?}", args.output))?;
    println!(
        "Wrote {} ({} samples at {} Hz) to {:?}",
        item.path.display(),
        waveform.len(),
        sample_rate,
        args.output
    );
    Ok(())
}
