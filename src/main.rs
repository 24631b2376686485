use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use chrono::DateTime;
use clap::{Parser, Subcommand};
use log::error;

use thermolabel::labels::{self, JsonLabelStore, LabelKind, LabelSet};
use thermolabel::storage::{JsonDirSource, SampleStore};
use thermolabel::LabelerConfig;

#[derive(Parser)]
#[command(name = "thermolabel")]
#[command(about = "Browse thermal frames and label frame ranges", long_about = None)]
#[command(version)]
struct Cli {
    /// Label document
    #[arg(long, env = "THERMOLABEL_LABELS", default_value = "data/labels.json")]
    labels_path: PathBuf,
    /// Directory of per-partition sample documents
    #[arg(long, env = "THERMOLABEL_SAMPLES", default_value = "data/samples")]
    samples_dir: PathBuf,
    /// Fetch only the first samples of each partition
    #[arg(long, env = "THERMOLABEL_DEBUG")]
    debug: bool,
    /// Decoded bytes kept in memory before partitions are spilled
    #[arg(long)]
    memory_limit: Option<usize>,
    #[arg(long)]
    spill_path: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List available partitions (dates).
    Partitions,
    /// Summarize the frames of a partition.
    Frames { partition: String },
    /// Print one frame of a partition.
    Show { partition: String, index: usize },
    /// List saved labels.
    Labels,
    /// Label the frames between two positions of a partition.
    Add {
        partition: String,
        start: usize,
        end: usize,
        /// Label code, see `vocabulary`
        code: String,
    },
    /// List label codes.
    Vocabulary,
}

fn main() -> ExitCode {
    // RUST_LOG overrides the default level
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = LabelerConfig {
        labels_path: cli.labels_path,
        samples_dir: cli.samples_dir,
        memory_limit: cli.memory_limit,
        spill_path: cli.spill_path,
        ..LabelerConfig::default()
    };

    match cli.command {
        Command::Vocabulary => {
            for kind in LabelKind::ALL {
                println!("{}", kind);
            }
        }
        Command::Labels => {
            let labels = open_labels(&config)?;
            for line in labels::display_labels(&labels.data()) {
                println!("{}", line);
            }
        }
        Command::Partitions => {
            let store = open_store(&config)?;
            for partition in store.list_partitions()? {
                println!("{}", partition);
            }
        }
        Command::Frames { partition } => {
            let store = open_store(&config)?;
            let samples = store.load_partition(&partition, cli.debug)?;
            println!("{}: {} frames", partition, samples.len());
            if let (Some(first), Some(last)) = (samples.first_key(), samples.last_key()) {
                println!("first: {}", describe_timestamp(first));
                println!("last:  {}", describe_timestamp(last));
            }
        }
        Command::Show { partition, index } => {
            let store = open_store(&config)?;
            let samples = store.load_partition(&partition, cli.debug)?;
            let (key, frame) = samples
                .at(index)
                .with_context(|| format!("{} has no frame at position {}", partition, index))?;
            println!("{}", describe_timestamp(key));
            println!("min {:.2}  max {:.2}  mean {:.2}", frame.min(), frame.max(), frame.mean());
            print!("{}", frame);
        }
        Command::Add { partition, start, end, code } => {
            let kind: LabelKind = code.parse()?;
            let store = open_store(&config)?;
            let labels = open_labels(&config)?;

            let samples = store.load_partition(&partition, cli.debug)?;
            let candidate = samples.candidate(start, end, kind.code())?;
            match labels.add_label(candidate) {
                Ok(()) => println!("Label added successfully"),
                Err(labels::Error::Overlap) => anyhow::bail!(labels::OVERLAP_MESSAGE),
                Err(err) => return Err(err.into()),
            }
            for line in labels::display_labels(&labels.data()) {
                println!("{}", line);
            }
        }
    }

    Ok(())
}

fn open_store(config: &LabelerConfig) -> anyhow::Result<SampleStore<JsonDirSource>> {
    SampleStore::new(JsonDirSource::new(&config.samples_dir), config.storage())
        .with_context(|| format!("Failed to open samples at {}", config.samples_dir.display()))
}

fn open_labels(config: &LabelerConfig) -> anyhow::Result<LabelSet> {
    LabelSet::open(JsonLabelStore::new(&config.labels_path))
        .with_context(|| format!("Failed to open labels at {}", config.labels_path.display()))
}

/// Unix-second keys are shown with their UTC time.
fn describe_timestamp(key: &str) -> String {
    match key.parse::<i64>().ok().and_then(|secs| DateTime::from_timestamp(secs, 0)) {
        Some(time) => format!("{} ({})", key, time.format("%Y-%m-%d %H:%M:%S UTC")),
        None => key.to_string(),
    }
}
