use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::process::ExitCode;

use activity_trainer::config::PipelineConfig;
use activity_trainer::dataset::{self, SensorStream};
use activity_trainer::export::{self, RunSummary};
use activity_trainer::pipeline::window::LabelPolicy;
use activity_trainer::pipeline::{FeatureMatrix, StreamProcessor};
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "activity_cli",
    about = "Feature extraction pipeline for labelled sensor recordings"
)]
struct Cli {
    /// Optional JSON config file; missing or invalid files fall back to defaults
    #[arg(long)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract features from a continuous accelerometer CSV recording
    Extract {
        /// Input CSV: timestamp, axes..., label per row
        input: PathBuf,
        /// Output feature CSV path
        #[arg(long)]
        output: PathBuf,
        /// Samples per window
        #[arg(long)]
        window_size: Option<usize>,
        /// Samples between window starts
        #[arg(long)]
        step_size: Option<usize>,
        /// Take each window's label from this sample offset instead of the midpoint
        #[arg(long)]
        label_offset: Option<usize>,
        /// Skip the gravity-based reorientation pass
        #[arg(long)]
        no_reorient: bool,
        /// Also write a JSON run summary next to the output CSV
        #[arg(long)]
        summary: bool,
    },
    /// Extract features from pre-windowed speaker CSV files in a directory
    ExtractSpeakers {
        /// Directory containing speaker-data-<name>-*.csv files
        data_dir: PathBuf,
        /// Output feature CSV path
        #[arg(long)]
        output: PathBuf,
    },
    /// Print shape, labels, and estimated sampling rate of a recording
    Inspect {
        /// Input CSV: timestamp, axes..., label per row
        input: PathBuf,
    },
    /// List the feature names produced for a given axis count
    Features {
        #[arg(long, default_value_t = 3)]
        axes: usize,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::from(1)
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = cli
        .config
        .as_ref()
        .map(PipelineConfig::load_from_file)
        .unwrap_or_default();

    match cli.command {
        Commands::Extract {
            input,
            output,
            window_size,
            step_size,
            label_offset,
            no_reorient,
            summary,
        } => {
            let mut config = config;
            if let Some(size) = window_size {
                config.windowing.window_size = size;
            }
            if let Some(step) = step_size {
                config.windowing.step_size = step;
            }
            if let Some(offset) = label_offset {
                config.windowing.label_policy = LabelPolicy::FixedOffset { offset };
            }
            if no_reorient {
                config.orientation.enabled = false;
            }
            run_extract(config, &input, &output, summary)
        }
        Commands::ExtractSpeakers { data_dir, output } => {
            run_extract_speakers(config, &data_dir, &output)
        }
        Commands::Inspect { input } => run_inspect(&input),
        Commands::Features { axes } => run_features(config, axes),
    }
}

fn run_extract(
    config: PipelineConfig,
    input: &PathBuf,
    output: &PathBuf,
    summary: bool,
) -> Result<ExitCode> {
    let stream = dataset::load_stream(input)
        .with_context(|| format!("loading recording {}", input.display()))?;
    let processor = StreamProcessor::new(config);
    let matrix = processor
        .process_stream(&stream)
        .with_context(|| format!("extracting features from {}", input.display()))?;

    write_outputs(&matrix, output, summary)
}

fn run_extract_speakers(
    config: PipelineConfig,
    data_dir: &PathBuf,
    output: &PathBuf,
) -> Result<ExitCode> {
    let dataset = dataset::load_speaker_dir(data_dir)
        .with_context(|| format!("loading speaker data from {}", data_dir.display()))?;
    for (label, name) in dataset.class_names.iter().enumerate() {
        println!("label {}: {}", label, name);
    }

    let processor = StreamProcessor::new(config);
    let matrix = processor
        .process_windows(&dataset)
        .with_context(|| format!("extracting features from {}", data_dir.display()))?;

    write_outputs(&matrix, output, false)
}

fn run_inspect(input: &PathBuf) -> Result<ExitCode> {
    let stream = dataset::load_stream(input)
        .with_context(|| format!("loading recording {}", input.display()))?;

    println!("rows: {}", stream.len());
    println!("axes: {}", stream.n_axes());
    println!("labels: {:?}", unique_labels(&stream));
    match stream.estimated_sampling_rate() {
        Some(rate) => println!("sampling rate: {:.1} Hz (estimated)", rate),
        None => println!("sampling rate: unknown (too few samples)"),
    }

    Ok(ExitCode::from(0))
}

fn run_features(config: PipelineConfig, axes: usize) -> Result<ExitCode> {
    if axes == 0 {
        bail!("axis count must be at least 1");
    }
    let processor = StreamProcessor::new(config);
    for (index, name) in processor.feature_names(axes).iter().enumerate() {
        println!("{:3}  {}", index, name);
    }
    Ok(ExitCode::from(0))
}

fn write_outputs(matrix: &FeatureMatrix, output: &PathBuf, summary: bool) -> Result<ExitCode> {
    export::write_feature_csv_path(matrix, output)
        .with_context(|| format!("writing {}", output.display()))?;

    if summary {
        let path = output.with_extension("summary.json");
        let file = File::create(&path).with_context(|| format!("creating {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        export::write_summary_json(&RunSummary::from_matrix(matrix), &mut writer)
            .with_context(|| format!("writing {}", path.display()))?;
    }

    Ok(ExitCode::from(0))
}

fn unique_labels(stream: &SensorStream) -> Vec<i64> {
    let mut labels: Vec<i64> = stream.labels().to_vec();
    labels.sort_unstable();
    labels.dedup();
    labels
}
