//! tsfeat CLI — turn daily OHLCV CSV files into feature tables.
//!
//! Commands:
//! - `transform` — run the feature pipeline and write the full table
//! - `labels` — run label extraction and write binary label columns

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::Write;
use std::path::{Path, PathBuf};
use tsfeat_core::{Bar, FeatureConfig, FeatureExtractor, FeatureFrame};

#[derive(Parser)]
#[command(
    name = "tsfeat",
    about = "tsfeat CLI — calendar-partitioned feature extraction for daily OHLCV series"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the feature pipeline and write the resulting table.
    Transform {
        #[command(flatten)]
        io: IoArgs,

        #[command(flatten)]
        pipeline: PipelineArgs,
    },
    /// Run label extraction and write the binary label columns.
    Labels {
        #[command(flatten)]
        io: IoArgs,

        #[command(flatten)]
        pipeline: PipelineArgs,
    },
}

#[derive(clap::Args)]
struct IoArgs {
    /// Input CSV with columns date,open,high,low,close,volume.
    #[arg(long)]
    input: PathBuf,

    /// Output file. Defaults to stdout.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
    format: OutputFormat,
}

#[derive(clap::Args)]
struct PipelineArgs {
    /// Path to a TOML config file. Flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Deviation encoding: perc, value, label.
    #[arg(long)]
    feature: Option<String>,

    /// Active granularities: wmsy, wmy, my, m, y.
    #[arg(long)]
    steps: Option<String>,

    /// Reduced pipeline: skip volume, daily deltas, and daily oscillations.
    #[arg(long, default_value_t = false)]
    reduced: bool,

    /// Day-of-month divisor for sub-month slices.
    #[arg(long)]
    slice_month: Option<u32>,

    /// Month divisor for sub-year slices.
    #[arg(long)]
    slice_year: Option<u32>,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Csv,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Transform { io, pipeline } => {
            let config = build_config(&pipeline)?;
            let bars = read_bars(&io.input)?;
            let extractor = FeatureExtractor::new(config);
            let frame = extractor.fit_transform(&bars)?;
            write_frame(&frame, &io)?;
            eprintln!(
                "Transformed {} rows into {} columns",
                frame.len(),
                frame.width()
            );
            Ok(())
        }
        Commands::Labels { io, pipeline } => {
            let config = build_config(&pipeline)?;
            let bars = read_bars(&io.input)?;
            let extractor = FeatureExtractor::new(config);
            let frame = extractor.extract_label(&bars)?;
            write_frame(&frame, &io)?;
            let positives = frame
                .column("label")
                .map(|c| c.iter().filter(|&&v| v == 1.0).count())
                .unwrap_or(0);
            eprintln!(
                "Extracted labels for {} rows ({} positive)",
                frame.len(),
                positives
            );
            Ok(())
        }
    }
}

fn build_config(args: &PipelineArgs) -> Result<FeatureConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            FeatureConfig::from_toml(&text)?
        }
        None => FeatureConfig::default(),
    };

    if let Some(feature) = &args.feature {
        config.feature = feature.parse()?;
    }
    if let Some(steps) = &args.steps {
        config.steps = steps.parse()?;
    }
    if args.reduced {
        config.mult = false;
    }
    if let Some(sm) = args.slice_month {
        config.slice_month = sm;
    }
    if let Some(sy) = args.slice_year {
        config.slice_year = sy;
    }

    config.validate()?;
    Ok(config)
}

fn read_bars(path: &Path) -> Result<Vec<Bar>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("opening input {}", path.display()))?;
    let mut bars = Vec::new();
    for record in reader.deserialize() {
        let bar: Bar = record?;
        bars.push(bar);
    }
    if bars.is_empty() {
        bail!("input {} holds no rows", path.display());
    }
    Ok(bars)
}

fn write_frame(frame: &FeatureFrame, io: &IoArgs) -> Result<()> {
    let rendered = match io.format {
        OutputFormat::Csv => render_csv(frame)?,
        OutputFormat::Json => render_json(frame)?,
    };
    match &io.output {
        Some(path) => std::fs::write(path, rendered)
            .with_context(|| format!("writing output {}", path.display()))?,
        None => std::io::stdout().write_all(rendered.as_bytes())?,
    }
    Ok(())
}

fn render_csv(frame: &FeatureFrame) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    let mut header = vec!["date".to_string()];
    header.extend(frame.names().map(str::to_string));
    writer.write_record(&header)?;
    for (date, cells) in frame.rows() {
        let mut record = vec![date.to_string()];
        record.extend(cells.iter().map(|v| v.to_string()));
        writer.write_record(&record)?;
    }
    let bytes = writer.into_inner()?;
    Ok(String::from_utf8(bytes)?)
}

fn render_json(frame: &FeatureFrame) -> Result<String> {
    let names: Vec<&str> = frame.names().collect();
    let rows: Vec<serde_json::Value> = frame
        .rows()
        .map(|(date, cells)| {
            let mut obj = serde_json::Map::new();
            obj.insert("date".into(), serde_json::Value::String(date.to_string()));
            for (name, value) in names.iter().zip(cells) {
                obj.insert((*name).into(), serde_json::json!(value));
            }
            serde_json::Value::Object(obj)
        })
        .collect();
    Ok(serde_json::to_string_pretty(&rows)?)
}
