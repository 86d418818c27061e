use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use serde_json::json;
use tracing::{info, warn};

use readprep::parser::{find_line_ending, read_payload, Format, LineEnding};
use readprep::{write_fasta_records, ProcessedRecord, ProcessingConfig};

#[derive(Parser, Debug)]
#[command(
    name = "readprep",
    version,
    about = "Trim adapters off FASTA/FASTQ reads and filter them by length and quality"
)]
struct Cli {
    /// Input file; its name decides the format (.fa/.fasta/.fq/.fastq, optionally .gz/.bz2/.xz)
    input: PathBuf,

    /// 5' constant region to trim
    #[arg(long = "const5p")]
    const5p: Option<String>,
    /// 3' constant region to trim
    #[arg(long = "const3p")]
    const3p: Option<String>,
    /// Shortest trimmed read to keep
    #[arg(long = "min-length")]
    min_length: Option<usize>,
    /// Longest trimmed read to keep
    #[arg(long = "max-length")]
    max_length: Option<usize>,
    /// Highest mean per-base error probability to keep
    #[arg(long = "max-error")]
    max_error: Option<f64>,
    /// Fraction of an adapter's length allowed to mismatch
    #[arg(long = "tolerance")]
    tolerance: Option<f64>,

    /// TOML file with default parameters; flags override it
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,
    /// Print a JSON summary instead of FASTA
    #[arg(long = "json", action = ArgAction::SetTrue)]
    json: bool,
    /// Write to this file instead of stdout
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,
    /// Log progress to stderr
    #[arg(short = 'v', long = "verbose", action = ArgAction::SetTrue)]
    verbose: bool,
}

fn build_config(cli: &Cli) -> Result<ProcessingConfig> {
    let base = match &cli.config {
        Some(path) => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Could not read config {}", path.display()))?;
            ProcessingConfig::from_toml_str(&content)
                .with_context(|| format!("Invalid config file {}", path.display()))?
        }
        None => ProcessingConfig::default(),
    };

    let config = ProcessingConfig::new(
        cli.min_length.unwrap_or(base.min_length()),
        cli.max_length.unwrap_or(base.max_length()),
        cli.max_error.unwrap_or(base.max_error()),
    )?
    .with_const5p(cli.const5p.as_deref().unwrap_or(base.const5p()))
    .with_const3p(cli.const3p.as_deref().unwrap_or(base.const3p()))
    .with_adapter_tolerance(cli.tolerance.unwrap_or(base.adapter_tolerance()))?;
    Ok(config)
}

#[cfg(feature = "parallel")]
fn run(text: &str, format: Format, config: &ProcessingConfig) -> readprep::Result<Vec<ProcessedRecord>> {
    readprep::preprocess_text_parallel(text, format, config)
}

#[cfg(not(feature = "parallel"))]
fn run(text: &str, format: Format, config: &ProcessingConfig) -> readprep::Result<Vec<ProcessedRecord>> {
    readprep::preprocess_text(text, format, config)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(io::stderr)
        .init();

    let config = build_config(&cli)?;
    let raw = fs::read(&cli.input)
        .with_context(|| format!("Could not read {}", cli.input.display()))?;
    let filename = file_name(&cli.input);

    let (kind, text) = read_payload(&raw, &filename)
        .with_context(|| format!("Could not process {}", cli.input.display()))?;
    // FASTA output keeps the input's line endings
    let line_ending = find_line_ending(text.as_bytes()).unwrap_or(LineEnding::Unix);
    let records = run(&text, kind.format, &config)
        .with_context(|| format!("Could not process {}", cli.input.display()))?;
    info!(kept = records.len(), "finished {}", filename);
    if records.is_empty() {
        warn!("no reads passed the filters");
    }

    let mut out: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(BufWriter::new(
            fs::File::create(path)
                .with_context(|| format!("Could not create {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    if cli.json {
        let summary = json!({
            "success": true,
            "total_sequences": records.len(),
            "data": records,
        });
        serde_json::to_writer_pretty(&mut out, &summary)?;
        writeln!(out)?;
    } else {
        write_fasta_records(&records, &mut out, line_ending)?;
    }
    out.flush()?;

    Ok(())
}
