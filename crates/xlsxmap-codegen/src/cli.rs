use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use tracing_subscriber::EnvFilter;
use xlsxmap_model::WorkbookDescription;

use crate::{EmissionMode, FormulaStyling, GenerationReport, GeneratorConfig, WorkbookGenerator};

#[derive(Copy, Clone, Debug, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(
    name = "xlsxmap",
    about = "Generate openpyxl modules that rebuild a workbook from its JSON description."
)]
pub struct Args {
    /// Workbook description (JSON object keyed by sheet name).
    pub input: PathBuf,

    /// Directory receiving the generated modules (created if missing).
    #[arg(long, short = 'o', value_name = "DIR")]
    pub out_dir: PathBuf,

    /// JSON generator config; flags below override its values.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// How styles are applied in sheet modules.
    #[arg(long, value_enum)]
    pub mode: Option<EmissionMode>,

    /// Whether formula cells are formatted (defaults depend on `--mode`).
    #[arg(long, value_enum)]
    pub formula_styling: Option<FormulaStyling>,

    /// Workbook path written by the generated entry point.
    #[arg(long, value_name = "NAME")]
    pub output_workbook: Option<String>,

    /// Image directory, relative to the generated modules.
    #[arg(long, value_name = "NAME")]
    pub images_dir: Option<String>,

    /// Summary format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Increase log verbosity (repeatable). `RUST_LOG` takes precedence.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);
    run_with_args(args)
}

pub fn run_with_args(args: Args) -> Result<()> {
    let report = generate_from_args(&args)?;

    let mut stdout = io::stdout().lock();
    match args.format {
        OutputFormat::Text => print_text_report(&mut stdout, &report)?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut stdout, &report)?;
            writeln!(stdout)?;
        }
    }
    Ok(())
}

/// Build the effective config: defaults, then `--config`, then individual flags.
pub fn load_config(args: &Args) -> Result<GeneratorConfig> {
    let mut config = match &args.config {
        Some(path) => GeneratorConfig::from_json_file(path)
            .with_context(|| format!("load config {}", path.display()))?,
        None => GeneratorConfig::default(),
    };

    if let Some(mode) = args.mode {
        config.emit.mode = mode;
    }
    if let Some(formula_styling) = args.formula_styling {
        config.emit.formula_styling = Some(formula_styling);
    }
    if let Some(output_workbook) = &args.output_workbook {
        config.output_workbook = output_workbook.clone();
    }
    if let Some(images_dir) = &args.images_dir {
        config.images_dir = images_dir.clone();
    }
    Ok(config)
}

pub fn generate_from_args(args: &Args) -> Result<GenerationReport> {
    let config = load_config(args)?;

    let file = File::open(&args.input)
        .with_context(|| format!("open workbook description {}", args.input.display()))?;
    let workbook = WorkbookDescription::from_reader(BufReader::new(file))
        .with_context(|| format!("parse workbook description {}", args.input.display()))?;

    WorkbookGenerator::new(config)
        .generate_to_dir(&workbook, &args.out_dir)
        .with_context(|| format!("generate into {}", args.out_dir.display()))
}

fn print_text_report(out: &mut impl Write, report: &GenerationReport) -> io::Result<()> {
    for path in &report.written {
        writeln!(out, "wrote {}", path.display())?;
    }
    let styles: Vec<String> = report
        .styles
        .iter()
        .map(|(category, count)| format!("{count} {}", category.plural()))
        .collect();
    writeln!(out, "{} sheets; {}", report.sheets, styles.join(", "))
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    // A global subscriber may already be installed when embedded; keep that one.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}
