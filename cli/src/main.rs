use std::path::{Path, PathBuf};

use bsqc_core::{Dialect, DialectConfig, ReportKind};
use bsqc_discovery::config::load_config;
use bsqc_discovery::extractor::{extract_report, rules_for};
use bsqc_discovery::output::{OutputFormat, render, write_output};
use bsqc_discovery::summarize;
use clap::{Args, Parser, Subcommand};

/// Output format as accepted on the command line.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    Tsv,
    Json,
    Yaml,
    Markdown,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(fmt: CliOutputFormat) -> Self {
        match fmt {
            CliOutputFormat::Tsv => Self::Tsv,
            CliOutputFormat::Json => Self::Json,
            CliOutputFormat::Yaml => Self::Yaml,
            CliOutputFormat::Markdown => Self::Markdown,
        }
    }
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliDialect {
    Classic,
    Extended,
}

impl From<CliDialect> for Dialect {
    fn from(dialect: CliDialect) -> Self {
        match dialect {
            CliDialect::Classic => Self::Classic,
            CliDialect::Extended => Self::Extended,
        }
    }
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliReportKind {
    Alignment,
    Deduplication,
    Splitting,
}

impl From<CliReportKind> for ReportKind {
    fn from(kind: CliReportKind) -> Self {
        match kind {
            CliReportKind::Alignment => Self::Alignment,
            CliReportKind::Deduplication => Self::Deduplication,
            CliReportKind::Splitting => Self::Splitting,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "bsqc-summary")]
#[command(about = "Summarize Bismark alignment, deduplication and methylation reports per sample")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Build the classic summary table (paired-end doubled raw counts).
    Classic(ClassicArgs),
    /// Build the extended summary table (CpG share and CHH/CHG ratio).
    Extended(ExtendedArgs),
    /// Print the fields extracted from a single report as JSON.
    Fields(FieldsArgs),
}

#[derive(Debug, Args)]
struct CommonArgs {
    /// YAML file overriding dialect settings.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Output format.
    #[arg(long, value_enum, default_value = "tsv")]
    format: CliOutputFormat,
}

#[derive(Debug, Args)]
struct ClassicArgs {
    /// Run directory containing Aligned, Deduplicated and Methylation.
    #[arg(short = 'i', long = "input_folder")]
    input_folder: PathBuf,
    /// Output file path; the table is printed to stdout when omitted.
    #[arg(short = 'o', long = "output_file")]
    output_file: Option<PathBuf>,
    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Debug, Args)]
struct ExtendedArgs {
    /// Run directory containing Aligned, Deduplicated and Methylation.
    root_dir: Option<PathBuf>,
    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Debug, Args)]
struct FieldsArgs {
    /// Which report the file is.
    #[arg(long, value_enum)]
    kind: CliReportKind,
    /// Label table to apply.
    #[arg(long, value_enum, default_value = "extended")]
    dialect: CliDialect,
    /// Report file to scan.
    input: PathBuf,
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Classic(args) => run_classic(args),
        Command::Extended(args) => run_extended(args),
        Command::Fields(args) => run_fields(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run_classic(args: ClassicArgs) -> Result<(), String> {
    let config = resolve_config(args.common.config.as_deref(), Dialect::Classic)?;
    run_summary(
        &args.input_folder,
        &config,
        args.common.format.into(),
        args.output_file.as_deref(),
    )
}

fn run_extended(args: ExtendedArgs) -> Result<(), String> {
    let Some(root) = args.root_dir else {
        return Err("missing run directory\nusage: bsqc-summary extended <ROOT_DIR>".to_string());
    };
    let config = resolve_config(args.common.config.as_deref(), Dialect::Extended)?;
    run_summary(&root, &config, args.common.format.into(), None)
}

fn run_fields(args: FieldsArgs) -> Result<(), String> {
    let rules = rules_for(args.kind.into(), args.dialect.into());
    let fields = extract_report(&args.input, &rules).map_err(|err| err.to_string())?;
    let json = serde_json::to_string_pretty(&fields)
        .map_err(|err| format!("JSON serialization failed: {err}"))?;
    println!("{json}");
    Ok(())
}

fn resolve_config(path: Option<&Path>, dialect: Dialect) -> Result<DialectConfig, String> {
    match path {
        Some(path) => load_config(path, dialect).map_err(|err| err.to_string()),
        None => Ok(DialectConfig::for_dialect(dialect)),
    }
}

fn run_summary(
    root: &Path,
    config: &DialectConfig,
    format: OutputFormat,
    output: Option<&Path>,
) -> Result<(), String> {
    let summary = summarize(root, config).map_err(|err| err.to_string())?;
    let rendered = render(&summary, format).map_err(|err| err.to_string())?;
    write_output(&rendered, output).map_err(|err| err.to_string())
}
