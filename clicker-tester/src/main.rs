mod common;
mod logic;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::time::Instant;

use clicker_sim::{
    BuildCatalog, DEFAULT_DURATION, DEFAULT_MAX_PURCHASES, SimulationConfig, Strategy,
};
use common::split_csv;
use logic::{StrategyRun, resolve_strategies, run_strategies};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Colored summary for terminals
    Console,
    /// Full run data as pretty JSON
    Json,
    /// Summary table in Markdown
    Markdown,
    /// Purchase history rows
    Csv,
}

#[derive(Debug, Parser)]
#[command(name = "clicker-tester", version = "0.1.0")]
#[command(about = "Compare purchase strategies in the clicker economy simulator")]
struct Args {
    /// Strategies to run (comma-separated, `all` for every built-in)
    #[arg(long, default_value = "all")]
    strategies: String,

    /// List all available strategies and exit
    #[arg(long)]
    list_strategies: bool,

    /// Simulated time budget
    #[arg(long, default_value_t = DEFAULT_DURATION)]
    duration: f64,

    /// Catalog definition (JSON); the bundled catalog is used when omitted
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Override the catalog's cost growth factor
    #[arg(long)]
    growth_factor: Option<f64>,

    /// Stop a run after this many purchases
    #[arg(long, default_value_t = DEFAULT_MAX_PURCHASES)]
    max_purchases: usize,

    /// Output report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
    report: ReportFormat,

    /// Verbose output (console report lists every purchase)
    #[arg(short, long)]
    verbose: bool,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if maybe_list_strategies(&args)? {
        return Ok(());
    }

    if args.report == ReportFormat::Console {
        announce_banner();
    }

    let start_time = Instant::now();
    let strategies = resolve_strategies(&split_csv(&args.strategies))?;
    let catalog = load_catalog(&args)?;
    let config = SimulationConfig::new(args.duration).with_max_purchases(args.max_purchases);
    log::info!(
        "running {} strategies over {} catalog items for {}",
        strategies.len(),
        catalog.len(),
        args.duration
    );

    let runs = run_strategies(&catalog, config, &strategies)?;
    write_reports(&args, &runs, start_time)
}

fn maybe_list_strategies(args: &Args) -> Result<bool> {
    if !args.list_strategies {
        return Ok(false);
    }
    let mut output_target = OutputTarget::new(args.output.clone())?;
    writeln!(output_target.writer(), "Available strategies:")?;
    for strategy in Strategy::ALL {
        writeln!(
            output_target.writer(),
            "  {:12} - {}",
            strategy.key(),
            strategy.description()
        )?;
    }
    output_target.flush_inner()?;
    Ok(true)
}

fn announce_banner() {
    println!("{}", "🍪 Clicker Strategy Tester".bright_cyan().bold());
    println!("{}", "================================".cyan());
}

fn load_catalog(args: &Args) -> Result<BuildCatalog> {
    let catalog = match &args.catalog {
        Some(path) => BuildCatalog::from_path(path)
            .with_context(|| format!("failed to load catalog {}", path.display()))?,
        None => BuildCatalog::load_default(),
    };
    match args.growth_factor {
        Some(growth_factor) => catalog
            .with_growth_factor(growth_factor)
            .context("invalid --growth-factor"),
        None => Ok(catalog),
    }
}

fn write_reports(args: &Args, runs: &[StrategyRun], start_time: Instant) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;

    match args.report {
        ReportFormat::Json => logic::reports::generate_json_report(&mut output_target, runs)?,
        ReportFormat::Markdown => {
            logic::reports::generate_markdown_report(&mut output_target, runs, args.duration)?;
        }
        ReportFormat::Csv => logic::reports::generate_csv_report(&mut output_target, runs)?,
        ReportFormat::Console => logic::reports::generate_console_report(
            &mut output_target,
            runs,
            args.duration,
            start_time.elapsed(),
            args.verbose,
        )?,
    }

    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}
