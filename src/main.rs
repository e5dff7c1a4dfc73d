use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use overmod_table::config::params;
use overmod_table::modulation::{reference_lut, BoundaryPoint, Injection, ThirdHarmonicRatio};
use overmod_table::output::{save_csv, CArrayFormat};
use overmod_table::{build_correction_table, compute_boundary, StepRange, TableConfig};

/// Overmodulation correction table generator
#[derive(Parser)]
#[command(name = "overmod-table")]
#[command(version)]
#[command(about = "Overmodulation linearity correction tables for three-phase PWM drives")]
#[command(propagate_version = true)]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve the M → A curve and write the quantized correction table
    Table(TableArgs),
    /// Print the linear/overmodulation boundary
    Boundary(WaveformArgs),
    /// Print the reference waveform LUT as a C array
    Lut(LutArgs),
}

#[derive(Clone, Copy, ValueEnum)]
enum InjectionArg {
    /// Plain sinusoidal PWM
    Plain,
    /// Third-harmonic injection
    Thi,
    /// Min/max (space vector) injection
    Svm,
}

#[derive(Clone, Copy, ValueEnum)]
enum RatioArg {
    /// sin(3θ)/6
    Sixth,
    /// sin(3θ)/4
    Quarter,
}

#[derive(Args)]
struct WaveformArgs {
    /// Zero-sequence injection strategy
    #[arg(long, value_enum, default_value = "svm")]
    injection: InjectionArg,

    /// Third-harmonic ratio (only with --injection thi)
    #[arg(long, value_enum, default_value = "sixth")]
    thi_ratio: RatioArg,
}

impl WaveformArgs {
    fn injection(&self) -> Injection {
        match self.injection {
            InjectionArg::Plain => Injection::Plain,
            InjectionArg::Thi => Injection::ThirdHarmonic(match self.thi_ratio {
                RatioArg::Sixth => ThirdHarmonicRatio::Sixth,
                RatioArg::Quarter => ThirdHarmonicRatio::Quarter,
            }),
            InjectionArg::Svm => Injection::SpaceVector,
        }
    }
}

#[derive(Args)]
struct TableArgs {
    #[command(flatten)]
    waveform: WaveformArgs,

    /// CSV output path
    #[arg(short, long, default_value = params::DEFAULT_OUTPUT_PATH)]
    output: PathBuf,

    #[arg(long, default_value_t = params::grid::DEFAULT_M_START)]
    m_start: f64,
    #[arg(long, default_value_t = params::grid::DEFAULT_M_STOP)]
    m_stop: f64,
    #[arg(long, default_value_t = params::grid::DEFAULT_M_STEP)]
    m_step: f64,

    #[arg(long, default_value_t = params::grid::DEFAULT_GUESS_START)]
    guess_start: f64,
    #[arg(long, default_value_t = params::grid::DEFAULT_GUESS_STOP)]
    guess_stop: f64,
    #[arg(long, default_value_t = params::grid::DEFAULT_GUESS_STEP)]
    guess_step: f64,

    /// Residual evaluations allowed per initial guess
    #[arg(long, default_value_t = params::solver::DEFAULT_MAX_EVALUATIONS)]
    max_evaluations: usize,

    /// Absolute tolerance of the fundamental integral
    #[arg(long, default_value_t = params::quadrature::DEFAULT_EPS_ABS)]
    eps_abs: f64,

    /// Solve grid points one at a time
    #[arg(long)]
    sequential: bool,

    /// Also print the codes as a C array
    #[arg(long)]
    c_array: bool,

    /// Variable name used with --c-array
    #[arg(long, default_value = "CORRECTIONFACTOR")]
    name: String,
}

#[derive(Args)]
struct LutArgs {
    #[command(flatten)]
    waveform: WaveformArgs,

    #[arg(long, default_value_t = params::lut::DEFAULT_LENGTH)]
    length: usize,

    #[arg(long, default_value_t = params::lut::DEFAULT_AMPLITUDE)]
    amplitude: f64,

    #[arg(long, default_value = "sine_wave_lut")]
    name: String,

    #[arg(long, default_value_t = params::c_array::DEFAULT_ITEMS_PER_LINE)]
    items_per_line: usize,
}

fn run_table(args: TableArgs) -> Result<()> {
    let injection = args.waveform.injection();
    let m_grid = StepRange::new(args.m_start, args.m_stop, args.m_step)
        .values()
        .context("Invalid M grid")?;
    let guesses = StepRange::new(args.guess_start, args.guess_stop, args.guess_step)
        .values()
        .context("Invalid initial guess sweep")?;

    let mut config = TableConfig::new(injection);
    config.solver.max_evaluations = args.max_evaluations;
    config.quadrature.eps_abs = args.eps_abs;
    config.parallel = config.parallel && !args.sequential;

    info!(
        "Solving {} targets with {} initial guesses ({})",
        m_grid.len(),
        guesses.len(),
        injection.label()
    );
    let table = build_correction_table(&m_grid, &guesses, &config)
        .context("Failed to build correction table")?;

    if !table.unsolved.is_empty() {
        warn!("{} of {} targets had no solution", table.unsolved.len(), m_grid.len());
    }
    if table.is_empty() {
        warn!("No grid point lies in the overmodulation region");
    }

    save_csv(&table, &args.output)?;

    println!("sig_mode: {}", injection.sig_mode());
    if let Some(m_start) = table.m_start() {
        println!("table start M: {:.3}", m_start);
    }
    println!("entries: {}", table.len());
    println!("scale: {}", table.scale);
    println!("dropped: {}", table.unsolved.len());

    if args.c_array {
        let format = CArrayFormat::new(params::c_array::TABLE_DATA_TYPE, args.name);
        println!("{}", format.definition(&table.codes()));
    }
    Ok(())
}

fn run_boundary(args: WaveformArgs) -> Result<()> {
    let injection = args.injection();
    let max_wave_val = compute_boundary(injection, &TableConfig::new(injection).minimizer)
        .context("Failed to find the saturation boundary")?;
    let point = BoundaryPoint::new(max_wave_val);

    println!("injection: {}", injection.label());
    println!("max_wave_val: {}", point.max_wave_val);
    println!("boundary: ({:.4}, {:.4})", point.a_boundary, point.m_boundary);
    Ok(())
}

fn run_lut(args: LutArgs) -> Result<()> {
    let injection = args.waveform.injection();
    let lut = reference_lut(injection, args.length, args.amplitude);
    let format = CArrayFormat::new(params::c_array::LUT_DATA_TYPE, args.name)
        .with_items_per_line(args.items_per_line);

    info!("{} LUT with {} samples", injection.label(), lut.len());
    println!("{}", format.definition(&lut));
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        1 => EnvFilter::new("overmod_table=debug,info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Table(args) => run_table(args),
        Commands::Boundary(args) => run_boundary(args),
        Commands::Lut(args) => run_lut(args),
    }
}
