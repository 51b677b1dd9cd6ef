//! Trace-driven cache simulator CLI.
//!
//! This binary provides a single entry point for all simulation modes. It performs:
//! 1. **Run:** Replay one trace through one cache and print its report.
//! 2. **Sweep:** Replay one trace through every policy, with and without write allocation.
//! 3. **Trace generation:** Emit the memory trace of a blocked matrix product.
//! 4. **Study:** Hit rate against matrix size for each blocking factor and policy.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cachesim_core::config::parse_byte_size;
use cachesim_core::sim::{self, BlockingStudy, MatmulTrace, SimError, Simulator, Trace, study};
use cachesim_core::{CacheConfig, ReplacementPolicy};

#[derive(Parser, Debug)]
#[command(
    name = "cachesim",
    author,
    version,
    about = "Trace-driven set-associative cache simulator",
    long_about = "Replay a memory trace (`R <addr>` / `W <addr>` lines) through a set-associative cache.\n\nExamples:\n  cachesim run pinatrace.out\n  cachesim run trace.txt -b 16 -c 1M -w 4 --policy lru --write-no-allocate\n  cachesim sweep trace.txt -b 16 -w 4 --output results.csv\n  cachesim gen-trace --size 32 --blocks 4 --output memtrace-32-4.txt\n  cachesim study -b 16 -w 4 --out-dir results"
)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay a trace through one cache.
    Run {
        /// Memory trace file.
        trace: PathBuf,

        #[command(flatten)]
        cache: CacheArgs,

        /// Eviction policy (random, fifo, lru, lfu).
        #[arg(long)]
        policy: Option<ReplacementPolicy>,

        /// Do not allocate on write misses.
        #[arg(long)]
        write_no_allocate: bool,

        /// Print the report as JSON.
        #[arg(long)]
        json: bool,

        /// Print the resident tags of every set after the run.
        #[arg(long)]
        dump: bool,
    },

    /// Replay a trace through every policy, with and without write allocation.
    Sweep {
        /// Memory trace file.
        trace: PathBuf,

        #[command(flatten)]
        cache: CacheArgs,

        /// Write `label,hit_rate` lines to this file.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print all reports as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Replay blocked matrix products over matrix sizes and blocking factors,
    /// writing one `results-<Cache>-<bf>.txt` file per policy and factor.
    Study {
        #[command(flatten)]
        cache: CacheArgs,

        /// Blocking factors (comma separated).
        #[arg(long, value_delimiter = ',', default_values_t = study::BLOCKING_FACTORS)]
        blocking_factors: Vec<usize>,

        /// Matrix sizes (comma separated); each must be a multiple of every factor.
        #[arg(long, value_delimiter = ',', default_values_t = study::MATRIX_SIZES)]
        sizes: Vec<usize>,

        /// Directory for the result files.
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },

    /// Generate the memory trace of a blocked matrix product.
    GenTrace {
        /// Matrix dimension.
        #[arg(long)]
        size: usize,

        /// Blocks per matrix row; must divide the size.
        #[arg(long, default_value_t = 1)]
        blocks: usize,

        /// Output file (stdout if omitted).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Cache shape options shared by `run` and `sweep`.
#[derive(Args, Debug)]
struct CacheArgs {
    /// Block size in bytes (`K`/`M` suffixes allowed).
    #[arg(short, long, default_value = "1K", value_parser = byte_size)]
    block_size: u64,

    /// Cache size in bytes (`K`/`M` suffixes allowed).
    #[arg(short, long, default_value = "1M", value_parser = byte_size)]
    cache_size: u64,

    /// Ways per set.
    #[arg(short, long, default_value_t = 16)]
    ways: usize,

    /// Seed for random eviction; omitted means a fresh seed per run.
    #[arg(long)]
    seed: Option<u64>,

    /// JSON cache configuration; replaces the size options above.
    #[arg(long)]
    config: Option<PathBuf>,
}

impl CacheArgs {
    fn to_config(&self) -> Result<CacheConfig, SimError> {
        let mut config = match &self.config {
            Some(path) => sim::load_config(path)?,
            None => CacheConfig::from_capacity(self.cache_size, self.block_size, self.ways)?,
        };
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        Ok(config)
    }
}

fn byte_size(text: &str) -> Result<u64, String> {
    parse_byte_size(text).map_err(|e| e.to_string())
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Run {
            trace,
            cache,
            policy,
            write_no_allocate,
            json,
            dump,
        } => cmd_run(&trace, &cache, policy, write_no_allocate, json, dump),
        Commands::Sweep {
            trace,
            cache,
            output,
            json,
        } => cmd_sweep(&trace, &cache, output.as_deref(), json),
        Commands::Study {
            cache,
            blocking_factors,
            sizes,
            out_dir,
        } => cmd_study(&cache, blocking_factors, sizes, &out_dir),
        Commands::GenTrace {
            size,
            blocks,
            output,
        } => cmd_gen_trace(size, blocks, output.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("[!] FATAL: {e}");
        process::exit(1);
    }
}

/// Replays `trace_path` through one cache and prints its report.
fn cmd_run(
    trace_path: &Path,
    args: &CacheArgs,
    policy: Option<ReplacementPolicy>,
    write_no_allocate: bool,
    json: bool,
    dump: bool,
) -> Result<(), SimError> {
    let mut config = args.to_config()?;
    if let Some(policy) = policy {
        config.policy = policy;
    }
    config.write_no_allocate |= write_no_allocate;

    let trace = Trace::open(trace_path)?;
    let mut simulator = Simulator::for_trace(&config, &trace)?;
    let _ = simulator.run(&trace)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if dump {
        writeln!(out, "{}", simulator.cache)?;
        writeln!(out)?;
    }
    let report = simulator.cache.report();
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
    } else {
        writeln!(out, "{report}")?;
    }
    Ok(())
}

/// Runs every policy over `trace_path`, printing each report and optionally
/// writing hit rates to a result file.
fn cmd_sweep(
    trace_path: &Path,
    args: &CacheArgs,
    output: Option<&Path>,
    json: bool,
) -> Result<(), SimError> {
    let config = args.to_config()?;
    let trace = Trace::open(trace_path)?;
    let results = sim::sweep(&config, &trace)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&results)?)?;
    } else {
        for result in &results {
            writeln!(out, "\n{result}")?;
        }
    }

    if let Some(path) = output {
        let rows = results.iter().map(|result| {
            let rate = result
                .report
                .hit_rate
                .map_or_else(|| "undefined".to_string(), |rate| rate.to_string());
            (result.label(), rate)
        });
        sim::write_results_csv(BufWriter::new(File::create(path)?), rows)?;
    }
    Ok(())
}

/// Runs the blocking-factor study and writes its result files to `out_dir`.
fn cmd_study(
    args: &CacheArgs,
    blocking_factors: Vec<usize>,
    matrix_sizes: Vec<usize>,
    out_dir: &Path,
) -> Result<(), SimError> {
    let config = args.to_config()?;
    let grid = BlockingStudy {
        blocking_factors,
        matrix_sizes,
        ..BlockingStudy::default()
    };
    let series = grid.run(&config)?;
    std::fs::create_dir_all(out_dir)?;
    for path in sim::write_study(out_dir, &series)? {
        println!("{}", path.display());
    }
    Ok(())
}

/// Writes a blocked matrix-multiply trace to `output`, or stdout.
fn cmd_gen_trace(size: usize, blocks: usize, output: Option<&Path>) -> Result<(), SimError> {
    let workload = MatmulTrace::new(size, blocks)?;
    match output {
        Some(path) => workload.write_to(BufWriter::new(File::create(path)?))?,
        None => workload.write_to(io::stdout().lock())?,
    }
    Ok(())
}
