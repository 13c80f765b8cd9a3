//! pp-sweep — runs one donation-game configuration at several worker counts.
//!
//! Every worker count gets a freshly created population from the same seed,
//! so runs differ only in parallelism.  Per-run wall-clock time goes to
//! stdout as `<threads> Threads | <ms> ms` and to `<out>/sweep.txt`; samples
//! and run summaries go to `<out>/samples.csv` and `<out>/run_summaries.csv`.
//!
//! ```text
//! pp-sweep --size 500 --interactions 1000000 --threads 1,2,4,8
//! pp-sweep --config experiment.json --regime exclusive -v
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use pp_core::{Regime, ResampleRule, SimConfig};
use pp_output::{CsvWriter, SimOutputObserver};
use pp_sim::SimBuilder;
use tracing::info;

// ── Command line ──────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "pp-sweep")]
#[command(version, about = "Donation-game population protocol: thread-count sweep", long_about = None)]
struct Cli {
    /// JSON file holding a SimConfig; flags override its fields
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of agents
    #[arg(short = 'n', long)]
    size: Option<usize>,

    /// Total pairwise interactions per run
    #[arg(short, long)]
    interactions: Option<u64>,

    /// Worker counts to sweep, comma separated
    #[arg(short, long, value_delimiter = ',', default_values_t = [1usize, 2, 4, 8, 16, 32, 64, 128])]
    threads: Vec<usize>,

    /// Master seed
    #[arg(short, long)]
    seed: Option<u64>,

    /// Rounds between samples per worker (0 disables sampling)
    #[arg(long)]
    sampling_interval: Option<u64>,

    #[arg(long, value_enum)]
    regime: Option<RegimeArg>,

    #[arg(long, value_enum)]
    resample: Option<ResampleArg>,

    /// Output directory
    #[arg(short, long, default_value = "output")]
    out: PathBuf,

    /// Print every sample line
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Copy, Clone, ValueEnum)]
enum RegimeArg {
    Exclusive,
    Atomic,
}

impl From<RegimeArg> for Regime {
    fn from(r: RegimeArg) -> Self {
        match r {
            RegimeArg::Exclusive => Regime::Exclusive,
            RegimeArg::Atomic    => Regime::Atomic,
        }
    }
}

#[derive(Copy, Clone, ValueEnum)]
enum ResampleArg {
    Accumulate,
    Replace,
}

impl From<ResampleArg> for ResampleRule {
    fn from(r: ResampleArg) -> Self {
        match r {
            ResampleArg::Accumulate => ResampleRule::Accumulate,
            ResampleArg::Replace    => ResampleRule::Replace,
        }
    }
}

// ── Configuration ─────────────────────────────────────────────────────────────

fn load_config(path: &Path) -> Result<SimConfig> {
    let file = File::open(path)
        .with_context(|| format!("opening config {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing config {}", path.display()))
}

impl Cli {
    fn base_config(&self) -> Result<SimConfig> {
        let mut cfg = match &self.config {
            Some(path) => load_config(path)?,
            None       => SimConfig::default(),
        };
        if let Some(n) = self.size {
            cfg.population_size = n;
        }
        if let Some(n) = self.interactions {
            cfg.total_interactions = n;
        }
        if let Some(s) = self.seed {
            cfg.seed = s;
        }
        if let Some(i) = self.sampling_interval {
            cfg.sampling_interval = i;
        }
        if let Some(r) = self.regime {
            cfg.regime = r.into();
        }
        if let Some(r) = self.resample {
            cfg.resample = r.into();
        }
        Ok(cfg)
    }
}

// ── Main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();
    let base = cli.base_config()?;

    println!("=== pp-sweep — donation-game population protocol ===");
    println!(
        "Agents: {}  |  Interactions: {}  |  Regime: {}  |  Seed: {}",
        base.population_size, base.total_interactions, base.regime, base.seed,
    );
    println!();

    let writer = CsvWriter::new(&cli.out)
        .with_context(|| format!("creating output in {}", cli.out.display()))?;
    let mut obs = SimOutputObserver::new(writer);
    let mut timings = String::new();

    for &threads in &cli.threads {
        let cfg = SimConfig { worker_count: threads, ..base.clone() };
        let mut sim = SimBuilder::from_config(cfg)
            .build()
            .with_context(|| format!("configuring run with {threads} threads"))?;
        let report = sim
            .run(&mut obs)
            .with_context(|| format!("run with {threads} threads"))?;

        if cli.verbose {
            for sample in &report.samples {
                println!("{}", sample.stats);
            }
        }
        let line = format!("{threads} Threads | {} ms", report.elapsed.as_millis());
        println!("{line}");
        timings.push_str(&line);
        timings.push('\n');
    }

    obs.finish().context("writing CSV output")?;
    let summary = cli.out.join("sweep.txt");
    std::fs::write(&summary, timings)
        .with_context(|| format!("writing {}", summary.display()))?;
    info!(runs = obs.runs(), out = %cli.out.display(), "sweep complete");
    Ok(())
}
