//! TradeSplit CLI: break an executed trade pool down across client orders.
//!
//! Commands:
//! - `run`: one breakdown from an input file (TOML/JSON) or two CSV files
//! - `suggest`: run both swap policies on the same seed and keep the better one
//! - `simulate`: time repeated breakdowns of a synthetic pool
//! - `batch`: run several input files concurrently from one master seed
//!
//! Results are printed as JSON on stdout; logs go to stderr
//! (`RUST_LOG` controls the level, `TRADESPLIT_PROFILE=1` adds timings).

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::json;
use std::path::{Path, PathBuf};
use tradesplit_core::{breakdown, BreakdownConfig, SwapPolicy};
use tradesplit_runner::{
    default_scenarios, profiling, run_batch, simulate, suggest, BatchJob, BreakdownInput,
    SyntheticPool,
};

#[derive(Parser)]
#[command(
    name = "tradesplit",
    about = "TradeSplit CLI: allocate executed trades across client orders"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Where orders and trades come from.
#[derive(clap::Args)]
struct InputArgs {
    /// TOML or JSON file with orders, trades and an optional [config].
    #[arg(long, conflicts_with_all = ["orders", "trades"])]
    input: Option<PathBuf>,

    /// CSV file of client orders (id,quantity).
    #[arg(long, requires = "trades")]
    orders: Option<PathBuf>,

    /// CSV file of trades (id,quantity,price).
    #[arg(long, requires = "orders")]
    trades: Option<PathBuf>,
}

/// Overrides applied on top of the input file's config.
#[derive(clap::Args)]
struct ConfigArgs {
    /// TOML file with breakdown settings.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Swap policy.
    #[arg(long, value_enum)]
    policy: Option<PolicyArg>,

    /// RNG seed; omit for an entropy-seeded run (the drawn seed is reported).
    #[arg(long)]
    seed: Option<u64>,

    /// Minimum lot size.
    #[arg(long)]
    lot: Option<u64>,
}

#[derive(Clone, Copy, ValueEnum)]
enum PolicyArg {
    Fast,
    Random,
}

impl From<PolicyArg> for SwapPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Fast => SwapPolicy::FastSwap,
            PolicyArg::Random => SwapPolicy::RandomSwap,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single breakdown.
    Run {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        config: ConfigArgs,

        /// Write the JSON result here instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Run both swap policies with the same seed and keep the lower slippage.
    Suggest {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        config: ConfigArgs,
    },
    /// Time repeated breakdowns of a synthetic pool.
    Simulate {
        /// Number of synthetic trades.
        #[arg(long, default_value_t = 1000)]
        trades: usize,

        /// Number of clients sharing the pool.
        #[arg(long, default_value_t = 10)]
        clients: u64,

        /// Runs per scenario.
        #[arg(long, default_value_t = 5)]
        repetitions: usize,

        /// Seed for both the pool and the runs.
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
    /// Run several input files concurrently.
    Batch {
        /// TOML or JSON input files.
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Master seed; each job derives its own seed from it.
        #[arg(long, default_value_t = 0)]
        seed: u64,

        /// TOML file with breakdown settings for jobs without their own.
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    init_tracing();
    profiling::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            input,
            config,
            output,
        } => run_cmd(&input, &config, output.as_deref()),
        Commands::Suggest { input, config } => suggest_cmd(&input, &config),
        Commands::Simulate {
            trades,
            clients,
            repetitions,
            seed,
        } => simulate_cmd(trades, clients, repetitions, seed),
        Commands::Batch {
            inputs,
            seed,
            config,
        } => batch_cmd(&inputs, seed, config.as_deref()),
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn load_input(args: &InputArgs) -> Result<BreakdownInput> {
    match (&args.input, &args.orders, &args.trades) {
        (Some(path), _, _) => BreakdownInput::from_file(path)
            .with_context(|| format!("loading input {}", path.display())),
        (None, Some(orders), Some(trades)) => BreakdownInput::from_csv(orders, trades)
            .context("loading CSV orders and trades"),
        _ => bail!("one of --input or --orders/--trades is required"),
    }
}

/// File config (or the input's own, or defaults) with CLI overrides on top.
fn resolve_config(input: &BreakdownInput, args: &ConfigArgs) -> Result<BreakdownConfig> {
    let mut config = match &args.config {
        Some(path) => BreakdownConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => input.config_or(&BreakdownConfig::default()),
    };
    if let Some(policy) = args.policy {
        config = config.with_policy(policy.into());
    }
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    if let Some(lot) = args.lot {
        config = config.with_lot_size(lot);
    }
    Ok(config)
}

fn run_cmd(input_args: &InputArgs, config_args: &ConfigArgs, output: Option<&Path>) -> Result<()> {
    let input = load_input(input_args)?;
    let config = resolve_config(&input, config_args)?;
    let orders = input.order_map()?;
    let trades = input.trade_map()?;

    let (result, _) = profiling::profile("breakdown", || breakdown(&orders, &trades, &config));
    let result = result?;

    let rendered = serde_json::to_string_pretty(&result)?;
    match output {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("writing {}", path.display()))?;
            tracing::info!(path = %path.display(), "result saved");
        }
        None => println!("{rendered}"),
    }
    Ok(())
}

fn suggest_cmd(input_args: &InputArgs, config_args: &ConfigArgs) -> Result<()> {
    let input = load_input(input_args)?;
    let config = resolve_config(&input, config_args)?;
    let orders = input.order_map()?;
    let trades = input.trade_map()?;

    let suggestion = suggest(&orders, &trades, &config)?;
    println!("{}", serde_json::to_string_pretty(&suggestion)?);
    Ok(())
}

fn simulate_cmd(trades: usize, clients: u64, repetitions: usize, seed: u64) -> Result<()> {
    if clients == 0 {
        bail!("--clients must be at least 1");
    }
    let input = SyntheticPool {
        trades,
        clients,
        seed,
    }
    .generate();
    let orders = input.order_map()?;
    let trade_map = input.trade_map()?;

    let reports = simulate(&orders, &trade_map, &default_scenarios(seed), repetitions)?;
    println!("{}", serde_json::to_string_pretty(&reports)?);
    Ok(())
}

fn batch_cmd(inputs: &[PathBuf], seed: u64, config_path: Option<&Path>) -> Result<()> {
    let base = match config_path {
        Some(path) => BreakdownConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => BreakdownConfig::default(),
    };

    let jobs = inputs
        .iter()
        .map(|path| {
            let input = BreakdownInput::from_file(path)
                .with_context(|| format!("loading input {}", path.display()))?;
            Ok(BatchJob::new(path.display().to_string(), input))
        })
        .collect::<Result<Vec<_>>>()?;

    let outcomes = run_batch(&jobs, &base, seed);
    let mut failed = 0usize;
    let rendered: Vec<serde_json::Value> = outcomes
        .iter()
        .map(|outcome| match &outcome.result {
            Ok(result) => json!({
                "job": outcome.name,
                "seed": outcome.seed,
                "result": result,
            }),
            Err(err) => {
                failed += 1;
                tracing::warn!(job = %outcome.name, error = %err, "batch job failed");
                json!({
                    "job": outcome.name,
                    "seed": outcome.seed,
                    "error": err.to_string(),
                })
            }
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&rendered)?);
    if failed > 0 {
        bail!("{failed} of {} jobs failed", outcomes.len());
    }
    Ok(())
}
