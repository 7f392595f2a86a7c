//! `sim-env`: run one simulation environment from the command line.
//!
//! ```text
//! sim-env pendulum.xml --params params.json --num-steps 1000 --duration 5
//! ```
//!
//! Command-line flags override the matching keys of the parameter file.
//! Log verbosity follows `RUST_LOG` (default `info`).

use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use sim_env::{
    Environment, MemoryParamStore, NUM_STEPS_KEY, REAL_TIME_FACTOR_KEY, RunState, UNPAUSE_KEY,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Load an MJCF model and step it on a worker thread.
#[derive(Parser)]
#[command(name = "sim-env")]
#[command(about = "Run a single simulation environment", long_about = None)]
#[command(version)]
struct Cli {
    /// MJCF model file
    #[arg(name = "MODEL")]
    model: PathBuf,

    /// JSON parameter file (same keys as the parameter store)
    #[arg(long)]
    params: Option<PathBuf>,

    /// Halt after this many steps
    #[arg(long)]
    num_steps: Option<u64>,

    /// Start paused
    #[arg(long)]
    paused: bool,

    /// Simulated seconds per wall-clock second (0 = as fast as possible)
    #[arg(long)]
    real_time_factor: Option<f64>,

    /// Wall-clock seconds to run before shutting down
    #[arg(long)]
    duration: Option<f64>,

    /// Seconds between clock log lines
    #[arg(long, default_value_t = 1.0)]
    log_interval: f64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();
    let params = match &cli.params {
        Some(path) => MemoryParamStore::from_json_file(path)
            .with_context(|| format!("loading parameters from {}", path.display()))?,
        None => MemoryParamStore::new(),
    };
    if let Some(n) = cli.num_steps {
        params.set(NUM_STEPS_KEY, n);
    }
    if cli.paused {
        params.set(UNPAUSE_KEY, false);
    }
    if let Some(factor) = cli.real_time_factor {
        params.set(REAL_TIME_FACTOR_KEY, factor);
    }

    let deadline = cli
        .duration
        .map(Duration::try_from_secs_f64)
        .transpose()
        .context("--duration must be a non-negative number of seconds")?
        .map(|d| Instant::now() + d);
    let interval = Duration::try_from_secs_f64(cli.log_interval)
        .ok()
        .filter(|d| !d.is_zero())
        .ok_or_else(|| anyhow!("--log-interval must be a positive number of seconds"))?;

    let env = Environment::new(Arc::new(params));
    let worker = {
        let env = env.clone();
        let model = cli.model.clone();
        thread::Builder::new()
            .name("sim-env-step".into())
            .spawn(move || env.run(model))
            .context("spawning stepping thread")?
    };

    let clock = env.clock();
    loop {
        let timeout = next_wait(interval, deadline, Instant::now());
        let state = env.wait_for(|s| !s.is_active() && s.is_past_initializing(), timeout);
        if state.is_some() {
            break;
        }
        let current = env.state();
        info!(time = clock.now(), steps = clock.steps(), state = %current, "clock");
        // A halted loop only ends on shutdown.
        if current == RunState::HaltedByBudget && deadline.is_none() {
            break;
        }
        if deadline.is_some_and(|d| Instant::now() >= d) {
            break;
        }
    }

    // Already shutting down is fine.
    let _ = env.request_shutdown();
    worker
        .join()
        .map_err(|_| anyhow!("stepping thread panicked"))?
        .with_context(|| format!("running {}", cli.model.display()))?;

    info!(time = clock.now(), steps = clock.steps(), "done");
    Ok(())
}

/// Time until the next clock report, cut short by the run deadline.
fn next_wait(interval: Duration, deadline: Option<Instant>, now: Instant) -> Duration {
    deadline.map_or(interval, |d| interval.min(d.saturating_duration_since(now)))
}
