use anyhow::bail;
use clap::Parser;
use core::time::Duration;
use workpool::PoolConfig;

/// Runtime configuration for the `workpool` binary.
///
/// All values are parsed from CLI arguments or environment variables (a
/// `.env` file is loaded first when present). Defaults size the pool to the
/// machine: one worker per logical CPU and one queue slot per worker.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "workpool",
    version,
    about = "Runs concurrent work through a bounded worker pool"
)]
pub struct CliArgs {
    /// Number of worker tasks pulling from the shared queue.
    ///
    /// Environment variable: `NUM_WORKERS`
    #[arg(long, env = "NUM_WORKERS", default_value_t = num_cpus::get())]
    pub num_workers: usize,

    /// Capacity of the shared work queue. Submitters wait while it is full.
    ///
    /// Defaults to the number of workers.
    ///
    /// Environment variable: `QUEUE_CAPACITY`
    #[arg(long, env = "QUEUE_CAPACITY")]
    pub queue_capacity: Option<usize>,

    /// Number of work items submitted concurrently in the sum scenario.
    ///
    /// Defaults to the number of workers.
    ///
    /// Environment variable: `NUM_ITEMS`
    #[arg(long, env = "NUM_ITEMS")]
    pub num_items: Option<usize>,

    /// Number of Fibonacci terms streamed in the pipeline scenario.
    ///
    /// Environment variable: `FIB_COUNT`
    #[arg(long, env = "FIB_COUNT", default_value_t = 8)]
    pub fib_count: usize,

    /// Maximum number of seconds to wait for the pool to drain on shutdown.
    /// Waits indefinitely when unset.
    ///
    /// Environment variable: `DRAIN_TIMEOUT_SECS`
    #[arg(long, env = "DRAIN_TIMEOUT_SECS")]
    pub drain_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct DemoConfig {
    pub pool: PoolConfig,
    pub num_items: usize,
    pub fib_count: usize,
}

impl TryFrom<CliArgs> for DemoConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if args.num_workers == 0 {
            bail!("NUM_WORKERS must be greater than 0");
        }

        if args.queue_capacity == Some(0) {
            bail!("QUEUE_CAPACITY must be greater than 0");
        }

        let mut pool = PoolConfig::new(
            args.num_workers,
            args.queue_capacity.unwrap_or(args.num_workers),
        );
        if let Some(secs) = args.drain_timeout_secs {
            pool = pool.with_drain_timeout(Duration::from_secs(secs));
        }
        pool.validate()?;

        Ok(Self {
            pool,
            num_items: args.num_items.unwrap_or(args.num_workers),
            fib_count: args.fib_count,
        })
    }
}
