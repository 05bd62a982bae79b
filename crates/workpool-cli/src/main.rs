#![doc = include_str!("../README.md")]

mod cli;

use clap::Parser;
use cli::config::{CliArgs, DemoConfig};
use cli::telemetry::init_telemetry;
use tokio::signal;
use workpool::WorkerPool;

// Using mimalloc for better performance under contention, especially in musl
// environments.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = DemoConfig::try_from(args)?;

    init_telemetry()?;
    log_startup_info(&config);

    let pool = WorkerPool::start(config.pool)?;

    let outcome = tokio::select! {
        res = cli::demo::run(&pool, &config) => res,
        () = shutdown_signal() => {
            tracing::info!("Shutdown signal received, draining pool...");
            Ok(())
        }
    };

    // Drain even when a scenario failed so accepted items still finish.
    pool.shutdown().await?;

    let stats = pool.stats();
    tracing::info!(
        "Processed {} item(s): {} completed, {} failed",
        stats.submitted,
        stats.completed,
        stats.failed
    );

    outcome
}

fn log_startup_info(config: &DemoConfig) {
    if cfg!(debug_assertions) {
        tracing::info!("Starting workpool with full config: {:#?}", config);
    } else {
        tracing::info!(
            "Starting workpool with {} workers",
            config.pool.num_workers
        );
    }
}

async fn shutdown_signal() {
    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C signal");
        },
        () = terminate => {
            tracing::info!("Received SIGTERM signal");
        },
    }
}
