use crate::cli::config::DemoConfig;
use futures::{StreamExt, stream::FuturesUnordered};
use std::sync::Arc;
use workpool::{Task, WorkerPool, pipeline::fibonacci};

/// Inputs every item of the sum scenario works on.
pub const DIGITS: [i64; 9] = [1, 2, 3, 4, 5, 6, 7, 8, 9];

pub fn sum(xs: &[i64]) -> i64 {
    xs.iter().sum()
}

/// Runs every scenario against `pool`, in order.
pub async fn run(pool: &WorkerPool, config: &DemoConfig) -> anyhow::Result<()> {
    let totals = concurrent_sum(pool, config.num_items).await?;
    println!(
        "Channels: {} concurrent sums, grand total {}",
        totals.len(),
        totals.iter().sum::<i64>()
    );

    let terms = fibonacci_terms(config.fib_count).await;
    let rendered: Vec<String> = terms.iter().map(u64::to_string).collect();
    println!("Channels: fibonacci {}", rendered.join(" "));

    Ok(())
}

/// Submits `num_items` sums of [`DIGITS`] at once and prints each result as
/// it arrives. Completion order follows the workers, not submission order.
pub async fn concurrent_sum(pool: &WorkerPool, num_items: usize) -> workpool::Result<Vec<i64>> {
    let task: Task = Arc::new(sum);

    let mut pending: FuturesUnordered<_> = (0..num_items)
        .map(|i| {
            let task = Arc::clone(&task);
            async move { (i, pool.compute(DIGITS.to_vec(), task).await) }
        })
        .collect();

    let mut totals = Vec::with_capacity(num_items);
    while let Some((i, result)) = pending.next().await {
        let total = result?;
        println!("Channels: concurrent sum #{i}: {total}");
        totals.push(total);
    }

    Ok(totals)
}

pub async fn fibonacci_terms(count: usize) -> Vec<u64> {
    let mut rx = fibonacci(count);
    let mut terms = Vec::with_capacity(count.min(94));
    while let Some(term) = rx.recv().await {
        terms.push(term);
    }
    terms
}

#[cfg(test)]
mod tests {
    use super::*;
    use workpool::PoolConfig;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn sum_scenario_yields_45_per_item() -> anyhow::Result<()> {
        let pool = WorkerPool::start(PoolConfig::new(4, 4))?;
        let totals = concurrent_sum(&pool, 4).await?;
        pool.shutdown().await?;

        assert_eq!(totals, vec![45; 4]);
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn sum_scenario_with_more_items_than_capacity() -> anyhow::Result<()> {
        let pool = WorkerPool::start(PoolConfig::new(2, 1))?;
        let totals = concurrent_sum(&pool, 25).await?;
        pool.shutdown().await?;

        assert_eq!(totals.len(), 25);
        assert!(totals.iter().all(|&t| t == 45));
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn full_run_completes() -> anyhow::Result<()> {
        let pool = WorkerPool::start(PoolConfig::new(2, 2))?;
        let config = DemoConfig {
            pool: *pool.config(),
            num_items: 3,
            fib_count: 8,
        };
        run(&pool, &config).await?;
        pool.shutdown().await?;

        let stats = pool.stats();
        assert_eq!(stats.completed, 3);
        assert_eq!(stats.in_flight(), 0);
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn fibonacci_scenario() {
        assert_eq!(fibonacci_terms(8).await, vec![0, 1, 1, 2, 3, 5, 8, 13]);
    }
}
