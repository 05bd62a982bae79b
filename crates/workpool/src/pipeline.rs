//! Channel plumbing built from Tokio's bounded MPSC channels.
//!
//! - [`tee`] fans one receiver out into `N` ordered copies.
//! - [`fibonacci`] streams the Fibonacci sequence from a channel that is
//!   teed into two copies, summed and fed back in. Each term also goes to the
//!   caller's receiver, and the generator stops once that receiver is dropped.
//!
//! Both spawn their forwarding tasks and must be called from within a Tokio
//! runtime.

use tokio::sync::mpsc;

/// Duplicates every value received on `input` into `N` bounded channels.
///
/// A background task forwards values in order, waiting on each output in
/// turn, so the slowest consumer sets the pace for all of them. Outputs whose
/// receiver was dropped are pruned. The task ends, closing every output, once
/// `input` is closed or no output is left. A `capacity` of zero is treated as
/// one.
pub fn tee<T, const N: usize>(mut input: mpsc::Receiver<T>, capacity: usize) -> [mpsc::Receiver<T>; N]
where
    T: Clone + Send + 'static,
{
    let mut outputs = Vec::with_capacity(N);
    let receivers = core::array::from_fn(|_| {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        outputs.push(tx);
        rx
    });

    tokio::spawn(async move {
        while let Some(value) = input.recv().await {
            for tx in &outputs {
                // A closed output is pruned below.
                let _ = tx.send(value.clone()).await;
            }
            outputs.retain(|tx| !tx.is_closed());
            if outputs.is_empty() {
                break;
            }
        }
    });

    receivers
}

/// Streams the first `count` Fibonacci numbers: 0, 1, 1, 2, 3, 5, ...
///
/// The sequence stops early if the next term would overflow `u64` (after 94
/// terms) or if the returned receiver is dropped.
pub fn fibonacci(count: usize) -> mpsc::Receiver<u64> {
    let (out, rx) = mpsc::channel(2);
    tokio::spawn(generate_fibonacci(count, out));
    rx
}

/// Runs the self-feeding generator behind [`fibonacci`] and returns how many
/// terms reached `out`.
async fn generate_fibonacci(count: usize, out: mpsc::Sender<u64>) -> usize {
    let (feed, looped) = mpsc::channel(2);
    let [mut lhs, mut rhs] = tee::<u64, 2>(looped, 2);

    let mut published = 0;
    for seed in [0, 1] {
        if published == count || !publish(seed, &out, &feed).await {
            return published;
        }
        published += 1;
    }

    // Shift `rhs` one term ahead of `lhs`.
    if rhs.recv().await.is_none() {
        return published;
    }

    while published < count {
        let (Some(a), Some(b)) = (lhs.recv().await, rhs.recv().await) else {
            break;
        };
        let Some(next) = a.checked_add(b) else {
            #[cfg(feature = "tracing")]
            tracing::debug!("Fibonacci sequence stopped at u64 overflow");
            break;
        };
        if !publish(next, &out, &feed).await {
            #[cfg(feature = "tracing")]
            tracing::debug!("Fibonacci consumer went away after {published} term(s)");
            break;
        }
        published += 1;
    }

    published
}

/// Hands `term` to the consumer, then feeds it back into the loop. `false`
/// once either side is closed.
async fn publish(term: u64, out: &mpsc::Sender<u64>, feed: &mpsc::Sender<u64>) -> bool {
    out.send(term).await.is_ok() && feed.send(term).await.is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::time::Duration;

    async fn collect<T>(mut rx: mpsc::Receiver<T>) -> Vec<T> {
        let mut values = Vec::new();
        while let Some(value) = rx.recv().await {
            values.push(value);
        }
        values
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn first_eight_terms() {
        assert_eq!(collect(fibonacci(8)).await, vec![0, 1, 1, 2, 3, 5, 8, 13]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn short_sequences() {
        assert!(collect(fibonacci(0)).await.is_empty());
        assert_eq!(collect(fibonacci(1)).await, vec![0]);
        assert_eq!(collect(fibonacci(2)).await, vec![0, 1]);
        assert_eq!(collect(fibonacci(3)).await, vec![0, 1, 1]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn stops_before_overflow() {
        let terms = collect(fibonacci(500)).await;
        assert_eq!(terms.len(), 94);
        assert_eq!(terms.last(), Some(&12_200_160_415_121_876_738));
        assert!(terms.windows(3).all(|w| w[0] + w[1] == w[2]));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn dropped_receiver_stops_generator() {
        let (out, mut rx) = mpsc::channel(2);
        let generator = tokio::spawn(generate_fibonacci(usize::MAX, out));

        assert_eq!(rx.recv().await, Some(0));
        assert_eq!(rx.recv().await, Some(1));
        drop(rx);

        let published = tokio::time::timeout(Duration::from_secs(5), generator)
            .await
            .expect("generator kept running after its consumer left")
            .unwrap();
        // Two terms read plus whatever fit in the buffer, nowhere near the
        // 94 terms before overflow.
        assert!(published <= 4, "published {published} terms");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn tee_copies_every_value_in_order() {
        let (tx, rx) = mpsc::channel(4);
        let [a, b, c] = tee::<u32, 3>(rx, 1);

        let producer = tokio::spawn(async move {
            for i in 0..50 {
                tx.send(i).await.unwrap();
            }
        });

        let (a, b, c) = tokio::join!(collect(a), collect(b), collect(c));
        producer.await.unwrap();

        let expected: Vec<u32> = (0..50).collect();
        assert_eq!(a, expected);
        assert_eq!(b, expected);
        assert_eq!(c, expected);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn tee_prunes_dropped_outputs() {
        let (tx, rx) = mpsc::channel(1);
        let [kept, dropped] = tee::<&str, 2>(rx, 1);
        drop(dropped);

        let producer = tokio::spawn(async move {
            for word in ["tea", "coffee", "water"] {
                tx.send(word).await.unwrap();
            }
        });

        assert_eq!(collect(kept).await, vec!["tea", "coffee", "water"]);
        producer.await.unwrap();
    }

    #[tokio::test]
    async fn tee_closes_when_every_output_is_dropped() {
        let (tx, rx) = mpsc::channel(1);
        let [only] = tee::<u8, 1>(rx, 1);
        drop(only);

        // The forwarding task exits after its first failed round, which drops
        // the input receiver.
        tx.send(1).await.unwrap();
        tx.closed().await;
    }
}
