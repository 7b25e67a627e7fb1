//! Raw log retrieval.
//!
//! [`LogSource`] is the seam between the normalization engine and the
//! network. [`RpcLogSource`] implements it over an alloy [`Provider`]:
//! `eth_getLogs` filtered by contract address and topic0, walking the
//! inclusive block range in fixed-size chunks. Failures and timeouts are
//! returned to the caller as-is; retrying is the caller's decision.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::{Address, B256};
use alloy::providers::Provider;
use alloy::rpc::types::{Filter, Log};
use anyhow::{Context, Result};

/// Default blocks per `eth_getLogs` request.
pub const DEFAULT_BATCH_SIZE: u64 = 2_000;

/// Per-request timeout for RPC calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Progress is logged every N batches.
const PROGRESS_INTERVAL: u64 = 50;

/// Something that can return the logs a contract emitted for one topic.
pub trait LogSource: Send + Sync {
    /// All logs emitted by `target` with topic0 `topic0` in the inclusive
    /// block range `[from, to]`, in ascending block and log-index order.
    ///
    /// An empty range (`from > to`) yields no logs.
    fn fetch_logs(
        &self,
        chain: &str,
        target: Address,
        topic0: B256,
        from: u64,
        to: u64,
    ) -> impl Future<Output = Result<Vec<Log>>> + Send;
}

impl<T: LogSource> LogSource for Arc<T> {
    fn fetch_logs(
        &self,
        chain: &str,
        target: Address,
        topic0: B256,
        from: u64,
        to: u64,
    ) -> impl Future<Output = Result<Vec<Log>>> + Send {
        (**self).fetch_logs(chain, target, topic0, from, to)
    }
}

/// [`LogSource`] backed by a JSON-RPC provider.
#[derive(Debug, Clone)]
pub struct RpcLogSource<P> {
    provider: P,
    batch_size: u64,
}

impl<P: Provider> RpcLogSource<P> {
    /// Wrap `provider`, requesting at most `batch_size` blocks per call.
    ///
    /// A zero `batch_size` is treated as one.
    pub fn new(provider: P, batch_size: u64) -> Self {
        Self {
            provider,
            batch_size: batch_size.max(1),
        }
    }

    /// Blocks per request.
    #[must_use]
    pub const fn batch_size(&self) -> u64 {
        self.batch_size
    }
}

impl<P: Provider> LogSource for RpcLogSource<P> {
    async fn fetch_logs(
        &self,
        chain: &str,
        target: Address,
        topic0: B256,
        from: u64,
        to: u64,
    ) -> Result<Vec<Log>> {
        let mut logs = Vec::new();
        let mut count = 0u64;

        for (start, end) in chunks(from, to, self.batch_size) {
            let filter = Filter::new()
                .address(target)
                .event_signature(topic0)
                .from_block(start)
                .to_block(end);

            let batch = tokio::time::timeout(REQUEST_TIMEOUT, self.provider.get_logs(&filter))
                .await
                .with_context(|| format!("eth_getLogs [{start}, {end}] timed out"))?
                .with_context(|| format!("eth_getLogs [{start}, {end}] failed"))?;
            logs.extend(batch);

            count += 1;
            if count.is_multiple_of(PROGRESS_INTERVAL) {
                tracing::info!(chain, %target, batch = count, block = end, "fetching");
            }
        }

        Ok(logs)
    }
}

/// Split the inclusive range `[from, to]` into consecutive inclusive chunks
/// of at most `size` blocks.
fn chunks(from: u64, to: u64, size: u64) -> impl Iterator<Item = (u64, u64)> {
    let size = size.max(1);
    let mut next = (from <= to).then_some(from);
    std::iter::from_fn(move || {
        let start = next?;
        let end = start.saturating_add(size - 1).min(to);
        next = (end < to).then(|| end + 1);
        Some((start, end))
    })
}

#[cfg(test)]
mod tests {
    use alloy::primitives::{LogData, address, b256};
    use alloy::providers::ProviderBuilder;
    use alloy::transports::mock::Asserter;

    use super::*;

    const TARGET: Address = address!("1111111111111111111111111111111111111111");
    const TOPIC: B256 = b256!("0x00000000000000000000000000000000000000000000000000000000000000aa");

    fn mocked(batch_size: u64) -> (Asserter, RpcLogSource<impl Provider>) {
        let asserter = Asserter::new();
        let provider = ProviderBuilder::new().connect_mocked_client(asserter.clone());
        (asserter, RpcLogSource::new(provider, batch_size))
    }

    fn log_at(block: u64) -> Log {
        Log {
            inner: alloy::primitives::Log {
                address: TARGET,
                data: LogData::new_unchecked(vec![TOPIC], Default::default()),
            },
            block_number: Some(block),
            ..Log::default()
        }
    }

    #[test]
    fn chunks_cover_range_inclusively() {
        let got: Vec<_> = chunks(100, 104, 2).collect();
        assert_eq!(got, vec![(100, 101), (102, 103), (104, 104)], "chunks");
    }

    #[test]
    fn single_block_range() {
        assert_eq!(chunks(7, 7, 2_000).collect::<Vec<_>>(), vec![(7, 7)], "single");
    }

    #[test]
    fn empty_range_yields_nothing() {
        assert_eq!(chunks(10, 9, 5).count(), 0, "empty");
    }

    #[test]
    fn range_ending_at_max_terminates() {
        let got: Vec<_> = chunks(u64::MAX - 2, u64::MAX, 2).collect();
        assert_eq!(
            got,
            vec![(u64::MAX - 2, u64::MAX - 1), (u64::MAX, u64::MAX)],
            "max"
        );
    }

    #[test]
    fn zero_batch_size_is_one() {
        let (_, source) = mocked(0);
        assert_eq!(source.batch_size(), 1, "clamped");
    }

    #[tokio::test]
    async fn one_request_per_chunk_joined_in_order() {
        let (asserter, source) = mocked(10);
        asserter.push_success(&vec![log_at(3)]);
        asserter.push_success(&vec![log_at(12), log_at(15)]);
        asserter.push_failure_msg("unexpected request");

        let logs = source.fetch_logs("base", TARGET, TOPIC, 0, 15).await.unwrap();
        assert_eq!(
            logs.iter().map(|l| l.block_number).collect::<Vec<_>>(),
            vec![Some(3), Some(12), Some(15)],
            "joined"
        );

        let err = source.fetch_logs("base", TARGET, TOPIC, 0, 0).await.unwrap_err();
        assert!(
            format!("{err:#}").contains("unexpected request"),
            "two chunks, two requests: {err:#}"
        );
    }

    #[tokio::test]
    async fn empty_range_sends_no_request() {
        let (asserter, source) = mocked(10);
        asserter.push_success(&vec![log_at(1)]);

        let logs = source.fetch_logs("base", TARGET, TOPIC, 10, 9).await.unwrap();
        assert!(logs.is_empty(), "empty");

        let logs = source.fetch_logs("base", TARGET, TOPIC, 0, 5).await.unwrap();
        assert_eq!(logs.len(), 1, "response still queued");
    }

    #[tokio::test]
    async fn rpc_failure_names_the_block_range() {
        let (asserter, source) = mocked(10);
        asserter.push_success(&Vec::<Log>::new());
        asserter.push_failure_msg("rate limited");

        let err = source.fetch_logs("base", TARGET, TOPIC, 0, 15).await.unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("eth_getLogs [10, 15] failed"), "{msg}");
        assert!(msg.contains("rate limited"), "{msg}");
    }
}
