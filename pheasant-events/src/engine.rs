//! The normalization engine: specs + block range in, transfer records out.

use alloy::primitives::B256;
use pheasant::{DecodeError, EventSpec, TransferRecord};
use thiserror::Error;

use crate::fetcher::LogSource;

/// A failed range query. No partial results are returned.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QueryError {
    /// A log matched a spec's address and topic but did not decode. The spec
    /// is stale relative to the deployed contract.
    #[error("{chain}: {event} log at block {block:?} (tx {tx_hash:?}): {source}")]
    Decode {
        /// Chain identifier.
        chain: String,
        /// Event name of the spec.
        event: String,
        /// Block of the offending log, if known.
        block: Option<u64>,
        /// Transaction of the offending log, if known.
        tx_hash: Option<B256>,
        /// Underlying decode failure.
        #[source]
        source: DecodeError,
    },

    /// The log source failed (RPC error, timeout, rate limit).
    #[error("{chain}: fetching {event} logs: {source:#}")]
    Transport {
        /// Chain identifier.
        chain: String,
        /// Event name of the spec.
        event: String,
        /// Error reported by the log source.
        #[source]
        source: anyhow::Error,
    },
}

impl QueryError {
    /// Whether retrying the same query may succeed.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}

/// Fetches and normalizes logs for a list of specs.
///
/// Stateless between calls; the only state is the log source.
#[derive(Debug)]
pub struct Normalizer<S> {
    source_name: &'static str,
    source: S,
}

impl<S: LogSource> Normalizer<S> {
    /// `source_name` labels this adapter in logs only.
    pub const fn new(source_name: &'static str, source: S) -> Self {
        Self {
            source_name,
            source,
        }
    }

    /// Label passed at construction.
    #[must_use]
    pub const fn source_name(&self) -> &'static str {
        self.source_name
    }

    /// Fetch every spec's logs in `[from, to]` and normalize them.
    ///
    /// Records follow `specs` order, then fetch order within a spec.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::Transport`] if the log source fails and
    /// [`QueryError::Decode`] if any matched log does not decode.
    pub async fn fetch_and_normalize(
        &self,
        chain: &str,
        from: u64,
        to: u64,
        specs: &[EventSpec],
    ) -> Result<Vec<TransferRecord>, QueryError> {
        let mut records = Vec::new();

        for spec in specs {
            let logs = self
                .source
                .fetch_logs(chain, spec.target(), spec.selector(), from, to)
                .await
                .map_err(|source| QueryError::Transport {
                    chain: chain.to_owned(),
                    event: spec.name().to_owned(),
                    source,
                })?;

            tracing::debug!(
                source = self.source_name,
                chain,
                event = spec.name(),
                direction = %spec.direction(),
                logs = logs.len(),
                "fetched"
            );

            records.reserve(logs.len());
            for log in &logs {
                let record = spec
                    .decode(chain, log)
                    .map_err(|source| QueryError::Decode {
                        chain: chain.to_owned(),
                        event: spec.name().to_owned(),
                        block: log.block_number,
                        tx_hash: log.transaction_hash,
                        source,
                    })?;
                records.push(record);
            }
        }

        tracing::info!(
            source = self.source_name,
            chain,
            from,
            to,
            specs = specs.len(),
            records = records.len(),
            "normalized"
        );
        Ok(records)
    }
}
