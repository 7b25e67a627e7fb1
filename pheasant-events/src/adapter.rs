//! The chain adapter map: one range-query function per supported chain.
//!
//! Specs are composed once, when the map is built, and shared read-only by
//! every query afterwards. A chain that is not in the map cannot be queried.

use std::collections::BTreeMap;
use std::sync::Arc;

use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use anyhow::{Context, Result};
use pheasant::{Composer, EventSpec, TransferRecord};

use crate::chains;
use crate::config::Config;
use crate::engine::{Normalizer, QueryError};
use crate::fetcher::{LogSource, RpcLogSource};

/// Label identifying this adapter to the normalization engine.
pub const SOURCE_NAME: &str = "pheasant-network";

/// A chain's pre-composed specs bound to its normalizer.
#[derive(Debug)]
pub struct ChainQuery<S> {
    chain: Arc<str>,
    specs: Arc<[EventSpec]>,
    normalizer: Arc<Normalizer<S>>,
}

impl<S> Clone for ChainQuery<S> {
    fn clone(&self) -> Self {
        Self {
            chain: Arc::clone(&self.chain),
            specs: Arc::clone(&self.specs),
            normalizer: Arc::clone(&self.normalizer),
        }
    }
}

impl<S: LogSource> ChainQuery<S> {
    /// Bind `specs` for `chain` to `normalizer`.
    pub fn new(chain: &str, specs: Vec<EventSpec>, normalizer: Arc<Normalizer<S>>) -> Self {
        Self {
            chain: chain.into(),
            specs: specs.into(),
            normalizer,
        }
    }

    /// Chain identifier.
    #[must_use]
    pub fn chain(&self) -> &str {
        &self.chain
    }

    /// The composed specs, in query order.
    #[must_use]
    pub fn specs(&self) -> &[EventSpec] {
        &self.specs
    }

    /// Transfer records for blocks `[from, to]`.
    ///
    /// # Errors
    ///
    /// Propagates the engine's [`QueryError`] unchanged.
    pub async fn query(&self, from: u64, to: u64) -> Result<Vec<TransferRecord>, QueryError> {
        self.normalizer
            .fetch_and_normalize(&self.chain, from, to, &self.specs)
            .await
    }
}

/// Range-query functions keyed by chain identifier.
#[derive(Debug)]
pub struct ChainAdapterMap<S> {
    queries: BTreeMap<String, ChainQuery<S>>,
}

impl<S: LogSource> ChainAdapterMap<S> {
    /// Compose specs for each of `chains` and bind each chain to the log
    /// source returned by `source_for`.
    ///
    /// # Errors
    ///
    /// Returns an error if a spec fails validation or `source_for` fails.
    pub fn build<'a>(
        composer: &Composer,
        chains: impl IntoIterator<Item = &'a str>,
        mut source_for: impl FnMut(&str) -> Result<S>,
    ) -> Result<Self> {
        let mut queries = BTreeMap::new();
        for chain in chains {
            let specs = composer
                .compose(chain)
                .with_context(|| format!("composing specs for {chain}"))?;
            let source = source_for(chain).with_context(|| format!("log source for {chain}"))?;

            tracing::debug!(chain, specs = specs.len(), "composed");
            let normalizer = Arc::new(Normalizer::new(SOURCE_NAME, source));
            queries.insert(chain.to_owned(), ChainQuery::new(chain, specs, normalizer));
        }
        Ok(Self { queries })
    }

    /// The query function for `chain`, if it is supported.
    #[must_use]
    pub fn get(&self, chain: &str) -> Option<&ChainQuery<S>> {
        self.queries.get(chain)
    }

    /// Supported chain identifiers, sorted.
    pub fn chains(&self) -> impl Iterator<Item = &str> {
        self.queries.keys().map(String::as_str)
    }

    /// All query functions, sorted by chain identifier.
    pub fn iter(&self) -> impl Iterator<Item = &ChainQuery<S>> {
        self.queries.values()
    }

    /// Number of supported chains.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queries.len()
    }

    /// Whether no chain is supported.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }
}

impl ChainAdapterMap<RpcLogSource<DynProvider>> {
    /// The Pheasant adapter over every chain in [`chains::ALL`], using the
    /// RPC endpoints from `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if a spec fails validation or an RPC URL is invalid.
    pub fn connect(config: &Config) -> Result<Self> {
        Self::build(&Composer::pheasant(), chains::names(), |chain| {
            let default_rpc = chains::by_name(chain).map_or("", |c| c.default_rpc);
            let rpc_url = config.rpc_for(chain, default_rpc);
            let provider = ProviderBuilder::new()
                .connect_http(
                    rpc_url
                        .parse()
                        .with_context(|| format!("invalid RPC URL: {rpc_url}"))?,
                )
                .erased();
            Ok(RpcLogSource::new(provider, config.batch_size()))
        })
    }
}
