//! Pheasant Network transfer extractor.
//!
//! Fetches bridge and swap event logs from every chain the Pheasant adapter
//! is wired to and normalizes them into [`pheasant::TransferRecord`]s.

pub mod adapter;
pub mod chains;
pub mod config;
pub mod engine;
pub mod fetcher;

pub use adapter::{ChainAdapterMap, ChainQuery, SOURCE_NAME};
pub use engine::{Normalizer, QueryError};
pub use fetcher::{LogSource, RpcLogSource};
