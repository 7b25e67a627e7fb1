//! Runtime configuration loaded from `config.toml`.
//!
//! Provides per-chain RPC endpoint overrides and the `eth_getLogs` block
//! chunk size. When no config file is present the built-in defaults from
//! [`crate::chains::ChainConfig::default_rpc`] are used.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::fetcher::DEFAULT_BATCH_SIZE;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Blocks per `eth_getLogs` request. Defaults to
    /// [`DEFAULT_BATCH_SIZE`].
    #[serde(default)]
    pub batch_size: Option<u64>,
    /// Per-chain RPC overrides, keyed by chain identifier.
    #[serde(default)]
    pub chains: HashMap<String, ChainRpc>,
}

/// RPC endpoint for a single chain.
#[derive(Debug, Clone, Deserialize)]
pub struct ChainRpc {
    /// RPC URL.
    pub rpc: String,
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// Returns [`Config::default`] if the file does not exist,
    /// allowing the binary to work without any config.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text =
            std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("parsing {}", path.display()))
    }

    /// Parse configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid configuration.
    pub fn parse(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        if config.batch_size == Some(0) {
            anyhow::bail!("batch_size must be positive");
        }
        Ok(config)
    }

    /// Return the RPC URL for a chain, falling back to the built-in default
    /// if the config has no entry for this chain.
    #[must_use]
    pub fn rpc_for<'a>(&'a self, chain: &str, default_rpc: &'a str) -> &'a str {
        self.chains
            .get(chain)
            .map_or(default_rpc, |c| c.rpc.as_str())
    }

    /// Effective block chunk size.
    #[must_use]
    pub fn batch_size(&self) -> u64 {
        self.batch_size.unwrap_or(DEFAULT_BATCH_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.batch_size(), DEFAULT_BATCH_SIZE, "batch size");
        assert_eq!(config.rpc_for("base", "https://default"), "https://default", "rpc");
    }

    #[test]
    fn overrides_are_applied() {
        let config = Config::parse(
            r#"
            batch_size = 500

            [chains.arbitrum]
            rpc = "https://arb.example.com"
            "#,
        )
        .unwrap();

        assert_eq!(config.batch_size(), 500, "batch size");
        assert_eq!(
            config.rpc_for("arbitrum", "https://default"),
            "https://arb.example.com",
            "override"
        );
        assert_eq!(config.rpc_for("taiko", "https://default"), "https://default", "fallback");
    }

    #[test]
    fn zero_batch_size_is_rejected() {
        assert!(Config::parse("batch_size = 0").is_err(), "zero");
    }

    #[test]
    fn missing_file_is_default() {
        let config = Config::load(Path::new("/nonexistent/pheasant/config.toml")).unwrap();
        assert!(config.chains.is_empty(), "no chains");
    }
}
