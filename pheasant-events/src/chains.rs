//! Static configuration for the chains the adapter is wired to.
//!
//! Pairs each chain identifier with its EIP-155 chain ID and a default
//! public RPC. Contract addresses live in [`pheasant::ChainRegistry`].

/// Operational metadata for one supported chain.
#[derive(Debug, Clone, Copy)]
pub struct ChainConfig {
    /// Chain identifier used across the adapter (e.g. `"arbitrum"`).
    pub name: &'static str,
    /// EIP-155 chain ID.
    pub chain_id: u64,
    /// Suggested public RPC endpoint.
    pub default_rpc: &'static str,
}

/// Every chain the adapter map is built for (single source of truth).
pub const ALL: &[ChainConfig] = &[
    ChainConfig {
        name: "optimism",
        chain_id: 10,
        default_rpc: "https://mainnet.optimism.io",
    },
    ChainConfig {
        name: "arbitrum",
        chain_id: 42161,
        default_rpc: "https://arb1.arbitrum.io/rpc",
    },
    ChainConfig {
        name: "scroll",
        chain_id: 534_352,
        default_rpc: "https://rpc.scroll.io",
    },
    ChainConfig {
        name: "base",
        chain_id: 8453,
        default_rpc: "https://mainnet.base.org",
    },
    ChainConfig {
        name: "linea",
        chain_id: 59144,
        default_rpc: "https://rpc.linea.build",
    },
    ChainConfig {
        name: "taiko",
        chain_id: 167_000,
        default_rpc: "https://rpc.mainnet.taiko.xyz",
    },
    ChainConfig {
        name: "morph",
        chain_id: 2818,
        default_rpc: "https://rpc-quicknode.morphl2.io",
    },
];

/// Identifiers of every supported chain, in [`ALL`] order.
pub fn names() -> impl Iterator<Item = &'static str> {
    ALL.iter().map(|c| c.name)
}

/// Look up a [`ChainConfig`] by identifier.
#[must_use]
pub fn by_name(name: &str) -> Option<&'static ChainConfig> {
    ALL.iter().find(|c| c.name == name)
}
