//! Deployed Pheasant Network contracts, per contract family and chain.
//!
//! The [`ChainRegistry`] is keyed by chain identifier. Each chain's entry is
//! its set of [`Capabilities`]: the contract families it participates in and
//! the address deployed for each. A chain absent from the registry, or
//! lacking a family, simply has no specs for that family.

use core::fmt;
use std::collections::BTreeMap;

use alloy::primitives::{Address, address};

/// A kind of Pheasant contract with its own event layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[non_exhaustive]
pub enum ContractFamily {
    /// Pheasant bridge: `NewTrade` deposits and `Accept` withdrawals.
    Bridge,
    /// CCTP-style bridge. Registered but not tracked by this adapter.
    Cctp,
    /// Swap router: `SwapNewTrade` deposits and `SwapWithdrawTrade` withdrawals.
    Swap,
}

impl ContractFamily {
    /// Lower-case family name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bridge => "bridge",
            Self::Cctp => "cctp",
            Self::Swap => "swap",
        }
    }
}

impl fmt::Display for ContractFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bridge contract per chain.
pub const BRIDGES: &[(&str, Address)] = &[
    ("optimism", address!("6Aca7B9a3700B19CB5909208704A4e71B30e7840")),
    ("arbitrum", address!("3B5357D73fC65487449Cd68550adB9F46A0b8068")),
    ("scroll", address!("4e44f012B66C839A9904d128B93F80Dd5e3a1b21")),
    ("base", address!("Dce25728E076ee5BCD146fD9F5FB5360ad18bCa0")),
    ("linea", address!("505cf4BB10bD1320f2F07d445bBe06A721B6CF53")),
    ("taiko", address!("04e28F7244980d3280F3b485D9cDA4b58F6C99B5")),
    ("morph", address!("bD45fC4826Fd0981F1A3d8330cf75309fBC9ce33")),
];

/// CCTP bridge contract per chain.
pub const CCTP_BRIDGES: &[(&str, Address)] = &[
    ("ethereum", address!("847885c4a883A42dbC58c9f318df3106306c2467")),
    ("optimism", address!("9dD4a939D6646028d3a35Eb45737f18Ee047D480")),
    ("arbitrum", address!("268d153690F07E46dFbfC57cB74d5fb6BF5994fA")),
    ("base", address!("A3ed5F8D0Df3C1225E084ce6879DFBFE91Ae567d")),
];

/// Swap router contract per chain.
pub const SWAP_ROUTERS: &[(&str, Address)] = &[
    ("arbitrum", address!("fC9C6B6e0D02EaDE37aC8b6c59e7181726075696")),
    ("taiko", address!("fC9C6B6e0D02EaDE37aC8b6c59e7181726075696")),
];

/// The contract families one chain participates in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Capabilities {
    entries: Vec<(ContractFamily, Address)>,
}

impl Capabilities {
    /// Address deployed for `family`, if any.
    #[must_use]
    pub fn address(&self, family: ContractFamily) -> Option<Address> {
        self.entries
            .iter()
            .find_map(|&(f, a)| (f == family).then_some(a))
    }

    /// Whether the chain participates in `family`.
    #[must_use]
    pub fn contains(&self, family: ContractFamily) -> bool {
        self.address(family).is_some()
    }

    /// Families in registration order.
    pub fn families(&self) -> impl Iterator<Item = ContractFamily> {
        self.entries.iter().map(|&(f, _)| f)
    }

    fn insert(&mut self, family: ContractFamily, address: Address) {
        match self.entries.iter_mut().find(|(f, _)| *f == family) {
            Some(entry) => entry.1 = address,
            None => self.entries.push((family, address)),
        }
    }
}

/// Per-chain capabilities for every registered contract family.
#[derive(Debug, Clone, Default)]
pub struct ChainRegistry {
    chains: BTreeMap<String, Capabilities>,
}

impl ChainRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The deployed Pheasant Network contracts.
    #[must_use]
    pub fn pheasant() -> Self {
        Self::new()
            .with_table(ContractFamily::Bridge, BRIDGES)
            .with_table(ContractFamily::Cctp, CCTP_BRIDGES)
            .with_table(ContractFamily::Swap, SWAP_ROUTERS)
    }

    /// Register every `(chain, address)` in `table` under `family`.
    #[must_use]
    pub fn with_table(mut self, family: ContractFamily, table: &[(&str, Address)]) -> Self {
        for &(chain, address) in table {
            self.register(family, chain, address);
        }
        self
    }

    /// Register one deployment, replacing any earlier address for the same
    /// chain and family.
    pub fn register(&mut self, family: ContractFamily, chain: impl Into<String>, address: Address) {
        self.chains
            .entry(chain.into())
            .or_default()
            .insert(family, address);
    }

    /// Capabilities of `chain`, or `None` if it has no registered contracts.
    #[must_use]
    pub fn capabilities(&self, chain: &str) -> Option<&Capabilities> {
        self.chains.get(chain)
    }

    /// Address of `family` on `chain`.
    #[must_use]
    pub fn address(&self, family: ContractFamily, chain: &str) -> Option<Address> {
        self.capabilities(chain)?.address(family)
    }

    /// Registered chain identifiers, sorted.
    pub fn chains(&self) -> impl Iterator<Item = &str> {
        self.chains.keys().map(String::as_str)
    }
}
