//! Event layouts of each tracked contract family.
//!
//! Every family contributes a deposit-leg and a withdraw-leg builder. Adding
//! a family means adding its builders here and its addresses to the
//! [`ChainRegistry`](crate::ChainRegistry); existing builders are untouched.

use alloy::primitives::Address;

use crate::error::SpecError;
use crate::record::{Direction, Field};
use crate::registry::ContractFamily;
use crate::spec::EventSpec;

/// Builds one spec for a contract deployed at the given address.
pub type SpecFn = fn(Address) -> Result<EventSpec, SpecError>;

/// Deposit and withdraw builders for one contract family.
#[derive(Debug, Clone, Copy)]
pub struct FamilyBuilders {
    /// Family these builders describe.
    pub family: ContractFamily,
    /// Builds the deposit-leg spec.
    pub deposit: SpecFn,
    /// Builds the withdraw-leg spec.
    pub withdraw: SpecFn,
}

impl FamilyBuilders {
    /// Build both legs, deposit first.
    ///
    /// # Errors
    ///
    /// Returns the first [`SpecError`] raised by either builder.
    pub fn build(&self, address: Address) -> Result<[EventSpec; 2], SpecError> {
        Ok([(self.deposit)(address)?, (self.withdraw)(address)?])
    }
}

/// Pheasant bridge.
pub const BRIDGE: FamilyBuilders = FamilyBuilders {
    family: ContractFamily::Bridge,
    deposit: bridge_deposit,
    withdraw: bridge_withdraw,
};

/// Pheasant swap router.
pub const SWAP: FamilyBuilders = FamilyBuilders {
    family: ContractFamily::Swap,
    deposit: swap_deposit,
    withdraw: swap_withdraw,
};

/// Families tracked by the Pheasant adapter, in composition order.
pub const TRACKED: &[FamilyBuilders] = &[BRIDGE, SWAP];

const NEW_TRADE_ABI: &str = r#"{
    "type": "event",
    "name": "NewTrade",
    "anonymous": false,
    "inputs": [
        {"name": "userAddress", "type": "address", "indexed": true},
        {"name": "index", "type": "uint256", "indexed": false},
        {"name": "to", "type": "address", "indexed": false},
        {"name": "amount", "type": "uint256", "indexed": false},
        {"name": "token", "type": "address", "indexed": false}
    ]
}"#;

const ACCEPT_ABI: &str = r#"{
    "type": "event",
    "name": "Accept",
    "anonymous": false,
    "inputs": [
        {"name": "userAddress", "type": "address", "indexed": true},
        {"name": "txHash", "type": "bytes32", "indexed": true},
        {"name": "index", "type": "uint256", "indexed": false},
        {"name": "to", "type": "address", "indexed": false},
        {"name": "amount", "type": "uint256", "indexed": false},
        {"name": "token", "type": "address", "indexed": false}
    ]
}"#;

const SWAP_NEW_TRADE_ABI: &str = r#"{
    "type": "event",
    "name": "SwapNewTrade",
    "anonymous": false,
    "inputs": [
        {"name": "userAddress", "type": "address", "indexed": true},
        {"name": "token", "type": "address", "indexed": true},
        {"name": "trade", "type": "tuple", "indexed": false, "components": [
            {"name": "toChainId", "type": "string"},
            {"name": "swapToolIndex", "type": "uint16"},
            {"name": "toolContract", "type": "address"},
            {"name": "toToken", "type": "address"},
            {"name": "amount", "type": "uint256"},
            {"name": "relayerFee", "type": "uint256"},
            {"name": "timestamp", "type": "uint256"}
        ]}
    ]
}"#;

const SWAP_WITHDRAW_TRADE_ABI: &str = r#"{
    "type": "event",
    "name": "SwapWithdrawTrade",
    "anonymous": false,
    "inputs": [
        {"name": "userAddress", "type": "address", "indexed": true},
        {"name": "token", "type": "address", "indexed": true},
        {"name": "tradeHash", "type": "bytes32", "indexed": false},
        {"name": "amount", "type": "uint256", "indexed": false},
        {"name": "data", "type": "bytes", "indexed": false}
    ]
}"#;

/// `NewTrade` on the bridge: a user locks funds for relay.
///
/// # Errors
///
/// Returns a [`SpecError`] if `bridge` is the zero address.
pub fn bridge_deposit(bridge: Address) -> Result<EventSpec, SpecError> {
    EventSpec::builder(
        bridge,
        Direction::Deposit,
        "NewTrade(address,uint256,address,uint256,address)",
        NEW_TRADE_ABI,
    )
    .arg(Field::Token, "token")
    .arg(Field::From, "userAddress")
    .arg(Field::To, "to")
    .arg(Field::Amount, "amount")
    .build()
}

/// `Accept` on the bridge: a relayer's payout is accepted.
///
/// The signature includes the indexed `bytes32 txHash` declared by the ABI,
/// so its topic hash differs from the legacy Pheasant adapter's
/// `Accept(address,uint256,address,uint256,address)` topic.
///
/// # Errors
///
/// Returns a [`SpecError`] if `bridge` is the zero address.
pub fn bridge_withdraw(bridge: Address) -> Result<EventSpec, SpecError> {
    EventSpec::builder(
        bridge,
        Direction::Withdraw,
        "Accept(address,bytes32,uint256,address,uint256,address)",
        ACCEPT_ABI,
    )
    .arg(Field::Token, "token")
    .arg(Field::From, "userAddress")
    .arg(Field::To, "to")
    .arg(Field::Amount, "amount")
    .build()
}

/// `SwapNewTrade` on the router: recipient and amount live in the `trade`
/// struct.
///
/// # Errors
///
/// Returns a [`SpecError`] if `router` is the zero address.
pub fn swap_deposit(router: Address) -> Result<EventSpec, SpecError> {
    EventSpec::builder(
        router,
        Direction::Deposit,
        "SwapNewTrade(address,address,(string,uint16,address,address,uint256,uint256,uint256))",
        SWAP_NEW_TRADE_ABI,
    )
    .arg(Field::Token, "token")
    .arg(Field::From, "userAddress")
    .arg(Field::To, "trade.toolContract")
    .arg(Field::Amount, "trade.amount")
    .build()
}

/// `SwapWithdrawTrade` on the router.
///
/// The event carries no sender argument. The router itself pays out, so
/// `from` is fixed to the router address; if the contract ever emits a real
/// sender this mapping has to change with it.
///
/// # Errors
///
/// Returns a [`SpecError`] if `router` is the zero address.
pub fn swap_withdraw(router: Address) -> Result<EventSpec, SpecError> {
    EventSpec::builder(
        router,
        Direction::Withdraw,
        "SwapWithdrawTrade(address,address,bytes32,uint256,bytes)",
        SWAP_WITHDRAW_TRADE_ABI,
    )
    .arg(Field::Token, "token")
    .arg(Field::To, "userAddress")
    .arg(Field::Amount, "amount")
    .fixed(Field::From, router)
    .build()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use alloy::primitives::{address, keccak256};

    use super::*;
    use crate::value::ArgValue;

    const ROUTER: Address = address!("fC9C6B6e0D02EaDE37aC8b6c59e7181726075696");

    fn all_specs() -> Vec<EventSpec> {
        TRACKED
            .iter()
            .flat_map(|family| family.build(ROUTER).unwrap())
            .collect()
    }

    #[test]
    fn every_spec_covers_each_field_exactly_once() {
        for spec in all_specs() {
            let mapped: BTreeSet<Field> = spec.arg_paths().map(|(f, _)| f).collect();
            let fixed: BTreeSet<Field> = spec.fixed_values().map(|(f, _)| f).collect();

            assert!(mapped.is_disjoint(&fixed), "{} disjoint", spec.name());
            let union: BTreeSet<Field> = mapped.union(&fixed).copied().collect();
            assert_eq!(union, Field::ALL.into_iter().collect(), "{} covers all", spec.name());
        }
    }

    #[test]
    fn selectors_hash_the_signature() {
        for spec in all_specs() {
            assert_eq!(spec.selector(), keccak256(spec.signature()), "{}", spec.name());
            assert_eq!(spec.target(), ROUTER, "{} target", spec.name());
        }
    }

    #[test]
    fn accept_topic_includes_the_indexed_tx_hash() {
        let spec = bridge_withdraw(ROUTER).unwrap();
        assert_eq!(
            spec.selector(),
            keccak256("Accept(address,bytes32,uint256,address,uint256,address)"),
            "abi topic"
        );
        assert_ne!(
            spec.selector(),
            keccak256("Accept(address,uint256,address,uint256,address)"),
            "legacy topic"
        );
    }

    #[test]
    fn directions_alternate_deposit_withdraw() {
        let directions: Vec<Direction> = all_specs().iter().map(EventSpec::direction).collect();
        assert_eq!(
            directions,
            vec![
                Direction::Deposit,
                Direction::Withdraw,
                Direction::Deposit,
                Direction::Withdraw
            ],
            "directions"
        );
    }

    #[test]
    fn swap_withdraw_sender_is_the_router() {
        let spec = swap_withdraw(ROUTER).unwrap();
        let fixed: Vec<_> = spec.fixed_values().collect();
        assert_eq!(fixed, vec![(Field::From, &ArgValue::Address(ROUTER))], "fixed sender");
    }

    #[test]
    fn swap_deposit_reads_the_trade_struct() {
        let spec = swap_deposit(ROUTER).unwrap();
        let paths: Vec<String> = spec.arg_paths().map(|(_, p)| p.to_string()).collect();
        assert_eq!(
            paths,
            vec!["token", "userAddress", "trade.toolContract", "trade.amount"],
            "paths"
        );
    }

    #[test]
    fn zero_address_is_a_configuration_error() {
        assert!(
            matches!(BRIDGE.build(Address::ZERO), Err(SpecError::ZeroTarget { .. })),
            "zero target"
        );
    }
}
