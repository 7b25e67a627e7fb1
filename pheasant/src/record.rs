//! Canonical transfer record produced for every matched bridge or swap log.
//!
//! A [`TransferRecord`] is chain-tagged and direction-tagged so records from
//! different chains and legs can be reconciled against each other.

use core::fmt;

use alloy::primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};

use crate::value::ArgValue;

/// Whether a transfer enters or leaves the bridging system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Funds entering the bridge on the source chain.
    Deposit,
    /// Funds leaving the bridge on the destination chain.
    Withdraw,
}

impl Direction {
    /// Lower-case label used in logs and serialized records.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Deposit => "deposit",
            Self::Withdraw => "withdraw",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A logical transfer field that every event specification must populate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    /// The token being moved.
    Token,
    /// The sending account.
    From,
    /// The receiving account.
    To,
    /// The transferred amount in token base units.
    Amount,
}

impl Field {
    /// Every field, in record order.
    pub const ALL: [Self; 4] = [Self::Token, Self::From, Self::To, Self::Amount];

    /// Field name as it appears on a [`TransferRecord`].
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Token => "token",
            Self::From => "from",
            Self::To => "to",
            Self::Amount => "amount",
        }
    }

    /// Human-readable description of the value kind this field holds.
    #[must_use]
    pub const fn expects(self) -> &'static str {
        match self {
            Self::Token | Self::From | Self::To => "address",
            Self::Amount => "unsigned integer",
        }
    }

    /// Whether an ABI parameter type string can populate this field.
    #[must_use]
    pub fn accepts_abi_type(self, ty: &str) -> bool {
        match self {
            Self::Token | Self::From | Self::To => ty == "address",
            Self::Amount => ty.starts_with("uint") && !ty.contains('['),
        }
    }

    /// Whether a literal value can populate this field.
    #[must_use]
    pub const fn accepts(self, value: &ArgValue) -> bool {
        match self {
            Self::Token | Self::From | Self::To => matches!(value, ArgValue::Address(_)),
            Self::Amount => matches!(value, ArgValue::Uint(_)),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One normalized transfer, produced per decoded log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRecord {
    /// Chain identifier the log was read from (e.g. `"arbitrum"`).
    pub chain: String,
    /// Leg of the transfer, fixed by the event specification.
    pub direction: Direction,
    /// Block containing the log.
    pub block_number: u64,
    /// Transaction that emitted the log.
    pub tx_hash: B256,
    /// Token contract address.
    pub token: Address,
    /// Sender.
    pub from: Address,
    /// Recipient.
    pub to: Address,
    /// Amount in token base units.
    pub amount: U256,
}
