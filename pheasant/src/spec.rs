//! Declarative event specifications.
//!
//! An [`EventSpec`] says where to find one event type (contract address and
//! topic), how to decode it (a JSON ABI fragment) and how to fill each
//! [`Field`] of a [`TransferRecord`](crate::TransferRecord). Specs are
//! validated once, when built, so a stale mapping fails at startup rather
//! than on the first matching log.

use core::fmt;
use std::collections::BTreeMap;

use alloy::json_abi::Event;
use alloy::primitives::{Address, B256};
use alloy::rpc::types::Log;

use crate::error::SpecError;
use crate::path::{ArgPath, PathError};
use crate::record::{Direction, Field};
use crate::value::ArgValue;

/// An attribute of the log envelope, as opposed to a decoded argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogAttribute {
    /// `blockNumber`.
    BlockNumber,
    /// `blockHash`.
    BlockHash,
    /// `transactionHash`.
    TransactionHash,
    /// `transactionIndex`.
    TransactionIndex,
    /// `logIndex`.
    LogIndex,
}

impl LogAttribute {
    /// JSON-RPC name of the attribute.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BlockNumber => "blockNumber",
            Self::BlockHash => "blockHash",
            Self::TransactionHash => "transactionHash",
            Self::TransactionIndex => "transactionIndex",
            Self::LogIndex => "logIndex",
        }
    }

    const fn is_number(self) -> bool {
        matches!(
            self,
            Self::BlockNumber | Self::TransactionIndex | Self::LogIndex
        )
    }

    const fn is_hash(self) -> bool {
        matches!(self, Self::BlockHash | Self::TransactionHash)
    }

    /// Read a numeric attribute. `None` if absent or not numeric.
    #[must_use]
    pub const fn number(self, log: &Log) -> Option<u64> {
        match self {
            Self::BlockNumber => log.block_number,
            Self::TransactionIndex => log.transaction_index,
            Self::LogIndex => log.log_index,
            Self::BlockHash | Self::TransactionHash => None,
        }
    }

    /// Read a hash attribute. `None` if absent or not a hash.
    #[must_use]
    pub const fn hash(self, log: &Log) -> Option<B256> {
        match self {
            Self::BlockHash => log.block_hash,
            Self::TransactionHash => log.transaction_hash,
            Self::BlockNumber | Self::TransactionIndex | Self::LogIndex => None,
        }
    }
}

impl fmt::Display for LogAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which envelope attributes feed the record's block number and tx hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LogFieldMap {
    /// Source of [`TransferRecord::block_number`](crate::TransferRecord::block_number).
    pub block_number: LogAttribute,
    /// Source of [`TransferRecord::tx_hash`](crate::TransferRecord::tx_hash).
    pub tx_hash: LogAttribute,
}

impl LogFieldMap {
    /// `blockNumber` and `transactionHash`, the mapping every family uses.
    pub const ENVELOPE: Self = Self {
        block_number: LogAttribute::BlockNumber,
        tx_hash: LogAttribute::TransactionHash,
    };
}

impl Default for LogFieldMap {
    fn default() -> Self {
        Self::ENVELOPE
    }
}

/// Where a transfer field's value comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldSource {
    /// Resolved from the decoded event arguments.
    Arg(ArgPath),
    /// A literal known from the contract's structure.
    Fixed(ArgValue),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct FieldSources {
    token: FieldSource,
    from: FieldSource,
    to: FieldSource,
    amount: FieldSource,
}

impl FieldSources {
    const fn get(&self, field: Field) -> &FieldSource {
        match field {
            Field::Token => &self.token,
            Field::From => &self.from,
            Field::To => &self.to,
            Field::Amount => &self.amount,
        }
    }
}

/// An immutable, validated description of one event-to-record mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventSpec {
    target: Address,
    signature: String,
    abi: Event,
    selector: B256,
    direction: Direction,
    log_fields: LogFieldMap,
    sources: FieldSources,
}

impl EventSpec {
    /// Start building a spec for `signature` emitted by `target`.
    ///
    /// `abi` is a JSON ABI event item. Tuple parameters must list named
    /// `components` for dotted argument paths to resolve.
    #[must_use]
    pub fn builder(
        target: Address,
        direction: Direction,
        signature: impl Into<String>,
        abi: impl Into<String>,
    ) -> EventSpecBuilder {
        EventSpecBuilder {
            target,
            direction,
            signature: signature.into(),
            abi: abi.into(),
            log_fields: LogFieldMap::ENVELOPE,
            args: Vec::new(),
            fixed: Vec::new(),
        }
    }

    /// Contract that emits the event.
    #[must_use]
    pub const fn target(&self) -> Address {
        self.target
    }

    /// Canonical event signature, e.g. `NewTrade(address,uint256,address,uint256,address)`.
    #[must_use]
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// Event name from the ABI fragment.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.abi.name
    }

    /// The parsed ABI fragment.
    #[must_use]
    pub const fn abi(&self) -> &Event {
        &self.abi
    }

    /// `keccak256(signature)`, the expected topic0.
    #[must_use]
    pub const fn selector(&self) -> B256 {
        self.selector
    }

    /// Direction assigned to every record this spec produces.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Envelope attribute mapping.
    #[must_use]
    pub const fn log_fields(&self) -> LogFieldMap {
        self.log_fields
    }

    /// Source of `field`.
    #[must_use]
    pub const fn source(&self, field: Field) -> &FieldSource {
        self.sources.get(field)
    }

    /// Fields resolved from decoded arguments, in record order.
    pub fn arg_paths(&self) -> impl Iterator<Item = (Field, &ArgPath)> {
        Field::ALL.into_iter().filter_map(|f| match self.source(f) {
            FieldSource::Arg(path) => Some((f, path)),
            FieldSource::Fixed(_) => None,
        })
    }

    /// Fields set to a literal, in record order.
    pub fn fixed_values(&self) -> impl Iterator<Item = (Field, &ArgValue)> {
        Field::ALL.into_iter().filter_map(|f| match self.source(f) {
            FieldSource::Fixed(value) => Some((f, value)),
            FieldSource::Arg(_) => None,
        })
    }
}

/// Builder for [`EventSpec`].
#[derive(Debug, Clone)]
#[must_use]
pub struct EventSpecBuilder {
    target: Address,
    direction: Direction,
    signature: String,
    abi: String,
    log_fields: LogFieldMap,
    args: Vec<(Field, String)>,
    fixed: Vec<(Field, ArgValue)>,
}

impl EventSpecBuilder {
    /// Resolve `field` from the dotted argument path `path`.
    pub fn arg(mut self, field: Field, path: impl Into<String>) -> Self {
        self.args.push((field, path.into()));
        self
    }

    /// Set `field` to a literal for every record.
    pub fn fixed(mut self, field: Field, value: impl Into<ArgValue>) -> Self {
        self.fixed.push((field, value.into()));
        self
    }

    /// Override the envelope attribute mapping.
    pub const fn log_fields(mut self, log_fields: LogFieldMap) -> Self {
        self.log_fields = log_fields;
        self
    }

    /// Validate and build the spec.
    ///
    /// # Errors
    ///
    /// Returns a [`SpecError`] if the ABI fragment does not parse or does not
    /// match the signature, the target is zero, a field is unmapped or mapped
    /// twice, a path does not exist in the ABI layout, or a source has the
    /// wrong type for its field.
    pub fn build(self) -> Result<EventSpec, SpecError> {
        let abi: Event = serde_json::from_str(&self.abi)?;
        let event = abi.name.clone();

        let canonical = abi.signature();
        if canonical != self.signature {
            return Err(SpecError::SignatureMismatch {
                declared: self.signature,
                abi: canonical,
            });
        }
        if self.target.is_zero() {
            return Err(SpecError::ZeroTarget { event });
        }
        check_log_fields(&event, self.log_fields)?;

        let mut sources = BTreeMap::new();
        for (field, text) in self.args {
            let path = ArgPath::parse(&text).map_err(|source| SpecError::Path {
                event: event.clone(),
                source,
            })?;
            let ty = abi_leaf_type(&abi, &path).map_err(|source| SpecError::Path {
                event: event.clone(),
                source,
            })?;
            if !field.accepts_abi_type(ty) {
                return Err(SpecError::IncompatibleType {
                    event,
                    field,
                    expected: field.expects(),
                    found: ty.to_owned(),
                });
            }
            if sources.insert(field, FieldSource::Arg(path)).is_some() {
                return Err(SpecError::AmbiguousField { event, field });
            }
        }
        for (field, value) in self.fixed {
            if !field.accepts(&value) {
                return Err(SpecError::IncompatibleType {
                    event,
                    field,
                    expected: field.expects(),
                    found: value.kind().to_owned(),
                });
            }
            if sources.insert(field, FieldSource::Fixed(value)).is_some() {
                return Err(SpecError::AmbiguousField { event, field });
            }
        }

        let mut take = |field: Field| {
            sources
                .remove(&field)
                .ok_or_else(|| SpecError::MissingField {
                    event: event.clone(),
                    field,
                })
        };
        let sources = FieldSources {
            token: take(Field::Token)?,
            from: take(Field::From)?,
            to: take(Field::To)?,
            amount: take(Field::Amount)?,
        };

        Ok(EventSpec {
            target: self.target,
            signature: self.signature,
            selector: abi.selector(),
            abi,
            direction: self.direction,
            log_fields: self.log_fields,
            sources,
        })
    }
}

fn check_log_fields(event: &str, map: LogFieldMap) -> Result<(), SpecError> {
    if !map.block_number.is_number() {
        return Err(SpecError::LogAttribute {
            event: event.to_owned(),
            field: "blockNumber",
            attribute: map.block_number,
        });
    }
    if !map.tx_hash.is_hash() {
        return Err(SpecError::LogAttribute {
            event: event.to_owned(),
            field: "txHash",
            attribute: map.tx_hash,
        });
    }
    Ok(())
}

/// Reference types are stored as their keccak hash when indexed.
fn is_reference_type(ty: &str) -> bool {
    ty == "string" || ty == "bytes" || ty.starts_with("tuple") || ty.ends_with(']')
}

/// Walk `path` over the ABI parameter layout and return the leaf type as it
/// will appear once decoded.
fn abi_leaf_type<'a>(abi: &'a Event, path: &ArgPath) -> Result<&'a str, PathError> {
    let not_found = |segment: &str| PathError::SegmentNotFound {
        path: path.to_string(),
        segment: segment.to_owned(),
    };
    let not_container = |segment: &str| PathError::NotAContainer {
        path: path.to_string(),
        segment: segment.to_owned(),
    };

    let Some((first, rest)) = path.segments().split_first() else {
        return Err(PathError::Malformed(path.to_string()));
    };
    let root = abi
        .inputs
        .iter()
        .find(|p| &p.name == first)
        .ok_or_else(|| not_found(first))?;

    if root.indexed && is_reference_type(&root.ty) {
        return match rest.first() {
            Some(segment) => Err(not_container(segment)),
            None => Ok("bytes32"),
        };
    }

    let mut ty = root.ty.as_str();
    let mut components = root.components.as_slice();
    for segment in rest {
        if ty != "tuple" {
            return Err(not_container(segment));
        }
        let member = components
            .iter()
            .find(|p| &p.name == segment)
            .ok_or_else(|| not_found(segment))?;
        ty = &member.ty;
        components = &member.components;
    }
    Ok(ty)
}
