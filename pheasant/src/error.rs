//! Error types for event specification and log decoding.
//!
//! [`SpecError`] is a configuration error and surfaces when specs are built
//! at startup. [`DecodeError`] surfaces per query, when a log that matched a
//! spec's address and topic cannot be turned into a record.

use alloy::primitives::B256;
use thiserror::Error;

use crate::path::PathError;
use crate::record::Field;
use crate::spec::LogAttribute;

/// An event specification that cannot be constructed.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SpecError {
    /// The ABI fragment is not a valid JSON ABI event item.
    #[error("invalid ABI fragment: {0}")]
    Abi(#[from] serde_json::Error),

    /// The declared event signature disagrees with the ABI fragment.
    #[error("declared signature `{declared}` does not match ABI fragment `{abi}`")]
    SignatureMismatch {
        /// Signature passed to the builder.
        declared: String,
        /// Canonical signature derived from the ABI fragment.
        abi: String,
    },

    /// The target contract address is the zero address.
    #[error("{event}: target address is zero")]
    ZeroTarget {
        /// Event name.
        event: String,
    },

    /// A transfer field has neither an argument path nor a fixed value.
    #[error("{event}: field `{field}` has no source")]
    MissingField {
        /// Event name.
        event: String,
        /// Unmapped field.
        field: Field,
    },

    /// A transfer field is mapped more than once.
    #[error("{event}: field `{field}` is mapped more than once")]
    AmbiguousField {
        /// Event name.
        event: String,
        /// Duplicated field.
        field: Field,
    },

    /// An argument path is malformed or does not exist in the ABI layout.
    #[error("{event}: {source}")]
    Path {
        /// Event name.
        event: String,
        /// Underlying path error.
        #[source]
        source: PathError,
    },

    /// A field source produces a value the field cannot hold.
    #[error("{event}: field `{field}` expects {expected}, got `{found}`")]
    IncompatibleType {
        /// Event name.
        event: String,
        /// Target field.
        field: Field,
        /// Expected value kind.
        expected: &'static str,
        /// ABI type or literal kind found.
        found: String,
    },

    /// A log field is mapped to an envelope attribute of the wrong kind.
    #[error("{event}: log field `{field}` cannot be read from `{attribute}`")]
    LogAttribute {
        /// Event name.
        event: String,
        /// Log field name.
        field: &'static str,
        /// Mapped envelope attribute.
        attribute: LogAttribute,
    },
}

/// A matched log that cannot be normalized into a record.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DecodeError {
    /// The log's first topic is not the spec's event selector.
    #[error("topic0 {found:?} does not match event selector {expected}")]
    TopicMismatch {
        /// Selector of the spec's ABI fragment.
        expected: B256,
        /// First topic of the log, if any.
        found: Option<B256>,
    },

    /// ABI decoding of topics or data failed.
    #[error("ABI decode failed: {0}")]
    Abi(#[from] alloy::dyn_abi::Error),

    /// The decoder returned fewer values than the ABI declares.
    #[error("decoded event is missing argument `{0}`")]
    MissingArgument(String),

    /// An argument path does not resolve against the decoded arguments.
    #[error(transparent)]
    Path(#[from] PathError),

    /// A resolved value is not of the kind the field needs.
    #[error("field `{field}` expects {expected}, decoded {found}")]
    TypeMismatch {
        /// Target field.
        field: Field,
        /// Expected value kind.
        expected: &'static str,
        /// Decoded value kind.
        found: &'static str,
    },

    /// The log envelope lacks an attribute the record needs.
    #[error("log is missing `{0}`")]
    MissingLogAttribute(LogAttribute),
}
