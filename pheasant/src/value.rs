//! Decoded event arguments as a named tree.
//!
//! [`DynSolValue`] tuples are positional; pairing each value with the ABI
//! parameter that produced it keeps tuple member names, so argument paths
//! like `trade.toolContract` can be resolved.

use alloy::dyn_abi::DynSolValue;
use alloy::json_abi::Param;
use alloy::primitives::{Address, B256, Bytes, I256, U256};

/// A decoded ABI value with struct members addressable by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgValue {
    /// `address`.
    Address(Address),
    /// `uintN`.
    Uint(U256),
    /// `intN`.
    Int(I256),
    /// `bool`.
    Bool(bool),
    /// `bytesN`, left-aligned in a word, with its byte length.
    FixedBytes(B256, usize),
    /// `bytes` or any value without a dedicated variant.
    Bytes(Bytes),
    /// `string`.
    String(String),
    /// `T[]` or `T[N]`.
    Array(Vec<Self>),
    /// `tuple`, with members in declaration order.
    Struct(Vec<(String, Self)>),
}

impl ArgValue {
    /// Convert a decoded value, naming tuple members after `components`.
    ///
    /// Tuples whose arity does not match `components` fall back to
    /// positional names (`"0"`, `"1"`, ...).
    #[must_use]
    pub fn from_abi(value: DynSolValue, components: &[Param]) -> Self {
        match value {
            DynSolValue::Tuple(values) if values.len() == components.len() => Self::Struct(
                components
                    .iter()
                    .zip(values)
                    .map(|(param, v)| (param.name.clone(), Self::from_abi(v, &param.components)))
                    .collect(),
            ),
            DynSolValue::Tuple(values) => Self::Struct(
                values
                    .into_iter()
                    .enumerate()
                    .map(|(i, v)| (i.to_string(), Self::from_abi(v, &[])))
                    .collect(),
            ),
            DynSolValue::Array(values) | DynSolValue::FixedArray(values) => Self::Array(
                values
                    .into_iter()
                    .map(|v| Self::from_abi(v, components))
                    .collect(),
            ),
            DynSolValue::Address(a) => Self::Address(a),
            DynSolValue::Uint(u, _) => Self::Uint(u),
            DynSolValue::Int(i, _) => Self::Int(i),
            DynSolValue::Bool(b) => Self::Bool(b),
            DynSolValue::FixedBytes(word, size) => Self::FixedBytes(word, size),
            DynSolValue::Bytes(b) => Self::Bytes(b.into()),
            DynSolValue::String(s) => Self::String(s),
            DynSolValue::Function(f) => Self::Bytes(Bytes::copy_from_slice(f.as_slice())),
        }
    }

    /// Short name of the value kind, for error messages.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Address(_) => "address",
            Self::Uint(_) => "uint",
            Self::Int(_) => "int",
            Self::Bool(_) => "bool",
            Self::FixedBytes(..) => "fixed bytes",
            Self::Bytes(_) => "bytes",
            Self::String(_) => "string",
            Self::Array(_) => "array",
            Self::Struct(_) => "struct",
        }
    }

    /// Look up a struct member by name.
    ///
    /// Returns `None` for missing members and for non-struct values.
    #[must_use]
    pub fn member(&self, name: &str) -> Option<&Self> {
        match self {
            Self::Struct(members) => members.iter().find(|(n, _)| n == name).map(|(_, v)| v),
            _ => None,
        }
    }

    /// The address, if this is an [`ArgValue::Address`].
    #[must_use]
    pub const fn as_address(&self) -> Option<Address> {
        match self {
            Self::Address(a) => Some(*a),
            _ => None,
        }
    }

    /// The integer, if this is an [`ArgValue::Uint`].
    #[must_use]
    pub const fn as_uint(&self) -> Option<U256> {
        match self {
            Self::Uint(u) => Some(*u),
            _ => None,
        }
    }
}

impl From<Address> for ArgValue {
    fn from(value: Address) -> Self {
        Self::Address(value)
    }
}

impl From<U256> for ArgValue {
    fn from(value: U256) -> Self {
        Self::Uint(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param(name: &str, ty: &str, components: Vec<Param>) -> Param {
        Param {
            ty: ty.to_owned(),
            name: name.to_owned(),
            components,
            internal_type: None,
        }
    }

    #[test]
    fn tuple_members_take_abi_names() {
        let components = vec![
            param("toolContract", "address", vec![]),
            param("amount", "uint256", vec![]),
        ];
        let value = DynSolValue::Tuple(vec![
            DynSolValue::Address(Address::repeat_byte(0xab)),
            DynSolValue::Uint(U256::from(7u64), 256),
        ]);

        let tree = ArgValue::from_abi(value, &components);

        assert_eq!(
            tree.member("toolContract"),
            Some(&ArgValue::Address(Address::repeat_byte(0xab))),
            "named member"
        );
        assert_eq!(tree.member("amount").and_then(ArgValue::as_uint), Some(U256::from(7u64)), "amount");
    }

    #[test]
    fn arity_mismatch_uses_positional_names() {
        let value = DynSolValue::Tuple(vec![DynSolValue::Bool(true), DynSolValue::Bool(false)]);

        let tree = ArgValue::from_abi(value, &[param("only", "bool", vec![])]);

        assert_eq!(tree.member("1"), Some(&ArgValue::Bool(false)), "positional");
        assert!(tree.member("only").is_none(), "no abi name");
    }

    #[test]
    fn arrays_of_tuples_keep_member_names() {
        let components = vec![param("to", "address", vec![])];
        let value = DynSolValue::Array(vec![DynSolValue::Tuple(vec![DynSolValue::Address(
            Address::ZERO,
        )])]);

        let ArgValue::Array(items) = ArgValue::from_abi(value, &components) else {
            panic!("expected array");
        };
        assert_eq!(items[0].member("to"), Some(&ArgValue::Address(Address::ZERO)), "member");
    }
}
