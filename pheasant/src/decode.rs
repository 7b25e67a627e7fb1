//! Turning one raw log into a [`TransferRecord`].

use alloy::dyn_abi::{DecodedEvent, EventExt};
use alloy::primitives::{Address, U256};
use alloy::rpc::types::Log;

use crate::error::DecodeError;
use crate::record::{Field, TransferRecord};
use crate::spec::{EventSpec, FieldSource};
use crate::value::ArgValue;

impl EventSpec {
    /// Decode `log` against this spec and build its transfer record.
    ///
    /// The log must already match [`EventSpec::target`]; its topic0 is
    /// checked against [`EventSpec::selector`] before decoding.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] if topic0 differs, the topics or data do not
    /// decode against the ABI fragment, an argument path does not resolve,
    /// a resolved value has the wrong type, or the envelope lacks the block
    /// number or transaction hash.
    pub fn decode(&self, chain: &str, log: &Log) -> Result<TransferRecord, DecodeError> {
        let topic0 = log.topics().first().copied();
        if topic0 != Some(self.selector()) {
            return Err(DecodeError::TopicMismatch {
                expected: self.selector(),
                found: topic0,
            });
        }

        let decoded = self.abi().decode_log(log.data())?;
        let args = self.arguments(decoded)?;

        let map = self.log_fields();
        let block_number = map
            .block_number
            .number(log)
            .ok_or(DecodeError::MissingLogAttribute(map.block_number))?;
        let tx_hash = map
            .tx_hash
            .hash(log)
            .ok_or(DecodeError::MissingLogAttribute(map.tx_hash))?;

        Ok(TransferRecord {
            chain: chain.to_owned(),
            direction: self.direction(),
            block_number,
            tx_hash,
            token: self.address(Field::Token, &args)?,
            from: self.address(Field::From, &args)?,
            to: self.address(Field::To, &args)?,
            amount: self.amount(&args)?,
        })
    }

    /// Name every decoded value after its ABI parameter, in declaration order.
    fn arguments(&self, decoded: DecodedEvent) -> Result<ArgValue, DecodeError> {
        let mut indexed = decoded.indexed.into_iter();
        let mut body = decoded.body.into_iter();

        self.abi()
            .inputs
            .iter()
            .map(|param| {
                let value = if param.indexed {
                    indexed.next()
                } else {
                    body.next()
                };
                value
                    .map(|v| (param.name.clone(), ArgValue::from_abi(v, &param.components)))
                    .ok_or_else(|| DecodeError::MissingArgument(param.name.clone()))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(ArgValue::Struct)
    }

    fn value<'a>(&'a self, field: Field, args: &'a ArgValue) -> Result<&'a ArgValue, DecodeError> {
        match self.source(field) {
            FieldSource::Arg(path) => Ok(path.resolve(args)?),
            FieldSource::Fixed(value) => Ok(value),
        }
    }

    fn address(&self, field: Field, args: &ArgValue) -> Result<Address, DecodeError> {
        let value = self.value(field, args)?;
        value.as_address().ok_or(DecodeError::TypeMismatch {
            field,
            expected: field.expects(),
            found: value.kind(),
        })
    }

    fn amount(&self, args: &ArgValue) -> Result<U256, DecodeError> {
        let value = self.value(Field::Amount, args)?;
        value.as_uint().ok_or(DecodeError::TypeMismatch {
            field: Field::Amount,
            expected: Field::Amount.expects(),
            found: value.kind(),
        })
    }
}

#[cfg(test)]
mod tests {
    use alloy::dyn_abi::DynSolValue;
    use alloy::primitives::{Address, B256, LogData, U256, address, b256};

    use super::*;
    use crate::record::Direction;

    const TARGET: Address = address!("fC9C6B6e0D02EaDE37aC8b6c59e7181726075696");
    const USER: Address = address!("1111111111111111111111111111111111111111");
    const TOKEN: Address = address!("2222222222222222222222222222222222222222");
    const TOOL: Address = address!("3333333333333333333333333333333333333333");
    const TX: B256 = b256!("00000000000000000000000000000000000000000000000000000000000000aa");

    const ABI: &str = r#"{
        "type": "event",
        "name": "Routed",
        "anonymous": false,
        "inputs": [
            {"name": "user", "type": "address", "indexed": true},
            {"name": "token", "type": "address", "indexed": true},
            {"name": "trade", "type": "tuple", "indexed": false, "components": [
                {"name": "toChainId", "type": "string"},
                {"name": "toolContract", "type": "address"},
                {"name": "amount", "type": "uint256"}
            ]}
        ]
    }"#;

    fn spec(to: &str) -> EventSpec {
        EventSpec::builder(
            TARGET,
            Direction::Deposit,
            "Routed(address,address,(string,address,uint256))",
            ABI,
        )
        .arg(Field::Token, "token")
        .arg(Field::From, "user")
        .arg(Field::To, to)
        .arg(Field::Amount, "trade.amount")
        .build()
        .unwrap()
    }

    fn log(spec: &EventSpec, data: Vec<u8>) -> Log {
        Log {
            inner: alloy::primitives::Log {
                address: TARGET,
                data: LogData::new_unchecked(
                    vec![spec.selector(), USER.into_word(), TOKEN.into_word()],
                    data.into(),
                ),
            },
            block_number: Some(150),
            transaction_hash: Some(TX),
            log_index: Some(3),
            ..Log::default()
        }
    }

    fn trade_data() -> Vec<u8> {
        DynSolValue::Tuple(vec![DynSolValue::Tuple(vec![
            DynSolValue::String("8453".to_owned()),
            DynSolValue::Address(TOOL),
            DynSolValue::Uint(U256::from(1_000u64), 256),
        ])])
        .abi_encode_params()
    }

    #[test]
    fn decodes_nested_tuple_members() {
        let spec = spec("trade.toolContract");
        let record = spec.decode("arbitrum", &log(&spec, trade_data())).unwrap();

        assert_eq!(
            record,
            TransferRecord {
                chain: "arbitrum".to_owned(),
                direction: Direction::Deposit,
                block_number: 150,
                tx_hash: TX,
                token: TOKEN,
                from: USER,
                to: TOOL,
                amount: U256::from(1_000u64),
            },
            "record"
        );
    }

    #[test]
    fn wrong_topic_is_rejected() {
        let spec = spec("trade.toolContract");
        let mut log = log(&spec, trade_data());
        log.inner.data = LogData::new_unchecked(vec![B256::ZERO], trade_data().into());

        let err = spec.decode("arbitrum", &log).unwrap_err();
        assert!(matches!(err, DecodeError::TopicMismatch { .. }), "{err}");
    }

    #[test]
    fn truncated_data_is_an_abi_error() {
        let spec = spec("trade.toolContract");
        let err = spec.decode("arbitrum", &log(&spec, vec![0u8; 8])).unwrap_err();
        assert!(matches!(err, DecodeError::Abi(_)), "{err}");
    }

    #[test]
    fn missing_tx_hash_is_rejected() {
        let spec = spec("trade.toolContract");
        let mut log = log(&spec, trade_data());
        log.transaction_hash = None;

        let err = spec.decode("arbitrum", &log).unwrap_err();
        assert!(
            matches!(err, DecodeError::MissingLogAttribute(crate::LogAttribute::TransactionHash)),
            "{err}"
        );
    }

    #[test]
    fn fixed_values_are_merged() {
        let spec = EventSpec::builder(
            TARGET,
            Direction::Withdraw,
            "Routed(address,address,(string,address,uint256))",
            ABI,
        )
        .arg(Field::Token, "token")
        .arg(Field::To, "user")
        .arg(Field::Amount, "trade.amount")
        .fixed(Field::From, TARGET)
        .build()
        .unwrap();

        let record = spec.decode("taiko", &log(&spec, trade_data())).unwrap();
        assert_eq!(record.from, TARGET, "fixed sender");
        assert_eq!(record.to, USER, "recipient");
        assert_eq!(record.direction, Direction::Withdraw, "direction");
    }
}
