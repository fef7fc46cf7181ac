//! EVM module: calls into EVM contracts.

use ciborium::value::Value;
use serde::{Deserialize, Serialize};

use crate::canonical::{as_bytes, text_map, FromCbor, MapReader, ToCbor};
use crate::error::CoreError;
use crate::transaction::{Call as TxCall, Transaction};
use crate::types::{Fee, Quantity};

pub const METHOD_CALL: &str = "evm.Call";

/// Call an EVM contract.
///
/// All three fields are always encoded, `data` as an empty byte string when
/// there is no calldata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Call {
    /// 20-byte contract address (H160).
    #[serde(with = "crate::json::base64_array")]
    pub address: [u8; 20],
    /// Big-endian 256-bit value (U256).
    #[serde(with = "crate::json::base64_array")]
    pub value: [u8; 32],
    #[serde(with = "crate::json::base64_bytes")]
    pub data: Vec<u8>,
}

/// Widen a quantity to a big-endian U256.
pub fn u256_from_quantity(q: Quantity) -> [u8; 32] {
    let mut out = [0u8; 32];
    out[16..].copy_from_slice(&q.0.to_be_bytes());
    out
}

fn fixed<const N: usize>(value: &Value, what: &str) -> Result<[u8; N], CoreError> {
    let bytes = as_bytes(value, what)?;
    bytes.try_into().map_err(|_| {
        CoreError::Decoding(format!("{what}: expected {N} bytes, got {}", bytes.len()))
    })
}

impl ToCbor for Call {
    fn to_cbor_value(&self) -> Value {
        text_map(vec![
            ("address", Value::Bytes(self.address.to_vec())),
            ("value", Value::Bytes(self.value.to_vec())),
            ("data", Value::Bytes(self.data.clone())),
        ])
    }
}

impl FromCbor for Call {
    fn from_cbor_value(value: &Value) -> Result<Self, CoreError> {
        let map = MapReader::new(value, "evm call")?;
        map.deny_unknown(&["address", "value", "data"])?;
        Ok(Self {
            address: fixed(map.required("address")?, "address")?,
            value: fixed(map.required("value")?, "value")?,
            data: as_bytes(map.required("data")?, "data")?.to_vec(),
        })
    }
}

/// Build an unsigned `evm.Call` transaction.
pub fn new_call_tx(fee: Fee, body: Call) -> Transaction {
    Transaction::new(fee, TxCall::EvmCall(body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canonical::{decode_canonical, encode_canonical};

    #[test]
    fn test_u256_widening() {
        let v = u256_from_quantity(Quantity(1000));
        assert_eq!(&v[..30], &[0u8; 30]);
        assert_eq!(&v[30..], &[0x03, 0xe8]);
    }

    #[test]
    fn test_evm_call_encodes_all_fields() {
        let body = Call {
            address: [0x90; 20],
            value: u256_from_quantity(Quantity(0)),
            data: vec![],
        };
        let bytes = encode_canonical(&body).unwrap();
        // data (empty bstr) sorts first: 0x64 "data" 0x40
        assert_eq!(&bytes[..7], &[0xa3, 0x64, b'd', b'a', b't', b'a', 0x40]);
        let back: Call = decode_canonical(&bytes).unwrap();
        assert_eq!(back, body);
        assert_eq!(new_call_tx(Fee::default(), back).call.method(), METHOD_CALL);
    }

    #[test]
    fn test_short_address_rejected() {
        let value = text_map(vec![
            ("address", Value::Bytes(vec![0; 19])),
            ("value", Value::Bytes(vec![0; 32])),
            ("data", Value::Bytes(vec![])),
        ]);
        assert!(Call::from_cbor_value(&value).is_err());
    }
}
