//! Module call bodies and per-module transaction constructors.
//!
//! Each submodule owns its method name constants, body types (with both CBOR
//! and JSON views) and `new_*_tx` constructors taking a fee and a body.

pub mod accounts;
pub mod consensus_accounts;
pub mod contracts;
pub mod evm;

use ciborium::value::Value;

use crate::address::Address;
use crate::canonical::{as_array, as_bytes, FromCbor, MapReader};
use crate::error::CoreError;
use crate::types::BaseUnits;

fn address_from_cbor(value: &Value, what: &str) -> Result<Address, CoreError> {
    Address::from_bytes(as_bytes(value, what)?)
}

fn optional_bytes(map: &MapReader<'_>, key: &str) -> Result<Vec<u8>, CoreError> {
    match map.get(key) {
        Some(v) => Ok(as_bytes(v, key)?.to_vec()),
        None => Ok(Vec::new()),
    }
}

fn optional_tokens(map: &MapReader<'_>, key: &str) -> Result<Vec<BaseUnits>, CoreError> {
    match map.get(key) {
        Some(v) => as_array(v, key)?
            .iter()
            .map(BaseUnits::from_cbor_value)
            .collect(),
        None => Ok(Vec::new()),
    }
}
