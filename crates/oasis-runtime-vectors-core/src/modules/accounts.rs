//! Accounts module: native transfers inside a runtime.

use ciborium::value::Value;
use serde::{Deserialize, Serialize};

use super::address_from_cbor;
use crate::address::Address;
use crate::canonical::{text_map, FromCbor, MapReader, ToCbor};
use crate::error::CoreError;
use crate::transaction::{Call, Transaction};
use crate::types::{BaseUnits, Fee};

pub const METHOD_TRANSFER: &str = "accounts.Transfer";

/// Transfer between two runtime accounts. The destination is required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub to: Address,
    pub amount: BaseUnits,
}

impl ToCbor for Transfer {
    fn to_cbor_value(&self) -> Value {
        text_map(vec![
            ("to", Value::Bytes(self.to.as_bytes().to_vec())),
            ("amount", self.amount.to_cbor_value()),
        ])
    }
}

impl FromCbor for Transfer {
    fn from_cbor_value(value: &Value) -> Result<Self, CoreError> {
        let map = MapReader::new(value, "transfer")?;
        map.deny_unknown(&["to", "amount"])?;
        Ok(Self {
            to: address_from_cbor(map.required("to")?, "to")?,
            amount: BaseUnits::from_cbor_value(map.required("amount")?)?,
        })
    }
}

/// Build an unsigned `accounts.Transfer` transaction.
pub fn new_transfer_tx(fee: Fee, body: Transfer) -> Transaction {
    Transaction::new(fee, Call::AccountsTransfer(body))
}
