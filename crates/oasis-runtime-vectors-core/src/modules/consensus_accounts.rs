//! Consensus accounts module: moving funds between consensus and the runtime.

use ciborium::value::Value;
use serde::{Deserialize, Serialize};

use super::address_from_cbor;
use crate::address::Address;
use crate::canonical::{text_map, FromCbor, MapReader, ToCbor};
use crate::error::CoreError;
use crate::transaction::{Call, Transaction};
use crate::types::{BaseUnits, Fee};

pub const METHOD_DEPOSIT: &str = "consensus.Deposit";
pub const METHOD_WITHDRAW: &str = "consensus.Withdraw";

/// Deposit from the consensus layer into a runtime account.
///
/// `to: None` credits the signer's own runtime account and is encoded without
/// a `to` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deposit {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<Address>,
    pub amount: BaseUnits,
}

/// Withdraw from a runtime account to the consensus layer.
///
/// `to: None` credits the signer's own consensus account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Withdraw {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<Address>,
    pub amount: BaseUnits,
}

fn transfer_body_cbor(to: &Option<Address>, amount: &BaseUnits) -> Value {
    let mut entries = Vec::with_capacity(2);
    if let Some(to) = to {
        entries.push(("to", Value::Bytes(to.as_bytes().to_vec())));
    }
    entries.push(("amount", amount.to_cbor_value()));
    text_map(entries)
}

fn transfer_body_from_cbor(
    value: &Value,
    what: &'static str,
) -> Result<(Option<Address>, BaseUnits), CoreError> {
    let map = MapReader::new(value, what)?;
    map.deny_unknown(&["to", "amount"])?;
    let to = map
        .get("to")
        .map(|v| address_from_cbor(v, "to"))
        .transpose()?;
    let amount = BaseUnits::from_cbor_value(map.required("amount")?)?;
    Ok((to, amount))
}

impl ToCbor for Deposit {
    fn to_cbor_value(&self) -> Value {
        transfer_body_cbor(&self.to, &self.amount)
    }
}

impl FromCbor for Deposit {
    fn from_cbor_value(value: &Value) -> Result<Self, CoreError> {
        let (to, amount) = transfer_body_from_cbor(value, "deposit")?;
        Ok(Self { to, amount })
    }
}

impl ToCbor for Withdraw {
    fn to_cbor_value(&self) -> Value {
        transfer_body_cbor(&self.to, &self.amount)
    }
}

impl FromCbor for Withdraw {
    fn from_cbor_value(value: &Value) -> Result<Self, CoreError> {
        let (to, amount) = transfer_body_from_cbor(value, "withdraw")?;
        Ok(Self { to, amount })
    }
}

/// Build an unsigned `consensus.Deposit` transaction.
pub fn new_deposit_tx(fee: Fee, body: Deposit) -> Transaction {
    Transaction::new(fee, Call::ConsensusDeposit(body))
}

/// Build an unsigned `consensus.Withdraw` transaction.
pub fn new_withdraw_tx(fee: Fee, body: Withdraw) -> Transaction {
    Transaction::new(fee, Call::ConsensusWithdraw(body))
}
