//! Contracts module: WASM smart contract calls, instantiation and upgrades.

use ciborium::value::Value;
use serde::{Deserialize, Serialize};

use super::{address_from_cbor, optional_bytes, optional_tokens};
use crate::address::Address;
use crate::canonical::{as_u64, text_map, uint, FromCbor, MapReader, ToCbor};
use crate::error::CoreError;
use crate::transaction::{Call as TxCall, Transaction};
use crate::types::{BaseUnits, Fee};

pub const METHOD_CALL: &str = "contracts.Call";
pub const METHOD_INSTANTIATE: &str = "contracts.Instantiate";
pub const METHOD_UPGRADE: &str = "contracts.Upgrade";

/// Identifier of a deployed contract instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstanceId(pub u64);

/// Identifier of uploaded contract code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CodeId(pub u64);

/// Who may upgrade a contract instance.
///
/// Encoded as a map with at most one key; the unspecified policy is `{}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PolicyRepr", into = "PolicyRepr")]
pub enum Policy {
    #[default]
    Unspecified,
    Nobody,
    Address(Address),
    Everyone,
}

#[derive(Default, Serialize, Deserialize)]
struct Empty {}

#[derive(Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct PolicyRepr {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    nobody: Option<Empty>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    address: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    everyone: Option<Empty>,
}

impl From<Policy> for PolicyRepr {
    fn from(policy: Policy) -> Self {
        let mut repr = PolicyRepr::default();
        match policy {
            Policy::Unspecified => {}
            Policy::Nobody => repr.nobody = Some(Empty {}),
            Policy::Address(a) => repr.address = Some(a),
            Policy::Everyone => repr.everyone = Some(Empty {}),
        }
        repr
    }
}

impl TryFrom<PolicyRepr> for Policy {
    type Error = String;

    fn try_from(repr: PolicyRepr) -> Result<Self, Self::Error> {
        match (repr.nobody, repr.address, repr.everyone) {
            (None, None, None) => Ok(Policy::Unspecified),
            (Some(_), None, None) => Ok(Policy::Nobody),
            (None, Some(a), None) => Ok(Policy::Address(a)),
            (None, None, Some(_)) => Ok(Policy::Everyone),
            _ => Err("upgrades policy: more than one variant set".into()),
        }
    }
}

impl ToCbor for Policy {
    fn to_cbor_value(&self) -> Value {
        match self {
            Policy::Unspecified => text_map(vec![]),
            Policy::Nobody => text_map(vec![("nobody", text_map(vec![]))]),
            Policy::Address(a) => text_map(vec![("address", Value::Bytes(a.as_bytes().to_vec()))]),
            Policy::Everyone => text_map(vec![("everyone", text_map(vec![]))]),
        }
    }
}

impl FromCbor for Policy {
    fn from_cbor_value(value: &Value) -> Result<Self, CoreError> {
        let map = MapReader::new(value, "upgrades policy")?;
        map.deny_unknown(&["nobody", "address", "everyone"])?;
        match map.len() {
            0 => Ok(Policy::Unspecified),
            1 => {
                if let Some(a) = map.get("address") {
                    Ok(Policy::Address(address_from_cbor(a, "policy address")?))
                } else if map.get("nobody").is_some() {
                    Ok(Policy::Nobody)
                } else {
                    Ok(Policy::Everyone)
                }
            }
            _ => Err(CoreError::Decoding(
                "upgrades policy: more than one variant set".into(),
            )),
        }
    }
}

/// Call a method on a contract instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Call {
    pub id: InstanceId,
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        with = "crate::json::base64_bytes"
    )]
    pub data: Vec<u8>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tokens: Vec<BaseUnits>,
}

/// Create a new contract instance from uploaded code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instantiate {
    pub code_id: CodeId,
    pub upgrades_policy: Policy,
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        with = "crate::json::base64_bytes"
    )]
    pub data: Vec<u8>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tokens: Vec<BaseUnits>,
}

/// Upgrade a contract instance to new code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Upgrade {
    pub id: InstanceId,
    pub code_id: CodeId,
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        with = "crate::json::base64_bytes"
    )]
    pub data: Vec<u8>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tokens: Vec<BaseUnits>,
}

/// Push the optional `data` and `tokens` entries, omitting them when empty.
fn push_payload<'a>(entries: &mut Vec<(&'a str, Value)>, data: &[u8], tokens: &[BaseUnits]) {
    if !data.is_empty() {
        entries.push(("data", Value::Bytes(data.to_vec())));
    }
    if !tokens.is_empty() {
        entries.push((
            "tokens",
            Value::Array(tokens.iter().map(ToCbor::to_cbor_value).collect()),
        ));
    }
}

impl ToCbor for Call {
    fn to_cbor_value(&self) -> Value {
        let mut entries = vec![("id", uint(self.id.0))];
        push_payload(&mut entries, &self.data, &self.tokens);
        text_map(entries)
    }
}

impl FromCbor for Call {
    fn from_cbor_value(value: &Value) -> Result<Self, CoreError> {
        let map = MapReader::new(value, "contracts call")?;
        map.deny_unknown(&["id", "data", "tokens"])?;
        Ok(Self {
            id: InstanceId(as_u64(map.required("id")?, "id")?),
            data: optional_bytes(&map, "data")?,
            tokens: optional_tokens(&map, "tokens")?,
        })
    }
}

impl ToCbor for Instantiate {
    fn to_cbor_value(&self) -> Value {
        let mut entries = vec![
            ("code_id", uint(self.code_id.0)),
            ("upgrades_policy", self.upgrades_policy.to_cbor_value()),
        ];
        push_payload(&mut entries, &self.data, &self.tokens);
        text_map(entries)
    }
}

impl FromCbor for Instantiate {
    fn from_cbor_value(value: &Value) -> Result<Self, CoreError> {
        let map = MapReader::new(value, "contracts instantiate")?;
        map.deny_unknown(&["code_id", "upgrades_policy", "data", "tokens"])?;
        Ok(Self {
            code_id: CodeId(as_u64(map.required("code_id")?, "code_id")?),
            upgrades_policy: Policy::from_cbor_value(map.required("upgrades_policy")?)?,
            data: optional_bytes(&map, "data")?,
            tokens: optional_tokens(&map, "tokens")?,
        })
    }
}

impl ToCbor for Upgrade {
    fn to_cbor_value(&self) -> Value {
        let mut entries = vec![("id", uint(self.id.0)), ("code_id", uint(self.code_id.0))];
        push_payload(&mut entries, &self.data, &self.tokens);
        text_map(entries)
    }
}

impl FromCbor for Upgrade {
    fn from_cbor_value(value: &Value) -> Result<Self, CoreError> {
        let map = MapReader::new(value, "contracts upgrade")?;
        map.deny_unknown(&["id", "code_id", "data", "tokens"])?;
        Ok(Self {
            id: InstanceId(as_u64(map.required("id")?, "id")?),
            code_id: CodeId(as_u64(map.required("code_id")?, "code_id")?),
            data: optional_bytes(&map, "data")?,
            tokens: optional_tokens(&map, "tokens")?,
        })
    }
}

/// Build an unsigned `contracts.Call` transaction.
pub fn new_call_tx(fee: Fee, body: Call) -> Transaction {
    Transaction::new(fee, TxCall::ContractsCall(body))
}

/// Build an unsigned `contracts.Instantiate` transaction.
pub fn new_instantiate_tx(fee: Fee, body: Instantiate) -> Transaction {
    Transaction::new(fee, TxCall::ContractsInstantiate(body))
}

/// Build an unsigned `contracts.Upgrade` transaction.
pub fn new_upgrade_tx(fee: Fee, body: Upgrade) -> Transaction {
    Transaction::new(fee, TxCall::ContractsUpgrade(body))
}
