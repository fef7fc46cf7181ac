//! Runtime transaction envelope.
//!
//! A [`Transaction`] is a method call plus authentication info (signer slots
//! and fee). An [`UnverifiedTransaction`] pairs the canonical encoding of a
//! transaction with one raw signature per signer slot.

use ciborium::value::Value;
use serde::{Deserialize, Serialize};

use crate::canonical::{
    as_array, as_bytes, as_text, as_u64, decode_canonical, text_map, uint, FromCbor, MapReader,
    ToCbor,
};
use crate::crypto::{Ed25519PublicKey, PublicKey, Secp256k1PublicKey};
use crate::error::{CoreError, ValidationError};
use crate::modules::{accounts, consensus_accounts, contracts, evm};
use crate::signing::SignatureContext;
use crate::types::{BaseUnits, Denomination, Fee};

/// The only transaction format version accepted.
pub const LATEST_TRANSACTION_VERSION: u16 = 1;

/// Public key a signer slot expects a signature from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignatureAddressSpec {
    #[serde(rename = "ed25519")]
    Ed25519(Ed25519PublicKey),
    #[serde(rename = "secp256k1eth")]
    Secp256k1Eth(Secp256k1PublicKey),
}

impl SignatureAddressSpec {
    pub fn public_key(&self) -> PublicKey {
        match self {
            SignatureAddressSpec::Ed25519(pk) => PublicKey::Ed25519(*pk),
            SignatureAddressSpec::Secp256k1Eth(pk) => PublicKey::Secp256k1(*pk),
        }
    }
}

impl From<PublicKey> for SignatureAddressSpec {
    fn from(pk: PublicKey) -> Self {
        match pk {
            PublicKey::Ed25519(pk) => SignatureAddressSpec::Ed25519(pk),
            PublicKey::Secp256k1(pk) => SignatureAddressSpec::Secp256k1Eth(pk),
        }
    }
}

impl ToCbor for SignatureAddressSpec {
    fn to_cbor_value(&self) -> Value {
        match self {
            SignatureAddressSpec::Ed25519(pk) => {
                text_map(vec![("ed25519", Value::Bytes(pk.as_bytes().to_vec()))])
            }
            SignatureAddressSpec::Secp256k1Eth(pk) => {
                text_map(vec![("secp256k1eth", Value::Bytes(pk.as_bytes().to_vec()))])
            }
        }
    }
}

impl FromCbor for SignatureAddressSpec {
    fn from_cbor_value(value: &Value) -> Result<Self, CoreError> {
        let map = MapReader::new(value, "signature address spec")?;
        if map.len() != 1 {
            return Err(CoreError::Decoding(
                "signature address spec: expected exactly one key".into(),
            ));
        }
        if let Some(v) = map.get("ed25519") {
            let bytes: [u8; 32] = as_bytes(v, "ed25519 public key")?
                .try_into()
                .map_err(|_| CoreError::InvalidPublicKey)?;
            return Ok(SignatureAddressSpec::Ed25519(Ed25519PublicKey(bytes)));
        }
        if let Some(v) = map.get("secp256k1eth") {
            let pk = Secp256k1PublicKey::from_sec1_bytes(as_bytes(v, "secp256k1 public key")?)?;
            return Ok(SignatureAddressSpec::Secp256k1Eth(pk));
        }
        Err(CoreError::Decoding(
            "signature address spec: unknown variant".into(),
        ))
    }
}

/// How a signer slot is authenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AddressSpec {
    #[serde(rename = "signature")]
    Signature(SignatureAddressSpec),
}

impl ToCbor for AddressSpec {
    fn to_cbor_value(&self) -> Value {
        match self {
            AddressSpec::Signature(spec) => text_map(vec![("signature", spec.to_cbor_value())]),
        }
    }
}

impl FromCbor for AddressSpec {
    fn from_cbor_value(value: &Value) -> Result<Self, CoreError> {
        let map = MapReader::new(value, "address spec")?;
        map.deny_unknown(&["signature"])?;
        let spec = SignatureAddressSpec::from_cbor_value(map.required("signature")?)?;
        Ok(AddressSpec::Signature(spec))
    }
}

/// One authentication slot: who signs and which nonce they commit to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignerInfo {
    pub address_spec: AddressSpec,
    pub nonce: u64,
}

impl ToCbor for SignerInfo {
    fn to_cbor_value(&self) -> Value {
        text_map(vec![
            ("address_spec", self.address_spec.to_cbor_value()),
            ("nonce", uint(self.nonce)),
        ])
    }
}

impl FromCbor for SignerInfo {
    fn from_cbor_value(value: &Value) -> Result<Self, CoreError> {
        let map = MapReader::new(value, "signer info")?;
        map.deny_unknown(&["address_spec", "nonce"])?;
        Ok(Self {
            address_spec: AddressSpec::from_cbor_value(map.required("address_spec")?)?,
            nonce: as_u64(map.required("nonce")?, "nonce")?,
        })
    }
}

/// Signer slots and the fee.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthInfo {
    #[serde(rename = "si")]
    pub signer_info: Vec<SignerInfo>,
    pub fee: Fee,
}

impl ToCbor for AuthInfo {
    fn to_cbor_value(&self) -> Value {
        text_map(vec![
            (
                "si",
                Value::Array(self.signer_info.iter().map(ToCbor::to_cbor_value).collect()),
            ),
            ("fee", self.fee.to_cbor_value()),
        ])
    }
}

impl FromCbor for AuthInfo {
    fn from_cbor_value(value: &Value) -> Result<Self, CoreError> {
        let map = MapReader::new(value, "auth info")?;
        map.deny_unknown(&["si", "fee"])?;
        let signer_info = as_array(map.required("si")?, "si")?
            .iter()
            .map(SignerInfo::from_cbor_value)
            .collect::<Result<_, _>>()?;
        Ok(Self {
            signer_info,
            fee: Fee::from_cbor_value(map.required("fee")?)?,
        })
    }
}

/// A method call with its typed body.
///
/// The JSON view is `{"method": ..., "body": {...}}`; the CBOR view embeds the
/// body map directly under `body`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", content = "body")]
pub enum Call {
    #[serde(rename = "consensus.Deposit")]
    ConsensusDeposit(consensus_accounts::Deposit),
    #[serde(rename = "consensus.Withdraw")]
    ConsensusWithdraw(consensus_accounts::Withdraw),
    #[serde(rename = "accounts.Transfer")]
    AccountsTransfer(accounts::Transfer),
    #[serde(rename = "contracts.Call")]
    ContractsCall(contracts::Call),
    #[serde(rename = "contracts.Instantiate")]
    ContractsInstantiate(contracts::Instantiate),
    #[serde(rename = "contracts.Upgrade")]
    ContractsUpgrade(contracts::Upgrade),
    #[serde(rename = "evm.Call")]
    EvmCall(evm::Call),
}

impl Call {
    /// The method name this call dispatches to.
    pub fn method(&self) -> &'static str {
        match self {
            Call::ConsensusDeposit(_) => consensus_accounts::METHOD_DEPOSIT,
            Call::ConsensusWithdraw(_) => consensus_accounts::METHOD_WITHDRAW,
            Call::AccountsTransfer(_) => accounts::METHOD_TRANSFER,
            Call::ContractsCall(_) => contracts::METHOD_CALL,
            Call::ContractsInstantiate(_) => contracts::METHOD_INSTANTIATE,
            Call::ContractsUpgrade(_) => contracts::METHOD_UPGRADE,
            Call::EvmCall(_) => evm::METHOD_CALL,
        }
    }

    fn body_cbor(&self) -> Value {
        match self {
            Call::ConsensusDeposit(b) => b.to_cbor_value(),
            Call::ConsensusWithdraw(b) => b.to_cbor_value(),
            Call::AccountsTransfer(b) => b.to_cbor_value(),
            Call::ContractsCall(b) => b.to_cbor_value(),
            Call::ContractsInstantiate(b) => b.to_cbor_value(),
            Call::ContractsUpgrade(b) => b.to_cbor_value(),
            Call::EvmCall(b) => b.to_cbor_value(),
        }
    }

    /// Every denomination the body carries.
    pub fn denominations(&self) -> Vec<&Denomination> {
        let tokens: &[BaseUnits] = match self {
            Call::ConsensusDeposit(b) => std::slice::from_ref(&b.amount),
            Call::ConsensusWithdraw(b) => std::slice::from_ref(&b.amount),
            Call::AccountsTransfer(b) => std::slice::from_ref(&b.amount),
            Call::ContractsCall(b) => &b.tokens,
            Call::ContractsInstantiate(b) => &b.tokens,
            Call::ContractsUpgrade(b) => &b.tokens,
            Call::EvmCall(_) => &[],
        };
        tokens.iter().map(|t| &t.denomination).collect()
    }
}

impl ToCbor for Call {
    fn to_cbor_value(&self) -> Value {
        text_map(vec![
            ("method", Value::Text(self.method().to_string())),
            ("body", self.body_cbor()),
        ])
    }
}

impl FromCbor for Call {
    fn from_cbor_value(value: &Value) -> Result<Self, CoreError> {
        let map = MapReader::new(value, "call")?;
        map.deny_unknown(&["method", "body"])?;
        let method = as_text(map.required("method")?, "method")?;
        let body = map.required("body")?;
        let call = match method {
            consensus_accounts::METHOD_DEPOSIT => {
                Call::ConsensusDeposit(consensus_accounts::Deposit::from_cbor_value(body)?)
            }
            consensus_accounts::METHOD_WITHDRAW => {
                Call::ConsensusWithdraw(consensus_accounts::Withdraw::from_cbor_value(body)?)
            }
            accounts::METHOD_TRANSFER => {
                Call::AccountsTransfer(accounts::Transfer::from_cbor_value(body)?)
            }
            contracts::METHOD_CALL => Call::ContractsCall(contracts::Call::from_cbor_value(body)?),
            contracts::METHOD_INSTANTIATE => {
                Call::ContractsInstantiate(contracts::Instantiate::from_cbor_value(body)?)
            }
            contracts::METHOD_UPGRADE => {
                Call::ContractsUpgrade(contracts::Upgrade::from_cbor_value(body)?)
            }
            evm::METHOD_CALL => Call::EvmCall(evm::Call::from_cbor_value(body)?),
            "" => {
                return Err(CoreError::MalformedTransaction("empty method".into()));
            }
            other => {
                return Err(CoreError::MalformedTransaction(format!(
                    "unknown method '{other}'"
                )))
            }
        };
        Ok(call)
    }
}

/// A runtime transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(rename = "v")]
    pub version: u16,
    pub call: Call,
    #[serde(rename = "ai")]
    pub auth_info: AuthInfo,
}

impl Transaction {
    /// A new unsigned transaction with no signer slots.
    pub fn new(fee: Fee, call: Call) -> Self {
        Self {
            version: LATEST_TRANSACTION_VERSION,
            call,
            auth_info: AuthInfo {
                signer_info: Vec::new(),
                fee,
            },
        }
    }

    /// Append a signer slot. Slot order is signature order.
    pub fn append_auth_signature(&mut self, spec: SignatureAddressSpec, nonce: u64) {
        self.auth_info.signer_info.push(SignerInfo {
            address_spec: AddressSpec::Signature(spec),
            nonce,
        });
    }

    /// Stateless sanity checks that do not need chain state.
    pub fn validate_basic(&self) -> Result<(), ValidationError> {
        if self.version != LATEST_TRANSACTION_VERSION {
            return Err(ValidationError::UnsupportedVersion(self.version));
        }
        if self.auth_info.signer_info.is_empty() {
            return Err(ValidationError::NoSigners);
        }
        let fee_denomination = &self.auth_info.fee.amount.denomination;
        for denomination in std::iter::once(fee_denomination).chain(self.call.denominations()) {
            let len = denomination.as_str().len();
            if len > Denomination::MAX_LENGTH {
                return Err(ValidationError::DenominationTooLong {
                    len,
                    max: Denomination::MAX_LENGTH,
                });
            }
        }
        Ok(())
    }
}

impl ToCbor for Transaction {
    fn to_cbor_value(&self) -> Value {
        text_map(vec![
            ("v", uint(self.version.into())),
            ("call", self.call.to_cbor_value()),
            ("ai", self.auth_info.to_cbor_value()),
        ])
    }
}

impl FromCbor for Transaction {
    fn from_cbor_value(value: &Value) -> Result<Self, CoreError> {
        let map = MapReader::new(value, "transaction")?;
        map.deny_unknown(&["v", "call", "ai"])?;
        let version = u16::try_from(as_u64(map.required("v")?, "version")?)
            .map_err(|_| CoreError::Decoding("version out of range".into()))?;
        Ok(Self {
            version,
            call: Call::from_cbor_value(map.required("call")?)?,
            auth_info: AuthInfo::from_cbor_value(map.required("ai")?)?,
        })
    }
}

/// A signature for one signer slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthProof {
    pub signature: Vec<u8>,
}

impl ToCbor for AuthProof {
    fn to_cbor_value(&self) -> Value {
        text_map(vec![("signature", Value::Bytes(self.signature.clone()))])
    }
}

impl FromCbor for AuthProof {
    fn from_cbor_value(value: &Value) -> Result<Self, CoreError> {
        let map = MapReader::new(value, "auth proof")?;
        map.deny_unknown(&["signature"])?;
        Ok(Self {
            signature: as_bytes(map.required("signature")?, "signature")?.to_vec(),
        })
    }
}

/// An encoded transaction with signatures that have not been checked yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnverifiedTransaction {
    /// Canonical CBOR of the inner [`Transaction`].
    pub body: Vec<u8>,
    /// One proof per signer slot, in slot order.
    pub auth_proofs: Vec<AuthProof>,
}

impl UnverifiedTransaction {
    /// Decode the body and check every signature against its slot.
    pub fn verify(&self, ctx: &SignatureContext) -> Result<Transaction, ValidationError> {
        let tx: Transaction = decode_canonical(&self.body)?;
        let signers = tx.auth_info.signer_info.len();
        let signatures = self.auth_proofs.len();
        if signers != signatures {
            return Err(ValidationError::SignatureCountMismatch {
                signers,
                signatures,
            });
        }

        let context = ctx.signing_context();
        for (slot, proof) in tx.auth_info.signer_info.iter().zip(&self.auth_proofs) {
            let AddressSpec::Signature(spec) = &slot.address_spec;
            spec.public_key()
                .verify(&context, &self.body, &proof.signature)?;
        }
        Ok(tx)
    }
}

impl ToCbor for UnverifiedTransaction {
    fn to_cbor_value(&self) -> Value {
        Value::Array(vec![
            Value::Bytes(self.body.clone()),
            Value::Array(self.auth_proofs.iter().map(ToCbor::to_cbor_value).collect()),
        ])
    }
}

impl FromCbor for UnverifiedTransaction {
    fn from_cbor_value(value: &Value) -> Result<Self, CoreError> {
        match as_array(value, "unverified transaction")? {
            [body, proofs] => Ok(Self {
                body: as_bytes(body, "transaction body")?.to_vec(),
                auth_proofs: as_array(proofs, "auth proofs")?
                    .iter()
                    .map(AuthProof::from_cbor_value)
                    .collect::<Result<_, _>>()?,
            }),
            _ => Err(CoreError::Decoding(
                "unverified transaction: expected 2-element array".into(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canonical::encode_canonical;
    use crate::crypto::{Ed25519Signer, Signer};
    use crate::modules::consensus_accounts::Deposit;

    fn deposit_tx() -> Transaction {
        Transaction::new(
            Fee::default(),
            Call::ConsensusDeposit(Deposit {
                to: None,
                amount: BaseUnits::new(1000u64, "ROSE"),
            }),
        )
    }

    #[test]
    fn test_unsigned_transaction_has_no_slots() {
        let tx = deposit_tx();
        assert_eq!(tx.version, LATEST_TRANSACTION_VERSION);
        assert!(tx.auth_info.signer_info.is_empty());
        assert!(matches!(tx.validate_basic(), Err(ValidationError::NoSigners)));
    }

    #[test]
    fn test_append_auth_signature_preserves_order() {
        let a = Ed25519Signer::from_seed(&[1; 32]);
        let b = Ed25519Signer::from_seed(&[2; 32]);
        let mut tx = deposit_tx();
        tx.append_auth_signature(a.public_key().into(), 7);
        tx.append_auth_signature(b.public_key().into(), 9);

        let nonces: Vec<u64> = tx.auth_info.signer_info.iter().map(|s| s.nonce).collect();
        assert_eq!(nonces, vec![7, 9]);
        tx.validate_basic().unwrap();
    }

    #[test]
    fn test_validate_basic_rejects_bad_version_and_long_denomination() {
        let signer = Ed25519Signer::from_seed(&[1; 32]);
        let mut tx = deposit_tx();
        tx.append_auth_signature(signer.public_key().into(), 0);

        let mut bad_version = tx.clone();
        bad_version.version = 2;
        assert!(matches!(
            bad_version.validate_basic(),
            Err(ValidationError::UnsupportedVersion(2))
        ));

        let mut long_denom = tx;
        long_denom.auth_info.fee.amount.denomination = Denomination("X".repeat(33));
        assert!(matches!(
            long_denom.validate_basic(),
            Err(ValidationError::DenominationTooLong { len: 33, max: 32 })
        ));
    }

    #[test]
    fn test_transaction_cbor_roundtrip() {
        let signer = Ed25519Signer::from_seed(&[3; 32]);
        let mut tx = deposit_tx();
        tx.append_auth_signature(signer.public_key().into(), u64::MAX);

        let bytes = encode_canonical(&tx).unwrap();
        // {"v": 1, ...} comes first.
        assert_eq!(&bytes[..4], &[0xa3, 0x61, b'v', 0x01]);
        let back: Transaction = decode_canonical(&bytes).unwrap();
        assert_eq!(back, tx);
        assert_eq!(encode_canonical(&back).unwrap(), bytes);
    }

    #[test]
    fn test_unknown_method_rejected() {
        let value = text_map(vec![
            ("method", Value::Text("bogus.Call".into())),
            ("body", text_map(vec![])),
        ]);
        assert!(matches!(
            Call::from_cbor_value(&value),
            Err(CoreError::MalformedTransaction(_))
        ));
    }

    #[test]
    fn test_json_view_is_adjacently_tagged() {
        let json = serde_json::to_value(deposit_tx()).unwrap();
        assert_eq!(json["v"], 1);
        assert_eq!(json["call"]["method"], "consensus.Deposit");
        assert_eq!(json["call"]["body"]["amount"]["amount"], "1000");
        assert!(json["call"]["body"].get("to").is_none());
        assert_eq!(json["ai"]["si"], serde_json::json!([]));
    }

    #[test]
    fn test_signature_count_mismatch() {
        let signer = Ed25519Signer::from_seed(&[4; 32]);
        let mut tx = deposit_tx();
        tx.append_auth_signature(signer.public_key().into(), 1);
        let unverified = UnverifiedTransaction {
            body: encode_canonical(&tx).unwrap(),
            auth_proofs: vec![],
        };
        let ctx = SignatureContext::from_raw("00");
        assert!(matches!(
            unverified.verify(&ctx),
            Err(ValidationError::SignatureCountMismatch {
                signers: 1,
                signatures: 0
            })
        ));
    }
}
