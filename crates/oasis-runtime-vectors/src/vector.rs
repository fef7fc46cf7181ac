//! The test vector record and its assembly.

use std::collections::BTreeMap;

use oasis_runtime_vectors_core::json::base64_bytes;
use oasis_runtime_vectors_core::testing::TestKey;
use oasis_runtime_vectors_core::{
    encode_canonical, AddressSpec, AuthProof, SignatureAddressSpec, SignatureContext, Transaction,
    TransactionSigner, UnverifiedTransaction,
};
use serde::{Deserialize, Serialize};

use crate::cases::KIND_PREFIX;
use crate::error::{GeneratorError, Result};

/// Free-form details a wallet checks against the signed payload.
pub type TxDetails = BTreeMap<String, String>;

/// One signature of a signed transaction, with the slot it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureRecord {
    pub address_spec: SignatureAddressSpec,
    #[serde(with = "base64_bytes")]
    pub signature: Vec<u8>,
}

/// JSON view of an [`UnverifiedTransaction`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedTxRecord {
    #[serde(with = "base64_bytes")]
    pub untrusted_raw_value: Vec<u8>,
    pub signatures: Vec<SignatureRecord>,
}

impl SignedTxRecord {
    /// Pair each proof of `ut` with the slot of `tx` it signs.
    pub fn new(tx: &Transaction, ut: &UnverifiedTransaction) -> Result<Self> {
        if tx.auth_info.signer_info.len() != ut.auth_proofs.len() {
            return Err(GeneratorError::Validation(
                oasis_runtime_vectors_core::ValidationError::SignatureCountMismatch {
                    signers: tx.auth_info.signer_info.len(),
                    signatures: ut.auth_proofs.len(),
                },
            ));
        }
        let signatures = tx
            .auth_info
            .signer_info
            .iter()
            .zip(&ut.auth_proofs)
            .map(|(slot, proof)| {
                let AddressSpec::Signature(spec) = slot.address_spec;
                SignatureRecord {
                    address_spec: spec,
                    signature: proof.signature.clone(),
                }
            })
            .collect();
        Ok(Self {
            untrusted_raw_value: ut.body.clone(),
            signatures,
        })
    }

    /// Back to the CBOR-level envelope.
    pub fn to_unverified(&self) -> UnverifiedTransaction {
        UnverifiedTransaction {
            body: self.untrusted_raw_value.clone(),
            auth_proofs: self
                .signatures
                .iter()
                .map(|s| AuthProof {
                    signature: s.signature.clone(),
                })
                .collect(),
        }
    }
}

/// A runtime transaction test vector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeTestVector {
    pub kind: String,
    pub signature_context: String,
    /// Compact JSON of the unsigned transaction, for human inspection.
    pub tx: String,
    pub tx_details: Option<TxDetails>,
    pub signed_tx: SignedTxRecord,
    #[serde(with = "base64_bytes")]
    pub encoded_tx: Vec<u8>,
    #[serde(with = "base64_bytes")]
    pub encoded_signed_tx: Vec<u8>,
    /// Whether static validation of the details against the payload passes.
    pub valid: bool,
    pub signer_algorithm: String,
    #[serde(with = "base64_bytes")]
    pub signer_private_key: Vec<u8>,
    #[serde(with = "base64_bytes")]
    pub signer_public_key: Vec<u8>,
}

/// Everything signing produced for one transaction.
pub(crate) struct SignedParts {
    pub tx: Transaction,
    pub unverified: UnverifiedTransaction,
    pub encoded_signed_tx: Vec<u8>,
}

/// Append `key`'s slot, sign, then verify and validate the result.
pub(crate) fn sign_and_check(
    mut tx: Transaction,
    key: &TestKey,
    nonce: u64,
    sig_ctx: &SignatureContext,
) -> Result<SignedParts> {
    tx.append_auth_signature(key.sigspec, nonce);

    let mut signer = TransactionSigner::new(tx)?;
    signer.append_sign(sig_ctx, &key.signer)?;
    let tx = signer.transaction().clone();
    let unverified = signer.unverified_transaction()?;

    let verified = unverified.verify(sig_ctx)?;
    verified.validate_basic()?;

    let encoded_signed_tx = encode_canonical(&unverified)?;
    Ok(SignedParts {
        tx,
        unverified,
        encoded_signed_tx,
    })
}

/// Sign `tx` as `key` and pack everything a consumer needs into a vector.
///
/// Signing, post-sign verification and basic validation failures are all
/// errors; they mean the tables or the primitives are broken.
pub fn make_runtime_test_vector(
    kind: &str,
    tx: Transaction,
    tx_details: Option<TxDetails>,
    valid: bool,
    key: &TestKey,
    nonce: u64,
    sig_ctx: &SignatureContext,
) -> Result<RuntimeTestVector> {
    let parts = sign_and_check(tx, key, nonce, sig_ctx)?;

    Ok(RuntimeTestVector {
        kind: format!("{KIND_PREFIX}{kind}"),
        signature_context: sig_ctx.to_string(),
        tx: serde_json::to_string(&parts.tx)?,
        tx_details,
        signed_tx: SignedTxRecord::new(&parts.tx, &parts.unverified)?,
        encoded_tx: parts.unverified.body,
        encoded_signed_tx: parts.encoded_signed_tx,
        valid,
        signer_algorithm: key.algorithm().to_string(),
        signer_private_key: key.unsafe_bytes.clone(),
        signer_public_key: key.public_key_bytes(),
    })
}
