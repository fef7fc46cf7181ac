//! Transaction signing pipeline.
//!
//! The signature context binds a signature to one runtime on one network:
//!
//! ```text
//! signature_context = hex(SHA-512/256(runtime_id || chain_context))
//! signing_context   = "oasis-runtime-sdk/tx: v0" || " for chain " || signature_context
//! signed digest     = SHA-512/256(signing_context || encoded_tx)
//! ```

use std::fmt;

use crate::canonical::encode_canonical;
use crate::crypto::{Sha512_256Hash, Signer};
use crate::error::CoreError;
use crate::transaction::{AddressSpec, AuthProof, Transaction, UnverifiedTransaction};
use crate::types::Namespace;

/// Base domain separation context for runtime transactions.
pub const TX_SIGNATURE_CONTEXT_BASE: &[u8] = b"oasis-runtime-sdk/tx: v0";

const CHAIN_SEPARATOR: &[u8] = b" for chain ";

/// Per-runtime signature context, kept in its hex text form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SignatureContext(String);

impl SignatureContext {
    /// Derive the context for `runtime_id` on the network identified by the
    /// hex `chain_context`.
    pub fn derive(runtime_id: &Namespace, chain_context: &str) -> Self {
        let hash =
            Sha512_256Hash::digest_bytes_list(&[runtime_id.as_bytes(), chain_context.as_bytes()]);
        Self(hash.to_hex())
    }

    /// Use a context string verbatim, without runtime derivation.
    pub fn from_raw(context: impl Into<String>) -> Self {
        Self(context.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Full domain separation bytes handed to the signer.
    pub fn signing_context(&self) -> Vec<u8> {
        let mut ctx = Vec::with_capacity(
            TX_SIGNATURE_CONTEXT_BASE.len() + CHAIN_SEPARATOR.len() + self.0.len(),
        );
        ctx.extend_from_slice(TX_SIGNATURE_CONTEXT_BASE);
        ctx.extend_from_slice(CHAIN_SEPARATOR);
        ctx.extend_from_slice(self.0.as_bytes());
        ctx
    }
}

impl fmt::Display for SignatureContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Collects one signature per signer slot of a transaction.
///
/// Each signer is matched to the first unsigned slot whose address spec
/// carries its public key.
#[derive(Debug)]
pub struct TransactionSigner {
    tx: Transaction,
    encoded: Vec<u8>,
    proofs: Vec<Option<AuthProof>>,
}

impl TransactionSigner {
    /// Freeze the transaction encoding for signing.
    pub fn new(tx: Transaction) -> Result<Self, CoreError> {
        let encoded = encode_canonical(&tx)?;
        let proofs = vec![None; tx.auth_info.signer_info.len()];
        Ok(Self {
            tx,
            encoded,
            proofs,
        })
    }

    /// The transaction being signed.
    pub fn transaction(&self) -> &Transaction {
        &self.tx
    }

    /// The canonical bytes every signer signs.
    pub fn encoded_tx(&self) -> &[u8] {
        &self.encoded
    }

    /// Sign with `signer`, filling its slot.
    pub fn append_sign(
        &mut self,
        ctx: &SignatureContext,
        signer: &dyn Signer,
    ) -> Result<(), CoreError> {
        let public_key = signer.public_key();
        let slot = self
            .tx
            .auth_info
            .signer_info
            .iter()
            .zip(&self.proofs)
            .position(|(info, proof)| {
                let AddressSpec::Signature(spec) = &info.address_spec;
                proof.is_none() && spec.public_key() == public_key
            })
            .ok_or_else(|| {
                CoreError::Sign(format!("no unsigned slot for {public_key:?}"))
            })?;

        let signature = signer.context_sign(&ctx.signing_context(), &self.encoded)?;
        self.proofs[slot] = Some(AuthProof { signature });
        Ok(())
    }

    /// The signed envelope. Fails while any slot is still unsigned.
    pub fn unverified_transaction(self) -> Result<UnverifiedTransaction, CoreError> {
        let auth_proofs = self
            .proofs
            .into_iter()
            .enumerate()
            .map(|(i, proof)| proof.ok_or_else(|| CoreError::Sign(format!("slot {i} is unsigned"))))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(UnverifiedTransaction {
            body: self.encoded,
            auth_proofs,
        })
    }
}

/// Sign a transaction whose slots are already in place, one signer per slot.
pub fn sign_transaction(
    tx: Transaction,
    ctx: &SignatureContext,
    signers: &[&dyn Signer],
) -> Result<UnverifiedTransaction, CoreError> {
    let mut ts = TransactionSigner::new(tx)?;
    for signer in signers {
        ts.append_sign(ctx, *signer)?;
    }
    ts.unverified_transaction()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{Ed25519Signer, Secp256k1Signer};
    use crate::modules::consensus_accounts::{new_deposit_tx, Deposit};
    use crate::types::{BaseUnits, Fee};

    const EMERALD_MAINNET: &str =
        "000000000000000000000000000000000000000000000000e2eaa99fc008f87f";
    const MAINNET_CHAIN_CONTEXT: &str =
        "53852332637bacb61b91b6411ab4095168ba02a50be4c3f82448438826f23898";
    const TESTNET_CHAIN_CONTEXT: &str =
        "5ba68bc5e01e06f755c4c044dd11ec508e4c17f1faf40c0e67874388437a9e55";

    fn deposit() -> Transaction {
        new_deposit_tx(
            Fee::default(),
            Deposit {
                to: None,
                amount: BaseUnits::new(1000u64, "ROSE"),
            },
        )
    }

    #[test]
    fn test_derive_pinned_contexts() {
        let runtime = Namespace::from_hex(EMERALD_MAINNET).unwrap();
        assert_eq!(
            SignatureContext::derive(&runtime, MAINNET_CHAIN_CONTEXT).as_str(),
            "cac08966e8ac2edf051c3ff598898260f3d878d00aa450573b70287b16eceab6"
        );
        assert_eq!(
            SignatureContext::derive(&runtime, TESTNET_CHAIN_CONTEXT).as_str(),
            "dbf627a9bf971a5b38e75fd2adbe205721bacb269fe105fa5dde8051fdce9fb1"
        );
    }

    #[test]
    fn test_signing_context_bytes() {
        let ctx = SignatureContext::from_raw("abcd");
        assert_eq!(ctx.signing_context(), b"oasis-runtime-sdk/tx: v0 for chain abcd".to_vec());
    }

    #[test]
    fn test_multi_signer_fills_slots_by_public_key() {
        let ed = Ed25519Signer::from_seed(&[9; 32]);
        let secp = Secp256k1Signer::from_bytes(&[9; 32]).unwrap();
        let mut tx = deposit();
        tx.append_auth_signature(ed.public_key().into(), 1);
        tx.append_auth_signature(secp.public_key().into(), 2);

        // Sign in the opposite order of the slots.
        let ctx = SignatureContext::from_raw("ctx");
        let mut ts = TransactionSigner::new(tx).unwrap();
        ts.append_sign(&ctx, &secp).unwrap();
        ts.append_sign(&ctx, &ed).unwrap();
        let unverified = ts.unverified_transaction().unwrap();

        let verified = unverified.verify(&ctx).unwrap();
        assert_eq!(verified.auth_info.signer_info.len(), 2);
        assert_eq!(unverified.auth_proofs[0].signature.len(), 64);
        assert_eq!(unverified.auth_proofs[1].signature[0], 0x30);
    }

    #[test]
    fn test_unknown_signer_rejected() {
        let ed = Ed25519Signer::from_seed(&[1; 32]);
        let stranger = Ed25519Signer::from_seed(&[2; 32]);
        let mut tx = deposit();
        tx.append_auth_signature(ed.public_key().into(), 0);

        let ctx = SignatureContext::from_raw("ctx");
        let mut ts = TransactionSigner::new(tx).unwrap();
        assert!(matches!(ts.append_sign(&ctx, &stranger), Err(CoreError::Sign(_))));
        assert!(ts.unverified_transaction().is_err());
    }

    #[test]
    fn test_wrong_context_fails_verification() {
        let ed = Ed25519Signer::from_seed(&[5; 32]);
        let mut tx = deposit();
        tx.append_auth_signature(ed.public_key().into(), 0);

        let runtime = Namespace::from_hex(EMERALD_MAINNET).unwrap();
        let mainnet = SignatureContext::derive(&runtime, MAINNET_CHAIN_CONTEXT);
        let testnet = SignatureContext::derive(&runtime, TESTNET_CHAIN_CONTEXT);
        let unverified = sign_transaction(tx, &mainnet, &[&ed]).unwrap();

        unverified.verify(&mainnet).unwrap();
        assert!(unverified.verify(&testnet).is_err());
    }
}
