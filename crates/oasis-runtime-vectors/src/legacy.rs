//! The older consensus accounts vector format.
//!
//! Only Deposit and Withdraw back to the signer's own account (always its hex
//! Ethereum address, zero for Ed25519 keys), signed with the bare chain
//! context as signature context. Records carry no details, no signer
//! algorithm and an empty private key.

use oasis_runtime_vectors_core::json::base64_bytes;
use oasis_runtime_vectors_core::modules::consensus_accounts::{
    new_deposit_tx, new_withdraw_tx, Deposit, Withdraw,
};
use oasis_runtime_vectors_core::testing::{self, TestKey};
use oasis_runtime_vectors_core::{
    resolve_address, BaseUnits, Denomination, Fee, SignatureContext, Transaction,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::cases::{KIND_DEPOSIT, KIND_PREFIX, KIND_WITHDRAW};
use crate::config::{MAINNET_CHAIN_CONTEXT, TESTNET_CHAIN_CONTEXT};
use crate::error::Result;
use crate::vector::{sign_and_check, SignedTxRecord};

/// A consensus accounts test vector in the older format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyTestVector {
    pub kind: String,
    pub signature_context: String,
    pub tx: String,
    pub signed_tx: SignedTxRecord,
    #[serde(with = "base64_bytes")]
    pub encoded_tx: Vec<u8>,
    #[serde(with = "base64_bytes")]
    pub encoded_signed_tx: Vec<u8>,
    pub valid: bool,
    #[serde(with = "base64_bytes")]
    pub signer_private_key: Vec<u8>,
    #[serde(with = "base64_bytes")]
    pub signer_public_key: Vec<u8>,
}

/// Parameter sets for the older generator.
#[derive(Debug, Clone)]
pub struct LegacyConfig {
    pub fees: Vec<Fee>,
    pub nonces: Vec<u64>,
    pub amounts: Vec<u64>,
    /// Used directly as signature contexts.
    pub chain_contexts: Vec<String>,
}

impl Default for LegacyConfig {
    fn default() -> Self {
        Self {
            fees: vec![
                Fee::default(),
                Fee::new(BaseUnits::new(10_000_000_000u64, "_"), 1000),
                Fee::new(BaseUnits::new(0u64, "_"), 2000),
                Fee::new(BaseUnits::new(424_242_424_242u64, "ROSE"), 3000),
                Fee::new(BaseUnits::new(123_456_789u64, "TEST"), 4000),
            ],
            nonces: vec![0, 1, 10, 42, 1000, 1_000_000, 10_000_000, u64::MAX],
            amounts: vec![
                0,
                1000,
                10_000_000,
                10_000_000_000_000,
                10_000_000_000_000_000_000,
            ],
            chain_contexts: vec![
                MAINNET_CHAIN_CONTEXT.to_string(),
                TESTNET_CHAIN_CONTEXT.to_string(),
            ],
        }
    }
}

impl LegacyConfig {
    pub fn expected_vector_count(&self) -> usize {
        // Two signers, two vectors (deposit and withdraw) each.
        self.fees.len() * self.nonces.len() * self.amounts.len() * self.chain_contexts.len() * 4
    }
}

/// The signer's own account as the older generator spells it: always the hex
/// Ethereum address, which is all zeros for Ed25519 keys.
pub fn own_address_text(key: &TestKey) -> String {
    hex::encode(key.eth_address.unwrap_or([0u8; 20]))
}

fn make_legacy_vector(
    kind: &str,
    tx: Transaction,
    key: &TestKey,
    nonce: u64,
    sig_ctx: &SignatureContext,
) -> Result<LegacyTestVector> {
    let parts = sign_and_check(tx, key, nonce, sig_ctx)?;
    Ok(LegacyTestVector {
        kind: format!("{KIND_PREFIX}{kind}"),
        signature_context: sig_ctx.to_string(),
        tx: serde_json::to_string(&parts.tx)?,
        signed_tx: SignedTxRecord::new(&parts.tx, &parts.unverified)?,
        encoded_tx: parts.unverified.body,
        encoded_signed_tx: parts.encoded_signed_tx,
        valid: true,
        signer_private_key: Vec::new(),
        signer_public_key: key.public_key_bytes(),
    })
}

/// Generate the older consensus accounts corpus.
pub fn generate_legacy_vectors(config: &LegacyConfig) -> Result<Vec<LegacyTestVector>> {
    let signers = [testing::alice()?, testing::dave()?];
    info!(
        expected = config.expected_vector_count(),
        "generating consensus accounts test vectors"
    );

    let mut vectors = Vec::with_capacity(config.expected_vector_count());
    for fee in &config.fees {
        for &nonce in &config.nonces {
            for &amount in &config.amounts {
                for key in signers {
                    for chain_context in &config.chain_contexts {
                        let sig_ctx = SignatureContext::from_raw(chain_context.as_str());
                        let to = resolve_address(&own_address_text(key))?;
                        let amount = BaseUnits::new(amount, Denomination::NATIVE);
                        debug!(signer = key.name, nonce, %amount, "legacy tuple");

                        let deposit = new_deposit_tx(
                            fee.clone(),
                            Deposit {
                                to,
                                amount: amount.clone(),
                            },
                        );
                        vectors.push(make_legacy_vector(
                            KIND_DEPOSIT,
                            deposit,
                            key,
                            nonce,
                            &sig_ctx,
                        )?);

                        let withdraw = new_withdraw_tx(fee.clone(), Withdraw { to, amount });
                        vectors.push(make_legacy_vector(
                            KIND_WITHDRAW,
                            withdraw,
                            key,
                            nonce,
                            &sig_ctx,
                        )?);
                    }
                }
            }
        }
    }

    info!(count = vectors.len(), "generated consensus accounts test vectors");
    Ok(vectors)
}
