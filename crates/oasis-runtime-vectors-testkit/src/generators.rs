//! Proptest generators for property-based testing.

use proptest::prelude::*;

use oasis_runtime_vectors::cases::KIND_DEPOSIT;
use oasis_runtime_vectors::{make_runtime_test_vector, Result, RuntimeTestVector, TxDetails};
use oasis_runtime_vectors_core::modules::consensus_accounts::{new_deposit_tx, Deposit};
use oasis_runtime_vectors_core::{
    test_key, Address, BaseUnits, Denomination, Fee, Namespace, SignatureContext,
};

/// Names of every registered test key.
pub const SIGNER_NAMES: [&str; 5] = ["Alice", "Bob", "Charlie", "Dave", "Eve"];

/// Generate a random 20-byte Ethereum address.
pub fn eth_address() -> impl Strategy<Value = [u8; 20]> {
    any::<[u8; 20]>()
}

/// Render `addr` as hex text with a random prefix (`0x`, `0X` or none) and
/// a random case for every letter.
pub fn eth_address_text(addr: [u8; 20]) -> impl Strategy<Value = String> {
    (
        prop_oneof![Just("0x"), Just("0X"), Just("")],
        prop::collection::vec(any::<bool>(), 40),
    )
        .prop_map(move |(prefix, upper)| {
            let digits: String = hex::encode(addr)
                .chars()
                .zip(upper)
                .map(|(c, up)| if up { c.to_ascii_uppercase() } else { c })
                .collect();
            format!("{prefix}{digits}")
        })
}

/// Generate a denomination that passes basic validation.
pub fn denomination() -> impl Strategy<Value = Denomination> {
    "[A-Z_]{0,32}".prop_map(|s| Denomination::from(s.as_str()))
}

pub fn base_units() -> impl Strategy<Value = BaseUnits> {
    (any::<u64>(), denomination()).prop_map(|(amount, denomination)| BaseUnits {
        amount: amount.into(),
        denomination,
    })
}

pub fn fee() -> impl Strategy<Value = Fee> {
    (base_units(), any::<u64>()).prop_map(|(amount, gas)| Fee::new(amount, gas))
}

/// Generate a 64-digit hex chain context.
pub fn chain_context() -> impl Strategy<Value = String> {
    any::<[u8; 32]>().prop_map(hex::encode)
}

pub fn runtime_id() -> impl Strategy<Value = Namespace> {
    any::<[u8; 32]>().prop_map(Namespace::from_bytes)
}

pub fn signer_name() -> impl Strategy<Value = &'static str> {
    prop::sample::select(SIGNER_NAMES.to_vec())
}

/// Parameters for signing one Deposit vector.
#[derive(Debug, Clone)]
pub struct SigningParams {
    pub signer: &'static str,
    pub fee: Fee,
    pub nonce: u64,
    pub to: Option<[u8; 20]>,
    pub amount: u64,
    pub runtime_id: Namespace,
    pub chain_context: String,
}

impl SigningParams {
    pub fn signature_context(&self) -> SignatureContext {
        SignatureContext::derive(&self.runtime_id, &self.chain_context)
    }
}

impl Arbitrary for SigningParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            signer_name(),
            fee(),
            any::<u64>(), // nonce
            proptest::option::of(eth_address()),
            any::<u64>(), // amount
            runtime_id(),
            chain_context(),
        )
            .prop_map(
                |(signer, fee, nonce, to, amount, runtime_id, chain_context)| SigningParams {
                    signer,
                    fee,
                    nonce,
                    to,
                    amount,
                    runtime_id,
                    chain_context,
                },
            )
            .boxed()
    }
}

/// Sign the Deposit described by `params` with honest details.
pub fn vector_from_params(params: &SigningParams) -> Result<RuntimeTestVector> {
    let key = test_key(params.signer)?;
    let tx = new_deposit_tx(
        params.fee.clone(),
        Deposit {
            to: params.to.as_ref().map(Address::from_eth),
            amount: BaseUnits::new(params.amount, "ROSE"),
        },
    );

    let mut details = TxDetails::new();
    details.insert("runtime_id".into(), params.runtime_id.to_hex());
    details.insert("chain_context".into(), params.chain_context.clone());

    make_runtime_test_vector(
        KIND_DEPOSIT,
        tx,
        Some(details),
        true,
        key,
        params.nonce,
        &params.signature_context(),
    )
}
