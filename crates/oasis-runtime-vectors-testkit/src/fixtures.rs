//! Test fixtures and helpers.
//!
//! A [`Scenario`] fixes one point of the generator's parameter space so a
//! test can build and sign a single vector without walking the corpus.

use oasis_runtime_vectors::cases::{
    KIND_CONTRACTS_INSTANTIATE, KIND_DEPOSIT, KIND_EVM_CALL, KIND_TRANSFER, KIND_WITHDRAW,
};
use oasis_runtime_vectors::config::{EMERALD_MAINNET_RUNTIME_ID, MAINNET_CHAIN_CONTEXT};
use oasis_runtime_vectors::{make_runtime_test_vector, GeneratorError, Result};
use oasis_runtime_vectors::{RuntimeTestVector, TxDetails};
use oasis_runtime_vectors_core::address::parse_eth_address;
use oasis_runtime_vectors_core::modules::{accounts, consensus_accounts, contracts, evm};
use oasis_runtime_vectors_core::{
    resolve_address, test_key, BaseUnits, CoreError, Fee, Namespace, Quantity, SignatureContext,
    TestKey, Transaction,
};

/// One signer at one (fee, nonce, runtime, chain) point.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub key: &'static TestKey,
    pub fee: Fee,
    pub nonce: u64,
    pub runtime_id: Namespace,
    pub chain_context: String,
}

impl Scenario {
    /// Emerald on mainnet, default fee, nonce 1.
    pub fn new(signer: &str) -> std::result::Result<Self, CoreError> {
        Ok(Self {
            key: test_key(signer)?,
            fee: Fee::default(),
            nonce: 1,
            runtime_id: EMERALD_MAINNET_RUNTIME_ID,
            chain_context: MAINNET_CHAIN_CONTEXT.to_string(),
        })
    }

    pub fn with_fee(mut self, fee: Fee) -> Self {
        self.fee = fee;
        self
    }

    pub fn with_nonce(mut self, nonce: u64) -> Self {
        self.nonce = nonce;
        self
    }

    pub fn with_runtime_id(mut self, runtime_id: Namespace) -> Self {
        self.runtime_id = runtime_id;
        self
    }

    pub fn with_chain_context(mut self, chain_context: &str) -> Self {
        self.chain_context = chain_context.to_string();
        self
    }

    pub fn signature_context(&self) -> SignatureContext {
        SignatureContext::derive(&self.runtime_id, &self.chain_context)
    }

    /// Honest details; `orig_to` is recorded when given.
    pub fn details(&self, orig_to: Option<&str>) -> TxDetails {
        let mut details = TxDetails::new();
        if let Some(orig_to) = orig_to {
            details.insert("orig_to".into(), orig_to.into());
        }
        details.insert("runtime_id".into(), self.runtime_id.to_hex());
        details.insert("chain_context".into(), self.chain_context.clone());
        details
    }

    /// Sign `tx` into a vector of the given kind.
    pub fn sign(
        &self,
        kind: &str,
        tx: Transaction,
        tx_details: TxDetails,
    ) -> Result<RuntimeTestVector> {
        make_runtime_test_vector(
            kind,
            tx,
            Some(tx_details),
            true,
            self.key,
            self.nonce,
            &self.signature_context(),
        )
    }

    /// Deposit of `amount` ROSE to `to` (empty for the signer's own account).
    pub fn deposit(&self, to: &str, amount: u64) -> Result<RuntimeTestVector> {
        let tx = consensus_accounts::new_deposit_tx(
            self.fee.clone(),
            consensus_accounts::Deposit {
                to: resolve_address(to)?,
                amount: BaseUnits::new(amount, "ROSE"),
            },
        );
        self.sign(KIND_DEPOSIT, tx, self.details(eth_orig_to(to)))
    }

    pub fn withdraw(&self, to: &str, amount: u64) -> Result<RuntimeTestVector> {
        let tx = consensus_accounts::new_withdraw_tx(
            self.fee.clone(),
            consensus_accounts::Withdraw {
                to: resolve_address(to)?,
                amount: BaseUnits::new(amount, "ROSE"),
            },
        );
        self.sign(KIND_WITHDRAW, tx, self.details(eth_orig_to(to)))
    }

    pub fn transfer(&self, to: &str, amount: u64) -> Result<RuntimeTestVector> {
        let to_address = resolve_address(to)?.ok_or_else(|| {
            GeneratorError::Config("transfer needs an explicit destination".into())
        })?;
        let tx = accounts::new_transfer_tx(
            self.fee.clone(),
            accounts::Transfer {
                to: to_address,
                amount: BaseUnits::new(amount, "ROSE"),
            },
        );
        self.sign(KIND_TRANSFER, tx, self.details(eth_orig_to(to)))
    }

    pub fn instantiate(&self, code_id: u64, tokens: Vec<BaseUnits>) -> Result<RuntimeTestVector> {
        let tx = contracts::new_instantiate_tx(
            self.fee.clone(),
            contracts::Instantiate {
                code_id: contracts::CodeId(code_id),
                upgrades_policy: contracts::Policy::Unspecified,
                data: Vec::new(),
                tokens,
            },
        );
        self.sign(KIND_CONTRACTS_INSTANTIATE, tx, self.details(None))
    }

    pub fn evm_call(&self, address: [u8; 20], value: u64) -> Result<RuntimeTestVector> {
        let tx = evm::new_call_tx(
            self.fee.clone(),
            evm::Call {
                address,
                value: evm::u256_from_quantity(Quantity::from(value)),
                data: Vec::new(),
            },
        );
        self.sign(KIND_EVM_CALL, tx, self.details(None))
    }
}

/// Ethereum-form destinations are shown to the user as typed.
fn eth_orig_to(to: &str) -> Option<&str> {
    parse_eth_address(to).map(|_| to)
}
