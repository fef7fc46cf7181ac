//! Enumerates the parameter cross product into runtime test vectors.
//!
//! Output order is exactly:
//!
//! ```text
//! for fee, for nonce, for amount, for chain context:
//!     deposits, withdrawals, transfers,
//!     contracts calls, instantiations, upgrades,
//!     evm calls
//! ```
//!
//! Consumers index into the output, so the order is part of the format.

use oasis_runtime_vectors_core::address::parse_eth_address;
use oasis_runtime_vectors_core::modules::{accounts, consensus_accounts, contracts, evm};
use oasis_runtime_vectors_core::{
    resolve_address, BaseUnits, Fee, Quantity, SignatureContext, Transaction,
};
use tracing::{debug, info};

use crate::cases::{
    token_bundles, CaseSigner, ContextCase, DetailsContext, TransferCase, CONTRACTS_CASES,
    CONTRACT_IDS, DAVE_ETH, DEPOSIT_CASES, EVM_CASES, KIND_CONTRACTS_CALL,
    KIND_CONTRACTS_INSTANTIATE, KIND_CONTRACTS_UPGRADE, KIND_DEPOSIT, KIND_EVM_CALL,
    KIND_TRANSFER, KIND_WITHDRAW, TRANSFER_CASES, WITHDRAW_CASES,
};
use crate::config::GeneratorConfig;
use crate::error::{GeneratorError, Result};
use crate::vector::{make_runtime_test_vector, RuntimeTestVector, TxDetails};

/// Denomination of Deposit, Withdraw and Transfer amounts.
const TRANSFER_DENOMINATION: &str = "ROSE";

/// One point of the outer parameter loops.
struct Tuple<'a> {
    fee: &'a Fee,
    nonce: u64,
    amount: u64,
    chain_context: &'a str,
    sig_ctx: SignatureContext,
}

/// Walks the configured parameter sets.
pub struct Generator<'a> {
    config: &'a GeneratorConfig,
    vectors: Vec<RuntimeTestVector>,
}

impl<'a> Generator<'a> {
    pub fn new(config: &'a GeneratorConfig) -> Self {
        Self {
            config,
            vectors: Vec::with_capacity(config.expected_vector_count()),
        }
    }

    /// Generate every vector, in output order.
    pub fn run(mut self) -> Result<Vec<RuntimeTestVector>> {
        self.config.validate()?;
        let config = self.config;
        info!(
            runtime_id = %config.runtime_id,
            expected = config.expected_vector_count(),
            "generating runtime test vectors"
        );

        for fee in &config.fees {
            for &nonce in &config.nonces {
                for &amount in &config.amounts {
                    for chain_context in &config.chain_contexts {
                        let tuple = Tuple {
                            fee,
                            nonce,
                            amount,
                            chain_context,
                            sig_ctx: SignatureContext::derive(&config.runtime_id, chain_context),
                        };
                        debug!(
                            fee = %fee.amount,
                            gas = fee.gas,
                            nonce,
                            amount,
                            sig_ctx = %tuple.sig_ctx,
                            "parameter tuple"
                        );
                        self.tuple(&tuple)?;
                    }
                }
            }
        }

        info!(count = self.vectors.len(), "generated runtime test vectors");
        Ok(self.vectors)
    }

    fn tuple(&mut self, t: &Tuple<'_>) -> Result<()> {
        self.transfer_cases(t, KIND_DEPOSIT, &DEPOSIT_CASES)?;
        self.transfer_cases(t, KIND_WITHDRAW, &WITHDRAW_CASES)?;
        self.transfer_cases(t, KIND_TRANSFER, &TRANSFER_CASES)?;
        self.contracts_cases(t, KIND_CONTRACTS_CALL)?;
        self.contracts_cases(t, KIND_CONTRACTS_INSTANTIATE)?;
        self.contracts_cases(t, KIND_CONTRACTS_UPGRADE)?;
        self.evm_cases(t)
    }

    fn details(
        &self,
        t: &Tuple<'_>,
        context: DetailsContext,
        orig_to: Option<&str>,
    ) -> TxDetails {
        let (runtime_id, chain_context) = context.resolve(self.config, t.chain_context);
        let mut details = TxDetails::new();
        if let Some(orig_to) = orig_to {
            details.insert("orig_to".into(), orig_to.into());
        }
        details.insert("runtime_id".into(), runtime_id.to_hex());
        details.insert("chain_context".into(), chain_context.into());
        details
    }

    fn push(
        &mut self,
        t: &Tuple<'_>,
        kind: &str,
        tx: Transaction,
        details: TxDetails,
        valid: bool,
        signer: CaseSigner,
    ) -> Result<()> {
        let key = signer.key()?;
        let vector =
            make_runtime_test_vector(kind, tx, Some(details), valid, key, t.nonce, &t.sig_ctx)?;
        self.vectors.push(vector);
        Ok(())
    }

    fn transfer_cases(&mut self, t: &Tuple<'_>, kind: &str, cases: &[TransferCase]) -> Result<()> {
        debug!(kind, count = cases.len(), "transfer cases");
        let amount = BaseUnits::new(t.amount, TRANSFER_DENOMINATION);
        for case in cases {
            let to = resolve_address(case.to)?;
            let fee = t.fee.clone();
            let tx = match kind {
                KIND_DEPOSIT => consensus_accounts::new_deposit_tx(
                    fee,
                    consensus_accounts::Deposit {
                        to,
                        amount: amount.clone(),
                    },
                ),
                KIND_WITHDRAW => consensus_accounts::new_withdraw_tx(
                    fee,
                    consensus_accounts::Withdraw {
                        to,
                        amount: amount.clone(),
                    },
                ),
                KIND_TRANSFER => {
                    let to = to.ok_or_else(|| {
                        GeneratorError::Config("transfer without a destination".into())
                    })?;
                    accounts::new_transfer_tx(
                        fee,
                        accounts::Transfer {
                            to,
                            amount: amount.clone(),
                        },
                    )
                }
                other => {
                    return Err(GeneratorError::Config(format!(
                        "no transfer builder for {other}"
                    )))
                }
            };
            let details = self.details(t, case.context, case.orig_to);
            self.push(t, kind, tx, details, case.valid, case.signer)?;
        }
        Ok(())
    }

    fn contracts_cases(&mut self, t: &Tuple<'_>, kind: &str) -> Result<()> {
        debug!(kind, "contracts cases");
        for tokens in token_bundles(t.amount) {
            for id in CONTRACT_IDS {
                for case in &CONTRACTS_CASES {
                    let tx = contracts_tx(kind, t.fee.clone(), id, tokens.clone())?;
                    let details = self.details(t, case.context, None);
                    self.push(t, kind, tx, details, case.valid, case.signer)?;
                }
            }
        }
        Ok(())
    }

    fn evm_cases(&mut self, t: &Tuple<'_>) -> Result<()> {
        debug!(count = EVM_CASES.len(), "evm cases");
        let address = parse_eth_address(DAVE_ETH)
            .ok_or_else(|| GeneratorError::Config(format!("bad evm target {DAVE_ETH}")))?;
        for ContextCase {
            signer,
            context,
            valid,
        } in EVM_CASES
        {
            let tx = evm::new_call_tx(
                t.fee.clone(),
                evm::Call {
                    address,
                    value: evm::u256_from_quantity(Quantity::from(t.amount)),
                    data: Vec::new(),
                },
            );
            let details = self.details(t, context, None);
            self.push(t, KIND_EVM_CALL, tx, details, valid, signer)?;
        }
        Ok(())
    }
}

/// Build a contracts transaction; `id` serves as both instance and code id.
fn contracts_tx(
    kind: &str,
    fee: Fee,
    id: u64,
    tokens: Vec<BaseUnits>,
) -> Result<Transaction> {
    let tx = match kind {
        KIND_CONTRACTS_CALL => contracts::new_call_tx(
            fee,
            contracts::Call {
                id: contracts::InstanceId(id),
                data: Vec::new(),
                tokens,
            },
        ),
        KIND_CONTRACTS_INSTANTIATE => contracts::new_instantiate_tx(
            fee,
            contracts::Instantiate {
                code_id: contracts::CodeId(id),
                upgrades_policy: contracts::Policy::Unspecified,
                data: Vec::new(),
                tokens,
            },
        ),
        KIND_CONTRACTS_UPGRADE => contracts::new_upgrade_tx(
            fee,
            contracts::Upgrade {
                id: contracts::InstanceId(id),
                code_id: contracts::CodeId(id),
                data: Vec::new(),
                tokens,
            },
        ),
        other => {
            return Err(GeneratorError::Config(format!(
                "no contracts builder for {other}"
            )))
        }
    };
    Ok(tx)
}

/// Generate the full runtime test vector corpus for `config`.
pub fn generate_runtime_vectors(config: &GeneratorConfig) -> Result<Vec<RuntimeTestVector>> {
    Generator::new(config).run()
}
