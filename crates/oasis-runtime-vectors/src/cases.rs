//! Per-module case tables.
//!
//! Each row names a signer, the destination text the transaction is built
//! with, the `orig_to` text (if any) shown to the user, which runtime/chain
//! pair the details claim, and whether the vector is valid. Invalid rows are
//! always signed with the real context; only their details lie.

use oasis_runtime_vectors_core::testing::{self, TestKey};
use oasis_runtime_vectors_core::{BaseUnits, Namespace};

use crate::config::GeneratorConfig;
use crate::error::Result;

/// Dave as a fixed EIP-55 Ethereum address.
pub const DAVE_ETH: &str = "0x90adE3B7065fa715c7a150313877dF1d33e777D5";
/// Native form of [`DAVE_ETH`].
pub const DAVE_NATIVE: &str = "oasis1qpupfu7e2n6pkezeaw0yhj8mcem8anj64ytrayne";
/// [`DAVE_ETH`] lower-cased without prefix.
pub const DAVE_ETH_LOWER_NO_PREFIX: &str = "90ade3b7065fa715c7a150313877df1d33e777d5";
/// [`DAVE_ETH`] upper-cased with prefix.
pub const DAVE_ETH_UPPER: &str = "0x90ADE3B7065FA715C7A150313877DF1D33E777D5";
pub const ALICE_NATIVE: &str = "oasis1qrec770vrek0a9a5lcrv0zvt22504k68svq7kzve";
pub const EVE_ETH: &str = "0xFe94510049b95A8BfD7D6397177d7D2e2E5201Aa";
pub const EVE_ETH_LOWER_NO_PREFIX: &str = "fe94510049b95a8bfd7d6397177d7d2e2e5201aa";
pub const EVE_ETH_UPPER_NO_PREFIX: &str = "FE94510049B95A8BFD7D6397177D7D2E2E5201AA";
/// An Ethereum address belonging to none of the test keys, lower-cased so no
/// checksum is implied.
pub const UNKNOWN_ETH: &str = "0x4a2b91cc3a0f1c4b7e54ba6e79f2b0b2f5d3c1e8";

/// Prefix of every vector `kind`.
pub const KIND_PREFIX: &str = "oasis-sdk runtime test vectors: ";

pub const KIND_DEPOSIT: &str = "Deposit";
pub const KIND_WITHDRAW: &str = "Withdraw";
pub const KIND_TRANSFER: &str = "Transfer";
pub const KIND_CONTRACTS_CALL: &str = "ContractsCall";
pub const KIND_CONTRACTS_INSTANTIATE: &str = "ContractsInstantiate";
pub const KIND_CONTRACTS_UPGRADE: &str = "ContractsUpgrade";
pub const KIND_EVM_CALL: &str = "EvmCall";

/// Which test key signs a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseSigner {
    Alice,
    Dave,
}

impl CaseSigner {
    pub fn key(self) -> Result<&'static TestKey> {
        let key = match self {
            CaseSigner::Alice => testing::alice()?,
            CaseSigner::Dave => testing::dave()?,
        };
        Ok(key)
    }
}

/// Which runtime id and chain context the `tx_details` claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailsContext {
    /// The values the transaction was actually signed for.
    Real,
    UnknownRuntime,
    UnknownChain,
}

impl DetailsContext {
    /// `(runtime_id, chain_context)` as written into `tx_details`.
    pub fn resolve<'a>(
        self,
        config: &'a GeneratorConfig,
        chain_context: &'a str,
    ) -> (&'a Namespace, &'a str) {
        match self {
            DetailsContext::Real => (&config.runtime_id, chain_context),
            DetailsContext::UnknownRuntime => (&config.unknown_runtime_id, chain_context),
            DetailsContext::UnknownChain => (&config.runtime_id, &config.unknown_chain_context),
        }
    }
}

/// A Deposit, Withdraw or Transfer row.
#[derive(Debug, Clone, Copy)]
pub struct TransferCase {
    pub signer: CaseSigner,
    /// Destination text; empty means the signer's own account.
    pub to: &'static str,
    pub orig_to: Option<&'static str>,
    pub context: DetailsContext,
    pub valid: bool,
}

const fn row(
    signer: CaseSigner,
    to: &'static str,
    orig_to: Option<&'static str>,
    context: DetailsContext,
    valid: bool,
) -> TransferCase {
    TransferCase {
        signer,
        to,
        orig_to,
        context,
        valid,
    }
}

use CaseSigner::{Alice, Dave};
use DetailsContext::{Real, UnknownChain, UnknownRuntime};

pub const DEPOSIT_CASES: [TransferCase; 10] = [
    row(Alice, "", None, Real, true),
    row(Alice, DAVE_NATIVE, None, Real, true),
    row(Alice, DAVE_ETH, Some(DAVE_ETH), Real, true),
    // Listed twice on purpose; consumers index into the output.
    row(Alice, DAVE_ETH, Some(DAVE_ETH), Real, true),
    row(Alice, DAVE_ETH, Some(DAVE_ETH_LOWER_NO_PREFIX), Real, true),
    row(Alice, DAVE_ETH_LOWER_NO_PREFIX, Some(DAVE_ETH_UPPER), Real, true),
    row(Alice, DAVE_ETH, None, Real, true),
    row(Alice, DAVE_ETH, Some(UNKNOWN_ETH), Real, false),
    row(Alice, DAVE_ETH, Some(DAVE_ETH), UnknownRuntime, false),
    row(Alice, DAVE_ETH, Some(DAVE_ETH), UnknownChain, false),
];

pub const WITHDRAW_CASES: [TransferCase; 6] = [
    row(Alice, "", None, Real, true),
    row(Alice, DAVE_NATIVE, None, Real, true),
    row(Dave, "", None, Real, true),
    row(Dave, ALICE_NATIVE, None, Real, true),
    row(Alice, "", None, UnknownRuntime, false),
    row(Alice, "", None, UnknownChain, false),
];

pub const TRANSFER_CASES: [TransferCase; 12] = [
    row(Alice, DAVE_NATIVE, None, Real, true),
    row(Alice, DAVE_ETH, Some(DAVE_ETH), Real, true),
    row(Alice, DAVE_ETH_LOWER_NO_PREFIX, Some(DAVE_ETH_LOWER_NO_PREFIX), Real, true),
    row(Alice, DAVE_ETH_UPPER, Some(DAVE_ETH_UPPER), Real, true),
    row(Alice, EVE_ETH, Some(EVE_ETH), Real, true),
    row(Alice, EVE_ETH_LOWER_NO_PREFIX, Some(EVE_ETH_LOWER_NO_PREFIX), Real, true),
    row(Dave, ALICE_NATIVE, None, Real, true),
    row(Dave, EVE_ETH, Some(EVE_ETH), Real, true),
    row(Dave, EVE_ETH_UPPER_NO_PREFIX, Some(EVE_ETH_UPPER_NO_PREFIX), Real, true),
    row(Alice, DAVE_ETH, Some(UNKNOWN_ETH), Real, false),
    row(Alice, DAVE_NATIVE, None, UnknownRuntime, false),
    row(Alice, DAVE_NATIVE, None, UnknownChain, false),
];

/// A contracts or EVM row: signer, claimed context, validity.
#[derive(Debug, Clone, Copy)]
pub struct ContextCase {
    pub signer: CaseSigner,
    pub context: DetailsContext,
    pub valid: bool,
}

const fn ctx_row(signer: CaseSigner, context: DetailsContext, valid: bool) -> ContextCase {
    ContextCase {
        signer,
        context,
        valid,
    }
}

pub const CONTRACTS_CASES: [ContextCase; 4] = [
    ctx_row(Alice, Real, true),
    ctx_row(Dave, Real, true),
    ctx_row(Alice, UnknownRuntime, false),
    ctx_row(Alice, UnknownChain, false),
];

/// Instance ids and code ids used by the contracts cases.
pub const CONTRACT_IDS: [u64; 3] = [0, 1, u64::MAX];

pub const EVM_CASES: [ContextCase; 6] = [
    ctx_row(Alice, Real, true),
    ctx_row(Alice, UnknownRuntime, false),
    ctx_row(Alice, UnknownChain, false),
    ctx_row(Dave, Real, true),
    ctx_row(Dave, UnknownRuntime, false),
    ctx_row(Dave, UnknownChain, false),
];

/// Token bundles attached to contracts calls for a given amount.
pub fn token_bundles(amount: u64) -> [Vec<BaseUnits>; 4] {
    [
        vec![
            BaseUnits::new(amount, "ROSE"),
            BaseUnits::new(amount, "WBTC"),
            BaseUnits::new(amount, "WETH"),
        ],
        vec![BaseUnits::new(amount, "ROSE")],
        vec![BaseUnits::new(0u64, "TEST")],
        vec![],
    ]
}

/// Contracts vectors per module per tuple.
pub const CONTRACTS_VECTORS_PER_MODULE: usize = 4 * CONTRACT_IDS.len() * CONTRACTS_CASES.len();

/// Vectors generated for one (fee, nonce, amount, chain context) tuple.
pub const VECTORS_PER_TUPLE: usize = DEPOSIT_CASES.len()
    + WITHDRAW_CASES.len()
    + TRANSFER_CASES.len()
    + 3 * CONTRACTS_VECTORS_PER_MODULE
    + EVM_CASES.len();

#[cfg(test)]
mod tests {
    use super::*;
    use oasis_runtime_vectors_core::resolve_address;

    fn expected_valid(case: &TransferCase) -> bool {
        let to = resolve_address(case.to).unwrap();
        let orig_matches = case
            .orig_to
            .map_or(true, |orig| resolve_address(orig).unwrap() == to);
        case.context == DetailsContext::Real && orig_matches
    }

    #[test]
    fn test_validity_flags_follow_rule() {
        for case in DEPOSIT_CASES.iter().chain(&WITHDRAW_CASES).chain(&TRANSFER_CASES) {
            assert_eq!(case.valid, expected_valid(case), "{case:?}");
        }
        for case in CONTRACTS_CASES.iter().chain(&EVM_CASES) {
            assert_eq!(case.valid, case.context == DetailsContext::Real, "{case:?}");
        }
    }

    #[test]
    fn test_textual_variants_are_consistent() {
        assert_eq!(DAVE_ETH.to_lowercase(), format!("0x{DAVE_ETH_LOWER_NO_PREFIX}"));
        assert_eq!(DAVE_ETH_UPPER, format!("0x{}", DAVE_ETH_LOWER_NO_PREFIX.to_uppercase()));
        assert_eq!(EVE_ETH.to_lowercase(), format!("0x{EVE_ETH_LOWER_NO_PREFIX}"));
        assert_eq!(EVE_ETH_UPPER_NO_PREFIX, EVE_ETH_LOWER_NO_PREFIX.to_uppercase());
        assert_eq!(
            resolve_address(DAVE_ETH).unwrap(),
            resolve_address(DAVE_NATIVE).unwrap()
        );
    }

    #[test]
    fn test_eve_eth_is_eves_key() {
        let eve = testing::eve().unwrap();
        assert_eq!(resolve_address(EVE_ETH).unwrap(), Some(eve.address));
    }

    #[test]
    fn test_unknown_eth_is_nobodys_key() {
        assert_eq!(UNKNOWN_ETH, UNKNOWN_ETH.to_lowercase());
        let unknown = resolve_address(UNKNOWN_ETH).unwrap().unwrap();
        let keys = [
            testing::alice(),
            testing::bob(),
            testing::charlie(),
            testing::dave(),
            testing::eve(),
        ];
        for key in keys {
            assert_ne!(unknown, key.unwrap().address);
        }
    }

    #[test]
    fn test_transfer_targets_are_specified() {
        for case in &TRANSFER_CASES {
            assert!(!case.to.is_empty());
        }
    }

    #[test]
    fn test_tuple_size() {
        assert_eq!(CONTRACTS_VECTORS_PER_MODULE, 48);
        assert_eq!(VECTORS_PER_TUPLE, 178);
    }
}
