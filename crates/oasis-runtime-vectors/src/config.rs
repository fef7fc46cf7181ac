//! Generator configuration.
//!
//! The binaries always run with [`GeneratorConfig::default`]; tests shrink
//! the parameter sets to keep runs short.

use oasis_runtime_vectors_core::{BaseUnits, Fee, Namespace};

use crate::error::{GeneratorError, Result};

/// Chain context of the mainnet consensus network.
pub const MAINNET_CHAIN_CONTEXT: &str =
    "53852332637bacb61b91b6411ab4095168ba02a50be4c3f82448438826f23898";

/// Chain context of the testnet consensus network.
pub const TESTNET_CHAIN_CONTEXT: &str =
    "5ba68bc5e01e06f755c4c044dd11ec508e4c17f1faf40c0e67874388437a9e55";

/// Runtime id of Emerald on mainnet.
pub const EMERALD_MAINNET_RUNTIME_ID: Namespace = Namespace::from_bytes([
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xe2, 0xea, 0xa9, 0x9f, 0xc0, 0x08, 0xf8, 0x7f,
]);

/// Runtime id no network uses, for vectors whose details must not match.
pub const UNKNOWN_RUNTIME_ID: Namespace = Namespace::from_bytes([0u8; 32]);

/// Chain context no network uses.
pub const UNKNOWN_CHAIN_CONTEXT: &str =
    "0000000000000000000000000000000000000000000000000000000000000000";

/// Parameter sets walked by the runtime vector generator.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub fees: Vec<Fee>,
    pub nonces: Vec<u64>,
    /// Amounts in base units; also the contracts token amounts and EVM value.
    pub amounts: Vec<u64>,
    /// Hex chain contexts; each is combined with `runtime_id`.
    pub chain_contexts: Vec<String>,
    pub runtime_id: Namespace,
    pub unknown_runtime_id: Namespace,
    pub unknown_chain_context: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            fees: vec![
                Fee::default(),
                Fee::new(BaseUnits::new(0u64, "_"), 2000),
                Fee::new(BaseUnits::new(424_242_424_242u64, "ROSE"), 3000),
                Fee::new(BaseUnits::new(123_456_789u64, "TEST"), 4000),
            ],
            nonces: vec![0, 1, u64::MAX],
            amounts: vec![0, 1000, 10_000_000_000_000_000_000],
            chain_contexts: vec![
                MAINNET_CHAIN_CONTEXT.to_string(),
                TESTNET_CHAIN_CONTEXT.to_string(),
            ],
            runtime_id: EMERALD_MAINNET_RUNTIME_ID,
            unknown_runtime_id: UNKNOWN_RUNTIME_ID,
            unknown_chain_context: UNKNOWN_CHAIN_CONTEXT.to_string(),
        }
    }
}

impl GeneratorConfig {
    /// Check the configuration can produce a meaningful corpus.
    pub fn validate(&self) -> Result<()> {
        if self.fees.is_empty() || self.nonces.is_empty() || self.amounts.is_empty() {
            return Err(GeneratorError::Config(
                "fees, nonces and amounts must be non-empty".into(),
            ));
        }
        if self.chain_contexts.is_empty() {
            return Err(GeneratorError::Config("no chain contexts".into()));
        }
        for ctx in self.chain_contexts.iter().chain([&self.unknown_chain_context]) {
            if !is_chain_context(ctx) {
                return Err(GeneratorError::Config(format!(
                    "chain context is not 64 hex digits: {ctx}"
                )));
            }
        }
        if self.chain_contexts.contains(&self.unknown_chain_context) {
            return Err(GeneratorError::Config(
                "unknown chain context collides with a real one".into(),
            ));
        }
        if self.runtime_id == self.unknown_runtime_id {
            return Err(GeneratorError::Config(
                "unknown runtime id collides with the real one".into(),
            ));
        }
        Ok(())
    }

    /// Number of vectors one (fee, nonce, amount, chain context) tuple yields.
    pub fn vectors_per_tuple() -> usize {
        crate::cases::VECTORS_PER_TUPLE
    }

    /// Total vectors [`crate::generate_runtime_vectors`] emits for this config.
    pub fn expected_vector_count(&self) -> usize {
        self.fees.len()
            * self.nonces.len()
            * self.amounts.len()
            * self.chain_contexts.len()
            * Self::vectors_per_tuple()
    }
}

fn is_chain_context(s: &str) -> bool {
    s.len() == 64 && s.bytes().all(|b| b.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = GeneratorConfig::default();
        config.validate().unwrap();
        assert_eq!(config.expected_vector_count(), 12_816);
        assert_eq!(
            config.runtime_id.to_hex(),
            "000000000000000000000000000000000000000000000000e2eaa99fc008f87f"
        );
    }

    #[test]
    fn test_rejects_bad_chain_context() {
        let mut config = GeneratorConfig::default();
        config.chain_contexts.push("mainnet".into());
        assert!(matches!(config.validate(), Err(GeneratorError::Config(_))));
    }

    #[test]
    fn test_rejects_colliding_unknowns() {
        let mut config = GeneratorConfig::default();
        config.unknown_runtime_id = config.runtime_id;
        assert!(config.validate().is_err());

        let mut config = GeneratorConfig::default();
        config.unknown_chain_context = MAINNET_CHAIN_CONTEXT.into();
        assert!(config.validate().is_err());
    }
}
