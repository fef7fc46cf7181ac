//! Deterministic named test identities.
//!
//! Every key is derived from the seed text
//! `"oasis-runtime-sdk/test-keys: <name>"`: Ed25519 keys use its SHA-512/256
//! as the 32-byte seed, secp256k1 keys use it as the big-endian scalar.
//! Alice, Bob and Charlie are Ed25519; Dave and Eve are secp256k1 keys
//! addressed by their Ethereum address.

use once_cell::sync::Lazy;

use crate::address::Address;
use crate::crypto::{Ed25519Signer, MemorySigner, Secp256k1Signer, Sha512_256Hash, Signer};
use crate::error::CoreError;
use crate::transaction::SignatureAddressSpec;

/// Seed text prefix shared by all test keys.
pub const TEST_KEY_SEED_PREFIX: &str = "oasis-runtime-sdk/test-keys: ";

/// Algorithm tag for raw Ed25519 key material.
pub const ALGORITHM_ED25519_RAW: &str = "ed25519_raw";
/// Algorithm tag for raw secp256k1 key material.
pub const ALGORITHM_SECP256K1_RAW: &str = "secp256k1_raw";

/// A named identity with everything a vector needs to describe its signer.
#[derive(Debug, Clone)]
pub struct TestKey {
    pub name: &'static str,
    pub signer: MemorySigner,
    /// Native runtime address.
    pub address: Address,
    pub sigspec: SignatureAddressSpec,
    /// Ethereum address, secp256k1 keys only.
    pub eth_address: Option<[u8; 20]>,
    /// Raw private key: 64-byte Ed25519 key pair or 32-byte secp256k1 scalar.
    pub unsafe_bytes: Vec<u8>,
}

impl TestKey {
    fn ed25519(name: &'static str) -> Result<Self, CoreError> {
        let signer = Ed25519Signer::new_test(&seed_text(name));
        let sigspec = SignatureAddressSpec::from(signer.public_key());
        Ok(Self {
            name,
            address: Address::from_sigspec(&sigspec)?,
            sigspec,
            eth_address: None,
            unsafe_bytes: signer.keypair_bytes().to_vec(),
            signer: MemorySigner::Ed25519(signer),
        })
    }

    fn secp256k1(name: &'static str) -> Result<Self, CoreError> {
        let scalar = Sha512_256Hash::digest(seed_text(name).as_bytes());
        let signer = Secp256k1Signer::from_bytes(scalar.as_bytes())?;
        let public_key = signer.secp256k1_public_key();
        let eth_address = public_key.eth_address()?;
        Ok(Self {
            name,
            address: Address::from_eth(&eth_address),
            sigspec: SignatureAddressSpec::Secp256k1Eth(public_key),
            eth_address: Some(eth_address),
            unsafe_bytes: scalar.as_bytes().to_vec(),
            signer: MemorySigner::Secp256k1(signer),
        })
    }

    /// `"ed25519_raw"` or `"secp256k1_raw"`.
    pub fn algorithm(&self) -> &'static str {
        match self.signer {
            MemorySigner::Ed25519(_) => ALGORITHM_ED25519_RAW,
            MemorySigner::Secp256k1(_) => ALGORITHM_SECP256K1_RAW,
        }
    }

    /// Raw public key bytes (32-byte Ed25519 or 33-byte compressed SEC1).
    pub fn public_key_bytes(&self) -> Vec<u8> {
        self.signer.public_key().as_bytes().to_vec()
    }
}

fn seed_text(name: &str) -> String {
    format!("{TEST_KEY_SEED_PREFIX}{}", name.to_lowercase())
}

static REGISTRY: Lazy<Result<Vec<TestKey>, String>> = Lazy::new(|| {
    let keys = [
        TestKey::ed25519("Alice"),
        TestKey::ed25519("Bob"),
        TestKey::ed25519("Charlie"),
        TestKey::secp256k1("Dave"),
        TestKey::secp256k1("Eve"),
    ];
    keys.into_iter()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| e.to_string())
});

/// Look up a test key by name, case-insensitively.
pub fn test_key(name: &str) -> Result<&'static TestKey, CoreError> {
    let keys = REGISTRY
        .as_ref()
        .map_err(|e| CoreError::TestKeyRegistry(e.clone()))?;
    keys.iter()
        .find(|k| k.name.eq_ignore_ascii_case(name))
        .ok_or_else(|| CoreError::UnknownTestKey(name.to_string()))
}

pub fn alice() -> Result<&'static TestKey, CoreError> {
    test_key("Alice")
}

pub fn bob() -> Result<&'static TestKey, CoreError> {
    test_key("Bob")
}

pub fn charlie() -> Result<&'static TestKey, CoreError> {
    test_key("Charlie")
}

pub fn dave() -> Result<&'static TestKey, CoreError> {
    test_key("Dave")
}

pub fn eve() -> Result<&'static TestKey, CoreError> {
    test_key("Eve")
}
