//! Account addresses and the textual address resolver.
//!
//! An address is 21 bytes: a version byte followed by the first 20 bytes of
//! `SHA-512/256(context || version || data)`. Native text form is bech32 with
//! the `oasis` human readable part. Ethereum hex addresses map onto the
//! secp256k1eth address context.

use bech32::{Bech32, Hrp};
use serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::crypto::{keccak256, Sha512_256Hash};
use crate::error::CoreError;
use crate::transaction::SignatureAddressSpec;

/// Address context for Ed25519 staking accounts.
pub const ADDRESS_V0_ED25519_CONTEXT: &[u8] = b"oasis-core/address: staking";
/// Address context for secp256k1 keys addressed by their Ethereum address.
pub const ADDRESS_V0_SECP256K1ETH_CONTEXT: &[u8] = b"oasis-runtime-sdk/address: secp256k1eth";
/// Current address version.
pub const ADDRESS_V0_VERSION: u8 = 0;
/// Human readable part of native bech32 addresses.
pub const ADDRESS_BECH32_HRP: Hrp = Hrp::parse_unchecked("oasis");

/// Size of an address in bytes.
pub const ADDRESS_SIZE: usize = 21;

/// A 21-byte versioned account address.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address(pub [u8; ADDRESS_SIZE]);

impl Address {
    /// Derive an address from a context, version and key material.
    pub fn new(context: &[u8], version: u8, data: &[u8]) -> Self {
        let hash = Sha512_256Hash::digest_bytes_list(&[context, &[version], data]);
        let mut bytes = [0u8; ADDRESS_SIZE];
        bytes[0] = version;
        bytes[1..].copy_from_slice(hash.truncated(ADDRESS_SIZE - 1));
        Self(bytes)
    }

    /// The address controlled by the given signature address spec.
    pub fn from_sigspec(spec: &SignatureAddressSpec) -> Result<Self, CoreError> {
        match spec {
            SignatureAddressSpec::Ed25519(pk) => Ok(Self::new(
                ADDRESS_V0_ED25519_CONTEXT,
                ADDRESS_V0_VERSION,
                pk.as_bytes(),
            )),
            SignatureAddressSpec::Secp256k1Eth(pk) => Ok(Self::from_eth(&pk.eth_address()?)),
        }
    }

    /// The address of a 20-byte Ethereum address.
    pub fn from_eth(eth: &[u8; 20]) -> Self {
        Self::new(ADDRESS_V0_SECP256K1ETH_CONTEXT, ADDRESS_V0_VERSION, eth)
    }

    /// Create from raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CoreError> {
        let arr: [u8; ADDRESS_SIZE] = bytes.try_into().map_err(|_| {
            CoreError::BadAddress(format!(
                "expected {ADDRESS_SIZE} bytes, got {}",
                bytes.len()
            ))
        })?;
        Ok(Self(arr))
    }

    /// Get raw bytes.
    pub const fn as_bytes(&self) -> &[u8; ADDRESS_SIZE] {
        &self.0
    }

    /// Parse a native bech32 address.
    pub fn from_bech32(s: &str) -> Result<Self, CoreError> {
        let (hrp, data) =
            bech32::decode(s).map_err(|e| CoreError::BadAddress(format!("{s}: {e}")))?;
        if hrp != ADDRESS_BECH32_HRP {
            return Err(CoreError::BadAddress(format!(
                "{s}: unexpected human readable part '{hrp}'"
            )));
        }
        Self::from_bytes(&data)
    }

    /// Native bech32 text form.
    pub fn to_bech32(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        bech32::encode_to_fmt::<Bech32, _>(f, ADDRESS_BECH32_HRP, &self.0).map_err(|_| fmt::Error)
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({self})")
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_bech32(&s).map_err(D::Error::custom)
    }
}

/// Parse hex Ethereum address text: exactly 40 hex digits in any case, with
/// an optional `0x`/`0X` prefix.
pub fn parse_eth_address(s: &str) -> Option<[u8; 20]> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    if digits.len() != 40 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let mut out = [0u8; 20];
    hex::decode_to_slice(digits, &mut out).ok()?;
    Some(out)
}

/// EIP-55 mixed-case checksum form of an Ethereum address, `0x` prefixed.
pub fn eth_checksum_hex(addr: &[u8; 20]) -> String {
    let lower = hex::encode(addr);
    let hash = keccak256(lower.as_bytes());
    let mut out = String::with_capacity(42);
    out.push_str("0x");
    for (i, c) in lower.chars().enumerate() {
        let nibble = (hash[i / 2] >> if i % 2 == 0 { 4 } else { 0 }) & 0x0f;
        if c.is_ascii_alphabetic() && nibble >= 8 {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Resolve textual address input.
///
/// An empty string is the unspecified address (`None`). Ethereum hex text in
/// any case, with or without `0x`, resolves to its secp256k1eth address. Text
/// starting with `oasis1` is decoded as a native address. Anything else is
/// [`CoreError::BadAddress`].
pub fn resolve_address(text: &str) -> Result<Option<Address>, CoreError> {
    if text.is_empty() {
        return Ok(None);
    }
    if let Some(eth) = parse_eth_address(text) {
        return Ok(Some(Address::from_eth(&eth)));
    }
    if text.starts_with("oasis1") {
        return Address::from_bech32(text).map(Some);
    }
    Err(CoreError::BadAddress(text.to_string()))
}
