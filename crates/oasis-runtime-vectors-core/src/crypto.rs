//! Cryptographic primitives: SHA-512/256 and Keccak-256 hashing, Ed25519 and
//! secp256k1 signing.
//!
//! Signatures are always produced over a domain separated digest:
//! `SHA-512/256(context || message)`. Ed25519 signs the 32-byte digest as its
//! message, secp256k1 signs it as an ECDSA prehash and emits DER.

use ed25519_dalek::{
    Signature as DalekSignature, Signer as _, SigningKey as DalekSigningKey,
    VerifyingKey as DalekVerifyingKey,
};
use k256::ecdsa::{
    signature::hazmat::{PrehashSigner, PrehashVerifier},
    Signature as EcdsaSignature, SigningKey as EcdsaSigningKey,
    VerifyingKey as EcdsaVerifyingKey,
};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha512_256};
use sha3::Keccak256;
use std::fmt;

use crate::error::CoreError;

/// A 32-byte SHA-512/256 hash.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Sha512_256Hash(pub [u8; 32]);

impl Sha512_256Hash {
    /// Compute the SHA-512/256 hash of data.
    pub fn digest(data: &[u8]) -> Self {
        Self::digest_bytes_list(&[data])
    }

    /// Compute the SHA-512/256 hash of the concatenation of all parts.
    pub fn digest_bytes_list(parts: &[&[u8]]) -> Self {
        let mut hasher = Sha512_256::new();
        for part in parts {
            hasher.update(part);
        }
        Self(hasher.finalize().into())
    }

    /// Get raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// The first `n` bytes of the hash.
    pub fn truncated(&self, n: usize) -> &[u8] {
        &self.0[..n]
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for Sha512_256Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SHA512_256({}...)", &self.to_hex()[..8])
    }
}

impl AsRef<[u8]> for Sha512_256Hash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Keccak-256 as used by Ethereum.
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    Keccak256::digest(data).into()
}

/// Build the digest a signer signs for `message` under `context`.
pub fn prepare_signer_message(context: &[u8], message: &[u8]) -> Sha512_256Hash {
    Sha512_256Hash::digest_bytes_list(&[context, message])
}

/// A 32-byte Ed25519 public key.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ed25519PublicKey(#[serde(with = "crate::json::base64_array")] pub [u8; 32]);

impl Ed25519PublicKey {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Verify a signature over `message` under `context`.
    pub fn verify(
        &self,
        context: &[u8],
        message: &[u8],
        signature: &[u8],
    ) -> Result<(), CoreError> {
        let verifying_key =
            DalekVerifyingKey::from_bytes(&self.0).map_err(|_| CoreError::InvalidPublicKey)?;
        let sig_bytes: [u8; 64] = signature
            .try_into()
            .map_err(|_| CoreError::InvalidSignature)?;
        let sig = DalekSignature::from_bytes(&sig_bytes);
        let digest = prepare_signer_message(context, message);
        verifying_key
            .verify_strict(digest.as_bytes(), &sig)
            .map_err(|_| CoreError::InvalidSignature)
    }
}

impl fmt::Debug for Ed25519PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ed25519Pub({}...)", &self.to_hex()[..8])
    }
}

impl AsRef<[u8]> for Ed25519PublicKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// A 33-byte SEC1 compressed secp256k1 public key.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Secp256k1PublicKey(#[serde(with = "crate::json::base64_array")] pub [u8; 33]);

impl Secp256k1PublicKey {
    /// Parse from any SEC1 encoding, normalizing to the compressed form.
    pub fn from_sec1_bytes(bytes: &[u8]) -> Result<Self, CoreError> {
        let key =
            EcdsaVerifyingKey::from_sec1_bytes(bytes).map_err(|_| CoreError::InvalidPublicKey)?;
        Ok(Self::from_verifying_key(&key))
    }

    fn from_verifying_key(key: &EcdsaVerifyingKey) -> Self {
        let point = key.to_encoded_point(true);
        let mut arr = [0u8; 33];
        arr.copy_from_slice(point.as_bytes());
        Self(arr)
    }

    /// Get the compressed bytes.
    pub const fn as_bytes(&self) -> &[u8; 33] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// The uncompressed point without the 0x04 tag (X || Y).
    pub fn to_uncompressed_untagged(&self) -> Result<[u8; 64], CoreError> {
        let key =
            EcdsaVerifyingKey::from_sec1_bytes(&self.0).map_err(|_| CoreError::InvalidPublicKey)?;
        let point = key.to_encoded_point(false);
        let mut arr = [0u8; 64];
        arr.copy_from_slice(&point.as_bytes()[1..]);
        Ok(arr)
    }

    /// Ethereum address: `keccak256(X || Y)[12..32]`.
    pub fn eth_address(&self) -> Result<[u8; 20], CoreError> {
        let untagged = self.to_uncompressed_untagged()?;
        let hash = keccak256(&untagged);
        let mut addr = [0u8; 20];
        addr.copy_from_slice(&hash[12..]);
        Ok(addr)
    }

    /// Verify a DER signature over `message` under `context`.
    pub fn verify(
        &self,
        context: &[u8],
        message: &[u8],
        signature: &[u8],
    ) -> Result<(), CoreError> {
        let key =
            EcdsaVerifyingKey::from_sec1_bytes(&self.0).map_err(|_| CoreError::InvalidPublicKey)?;
        let sig = EcdsaSignature::from_der(signature).map_err(|_| CoreError::InvalidSignature)?;
        let digest = prepare_signer_message(context, message);
        key.verify_prehash(digest.as_bytes(), &sig)
            .map_err(|_| CoreError::InvalidSignature)
    }
}

impl fmt::Debug for Secp256k1PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secp256k1Pub({}...)", &self.to_hex()[..8])
    }
}

impl AsRef<[u8]> for Secp256k1PublicKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// A public key of any supported algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PublicKey {
    Ed25519(Ed25519PublicKey),
    Secp256k1(Secp256k1PublicKey),
}

impl PublicKey {
    /// Raw key bytes (32 for Ed25519, 33 for compressed secp256k1).
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            PublicKey::Ed25519(pk) => pk.as_ref(),
            PublicKey::Secp256k1(pk) => pk.as_ref(),
        }
    }

    pub fn verify(
        &self,
        context: &[u8],
        message: &[u8],
        signature: &[u8],
    ) -> Result<(), CoreError> {
        match self {
            PublicKey::Ed25519(pk) => pk.verify(context, message, signature),
            PublicKey::Secp256k1(pk) => pk.verify(context, message, signature),
        }
    }
}

/// Something that can produce domain separated signatures.
pub trait Signer {
    /// The public key matching this signer.
    fn public_key(&self) -> PublicKey;

    /// Sign `message` under `context`.
    fn context_sign(&self, context: &[u8], message: &[u8]) -> Result<Vec<u8>, CoreError>;
}

/// An in-memory Ed25519 signer.
#[derive(Clone)]
pub struct Ed25519Signer {
    signing_key: DalekSigningKey,
}

impl Ed25519Signer {
    /// Create from a 32-byte seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            signing_key: DalekSigningKey::from_bytes(seed),
        }
    }

    /// Derive a test signer: the seed is `SHA-512/256(seed_text)`.
    pub fn new_test(seed_text: &str) -> Self {
        let seed = Sha512_256Hash::digest(seed_text.as_bytes());
        Self::from_seed(seed.as_bytes())
    }

    pub fn ed25519_public_key(&self) -> Ed25519PublicKey {
        Ed25519PublicKey(self.signing_key.verifying_key().to_bytes())
    }

    /// The 64-byte key pair (seed || public key).
    pub fn keypair_bytes(&self) -> [u8; 64] {
        self.signing_key.to_keypair_bytes()
    }
}

impl Signer for Ed25519Signer {
    fn public_key(&self) -> PublicKey {
        PublicKey::Ed25519(self.ed25519_public_key())
    }

    fn context_sign(&self, context: &[u8], message: &[u8]) -> Result<Vec<u8>, CoreError> {
        let digest = prepare_signer_message(context, message);
        Ok(self.signing_key.sign(digest.as_bytes()).to_bytes().to_vec())
    }
}

impl fmt::Debug for Ed25519Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ed25519Signer({:?})", self.ed25519_public_key())
    }
}

/// An in-memory secp256k1 signer.
#[derive(Clone)]
pub struct Secp256k1Signer {
    signing_key: EcdsaSigningKey,
}

impl Secp256k1Signer {
    /// Create from a 32-byte big-endian scalar.
    pub fn from_bytes(scalar: &[u8]) -> Result<Self, CoreError> {
        let signing_key = EcdsaSigningKey::from_slice(scalar)
            .map_err(|e| CoreError::Sign(format!("invalid secp256k1 scalar: {e}")))?;
        Ok(Self { signing_key })
    }

    pub fn secp256k1_public_key(&self) -> Secp256k1PublicKey {
        Secp256k1PublicKey::from_verifying_key(self.signing_key.verifying_key())
    }

    /// The 32-byte private scalar.
    pub fn scalar_bytes(&self) -> [u8; 32] {
        let mut out = [0u8; 32];
        out.copy_from_slice(&self.signing_key.to_bytes());
        out
    }
}

impl Signer for Secp256k1Signer {
    fn public_key(&self) -> PublicKey {
        PublicKey::Secp256k1(self.secp256k1_public_key())
    }

    fn context_sign(&self, context: &[u8], message: &[u8]) -> Result<Vec<u8>, CoreError> {
        let digest = prepare_signer_message(context, message);
        let sig: EcdsaSignature = self
            .signing_key
            .sign_prehash(digest.as_bytes())
            .map_err(|e| CoreError::Sign(e.to_string()))?;
        let sig = sig.normalize_s().unwrap_or(sig);
        Ok(sig.to_der().as_bytes().to_vec())
    }
}

impl fmt::Debug for Secp256k1Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secp256k1Signer({:?})", self.secp256k1_public_key())
    }
}

/// A signer held in memory, of either algorithm.
#[derive(Debug, Clone)]
pub enum MemorySigner {
    Ed25519(Ed25519Signer),
    Secp256k1(Secp256k1Signer),
}

impl Signer for MemorySigner {
    fn public_key(&self) -> PublicKey {
        match self {
            MemorySigner::Ed25519(s) => s.public_key(),
            MemorySigner::Secp256k1(s) => s.public_key(),
        }
    }

    fn context_sign(&self, context: &[u8], message: &[u8]) -> Result<Vec<u8>, CoreError> {
        match self {
            MemorySigner::Ed25519(s) => s.context_sign(context, message),
            MemorySigner::Secp256k1(s) => s.context_sign(context, message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTEXT: &[u8] = b"test context";

    #[test]
    fn test_sha512_256_known_answer() {
        // NIST SHA-512/256 test vector for "abc".
        assert_eq!(
            Sha512_256Hash::digest(b"abc").to_hex(),
            "53048e2681941ef99b2e29b76b4c7dabe4c2d0c634fc6d46e0e2f13107e7af23"
        );
        assert_eq!(
            Sha512_256Hash::digest_bytes_list(&[b"a", b"bc"]),
            Sha512_256Hash::digest(b"abc")
        );
    }

    #[test]
    fn test_keccak256_known_answer() {
        assert_eq!(
            hex::encode(keccak256(b"")),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn test_ed25519_sign_verify() {
        let signer = Ed25519Signer::from_seed(&[0x42; 32]);
        let message = b"hello world";
        let signature = signer.context_sign(CONTEXT, message).unwrap();

        signer.public_key().verify(CONTEXT, message, &signature).unwrap();

        // Tampered message should fail
        assert!(signer.public_key().verify(CONTEXT, b"hello worlD", &signature).is_err());
        // Different context should fail
        assert!(signer.public_key().verify(b"other", message, &signature).is_err());
    }

    #[test]
    fn test_ed25519_deterministic_from_seed() {
        let s1 = Ed25519Signer::new_test("seed");
        let s2 = Ed25519Signer::new_test("seed");
        assert_eq!(s1.public_key(), s2.public_key());
        assert_eq!(
            s1.context_sign(CONTEXT, b"m").unwrap(),
            s2.context_sign(CONTEXT, b"m").unwrap()
        );
        assert_eq!(&s1.keypair_bytes()[32..], s1.ed25519_public_key().as_bytes());
    }

    #[test]
    fn test_secp256k1_sign_verify() {
        let signer = Secp256k1Signer::from_bytes(&[0x11; 32]).unwrap();
        let message = b"hello world";
        let signature = signer.context_sign(CONTEXT, message).unwrap();

        // DER sequence tag.
        assert_eq!(signature[0], 0x30);
        signer.public_key().verify(CONTEXT, message, &signature).unwrap();
        assert!(signer.public_key().verify(CONTEXT, b"tampered", &signature).is_err());
    }

    #[test]
    fn test_secp256k1_signatures_deterministic() {
        let signer = Secp256k1Signer::from_bytes(&[0x11; 32]).unwrap();
        assert_eq!(
            signer.context_sign(CONTEXT, b"m").unwrap(),
            signer.context_sign(CONTEXT, b"m").unwrap()
        );
        assert_eq!(signer.scalar_bytes(), [0x11; 32]);
    }

    #[test]
    fn test_secp256k1_rejects_zero_scalar() {
        assert!(Secp256k1Signer::from_bytes(&[0u8; 32]).is_err());
    }

    #[test]
    fn test_secp256k1_key_normalized_to_compressed() {
        let signer = Secp256k1Signer::from_bytes(&[0x11; 32]).unwrap();
        let pk = signer.secp256k1_public_key();
        let mut uncompressed = vec![0x04];
        uncompressed.extend_from_slice(&pk.to_uncompressed_untagged().unwrap());
        assert_eq!(Secp256k1PublicKey::from_sec1_bytes(&uncompressed).unwrap(), pk);
    }

    #[test]
    fn test_signature_wrong_algorithm_rejected() {
        let ed = Ed25519Signer::from_seed(&[0x01; 32]);
        let secp = Secp256k1Signer::from_bytes(&[0x01; 32]).unwrap();
        let sig = ed.context_sign(CONTEXT, b"m").unwrap();
        assert!(secp.public_key().verify(CONTEXT, b"m", &sig).is_err());
    }
}
