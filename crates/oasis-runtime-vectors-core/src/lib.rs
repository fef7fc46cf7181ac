//! # Oasis Runtime Vectors Core
//!
//! Pure primitives for building and signing runtime transactions the way the
//! Oasis runtime SDK does, byte for byte.
//!
//! This crate contains no I/O. Every function is a deterministic computation
//! over fixed inputs, which is what makes the generated vectors reproducible.
//!
//! ## Key Types
//!
//! - [`Transaction`] - Runtime transaction envelope (call + auth info)
//! - [`UnverifiedTransaction`] - Encoded transaction plus raw signatures
//! - [`Address`] - 21-byte versioned account address
//! - [`TestKey`] - Deterministic named identity (Alice, Bob, Charlie, Dave, Eve)
//! - [`SignatureContext`] - Per-runtime domain separation context
//!
//! ## Canonicalization
//!
//! All transactions are encoded using deterministic CBOR. See [`canonical`] module.

pub mod address;
pub mod canonical;
pub mod crypto;
pub mod error;
pub mod json;
pub mod modules;
pub mod signing;
pub mod testing;
pub mod transaction;
pub mod types;

pub use address::{resolve_address, Address};
pub use canonical::{decode_canonical, encode_canonical, FromCbor, ToCbor};
pub use crypto::{
    Ed25519PublicKey, Ed25519Signer, MemorySigner, PublicKey, Secp256k1PublicKey,
    Secp256k1Signer, Sha512_256Hash, Signer,
};
pub use error::{CoreError, ValidationError};
pub use signing::{SignatureContext, TransactionSigner};
pub use testing::{test_key, TestKey};
pub use transaction::{
    AddressSpec, AuthInfo, AuthProof, Call, SignatureAddressSpec, SignerInfo, Transaction,
    UnverifiedTransaction,
};
pub use types::{BaseUnits, Denomination, Fee, Namespace, Quantity};
