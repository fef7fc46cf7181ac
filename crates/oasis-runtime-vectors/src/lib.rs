//! # Oasis Runtime Vectors
//!
//! Deterministic generator of runtime transaction test vectors.
//!
//! Every vector pairs a transaction built from a fixed case table with the
//! test key that signs it, the signature context, the canonical CBOR bytes
//! before and after signing, and the details a hardware wallet checks the
//! rendering against. Running the generator twice yields byte-identical JSON.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use oasis_runtime_vectors::{generate_runtime_vectors, write_json, GeneratorConfig};
//!
//! fn example() -> oasis_runtime_vectors::Result<()> {
//!     let vectors = generate_runtime_vectors(&GeneratorConfig::default())?;
//!     write_json(std::io::stdout().lock(), &vectors)
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `oasis_runtime_vectors::core` - Transaction model, signing and test keys

pub mod cases;
pub mod config;
pub mod emit;
pub mod error;
pub mod generator;
pub mod legacy;
pub mod logging;
pub mod vector;

pub use oasis_runtime_vectors_core as core;

pub use config::GeneratorConfig;
pub use emit::{to_json_pretty, write_json};
pub use error::{GeneratorError, Result};
pub use generator::{generate_runtime_vectors, Generator};
pub use legacy::{generate_legacy_vectors, LegacyConfig, LegacyTestVector};
pub use logging::init_logging;
pub use vector::{make_runtime_test_vector, RuntimeTestVector, SignedTxRecord, TxDetails};
