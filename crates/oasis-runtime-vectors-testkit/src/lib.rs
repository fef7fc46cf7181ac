//! # Oasis Runtime Vectors Testkit
//!
//! Testing utilities for the runtime vector generator.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: A [`Scenario`] that builds and signs single vectors outside the full corpus
//! - **Generators**: Proptest strategies for addresses, fees and signing parameters
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use oasis_runtime_vectors_testkit::generators::{vector_from_params, SigningParams};
//!
//! proptest! {
//!     #[test]
//!     fn signing_is_deterministic(params: SigningParams) {
//!         let v1 = vector_from_params(&params).unwrap();
//!         let v2 = vector_from_params(&params).unwrap();
//!         prop_assert_eq!(v1, v2);
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use oasis_runtime_vectors_testkit::fixtures::Scenario;
//!
//! let scenario = Scenario::new("Alice").unwrap().with_nonce(7);
//! let vector = scenario.deposit("", 1000).unwrap();
//! assert!(vector.valid);
//! ```

pub mod fixtures;
pub mod generators;

pub use fixtures::Scenario;
pub use generators::{vector_from_params, SigningParams};
