//! # tmail Testkit
//!
//! Testing utilities for tmail.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Doubles**: storage backends that fail, count calls, or add latency
//! - **Fixtures**: ready-made candidates and message threads
//! - **Generators**: Proptest strategies for property-based testing
//! - **Golden vectors**: known canonical encodings, pinned byte for byte
//!
//! ## Golden Vectors
//!
//! ```rust
//! use tmail_testkit::vectors::verify_all_vectors;
//!
//! verify_all_vectors().unwrap();
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use tmail_testkit::generators::arb_root_candidate;
//!
//! proptest! {
//!     #[test]
//!     fn id_is_deterministic(c in arb_root_candidate()) {
//!         let a = c.clone().into_body(None).compute_id();
//!         let b = c.into_body(None).compute_id();
//!         prop_assert_eq!(a, b);
//!     }
//! }
//! ```

pub mod doubles;
pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use doubles::{CountingStore, FailingGateway, SlowStore, UnavailableOracle};
pub use fixtures::{reply, root, thread};
pub use vectors::{all_vectors, verify_all_vectors, GoldenVector};
