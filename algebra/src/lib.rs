//! Field and group arithmetic used by the Kite proof system.
//!
//! The crate wraps the arkworks BN254 implementation behind a small set of traits
//! ([`traits::Scalar`], [`traits::Domain`], [`traits::Group`], [`traits::Pairing`])
//! so that the protocol code never touches arkworks types directly.
#![allow(clippy::upper_case_acronyms)]
#![allow(clippy::should_implement_trait)]

/// Module for the BN254 curve.
pub mod bn254;

/// Module for errors.
pub mod errors;

/// Module for the prelude.
pub mod prelude;

/// Module for test randomness.
pub mod rand_helper;

/// Module for serialization of scalars and group elements.
pub mod serialization;

/// Module for traits.
pub mod traits;

/// Module for utils.
pub mod utils;

pub use ark_std::{borrow, cmp, fmt, iter, marker, ops, rand, One, UniformRand, Zero};
