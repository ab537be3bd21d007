//! A PLONK proof system over BN254 with KZG commitments.
//!
//! R1CS circuits are lowered to PLONK rows by [`plonk::arithmetizer`], preprocessed into
//! keys by [`plonk::indexer`], then proven and verified with a five-round Fiat-Shamir
//! protocol ([`plonk::prover`], [`plonk::verifier`]).
#![deny(warnings)]
#![allow(clippy::needless_borrow)]
#![allow(clippy::upper_case_acronyms)]

#[macro_use]
extern crate serde_derive;

/// Module for errors.
pub mod errors;

/// Module for the PLONK protocol.
pub mod plonk;

/// Module for polynomials and polynomial commitments.
pub mod poly_commit;
