//! The PLONK implementation.

/// Module for protocol constants.
pub mod constants;

/// Module for R1CS circuits.
pub mod r1cs;

/// Module for gates and their kinds.
pub mod gate;

/// Module for lowering R1CS to gates.
pub mod arithmetizer;

/// Module for the evaluation domain.
pub mod domain;

/// Module for indexer.
pub mod indexer;

/// Module for help functions.
pub(crate) mod helpers;

/// Module for the state of one proof.
pub mod session;

/// Module for transcript.
pub(crate) mod transcript;

/// Module for prover.
pub mod prover;

/// Module for verifier.
pub mod verifier;

pub use helpers::PlonkChallenges;
