//! Protocol parameters shared by the key builder, the prover and the verifier.

/// The smallest domain is `2^3`: the quotient has degree `3n + 5`, which must stay below `4n`.
pub const MIN_DOMAIN_POWER: u32 = 3;

/// The quotient is evaluated on a coset of the domain this many times larger.
pub const QUOTIENT_EXTENSION: usize = 4;

/// Number of blinding scalars sampled per proof: two for each wire, three for `Z`,
/// two for the split of `t`.
pub const NUM_BLINDING_SCALARS: usize = 11;

/// A domain of size `n` needs `n + SRS_HEADROOM` powers of tau in G1.
pub const SRS_HEADROOM: usize = 6;

/// Number of selector columns of an arithmetic gate.
pub const NUM_SELECTORS: usize = 5;

/// Number of wire columns.
pub const NUM_WIRES: usize = 3;

/// Upper bound on the candidates tried for each coset generator.
pub const MAX_COSET_TRIES: u64 = 1 << 16;

/// The label the default transcript is created with.
pub const PLONK_TRANSCRIPT_LABEL: &[u8] = b"Kite PLONK Proof";
