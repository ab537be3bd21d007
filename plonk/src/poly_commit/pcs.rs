use crate::poly_commit::{errors::PolyComSchemeError, field_polynomial::FpPolynomial};
use kite_algebra::prelude::*;
use serde::{Deserialize, Serialize};
use ark_std::fmt::Debug;

pub(crate) type Result<T> = core::result::Result<T, PolyComSchemeError>;

/// The trait for homomorphic polynomial commitment or polynomial.
///
/// Implemented both by commitments and by the polynomials themselves, so that a
/// linear combination can be written once and applied to either.
pub trait HomomorphicPolyComElem: Clone {
    /// This is the scalar field of the polynomial.
    type Scalar;

    /// Add the underlying polynomials.
    fn add(&self, other: &Self) -> Self;

    /// Add assign the underlying polynomials.
    fn add_assign(&mut self, other: &Self);

    /// Subtract the underlying polynomials.
    fn sub(&self, other: &Self) -> Self;

    /// Subtract assign the underlying polynomials.
    fn sub_assign(&mut self, other: &Self);

    /// Multiply underlying polynomial by scalar `exp`.
    fn mul(&self, exp: &Self::Scalar) -> Self;

    /// Multiply underlying polynomial by scalar `exp`.
    fn mul_assign(&mut self, exp: &Self::Scalar);
}

/// Trait for polynomial commitment scheme.
pub trait PolyComScheme: Sized + Sync + Send {
    /// Type of prime field.
    type Field: Domain;

    /// Type of commitment produces, need to implement `HomomorphicPolyComElem`.
    type Commitment: HomomorphicPolyComElem<Scalar = Self::Field>
        + KiteFromToBytes
        + Debug
        + Default
        + PartialEq
        + Eq
        + Clone
        + Serialize
        + for<'de> Deserialize<'de>
        + Sync
        + Send;

    /// Return the max degree of the polynomials that can be committed.
    fn max_degree(&self) -> usize;

    /// Commit to the polynomial, the commitment is binding.
    fn commit(&self, polynomial: &FpPolynomial<Self::Field>) -> Result<Self::Commitment>;

    /// Check that a commitment received from outside lies in the commitment group.
    fn is_valid_commitment(&self, commitment: &Self::Commitment) -> bool;

    /// Evaluate the polynomial at the point.
    fn eval(&self, poly: &FpPolynomial<Self::Field>, point: &Self::Field) -> Self::Field {
        poly.eval(point)
    }

    /// Compute an opening proof of `poly` at `x`.
    fn prove(
        &self,
        poly: &FpPolynomial<Self::Field>,
        x: &Self::Field,
        max_degree: usize,
    ) -> Result<Self::Commitment>;

    /// Verify an evaluation proof that polynomial inside commitment
    /// evaluates to `eval` on input `point`.
    fn verify(
        &self,
        cm: &Self::Commitment,
        point: &Self::Field,
        eval: &Self::Field,
        proof: &Self::Commitment,
    ) -> Result<()>;

    /// Batch verify evaluation proofs of several commitments, each at its own point,
    /// folded together by powers of `challenge`.
    fn batch_verify_diff_points(
        &self,
        cm_vec: &[Self::Commitment],
        point_vec: &[Self::Field],
        eval_vec: &[Self::Field],
        proofs: &[Self::Commitment],
        challenge: &Self::Field,
    ) -> Result<()>;

    /// Keep only the powers needed to commit polynomials of degree at most `max_degree`.
    fn trim(&self, max_degree: usize) -> Result<Self>;

    /// Shrink this to only for verifier use.
    fn shrink_to_verifier_only(&self) -> Self;
}
