use crate::poly_commit::errors::PolyComSchemeError;
use ark_std::{error, fmt};
use kite_algebra::prelude::AlgebraError;

pub(crate) type Result<T> = core::result::Result<T, PlonkError>;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[allow(missing_docs)]
pub enum PlonkError {
    /// Algebra error
    Algebra(AlgebraError),
    /// The R1CS refers to unknown signals or has no constraint at all.
    MalformedR1CS,
    /// The circuit needs a domain of this size, which the field or the SRS cannot support.
    CircuitTooLarge(usize),
    /// No coset representatives were found within the probing bound.
    CosetCollision,
    /// The SRS only supports polynomials up to this degree.
    SrsTooShort(usize),
    /// The witness only has this many signals.
    WitnessIncomplete(usize),
    /// The gate at this row does not hold on the witness.
    UnsatisfiedGate(usize),
    /// The grand product does not close over the domain.
    CopyConstraintViolation,
    /// The quotient numerator is not divisible by the vanishing polynomial.
    TDivisibilityError,
    /// An opening quotient is not exact.
    OpeningDivisionError,
    /// Polynomial commitment error.
    CommitmentError,
    /// The degree of the polynomial is higher than the maximum degree supported.
    DegreeError,
    /// Division by zero.
    DivisionByZero,
    /// Challenge error
    ChallengeError,
    /// Function params error.
    FuncParamsError,
}

impl fmt::Display for PlonkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use PlonkError::*;
        match self {
            Algebra(e) => write!(f, "Algebra: {}", e),
            MalformedR1CS => f.write_str("Malformed R1CS."),
            CircuitTooLarge(n) => write!(f, "Circuit too large: domain size {}.", n),
            CosetCollision => f.write_str("Could not find non-colliding coset generators."),
            SrsTooShort(d) => write!(f, "SRS too short: max degree {}.", d),
            WitnessIncomplete(n) => write!(f, "Witness incomplete: {} signals.", n),
            UnsatisfiedGate(i) => write!(f, "Gate {} is not satisfied.", i),
            CopyConstraintViolation => f.write_str("Copy constraints do not match."),
            TDivisibilityError => f.write_str("Quotient polynomial is not divisible by Z_H."),
            OpeningDivisionError => f.write_str("Opening polynomial division is not exact."),
            CommitmentError => f.write_str("Commitment error."),
            DegreeError => f.write_str(
                "The degree of the polynomial is higher than the maximum degree supported.",
            ),
            DivisionByZero => f.write_str("Division by zero."),
            ChallengeError => f.write_str("Challenge error"),
            FuncParamsError => f.write_str("Function params error"),
        }
    }
}

impl error::Error for PlonkError {}

impl From<AlgebraError> for PlonkError {
    fn from(e: AlgebraError) -> PlonkError {
        PlonkError::Algebra(e)
    }
}

impl From<PolyComSchemeError> for PlonkError {
    fn from(e: PolyComSchemeError) -> PlonkError {
        match e {
            PolyComSchemeError::DegreeError => PlonkError::DegreeError,
            PolyComSchemeError::PCSProveEvalError => PlonkError::OpeningDivisionError,
            _ => PlonkError::CommitmentError,
        }
    }
}
