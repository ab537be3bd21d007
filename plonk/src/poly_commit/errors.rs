use ark_std::{error, fmt};

/// Polynomial commitment scheme errors.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PolyComSchemeError {
    /// It is not possible to compute the proof as F(x) != y.
    PCSProveEvalError,
    /// The evaluation proof does not verify against the commitment.
    PCSVerifyEvalError,
    /// The degree of the polynomial is higher than the maximum degree allowed.
    DegreeError,
    /// The batch inputs have mismatched or empty lengths.
    ParameterError,
    /// The public parameters could not be decoded.
    DeserializationError,
}

impl fmt::Display for PolyComSchemeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use PolyComSchemeError::*;
        f.write_str(match self {
            PCSProveEvalError => "It is not possible to compute the proof as F(x) != y.",
            PCSVerifyEvalError => "The evaluation proof is not valid.",
            DegreeError => {
                "The degree of the polynomial is higher than the maximum degree allowed."
            }
            ParameterError => "The batch parameters have inconsistent lengths.",
            DeserializationError => "Could not deserialize the public parameters.",
        })
    }
}

impl error::Error for PolyComSchemeError {}
