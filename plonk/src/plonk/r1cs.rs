use crate::errors::{PlonkError, Result};
use ark_std::collections::BTreeMap;
use kite_algebra::prelude::*;

/// Index of a signal in the witness vector. Signal 0 is the constant one.
pub type Signal = usize;

/// A sparse linear combination `sum coef_i * w[signal_i]` over the witness `w`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinearCombination<F> {
    /// The `(signal, coefficient)` terms, possibly repeating a signal.
    pub terms: Vec<(Signal, F)>,
}

impl<F: Scalar> LinearCombination<F> {
    /// The empty combination, equal to zero.
    pub fn new() -> Self {
        Self { terms: vec![] }
    }

    /// Build a combination from raw terms.
    pub fn from_terms(terms: Vec<(Signal, F)>) -> Self {
        Self { terms }
    }

    /// The combination `1 * w[signal]`.
    pub fn signal(signal: Signal) -> Self {
        Self::from_terms(vec![(signal, F::one())])
    }

    /// The constant combination `value * w[0]`.
    pub fn constant(value: F) -> Self {
        Self::from_terms(vec![(0, value)])
    }

    /// Append the term `coef * w[signal]`.
    pub fn with(mut self, signal: Signal, coef: F) -> Self {
        self.terms.push((signal, coef));
        self
    }

    /// Largest signal index referenced, if any.
    pub fn max_signal(&self) -> Option<Signal> {
        self.terms.iter().map(|(s, _)| *s).max()
    }

    /// Evaluate the combination on a witness.
    pub fn eval(&self, witness: &[F]) -> Result<F> {
        let mut sum = F::zero();
        for (signal, coef) in self.terms.iter() {
            let value = witness
                .get(*signal)
                .ok_or(PlonkError::WitnessIncomplete(witness.len()))?;
            sum.add_assign(&value.mul(coef));
        }
        Ok(sum)
    }

    /// Split into the constant part and the non-constant terms, sorted by signal,
    /// with repeated signals merged and zero coefficients dropped.
    pub fn normalize(&self) -> (F, Vec<(Signal, F)>) {
        let mut merged: BTreeMap<Signal, F> = BTreeMap::new();
        for (signal, coef) in self.terms.iter() {
            merged
                .entry(*signal)
                .and_modify(|c| c.add_assign(coef))
                .or_insert(*coef);
        }
        let constant = merged.remove(&0).unwrap_or_else(F::zero);
        let terms = merged.into_iter().filter(|(_, c)| !c.is_zero()).collect();
        (constant, terms)
    }
}

/// One rank-1 constraint `<a, w> * <b, w> = <c, w>`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constraint<F> {
    /// Left factor.
    pub a: LinearCombination<F>,
    /// Right factor.
    pub b: LinearCombination<F>,
    /// Product.
    pub c: LinearCombination<F>,
}

/// A rank-1 constraint system over `n_vars` signals.
///
/// Signal 0 is the constant one, signals `1..=n_public` are the public signals
/// (outputs first, then public inputs), the rest are private.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct R1CS<F> {
    /// Number of signals, including the constant one.
    pub n_vars: usize,
    /// Number of public signals.
    pub n_public: usize,
    /// The constraints.
    pub constraints: Vec<Constraint<F>>,
}

impl<F: Scalar> R1CS<F> {
    /// An empty system over `n_vars` signals of which `n_public` are public.
    pub fn new(n_vars: usize, n_public: usize) -> Self {
        Self {
            n_vars,
            n_public,
            constraints: vec![],
        }
    }

    /// Append the constraint `a * b = c`.
    pub fn add_constraint(
        &mut self,
        a: LinearCombination<F>,
        b: LinearCombination<F>,
        c: LinearCombination<F>,
    ) {
        self.constraints.push(Constraint { a, b, c });
    }

    /// Check that every signal is in range and the public signals exist.
    pub fn check(&self) -> Result<()> {
        if self.n_vars == 0 || self.n_public >= self.n_vars {
            return Err(PlonkError::MalformedR1CS);
        }
        let out_of_range = self
            .constraints
            .iter()
            .flat_map(|c| [&c.a, &c.b, &c.c])
            .filter_map(|lc| lc.max_signal())
            .any(|s| s >= self.n_vars);
        if out_of_range {
            return Err(PlonkError::MalformedR1CS);
        }
        Ok(())
    }

    /// Test whether the witness satisfies every constraint.
    pub fn is_satisfied(&self, witness: &[F]) -> bool {
        if witness.len() < self.n_vars || witness.first() != Some(&F::one()) {
            return false;
        }
        self.constraints.iter().all(|c| {
            match (c.a.eval(witness), c.b.eval(witness), c.c.eval(witness)) {
                (Ok(a), Ok(b), Ok(c)) => a.mul(&b) == c,
                _ => false,
            }
        })
    }
}
