use crate::{
    errors::{PlonkError, Result},
    plonk::{
        arithmetizer::CircuitBuilder,
        constants::NUM_SELECTORS,
        r1cs::{Constraint, LinearCombination, Signal},
    },
    poly_commit::pcs::HomomorphicPolyComElem,
};
use kite_algebra::prelude::*;

/// One row of the arithmetization, enforcing
/// `qm * a * b + ql * a + qr * b + qo * c + qc = 0` on the wires `a = w[sl]`,
/// `b = w[sr]` and `c = w[so]`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gate<F> {
    /// The kind of gate this row belongs to.
    pub kind: GateKind,
    /// Signal on the left wire.
    pub sl: Signal,
    /// Signal on the right wire.
    pub sr: Signal,
    /// Signal on the output wire.
    pub so: Signal,
    /// Multiplication selector.
    pub qm: F,
    /// Left selector.
    pub ql: F,
    /// Right selector.
    pub qr: F,
    /// Output selector.
    pub qo: F,
    /// Constant selector.
    pub qc: F,
}

impl<F: Scalar> Gate<F> {
    /// The signal on wire column `col` (0, 1, 2 for a, b, c).
    pub fn wire(&self, col: usize) -> Signal {
        match col {
            0 => self.sl,
            1 => self.sr,
            _ => self.so,
        }
    }

    /// The selectors in column order `qm, ql, qr, qo, qc`.
    pub fn selectors(&self) -> [F; NUM_SELECTORS] {
        [self.qm, self.ql, self.qr, self.qo, self.qc]
    }
}

/// A synthetic signal `coef_left * w[left] + coef_right * w[right]`,
/// introduced when a linear combination has too many terms for one gate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Addition<F> {
    /// Left operand.
    pub left: Signal,
    /// Right operand.
    pub right: Signal,
    /// Coefficient of the left operand.
    pub coef_left: F,
    /// Coefficient of the right operand.
    pub coef_right: F,
}

impl<F: Scalar> Addition<F> {
    /// Evaluate the synthetic signal on a witness holding both operands.
    pub fn eval(&self, witness: &[F]) -> Option<F> {
        let left = witness.get(self.left)?;
        let right = witness.get(self.right)?;
        Some(left.mul(&self.coef_left).add(&right.mul(&self.coef_right)))
    }
}

/// The kinds of gates a circuit may contain.
///
/// Each kind knows how to lower R1CS constraints into rows, which selector columns
/// it contributes, and how its rows enter the quotient and the linearization.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GateKind {
    /// The standard PLONK gate `qm * a * b + ql * a + qr * b + qo * c + qc`.
    Arithmetic,
}

impl GateKind {
    /// Every gate kind, in selector column order.
    pub const ALL: [GateKind; 1] = [GateKind::Arithmetic];

    /// Number of selector columns this kind contributes.
    pub fn num_selectors(&self) -> usize {
        match self {
            GateKind::Arithmetic => NUM_SELECTORS,
        }
    }

    /// Lower one R1CS constraint into rows of this kind.
    pub fn arithmetize<F: Scalar>(
        &self,
        builder: &mut CircuitBuilder<F>,
        constraint: &Constraint<F>,
    ) -> Result<()> {
        match self {
            GateKind::Arithmetic => {
                let (ka, la) = constraint.a.normalize();
                let (kb, lb) = constraint.b.normalize();
                let (kc, lc) = constraint.c.normalize();

                if la.is_empty() || lb.is_empty() {
                    // One factor is constant, so the constraint is linear: k * (lin + kl) - c = 0
                    let (k, lin, kl) = if la.is_empty() {
                        (ka, lb, kb)
                    } else {
                        (kb, la, ka)
                    };
                    let mut terms: Vec<(Signal, F)> =
                        lin.into_iter().map(|(s, c)| (s, c.mul(&k))).collect();
                    terms.extend(lc.into_iter().map(|(s, c)| (s, c.neg())));
                    let (_, terms) = LinearCombination::from_terms(terms).normalize();
                    builder.sum_gate(k.mul(&kl).sub(&kc), terms)
                } else {
                    builder.mul_gate((ka, la), (kb, lb), (kc, lc))
                }
            }
        }
    }

    /// The selector columns of this kind, each of length `n`. Rows of other kinds and
    /// padding rows hold zeroes.
    pub fn preprocess<F: Scalar>(&self, gates: &[Gate<F>], n: usize) -> Vec<Vec<F>> {
        let mut columns = vec![vec![F::zero(); n]; self.num_selectors()];
        for (row, gate) in gates.iter().enumerate().filter(|(_, g)| g.kind == *self) {
            for (column, q) in columns.iter_mut().zip(gate.selectors().iter()) {
                column[row] = *q;
            }
        }
        columns
    }

    /// The factor each selector is multiplied by, given the wire values.
    fn selector_factors<F: Scalar>(&self, a: &F, b: &F, c: &F) -> [F; NUM_SELECTORS] {
        match self {
            GateKind::Arithmetic => [a.mul(b), *a, *b, *c, F::one()],
        }
    }

    /// The gate polynomial at one point, from the selector and wire values there.
    pub fn prove_extra<F: Scalar>(&self, q: &[F], a: &F, b: &F, c: &F) -> F {
        self.selector_factors(a, b, c)
            .iter()
            .zip(q.iter())
            .fold(F::zero(), |acc, (f, q)| acc.add(&f.mul(q)))
    }

    /// The gate term of the linearization: the selector polynomials (or their
    /// commitments) combined with the opened wire values.
    pub fn verify_extra<F: Scalar, E: HomomorphicPolyComElem<Scalar = F>>(
        &self,
        q: &[&E],
        a: &F,
        b: &F,
        c: &F,
    ) -> Result<E> {
        if q.len() != self.num_selectors() {
            return Err(PlonkError::FuncParamsError);
        }
        let factors = self.selector_factors(a, b, c);
        let mut acc = q[0].mul(&factors[0]);
        for (qi, fi) in q.iter().zip(factors.iter()).skip(1) {
            acc.add_assign(&qi.mul(fi));
        }
        Ok(acc)
    }
}
