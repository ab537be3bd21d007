use crate::{
    errors::{PlonkError, Result},
    plonk::{
        constants::{
            MIN_DOMAIN_POWER, NUM_SELECTORS, NUM_WIRES, QUOTIENT_EXTENSION, SRS_HEADROOM,
        },
        gate::{Addition, Gate, GateKind},
        r1cs::{Signal, R1CS},
    },
};
use ark_ff::FftField;
use kite_algebra::prelude::*;

/// Accumulates gates and additions while an R1CS is lowered.
pub struct CircuitBuilder<F> {
    gates: Vec<Gate<F>>,
    additions: Vec<Addition<F>>,
    n_signals: usize,
}

impl<F: Scalar> CircuitBuilder<F> {
    fn new(n_vars: usize) -> Self {
        Self {
            gates: vec![],
            additions: vec![],
            n_signals: n_vars,
        }
    }

    fn push_gate(&mut self, sl: Signal, sr: Signal, so: Signal, q: [F; NUM_SELECTORS]) {
        let [qm, ql, qr, qo, qc] = q;
        self.gates.push(Gate {
            kind: GateKind::Arithmetic,
            sl,
            sr,
            so,
            qm,
            ql,
            qr,
            qo,
            qc,
        });
    }

    /// Fold terms pairwise into fresh signals until at most `max_terms` remain,
    /// then pad with zero terms on the constant signal.
    fn reduce(&mut self, terms: Vec<(Signal, F)>, max_terms: usize) -> Vec<(Signal, F)> {
        let mut terms: ark_std::collections::VecDeque<(Signal, F)> = terms.into();
        while terms.len() > max_terms {
            let (Some((s1, c1)), Some((s2, c2))) = (terms.pop_front(), terms.pop_front()) else {
                break;
            };
            let so = self.n_signals;
            self.n_signals += 1;
            // so = c1 * s1 + c2 * s2
            self.push_gate(s1, s2, so, [F::zero(), c1.neg(), c2.neg(), F::one(), F::zero()]);
            self.additions.push(Addition {
                left: s1,
                right: s2,
                coef_left: c1,
                coef_right: c2,
            });
            terms.push_back((so, F::one()));
        }
        while terms.len() < max_terms {
            terms.push_back((0, F::zero()));
        }
        terms.into_iter().collect()
    }

    /// Emit `sum coef_i * w[s_i] + constant = 0` for up to three terms after reduction.
    pub(crate) fn sum_gate(&mut self, constant: F, terms: Vec<(Signal, F)>) -> Result<()> {
        let terms = self.reduce(terms, NUM_WIRES);
        let [(sl, ql), (sr, qr), (so, qo)] = <[(Signal, F); NUM_WIRES]>::try_from(terms)
            .map_err(|_| PlonkError::FuncParamsError)?;
        self.push_gate(sl, sr, so, [F::zero(), ql, qr, qo, constant]);
        Ok(())
    }

    /// Emit `(lin_a + ka) * (lin_b + kb) - (lin_c + kc) = 0`, each side reduced to one term.
    pub(crate) fn mul_gate(
        &mut self,
        a: (F, Vec<(Signal, F)>),
        b: (F, Vec<(Signal, F)>),
        c: (F, Vec<(Signal, F)>),
    ) -> Result<()> {
        let (ka, la) = a;
        let (kb, lb) = b;
        let (kc, lc) = c;
        let (sa, ca) = self.single_term(la)?;
        let (sb, cb) = self.single_term(lb)?;
        let (sc, cc) = self.single_term(lc)?;
        self.push_gate(
            sa,
            sb,
            sc,
            [
                ca.mul(&cb),
                ca.mul(&kb),
                ka.mul(&cb),
                cc.neg(),
                ka.mul(&kb).sub(&kc),
            ],
        );
        Ok(())
    }

    fn single_term(&mut self, terms: Vec<(Signal, F)>) -> Result<(Signal, F)> {
        self.reduce(terms, 1)
            .first()
            .copied()
            .ok_or(PlonkError::FuncParamsError)
    }
}

/// A circuit lowered to PLONK rows.
///
/// Rows `0..n_public` bind the public signals, then come the rows of every constraint.
/// The rows are padded with empty gates up to the domain size when the key is built.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Circuit<F> {
    /// Number of R1CS signals.
    pub n_vars: usize,
    /// Number of public signals.
    pub n_public: usize,
    /// Number of signals once the synthetic ones of `additions` are appended.
    pub n_signals: usize,
    /// The gate rows.
    pub gates: Vec<Gate<F>>,
    /// Synthetic signals, the i-th one being signal `n_vars + i`.
    pub additions: Vec<Addition<F>>,
    /// The evaluation domain has `2^domain_power` elements.
    pub domain_power: u32,
}

impl<F: Scalar> Circuit<F> {
    /// Size of the evaluation domain.
    pub fn domain_size(&self) -> usize {
        1 << self.domain_power
    }

    /// Check that every gate wire names a known signal and that each synthetic signal
    /// only refers to signals defined before it.
    pub fn check_signals(&self) -> Result<()> {
        if self.n_signals != self.n_vars + self.additions.len() || self.n_public > self.gates.len()
        {
            return Err(PlonkError::MalformedR1CS);
        }
        let gates_ok = self
            .gates
            .iter()
            .all(|g| g.sl < self.n_signals && g.sr < self.n_signals && g.so < self.n_signals);
        let additions_ok = self
            .additions
            .iter()
            .enumerate()
            .all(|(i, a)| a.left < self.n_vars + i && a.right < self.n_vars + i);
        if gates_ok && additions_ok {
            Ok(())
        } else {
            Err(PlonkError::MalformedR1CS)
        }
    }

    /// Append the synthetic signals to an R1CS witness.
    pub fn extend_witness(&self, witness: &[F]) -> Result<Vec<F>> {
        if witness.len() < self.n_vars {
            return Err(PlonkError::WitnessIncomplete(witness.len()));
        }
        let mut extended = witness[..self.n_vars].to_vec();
        extended.reserve(self.additions.len());
        for addition in self.additions.iter() {
            let value = addition
                .eval(&extended)
                .ok_or(PlonkError::WitnessIncomplete(extended.len()))?;
            extended.push(value);
        }
        Ok(extended)
    }

    /// Check every non-public row on an extended witness.
    pub fn verify_witness(&self, extended: &[F]) -> Result<()> {
        self.check_signals()?;
        if extended.len() < self.n_signals {
            return Err(PlonkError::WitnessIncomplete(extended.len()));
        }
        for (row, gate) in self.gates.iter().enumerate().skip(self.n_public) {
            let (a, b, c) = (extended[gate.sl], extended[gate.sr], extended[gate.so]);
            if !gate.kind.prove_extra(&gate.selectors(), &a, &b, &c).is_zero() {
                return Err(PlonkError::UnsatisfiedGate(row));
            }
        }
        Ok(())
    }

    /// The three wire columns of length `n`, padding rows holding zeroes.
    pub(crate) fn wire_values(&self, extended: &[F], n: usize) -> Result<[Vec<F>; NUM_WIRES]> {
        self.check_signals()?;
        if self.gates.len() > n {
            return Err(PlonkError::CircuitTooLarge(self.gates.len()));
        }
        if extended.len() < self.n_signals {
            return Err(PlonkError::WitnessIncomplete(extended.len()));
        }
        let mut columns = [vec![F::zero(); n], vec![F::zero(); n], vec![F::zero(); n]];
        for (row, gate) in self.gates.iter().enumerate() {
            for (col, column) in columns.iter_mut().enumerate() {
                column[row] = extended[gate.wire(col)];
            }
        }
        Ok(columns)
    }
}

/// Lower an R1CS to PLONK rows and choose the domain.
///
/// `srs_max_degree` is the highest degree the SRS can commit to; a domain of size `n`
/// needs `n + SRS_HEADROOM - 1`.
pub fn arithmetize<F: Domain>(r1cs: &R1CS<F>, srs_max_degree: usize) -> Result<Circuit<F>> {
    r1cs.check()?;
    if r1cs.constraints.is_empty() && r1cs.n_public == 0 {
        return Err(PlonkError::MalformedR1CS);
    }

    let mut builder = CircuitBuilder::new(r1cs.n_vars);
    for signal in 1..=r1cs.n_public {
        builder.push_gate(
            signal,
            0,
            0,
            [F::zero(), F::one(), F::zero(), F::zero(), F::zero()],
        );
    }
    for constraint in r1cs.constraints.iter() {
        GateKind::Arithmetic.arithmetize(&mut builder, constraint)?;
    }

    let n_gates = builder.gates.len();
    let domain_power = log2_ceil(n_gates).max(MIN_DOMAIN_POWER);
    let extension_bits = QUOTIENT_EXTENSION.trailing_zeros();
    if domain_power + extension_bits > <F::Field as FftField>::TWO_ADICITY {
        return Err(PlonkError::CircuitTooLarge(n_gates));
    }
    let domain_size = 1usize << domain_power;
    if domain_size + SRS_HEADROOM - 1 > srs_max_degree {
        return Err(PlonkError::CircuitTooLarge(domain_size));
    }

    Ok(Circuit {
        n_vars: r1cs.n_vars,
        n_public: r1cs.n_public,
        n_signals: builder.n_signals,
        gates: builder.gates,
        additions: builder.additions,
        domain_power,
    })
}

#[cfg(test)]
mod test {
    use crate::{
        errors::PlonkError,
        plonk::{
            arithmetizer::arithmetize,
            r1cs::{LinearCombination, R1CS},
        },
    };
    use kite_algebra::{bn254::BN254Scalar, prelude::*};

    type F = BN254Scalar;

    fn f(v: u32) -> F {
        F::from(v)
    }

    // w = [1, out, a, b], a * b = out
    fn mul_r1cs() -> R1CS<F> {
        let mut r1cs = R1CS::new(4, 2);
        r1cs.add_constraint(
            LinearCombination::signal(2),
            LinearCombination::signal(3),
            LinearCombination::signal(1),
        );
        r1cs
    }

    #[test]
    fn test_public_rows_and_mul_gate() {
        let circuit = arithmetize(&mul_r1cs(), 1 << 10).unwrap();
        assert_eq!(circuit.gates.len(), 3);
        assert_eq!(circuit.domain_power, 3);
        assert!(circuit.additions.is_empty());

        for (i, gate) in circuit.gates.iter().take(2).enumerate() {
            assert_eq!(gate.sl, i + 1);
            assert_eq!(gate.ql, F::one());
            assert!(gate.qm.is_zero() && gate.qr.is_zero() && gate.qo.is_zero());
        }
        let gate = &circuit.gates[2];
        assert_eq!((gate.sl, gate.sr, gate.so), (2, 3, 1));
        assert_eq!(gate.qm, F::one());
        assert_eq!(gate.qo, F::one().neg());
        assert!(gate.ql.is_zero() && gate.qr.is_zero() && gate.qc.is_zero());

        let witness = vec![f(1), f(12), f(3), f(4)];
        let extended = circuit.extend_witness(&witness).unwrap();
        assert!(circuit.verify_witness(&extended).is_ok());
        let bad = vec![f(1), f(13), f(3), f(4)];
        assert_eq!(
            circuit.verify_witness(&bad),
            Err(PlonkError::UnsatisfiedGate(2))
        );
        assert_eq!(
            circuit.extend_witness(&witness[..3]),
            Err(PlonkError::WitnessIncomplete(3))
        );
    }

    #[test]
    fn test_constants_in_mul_gate() {
        // (a + 2) * (3b + 1) = out + 5
        let mut r1cs = R1CS::new(4, 1);
        r1cs.add_constraint(
            LinearCombination::signal(2).with(0, f(2)),
            LinearCombination::constant(f(1)).with(3, f(3)),
            LinearCombination::signal(1).with(0, f(5)),
        );
        let circuit = arithmetize(&r1cs, 1 << 10).unwrap();
        let gate = &circuit.gates[1];
        assert_eq!(gate.qm, f(3));
        assert_eq!(gate.ql, f(1));
        assert_eq!(gate.qr, f(6));
        assert_eq!(gate.qc, f(2).sub(&f(5)));

        // a = 2, b = 3: (4) * (10) = 40 = out + 5
        let witness = vec![f(1), f(35), f(2), f(3)];
        assert!(r1cs.is_satisfied(&witness));
        let extended = circuit.extend_witness(&witness).unwrap();
        assert!(circuit.verify_witness(&extended).is_ok());
    }

    #[test]
    fn test_linear_constraint_reduction() {
        // 1 * (s1 + 2 s2 + 3 s3 + 4 s4 + 5 s5) = s6
        let mut r1cs = R1CS::new(7, 1);
        let lc = (1..=5).fold(LinearCombination::new(), |lc, i| lc.with(i, f(i as u32)));
        r1cs.add_constraint(
            LinearCombination::constant(F::one()),
            lc,
            LinearCombination::signal(6),
        );
        let circuit = arithmetize(&r1cs, 1 << 10).unwrap();

        // six terms fold into three with three additions
        assert_eq!(circuit.additions.len(), 3);
        assert_eq!(circuit.n_signals, 10);
        assert_eq!(circuit.gates.len(), 1 + 3 + 1);
        let last = circuit.gates.last().unwrap();
        assert!(last.qm.is_zero());

        let mut witness = vec![f(1), f(9), f(2), f(7), f(1), f(4)];
        let s6 = (1..=5).fold(F::zero(), |acc, i| acc.add(&witness[i].mul(&f(i as u32))));
        witness.push(s6);
        assert!(r1cs.is_satisfied(&witness));
        let extended = circuit.extend_witness(&witness).unwrap();
        assert_eq!(extended.len(), 10);
        assert_eq!(extended[7], f(9).add(&f(4)));
        assert!(circuit.verify_witness(&extended).is_ok());

        witness[6].add_assign(&F::one());
        let extended = circuit.extend_witness(&witness).unwrap();
        assert!(circuit.verify_witness(&extended).is_err());
    }

    #[test]
    fn test_check_signals() {
        // (s1 + s2 + s3 + s4) * 1 = s5 folds into additions
        let mut r1cs = R1CS::new(6, 0);
        r1cs.add_constraint(
            (1..=4).fold(LinearCombination::new(), |lc, i| lc.with(i, F::one())),
            LinearCombination::constant(F::one()),
            LinearCombination::signal(5),
        );
        let circuit = arithmetize(&r1cs, 1 << 10).unwrap();
        assert!(!circuit.additions.is_empty());
        assert!(circuit.check_signals().is_ok());

        // a synthetic signal may not refer to itself or a later one
        let mut bad = circuit.clone();
        bad.additions[0].right = bad.n_vars;
        assert_eq!(bad.check_signals(), Err(PlonkError::MalformedR1CS));

        let mut bad = circuit.clone();
        bad.n_signals += 1;
        assert_eq!(bad.check_signals(), Err(PlonkError::MalformedR1CS));

        let mut bad = circuit;
        bad.gates[0].sl = bad.n_signals;
        let witness = vec![f(1), f(1), f(2), f(3), f(4), f(10)];
        let extended = bad.extend_witness(&witness).unwrap();
        assert_eq!(bad.verify_witness(&extended), Err(PlonkError::MalformedR1CS));
    }

    #[test]
    fn test_multi_term_mul_gate() {
        // (s1 + s2) * (s3 + s4) = s5 + s6
        let mut r1cs = R1CS::new(7, 0);
        r1cs.add_constraint(
            LinearCombination::signal(1).with(2, F::one()),
            LinearCombination::signal(3).with(4, F::one()),
            LinearCombination::signal(5).with(6, F::one()),
        );
        let circuit = arithmetize(&r1cs, 1 << 10).unwrap();
        assert_eq!(circuit.additions.len(), 3);
        assert_eq!(circuit.gates.len(), 4);

        let witness = vec![f(1), f(2), f(3), f(4), f(5), f(40), f(5)];
        assert!(r1cs.is_satisfied(&witness));
        let extended = circuit.extend_witness(&witness).unwrap();
        assert!(circuit.verify_witness(&extended).is_ok());
    }

    #[test]
    fn test_domain_sizing() {
        // a single gate still gets the minimum domain
        let mut r1cs = R1CS::<F>::new(3, 0);
        r1cs.add_constraint(
            LinearCombination::signal(1),
            LinearCombination::signal(1),
            LinearCombination::signal(2),
        );
        let circuit = arithmetize(&r1cs, 1 << 10).unwrap();
        assert_eq!(circuit.gates.len(), 1);
        assert_eq!(circuit.domain_size(), 8);

        // nine gates need sixteen rows
        for _ in 0..8 {
            r1cs.add_constraint(
                LinearCombination::signal(1),
                LinearCombination::signal(1),
                LinearCombination::signal(2),
            );
        }
        let circuit = arithmetize(&r1cs, 1 << 10).unwrap();
        assert_eq!(circuit.domain_size(), 16);

        assert_eq!(
            arithmetize(&r1cs, 20),
            Err(PlonkError::CircuitTooLarge(16))
        );
        assert!(arithmetize(&r1cs, 21).is_ok());
        assert_eq!(
            arithmetize(&R1CS::<F>::new(3, 0), 1 << 10),
            Err(PlonkError::MalformedR1CS)
        );
    }
}
