use crate::{
    errors::{PlonkError, Result},
    plonk::constants::{MAX_COSET_TRIES, NUM_WIRES, QUOTIENT_EXTENSION},
    poly_commit::field_polynomial::FpPolynomial,
};
use ark_poly::Radix2EvaluationDomain;
use kite_algebra::prelude::*;

/// The multiplicative subgroup `H = {w^i}` of size `n = 2^power`, with the coset
/// generators `k = [1, k1, k2]` labelling the three wire columns.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlonkDomain<F> {
    power: u32,
    size: usize,
    omega: F,
    k: [F; NUM_WIRES],
}

impl<F: Domain> PlonkDomain<F> {
    /// Build the domain of size `2^power` and choose its coset generators.
    pub fn new(power: u32) -> Result<Self> {
        let size = 1usize
            .checked_shl(power)
            .ok_or(PlonkError::CircuitTooLarge(usize::MAX))?;
        let domain = FpPolynomial::<F>::evaluation_domain(size)
            .ok_or(PlonkError::CircuitTooLarge(size))?;
        let (k1, k2) = choose_coset_generators::<F>(size)?;
        Ok(Self {
            power,
            size,
            omega: F::from_field(domain.group_gen),
            k: [F::one(), k1, k2],
        })
    }

    /// `log2` of the size.
    pub fn power(&self) -> u32 {
        self.power
    }

    /// Number of rows `n`.
    pub fn size(&self) -> usize {
        self.size
    }

    /// The generator `w` of `H`.
    pub fn omega(&self) -> &F {
        &self.omega
    }

    /// The coset generators `[1, k1, k2]`.
    pub fn k(&self) -> &[F; NUM_WIRES] {
        &self.k
    }

    /// The FFT domain `H`.
    pub fn radix2(&self) -> Result<Radix2EvaluationDomain<F::Field>> {
        FpPolynomial::<F>::evaluation_domain(self.size).ok_or(PlonkError::CircuitTooLarge(self.size))
    }

    /// The FFT domain four times larger than `H`, on whose coset the quotient is computed.
    pub fn extended(&self) -> Result<Radix2EvaluationDomain<F::Field>> {
        let size = self.size * QUOTIENT_EXTENSION;
        FpPolynomial::<F>::evaluation_domain(size).ok_or(PlonkError::CircuitTooLarge(self.size))
    }

    /// The shift of the quotient coset.
    pub fn quotient_coset(&self) -> F {
        F::multiplicative_generator()
    }

    /// The elements `w^0, ..., w^{n-1}`.
    pub fn elements(&self) -> Vec<F> {
        let mut elems = Vec::with_capacity(self.size);
        let mut current = F::one();
        for _ in 0..self.size {
            elems.push(current);
            current.mul_assign(&self.omega);
        }
        elems
    }

    /// `Z_H(x) = x^n - 1`.
    pub fn vanishing_eval(&self, x: &F) -> F {
        x.pow(&[self.size as u64]).sub(&F::one())
    }

    /// The Lagrange polynomial of the row whose element is `omega_i`, evaluated at `x`:
    /// `omega_i * (x^n - 1) / (n * (x - omega_i))`.
    pub fn lagrange_eval(&self, omega_i: &F, x: &F) -> Result<F> {
        let denominator = F::from(self.size as u64)
            .mul(&x.sub(omega_i))
            .inv()
            .map_err(|_| PlonkError::DivisionByZero)?;
        Ok(omega_i.mul(&self.vanishing_eval(x)).mul(&denominator))
    }

    /// `L1(x)`, the Lagrange polynomial of the first row.
    pub fn first_lagrange_eval(&self, x: &F) -> Result<F> {
        self.lagrange_eval(&F::one(), x)
    }
}

/// Choose `k1, k2` by linear search from 2 so that `H`, `k1 * H` and `k2 * H` are
/// pairwise disjoint.
pub fn choose_coset_generators<F: Scalar>(n: usize) -> Result<(F, F)> {
    search_coset_generators(n, F::from(2u32), MAX_COSET_TRIES)
}

/// Gives up with `CosetCollision` after `max_tries` rejected candidates for either generator.
fn search_coset_generators<F: Scalar>(n: usize, start: F, max_tries: u64) -> Result<(F, F)> {
    let exp = [n as u64];
    let in_h = |x: &F| x.is_zero() || x.pow(&exp) == F::one();

    let mut k1 = start;
    let mut tries = 0u64;
    while in_h(&k1) {
        k1.add_assign(&F::one());
        tries += 1;
        if tries > max_tries {
            return Err(PlonkError::CosetCollision);
        }
    }

    let k1_inv = k1.inv()?;
    let mut k2 = k1.add(&F::one());
    tries = 0;
    while in_h(&k2) || in_h(&k2.mul(&k1_inv)) {
        k2.add_assign(&F::one());
        tries += 1;
        if tries > max_tries {
            return Err(PlonkError::CosetCollision);
        }
    }
    Ok((k1, k2))
}

/// Values of a polynomial on the quotient coset `g * H_4n`, the i-th one at `g * w_4n^i`.
///
/// Row `j` of `H` sits at index `4j`, so the next row of index `i` is `i + 4`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CosetEvals<F> {
    evals: Vec<F>,
}

impl<F: Scalar> CosetEvals<F> {
    /// Wrap the evaluations of a polynomial over a domain of size `domain_size`.
    pub fn new(evals: Vec<F>, domain_size: usize) -> Result<Self> {
        if evals.len() != domain_size * QUOTIENT_EXTENSION {
            return Err(PlonkError::FuncParamsError);
        }
        Ok(Self { evals })
    }

    /// Value at index `i`.
    pub fn at(&self, i: usize) -> &F {
        &self.evals[i]
    }

    /// Value at the point `w * x` where `x` is at index `i`.
    pub fn next_row(&self, i: usize) -> &F {
        &self.evals[(i + QUOTIENT_EXTENSION) % self.evals.len()]
    }

    /// Number of evaluations.
    pub fn len(&self) -> usize {
        self.evals.len()
    }

    /// Always false, since a domain has at least one row.
    pub fn is_empty(&self) -> bool {
        self.evals.is_empty()
    }

    /// The evaluations.
    pub fn as_slice(&self) -> &[F] {
        &self.evals
    }
}

/// Three columns of `n` values, one per wire.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireColumns<F> {
    columns: [Vec<F>; NUM_WIRES],
}

impl<F: Scalar> WireColumns<F> {
    /// Wrap three columns, each of length `domain_size`.
    pub fn new(columns: [Vec<F>; NUM_WIRES], domain_size: usize) -> Result<Self> {
        if columns.iter().any(|c| c.len() != domain_size) {
            return Err(PlonkError::FuncParamsError);
        }
        Ok(Self { columns })
    }

    /// Column `col`.
    pub fn column(&self, col: usize) -> &[F] {
        &self.columns[col]
    }

    /// Value of column `col` at row `row`.
    pub fn get(&self, col: usize, row: usize) -> &F {
        &self.columns[col][row]
    }

    /// Iterate over the columns.
    pub fn iter(&self) -> impl Iterator<Item = &Vec<F>> {
        self.columns.iter()
    }
}

#[cfg(test)]
mod test {
    use crate::{
        errors::PlonkError,
        plonk::domain::{choose_coset_generators, search_coset_generators, CosetEvals, PlonkDomain},
    };
    use kite_algebra::{bn254::BN254Scalar, prelude::*};

    type F = BN254Scalar;

    #[test]
    fn test_coset_generators() {
        let domain = PlonkDomain::<F>::new(3).unwrap();
        assert_eq!(domain.size(), 8);
        assert_eq!(domain.k()[1], F::from(2u32));
        assert_eq!(domain.k()[2], F::from(3u32));

        // the three cosets are disjoint
        let elements = domain.elements();
        let mut all: Vec<F> = domain
            .k()
            .iter()
            .flat_map(|k| elements.iter().map(move |w| w.mul(k)))
            .collect();
        all.sort_by_key(|x| x.to_bytes());
        all.dedup();
        assert_eq!(all.len(), 24);

        assert_eq!(domain.omega().pow(&[8]), F::one());
        assert_ne!(domain.omega().pow(&[4]), F::one());
    }

    #[test]
    fn test_search_skips_subgroup_elements() {
        // -1, 0 and 1 all fail
        let (k1, k2) = search_coset_generators::<F>(8, F::one().neg(), 3).unwrap();
        assert_eq!(k1, F::from(2u32));
        assert_eq!(k2, F::from(3u32));
        assert_eq!(
            choose_coset_generators::<F>(1 << 12).unwrap(),
            (F::from(2u32), F::from(3u32))
        );
    }

    #[test]
    fn test_search_gives_up_after_max_tries() {
        assert_eq!(
            search_coset_generators::<F>(8, F::one().neg(), 2),
            Err(PlonkError::CosetCollision)
        );
        assert_eq!(
            search_coset_generators::<F>(8, F::one(), 0),
            Err(PlonkError::CosetCollision)
        );
        // 2 and 3 need no retries
        assert!(search_coset_generators::<F>(8, F::from(2u32), 0).is_ok());
    }

    #[test]
    fn test_lagrange() {
        let domain = PlonkDomain::<F>::new(4).unwrap();
        let elements = domain.elements();
        let x = F::from(1234567u32);
        let sum = elements
            .iter()
            .map(|w| domain.lagrange_eval(w, &x).unwrap())
            .fold(F::zero(), |acc, l| acc.add(&l));
        assert_eq!(sum, F::one());
        assert_eq!(
            domain.first_lagrange_eval(&F::one()),
            Err(PlonkError::DivisionByZero)
        );
        assert!(domain.vanishing_eval(&elements[5]).is_zero());
    }

    #[test]
    fn test_coset_evals_length() {
        assert!(CosetEvals::new(vec![F::zero(); 32], 8).is_ok());
        assert_eq!(
            CosetEvals::new(vec![F::zero(); 31], 8),
            Err(PlonkError::FuncParamsError)
        );
        let evals = CosetEvals::new((0..32u32).map(F::from).collect(), 8).unwrap();
        assert_eq!(*evals.next_row(30), F::from(2u32));
    }
}
