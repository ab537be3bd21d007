use ark_poly::{EvaluationDomain, Radix2EvaluationDomain};
use kite_algebra::{prelude::*, traits::Domain};

/// Field polynomial in coefficient form, low-order coefficient first.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FpPolynomial<F> {
    /// Coefficients of the polynomial
    pub coefs: Vec<F>,
}

impl<F: Scalar> FpPolynomial<F> {
    /// Return the polynomial coefs reference.
    pub fn get_coefs_ref(&self) -> &[F] {
        self.coefs.as_slice()
    }

    /// Return the constant zero polynomial
    /// # Example
    /// ```
    /// use kite_plonk::poly_commit::field_polynomial::FpPolynomial;
    /// use kite_algebra::bn254::BN254Scalar;
    /// use kite_algebra::{Zero, One};
    /// let poly = FpPolynomial::<BN254Scalar>::zero();
    /// let zero = BN254Scalar::zero();
    /// assert_eq!(poly.degree(), 0);
    /// assert_eq!(poly.eval(&zero), zero);
    /// assert_eq!(poly.eval(&BN254Scalar::one()), zero);
    /// ```
    pub fn zero() -> Self {
        Self::from_coefs(vec![F::zero()])
    }

    /// Build a polynomial from the coefficient vector, low-order coefficient first.
    /// High-order zero coefficient are trimmed.
    /// # Example
    /// ```
    /// use kite_plonk::poly_commit::field_polynomial::FpPolynomial;
    /// use kite_algebra::bn254::BN254Scalar;
    /// use kite_algebra::{Zero, One, ops::*};
    /// let zero = BN254Scalar::zero();
    /// let one = BN254Scalar::one();
    /// let two = one.add(&one);
    /// let five = two.add(&two).add(&one);
    /// let poly = FpPolynomial::from_coefs(vec![one, zero, one]);
    /// assert_eq!(poly.degree(), 2);
    /// assert_eq!(poly.eval(&two), five);
    /// let poly2 = FpPolynomial::from_coefs(vec![one, zero, one, zero, zero]);
    /// assert_eq!(poly, poly2);
    /// ```
    pub fn from_coefs(coefs: Vec<F>) -> Self {
        let mut p = FpPolynomial { coefs };
        p.trim_coefs();
        p
    }

    /// Return a polynomial of `degree` + 1 uniformly random coefficients.
    pub fn random<R: CryptoRng + RngCore>(prng: &mut R, degree: usize) -> FpPolynomial<F> {
        Self::from_coefs((0..=degree).map(|_| F::random(prng)).collect())
    }

    /// Remove high degree zero-coefficients
    fn trim_coefs(&mut self) {
        while self.coefs.len() > 1 && self.coefs.last().map_or(false, |c| c.is_zero()) {
            self.coefs.pop();
        }
        if self.coefs.is_empty() {
            self.coefs.push(F::zero());
        }
    }

    /// Return degree of the polynomial
    pub fn degree(&self) -> usize {
        self.coefs.len().saturating_sub(1)
    }

    /// Test if polynomial is the zero polynomial.
    pub fn is_zero(&self) -> bool {
        self.degree() == 0 && self.coefs[0].is_zero()
    }

    /// Evaluate a polynomial on a point.
    pub fn eval(&self, point: &F) -> F {
        self.coefs
            .iter()
            .rev()
            .fold(F::zero(), |acc, coef| acc.mul(point).add(coef))
    }

    /// Add another polynomial to self.
    pub fn add_assign(&mut self, other: &Self) {
        for (self_coef, other_coef) in self.coefs.iter_mut().zip(other.coefs.iter()) {
            self_coef.add_assign(other_coef);
        }
        let n = self.coefs.len();
        if n < other.coefs.len() {
            self.coefs.extend_from_slice(&other.coefs[n..]);
        }
        self.trim_coefs();
    }

    /// Add with another polynomial, producing a new polynomial.
    pub fn add(&self, other: &Self) -> Self {
        let mut new = self.clone();
        new.add_assign(other);
        new
    }

    /// Subtracts another polynomial from self.
    /// # Example:
    /// ```
    /// use kite_plonk::poly_commit::field_polynomial::FpPolynomial;
    /// use kite_algebra::bn254::BN254Scalar;
    /// use kite_algebra::{Zero, One, ops::*};
    /// let zero = BN254Scalar::zero();
    /// let one = BN254Scalar::one();
    /// let two = one.add(&one);
    /// let three = two.add(&one);
    /// let mut poly1 = FpPolynomial::from_coefs(vec![three, three, two]);
    /// let poly2 = FpPolynomial::from_coefs(vec![three, two, one, one]);
    /// poly1.sub_assign(&poly2);
    /// let poly_expected = FpPolynomial::from_coefs(vec![zero, one, one, one.neg()]);
    /// assert_eq!(poly1, poly_expected);
    /// ```
    pub fn sub_assign(&mut self, other: &Self) {
        for (self_coef, other_coef) in self.coefs.iter_mut().zip(other.coefs.iter()) {
            self_coef.sub_assign(other_coef);
        }
        let n = self.coefs.len();
        if other.coefs.len() > n {
            self.coefs
                .extend(other.coefs[n..].iter().map(|other_coef| other_coef.neg()));
        }
        self.trim_coefs();
    }

    /// Subtract another polynomial from self, producing a new polynomial.
    pub fn sub(&self, other: &Self) -> Self {
        let mut new = self.clone();
        new.sub_assign(other);
        new
    }

    /// Negate the coefficients.
    pub fn neg(&self) -> Self {
        self.mul_scalar(&F::one().neg())
    }

    /// Add `coef` to the coefficient of order `order`.
    pub fn add_coef_assign(&mut self, coef: &F, order: usize) {
        if self.coefs.len() <= order {
            self.coefs.resize(order + 1, F::zero());
        }
        self.coefs[order].add_assign(coef);
        self.trim_coefs();
    }

    /// Multiply polynomial by a constant scalar.
    pub fn mul_scalar_assign(&mut self, scalar: &F) {
        for coef in self.coefs.iter_mut() {
            coef.mul_assign(scalar)
        }
        self.trim_coefs();
    }

    /// Multiply polynomial by a constant scalar into a new polynomial.
    pub fn mul_scalar(&self, scalar: &F) -> Self {
        let mut new = self.clone();
        new.mul_scalar_assign(scalar);
        new
    }

    /// Multiply the polynomial variable by a scalar.
    /// mul_var(\sum a_i X^i, b) = \sum a_i b^i X^i
    /// # Example:
    /// ```
    /// use kite_plonk::poly_commit::field_polynomial::FpPolynomial;
    /// use kite_algebra::bn254::BN254Scalar;
    /// use kite_algebra::{Zero, One, ops::*};
    /// let zero = BN254Scalar::zero();
    /// let one = BN254Scalar::one();
    /// let two = one.add(&one);
    /// let four = two.add(&two);
    /// let poly = FpPolynomial::from_coefs(vec![zero, one, one]);
    /// let expected = FpPolynomial::from_coefs(vec![zero, two, four]);
    /// assert_eq!(poly.mul_var(&two), expected);
    /// ```
    pub fn mul_var(&self, scalar: &F) -> Self {
        let mut r = F::one();
        let coefs = self
            .coefs
            .iter()
            .map(|coef| {
                let c = coef.mul(&r);
                r.mul_assign(scalar);
                c
            })
            .collect();
        Self::from_coefs(coefs)
    }

    /// Divide by `X - point`, returning the quotient and the remainder `self(point)`.
    /// # Example:
    /// ```
    /// use kite_plonk::poly_commit::field_polynomial::FpPolynomial;
    /// use kite_algebra::bn254::BN254Scalar;
    /// use kite_algebra::{Zero, One, ops::*};
    /// let one = BN254Scalar::one();
    /// let two = one.add(&one);
    /// // X^2 - 1 = (X - 1)(X + 1)
    /// let poly = FpPolynomial::from_coefs(vec![one.neg(), BN254Scalar::zero(), one]);
    /// let (q, r) = poly.div_by_linear(&one);
    /// assert_eq!(q, FpPolynomial::from_coefs(vec![one, one]));
    /// assert!(r.is_zero());
    /// let (_, r) = poly.div_by_linear(&two);
    /// assert_eq!(r, poly.eval(&two));
    /// ```
    pub fn div_by_linear(&self, point: &F) -> (Self, F) {
        let n = self.coefs.len();
        if n < 2 {
            return (Self::zero(), self.coefs[0]);
        }
        let mut quo = vec![F::zero(); n - 1];
        let mut carry = F::zero();
        for i in (1..n).rev() {
            carry = self.coefs[i].add(&carry.mul(point));
            quo[i - 1] = carry;
        }
        let rem = self.coefs[0].add(&carry.mul(point));
        (Self::from_coefs(quo), rem)
    }
}

impl<F: Domain> FpPolynomial<F> {
    /// Return the radix-2 evaluation domain of size `num_points`, if the field has one.
    pub fn evaluation_domain(num_points: usize) -> Option<Radix2EvaluationDomain<F::Field>> {
        let domain = Radix2EvaluationDomain::<F::Field>::new(num_points)?;
        if domain.size() == num_points {
            Some(domain)
        } else {
            None
        }
    }

    /// Evaluate the polynomial on every element of `domain`.
    /// Coefficients beyond the domain size wrap around, since `X^size = 1` on the domain.
    pub fn fft_with_domain(&self, domain: &Radix2EvaluationDomain<F::Field>) -> Vec<F> {
        let size = domain.size();
        let mut values = vec![F::Field::zero(); size];
        for (i, coef) in self.coefs.iter().enumerate() {
            values[i % size] += coef.get_field();
        }
        domain.fft_in_place(&mut values);
        values.into_iter().map(F::from_field).collect()
    }

    /// Interpolate the polynomial from its values on `domain`, missing values taken as zero.
    pub fn ifft_with_domain(domain: &Radix2EvaluationDomain<F::Field>, values: &[F]) -> Self {
        let mut values: Vec<F::Field> = values.iter().map(|v| v.get_field()).collect();
        values.resize(domain.size(), F::Field::zero());
        domain.ifft_in_place(&mut values);
        Self::from_coefs(values.into_iter().map(F::from_field).collect())
    }

    /// Evaluate the polynomial on the coset `k * domain`.
    pub fn coset_fft_with_domain(&self, domain: &Radix2EvaluationDomain<F::Field>, k: &F) -> Vec<F> {
        self.mul_var(k).fft_with_domain(domain)
    }

    /// Interpolate the polynomial from its values on the coset `k * domain`, given `k_inv`.
    pub fn coset_ifft_with_domain(
        domain: &Radix2EvaluationDomain<F::Field>,
        values: &[F],
        k_inv: &F,
    ) -> Self {
        Self::ifft_with_domain(domain, values).mul_var(k_inv)
    }
}
