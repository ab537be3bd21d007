use crate::poly_commit::{
    errors::PolyComSchemeError,
    field_polynomial::FpPolynomial,
    pcs::{HomomorphicPolyComElem, PolyComScheme, Result},
};
use kite_algebra::{
    bn254::BN254PairingEngine,
    prelude::*,
    traits::{Domain, Pairing},
};

/// KZG commitment scheme over the `Group`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, Eq, PartialEq, Default)]
pub struct KZGCommitment<G>(pub G);

impl<G: Group> KiteFromToBytes for KZGCommitment<G> {
    fn kite_to_bytes(&self) -> Vec<u8> {
        self.0.to_compressed_bytes()
    }

    fn kite_from_bytes(bytes: &[u8]) -> core::result::Result<Self, AlgebraError> {
        G::from_compressed_bytes(bytes).map(KZGCommitment)
    }
}

impl<G: Group> HomomorphicPolyComElem for KZGCommitment<G> {
    type Scalar = G::ScalarType;

    fn add(&self, other: &Self) -> Self {
        KZGCommitment(self.0.add(&other.0))
    }

    fn add_assign(&mut self, other: &Self) {
        self.0.add_assign(&other.0)
    }

    fn sub(&self, other: &Self) -> Self {
        KZGCommitment(self.0.sub(&other.0))
    }

    fn sub_assign(&mut self, other: &Self) {
        self.0.sub_assign(&other.0)
    }

    fn mul(&self, exp: &G::ScalarType) -> Self {
        KZGCommitment(self.0.mul(exp))
    }

    fn mul_assign(&mut self, exp: &G::ScalarType) {
        self.0 = self.0.mul(exp)
    }
}

impl<F: Domain> HomomorphicPolyComElem for FpPolynomial<F> {
    type Scalar = F;

    fn add(&self, other: &Self) -> Self {
        self.add(other)
    }

    fn add_assign(&mut self, other: &Self) {
        self.add_assign(other)
    }

    fn sub(&self, other: &Self) -> Self {
        self.sub(other)
    }

    fn sub_assign(&mut self, other: &Self) {
        self.sub_assign(other)
    }

    fn mul(&self, exp: &F) -> Self {
        self.mul_scalar(exp)
    }

    fn mul_assign(&mut self, exp: &F) {
        self.mul_scalar_assign(exp)
    }
}

/// KZG commitment scheme about `PairingEngine`.
///
/// Holds the powers `[tau^i]_1` for `i` up to the max degree, and `[1]_2, [tau]_2`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct KZGCommitmentScheme<P: Pairing> {
    /// public parameter about G1.
    pub public_parameter_group_1: Vec<P::G1>,
    /// public parameter about G2.
    pub public_parameter_group_2: Vec<P::G2>,
}

impl<P: Pairing> KZGCommitmentScheme<P> {
    /// Create a new instance of a KZG polynomial commitment scheme from a locally sampled
    /// trapdoor. Only suitable for tests and benchmarks, since whoever runs it knows `tau`.
    /// `max_degree` - max degree of the polynomial,
    /// `prng` - pseudo-random generator.
    pub fn new<R: CryptoRng + RngCore>(max_degree: usize, prng: &mut R) -> KZGCommitmentScheme<P> {
        let s = P::ScalarField::random(prng);

        let mut public_parameter_group_1: Vec<P::G1> = Vec::with_capacity(max_degree + 1);
        let mut elem_g1 = P::G1::get_base();
        for _ in 0..=max_degree {
            public_parameter_group_1.push(elem_g1);
            elem_g1 = elem_g1.mul(&s);
        }

        let elem_g2 = P::G2::get_base();
        let public_parameter_group_2 = vec![elem_g2, elem_g2.mul(&s)];

        KZGCommitmentScheme {
            public_parameter_group_1,
            public_parameter_group_2,
        }
    }

    /// Serialize the parameters to unchecked bytes.
    pub fn to_unchecked_bytes(&self) -> Vec<u8> {
        let mut bytes = vec![];
        let len_1 = self.public_parameter_group_1.len() as u32;
        let len_2 = self.public_parameter_group_2.len() as u32;
        bytes.extend(len_1.to_le_bytes());
        bytes.extend(len_2.to_le_bytes());

        for i in &self.public_parameter_group_1 {
            bytes.extend(i.to_unchecked_bytes());
        }
        for i in &self.public_parameter_group_2 {
            bytes.extend(i.to_unchecked_bytes());
        }
        bytes
    }

    /// Deserialize the parameters from unchecked bytes.
    /// The points are trusted, only the layout is checked.
    pub fn from_unchecked_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < 8 {
            return Err(PolyComSchemeError::DeserializationError);
        }
        let mut len_1_bytes = [0u8; 4];
        let mut len_2_bytes = [0u8; 4];
        len_1_bytes.copy_from_slice(&bytes[0..4]);
        len_2_bytes.copy_from_slice(&bytes[4..8]);
        let len_1 = u32::from_le_bytes(len_1_bytes) as usize;
        let len_2 = u32::from_le_bytes(len_2_bytes) as usize;
        let n_1 = P::G1::unchecked_size();
        let n_2 = P::G2::unchecked_size();

        if bytes.len() != 8 + n_1 * len_1 + n_2 * len_2 || len_1 == 0 || len_2 != 2 {
            return Err(PolyComSchemeError::DeserializationError);
        }

        let (bytes_1, bytes_2) = bytes[8..].split_at(n_1 * len_1);
        let public_parameter_group_1 = bytes_1
            .chunks_exact(n_1)
            .map(P::G1::from_unchecked_bytes)
            .collect::<core::result::Result<Vec<_>, _>>()
            .map_err(|_| PolyComSchemeError::DeserializationError)?;
        let public_parameter_group_2 = bytes_2
            .chunks_exact(n_2)
            .map(P::G2::from_unchecked_bytes)
            .collect::<core::result::Result<Vec<_>, _>>()
            .map_err(|_| PolyComSchemeError::DeserializationError)?;

        Ok(Self {
            public_parameter_group_1,
            public_parameter_group_2,
        })
    }
}

/// KZG commitment scheme over the BN254 curve
pub type KZGCommitmentSchemeBN254 = KZGCommitmentScheme<BN254PairingEngine>;

impl<P: Pairing> PolyComScheme for KZGCommitmentScheme<P> {
    type Field = P::ScalarField;
    type Commitment = KZGCommitment<P::G1>;

    fn max_degree(&self) -> usize {
        self.public_parameter_group_1.len().saturating_sub(1)
    }

    fn commit(&self, polynomial: &FpPolynomial<Self::Field>) -> Result<Self::Commitment> {
        let coefs = polynomial.get_coefs_ref();
        let degree = polynomial.degree();

        if degree + 1 > self.public_parameter_group_1.len() {
            return Err(PolyComSchemeError::DegreeError);
        }

        let coefs_ref: Vec<&Self::Field> = coefs.iter().collect();
        let pub_param_group_1_as_ref: Vec<&P::G1> = self.public_parameter_group_1[0..degree + 1]
            .iter()
            .collect();

        let commitment_value = P::G1::multi_exp(&coefs_ref[..], &pub_param_group_1_as_ref[..]);

        Ok(KZGCommitment(commitment_value))
    }

    fn is_valid_commitment(&self, commitment: &Self::Commitment) -> bool {
        commitment.0.is_valid()
    }

    fn prove(
        &self,
        poly: &FpPolynomial<Self::Field>,
        x: &Self::Field,
        max_degree: usize,
    ) -> Result<Self::Commitment> {
        if poly.degree() > max_degree {
            return Err(PolyComSchemeError::DegreeError);
        }

        // (P(X) - P(x)) / (X - x), the remainder is P(x)
        let eval = poly.eval(x);
        let nominator = poly.sub(&FpPolynomial::from_coefs(vec![eval]));
        let (q_poly, rem) = nominator.div_by_linear(x);

        if !rem.is_zero() {
            return Err(PolyComSchemeError::PCSProveEvalError);
        }

        self.commit(&q_poly)
    }

    fn verify(
        &self,
        cm: &Self::Commitment,
        point: &Self::Field,
        eval: &Self::Field,
        proof: &Self::Commitment,
    ) -> Result<()> {
        if self.public_parameter_group_1.is_empty() || self.public_parameter_group_2.len() < 2 {
            return Err(PolyComSchemeError::ParameterError);
        }
        let g1_0 = self.public_parameter_group_1[0];
        let g2_0 = self.public_parameter_group_2[0];
        let g2_1 = self.public_parameter_group_2[1];

        let x_minus_point_group_element_group_2 = g2_1.sub(&g2_0.mul(point));

        let left_pairing_eval = if eval.is_zero() {
            P::pairing(&cm.0, &g2_0)
        } else {
            P::pairing(&cm.0.sub(&g1_0.mul(eval)), &g2_0)
        };

        let right_pairing_eval = P::pairing(&proof.0, &x_minus_point_group_element_group_2);

        if left_pairing_eval == right_pairing_eval {
            Ok(())
        } else {
            Err(PolyComSchemeError::PCSVerifyEvalError)
        }
    }

    fn batch_verify_diff_points(
        &self,
        cm_vec: &[Self::Commitment],
        point_vec: &[Self::Field],
        eval_vec: &[Self::Field],
        proofs: &[Self::Commitment],
        challenge: &Self::Field,
    ) -> Result<()> {
        if proofs.is_empty()
            || proofs.len() != point_vec.len()
            || proofs.len() != eval_vec.len()
            || proofs.len() != cm_vec.len()
        {
            return Err(PolyComSchemeError::ParameterError);
        }
        if self.public_parameter_group_1.is_empty() || self.public_parameter_group_2.len() < 2 {
            return Err(PolyComSchemeError::ParameterError);
        }

        let g1_0 = self.public_parameter_group_1[0];
        let left_second = self.public_parameter_group_2[1];
        let right_second = self.public_parameter_group_2[0];

        // e(sum u^i W_i, [tau]_2) == e(sum u^i (z_i W_i + C_i - y_i [1]_1), [1]_2)
        let mut left_first = proofs[0].0;
        let mut right_first = proofs[0].0.mul(&point_vec[0]);
        let mut right_first_val = eval_vec[0];
        let mut right_first_comm = cm_vec[0].0;

        let mut cur_challenge = *challenge;
        for i in 1..proofs.len() {
            let new_comm = proofs[i].0.mul(&cur_challenge);

            left_first.add_assign(&new_comm);
            right_first.add_assign(&new_comm.mul(&point_vec[i]));
            right_first_val.add_assign(&eval_vec[i].mul(&cur_challenge));
            right_first_comm.add_assign(&cm_vec[i].0.mul(&cur_challenge));

            cur_challenge.mul_assign(challenge);
        }
        right_first.sub_assign(&g1_0.mul(&right_first_val));
        right_first.add_assign(&right_first_comm);

        let pairing_eval = P::product_of_pairings(
            &[left_first, right_first.neg()],
            &[left_second, right_second],
        );

        if pairing_eval == P::Gt::get_identity() {
            Ok(())
        } else {
            Err(PolyComSchemeError::PCSVerifyEvalError)
        }
    }

    fn trim(&self, max_degree: usize) -> Result<Self> {
        if max_degree + 1 > self.public_parameter_group_1.len() {
            return Err(PolyComSchemeError::DegreeError);
        }
        Ok(Self {
            public_parameter_group_1: self.public_parameter_group_1[..=max_degree].to_vec(),
            public_parameter_group_2: self.public_parameter_group_2.clone(),
        })
    }

    fn shrink_to_verifier_only(&self) -> Self {
        Self {
            public_parameter_group_1: self.public_parameter_group_1.iter().take(1).copied().collect(),
            public_parameter_group_2: self.public_parameter_group_2.iter().take(2).copied().collect(),
        }
    }
}

#[cfg(test)]
mod tests_kzg_impl {
    use crate::poly_commit::{
        errors::PolyComSchemeError,
        field_polynomial::FpPolynomial,
        kzg_poly_com::{KZGCommitment, KZGCommitmentScheme, KZGCommitmentSchemeBN254},
        pcs::{HomomorphicPolyComElem, PolyComScheme},
    };
    use kite_algebra::{
        bn254::{BN254PairingEngine, BN254Scalar, BN254G1},
        prelude::*,
    };

    type F = BN254Scalar;

    fn check_public_parameters_generation<P: Pairing>() {
        let param_size = 5;
        let mut prng = test_rng();
        let kzg_scheme = KZGCommitmentScheme::<P>::new(param_size, &mut prng);
        let g1_power1 = kzg_scheme.public_parameter_group_1[1];
        let g2_power1 = kzg_scheme.public_parameter_group_2[1];

        // Check parameters for G1
        for i in 0..param_size - 1 {
            let elem_first_group_1 = kzg_scheme.public_parameter_group_1[i];
            let elem_next_group_1 = kzg_scheme.public_parameter_group_1[i + 1];
            assert_eq!(
                P::pairing(&elem_first_group_1, &g2_power1),
                P::pairing(&elem_next_group_1, &P::G2::get_base())
            );
        }

        // Check parameters for G2
        let elem_first_group_2 = kzg_scheme.public_parameter_group_2[0];
        let elem_second_group_2 = kzg_scheme.public_parameter_group_2[1];
        assert_eq!(
            P::pairing(&g1_power1, &elem_first_group_2),
            P::pairing(&P::G1::get_base(), &elem_second_group_2)
        );
    }

    #[test]
    fn test_public_parameters() {
        check_public_parameters_generation::<BN254PairingEngine>();
    }

    #[test]
    fn test_generation_of_crs() {
        let n = 1 << 5;
        let mut prng = test_rng();
        let kzg_scheme = KZGCommitmentSchemeBN254::new(n, &mut prng);
        assert_eq!(kzg_scheme.public_parameter_group_1.len(), n + 1);
        assert_eq!(kzg_scheme.public_parameter_group_2.len(), 2);
        assert_eq!(kzg_scheme.max_degree(), n);

        let trimmed = kzg_scheme.trim(9).unwrap();
        assert_eq!(trimmed.max_degree(), 9);
        assert_eq!(
            kzg_scheme.trim(n + 1).unwrap_err(),
            PolyComSchemeError::DegreeError
        );
    }

    #[test]
    fn test_homomorphic_poly_com_elem() {
        let mut prng = test_rng();
        let pcs = KZGCommitmentSchemeBN254::new(20, &mut prng);
        let one = F::one();
        let two = one.add(&one);
        let three = two.add(&one);
        let four = three.add(&one);
        let six = three.add(&three);
        let eight = six.add(&two);
        let poly1 = FpPolynomial::from_coefs(vec![two, three, six]);
        let commitment1 = pcs.commit(&poly1).unwrap();

        let poly2 = FpPolynomial::from_coefs(vec![one, eight, four]);
        let commitment2 = pcs.commit(&poly2).unwrap();

        // Add two polynomials
        let poly_sum = poly1.add(&poly2);
        let commitment_sum = pcs.commit(&poly_sum).unwrap();
        assert_eq!(commitment_sum, commitment1.add(&commitment2));

        // Multiplying all the coefficients of a polynomial by some value
        let exponent = four.add(&one);
        let poly1_mult_5 = poly1.mul_scalar(&exponent);
        let commitment_poly1_mult_5 = pcs.commit(&poly1_mult_5).unwrap();
        assert_eq!(commitment_poly1_mult_5, commitment1.mul(&exponent));
    }

    #[test]
    fn test_commit() {
        let mut prng = test_rng();
        let pcs = KZGCommitmentSchemeBN254::new(10, &mut prng);
        let one = F::one();
        let two = one.add(&one);
        let three = two.add(&one);
        let six = three.add(&three);

        let fq_poly = FpPolynomial::from_coefs(vec![two, three, six]);
        let commitment = pcs.commit(&fq_poly).unwrap();

        // Doing the multiexp by hand
        let mut expected_committed_value = BN254G1::get_identity();
        for (i, coef) in fq_poly.get_coefs_ref().iter().enumerate() {
            let g_i = pcs.public_parameter_group_1[i];
            expected_committed_value = expected_committed_value.add(&g_i.mul(coef));
        }
        assert_eq!(expected_committed_value, commitment.0);

        let too_long = FpPolynomial::<F>::random(&mut prng, 11);
        assert_eq!(
            pcs.commit(&too_long).unwrap_err(),
            PolyComSchemeError::DegreeError
        );
    }

    #[test]
    fn test_eval() {
        let mut prng = test_rng();
        let pcs = KZGCommitmentSchemeBN254::new(10, &mut prng);
        let one = F::one();
        let two = one.add(&one);
        let four = two.add(&two);
        let seven = four.add(&two).add(&one);
        let fq_poly = FpPolynomial::from_coefs(vec![one, two, four]);
        let point = one;
        let max_degree = fq_poly.degree();

        let commitment_value = pcs.commit(&fq_poly).unwrap();

        // Check that an error is returned if the degree of the polynomial exceeds the maximum degree.
        assert!(pcs.prove(&fq_poly, &point, 1).is_err());

        let proof = pcs.prove(&fq_poly, &point, max_degree).unwrap();
        assert!(pcs.verify(&commitment_value, &point, &seven, &proof).is_ok());

        let new_pcs = pcs.shrink_to_verifier_only();
        assert_eq!(new_pcs.public_parameter_group_1.len(), 1);
        assert!(new_pcs
            .verify(&commitment_value, &point, &seven, &proof)
            .is_ok());

        assert_eq!(
            pcs.verify(&commitment_value, &point, &one, &proof),
            Err(PolyComSchemeError::PCSVerifyEvalError)
        );
    }

    #[test]
    fn test_batch_verify_diff_points() {
        let mut prng = test_rng();
        let pcs = KZGCommitmentSchemeBN254::new(16, &mut prng);
        let verifier_pcs = pcs.shrink_to_verifier_only();

        let polys: Vec<FpPolynomial<F>> = (0..2)
            .map(|_| FpPolynomial::random(&mut prng, 12))
            .collect();
        let points: Vec<F> = (0..2).map(|_| F::random(&mut prng)).collect();
        let cms: Vec<KZGCommitment<BN254G1>> =
            polys.iter().map(|p| pcs.commit(p).unwrap()).collect();
        let evals: Vec<F> = polys.iter().zip(&points).map(|(p, x)| p.eval(x)).collect();
        let proofs: Vec<KZGCommitment<BN254G1>> = polys
            .iter()
            .zip(&points)
            .map(|(p, x)| pcs.prove(p, x, 16).unwrap())
            .collect();
        let u = F::random(&mut prng);

        assert!(verifier_pcs
            .batch_verify_diff_points(&cms, &points, &evals, &proofs, &u)
            .is_ok());

        let mut bad_evals = evals.clone();
        bad_evals[1].add_assign(&F::one());
        assert!(verifier_pcs
            .batch_verify_diff_points(&cms, &points, &bad_evals, &proofs, &u)
            .is_err());

        assert_eq!(
            verifier_pcs.batch_verify_diff_points(&cms, &points[..1], &evals, &proofs, &u),
            Err(PolyComSchemeError::ParameterError)
        );
    }

    #[test]
    fn test_unchecked_bytes() {
        let mut prng = test_rng();
        let pcs = KZGCommitmentSchemeBN254::new(8, &mut prng);
        let bytes = pcs.to_unchecked_bytes();
        let decoded = KZGCommitmentSchemeBN254::from_unchecked_bytes(&bytes).unwrap();
        assert_eq!(pcs, decoded);

        assert!(KZGCommitmentSchemeBN254::from_unchecked_bytes(&bytes[..bytes.len() - 1]).is_err());
        assert!(KZGCommitmentSchemeBN254::from_unchecked_bytes(&bytes[..4]).is_err());
    }

    #[test]
    fn test_commitment_bytes() {
        let mut prng = test_rng();
        let cm = KZGCommitment(BN254G1::random(&mut prng));
        let bytes = cm.kite_to_bytes();
        assert_eq!(KZGCommitment::<BN254G1>::kite_from_bytes(&bytes).unwrap(), cm);
    }
}
