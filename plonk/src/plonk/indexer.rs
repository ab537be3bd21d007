use crate::{
    errors::{PlonkError, Result},
    plonk::{
        arithmetizer::{arithmetize, Circuit},
        constants::{NUM_WIRES, SRS_HEADROOM},
        domain::{CosetEvals, PlonkDomain, WireColumns},
        gate::GateKind,
        r1cs::R1CS,
    },
    poly_commit::{
        field_polynomial::FpPolynomial, kzg_poly_com::KZGCommitment, pcs::PolyComScheme,
    },
};
use ark_poly::EvaluationDomain;
use ark_std::{cfg_into_iter, cfg_iter, end_timer, start_timer};
use kite_algebra::prelude::*;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// The scalar openings of a proof.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct PlonkEvals<F> {
    /// `a(xi)`.
    pub a: F,
    /// `b(xi)`.
    pub b: F,
    /// `c(xi)`.
    pub c: F,
    /// `S1(xi)`.
    pub s1: F,
    /// `S2(xi)`.
    pub s2: F,
    /// `Z(xi * w)`.
    pub zw: F,
    /// `r(xi)`.
    pub r: F,
}

impl<F: Scalar> PlonkEvals<F> {
    /// The openings in transcript order.
    pub fn to_array(&self) -> [F; NUM_EVALS] {
        [self.a, self.b, self.c, self.s1, self.s2, self.zw, self.r]
    }

    /// Rebuild from the transcript order.
    pub fn from_array(evals: [F; NUM_EVALS]) -> Self {
        let [a, b, c, s1, s2, zw, r] = evals;
        Self {
            a,
            b,
            c,
            s1,
            s2,
            zw,
            r,
        }
    }
}

/// Number of commitments in a proof.
pub const NUM_PROOF_COMMITMENTS: usize = 9;

/// Number of scalar openings in a proof.
pub const NUM_EVALS: usize = 7;

/// The data structure of a Plonk proof.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PlonkProof<C, F> {
    /// The wire polynomial commitments `A, B, C`.
    pub cm_w_vec: Vec<C>,
    /// The grand product commitment.
    pub cm_z: C,
    /// The split quotient polynomial commitments `T1, T2, T3`.
    pub cm_t_vec: Vec<C>,
    /// The opening proof at `xi`.
    pub cm_w_xi: C,
    /// The opening proof at `xi * w`.
    pub cm_w_xi_omega: C,
    /// The scalar openings.
    pub evals: PlonkEvals<F>,
}

/// The type of the Plonk proof with a specific polynomial commitment scheme.
pub type PlonkPf<PCS> =
    PlonkProof<<PCS as PolyComScheme>::Commitment, <PCS as PolyComScheme>::Field>;

impl<C, F> PlonkProof<C, F> {
    /// The commitments in transcript order, if the proof has the right shape.
    pub fn commitments(&self) -> Option<[&C; NUM_PROOF_COMMITMENTS]> {
        match (self.cm_w_vec.as_slice(), self.cm_t_vec.as_slice()) {
            ([a, b, c], [t1, t2, t3]) => Some([
                a,
                b,
                c,
                &self.cm_z,
                t1,
                t2,
                t3,
                &self.cm_w_xi,
                &self.cm_w_xi_omega,
            ]),
            _ => None,
        }
    }
}

impl<G: Group> PlonkProof<KZGCommitment<G>, G::ScalarType> {
    /// Serialize as the domain size (u64, little endian), the nine commitments compressed,
    /// then the seven openings.
    pub fn to_bytes(&self, domain_size: usize) -> Result<Vec<u8>> {
        let commitments = self.commitments().ok_or(PlonkError::FuncParamsError)?;
        let mut bytes = Vec::with_capacity(
            8 + NUM_PROOF_COMMITMENTS * G::COMPRESSED_LEN
                + NUM_EVALS * G::ScalarType::bytes_len(),
        );
        bytes.extend((domain_size as u64).to_le_bytes());
        for cm in commitments.iter() {
            bytes.extend(cm.0.to_compressed_bytes());
        }
        for eval in self.evals.to_array().iter() {
            bytes.extend(eval.to_bytes());
        }
        Ok(bytes)
    }

    /// Parse the layout of `to_bytes`, checking that every point is on the curve and in
    /// the prime-order subgroup and that every scalar is canonical.
    pub fn from_bytes(bytes: &[u8]) -> Result<(usize, Self)> {
        let point_len = G::COMPRESSED_LEN;
        let scalar_len = G::ScalarType::bytes_len();
        if bytes.len() != 8 + NUM_PROOF_COMMITMENTS * point_len + NUM_EVALS * scalar_len {
            return Err(PlonkError::Algebra(AlgebraError::DeserializationError));
        }
        let mut header = [0u8; 8];
        header.copy_from_slice(&bytes[..8]);
        let domain_size = usize::try_from(u64::from_le_bytes(header))
            .map_err(|_| PlonkError::Algebra(AlgebraError::DeserializationError))?;

        let (point_bytes, scalar_bytes) = bytes[8..].split_at(NUM_PROOF_COMMITMENTS * point_len);
        let points = point_bytes
            .chunks_exact(point_len)
            .map(|b| G::from_compressed_bytes(b).map(KZGCommitment))
            .collect::<core::result::Result<Vec<_>, _>>()?;
        let evals = scalar_bytes
            .chunks_exact(scalar_len)
            .map(G::ScalarType::from_bytes)
            .collect::<core::result::Result<Vec<_>, _>>()?;
        let evals: [G::ScalarType; NUM_EVALS] = evals
            .try_into()
            .map_err(|_| PlonkError::Algebra(AlgebraError::DeserializationError))?;

        Ok((
            domain_size,
            Self {
                cm_w_vec: points[0..3].to_vec(),
                cm_z: points[3],
                cm_t_vec: points[4..7].to_vec(),
                cm_w_xi: points[7],
                cm_w_xi_omega: points[8],
                evals: PlonkEvals::from_array(evals),
            },
        ))
    }

    /// Parse a proof made for `vk`, rejecting a domain size header that does not match.
    pub fn from_bytes_for_key<PCS>(bytes: &[u8], vk: &VerificationKey<PCS>) -> Result<Self>
    where
        G::ScalarType: Domain,
        PCS: PolyComScheme<Commitment = KZGCommitment<G>, Field = G::ScalarType>,
    {
        let (domain_size, proof) = Self::from_bytes(bytes)?;
        if domain_size != vk.domain.size() {
            return Err(PlonkError::Algebra(AlgebraError::DeserializationError));
        }
        Ok(proof)
    }
}

/// Everything the verifier needs: the domain, the commitments of the selector and
/// permutation polynomials, and the `[1]_1, [1]_2, [tau]_2` part of the SRS.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "PCS: serde::Serialize",
    deserialize = "PCS: serde::Deserialize<'de>"
))]
pub struct VerificationKey<PCS: PolyComScheme> {
    /// The evaluation domain and its coset generators.
    pub domain: PlonkDomain<PCS::Field>,
    /// Number of public inputs.
    pub n_public: usize,
    /// The commitments of the selectors `Qm, Ql, Qr, Qo, Qc`.
    pub cm_q_vec: Vec<PCS::Commitment>,
    /// The commitments of the permutation polynomials `S1, S2, S3`.
    pub cm_s_vec: Vec<PCS::Commitment>,
    /// The verifier part of the SRS.
    pub pcs: PCS,
}

/// The proving key. Read-only once built, so one key can serve concurrent proofs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "PCS: serde::Serialize",
    deserialize = "PCS: serde::Deserialize<'de>"
))]
pub struct ProvingKey<PCS: PolyComScheme> {
    /// The circuit rows, needed to place the witness on the wires.
    pub circuit: Circuit<PCS::Field>,
    /// The selector polynomials `Qm, Ql, Qr, Qo, Qc`.
    pub q_polys: Vec<FpPolynomial<PCS::Field>>,
    /// The selector polynomials on the quotient coset.
    pub q_coset_evals: Vec<CosetEvals<PCS::Field>>,
    /// The permutation polynomials `S1, S2, S3`.
    pub s_polys: Vec<FpPolynomial<PCS::Field>>,
    /// The permutation polynomials on the quotient coset.
    pub s_coset_evals: Vec<CosetEvals<PCS::Field>>,
    /// The permutation polynomials on the domain.
    pub sigma_evals: WireColumns<PCS::Field>,
    /// The points of the quotient coset.
    pub coset_points: CosetEvals<PCS::Field>,
    /// `L1` on the quotient coset.
    pub l1_coset_evals: CosetEvals<PCS::Field>,
    /// `1 / Z_H` on the quotient coset.
    pub z_h_inv_coset_evals: CosetEvals<PCS::Field>,
    /// The SRS, trimmed to the powers this domain needs.
    pub pcs: PCS,
    /// The matching verification key.
    pub verifier_params: VerificationKey<PCS>,
}

impl<PCS: PolyComScheme> ProvingKey<PCS> {
    /// Return a reference of the verification key.
    pub fn get_verifier_params_ref(&self) -> &VerificationKey<PCS> {
        &self.verifier_params
    }

    /// Return the verification key.
    pub fn get_verifier_params(self) -> VerificationKey<PCS> {
        self.verifier_params
    }

    /// The evaluation domain.
    pub fn domain(&self) -> &PlonkDomain<PCS::Field> {
        &self.verifier_params.domain
    }
}

/// For every wire position `p = col * n + row`, the position of the next wire carrying the
/// same signal when scanning from the right (column C, last row) to the left, the last one
/// scanned wrapping to the first. Padding rows map to themselves.
pub(crate) fn compute_permutation<F: Scalar>(circuit: &Circuit<F>, n: usize) -> Vec<usize> {
    let mut perm: Vec<usize> = (0..NUM_WIRES * n).collect();
    let mut first = vec![None; circuit.n_signals];
    let mut last: Vec<Option<usize>> = vec![None; circuit.n_signals];
    for col in (0..NUM_WIRES).rev() {
        for (row, gate) in circuit.gates.iter().enumerate().rev() {
            let p = col * n + row;
            let signal = gate.wire(col);
            match last[signal] {
                Some(prev) => perm[prev] = p,
                None => first[signal] = Some(p),
            }
            last[signal] = Some(p);
        }
    }
    for (l, f) in last.iter().zip(first.iter()) {
        if let (Some(l), Some(f)) = (l, f) {
            perm[*l] = *f;
        }
    }
    perm
}

/// Builds proving and verification keys against an SRS.
pub struct KeyBuilder<'a, PCS> {
    pcs: &'a PCS,
}

impl<'a, PCS: PolyComScheme> KeyBuilder<'a, PCS> {
    /// A key builder committing with `pcs`.
    pub fn new(pcs: &'a PCS) -> Self {
        Self { pcs }
    }

    /// Preprocess the circuit into a proving key.
    pub fn build(&self, circuit: &Circuit<PCS::Field>) -> Result<ProvingKey<PCS>> {
        let build_time = start_timer!(|| "Build PLONK keys");
        circuit.check_signals()?;

        let domain = PlonkDomain::<PCS::Field>::new(circuit.domain_power)?;
        let n = domain.size();
        if circuit.gates.len() > n {
            return Err(PlonkError::CircuitTooLarge(circuit.gates.len()));
        }
        let srs_degree = n + SRS_HEADROOM - 1;
        if self.pcs.max_degree() < srs_degree {
            return Err(PlonkError::SrsTooShort(self.pcs.max_degree()));
        }
        let pcs = self.pcs.trim(srs_degree)?;

        let radix2 = domain.radix2()?;
        let extended = domain.extended()?;
        let g = domain.quotient_coset();
        let elements = domain.elements();

        // Step 1: the permutation, encoded as wire identities k_col * w^row.
        let step = start_timer!(|| "Permutation");
        let perm = compute_permutation(circuit, n);
        let k = *domain.k();
        let encoded: Vec<PCS::Field> = cfg_iter!(perm)
            .map(|p| k[p / n].mul(&elements[p % n]))
            .collect();
        let sigma_evals = WireColumns::new(
            core::array::from_fn(|col| encoded[col * n..(col + 1) * n].to_vec()),
            n,
        )?;
        end_timer!(step);

        // Step 2: selector and permutation polynomials, in coefficients and on the coset.
        let step = start_timer!(|| "Selector and permutation polynomials");
        let q_columns: Vec<Vec<PCS::Field>> = GateKind::ALL
            .iter()
            .flat_map(|kind| kind.preprocess(&circuit.gates, n))
            .collect();
        let q_polys: Vec<FpPolynomial<PCS::Field>> = cfg_iter!(q_columns)
            .map(|col| FpPolynomial::ifft_with_domain(&radix2, col))
            .collect();
        let s_polys: Vec<FpPolynomial<PCS::Field>> = cfg_into_iter!(0..NUM_WIRES)
            .map(|col| FpPolynomial::ifft_with_domain(&radix2, sigma_evals.column(col)))
            .collect();
        let q_coset_evals = cfg_iter!(q_polys)
            .map(|p| CosetEvals::new(p.coset_fft_with_domain(&extended, &g), n))
            .collect::<Result<Vec<_>>>()?;
        let s_coset_evals = cfg_iter!(s_polys)
            .map(|p| CosetEvals::new(p.coset_fft_with_domain(&extended, &g), n))
            .collect::<Result<Vec<_>>>()?;
        end_timer!(step);

        // Step 3: L1 and 1 / Z_H on the coset.
        let step = start_timer!(|| "Lagrange and vanishing evaluations");
        let points: Vec<PCS::Field> = extended
            .elements()
            .map(|x| g.mul(&PCS::Field::from_field(x)))
            .collect();
        let n_field = PCS::Field::from(n as u64);
        let evals = cfg_iter!(points)
            .map(|x| {
                let z_h = domain.vanishing_eval(x);
                let z_h_inv = z_h.inv().map_err(|_| PlonkError::DivisionByZero)?;
                let l1_denominator = n_field
                    .mul(&x.sub(&PCS::Field::one()))
                    .inv()
                    .map_err(|_| PlonkError::DivisionByZero)?;
                Ok((z_h.mul(&l1_denominator), z_h_inv))
            })
            .collect::<Result<Vec<_>>>()?;
        let (l1, z_h_inv): (Vec<_>, Vec<_>) = evals.into_iter().unzip();
        let l1_coset_evals = CosetEvals::new(l1, n)?;
        let z_h_inv_coset_evals = CosetEvals::new(z_h_inv, n)?;
        let coset_points = CosetEvals::new(points, n)?;
        end_timer!(step);

        // Step 4: commit.
        let step = start_timer!(|| "Commit selectors and permutations");
        let cm_q_vec = q_polys
            .iter()
            .map(|p| pcs.commit(p))
            .collect::<core::result::Result<Vec<_>, _>>()?;
        let cm_s_vec = s_polys
            .iter()
            .map(|p| pcs.commit(p))
            .collect::<core::result::Result<Vec<_>, _>>()?;
        end_timer!(step);

        let verifier_params = VerificationKey {
            domain,
            n_public: circuit.n_public,
            cm_q_vec,
            cm_s_vec,
            pcs: pcs.shrink_to_verifier_only(),
        };

        end_timer!(build_time);
        Ok(ProvingKey {
            circuit: circuit.clone(),
            q_polys,
            q_coset_evals,
            s_polys,
            s_coset_evals,
            sigma_evals,
            coset_points,
            l1_coset_evals,
            z_h_inv_coset_evals,
            pcs,
            verifier_params,
        })
    }
}

/// Arithmetize the R1CS and build its keys against `pcs`.
pub fn setup<PCS: PolyComScheme>(r1cs: &R1CS<PCS::Field>, pcs: &PCS) -> Result<ProvingKey<PCS>> {
    let circuit = arithmetize(r1cs, pcs.max_degree())?;
    KeyBuilder::new(pcs).build(&circuit)
}
