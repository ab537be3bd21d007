use crate::{
    errors::{PlonkError, Result},
    plonk::{
        constants::{NUM_WIRES, PLONK_TRANSCRIPT_LABEL},
        helpers::{
            compute_z_evals, hide_polynomial, open_at, r_poly, split_t_and_commit, t_poly,
            PlonkChallenges,
        },
        indexer::{PlonkPf, ProvingKey},
        session::ProverSession,
        transcript::{
            transcript_get_plonk_challenge_alpha, transcript_get_plonk_challenge_beta,
            transcript_get_plonk_challenge_gamma, transcript_get_plonk_challenge_u,
            transcript_get_plonk_challenge_v, transcript_get_plonk_challenge_xi,
        },
    },
    poly_commit::{
        field_polynomial::FpPolynomial, pcs::PolyComScheme, transcript::PolyComTranscript,
    },
};
use ark_std::{cfg_into_iter, end_timer, start_timer};
use kite_algebra::prelude::*;
use merlin::Transcript;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// PLONK Prover: it produces a proof that `witness` satisfies the circuit of `pk`, together
/// with the public inputs the proof is bound to.
///
/// `witness` is indexed by R1CS signal, `witness[0]` being one and `witness[1..=n_public]`
/// the public inputs.
/// # Example
/// ```
/// use kite_plonk::plonk::{
///     indexer::setup,
///     prover::prove,
///     r1cs::{LinearCombination, R1CS},
///     verifier::verify,
/// };
/// use kite_plonk::poly_commit::kzg_poly_com::KZGCommitmentSchemeBN254;
/// use rand_chacha::ChaChaRng;
/// use kite_algebra::{prelude::*, bn254::BN254Scalar};
///
/// let mut prng = ChaChaRng::from_seed([0u8; 32]);
/// let pcs = KZGCommitmentSchemeBN254::new(20, &mut prng);
///
/// // out * 1 = a * b, with out and a public
/// let mut r1cs = R1CS::new(4, 2);
/// r1cs.add_constraint(
///     LinearCombination::signal(2),
///     LinearCombination::signal(3),
///     LinearCombination::signal(1),
/// );
/// let pk = setup(&r1cs, &pcs).unwrap();
///
/// let witness: Vec<BN254Scalar> = [1u32, 12, 3, 4].iter().map(|x| BN254Scalar::from(*x)).collect();
/// let (proof, public_inputs) = prove(&mut prng, &pk, &witness).unwrap();
/// assert_eq!(public_inputs, vec![BN254Scalar::from(12u32), BN254Scalar::from(3u32)]);
/// assert!(verify(pk.get_verifier_params_ref(), &public_inputs, &proof));
/// ```
pub fn prove<R: CryptoRng + RngCore, PCS: PolyComScheme>(
    prng: &mut R,
    pk: &ProvingKey<PCS>,
    witness: &[PCS::Field],
) -> Result<(PlonkPf<PCS>, Vec<PCS::Field>)> {
    let mut transcript = Transcript::new(PLONK_TRANSCRIPT_LABEL);
    prove_with_transcript(prng, &mut transcript, pk, witness)
}

/// Same as [`prove`], on a caller-provided transcript. The verifier must start from a
/// transcript in the same state.
pub fn prove_with_transcript<R: CryptoRng + RngCore, PCS: PolyComScheme>(
    prng: &mut R,
    transcript: &mut Transcript,
    pk: &ProvingKey<PCS>,
    witness: &[PCS::Field],
) -> Result<(PlonkPf<PCS>, Vec<PCS::Field>)> {
    let (proof, public_inputs, _) = prove_with_challenges(prng, transcript, pk, witness)?;
    Ok((proof, public_inputs))
}

/// Run the five rounds, also returning the challenges drawn on the way.
pub(crate) fn prove_with_challenges<R: CryptoRng + RngCore, PCS: PolyComScheme>(
    prng: &mut R,
    transcript: &mut Transcript,
    pk: &ProvingKey<PCS>,
    witness: &[PCS::Field],
) -> Result<(PlonkPf<PCS>, Vec<PCS::Field>, PlonkChallenges<PCS::Field>)> {
    let prover_timer = start_timer!(|| "PLONK::Prover");

    let mut session = ProverSession::new(prng, transcript, pk, witness)?;
    round_1(&mut session)?;
    round_2(&mut session)?;
    round_3(&mut session)?;
    round_4(&mut session)?;
    round_5(&mut session)?;

    end_timer!(prover_timer);
    Ok(session.finish())
}

/// Round 1: interpolate the wire columns, blind them and commit.
pub(super) fn round_1<PCS: PolyComScheme>(session: &mut ProverSession<PCS>) -> Result<()> {
    let timer = start_timer!(|| "Round 1: wire polynomials");
    let pk = session.pk;
    let n = pk.domain().size();
    let radix2 = pk.domain().radix2()?;

    let blinds: Vec<[PCS::Field; 2]> = (0..NUM_WIRES)
        .map(|col| session.wire_blinds(col))
        .collect();
    let wires = &session.wires;
    let wire_polys: Vec<FpPolynomial<PCS::Field>> = cfg_into_iter!(0..NUM_WIRES)
        .map(|col| {
            let mut poly = FpPolynomial::ifft_with_domain(&radix2, wires.column(col));
            hide_polynomial(&mut poly, &blinds[col], n);
            poly
        })
        .collect();

    for poly in wire_polys.iter() {
        let cm = pk.pcs.commit(poly)?;
        session.transcript.append_commitment(&cm);
        session.cm_w_vec.push(cm);
    }
    session.wire_polys = wire_polys;
    end_timer!(timer);
    Ok(())
}

/// Round 2: draw `beta, gamma`, build the grand product `Z`, blind it and commit.
pub(super) fn round_2<PCS: PolyComScheme>(session: &mut ProverSession<PCS>) -> Result<()> {
    let timer = start_timer!(|| "Round 2: z polynomial");
    let pk = session.pk;
    let n = pk.domain().size();

    let beta = transcript_get_plonk_challenge_beta(session.transcript, n);
    let gamma = transcript_get_plonk_challenge_gamma(session.transcript, n);
    session.challenges.insert_beta_gamma(beta, gamma)?;

    let z_evals = compute_z_evals(pk, &session.wires, &beta, &gamma)?;
    let mut z_poly = FpPolynomial::ifft_with_domain(&pk.domain().radix2()?, &z_evals);
    hide_polynomial(&mut z_poly, &session.z_blinds(), n);

    let cm_z = pk.pcs.commit(&z_poly)?;
    session.transcript.append_commitment(&cm_z);
    session.cm_z = cm_z;
    session.z_poly = z_poly;
    end_timer!(timer);
    Ok(())
}

/// Round 3: draw `alpha`, compute the quotient `t`, split it and commit to the pieces.
pub(super) fn round_3<PCS: PolyComScheme>(session: &mut ProverSession<PCS>) -> Result<()> {
    let timer = start_timer!(|| "Round 3: t polynomial");
    let pk = session.pk;
    let n = pk.domain().size();

    let alpha = transcript_get_plonk_challenge_alpha(session.transcript, n);
    session.challenges.insert_alpha(alpha)?;

    let t = t_poly(
        pk,
        &session.challenges,
        &session.wire_polys,
        &session.z_poly,
        &session.pi_poly,
    )?;
    let (b10, b11) = session.split_blinds();
    let (cm_t_vec, t_polys) = split_t_and_commit(&pk.pcs, &t, n, b10, b11)?;

    for cm_t in cm_t_vec.iter() {
        session.transcript.append_commitment(cm_t);
    }
    session.cm_t_vec = cm_t_vec;
    session.t_polys = t_polys;
    end_timer!(timer);
    Ok(())
}

/// Round 4: draw `xi`, open the wires and permutations at `xi` and `Z` at `xi * w`,
/// then build and open the linearization `r`.
pub(super) fn round_4<PCS: PolyComScheme>(session: &mut ProverSession<PCS>) -> Result<()> {
    let timer = start_timer!(|| "Round 4: openings and r polynomial");
    let pk = session.pk;
    let domain = pk.domain();

    let xi = transcript_get_plonk_challenge_xi(session.transcript, domain.size());
    session.challenges.insert_xi(xi)?;

    let [a, b, c] = match session.wire_polys.as_slice() {
        [a, b, c] => [a.eval(&xi), b.eval(&xi), c.eval(&xi)],
        _ => return Err(PlonkError::FuncParamsError),
    };
    let [s1, s2] = match pk.s_polys.as_slice() {
        [s1, s2, _] => [s1.eval(&xi), s2.eval(&xi)],
        _ => return Err(PlonkError::FuncParamsError),
    };
    let zw = session.z_poly.eval(&xi.mul(domain.omega()));
    session.evals.a = a;
    session.evals.b = b;
    session.evals.c = c;
    session.evals.s1 = s1;
    session.evals.s2 = s2;
    session.evals.zw = zw;

    let r = r_poly(pk, &session.z_poly, &session.evals, &session.challenges)?;
    session.evals.r = r.eval(&xi);
    session.r_poly = r;

    for eval in session.evals.to_array().iter() {
        session.transcript.append_field_elem(eval);
    }
    end_timer!(timer);
    Ok(())
}

/// Round 5: draw `v`, open the batched polynomial at `xi` and `Z` at `xi * w`, then draw
/// `u` so the transcript ends where the verifier's does.
pub(super) fn round_5<PCS: PolyComScheme>(session: &mut ProverSession<PCS>) -> Result<()> {
    let timer = start_timer!(|| "Round 5: opening proofs");
    let pk = session.pk;
    let domain = pk.domain();
    let n = domain.size();

    let v = transcript_get_plonk_challenge_v(session.transcript, n);
    session.challenges.insert_v(v)?;
    let xi = *session.challenges.get_xi()?;

    // W = T1 + xi^n T2 + xi^2n T3 + v r + v^2 a + v^3 b + v^4 c + v^5 s1 + v^6 s2
    let xi_n = xi.pow(&[n as u64]);
    let mut w_poly = FpPolynomial::zero();
    let mut xi_power = PCS::Field::one();
    for t in session.t_polys.iter() {
        w_poly.add_assign(&t.mul_scalar(&xi_power));
        xi_power.mul_assign(&xi_n);
    }
    let t_xi = session
        .t_polys
        .iter()
        .rev()
        .fold(PCS::Field::zero(), |acc, t| acc.mul(&xi_n).add(&t.eval(&xi)));

    let batched: Vec<(&FpPolynomial<PCS::Field>, &PCS::Field)> = vec![
        (&session.r_poly, &session.evals.r),
        (&session.wire_polys[0], &session.evals.a),
        (&session.wire_polys[1], &session.evals.b),
        (&session.wire_polys[2], &session.evals.c),
        (&pk.s_polys[0], &session.evals.s1),
        (&pk.s_polys[1], &session.evals.s2),
    ];
    let mut claimed = t_xi;
    let mut v_power = v;
    for (poly, eval) in batched {
        w_poly.add_assign(&poly.mul_scalar(&v_power));
        claimed.add_assign(&eval.mul(&v_power));
        v_power.mul_assign(&v);
    }

    let cm_w_xi = open_at(&pk.pcs, &w_poly, &xi, &claimed)?;
    let xi_omega = xi.mul(domain.omega());
    let cm_w_xi_omega = open_at(&pk.pcs, &session.z_poly, &xi_omega, &session.evals.zw)?;

    session.transcript.append_commitment(&cm_w_xi);
    session.transcript.append_commitment(&cm_w_xi_omega);
    let u = transcript_get_plonk_challenge_u(session.transcript, n);
    session.challenges.insert_u(u)?;

    session.cm_w_xi = cm_w_xi;
    session.cm_w_xi_omega = cm_w_xi_omega;
    end_timer!(timer);
    Ok(())
}

#[cfg(test)]
mod test {
    use crate::{
        errors::PlonkError,
        plonk::{
            constants::{NUM_WIRES, PLONK_TRANSCRIPT_LABEL},
            domain::WireColumns,
            helpers::compute_z_evals,
            indexer::{setup, ProvingKey},
            prover::{prove, prove_with_challenges, round_1, round_2, round_3},
            r1cs::{LinearCombination, R1CS},
            session::ProverSession,
        },
        poly_commit::{field_polynomial::FpPolynomial, kzg_poly_com::KZGCommitmentSchemeBN254},
    };
    use kite_algebra::{bn254::BN254Scalar, prelude::*};
    use merlin::Transcript;
    use rand_chacha::ChaChaRng;

    type F = BN254Scalar;

    fn witness(values: &[u32]) -> Vec<F> {
        values.iter().map(|x| F::from(*x)).collect()
    }

    /// `out = a * b` with `out, a` public: signals `[1, out, a, b]`.
    fn mul_circuit(pcs: &KZGCommitmentSchemeBN254) -> ProvingKey<KZGCommitmentSchemeBN254> {
        let mut r1cs = R1CS::new(4, 2);
        r1cs.add_constraint(
            LinearCombination::signal(2),
            LinearCombination::signal(3),
            LinearCombination::signal(1),
        );
        setup(&r1cs, pcs).unwrap()
    }

    /// Four constraints chaining `x` through squarings and a sum, so `x` and the
    /// intermediate signals appear on several wires.
    fn chain_circuit(pcs: &KZGCommitmentSchemeBN254) -> ProvingKey<KZGCommitmentSchemeBN254> {
        // signals: 1, out, x, y = x^2, z = y * x, w = z + x
        let mut r1cs = R1CS::new(6, 1);
        r1cs.add_constraint(
            LinearCombination::signal(2),
            LinearCombination::signal(2),
            LinearCombination::signal(3),
        );
        r1cs.add_constraint(
            LinearCombination::signal(3),
            LinearCombination::signal(2),
            LinearCombination::signal(4),
        );
        r1cs.add_constraint(
            LinearCombination::signal(4).with(2, F::one()),
            LinearCombination::constant(F::one()),
            LinearCombination::signal(5),
        );
        r1cs.add_constraint(
            LinearCombination::signal(5),
            LinearCombination::signal(2),
            LinearCombination::signal(1),
        );
        setup(&r1cs, pcs).unwrap()
    }

    fn chain_witness(x: u32) -> Vec<F> {
        let y = x * x;
        let z = y * x;
        let w = z + x;
        witness(&[1, w * x, x, y, z, w])
    }

    #[test]
    fn test_prove_returns_public_inputs() {
        let mut prng = ChaChaRng::from_seed([0u8; 32]);
        let pcs = KZGCommitmentSchemeBN254::new(20, &mut prng);
        let pk = mul_circuit(&pcs);

        let (proof, public_inputs) = prove(&mut prng, &pk, &witness(&[1, 12, 3, 4])).unwrap();
        assert_eq!(public_inputs, witness(&[12, 3]));
        assert_eq!(proof.cm_w_vec.len(), NUM_WIRES);
        assert_eq!(proof.cm_t_vec.len(), NUM_WIRES);
    }

    #[test]
    fn test_grand_product_closes() {
        let mut prng = ChaChaRng::from_seed([1u8; 32]);
        let pcs = KZGCommitmentSchemeBN254::new(40, &mut prng);
        let pk = chain_circuit(&pcs);
        assert!(pk.circuit.gates.len() >= 4);
        let n = pk.domain().size();

        let mut transcript = Transcript::new(b"test");
        let session =
            ProverSession::new(&mut prng, &mut transcript, &pk, &chain_witness(3)).unwrap();

        let beta = F::random(&mut prng);
        let gamma = F::random(&mut prng);
        let z = compute_z_evals(&pk, &session.wires, &beta, &gamma).unwrap();
        assert_eq!(z.len(), n);
        assert_eq!(z[0], F::one());

        // Closing the cycle from the last row returns to Z_0.
        let k = *pk.domain().k();
        let last = n - 1;
        let omega_last = pk.domain().elements()[last];
        let mut num = z[last];
        let mut den = F::one();
        for col in 0..NUM_WIRES {
            let w = session.wires.get(col, last);
            num.mul_assign(&w.add(&beta.mul(&k[col].mul(&omega_last))).add(&gamma));
            den.mul_assign(&w.add(&beta.mul(pk.sigma_evals.get(col, last))).add(&gamma));
        }
        assert_eq!(num.mul(&den.inv().unwrap()), z[0]);
    }

    #[test]
    fn test_copy_constraint_violation() {
        let mut prng = ChaChaRng::from_seed([2u8; 32]);
        let pcs = KZGCommitmentSchemeBN254::new(40, &mut prng);
        let pk = chain_circuit(&pcs);

        let mut transcript = Transcript::new(b"test");
        let mut session =
            ProverSession::new(&mut prng, &mut transcript, &pk, &chain_witness(3)).unwrap();
        // Break the copy of `x` between the first and the second gate.
        let mut columns: [Vec<F>; NUM_WIRES] =
            core::array::from_fn(|col| session.wires.column(col).to_vec());
        let row = pk.circuit.n_public;
        columns[0][row].add_assign(&F::one());
        session.wires = WireColumns::new(columns, pk.domain().size()).unwrap();

        round_1(&mut session).unwrap();
        assert_eq!(
            round_2(&mut session),
            Err(PlonkError::CopyConstraintViolation)
        );
    }

    #[test]
    fn test_unsatisfied_gate_fails_quotient() {
        let mut prng = ChaChaRng::from_seed([3u8; 32]);
        let pcs = KZGCommitmentSchemeBN254::new(20, &mut prng);
        let pk = mul_circuit(&pcs);

        // 12 != 3 * 5, every copy is consistent but the gate does not hold.
        let bad = witness(&[1, 12, 3, 5]);
        assert_eq!(
            pk.circuit.verify_witness(&pk.circuit.extend_witness(&bad).unwrap()),
            Err(PlonkError::UnsatisfiedGate(2))
        );
        assert_eq!(
            prove(&mut prng, &pk, &bad).map(|_| ()),
            Err(PlonkError::TDivisibilityError)
        );
    }

    #[test]
    fn test_quotient_exactness() {
        let mut prng = ChaChaRng::from_seed([4u8; 32]);
        let pcs = KZGCommitmentSchemeBN254::new(20, &mut prng);
        let pk = mul_circuit(&pcs);
        let domain = pk.domain();
        let n = domain.size();

        let mut transcript = Transcript::new(b"test");
        let mut session =
            ProverSession::new(&mut prng, &mut transcript, &pk, &witness(&[1, 12, 3, 4])).unwrap();
        round_1(&mut session).unwrap();
        round_2(&mut session).unwrap();
        round_3(&mut session).unwrap();

        // t from its pieces: T1 + X^n T2 + X^2n T3.
        let mut t = FpPolynomial::zero();
        for (i, piece) in session.t_polys.iter().enumerate() {
            let mut shifted = vec![F::zero(); i * n];
            shifted.extend_from_slice(piece.get_coefs_ref());
            t.add_assign(&FpPolynomial::from_coefs(shifted));
        }
        assert!(t.degree() <= 3 * n + 5);

        let (beta, gamma) = session.challenges.get_beta_gamma().unwrap();
        let alpha = session.challenges.get_alpha().unwrap();
        let k = *domain.k();
        let [a, b, c] = [
            &session.wire_polys[0],
            &session.wire_polys[1],
            &session.wire_polys[2],
        ];

        let combined = |x: &F| {
            let (av, bv, cv) = (a.eval(x), b.eval(x), c.eval(x));
            let q: Vec<F> = pk.q_polys.iter().map(|p| p.eval(x)).collect();
            let gate = q[0].mul(&av).mul(&bv)
                + q[1].mul(&av)
                + q[2].mul(&bv)
                + q[3].mul(&cv)
                + q[4]
                + session.pi_poly.eval(x);
            let wires = [av, bv, cv];
            let mut num = session.z_poly.eval(x);
            let mut den = session.z_poly.eval(&x.mul(domain.omega()));
            for col in 0..NUM_WIRES {
                num.mul_assign(&wires[col].add(&beta.mul(&k[col].mul(x))).add(gamma));
                den.mul_assign(
                    &wires[col]
                        .add(&beta.mul(&pk.s_polys[col].eval(x)))
                        .add(gamma),
                );
            }
            let boundary = session
                .z_poly
                .eval(x)
                .sub(&F::one())
                .mul(&domain.first_lagrange_eval(x).unwrap());
            gate + alpha.mul(&num.sub(&den)) + alpha.square().mul(&boundary)
        };

        // The combined constraint vanishes on every row. L1 has no closed form at w^0.
        for x in domain.elements().iter().skip(1) {
            assert!(combined(x).is_zero());
        }

        // t * Z_H matches the combined constraint off the domain.
        for _ in 0..4 {
            let x = F::random(&mut prng);
            assert_eq!(t.eval(&x).mul(&domain.vanishing_eval(&x)), combined(&x));
        }
    }

    #[test]
    fn test_witness_too_short() {
        let mut prng = ChaChaRng::from_seed([5u8; 32]);
        let pcs = KZGCommitmentSchemeBN254::new(20, &mut prng);
        let pk = mul_circuit(&pcs);
        assert_eq!(
            prove(&mut prng, &pk, &witness(&[1, 12, 3])).map(|_| ()),
            Err(PlonkError::WitnessIncomplete(3))
        );
    }

    #[test]
    fn test_proofs_are_blinded() {
        let mut prng = ChaChaRng::from_seed([6u8; 32]);
        let pcs = KZGCommitmentSchemeBN254::new(20, &mut prng);
        let pk = mul_circuit(&pcs);
        let w = witness(&[1, 12, 3, 4]);

        let (p1, _) = prove(&mut prng, &pk, &w).unwrap();
        let (p2, _) = prove(&mut prng, &pk, &w).unwrap();
        assert_ne!(p1.cm_w_vec, p2.cm_w_vec);
        assert_ne!(p1.cm_z, p2.cm_z);
    }

    #[test]
    fn test_challenges_are_complete() {
        let mut prng = ChaChaRng::from_seed([7u8; 32]);
        let pcs = KZGCommitmentSchemeBN254::new(20, &mut prng);
        let pk = mul_circuit(&pcs);

        let mut transcript = Transcript::new(PLONK_TRANSCRIPT_LABEL);
        let (_, _, challenges) =
            prove_with_challenges(&mut prng, &mut transcript, &pk, &witness(&[1, 12, 3, 4]))
                .unwrap();
        assert!(challenges.get_u().is_ok());
    }
}
