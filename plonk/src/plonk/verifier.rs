use crate::{
    errors::{PlonkError, Result},
    plonk::{
        constants::PLONK_TRANSCRIPT_LABEL,
        helpers::{eval_pi_poly, r_commitment, t_eval_xi, PlonkChallenges},
        indexer::{PlonkPf, VerificationKey},
        transcript::{
            transcript_get_plonk_challenge_alpha, transcript_get_plonk_challenge_beta,
            transcript_get_plonk_challenge_gamma, transcript_get_plonk_challenge_u,
            transcript_get_plonk_challenge_v, transcript_get_plonk_challenge_xi,
            transcript_init_plonk,
        },
    },
    poly_commit::{
        pcs::{HomomorphicPolyComElem, PolyComScheme},
        transcript::PolyComTranscript,
    },
};
use ark_std::{end_timer, start_timer};
use kite_algebra::prelude::*;
use merlin::Transcript;

/// Verify a proof against the verification key and the public inputs.
///
/// The verifier is total: a wrong number of public inputs, a commitment outside the
/// group, or a failed pairing check all give `false`.
pub fn verify<PCS: PolyComScheme>(
    vk: &VerificationKey<PCS>,
    public_inputs: &[PCS::Field],
    proof: &PlonkPf<PCS>,
) -> bool {
    let mut transcript = Transcript::new(PLONK_TRANSCRIPT_LABEL);
    verify_with_transcript(&mut transcript, vk, public_inputs, proof)
}

/// Same as [`verify`], on a caller-provided transcript in the state the prover started from.
pub fn verify_with_transcript<PCS: PolyComScheme>(
    transcript: &mut Transcript,
    vk: &VerificationKey<PCS>,
    public_inputs: &[PCS::Field],
    proof: &PlonkPf<PCS>,
) -> bool {
    let verifier_timer = start_timer!(|| "PLONK::Verifier");
    let result = check_proof(transcript, vk, public_inputs, proof);
    end_timer!(verifier_timer);
    result.is_ok()
}

/// Replay the transcript of a proof and return every challenge in it.
pub(crate) fn compute_challenges<PCS: PolyComScheme>(
    transcript: &mut Transcript,
    vk: &VerificationKey<PCS>,
    public_inputs: &[PCS::Field],
    proof: &PlonkPf<PCS>,
) -> Result<PlonkChallenges<PCS::Field>> {
    let n = vk.domain.size();
    let [cm_a, cm_b, cm_c, cm_z, cm_t1, cm_t2, cm_t3, cm_w_xi, cm_w_xi_omega] =
        proof.commitments().ok_or(PlonkError::FuncParamsError)?;

    transcript_init_plonk(transcript, vk, public_inputs);
    let mut challenges = PlonkChallenges::new();

    for cm in [cm_a, cm_b, cm_c] {
        transcript.append_commitment(cm);
    }
    let beta = transcript_get_plonk_challenge_beta(transcript, n);
    let gamma = transcript_get_plonk_challenge_gamma(transcript, n);
    challenges.insert_beta_gamma(beta, gamma)?;

    transcript.append_commitment(cm_z);
    challenges.insert_alpha(transcript_get_plonk_challenge_alpha(transcript, n))?;

    for cm in [cm_t1, cm_t2, cm_t3] {
        transcript.append_commitment(cm);
    }
    challenges.insert_xi(transcript_get_plonk_challenge_xi(transcript, n))?;

    for eval in proof.evals.to_array().iter() {
        transcript.append_field_elem(eval);
    }
    challenges.insert_v(transcript_get_plonk_challenge_v(transcript, n))?;

    transcript.append_commitment(cm_w_xi);
    transcript.append_commitment(cm_w_xi_omega);
    challenges.insert_u(transcript_get_plonk_challenge_u(transcript, n))?;

    Ok(challenges)
}

fn check_proof<PCS: PolyComScheme>(
    transcript: &mut Transcript,
    vk: &VerificationKey<PCS>,
    public_inputs: &[PCS::Field],
    proof: &PlonkPf<PCS>,
) -> Result<()> {
    if public_inputs.len() != vk.n_public {
        return Err(PlonkError::FuncParamsError);
    }
    let commitments = proof.commitments().ok_or(PlonkError::FuncParamsError)?;
    if !commitments.iter().all(|cm| vk.pcs.is_valid_commitment(cm)) {
        return Err(PlonkError::CommitmentError);
    }
    let [cm_a, cm_b, cm_c, cm_z, cm_t1, cm_t2, cm_t3, cm_w_xi, cm_w_xi_omega] = commitments;
    let [cm_s1, cm_s2, _] = vk.cm_s_vec.as_slice() else {
        return Err(PlonkError::FuncParamsError);
    };

    // 1. replay the transcript.
    let challenges = compute_challenges(transcript, vk, public_inputs, proof)?;
    let xi = challenges.get_xi()?;
    let v = challenges.get_v()?;
    let u = challenges.get_u()?;
    let n = vk.domain.size();

    // 2. L1(xi), PI(xi) and the value t(xi) the openings imply.
    let l1_xi = vk.domain.first_lagrange_eval(xi)?;
    let pi_xi = eval_pi_poly(vk, public_inputs, xi)?;
    let t_xi = t_eval_xi(&vk.domain, &proof.evals, &challenges, &pi_xi, &l1_xi)?;

    // 3. the linearization commitment.
    let cm_r = r_commitment(vk, cm_z, &proof.evals, &challenges, &l1_xi)?;

    // 4. F = T1 + xi^n T2 + xi^2n T3 + v [r] + v^2 A + v^3 B + v^4 C + v^5 S1 + v^6 S2
    //    E = t(xi) + v r + v^2 a + v^3 b + v^4 c + v^5 s1 + v^6 s2
    let xi_n = xi.pow(&[n as u64]);
    let mut cm_f = cm_t1.clone();
    cm_f.add_assign(&cm_t2.mul(&xi_n));
    cm_f.add_assign(&cm_t3.mul(&xi_n.square()));

    let batched = [
        (&cm_r, &proof.evals.r),
        (cm_a, &proof.evals.a),
        (cm_b, &proof.evals.b),
        (cm_c, &proof.evals.c),
        (cm_s1, &proof.evals.s1),
        (cm_s2, &proof.evals.s2),
    ];
    let mut eval_e = t_xi;
    let mut v_power = *v;
    for (cm, eval) in batched {
        cm_f.add_assign(&cm.mul(&v_power));
        eval_e.add_assign(&eval.mul(&v_power));
        v_power.mul_assign(v);
    }

    // 5. one pairing check for both openings.
    let xi_omega = xi.mul(vk.domain.omega());
    vk.pcs.batch_verify_diff_points(
        &[cm_f, cm_z.clone()],
        &[*xi, xi_omega],
        &[eval_e, proof.evals.zw],
        &[cm_w_xi.clone(), cm_w_xi_omega.clone()],
        u,
    )?;
    Ok(())
}
