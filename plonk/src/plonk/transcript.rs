use crate::{
    plonk::indexer::VerificationKey,
    poly_commit::{pcs::PolyComScheme, transcript::PolyComTranscript},
};
use kite_algebra::prelude::*;
use merlin::Transcript;

/// Bind the transcript to the verification key and the public inputs.
pub(crate) fn transcript_init_plonk<PCS: PolyComScheme>(
    transcript: &mut Transcript,
    vk: &VerificationKey<PCS>,
    public_inputs: &[PCS::Field],
) {
    transcript.append_message(b"New Domain", b"PLONK");

    transcript.append_u64(b"domain size", vk.domain.size() as u64);
    transcript.append_message(b"field size", &PCS::Field::get_field_size_le_bytes());
    transcript.append_u64(b"public inputs", vk.n_public as u64);
    for q in vk.cm_q_vec.iter() {
        transcript.append_commitment(q);
    }
    for s in vk.cm_s_vec.iter() {
        transcript.append_commitment(s);
    }
    transcript.append_field_elem(vk.domain.omega());
    for generator in vk.domain.k().iter() {
        transcript.append_field_elem(generator);
    }

    for x in public_inputs.iter() {
        transcript.append_field_elem(x);
    }
}

/// Draw a challenge that is not in the domain of size `domain_size`, so that no
/// Lagrange or vanishing evaluation at it divides by zero.
pub(crate) fn transcript_get_challenge_field_elem<F: Scalar>(
    transcript: &mut Transcript,
    domain_size: usize,
    label: &'static [u8],
) -> F {
    loop {
        let elem: F = transcript.get_challenge_field_elem(label);
        if elem.pow(&[domain_size as u64]) != F::one() {
            return elem;
        }
    }
}

/// Return the challenge result by label: "beta".
pub(crate) fn transcript_get_plonk_challenge_beta<F: Scalar>(
    transcript: &mut Transcript,
    domain_size: usize,
) -> F {
    transcript_get_challenge_field_elem(transcript, domain_size, b"beta")
}

/// Return the challenge result by label: "gamma".
pub(crate) fn transcript_get_plonk_challenge_gamma<F: Scalar>(
    transcript: &mut Transcript,
    domain_size: usize,
) -> F {
    transcript_get_challenge_field_elem(transcript, domain_size, b"gamma")
}

/// Return the challenge result by label: "alpha".
pub(crate) fn transcript_get_plonk_challenge_alpha<F: Scalar>(
    transcript: &mut Transcript,
    domain_size: usize,
) -> F {
    transcript_get_challenge_field_elem(transcript, domain_size, b"alpha")
}

/// Return the challenge result by label: "xi".
pub(crate) fn transcript_get_plonk_challenge_xi<F: Scalar>(
    transcript: &mut Transcript,
    domain_size: usize,
) -> F {
    transcript_get_challenge_field_elem(transcript, domain_size, b"xi")
}

/// Return the challenge result by label: "v".
pub(crate) fn transcript_get_plonk_challenge_v<F: Scalar>(
    transcript: &mut Transcript,
    domain_size: usize,
) -> F {
    transcript_get_challenge_field_elem(transcript, domain_size, b"v")
}

/// Return the challenge result by label: "u".
pub(crate) fn transcript_get_plonk_challenge_u<F: Scalar>(
    transcript: &mut Transcript,
    domain_size: usize,
) -> F {
    transcript_get_challenge_field_elem(transcript, domain_size, b"u")
}

#[cfg(test)]
mod test {
    use crate::{
        plonk::transcript::transcript_get_challenge_field_elem,
        poly_commit::transcript::PolyComTranscript,
    };
    use kite_algebra::{bn254::BN254Scalar, prelude::*};
    use merlin::Transcript;

    #[test]
    fn test_challenge_outside_domain() {
        let mut transcript = Transcript::new(b"test");
        for _ in 0..16 {
            let c: BN254Scalar = transcript_get_challenge_field_elem(&mut transcript, 8, b"c");
            assert_ne!(c.pow(&[8]), BN254Scalar::one());
        }
    }

    #[test]
    fn test_challenge_uses_pcs_draw() {
        let mut t1 = Transcript::new(b"test");
        let mut t2 = Transcript::new(b"test");
        let c1: BN254Scalar = transcript_get_challenge_field_elem(&mut t1, 8, b"beta");
        let c2: BN254Scalar = t2.get_challenge_field_elem(b"beta");
        assert_eq!(c1, c2);
    }
}
