use crate::{
    errors::Result,
    plonk::{
        constants::{NUM_BLINDING_SCALARS, NUM_WIRES},
        domain::WireColumns,
        helpers::{pi_poly, PlonkChallenges},
        indexer::{PlonkEvals, PlonkPf, PlonkProof, ProvingKey},
        transcript::transcript_init_plonk,
    },
    poly_commit::{field_polynomial::FpPolynomial, pcs::PolyComScheme},
};
use kite_algebra::prelude::*;
use merlin::Transcript;

/// The state of one proof in progress.
///
/// A session owns everything a proof run produces: the blinding scalars, the witness
/// columns, the challenges and the polynomials of each round. It is passed by `&mut`
/// through the rounds and dropped with the run, so two proofs never share any of it.
pub struct ProverSession<'a, PCS: PolyComScheme> {
    pub(super) pk: &'a ProvingKey<PCS>,
    pub(super) transcript: &'a mut Transcript,
    blinds: [PCS::Field; NUM_BLINDING_SCALARS],
    pub(super) challenges: PlonkChallenges<PCS::Field>,
    pub(super) wires: WireColumns<PCS::Field>,
    pub(super) public_inputs: Vec<PCS::Field>,
    pub(super) pi_poly: FpPolynomial<PCS::Field>,

    pub(super) wire_polys: Vec<FpPolynomial<PCS::Field>>,
    pub(super) z_poly: FpPolynomial<PCS::Field>,
    pub(super) t_polys: Vec<FpPolynomial<PCS::Field>>,
    pub(super) r_poly: FpPolynomial<PCS::Field>,
    pub(super) evals: PlonkEvals<PCS::Field>,

    pub(super) cm_w_vec: Vec<PCS::Commitment>,
    pub(super) cm_z: PCS::Commitment,
    pub(super) cm_t_vec: Vec<PCS::Commitment>,
    pub(super) cm_w_xi: PCS::Commitment,
    pub(super) cm_w_xi_omega: PCS::Commitment,
}

impl<'a, PCS: PolyComScheme> ProverSession<'a, PCS> {
    /// Start a proof: place the witness on the wires, sample fresh blinding scalars and
    /// bind the transcript to the key and the public inputs.
    ///
    /// The public inputs are read back from the first rows of column A.
    pub fn new<R: CryptoRng + RngCore>(
        prng: &mut R,
        transcript: &'a mut Transcript,
        pk: &'a ProvingKey<PCS>,
        witness: &[PCS::Field],
    ) -> Result<Self> {
        let n = pk.domain().size();
        let extended = pk.circuit.extend_witness(witness)?;
        let wires = WireColumns::new(pk.circuit.wire_values(&extended, n)?, n)?;
        let public_inputs = wires.column(0)[..pk.circuit.n_public].to_vec();
        let pi_poly = pi_poly(pk, &public_inputs)?;

        let blinds = core::array::from_fn(|_| PCS::Field::random(prng));

        transcript_init_plonk(transcript, pk.get_verifier_params_ref(), &public_inputs);

        Ok(Self {
            pk,
            transcript,
            blinds,
            challenges: PlonkChallenges::new(),
            wires,
            public_inputs,
            pi_poly,
            wire_polys: Vec::with_capacity(NUM_WIRES),
            z_poly: FpPolynomial::zero(),
            t_polys: Vec::with_capacity(NUM_WIRES),
            r_poly: FpPolynomial::zero(),
            evals: PlonkEvals::default(),
            cm_w_vec: Vec::with_capacity(NUM_WIRES),
            cm_z: PCS::Commitment::default(),
            cm_t_vec: Vec::with_capacity(NUM_WIRES),
            cm_w_xi: PCS::Commitment::default(),
            cm_w_xi_omega: PCS::Commitment::default(),
        })
    }

    /// The blinding of wire column `col`, lowest power first: `b2, b1` for A,
    /// `b4, b3` for B and `b6, b5` for C.
    pub(super) fn wire_blinds(&self, col: usize) -> [PCS::Field; 2] {
        [self.blinds[2 * col + 1], self.blinds[2 * col]]
    }

    /// The blinding of `Z`, lowest power first: `b9, b8, b7`.
    pub(super) fn z_blinds(&self) -> [PCS::Field; 3] {
        [self.blinds[8], self.blinds[7], self.blinds[6]]
    }

    /// `b10` and `b11`, which rebalance the split of `t`.
    pub(super) fn split_blinds(&self) -> (&PCS::Field, &PCS::Field) {
        (&self.blinds[9], &self.blinds[10])
    }

    /// The challenges drawn so far.
    pub fn challenges(&self) -> &PlonkChallenges<PCS::Field> {
        &self.challenges
    }

    /// The public inputs the proof is bound to.
    pub fn public_inputs(&self) -> &[PCS::Field] {
        &self.public_inputs
    }

    /// Finish the session, returning the proof, the public inputs and the challenges.
    pub(super) fn finish(
        self,
    ) -> (
        PlonkPf<PCS>,
        Vec<PCS::Field>,
        PlonkChallenges<PCS::Field>,
    ) {
        let proof = PlonkProof {
            cm_w_vec: self.cm_w_vec,
            cm_z: self.cm_z,
            cm_t_vec: self.cm_t_vec,
            cm_w_xi: self.cm_w_xi,
            cm_w_xi_omega: self.cm_w_xi_omega,
            evals: self.evals,
        };
        (proof, self.public_inputs, self.challenges)
    }
}
