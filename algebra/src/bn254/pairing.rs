use crate::bn254::{BN254Gt, BN254Scalar, BN254G1, BN254G2};
use crate::traits::Pairing;
use ark_bn254::{Bn254, G1Projective, G2Projective};
use ark_ec::{pairing::Pairing as ArkPairing, CurveGroup};
use ark_std::vec::Vec;

/// The pairing engine for BN254
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BN254PairingEngine;

impl Pairing for BN254PairingEngine {
    type ScalarField = BN254Scalar;
    type G1 = BN254G1;
    type G2 = BN254G2;
    type Gt = BN254Gt;

    #[inline]
    fn pairing(a: &Self::G1, b: &Self::G2) -> Self::Gt {
        BN254Gt(Bn254::pairing(a.0.into_affine(), b.0.into_affine()).0)
    }

    #[inline]
    fn product_of_pairings(a: &[Self::G1], b: &[Self::G2]) -> Self::Gt {
        let c1 = G1Projective::normalize_batch(&a.iter().map(|x| x.0).collect::<Vec<_>>());
        let c2 = G2Projective::normalize_batch(&b.iter().map(|x| x.0).collect::<Vec<_>>());
        BN254Gt(Bn254::multi_pairing(c1, c2).0)
    }
}
