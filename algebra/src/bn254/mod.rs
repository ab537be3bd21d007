/// The number of bytes for a scalar value over BN254.
pub const BN254_SCALAR_LEN: usize = 32;

mod fr;
pub use fr::*;

mod g1;
pub use g1::*;

mod g2;
pub use g2::*;

mod gt;
pub use gt::*;

mod pairing;
pub use pairing::*;

#[cfg(test)]
mod bn254_groups_test {
    use crate::{
        bn254::{BN254Gt, BN254PairingEngine, BN254Scalar, BN254G1, BN254G2},
        prelude::*,
        traits::group_tests::{test_multi_exp, test_scalar_operations, test_scalar_serialization},
    };
    use ark_bn254::{Fq, G1Affine};
    use ark_ec::CurveGroup;
    use ark_ff::One as _;

    #[test]
    fn test_scalar_ops() {
        test_scalar_operations::<BN254Scalar>();
    }

    #[test]
    fn scalar_deser() {
        test_scalar_serialization::<BN254Scalar>();
    }

    #[test]
    fn scalar_from_to_bytes() {
        let small_value = BN254Scalar::from(165747u32);
        let small_value_bytes = small_value.to_bytes();
        let expected_small_value_bytes: [u8; 32] = [
            115, 135, 2, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
            0, 0, 0, 0,
        ];
        assert_eq!(small_value_bytes, expected_small_value_bytes);

        let small_value_from_bytes = BN254Scalar::from_bytes(&small_value_bytes).unwrap();
        assert_eq!(small_value_from_bytes, small_value);
        assert!(BN254Scalar::from_bytes(&[0u8; 33]).is_err());
    }

    #[test]
    fn scalar_generator_is_non_residue() {
        let g = BN254Scalar::multiplicative_generator();
        let half: num_bigint::BigUint = (BN254Scalar::get_field_size_biguint() - 1u32) >> 1;
        assert_eq!(g.pow(&half.to_u64_digits()), BN254Scalar::one().neg());
        assert_ne!(g.pow(&[1u64 << 28]), BN254Scalar::one());
    }

    #[test]
    fn multi_exp() {
        test_multi_exp::<BN254G1>();
        test_multi_exp::<BN254G2>();
    }

    #[test]
    fn bilinear_properties() {
        let identity_gt_computed =
            BN254PairingEngine::pairing(&BN254G1::get_identity(), &BN254G2::get_identity());
        assert_eq!(BN254Gt::get_identity(), identity_gt_computed);

        let mut prng = test_rng();
        let s1 = BN254Scalar::random(&mut prng);
        let s2 = BN254Scalar::random(&mut prng);

        let base_g1 = BN254G1::get_base();
        let base_g2 = BN254G2::get_base();
        let gt_mapped_element = BN254PairingEngine::pairing(&base_g1.mul(&s1), &base_g2.mul(&s2));
        let base_gt = BN254Gt::get_base();

        assert_eq!(gt_mapped_element, base_gt.mul(&s1).mul(&s2));
        assert_eq!(
            gt_mapped_element,
            BN254PairingEngine::pairing(&base_g1, &base_g2.mul(&s2)).mul(&s1)
        );

        // e(s1 * g1, s2 * g2) * e(-(s1 * s2) * g1, g2) == 1
        let product = BN254PairingEngine::product_of_pairings(
            &[base_g1.mul(&s1), base_g1.mul(&(s1 * s2)).neg()],
            &[base_g2.mul(&s2), base_g2],
        );
        assert_eq!(product, BN254Gt::get_identity());
        assert!(base_gt.is_valid());
    }

    #[test]
    fn validity_of_points() {
        let mut prng = test_rng();
        assert!(BN254G1::random(&mut prng).is_valid());
        assert!(BN254G2::random(&mut prng).is_valid());
        assert!(BN254G1::get_identity().is_valid());

        // (1, 1) is not on y^2 = x^3 + 3.
        let off_curve = G1Affine::new_unchecked(Fq::one(), Fq::one());
        assert!(!BN254G1(off_curve.into()).is_valid());
        assert!(BN254G1::from_unchecked_bytes(&BN254G1(off_curve.into()).to_unchecked_bytes())
            .map_or(true, |p| !p.is_valid()));
    }

    #[test]
    fn test_serialization_of_points() {
        let mut prng = test_rng();

        let g1 = BN254G1::random(&mut prng);
        let g1_bytes = g1.to_compressed_bytes();
        assert_eq!(g1_bytes.len(), BN254G1::COMPRESSED_LEN);
        assert_eq!(g1, BN254G1::from_compressed_bytes(&g1_bytes).unwrap());
        assert_eq!(
            g1,
            BN254G1::from_unchecked_bytes(&g1.to_unchecked_bytes()).unwrap()
        );
        assert_eq!(g1.0.into_affine(), G1Affine::from(g1.0));

        let g2 = BN254G2::random(&mut prng);
        let g2_bytes = g2.to_compressed_bytes();
        assert_eq!(g2_bytes.len(), BN254G2::COMPRESSED_LEN);
        assert_eq!(g2, BN254G2::from_compressed_bytes(&g2_bytes).unwrap());

        let gt = BN254Gt::random(&mut prng);
        let gt_bytes = gt.to_compressed_bytes();
        assert_eq!(gt, BN254Gt::from_compressed_bytes(&gt_bytes).unwrap());
    }

    #[test]
    fn test_serde() {
        let mut prng = test_rng();
        let s = BN254Scalar::random(&mut prng);
        let g1 = BN254G1::random(&mut prng);

        let json = serde_json::to_string(&(s, g1)).unwrap();
        let (s2, g12): (BN254Scalar, BN254G1) = serde_json::from_str(&json).unwrap();
        assert_eq!(s, s2);
        assert_eq!(g1, g12);

        let bin = bincode::serialize(&g1).unwrap();
        assert_eq!(g1, bincode::deserialize::<BN254G1>(&bin).unwrap());
    }
}
