use ark_std::time::Instant;
use kite_algebra::{bn254::BN254Scalar, prelude::*};
use kite_plonk::poly_commit::field_polynomial::FpPolynomial;

fn main() {
    let mut prng = test_rng();
    let n = 65536;

    let domain = FpPolynomial::<BN254Scalar>::evaluation_domain(n).unwrap();
    let extended = FpPolynomial::<BN254Scalar>::evaluation_domain(4 * n).unwrap();
    let g = BN254Scalar::multiplicative_generator();

    let poly = FpPolynomial::<BN254Scalar>::random(&mut prng, n - 1);

    let start = Instant::now();
    for _ in 0..10 {
        let _ = poly.fft_with_domain(&domain);
    }
    println!("fft time: {} s", start.elapsed().as_secs_f32() / 10f32);

    let start = Instant::now();
    for _ in 0..10 {
        let _ = poly.coset_fft_with_domain(&extended, &g);
    }
    println!("4x coset fft time: {} s", start.elapsed().as_secs_f32() / 10f32);
}
