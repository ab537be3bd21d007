use ark_std::{rand::SeedableRng, time::Instant};
use kite_algebra::{
    bn254::{BN254Scalar, BN254G1},
    traits::{Group, Scalar},
};
use rand_chacha::ChaChaRng;

fn main() {
    let mut prng = ChaChaRng::from_entropy();

    let count = 65536;

    let points: Vec<BN254G1> = (0..count).map(|_| BN254G1::random(&mut prng)).collect();
    let scalars: Vec<BN254Scalar> = (0..count).map(|_| BN254Scalar::random(&mut prng)).collect();

    let points_ptr = points.iter().collect::<Vec<&BN254G1>>();
    let scalars_ptr = scalars.iter().collect::<Vec<&BN254Scalar>>();

    let start = Instant::now();
    let _ = BN254G1::multi_exp(&scalars_ptr, &points_ptr);

    println!("total time: {} s", start.elapsed().as_secs_f32());
    println!("average time: {} us", start.elapsed().as_micros() / count);
}
