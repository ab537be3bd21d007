use rand_chacha::{
    rand_core::{CryptoRng, RngCore, SeedableRng},
    ChaChaRng,
};

fn fixed_test_rng() -> ChaChaRng {
    ChaChaRng::from_seed(*b"kite-algebra-deterministic-seed!")
}

/// Should be used only for tests, not for any real world usage.
#[cfg(not(feature = "std"))]
pub fn test_rng() -> impl RngCore + CryptoRng {
    fixed_test_rng()
}

/// Should be used only for tests, not for any real world usage.
///
/// Seeded from the OS unless `DETERMINISTIC_TEST_RNG=1` is set.
#[cfg(feature = "std")]
pub fn test_rng() -> impl RngCore + CryptoRng {
    let is_deterministic =
        std::env::var("DETERMINISTIC_TEST_RNG").map_or(false, |val| val == "1");
    if is_deterministic {
        fixed_test_rng()
    } else {
        ChaChaRng::from_entropy()
    }
}

#[cfg(test)]
mod test {
    use ark_std::UniformRand;

    #[test]
    fn test_fixed_seed() {
        let a = u128::rand(&mut super::fixed_test_rng());
        let b = u128::rand(&mut super::fixed_test_rng());
        assert_eq!(a, b);

        let mut rng = super::fixed_test_rng();
        let c = u128::rand(&mut rng);
        let d = u128::rand(&mut rng);
        assert_ne!(c, d);
    }
}
