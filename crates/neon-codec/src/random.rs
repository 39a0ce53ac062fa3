use rand::Rng;
use rand_core::OsRng;

use crate::error::CodecError;

/// Draws a uniformly distributed index in `[0, bound)` from the OS RNG.
///
/// Each call is independent; there is no state shared between callers.
pub fn random_index(bound: u32) -> Result<u32, CodecError> {
    random_index_with(&mut OsRng, bound)
}

/// Same as [`random_index`] with a caller-supplied RNG.
pub fn random_index_with<R: Rng + ?Sized>(rng: &mut R, bound: u32) -> Result<u32, CodecError> {
    if bound == 0 {
        return Err(CodecError::InvalidArgument(
            "index bound must be > 0".into(),
        ));
    }
    Ok(rng.gen_range(0..bound))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn zero_bound_is_invalid() {
        assert!(matches!(
            random_index(0),
            Err(CodecError::InvalidArgument(_))
        ));
    }

    #[test]
    fn bound_of_one_always_yields_zero() {
        for _ in 0..100 {
            assert_eq!(random_index(1).unwrap(), 0);
        }
    }

    #[test]
    fn indices_stay_below_bound() {
        for _ in 0..1_000 {
            assert!(random_index(7).unwrap() < 7);
        }
    }

    #[test]
    fn seeded_rng_is_reproducible() {
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);
        for _ in 0..32 {
            assert_eq!(
                random_index_with(&mut a, 10).unwrap(),
                random_index_with(&mut b, 10).unwrap()
            );
        }
    }

    #[test]
    fn every_index_is_reachable() {
        let mut seen = [false; 5];
        for _ in 0..1_000 {
            seen[random_index(5).unwrap() as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }
}
