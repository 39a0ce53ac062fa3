//! Program Derived Address (PDA) primitive.
//!
//! A PDA is `SHA-256(seed_0 || ... || seed_n || bump || program_id ||
//! "ProgramDerivedAddress")` for the first bump, searched from 255 down to
//! 0, whose hash is NOT a valid Ed25519 point. The algorithm is fixed by the
//! ledger; callers only control the seed bytes.

use sha2::{Digest, Sha256};

use crate::error::SolError;

/// Maximum number of seeds, including the bump.
pub const MAX_SEEDS: usize = 16;

/// Maximum length of a single seed.
pub const MAX_SEED_LEN: usize = 32;

/// The string appended to PDA derivation: "ProgramDerivedAddress".
const PDA_MARKER: &[u8] = b"ProgramDerivedAddress";

/// A derived address together with the bump that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgramAddress {
    pub address: [u8; 32],
    pub bump: u8,
}

/// Find the canonical PDA for `seeds` under `program_id`.
pub fn find_program_address(
    seeds: &[&[u8]],
    program_id: &[u8; 32],
) -> Result<ProgramAddress, SolError> {
    // One slot is reserved for the bump.
    validate_seeds(seeds, MAX_SEEDS - 1)?;

    for bump in (0u8..=255).rev() {
        if let Some(address) = hash_off_curve(seeds, &[bump], program_id) {
            return Ok(ProgramAddress { address, bump });
        }
    }

    Err(SolError::DerivationExhausted)
}

/// Create a PDA from seeds that already include the bump.
///
/// Fails with `InvalidSeeds` when the result lands on the curve.
pub fn create_program_address(
    seeds: &[&[u8]],
    program_id: &[u8; 32],
) -> Result<[u8; 32], SolError> {
    validate_seeds(seeds, MAX_SEEDS)?;

    hash_off_curve(seeds, &[], program_id).ok_or_else(|| {
        SolError::InvalidSeeds("derived address lies on the ed25519 curve".into())
    })
}

/// Check if 32 bytes represent a valid Ed25519 curve point.
pub fn is_on_curve(bytes: &[u8; 32]) -> bool {
    curve25519_dalek::edwards::CompressedEdwardsY(*bytes)
        .decompress()
        .is_some()
}

fn validate_seeds(seeds: &[&[u8]], max_seeds: usize) -> Result<(), SolError> {
    if seeds.len() > max_seeds {
        return Err(SolError::InvalidSeeds(format!(
            "{} seeds given, at most {max_seeds} allowed",
            seeds.len()
        )));
    }

    if let Some((i, seed)) = seeds
        .iter()
        .enumerate()
        .find(|(_, seed)| seed.len() > MAX_SEED_LEN)
    {
        return Err(SolError::InvalidSeeds(format!(
            "seed {i} is {} bytes, at most {MAX_SEED_LEN} allowed",
            seed.len()
        )));
    }

    Ok(())
}

fn hash_off_curve(seeds: &[&[u8]], bump_seed: &[u8], program_id: &[u8; 32]) -> Option<[u8; 32]> {
    let mut hasher = Sha256::new();

    for seed in seeds {
        hasher.update(seed);
    }
    hasher.update(bump_seed);
    hasher.update(program_id);
    hasher.update(PDA_MARKER);

    let hash: [u8; 32] = hasher.finalize().into();

    if is_on_curve(&hash) {
        return None;
    }

    Some(hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROGRAM: [u8; 32] = [7u8; 32];

    #[test]
    fn pda_is_not_on_curve() {
        let pda = find_program_address(&[b"seed"], &PROGRAM).unwrap();
        assert!(!is_on_curve(&pda.address));
    }

    #[test]
    fn pda_is_deterministic() {
        let a = find_program_address(&[b"a", b"b"], &PROGRAM).unwrap();
        let b = find_program_address(&[b"a", b"b"], &PROGRAM).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn create_with_found_bump_reproduces_address() {
        let pda = find_program_address(&[b"vault"], &PROGRAM).unwrap();
        let recreated = create_program_address(&[b"vault", &[pda.bump]], &PROGRAM).unwrap();
        assert_eq!(recreated, pda.address);
    }

    #[test]
    fn seeds_are_concatenated_without_length_prefix() {
        let joined = find_program_address(&[b"ab"], &PROGRAM).unwrap();
        let split = find_program_address(&[b"a", b"b"], &PROGRAM).unwrap();
        assert_eq!(joined, split);
    }

    #[test]
    fn program_id_changes_address() {
        let a = find_program_address(&[b"x"], &[1u8; 32]).unwrap();
        let b = find_program_address(&[b"x"], &[2u8; 32]).unwrap();
        assert_ne!(a.address, b.address);
    }

    #[test]
    fn oversized_seed_is_rejected() {
        let long = [0u8; 33];
        let err = find_program_address(&[&long], &PROGRAM).unwrap_err();
        assert!(matches!(err, SolError::InvalidSeeds(_)));
    }

    #[test]
    fn too_many_seeds_are_rejected() {
        let seeds: Vec<&[u8]> = vec![&b"s"[..]; MAX_SEEDS];
        let err = find_program_address(&seeds, &PROGRAM).unwrap_err();
        assert!(matches!(err, SolError::InvalidSeeds(_)));
    }

    #[test]
    fn fifteen_seeds_are_accepted() {
        let seeds: Vec<&[u8]> = vec![&b"s"[..]; MAX_SEEDS - 1];
        assert!(find_program_address(&seeds, &PROGRAM).is_ok());
    }

    #[test]
    fn is_on_curve_accepts_basepoint() {
        let basepoint: [u8; 32] = [
            0x58, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66,
            0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66,
            0x66, 0x66, 0x66, 0x66,
        ];
        assert!(is_on_curve(&basepoint));
    }

    #[test]
    fn is_on_curve_rejects_off_curve_bytes() {
        assert!(!is_on_curve(&[0x02; 32]));
    }
}
