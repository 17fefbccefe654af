//! Program-owned address derivation
//!
//! Bumps are tried from 255 down to 0. For each bump the candidate is
//! `sha256(seeds ++ [bump] ++ program_id ++ "ProgramDerivedAddress")`, and
//! the first candidate that is not a point on the ed25519 curve wins. The
//! first accepted bump is the canonical one.

use crate::{Error, Result};
use solana_sdk::pubkey::{Pubkey, PubkeyError, MAX_SEEDS, MAX_SEED_LEN};

/// Derive the canonical program address and bump for the seeds
pub fn derive(program_id: &Pubkey, seeds: &[&[u8]]) -> Result<(Pubkey, u8)> {
    // one slot is reserved for the bump seed
    if seeds.len() >= MAX_SEEDS {
        return Err(Error::field(
            "seeds",
            format!("{} seeds exceed the limit of {}", seeds.len(), MAX_SEEDS - 1),
        ));
    }

    if let Some(seed) = seeds.iter().find(|seed| seed.len() > MAX_SEED_LEN) {
        return Err(Error::field(
            "seeds",
            format!("seed of {} bytes exceeds {MAX_SEED_LEN} bytes", seed.len()),
        ));
    }

    for bump in (0..=u8::MAX).rev() {
        let bump_seed = [bump];
        let mut candidate = seeds.to_vec();
        candidate.push(&bump_seed);
        match Pubkey::create_program_address(&candidate, program_id) {
            Ok(address) => {
                tracing::trace!("Derived {address} with bump {bump} for program {program_id}");
                return Ok((address, bump));
            }
            // on curve, try the next bump
            Err(PubkeyError::InvalidSeeds) => continue,
            Err(e) => return Err(Error::field("seeds", e.to_string())),
        }
    }

    Err(Error::NoValidAddress)
}

#[cfg(test)]
use crate::ErrorKind;

#[cfg(test)]
fn program() -> Pubkey {
    Pubkey::new_from_array([7; 32])
}

#[test]
fn test_derive_is_deterministic() {
    let seeds: &[&[u8]] = &[b"miya_pool", &[0; 32], &1_000u64.to_le_bytes()];
    assert_eq!(derive(&program(), seeds), derive(&program(), seeds));
}

#[test]
fn test_derive_matches_runtime() {
    for i in 0u32..32 {
        let seed = i.to_le_bytes();
        let seeds: &[&[u8]] = &[b"miya_test", &seed];
        let expected = Pubkey::find_program_address(seeds, &program());
        assert_eq!(derive(&program(), seeds).unwrap(), expected);
    }
}

#[test]
fn test_bump_falls_through_on_curve_candidates() {
    // find seeds whose candidate at bump 255 lands on the curve
    let (seed, _) = (0u32..)
        .map(|i| i.to_le_bytes())
        .map(|seed| {
            let on_curve =
                Pubkey::create_program_address(&[b"miya_test", &seed, &[u8::MAX]], &program())
                    .is_err();
            (seed, on_curve)
        })
        .find(|(_, on_curve)| *on_curve)
        .unwrap();

    let (address, bump) = derive(&program(), &[b"miya_test", &seed]).unwrap();
    assert!(bump < u8::MAX);
    for higher in bump + 1..=u8::MAX {
        assert!(
            Pubkey::create_program_address(&[b"miya_test", &seed, &[higher]], &program()).is_err()
        );
    }
    assert_eq!(
        Pubkey::create_program_address(&[b"miya_test", &seed, &[bump]], &program()).unwrap(),
        address
    );
}

#[test]
fn test_seed_limits() {
    let long = [0u8; MAX_SEED_LEN + 1];
    let err = derive(&program(), &[&long]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Encoding);

    let seeds = vec![&b"s"[..]; MAX_SEEDS];
    assert!(derive(&program(), &seeds).is_err());

    let seeds = vec![&b"s"[..]; MAX_SEEDS - 1];
    assert!(derive(&program(), &seeds).is_ok());
}
