//! PDA functions for the bridge program

use mcore::{pda, seed, Result};
use solana_sdk::pubkey::Pubkey;

/// System program ID
pub const SYSTEM_PROGRAM: Pubkey = solana_sdk::system_program::ID;

/// Token program ID
pub const TOKEN_PROGRAM: Pubkey = spl_token::ID;

/// The seed tag of the bridge address
pub const BRIDGE_SEED: &[u8] = b"miya_bridge";

/// The seed tag of chain addresses
pub const CHAIN_SEED: &[u8] = b"miya_chain";

/// The seed tag of token pair addresses
pub const TOKEN_PAIR_SEED: &[u8] = b"miya_token_pair";

/// Derive the bridge PDA and its bump
pub fn bridge(program_id: &Pubkey) -> Result<(Pubkey, u8)> {
    pda::derive(program_id, &[BRIDGE_SEED])
}

/// Derive the supported chain PDA and its bump
pub fn chain(program_id: &Pubkey, chain_id: u16) -> Result<(Pubkey, u8)> {
    let chain_id = seed::le_u16("chain_id", chain_id)?;
    pda::derive(program_id, &[CHAIN_SEED, &chain_id])
}

/// Derive the token pair PDA and its bump
pub fn token_pair(
    program_id: &Pubkey,
    source_chain_id: u16,
    target_chain_id: u16,
    target_token_mint: &Pubkey,
) -> Result<(Pubkey, u8)> {
    let source = seed::le_u16("source_chain_id", source_chain_id)?;
    let target = seed::le_u16("target_chain_id", target_chain_id)?;
    pda::derive(
        program_id,
        &[TOKEN_PAIR_SEED, &source, &target, target_token_mint.as_ref()],
    )
}

/// Derive the token account of an owner
pub fn token_account(owner: &Pubkey, token_mint: &Pubkey) -> Pubkey {
    spl_associated_token_account::get_associated_token_address(owner, token_mint)
}

#[cfg(test)]
use crate::DEFAULT_PROGRAM_ID;
#[cfg(test)]
use std::str::FromStr;

#[cfg(test)]
fn key(s: &str) -> Pubkey {
    Pubkey::from_str(s).unwrap()
}

#[test]
fn test_bridge_golden() -> Result<()> {
    assert_eq!(
        bridge(&DEFAULT_PROGRAM_ID)?,
        (key("4vqnjnPetNVQ6AFp5qke4uKQhqy6SbE87P81hoypJr5b"), 250)
    );
    Ok(())
}

#[test]
fn test_chain_id_boundaries() -> Result<()> {
    // the candidate of chain 0 at bump 255 is on the curve
    assert_eq!(
        chain(&DEFAULT_PROGRAM_ID, 0)?,
        (key("9oyrjxd2adhawVJEvsaGL9PNVpFe1C2btbN1qgRwwTe4"), 254)
    );
    assert!(Pubkey::create_program_address(
        &[CHAIN_SEED, &0u16.to_le_bytes(), &[255]],
        &DEFAULT_PROGRAM_ID
    )
    .is_err());

    assert_eq!(
        chain(&DEFAULT_PROGRAM_ID, 1)?,
        (key("XbbhKH4NyDg5QHhPhGiBnhddmi74VQ4xuPJD6UthNZ9"), 255)
    );
    assert_eq!(
        chain(&DEFAULT_PROGRAM_ID, u16::MAX)?,
        (key("A64nKL52tA8F6urQL39NjU4xxks9ncCtn55qyHqSLQph"), 253)
    );
    Ok(())
}

#[test]
fn test_token_pair_golden() -> Result<()> {
    assert_eq!(
        token_pair(&DEFAULT_PROGRAM_ID, 1, 2, &Pubkey::default())?,
        (key("2hozMARrF1CbYr3ectktsLKFWu7hBgb3RhzGTEe4KZFA"), 255)
    );
    assert_ne!(
        token_pair(&DEFAULT_PROGRAM_ID, 1, 2, &Pubkey::default())?,
        token_pair(&DEFAULT_PROGRAM_ID, 2, 1, &Pubkey::default())?
    );
    Ok(())
}
