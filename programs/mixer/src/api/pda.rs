//! PDA functions for the mixer program

use mcore::{pda, seed, Result};
use solana_sdk::pubkey::Pubkey;

/// System program ID
pub const SYSTEM_PROGRAM: Pubkey = solana_sdk::system_program::ID;

/// Token program ID
pub const TOKEN_PROGRAM: Pubkey = spl_token::ID;

/// The seed tag of pool addresses
pub const POOL_SEED: &[u8] = b"miya_pool";

/// Derive the pool PDA and its bump
pub fn pool(program_id: &Pubkey, token_mint: &Pubkey, deposit_amount: u64) -> Result<(Pubkey, u8)> {
    let amount = seed::le_u64("deposit_amount", deposit_amount)?;
    pda::derive(program_id, &[POOL_SEED, token_mint.as_ref(), &amount])
}

/// Derive the token account of an owner
pub fn token_account(owner: &Pubkey, token_mint: &Pubkey) -> Pubkey {
    spl_associated_token_account::get_associated_token_address(owner, token_mint)
}

#[cfg(test)]
use std::str::FromStr;

#[test]
fn test_pool_golden() -> anyhow::Result<()> {
    let (address, bump) = pool(&crate::DEFAULT_PROGRAM_ID, &Pubkey::default(), 1_000_000_000)?;
    assert_eq!(
        address,
        Pubkey::from_str("ARdzDGNB4k6dyTsPmc7S2MXKQyEmJJuqSu2doxEFqGrG")?
    );
    assert_eq!(bump, 255);
    Ok(())
}

#[test]
fn test_pool_identity() -> anyhow::Result<()> {
    let mint = Pubkey::new_unique();
    let program = crate::DEFAULT_PROGRAM_ID;
    assert_eq!(pool(&program, &mint, 100)?, pool(&program, &mint, 100)?);
    assert_ne!(pool(&program, &mint, 100)?.0, pool(&program, &mint, 101)?.0);
    assert_ne!(
        pool(&program, &mint, 100)?.0,
        pool(&Pubkey::new_unique(), &mint, 100)?.0
    );
    Ok(())
}
