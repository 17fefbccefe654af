//! Account layouts of the mixer program

use mcore::{Reader, Result, Writer};
use solana_sdk::pubkey::Pubkey;

/// A fixed-denomination pool of one token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pool {
    /// The authority allowed to pause and resume the pool
    pub authority: Pubkey,

    /// The token mint of the pool
    pub token_mint: Pubkey,

    /// The fixed amount of every deposit
    pub deposit_amount: u64,

    /// The number of deposits made
    pub total_deposits: u64,

    /// If the pool accepts deposits and withdrawals
    pub is_active: bool,

    /// The bump of the pool address
    pub bump: u8,
}

impl Pool {
    /// The account name
    pub const NAME: &'static str = "Pool";

    /// The size of the account data without the discriminator
    pub const LEN: usize = 32 + 32 + 8 + 8 + 1 + 1;

    /// Decode the pool from account data
    pub fn decode(data: &[u8]) -> Result<Self> {
        let mut reader = Reader::account(Self::NAME, data, &mcore::discriminator(Self::NAME))?;
        Ok(Self {
            authority: reader.pubkey("authority")?,
            token_mint: reader.pubkey("token_mint")?,
            deposit_amount: reader.u64("deposit_amount")?,
            total_deposits: reader.u64("total_deposits")?,
            is_active: reader.bool("is_active")?,
            bump: reader.u8("bump")?,
        })
    }

    /// Encode the pool as account data
    pub fn encode(&self) -> Vec<u8> {
        let mut writer = Writer::account(&mcore::discriminator(Self::NAME), Self::LEN);
        writer
            .pubkey(&self.authority)
            .pubkey(&self.token_mint)
            .u64(self.deposit_amount)
            .u64(self.total_deposits)
            .bool(self.is_active)
            .u8(self.bump);
        writer.finish()
    }
}

#[cfg(test)]
use mcore::ErrorKind;

#[cfg(test)]
fn pool() -> Pool {
    Pool {
        authority: Pubkey::new_from_array([1; 32]),
        token_mint: Pubkey::new_from_array([2; 32]),
        deposit_amount: 1_000_000_000,
        total_deposits: 42,
        is_active: true,
        bump: 255,
    }
}

#[test]
fn test_pool_offsets() -> Result<()> {
    let data = pool().encode();
    assert_eq!(data.len(), 8 + Pool::LEN);
    assert_eq!(data[..8], [241, 154, 109, 4, 17, 177, 109, 188]);
    assert_eq!(data[8..40], [1; 32]);
    assert_eq!(data[72..80], 1_000_000_000u64.to_le_bytes());
    assert_eq!(data[80..88], 42u64.to_le_bytes());
    assert_eq!(data[88..], [1, 255]);
    assert_eq!(Pool::decode(&data)?, pool());
    Ok(())
}

#[test]
fn test_pool_allows_preallocated_space() -> Result<()> {
    let mut data = pool().encode();
    data.resize(data.len() + 64, 0);
    assert_eq!(Pool::decode(&data)?, pool());
    Ok(())
}

#[test]
fn test_truncated_pool_is_malformed() {
    let data = pool().encode();
    let err = Pool::decode(&data[..10]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedAccount);

    let err = Pool::decode(&data[..data.len() - 1]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedAccount);

    let mut data = data;
    data[88] = 2;
    assert_eq!(
        Pool::decode(&data).unwrap_err().kind(),
        ErrorKind::MalformedAccount
    );
}
