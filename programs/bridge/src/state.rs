//! Account layouts of the bridge program

use mcore::{Reader, Result, VarBytes, Writer};
use solana_sdk::pubkey::Pubkey;

/// The bridge configuration and totals
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bridge {
    /// The authority managing chains, pairs and the pause switch
    pub authority: Pubkey,

    /// If the bridge locks and releases tokens
    pub is_active: bool,

    /// The number of registered chains
    pub supported_chain_count: u16,

    /// Tokens locked over the lifetime of the bridge
    pub total_locked_tokens: u64,

    /// Tokens released over the lifetime of the bridge
    pub total_released_tokens: u64,

    /// The bump of the bridge address
    pub bump: u8,
}

impl Bridge {
    /// The account name
    pub const NAME: &'static str = "Bridge";

    /// The size of the account data without the discriminator
    pub const LEN: usize = 32 + 1 + 2 + 8 + 8 + 1;

    /// Decode the bridge from account data
    pub fn decode(data: &[u8]) -> Result<Self> {
        let mut reader = Reader::account(Self::NAME, data, &mcore::discriminator(Self::NAME))?;
        Ok(Self {
            authority: reader.pubkey("authority")?,
            is_active: reader.bool("is_active")?,
            supported_chain_count: reader.u16("supported_chain_count")?,
            total_locked_tokens: reader.u64("total_locked_tokens")?,
            total_released_tokens: reader.u64("total_released_tokens")?,
            bump: reader.u8("bump")?,
        })
    }

    /// Encode the bridge as account data
    pub fn encode(&self) -> Vec<u8> {
        let mut writer = Writer::account(&mcore::discriminator(Self::NAME), Self::LEN);
        writer
            .pubkey(&self.authority)
            .bool(self.is_active)
            .u16(self.supported_chain_count)
            .u64(self.total_locked_tokens)
            .u64(self.total_released_tokens)
            .u8(self.bump);
        writer.finish()
    }
}

/// An external chain registered with the bridge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportedChain {
    /// The numeric chain id
    pub chain_id: u16,

    /// The human-readable name
    pub chain_name: String,

    /// The program adapting messages of the chain
    pub adapter_program: Pubkey,

    /// If the chain accepts transfers
    pub is_active: bool,

    /// Cumulative volume bridged with the chain
    pub total_volume: u64,
}

impl SupportedChain {
    /// The account name
    pub const NAME: &'static str = "SupportedChain";

    /// The size of the account data without the discriminator
    pub const LEN: usize = 2 + 4 + crate::MAX_CHAIN_NAME_LEN + 32 + 1 + 8;

    /// Decode the chain from account data
    pub fn decode(data: &[u8]) -> Result<Self> {
        let mut reader = Reader::account(Self::NAME, data, &mcore::discriminator(Self::NAME))?;
        Ok(Self {
            chain_id: reader.u16("chain_id")?,
            chain_name: reader.string("chain_name")?,
            adapter_program: reader.pubkey("adapter_program")?,
            is_active: reader.bool("is_active")?,
            total_volume: reader.u64("total_volume")?,
        })
    }

    /// Encode the chain as account data
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut writer = Writer::account(&mcore::discriminator(Self::NAME), Self::LEN);
        writer
            .u16(self.chain_id)
            .string("chain_name", &self.chain_name)?
            .pubkey(&self.adapter_program)
            .bool(self.is_active)
            .u64(self.total_volume);
        Ok(writer.finish())
    }
}

/// A token mapping between an external chain and a local mint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    /// The chain tokens arrive from
    pub source_chain_id: u16,

    /// The chain tokens leave to
    pub target_chain_id: u16,

    /// The token address on the external chain
    pub source_token_address: VarBytes,

    /// The local token mint
    pub target_token_mint: Pubkey,

    /// The release fee in basis points
    pub fee_bps: u16,

    /// If the pair accepts transfers
    pub is_active: bool,

    /// Tokens locked through the pair
    pub total_locked: u64,

    /// Tokens released through the pair
    pub total_released: u64,

    /// The bump of the pair address
    pub bump: u8,
}

impl TokenPair {
    /// The account name
    pub const NAME: &'static str = "TokenPair";

    /// The size of the account data without the discriminator
    pub const LEN: usize = 2 + 2 + 4 + crate::MAX_ADDRESS_LEN + 32 + 2 + 1 + 8 + 8 + 1;

    /// Decode the pair from account data
    pub fn decode(data: &[u8]) -> Result<Self> {
        let mut reader = Reader::account(Self::NAME, data, &mcore::discriminator(Self::NAME))?;
        Ok(Self {
            source_chain_id: reader.u16("source_chain_id")?,
            target_chain_id: reader.u16("target_chain_id")?,
            source_token_address: reader.var("source_token_address")?,
            target_token_mint: reader.pubkey("target_token_mint")?,
            fee_bps: reader.u16("fee_bps")?,
            is_active: reader.bool("is_active")?,
            total_locked: reader.u64("total_locked")?,
            total_released: reader.u64("total_released")?,
            bump: reader.u8("bump")?,
        })
    }

    /// Encode the pair as account data
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut writer = Writer::account(&mcore::discriminator(Self::NAME), Self::LEN);
        writer
            .u16(self.source_chain_id)
            .u16(self.target_chain_id)
            .var("source_token_address", &self.source_token_address)?
            .pubkey(&self.target_token_mint)
            .u16(self.fee_bps)
            .bool(self.is_active)
            .u64(self.total_locked)
            .u64(self.total_released)
            .u8(self.bump);
        Ok(writer.finish())
    }
}

#[cfg(test)]
use mcore::ErrorKind;

#[cfg(test)]
fn chain() -> SupportedChain {
    SupportedChain {
        chain_id: 2,
        chain_name: "ethereum".into(),
        adapter_program: Pubkey::new_from_array([3; 32]),
        is_active: true,
        total_volume: 77,
    }
}

#[cfg(test)]
fn pair() -> TokenPair {
    TokenPair {
        source_chain_id: 2,
        target_chain_id: 1,
        source_token_address: VarBytes::new(vec![0xaa; 20]),
        target_token_mint: Pubkey::new_from_array([5; 32]),
        fee_bps: 30,
        is_active: true,
        total_locked: 1_000,
        total_released: 400,
        bump: 253,
    }
}

#[test]
fn test_bridge_offsets() -> Result<()> {
    let bridge = Bridge {
        authority: Pubkey::new_from_array([1; 32]),
        is_active: false,
        supported_chain_count: 3,
        total_locked_tokens: 10,
        total_released_tokens: 4,
        bump: 250,
    };

    let data = bridge.encode();
    assert_eq!(data.len(), 8 + Bridge::LEN);
    assert_eq!(data[40], 0);
    assert_eq!(data[41..43], 3u16.to_le_bytes());
    assert_eq!(data[59], 250);
    assert_eq!(Bridge::decode(&data)?, bridge);
    Ok(())
}

#[test]
fn test_chain_offsets() -> Result<()> {
    let data = chain().encode()?;
    assert_eq!(data[..8], [170, 206, 217, 149, 37, 145, 182, 196]);
    assert_eq!(data[8..10], 2u16.to_le_bytes());
    assert_eq!(data[10..14], 8u32.to_le_bytes());
    assert_eq!(&data[14..22], b"ethereum");
    assert_eq!(data[22..54], [3; 32]);
    assert_eq!(SupportedChain::decode(&data)?, chain());

    // preallocated space after the variable-length name
    let mut padded = data;
    padded.resize(8 + SupportedChain::LEN, 0);
    assert_eq!(SupportedChain::decode(&padded)?, chain());
    Ok(())
}

#[test]
fn test_pair_offsets() -> Result<()> {
    let data = pair().encode()?;
    assert_eq!(data[12..16], 20u32.to_le_bytes());
    assert_eq!(data[36..68], [5; 32]);
    assert_eq!(data[68..70], 30u16.to_le_bytes());
    assert_eq!(data.len(), 8 + 2 + 2 + 4 + 20 + 32 + 2 + 1 + 8 + 8 + 1);
    assert_eq!(TokenPair::decode(&data)?, pair());
    Ok(())
}

#[test]
fn test_malformed_accounts() -> Result<()> {
    let mut data = chain().encode()?;
    data[10..14].copy_from_slice(&1_000u32.to_le_bytes());
    assert_eq!(
        SupportedChain::decode(&data).unwrap_err().kind(),
        ErrorKind::MalformedAccount
    );

    let mut data = chain().encode()?;
    data[14] = 0xff;
    assert_eq!(
        SupportedChain::decode(&data).unwrap_err().kind(),
        ErrorKind::MalformedAccount
    );

    let data = pair().encode()?;
    assert!(Bridge::decode(&data).is_err());
    assert!(TokenPair::decode(&data[..40]).is_err());
    Ok(())
}
