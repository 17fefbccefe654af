//! Instruction data of the bridge program

use crate::{MAX_ADDRESS_LEN, MAX_CHAIN_NAME_LEN, MAX_FEE_BPS};
use mcore::{Error, Hash, Reader, Result, VarBytes, Writer};
use solana_sdk::pubkey::Pubkey;

/// Instructions of the bridge program
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeInstruction {
    /// Create the bridge account
    InitializeBridge,

    /// Register an external chain
    AddSupportedChain {
        chain_id: u16,
        chain_name: String,
        adapter_program: Pubkey,
    },

    /// Enable or disable an external chain
    UpdateChainStatus { chain_id: u16, is_active: bool },

    /// Register a token mapping between two chains
    RegisterTokenPair {
        source_chain_id: u16,
        target_chain_id: u16,
        source_token_address: VarBytes,
        fee_bps: u16,
    },

    /// Lock tokens for a transfer to an external chain
    LockTokens {
        amount: u64,
        target_chain_id: u16,
        recipient_address: VarBytes,
        commitment: Hash,
    },

    /// Release tokens arriving from an external chain
    ReleaseTokens {
        amount: u64,
        source_chain_id: u16,
        proof: VarBytes,
        nullifier: Hash,
    },

    /// Stop locking and releasing
    PauseBridge,

    /// Lock and release again
    ResumeBridge,
}

fn check_len(field: &'static str, len: usize, max: usize) -> Result<()> {
    if len == 0 || len > max {
        return Err(Error::field(field, format!("length {len} is not in 1..={max}")));
    }
    Ok(())
}

fn check_amount(amount: u64) -> Result<()> {
    if amount == 0 {
        return Err(Error::field("amount", "must be greater than 0"));
    }
    Ok(())
}

impl BridgeInstruction {
    /// The discriminant of the instruction
    pub fn discriminant(&self) -> u8 {
        match self {
            Self::InitializeBridge => 0,
            Self::AddSupportedChain { .. } => 1,
            Self::UpdateChainStatus { .. } => 2,
            Self::RegisterTokenPair { .. } => 3,
            Self::LockTokens { .. } => 4,
            Self::ReleaseTokens { .. } => 5,
            Self::PauseBridge => 6,
            Self::ResumeBridge => 7,
        }
    }

    /// The size of the payload after the header
    pub fn payload_len(&self) -> usize {
        match self {
            Self::InitializeBridge | Self::PauseBridge | Self::ResumeBridge => 0,
            Self::AddSupportedChain { chain_name, .. } => 2 + 4 + chain_name.len() + 32,
            Self::UpdateChainStatus { .. } => 2 + 1,
            Self::RegisterTokenPair {
                source_token_address,
                ..
            } => 2 + 2 + source_token_address.encoded_len() + 2,
            Self::LockTokens {
                recipient_address, ..
            } => 8 + 2 + recipient_address.encoded_len() + 32,
            Self::ReleaseTokens { proof, .. } => 8 + 2 + proof.encoded_len() + 32,
        }
    }

    /// The size of the encoded instruction
    pub fn encoded_len(&self) -> usize {
        mcore::HEADER_LEN + self.payload_len()
    }

    /// Validate the fields against the limits of the program
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::AddSupportedChain { chain_name, .. } => {
                check_len("chain_name", chain_name.len(), MAX_CHAIN_NAME_LEN)
            }
            Self::RegisterTokenPair {
                source_token_address,
                fee_bps,
                ..
            } => {
                if *fee_bps > MAX_FEE_BPS {
                    return Err(Error::field(
                        "fee_bps",
                        format!("{fee_bps} exceeds {MAX_FEE_BPS}"),
                    ));
                }
                check_len(
                    "source_token_address",
                    source_token_address.len(),
                    MAX_ADDRESS_LEN,
                )
            }
            Self::LockTokens {
                amount,
                recipient_address,
                ..
            } => {
                check_amount(*amount)?;
                check_len("recipient_address", recipient_address.len(), MAX_ADDRESS_LEN)
            }
            Self::ReleaseTokens { amount, proof, .. } => {
                check_amount(*amount)?;
                if proof.is_empty() {
                    return Err(Error::field("proof", "must not be empty"));
                }
                Ok(())
            }
            Self::InitializeBridge
            | Self::UpdateChainStatus { .. }
            | Self::PauseBridge
            | Self::ResumeBridge => Ok(()),
        }
    }

    /// Encode the instruction data
    pub fn encode(&self) -> Result<Vec<u8>> {
        self.validate()?;

        let mut writer = Writer::instruction(self.discriminant(), self.payload_len());
        match self {
            Self::InitializeBridge | Self::PauseBridge | Self::ResumeBridge => {}
            Self::AddSupportedChain {
                chain_id,
                chain_name,
                adapter_program,
            } => {
                writer
                    .u16(*chain_id)
                    .string("chain_name", chain_name)?
                    .pubkey(adapter_program);
            }
            Self::UpdateChainStatus {
                chain_id,
                is_active,
            } => {
                writer.u16(*chain_id).bool(*is_active);
            }
            Self::RegisterTokenPair {
                source_chain_id,
                target_chain_id,
                source_token_address,
                fee_bps,
            } => {
                writer
                    .u16(*source_chain_id)
                    .u16(*target_chain_id)
                    .var("source_token_address", source_token_address)?
                    .u16(*fee_bps);
            }
            Self::LockTokens {
                amount,
                target_chain_id,
                recipient_address,
                commitment,
            } => {
                writer
                    .u64(*amount)
                    .u16(*target_chain_id)
                    .var("recipient_address", recipient_address)?
                    .bytes32(commitment);
            }
            Self::ReleaseTokens {
                amount,
                source_chain_id,
                proof,
                nullifier,
            } => {
                writer
                    .u64(*amount)
                    .u16(*source_chain_id)
                    .var("proof", proof)?
                    .bytes32(nullifier);
            }
        }

        Ok(writer.finish())
    }

    /// Decode instruction data
    pub fn decode(data: &[u8]) -> Result<Self> {
        let (discriminant, mut reader) = Reader::instruction(data)?;
        let instruction = match discriminant {
            0 => Self::InitializeBridge,
            1 => Self::AddSupportedChain {
                chain_id: reader.u16("chain_id")?,
                chain_name: reader.string("chain_name")?,
                adapter_program: reader.pubkey("adapter_program")?,
            },
            2 => Self::UpdateChainStatus {
                chain_id: reader.u16("chain_id")?,
                is_active: reader.bool("is_active")?,
            },
            3 => Self::RegisterTokenPair {
                source_chain_id: reader.u16("source_chain_id")?,
                target_chain_id: reader.u16("target_chain_id")?,
                source_token_address: reader.var("source_token_address")?,
                fee_bps: reader.u16("fee_bps")?,
            },
            4 => Self::LockTokens {
                amount: reader.u64("amount")?,
                target_chain_id: reader.u16("target_chain_id")?,
                recipient_address: reader.var("recipient_address")?,
                commitment: reader.bytes32("commitment")?,
            },
            5 => Self::ReleaseTokens {
                amount: reader.u64("amount")?,
                source_chain_id: reader.u16("source_chain_id")?,
                proof: reader.var("proof")?,
                nullifier: reader.bytes32("nullifier")?,
            },
            6 => Self::PauseBridge,
            7 => Self::ResumeBridge,
            other => {
                return Err(Error::MalformedInstruction {
                    reason: format!("unknown bridge instruction {other}"),
                })
            }
        };

        reader.finish()?;
        Ok(instruction)
    }
}

#[cfg(test)]
use mcore::ErrorKind;

#[cfg(test)]
fn pair(fee_bps: u16) -> BridgeInstruction {
    BridgeInstruction::RegisterTokenPair {
        source_chain_id: 1,
        target_chain_id: 2,
        source_token_address: VarBytes::new(vec![0xaa; 20]),
        fee_bps,
    }
}

#[test]
fn test_fee_boundary() -> Result<()> {
    let data = pair(MAX_FEE_BPS).encode()?;
    assert_eq!(data[data.len() - 2..], 10_000u16.to_le_bytes());
    assert_eq!(BridgeInstruction::decode(&data)?, pair(MAX_FEE_BPS));

    let err = pair(MAX_FEE_BPS + 1).encode().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Encoding);
    assert!(err.to_string().contains("fee_bps"));
    Ok(())
}

#[test]
fn test_add_chain_layout() -> Result<()> {
    let ix = BridgeInstruction::AddSupportedChain {
        chain_id: 0x0102,
        chain_name: "ethereum".into(),
        adapter_program: Pubkey::new_from_array([9; 32]),
    };

    let data = ix.encode()?;
    assert_eq!(data.len(), ix.encoded_len());
    assert_eq!(data[0], 1);
    assert_eq!(data[8..10], [0x02, 0x01]);
    assert_eq!(data[10..14], 8u32.to_le_bytes());
    assert_eq!(&data[14..22], b"ethereum");
    assert_eq!(data[22..], [9; 32]);
    assert_eq!(BridgeInstruction::decode(&data)?, ix);
    Ok(())
}

#[test]
fn test_lock_layout() -> Result<()> {
    let ix = BridgeInstruction::LockTokens {
        amount: 500,
        target_chain_id: 2,
        recipient_address: VarBytes::new(vec![0xbb; 20]),
        commitment: [4; 32],
    };

    let data = ix.encode()?;
    assert_eq!(data.len(), 8 + 8 + 2 + 4 + 20 + 32);
    assert_eq!(data[16..18], 2u16.to_le_bytes());
    assert_eq!(data[18..22], 20u32.to_le_bytes());
    assert_eq!(data[42..], [4; 32]);
    assert_eq!(BridgeInstruction::decode(&data)?, ix);
    Ok(())
}

#[test]
fn test_release_layout() -> Result<()> {
    let ix = BridgeInstruction::ReleaseTokens {
        amount: 750,
        source_chain_id: 0x0203,
        proof: VarBytes::new(vec![0xcc; 48]),
        nullifier: [6; 32],
    };

    let data = ix.encode()?;
    assert_eq!(data.len(), ix.encoded_len());
    assert_eq!(data.len(), 8 + 8 + 2 + 4 + 48 + 32);
    assert_eq!(data[..8], [5, 0, 0, 0, 0, 0, 0, 0]);
    assert_eq!(data[8..16], 750u64.to_le_bytes());
    assert_eq!(data[16..18], [0x03, 0x02]);
    assert_eq!(data[18..22], 48u32.to_le_bytes());
    assert_eq!(data[22..70], [0xcc; 48]);
    assert_eq!(data[70..], [6; 32]);
    assert_eq!(BridgeInstruction::decode(&data)?, ix);
    Ok(())
}

#[test]
fn test_unit_instructions() -> Result<()> {
    for (ix, discriminant) in [
        (BridgeInstruction::InitializeBridge, 0),
        (BridgeInstruction::PauseBridge, 6),
        (BridgeInstruction::ResumeBridge, 7),
    ] {
        let data = ix.encode()?;
        assert_eq!(data, [discriminant, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(BridgeInstruction::decode(&data)?, ix);
    }
    Ok(())
}

#[test]
fn test_field_limits() {
    let name = |len: usize| BridgeInstruction::AddSupportedChain {
        chain_id: 1,
        chain_name: "x".repeat(len),
        adapter_program: Pubkey::default(),
    };
    assert!(name(MAX_CHAIN_NAME_LEN).encode().is_ok());
    assert!(name(MAX_CHAIN_NAME_LEN + 1).encode().is_err());
    assert!(name(0).encode().is_err());

    let lock = |amount: u64, len: usize| BridgeInstruction::LockTokens {
        amount,
        target_chain_id: 2,
        recipient_address: VarBytes::new(vec![1; len]),
        commitment: [0; 32],
    };
    assert!(lock(1, MAX_ADDRESS_LEN).encode().is_ok());
    assert!(lock(1, MAX_ADDRESS_LEN + 1).encode().is_err());
    assert!(lock(0, 20).encode().is_err());

    let ix = BridgeInstruction::ReleaseTokens {
        amount: 1,
        source_chain_id: 1,
        proof: VarBytes::with_declared(10, vec![1; 9]),
        nullifier: [0; 32],
    };
    assert_eq!(
        ix.encode().unwrap_err(),
        Error::InvalidLength {
            field: "proof",
            declared: 10,
            actual: 9
        }
    );
}

#[test]
fn test_decode_rejects_malformed() -> Result<()> {
    let mut data = BridgeInstruction::UpdateChainStatus {
        chain_id: 7,
        is_active: false,
    }
    .encode()?;
    assert_eq!(data, [2, 0, 0, 0, 0, 0, 0, 0, 7, 0, 0]);

    data[10] = 3;
    assert_eq!(
        BridgeInstruction::decode(&data).unwrap_err().kind(),
        ErrorKind::MalformedInstruction
    );
    assert!(BridgeInstruction::decode(&[8, 0, 0, 0, 0, 0, 0, 0]).is_err());
    Ok(())
}
