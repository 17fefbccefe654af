//! Instruction data of the mixer program

use mcore::{Error, Hash, Reader, Result, VarBytes, Writer};
use solana_sdk::pubkey::Pubkey;

/// Withdraw flag of the relayer field
pub const FLAG_RELAYER: u8 = 0b01;

/// Withdraw flag of the fee field
pub const FLAG_FEE: u8 = 0b10;

/// A relayer submitting the withdrawal in exchange for a fee
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relay {
    /// The relayer receiving the fee
    pub relayer: Pubkey,

    /// The fee taken from the withdrawn amount
    pub fee: u64,
}

/// Instructions of the mixer program
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MixerInstruction {
    /// Create the pool of a token and denomination
    InitializePool { token_mint: Pubkey, deposit_amount: u64 },

    /// Deposit one denomination into the pool
    Deposit { commitment: Hash, nullifier_hash: Hash },

    /// Withdraw one denomination with a proof
    Withdraw {
        proof: VarBytes,
        nullifier: Hash,
        recipient: Pubkey,
        relay: Option<Relay>,
    },

    /// Stop accepting deposits and withdrawals
    PausePool,

    /// Accept deposits and withdrawals again
    ResumePool,
}

impl MixerInstruction {
    /// The discriminant of the instruction
    pub fn discriminant(&self) -> u8 {
        match self {
            Self::InitializePool { .. } => 0,
            Self::Deposit { .. } => 1,
            Self::Withdraw { .. } => 2,
            Self::PausePool => 3,
            Self::ResumePool => 4,
        }
    }

    /// The size of the payload after the header
    pub fn payload_len(&self) -> usize {
        match self {
            Self::InitializePool { .. } => 32 + 8,
            Self::Deposit { .. } => 32 + 32,
            Self::Withdraw { proof, relay, .. } => {
                proof.encoded_len() + 32 + 32 + 1 + relay.map_or(0, |_| 32 + 8)
            }
            Self::PausePool | Self::ResumePool => 0,
        }
    }

    /// The size of the encoded instruction
    pub fn encoded_len(&self) -> usize {
        mcore::HEADER_LEN + self.payload_len()
    }

    /// Encode the instruction data
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut writer = Writer::instruction(self.discriminant(), self.payload_len());
        match self {
            Self::InitializePool {
                token_mint,
                deposit_amount,
            } => {
                if *deposit_amount == 0 {
                    return Err(Error::field("deposit_amount", "must be greater than 0"));
                }
                writer.pubkey(token_mint).u64(*deposit_amount);
            }
            Self::Deposit {
                commitment,
                nullifier_hash,
            } => {
                writer.bytes32(commitment).bytes32(nullifier_hash);
            }
            Self::Withdraw {
                proof,
                nullifier,
                recipient,
                relay,
            } => {
                if proof.is_empty() {
                    return Err(Error::field("proof", "must not be empty"));
                }

                writer.var("proof", proof)?.bytes32(nullifier).pubkey(recipient);
                match relay {
                    Some(Relay { relayer, fee }) => {
                        writer.u8(FLAG_RELAYER | FLAG_FEE).pubkey(relayer).u64(*fee);
                    }
                    None => {
                        writer.u8(0);
                    }
                }
            }
            Self::PausePool | Self::ResumePool => {}
        }

        let data = writer.finish();
        debug_assert_eq!(data.len(), self.encoded_len());
        Ok(data)
    }

    /// Decode instruction data
    pub fn decode(data: &[u8]) -> Result<Self> {
        let (discriminant, mut reader) = Reader::instruction(data)?;
        let instruction = match discriminant {
            0 => Self::InitializePool {
                token_mint: reader.pubkey("token_mint")?,
                deposit_amount: reader.u64("deposit_amount")?,
            },
            1 => Self::Deposit {
                commitment: reader.bytes32("commitment")?,
                nullifier_hash: reader.bytes32("nullifier_hash")?,
            },
            2 => {
                let proof = reader.var("proof")?;
                let nullifier = reader.bytes32("nullifier")?;
                let recipient = reader.pubkey("recipient")?;
                let relay = match reader.u8("flags")? {
                    0 => None,
                    flags if flags == FLAG_RELAYER | FLAG_FEE => Some(Relay {
                        relayer: reader.pubkey("relayer")?,
                        fee: reader.u64("fee")?,
                    }),
                    flags => {
                        return Err(Error::MalformedInstruction {
                            reason: format!("unsupported withdraw flags {flags:#04b}"),
                        })
                    }
                };

                Self::Withdraw {
                    proof,
                    nullifier,
                    recipient,
                    relay,
                }
            }
            3 => Self::PausePool,
            4 => Self::ResumePool,
            other => {
                return Err(Error::MalformedInstruction {
                    reason: format!("unknown mixer instruction {other}"),
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
fn withdraw(relay: Option<Relay>) -> MixerInstruction {
    MixerInstruction::Withdraw {
        proof: VarBytes::new(vec![7u8; 100]),
        nullifier: [5; 32],
        recipient: Pubkey::new_from_array([6; 32]),
        relay,
    }
}

#[test]
fn test_initialize_pool_layout() -> Result<()> {
    let ix = MixerInstruction::InitializePool {
        token_mint: Pubkey::new_from_array([1; 32]),
        deposit_amount: 1_000_000_000,
    };

    let data = ix.encode()?;
    assert_eq!(data.len(), 48);
    assert_eq!(data[..8], [0, 0, 0, 0, 0, 0, 0, 0]);
    assert_eq!(data[8..40], [1; 32]);
    assert_eq!(data[40..], 1_000_000_000u64.to_le_bytes());
    assert_eq!(MixerInstruction::decode(&data)?, ix);
    Ok(())
}

#[test]
fn test_withdraw_presence_flags() -> Result<()> {
    let bare = withdraw(None).encode()?;
    assert_eq!(bare.len(), 8 + 4 + 100 + 32 + 32 + 1);
    assert_eq!(bare[8..12], 100u32.to_le_bytes());
    assert_eq!(*bare.last().unwrap_or(&0xff), 0);

    let relay = Relay {
        relayer: Pubkey::new_from_array([8; 32]),
        fee: 1_000,
    };
    let relayed = withdraw(Some(relay)).encode()?;
    assert_eq!(relayed.len(), bare.len() + 32 + 8);
    assert_eq!(relayed[bare.len() - 1], FLAG_RELAYER | FLAG_FEE);
    assert_eq!(relayed[relayed.len() - 8..], 1_000u64.to_le_bytes());

    assert_eq!(MixerInstruction::decode(&bare)?, withdraw(None));
    assert_eq!(MixerInstruction::decode(&relayed)?, withdraw(Some(relay)));
    Ok(())
}

#[test]
fn test_withdraw_rejects_partial_flags() -> Result<()> {
    let mut data = withdraw(None).encode()?;
    let flags = data.len() - 1;
    data[flags] = FLAG_RELAYER;
    data.extend_from_slice(&[8; 32]);

    let err = MixerInstruction::decode(&data).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedInstruction);
    Ok(())
}

#[test]
fn test_invalid_fields() {
    let ix = MixerInstruction::Withdraw {
        proof: VarBytes::with_declared(64, vec![1u8; 63]),
        nullifier: [0; 32],
        recipient: Pubkey::default(),
        relay: None,
    };
    assert_eq!(
        ix.encode().unwrap_err(),
        Error::InvalidLength {
            field: "proof",
            declared: 64,
            actual: 63
        }
    );

    let ix = MixerInstruction::InitializePool {
        token_mint: Pubkey::default(),
        deposit_amount: 0,
    };
    assert_eq!(ix.encode().unwrap_err().kind(), ErrorKind::Encoding);
}

#[test]
fn test_pool_status_instructions() -> Result<()> {
    for (ix, discriminant) in [
        (MixerInstruction::PausePool, 3),
        (MixerInstruction::ResumePool, 4),
    ] {
        let data = ix.encode()?;
        assert_eq!(data, [discriminant, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(data.len(), ix.encoded_len());
        assert_eq!(MixerInstruction::decode(&data)?, ix);
    }
    Ok(())
}

#[test]
fn test_decode_rejects_malformed() -> Result<()> {
    assert!(MixerInstruction::decode(&[1, 0, 0]).is_err());
    assert!(MixerInstruction::decode(&[9, 0, 0, 0, 0, 0, 0, 0]).is_err());

    let mut data = MixerInstruction::PausePool.encode()?;
    assert_eq!(MixerInstruction::decode(&data)?, MixerInstruction::PausePool);
    data.push(0);
    assert_eq!(
        MixerInstruction::decode(&data).unwrap_err().kind(),
        ErrorKind::MalformedInstruction
    );
    Ok(())
}
