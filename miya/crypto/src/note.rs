//! Deposit notes
//!
//! A deposit publishes `(commitment, nullifier_hash)`. The secret never
//! leaves the note, the withdrawal later reveals the nullifier so that the
//! ledger can reject a second spend without learning which deposit it
//! belongs to.

use anyhow::Result;
use mcore::{Error, Hash};
use rand_core::{OsRng, RngCore};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Generate a fresh commitment from the OS random source
pub fn generate_commitment() -> Hash {
    let mut commitment = [0u8; 32];
    OsRng.fill_bytes(&mut commitment);
    commitment
}

/// Generate a fresh note secret from the OS random source
pub fn generate_secret() -> Hash {
    generate_commitment()
}

/// Derive the nullifier hash of a commitment and its secret
pub fn generate_nullifier_hash(commitment: &Hash, secret: &Hash) -> Hash {
    let mut preimage = [0u8; 64];
    preimage[..32].copy_from_slice(commitment);
    preimage[32..].copy_from_slice(secret);
    crate::blake3(&preimage)
}

/// The lifecycle of a deposit note
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoteState {
    /// Generated, the deposit is not confirmed yet
    #[default]
    Unused,
    /// The deposit is confirmed
    Deposited,
    /// The nullifier has been spent
    Withdrawn,
    /// The deposit landed, the note will never be spent
    Abandoned,
}

impl NoteState {
    /// The name of the state
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unused => "unused",
            Self::Deposited => "deposited",
            Self::Withdrawn => "withdrawn",
            Self::Abandoned => "abandoned",
        }
    }
}

/// Secret material of one deposit, held by the depositor only
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositNote {
    /// The commitment published by the deposit
    pub commitment: Hash,

    /// The nullifier hash published by the deposit
    pub nullifier_hash: Hash,

    /// The secret behind the nullifier hash
    pub secret: Hash,

    /// Creation time in unix seconds
    pub timestamp: u64,

    /// The lifecycle state
    pub state: NoteState,
}

impl DepositNote {
    /// Generate a fresh unused note
    pub fn new() -> Self {
        let commitment = generate_commitment();
        let secret = generate_secret();
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();

        Self {
            nullifier_hash: generate_nullifier_hash(&commitment, &secret),
            commitment,
            secret,
            timestamp,
            state: NoteState::Unused,
        }
    }

    /// Recompute the nullifier hash from the retained secret
    pub fn nullifier(&self) -> Hash {
        generate_nullifier_hash(&self.commitment, &self.secret)
    }

    /// Encode the note as a base58 string
    pub fn encode(&self) -> Result<String> {
        Ok(bs58::encode(postcard::to_allocvec(self)?).into_string())
    }

    /// Decode a note from its base58 string
    pub fn decode(encoded: &str) -> Result<Self> {
        let note: Self = postcard::from_bytes(&bs58::decode(encoded.trim()).into_vec()?)?;
        anyhow::ensure!(
            note.nullifier() == note.nullifier_hash,
            "Nullifier hash does not match the note secret"
        );
        Ok(note)
    }

    /// Mark the deposit as confirmed
    pub fn mark_deposited(&mut self) -> mcore::Result<()> {
        self.transition(NoteState::Deposited)
    }

    /// Mark the nullifier as spent
    pub fn mark_withdrawn(&mut self) -> mcore::Result<()> {
        self.transition(NoteState::Withdrawn)
    }

    /// Give up on a deposited note
    pub fn abandon(&mut self) -> mcore::Result<()> {
        self.transition(NoteState::Abandoned)
    }

    fn transition(&mut self, to: NoteState) -> mcore::Result<()> {
        let allowed = matches!(
            (self.state, to),
            (NoteState::Unused, NoteState::Deposited)
                | (NoteState::Deposited, NoteState::Withdrawn)
                | (NoteState::Deposited, NoteState::Abandoned)
        );

        if !allowed {
            return Err(Error::InvalidTransition {
                from: self.state.as_str(),
                to: to.as_str(),
            });
        }

        tracing::debug!(
            "Note {} {} -> {}",
            bs58::encode(&self.commitment).into_string(),
            self.state.as_str(),
            to.as_str()
        );
        self.state = to;
        Ok(())
    }
}

impl Default for DepositNote {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
use mcore::ErrorKind;
#[cfg(test)]
use std::collections::HashSet;

#[test]
fn test_nullifier_is_deterministic() {
    let commitment = [3u8; 32];
    let secret = [9u8; 32];
    let hash = generate_nullifier_hash(&commitment, &secret);
    assert_eq!(hash, generate_nullifier_hash(&commitment, &secret));
    assert_ne!(hash, generate_nullifier_hash(&secret, &commitment));
    assert_ne!(hash, generate_nullifier_hash(&commitment, &[8u8; 32]));
}

#[test]
fn test_commitments_are_distinct() {
    let commitments = (0..10_000)
        .map(|_| generate_commitment())
        .collect::<HashSet<_>>();
    assert_eq!(commitments.len(), 10_000);
}

#[test]
fn test_note_persistence() -> Result<()> {
    let mut note = DepositNote::new();
    note.mark_deposited()?;
    let decoded = DepositNote::decode(&note.encode()?)?;
    assert_eq!(decoded, note);
    assert_eq!(decoded.state, NoteState::Deposited);

    let mut forged = note.clone();
    forged.secret = [0; 32];
    assert!(DepositNote::decode(&forged.encode()?).is_err());
    Ok(())
}

#[test]
fn test_note_lifecycle() -> Result<()> {
    let mut note = DepositNote::new();
    assert_eq!(note.state, NoteState::Unused);
    assert_eq!(
        note.mark_withdrawn().unwrap_err(),
        Error::InvalidTransition {
            from: "unused",
            to: "withdrawn"
        }
    );

    note.mark_deposited()?;
    note.mark_withdrawn()?;
    assert_eq!(note.state, NoteState::Withdrawn);

    let err = note.mark_withdrawn().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidTransition);
    assert!(note.abandon().is_err());

    // an unconfirmed deposit may still land, it can not be abandoned
    let mut pending = DepositNote::new();
    assert_eq!(
        pending.abandon().unwrap_err(),
        Error::InvalidTransition {
            from: "unused",
            to: "abandoned"
        }
    );
    pending.mark_deposited()?;
    pending.abandon()?;
    assert!(pending.mark_withdrawn().is_err());
    Ok(())
}
