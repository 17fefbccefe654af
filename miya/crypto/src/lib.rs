//! Crypto primitives for the miya mixer

pub use {
    note::{DepositNote, NoteState},
    proof::{Prover, PublicInputs, Verifier},
};

pub mod note;
pub mod proof;

/// Compute the Blake3 hash of the data
pub fn blake3(data: &[u8]) -> [u8; 32] {
    let mut hasher = blake3::Hasher::new();
    hasher.update(data);
    hasher.finalize().into()
}
