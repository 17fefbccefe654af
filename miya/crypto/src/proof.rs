//! Proving collaborators
//!
//! No proving system ships with this crate. Withdrawals take whatever proof
//! bytes a [`Prover`] produced and pass them through unchanged.

use anyhow::Result;
use mcore::Hash;
use solana_sdk::pubkey::Pubkey;

/// The values a withdrawal proof is checked against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublicInputs {
    /// The nullifier revealed by the withdrawal
    pub nullifier: Hash,

    /// The recipient of the withdrawn funds
    pub recipient: Pubkey,
}

/// Produces withdrawal proofs
pub trait Prover {
    /// Prove knowledge of the commitment behind the nullifier
    fn prove(&self, commitment: &Hash, nullifier: &Hash, recipient: &Pubkey) -> Result<Vec<u8>>;
}

/// Checks withdrawal proofs
pub trait Verifier {
    /// Verify the proof against the public inputs
    fn verify(&self, proof: &[u8], inputs: &PublicInputs) -> Result<bool>;
}

impl<P: Prover + ?Sized> Prover for &P {
    fn prove(&self, commitment: &Hash, nullifier: &Hash, recipient: &Pubkey) -> Result<Vec<u8>> {
        (**self).prove(commitment, nullifier, recipient)
    }
}

impl<V: Verifier + ?Sized> Verifier for &V {
    fn verify(&self, proof: &[u8], inputs: &PublicInputs) -> Result<bool> {
        (**self).verify(proof, inputs)
    }
}

/// Binds the proof to its inputs with a keyed hash, test only
#[cfg(test)]
struct Transcript;

#[cfg(test)]
impl Prover for Transcript {
    fn prove(&self, commitment: &Hash, nullifier: &Hash, recipient: &Pubkey) -> Result<Vec<u8>> {
        let mut proof = commitment.to_vec();
        proof.extend_from_slice(&crate::blake3(&[&nullifier[..], recipient.as_ref()].concat()));
        Ok(proof)
    }
}

#[cfg(test)]
impl Verifier for Transcript {
    fn verify(&self, proof: &[u8], inputs: &PublicInputs) -> Result<bool> {
        anyhow::ensure!(proof.len() == 64, "Invalid proof length {}", proof.len());
        let expected =
            crate::blake3(&[&inputs.nullifier[..], inputs.recipient.as_ref()].concat());
        Ok(proof[32..] == expected)
    }
}

#[cfg(test)]
fn roundtrip(prover: impl Prover, verifier: impl Verifier) -> Result<()> {
    let recipient = Pubkey::new_unique();
    let proof = prover.prove(&[1; 32], &[2; 32], &recipient)?;
    let inputs = PublicInputs {
        nullifier: [2; 32],
        recipient,
    };
    assert!(verifier.verify(&proof, &inputs)?);

    let inputs = PublicInputs {
        recipient: Pubkey::new_unique(),
        ..inputs
    };
    assert!(!verifier.verify(&proof, &inputs)?);
    assert!(verifier.verify(&proof[..10], &inputs).is_err());
    Ok(())
}

#[test]
fn test_collaborators_by_reference() -> Result<()> {
    let transcript = Transcript;
    roundtrip(&transcript, &transcript)
}
