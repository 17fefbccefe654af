//! The remote ledger collaborator
//!
//! Transport, retries and timeouts belong to the implementation. The
//! protocol clients only surface whatever outcome they receive.

use anyhow::Result;
use async_trait::async_trait;
use solana_sdk::{
    instruction::Instruction,
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    signer::Signer,
};
use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex},
};

/// Query and submission interface of the remote ledger
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Fetch the raw data of an account, `None` if it does not exist
    async fn account(&self, address: &Pubkey) -> Result<Option<Vec<u8>>>;

    /// Submit instructions in one transaction and await finality
    ///
    /// The first signer pays the fees.
    async fn submit(&self, instructions: &[Instruction], signers: &[&Keypair])
        -> Result<Signature>;

    /// If a submitted transaction has reached finality
    async fn confirmed(&self, signature: &Signature) -> Result<bool>;
}

#[async_trait]
impl<L: Ledger + ?Sized> Ledger for Arc<L> {
    async fn account(&self, address: &Pubkey) -> Result<Option<Vec<u8>>> {
        (**self).account(address).await
    }

    async fn submit(
        &self,
        instructions: &[Instruction],
        signers: &[&Keypair],
    ) -> Result<Signature> {
        (**self).submit(instructions, signers).await
    }

    async fn confirmed(&self, signature: &Signature) -> Result<bool> {
        (**self).confirmed(signature).await
    }
}

/// In-memory ledger for development and tests
///
/// Accounts are raw byte buffers, submissions are recorded and never
/// executed.
#[derive(Default)]
pub struct MemoryLedger {
    accounts: Mutex<BTreeMap<Pubkey, Vec<u8>>>,
    submitted: Mutex<Vec<Instruction>>,
    signatures: Mutex<Vec<Signature>>,
    reject: Mutex<Option<String>>,
}

impl MemoryLedger {
    /// Store the raw data of an account
    pub fn set_account(&self, address: Pubkey, data: Vec<u8>) {
        self.accounts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(address, data);
    }

    /// Reject all following submissions with the message
    pub fn reject(&self, message: impl Into<String>) {
        *self.reject.lock().unwrap_or_else(|e| e.into_inner()) = Some(message.into());
    }

    /// The instructions submitted so far
    pub fn submitted(&self) -> Vec<Instruction> {
        self.submitted
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl Ledger for MemoryLedger {
    async fn account(&self, address: &Pubkey) -> Result<Option<Vec<u8>>> {
        Ok(self
            .accounts
            .lock()
            .map_err(|_| anyhow::anyhow!("Failed to lock accounts"))?
            .get(address)
            .cloned())
    }

    async fn submit(
        &self,
        instructions: &[Instruction],
        signers: &[&Keypair],
    ) -> Result<Signature> {
        anyhow::ensure!(!signers.is_empty(), "No signers provided");
        if let Some(message) = self
            .reject
            .lock()
            .map_err(|_| anyhow::anyhow!("Failed to lock rejection"))?
            .clone()
        {
            anyhow::bail!(message);
        }

        let mut submitted = self
            .submitted
            .lock()
            .map_err(|_| anyhow::anyhow!("Failed to lock submissions"))?;
        submitted.extend_from_slice(instructions);

        let message = instructions
            .iter()
            .flat_map(|ix| ix.data.iter().copied())
            .collect::<Vec<_>>();
        let signature = signers[0].sign_message(&message);
        self.signatures
            .lock()
            .map_err(|_| anyhow::anyhow!("Failed to lock signatures"))?
            .push(signature);
        Ok(signature)
    }

    async fn confirmed(&self, signature: &Signature) -> Result<bool> {
        Ok(self
            .signatures
            .lock()
            .map_err(|_| anyhow::anyhow!("Failed to lock signatures"))?
            .contains(signature))
    }
}
