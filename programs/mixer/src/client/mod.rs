//! Client for the miya mixer program

use crate::{
    api::{instruction, pda},
    Pool, Relay,
};
use anyhow::Result;
use mcore::{Hash, Ledger, VarBytes};
use mcrypto::DepositNote;
use solana_sdk::{
    instruction::Instruction,
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    signer::Signer,
};

/// The outcome of a withdrawal attempt
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerificationResult {
    /// If the ledger accepted the withdrawal
    pub success: bool,

    /// The transaction signature on success
    pub signature: Option<Signature>,

    /// The rejection message on failure
    pub error: Option<String>,
}

/// Main client for interacting with the mixer program
pub struct MixerClient<L> {
    /// The mixer program ID
    program_id: Pubkey,
    /// The ledger collaborator
    ledger: L,
}

impl<L: Ledger> MixerClient<L> {
    /// Create a new mixer client
    pub fn new(program_id: Pubkey, ledger: L) -> Self {
        Self { program_id, ledger }
    }

    /// Get the program ID
    pub fn program_id(&self) -> &Pubkey {
        &self.program_id
    }

    /// Get the ledger collaborator
    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    // ============================================================================
    // PDA Helper Methods
    // ============================================================================

    /// Get the pool address of a token and denomination
    pub fn pool_address(&self, token_mint: &Pubkey, deposit_amount: u64) -> Result<Pubkey> {
        let (address, bump) = pda::pool(&self.program_id, token_mint, deposit_amount)?;
        tracing::debug!("Pool of {token_mint} x {deposit_amount}: {address} (bump {bump})");
        Ok(address)
    }

    // ============================================================================
    // Instruction Builders
    // ============================================================================

    /// Build the initialize pool instruction
    pub fn initialize_pool(
        &self,
        authority: Pubkey,
        token_mint: Pubkey,
        deposit_amount: u64,
    ) -> Result<Instruction> {
        instruction::initialize_pool(&self.program_id, authority, token_mint, deposit_amount)
            .map_err(Into::into)
    }

    /// Build a deposit instruction with a fresh note
    ///
    /// The note has to be persisted by the caller before submitting, it is
    /// the only way to withdraw the deposit later.
    pub fn deposit(
        &self,
        depositor: Pubkey,
        token_mint: Pubkey,
        deposit_amount: u64,
    ) -> Result<(DepositNote, Instruction)> {
        let note = DepositNote::new();
        let ix = instruction::deposit(
            &self.program_id,
            depositor,
            token_mint,
            deposit_amount,
            note.commitment,
            note.nullifier_hash,
        )?;

        tracing::debug!(
            "Built deposit of {deposit_amount} {token_mint} with commitment {}",
            bs58::encode(&note.commitment).into_string()
        );
        Ok((note, ix))
    }

    /// Build a withdraw instruction from prover output
    pub fn withdraw(
        &self,
        token_mint: Pubkey,
        deposit_amount: u64,
        proof: Vec<u8>,
        nullifier: Hash,
        recipient: Pubkey,
        relay: Option<Relay>,
    ) -> Result<Instruction> {
        instruction::withdraw(
            &self.program_id,
            token_mint,
            deposit_amount,
            VarBytes::new(proof),
            nullifier,
            recipient,
            relay,
        )
        .map_err(Into::into)
    }

    /// Build the pause pool instruction
    pub fn pause_pool(
        &self,
        authority: Pubkey,
        token_mint: Pubkey,
        deposit_amount: u64,
    ) -> Result<Instruction> {
        instruction::pause_pool(&self.program_id, authority, token_mint, deposit_amount)
            .map_err(Into::into)
    }

    /// Build the resume pool instruction
    pub fn resume_pool(
        &self,
        authority: Pubkey,
        token_mint: Pubkey,
        deposit_amount: u64,
    ) -> Result<Instruction> {
        instruction::resume_pool(&self.program_id, authority, token_mint, deposit_amount)
            .map_err(Into::into)
    }

    // ============================================================================
    // State Reading Methods
    // ============================================================================

    /// Fetch and decode the pool, `None` if it does not exist
    pub async fn pool_info(
        &self,
        token_mint: &Pubkey,
        deposit_amount: u64,
    ) -> Result<Option<Pool>> {
        let address = self.pool_address(token_mint, deposit_amount)?;
        let Some(data) = self.ledger.account(&address).await? else {
            return Ok(None);
        };

        match Pool::decode(&data) {
            Ok(pool) => Ok(Some(pool)),
            Err(e) => {
                tracing::warn!("Pool account {address} is malformed: {e}");
                Err(e.into())
            }
        }
    }

    // ============================================================================
    // Transaction Methods
    // ============================================================================

    /// Initialize a pool, the authority pays the fees
    pub async fn send_initialize_pool(
        &self,
        authority: &Keypair,
        token_mint: Pubkey,
        deposit_amount: u64,
    ) -> Result<Signature> {
        let ix = self.initialize_pool(authority.pubkey(), token_mint, deposit_amount)?;
        let signature = self.ledger.submit(&[ix], &[authority]).await?;
        tracing::info!("Initialized pool of {deposit_amount} {token_mint}: {signature}");
        Ok(signature)
    }

    /// Deposit into a pool
    ///
    /// The returned note is marked deposited only after the ledger confirmed
    /// the transaction.
    pub async fn send_deposit(
        &self,
        depositor: &Keypair,
        token_mint: Pubkey,
        deposit_amount: u64,
    ) -> Result<(DepositNote, Signature)> {
        let (mut note, ix) = self.deposit(depositor.pubkey(), token_mint, deposit_amount)?;
        let signature = self.ledger.submit(&[ix], &[depositor]).await?;
        note.mark_deposited()?;
        tracing::info!(
            "Deposited {deposit_amount} {token_mint} with commitment {}: {signature}",
            bs58::encode(&note.commitment).into_string()
        );
        Ok((note, signature))
    }

    /// Mark the note deposited once its deposit transaction is final
    ///
    /// Returns `false` and leaves the note untouched while the ledger does
    /// not know the transaction.
    pub async fn confirm_deposit(
        &self,
        note: &mut DepositNote,
        signature: &Signature,
    ) -> Result<bool> {
        if !self.ledger.confirmed(signature).await? {
            tracing::debug!("Deposit {signature} is not confirmed yet");
            return Ok(false);
        }

        note.mark_deposited()?;
        tracing::info!(
            "Confirmed deposit of commitment {}: {signature}",
            bs58::encode(&note.commitment).into_string()
        );
        Ok(true)
    }

    /// Submit a withdrawal and report the outcome
    ///
    /// Local encoding failures are errors, ledger rejections are reported in
    /// the result.
    #[allow(clippy::too_many_arguments)]
    pub async fn send_withdraw(
        &self,
        payer: &Keypair,
        token_mint: Pubkey,
        deposit_amount: u64,
        proof: Vec<u8>,
        nullifier: Hash,
        recipient: Pubkey,
        relay: Option<Relay>,
    ) -> Result<VerificationResult> {
        let ix = self.withdraw(token_mint, deposit_amount, proof, nullifier, recipient, relay)?;
        match self.ledger.submit(&[ix], &[payer]).await {
            Ok(signature) => {
                tracing::info!(
                    "Withdrew {deposit_amount} {token_mint} to {recipient}: {signature}"
                );
                Ok(VerificationResult {
                    success: true,
                    signature: Some(signature),
                    error: None,
                })
            }
            Err(e) => {
                tracing::warn!(
                    "Withdrawal of nullifier {} rejected: {e}",
                    bs58::encode(&nullifier).into_string()
                );
                Ok(VerificationResult {
                    success: false,
                    signature: None,
                    error: Some(e.to_string()),
                })
            }
        }
    }

    /// Pause a pool (authority only)
    pub async fn send_pause_pool(
        &self,
        authority: &Keypair,
        token_mint: Pubkey,
        deposit_amount: u64,
    ) -> Result<Signature> {
        let ix = self.pause_pool(authority.pubkey(), token_mint, deposit_amount)?;
        let signature = self.ledger.submit(&[ix], &[authority]).await?;
        tracing::info!("Paused pool of {deposit_amount} {token_mint}: {signature}");
        Ok(signature)
    }

    /// Resume a pool (authority only)
    pub async fn send_resume_pool(
        &self,
        authority: &Keypair,
        token_mint: Pubkey,
        deposit_amount: u64,
    ) -> Result<Signature> {
        let ix = self.resume_pool(authority.pubkey(), token_mint, deposit_amount)?;
        let signature = self.ledger.submit(&[ix], &[authority]).await?;
        tracing::info!("Resumed pool of {deposit_amount} {token_mint}: {signature}");
        Ok(signature)
    }
}
