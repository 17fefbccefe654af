//! Client for the miya bridge program

use crate::{
    api::{instruction, pda},
    Bridge, PairKey, SupportedChain, TokenPair,
};
use anyhow::Result;
use mcore::{seed, Hash, Ledger, VarBytes};
use solana_sdk::{
    instruction::Instruction,
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    signer::Signer,
};

/// Main client for interacting with the bridge program
pub struct BridgeClient<L> {
    /// The bridge program ID
    program_id: Pubkey,
    /// The ledger collaborator
    ledger: L,
}

impl<L: Ledger> BridgeClient<L> {
    /// Create a new bridge client
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

    /// Get the bridge address
    pub fn bridge_address(&self) -> Result<Pubkey> {
        let (address, bump) = pda::bridge(&self.program_id)?;
        tracing::debug!("Bridge: {address} (bump {bump})");
        Ok(address)
    }

    /// Get the supported chain address
    pub fn chain_address(&self, chain_id: u16) -> Result<Pubkey> {
        let (address, bump) = pda::chain(&self.program_id, chain_id)?;
        tracing::debug!("Chain {chain_id}: {address} (bump {bump})");
        Ok(address)
    }

    /// Get the token pair address
    pub fn token_pair_address(&self, pair: &PairKey) -> Result<Pubkey> {
        let address = pair.address(&self.program_id)?;
        tracing::debug!(
            "Token pair {} -> {} of {}: {address}",
            pair.source_chain_id,
            pair.target_chain_id,
            pair.target_token_mint
        );
        Ok(address)
    }

    // ============================================================================
    // Instruction Builders
    // ============================================================================

    /// Build the initialize bridge instruction
    pub fn initialize_bridge(&self, authority: Pubkey) -> Result<Instruction> {
        instruction::initialize_bridge(&self.program_id, authority).map_err(Into::into)
    }

    /// Build the add supported chain instruction
    pub fn add_supported_chain(
        &self,
        authority: Pubkey,
        chain_id: u16,
        chain_name: &str,
        adapter_program: Pubkey,
    ) -> Result<Instruction> {
        instruction::add_supported_chain(
            &self.program_id,
            authority,
            chain_id,
            chain_name.into(),
            adapter_program,
        )
        .map_err(Into::into)
    }

    /// Build the update chain status instruction
    pub fn update_chain_status(
        &self,
        authority: Pubkey,
        chain_id: u16,
        is_active: bool,
    ) -> Result<Instruction> {
        instruction::update_chain_status(&self.program_id, authority, chain_id, is_active)
            .map_err(Into::into)
    }

    /// Build the register token pair instruction
    ///
    /// The fee is narrowed to 16 bits before the cap is checked.
    pub fn register_token_pair(
        &self,
        authority: Pubkey,
        pair: PairKey,
        source_token_address: Vec<u8>,
        fee_bps: u32,
    ) -> Result<Instruction> {
        let fee_bps = seed::fit::<u16, u32>("fee_bps", fee_bps)?;
        instruction::register_token_pair(
            &self.program_id,
            authority,
            pair,
            VarBytes::new(source_token_address),
            fee_bps,
        )
        .map_err(Into::into)
    }

    /// Build a lock tokens instruction with a fresh commitment
    pub fn lock_tokens(
        &self,
        signer: Pubkey,
        pair: PairKey,
        amount: u64,
        recipient_address: Vec<u8>,
    ) -> Result<(Hash, Instruction)> {
        let commitment = mcrypto::note::generate_commitment();
        let ix = instruction::lock_tokens(
            &self.program_id,
            signer,
            pair,
            amount,
            VarBytes::new(recipient_address),
            commitment,
        )?;

        tracing::debug!(
            "Built lock of {amount} {} to chain {} with commitment {}",
            pair.target_token_mint,
            pair.target_chain_id,
            bs58::encode(&commitment).into_string()
        );
        Ok((commitment, ix))
    }

    /// Build a release tokens instruction from prover output
    pub fn release_tokens(
        &self,
        recipient: Pubkey,
        pair: PairKey,
        fee_account: Pubkey,
        amount: u64,
        proof: Vec<u8>,
        nullifier: Hash,
    ) -> Result<Instruction> {
        instruction::release_tokens(
            &self.program_id,
            recipient,
            pair,
            fee_account,
            amount,
            VarBytes::new(proof),
            nullifier,
        )
        .map_err(Into::into)
    }

    /// Build the pause bridge instruction
    pub fn pause_bridge(&self, authority: Pubkey) -> Result<Instruction> {
        instruction::pause_bridge(&self.program_id, authority).map_err(Into::into)
    }

    /// Build the resume bridge instruction
    pub fn resume_bridge(&self, authority: Pubkey) -> Result<Instruction> {
        instruction::resume_bridge(&self.program_id, authority).map_err(Into::into)
    }

    // ============================================================================
    // State Reading Methods
    // ============================================================================

    async fn fetch<T>(
        &self,
        address: Pubkey,
        decode: fn(&[u8]) -> mcore::Result<T>,
    ) -> Result<Option<T>> {
        let Some(data) = self.ledger.account(&address).await? else {
            return Ok(None);
        };

        decode(&data).map(Some).map_err(|e| {
            tracing::warn!("Account {address} is malformed: {e}");
            e.into()
        })
    }

    /// Fetch and decode the bridge, `None` if it does not exist
    pub async fn bridge_info(&self) -> Result<Option<Bridge>> {
        self.fetch(self.bridge_address()?, Bridge::decode).await
    }

    /// Fetch and decode a supported chain, `None` if it does not exist
    pub async fn chain_info(&self, chain_id: u16) -> Result<Option<SupportedChain>> {
        self.fetch(self.chain_address(chain_id)?, SupportedChain::decode)
            .await
    }

    /// Fetch and decode a token pair, `None` if it does not exist
    pub async fn token_pair_info(&self, pair: &PairKey) -> Result<Option<TokenPair>> {
        self.fetch(self.token_pair_address(pair)?, TokenPair::decode)
            .await
    }

    // ============================================================================
    // Transaction Methods
    // ============================================================================

    /// Submit an instruction signed and paid by the signer
    pub async fn send(&self, ix: Instruction, signer: &Keypair) -> Result<Signature> {
        let signature = self.ledger.submit(&[ix], &[signer]).await?;
        tracing::info!("Submitted bridge instruction: {signature}");
        Ok(signature)
    }

    /// Lock tokens for a transfer, returning the commitment
    pub async fn send_lock_tokens(
        &self,
        signer: &Keypair,
        pair: PairKey,
        amount: u64,
        recipient_address: Vec<u8>,
    ) -> Result<(Hash, Signature)> {
        let (commitment, ix) = self.lock_tokens(signer.pubkey(), pair, amount, recipient_address)?;
        let signature = self.ledger.submit(&[ix], &[signer]).await?;
        tracing::info!(
            "Locked {amount} {} for chain {}: {signature}",
            pair.target_token_mint,
            pair.target_chain_id
        );
        Ok((commitment, signature))
    }
}
