//! instructions for the bridge program

use crate::{api::pda, BridgeInstruction};
use mcore::{Hash, Result, VarBytes};
use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
};

/// The chains and mint identifying a token pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairKey {
    /// The chain tokens arrive from
    pub source_chain_id: u16,

    /// The chain tokens leave to
    pub target_chain_id: u16,

    /// The local token mint
    pub target_token_mint: Pubkey,
}

impl PairKey {
    /// Derive the token pair PDA
    pub fn address(&self, program_id: &Pubkey) -> Result<Pubkey> {
        pda::token_pair(
            program_id,
            self.source_chain_id,
            self.target_chain_id,
            &self.target_token_mint,
        )
        .map(|(address, _)| address)
    }
}

/// Build the initialize bridge instruction
pub fn initialize_bridge(program_id: &Pubkey, authority: Pubkey) -> Result<Instruction> {
    let data = BridgeInstruction::InitializeBridge.encode()?;
    let (bridge, _) = pda::bridge(program_id)?;

    // build the instruction accounts
    let accounts = vec![
        AccountMeta::new(bridge, false),                       // bridge (mut)
        AccountMeta::new(authority, true),                     // authority (signer, mut)
        AccountMeta::new_readonly(pda::SYSTEM_PROGRAM, false), // system_program
    ];

    Ok(Instruction::new_with_bytes(*program_id, &data, accounts))
}

/// Build the add supported chain instruction
pub fn add_supported_chain(
    program_id: &Pubkey,
    authority: Pubkey,
    chain_id: u16,
    chain_name: String,
    adapter_program: Pubkey,
) -> Result<Instruction> {
    let data = BridgeInstruction::AddSupportedChain {
        chain_id,
        chain_name,
        adapter_program,
    }
    .encode()?;

    manage_chain(program_id, data, authority, chain_id)
}

/// Build the update chain status instruction
pub fn update_chain_status(
    program_id: &Pubkey,
    authority: Pubkey,
    chain_id: u16,
    is_active: bool,
) -> Result<Instruction> {
    let data = BridgeInstruction::UpdateChainStatus {
        chain_id,
        is_active,
    }
    .encode()?;

    manage_chain(program_id, data, authority, chain_id)
}

fn manage_chain(
    program_id: &Pubkey,
    data: Vec<u8>,
    authority: Pubkey,
    chain_id: u16,
) -> Result<Instruction> {
    let (bridge, _) = pda::bridge(program_id)?;
    let (chain, _) = pda::chain(program_id, chain_id)?;

    // the chain count of the bridge changes when a chain is added
    let accounts = vec![
        AccountMeta::new(bridge, false),                       // bridge (mut)
        AccountMeta::new(chain, false),                        // supported_chain (mut)
        AccountMeta::new(authority, true),                     // authority (signer, mut)
        AccountMeta::new_readonly(pda::SYSTEM_PROGRAM, false), // system_program
    ];

    Ok(Instruction::new_with_bytes(*program_id, &data, accounts))
}

/// Build the register token pair instruction
///
/// The target mint only travels as an account, the pair address commits to it.
pub fn register_token_pair(
    program_id: &Pubkey,
    authority: Pubkey,
    pair: PairKey,
    source_token_address: VarBytes,
    fee_bps: u16,
) -> Result<Instruction> {
    let data = BridgeInstruction::RegisterTokenPair {
        source_chain_id: pair.source_chain_id,
        target_chain_id: pair.target_chain_id,
        source_token_address,
        fee_bps,
    }
    .encode()?;
    let (bridge, _) = pda::bridge(program_id)?;
    let (source_chain, _) = pda::chain(program_id, pair.source_chain_id)?;
    let (target_chain, _) = pda::chain(program_id, pair.target_chain_id)?;

    // build the instruction accounts
    let accounts = vec![
        AccountMeta::new_readonly(bridge, false),                 // bridge
        AccountMeta::new(pair.address(program_id)?, false),       // token_pair (mut)
        AccountMeta::new_readonly(source_chain, false),           // supported_source_chain
        AccountMeta::new_readonly(target_chain, false),           // supported_target_chain
        AccountMeta::new_readonly(pair.target_token_mint, false), // target_token_mint
        AccountMeta::new(authority, true),                        // authority (signer, mut)
        AccountMeta::new_readonly(pda::SYSTEM_PROGRAM, false),    // system_program
    ];

    Ok(Instruction::new_with_bytes(*program_id, &data, accounts))
}

/// Build the lock tokens instruction
pub fn lock_tokens(
    program_id: &Pubkey,
    signer: Pubkey,
    pair: PairKey,
    amount: u64,
    recipient_address: VarBytes,
    commitment: Hash,
) -> Result<Instruction> {
    let data = BridgeInstruction::LockTokens {
        amount,
        target_chain_id: pair.target_chain_id,
        recipient_address,
        commitment,
    }
    .encode()?;
    let (bridge, _) = pda::bridge(program_id)?;
    let mint = pair.target_token_mint;

    let user_token_account = pda::token_account(&signer, &mint);
    let bridge_vault = pda::token_account(&bridge, &mint);

    // build the instruction accounts
    let accounts = vec![
        AccountMeta::new(bridge, false),                      // bridge (mut)
        AccountMeta::new(pair.address(program_id)?, false),   // token_pair (mut)
        AccountMeta::new(signer, true),                       // signer (signer, mut)
        AccountMeta::new(user_token_account, false),          // user_token_account (mut)
        AccountMeta::new(bridge_vault, false),                // bridge_vault (mut)
        AccountMeta::new_readonly(pda::TOKEN_PROGRAM, false), // token_program
    ];

    Ok(Instruction::new_with_bytes(*program_id, &data, accounts))
}

/// Build the release tokens instruction
pub fn release_tokens(
    program_id: &Pubkey,
    recipient: Pubkey,
    pair: PairKey,
    fee_account: Pubkey,
    amount: u64,
    proof: VarBytes,
    nullifier: Hash,
) -> Result<Instruction> {
    let data = BridgeInstruction::ReleaseTokens {
        amount,
        source_chain_id: pair.source_chain_id,
        proof,
        nullifier,
    }
    .encode()?;
    let (bridge, _) = pda::bridge(program_id)?;
    let mint = pair.target_token_mint;

    let recipient_token_account = pda::token_account(&recipient, &mint);
    let bridge_vault = pda::token_account(&bridge, &mint);

    // build the instruction accounts
    let accounts = vec![
        AccountMeta::new(bridge, false),                      // bridge (mut)
        AccountMeta::new(pair.address(program_id)?, false),   // token_pair (mut)
        AccountMeta::new(recipient, true),                    // recipient (signer, mut)
        AccountMeta::new(recipient_token_account, false),     // recipient_token_account (mut)
        AccountMeta::new(bridge_vault, false),                // bridge_vault (mut)
        AccountMeta::new(fee_account, false),                 // fee_account (mut)
        AccountMeta::new_readonly(pda::TOKEN_PROGRAM, false), // token_program
    ];

    Ok(Instruction::new_with_bytes(*program_id, &data, accounts))
}

/// Build the pause bridge instruction
pub fn pause_bridge(program_id: &Pubkey, authority: Pubkey) -> Result<Instruction> {
    update_bridge(program_id, BridgeInstruction::PauseBridge, authority)
}

/// Build the resume bridge instruction
pub fn resume_bridge(program_id: &Pubkey, authority: Pubkey) -> Result<Instruction> {
    update_bridge(program_id, BridgeInstruction::ResumeBridge, authority)
}

fn update_bridge(
    program_id: &Pubkey,
    instruction: BridgeInstruction,
    authority: Pubkey,
) -> Result<Instruction> {
    let data = instruction.encode()?;
    let (bridge, _) = pda::bridge(program_id)?;

    // build the instruction accounts
    let accounts = vec![
        AccountMeta::new(bridge, false),             // bridge (mut)
        AccountMeta::new_readonly(authority, true), // authority (signer)
    ];

    Ok(Instruction::new_with_bytes(*program_id, &data, accounts))
}
