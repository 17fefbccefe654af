//! instructions for the mixer program

use crate::{api::pda, MixerInstruction, Relay};
use mcore::{Hash, Result, VarBytes};
use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
};

/// Build the initialize pool instruction
pub fn initialize_pool(
    program_id: &Pubkey,
    authority: Pubkey,
    token_mint: Pubkey,
    deposit_amount: u64,
) -> Result<Instruction> {
    let data = MixerInstruction::InitializePool {
        token_mint,
        deposit_amount,
    }
    .encode()?;
    let (pool, _) = pda::pool(program_id, &token_mint, deposit_amount)?;

    // build the instruction accounts
    let accounts = vec![
        AccountMeta::new(pool, false),                         // pool (mut)
        AccountMeta::new(authority, true),                     // authority (signer, mut)
        AccountMeta::new_readonly(token_mint, false),          // token_mint
        AccountMeta::new_readonly(pda::SYSTEM_PROGRAM, false), // system_program
    ];

    Ok(Instruction::new_with_bytes(*program_id, &data, accounts))
}

/// Build the deposit instruction
pub fn deposit(
    program_id: &Pubkey,
    depositor: Pubkey,
    token_mint: Pubkey,
    deposit_amount: u64,
    commitment: Hash,
    nullifier_hash: Hash,
) -> Result<Instruction> {
    let data = MixerInstruction::Deposit {
        commitment,
        nullifier_hash,
    }
    .encode()?;
    let (pool, _) = pda::pool(program_id, &token_mint, deposit_amount)?;

    let user_token_account = pda::token_account(&depositor, &token_mint);
    let pool_token_account = pda::token_account(&pool, &token_mint);

    // build the instruction accounts
    let accounts = vec![
        AccountMeta::new(pool, false),                        // pool (mut)
        AccountMeta::new(depositor, true),                    // signer (signer, mut)
        AccountMeta::new(user_token_account, false),          // user_token_account (mut)
        AccountMeta::new(pool_token_account, false),          // pool_token_account (mut)
        AccountMeta::new_readonly(pda::TOKEN_PROGRAM, false), // token_program
    ];

    Ok(Instruction::new_with_bytes(*program_id, &data, accounts))
}

/// Build the withdraw instruction
///
/// Without a relay the optional relayer account is filled with the program
/// id, which marks it as absent.
pub fn withdraw(
    program_id: &Pubkey,
    token_mint: Pubkey,
    deposit_amount: u64,
    proof: VarBytes,
    nullifier: Hash,
    recipient: Pubkey,
    relay: Option<Relay>,
) -> Result<Instruction> {
    let data = MixerInstruction::Withdraw {
        proof,
        nullifier,
        recipient,
        relay,
    }
    .encode()?;
    let (pool, _) = pda::pool(program_id, &token_mint, deposit_amount)?;
    let pool_token_account = pda::token_account(&pool, &token_mint);
    let recipient_token_account = pda::token_account(&recipient, &token_mint);
    let relayer_token_account = match relay {
        Some(Relay { relayer, .. }) => {
            AccountMeta::new(pda::token_account(&relayer, &token_mint), false)
        }
        None => AccountMeta::new_readonly(*program_id, false),
    };

    // build the instruction accounts
    let accounts = vec![
        AccountMeta::new(pool, false),                        // pool (mut)
        AccountMeta::new(pool_token_account, false),          // pool_token_account (mut)
        AccountMeta::new(recipient_token_account, false),     // recipient_token_account (mut)
        relayer_token_account,                                // relayer_token_account (optional)
        AccountMeta::new_readonly(pda::TOKEN_PROGRAM, false), // token_program
    ];

    Ok(Instruction::new_with_bytes(*program_id, &data, accounts))
}

/// Build the pause pool instruction
pub fn pause_pool(
    program_id: &Pubkey,
    authority: Pubkey,
    token_mint: Pubkey,
    deposit_amount: u64,
) -> Result<Instruction> {
    update_pool(program_id, MixerInstruction::PausePool, authority, token_mint, deposit_amount)
}

/// Build the resume pool instruction
pub fn resume_pool(
    program_id: &Pubkey,
    authority: Pubkey,
    token_mint: Pubkey,
    deposit_amount: u64,
) -> Result<Instruction> {
    update_pool(program_id, MixerInstruction::ResumePool, authority, token_mint, deposit_amount)
}

fn update_pool(
    program_id: &Pubkey,
    instruction: MixerInstruction,
    authority: Pubkey,
    token_mint: Pubkey,
    deposit_amount: u64,
) -> Result<Instruction> {
    let data = instruction.encode()?;
    let (pool, _) = pda::pool(program_id, &token_mint, deposit_amount)?;

    // build the instruction accounts
    let accounts = vec![
        AccountMeta::new(pool, false),               // pool (mut)
        AccountMeta::new_readonly(authority, true), // authority (signer)
    ];

    Ok(Instruction::new_with_bytes(*program_id, &data, accounts))
}
