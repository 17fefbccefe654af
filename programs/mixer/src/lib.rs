//! Client library for the miya mixer program

use solana_sdk::{pubkey, pubkey::Pubkey};

pub use {
    client::{MixerClient, VerificationResult},
    instruction::{MixerInstruction, Relay},
    state::Pool,
};

pub mod api;
mod client;
pub mod instruction;
pub mod state;

/// The default mixer program id of development deployments
pub const DEFAULT_PROGRAM_ID: Pubkey = pubkey!("MiyaMixer1111111111111111111111111111111111");
