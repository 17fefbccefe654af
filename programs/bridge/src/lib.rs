//! Client library for the miya bridge program

use solana_sdk::{pubkey, pubkey::Pubkey};

pub use {
    api::instruction::PairKey,
    client::BridgeClient,
    instruction::BridgeInstruction,
    state::{Bridge, SupportedChain, TokenPair},
};

pub mod api;
mod client;
pub mod instruction;
pub mod state;

/// The default bridge program id of development deployments
pub const DEFAULT_PROGRAM_ID: Pubkey = pubkey!("MiyaBridge111111111111111111111111111111111");

/// The fee cap in basis points
pub const MAX_FEE_BPS: u16 = 10_000;

/// The maximum length of a chain name
pub const MAX_CHAIN_NAME_LEN: usize = 32;

/// The maximum length of an external chain address
pub const MAX_ADDRESS_LEN: usize = 64;
