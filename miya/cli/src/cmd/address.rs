//! Address derivation commands

use crate::Config;
use anyhow::Result;
use clap::Parser;
use solana_sdk::pubkey::Pubkey;

/// Derive program addresses
#[derive(Parser)]
pub enum Address {
    /// Mixer pool of a mint and denomination
    Pool {
        /// The token mint
        #[clap(short, long)]
        mint: Pubkey,

        /// The fixed deposit amount
        #[clap(short, long)]
        amount: u64,
    },

    /// The bridge state
    Bridge,

    /// A supported chain
    Chain {
        /// The chain id
        #[clap(short, long)]
        id: u16,
    },

    /// A token pair
    Pair {
        /// The source chain id
        #[clap(short, long)]
        source: u16,

        /// The target chain id
        #[clap(short, long)]
        target: u16,

        /// The target token mint
        #[clap(short, long)]
        mint: Pubkey,
    },
}

impl Address {
    /// Run the address command
    pub fn run(&self, config: &Config) -> Result<()> {
        let programs = config.programs.parse()?;
        let (address, bump) = match self {
            Self::Pool { mint, amount } => mixer::api::pda::pool(&programs.mixer, mint, *amount)?,
            Self::Bridge => bridge::api::pda::bridge(&programs.bridge)?,
            Self::Chain { id } => bridge::api::pda::chain(&programs.bridge, *id)?,
            Self::Pair {
                source,
                target,
                mint,
            } => bridge::api::pda::token_pair(&programs.bridge, *source, *target, mint)?,
        };

        println!("{address} (bump {bump})");
        Ok(())
    }
}
