//! Bridge commands

use crate::{cmd, Config};
use anyhow::Result;
use bridge::PairKey;
use clap::Parser;
use solana_sdk::{pubkey::Pubkey, signer::Signer};

/// Bridge commands
#[derive(Parser)]
pub enum Bridge {
    /// Initialize the bridge, the payer becomes its authority
    Init,

    /// Register a supported chain
    AddChain {
        /// The chain id
        #[clap(short, long)]
        id: u16,

        /// The chain name
        #[clap(short, long)]
        name: String,

        /// The adapter program of the chain
        #[clap(short, long)]
        adapter: Pubkey,
    },

    /// Enable or disable a supported chain
    ChainStatus {
        /// The chain id
        #[clap(short, long)]
        id: u16,

        /// Disable the chain instead of enabling it
        #[clap(long)]
        inactive: bool,
    },

    /// Register a token pair
    RegisterPair {
        /// The source chain id
        #[clap(short, long)]
        source: u16,

        /// The target chain id
        #[clap(short, long)]
        target: u16,

        /// The target token mint
        #[clap(short, long)]
        mint: Pubkey,

        /// The token address on the source chain in hex
        #[clap(long)]
        token: String,

        /// The fee in basis points
        #[clap(short, long)]
        fee: u32,
    },

    /// Lock tokens for a transfer to the target chain
    Lock {
        /// The source chain id
        #[clap(short, long)]
        source: u16,

        /// The target chain id
        #[clap(short, long)]
        target: u16,

        /// The target token mint
        #[clap(short, long)]
        mint: Pubkey,

        /// The amount to lock
        #[clap(short, long)]
        amount: u64,

        /// The recipient address on the target chain in hex
        #[clap(short, long)]
        recipient: String,
    },

    /// Release tokens to the payer with an externally generated proof
    Release {
        /// The source chain id
        #[clap(short, long)]
        source: u16,

        /// The target chain id
        #[clap(short, long)]
        target: u16,

        /// The target token mint
        #[clap(short, long)]
        mint: Pubkey,

        /// The amount to release
        #[clap(short, long)]
        amount: u64,

        /// The proof in hex
        #[clap(short, long)]
        proof: String,

        /// The nullifier in hex
        #[clap(short, long)]
        nullifier: String,

        /// The account collecting the fee
        #[clap(short, long)]
        fee_account: Pubkey,
    },

    /// Pause the bridge
    Pause,

    /// Resume the bridge
    Resume,

    /// Show the bridge state
    Info,

    /// Show a supported chain
    Chain {
        /// The chain id
        #[clap(short, long)]
        id: u16,
    },

    /// Show a token pair
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

impl Bridge {
    /// Run the bridge command
    pub async fn run(&self, config: &Config) -> Result<()> {
        let client = config.client()?.bridge;
        let payer = config.keypair()?;
        let authority = payer.pubkey();

        let ix = match self {
            Self::Init => client.initialize_bridge(authority)?,
            Self::AddChain { id, name, adapter } => {
                client.add_supported_chain(authority, *id, name, *adapter)?
            }
            Self::ChainStatus { id, inactive } => {
                client.update_chain_status(authority, *id, !inactive)?
            }
            Self::RegisterPair {
                source,
                target,
                mint,
                token,
                fee,
            } => client.register_token_pair(
                authority,
                pair(*source, *target, *mint),
                cmd::parse_hex("token", token)?,
                *fee,
            )?,
            Self::Lock {
                source,
                target,
                mint,
                amount,
                recipient,
            } => {
                let (commitment, signature) = client
                    .send_lock_tokens(
                        &payer,
                        pair(*source, *target, *mint),
                        *amount,
                        cmd::parse_hex("recipient", recipient)?,
                    )
                    .await?;
                println!("{signature}");
                println!("{}", bs58::encode(&commitment).into_string());
                return Ok(());
            }
            Self::Release {
                source,
                target,
                mint,
                amount,
                proof,
                nullifier,
                fee_account,
            } => client.release_tokens(
                authority,
                pair(*source, *target, *mint),
                *fee_account,
                *amount,
                cmd::parse_hex("proof", proof)?,
                cmd::parse_hash("nullifier", nullifier)?,
            )?,
            Self::Pause => client.pause_bridge(authority)?,
            Self::Resume => client.resume_bridge(authority)?,
            Self::Info => {
                match client.bridge_info().await? {
                    Some(bridge) => println!("{bridge:#?}"),
                    None => println!("Bridge not initialized"),
                }
                return Ok(());
            }
            Self::Chain { id } => {
                match client.chain_info(*id).await? {
                    Some(chain) => println!("{chain:#?}"),
                    None => println!("Chain {id} not supported"),
                }
                return Ok(());
            }
            Self::Pair {
                source,
                target,
                mint,
            } => {
                match client.token_pair_info(&pair(*source, *target, *mint)).await? {
                    Some(token_pair) => println!("{token_pair:#?}"),
                    None => println!("Token pair {source} -> {target} of {mint} not registered"),
                }
                return Ok(());
            }
        };

        let signature = client.send(ix, &payer).await?;
        println!("{signature}");
        Ok(())
    }
}

fn pair(source_chain_id: u16, target_chain_id: u16, target_token_mint: Pubkey) -> PairKey {
    PairKey {
        source_chain_id,
        target_chain_id,
        target_token_mint,
    }
}
