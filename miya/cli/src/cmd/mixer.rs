//! Mixer commands

use crate::{cmd, Config, NoteStore};
use anyhow::Result;
use clap::Parser;
use mcore::Ledger;
use mcrypto::NoteState;
use mixer::Relay;
use solana_sdk::{pubkey::Pubkey, signature::Signature, signer::Signer};
use std::path::Path;

/// Mixer commands
#[derive(Parser)]
pub enum Mixer {
    /// Initialize a pool, the payer becomes its authority
    Init {
        /// The token mint
        #[clap(short, long)]
        mint: Pubkey,

        /// The fixed deposit amount
        #[clap(short, long)]
        amount: u64,
    },

    /// Deposit into a pool and keep the note
    Deposit {
        /// The token mint
        #[clap(short, long)]
        mint: Pubkey,

        /// The fixed deposit amount
        #[clap(short, long)]
        amount: u64,
    },

    /// Mark a note deposited once its deposit transaction is final
    Confirm {
        /// The base58 commitment of the note
        #[clap(short, long)]
        note: String,

        /// The signature of the deposit transaction
        #[clap(short, long)]
        signature: Signature,
    },

    /// Withdraw a deposited note with an externally generated proof
    Withdraw {
        /// The token mint
        #[clap(short, long)]
        mint: Pubkey,

        /// The fixed deposit amount
        #[clap(short, long)]
        amount: u64,

        /// The base58 commitment of the note
        #[clap(short, long)]
        note: String,

        /// The proof in hex
        #[clap(short, long)]
        proof: String,

        /// The recipient, defaults to the payer
        #[clap(short, long)]
        recipient: Option<Pubkey>,

        /// The relayer collecting the fee
        #[clap(long, requires = "fee")]
        relayer: Option<Pubkey>,

        /// The relayer fee
        #[clap(long, requires = "relayer")]
        fee: Option<u64>,
    },

    /// Pause a pool
    Pause {
        /// The token mint
        #[clap(short, long)]
        mint: Pubkey,

        /// The fixed deposit amount
        #[clap(short, long)]
        amount: u64,
    },

    /// Resume a pool
    Resume {
        /// The token mint
        #[clap(short, long)]
        mint: Pubkey,

        /// The fixed deposit amount
        #[clap(short, long)]
        amount: u64,
    },

    /// Show the state of a pool
    Info {
        /// The token mint
        #[clap(short, long)]
        mint: Pubkey,

        /// The fixed deposit amount
        #[clap(short, long)]
        amount: u64,
    },

    /// List the local notes
    Notes,

    /// Abandon a local note
    Abandon {
        /// The base58 commitment of the note
        #[clap(short, long)]
        note: String,
    },
}

impl Mixer {
    /// Run the mixer command
    pub async fn run(&self, cache: &Path, config: &Config) -> Result<()> {
        let store = NoteStore::new(cache);
        match self {
            Self::Notes => return self.notes(&store),
            Self::Abandon { note } => return self.abandon(&store, note),
            _ => {}
        }

        let client = config.client()?;
        let payer = config.keypair()?;
        match self {
            Self::Init { mint, amount } => {
                let signature = client
                    .mixer
                    .send_initialize_pool(&payer, *mint, *amount)
                    .await?;
                println!("{signature}");
            }
            Self::Deposit { mint, amount } => {
                let (mut note, ix) = client.mixer.deposit(payer.pubkey(), *mint, *amount)?;
                let path = store.save(&note)?;
                tracing::info!("Note saved to {}", path.display());

                let commitment = bs58::encode(&note.commitment).into_string();
                let signature = client
                    .ledger()
                    .submit(&[ix], &[&payer])
                    .await
                    .map_err(|e| {
                        e.context(format!(
                            "Note {commitment} stays unused, confirm it once the deposit lands"
                        ))
                    })?;

                note.mark_deposited()?;
                store.save(&note)?;
                println!("{signature}");
                println!("{commitment}");
            }
            Self::Confirm { note, signature } => {
                let mut deposit = store.load(note)?;
                if client.mixer.confirm_deposit(&mut deposit, signature).await? {
                    store.save(&deposit)?;
                    println!("Note {note} deposited");
                } else {
                    println!("Deposit {signature} is not confirmed yet");
                }
            }
            Self::Withdraw {
                mint,
                amount,
                note,
                proof,
                recipient,
                relayer,
                fee,
            } => {
                let mut deposit = store.load(note)?;
                anyhow::ensure!(
                    deposit.state == NoteState::Deposited,
                    "Note {note} is {}, only deposited notes can be withdrawn",
                    deposit.state.as_str()
                );

                let relay = relayer
                    .zip(*fee)
                    .map(|(relayer, fee)| Relay { relayer, fee });
                let result = client
                    .mixer
                    .send_withdraw(
                        &payer,
                        *mint,
                        *amount,
                        cmd::parse_hex("proof", proof)?,
                        deposit.nullifier_hash,
                        recipient.unwrap_or_else(|| payer.pubkey()),
                        relay,
                    )
                    .await?;

                if result.success {
                    deposit.mark_withdrawn()?;
                    store.save(&deposit)?;
                }
                println!("{result:#?}");
            }
            Self::Pause { mint, amount } => {
                let signature = client.mixer.send_pause_pool(&payer, *mint, *amount).await?;
                println!("{signature}");
            }
            Self::Resume { mint, amount } => {
                let signature = client.mixer.send_resume_pool(&payer, *mint, *amount).await?;
                println!("{signature}");
            }
            Self::Info { mint, amount } => match client.mixer.pool_info(mint, *amount).await? {
                Some(pool) => println!("{pool:#?}"),
                None => println!("Pool of {amount} {mint} not found"),
            },
            Self::Notes | Self::Abandon { .. } => {}
        }

        Ok(())
    }

    /// List the local notes
    fn notes(&self, store: &NoteStore) -> Result<()> {
        for note in store.list()? {
            println!(
                "{} {} {}",
                bs58::encode(&note.commitment).into_string(),
                note.state.as_str(),
                note.timestamp
            );
        }
        Ok(())
    }

    /// Abandon a local note
    fn abandon(&self, store: &NoteStore, commitment: &str) -> Result<()> {
        let mut note = store.load(commitment)?;
        note.abandon()?;
        store.save(&note)?;
        println!("Note {commitment} abandoned");
        Ok(())
    }
}
