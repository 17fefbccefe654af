//! Solana client library for the miya protocol
//!
//! This crate connects the mixer and bridge clients to a Solana cluster:
//! - A JSON-RPC implementation of the ledger collaborator
//! - An umbrella client sharing one ledger between both programs

pub use {
    client::{MiyaClient, Programs},
    ledger::RpcLedger,
};

mod client;
mod ledger;

// Re-export the program clients for convenience
pub use {bridge::BridgeClient, mixer::MixerClient};
