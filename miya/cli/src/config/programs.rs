//! Program configuration

use anyhow::Result;
use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;

/// Program ids of the deployment, in base58
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Programs {
    /// mixer program id
    pub mixer: String,

    /// bridge program id
    pub bridge: String,
}

impl Programs {
    /// Parse the program ids
    pub fn parse(&self) -> Result<msolana::Programs> {
        Ok(msolana::Programs {
            mixer: Pubkey::from_str(&self.mixer)
                .map_err(|e| anyhow::anyhow!("Invalid mixer program id {}: {e}", self.mixer))?,
            bridge: Pubkey::from_str(&self.bridge)
                .map_err(|e| anyhow::anyhow!("Invalid bridge program id {}: {e}", self.bridge))?,
        })
    }
}

impl Default for Programs {
    fn default() -> Self {
        let programs = msolana::Programs::default();
        Self {
            mixer: programs.mixer.to_string(),
            bridge: programs.bridge.to_string(),
        }
    }
}
