//! Configuration command for the miya tooling

use crate::{config::CONFIG_FILE, Config};
use anyhow::Result;
use solana_sdk::signer::Signer;
use std::path::Path;

/// Generate configuration file
pub fn generate(config: &Path) -> Result<()> {
    let generated = Config::generate(config)?;
    println!(
        "Configuration file generated successfully in {}",
        config.join(CONFIG_FILE).display()
    );
    println!("Payer: {}", generated.keypair()?.pubkey());
    Ok(())
}
