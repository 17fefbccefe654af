//! Configuration for the miya tooling

use anyhow::Result;
use serde::{Deserialize, Serialize};
use solana_sdk::{signature::Keypair, signer::Signer};
use std::{fs, path::Path};
pub use {key::Key, programs::Programs, rpc::Rpc};

mod key;
mod programs;
mod rpc;

/// The name of the configuration file
pub const CONFIG_FILE: &str = "config.toml";

const NOTE: &str = r#"
# Miya Configurations
#
# The [key] section holds the solana keypair paying for every transaction,
# keep this file private.
"#;

/// Configuration for the miya tooling
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// RPC configurations
    pub rpc: Rpc,

    /// Key configurations
    pub key: Key,

    /// Program configurations
    #[serde(default)]
    pub programs: Programs,
}

impl Config {
    /// Load the configuration from the config directory
    pub fn load(dir: &Path) -> Result<Self> {
        let target = dir.join(CONFIG_FILE);
        anyhow::ensure!(
            target.exists(),
            "Configuration file {} not found, run `miya generate` first",
            target.display()
        );

        let file = fs::read_to_string(&target)?;
        Ok(toml::from_str(&file)?)
    }

    /// Write a default configuration file, refusing to overwrite
    pub fn generate(dir: &Path) -> Result<Self> {
        let target = dir.join(CONFIG_FILE);
        if target.exists() {
            return Err(anyhow::anyhow!("Configuration file already exists"));
        }

        let config = Config {
            rpc: Rpc {
                solana: "https://api.devnet.solana.com".parse()?,
            },
            key: Key {
                solana: Keypair::new().to_base58_string(),
            },
            programs: Programs::default(),
        };

        fs::create_dir_all(dir)?;
        fs::write(
            &target,
            format!("{}\n{}", NOTE, toml::to_string_pretty(&config)?),
        )?;
        Ok(config)
    }

    /// Decode the solana keypair
    pub fn keypair(&self) -> Result<Keypair> {
        let bytes = bs58::decode(self.key.solana.trim()).into_vec()?;
        let keypair = Keypair::from_bytes(&bytes)
            .map_err(|e| anyhow::anyhow!("Invalid solana keypair: {e}"))?;
        tracing::debug!("Loaded keypair {}", keypair.pubkey());
        Ok(keypair)
    }

    /// Connect the protocol clients
    pub fn client(&self) -> Result<msolana::MiyaClient> {
        Ok(msolana::MiyaClient::connect(
            &self.rpc.solana,
            self.programs.parse()?,
        ))
    }
}

#[cfg(test)]
use std::path::PathBuf;

#[cfg(test)]
fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("miya-config-{name}-{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    dir
}

#[test]
fn test_generate_and_load() -> Result<()> {
    let dir = temp_dir("generate");
    assert!(Config::load(&dir).is_err());

    let config = Config::generate(&dir)?;
    assert_eq!(Config::load(&dir)?, config);
    assert_eq!(config.programs.parse()?, msolana::Programs::default());
    assert!(config.keypair().is_ok());

    assert!(Config::generate(&dir).is_err());
    fs::remove_dir_all(&dir)?;
    Ok(())
}

#[test]
fn test_programs_default_and_invalid() -> Result<()> {
    let config: Config = toml::from_str(
        r#"
        [rpc]
        solana = "http://127.0.0.1:8899"

        [key]
        solana = "not a key"
        "#,
    )?;
    assert_eq!(config.programs, Programs::default());
    assert!(config.keypair().is_err());

    let programs = Programs {
        mixer: "MiyaMixer".into(),
        bridge: Programs::default().bridge,
    };
    assert!(programs.parse().is_err());
    Ok(())
}
