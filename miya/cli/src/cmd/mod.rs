//! Command line interface for the miya tooling

use crate::Config;
use anyhow::Result;
use clap::Parser;
use mcore::{FixedBytes, Hash};
use std::{path::PathBuf, sync::OnceLock};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod address;
mod bridge;
mod conf;
mod mixer;

/// Command line interface for the miya protocol
#[derive(Parser)]
pub struct App {
    /// Configuration directory
    #[clap(short, long, default_value = default_config_dir())]
    pub config: PathBuf,

    /// Data directory
    #[clap(long, default_value = default_cache_dir())]
    pub cache: PathBuf,

    #[clap(subcommand)]
    pub command: Command,

    /// Verbosity level
    #[clap(short, long, default_value = "0")]
    pub verbose: u8,
}

impl App {
    /// Run the application
    pub async fn run(&self) -> Result<()> {
        self.init_tracing()?;

        match &self.command {
            Command::Generate => conf::generate(&self.config),
            Command::Address(address) => {
                let config = Config::load(&self.config)?;
                address.run(&config)
            }
            Command::Mixer(mixer) => {
                let config = Config::load(&self.config)?;
                mixer.run(&self.cache, &config).await
            }
            Command::Bridge(bridge) => {
                let config = Config::load(&self.config)?;
                bridge.run(&config).await
            }
        }
    }

    fn init_tracing(&self) -> Result<()> {
        let verbosity = self.verbose;
        let level = match verbosity {
            0 => "info",
            1 => "debug",
            _ => "trace",
        };

        // the verbose flag wins over RUST_LOG
        let filter = if verbosity > 0 {
            EnvFilter::new(level)
        } else if let Ok(env) = std::env::var("RUST_LOG") {
            EnvFilter::new(env)
        } else {
            EnvFilter::new("info")
        };

        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init()?;
        Ok(())
    }
}

/// Command line interface for the miya protocol
#[derive(Parser)]
pub enum Command {
    /// Derive program addresses
    #[clap(subcommand)]
    Address(address::Address),

    /// Mixer commands
    #[clap(subcommand)]
    Mixer(mixer::Mixer),

    /// Bridge commands
    #[clap(subcommand)]
    Bridge(bridge::Bridge),

    /// Generate configuration file
    Generate,
}

/// Decode a hex argument
fn parse_hex(field: &'static str, value: &str) -> Result<Vec<u8>> {
    hex::decode(value.trim_start_matches("0x"))
        .map_err(|e| anyhow::anyhow!("Invalid hex in {field}: {e}"))
}

/// Decode a 32-byte hex argument
fn parse_hash(field: &'static str, value: &str) -> Result<Hash> {
    Ok(parse_hex(field, value)?.bytes32(field)?)
}

fn default_config_dir() -> &'static str {
    static CONFIG_DIR: OnceLock<String> = OnceLock::new();
    CONFIG_DIR.get_or_init(|| {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("miya")
            .to_string_lossy()
            .into_owned()
    })
}

fn default_cache_dir() -> &'static str {
    static CACHE_DIR: OnceLock<String> = OnceLock::new();
    CACHE_DIR.get_or_init(|| {
        dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("miya")
            .to_string_lossy()
            .into_owned()
    })
}

#[test]
fn test_parse_args() {
    let app = App::try_parse_from([
        "miya", "-v", "1", "mixer", "withdraw", "--mint",
        "11111111111111111111111111111111", "--amount", "1000", "--note", "abc",
        "--proof", "0xdead", "--relayer", "11111111111111111111111111111111",
    ]);
    assert!(app.is_err(), "relayer requires a fee");

    let app = App::try_parse_from(["miya", "address", "chain", "--id", "65535"]);
    assert!(app.is_ok());
}

#[test]
fn test_parse_hex() {
    assert_eq!(parse_hex("proof", "0xdead").unwrap(), [0xde, 0xad]);
    assert!(parse_hex("proof", "xyz").is_err());
    assert_eq!(parse_hash("nullifier", &"ab".repeat(32)).unwrap(), [0xab; 32]);

    let err = parse_hash("nullifier", "abab").unwrap_err();
    assert_eq!(
        err.downcast_ref::<mcore::Error>().map(mcore::Error::kind),
        Some(mcore::ErrorKind::Encoding)
    );
}
