//! Key configuration

use serde::{Deserialize, Serialize};

/// Key configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Key {
    /// solana keypair in base58
    pub solana: String,
}
