//! RPC configuration

use serde::{Deserialize, Serialize};
use url::Url;

/// RPC configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rpc {
    /// solana RPC address
    pub solana: Url,
}
