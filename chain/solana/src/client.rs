//! Umbrella client of the miya programs

use crate::RpcLedger;
use bridge::BridgeClient;
use mcore::Ledger;
use mixer::MixerClient;
use solana_sdk::pubkey::Pubkey;
use std::sync::Arc;
use url::Url;

/// The program ids of a deployment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Programs {
    /// The mixer program ID
    pub mixer: Pubkey,

    /// The bridge program ID
    pub bridge: Pubkey,
}

impl Default for Programs {
    fn default() -> Self {
        Self {
            mixer: mixer::DEFAULT_PROGRAM_ID,
            bridge: bridge::DEFAULT_PROGRAM_ID,
        }
    }
}

/// Mixer and bridge clients sharing one ledger
pub struct MiyaClient<L = RpcLedger> {
    /// The mixer client
    pub mixer: MixerClient<Arc<L>>,

    /// The bridge client
    pub bridge: BridgeClient<Arc<L>>,

    /// The shared ledger
    ledger: Arc<L>,
}

impl MiyaClient {
    /// Connect both clients to a JSON-RPC endpoint
    pub fn connect(url: &Url, programs: Programs) -> Self {
        tracing::debug!(
            "Connecting to {url} with mixer {} and bridge {}",
            programs.mixer,
            programs.bridge
        );
        Self::new(RpcLedger::new(url), programs)
    }
}

impl<L: Ledger> MiyaClient<L> {
    /// Create both clients on a shared ledger
    pub fn new(ledger: L, programs: Programs) -> Self {
        let ledger = Arc::new(ledger);
        Self {
            mixer: MixerClient::new(programs.mixer, ledger.clone()),
            bridge: BridgeClient::new(programs.bridge, ledger.clone()),
            ledger,
        }
    }

    /// Get the shared ledger
    pub fn ledger(&self) -> &L {
        &self.ledger
    }
}
