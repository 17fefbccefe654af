//! JSON-RPC ledger collaborator

use anyhow::Result;
use async_trait::async_trait;
use mcore::Ledger;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{
    commitment_config::CommitmentConfig,
    instruction::Instruction,
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    signer::Signer,
    transaction::Transaction,
};
use url::Url;

/// Ledger collaborator backed by a Solana JSON-RPC endpoint
pub struct RpcLedger {
    /// The rpc client
    rpc: RpcClient,
}

impl RpcLedger {
    /// Connect to the endpoint with confirmed commitment
    pub fn new(url: &Url) -> Self {
        Self::new_with_commitment(url, CommitmentConfig::confirmed())
    }

    /// Connect to the endpoint with a custom commitment level
    pub fn new_with_commitment(url: &Url, commitment: CommitmentConfig) -> Self {
        Self {
            rpc: RpcClient::new_with_commitment(url.to_string(), commitment),
        }
    }
}

#[async_trait]
impl Ledger for RpcLedger {
    async fn account(&self, address: &Pubkey) -> Result<Option<Vec<u8>>> {
        let response = self
            .rpc
            .get_account_with_commitment(address, self.rpc.commitment())
            .await?;
        Ok(response.value.map(|account| account.data))
    }

    async fn submit(
        &self,
        instructions: &[Instruction],
        signers: &[&Keypair],
    ) -> Result<Signature> {
        let Some(payer) = signers.first() else {
            anyhow::bail!("No signers provided");
        };

        let blockhash = self.rpc.get_latest_blockhash().await?;
        let tx = Transaction::new_signed_with_payer(
            instructions,
            Some(&payer.pubkey()),
            signers,
            blockhash,
        );

        tracing::debug!(
            "Sending {} instructions paid by {}",
            instructions.len(),
            payer.pubkey()
        );
        // the signature is known before sending, keep it for a later confirm
        let signature = tx.signatures.first().copied().unwrap_or_default();
        self.rpc
            .send_and_confirm_transaction(&tx)
            .await
            .map_err(|e| anyhow::anyhow!("Transaction {signature} not confirmed: {e}"))
    }

    async fn confirmed(&self, signature: &Signature) -> Result<bool> {
        self.rpc
            .confirm_transaction(signature)
            .await
            .map_err(Into::into)
    }
}
