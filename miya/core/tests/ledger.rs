//! Tests of the in-memory ledger

use anyhow::Result;
use mcore::{ledger::MemoryLedger, Ledger};
use solana_sdk::{instruction::Instruction, pubkey::Pubkey, signature::{Keypair, Signature}};
use std::sync::Arc;

#[tokio::test]
async fn test_memory_ledger() -> Result<()> {
    let ledger = Arc::new(MemoryLedger::default());
    let address = Pubkey::new_unique();
    assert_eq!(ledger.account(&address).await?, None);

    ledger.set_account(address, vec![1, 2, 3]);
    assert_eq!(ledger.account(&address).await?, Some(vec![1, 2, 3]));

    let payer = Keypair::new();
    let ix = Instruction::new_with_bytes(Pubkey::new_unique(), &[0; 8], vec![]);
    let signature = ledger.submit(&[ix.clone()], &[&payer]).await?;
    assert_eq!(ledger.submitted(), vec![ix.clone()]);
    assert!(ledger.confirmed(&signature).await?);
    assert!(!ledger.confirmed(&Signature::default()).await?);
    assert!(ledger.submit(&[ix.clone()], &[]).await.is_err());

    ledger.reject("blockhash not found");
    let err = ledger.submit(&[ix], &[&payer]).await.unwrap_err();
    assert_eq!(err.to_string(), "blockhash not found");
    Ok(())
}
