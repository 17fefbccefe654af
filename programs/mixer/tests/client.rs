//! Tests of the mixer client against an in-memory ledger

use anyhow::Result;
use mcore::{ledger::MemoryLedger, ErrorKind, Ledger};
use mcrypto::{note, NoteState};
use mixer::{MixerClient, MixerInstruction, Pool, Relay, DEFAULT_PROGRAM_ID};
use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    signer::Signer,
};
use std::{str::FromStr, sync::Arc};

const AMOUNT: u64 = 1_000_000_000;

fn client() -> (Arc<MemoryLedger>, MixerClient<Arc<MemoryLedger>>) {
    let ledger = Arc::new(MemoryLedger::default());
    (ledger.clone(), MixerClient::new(DEFAULT_PROGRAM_ID, ledger))
}

#[test]
fn test_pool_address_golden() -> Result<()> {
    let (_, client) = client();
    assert_eq!(
        client.pool_address(&Pubkey::default(), AMOUNT)?,
        Pubkey::from_str("ARdzDGNB4k6dyTsPmc7S2MXKQyEmJJuqSu2doxEFqGrG")?
    );
    Ok(())
}

#[test]
fn test_deposit_carries_note() -> Result<()> {
    let (_, client) = client();
    let depositor = Pubkey::new_unique();
    let mint = Pubkey::new_unique();
    let (note, ix) = client.deposit(depositor, mint, AMOUNT)?;

    assert_eq!(note.state, NoteState::Unused);
    assert_eq!(
        note.nullifier_hash,
        note::generate_nullifier_hash(&note.commitment, &note.secret)
    );
    assert_eq!(
        MixerInstruction::decode(&ix.data)?,
        MixerInstruction::Deposit {
            commitment: note.commitment,
            nullifier_hash: note.nullifier_hash,
        }
    );
    assert!(!ix.data.windows(32).any(|w| w == note.secret));

    assert_eq!(ix.program_id, DEFAULT_PROGRAM_ID);
    assert_eq!(ix.accounts[0].pubkey, client.pool_address(&mint, AMOUNT)?);
    assert!(ix.accounts[1].is_signer);
    assert_eq!(ix.accounts[1].pubkey, depositor);
    Ok(())
}

#[test]
fn test_withdraw_relayer_account() -> Result<()> {
    let (_, client) = client();
    let mint = Pubkey::new_unique();
    let recipient = Pubkey::new_unique();

    let ix = client.withdraw(mint, AMOUNT, vec![1; 64], [2; 32], recipient, None)?;
    assert_eq!(ix.accounts.len(), 5);
    assert_eq!(ix.accounts[3].pubkey, DEFAULT_PROGRAM_ID);
    assert!(!ix.accounts[3].is_writable);

    let relay = Relay {
        relayer: Pubkey::new_unique(),
        fee: 10,
    };
    let ix = client.withdraw(mint, AMOUNT, vec![1; 64], [2; 32], recipient, Some(relay))?;
    assert!(ix.accounts[3].is_writable);
    assert_ne!(ix.accounts[3].pubkey, DEFAULT_PROGRAM_ID);
    Ok(())
}

#[test]
fn test_encoding_errors_are_typed() {
    let (_, client) = client();
    let err = client
        .withdraw(Pubkey::default(), AMOUNT, vec![], [0; 32], Pubkey::default(), None)
        .unwrap_err();
    let err = err.downcast_ref::<mcore::Error>().map(mcore::Error::kind);
    assert_eq!(err, Some(ErrorKind::Encoding));
}

#[tokio::test]
async fn test_pool_info() -> Result<()> {
    let (ledger, client) = client();
    let mint = Pubkey::new_unique();
    assert_eq!(client.pool_info(&mint, AMOUNT).await?, None);

    let pool = Pool {
        authority: Pubkey::new_unique(),
        token_mint: mint,
        deposit_amount: AMOUNT,
        total_deposits: 3,
        is_active: true,
        bump: 254,
    };
    let address = client.pool_address(&mint, AMOUNT)?;
    ledger.set_account(address, pool.encode());
    assert_eq!(client.pool_info(&mint, AMOUNT).await?, Some(pool));

    ledger.set_account(address, vec![0; 10]);
    let err = client.pool_info(&mint, AMOUNT).await.unwrap_err();
    assert_eq!(
        err.downcast_ref::<mcore::Error>().map(mcore::Error::kind),
        Some(ErrorKind::MalformedAccount)
    );
    Ok(())
}

#[tokio::test]
async fn test_send_deposit_marks_note() -> Result<()> {
    let (ledger, client) = client();
    let depositor = Keypair::new();
    let (note, _) = client
        .send_deposit(&depositor, Pubkey::new_unique(), AMOUNT)
        .await?;
    assert_eq!(note.state, NoteState::Deposited);
    assert_eq!(ledger.submitted().len(), 1);

    ledger.reject("insufficient funds");
    assert!(client
        .send_deposit(&depositor, Pubkey::new_unique(), AMOUNT)
        .await
        .is_err());
    Ok(())
}

#[tokio::test]
async fn test_confirm_deposit_after_lost_confirmation() -> Result<()> {
    let (ledger, client) = client();
    let depositor = Keypair::new();
    let (mut note, ix) = client.deposit(depositor.pubkey(), Pubkey::new_unique(), AMOUNT)?;

    // the transaction lands, the caller never saw the confirmation
    let signature = ledger.submit(&[ix], &[&depositor]).await?;
    assert_eq!(note.state, NoteState::Unused);

    assert!(!client.confirm_deposit(&mut note, &Signature::default()).await?);
    assert_eq!(note.state, NoteState::Unused);

    assert!(client.confirm_deposit(&mut note, &signature).await?);
    assert_eq!(note.state, NoteState::Deposited);
    note.mark_withdrawn()?;

    let err = client.confirm_deposit(&mut note, &signature).await.unwrap_err();
    assert_eq!(
        err.downcast_ref::<mcore::Error>().map(mcore::Error::kind),
        Some(ErrorKind::InvalidTransition)
    );
    Ok(())
}

#[tokio::test]
async fn test_send_withdraw_reports_outcome() -> Result<()> {
    let (ledger, client) = client();
    let payer = Keypair::new();
    let mint = Pubkey::new_unique();

    let result = client
        .send_withdraw(&payer, mint, AMOUNT, vec![1; 32], [3; 32], payer.pubkey(), None)
        .await?;
    assert!(result.success);
    assert!(result.signature.is_some());

    ledger.reject("nullifier already used");
    let result = client
        .send_withdraw(&payer, mint, AMOUNT, vec![1; 32], [3; 32], payer.pubkey(), None)
        .await?;
    assert!(!result.success);
    assert_eq!(result.error.as_deref(), Some("nullifier already used"));

    assert!(client
        .send_withdraw(&payer, mint, AMOUNT, vec![], [3; 32], payer.pubkey(), None)
        .await
        .is_err());
    Ok(())
}

#[tokio::test]
async fn test_pause_and_resume() -> Result<()> {
    let (ledger, client) = client();
    let authority = Keypair::new();
    let mint = Pubkey::new_unique();

    client.send_initialize_pool(&authority, mint, AMOUNT).await?;
    client.send_pause_pool(&authority, mint, AMOUNT).await?;
    client.send_resume_pool(&authority, mint, AMOUNT).await?;

    let discriminants = ledger
        .submitted()
        .iter()
        .map(|ix| ix.data[0])
        .collect::<Vec<_>>();
    assert_eq!(discriminants, [0, 3, 4]);
    Ok(())
}
