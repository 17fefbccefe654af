//! Tests of the bridge client against an in-memory ledger

use anyhow::Result;
use bridge::{
    api::pda, Bridge, BridgeClient, BridgeInstruction, PairKey, SupportedChain, TokenPair,
    DEFAULT_PROGRAM_ID,
};
use mcore::{ledger::MemoryLedger, ErrorKind, VarBytes};
use solana_sdk::{pubkey::Pubkey, signature::Keypair, signer::Signer};
use std::sync::Arc;

fn client() -> (Arc<MemoryLedger>, BridgeClient<Arc<MemoryLedger>>) {
    let ledger = Arc::new(MemoryLedger::default());
    (ledger.clone(), BridgeClient::new(DEFAULT_PROGRAM_ID, ledger))
}

fn pair() -> PairKey {
    PairKey {
        source_chain_id: 2,
        target_chain_id: 1,
        target_token_mint: Pubkey::new_from_array([5; 32]),
    }
}

fn kind(err: &anyhow::Error) -> Option<ErrorKind> {
    err.downcast_ref::<mcore::Error>().map(mcore::Error::kind)
}

#[test]
fn test_register_token_pair_fee_boundary() -> Result<()> {
    let (_, client) = client();
    let authority = Pubkey::new_unique();

    let ix = client.register_token_pair(authority, pair(), vec![0xaa; 20], 10_000)?;
    assert_eq!(
        BridgeInstruction::decode(&ix.data)?,
        BridgeInstruction::RegisterTokenPair {
            source_chain_id: 2,
            target_chain_id: 1,
            source_token_address: VarBytes::new(vec![0xaa; 20]),
            fee_bps: 10_000,
        }
    );
    assert_eq!(ix.accounts[1].pubkey, client.token_pair_address(&pair())?);
    assert_eq!(ix.accounts[4].pubkey, pair().target_token_mint);

    let err = client
        .register_token_pair(authority, pair(), vec![0xaa; 20], 10_001)
        .unwrap_err();
    assert_eq!(kind(&err), Some(ErrorKind::Encoding));

    let err = client
        .register_token_pair(authority, pair(), vec![0xaa; 20], 65_536)
        .unwrap_err();
    assert_eq!(kind(&err), Some(ErrorKind::Encoding));
    Ok(())
}

#[test]
fn test_lock_tokens_commitment() -> Result<()> {
    let (_, client) = client();
    let signer = Pubkey::new_unique();
    let (commitment, ix) = client.lock_tokens(signer, pair(), 500, vec![0xbb; 20])?;

    assert_eq!(
        BridgeInstruction::decode(&ix.data)?,
        BridgeInstruction::LockTokens {
            amount: 500,
            target_chain_id: 1,
            recipient_address: VarBytes::new(vec![0xbb; 20]),
            commitment,
        }
    );
    assert_eq!(ix.accounts[0].pubkey, client.bridge_address()?);
    assert!(ix.accounts[2].is_signer);

    let (other, _) = client.lock_tokens(signer, pair(), 500, vec![0xbb; 20])?;
    assert_ne!(commitment, other);

    let err = client.lock_tokens(signer, pair(), 0, vec![0xbb; 20]).unwrap_err();
    assert_eq!(kind(&err), Some(ErrorKind::Encoding));
    Ok(())
}

#[test]
fn test_release_tokens_accounts() -> Result<()> {
    let (_, client) = client();
    let recipient = Pubkey::new_unique();
    let fee_account = Pubkey::new_unique();
    let mint = pair().target_token_mint;
    let ix = client.release_tokens(recipient, pair(), fee_account, 900, vec![0xdd; 64], [8; 32])?;

    assert_eq!(
        BridgeInstruction::decode(&ix.data)?,
        BridgeInstruction::ReleaseTokens {
            amount: 900,
            source_chain_id: 2,
            proof: VarBytes::new(vec![0xdd; 64]),
            nullifier: [8; 32],
        }
    );

    let bridge = client.bridge_address()?;
    let expected = [
        (bridge, false, true),
        (client.token_pair_address(&pair())?, false, true),
        (recipient, true, true),
        (pda::token_account(&recipient, &mint), false, true),
        (pda::token_account(&bridge, &mint), false, true),
        (fee_account, false, true),
        (pda::TOKEN_PROGRAM, false, false),
    ];
    let accounts = ix
        .accounts
        .iter()
        .map(|meta| (meta.pubkey, meta.is_signer, meta.is_writable))
        .collect::<Vec<_>>();
    assert_eq!(accounts, expected);

    let err = client
        .release_tokens(recipient, pair(), fee_account, 0, vec![0xdd; 64], [8; 32])
        .unwrap_err();
    assert_eq!(kind(&err), Some(ErrorKind::Encoding));
    Ok(())
}

#[test]
fn test_chain_management() -> Result<()> {
    let (_, client) = client();
    let authority = Pubkey::new_unique();

    for chain_id in [0, u16::MAX] {
        let ix = client.add_supported_chain(authority, chain_id, "chain", Pubkey::new_unique())?;
        assert_eq!(ix.accounts[1].pubkey, client.chain_address(chain_id)?);
        assert!(ix.accounts[0].is_writable);
    }

    let ix = client.update_chain_status(authority, 7, false)?;
    assert_eq!(ix.data, [2, 0, 0, 0, 0, 0, 0, 0, 7, 0, 0]);

    assert!(client
        .add_supported_chain(authority, 1, &"x".repeat(33), Pubkey::new_unique())
        .is_err());
    Ok(())
}

#[tokio::test]
async fn test_queries() -> Result<()> {
    let (ledger, client) = client();
    assert_eq!(client.bridge_info().await?, None);
    assert_eq!(client.chain_info(2).await?, None);
    assert_eq!(client.token_pair_info(&pair()).await?, None);

    let bridge = Bridge {
        authority: Pubkey::new_unique(),
        is_active: true,
        supported_chain_count: 2,
        total_locked_tokens: 0,
        total_released_tokens: 0,
        bump: 250,
    };
    ledger.set_account(client.bridge_address()?, bridge.encode());
    assert_eq!(client.bridge_info().await?, Some(bridge));

    let chain = SupportedChain {
        chain_id: 2,
        chain_name: "ethereum".into(),
        adapter_program: Pubkey::new_unique(),
        is_active: true,
        total_volume: 0,
    };
    let mut data = chain.encode()?;
    data.resize(8 + SupportedChain::LEN, 0);
    ledger.set_account(client.chain_address(2)?, data);
    assert_eq!(client.chain_info(2).await?, Some(chain));

    let token_pair = TokenPair {
        source_chain_id: 2,
        target_chain_id: 1,
        source_token_address: VarBytes::new(vec![0xaa; 20]),
        target_token_mint: pair().target_token_mint,
        fee_bps: 30,
        is_active: true,
        total_locked: 0,
        total_released: 0,
        bump: 255,
    };
    ledger.set_account(client.token_pair_address(&pair())?, token_pair.encode()?);
    assert_eq!(client.token_pair_info(&pair()).await?, Some(token_pair));

    ledger.set_account(client.chain_address(3)?, vec![1; 10]);
    let err = client.chain_info(3).await.unwrap_err();
    assert_eq!(kind(&err), Some(ErrorKind::MalformedAccount));
    Ok(())
}

#[tokio::test]
async fn test_send_lock_tokens() -> Result<()> {
    let (ledger, client) = client();
    let signer = Keypair::new();

    client.send(client.initialize_bridge(signer.pubkey())?, &signer).await?;
    let (commitment, _) = client
        .send_lock_tokens(&signer, pair(), 1_000, vec![0xcc; 32])
        .await?;

    let submitted = ledger.submitted();
    assert_eq!(submitted.len(), 2);
    assert_eq!(submitted[0].data[0], 0);
    assert_eq!(submitted[1].data[submitted[1].data.len() - 32..], commitment);

    ledger.reject("bridge inactive");
    assert!(client
        .send(client.pause_bridge(signer.pubkey())?, &signer)
        .await
        .is_err());
    Ok(())
}
