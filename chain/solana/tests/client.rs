//! Tests of the umbrella client

use mcore::ledger::MemoryLedger;
use msolana::{MiyaClient, Programs};
use solana_sdk::{pubkey::Pubkey, signature::Keypair, signer::Signer};

#[tokio::test]
async fn test_clients_share_ledger() -> anyhow::Result<()> {
    let client = MiyaClient::new(MemoryLedger::default(), Programs::default());
    assert_eq!(client.mixer.program_id(), &mixer::DEFAULT_PROGRAM_ID);
    assert_eq!(client.bridge.program_id(), &bridge::DEFAULT_PROGRAM_ID);

    let payer = Keypair::new();
    client
        .mixer
        .send_initialize_pool(&payer, Pubkey::new_unique(), 100)
        .await?;
    client
        .bridge
        .send(client.bridge.initialize_bridge(payer.pubkey())?, &payer)
        .await?;

    let programs = client
        .ledger()
        .submitted()
        .iter()
        .map(|ix| ix.program_id)
        .collect::<Vec<_>>();
    assert_eq!(
        programs,
        [mixer::DEFAULT_PROGRAM_ID, bridge::DEFAULT_PROGRAM_ID]
    );
    Ok(())
}
