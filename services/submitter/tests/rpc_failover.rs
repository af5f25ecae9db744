/// Retry and resilience behaviour of a full run against a flaky endpoint
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::signature::{Keypair, Signer};
use std::sync::Arc;
use submitter::solana_client_stub::{StubRpc, FINALIZATION_POLLS};
use submitter::{Config, Pipeline, SubmitterError};

fn config_for(sender: &Keypair, max_retries: u32) -> Config {
    let json = serde_json::to_string(&sender.to_bytes().to_vec()).unwrap();
    let max_retries = max_retries.to_string();
    Config::from_lookup(move |key| match key {
        "SUBMITTER_KEYPAIR_JSON" => Some(json.clone()),
        "SUBMITTER_MAX_RETRIES" => Some(max_retries.clone()),
        "CONFIRMATION_TIMEOUT_SECONDS" => Some("5".to_string()),
        "CONFIRMATION_POLL_INTERVAL_MS" => Some("1".to_string()),
        "RETRY_INITIAL_INTERVAL_MS" => Some("1".to_string()),
        "RETRY_MAX_INTERVAL_MS" => Some("4".to_string()),
        _ => None,
    })
    .unwrap()
}

#[tokio::test]
async fn test_transient_airdrop_failures_are_retried() {
    let sender = Keypair::new();
    // First two calls (both airdrop attempts) fail in transport
    let rpc = Arc::new(StubRpc::new().fail_next_calls(2));
    let pipeline = Pipeline::new(config_for(&sender, 3), rpc.clone());

    let report = pipeline.run().await.unwrap();

    assert_eq!(rpc.airdrop_calls(), 3);
    assert_eq!(rpc.send_calls(), 1);
    assert_eq!(report.sender, sender.pubkey().to_string());
}

#[tokio::test]
async fn test_retry_budget_is_bounded() {
    let sender = Keypair::new();
    let rpc = Arc::new(StubRpc::new().rate_limit_next_airdrops(10));
    let pipeline = Pipeline::new(config_for(&sender, 4), rpc.clone());

    let result = pipeline.run().await;

    assert!(matches!(
        result,
        Err(SubmitterError::RequestRejected { rate_limited: true, .. })
    ));
    assert_eq!(rpc.airdrop_calls(), 4);
    assert_eq!(rpc.send_calls(), 0);
}

#[tokio::test]
async fn test_unreachable_endpoint_fails_without_retries() {
    let sender = Keypair::new();
    let rpc = Arc::new(StubRpc::new().fail_next_calls(usize::MAX));
    let pipeline = Pipeline::new(config_for(&sender, 1), rpc.clone());

    let result = pipeline.run().await;

    assert!(matches!(result, Err(SubmitterError::NetworkUnreachable(_))));
    assert_eq!(rpc.airdrop_calls(), 1);
}

async fn status_polls_at(commitment: CommitmentConfig) -> usize {
    let sender = Keypair::new();
    let rpc = Arc::new(StubRpc::new().with_commitment(commitment).confirm_after_polls(5));
    let pipeline = Pipeline::new(config_for(&sender, 1), rpc.clone());

    pipeline.run().await.unwrap();
    rpc.status_calls()
}

#[tokio::test]
async fn test_finalized_commitment_waits_longer_than_confirmed() {
    let confirmed = status_polls_at(CommitmentConfig::confirmed()).await;
    let finalized = status_polls_at(CommitmentConfig::finalized()).await;

    assert_eq!(confirmed, 6);
    assert_eq!(finalized, confirmed + FINALIZATION_POLLS as usize);
}
