//! RPC seam between the pipeline and a Solana cluster
//!
//! `SolanaRpc` is the only way pipeline steps talk to the network, so tests can
//! substitute `StubRpc`. `RpcEndpoint` is the production implementation over the
//! blocking `RpcClient`; every call is moved onto the blocking pool.

use async_trait::async_trait;
use solana_client::{
    client_error::{ClientError, ClientErrorKind},
    rpc_client::RpcClient,
};
use solana_sdk::{
    commitment_config::CommitmentConfig,
    hash::Hash,
    pubkey::Pubkey,
    signature::Signature,
    transaction::Transaction,
};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::SolanaConfig;
use crate::errors::{Result, SubmitterError};

const HTTP_TOO_MANY_REQUESTS: u16 = 429;

/// Where a signature stands relative to the endpoint's commitment level
#[derive(Debug, Clone, PartialEq)]
pub enum SignatureState {
    Pending,
    Confirmed,
    Failed(String),
}

#[async_trait]
pub trait SolanaRpc: Send + Sync {
    fn commitment(&self) -> CommitmentConfig;

    async fn request_airdrop(&self, pubkey: &Pubkey, lamports: u64) -> Result<Signature>;

    async fn signature_status(&self, signature: &Signature) -> Result<SignatureState>;

    async fn get_balance(&self, pubkey: &Pubkey) -> Result<u64>;

    async fn get_latest_blockhash(&self) -> Result<Hash>;

    async fn send_and_confirm_transaction(&self, transaction: &Transaction) -> Result<Signature>;
}

/// Parse a commitment level, falling back to `confirmed` for unknown values
pub fn parse_commitment(commitment: &str) -> CommitmentConfig {
    match commitment {
        "processed" => CommitmentConfig::processed(),
        "confirmed" => CommitmentConfig::confirmed(),
        "finalized" => CommitmentConfig::finalized(),
        other => {
            tracing::warn!(commitment = other, "Unknown commitment level, using confirmed");
            CommitmentConfig::confirmed()
        }
    }
}

/// Production endpoint backed by `solana_client::rpc_client::RpcClient`
pub struct RpcEndpoint {
    client: Arc<RpcClient>,
}

impl RpcEndpoint {
    /// Build a handle for the configured cluster. Performs no network I/O.
    pub fn connect(config: &SolanaConfig) -> Self {
        Self::new(
            config.rpc_url.clone(),
            parse_commitment(&config.commitment),
            config.rpc_timeout(),
        )
    }

    pub fn new(url: String, commitment: CommitmentConfig, timeout: Duration) -> Self {
        let client = RpcClient::new_with_timeout_and_commitment(url.clone(), timeout, commitment);
        tracing::debug!(
            rpc_url = %url,
            commitment = ?commitment.commitment,
            timeout_ms = timeout.as_millis() as u64,
            "RPC endpoint created"
        );
        Self {
            client: Arc::new(client),
        }
    }

    /// Run a blocking client call on the blocking pool
    async fn blocking<T, F>(&self, call: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&RpcClient) -> Result<T> + Send + 'static,
    {
        let client = self.client.clone();
        tokio::task::spawn_blocking(move || call(&client))
            .await
            .map_err(|e| SubmitterError::Internal(format!("RPC task failed: {}", e)))?
    }
}

#[async_trait]
impl SolanaRpc for RpcEndpoint {
    fn commitment(&self) -> CommitmentConfig {
        self.client.commitment()
    }

    async fn request_airdrop(&self, pubkey: &Pubkey, lamports: u64) -> Result<Signature> {
        let pubkey = *pubkey;
        self.blocking(move |client| {
            client
                .request_airdrop(&pubkey, lamports)
                .map_err(classify_airdrop_error)
        })
        .await
    }

    async fn signature_status(&self, signature: &Signature) -> Result<SignatureState> {
        let signature = *signature;
        self.blocking(move |client| {
            let status = client
                .get_signature_status_with_commitment(&signature, client.commitment())
                .map_err(classify_read_error)?;
            Ok(match status {
                None => SignatureState::Pending,
                Some(Ok(())) => SignatureState::Confirmed,
                Some(Err(e)) => SignatureState::Failed(e.to_string()),
            })
        })
        .await
    }

    async fn get_balance(&self, pubkey: &Pubkey) -> Result<u64> {
        let pubkey = *pubkey;
        self.blocking(move |client| client.get_balance(&pubkey).map_err(classify_read_error))
            .await
    }

    async fn get_latest_blockhash(&self) -> Result<Hash> {
        self.blocking(|client| client.get_latest_blockhash().map_err(classify_read_error))
            .await
    }

    async fn send_and_confirm_transaction(&self, transaction: &Transaction) -> Result<Signature> {
        let transaction = transaction.clone();
        self.blocking(move |client| {
            let signature = transaction.signatures.first().copied().unwrap_or_default();
            let started = Instant::now();
            client
                .send_and_confirm_transaction(&transaction)
                .map_err(|e| classify_submission_error(e, &signature, started.elapsed()))
        })
        .await
    }
}

/// Transport-level failure (no response from the cluster), if any
fn transport_failure(error: &ClientError) -> Option<SubmitterError> {
    match error.kind() {
        ClientErrorKind::Io(_) => Some(SubmitterError::NetworkUnreachable(error.to_string())),
        ClientErrorKind::Reqwest(reqwest_err) => match reqwest_err.status() {
            Some(status) if status.as_u16() == HTTP_TOO_MANY_REQUESTS => None,
            Some(status) if status.is_server_error() => {
                Some(SubmitterError::NetworkUnreachable(error.to_string()))
            }
            Some(_) => None,
            None => Some(SubmitterError::NetworkUnreachable(error.to_string())),
        },
        _ => None,
    }
}

fn is_rate_limited(error: &ClientError) -> bool {
    if let ClientErrorKind::Reqwest(reqwest_err) = error.kind() {
        if let Some(status) = reqwest_err.status() {
            return status.as_u16() == HTTP_TOO_MANY_REQUESTS;
        }
    }
    let message = error.to_string().to_lowercase();
    message.contains("429") || message.contains("rate limit") || message.contains("too many requests")
}

pub(crate) fn classify_airdrop_error(error: ClientError) -> SubmitterError {
    if let Some(transport) = transport_failure(&error) {
        return transport;
    }
    if is_rate_limited(&error) {
        SubmitterError::rate_limited(error.to_string())
    } else {
        SubmitterError::rejected(error.to_string())
    }
}

pub(crate) fn classify_submission_error(
    error: ClientError,
    signature: &Signature,
    waited: Duration,
) -> SubmitterError {
    if let Some(transport) = transport_failure(&error) {
        return transport;
    }
    // send_and_confirm gives up once the blockhash expires without the
    // signature landing; surface that as a confirmation timeout.
    let message = error.to_string();
    if message.contains("unable to confirm transaction") {
        return SubmitterError::ConfirmationTimeout {
            signature: signature.to_string(),
            waited,
        };
    }
    SubmitterError::SubmissionRejected(message)
}

fn classify_read_error(error: ClientError) -> SubmitterError {
    transport_failure(&error)
        .unwrap_or_else(|| SubmitterError::NetworkUnreachable(error.to_string()))
}
