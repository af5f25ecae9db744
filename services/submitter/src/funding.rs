//! Faucet funding: request an airdrop and wait for it to reach the endpoint's commitment

use solana_sdk::{pubkey::Pubkey, signature::Signature};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::errors::{Result, SubmitterError};
use crate::solana_client::{SignatureState, SolanaRpc};

#[derive(Debug, Clone, PartialEq)]
pub struct FundingReceipt {
    pub signature: Signature,
    pub pubkey: Pubkey,
    pub lamports: u64,
    pub balance_after: u64,
}

pub struct FundingRequester<R: SolanaRpc> {
    rpc: Arc<R>,
    confirmation_timeout: Duration,
    poll_interval: Duration,
}

impl<R: SolanaRpc> FundingRequester<R> {
    pub fn new(rpc: Arc<R>, confirmation_timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            rpc,
            confirmation_timeout,
            poll_interval,
        }
    }

    /// Ask the faucet for `lamports`. Single attempt; retrying is the caller's decision.
    pub async fn request(&self, pubkey: &Pubkey, lamports: u64) -> Result<Signature> {
        let signature = self.rpc.request_airdrop(pubkey, lamports).await?;
        debug!(%pubkey, lamports, %signature, "Airdrop requested");
        Ok(signature)
    }

    /// Poll until `signature` reaches the endpoint's commitment level
    pub async fn wait_for_confirmation(&self, signature: &Signature) -> Result<()> {
        let started = Instant::now();
        loop {
            match self.rpc.signature_status(signature).await? {
                SignatureState::Confirmed => {
                    debug!(
                        %signature,
                        commitment = ?self.rpc.commitment().commitment,
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "Airdrop confirmed"
                    );
                    return Ok(());
                }
                SignatureState::Failed(reason) => {
                    return Err(SubmitterError::rejected(format!(
                        "airdrop transaction {} failed: {}",
                        signature, reason
                    )));
                }
                SignatureState::Pending => {}
            }

            let waited = started.elapsed();
            if waited >= self.confirmation_timeout {
                warn!(
                    %signature,
                    commitment = ?self.rpc.commitment().commitment,
                    waited_ms = waited.as_millis() as u64,
                    "Airdrop not confirmed before timeout"
                );
                return Err(SubmitterError::ConfirmationTimeout {
                    signature: signature.to_string(),
                    waited,
                });
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    /// Request, confirm, then read back the balance
    pub async fn fund(&self, pubkey: &Pubkey, lamports: u64) -> Result<FundingReceipt> {
        let signature = self.request(pubkey, lamports).await?;
        self.confirm(pubkey, lamports, signature).await
    }

    pub(crate) async fn confirm(
        &self,
        pubkey: &Pubkey,
        lamports: u64,
        signature: Signature,
    ) -> Result<FundingReceipt> {
        self.wait_for_confirmation(&signature).await?;
        let balance_after = self.rpc.get_balance(pubkey).await?;
        info!(%pubkey, lamports, balance_after, "Faucet credit confirmed");

        Ok(FundingReceipt {
            signature,
            pubkey: *pubkey,
            lamports,
            balance_after,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solana_client_stub::StubRpc;
    use shared::LAMPORTS_PER_SOL;

    fn requester(stub: StubRpc, timeout_ms: u64) -> (Arc<StubRpc>, FundingRequester<StubRpc>) {
        let rpc = Arc::new(stub);
        let requester = FundingRequester::new(
            rpc.clone(),
            Duration::from_millis(timeout_ms),
            Duration::from_millis(1),
        );
        (rpc, requester)
    }

    #[tokio::test]
    async fn test_fund_increases_balance_by_requested_amount() {
        let (rpc, requester) = requester(StubRpc::new().confirm_after_polls(3), 1_000);
        let pubkey = Pubkey::new_unique();
        rpc.set_balance(&pubkey, 42);

        let receipt = requester.fund(&pubkey, LAMPORTS_PER_SOL).await.unwrap();

        assert_eq!(receipt.lamports, LAMPORTS_PER_SOL);
        assert_eq!(receipt.balance_after, 42 + LAMPORTS_PER_SOL);
        assert_eq!(rpc.balance(&pubkey), 42 + LAMPORTS_PER_SOL);
        assert_eq!(rpc.status_calls(), 4);
    }

    #[tokio::test]
    async fn test_finalized_funding_polls_past_confirmation() {
        let stub = StubRpc::new()
            .with_commitment(solana_sdk::commitment_config::CommitmentConfig::finalized())
            .confirm_after_polls(1);
        let (rpc, requester) = requester(stub, 1_000);
        let pubkey = Pubkey::new_unique();

        let receipt = requester.fund(&pubkey, LAMPORTS_PER_SOL).await.unwrap();

        assert_eq!(receipt.balance_after, LAMPORTS_PER_SOL);
        let expected = 1 + crate::solana_client_stub::FINALIZATION_POLLS as usize + 1;
        assert_eq!(rpc.status_calls(), expected);
    }

    #[tokio::test]
    async fn test_request_does_not_retry_rate_limit() {
        let (rpc, requester) = requester(StubRpc::new().rate_limit_next_airdrops(1), 1_000);

        let result = requester.request(&Pubkey::new_unique(), LAMPORTS_PER_SOL).await;

        assert!(matches!(
            result,
            Err(SubmitterError::RequestRejected { rate_limited: true, .. })
        ));
        assert_eq!(rpc.airdrop_calls(), 1);
    }

    #[tokio::test]
    async fn test_confirmation_timeout() {
        let (_rpc, requester) = requester(StubRpc::new().never_confirm(), 20);
        let pubkey = Pubkey::new_unique();

        let result = requester.fund(&pubkey, LAMPORTS_PER_SOL).await;

        match result {
            Err(SubmitterError::ConfirmationTimeout { waited, .. }) => {
                assert!(waited >= Duration::from_millis(20));
            }
            other => panic!("expected confirmation timeout, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_failed_airdrop_is_rejection() {
        let (rpc, requester) = requester(StubRpc::new().fail_airdrops_with("faucet empty"), 1_000);
        let pubkey = Pubkey::new_unique();

        let result = requester.fund(&pubkey, LAMPORTS_PER_SOL).await;

        assert!(matches!(
            result,
            Err(SubmitterError::RequestRejected { rate_limited: false, .. })
        ));
        assert_eq!(rpc.balance(&pubkey), 0);
    }
}
