//! Linear run: LoadKey -> Fund -> Submit -> Report
//!
//! Each step returns the typed value the next one consumes and aborts the run
//! on failure. Nothing is compensated: if funding lands and submission fails,
//! the airdropped lamports stay with the sender.

use chrono::Utc;
use shared::{Cluster, RunReport};
use solana_sdk::signature::{Keypair, Signer};
use std::sync::Arc;
use tracing::{info, Instrument};
use uuid::Uuid;

use crate::config::Config;
use crate::errors::Result;
use crate::funding::{FundingReceipt, FundingRequester};
use crate::keypair::load_keypair;
use crate::retry_strategy::RetryStrategy;
use crate::solana_client::SolanaRpc;
use crate::solana_tx::{SubmissionReceipt, TransactionSubmitter};

pub struct Pipeline<R: SolanaRpc> {
    config: Config,
    funding: FundingRequester<R>,
    submitter: TransactionSubmitter<R>,
    retry: RetryStrategy,
}

impl<R: SolanaRpc> Pipeline<R> {
    pub fn new(config: Config, rpc: Arc<R>) -> Self {
        let funding = FundingRequester::new(
            rpc.clone(),
            config.submitter.confirmation_timeout(),
            config.submitter.confirmation_poll_interval(),
        );
        let submitter = TransactionSubmitter::new(rpc, config.submitter.target_program_id);
        let retry = RetryStrategy::from_config(&config.retry);

        Self {
            config,
            funding,
            submitter,
            retry,
        }
    }

    pub fn with_retry_strategy(mut self, retry: RetryStrategy) -> Self {
        self.retry = retry;
        self
    }

    pub fn cluster(&self) -> &Cluster {
        &self.config.solana.cluster
    }

    pub fn load_identity(&self) -> Result<Keypair> {
        let identity = load_keypair(&self.config.submitter.keypair)?;
        info!(pubkey = %identity.pubkey(), "Sender keypair loaded");
        Ok(identity)
    }

    /// Airdrop the configured amount; only the request itself is retried
    pub async fn fund(&self, identity: &Keypair) -> Result<FundingReceipt> {
        let pubkey = identity.pubkey();
        let lamports = self.config.submitter.airdrop_lamports.as_u64();

        let signature = self
            .retry
            .retry("request_airdrop", || self.funding.request(&pubkey, lamports))
            .await?;
        self.funding.confirm(&pubkey, lamports, signature).await
    }

    pub async fn submit(&self, identity: &Keypair) -> Result<SubmissionReceipt> {
        self.submitter.submit(identity, &self.retry).await
    }

    pub fn report(
        &self,
        run_id: Uuid,
        identity: &Keypair,
        funding: FundingReceipt,
        submission: SubmissionReceipt,
    ) -> RunReport {
        let transaction_signature = submission.signature.to_string();
        RunReport {
            run_id,
            cluster: self.cluster().clone(),
            sender: identity.pubkey().to_string(),
            airdrop_signature: funding.signature.to_string(),
            airdrop_lamports: funding.lamports,
            sender_balance_after_airdrop: funding.balance_after,
            explorer_url: self.cluster().explorer_tx_url(&transaction_signature),
            transaction_signature,
            recipient: submission.recipient.to_string(),
            completed_at: Utc::now(),
        }
    }

    pub async fn run(&self) -> Result<RunReport> {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("run", %run_id, cluster = %self.cluster());
        self.run_steps(run_id).instrument(span).await
    }

    async fn run_steps(&self, run_id: Uuid) -> Result<RunReport> {
        let identity = self.load_identity()?;

        let funding = self.fund(&identity).await?;
        info!(
            pubkey = %funding.pubkey,
            signature = %funding.signature,
            lamports = funding.lamports,
            "Airdrop complete"
        );

        let submission = self.submit(&identity).await?;
        info!(
            signature = %submission.signature,
            recipient = %submission.recipient,
            "Transaction complete"
        );

        Ok(self.report(run_id, &identity, funding, submission))
    }
}
