// In-memory Solana endpoint for exercising the pipeline without a cluster
use async_trait::async_trait;
use shared::LAMPORTS_PER_SIGNATURE;
use solana_sdk::{
    commitment_config::CommitmentConfig,
    hash::Hash,
    pubkey::Pubkey,
    signature::Signature,
    transaction::Transaction,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use crate::errors::{Result, SubmitterError};
use crate::solana_client::{SignatureState, SolanaRpc};

/// Extra pending polls before a confirmed signature counts as finalized
pub const FINALIZATION_POLLS: u32 = 2;

#[derive(Default)]
struct PendingSignature {
    polls_remaining: u32,
    credit: Option<(Pubkey, u64)>,
    failure: Option<String>,
}

#[derive(Default)]
struct StubState {
    balances: HashMap<Pubkey, u64>,
    signatures: HashMap<Signature, PendingSignature>,
    submitted: Vec<Transaction>,
    unreachable_calls: usize,
    rate_limited_airdrops: usize,
    confirm_after_polls: u32,
    never_confirm: bool,
    airdrop_failure: Option<String>,
    submission_failure: Option<String>,
}

/// Test double for `SolanaRpc`
///
/// Balances only move when a signature is observed as confirmed, so callers
/// that skip the confirmation wait see the pre-airdrop balance.
pub struct StubRpc {
    commitment: CommitmentConfig,
    blockhash: Hash,
    state: Mutex<StubState>,
    airdrop_calls: AtomicUsize,
    status_calls: AtomicUsize,
    balance_calls: AtomicUsize,
    blockhash_calls: AtomicUsize,
    send_calls: AtomicUsize,
}

impl Default for StubRpc {
    fn default() -> Self {
        Self::new()
    }
}

impl StubRpc {
    pub fn new() -> Self {
        Self {
            commitment: CommitmentConfig::confirmed(),
            blockhash: Hash::new_unique(),
            state: Mutex::new(StubState::default()),
            airdrop_calls: AtomicUsize::new(0),
            status_calls: AtomicUsize::new(0),
            balance_calls: AtomicUsize::new(0),
            blockhash_calls: AtomicUsize::new(0),
            send_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_commitment(mut self, commitment: CommitmentConfig) -> Self {
        self.commitment = commitment;
        self
    }

    /// Fail the next `count` calls of any kind with a transport error
    pub fn fail_next_calls(self, count: usize) -> Self {
        self.state().unreachable_calls = count;
        self
    }

    /// Reject the next `count` airdrop requests as rate limited
    pub fn rate_limit_next_airdrops(self, count: usize) -> Self {
        self.state().rate_limited_airdrops = count;
        self
    }

    /// Report new signatures as pending for `polls` status checks
    pub fn confirm_after_polls(self, polls: u32) -> Self {
        self.state().confirm_after_polls = polls;
        self
    }

    pub fn never_confirm(self) -> Self {
        self.state().never_confirm = true;
        self
    }

    /// Land airdrops on-chain as failed transactions
    pub fn fail_airdrops_with(self, message: impl Into<String>) -> Self {
        self.state().airdrop_failure = Some(message.into());
        self
    }

    /// Reject every submitted transaction (e.g. a program error)
    pub fn reject_submissions_with(self, message: impl Into<String>) -> Self {
        self.state().submission_failure = Some(message.into());
        self
    }

    pub fn set_balance(&self, pubkey: &Pubkey, lamports: u64) {
        self.state().balances.insert(*pubkey, lamports);
    }

    pub fn balance(&self, pubkey: &Pubkey) -> u64 {
        self.state().balances.get(pubkey).copied().unwrap_or(0)
    }

    pub fn latest_blockhash(&self) -> Hash {
        self.blockhash
    }

    pub fn submitted_transactions(&self) -> Vec<Transaction> {
        self.state().submitted.clone()
    }

    pub fn airdrop_calls(&self) -> usize {
        self.airdrop_calls.load(Ordering::SeqCst)
    }

    pub fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }

    pub fn send_calls(&self) -> usize {
        self.send_calls.load(Ordering::SeqCst)
    }

    pub fn total_calls(&self) -> usize {
        self.airdrop_calls()
            + self.status_calls()
            + self.balance_calls.load(Ordering::SeqCst)
            + self.blockhash_calls.load(Ordering::SeqCst)
            + self.send_calls()
    }

    fn state(&self) -> MutexGuard<'_, StubState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn check_reachable(state: &mut StubState) -> Result<()> {
        if state.unreachable_calls > 0 {
            state.unreachable_calls -= 1;
            return Err(SubmitterError::NetworkUnreachable(
                "error sending request: connection refused".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl SolanaRpc for StubRpc {
    fn commitment(&self) -> CommitmentConfig {
        self.commitment
    }

    async fn request_airdrop(&self, pubkey: &Pubkey, lamports: u64) -> Result<Signature> {
        self.airdrop_calls.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state();
        Self::check_reachable(&mut state)?;

        if state.rate_limited_airdrops > 0 {
            state.rate_limited_airdrops -= 1;
            return Err(SubmitterError::rate_limited(
                "HTTP status client error (429 Too Many Requests)",
            ));
        }

        let signature = Signature::new_unique();
        let extra_polls = if self.commitment.is_finalized() { FINALIZATION_POLLS } else { 0 };
        let pending = PendingSignature {
            polls_remaining: state.confirm_after_polls + extra_polls,
            credit: Some((*pubkey, lamports)),
            failure: state.airdrop_failure.clone(),
        };
        state.signatures.insert(signature, pending);
        Ok(signature)
    }

    async fn signature_status(&self, signature: &Signature) -> Result<SignatureState> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state();
        Self::check_reachable(&mut state)?;

        if state.never_confirm {
            return Ok(SignatureState::Pending);
        }

        let Some(pending) = state.signatures.get_mut(signature) else {
            return Ok(SignatureState::Pending);
        };
        if pending.polls_remaining > 0 {
            pending.polls_remaining -= 1;
            return Ok(SignatureState::Pending);
        }
        if let Some(failure) = pending.failure.clone() {
            return Ok(SignatureState::Failed(failure));
        }
        if let Some((pubkey, lamports)) = pending.credit.take() {
            *state.balances.entry(pubkey).or_insert(0) += lamports;
        }
        Ok(SignatureState::Confirmed)
    }

    async fn get_balance(&self, pubkey: &Pubkey) -> Result<u64> {
        self.balance_calls.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state();
        Self::check_reachable(&mut state)?;
        Ok(state.balances.get(pubkey).copied().unwrap_or(0))
    }

    async fn get_latest_blockhash(&self) -> Result<Hash> {
        self.blockhash_calls.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state();
        Self::check_reachable(&mut state)?;
        Ok(self.blockhash)
    }

    async fn send_and_confirm_transaction(&self, transaction: &Transaction) -> Result<Signature> {
        self.send_calls.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state();
        Self::check_reachable(&mut state)?;

        if transaction.verify().is_err() {
            return Err(SubmitterError::SubmissionRejected(
                "Transaction signature verification failure".to_string(),
            ));
        }
        if transaction.message.recent_blockhash != self.blockhash {
            return Err(SubmitterError::SubmissionRejected(
                "Transaction simulation failed: Blockhash not found".to_string(),
            ));
        }

        let (Some(&signature), Some(&payer)) = (
            transaction.signatures.first(),
            transaction.message.account_keys.first(),
        ) else {
            return Err(SubmitterError::SubmissionRejected(
                "Transaction has no fee payer".to_string(),
            ));
        };
        // The cluster deduplicates by signature; a resend of a landed transaction is a no-op.
        if state.submitted.iter().any(|tx| tx.signatures.first() == Some(&signature)) {
            return Ok(signature);
        }

        let fee = LAMPORTS_PER_SIGNATURE * u64::from(transaction.message.header.num_required_signatures);
        let balance = state.balances.get(&payer).copied().unwrap_or(0);
        if balance < fee {
            return Err(SubmitterError::SubmissionRejected(
                "Transaction simulation failed: Attempt to debit an account but found no record of a prior credit."
                    .to_string(),
            ));
        }
        if let Some(failure) = state.submission_failure.clone() {
            return Err(SubmitterError::SubmissionRejected(failure));
        }

        state.balances.insert(payer, balance - fee);
        state.submitted.push(transaction.clone());
        Ok(signature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_airdrop_credits_only_after_confirmation() {
        let stub = StubRpc::new().confirm_after_polls(2);
        let pubkey = Pubkey::new_unique();

        let signature = stub.request_airdrop(&pubkey, 500).await.unwrap();
        assert_eq!(stub.balance(&pubkey), 0);

        assert_eq!(stub.signature_status(&signature).await.unwrap(), SignatureState::Pending);
        assert_eq!(stub.signature_status(&signature).await.unwrap(), SignatureState::Pending);
        assert_eq!(stub.signature_status(&signature).await.unwrap(), SignatureState::Confirmed);
        assert_eq!(stub.balance(&pubkey), 500);

        // Observing the confirmation again must not credit twice
        assert_eq!(stub.signature_status(&signature).await.unwrap(), SignatureState::Confirmed);
        assert_eq!(stub.balance(&pubkey), 500);
    }

    #[tokio::test]
    async fn test_finalized_commitment_takes_longer() {
        let stub = StubRpc::new().with_commitment(CommitmentConfig::finalized());
        let pubkey = Pubkey::new_unique();

        let signature = stub.request_airdrop(&pubkey, 500).await.unwrap();
        for _ in 0..FINALIZATION_POLLS {
            assert_eq!(stub.signature_status(&signature).await.unwrap(), SignatureState::Pending);
        }
        assert_eq!(stub.signature_status(&signature).await.unwrap(), SignatureState::Confirmed);
        assert_eq!(stub.balance(&pubkey), 500);
    }

    #[tokio::test]
    async fn test_injected_failures_are_consumed() {
        let stub = StubRpc::new().fail_next_calls(1).rate_limit_next_airdrops(1);
        let pubkey = Pubkey::new_unique();

        assert!(matches!(
            stub.request_airdrop(&pubkey, 1).await,
            Err(SubmitterError::NetworkUnreachable(_))
        ));
        assert!(matches!(
            stub.request_airdrop(&pubkey, 1).await,
            Err(SubmitterError::RequestRejected { rate_limited: true, .. })
        ));
        assert!(stub.request_airdrop(&pubkey, 1).await.is_ok());
        assert_eq!(stub.airdrop_calls(), 3);
    }
}
