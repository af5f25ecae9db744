use solana_sdk::{
    hash::Hash,
    instruction::Instruction,
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
    transaction::Transaction,
};
use std::sync::Arc;

use crate::errors::{Result, SubmitterError};
use crate::retry_strategy::RetryStrategy;
use crate::solana_client::SolanaRpc;
use crate::solana_instructions::build_transfer_instruction;

#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionReceipt {
    pub signature: Signature,
    pub recipient: Pubkey,
}

pub struct TransactionSubmitter<R: SolanaRpc> {
    rpc: Arc<R>,
    program_id: Pubkey,
}

/// Fresh recipient with no on-chain history; never persisted
pub fn generate_recipient() -> Keypair {
    Keypair::new()
}

/// Wrap `instructions` in a transaction paid for and signed by `payer`
pub fn sign_transaction(instructions: &[Instruction], payer: &Keypair, blockhash: Hash) -> Result<Transaction> {
    let mut transaction = Transaction::new_with_payer(instructions, Some(&payer.pubkey()));
    transaction
        .try_sign(&[payer], blockhash)
        .map_err(|e| SubmitterError::SubmissionRejected(format!("failed to sign transaction: {}", e)))?;
    Ok(transaction)
}

impl<R: SolanaRpc> TransactionSubmitter<R> {
    pub fn new(rpc: Arc<R>, program_id: Pubkey) -> Self {
        Self { rpc, program_id }
    }

    pub fn program_id(&self) -> &Pubkey {
        &self.program_id
    }

    /// Build and sign the program call against the latest blockhash
    pub async fn prepare(&self, sender: &Keypair, recipient: &Pubkey) -> Result<Transaction> {
        let instruction = build_transfer_instruction(&self.program_id, &sender.pubkey(), recipient);
        let blockhash = self.rpc.get_latest_blockhash().await?;
        sign_transaction(&[instruction], sender, blockhash)
    }

    /// Send and wait for the endpoint's commitment level. Single attempt.
    pub async fn send(&self, transaction: &Transaction) -> Result<Signature> {
        self.rpc.send_and_confirm_transaction(transaction).await
    }

    /// Generate a recipient, sign the call, and submit it
    ///
    /// Retries resend the identical signed transaction, so a copy that already
    /// landed is deduplicated by the cluster instead of executing twice.
    pub async fn submit(&self, sender: &Keypair, retry: &RetryStrategy) -> Result<SubmissionReceipt> {
        let recipient = generate_recipient().pubkey();
        let transaction = self.prepare(sender, &recipient).await?;

        tracing::debug!(
            program_id = %self.program_id,
            sender = %sender.pubkey(),
            %recipient,
            "Submitting transaction"
        );

        let signature = retry
            .retry("send_and_confirm_transaction", || self.send(&transaction))
            .await?;

        Ok(SubmissionReceipt {
            signature,
            recipient,
        })
    }
}
