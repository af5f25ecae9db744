/// Shared constants for the funded transaction submitter
///
/// Centralizes the literals the pipeline relies on so the binary, the
/// library and the tests agree on a single value.

/// Lamports in one SOL
pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

/// Default faucet request (1 SOL)
pub const DEFAULT_AIRDROP_LAMPORTS: u64 = LAMPORTS_PER_SOL;

/// Largest single faucet request accepted by configuration (5 SOL)
///
/// Public devnet/testnet faucets reject anything above this.
pub const MAX_AIRDROP_LAMPORTS: u64 = 5 * LAMPORTS_PER_SOL;

/// Cluster used when nothing is configured
pub const DEFAULT_CLUSTER: &str = "devnet";

/// Commitment level used when nothing is configured
pub const DEFAULT_COMMITMENT: &str = "confirmed";

/// Fee charged per required signature on a legacy transaction
pub const LAMPORTS_PER_SIGNATURE: u64 = 5_000;

/// Per-request RPC timeout
pub const DEFAULT_RPC_TIMEOUT_SECS: u64 = 30;

/// Upper bound on waiting for a signature to reach the configured commitment
pub const DEFAULT_CONFIRMATION_TIMEOUT_SECS: u64 = 60;

/// Interval between signature status polls
pub const DEFAULT_CONFIRMATION_POLL_INTERVAL_MS: u64 = 500;

/// Attempts per retried RPC call (first try included)
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Base backoff delay in milliseconds for retry logic
pub const RETRY_BACKOFF_BASE_MS: u64 = 1_000;

/// Maximum backoff delay in milliseconds for retry logic
pub const RETRY_BACKOFF_MAX_MS: u64 = 30_000;
