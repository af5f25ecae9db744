use shared::{constants::*, program_ids::transfer_program_id, Cluster, LamportAmount};
use solana_sdk::pubkey::Pubkey;
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::errors::{Result, SubmitterError};

#[derive(Debug, Clone)]
pub struct Config {
    pub solana: SolanaConfig,
    pub submitter: SubmitterConfig,
    pub retry: RetryConfig,
}

#[derive(Debug, Clone)]
pub struct SolanaConfig {
    pub cluster: Cluster,
    pub rpc_url: String,
    pub commitment: String,
    pub rpc_timeout_seconds: u64,
}

#[derive(Debug, Clone)]
pub struct SubmitterConfig {
    pub keypair: KeySource,
    pub target_program_id: Pubkey,
    pub airdrop_lamports: LamportAmount,
    pub confirmation_timeout_seconds: u64,
    pub confirmation_poll_interval_ms: u64,
}

#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub initial_interval_ms: u64,
    pub max_interval_ms: u64,
}

/// Where the sender's secret key comes from
#[derive(Clone)]
pub enum KeySource {
    /// Solana CLI keypair file (JSON array of 64 bytes)
    Path(PathBuf),
    /// The same JSON array, passed inline
    Json(String),
}

impl fmt::Debug for KeySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeySource::Path(path) => f.debug_tuple("Path").field(path).finish(),
            KeySource::Json(_) => f.write_str("Json(<redacted>)"),
        }
    }
}

impl SolanaConfig {
    pub fn rpc_timeout(&self) -> Duration {
        Duration::from_secs(self.rpc_timeout_seconds)
    }
}

impl SubmitterConfig {
    pub fn confirmation_timeout(&self) -> Duration {
        Duration::from_secs(self.confirmation_timeout_seconds)
    }

    pub fn confirmation_poll_interval(&self) -> Duration {
        Duration::from_millis(self.confirmation_poll_interval_ms)
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup (the process environment in production)
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let cluster: Cluster = parse_or(&lookup, "SOLANA_CLUSTER", Cluster::default())?;
        let rpc_url = lookup("SOLANA_RPC_URL").unwrap_or_else(|| cluster.url().to_string());

        let keypair = match (lookup("SUBMITTER_KEYPAIR_PATH"), lookup("SUBMITTER_KEYPAIR_JSON")) {
            (Some(path), _) => KeySource::Path(PathBuf::from(path)),
            (None, Some(json)) => KeySource::Json(json),
            (None, None) => {
                return Err(SubmitterError::Config(
                    "SUBMITTER_KEYPAIR_PATH or SUBMITTER_KEYPAIR_JSON must be set".to_string(),
                ))
            }
        };

        let airdrop_lamports: u64 =
            parse_or(&lookup, "AIRDROP_LAMPORTS", DEFAULT_AIRDROP_LAMPORTS)?;
        let airdrop_lamports = LamportAmount::new(airdrop_lamports)
            .map_err(|e| SubmitterError::Config(e.to_string()))?;

        if !cluster.has_faucet() {
            return Err(SubmitterError::Config(format!(
                "cluster {} has no faucet; airdrops are only available on test clusters",
                cluster
            )));
        }
        if targets_mainnet(&rpc_url) {
            return Err(SubmitterError::Config(format!(
                "RPC URL {} points at mainnet-beta, which has no faucet",
                rpc_url
            )));
        }

        let confirmation_poll_interval_ms: u64 = parse_or(
            &lookup,
            "CONFIRMATION_POLL_INTERVAL_MS",
            DEFAULT_CONFIRMATION_POLL_INTERVAL_MS,
        )?;
        if confirmation_poll_interval_ms == 0 {
            return Err(SubmitterError::Config(
                "CONFIRMATION_POLL_INTERVAL_MS must be at least 1".to_string(),
            ));
        }

        Ok(Config {
            solana: SolanaConfig {
                rpc_url,
                commitment: lookup("SOLANA_COMMITMENT")
                    .unwrap_or_else(|| DEFAULT_COMMITMENT.to_string()),
                rpc_timeout_seconds: parse_or(
                    &lookup,
                    "SOLANA_RPC_TIMEOUT_SECONDS",
                    DEFAULT_RPC_TIMEOUT_SECS,
                )?,
                cluster,
            },
            submitter: SubmitterConfig {
                keypair,
                target_program_id: parse_or(&lookup, "TARGET_PROGRAM_ID", transfer_program_id())?,
                airdrop_lamports,
                confirmation_timeout_seconds: parse_or(
                    &lookup,
                    "CONFIRMATION_TIMEOUT_SECONDS",
                    DEFAULT_CONFIRMATION_TIMEOUT_SECS,
                )?,
                confirmation_poll_interval_ms,
            },
            retry: RetryConfig {
                max_retries: parse_or(&lookup, "SUBMITTER_MAX_RETRIES", DEFAULT_MAX_RETRIES)?,
                initial_interval_ms: parse_or(
                    &lookup,
                    "RETRY_INITIAL_INTERVAL_MS",
                    RETRY_BACKOFF_BASE_MS,
                )?,
                max_interval_ms: parse_or(&lookup, "RETRY_MAX_INTERVAL_MS", RETRY_BACKOFF_MAX_MS)?,
            },
        })
    }
}

fn targets_mainnet(rpc_url: &str) -> bool {
    let normalized = rpc_url.trim().trim_end_matches('/').to_ascii_lowercase();
    normalized == Cluster::MainnetBeta.url()
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| SubmitterError::Config(format!("{}={:?}: {}", key, raw, e))),
        None => Ok(default),
    }
}
