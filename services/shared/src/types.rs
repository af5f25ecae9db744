/// Type-safe wrappers for domain primitives
///
/// These types enforce validation at construction time so the pipeline only
/// ever sees a known cluster and a faucet amount the cluster will accept.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

use crate::constants::*;

#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("Unknown cluster: {0} (expected devnet, testnet, mainnet-beta, localnet or an http(s) URL)")]
    UnknownCluster(String),

    #[error("Airdrop amount out of range: {amount} (min: 1, max: {max})")]
    AirdropAmountOutOfRange { amount: u64, max: u64 },
}

/// Target Solana cluster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Cluster {
    Devnet,
    Testnet,
    MainnetBeta,
    Localnet,
    Custom(String),
}

impl Cluster {
    /// JSON-RPC URL for the cluster
    pub fn url(&self) -> &str {
        match self {
            Cluster::Devnet => "https://api.devnet.solana.com",
            Cluster::Testnet => "https://api.testnet.solana.com",
            Cluster::MainnetBeta => "https://api.mainnet-beta.solana.com",
            Cluster::Localnet => "http://127.0.0.1:8899",
            Cluster::Custom(url) => url,
        }
    }

    /// Whether the cluster exposes a faucet
    pub fn has_faucet(&self) -> bool {
        !matches!(self, Cluster::MainnetBeta)
    }

    /// Explorer link for a transaction signature
    pub fn explorer_tx_url(&self, signature: &str) -> String {
        match self {
            Cluster::MainnetBeta => format!("https://explorer.solana.com/tx/{}", signature),
            Cluster::Devnet | Cluster::Testnet => {
                format!("https://explorer.solana.com/tx/{}?cluster={}", signature, self)
            }
            Cluster::Localnet | Cluster::Custom(_) => format!(
                "https://explorer.solana.com/tx/{}?cluster=custom&customUrl={}",
                signature,
                self.url()
            ),
        }
    }
}

impl Default for Cluster {
    fn default() -> Self {
        Cluster::Devnet
    }
}

impl FromStr for Cluster {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let normalized = trimmed.to_ascii_lowercase();
        match normalized.as_str() {
            "devnet" | "d" => Ok(Cluster::Devnet),
            "testnet" | "t" => Ok(Cluster::Testnet),
            "mainnet-beta" | "mainnet" | "m" => Ok(Cluster::MainnetBeta),
            "localnet" | "localhost" | "l" => Ok(Cluster::Localnet),
            url if url.starts_with("http://") || url.starts_with("https://") => {
                Ok(Cluster::Custom(trimmed.to_string()))
            }
            _ => Err(ValidationError::UnknownCluster(value.to_string())),
        }
    }
}

impl std::fmt::Display for Cluster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Cluster::Devnet => write!(f, "devnet"),
            Cluster::Testnet => write!(f, "testnet"),
            Cluster::MainnetBeta => write!(f, "mainnet-beta"),
            Cluster::Localnet => write!(f, "localnet"),
            Cluster::Custom(url) => write!(f, "{}", url),
        }
    }
}

/// Faucet request amount in lamports
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LamportAmount(u64);

impl LamportAmount {
    /// Create a faucet amount, rejecting zero and anything above the faucet cap
    pub fn new(amount: u64) -> Result<Self, ValidationError> {
        if amount == 0 || amount > MAX_AIRDROP_LAMPORTS {
            return Err(ValidationError::AirdropAmountOutOfRange {
                amount,
                max: MAX_AIRDROP_LAMPORTS,
            });
        }
        Ok(Self(amount))
    }

    /// Get the raw lamport value
    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// Convert to SOL (as f64)
    pub fn to_sol(&self) -> f64 {
        self.0 as f64 / LAMPORTS_PER_SOL as f64
    }
}

impl Default for LamportAmount {
    fn default() -> Self {
        Self(DEFAULT_AIRDROP_LAMPORTS)
    }
}

impl std::fmt::Display for LamportAmount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} lamports ({:.9} SOL)", self.0, self.to_sol())
    }
}

/// Outcome of one end-to-end run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub cluster: Cluster,
    pub sender: String,
    pub airdrop_signature: String,
    pub airdrop_lamports: u64,
    pub sender_balance_after_airdrop: u64,
    pub transaction_signature: String,
    pub recipient: String,
    pub explorer_url: String,
    pub completed_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cluster_parsing() {
        assert_eq!("devnet".parse::<Cluster>().unwrap(), Cluster::Devnet);
        assert_eq!(" Mainnet-Beta ".parse::<Cluster>().unwrap(), Cluster::MainnetBeta);
        assert_eq!("localhost".parse::<Cluster>().unwrap(), Cluster::Localnet);
        assert_eq!(
            "http://10.0.0.5:8899".parse::<Cluster>().unwrap(),
            Cluster::Custom("http://10.0.0.5:8899".to_string())
        );
        assert_eq!(
            " HTTPS://rpc.example.com ".parse::<Cluster>().unwrap(),
            Cluster::Custom("HTTPS://rpc.example.com".to_string())
        );
        assert!(matches!(
            "moonnet".parse::<Cluster>(),
            Err(ValidationError::UnknownCluster(_))
        ));
    }

    #[test]
    fn test_cluster_urls() {
        assert_eq!(Cluster::default().url(), "https://api.devnet.solana.com");
        assert_eq!(Cluster::Localnet.url(), "http://127.0.0.1:8899");
        assert!(Cluster::Devnet.has_faucet());
        assert!(!Cluster::MainnetBeta.has_faucet());
    }

    #[test]
    fn test_explorer_url() {
        let url = Cluster::Devnet.explorer_tx_url("abc");
        assert_eq!(url, "https://explorer.solana.com/tx/abc?cluster=devnet");
        let url = Cluster::MainnetBeta.explorer_tx_url("abc");
        assert_eq!(url, "https://explorer.solana.com/tx/abc");
    }

    #[test]
    fn test_lamport_amount_validation() {
        assert_eq!(LamportAmount::default().as_u64(), LAMPORTS_PER_SOL);
        assert!(LamportAmount::new(0).is_err());
        assert!(LamportAmount::new(MAX_AIRDROP_LAMPORTS + 1).is_err());
        assert_eq!(LamportAmount::new(MAX_AIRDROP_LAMPORTS).unwrap().to_sol(), 5.0);
        assert_eq!(
            LamportAmount::default().to_string(),
            "1000000000 lamports (1.000000000 SOL)"
        );
    }
}
