pub mod config;
pub mod errors;
pub mod funding;
pub mod keypair;
pub mod pipeline;
pub mod retry_strategy;
pub mod solana_client;
pub mod solana_client_stub;
pub mod solana_instructions;
pub mod solana_tx;

pub use config::Config;
pub use errors::{Result, SubmitterError};
pub use pipeline::Pipeline;
pub use solana_client::{RpcEndpoint, SolanaRpc};
