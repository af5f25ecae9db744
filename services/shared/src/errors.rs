/// Shared error types for the submitter services
///
/// Design Philosophy:
/// - Standardized error codes for consistent error handling across crates
/// - Categorized by error domain (Validation, Network, Contract, Timeout, Internal)
/// - Includes context fields for debugging (error_code, message, context)
///
/// Usage:
/// - The submitter library wraps its specific errors in ServiceError at the binary edge
/// - Error codes follow pattern: <CATEGORY>_<SPECIFIC>_<DETAIL>
/// - Context field used for additional debugging information
use serde::{Deserialize, Serialize};
use std::fmt;

/// Error categories that map to process exit codes and logging severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCategory {
    /// Configuration or key material is invalid
    Validation,

    /// Local resource (key file) does not exist
    NotFound,

    /// Network/RPC errors
    /// Endpoint unreachable, transport failures, faucet rate limiting
    Network,

    /// Request rejected by the cluster
    /// Faucet refusal, simulation or program execution failure
    Contract,

    /// Signature did not reach the configured commitment in time
    Timeout,

    /// Unexpected failures, programming errors
    Internal,
}

impl ErrorCategory {
    /// Map error category to a sysexits-style process exit code
    pub fn exit_code(&self) -> u8 {
        match self {
            ErrorCategory::Validation => 78,
            ErrorCategory::NotFound => 66,
            ErrorCategory::Network => 69,
            ErrorCategory::Contract => 65,
            ErrorCategory::Timeout => 75,
            ErrorCategory::Internal => 70,
        }
    }

    /// Map error category to log level
    pub fn log_level(&self) -> &'static str {
        match self {
            ErrorCategory::Validation => "warn",
            ErrorCategory::NotFound => "warn",
            ErrorCategory::Network => "error",
            ErrorCategory::Contract => "warn",
            ErrorCategory::Timeout => "error",
            ErrorCategory::Internal => "error",
        }
    }
}

/// Standard error codes used across all crates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorCode(pub &'static str);

impl ErrorCode {
    // Key material errors
    pub const KEY_FILE_NOT_FOUND: ErrorCode = ErrorCode("KEY_FILE_NOT_FOUND");
    pub const KEY_DECODE_FAILED: ErrorCode = ErrorCode("KEY_DECODE_FAILED");

    // Configuration errors
    pub const VALIDATION_INVALID_CONFIG: ErrorCode = ErrorCode("VALIDATION_INVALID_CONFIG");

    // Network errors
    pub const NETWORK_RPC_UNAVAILABLE: ErrorCode = ErrorCode("NETWORK_RPC_UNAVAILABLE");
    pub const NETWORK_FAUCET_RATE_LIMITED: ErrorCode = ErrorCode("NETWORK_FAUCET_RATE_LIMITED");

    // Cluster rejections
    pub const CONTRACT_AIRDROP_REJECTED: ErrorCode = ErrorCode("CONTRACT_AIRDROP_REJECTED");
    pub const CONTRACT_SUBMISSION_REJECTED: ErrorCode = ErrorCode("CONTRACT_SUBMISSION_REJECTED");

    // Confirmation errors
    pub const TIMEOUT_CONFIRMATION: ErrorCode = ErrorCode("TIMEOUT_CONFIRMATION");

    // Internal errors
    pub const INTERNAL_UNEXPECTED: ErrorCode = ErrorCode("INTERNAL_UNEXPECTED");

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Standardized error structure reported by the binary
///
/// This provides consistent error reporting with:
/// - Structured error codes for programmatic handling
/// - Human-readable messages
/// - Optional context for debugging
/// - Category-based classification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceError {
    /// Error category (determines exit code and log level)
    pub category: ErrorCategory,

    /// Structured error code
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Optional additional context (e.g., paths, signatures, RPC diagnostics)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl ServiceError {
    /// Create a new ServiceError
    pub fn new(category: ErrorCategory, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            category,
            code: code.as_str().to_string(),
            message: message.into(),
            context: None,
        }
    }

    /// Add context to an error
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    // Key material constructors
    pub fn key_file_not_found(path: impl fmt::Display) -> Self {
        Self::new(
            ErrorCategory::NotFound,
            ErrorCode::KEY_FILE_NOT_FOUND,
            format!("Keypair file not found: {}", path),
        )
    }

    pub fn key_decode_failed(reason: impl Into<String>) -> Self {
        Self::new(
            ErrorCategory::Validation,
            ErrorCode::KEY_DECODE_FAILED,
            "Keypair could not be decoded",
        )
        .with_context(reason)
    }

    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::new(
            ErrorCategory::Validation,
            ErrorCode::VALIDATION_INVALID_CONFIG,
            "Invalid configuration",
        )
        .with_context(reason)
    }

    // Network error constructors
    pub fn rpc_unavailable(error: impl fmt::Display) -> Self {
        Self::new(
            ErrorCategory::Network,
            ErrorCode::NETWORK_RPC_UNAVAILABLE,
            "Solana RPC endpoint unavailable",
        )
        .with_context(error.to_string())
    }

    pub fn faucet_rate_limited(error: impl fmt::Display) -> Self {
        Self::new(
            ErrorCategory::Network,
            ErrorCode::NETWORK_FAUCET_RATE_LIMITED,
            "Faucet rate limit reached",
        )
        .with_context(error.to_string())
    }

    // Rejection constructors
    pub fn airdrop_rejected(error: impl fmt::Display) -> Self {
        Self::new(
            ErrorCategory::Contract,
            ErrorCode::CONTRACT_AIRDROP_REJECTED,
            "Airdrop request rejected",
        )
        .with_context(error.to_string())
    }

    pub fn submission_rejected(error: impl fmt::Display) -> Self {
        Self::new(
            ErrorCategory::Contract,
            ErrorCode::CONTRACT_SUBMISSION_REJECTED,
            "Transaction submission rejected",
        )
        .with_context(error.to_string())
    }

    pub fn confirmation_timeout(signature: impl fmt::Display, waited_ms: u128) -> Self {
        Self::new(
            ErrorCategory::Timeout,
            ErrorCode::TIMEOUT_CONFIRMATION,
            "Signature not confirmed in time",
        )
        .with_context(format!("signature: {}, waited_ms: {}", signature, waited_ms))
    }

    // Internal error constructors
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(
            ErrorCategory::Internal,
            ErrorCode::INTERNAL_UNEXPECTED,
            message,
        )
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(context) = &self.context {
            write!(f, "[{}] {}: {}", self.code, self.message, context)
        } else {
            write!(f, "[{}] {}", self.code, self.message)
        }
    }
}

impl std::error::Error for ServiceError {}
