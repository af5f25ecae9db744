use shared::errors::ServiceError;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum SubmitterError {
    #[error("Keypair file not found: {}", .0.display())]
    KeyFileNotFound(PathBuf),

    #[error("Keypair decode error: {0}")]
    KeyDecode(String),

    #[error("Network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("Airdrop request rejected: {message}")]
    RequestRejected { message: String, rate_limited: bool },

    #[error("Signature {signature} not confirmed after {waited:?}")]
    ConfirmationTimeout { signature: String, waited: Duration },

    #[error("Transaction submission rejected: {0}")]
    SubmissionRejected(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl SubmitterError {
    pub fn rejected(message: impl Into<String>) -> Self {
        SubmitterError::RequestRejected {
            message: message.into(),
            rate_limited: false,
        }
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        SubmitterError::RequestRejected {
            message: message.into(),
            rate_limited: true,
        }
    }

    /// Transient failures that may succeed when re-issued.
    ///
    /// Confirmation timeouts are excluded: the original request may still land,
    /// and re-issuing it risks a second credit or a second submission.
    pub fn is_retryable(&self) -> bool {
        match self {
            SubmitterError::NetworkUnreachable(_) => true,
            SubmitterError::RequestRejected { rate_limited, .. } => *rate_limited,
            SubmitterError::KeyFileNotFound(_)
            | SubmitterError::KeyDecode(_)
            | SubmitterError::ConfirmationTimeout { .. }
            | SubmitterError::SubmissionRejected(_)
            | SubmitterError::Config(_)
            | SubmitterError::Internal(_) => false,
        }
    }
}

impl From<SubmitterError> for ServiceError {
    fn from(error: SubmitterError) -> Self {
        match error {
            SubmitterError::KeyFileNotFound(path) => {
                ServiceError::key_file_not_found(path.display())
            }
            SubmitterError::KeyDecode(reason) => ServiceError::key_decode_failed(reason),
            SubmitterError::NetworkUnreachable(reason) => ServiceError::rpc_unavailable(reason),
            SubmitterError::RequestRejected { message, rate_limited: true } => {
                ServiceError::faucet_rate_limited(message)
            }
            SubmitterError::RequestRejected { message, rate_limited: false } => {
                ServiceError::airdrop_rejected(message)
            }
            SubmitterError::ConfirmationTimeout { signature, waited } => {
                ServiceError::confirmation_timeout(signature, waited.as_millis())
            }
            SubmitterError::SubmissionRejected(reason) => {
                ServiceError::submission_rejected(reason)
            }
            SubmitterError::Config(reason) => ServiceError::invalid_config(reason),
            SubmitterError::Internal(reason) => ServiceError::internal(reason),
        }
    }
}

pub type Result<T> = std::result::Result<T, SubmitterError>;

#[cfg(test)]
mod tests {
    use super::*;
    use shared::errors::ErrorCategory;

    #[test]
    fn test_retryable_classification() {
        assert!(SubmitterError::NetworkUnreachable("connection refused".into()).is_retryable());
        assert!(SubmitterError::rate_limited("429 Too Many Requests").is_retryable());
        assert!(!SubmitterError::rejected("airdrop limit exceeded").is_retryable());
        assert!(!SubmitterError::SubmissionRejected("custom program error".into()).is_retryable());
        assert!(!SubmitterError::Internal("RPC task panicked".into()).is_retryable());
        assert!(!SubmitterError::ConfirmationTimeout {
            signature: "sig".into(),
            waited: Duration::from_secs(60),
        }
        .is_retryable());
    }

    #[test]
    fn test_service_error_mapping() {
        let error: ServiceError =
            SubmitterError::KeyFileNotFound(PathBuf::from("/nope/id.json")).into();
        assert_eq!(error.category, ErrorCategory::NotFound);
        assert!(error.message.contains("/nope/id.json"));

        let error: ServiceError = SubmitterError::rate_limited("429").into();
        assert_eq!(error.code, "NETWORK_FAUCET_RATE_LIMITED");

        let error: ServiceError = SubmitterError::rejected("faucet dry").into();
        assert_eq!(error.code, "CONTRACT_AIRDROP_REJECTED");

        let error: ServiceError = SubmitterError::ConfirmationTimeout {
            signature: "abc".into(),
            waited: Duration::from_millis(1500),
        }
        .into();
        assert_eq!(error.category, ErrorCategory::Timeout);
        assert!(error.context.unwrap().contains("waited_ms: 1500"));

        let error: ServiceError = SubmitterError::Internal("RPC task panicked".into()).into();
        assert_eq!(error.category, ErrorCategory::Internal);
        assert_eq!(error.code, "INTERNAL_UNEXPECTED");
        assert_eq!(error.category.exit_code(), 70);
    }
}
