use alloy::primitives::TxHash;
use thiserror::Error;

use crate::constants::USER_REJECTED_CODE;

/// Errors returned by dApp operations.
#[derive(Debug, Error)]
pub enum DappError {
    #[error("no injected wallet provider found")]
    ProviderMissing,

    #[error("no accounts returned by the wallet")]
    NoAccounts,

    #[error("contract address not configured: {0}")]
    ContractNotConfigured(String),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// Carries the wallet's own message.
    #[error("{0}")]
    UserRejected(String),

    #[error("wallet is on chain {actual}, expected {expected}")]
    ChainMismatch { expected: u64, actual: u64 },

    #[error("no receipt for {0} before the wait timed out")]
    ReceiptTimeout(TxHash),

    #[error("wait for {0} was cancelled")]
    Cancelled(TxHash),

    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("{0}")]
    CallFailed(String),

    #[error("serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

impl DappError {
    /// Whether the user turned the request down in their wallet.
    pub fn is_user_rejection(&self) -> bool {
        matches!(self, DappError::UserRejected(_))
    }
}

/// Raw failure reported by a wallet provider, before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderError {
    pub code: Option<i64>,
    pub message: String,
}

impl ProviderError {
    pub fn new(code: Option<i64>, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl From<ProviderError> for DappError {
    fn from(err: ProviderError) -> Self {
        match err.code {
            Some(USER_REJECTED_CODE) => DappError::UserRejected(err.message),
            _ => DappError::CallFailed(err.message),
        }
    }
}
