use std::time::Duration;

use alloy::primitives::Address;

use crate::constants::{
    ChainConfig, DEFAULT_CONTRACT_ADDRESS, ERROR_DISPLAY, RECEIPT_POLL_INTERVAL, RECEIPT_TIMEOUT,
    SUCCESS_DISPLAY,
};
use crate::DappError;

/// Everything the bridge needs to know up front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DappConfig {
    pub chain: ChainConfig,
    /// Coffee contract address as configured (unvalidated).
    pub contract_address: String,
    pub receipt_timeout: Duration,
    pub poll_interval: Duration,
    pub error_display: Duration,
    pub success_display: Duration,
}

impl DappConfig {
    pub fn new(contract_address: impl Into<String>) -> Self {
        Self {
            contract_address: contract_address.into(),
            ..Self::default()
        }
    }

    pub fn with_chain(mut self, chain: ChainConfig) -> Self {
        self.chain = chain;
        self
    }

    pub fn with_receipt_timeout(mut self, timeout: Duration) -> Self {
        self.receipt_timeout = timeout;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Validate the configured contract address.
    ///
    /// It must be non-empty, `0x`-prefixed, and decode to 20 bytes.
    pub fn contract(&self) -> Result<Address, DappError> {
        let raw = self.contract_address.trim();
        if raw.is_empty() {
            return Err(DappError::ContractNotConfigured(
                "contract address is empty".to_string(),
            ));
        }
        if !raw.starts_with("0x") {
            return Err(DappError::ContractNotConfigured(format!(
                "'{raw}' is not 0x-prefixed"
            )));
        }
        raw.parse::<Address>()
            .map_err(|e| DappError::ContractNotConfigured(format!("'{raw}': {e}")))
    }

    /// Number of receipt polls that fit into the timeout (at least one).
    pub fn max_receipt_polls(&self) -> u32 {
        if self.poll_interval.is_zero() {
            return 1;
        }
        let polls = self.receipt_timeout.as_millis() / self.poll_interval.as_millis().max(1);
        u32::try_from(polls).unwrap_or(u32::MAX).max(1)
    }
}

impl Default for DappConfig {
    fn default() -> Self {
        Self {
            chain: ChainConfig::default(),
            contract_address: DEFAULT_CONTRACT_ADDRESS.to_string(),
            receipt_timeout: RECEIPT_TIMEOUT,
            poll_interval: RECEIPT_POLL_INTERVAL,
            error_display: ERROR_DISPLAY,
            success_display: SUCCESS_DISPLAY,
        }
    }
}
