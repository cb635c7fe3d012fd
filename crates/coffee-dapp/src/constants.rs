use std::time::Duration;

/// Sepolia chain ID.
pub const SEPOLIA_CHAIN_ID: u64 = 11_155_111;

/// Human-readable chain name shown in mismatch errors.
pub const SEPOLIA_NAME: &str = "Sepolia";

/// Default public RPC endpoint for Sepolia reads.
pub const RPC_URL: &str = "https://ethereum-sepolia-rpc.publicnode.com";

/// Block explorer base URL.
pub const EXPLORER_BASE: &str = "https://sepolia.etherscan.io";

/// Where users without an injected wallet are sent.
pub const WALLET_INSTALL_URL: &str = "https://metamask.io/download/";

/// Deployed coffee contract on Sepolia.
pub const DEFAULT_CONTRACT_ADDRESS: &str = "0x68Fa5c6f3f86e4AE6a3631ea7b76D7133ce236Fe";

/// Ether has 18 decimal places.
pub const ETHER_DECIMALS: usize = 18;

/// EIP-1193 error code for a request the user rejected.
pub const USER_REJECTED_CODE: i64 = 4001;

/// How long an error message stays on screen.
pub const ERROR_DISPLAY: Duration = Duration::from_secs(5);

/// Delay before a success message reverts to the connected status.
pub const SUCCESS_DISPLAY: Duration = Duration::from_secs(3);

/// Interval between receipt polls.
pub const RECEIPT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Upper bound on waiting for a transaction receipt.
pub const RECEIPT_TIMEOUT: Duration = Duration::from_secs(120);

/// Runtime chain configuration. Keeps client handles independent of
/// compile-time constants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainConfig {
    pub chain_id: u64,
    pub name: String,
    pub rpc_url: String,
    pub explorer_base: String,
}

impl ChainConfig {
    /// Hex quantity form of the chain ID, as returned by `eth_chainId`.
    pub fn chain_id_hex(&self) -> String {
        format!("0x{:x}", self.chain_id)
    }

    /// Explorer link for a transaction hash.
    pub fn tx_url(&self, hash: &str) -> String {
        format!("{}/tx/{}", self.explorer_base.trim_end_matches('/'), hash)
    }
}

impl Default for ChainConfig {
    /// Defaults to Sepolia.
    fn default() -> Self {
        Self {
            chain_id: SEPOLIA_CHAIN_ID,
            name: SEPOLIA_NAME.to_string(),
            rpc_url: RPC_URL.to_string(),
            explorer_base: EXPLORER_BASE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_id_hex() {
        assert_eq!(ChainConfig::default().chain_id_hex(), "0xaa36a7");
    }

    #[test]
    fn test_tx_url_trims_slash() {
        let mut config = ChainConfig::default();
        config.explorer_base = "https://example.org/".to_string();
        assert_eq!(config.tx_url("0xabc"), "https://example.org/tx/0xabc");
    }
}
