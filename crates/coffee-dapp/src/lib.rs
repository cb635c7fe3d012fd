//! Buy-me-a-coffee dApp core.
//!
//! Connects an injected EIP-1193 wallet, then drives three calls on a coffee
//! contract: pay (`buyCoffee`), read balance (`getBalance`) and withdraw.
//!
//! # Pieces
//!
//! - [`UiBridge`] — connection manager and the three actions, rendering onto a [`Surface`]
//! - [`WriteClient`] / [`ReadClient`] — wallet-backed writes and RPC-backed reads
//! - [`units`] — ether/wei conversion without floating point
//!
//! The browser front end supplies the [`WalletProvider`], [`ChainReader`],
//! [`Timer`] and [`Surface`] implementations; tests supply mocks.

// Core types
pub mod address;
pub mod config;
pub mod constants;
pub mod error;
pub mod rpc;
pub mod units;

// Contract and clients
pub mod client;
pub mod contract;
pub mod session;

// UI glue
pub mod bridge;

use alloy::sol;

// Coffee contract interface: payable tip, owner withdraw, balance view.
sol! {
    interface BuyMeACoffee {
        function buyCoffee() external payable;
        function withdraw() external;
        function getBalance() external view returns (uint256);
    }
}

// Re-exports
pub use alloy::primitives::{Address, Bytes, TxHash, U256};
pub use constants::ChainConfig;
pub use constants::*;
pub use error::{DappError, ProviderError};

pub use address::{connected_status, short_address};
pub use bridge::{ActionRequest, ActionResult, BridgeState, Surface, UiBridge};
pub use client::{CancelToken, ChainReader, ReadClient, Timer, WalletProvider, WriteClient};
pub use config::DappConfig;
pub use contract::CoffeeContract;
pub use rpc::{CallRequest, TxReceipt};
pub use session::Session;
pub use units::{format_ether, parse_ether};
