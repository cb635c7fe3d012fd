//! Client handles and the transport traits behind them.
//!
//! - [`WalletProvider`] — the injected EIP-1193 wallet: accounts, chain, signing
//! - [`ChainReader`] — a direct RPC endpoint for read-only queries
//! - [`Timer`] — sleeping, so polling and delayed renders work on any executor
//!
//! All futures are single-threaded (`!Send`); the browser has one event loop.

use std::cell::{Cell, RefCell};
use std::future::{poll_fn, Future};
use std::pin::pin;
use std::rc::Rc;
use std::task::{Poll, Waker};
use std::time::Duration;

use alloy::primitives::{Address, Bytes, TxHash, U256};
use futures::future::{select, Either};

use crate::constants::ChainConfig;
use crate::contract::CoffeeContract;
use crate::error::ProviderError;
use crate::rpc::{CallRequest, TxReceipt};
use crate::DappError;

/// Injected wallet provider.
pub trait WalletProvider {
    /// Whether a provider object is present in the environment.
    fn is_present(&self) -> bool;

    /// Send the user to the wallet's install page.
    fn open_install_page(&self);

    /// `eth_requestAccounts`. Suspends until the user approves or rejects.
    fn request_accounts(&self) -> impl Future<Output = Result<Vec<String>, ProviderError>>;

    /// `eth_chainId` of the network the wallet is currently on.
    fn chain_id(&self) -> impl Future<Output = Result<u64, ProviderError>>;

    /// `eth_sendTransaction`. Suspends until the user confirms and the
    /// wallet has submitted the transaction.
    fn send_transaction(
        &self,
        tx: &CallRequest,
    ) -> impl Future<Output = Result<TxHash, ProviderError>>;
}

/// Read-only chain access.
pub trait ChainReader {
    /// `eth_call` with `data` against `to`.
    fn call(&self, to: Address, data: Bytes) -> impl Future<Output = Result<Bytes, DappError>>;

    /// `eth_getTransactionReceipt`; `None` until the transaction is included.
    fn transaction_receipt(
        &self,
        hash: TxHash,
    ) -> impl Future<Output = Result<Option<TxReceipt>, DappError>>;
}

/// Async sleep.
pub trait Timer {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()>;
}

/// Shared cancellation flag for a pending receipt wait. Cancelling wakes
/// whoever is awaiting [`CancelToken::cancelled`].
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Rc<CancelInner>);

#[derive(Debug, Default)]
struct CancelInner {
    cancelled: Cell<bool>,
    waker: RefCell<Option<Waker>>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.cancelled.set(true);
        if let Some(waker) = self.0.waker.borrow_mut().take() {
            waker.wake();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.cancelled.get()
    }

    pub fn reset(&self) {
        self.0.cancelled.set(false);
        self.0.waker.borrow_mut().take();
    }

    /// Resolves once [`cancel`](Self::cancel) has been called.
    pub async fn cancelled(&self) {
        poll_fn(|cx| {
            if self.0.cancelled.get() {
                Poll::Ready(())
            } else {
                *self.0.waker.borrow_mut() = Some(cx.waker().clone());
                Poll::Pending
            }
        })
        .await
    }
}

/// Polling policy for receipt waits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceiptPolicy {
    pub interval: Duration,
    pub max_polls: u32,
}

/// Write-capable client: the wallet as transport, bound to one chain.
#[derive(Debug)]
pub struct WriteClient<W> {
    wallet: Rc<W>,
    chain: ChainConfig,
}

impl<W: WalletProvider> WriteClient<W> {
    pub fn new(wallet: Rc<W>, chain: ChainConfig) -> Self {
        Self { wallet, chain }
    }

    pub fn chain(&self) -> &ChainConfig {
        &self.chain
    }

    pub async fn request_accounts(&self) -> Result<Vec<String>, DappError> {
        Ok(self.wallet.request_accounts().await?)
    }

    /// Submit a state-changing call. Returns the transaction hash.
    ///
    /// Refuses to send if the wallet is on a different chain.
    pub async fn write_contract(&self, call: &CallRequest) -> Result<TxHash, DappError> {
        let actual = self.wallet.chain_id().await?;
        if actual != self.chain.chain_id {
            return Err(DappError::ChainMismatch {
                expected: self.chain.chain_id,
                actual,
            });
        }
        let hash = self.wallet.send_transaction(call).await?;
        tracing::info!(
            %hash,
            to = %call.to,
            explorer = %self.chain.tx_url(&hash.to_string()),
            "transaction submitted"
        );
        Ok(hash)
    }
}

/// Read-only client: a direct RPC endpoint bound to one chain.
#[derive(Debug)]
pub struct ReadClient<R> {
    reader: Rc<R>,
    chain: ChainConfig,
}

impl<R: ChainReader> ReadClient<R> {
    pub fn new(reader: Rc<R>, chain: ChainConfig) -> Self {
        Self { reader, chain }
    }

    pub fn chain(&self) -> &ChainConfig {
        &self.chain
    }

    /// Query the contract's `getBalance()` view, in wei.
    pub async fn read_balance(&self, contract: &CoffeeContract) -> Result<U256, DappError> {
        let data = self
            .reader
            .call(contract.address(), contract.get_balance_calldata())
            .await?;
        CoffeeContract::decode_balance(&data)
    }

    /// Poll for the receipt of `hash` until it is included, the poll budget
    /// runs out, or `cancel` fires. A reverted receipt is an error.
    ///
    /// Cancellation takes effect immediately, mid-sleep or mid-request.
    pub async fn wait_for_receipt<T: Timer>(
        &self,
        hash: TxHash,
        policy: ReceiptPolicy,
        timer: &T,
        cancel: &CancelToken,
    ) -> Result<TxReceipt, DappError> {
        let polling = async {
            for attempt in 1..=policy.max_polls {
                if let Some(receipt) = self.reader.transaction_receipt(hash).await? {
                    if !receipt.success {
                        return Err(DappError::CallFailed(format!("transaction {hash} reverted")));
                    }
                    tracing::info!(%hash, block = ?receipt.block_number, "transaction confirmed");
                    return Ok(receipt);
                }
                tracing::debug!(%hash, attempt, "receipt not available yet");
                timer.sleep(policy.interval).await;
            }
            tracing::warn!(%hash, "gave up waiting for receipt");
            Err(DappError::ReceiptTimeout(hash))
        };

        match select(pin!(polling), pin!(cancel.cancelled())).await {
            Either::Left((result, _)) => result,
            Either::Right(((), _)) => {
                tracing::info!(%hash, "receipt wait cancelled");
                Err(DappError::Cancelled(hash))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_token_shared_between_clones() {
        let token = CancelToken::new();
        let other = token.clone();
        other.cancel();
        assert!(token.is_cancelled());
        token.reset();
        assert!(!other.is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_wakes_waiter() {
        let token = CancelToken::new();
        let start = tokio::time::Instant::now();
        tokio::join!(token.cancelled(), async {
            tokio::time::sleep(Duration::from_secs(1)).await;
            token.cancel();
        });
        assert!(start.elapsed() >= Duration::from_secs(1));
        assert!(start.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_cancelled_ready_when_already_cancelled() {
        let token = CancelToken::new();
        token.cancel();
        token.cancelled().await;
    }
}
