//! The UI bridge: wallet connection plus the pay / balance / withdraw actions,
//! rendered onto a [`Surface`].
//!
//! Every public action is a terminal boundary. Errors are logged, shown on
//! the surface for [`DappConfig::error_display`], and returned as
//! [`ActionResult::Failure`]; nothing propagates further.
//!
//! Only one action runs at a time. A click that arrives while another action
//! is in flight is answered with [`ActionResult::Ignored`] and issues no call.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use alloy::primitives::{Address, TxHash, U256};

use crate::client::{
    CancelToken, ChainReader, ReadClient, ReceiptPolicy, Timer, WalletProvider, WriteClient,
};
use crate::config::DappConfig;
use crate::contract::CoffeeContract;
use crate::rpc::TxReceipt;
use crate::session::Session;
use crate::units::{format_ether, parse_ether};
use crate::DappError;

pub const STATUS_DETECTED: &str = "MetaMask detected! Click \"Connect Wallet\" to continue.";
pub const STATUS_NOT_DETECTED: &str = "MetaMask not detected. Please install MetaMask.";
pub const STATUS_BUYING: &str = "Buying coffee... please confirm transaction.";
pub const STATUS_PAY_PENDING: &str = "Transaction pending...";
pub const STATUS_PAY_DONE: &str = "Coffee bought successfully! ☕";
pub const STATUS_FETCHING: &str = "Fetching balance...";
pub const STATUS_WITHDRAWING: &str = "Withdrawing... Please confirm in MetaMask";
pub const STATUS_WITHDRAW_PENDING: &str = "Withdrawal pending...";
pub const STATUS_WITHDRAW_DONE: &str = "Withdrawal successful! 💰";
pub const CONNECTED_LABEL: &str = "Connected ✓";

/// The page elements the bridge writes to.
pub trait Surface {
    /// Replace the status line. `connected` toggles the connected styling.
    fn set_status(&self, text: &str, connected: bool);
    fn show_error(&self, text: &str);
    fn clear_error(&self);
    fn show_balance(&self, text: &str);
    fn hide_balance(&self);
    /// Enable or disable the pay, balance and withdraw controls.
    fn set_actions_enabled(&self, enabled: bool);
    fn set_connect_label(&self, text: &str);
    /// Whether a receipt wait is running (shows the cancel control).
    fn set_waiting(&self, waiting: bool);
    /// Whether an action is in flight; controls ignore clicks meanwhile.
    fn set_busy(&self, busy: bool);
}

/// Where the bridge is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeState {
    Idle,
    ProviderDetected,
    Connecting,
    Connected,
    Paying,
    ReadingBalance,
    Withdrawing,
}

impl BridgeState {
    /// An operation is in flight.
    pub fn is_busy(self) -> bool {
        matches!(
            self,
            BridgeState::Connecting
                | BridgeState::Paying
                | BridgeState::ReadingBalance
                | BridgeState::Withdrawing
        )
    }
}

/// A user action, built fresh for each click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionRequest {
    Pay(String),
    ReadBalance,
    Withdraw,
}

/// Outcome of a bridge operation.
#[derive(Debug)]
pub enum ActionResult {
    /// `value` carries the balance for reads.
    Success { value: Option<U256> },
    Failure { message: String, cause: DappError },
    /// Re-entrant click or no session; nothing was done.
    Ignored,
}

impl ActionResult {
    pub fn is_success(&self) -> bool {
        matches!(self, ActionResult::Success { .. })
    }

    pub fn error(&self) -> Option<&DappError> {
        match self {
            ActionResult::Failure { cause, .. } => Some(cause),
            _ => None,
        }
    }
}

/// Holds the bridge in a busy state; restores the previous state on drop.
struct InFlight<'a> {
    state: &'a Cell<BridgeState>,
    surface: &'a dyn Surface,
    restore: BridgeState,
}

impl InFlight<'_> {
    fn finish(mut self, next: BridgeState) {
        self.restore = next;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.state.set(self.restore);
        self.surface.set_busy(false);
    }
}

pub struct UiBridge<W, R, T, S> {
    config: DappConfig,
    wallet: Rc<W>,
    reader: Rc<R>,
    timer: T,
    surface: S,
    state: Cell<BridgeState>,
    session: RefCell<Option<Rc<Session<W, R>>>>,
    cancel: CancelToken,
    waiting: Cell<bool>,
    status_epoch: Cell<u64>,
    error_epoch: Cell<u64>,
}

impl<W, R, T, S> UiBridge<W, R, T, S>
where
    W: WalletProvider,
    R: ChainReader,
    T: Timer,
    S: Surface,
{
    pub fn new(config: DappConfig, wallet: W, reader: R, timer: T, surface: S) -> Self {
        Self {
            config,
            wallet: Rc::new(wallet),
            reader: Rc::new(reader),
            timer,
            surface,
            state: Cell::new(BridgeState::Idle),
            session: RefCell::new(None),
            cancel: CancelToken::new(),
            waiting: Cell::new(false),
            status_epoch: Cell::new(0),
            error_epoch: Cell::new(0),
        }
    }

    pub fn state(&self) -> BridgeState {
        self.state.get()
    }

    pub fn config(&self) -> &DappConfig {
        &self.config
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn is_connected(&self) -> bool {
        self.session.borrow().is_some()
    }

    pub fn account(&self) -> Option<Address> {
        self.session.borrow().as_ref().map(|s| s.account())
    }

    fn session(&self) -> Option<Rc<Session<W, R>>> {
        self.session.borrow().clone()
    }

    /// Page-load setup: disable actions, detect the provider and validate
    /// the configured contract address. A bad address is shown like any
    /// other error and cleared after the error display time.
    pub async fn init(&self) -> Result<(), DappError> {
        self.surface.set_actions_enabled(false);
        if self.wallet.is_present() {
            self.state.set(BridgeState::ProviderDetected);
            self.render_status(STATUS_DETECTED, false);
        } else {
            self.render_status(STATUS_NOT_DETECTED, false);
        }
        if let Err(e) = self.config.contract() {
            tracing::error!(error = %e, "invalid contract configuration");
            self.flash_error(&format!("Contract address not configured: {e}"))
                .await;
            return Err(e);
        }
        Ok(())
    }

    /// Route a user action to its handler.
    pub async fn dispatch(&self, request: ActionRequest) -> ActionResult {
        match request {
            ActionRequest::Pay(amount) => self.pay(&amount).await,
            ActionRequest::ReadBalance => self.get_balance().await,
            ActionRequest::Withdraw => self.withdraw().await,
        }
    }

    /// Stop waiting for the pending transaction's receipt. Returns whether a
    /// receipt wait was running; while the wallet prompt is still open there
    /// is nothing to cancel.
    pub fn cancel_pending(&self) -> bool {
        if !self.waiting.get() {
            return false;
        }
        tracing::info!("receipt wait cancelled by user");
        self.cancel.cancel();
        true
    }

    /// Connect the injected wallet and bind the contract.
    pub async fn connect(&self) -> ActionResult {
        if self.is_connected() {
            return ActionResult::Ignored;
        }
        let Some(guard) = self.begin(BridgeState::Connecting) else {
            return ActionResult::Ignored;
        };

        match self.try_connect().await {
            Ok(session) => {
                let status = session.status_line();
                tracing::info!(account = %session.account(), contract = %session.contract().address(), "wallet connected");
                *self.session.borrow_mut() = Some(Rc::new(session));
                guard.finish(BridgeState::Connected);
                self.surface.set_actions_enabled(true);
                self.surface.set_connect_label(CONNECTED_LABEL);
                self.render_status(&status, true);
                ActionResult::Success { value: None }
            }
            Err(e) => {
                let message = match &e {
                    DappError::ProviderMissing => {
                        "MetaMask not detected. Please install MetaMask and refresh.".to_string()
                    }
                    DappError::NoAccounts => "No accounts found. Please unlock MetaMask.".to_string(),
                    DappError::UserRejected(_) => "Connection rejected in MetaMask.".to_string(),
                    DappError::ContractNotConfigured(detail) => {
                        format!("Contract address not configured: {detail}")
                    }
                    other => format!("Connection failed: {other}"),
                };
                self.fail(guard, message, e).await
            }
        }
    }

    async fn try_connect(&self) -> Result<Session<W, R>, DappError> {
        if !self.wallet.is_present() {
            self.wallet.open_install_page();
            return Err(DappError::ProviderMissing);
        }

        let writer = WriteClient::new(Rc::clone(&self.wallet), self.config.chain.clone());
        let reader = ReadClient::new(Rc::clone(&self.reader), self.config.chain.clone());

        let accounts = writer.request_accounts().await?;
        let first = accounts.first().ok_or(DappError::NoAccounts)?;
        let account: Address = first
            .parse()
            .map_err(|e| DappError::CallFailed(format!("wallet returned bad account '{first}': {e}")))?;

        let contract = CoffeeContract::new(self.config.contract()?);
        Ok(Session::new(account, first.clone(), writer, reader, contract))
    }

    /// Send `amount_text` ether to the contract's `buyCoffee()`.
    pub async fn pay(&self, amount_text: &str) -> ActionResult {
        let Some(session) = self.session() else {
            return ActionResult::Ignored;
        };
        let Some(guard) = self.begin(BridgeState::Paying) else {
            tracing::debug!("pay ignored, another action is in flight");
            return ActionResult::Ignored;
        };
        let epoch = self.status_epoch.get();

        let result = async {
            let value = parse_ether(amount_text)?;
            self.render_status(STATUS_BUYING, false);
            let call = session.contract().buy_coffee(session.account(), value);
            let hash = session.writer().write_contract(&call).await?;
            self.render_status(STATUS_PAY_PENDING, true);
            self.await_receipt(&session, hash).await
        }
        .await;

        match result {
            Ok(_) => {
                self.complete_write(guard, &session, STATUS_PAY_DONE, false)
                    .await
            }
            Err(e) => {
                let message = match &e {
                    DappError::InvalidAmount(_) => "Please enter a valid amount".to_string(),
                    other => format!("Transaction failed: {other}"),
                };
                self.restore_status(&session, epoch);
                self.fail(guard, message, e).await
            }
        }
    }

    /// Read the contract balance and show it.
    pub async fn get_balance(&self) -> ActionResult {
        let Some(session) = self.session() else {
            return ActionResult::Ignored;
        };
        let Some(guard) = self.begin(BridgeState::ReadingBalance) else {
            tracing::debug!("balance read ignored, another action is in flight");
            return ActionResult::Ignored;
        };
        let epoch = self.status_epoch.get();

        self.render_status(STATUS_FETCHING, true);
        match session.reader().read_balance(session.contract()).await {
            Ok(wei) => {
                self.surface
                    .show_balance(&format!("Contract Balance: {} ETH", format_ether(wei)));
                guard.finish(BridgeState::Connected);
                self.render_status(&session.status_line(), true);
                ActionResult::Success { value: Some(wei) }
            }
            Err(e) => {
                self.restore_status(&session, epoch);
                self.fail(guard, format!("Failed to get balance: {e}"), e)
                    .await
            }
        }
    }

    /// Withdraw the contract balance to its owner.
    pub async fn withdraw(&self) -> ActionResult {
        let Some(session) = self.session() else {
            return ActionResult::Ignored;
        };
        let Some(guard) = self.begin(BridgeState::Withdrawing) else {
            tracing::debug!("withdraw ignored, another action is in flight");
            return ActionResult::Ignored;
        };
        let epoch = self.status_epoch.get();

        let result = async {
            self.render_status(STATUS_WITHDRAWING, true);
            let call = session.contract().withdraw(session.account());
            let hash = session.writer().write_contract(&call).await?;
            self.render_status(STATUS_WITHDRAW_PENDING, true);
            self.await_receipt(&session, hash).await
        }
        .await;

        match result {
            Ok(_) => {
                self.complete_write(guard, &session, STATUS_WITHDRAW_DONE, true)
                    .await
            }
            Err(e) => {
                self.restore_status(&session, epoch);
                self.fail(guard, format!("Withdrawal failed: {e}"), e).await
            }
        }
    }

    fn begin(&self, busy: BridgeState) -> Option<InFlight<'_>> {
        let current = self.state.get();
        if current.is_busy() {
            return None;
        }
        self.state.set(busy);
        self.surface.set_busy(true);
        Some(InFlight {
            state: &self.state,
            surface: &self.surface,
            restore: current,
        })
    }

    async fn await_receipt(
        &self,
        session: &Session<W, R>,
        hash: TxHash,
    ) -> Result<TxReceipt, DappError> {
        let policy = ReceiptPolicy {
            interval: self.config.poll_interval,
            max_polls: self.config.max_receipt_polls(),
        };
        self.cancel.reset();
        self.waiting.set(true);
        self.surface.set_waiting(true);
        let result = session
            .reader()
            .wait_for_receipt(hash, policy, &self.timer, &self.cancel)
            .await;
        self.waiting.set(false);
        self.surface.set_waiting(false);
        result
    }

    /// Show the success message, release the bridge, then fall back to the
    /// connected status unless something newer was rendered meanwhile.
    async fn complete_write(
        &self,
        guard: InFlight<'_>,
        session: &Session<W, R>,
        message: &str,
        hide_balance: bool,
    ) -> ActionResult {
        self.render_status(message, true);
        if hide_balance {
            self.surface.hide_balance();
        }
        let epoch = self.status_epoch.get();
        guard.finish(BridgeState::Connected);

        self.timer.sleep(self.config.success_display).await;
        if self.status_epoch.get() == epoch && self.state.get() == BridgeState::Connected {
            self.render_status(&session.status_line(), true);
        }
        ActionResult::Success { value: None }
    }

    /// Put the connected line back if the failed action changed the status.
    fn restore_status(&self, session: &Session<W, R>, epoch: u64) {
        if self.status_epoch.get() != epoch {
            self.render_status(&session.status_line(), true);
        }
    }

    /// Release the bridge, show `message`, and clear it after the error
    /// display time unless a newer error replaced it.
    async fn fail(&self, guard: InFlight<'_>, message: String, cause: DappError) -> ActionResult {
        tracing::warn!(error = %cause, "{message}");
        drop(guard);
        self.flash_error(&message).await;
        ActionResult::Failure { message, cause }
    }

    async fn flash_error(&self, message: &str) {
        self.surface.show_error(message);
        let epoch = self.error_epoch.get().wrapping_add(1);
        self.error_epoch.set(epoch);

        self.timer.sleep(self.config.error_display).await;
        if self.error_epoch.get() == epoch {
            self.surface.clear_error();
        }
    }

    fn render_status(&self, text: &str, connected: bool) {
        self.status_epoch.set(self.status_epoch.get().wrapping_add(1));
        self.surface.set_status(text, connected);
    }
}
