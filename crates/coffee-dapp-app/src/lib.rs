use std::rc::Rc;
use std::time::Duration;

use coffee::{
    ActionRequest, ChainConfig, DappConfig, Surface, Timer, UiBridge, DEFAULT_CONTRACT_ADDRESS,
};
use leptos::*;
use wasm_bindgen::prelude::*;

mod rpc;
pub mod wallet;

pub use rpc::HttpReader;
pub use wallet::InjectedWallet;

/// Contract address, overridable at compile time via COFFEE_CONTRACT_ADDRESS.
const CONTRACT_ADDRESS: &str = {
    match option_env!("COFFEE_CONTRACT_ADDRESS") {
        Some(addr) => addr,
        None => DEFAULT_CONTRACT_ADDRESS,
    }
};

/// Read RPC endpoint, overridable at compile time via COFFEE_RPC_URL.
const RPC_URL: &str = {
    match option_env!("COFFEE_RPC_URL") {
        Some(url) => url,
        None => coffee::RPC_URL,
    }
};

/// Build the app configuration from compile-time settings.
pub fn app_config() -> DappConfig {
    let chain = ChainConfig {
        rpc_url: RPC_URL.to_string(),
        ..ChainConfig::default()
    };
    DappConfig::new(CONTRACT_ADDRESS).with_chain(chain)
}

/// Browser timer backed by `setTimeout`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlooTimer;

impl Timer for GlooTimer {
    async fn sleep(&self, duration: Duration) {
        gloo_timers::future::sleep(duration).await;
    }
}

/// Page state the bridge renders into; the view reads these signals.
#[derive(Debug, Clone, Copy)]
pub struct SignalSurface {
    pub status: RwSignal<String>,
    pub status_connected: RwSignal<bool>,
    pub error: RwSignal<Option<String>>,
    pub balance: RwSignal<Option<String>>,
    pub actions_enabled: RwSignal<bool>,
    pub connect_label: RwSignal<String>,
    pub waiting: RwSignal<bool>,
    pub busy: RwSignal<bool>,
}

impl SignalSurface {
    pub fn new() -> Self {
        Self {
            status: create_rw_signal(String::new()),
            status_connected: create_rw_signal(false),
            error: create_rw_signal(None),
            balance: create_rw_signal(None),
            actions_enabled: create_rw_signal(false),
            connect_label: create_rw_signal("Connect Wallet".to_string()),
            waiting: create_rw_signal(false),
            busy: create_rw_signal(false),
        }
    }
}

impl Default for SignalSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface for SignalSurface {
    fn set_status(&self, text: &str, connected: bool) {
        self.status.set(text.to_string());
        self.status_connected.set(connected);
    }

    fn show_error(&self, text: &str) {
        self.error.set(Some(text.to_string()));
    }

    fn clear_error(&self) {
        self.error.set(None);
    }

    fn show_balance(&self, text: &str) {
        self.balance.set(Some(text.to_string()));
    }

    fn hide_balance(&self) {
        self.balance.set(None);
    }

    fn set_actions_enabled(&self, enabled: bool) {
        self.actions_enabled.set(enabled);
    }

    fn set_connect_label(&self, text: &str) {
        self.connect_label.set(text.to_string());
    }

    fn set_waiting(&self, waiting: bool) {
        self.waiting.set(waiting);
    }

    fn set_busy(&self, busy: bool) {
        self.busy.set(busy);
    }
}

type Bridge = UiBridge<InjectedWallet, HttpReader, GlooTimer, SignalSurface>;

/// Main application component
#[component]
pub fn App() -> impl IntoView {
    let surface = SignalSurface::new();
    let config = app_config();
    let reader = HttpReader::new(config.chain.rpc_url.clone());
    let bridge: Rc<Bridge> = Rc::new(UiBridge::new(
        config,
        InjectedWallet,
        reader,
        GlooTimer,
        surface,
    ));
    {
        let bridge = Rc::clone(&bridge);
        spawn_local(async move {
            if let Err(e) = bridge.init().await {
                tracing::error!("startup configuration error: {}", e);
            }
        });
    }
    let bridge = store_value(bridge);

    let (amount, set_amount) = create_signal(String::from("0.001"));

    let connect = move |_| {
        let bridge = bridge.get_value();
        spawn_local(async move {
            bridge.connect().await;
        });
    };

    let run = move |request: ActionRequest| {
        let bridge = bridge.get_value();
        spawn_local(async move {
            bridge.dispatch(request).await;
        });
    };

    let buy = move |_| run(ActionRequest::Pay(amount.get_untracked()));
    let read_balance = move |_| run(ActionRequest::ReadBalance);
    let withdraw = move |_| run(ActionRequest::Withdraw);
    let cancel = move |_| {
        bridge.with_value(|b| b.cancel_pending());
    };

    let actions_disabled = move || !surface.actions_enabled.get() || surface.busy.get();

    view! {
        <main class="container">
            <h1>"Buy Me a Coffee ☕"</h1>

            <p
                id="status"
                class="status"
                class:connected=move || surface.status_connected.get()
            >
                {move || surface.status.get()}
            </p>

            <button
                id="connectBtn"
                class="btn btn-primary"
                on:click=connect
                disabled=move || surface.busy.get()
            >
                {move || surface.connect_label.get()}
            </button>

            <div class="pay-row">
                <input
                    id="coffeeAmount"
                    type="number"
                    step="0.001"
                    min="0"
                    class="input"
                    prop:value=move || amount.get()
                    on:input=move |ev| set_amount.set(event_target_value(&ev))
                />
                <button id="buyBtn" class="btn btn-primary" on:click=buy disabled=actions_disabled>
                    "Buy Coffee"
                </button>
            </div>

            <div class="owner-row">
                <button
                    id="balanceBtn"
                    class="btn btn-secondary"
                    on:click=read_balance
                    disabled=actions_disabled
                >
                    "Get Balance"
                </button>
                <button
                    id="withdrawBtn"
                    class="btn btn-secondary"
                    on:click=withdraw
                    disabled=actions_disabled
                >
                    "Withdraw"
                </button>
            </div>

            <Show when=move || surface.waiting.get() fallback=|| ()>
                <button id="cancelBtn" class="btn btn-secondary btn-sm" on:click=cancel>
                    "Stop waiting"
                </button>
            </Show>

            <div
                id="balanceDisplay"
                class="balance"
                class:show=move || surface.balance.get().is_some()
            >
                {move || surface.balance.get().unwrap_or_default()}
            </div>

            <div id="error" class="error" class:show=move || surface.error.get().is_some()>
                {move || surface.error.get().unwrap_or_default()}
            </div>
        </main>
    }
}

/// Initialize the app
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_tracing::set_as_global_default();
    mount_to_body(|| view! { <App /> });
}
