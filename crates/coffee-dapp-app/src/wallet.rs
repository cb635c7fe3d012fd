//! Injected EIP-1193 wallet (MetaMask and compatibles) behind `window.ethereum`.

use coffee::rpc::{parse_chain_id, parse_tx_hash};
use coffee::{CallRequest, ProviderError, TxHash, WalletProvider, WALLET_INSTALL_URL};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = window, js_name = ethereum)]
    static ETHEREUM: JsValue;

    #[wasm_bindgen(catch, js_namespace = ["window", "ethereum"], js_name = request)]
    async fn ethereum_request(args: &JsValue) -> Result<JsValue, JsValue>;
}

/// Classify a rejected provider promise. EIP-1193 errors carry a numeric
/// `code` and a `message`; anything else is stringified.
pub fn provider_error_from_js(err: &JsValue) -> ProviderError {
    let code = js_sys::Reflect::get(err, &"code".into())
        .ok()
        .and_then(|v| v.as_f64())
        .map(|c| c as i64);
    let message = js_sys::Reflect::get(err, &"message".into())
        .ok()
        .and_then(|v| v.as_string())
        .or_else(|| err.as_string())
        .unwrap_or_else(|| format!("{:?}", err));
    ProviderError::new(code, message)
}

async fn request(method: &str, params: Option<serde_json::Value>) -> Result<JsValue, ProviderError> {
    let args = js_sys::Object::new();
    js_sys::Reflect::set(&args, &"method".into(), &method.into())
        .map_err(|e| ProviderError::new(None, format!("Failed to build request: {:?}", e)))?;

    if let Some(params) = params {
        let json = serde_json::to_string(&params)
            .map_err(|e| ProviderError::new(None, format!("Failed to serialize params: {}", e)))?;
        let js_params = js_sys::JSON::parse(&json)
            .map_err(|e| ProviderError::new(None, format!("Failed to build params: {:?}", e)))?;
        js_sys::Reflect::set(&args, &"params".into(), &js_params)
            .map_err(|e| ProviderError::new(None, format!("Failed to set params: {:?}", e)))?;
    }

    ethereum_request(&args)
        .await
        .map_err(|e| provider_error_from_js(&e))
}

/// The wallet injected by a browser extension.
#[derive(Debug, Clone, Copy, Default)]
pub struct InjectedWallet;

impl WalletProvider for InjectedWallet {
    fn is_present(&self) -> bool {
        !(ETHEREUM.is_undefined() || ETHEREUM.is_null())
    }

    fn open_install_page(&self) {
        if let Some(window) = web_sys::window() {
            let _ = window.open_with_url_and_target(WALLET_INSTALL_URL, "_blank");
        }
    }

    async fn request_accounts(&self) -> Result<Vec<String>, ProviderError> {
        let accounts = request("eth_requestAccounts", None).await?;
        Ok(js_sys::Array::from(&accounts)
            .iter()
            .filter_map(|a| a.as_string())
            .collect())
    }

    async fn chain_id(&self) -> Result<u64, ProviderError> {
        let chain_id = request("eth_chainId", None).await?;
        parse_chain_id(&serde_json::Value::String(
            chain_id.as_string().unwrap_or_default(),
        ))
        .map_err(|e| ProviderError::new(None, e.to_string()))
    }

    async fn send_transaction(&self, tx: &CallRequest) -> Result<TxHash, ProviderError> {
        let params = serde_json::Value::Array(vec![tx.to_json()]);
        let hash = request("eth_sendTransaction", Some(params))
            .await?
            .as_string()
            .ok_or_else(|| ProviderError::new(None, "Invalid transaction hash"))?;
        parse_tx_hash(&hash).map_err(|e| ProviderError::new(None, e.to_string()))
    }
}
