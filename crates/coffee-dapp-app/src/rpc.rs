//! Read-only JSON-RPC client over HTTP.

use coffee::rpc::{parse_bytes, parse_receipt, RpcRequest, RpcResponse, TxReceipt};
use coffee::{Address, Bytes, ChainReader, DappError, TxHash};
use gloo_net::http::Request;
use serde_json::Value;

/// Talks straight to a public RPC node, bypassing the wallet.
#[derive(Debug, Clone)]
pub struct HttpReader {
    url: String,
}

impl HttpReader {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    async fn send(&self, request: &RpcRequest) -> Result<Value, DappError> {
        let body = serde_json::to_string(request)?;

        let resp = Request::post(&self.url)
            .header("Content-Type", "application/json")
            .body(body)
            .map_err(|e| DappError::CallFailed(format!("Failed to build request: {}", e)))?
            .send()
            .await
            .map_err(|e| DappError::CallFailed(format!("RPC request failed: {}", e)))?;

        if !resp.ok() {
            let err = resp.text().await.unwrap_or_default();
            return Err(DappError::CallFailed(format!(
                "RPC returned HTTP {}: {}",
                resp.status(),
                err
            )));
        }

        let envelope: RpcResponse = resp
            .json()
            .await
            .map_err(|e| DappError::CallFailed(format!("Failed to parse RPC response: {}", e)))?;
        envelope.into_result()
    }
}

impl ChainReader for HttpReader {
    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, DappError> {
        let result = self.send(&RpcRequest::eth_call(to, &data)).await?;
        parse_bytes(&result)
    }

    async fn transaction_receipt(&self, hash: TxHash) -> Result<Option<TxReceipt>, DappError> {
        let result = self.send(&RpcRequest::transaction_receipt(hash)).await?;
        parse_receipt(&result)
    }
}
