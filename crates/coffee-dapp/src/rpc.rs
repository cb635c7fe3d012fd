//! JSON-RPC 2.0 envelope types and result decoding shared by the wallet and
//! the HTTP read client.

use alloy::hex;
use alloy::primitives::{Address, Bytes, TxHash, U256};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::DappError;

/// Outgoing JSON-RPC request.
#[derive(Clone, Debug, Serialize)]
pub struct RpcRequest {
    pub jsonrpc: &'static str,
    pub method: String,
    pub params: Value,
    pub id: u64,
}

impl RpcRequest {
    pub fn new(method: impl Into<String>, params: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            method: method.into(),
            params,
            id: 1,
        }
    }

    /// `eth_call` against the latest block.
    pub fn eth_call(to: Address, data: &Bytes) -> Self {
        Self::new(
            "eth_call",
            json!([{ "to": to.to_string(), "data": hex::encode_prefixed(data) }, "latest"]),
        )
    }

    pub fn transaction_receipt(hash: TxHash) -> Self {
        Self::new("eth_getTransactionReceipt", json!([hash.to_string()]))
    }
}

/// Error object inside a JSON-RPC response.
#[derive(Clone, Debug, Deserialize)]
pub struct RpcErrorObject {
    pub code: i64,
    pub message: String,
}

/// Incoming JSON-RPC response.
#[derive(Clone, Debug, Deserialize)]
pub struct RpcResponse {
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<RpcErrorObject>,
}

impl RpcResponse {
    /// Turn the envelope into its result, surfacing node errors.
    pub fn into_result(self) -> Result<Value, DappError> {
        if let Some(err) = self.error {
            return Err(DappError::Rpc {
                code: err.code,
                message: err.message,
            });
        }
        Ok(self.result.unwrap_or(Value::Null))
    }
}

/// Transaction to hand to `eth_sendTransaction`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallRequest {
    pub from: Address,
    pub to: Address,
    pub value: Option<U256>,
    pub data: Bytes,
}

impl CallRequest {
    /// JSON parameter object for `eth_sendTransaction`.
    pub fn to_json(&self) -> Value {
        let mut tx = json!({
            "from": self.from.to_string(),
            "to": self.to.to_string(),
            "data": hex::encode_prefixed(&self.data),
        });
        if let Some(value) = self.value {
            tx["value"] = Value::String(format!("0x{value:x}"));
        }
        tx
    }
}

/// The parts of a transaction receipt this dApp looks at.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxReceipt {
    pub transaction_hash: TxHash,
    pub block_number: Option<u64>,
    pub success: bool,
}

fn hex_quantity(value: &Value, field: &str) -> Result<Option<u64>, DappError> {
    match value.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => {
            let digits = s.strip_prefix("0x").unwrap_or(s);
            u64::from_str_radix(digits, 16)
                .map(Some)
                .map_err(|e| DappError::CallFailed(format!("bad {field} '{s}': {e}")))
        }
        Some(other) => Err(DappError::CallFailed(format!("bad {field}: {other}"))),
    }
}

/// Decode an `eth_getTransactionReceipt` result. `null` means not yet mined.
pub fn parse_receipt(value: &Value) -> Result<Option<TxReceipt>, DappError> {
    if value.is_null() {
        return Ok(None);
    }
    let hash = value
        .get("transactionHash")
        .and_then(|v| v.as_str())
        .ok_or_else(|| DappError::CallFailed("receipt without transactionHash".to_string()))?;
    let transaction_hash = parse_tx_hash(hash)?;
    let block_number = hex_quantity(value, "blockNumber")?;
    // Pre-Byzantium receipts carry no status; treat them as successful.
    let success = hex_quantity(value, "status")?.map(|s| s == 1).unwrap_or(true);
    Ok(Some(TxReceipt {
        transaction_hash,
        block_number,
        success,
    }))
}

/// Decode a `0x`-prefixed hex data result (e.g. from `eth_call`).
pub fn parse_bytes(value: &Value) -> Result<Bytes, DappError> {
    let s = value
        .as_str()
        .ok_or_else(|| DappError::CallFailed(format!("expected hex data, got {value}")))?;
    hex::decode(s)
        .map(Bytes::from)
        .map_err(|e| DappError::CallFailed(format!("bad hex data: {e}")))
}

pub fn parse_tx_hash(s: &str) -> Result<TxHash, DappError> {
    s.parse::<TxHash>()
        .map_err(|e| DappError::CallFailed(format!("bad transaction hash '{s}': {e}")))
}

/// Decode an `eth_chainId` result.
pub fn parse_chain_id(value: &Value) -> Result<u64, DappError> {
    let s = value
        .as_str()
        .ok_or_else(|| DappError::CallFailed(format!("expected chain id, got {value}")))?;
    let digits = s.strip_prefix("0x").unwrap_or(s);
    u64::from_str_radix(digits, 16)
        .map_err(|e| DappError::CallFailed(format!("bad chain id '{s}': {e}")))
}
