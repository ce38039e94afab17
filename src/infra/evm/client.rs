// Responsible for all communication with the EVM ledger node (JSON-RPC over HTTP).

use crate::domain::artifact::Address;
use crate::domain::ledger::LedgerReader;
use crate::domain::model::{Fingerprint, ProductAttributes};
use crate::error::LedgerError;
use crate::infra::evm::abi;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

#[derive(Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

#[derive(Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<JsonValue>,
    #[serde(default)]
    error: Option<RpcErrorBody>,
}

/// Read-only ledger client. Holds no keys and never sends transactions.
pub struct JsonRpcLedgerReader {
    client: reqwest::Client,
    rpc_url: String,
    next_id: AtomicU64,
}

fn is_revert(code: i64, message: &str) -> bool {
    code == 3 || message.to_lowercase().contains("revert")
}

fn decode_hex_result(value: &JsonValue) -> Result<Vec<u8>, LedgerError> {
    let s = value
        .as_str()
        .ok_or_else(|| LedgerError::Decode(format!("expected hex string, got {}", value)))?;
    let body = s.strip_prefix("0x").unwrap_or(s);
    hex::decode(body).map_err(|e| LedgerError::Decode(format!("bad hex in result: {}", e)))
}

impl JsonRpcLedgerReader {
    pub fn new(rpc_url: impl Into<String>, timeout: Duration) -> Result<Self, LedgerError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, rpc_url: rpc_url.into(), next_id: AtomicU64::new(1) })
    }

    async fn call(&self, method: &str, params: JsonValue) -> Result<RpcResponse, LedgerError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({ "jsonrpc": "2.0", "id": id, "method": method, "params": params });
        let response = self
            .client
            .post(&self.rpc_url)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json::<RpcResponse>()
            .await?;
        Ok(response)
    }

    async fn call_result(&self, method: &str, params: JsonValue) -> Result<JsonValue, LedgerError> {
        let response = self.call(method, params).await?;
        if let Some(err) = response.error {
            return Err(LedgerError::Rpc { code: err.code, message: err.message });
        }
        response
            .result
            .ok_or_else(|| LedgerError::Decode(format!("{} returned neither result nor error", method)))
    }

    /// The node's chain id (`eth_chainId`).
    pub async fn chain_id(&self) -> Result<u64, LedgerError> {
        let result = self.call_result("eth_chainId", json!([])).await?;
        let s = result
            .as_str()
            .ok_or_else(|| LedgerError::Decode(format!("eth_chainId returned {}", result)))?;
        u64::from_str_radix(s.trim_start_matches("0x"), 16)
            .map_err(|e| LedgerError::Decode(format!("bad chain id `{}`: {}", s, e)))
    }

    /// Deployed bytecode at `address`; empty when nothing is deployed.
    pub async fn get_code(&self, address: Address) -> Result<Vec<u8>, LedgerError> {
        let result = self
            .call_result("eth_getCode", json!([address.to_hex(), "latest"]))
            .await?;
        decode_hex_result(&result)
    }

    /// `eth_call` against the latest block. `Ok(None)` when execution reverted.
    pub async fn eth_call(&self, to: Address, data: &[u8]) -> Result<Option<Vec<u8>>, LedgerError> {
        let params = json!([{ "to": to.to_hex(), "data": format!("0x{}", hex::encode(data)) }, "latest"]);
        let response = self.call("eth_call", params).await?;
        if let Some(err) = response.error {
            if is_revert(err.code, &err.message) {
                return Ok(None);
            }
            return Err(LedgerError::Rpc { code: err.code, message: err.message });
        }
        match response.result {
            Some(result) => decode_hex_result(&result).map(Some),
            None => Err(LedgerError::Decode("eth_call returned neither result nor error".to_string())),
        }
    }
}

#[async_trait]
impl LedgerReader for JsonRpcLedgerReader {
    async fn read_product(
        &self,
        contract: Address,
        fingerprint: Fingerprint,
    ) -> Result<Option<ProductAttributes>, LedgerError> {
        let data = match self.eth_call(contract, &abi::get_product_calldata(&fingerprint)).await? {
            Some(data) => data,
            None => {
                tracing::debug!(%fingerprint, "getProduct reverted; treating as missing");
                return Ok(None);
            }
        };
        if data.is_empty() {
            return Err(LedgerError::Decode(format!(
                "empty return data from {}; is the contract deployed there?",
                contract
            )));
        }
        abi::decode_product(&data).map(Some)
    }
}
