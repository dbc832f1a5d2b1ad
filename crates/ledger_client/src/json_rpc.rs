use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::Duration,
};

use alloy_primitives::{Address, Bytes, B256, U64};
use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::{json, Value};
use shared::{
    error::LedgerError,
    protocol::{ContractCall, TransactionHandle, TransactionReceipt},
};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use url::Url;

use crate::{abi, LedgerClient};

/// EIP-1193 code a wallet returns when the user dismisses a prompt.
const USER_REJECTED_CODE: i64 = 4001;
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Wallet provider reached over JSON-RPC 2.0 on HTTP.
pub struct JsonRpcLedgerClient {
    http: Client,
    rpc_url: Url,
    contract: Address,
    poll_interval: Duration,
    next_id: AtomicU64,
    active_account: Mutex<Option<Address>>,
}

#[derive(Debug, Deserialize)]
struct RpcEnvelope {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RpcReceipt {
    #[serde(default)]
    block_number: Option<U64>,
    #[serde(default)]
    status: Option<U64>,
}

impl JsonRpcLedgerClient {
    pub fn new(rpc_url: Url, contract: Address) -> Self {
        Self {
            http: Client::new(),
            rpc_url,
            contract,
            poll_interval: DEFAULT_POLL_INTERVAL,
            next_id: AtomicU64::new(1),
            active_account: Mutex::new(None),
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    async fn rpc<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T, LedgerError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });
        debug!(method, id, "ledger: rpc request");

        let response = self
            .http
            .post(self.rpc_url.clone())
            .json(&body)
            .send()
            .await
            .and_then(|res| res.error_for_status())
            .map_err(|err| LedgerError::Rpc(format!("{method}: {err}")))?;
        let envelope: RpcEnvelope = response
            .json()
            .await
            .map_err(|err| LedgerError::MalformedResponse(format!("{method}: {err}")))?;

        if let Some(error) = envelope.error {
            warn!(method, code = error.code, message = %error.message, "ledger: rpc error");
            return Err(if error.code == USER_REJECTED_CODE {
                LedgerError::UserRejected(error.message)
            } else {
                LedgerError::Rpc(format!("{method}: {} (code {})", error.message, error.code))
            });
        }

        serde_json::from_value(envelope.result.unwrap_or(Value::Null))
            .map_err(|err| LedgerError::MalformedResponse(format!("{method}: {err}")))
    }

    async fn sender(&self) -> Result<Address, LedgerError> {
        if let Some(account) = *self.active_account.lock().await {
            return Ok(account);
        }
        self.request_account().await
    }
}

#[async_trait]
impl LedgerClient for JsonRpcLedgerClient {
    async fn request_accounts(&self) -> Result<Vec<Address>, LedgerError> {
        let accounts: Vec<Address> = self.rpc("eth_requestAccounts", json!([])).await?;
        *self.active_account.lock().await = accounts.first().copied();
        Ok(accounts)
    }

    async fn call_read(&self, call: &ContractCall) -> Result<Bytes, LedgerError> {
        let mut tx = json!({
            "to": self.contract,
            "data": abi::encode_call(call),
        });
        // Reads such as getCustomerBalance depend on msg.sender.
        if let Some(from) = *self.active_account.lock().await {
            tx["from"] = json!(from);
        }
        self.rpc("eth_call", json!([tx, "latest"])).await
    }

    async fn submit_write(&self, call: &ContractCall) -> Result<TransactionHandle, LedgerError> {
        if !call.is_write() {
            return Err(LedgerError::Rpc(format!(
                "{} is not a state-changing method",
                call.method_name()
            )));
        }
        let from = self.sender().await?;
        let tx = json!({
            "from": from,
            "to": self.contract,
            "data": abi::encode_call(call),
        });
        let tx_hash: B256 = self.rpc("eth_sendTransaction", json!([tx])).await?;
        info!(%tx_hash, method = call.method_name(), "ledger: transaction submitted");
        Ok(TransactionHandle { tx_hash })
    }

    async fn await_confirmation(
        &self,
        handle: &TransactionHandle,
    ) -> Result<TransactionReceipt, LedgerError> {
        let tx_hash = handle.tx_hash;
        loop {
            let receipt: Option<RpcReceipt> = self
                .rpc("eth_getTransactionReceipt", json!([tx_hash]))
                .await?;
            let Some(receipt) = receipt else {
                debug!(%tx_hash, "ledger: transaction pending");
                tokio::time::sleep(self.poll_interval).await;
                continue;
            };

            if receipt.status == Some(U64::ZERO) {
                warn!(%tx_hash, "ledger: transaction reverted");
                return Err(LedgerError::TransactionReverted { tx_hash });
            }
            let block_number = receipt.block_number.map(|number| number.to::<u64>());
            info!(%tx_hash, ?block_number, "ledger: transaction confirmed");
            return Ok(TransactionReceipt {
                tx_hash,
                block_number,
            });
        }
    }
}

#[cfg(test)]
#[path = "tests/json_rpc_tests.rs"]
mod tests;
