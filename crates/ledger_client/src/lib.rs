//! Access to the external ledger: wallet authorization, read-only contract
//! calls, and two-phase (submit, then confirm) contract writes.

use alloy_primitives::{Address, Bytes};
use async_trait::async_trait;
use shared::{
    error::LedgerError,
    protocol::{ContractCall, TransactionHandle, TransactionReceipt},
};

pub mod abi;
mod json_rpc;

pub use json_rpc::JsonRpcLedgerClient;

#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Whether a wallet provider exists in this environment at all.
    fn is_available(&self) -> bool {
        true
    }

    /// Prompts the wallet for authorization. The first entry is the active account.
    async fn request_accounts(&self) -> Result<Vec<Address>, LedgerError>;

    async fn request_account(&self) -> Result<Address, LedgerError> {
        self.request_accounts()
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| LedgerError::UserRejected("wallet authorized no accounts".into()))
    }

    /// Runs a non-mutating method against the latest known state and returns
    /// the raw ABI-encoded return data.
    async fn call_read(&self, call: &ContractCall) -> Result<Bytes, LedgerError>;

    async fn submit_write(&self, call: &ContractCall) -> Result<TransactionHandle, LedgerError>;

    /// Suspends until the ledger includes the transaction. There is no timeout.
    async fn await_confirmation(
        &self,
        handle: &TransactionHandle,
    ) -> Result<TransactionReceipt, LedgerError>;
}

pub struct MissingLedgerClient;

#[async_trait]
impl LedgerClient for MissingLedgerClient {
    fn is_available(&self) -> bool {
        false
    }

    async fn request_accounts(&self) -> Result<Vec<Address>, LedgerError> {
        Err(LedgerError::NoWalletProvider)
    }

    async fn call_read(&self, _call: &ContractCall) -> Result<Bytes, LedgerError> {
        Err(LedgerError::NoWalletProvider)
    }

    async fn submit_write(&self, _call: &ContractCall) -> Result<TransactionHandle, LedgerError> {
        Err(LedgerError::NoWalletProvider)
    }

    async fn await_confirmation(
        &self,
        _handle: &TransactionHandle,
    ) -> Result<TransactionReceipt, LedgerError> {
        Err(LedgerError::NoWalletProvider)
    }
}
