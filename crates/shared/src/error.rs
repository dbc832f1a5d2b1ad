use alloy_primitives::B256;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("Please install a MetaMask wallet to use our bank.")]
    NoWalletProvider,
    #[error("request rejected in wallet: {0}")]
    UserRejected(String),
    #[error("provider error: {0}")]
    Rpc(String),
    #[error("transaction {tx_hash} reverted")]
    TransactionReverted { tx_hash: B256 },
    #[error("malformed provider response: {0}")]
    MalformedResponse(String),
}
