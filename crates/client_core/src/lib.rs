use std::{future::Future, sync::Arc};

use alloy_primitives::{Address, B256};
use ledger_client::{abi, LedgerClient};
use shared::{
    domain::{ConnectionStatus, OperationKind, OperationStatus, Refresh},
    error::LedgerError,
    protocol::{ContractCall, TransactionReceipt},
};
use thiserror::Error;
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, warn};

pub mod codec;
pub mod session;

pub use codec::CodecError;
pub use session::{BankInfo, InputField, InputForm, SessionState, ViewState};

/// Appended to the token name for display.
const TOKEN_NAME_DECORATION: &str = "😁";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BankError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error("invalid recipient address {0:?}")]
    InvalidAddress(String),
    #[error("only the bank owner can rename the bank")]
    Unauthorized,
}

#[derive(Debug, Clone)]
pub enum BankEvent {
    OperationStatusChanged {
        kind: OperationKind,
        status: OperationStatus,
    },
    SessionUpdated,
    TransactionSubmitted {
        kind: OperationKind,
        tx_hash: B256,
    },
    TransactionConfirmed {
        kind: OperationKind,
        receipt: TransactionReceipt,
    },
    Error(String),
}

/// Drives every user intent against the ledger and folds the results into
/// the session. The session lock is never held across a ledger call, so
/// different operations may interleave.
pub struct BankController {
    ledger: Arc<dyn LedgerClient>,
    session: Mutex<SessionState>,
    events: broadcast::Sender<BankEvent>,
}

impl BankController {
    pub fn new(ledger: Arc<dyn LedgerClient>) -> Self {
        let (events, _) = broadcast::channel(256);
        Self {
            ledger,
            session: Mutex::new(SessionState::default()),
            events,
        }
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<BankEvent> {
        self.events.subscribe()
    }

    pub async fn view(&self) -> ViewState {
        self.session.lock().await.view()
    }

    pub async fn update_input(&self, field: InputField, value: impl Into<String>) {
        self.session.lock().await.inputs.update(field, value);
        let _ = self.events.send(BankEvent::SessionUpdated);
    }

    /// Authorizes the wallet, then refreshes bank info, owner, token info and
    /// balance. A failing refresh does not undo the connection.
    pub async fn connect(&self) -> Result<Address, BankError> {
        let account = self.run(OperationKind::Connect, self.connect_core()).await?;
        info!(%account, "bank: wallet connected");
        self.run_effects(OperationKind::Connect).await;
        Ok(account)
    }

    pub async fn refresh_bank_info(&self) -> Result<String, BankError> {
        self.run(OperationKind::RefreshBankInfo, self.refresh_bank_info_core())
            .await
    }

    /// Returns whether the active account owns the bank.
    pub async fn refresh_owner(&self) -> Result<bool, BankError> {
        self.run(OperationKind::RefreshOwner, self.refresh_owner_core())
            .await
    }

    pub async fn refresh_balance(&self) -> Result<String, BankError> {
        self.run(OperationKind::RefreshBalance, self.refresh_balance_core())
            .await
    }

    pub async fn refresh_token_info(&self) -> Result<(String, String), BankError> {
        self.run(OperationKind::RefreshTokenInfo, self.refresh_token_info_core())
            .await
    }

    pub async fn deposit(&self, amount: &str) -> Result<TransactionReceipt, BankError> {
        let receipt = self
            .run(OperationKind::Deposit, self.deposit_core(amount))
            .await?;
        self.run_effects(OperationKind::Deposit).await;
        Ok(receipt)
    }

    pub async fn transfer(
        &self,
        to_address: &str,
        amount: &str,
    ) -> Result<TransactionReceipt, BankError> {
        let receipt = self
            .run(OperationKind::Transfer, self.transfer_core(to_address, amount))
            .await?;
        self.run_effects(OperationKind::Transfer).await;
        Ok(receipt)
    }

    pub async fn set_bank_name(&self, name: &str) -> Result<TransactionReceipt, BankError> {
        let receipt = self
            .run(OperationKind::SetBankName, self.set_bank_name_core(name))
            .await?;
        self.run_effects(OperationKind::SetBankName).await;
        Ok(receipt)
    }

    pub async fn submit_deposit(&self) -> Result<TransactionReceipt, BankError> {
        let amount = self.session.lock().await.inputs.deposit.clone();
        self.deposit(&amount).await
    }

    pub async fn submit_transfer(&self) -> Result<TransactionReceipt, BankError> {
        let (to_address, amount) = {
            let session = self.session.lock().await;
            (
                session.inputs.transfer_to_address.clone(),
                session.inputs.transfer_amount.clone(),
            )
        };
        self.transfer(&to_address, &amount).await
    }

    pub async fn submit_bank_name(&self) -> Result<TransactionReceipt, BankError> {
        let name = self.session.lock().await.inputs.bank_name.clone();
        self.set_bank_name(&name).await
    }

    async fn connect_core(&self) -> Result<Address, BankError> {
        let previous = {
            let mut session = self.session.lock().await;
            std::mem::replace(&mut session.connection_status, ConnectionStatus::Connecting)
        };

        let result = self.ledger.request_account().await;
        let mut session = self.session.lock().await;
        match result {
            Ok(account) => {
                session.connection_status = ConnectionStatus::Connected;
                session.account = Some(account);
                Ok(account)
            }
            Err(err) => {
                session.connection_status = match previous {
                    ConnectionStatus::Connected => ConnectionStatus::Connected,
                    _ => ConnectionStatus::Disconnected,
                };
                Err(err.into())
            }
        }
    }

    async fn refresh_bank_info_core(&self) -> Result<String, BankError> {
        let raw = self.ledger.call_read(&ContractCall::BankName).await?;
        let name = codec::decode_short_string(abi::decode_bank_name(&raw)?)?;
        self.session.lock().await.bank_info.bank_name = Some(name.clone());
        Ok(name)
    }

    async fn refresh_owner_core(&self) -> Result<bool, BankError> {
        let raw = self.ledger.call_read(&ContractCall::BankOwner).await?;
        let owner = abi::decode_bank_owner(&raw)?;
        self.session.lock().await.owner_address = Some(owner);

        let account = self.ledger.request_account().await?;
        let mut session = self.session.lock().await;
        session.account = Some(account);
        let is_owner = session.is_owner();
        debug!(%owner, %account, is_owner, "bank: owner refreshed");
        Ok(is_owner)
    }

    async fn refresh_balance_core(&self) -> Result<String, BankError> {
        let raw = self
            .ledger
            .call_read(&ContractCall::GetCustomerBalance)
            .await?;
        let balance = codec::to_display_units(abi::decode_customer_balance(&raw)?);
        self.session.lock().await.balance = Some(balance.clone());
        Ok(balance)
    }

    async fn refresh_token_info_core(&self) -> Result<(String, String), BankError> {
        let name = abi::decode_token_name(&self.ledger.call_read(&ContractCall::Name).await?)?;
        let symbol =
            abi::decode_token_symbol(&self.ledger.call_read(&ContractCall::Symbol).await?)?;

        let token_name = format!("{name}{TOKEN_NAME_DECORATION}");
        let mut session = self.session.lock().await;
        session.bank_info.token_name = token_name.clone();
        session.bank_info.token_symbol = symbol.clone();
        Ok((token_name, symbol))
    }

    async fn deposit_core(&self, amount: &str) -> Result<TransactionReceipt, BankError> {
        let amount = codec::to_ledger_units(amount)?;
        info!(%amount, "bank: depositing money");
        self.submit_and_confirm(OperationKind::Deposit, ContractCall::DepositMoney { amount })
            .await
    }

    async fn transfer_core(
        &self,
        to_address: &str,
        amount: &str,
    ) -> Result<TransactionReceipt, BankError> {
        let to_address = to_address.trim();
        if to_address.is_empty() {
            return Err(BankError::InvalidAddress(String::new()));
        }
        let to = to_address
            .parse::<Address>()
            .map_err(|_| BankError::InvalidAddress(to_address.to_string()))?;
        let amount = codec::to_ledger_units(amount)?;
        info!(%to, %amount, "bank: transferring money");
        self.submit_and_confirm(OperationKind::Transfer, ContractCall::TransferMoney { to, amount })
            .await
    }

    async fn set_bank_name_core(&self, name: &str) -> Result<TransactionReceipt, BankError> {
        if !self.session.lock().await.is_owner() {
            return Err(BankError::Unauthorized);
        }
        let encoded = codec::encode_short_string(name)?;
        info!(name, "bank: setting bank name");
        self.submit_and_confirm(
            OperationKind::SetBankName,
            ContractCall::SetBankName { name: encoded },
        )
        .await
    }

    async fn submit_and_confirm(
        &self,
        kind: OperationKind,
        call: ContractCall,
    ) -> Result<TransactionReceipt, BankError> {
        let handle = self.ledger.submit_write(&call).await?;
        info!(operation = %kind, tx_hash = %handle.tx_hash, "bank: awaiting confirmation");
        let _ = self.events.send(BankEvent::TransactionSubmitted {
            kind,
            tx_hash: handle.tx_hash,
        });

        let receipt = self.ledger.await_confirmation(&handle).await?;
        info!(
            operation = %kind,
            tx_hash = %receipt.tx_hash,
            block = ?receipt.block_number,
            "bank: transaction confirmed"
        );
        let _ = self
            .events
            .send(BankEvent::TransactionConfirmed { kind, receipt });
        Ok(receipt)
    }

    /// Runs the declared follow-up refreshes of `kind`. Each one records its
    /// own outcome in the session and never fails the triggering operation.
    async fn run_effects(&self, kind: OperationKind) {
        for effect in kind.effects() {
            let outcome = match effect {
                Refresh::BankInfo => self.refresh_bank_info().await.map(|_| ()),
                Refresh::Owner => self.refresh_owner().await.map(|_| ()),
                Refresh::TokenInfo => self.refresh_token_info().await.map(|_| ()),
                Refresh::Balance => self.refresh_balance().await.map(|_| ()),
            };
            if let Err(err) = outcome {
                debug!(
                    operation = %kind,
                    effect = %effect.kind(),
                    error = %err,
                    "bank: follow-up refresh failed"
                );
            }
        }
    }

    /// Wallet guard first: without a provider the operation settles as failed
    /// without ever being marked in flight.
    async fn run<T, F>(&self, kind: OperationKind, op: F) -> Result<T, BankError>
    where
        F: Future<Output = Result<T, BankError>>,
    {
        if !self.ledger.is_available() {
            let result: Result<T, BankError> = Err(LedgerError::NoWalletProvider.into());
            self.finish(kind, &result).await;
            return result;
        }
        self.begin(kind).await;
        let result = op.await;
        self.finish(kind, &result).await;
        result
    }

    async fn begin(&self, kind: OperationKind) {
        self.session.lock().await.operations.begin(kind);
        let _ = self.events.send(BankEvent::OperationStatusChanged {
            kind,
            status: OperationStatus::InFlight,
        });
    }

    async fn finish<T>(&self, kind: OperationKind, result: &Result<T, BankError>) {
        let status = {
            let mut session = self.session.lock().await;
            session.operations.finish(kind, result.is_ok());
            match result {
                Ok(_) if kind == OperationKind::Connect || kind.is_mutating() => {
                    session.error = None;
                }
                Ok(_) => {}
                Err(err) => session.error = Some(err.to_string()),
            }
            session.operations.status(kind)
        };

        if let Err(err) = result {
            warn!(operation = %kind, error = %err, "bank: operation failed");
            let _ = self.events.send(BankEvent::Error(err.to_string()));
        }
        let _ = self
            .events
            .send(BankEvent::OperationStatusChanged { kind, status });
        let _ = self.events.send(BankEvent::SessionUpdated);
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
