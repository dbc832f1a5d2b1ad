use std::collections::{BTreeMap, HashMap};

use alloy_primitives::Address;
use serde::Serialize;
use shared::domain::{ConnectionStatus, OperationKind, OperationStatus};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BankInfo {
    pub bank_name: Option<String>,
    pub token_name: String,
    pub token_symbol: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputField {
    TransferToAddress,
    TransferAmount,
    Deposit,
    BankName,
}

/// Raw text of the client's forms. The controller reads these but never clears them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InputForm {
    pub transfer_to_address: String,
    pub transfer_amount: String,
    pub deposit: String,
    pub bank_name: String,
}

impl InputForm {
    pub fn update(&mut self, field: InputField, value: impl Into<String>) {
        let slot = match field {
            InputField::TransferToAddress => &mut self.transfer_to_address,
            InputField::TransferAmount => &mut self.transfer_amount,
            InputField::Deposit => &mut self.deposit,
            InputField::BankName => &mut self.bank_name,
        };
        *slot = value.into();
    }
}

#[derive(Debug, Clone, Default)]
pub struct OperationTracker {
    in_flight: HashMap<OperationKind, usize>,
    settled: HashMap<OperationKind, OperationStatus>,
}

impl OperationTracker {
    pub fn begin(&mut self, kind: OperationKind) {
        *self.in_flight.entry(kind).or_default() += 1;
    }

    pub fn finish(&mut self, kind: OperationKind, succeeded: bool) {
        if let Some(count) = self.in_flight.get_mut(&kind) {
            *count = count.saturating_sub(1);
            if *count == 0 {
                self.in_flight.remove(&kind);
            }
        }
        let outcome = if succeeded {
            OperationStatus::Succeeded
        } else {
            OperationStatus::Failed
        };
        self.settled.insert(kind, outcome);
    }

    pub fn status(&self, kind: OperationKind) -> OperationStatus {
        if self.in_flight.contains_key(&kind) {
            OperationStatus::InFlight
        } else {
            self.settled.get(&kind).copied().unwrap_or_default()
        }
    }

    pub fn is_loading(&self) -> bool {
        !self.in_flight.is_empty()
    }

    pub fn snapshot(&self) -> BTreeMap<OperationKind, OperationStatus> {
        OperationKind::ALL
            .into_iter()
            .map(|kind| (kind, self.status(kind)))
            .collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub connection_status: ConnectionStatus,
    pub account: Option<Address>,
    pub owner_address: Option<Address>,
    pub bank_info: BankInfo,
    pub balance: Option<String>,
    pub error: Option<String>,
    pub inputs: InputForm,
    pub operations: OperationTracker,
}

impl SessionState {
    /// Address bytes compare equal regardless of how the hex was cased.
    pub fn is_owner(&self) -> bool {
        matches!(
            (self.account, self.owner_address),
            (Some(account), Some(owner)) if account == owner
        )
    }

    pub fn is_connected(&self) -> bool {
        self.connection_status == ConnectionStatus::Connected
    }

    pub fn view(&self) -> ViewState {
        let is_banker_owner = self.is_owner();
        ViewState {
            is_wallet_connected: self.is_connected(),
            is_banker_owner,
            bank_owner_address: self.owner_address,
            customer_total_balance: self.balance.clone(),
            current_bank_name: self.bank_info.bank_name.clone(),
            customer_address: self.account,
            error: self.error.clone(),
            is_loading: self.operations.is_loading(),
            token_name: self.bank_info.token_name.clone(),
            token_symbol: self.bank_info.token_symbol.clone(),
            needs_bank_name_setup: is_banker_owner
                && self.bank_info.bank_name.as_deref() == Some(""),
            inputs: self.inputs.clone(),
            operations: self.operations.snapshot(),
        }
    }
}

/// Read-only snapshot handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewState {
    pub is_wallet_connected: bool,
    pub is_banker_owner: bool,
    pub bank_owner_address: Option<Address>,
    pub customer_total_balance: Option<String>,
    pub current_bank_name: Option<String>,
    pub customer_address: Option<Address>,
    pub error: Option<String>,
    pub is_loading: bool,
    pub token_name: String,
    pub token_symbol: String,
    pub needs_bank_name_setup: bool,
    pub inputs: InputForm,
    pub operations: BTreeMap<OperationKind, OperationStatus>,
}
