use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Connect,
    RefreshBankInfo,
    RefreshOwner,
    RefreshBalance,
    RefreshTokenInfo,
    Deposit,
    Transfer,
    SetBankName,
}

impl OperationKind {
    pub const ALL: [OperationKind; 8] = [
        OperationKind::Connect,
        OperationKind::RefreshBankInfo,
        OperationKind::RefreshOwner,
        OperationKind::RefreshBalance,
        OperationKind::RefreshTokenInfo,
        OperationKind::Deposit,
        OperationKind::Transfer,
        OperationKind::SetBankName,
    ];

    /// Follow-up refreshes that run, in order, once this operation succeeds.
    pub fn effects(self) -> &'static [Refresh] {
        match self {
            OperationKind::Connect => &[
                Refresh::BankInfo,
                Refresh::Owner,
                Refresh::TokenInfo,
                Refresh::Balance,
            ],
            OperationKind::Deposit | OperationKind::Transfer => &[Refresh::Balance],
            OperationKind::SetBankName => &[Refresh::BankInfo],
            OperationKind::RefreshBankInfo
            | OperationKind::RefreshOwner
            | OperationKind::RefreshBalance
            | OperationKind::RefreshTokenInfo => &[],
        }
    }

    pub fn is_mutating(self) -> bool {
        matches!(
            self,
            OperationKind::Deposit | OperationKind::Transfer | OperationKind::SetBankName
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OperationKind::Connect => "connect",
            OperationKind::RefreshBankInfo => "refresh_bank_info",
            OperationKind::RefreshOwner => "refresh_owner",
            OperationKind::RefreshBalance => "refresh_balance",
            OperationKind::RefreshTokenInfo => "refresh_token_info",
            OperationKind::Deposit => "deposit",
            OperationKind::Transfer => "transfer",
            OperationKind::SetBankName => "set_bank_name",
        }
    }
}

/// The read-only operations that may be scheduled as effects of another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refresh {
    BankInfo,
    Owner,
    TokenInfo,
    Balance,
}

impl Refresh {
    pub fn kind(self) -> OperationKind {
        match self {
            Refresh::BankInfo => OperationKind::RefreshBankInfo,
            Refresh::Owner => OperationKind::RefreshOwner,
            Refresh::TokenInfo => OperationKind::RefreshTokenInfo,
            Refresh::Balance => OperationKind::RefreshBalance,
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionStatus {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

/// Lifecycle of a single operation kind. `Succeeded` and `Failed` are settled
/// states: the kind is idle again and the value records the last outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationStatus {
    #[default]
    Idle,
    InFlight,
    Succeeded,
    Failed,
}
