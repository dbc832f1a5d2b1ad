use alloy_primitives::{Address, B256, U256};

/// Every method the client is allowed to invoke on the bank contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractCall {
    BankName,
    SetBankName { name: B256 },
    BankOwner,
    GetCustomerBalance,
    DepositMoney { amount: U256 },
    TransferMoney { to: Address, amount: U256 },
    Name,
    Symbol,
}

impl ContractCall {
    pub fn method_name(&self) -> &'static str {
        match self {
            ContractCall::BankName => "bankName",
            ContractCall::SetBankName { .. } => "setBankName",
            ContractCall::BankOwner => "bankOwner",
            ContractCall::GetCustomerBalance => "getCustomerBalance",
            ContractCall::DepositMoney { .. } => "depositMoney",
            ContractCall::TransferMoney { .. } => "transferMoney",
            ContractCall::Name => "name",
            ContractCall::Symbol => "symbol",
        }
    }

    pub fn is_write(&self) -> bool {
        matches!(
            self,
            ContractCall::SetBankName { .. }
                | ContractCall::DepositMoney { .. }
                | ContractCall::TransferMoney { .. }
        )
    }
}

/// A submitted write that the ledger has accepted but not yet confirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransactionHandle {
    pub tx_hash: B256,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionReceipt {
    pub tx_hash: B256,
    pub block_number: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_state_changing_methods_are_writes() {
        let writes = [
            ContractCall::SetBankName { name: B256::ZERO },
            ContractCall::DepositMoney { amount: U256::from(1u64) },
            ContractCall::TransferMoney {
                to: Address::ZERO,
                amount: U256::from(1u64),
            },
        ];
        let reads = [
            ContractCall::BankName,
            ContractCall::BankOwner,
            ContractCall::GetCustomerBalance,
            ContractCall::Name,
            ContractCall::Symbol,
        ];
        assert!(writes.iter().all(ContractCall::is_write));
        assert!(!reads.iter().any(ContractCall::is_write));
    }
}
