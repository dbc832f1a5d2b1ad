//! The bank contract's ABI, declared with `sol!`, and the mapping from
//! [`ContractCall`] onto the generated call types.

use alloy_primitives::{Address, Bytes, B256, U256};
use alloy_sol_types::{sol, SolCall};
use shared::{error::LedgerError, protocol::ContractCall};

sol! {
    interface ByteCoinBank {
        function bankName() external view returns (bytes32);
        function setBankName(bytes32 name) external;
        function bankOwner() external view returns (address);
        function getCustomerBalance() external view returns (uint256);
        function depositMoney(uint256 amount) external;
        function transferMoney(address to, uint256 amount) external;
        function name() external view returns (string);
        function symbol() external view returns (string);
    }
}

use ByteCoinBank::{
    bankNameCall, bankOwnerCall, depositMoneyCall, getCustomerBalanceCall, nameCall,
    setBankNameCall, symbolCall, transferMoneyCall,
};

pub fn encode_call(call: &ContractCall) -> Bytes {
    let data = match *call {
        ContractCall::BankName => bankNameCall {}.abi_encode(),
        ContractCall::SetBankName { name } => setBankNameCall { name }.abi_encode(),
        ContractCall::BankOwner => bankOwnerCall {}.abi_encode(),
        ContractCall::GetCustomerBalance => getCustomerBalanceCall {}.abi_encode(),
        ContractCall::DepositMoney { amount } => depositMoneyCall { amount }.abi_encode(),
        ContractCall::TransferMoney { to, amount } => {
            transferMoneyCall { to, amount }.abi_encode()
        }
        ContractCall::Name => nameCall {}.abi_encode(),
        ContractCall::Symbol => symbolCall {}.abi_encode(),
    };
    Bytes::from(data)
}

pub fn decode_bank_name(data: &[u8]) -> Result<B256, LedgerError> {
    decode_returns::<bankNameCall>(data).map(|ret| ret._0)
}

pub fn decode_bank_owner(data: &[u8]) -> Result<Address, LedgerError> {
    decode_returns::<bankOwnerCall>(data).map(|ret| ret._0)
}

pub fn decode_customer_balance(data: &[u8]) -> Result<U256, LedgerError> {
    decode_returns::<getCustomerBalanceCall>(data).map(|ret| ret._0)
}

pub fn decode_token_name(data: &[u8]) -> Result<String, LedgerError> {
    decode_returns::<nameCall>(data).map(|ret| ret._0)
}

pub fn decode_token_symbol(data: &[u8]) -> Result<String, LedgerError> {
    decode_returns::<symbolCall>(data).map(|ret| ret._0)
}

/// Strict decoding: dirty padding and trailing garbage in words are rejected.
fn decode_returns<C: SolCall>(data: &[u8]) -> Result<C::Return, LedgerError> {
    C::abi_decode_returns(data, true)
        .map_err(|err| LedgerError::MalformedResponse(format!("{}: {err}", C::SIGNATURE)))
}
