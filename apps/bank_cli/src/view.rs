use std::fmt;

use client_core::ViewState;
use shared::domain::OperationStatus;

const HEADLINE: &str = "Byte Coin Bank Project🪙";
const SETUP_PROMPT: &str = "Setup the name of your bank.";

/// Plain-text rendering of a [`ViewState`], one labelled field per line.
pub struct ViewReport<'a>(pub &'a ViewState);

impl fmt::Display for ViewReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let view = self.0;
        writeln!(f, "{HEADLINE}")?;
        if view.is_loading {
            writeln!(f, "Loading")?;
        }
        if let Some(error) = &view.error {
            writeln!(f, "Error: {error}")?;
        }

        writeln!(f, "Coin: {}", view.token_name)?;
        writeln!(f, "Ticker: {}", view.token_symbol)?;
        writeln!(
            f,
            "Balance: {}",
            view.customer_total_balance.as_deref().unwrap_or_default()
        )?;

        if view.needs_bank_name_setup {
            writeln!(f, "{SETUP_PROMPT}")?;
        } else if let Some(name) = &view.current_bank_name {
            writeln!(f, "Bank: {name}")?;
        }

        match view.bank_owner_address {
            Some(owner) => writeln!(f, "Bank Owner Address: {owner}")?,
            None => writeln!(f, "Bank Owner Address:")?,
        }
        if view.is_wallet_connected {
            if let Some(account) = view.customer_address {
                writeln!(f, "User Account Address: {account}")?;
            }
            writeln!(f, "Wallet Connected 🔒")?;
        } else {
            writeln!(f, "Connect Wallet 🔑")?;
        }

        let failed: Vec<_> = view
            .operations
            .iter()
            .filter(|(_, status)| **status == OperationStatus::Failed)
            .map(|(kind, _)| kind.as_str())
            .collect();
        if !failed.is_empty() {
            writeln!(f, "Failed: {}", failed.join(", "))?;
        }

        if view.is_banker_owner {
            writeln!(f, "-- Bank Admin Panel --")?;
            writeln!(f, "Set a new name with `bank set-bank-name <name>`")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use alloy_primitives::Address;
    use client_core::InputForm;
    use shared::domain::OperationKind;

    use super::*;

    fn view() -> ViewState {
        ViewState {
            is_wallet_connected: false,
            is_banker_owner: false,
            bank_owner_address: None,
            customer_total_balance: None,
            current_bank_name: None,
            customer_address: None,
            error: None,
            is_loading: false,
            token_name: String::new(),
            token_symbol: String::new(),
            needs_bank_name_setup: false,
            inputs: InputForm::default(),
            operations: BTreeMap::new(),
        }
    }

    #[test]
    fn disconnected_view_offers_connect() {
        let mut state = view();
        state.error = Some("Please install a MetaMask wallet to use our bank.".into());
        state
            .operations
            .insert(OperationKind::Connect, OperationStatus::Failed);

        let text = ViewReport(&state).to_string();
        assert!(text.contains("Connect Wallet 🔑"));
        assert!(text.contains("Error: Please install a MetaMask wallet to use our bank."));
        assert!(text.contains("Failed: connect"));
        assert!(!text.contains("User Account Address"));
        assert!(!text.contains("Bank Admin Panel"));
    }

    #[test]
    fn connected_owner_sees_admin_panel_and_setup_prompt() {
        let owner: Address = "0x00000000000000000000000000000000000c0570"
            .parse()
            .expect("address");
        let mut state = view();
        state.is_wallet_connected = true;
        state.is_banker_owner = true;
        state.bank_owner_address = Some(owner);
        state.customer_address = Some(owner);
        state.current_bank_name = Some(String::new());
        state.needs_bank_name_setup = true;
        state.token_name = "Byte Coin😁".into();
        state.token_symbol = "BYTE".into();
        state.customer_total_balance = Some("1.5".into());

        let text = ViewReport(&state).to_string();
        assert!(text.contains("Coin: Byte Coin😁"));
        assert!(text.contains("Ticker: BYTE"));
        assert!(text.contains("Balance: 1.5"));
        assert!(text.contains("Setup the name of your bank."));
        assert!(text.contains("User Account Address: "));
        assert!(text.contains("Wallet Connected 🔒"));
        assert!(text.contains("Bank Admin Panel"));
        assert!(!text.contains("Error:"));
    }

    #[test]
    fn named_bank_is_shown_instead_of_prompt() {
        let mut state = view();
        state.current_bank_name = Some("Acme".into());
        state.is_loading = true;

        let text = ViewReport(&state).to_string();
        assert!(text.contains("Bank: Acme"));
        assert!(text.contains("Loading"));
        assert!(!text.contains("Setup the name"));
    }
}
