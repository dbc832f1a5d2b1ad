use std::{process::ExitCode, sync::Arc, time::Duration};

use anyhow::Result;
use clap::{Parser, Subcommand};
use client_core::{BankController, BankError, InputField};
use ledger_client::{JsonRpcLedgerClient, LedgerClient, MissingLedgerClient};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod config;
mod view;

use config::load_settings;
use view::ViewReport;

#[derive(Parser, Debug)]
#[command(name = "bank", about = "Byte Coin bank client")]
struct Cli {
    /// Wallet provider JSON-RPC endpoint.
    #[arg(long, global = true)]
    rpc_url: Option<String>,
    /// Bank contract address.
    #[arg(long, global = true)]
    contract: Option<String>,
    /// Print the view state as JSON.
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Connect the wallet and show balances and bank info.
    Status,
    Deposit {
        amount: String,
    },
    Transfer {
        to: String,
        amount: String,
    },
    SetBankName {
        name: String,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut settings = load_settings();
    if let Some(rpc_url) = cli.rpc_url {
        settings.rpc_url = Some(rpc_url);
    }
    if let Some(contract) = cli.contract {
        settings.contract_address = contract;
    }

    let contract = settings.contract_address()?;
    let ledger: Arc<dyn LedgerClient> = match settings.rpc_url()? {
        Some(url) => {
            info!(%url, %contract, "bank: using wallet provider");
            Arc::new(
                JsonRpcLedgerClient::new(url, contract)
                    .with_poll_interval(Duration::from_millis(settings.confirmation_poll_ms)),
            )
        }
        None => Arc::new(MissingLedgerClient),
    };
    let controller = BankController::new(ledger);

    let outcome = run_command(&controller, cli.command).await;
    if let Err(err) = &outcome {
        error!(error = %err, "bank: command failed");
    }

    let state = controller.view().await;
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&state)?);
    } else {
        print!("{}", ViewReport(&state));
    }

    Ok(if outcome.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Connects first, then performs the requested intent through the form inputs.
async fn run_command(controller: &BankController, command: Command) -> Result<(), BankError> {
    controller.connect().await?;

    match command {
        Command::Status => {}
        Command::Deposit { amount } => {
            controller.update_input(InputField::Deposit, amount).await;
            controller.submit_deposit().await?;
        }
        Command::Transfer { to, amount } => {
            controller
                .update_input(InputField::TransferToAddress, to)
                .await;
            controller
                .update_input(InputField::TransferAmount, amount)
                .await;
            controller.submit_transfer().await?;
        }
        Command::SetBankName { name } => {
            controller.update_input(InputField::BankName, name).await;
            controller.submit_bank_name().await?;
        }
    }
    Ok(())
}
