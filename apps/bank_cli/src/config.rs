use std::{fs, path::Path};

use alloy_primitives::Address;
use anyhow::Context;
use serde::Deserialize;
use shared::DEFAULT_CONTRACT_ADDRESS;
use tracing::warn;
use url::Url;

pub const SETTINGS_FILE: &str = "bank.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// JSON-RPC endpoint of the wallet provider; `None` means no wallet is installed.
    pub rpc_url: Option<String>,
    pub contract_address: String,
    pub confirmation_poll_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            rpc_url: None,
            contract_address: DEFAULT_CONTRACT_ADDRESS.into(),
            confirmation_poll_ms: 1000,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    rpc_url: Option<String>,
    contract_address: Option<String>,
    confirmation_poll_ms: Option<u64>,
}

impl Settings {
    pub fn rpc_url(&self) -> anyhow::Result<Option<Url>> {
        self.rpc_url
            .as_deref()
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .map(|raw| Url::parse(raw).with_context(|| format!("invalid rpc url '{raw}'")))
            .transpose()
    }

    pub fn contract_address(&self) -> anyhow::Result<Address> {
        self.contract_address
            .trim()
            .parse()
            .with_context(|| format!("invalid contract address '{}'", self.contract_address))
    }
}

pub fn load_settings() -> Settings {
    load_settings_from(Path::new(SETTINGS_FILE), |key| std::env::var(key).ok())
}

/// Defaults, then the settings file, then environment variables.
pub fn load_settings_from(path: &Path, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        match toml::from_str::<FileSettings>(&raw) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.rpc_url {
                    settings.rpc_url = Some(v);
                }
                if let Some(v) = file_cfg.contract_address {
                    settings.contract_address = v;
                }
                if let Some(v) = file_cfg.confirmation_poll_ms {
                    settings.confirmation_poll_ms = v;
                }
            }
            Err(err) => warn!(path = %path.display(), error = %err, "config: ignoring unreadable settings file"),
        }
    }

    if let Some(v) = env("BANK_RPC_URL") {
        settings.rpc_url = Some(v);
    }
    if let Some(v) = env("APP__RPC_URL") {
        settings.rpc_url = Some(v);
    }

    if let Some(v) = env("APP__CONTRACT_ADDRESS") {
        settings.contract_address = v;
    }

    if let Some(v) = env("APP__CONFIRMATION_POLL_MS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.confirmation_poll_ms = parsed;
        }
    }

    settings
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
