use {
    dotenv::dotenv,
    serde::{Deserialize, Serialize},
    std::{fmt::Debug, str::FromStr},
};

use anyhow::{Context, Result};

use crate::constants::DEFAULT_NODE_URL;

pub fn load_env() {
    dotenv().ok();
}

/// Everything the demos read from the environment, gathered up front so
/// each entry point works off one explicit value instead of probing
/// globals mid-run. Only the node endpoint has a default; the key
/// material fields stay `None` until the relevant demo asks for them.
#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    pub node_url: String,
    pub keystore_path: Option<String>,
    pub password: Option<String>,
    pub privkey1_hex: Option<String>,
    pub privkey2_hex: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            node_url: std::env::var("INFURA_URL")
                .unwrap_or_else(|_| DEFAULT_NODE_URL.to_string()),
            keystore_path: std::env::var("KEYSTORE_PATH").ok(),
            password: std::env::var("PASSWORD").ok(),
            privkey1_hex: std::env::var("PRIVKEY1HEX").ok(),
            privkey2_hex: std::env::var("PRIVKEY2HEX").ok(),
        }
    }

    /// Keystore passphrase, required by the keygen demo.
    pub fn password(&self) -> Result<&str> {
        self.password.as_deref().context("config.rs: PASSWORD is not set")
    }

    /// Sender key for the transfer demo; test chains print these at startup.
    pub fn privkey1(&self) -> Result<&str> {
        self.privkey1_hex
            .as_deref()
            .context("config.rs: PRIVKEY1HEX is not set")
    }

    /// Recipient key for the transfer demo.
    pub fn privkey2(&self) -> Result<&str> {
        self.privkey2_hex
            .as_deref()
            .context("config.rs: PRIVKEY2HEX is not set")
    }

    /// Parse env var to T; fall back to typed default.
    pub fn get_var_t<T>(key: &str, default: T) -> T
    where
        T: FromStr,
        <T as FromStr>::Err: Debug,
    {
        std::env::var(key)
            .ok()
            .and_then(|s| s.parse::<T>().ok())
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_var_t_falls_back_to_default() {
        assert_eq!(Config::get_var_t::<u64>("ETHCHECK_NO_SUCH_VAR", 7), 7);
    }
}
