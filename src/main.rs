use alloy::primitives::Address;
use anyhow::Result;

use ethcheck::libs::config::{load_env, Config};
use ethcheck::libs::eth::client::{parse_address, NodeClient};
use ethcheck::libs::eth::{keys, spells};
use ethcheck::libs::units;
use ethcheck::libs::writing::cc;
use ethcheck::{log, warn};

/// Account watched when no address argument is given.
const WATCH_ADDRESS: &str = "0x0cd6f40fBceb4947749603cC069ed16D07FC548b";

#[tokio::main]
async fn main() -> Result<()> {
    load_env();
    let cfg = Config::from_env();

    let watch: Address = match std::env::args().nth(1) {
        Some(arg) => parse_address(&arg)?,
        None => parse_address(WATCH_ADDRESS)?,
    };

    let client = NodeClient::connect(&cfg.node_url)?;
    log!(cc::CYAN, "node: {}", client.url());

    let report = spells::check(&client, watch).await?;
    log!(cc::LIGHT_GREEN, "latest block: {}", report.block_number);
    log!(cc::LIGHT_GREEN, "account: {}", report.address);
    log!(cc::LIGHT_GREEN, "balance (wei): {}", report.balance_wei);
    log!(cc::LIGHT_GREEN, "balance (ETH): {}", report.balance_eth);

    // The keystore leg only runs when both inputs are configured.
    match (&cfg.keystore_path, &cfg.password) {
        (Some(path), Some(password)) => {
            let signer = keys::decrypt_keystore(path, password)?;
            let account = signer.address();
            let balance = spells::get_balance(&client, account).await?;
            log!(cc::LIGHT_BLUE, "keystore account: {account}");
            log!(cc::LIGHT_BLUE, "keystore balance (wei): {}", balance);
            log!(cc::LIGHT_BLUE, "keystore balance (ETH): {}", units::wei_to_eth(balance));
        }
        _ => warn!("KEYSTORE_PATH/PASSWORD not set, skipping the keystore account"),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethcheck::libs::eth::client::ChainReader;

    // These hit whatever INFURA_URL points at, so they stay ignored;
    // run them against a local test chain with `cargo test -- --ignored`.

    #[tokio::test]
    #[ignore]
    async fn live_check_watch_address() -> Result<()> {
        load_env();
        let cfg = Config::from_env();
        let client = NodeClient::connect(&cfg.node_url)?;
        let report = spells::check(&client, parse_address(WATCH_ADDRESS)?).await?;
        log!(cc::LIGHT_GREEN, "block {} balance {}", report.block_number, report.balance_eth);
        assert!(!report.balance_eth.is_empty());
        Ok(())
    }

    #[tokio::test]
    #[ignore]
    async fn live_head_and_chain_id_agree_with_node() -> Result<()> {
        load_env();
        let cfg = Config::from_env();
        let client = NodeClient::connect(&cfg.node_url)?;
        let chain_id = client.chain_id().await?;
        let head = client.latest_block().await?;
        log!(cc::LIGHT_GREEN, "chain {} head {}", chain_id, head.number_u64());
        assert!(chain_id > 0);
        Ok(())
    }
}
