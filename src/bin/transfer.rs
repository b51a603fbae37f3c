//! Moves a little ether between the two test accounts named by
//! `PRIVKEY1HEX` and `PRIVKEY2HEX`, printing balances before and after
//! the broadcast. Meant to run against a local test chain.

use alloy::primitives::utils::parse_units;
use alloy::primitives::U256;
use anyhow::{Context, Result};

use ethcheck::libs::config::{load_env, Config};
use ethcheck::libs::eth::client::NodeClient;
use ethcheck::libs::eth::{keys, spells};
use ethcheck::libs::units;
use ethcheck::libs::writing::cc;
use ethcheck::log;

/// Parse a human ether amount ("0.001") into wei.
fn ether_to_wei(amount: &str) -> Result<U256> {
    let parsed =
        parse_units(amount, "ether").with_context(|| format!("bad ETH_AMOUNT `{amount}`"))?;
    Ok(parsed.into())
}

#[tokio::main]
async fn main() -> Result<()> {
    load_env();
    let cfg = Config::from_env();

    let sender = keys::signer_from_hex(cfg.privkey1()?)?;
    let recipient = keys::signer_from_hex(cfg.privkey2()?)?.address();

    let amount = std::env::var("ETH_AMOUNT").unwrap_or_else(|_| "0.001".to_string());
    let value = ether_to_wei(&amount)?;

    let client = NodeClient::connect(&cfg.node_url)?;
    log!(cc::CYAN, "node: {}", client.url());

    let gas_price = client.gas_price().await?;
    log!(
        cc::LIGHT_GRAY,
        "gas price: {} gwei",
        units::to_major_units(gas_price, units::GWEI_DECIMALS)
    );

    let sender_wei = spells::get_balance(&client, sender.address()).await?;
    let recipient_wei = spells::get_balance(&client, recipient).await?;
    log!(
        cc::LIGHT_GREEN,
        "sender {} holds {} ETH",
        sender.address(),
        units::wei_to_eth(sender_wei)
    );
    log!(
        cc::LIGHT_GREEN,
        "recipient {} holds {} ETH",
        recipient,
        units::wei_to_eth(recipient_wei)
    );

    let hash = spells::transfer(&client, &sender, recipient, value).await?;
    log!(cc::LIGHT_GREEN, "sent {amount} ETH, tx {hash}");

    Ok(())
}
