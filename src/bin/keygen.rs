//! Creates a new account: a fresh key encrypted under `PASSWORD`,
//! written as keystore JSON where the balance demo can read it back
//! through `KEYSTORE_PATH`.

use anyhow::Result;

use ethcheck::libs::config::{load_env, Config};
use ethcheck::libs::eth::keys;
use ethcheck::libs::writing::cc;
use ethcheck::log;

const KEYSTORE_DIR: &str = "./keystore";

fn main() -> Result<()> {
    load_env();
    let cfg = Config::from_env();
    let password = cfg.password()?;

    std::fs::create_dir_all(KEYSTORE_DIR)?;
    let (signer, name) = keys::generate_account(KEYSTORE_DIR, password)?;

    log!(cc::LIGHT_GREEN, "new account: {}", signer.address());
    log!(cc::LIGHT_GREEN, "keystore file: {KEYSTORE_DIR}/{name}");
    Ok(())
}
