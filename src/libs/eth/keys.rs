//! Key material helpers: keystore files and raw hex keys, both ending
//! in a [`PrivateKeySigner`].

use std::path::Path;

use alloy::signers::local::PrivateKeySigner;
use anyhow::{Context, Result};

use super::client::ClientError;

/// Decrypt a Web3 secret storage keystore file into a signer. A wrong
/// passphrase and a corrupt file both land in
/// [`ClientError::Decryption`]; the underlying message says which.
pub fn decrypt_keystore(
    path: impl AsRef<Path>,
    password: &str,
) -> Result<PrivateKeySigner, ClientError> {
    PrivateKeySigner::decrypt_keystore(path, password)
        .map_err(|e| ClientError::Decryption(e.to_string()))
}

/// Create a fresh account: generate a key, encrypt it under `password`
/// and write the keystore JSON into `dir`. Returns the signer together
/// with the file name it was stored under.
pub fn generate_account(
    dir: impl AsRef<Path>,
    password: &str,
) -> Result<(PrivateKeySigner, String)> {
    let mut rng = rand::thread_rng();
    PrivateKeySigner::new_keystore(dir.as_ref(), &mut rng, password, None)
        .with_context(|| format!("failed to write keystore under {}", dir.as_ref().display()))
}

/// Parse a hex encoded 32-byte private key; test chains hand these out
/// at startup. The parse failure detail is dropped so the raw key never
/// echoes back through an error message.
pub fn signer_from_hex(hex_key: &str) -> Result<PrivateKeySigner, ClientError> {
    hex_key
        .trim()
        .parse::<PrivateKeySigner>()
        .map_err(|_| ClientError::Signing("key did not contain a valid hex encoded secret".into()))
}
