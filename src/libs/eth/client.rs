//! The [`NodeClient`] type encapsulates a connection to an Ethereum
//! compatible node and exposes a small set of async helpers implemented
//! over plain JSON-RPC using `reqwest`. Alloy is only used for types
//! and key handling; the transport stays a single HTTP POST per call so
//! failures map one to one onto [`ClientError`] variants.

use std::time::Duration;

use alloy::primitives::{Address, B256, U256, U64};
use reqwest::Client as HttpClient;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use url::Url;

use crate::constants::RPC_TIMEOUT_SECS;

/// Everything that can go wrong while talking to a node or handling
/// key material. The demos treat each of these as fatal and let the
/// message explain itself.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("node unreachable at {url}: {reason}")]
    Connection { url: String, reason: String },

    #[error("rpc `{method}` failed: {message}")]
    Rpc { method: String, message: String },

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("keystore decryption failed: {0}")]
    Decryption(String),

    #[error("signing failed: {0}")]
    Signing(String),
}

impl ClientError {
    fn rpc(method: &str, message: impl Into<String>) -> Self {
        Self::Rpc {
            method: method.to_string(),
            message: message.into(),
        }
    }
}

/// Parse a 20-byte hex address. Accepts checksummed and all-lowercase
/// forms; anything else comes back as [`ClientError::InvalidAddress`].
pub fn parse_address(s: &str) -> Result<Address, ClientError> {
    s.trim()
        .parse::<Address>()
        .map_err(|e| ClientError::InvalidAddress(format!("`{s}`: {e}")))
}

/// A block to query: the chain head or an explicit height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockRef {
    #[default]
    Latest,
    Number(u64),
}

impl BlockRef {
    /// The JSON-RPC block parameter for this reference, either the
    /// `"latest"` tag or a hex encoded quantity.
    pub fn as_tag(&self) -> String {
        match self {
            BlockRef::Latest => "latest".to_string(),
            BlockRef::Number(n) => format!("{n:#x}"),
        }
    }
}

/// The header fields of an `eth_getBlockByNumber` response that the
/// demos report on. Quantities arrive as hex strings and deserialize
/// through the alloy integer types; everything else in the response is
/// ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockHeader {
    pub number: U64,
    pub hash: B256,
    pub parent_hash: B256,
    pub timestamp: U64,
}

impl BlockHeader {
    pub fn number_u64(&self) -> u64 {
        self.number.to::<u64>()
    }
}

/// Read only view of a chain: the two queries every demo needs. The
/// JSON-RPC [`NodeClient`] implements it against a live node; tests
/// substitute a deterministic stand-in.
#[allow(async_fn_in_trait)]
pub trait ChainReader {
    /// Header of the most recently mined block.
    async fn latest_block(&self) -> Result<BlockHeader, ClientError>;

    /// Balance of `address` at `block`, in the chain's smallest unit.
    async fn balance_at(&self, address: Address, block: BlockRef) -> Result<U256, ClientError>;
}

/// A high level client for an Ethereum compatible node via JSON-RPC.
/// Construction only validates the endpoint; the node itself is not
/// contacted until the first call, so a dead endpoint surfaces as a
/// [`ClientError::Connection`] from whichever query runs first.
#[derive(Clone, Debug)]
pub struct NodeClient {
    rpc_url: Url,
    http: HttpClient,
}

impl NodeClient {
    /// Parse `rpc_url` and build the HTTP transport with the configured
    /// request timeout.
    pub fn connect(rpc_url: &str) -> Result<Self, ClientError> {
        let url = Url::parse(rpc_url).map_err(|e| ClientError::Connection {
            url: rpc_url.to_string(),
            reason: format!("not a valid endpoint url: {e}"),
        })?;
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(*RPC_TIMEOUT_SECS))
            .build()
            .map_err(|e| ClientError::Connection {
                url: rpc_url.to_string(),
                reason: e.to_string(),
            })?;
        Ok(Self { rpc_url: url, http })
    }

    pub fn url(&self) -> &Url {
        &self.rpc_url
    }

    /// Return the numeric chain identifier of the remote node
    /// (`eth_chainId`). Mainnet answers `1`, local test chains usually
    /// `1337` or `31337`.
    pub async fn chain_id(&self) -> Result<u64, ClientError> {
        let res = self.rpc("eth_chainId", serde_json::json!([])).await?;
        let hex = res
            .as_str()
            .ok_or_else(|| ClientError::rpc("eth_chainId", "result is not a string"))?;
        u64::from_str_radix(hex.trim_start_matches("0x"), 16)
            .map_err(|e| ClientError::rpc("eth_chainId", format!("bad quantity `{hex}`: {e}")))
    }

    /// Issue an arbitrary JSON-RPC call and receive a `serde_json::Value`
    /// as the response. This helper reaches methods without a strongly
    /// typed wrapper; parameters must correspond exactly to what the
    /// node expects.
    pub async fn raw_call(&self, method: &str, params: Vec<Value>) -> Result<Value, ClientError> {
        self.rpc(method, Value::Array(params)).await
    }

    /// Get a block header by number or tag (`eth_getBlockByNumber`,
    /// transaction hashes only). A null result means the node has never
    /// seen that block and is reported as an rpc failure rather than an
    /// empty header.
    pub async fn get_block_by_number(&self, block: BlockRef) -> Result<BlockHeader, ClientError> {
        let res = self
            .rpc(
                "eth_getBlockByNumber",
                serde_json::json!([block.as_tag(), false]),
            )
            .await?;
        if res.is_null() {
            return Err(ClientError::rpc(
                "eth_getBlockByNumber",
                format!("block {} not found", block.as_tag()),
            ));
        }
        serde_json::from_value(res)
            .map_err(|e| ClientError::rpc("eth_getBlockByNumber", format!("bad header: {e}")))
    }

    /// Convenience wrapper around `eth_getBalance`. Yields the balance
    /// of `address` at `block` as a [`U256`] in wei; see
    /// [`crate::libs::units::wei_to_eth`] for rendering it.
    pub async fn get_balance_at(
        &self,
        address: Address,
        block: BlockRef,
    ) -> Result<U256, ClientError> {
        let res = self
            .rpc(
                "eth_getBalance",
                serde_json::json!([address, block.as_tag()]),
            )
            .await?;
        Self::quantity("eth_getBalance", &res)
    }

    /// Current gas price in wei (`eth_gasPrice`).
    pub async fn gas_price(&self) -> Result<U256, ClientError> {
        let res = self.rpc("eth_gasPrice", serde_json::json!([])).await?;
        Self::quantity("eth_gasPrice", &res)
    }

    /// Transaction count of `address` at `block`, which doubles as the
    /// next nonce when queried at the head (`eth_getTransactionCount`).
    pub async fn transaction_count(
        &self,
        address: Address,
        block: BlockRef,
    ) -> Result<u64, ClientError> {
        let res = self
            .rpc(
                "eth_getTransactionCount",
                serde_json::json!([address, block.as_tag()]),
            )
            .await?;
        let count = Self::quantity("eth_getTransactionCount", &res)?;
        Ok(count.saturating_to::<u64>())
    }

    /// Broadcast a signed raw transaction (`eth_sendRawTransaction`)
    /// and return its hash. The node only acknowledges acceptance into
    /// its pool; inclusion in a block is not awaited here.
    pub async fn send_raw_transaction(&self, raw: &[u8]) -> Result<B256, ClientError> {
        let param = format!("0x{}", hex::encode(raw));
        let res = self
            .rpc("eth_sendRawTransaction", serde_json::json!([param]))
            .await?;
        let hash = res
            .as_str()
            .ok_or_else(|| ClientError::rpc("eth_sendRawTransaction", "result is not a string"))?;
        hash.parse::<B256>().map_err(|e| {
            ClientError::rpc("eth_sendRawTransaction", format!("bad tx hash `{hash}`: {e}"))
        })
    }

    /// Decode a hex quantity result into a [`U256`].
    fn quantity(method: &str, res: &Value) -> Result<U256, ClientError> {
        let hex_str = res
            .as_str()
            .ok_or_else(|| ClientError::rpc(method, "result is not a string"))?;
        let mut stripped = hex_str.trim_start_matches("0x");

        // Pad to even length if needed (RPC can return "0x0", "0x1", etc.)
        let padded;
        if stripped.len() % 2 == 1 {
            padded = format!("0{stripped}");
            stripped = &padded;
        }
        let bytes = hex::decode(stripped)
            .map_err(|e| ClientError::rpc(method, format!("bad quantity `{hex_str}`: {e}")))?;
        Ok(U256::from_be_slice(&bytes))
    }

    async fn rpc(&self, method: &str, params: Value) -> Result<Value, ClientError> {
        let body = serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });
        let res = self
            .http
            .post(self.rpc_url.as_str())
            .json(&body)
            .send()
            .await
            .map_err(|e| ClientError::Connection {
                url: self.rpc_url.to_string(),
                reason: e.to_string(),
            })?;
        let status = res.status();
        let bytes = res.bytes().await.map_err(|e| ClientError::Connection {
            url: self.rpc_url.to_string(),
            reason: e.to_string(),
        })?;
        // Try to decode JSON; if it fails, surface useful diagnostics
        let v: Value = match serde_json::from_slice(&bytes) {
            Ok(json) => json,
            Err(e) => {
                let mut sample = String::from_utf8_lossy(&bytes).to_string();
                if sample.len() > 512 {
                    sample.truncate(512);
                }
                // common provider misconfig: HTML/empty response or wrong endpoint (e.g. WSS passed as HTTP)
                let hint = if sample.trim_start().starts_with('<') {
                    "Response looks like HTML; INFURA_URL may be a gateway page or blocked. Ensure it is a plain JSON-RPC endpoint."
                } else if sample.trim().is_empty() {
                    "Empty body from RPC. Endpoint may be down or require authentication."
                } else {
                    "Non-JSON response from RPC."
                };
                return Err(ClientError::rpc(
                    method,
                    format!("decode error ({status}): {e}. {hint} Sample: {sample}"),
                ));
            }
        };
        if let Some(err) = v.get("error") {
            return Err(ClientError::rpc(method, err.to_string()));
        }
        Ok(v.get("result").cloned().unwrap_or(Value::Null))
    }
}

impl ChainReader for NodeClient {
    async fn latest_block(&self) -> Result<BlockHeader, ClientError> {
        self.get_block_by_number(BlockRef::Latest).await
    }

    async fn balance_at(&self, address: Address, block: BlockRef) -> Result<U256, ClientError> {
        self.get_balance_at(address, block).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_tags() {
        assert_eq!(BlockRef::Latest.as_tag(), "latest");
        assert_eq!(BlockRef::Number(0).as_tag(), "0x0");
        assert_eq!(BlockRef::Number(42).as_tag(), "0x2a");
    }

    #[test]
    fn header_decodes_from_rpc_shape() {
        let raw = serde_json::json!({
            "number": "0x2a",
            "hash": "0x88e96d4537bea4d9c05d12549907b32561d3bf31f45aae734cdc119f13406cb6",
            "parentHash": "0xd4e56740f876aef8c010b86a40d5f56745a118d0906a34e69aec8c0db1cb8fa3",
            "timestamp": "0x6553f100",
            "gasUsed": "0x0",
            "transactions": []
        });
        let header: BlockHeader = serde_json::from_value(raw).unwrap();
        assert_eq!(header.number_u64(), 42);
        assert_eq!(header.timestamp.to::<u64>(), 0x6553f100);
    }

    #[test]
    fn quantity_pads_odd_hex() {
        let q = |s: &str| NodeClient::quantity("test", &serde_json::json!(s)).unwrap();
        assert_eq!(q("0x0"), U256::ZERO);
        assert_eq!(q("0x1"), U256::from(1u64));
        assert_eq!(q("0xa3f"), U256::from(0xa3fu64));
        assert_eq!(q("0xde0b6b3a7640000"), U256::from(1_000_000_000_000_000_000u64));
    }

    #[test]
    fn quantity_rejects_garbage() {
        let err = NodeClient::quantity("test", &serde_json::json!("0xzz")).unwrap_err();
        assert!(matches!(err, ClientError::Rpc { .. }));
        let err = NodeClient::quantity("test", &serde_json::json!(12)).unwrap_err();
        assert!(matches!(err, ClientError::Rpc { .. }));
    }

    #[test]
    fn addresses_parse_or_reject() {
        assert!(parse_address("0x0cd6f40fBceb4947749603cC069ed16D07FC548b").is_ok());
        assert!(matches!(
            parse_address("0x123"),
            Err(ClientError::InvalidAddress(_))
        ));
        assert!(matches!(
            parse_address("not-an-address"),
            Err(ClientError::InvalidAddress(_))
        ));
    }

    #[test]
    fn addresses_round_trip_through_checksum_display() {
        // mixed-case form straight out of the EIP-55 test vectors
        let checksummed = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";

        let parsed = parse_address(checksummed).unwrap();
        assert_eq!(parsed.to_string(), checksummed);

        // casing is only a checksum, not part of the identity
        let from_lower = parse_address(&checksummed.to_lowercase()).unwrap();
        assert_eq!(from_lower, parsed);
        assert_eq!(from_lower.to_string(), checksummed);
    }

    #[test]
    fn parsed_address_matches_raw_bytes() {
        use hex_literal::hex;
        let parsed = parse_address("0x0cd6f40fBceb4947749603cC069ed16D07FC548b").unwrap();
        assert_eq!(
            parsed,
            Address::from(hex!("0cd6f40fbceb4947749603cc069ed16d07fc548b"))
        );
    }

    #[test]
    fn connect_rejects_bad_url() {
        assert!(matches!(
            NodeClient::connect("not a url"),
            Err(ClientError::Connection { .. })
        ));
    }
}
