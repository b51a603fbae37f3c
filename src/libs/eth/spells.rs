//! High level convenience functions for working against a node.
//! Whereas the [`crate::libs::eth::client::NodeClient`] exposes low
//! level RPC calls, these helpers perform whole demo tasks: reading an
//! account's standing or moving value between test accounts.

use alloy::consensus::{SignableTransaction, TxEnvelope, TxLegacy};
use alloy::eips::eip2718::Encodable2718;
use alloy::network::TxSignerSync;
use alloy::primitives::{Address, Bytes, TxKind, B256, U256};
use alloy::signers::local::PrivateKeySigner;
use anyhow::Result;

use crate::constants::TRANSFER_GAS_LIMIT;
use crate::libs::units;

use super::client::{BlockRef, ChainReader, ClientError, NodeClient};

/// One account's standing at the chain head.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountReport {
    pub address: Address,
    pub block_number: u64,
    pub balance_wei: U256,
    pub balance_eth: String,
}

/// Query the on-chain balance of an address. The supplied client must
/// already be connected to a JSON-RPC endpoint. This simply delegates
/// to [`NodeClient::get_balance_at`] at the head and propagates any
/// errors.
pub async fn get_balance(client: &NodeClient, address: Address) -> Result<U256> {
    let balance = client.get_balance_at(address, BlockRef::Latest).await?;
    Ok(balance)
}

/// Fetch the chain head and the balance of `address` there, rendered
/// for display. The whole read path of the balance demo in one call;
/// the first failing query aborts the report.
pub async fn check<C: ChainReader>(
    client: &C,
    address: Address,
) -> Result<AccountReport, ClientError> {
    let head = client.latest_block().await?;
    let balance_wei = client.balance_at(address, BlockRef::Latest).await?;
    Ok(AccountReport {
        address,
        block_number: head.number_u64(),
        balance_wei,
        balance_eth: units::wei_to_eth(balance_wei),
    })
}

/// Send `value` wei from the signer's account to `to` as a plain legacy
/// value transfer. Nonce, gas price and chain id come from the node,
/// the signature from alloy. Returns the hash the node acknowledged;
/// the receipt is not awaited.
pub async fn transfer(
    client: &NodeClient,
    signer: &PrivateKeySigner,
    to: Address,
    value: U256,
) -> Result<B256, ClientError> {
    let from = signer.address();
    let nonce = client.transaction_count(from, BlockRef::Latest).await?;
    let gas_price = client.gas_price().await?;
    let chain_id = client.chain_id().await?;

    let mut tx = TxLegacy {
        chain_id: Some(chain_id),
        nonce,
        gas_price: gas_price.saturating_to::<u128>(),
        gas_limit: TRANSFER_GAS_LIMIT,
        to: TxKind::Call(to),
        value,
        input: Bytes::new(),
    };
    let signature = signer
        .sign_transaction_sync(&mut tx)
        .map_err(|e| ClientError::Signing(e.to_string()))?;
    let raw = TxEnvelope::Legacy(tx.into_signed(signature)).encoded_2718();

    client.send_raw_transaction(&raw).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::eth::client::{parse_address, BlockHeader};
    use alloy::primitives::{B256, U64};

    /// Stand-in node: a fixed head and one balance for every account,
    /// enough to drive the read path deterministically.
    struct MockChain {
        head: u64,
        balance: U256,
    }

    impl ChainReader for MockChain {
        async fn latest_block(&self) -> Result<BlockHeader, ClientError> {
            Ok(BlockHeader {
                number: U64::from(self.head),
                hash: B256::ZERO,
                parent_hash: B256::ZERO,
                timestamp: U64::from(1_700_000_000u64),
            })
        }

        async fn balance_at(
            &self,
            _address: Address,
            _block: BlockRef,
        ) -> Result<U256, ClientError> {
            Ok(self.balance)
        }
    }

    struct DownChain;

    impl ChainReader for DownChain {
        async fn latest_block(&self) -> Result<BlockHeader, ClientError> {
            Err(ClientError::Connection {
                url: "http://localhost:8545".to_string(),
                reason: "connection refused".to_string(),
            })
        }

        async fn balance_at(
            &self,
            _address: Address,
            _block: BlockRef,
        ) -> Result<U256, ClientError> {
            Err(ClientError::Rpc {
                method: "eth_getBalance".to_string(),
                message: "connection refused".to_string(),
            })
        }
    }

    fn one_ether() -> U256 {
        U256::from(10u64).pow(U256::from(18u64))
    }

    #[tokio::test]
    async fn report_carries_head_and_balance_through() {
        let chain = MockChain {
            head: 42,
            balance: one_ether(),
        };
        let addr = parse_address("0x0cd6f40fBceb4947749603cC069ed16D07FC548b").unwrap();

        let report = check(&chain, addr).await.unwrap();
        assert_eq!(report.address, addr);
        assert_eq!(report.block_number, 42);
        assert_eq!(report.balance_wei, one_ether());
        assert_eq!(report.balance_eth, "1");
    }

    #[tokio::test]
    async fn empty_account_reports_zero() {
        let chain = MockChain {
            head: 1,
            balance: U256::ZERO,
        };
        let addr = parse_address("0x0cd6f40fBceb4947749603cC069ed16D07FC548b").unwrap();

        let report = check(&chain, addr).await.unwrap();
        assert_eq!(report.balance_wei, U256::ZERO);
        assert_eq!(report.balance_eth, "0");
    }

    #[tokio::test]
    async fn unreachable_node_aborts_the_report() {
        let addr = parse_address("0x0cd6f40fBceb4947749603cC069ed16D07FC548b").unwrap();
        let err = check(&DownChain, addr).await.unwrap_err();
        assert!(matches!(err, ClientError::Connection { .. }));
    }
}
