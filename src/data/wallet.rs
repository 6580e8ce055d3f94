use std::future::Future;
use std::time::Duration;

use alloy::primitives::{Address, Bytes, B256};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use color_eyre::eyre::Result;

use crate::data::error::{BridgeError, BridgeResult};

/// How often to ask for a receipt while waiting for a transaction to be mined.
const RECEIPT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// EIP-1193 "user rejected the request".
const USER_REJECTED_CODE: i64 = 4001;

/// The account-holding wallet the UI talks to.
///
/// The wallet owns the keys: it answers which accounts the user has
/// authorized, prompts for authorization, and signs and broadcasts
/// transactions on the user's behalf.
pub trait WalletProvider: Send + Sync + 'static {
    /// Accounts the user has already authorized (`eth_accounts`).
    fn accounts(&self) -> impl Future<Output = BridgeResult<Vec<Address>>> + Send;

    /// Ask the user to authorize accounts (`eth_requestAccounts`).
    fn request_accounts(&self) -> impl Future<Output = BridgeResult<Vec<Address>>> + Send;

    /// Execute a read-only call against the latest state (`eth_call`).
    fn call(&self, to: Address, data: Bytes) -> impl Future<Output = BridgeResult<Bytes>> + Send;

    /// Have the wallet sign and broadcast a transaction from `from`.
    /// Resolves to the transaction hash as soon as it is accepted.
    fn send_transaction(
        &self,
        from: Address,
        to: Address,
        data: Bytes,
    ) -> impl Future<Output = BridgeResult<B256>> + Send;

    /// Wait until the transaction is mined. Resolves to the receipt status.
    fn wait_for_receipt(&self, tx_hash: B256) -> impl Future<Output = BridgeResult<bool>> + Send;
}

/// A wallet reached over JSON-RPC: a node or wallet daemon that manages
/// unlocked accounts and signs `eth_sendTransaction` requests itself.
pub struct RpcWallet {
    provider: Box<dyn Provider + Send + Sync>,
    chain_id: u64,
}

impl RpcWallet {
    /// Connect to a wallet endpoint via HTTP RPC.
    pub async fn connect(rpc_url: &str) -> Result<Self> {
        let url = rpc_url.parse()?;
        let provider = ProviderBuilder::new().on_http(url);
        let chain_id = provider.get_chain_id().await?;
        Ok(Self {
            provider: Box::new(provider),
            chain_id,
        })
    }

    /// Return the chain ID obtained at connection time.
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }
}

impl WalletProvider for RpcWallet {
    async fn accounts(&self) -> BridgeResult<Vec<Address>> {
        let accounts = self.provider.get_accounts().await?;
        Ok(accounts)
    }

    async fn request_accounts(&self) -> BridgeResult<Vec<Address>> {
        let accounts: Vec<Address> = self
            .provider
            .client()
            .request_noparams("eth_requestAccounts")
            .await
            .map_err(|e| match e.as_error_resp() {
                Some(payload) if payload.code == USER_REJECTED_CODE => {
                    BridgeError::Rejected(payload.message.to_string())
                }
                _ => BridgeError::from(e),
            })?;
        Ok(accounts)
    }

    async fn call(&self, to: Address, data: Bytes) -> BridgeResult<Bytes> {
        let tx = TransactionRequest::default().to(to).input(data.into());
        let output = self.provider.call(tx).await?;
        Ok(output)
    }

    async fn send_transaction(&self, from: Address, to: Address, data: Bytes) -> BridgeResult<B256> {
        let tx = TransactionRequest::default()
            .from(from)
            .to(to)
            .input(data.into());
        let pending = self.provider.send_transaction(tx).await?;
        Ok(*pending.tx_hash())
    }

    async fn wait_for_receipt(&self, tx_hash: B256) -> BridgeResult<bool> {
        loop {
            if let Some(receipt) = self.provider.get_transaction_receipt(tx_hash).await? {
                return Ok(receipt.status());
            }
            tokio::time::sleep(RECEIPT_POLL_INTERVAL).await;
        }
    }
}
