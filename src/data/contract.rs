use std::sync::Arc;

use alloy::dyn_abi::{DynSolValue, FunctionExt, JsonAbiExt};
use alloy::primitives::{Address, B256, U256};
use tracing::debug;

use crate::data::abi::ContractConfig;
use crate::data::decoder::{format_sol_value, WaveDecoder};
use crate::data::error::{BridgeError, BridgeResult};
use crate::data::types::WaveRecord;
use crate::data::wallet::WalletProvider;

/// A signer-bound handle to the WavePortal contract.
///
/// Cheap to build and never cached: every action asks the bridge for a new
/// one. The signing account is resolved from the wallet at send time, so a
/// handle used only for reads never needs an authorized account.
pub struct WavePortal<W> {
    wallet: Arc<W>,
    config: ContractConfig,
}

impl<W> Clone for WavePortal<W> {
    fn clone(&self) -> Self {
        Self {
            wallet: Arc::clone(&self.wallet),
            config: self.config.clone(),
        }
    }
}

impl<W: WalletProvider> WavePortal<W> {
    pub fn new(wallet: Arc<W>, config: ContractConfig) -> Self {
        Self { wallet, config }
    }

    pub fn address(&self) -> Address {
        self.config.address
    }

    pub async fn get_total_waves(&self) -> BridgeResult<U256> {
        let output = self.read("getTotalWaves", &[]).await?;
        WaveDecoder::decode_count(&output)
    }

    pub async fn get_all_waves(&self) -> BridgeResult<Vec<WaveRecord>> {
        let output = self.read("getAllWaves", &[]).await?;
        if let Some(raw) = output.first() {
            debug!(raw = %format_sol_value(raw), "getAllWaves returned");
        }
        let func = self.config.function("getAllWaves")?;
        WaveDecoder::decode_waves(func, &output)
    }

    /// Submit `wave`. The message is attached only when the deployed
    /// interface takes one; a `wave(string)` called without a message gets
    /// an empty string.
    pub async fn wave(&self, message: Option<&str>) -> BridgeResult<B256> {
        let takes_message = !self.config.function("wave")?.inputs.is_empty();
        let args = if takes_message {
            vec![DynSolValue::String(message.unwrap_or_default().to_string())]
        } else {
            Vec::new()
        };
        self.send("wave", &args).await
    }

    pub async fn add_friend(&self) -> BridgeResult<B256> {
        self.send("addFriend", &[]).await
    }

    /// The deployed front-end sends `addFriend` here as well; the contract
    /// exposes no removal method we know of, so the same call goes out.
    pub async fn remove_friend(&self) -> BridgeResult<B256> {
        self.send("addFriend", &[]).await
    }

    /// Wait for `tx_hash` to be mined, failing if the receipt reports a revert.
    pub async fn wait_mined(&self, tx_hash: B256) -> BridgeResult<()> {
        if self.wallet.wait_for_receipt(tx_hash).await? {
            Ok(())
        } else {
            Err(BridgeError::Reverted(tx_hash))
        }
    }

    async fn read(&self, method: &str, args: &[DynSolValue]) -> BridgeResult<Vec<DynSolValue>> {
        let func = self.config.function(method)?;
        let calldata = func.abi_encode_input(args)?;
        let output = self.wallet.call(self.config.address, calldata.into()).await?;
        Ok(func.abi_decode_output(&output, true)?)
    }

    async fn send(&self, method: &str, args: &[DynSolValue]) -> BridgeResult<B256> {
        let func = self.config.function(method)?;
        let calldata = func.abi_encode_input(args)?;
        let from = self.signer().await?;
        self.wallet
            .send_transaction(from, self.config.address, calldata.into())
            .await
    }

    async fn signer(&self) -> BridgeResult<Address> {
        self.wallet
            .accounts()
            .await?
            .first()
            .copied()
            .ok_or(BridgeError::NoAccount)
    }
}
