//! Scriptable in-memory wallet backed by a tiny simulated WavePortal.

use std::sync::Mutex;

use alloy::dyn_abi::{DynSolValue, FunctionExt};
use alloy::primitives::{Address, Bytes, B256, U256};

use crate::data::abi::ContractConfig;
use crate::data::error::{BridgeError, BridgeResult};
use crate::data::wallet::WalletProvider;

/// Deterministic test address filled with `byte`.
pub fn account(byte: u8) -> Address {
    Address::from_slice(&[byte; 20])
}

#[derive(Debug, Clone)]
pub struct SentTx {
    pub from: Address,
    pub to: Address,
    pub data: Bytes,
}

#[derive(Default)]
struct ChainState {
    accounts: Vec<Address>,
    requested: Vec<Address>,
    reject_requests: bool,
    total: u64,
    waves: Vec<(Address, u64, String)>,
    revert: bool,
    sent: Vec<SentTx>,
}

pub struct MockWallet {
    config: ContractConfig,
    state: Mutex<ChainState>,
}

impl MockWallet {
    /// A WavePortal variant whose `wave` takes no argument.
    pub const NO_ARG_WAVE_ABI: &'static str = r#"[
        {"type":"function","name":"wave","inputs":[],"outputs":[],"stateMutability":"nonpayable"},
        {"type":"function","name":"getTotalWaves","inputs":[],"outputs":[{"name":"","type":"uint256"}],"stateMutability":"view"}
    ]"#;

    pub fn new() -> Self {
        Self::from_config(ContractConfig::wave_portal(account(0xcc)))
    }

    pub fn with_abi(json: &str) -> Self {
        Self::from_config(ContractConfig::from_json(account(0xcc), json).unwrap())
    }

    fn from_config(config: ContractConfig) -> Self {
        Self {
            config,
            state: Mutex::new(ChainState::default()),
        }
    }

    pub fn with_accounts(self, accounts: Vec<Address>) -> Self {
        self.state.lock().unwrap().accounts = accounts;
        self
    }

    pub fn with_requested_accounts(self, accounts: Vec<Address>) -> Self {
        self.state.lock().unwrap().requested = accounts;
        self
    }

    pub fn rejecting_requests(self) -> Self {
        self.state.lock().unwrap().reject_requests = true;
        self
    }

    pub fn with_total(self, total: u64) -> Self {
        self.set_total(total);
        self
    }

    pub fn with_waves(self, waves: Vec<(Address, u64, &str)>) -> Self {
        self.set_waves(waves);
        self
    }

    /// Every mined transaction reverts.
    pub fn reverting(self) -> Self {
        self.state.lock().unwrap().revert = true;
        self
    }

    pub fn set_total(&self, total: u64) {
        self.state.lock().unwrap().total = total;
    }

    pub fn set_waves(&self, waves: Vec<(Address, u64, &str)>) {
        self.state.lock().unwrap().waves = waves
            .into_iter()
            .map(|(waver, ts, msg)| (waver, ts, msg.to_string()))
            .collect();
    }

    pub fn contract(&self) -> &ContractConfig {
        &self.config
    }

    pub fn sent(&self) -> Vec<SentTx> {
        self.state.lock().unwrap().sent.clone()
    }

    fn is_call_to(&self, data: &[u8], method: &str) -> bool {
        self.config
            .function(method)
            .map(|f| data.len() >= 4 && data[..4] == f.selector()[..])
            .unwrap_or(false)
    }

    fn encode_output(&self, method: &str, values: &[DynSolValue]) -> BridgeResult<Bytes> {
        let func = self.config.function(method)?;
        Ok(func.abi_encode_output(values)?.into())
    }

    fn wave_tuple(&self, waver: Address, ts: u64, message: &str) -> BridgeResult<DynSolValue> {
        let output = &self.config.function("getAllWaves")?.outputs[0];
        let fields = output
            .components
            .iter()
            .map(|c| match c.name.as_str() {
                "waver" => DynSolValue::Address(waver),
                "timestamp" => DynSolValue::Uint(U256::from(ts), 256),
                _ => DynSolValue::String(message.to_string()),
            })
            .collect();
        Ok(DynSolValue::Tuple(fields))
    }
}

impl WalletProvider for MockWallet {
    async fn accounts(&self) -> BridgeResult<Vec<Address>> {
        Ok(self.state.lock().unwrap().accounts.clone())
    }

    async fn request_accounts(&self) -> BridgeResult<Vec<Address>> {
        let mut state = self.state.lock().unwrap();
        if state.reject_requests {
            return Err(BridgeError::Rejected("user rejected the request".to_string()));
        }
        state.accounts = state.requested.clone();
        Ok(state.requested.clone())
    }

    async fn call(&self, to: Address, data: Bytes) -> BridgeResult<Bytes> {
        assert_eq!(to, self.config.address);
        let (total, waves) = {
            let state = self.state.lock().unwrap();
            (state.total, state.waves.clone())
        };

        if self.is_call_to(&data, "getTotalWaves") {
            self.encode_output("getTotalWaves", &[DynSolValue::Uint(U256::from(total), 256)])
        } else if self.is_call_to(&data, "getAllWaves") {
            let items = waves
                .iter()
                .map(|(waver, ts, msg)| self.wave_tuple(*waver, *ts, msg))
                .collect::<BridgeResult<Vec<_>>>()?;
            self.encode_output("getAllWaves", &[DynSolValue::Array(items)])
        } else {
            Err(BridgeError::Decode("mock: unsupported read".to_string()))
        }
    }

    async fn send_transaction(&self, from: Address, to: Address, data: Bytes) -> BridgeResult<B256> {
        let is_wave = self.is_call_to(&data, "wave");
        let mut state = self.state.lock().unwrap();
        if !state.revert && is_wave {
            state.total += 1;
        }
        state.sent.push(SentTx { from, to, data });
        let nonce = state.sent.len() as u8;
        Ok(B256::repeat_byte(nonce))
    }

    async fn wait_for_receipt(&self, _tx_hash: B256) -> BridgeResult<bool> {
        Ok(!self.state.lock().unwrap().revert)
    }
}
