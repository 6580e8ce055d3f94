mod app;
mod components;
mod config;
mod data;
mod events;
mod logging;
mod theme;
mod utils;

use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::Result;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::app::App;
use crate::config::Config;
use crate::data::abi::ContractConfig;
use crate::data::wallet::RpcWallet;
use crate::data::Bridge;
use crate::events::AppEvent;
use crate::logging::LogBuffer;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let config = Config::parse();

    let log_buffer = LogBuffer::new();
    logging::init(log_buffer.clone(), config.log_file_path().as_deref())?;

    let contract = match config.abi {
        Some(ref path) => ContractConfig::load(config.contract, path)?,
        None => ContractConfig::wave_portal(config.contract),
    };
    info!(address = %contract.address, variant = ?config.variant, "Using WavePortal contract");

    // Create event channel
    let (event_tx, event_rx) = mpsc::unbounded_channel();

    // An unreachable wallet is treated the same as no wallet at all
    let wallet = match config.rpc_url {
        Some(ref rpc_url) => match RpcWallet::connect(rpc_url).await {
            Ok(wallet) => {
                info!(rpc_url, chain_id = wallet.chain_id(), "Wallet provider connected");
                let _ = event_tx.send(AppEvent::ProviderConnected(wallet.chain_id()));
                Some(wallet)
            }
            Err(e) => {
                warn!(rpc_url, error = %e, "Wallet provider unreachable");
                None
            }
        },
        None => None,
    };

    let bridge = Arc::new(Bridge::new(wallet, contract, event_tx));
    let mut app = App::new(bridge, event_rx, log_buffer, &config);

    let terminal = ratatui::init();
    let result = app.run(terminal).await;
    ratatui::restore();

    result
}
