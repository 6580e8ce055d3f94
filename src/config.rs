use std::path::PathBuf;

use alloy::primitives::Address;
use clap::{Parser, ValueEnum};

use crate::data::abi::DEFAULT_CONTRACT_ADDRESS;

/// Which of the two portal pages to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Variant {
    /// Counter and a plain wave button
    Basic,
    /// Message box, friend buttons and the wave log
    Full,
}

impl Variant {
    pub fn has_message(self) -> bool {
        self == Variant::Full
    }

    pub fn has_friends(self) -> bool {
        self == Variant::Full
    }

    pub fn has_wave_log(self) -> bool {
        self == Variant::Full
    }
}

#[derive(Parser, Debug)]
#[command(name = "wave-portal", about = "Wave at a WavePortal contract from the terminal")]
pub struct Config {
    /// Wallet JSON-RPC endpoint; without one the portal runs read-less and disabled
    #[arg(short, long, env = "WAVE_PORTAL_RPC_URL")]
    pub rpc_url: Option<String>,

    /// WavePortal contract address
    #[arg(long, env = "WAVE_PORTAL_CONTRACT", default_value_t = DEFAULT_CONTRACT_ADDRESS)]
    pub contract: Address,

    /// Contract ABI (bare array or compiler artifact); defaults to the bundled WavePortal ABI
    #[arg(long)]
    pub abi: Option<PathBuf>,

    /// Portal layout
    #[arg(long, value_enum, default_value_t = Variant::Full)]
    pub variant: Variant,

    /// Interval in milliseconds between contract polls
    #[arg(long, default_value = "2000")]
    pub poll_interval_ms: u64,

    /// Tick rate in milliseconds for UI refresh
    #[arg(long, default_value = "100")]
    pub tick_rate_ms: u64,

    /// Log file (defaults to the user cache directory)
    #[arg(long, env = "WAVE_PORTAL_LOG")]
    pub log_file: Option<PathBuf>,
}

impl Config {
    /// Explicit `--log-file`, else `<cache dir>/wave-portal/wave-portal.log`.
    pub fn log_file_path(&self) -> Option<PathBuf> {
        self.log_file.clone().or_else(|| {
            dirs::cache_dir().map(|dir| dir.join("wave-portal").join("wave-portal.log"))
        })
    }
}
