use alloy::primitives::Address;
use chrono::{DateTime, Utc};

/// One entry of the contract's wave log, trimmed to what the UI shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaveRecord {
    pub address: Address,
    pub timestamp: DateTime<Utc>,
    pub message: String,
}
