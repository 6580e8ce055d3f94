use alloy::primitives::{Address, U256};

use crate::data::types::WaveRecord;

/// Things the user can ask the portal to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Connect,
    Wave,
    AddFriend,
    RemoveFriend,
    RefreshWaves,
}

/// Events sent from background data tasks (and components) to the main app loop
#[derive(Debug)]
pub enum AppEvent {
    // Wallet
    ProviderConnected(u64), // chain_id
    AccountConnected(Address),
    WalletMissing,

    // Contract reads
    TotalWaves(U256),
    WavesLoaded(Vec<WaveRecord>),

    // Transactions
    TxPending(&'static str),
    TxSettled(&'static str),

    // User input
    Action(Action),
}
