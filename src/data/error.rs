use alloy::primitives::B256;
use alloy::transports::TransportError;
use thiserror::Error;

/// Everything that can go wrong between the UI and the contract.
///
/// None of these ever reach the user: they are logged at the boundary of the
/// operation that produced them and the operation is abandoned.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("no wallet provider available")]
    ProviderMissing,

    #[error("wallet has no authorized account to sign with")]
    NoAccount,

    #[error("rpc request failed: {0}")]
    Transport(#[from] TransportError),

    #[error("transaction {0} reverted")]
    Reverted(B256),

    #[error("contract interface has no `{0}` function")]
    UnknownMethod(String),

    #[error("abi codec error: {0}")]
    Abi(#[from] alloy::dyn_abi::Error),

    #[error("unexpected contract data: {0}")]
    Decode(String),

    /// The wallet answered `eth_requestAccounts` with EIP-1193 error 4001:
    /// the user declined to authorize any account.
    #[error("wallet rejected the request: {0}")]
    Rejected(String),
}

pub type BridgeResult<T> = Result<T, BridgeError>;
