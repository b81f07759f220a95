use rust_decimal::Decimal;
use thiserror::Error;

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("RPC error: {0}")]
    Rpc(#[from] solana_client::client_error::ClientError),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Amount is not a number: {0}")]
    UnparsableAmount(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(#[from] zipline_sdk::AmountError),

    #[error("Amount exceeds balance: {requested} requested, {available} available")]
    AmountExceedsBalance {
        requested: Decimal,
        available: Decimal,
    },

    #[error("Insufficient balance: {required} base units required, {available} available")]
    InsufficientBalance { required: u64, available: u64 },

    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("Invalid account data: {0}")]
    InvalidAccountData(String),

    #[error("Transaction construction failed: {0}")]
    TransactionConstruction(#[from] zipline_sdk::TransactionBuilderError),

    #[error("Transaction simulation failed: {0}")]
    SimulationFailed(String),

    #[error("Signing failed: {0}")]
    Signing(#[from] solana_sdk::signer::SignerError),

    #[error("A submission is already in flight")]
    SubmissionInProgress,
}
