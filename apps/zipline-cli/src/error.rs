use thiserror::Error;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Client(#[from] zipline_client::ClientError),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Failed to load keypair: {0}")]
    Keypair(String),
}
