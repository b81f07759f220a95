use std::path::PathBuf;
use std::str::FromStr;

use solana_sdk::{
    pubkey::Pubkey,
    signature::{read_keypair_file, Keypair},
    signer::Signer,
};

use crate::error::{CliError, CliResult};

/// Public devnet RPC. Serves chain RPC only; compressed reads against it
/// degrade to zero, so point ZIPLINE_RPC_URL at a compression-aware provider
/// for real compressed balances.
pub const DEFAULT_RPC_URL: &str = "https://api.devnet.solana.com";

/// Default Solana CLI keypair location.
pub fn default_keypair_path() -> CliResult<PathBuf> {
    let home = std::env::var_os("HOME")
        .ok_or_else(|| CliError::Keypair("HOME is not set; pass --keypair".to_string()))?;
    Ok(PathBuf::from(home).join(".config/solana/id.json"))
}

pub fn load_keypair(path: Option<PathBuf>) -> CliResult<Keypair> {
    let path = match path {
        Some(path) => path,
        None => default_keypair_path()?,
    };
    read_keypair_file(&path)
        .map_err(|e| CliError::Keypair(format!("{}: {}", path.display(), e)))
}

/// The wallet address a read command targets: an explicit `--owner` address
/// wins, otherwise the keypair's own address.
pub fn resolve_owner(owner: Option<String>, keypair: Option<PathBuf>) -> CliResult<Pubkey> {
    match owner {
        Some(address) => {
            Pubkey::from_str(&address).map_err(|_| CliError::InvalidAddress(address))
        }
        None => Ok(load_keypair(keypair)?.pubkey()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_owner_wins_without_keypair() {
        let address = Pubkey::new_unique();
        let resolved = resolve_owner(Some(address.to_string()), None).unwrap();
        assert_eq!(resolved, address);
    }

    #[test]
    fn test_malformed_owner_rejected() {
        assert!(matches!(
            resolve_owner(Some("garbage".to_string()), None),
            Err(CliError::InvalidAddress(_))
        ));
    }
}
