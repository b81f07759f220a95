/*!
# Compression Program Addresses

Program IDs, PDAs, and instruction discriminators for the ZK-compression
programs this crate builds instructions against. The PDAs that never change
are precomputed; the derivation helpers exist for the per-mint pool accounts
and for verification in tests.
*/

use solana_sdk::{pubkey, pubkey::Pubkey};

/// Light system program (native SOL compression).
pub const LIGHT_SYSTEM_PROGRAM_ID: Pubkey = pubkey!("SySTEM1eSU2p4BGQfQpimFEWWSC1XDFeun3Nqzz3rT7");

/// Compressed token program (SPL token compression).
pub const COMPRESSED_TOKEN_PROGRAM_ID: Pubkey =
    pubkey!("cTokenmWW8bLPjZEBAUgYy3zKxQZW6VKi7bqNFEVv3m");

/// Account compression program (owns the state trees).
pub const ACCOUNT_COMPRESSION_PROGRAM_ID: Pubkey =
    pubkey!("compr6CUsB5m2jS4Y3831ztGSTnDpnKJTKS95d64XVq");

/// Noop program used to spool compressed-account state into the ledger.
pub const NOOP_PROGRAM_ID: Pubkey = pubkey!("noopb9bkMVfRPU8AsbpTUg8AQkHtKwMYZiFUjNRtMmV");

/// Registration PDA of the light system program with the account compression program.
pub const REGISTERED_PROGRAM_PDA: Pubkey = pubkey!("35hkDgaAKwMCaxRz2ocSZ6NaUrtKkyNqU6c4RV3tYJRh");

/// CPI authority of the light system program towards the account compression program.
pub const ACCOUNT_COMPRESSION_AUTHORITY_PDA: Pubkey =
    pubkey!("HwXnGK3tPkkVY6P439H2p68AxpeuWXd5PcrAxFpbmfbA");

/// Pool account holding lamports that back compressed SOL.
pub const SOL_POOL_PDA: Pubkey = pubkey!("CHK57ywWSDncAoRu1F8QgwYJeXuAJyyBYT4LixLXvMZ1");

/// CPI authority of the compressed token program.
pub const CPI_AUTHORITY_PDA: Pubkey = pubkey!("GXtd2izAiMJPwMEjfgTRH3d7k9mjn4Jq3JrWFv9gySYy");

pub const CPI_AUTHORITY_PDA_SEED: &[u8] = b"cpi_authority";
pub const SOL_POOL_PDA_SEED: &[u8] = b"sol_pool_pda";
pub const TOKEN_POOL_SEED: &[u8] = b"pool";

/// Anchor discriminator of the light system program `invoke` instruction.
pub const INVOKE_DISCRIMINATOR: [u8; 8] = [26, 16, 169, 7, 21, 202, 242, 25];

/// Anchor discriminator of the compressed token program `transfer` instruction.
pub const TRANSFER_DISCRIMINATOR: [u8; 8] = [163, 52, 200, 231, 140, 3, 69, 186];

/// Default public state tree on devnet and mainnet. New compressed accounts
/// land here unless the caller picks another tree.
pub const DEFAULT_STATE_TREE: Pubkey = pubkey!("smt1NamzXdq4AMqS2fS2F1i5KTYPZRhoHgWx38d8WsT");

/// Nullifier queue paired with [`DEFAULT_STATE_TREE`].
pub const DEFAULT_NULLIFIER_QUEUE: Pubkey = pubkey!("nfq1NvQDJ2GEgnS8zt9prAe8rjjpAW1zFkrvZoBR148");

/// Devnet USDC mint (6 decimals), the default token asset.
pub const SOLANA_DEVNET_USDC: Pubkey = pubkey!("4zMMC9srt5Ri5X14GAgXhaHii3GnPAEERYPJgZJDncDU");

/// Derive the token pool PDA that escrows compressed tokens for `mint`.
pub fn find_token_pool_pda(mint: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[TOKEN_POOL_SEED, mint.as_ref()],
        &COMPRESSED_TOKEN_PROGRAM_ID,
    )
}

/// Derive the compressed token program's CPI authority PDA.
pub fn find_cpi_authority_pda() -> (Pubkey, u8) {
    Pubkey::find_program_address(&[CPI_AUTHORITY_PDA_SEED], &COMPRESSED_TOKEN_PROGRAM_ID)
}

/// Derive the sol pool PDA of the light system program.
pub fn find_sol_pool_pda() -> (Pubkey, u8) {
    Pubkey::find_program_address(&[SOL_POOL_PDA_SEED], &LIGHT_SYSTEM_PROGRAM_ID)
}

/// Derive the registered-program PDA for `program_id` under the account
/// compression program.
pub fn find_registered_program_pda(program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[program_id.to_bytes().as_slice()], &ACCOUNT_COMPRESSION_PROGRAM_ID)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sha2::{Digest, Sha256};

    fn anchor_discriminator(name: &str) -> [u8; 8] {
        let digest = Sha256::digest(format!("global:{}", name).as_bytes());
        digest[..8].try_into().unwrap()
    }

    #[test]
    fn test_invoke_discriminator_matches_anchor_derivation() {
        assert_eq!(INVOKE_DISCRIMINATOR, anchor_discriminator("invoke"));
    }

    #[test]
    fn test_transfer_discriminator_matches_anchor_derivation() {
        assert_eq!(TRANSFER_DISCRIMINATOR, anchor_discriminator("transfer"));
    }

    #[test]
    fn test_precomputed_pdas_match_derivation() {
        assert_eq!(find_cpi_authority_pda().0, CPI_AUTHORITY_PDA);
        assert_eq!(find_sol_pool_pda().0, SOL_POOL_PDA);
        assert_eq!(
            find_registered_program_pda(&LIGHT_SYSTEM_PROGRAM_ID).0,
            REGISTERED_PROGRAM_PDA
        );
    }

    #[test]
    fn test_token_pool_pda_is_per_mint() {
        let (pool_a, _) = find_token_pool_pda(&SOLANA_DEVNET_USDC);
        let (pool_b, _) = find_token_pool_pda(&Pubkey::new_unique());
        assert_ne!(pool_a, pool_b);
    }
}
