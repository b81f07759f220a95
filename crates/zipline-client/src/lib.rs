/*!
# Zipline Client

This crate provides the async client for all Zipline RPC operations: balance
reads across regular and compressed state, compression transaction
construction, and the submission flow that drives a transaction from amount
entry to confirmation.

## Purpose

- **Unified RPC Client**: One configured client for chain RPC and the Photon
  indexer, which share an endpoint
- **Balance Reads**: Native SOL, SPL token accounts, and compressed token
  accounts merged into a single view per asset
- **Transaction Flow**: Build, simulate, sign, submit, and confirm with
  explicit phase reporting

## Architecture

[`ZiplineClient`] wraps a nonblocking RPC client at confirmed commitment.
Reads degrade to zero balances on failure so a flaky endpoint never blanks
the whole view; writes propagate every error to the caller.
[`SubmissionDriver`] layers the one-at-a-time submission state machine on
top.

## Usage

```rust,ignore
use zipline_client::{AssetSelector, ZiplineClient};

let client = ZiplineClient::new("https://api.devnet.solana.com".to_string());
let view = client.get_balance(&owner, &AssetSelector::Usdc).await;
println!("{} USDC ({} compressed)", view.total, view.compressed);
```
*/

pub mod balance;
pub mod builder;
pub mod client;
pub mod errors;
pub mod photon;
pub mod submit;
pub mod types;

// Re-export main types for convenience
pub use balance::{AssetSelector, BalanceView, PortfolioRow};
pub use client::{ZiplineClient, HISTORY_LIMIT};
pub use errors::{ClientError, ClientResult};
pub use photon::{sum_compressed_amounts, CompressedTokenAccount, TokenData};
pub use submit::{SubmissionDriver, SubmissionOutcome, SubmissionPhase};
pub use types::{explorer_tx_url, shorten, SimulationResult, TransactionRecord};
