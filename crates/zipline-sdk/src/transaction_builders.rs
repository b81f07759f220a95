/*!
# Transaction Builders

High-level transaction builders for compression operations. All functions
follow the naming pattern `build_*_tx` and return unsigned transactions that
the caller signs and sends.

Every compression transaction carries the same fixed compute budget: the
compression programs burn far more compute than the default allotment, and a
priority fee keeps devnet confirmation times reasonable.

## Design Philosophy

- **Unsigned Transactions**: Return Transaction objects that need to be signed
- **RPC Independence**: No RPC calls, the caller provides blockhash and amounts
- **Base Units In**: Decimal conversion happens before these builders run

## Usage

```rust,ignore
use zipline_sdk::build_compress_sol_tx;

let recent_blockhash = Hash::default(); // Get from RPC
let tx = build_compress_sol_tx(&payer.pubkey(), 1_500_000_000, recent_blockhash)?;
let signed = /* sign with payer, then send */;
```
*/

use solana_sdk::{
    compute_budget::ComputeBudgetInstruction, hash::Hash, instruction::Instruction,
    message::Message, pubkey::Pubkey, transaction::Transaction,
};
use spl_associated_token_account::instruction::create_associated_token_account_idempotent;
use thiserror::Error;

use crate::{
    compressed_token::build_compress_token_ix, light_system::build_compress_sol_ix,
    programs::DEFAULT_STATE_TREE,
};

/// Compute unit ceiling for compression transactions. The system program CPI
/// chain (light system, account compression, noop) exceeds the 200k default.
pub const COMPUTE_UNIT_LIMIT: u32 = 550_000;

/// Priority fee in micro-lamports per compute unit.
pub const COMPUTE_UNIT_PRICE_MICRO_LAMPORTS: u64 = 10_000;

#[derive(Debug, Error)]
pub enum TransactionBuilderError {
    #[error("Amount must be greater than zero")]
    ZeroAmount,

    #[error("Instruction serialization failed: {0}")]
    InstructionData(#[from] std::io::Error),
}

pub type TransactionBuilderResult<T> = Result<T, TransactionBuilderError>;

fn compute_budget_instructions() -> [Instruction; 2] {
    [
        ComputeBudgetInstruction::set_compute_unit_limit(COMPUTE_UNIT_LIMIT),
        ComputeBudgetInstruction::set_compute_unit_price(COMPUTE_UNIT_PRICE_MICRO_LAMPORTS),
    ]
}

fn into_unsigned_tx(
    instructions: &[Instruction],
    payer: &Pubkey,
    recent_blockhash: Hash,
) -> Transaction {
    let message = Message::new(instructions, Some(payer));
    let mut transaction = Transaction::new_unsigned(message);
    transaction.message.recent_blockhash = recent_blockhash;
    transaction
}

/// Build the transaction that compresses `lamports` of native SOL held by
/// `payer` into the default state tree.
///
/// Instruction order is fixed: compute unit limit, compute unit price, then
/// the compression instruction.
pub fn build_compress_sol_tx(
    payer: &Pubkey,
    lamports: u64,
    recent_blockhash: Hash,
) -> TransactionBuilderResult<Transaction> {
    if lamports == 0 {
        return Err(TransactionBuilderError::ZeroAmount);
    }

    let [limit_ix, price_ix] = compute_budget_instructions();
    let compress_ix = build_compress_sol_ix(payer, lamports, &DEFAULT_STATE_TREE)?;

    Ok(into_unsigned_tx(
        &[limit_ix, price_ix, compress_ix],
        payer,
        recent_blockhash,
    ))
}

/// Build the transaction that compresses `amount` base units of `mint` out of
/// `source_token_account` into the default state tree.
///
/// Same fixed instruction order as [`build_compress_sol_tx`].
pub fn build_compress_token_tx(
    payer: &Pubkey,
    mint: &Pubkey,
    source_token_account: &Pubkey,
    amount: u64,
    recent_blockhash: Hash,
) -> TransactionBuilderResult<Transaction> {
    if amount == 0 {
        return Err(TransactionBuilderError::ZeroAmount);
    }

    let [limit_ix, price_ix] = compute_budget_instructions();
    let compress_ix =
        build_compress_token_ix(payer, mint, source_token_account, amount, &DEFAULT_STATE_TREE)?;

    Ok(into_unsigned_tx(
        &[limit_ix, price_ix, compress_ix],
        payer,
        recent_blockhash,
    ))
}

/// Build the transaction that creates the associated token account of `owner`
/// for `mint`, funded by `payer`.
///
/// Uses the idempotent variant, so the transaction also succeeds when another
/// party created the account between the caller's existence check and
/// submission.
pub fn build_create_ata_tx(
    payer: &Pubkey,
    owner: &Pubkey,
    mint: &Pubkey,
    recent_blockhash: Hash,
) -> Transaction {
    let create_ix = create_associated_token_account_idempotent(payer, owner, mint, &spl_token::id());
    into_unsigned_tx(&[create_ix], payer, recent_blockhash)
}
