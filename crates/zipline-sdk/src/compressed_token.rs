/*!
# Compressed Token Program Instructions

Builds `transfer` instructions for the compressed token program in its
compression form: SPL tokens move from the owner's associated token account
into the per-mint token pool, and a compressed token account for the same
amount is appended to the output state tree.

Amounts are base units. Decimal conversion happens in
[`crate::amounts::convert_to_token_amount`] before an instruction is built.

## Usage

```rust,ignore
use zipline_sdk::{build_compress_token_ix, DEFAULT_STATE_TREE, SOLANA_DEVNET_USDC};

let ix = build_compress_token_ix(
    &payer,
    &SOLANA_DEVNET_USDC,
    &source_ata,
    1_500_000,
    &DEFAULT_STATE_TREE,
)?;
```
*/

use borsh::{BorshDeserialize, BorshSerialize};
use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
    system_program,
};

use crate::{
    light_system::{CompressedProof, PackedMerkleContext},
    programs::{
        find_token_pool_pda, ACCOUNT_COMPRESSION_AUTHORITY_PDA, ACCOUNT_COMPRESSION_PROGRAM_ID,
        COMPRESSED_TOKEN_PROGRAM_ID, CPI_AUTHORITY_PDA, LIGHT_SYSTEM_PROGRAM_ID, NOOP_PROGRAM_ID,
        REGISTERED_PROGRAM_PDA, TRANSFER_DISCRIMINATOR,
    },
};

/// Marks the signer as a delegate of the input accounts rather than their
/// owner. Compression from an ATA is always signed by the owner.
#[derive(Debug, Clone, PartialEq, BorshSerialize, BorshDeserialize)]
pub struct DelegatedTransfer {
    pub owner: Pubkey,
    pub delegate_change_account_index: Option<u8>,
}

/// Compressed token account consumed as transfer input.
#[derive(Debug, Clone, PartialEq, Default, BorshSerialize, BorshDeserialize)]
pub struct InputTokenDataWithContext {
    pub amount: u64,
    pub delegate_index: Option<u8>,
    pub merkle_context: PackedMerkleContext,
    pub root_index: u16,
    pub lamports: Option<u64>,
    pub tlv: Option<Vec<u8>>,
}

/// Compressed token account produced as transfer output.
#[derive(Debug, Clone, PartialEq, Default, BorshSerialize, BorshDeserialize)]
pub struct PackedTokenTransferOutputData {
    pub owner: Pubkey,
    pub amount: u64,
    pub lamports: Option<u64>,
    pub merkle_tree_index: u8,
    pub tlv: Option<Vec<u8>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, BorshSerialize, BorshDeserialize)]
pub struct CompressedCpiContext {
    pub set_context: bool,
    pub first_set_context: bool,
    pub cpi_context_account_index: u8,
}

/// Instruction data of the compressed token program `transfer` instruction.
/// Field order is the on-chain borsh layout and must not change.
///
/// The on-chain struct carries one more trailing flag
/// (`with_transaction_hash`); the program appends a zero byte to the client
/// payload before deserializing, so clients omit that field entirely.
#[derive(Debug, Clone, PartialEq, BorshSerialize, BorshDeserialize)]
pub struct CompressedTokenInstructionDataTransfer {
    pub proof: Option<CompressedProof>,
    pub mint: Pubkey,
    pub delegated_transfer: Option<DelegatedTransfer>,
    pub input_token_data_with_context: Vec<InputTokenDataWithContext>,
    pub output_compressed_accounts: Vec<PackedTokenTransferOutputData>,
    pub is_compress: bool,
    pub compress_or_decompress_amount: Option<u64>,
    pub cpi_context: Option<CompressedCpiContext>,
    pub lamports_change_account_merkle_tree_index: Option<u8>,
}

/// Build the `transfer` instruction that compresses `amount` base units of
/// `mint` out of `source_token_account` into a compressed token account owned
/// by `payer` in `output_state_tree`.
///
/// The source account must be a token account for `mint` with `payer` as
/// authority, holding at least `amount`. The tokens themselves land in the
/// per-mint token pool PDA.
pub fn build_compress_token_ix(
    payer: &Pubkey,
    mint: &Pubkey,
    source_token_account: &Pubkey,
    amount: u64,
    output_state_tree: &Pubkey,
) -> std::io::Result<Instruction> {
    let inputs = CompressedTokenInstructionDataTransfer {
        proof: None,
        mint: *mint,
        delegated_transfer: None,
        input_token_data_with_context: vec![],
        output_compressed_accounts: vec![PackedTokenTransferOutputData {
            owner: *payer,
            amount,
            lamports: None,
            merkle_tree_index: 0,
            tlv: None,
        }],
        is_compress: true,
        compress_or_decompress_amount: Some(amount),
        cpi_context: None,
        lamports_change_account_merkle_tree_index: None,
    };

    let inner = borsh::to_vec(&inputs)?;
    let mut data = Vec::with_capacity(8 + 4 + inner.len());
    data.extend_from_slice(&TRANSFER_DISCRIMINATOR);
    data.extend_from_slice(&(inner.len() as u32).to_le_bytes());
    data.extend_from_slice(&inner);

    let (token_pool_pda, _) = find_token_pool_pda(mint);

    let accounts = vec![
        AccountMeta::new(*payer, true),
        AccountMeta::new_readonly(*payer, true),
        AccountMeta::new_readonly(CPI_AUTHORITY_PDA, false),
        AccountMeta::new_readonly(LIGHT_SYSTEM_PROGRAM_ID, false),
        AccountMeta::new_readonly(REGISTERED_PROGRAM_PDA, false),
        AccountMeta::new_readonly(NOOP_PROGRAM_ID, false),
        AccountMeta::new_readonly(ACCOUNT_COMPRESSION_AUTHORITY_PDA, false),
        AccountMeta::new_readonly(ACCOUNT_COMPRESSION_PROGRAM_ID, false),
        AccountMeta::new_readonly(COMPRESSED_TOKEN_PROGRAM_ID, false),
        AccountMeta::new(token_pool_pda, false),
        AccountMeta::new(*source_token_account, false),
        AccountMeta::new_readonly(spl_token::id(), false),
        AccountMeta::new_readonly(system_program::id(), false),
        AccountMeta::new(*output_state_tree, false),
    ];

    Ok(Instruction {
        program_id: COMPRESSED_TOKEN_PROGRAM_ID,
        accounts,
        data,
    })
}
