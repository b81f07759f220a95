/*!
# Light System Program Instructions

Builds `invoke` instructions for the light system program, which moves
native SOL between regular and compressed state. Only the compression
direction is constructed here: lamports leave the fee payer, land in the
protocol sol pool, and a compressed account owned by the payer is appended
to the output state tree.

The instruction data is the borsh serialization of [`InstructionDataInvoke`]
wrapped in a length-prefixed byte vector behind the 8-byte `invoke`
discriminator, exactly as the on-chain program deserializes it.

## Usage

```rust,ignore
use zipline_sdk::{build_compress_sol_ix, DEFAULT_STATE_TREE};

let ix = build_compress_sol_ix(&payer, 1_500_000_000, &DEFAULT_STATE_TREE)?;
```
*/

use borsh::{BorshDeserialize, BorshSerialize};
use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
    system_program,
};

use crate::programs::{
    ACCOUNT_COMPRESSION_AUTHORITY_PDA, ACCOUNT_COMPRESSION_PROGRAM_ID, INVOKE_DISCRIMINATOR,
    LIGHT_SYSTEM_PROGRAM_ID, NOOP_PROGRAM_ID, REGISTERED_PROGRAM_PDA, SOL_POOL_PDA,
};

/// Groth16 proof in the compressed form the light system program verifies.
#[derive(Debug, Clone, PartialEq, BorshSerialize, BorshDeserialize)]
pub struct CompressedProof {
    pub a: [u8; 32],
    pub b: [u8; 64],
    pub c: [u8; 32],
}

#[derive(Debug, Clone, PartialEq, Default, BorshSerialize, BorshDeserialize)]
pub struct CompressedAccountData {
    pub discriminator: [u8; 8],
    pub data: Vec<u8>,
    pub data_hash: [u8; 32],
}

#[derive(Debug, Clone, PartialEq, Default, BorshSerialize, BorshDeserialize)]
pub struct CompressedAccount {
    pub owner: Pubkey,
    pub lamports: u64,
    pub address: Option<[u8; 32]>,
    pub data: Option<CompressedAccountData>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, BorshSerialize, BorshDeserialize)]
pub struct PackedMerkleContext {
    pub merkle_tree_pubkey_index: u8,
    pub nullifier_queue_pubkey_index: u8,
    pub leaf_index: u32,
    pub prove_by_index: bool,
}

#[derive(Debug, Clone, PartialEq, Default, BorshSerialize, BorshDeserialize)]
pub struct PackedCompressedAccountWithMerkleContext {
    pub compressed_account: CompressedAccount,
    pub merkle_context: PackedMerkleContext,
    /// Index of the state root used in the inclusion proof.
    pub root_index: u16,
    pub read_only: bool,
}

/// Output account plus the index of its destination tree in the trailing
/// accounts of the instruction.
#[derive(Debug, Clone, PartialEq, Default, BorshSerialize, BorshDeserialize)]
pub struct OutputCompressedAccountWithPackedContext {
    pub compressed_account: CompressedAccount,
    pub merkle_tree_index: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, BorshSerialize, BorshDeserialize)]
pub struct NewAddressParamsPacked {
    pub seed: [u8; 32],
    pub address_queue_account_index: u8,
    pub address_merkle_tree_account_index: u8,
    pub address_merkle_tree_root_index: u16,
}

/// Instruction data of the light system program `invoke` instruction.
/// Field order is the on-chain borsh layout and must not change.
#[derive(Debug, Clone, PartialEq, Default, BorshSerialize, BorshDeserialize)]
pub struct InstructionDataInvoke {
    pub proof: Option<CompressedProof>,
    pub input_compressed_accounts_with_merkle_context:
        Vec<PackedCompressedAccountWithMerkleContext>,
    pub output_compressed_accounts: Vec<OutputCompressedAccountWithPackedContext>,
    pub relay_fee: Option<u64>,
    pub new_address_params: Vec<NewAddressParamsPacked>,
    pub compress_or_decompress_lamports: Option<u64>,
    pub is_compress: bool,
}

/// Build the `invoke` instruction that compresses `lamports` out of `payer`
/// into a single compressed account owned by `payer` in `output_state_tree`.
///
/// No validity proof is required: compression creates state without spending
/// any existing compressed account, so the input set is empty.
pub fn build_compress_sol_ix(
    payer: &Pubkey,
    lamports: u64,
    output_state_tree: &Pubkey,
) -> std::io::Result<Instruction> {
    let inputs = InstructionDataInvoke {
        proof: None,
        input_compressed_accounts_with_merkle_context: vec![],
        output_compressed_accounts: vec![OutputCompressedAccountWithPackedContext {
            compressed_account: CompressedAccount {
                owner: *payer,
                lamports,
                address: None,
                data: None,
            },
            merkle_tree_index: 0,
        }],
        relay_fee: None,
        new_address_params: vec![],
        compress_or_decompress_lamports: Some(lamports),
        is_compress: true,
    };

    let inner = borsh::to_vec(&inputs)?;
    let mut data = Vec::with_capacity(8 + 4 + inner.len());
    data.extend_from_slice(&INVOKE_DISCRIMINATOR);
    data.extend_from_slice(&(inner.len() as u32).to_le_bytes());
    data.extend_from_slice(&inner);

    // Optional accounts the program does not need are passed as the program's
    // own id, readonly. Only decompression uses the recipient slot.
    let accounts = vec![
        AccountMeta::new(*payer, true),
        AccountMeta::new_readonly(*payer, true),
        AccountMeta::new_readonly(REGISTERED_PROGRAM_PDA, false),
        AccountMeta::new_readonly(NOOP_PROGRAM_ID, false),
        AccountMeta::new_readonly(ACCOUNT_COMPRESSION_AUTHORITY_PDA, false),
        AccountMeta::new_readonly(ACCOUNT_COMPRESSION_PROGRAM_ID, false),
        AccountMeta::new(SOL_POOL_PDA, false),
        AccountMeta::new_readonly(LIGHT_SYSTEM_PROGRAM_ID, false),
        AccountMeta::new_readonly(system_program::id(), false),
        AccountMeta::new(*output_state_tree, false),
    ];

    Ok(Instruction {
        program_id: LIGHT_SYSTEM_PROGRAM_ID,
        accounts,
        data,
    })
}
