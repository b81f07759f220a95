/*!
# Photon Indexer Methods

Compressed-state reads against the Photon indexer. Devnet RPC providers that
support ZK compression serve the Photon JSON-RPC methods from the same
endpoint as chain RPC, so these calls ride the existing client connection via
[`RpcRequest::Custom`] instead of a second HTTP stack.

The compression protocol may split one logical balance across several
compressed accounts; [`sum_compressed_amounts`] collapses them back into a
single figure per mint before anything is displayed.
*/

use serde::Deserialize;
use serde_json::json;
use solana_client::rpc_request::RpcRequest;
use solana_sdk::pubkey::Pubkey;
use tracing::debug;

use crate::{errors::ClientResult, ZiplineClient};

/// Envelope Photon wraps every response value in.
#[derive(Debug, Deserialize)]
pub struct PhotonResponse<T> {
    pub context: PhotonContext,
    pub value: T,
}

#[derive(Debug, Deserialize)]
pub struct PhotonContext {
    pub slot: u64,
}

/// Paginated list payload of `getCompressedTokenAccountsByOwner`.
#[derive(Debug, Deserialize)]
pub struct CompressedTokenAccountList {
    pub items: Vec<CompressedTokenAccount>,
    pub cursor: Option<String>,
}

/// One compressed token account as reported by the indexer.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompressedTokenAccount {
    pub token_data: TokenData,
}

/// Token-layer fields of a compressed account.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenData {
    pub mint: String,
    pub owner: String,
    pub amount: u64,
}

impl ZiplineClient {
    /// Fetch all compressed token accounts owned by `owner` for `mint`.
    ///
    /// Fails when the endpoint does not serve Photon methods; read-path
    /// callers degrade that to an empty balance, write-path callers
    /// propagate it.
    pub async fn get_compressed_token_accounts_by_owner(
        &self,
        owner: &Pubkey,
        mint: &Pubkey,
    ) -> ClientResult<Vec<CompressedTokenAccount>> {
        let request = RpcRequest::Custom {
            method: "getCompressedTokenAccountsByOwner",
        };
        let params = json!({
            "owner": owner.to_string(),
            "mint": mint.to_string(),
        });

        let response: PhotonResponse<CompressedTokenAccountList> =
            self.rpc_client.send(request, params).await?;
        debug!(
            slot = response.context.slot,
            items = response.value.items.len(),
            %mint,
            "compressed token accounts fetched"
        );
        Ok(response.value.items)
    }
}

/// Sum the raw amounts of every record matching `mint`.
///
/// The indexer already filters by mint, but a logical balance can still span
/// multiple records; records for any other mint are ignored rather than
/// silently folded in.
pub fn sum_compressed_amounts(accounts: &[CompressedTokenAccount], mint: &Pubkey) -> u64 {
    let mint = mint.to_string();
    accounts
        .iter()
        .filter(|account| account.token_data.mint == mint)
        .map(|account| account.token_data.amount)
        .sum()
}
