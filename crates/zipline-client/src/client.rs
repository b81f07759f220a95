/*!
# Zipline Client Implementation

Main client providing chain RPC access at confirmed commitment. The Photon
indexer methods live in [`crate::photon`] and extend the same client, since
devnet RPC providers serve both APIs from one endpoint.
*/

use std::sync::Arc;

use solana_client::{
    nonblocking::rpc_client::RpcClient,
    rpc_client::GetConfirmedSignaturesForAddress2Config,
    rpc_config::RpcSimulateTransactionConfig,
};
use solana_sdk::{
    commitment_config::CommitmentConfig, hash::Hash, program_pack::Pack, pubkey::Pubkey,
    signature::Signature, transaction::Transaction,
};
use spl_token::state::{Account as TokenAccount, Mint};
use tracing::{debug, info};

use crate::{
    errors::ClientResult,
    types::{SimulationResult, TransactionRecord},
    ClientError,
};

/// Number of transactions the history view fetches.
pub const HISTORY_LIMIT: usize = 5;

/// Unified client for Zipline RPC operations
pub struct ZiplineClient {
    pub(crate) rpc_client: Arc<RpcClient>,
}

impl ZiplineClient {
    /// Create new client with default commitment (confirmed)
    pub fn new(rpc_url: String) -> Self {
        Self::new_with_commitment(rpc_url, CommitmentConfig::confirmed())
    }

    /// Create new client with specific commitment level
    pub fn new_with_commitment(rpc_url: String, commitment: CommitmentConfig) -> Self {
        let rpc_client = Arc::new(RpcClient::new_with_commitment(rpc_url, commitment));
        Self { rpc_client }
    }

    // ================================================================================================
    // Account Reads
    // ================================================================================================

    /// Get the native SOL balance of `owner` in lamports
    pub async fn get_sol_balance(&self, owner: &Pubkey) -> ClientResult<u64> {
        Ok(self.rpc_client.get_balance(owner).await?)
    }

    /// Get a mint account, or `None` if the account does not exist
    pub async fn get_mint(&self, mint: &Pubkey) -> ClientResult<Option<Mint>> {
        let account = self
            .rpc_client
            .get_account_with_commitment(mint, self.rpc_client.commitment())
            .await?
            .value;

        let Some(account) = account else {
            return Ok(None);
        };

        let mint_account = Mint::unpack(&account.data).map_err(|e| {
            ClientError::InvalidAccountData(format!("Failed to deserialize mint: {}", e))
        })?;

        Ok(Some(mint_account))
    }

    /// Get a token account, or `None` if the account does not exist
    pub async fn get_token_account(&self, address: &Pubkey) -> ClientResult<Option<TokenAccount>> {
        let account = self
            .rpc_client
            .get_account_with_commitment(address, self.rpc_client.commitment())
            .await?
            .value;

        let Some(account) = account else {
            return Ok(None);
        };

        let token_account = TokenAccount::unpack(&account.data).map_err(|e| {
            ClientError::InvalidAccountData(format!("Failed to deserialize token account: {}", e))
        })?;

        Ok(Some(token_account))
    }

    /// Get the associated token account address for `owner` and `mint`
    pub fn get_associated_token_account_address(&self, owner: &Pubkey, mint: &Pubkey) -> Pubkey {
        spl_associated_token_account::get_associated_token_address(owner, mint)
    }

    // ================================================================================================
    // Transaction Management (Simulation + Execution)
    // ================================================================================================

    /// Get the latest blockhash at the client's commitment
    pub async fn get_latest_blockhash(&self) -> ClientResult<Hash> {
        Ok(self.rpc_client.get_latest_blockhash().await?)
    }

    /// Simulate a transaction without executing it.
    ///
    /// Transactions are simulated before the wallet signs, so signature
    /// verification stays off and the blockhash already set by the builder is
    /// used as-is.
    pub async fn simulate_transaction(&self, tx: &Transaction) -> ClientResult<SimulationResult> {
        let config = RpcSimulateTransactionConfig {
            sig_verify: false,
            replace_recent_blockhash: false,
            commitment: Some(self.rpc_client.commitment()),
            encoding: None,
            accounts: None,
            min_context_slot: None,
            inner_instructions: false,
        };

        let result = self
            .rpc_client
            .simulate_transaction_with_config(tx, config)
            .await?;
        let simulation = SimulationResult::from_rpc_result(result.value);
        debug!(
            success = simulation.success,
            compute_units = simulation.compute_units,
            "transaction simulated"
        );
        Ok(simulation)
    }

    /// Send a signed transaction and wait for confirmation
    pub async fn send_and_confirm_transaction(&self, tx: &Transaction) -> ClientResult<Signature> {
        let signature = self.rpc_client.send_and_confirm_transaction(tx).await?;
        info!(%signature, "transaction confirmed");
        Ok(signature)
    }

    // ================================================================================================
    // Transaction History
    // ================================================================================================

    /// Get the most recent confirmed transactions involving `owner`,
    /// newest first
    pub async fn get_recent_transactions(
        &self,
        owner: &Pubkey,
        limit: usize,
    ) -> ClientResult<Vec<TransactionRecord>> {
        let config = GetConfirmedSignaturesForAddress2Config {
            before: None,
            until: None,
            limit: Some(limit),
            commitment: Some(self.rpc_client.commitment()),
        };

        let statuses = self
            .rpc_client
            .get_signatures_for_address_with_config(owner, config)
            .await?;

        Ok(statuses.into_iter().map(TransactionRecord::from).collect())
    }

    // ================================================================================================
    // Utility Methods
    // ================================================================================================

    /// Get the RPC endpoint URL
    pub fn url(&self) -> String {
        self.rpc_client.url()
    }

    /// Get the RPC client (for advanced operations)
    pub fn rpc_client(&self) -> &Arc<RpcClient> {
        &self.rpc_client
    }
}
