use std::path::PathBuf;

use tracing::warn;
use zipline_client::{explorer_tx_url, shorten, ZiplineClient, HISTORY_LIMIT};

use crate::config;
use crate::error::CliResult;

pub async fn execute(
    owner: Option<String>,
    keypair: Option<PathBuf>,
    rpc_url: String,
) -> CliResult<()> {
    let client = ZiplineClient::new(rpc_url);
    let owner = config::resolve_owner(owner, keypair)?;

    println!("🕑 Recent transactions for {}", shorten(&owner.to_string()));

    // Read path: a failed lookup prints an empty list, not an error.
    let records = match client.get_recent_transactions(&owner, HISTORY_LIMIT).await {
        Ok(records) => records,
        Err(error) => {
            warn!(%owner, %error, "history read failed, showing empty list");
            Vec::new()
        }
    };

    if records.is_empty() {
        println!("   (no recent transactions)");
        return Ok(());
    }

    for record in records {
        let marker = if record.success { "✅" } else { "❌" };
        println!(
            "   {} {} (slot {})",
            marker,
            shorten(&record.signature),
            record.slot
        );
        println!("      {}", explorer_tx_url(&record.signature));
    }

    Ok(())
}
