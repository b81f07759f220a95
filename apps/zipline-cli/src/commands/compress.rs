use std::path::PathBuf;
use std::sync::Arc;

use solana_sdk::signer::Signer;
use zipline_client::{AssetSelector, SubmissionDriver, ZiplineClient};

use crate::config;
use crate::error::CliResult;

pub async fn execute(
    amount: String,
    asset: String,
    keypair: Option<PathBuf>,
    rpc_url: String,
) -> CliResult<()> {
    let selector: AssetSelector = asset.parse()?;
    let payer = config::load_keypair(keypair)?;
    let client = Arc::new(ZiplineClient::new(rpc_url));

    println!("🔑 Payer: {}", payer.pubkey());
    println!("📦 Compressing {} {}...", amount, selector.symbol());

    let mut driver = SubmissionDriver::new(client);
    let outcome = driver.submit(&payer, &amount, &selector).await?;

    println!("✅ {}", outcome.notification);
    println!("   Signature: {}", outcome.signature);
    println!("   Explorer: {}", outcome.explorer_url);

    Ok(())
}
