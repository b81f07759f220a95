use std::path::PathBuf;

use zipline_client::{shorten, AssetSelector, BalanceView, ZiplineClient};

use crate::config;
use crate::error::CliResult;

pub async fn execute(
    asset: Option<String>,
    owner: Option<String>,
    keypair: Option<PathBuf>,
    rpc_url: String,
) -> CliResult<()> {
    let client = ZiplineClient::new(rpc_url);
    let owner = config::resolve_owner(owner, keypair)?;

    println!("💰 Balances for {}", shorten(&owner.to_string()));

    match asset {
        // One asset: parse the selector locally, then a single read.
        Some(asset) => {
            let selector: AssetSelector = asset.parse()?;
            let view = client.get_balance(&owner, &selector).await;
            print_row(&selector.name(), &selector.symbol(), &view);
        }
        // No asset: the full portfolio. Rows degrade to zeros individually,
        // the listing itself always prints.
        None => {
            for row in client.get_portfolio(&owner).await {
                print_row(&row.name, &row.symbol, &row.view);
            }
        }
    }

    Ok(())
}

fn print_row(name: &str, symbol: &str, view: &BalanceView) {
    println!(
        "   {} ({}): {} total, {} compressed, {} native",
        name, symbol, view.total, view.compressed, view.native
    );
}
