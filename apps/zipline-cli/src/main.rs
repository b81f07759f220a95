use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod error;

use config::DEFAULT_RPC_URL;

#[derive(Parser)]
#[command(name = "zipline")]
#[command(about = "Zipline - ZK-compression wallet toolkit for Solana devnet")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show balances: the portfolio, or one asset
    Balance {
        /// Asset to read: sol, usdc, or a mint address (omit for the portfolio)
        asset: Option<String>,

        /// Wallet address to read (defaults to the keypair's address)
        #[arg(short, long)]
        owner: Option<String>,

        /// Wallet keypair file (default: ~/.config/solana/id.json)
        #[arg(short, long)]
        keypair: Option<PathBuf>,

        /// Solana RPC URL (must serve Photon methods for compressed reads)
        #[arg(short, long, env = "ZIPLINE_RPC_URL", default_value = DEFAULT_RPC_URL)]
        rpc_url: String,
    },

    /// Compress an asset into ZK-compressed state
    Compress {
        /// Amount in human units, e.g. 1.5
        amount: String,

        /// Asset to compress: sol, usdc, or a mint address
        #[arg(short, long, default_value = "sol")]
        asset: String,

        /// Wallet keypair file (default: ~/.config/solana/id.json)
        #[arg(short, long)]
        keypair: Option<PathBuf>,

        /// Solana RPC URL (must serve Photon methods for compressed reads)
        #[arg(short, long, env = "ZIPLINE_RPC_URL", default_value = DEFAULT_RPC_URL)]
        rpc_url: String,
    },

    /// Show the wallet's most recent transactions
    History {
        /// Wallet address to read (defaults to the keypair's address)
        #[arg(short, long)]
        owner: Option<String>,

        /// Wallet keypair file (default: ~/.config/solana/id.json)
        #[arg(short, long)]
        keypair: Option<PathBuf>,

        /// Solana RPC URL
        #[arg(short, long, env = "ZIPLINE_RPC_URL", default_value = DEFAULT_RPC_URL)]
        rpc_url: String,
    },
}

#[tokio::main]
async fn main() {
    // Logs go to stderr so stdout stays parseable.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Balance {
            asset,
            owner,
            keypair,
            rpc_url,
        } => commands::balance::execute(asset, owner, keypair, rpc_url).await,

        Commands::Compress {
            amount,
            asset,
            keypair,
            rpc_url,
        } => commands::compress::execute(amount, asset, keypair, rpc_url).await,

        Commands::History {
            owner,
            keypair,
            rpc_url,
        } => commands::history::execute(owner, keypair, rpc_url).await,
    };

    if let Err(error) = result {
        let message = error.to_string();
        if message.is_empty() {
            eprintln!("❌ Something went wrong. Please try again.");
        } else {
            eprintln!("❌ {}", message);
        }
        std::process::exit(1);
    }
}
