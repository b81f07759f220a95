/*!
# Balance Reads

Merges native, standard SPL, and compressed token state into one
[`BalanceView`] per asset. Every lookup in this module is a read: failures
are logged and degrade to zero so a flaky endpoint (or one without Photon
support) never blanks the whole view. Write paths re-read balances through
the non-degrading client getters instead.
*/

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use solana_sdk::pubkey::Pubkey;
use spl_associated_token_account::get_associated_token_address;
use tracing::warn;
use zipline_sdk::{convert_to_ui_amount, AmountError, SOLANA_DEVNET_USDC, SOL_DECIMALS};

use crate::{errors::ClientError, photon::sum_compressed_amounts, types::shorten, ZiplineClient};

/// The asset a balance read or compression targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetSelector {
    /// Native SOL.
    Sol,
    /// The well-known devnet USDC mint.
    Usdc,
    /// A caller-supplied SPL mint.
    Custom(Pubkey),
}

impl AssetSelector {
    /// The mint this selector reads, or `None` for native SOL.
    pub fn mint(&self) -> Option<Pubkey> {
        match self {
            AssetSelector::Sol => None,
            AssetSelector::Usdc => Some(SOLANA_DEVNET_USDC),
            AssetSelector::Custom(mint) => Some(*mint),
        }
    }

    pub fn name(&self) -> String {
        match self {
            AssetSelector::Sol => "Solana".to_string(),
            AssetSelector::Usdc => "USD Coin (devnet)".to_string(),
            AssetSelector::Custom(mint) => format!("Token {}", shorten(&mint.to_string())),
        }
    }

    /// Short display symbol used in notifications and table rows.
    pub fn symbol(&self) -> String {
        match self {
            AssetSelector::Sol => "SOL".to_string(),
            AssetSelector::Usdc => "USDC".to_string(),
            AssetSelector::Custom(mint) => shorten(&mint.to_string()),
        }
    }
}

impl FromStr for AssetSelector {
    type Err = ClientError;

    /// Accepts `sol`, `usdc` (case-insensitive), or a base58 mint address.
    /// Malformed addresses fail here, before any network call.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "sol" => Ok(AssetSelector::Sol),
            "usdc" => Ok(AssetSelector::Usdc),
            _ => Pubkey::from_str(value)
                .map(AssetSelector::Custom)
                .map_err(|_| ClientError::InvalidAddress(value.to_string())),
        }
    }
}

impl fmt::Display for AssetSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// One asset's balance in human units, split by where the tokens live.
///
/// Invariant: `total == compressed + native`. For SOL, `compressed` is
/// always zero; compressed SOL lives in compressed accounts this wallet
/// does not track per-asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceView {
    pub total: Decimal,
    pub compressed: Decimal,
    pub native: Decimal,
}

impl BalanceView {
    pub fn zero() -> Self {
        Self::from_parts(Decimal::ZERO, Decimal::ZERO)
    }

    /// Build a view from its two parts; `total` is always their sum.
    pub fn from_parts(compressed: Decimal, native: Decimal) -> Self {
        Self {
            total: compressed + native,
            compressed,
            native,
        }
    }

    /// A view with no compressed portion (native SOL reads).
    pub fn native_only(native: Decimal) -> Self {
        Self::from_parts(Decimal::ZERO, native)
    }

    /// Scale raw base-unit figures into a view using the mint's decimals.
    pub fn from_base_units(
        compressed: u64,
        native: u64,
        decimals: u8,
    ) -> Result<Self, AmountError> {
        Ok(Self::from_parts(
            convert_to_ui_amount(compressed, decimals)?,
            convert_to_ui_amount(native, decimals)?,
        ))
    }
}

/// One line of the portfolio listing.
#[derive(Debug, Clone)]
pub struct PortfolioRow {
    pub name: String,
    pub symbol: String,
    pub view: BalanceView,
}

impl ZiplineClient {
    /// Read the full balance view of `owner` for one asset.
    ///
    /// Read-path semantics: any lookup failure is logged and contributes
    /// zero. The caller always gets a usable view.
    pub async fn get_balance(&self, owner: &Pubkey, selector: &AssetSelector) -> BalanceView {
        match selector {
            AssetSelector::Sol => {
                let lamports = match self.get_sol_balance(owner).await {
                    Ok(lamports) => lamports,
                    Err(error) => {
                        warn!(%owner, %error, "SOL balance read failed, reporting zero");
                        0
                    }
                };
                match convert_to_ui_amount(lamports, SOL_DECIMALS) {
                    Ok(sol) => BalanceView::native_only(sol),
                    Err(error) => {
                        warn!(%error, "lamport conversion failed, reporting zero");
                        BalanceView::zero()
                    }
                }
            }
            AssetSelector::Usdc => self.token_balance(owner, &SOLANA_DEVNET_USDC).await,
            AssetSelector::Custom(mint) => self.token_balance(owner, mint).await,
        }
    }

    /// Read the portfolio shown by the default balance listing: SOL plus
    /// devnet USDC. A failed row degrades to zeros, the listing never fails.
    pub async fn get_portfolio(&self, owner: &Pubkey) -> Vec<PortfolioRow> {
        let mut rows = Vec::with_capacity(2);
        for selector in [AssetSelector::Sol, AssetSelector::Usdc] {
            rows.push(PortfolioRow {
                name: selector.name(),
                symbol: selector.symbol(),
                view: self.get_balance(owner, &selector).await,
            });
        }
        rows
    }

    /// Compressed portion (deduplicated across records) plus the associated
    /// token account, scaled by the mint's own decimals.
    async fn token_balance(&self, owner: &Pubkey, mint: &Pubkey) -> BalanceView {
        let decimals = match self.get_mint(mint).await {
            Ok(Some(mint_account)) => mint_account.decimals,
            Ok(None) => {
                warn!(%mint, "mint account not found, reporting zero balance");
                return BalanceView::zero();
            }
            Err(error) => {
                warn!(%mint, %error, "mint read failed, reporting zero balance");
                return BalanceView::zero();
            }
        };

        let compressed = match self.get_compressed_token_accounts_by_owner(owner, mint).await {
            Ok(records) => sum_compressed_amounts(&records, mint),
            Err(error) => {
                warn!(%mint, %error, "compressed account read failed, reporting zero");
                0
            }
        };

        let ata = get_associated_token_address(owner, mint);
        let native = match self.get_token_account(&ata).await {
            Ok(Some(account)) => account.amount,
            // A wallet that never held the token has no ATA; that is a zero
            // balance, not an error.
            Ok(None) => 0,
            Err(error) => {
                warn!(%ata, %error, "token account read failed, reporting zero");
                0
            }
        };

        match BalanceView::from_base_units(compressed, native, decimals) {
            Ok(view) => view,
            Err(error) => {
                warn!(%mint, %error, "balance conversion failed, reporting zero");
                BalanceView::zero()
            }
        }
    }
}
