/*!
# Amount Conversion

Converts between human-readable decimal amounts and the integer base units
the token programs operate on. All arithmetic uses [`rust_decimal::Decimal`]
with checked operations; amounts that cannot be represented exactly in the
mint's base units are rejected rather than rounded.

## Usage

```rust,ignore
use rust_decimal::dec;
use zipline_sdk::{convert_to_lamports, convert_to_token_amount};

let lamports = convert_to_lamports(dec!(1.5))?;          // 1_500_000_000
let usdc = convert_to_token_amount(dec!(1.5), 6)?;       // 1_500_000
```
*/

use rust_decimal::{prelude::ToPrimitive, Decimal};
use thiserror::Error;

/// Native SOL uses nine decimal places (lamports).
pub const SOL_DECIMALS: u8 = 9;

/// Upper bound on mint decimals this crate converts. `10^18` still fits a
/// `u64` multiplier; anything beyond that cannot hold a whole token anyway.
pub const MAX_SUPPORTED_DECIMALS: u8 = 18;

#[derive(Debug, Error)]
pub enum AmountError {
    #[error("Amount must be greater than zero, got {0}")]
    NonPositive(Decimal),

    #[error("Amount {amount} has more fractional digits than the mint's {decimals} decimals")]
    PrecisionLoss { amount: Decimal, decimals: u8 },

    #[error("Mint decimals {0} exceed the supported maximum of {MAX_SUPPORTED_DECIMALS}")]
    UnsupportedDecimals(u8),

    #[error("Amount {0} does not fit into u64 base units")]
    Overflow(Decimal),
}

/// Convert a decimal token amount into base units for a mint with the given
/// number of decimals.
///
/// Fails on zero or negative amounts, on amounts with more fractional digits
/// than the mint supports, and on results that overflow `u64`.
pub fn convert_to_token_amount(amount: Decimal, decimals: u8) -> Result<u64, AmountError> {
    if decimals > MAX_SUPPORTED_DECIMALS {
        return Err(AmountError::UnsupportedDecimals(decimals));
    }
    if amount <= Decimal::ZERO {
        return Err(AmountError::NonPositive(amount));
    }

    let multiplier = Decimal::from(10u64.pow(u32::from(decimals)));
    let scaled = amount
        .checked_mul(multiplier)
        .ok_or(AmountError::Overflow(amount))?;

    if !scaled.fract().is_zero() {
        return Err(AmountError::PrecisionLoss { amount, decimals });
    }

    scaled.to_u64().ok_or(AmountError::Overflow(amount))
}

/// Convert a decimal SOL amount into lamports.
pub fn convert_to_lamports(amount: Decimal) -> Result<u64, AmountError> {
    convert_to_token_amount(amount, SOL_DECIMALS)
}

/// Convert base units back into a decimal amount for display.
pub fn convert_to_ui_amount(amount: u64, decimals: u8) -> Result<Decimal, AmountError> {
    if decimals > MAX_SUPPORTED_DECIMALS {
        return Err(AmountError::UnsupportedDecimals(decimals));
    }
    Ok(Decimal::from_i128_with_scale(i128::from(amount), u32::from(decimals)).normalize())
}

#[cfg(test)]
mod tests {
    use rust_decimal::dec;

    use super::*;

    #[test]
    fn test_convert_usdc_amount() {
        assert_eq!(convert_to_token_amount(dec!(1.5), 6).unwrap(), 1_500_000);
        assert_eq!(convert_to_token_amount(dec!(0.000001), 6).unwrap(), 1);
        assert_eq!(convert_to_token_amount(dec!(250), 6).unwrap(), 250_000_000);
    }

    #[test]
    fn test_convert_sol_amount() {
        assert_eq!(convert_to_lamports(dec!(1.5)).unwrap(), 1_500_000_000);
        assert_eq!(convert_to_lamports(dec!(0.000000001)).unwrap(), 1);
    }

    #[test]
    fn test_convert_low_decimal_mint() {
        // A two-decimal mint turns 5 whole tokens into 500 base units.
        assert_eq!(convert_to_token_amount(dec!(5), 2).unwrap(), 500);
    }

    #[test]
    fn test_zero_decimal_mint_accepts_whole_amounts_only() {
        assert_eq!(convert_to_token_amount(dec!(7), 0).unwrap(), 7);
        assert!(matches!(
            convert_to_token_amount(dec!(7.5), 0),
            Err(AmountError::PrecisionLoss { .. })
        ));
    }

    #[test]
    fn test_rejects_non_positive_amounts() {
        assert!(matches!(
            convert_to_token_amount(Decimal::ZERO, 6),
            Err(AmountError::NonPositive(_))
        ));
        assert!(matches!(
            convert_to_token_amount(dec!(-1.5), 6),
            Err(AmountError::NonPositive(_))
        ));
    }

    #[test]
    fn test_rejects_excess_precision() {
        assert!(matches!(
            convert_to_token_amount(dec!(0.0000001), 6),
            Err(AmountError::PrecisionLoss { .. })
        ));
        // Trailing zeros are not excess precision.
        assert_eq!(convert_to_token_amount(dec!(1.500000), 6).unwrap(), 1_500_000);
    }

    #[test]
    fn test_rejects_unsupported_decimals() {
        assert!(matches!(
            convert_to_token_amount(dec!(1), 19),
            Err(AmountError::UnsupportedDecimals(19))
        ));
    }

    #[test]
    fn test_rejects_u64_overflow() {
        // 2e19 lamports exceeds u64::MAX.
        assert!(matches!(
            convert_to_token_amount(dec!(20_000_000_000), 9),
            Err(AmountError::Overflow(_))
        ));
    }

    #[test]
    fn test_ui_amount_from_base_units() {
        assert_eq!(convert_to_ui_amount(1_500_000, 6).unwrap(), dec!(1.5));
        assert_eq!(convert_to_ui_amount(0, 9).unwrap(), Decimal::ZERO);
        assert_eq!(convert_to_ui_amount(500, 2).unwrap(), dec!(5));
    }
}
