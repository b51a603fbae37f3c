//! Conversions from the chain's smallest unit into human readable form.
//!
//! Balances arrive as 256-bit integers and a float would silently round
//! anything past 2^53, so the division is done on `U256` and rendered
//! as a decimal string instead.

use alloy::primitives::U256;

/// Decimal digits between wei and gwei, and again between gwei and ether.
pub const GWEI_DECIMALS: u32 = 9;
/// Decimal digits between wei and ether.
pub const WEI_DECIMALS: u32 = 18;

/// Exact decimal rendering of `amount / 10^decimals`.
///
/// The fractional part is zero-padded to `decimals` digits and then
/// stripped of trailing zeros, so `1500000000000000000` at 18 decimals
/// comes out as `1.5` and a whole multiple comes out bare (`2`, not
/// `2.0`). `decimals` is capped at 77, the largest power of ten that
/// fits a `U256`.
pub fn to_major_units(amount: U256, decimals: u32) -> String {
    if amount.is_zero() {
        return "0".to_string();
    }
    let scale = U256::from(10u64).pow(U256::from(decimals.min(77)));
    let (whole, frac) = amount.div_rem(scale);
    if frac.is_zero() {
        return whole.to_string();
    }
    let mut frac_str = format!("{:0>width$}", frac.to_string(), width = decimals as usize);
    while frac_str.ends_with('0') {
        frac_str.pop();
    }
    format!("{whole}.{frac_str}")
}

/// Render a gwei amount as ether.
pub fn gwei_to_eth(gwei: U256) -> String {
    to_major_units(gwei, GWEI_DECIMALS)
}

/// Render a wei amount as ether.
pub fn wei_to_eth(wei: U256) -> String {
    to_major_units(wei, WEI_DECIMALS)
}
