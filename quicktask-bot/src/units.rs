//! Wei / ether conversion
//!
//! All arithmetic stays in U256 so values beyond u128 or f64 range render exactly.

use ethers::types::U256;

/// Number of decimals between wei and ether
pub const ETHER_DECIMALS: usize = 18;

fn wei_per_ether() -> U256 {
    U256::exp10(ETHER_DECIMALS)
}

/// Split a wei amount into whole ether and the zero-padded 18 digit fraction
fn split(wei: U256) -> (U256, String) {
    let divisor = wei_per_ether();
    let whole = wei / divisor;
    let remainder = wei % divisor;
    let fraction = format!("{:0>width$}", remainder.to_string(), width = ETHER_DECIMALS);
    (whole, fraction)
}

/// Exact decimal rendering of `wei / 10^18`, trailing zeros trimmed
pub fn to_display_unit(wei: U256) -> String {
    let (whole, fraction) = split(wei);
    let trimmed = fraction.trim_end_matches('0');
    if trimmed.is_empty() {
        whole.to_string()
    } else {
        format!("{}.{}", whole, trimmed)
    }
}

/// Render with a fixed number of fractional digits, rounding half up.
///
/// A non-zero amount that would round to zero is rendered exactly instead, so a
/// tiny fee never reads as free.
pub fn to_display_unit_rounded(wei: U256, places: usize) -> String {
    let places = places.min(ETHER_DECIMALS);
    let unit = U256::exp10(ETHER_DECIMALS - places);
    let rounded = wei.saturating_add(unit / 2) / unit;

    if rounded.is_zero() && !wei.is_zero() {
        return to_display_unit(wei);
    }

    let scale = U256::exp10(places);
    let whole = rounded / scale;
    if places == 0 {
        return whole.to_string();
    }
    let fraction = (rounded % scale).to_string();
    format!("{}.{:0>width$}", whole, fraction, width = places)
}
