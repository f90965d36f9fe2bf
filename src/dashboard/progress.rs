//! Mint progress figures derived from `totalBNBCollected` and `MINT_HARDCAP`.

use alloy::primitives::U256;

/// Collected over hardcap, as a percentage with two decimals.
///
/// Computed on full-precision integers, rounding half up. A zero hardcap
/// renders as `0.00`. Values above 100% are returned as is.
pub fn mint_progress(collected: U256, hardcap: U256) -> String {
    if hardcap.is_zero() {
        return "0.00".to_string();
    }

    // hundredths of a percent, doubled to round half up
    let doubled = collected.saturating_mul(U256::from(20_000u64)) / hardcap;
    let hundredths = (doubled + U256::from(1u8)) / U256::from(2u8);

    let percent = hundredths / U256::from(100u8);
    let fraction = (hundredths % U256::from(100u8)).to_string();
    format!("{percent}.{fraction:0>2}")
}

/// Width of the progress bar fill, clamped to the bar.
pub fn fill_percent(collected: U256, hardcap: U256) -> u8 {
    if hardcap.is_zero() {
        return 0;
    }
    let percent = collected.saturating_mul(U256::from(100u8)) / hardcap;
    percent.min(U256::from(100u8)).to::<u8>()
}
