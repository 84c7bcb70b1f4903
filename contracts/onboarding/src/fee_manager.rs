//! Fee Manager Module
//!
//! Protocol fee charged on the part of an inbound transfer that is swapped
//! into the native asset.
//!
//! | Parameter   | Range          | Default |
//! |-------------|----------------|---------|
//! | `fee_bps`   | 0-1% (0-100)   | 0       |
//!
//! The fee is taken in the source asset on top of the swapped amount and is
//! credited to the configured fee collector. Amounts round down.

use cosmwasm_std::{StdError, StdResult, Uint128};

use common::onboarding::BPS_DENOMINATOR;

/// Maximum fee in basis points (1% = 100 bps)
pub const MAX_FEE_BPS: u64 = 100;

/// Calculate fee amount from amount and bps
pub fn calculate_fee_from_bps(amount: Uint128, fee_bps: u64) -> Uint128 {
    amount.multiply_ratio(fee_bps as u128, BPS_DENOMINATOR as u128)
}

/// Calculate net amount after fee deduction
pub fn calculate_net_amount(amount: Uint128, fee_bps: u64) -> Uint128 {
    let fee = calculate_fee_from_bps(amount, fee_bps);
    amount.checked_sub(fee).unwrap_or(Uint128::zero())
}

/// Validate fee is within bounds
pub fn validate_fee(fee_bps: u64) -> StdResult<()> {
    if fee_bps > MAX_FEE_BPS {
        return Err(StdError::generic_err(format!(
            "Fee {} exceeds max {}",
            fee_bps, MAX_FEE_BPS
        )));
    }
    Ok(())
}
