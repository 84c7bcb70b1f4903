//! Liquidity collaborator.
//!
//! Prices and executes swaps of a source denom into the native asset. The
//! contract ships a constant product implementation (`Pools`) over
//! governance provisioned reserves; every quote rounds down so the pool never
//! pays out more than the curve allows.

use cosmwasm_std::{Addr, Storage, Uint128};

use crate::error::LiquidityError;
use crate::ledger::Ledger;
use crate::state::{Pool, POOLS};

pub trait Liquidity {
    /// Output received for swapping exactly `source_amount`
    fn quote_exact_in(
        &self,
        storage: &dyn Storage,
        source_denom: &str,
        target_denom: &str,
        source_amount: Uint128,
    ) -> Result<Uint128, LiquidityError>;

    /// Largest source amount whose output does not exceed `target_amount`.
    /// Saturates at `Uint128::MAX` when the pool cannot pay `target_amount`.
    fn quote_source_for(
        &self,
        storage: &dyn Storage,
        source_denom: &str,
        target_denom: &str,
        target_amount: Uint128,
    ) -> Result<Uint128, LiquidityError>;

    /// Swap `source_amount` held by `account` into `target_denom`.
    ///
    /// Returns the amount credited to `account`. Fails without writing when
    /// the output would be below `min_out`.
    fn swap(
        &self,
        storage: &mut dyn Storage,
        account: &Addr,
        source_denom: &str,
        source_amount: Uint128,
        target_denom: &str,
        min_out: Uint128,
    ) -> Result<Uint128, LiquidityError>;
}

/// Constant product pools of `<denom>/native`
pub struct Pools<L: Ledger> {
    pub native_denom: String,
    pub ledger: L,
}

impl<L: Ledger> Pools<L> {
    pub fn new(native_denom: impl Into<String>, ledger: L) -> Self {
        Self {
            native_denom: native_denom.into(),
            ledger,
        }
    }

    fn load_pool(
        &self,
        storage: &dyn Storage,
        source_denom: &str,
        target_denom: &str,
    ) -> Result<Pool, LiquidityError> {
        let no_pool = || LiquidityError::NoPool {
            source_denom: source_denom.to_string(),
            target_denom: target_denom.to_string(),
        };
        if target_denom != self.native_denom {
            return Err(no_pool());
        }
        let pool = POOLS.may_load(storage, source_denom)?.ok_or_else(no_pool)?;
        if pool.source_reserve.is_zero() || pool.native_reserve.is_zero() {
            return Err(no_pool());
        }
        Ok(pool)
    }
}

/// `native_reserve * amount_in / (source_reserve + amount_in)`, rounded down
fn amount_out(pool: &Pool, amount_in: Uint128) -> Result<Uint128, LiquidityError> {
    if amount_in.is_zero() {
        return Ok(Uint128::zero());
    }
    let denominator = pool.source_reserve.checked_add(amount_in).map_err(|_| {
        LiquidityError::InsufficientLiquidity {
            requested: amount_in,
            reserve: pool.source_reserve,
        }
    })?;
    Ok(pool.native_reserve.multiply_ratio(amount_in, denominator))
}

impl<L: Ledger> Liquidity for Pools<L> {
    fn quote_exact_in(
        &self,
        storage: &dyn Storage,
        source_denom: &str,
        target_denom: &str,
        source_amount: Uint128,
    ) -> Result<Uint128, LiquidityError> {
        let pool = self.load_pool(storage, source_denom, target_denom)?;
        amount_out(&pool, source_amount)
    }

    fn quote_source_for(
        &self,
        storage: &dyn Storage,
        source_denom: &str,
        target_denom: &str,
        target_amount: Uint128,
    ) -> Result<Uint128, LiquidityError> {
        let pool = self.load_pool(storage, source_denom, target_denom)?;
        if target_amount >= pool.native_reserve {
            return Ok(Uint128::MAX);
        }
        // floor(source_reserve * target / (native_reserve - target))
        Ok(pool
            .source_reserve
            .checked_multiply_ratio(target_amount, pool.native_reserve - target_amount)
            .unwrap_or(Uint128::MAX))
    }

    fn swap(
        &self,
        storage: &mut dyn Storage,
        account: &Addr,
        source_denom: &str,
        source_amount: Uint128,
        target_denom: &str,
        min_out: Uint128,
    ) -> Result<Uint128, LiquidityError> {
        let mut pool = self.load_pool(storage, source_denom, target_denom)?;
        let out = amount_out(&pool, source_amount)?;
        if out.is_zero() {
            return Err(LiquidityError::InsufficientLiquidity {
                requested: source_amount,
                reserve: pool.native_reserve,
            });
        }
        if out < min_out {
            return Err(LiquidityError::SlippageExceeded { min_out, out });
        }

        let available = self.ledger.balance(storage, account, source_denom)?;
        if available < source_amount {
            return Err(LiquidityError::InsufficientBalance {
                available,
                requested: source_amount,
            });
        }

        self.ledger
            .debit(storage, account, source_denom, source_amount)?;
        self.ledger.credit(storage, account, target_denom, out)?;

        pool.source_reserve += source_amount;
        pool.native_reserve -= out;
        POOLS.save(storage, source_denom, &pool)?;

        Ok(out)
    }
}
