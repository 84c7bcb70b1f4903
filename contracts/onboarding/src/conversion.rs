//! Conversion engine.
//!
//! Swaps a capped part of an inbound transfer into the native asset through
//! the liquidity collaborator. The amount is chosen by a `SwapStrategy`; the
//! engine only enforces the bounds:
//! - source debited (swap + fee) never exceeds the inbound amount
//! - native credited never exceeds the strategy's cap
//! - every division rounds down
//!
//! The whole step runs in a `StorageTransaction`. Any failure discards it and
//! is reported in the outcome, never returned as an error.

use std::cmp::min;

use cosmwasm_std::{Addr, Storage, Uint128};

use common::onboarding::BPS_DENOMINATOR;
use common::{ConversionOutcome, OnboardingErrorKind, Params, SwapPolicy, TokenPair};

use crate::cache::StorageTransaction;
use crate::error::LiquidityError;
use crate::fee_manager::{calculate_fee_from_bps, calculate_net_amount};
use crate::ledger::Ledger;
use crate::liquidity::Liquidity;

/// Bounds of one swap
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SwapPlan {
    /// Most source asset the swap may consume
    pub max_source: Uint128,
    /// Most native asset the swap may credit
    pub native_cap: Uint128,
}

pub trait SwapStrategy {
    /// Whether a receiver holding `native_balance` should be topped up at all
    fn needs_swap(&self, native_balance: Uint128) -> bool;

    fn plan(&self, native_balance: Uint128, source_amount: Uint128) -> SwapPlan;
}

impl SwapStrategy for SwapPolicy {
    fn needs_swap(&self, native_balance: Uint128) -> bool {
        match self {
            SwapPolicy::TopUp { threshold } => native_balance < *threshold,
            SwapPolicy::FixedFraction { .. } => true,
        }
    }

    fn plan(&self, native_balance: Uint128, source_amount: Uint128) -> SwapPlan {
        match self {
            SwapPolicy::TopUp { threshold } => SwapPlan {
                max_source: source_amount,
                native_cap: threshold.saturating_sub(native_balance),
            },
            SwapPolicy::FixedFraction { bps, max_native } => SwapPlan {
                max_source: source_amount.multiply_ratio(*bps, BPS_DENOMINATOR),
                native_cap: *max_native,
            },
        }
    }
}

pub struct ConversionEngine<'a, L, G, S> {
    pub liquidity: &'a L,
    pub ledger: &'a G,
    pub strategy: &'a S,
    pub native_denom: &'a str,
    pub fee_collector: &'a Addr,
}

impl<'a, L, G, S> ConversionEngine<'a, L, G, S>
where
    L: Liquidity,
    G: Ledger,
    S: SwapStrategy,
{
    /// Convert part of `source_amount` of `source_denom` held by `receiver`.
    ///
    /// `pair` is the registered token pair of `source_denom`; with
    /// `convert_remainder` set, an enabled pair receives the unswapped rest.
    pub fn convert(
        &self,
        storage: &mut dyn Storage,
        params: &Params,
        receiver: &Addr,
        source_denom: &str,
        source_amount: Uint128,
        pair: Option<&TokenPair>,
    ) -> ConversionOutcome {
        let mut tx = StorageTransaction::new(storage);
        match self.try_convert(&mut tx, params, receiver, source_denom, source_amount, pair) {
            Ok(outcome) => {
                tx.commit();
                outcome
            }
            Err(reason) => {
                tx.rollback();
                ConversionOutcome::failed(reason)
            }
        }
    }

    fn try_convert(
        &self,
        storage: &mut dyn Storage,
        params: &Params,
        receiver: &Addr,
        source_denom: &str,
        source_amount: Uint128,
        pair: Option<&TokenPair>,
    ) -> Result<ConversionOutcome, OnboardingErrorKind> {
        let native_balance = self
            .ledger
            .balance(storage, receiver, self.native_denom)
            .map_err(|_| OnboardingErrorKind::SwapFailed)?;
        let plan = self.strategy.plan(native_balance, source_amount);
        if plan.native_cap.is_zero() {
            return Err(OnboardingErrorKind::ZeroAmount);
        }

        let for_cap = self
            .liquidity
            .quote_source_for(storage, source_denom, self.native_denom, plan.native_cap)
            .map_err(swap_failed)?;
        let source_in = min(
            min(plan.max_source, for_cap),
            calculate_net_amount(source_amount, params.fee_bps),
        );
        if source_in.is_zero() {
            return Err(OnboardingErrorKind::ZeroAmount);
        }
        let fee = calculate_fee_from_bps(source_in, params.fee_bps);

        let quoted = self
            .liquidity
            .quote_exact_in(storage, source_denom, self.native_denom, source_in)
            .map_err(swap_failed)?;
        let min_out = quoted.multiply_ratio(
            BPS_DENOMINATOR.saturating_sub(params.max_slippage_bps),
            BPS_DENOMINATOR,
        );

        self.ledger
            .transfer(storage, receiver, self.fee_collector, source_denom, fee)
            .map_err(|_| OnboardingErrorKind::SwapFailed)?;
        let credited = self
            .liquidity
            .swap(
                storage,
                receiver,
                source_denom,
                source_in,
                self.native_denom,
                min_out,
            )
            .map_err(swap_failed)?;
        if credited > plan.native_cap {
            return Err(swap_failed(LiquidityError::CapExceeded {
                credited,
                cap: plan.native_cap,
            }));
        }

        let mut token_amount_converted = Uint128::zero();
        if let Some(pair) = pair.filter(|p| params.convert_remainder && p.enabled) {
            // source_in + fee <= source_amount by construction
            let remainder = source_amount - source_in - fee;
            self.ledger
                .debit(storage, receiver, source_denom, remainder)
                .and_then(|_| {
                    self.ledger
                        .credit(storage, receiver, &pair.token_denom(), remainder)
                })
                .map_err(|_| OnboardingErrorKind::SwapFailed)?;
            token_amount_converted = remainder;
        }

        Ok(ConversionOutcome {
            attempted: true,
            succeeded: true,
            native_amount_credited: credited,
            source_amount_debited: source_in,
            fee_amount: fee,
            token_amount_converted,
            reason: None,
        })
    }
}

fn swap_failed(_err: LiquidityError) -> OnboardingErrorKind {
    OnboardingErrorKind::SwapFailed
}
