//! Eligibility evaluation.
//!
//! Pure decision over the params snapshot, the credited transfer and a view
//! of the receiver's state assembled by the interceptor. Rules run in order
//! and the first failing rule names the skip reason.

use cosmwasm_std::Uint128;

use common::{Decision, InboundTransfer, OnboardingErrorKind, Params, TokenPair};

use crate::conversion::SwapStrategy;
use crate::fee_manager::calculate_net_amount;

/// Collaborator state the evaluation depends on
#[derive(Clone, Debug, PartialEq)]
pub struct ReceiverView {
    /// Registered pair for the transfer denom, if any
    pub pair: Option<TokenPair>,
    /// Whether governance policy permits creating a pair for the denom
    pub may_register: bool,
    /// Receiver's native balance after the transfer was credited
    pub native_balance: Uint128,
}

pub fn evaluate(params: &Params, transfer: &InboundTransfer, view: &ReceiverView) -> Decision {
    if !params.enable_onboarding {
        return Decision::skip(OnboardingErrorKind::FeatureDisabled);
    }

    if !params.channel_allowed(&transfer.source_channel) {
        return Decision::skip(OnboardingErrorKind::ChannelNotWhitelisted);
    }

    let convertible = match &view.pair {
        Some(pair) => pair.enabled,
        None => view.may_register,
    };
    if !convertible {
        return Decision::skip(OnboardingErrorKind::AssetNotConvertible);
    }

    if calculate_net_amount(transfer.amount, params.fee_bps).is_zero() {
        return Decision::skip(OnboardingErrorKind::ZeroAmount);
    }

    if !params.swap_policy.needs_swap(view.native_balance) {
        return Decision::skip(OnboardingErrorKind::ReceiverFunded);
    }

    Decision::eligible()
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::SwapPolicy;
    use cosmwasm_std::Addr;

    fn transfer(channel: &str, amount: u128) -> InboundTransfer {
        InboundTransfer {
            denom: "ibc/USDC".to_string(),
            amount: Uint128::new(amount),
            sender: "gravity1sender".to_string(),
            receiver: Addr::unchecked("althea1receiver"),
            source_channel: channel.to_string(),
            sequence: 1,
        }
    }

    fn enabled_pair() -> ReceiverView {
        ReceiverView {
            pair: Some(TokenPair {
                denom: "ibc/USDC".to_string(),
                contract_address: "0x01".to_string(),
                enabled: true,
            }),
            may_register: false,
            native_balance: Uint128::zero(),
        }
    }

    fn enabled_params() -> Params {
        Params {
            enable_onboarding: true,
            whitelisted_channels: vec!["channel-1".to_string()],
            ..Params::default()
        }
    }

    #[test]
    fn test_disabled_wins_over_everything() {
        let params = Params {
            enable_onboarding: false,
            whitelisted_channels: vec![],
            ..Params::default()
        };
        let view = ReceiverView {
            pair: None,
            may_register: false,
            native_balance: Uint128::zero(),
        };
        let decision = evaluate(&params, &transfer("channel-9", 0), &view);
        assert_eq!(
            decision,
            Decision::skip(OnboardingErrorKind::FeatureDisabled)
        );
    }

    #[test]
    fn test_channel_policy() {
        let params = enabled_params();
        assert_eq!(
            evaluate(&params, &transfer("channel-0", 100), &enabled_pair()),
            Decision::skip(OnboardingErrorKind::ChannelNotWhitelisted)
        );
        assert_eq!(
            evaluate(&params, &transfer("channel-1", 100), &enabled_pair()),
            Decision::eligible()
        );

        // Empty whitelist places no restriction
        let open = Params {
            whitelisted_channels: vec![],
            ..enabled_params()
        };
        assert_eq!(
            evaluate(&open, &transfer("channel-0", 100), &enabled_pair()),
            Decision::eligible()
        );
        assert_eq!(
            evaluate(&open, &transfer("channel-42", 100), &enabled_pair()),
            Decision::eligible()
        );
    }

    #[test]
    fn test_convertibility() {
        let params = enabled_params();
        let t = transfer("channel-1", 100);

        let missing_denied = ReceiverView {
            pair: None,
            may_register: false,
            native_balance: Uint128::zero(),
        };
        assert_eq!(
            evaluate(&params, &t, &missing_denied),
            Decision::skip(OnboardingErrorKind::AssetNotConvertible)
        );

        let missing_allowed = ReceiverView {
            may_register: true,
            ..missing_denied.clone()
        };
        assert_eq!(evaluate(&params, &t, &missing_allowed), Decision::eligible());

        let mut disabled = enabled_pair();
        if let Some(pair) = disabled.pair.as_mut() {
            pair.enabled = false;
        }
        disabled.may_register = true;
        assert_eq!(
            evaluate(&params, &t, &disabled),
            Decision::skip(OnboardingErrorKind::AssetNotConvertible)
        );
    }

    #[test]
    fn test_zero_amount() {
        let params = enabled_params();
        assert_eq!(
            evaluate(&params, &transfer("channel-1", 0), &enabled_pair()),
            Decision::skip(OnboardingErrorKind::ZeroAmount)
        );
    }

    #[test]
    fn test_funded_receiver_is_skipped() {
        let params = Params {
            swap_policy: SwapPolicy::TopUp {
                threshold: Uint128::new(1_000),
            },
            ..enabled_params()
        };
        let mut view = enabled_pair();
        view.native_balance = Uint128::new(1_000);
        assert_eq!(
            evaluate(&params, &transfer("channel-1", 100), &view),
            Decision::skip(OnboardingErrorKind::ReceiverFunded)
        );

        view.native_balance = Uint128::new(999);
        assert_eq!(
            evaluate(&params, &transfer("channel-1", 100), &view),
            Decision::eligible()
        );
    }

    #[test]
    fn test_evaluate_is_repeatable() {
        let params = enabled_params();
        let t = transfer("channel-1", 100);
        let view = enabled_pair();
        let first = evaluate(&params, &t, &view);
        for _ in 0..3 {
            assert_eq!(evaluate(&params, &t, &view), first);
        }
    }
}
