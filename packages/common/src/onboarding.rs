//! Onboarding value types.
//!
//! These types flow through the onboarding pipeline of the contract and are
//! returned by its queries. None of them carry behaviour beyond validation.

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, StdError, StdResult, Uint128};
use thiserror::Error;

/// Basis points denominator (10000 = 100%)
pub const BPS_DENOMINATOR: u64 = 10_000;

/// Default native balance the top-up policy aims for (4 units of an 18 decimal asset)
pub const DEFAULT_AUTO_SWAP_THRESHOLD: u128 = 4_000_000_000_000_000_000;

/// Default tolerated slippage between quote and execution (1%)
pub const DEFAULT_MAX_SLIPPAGE_BPS: u64 = 100;

// ============================================================================
// Params
// ============================================================================

/// Governance controlled onboarding parameters
#[cw_serde]
pub struct Params {
    /// Master switch for the onboarding bonus
    pub enable_onboarding: bool,
    /// Local channel ids eligible for onboarding. Empty means every channel.
    pub whitelisted_channels: Vec<String>,
    /// How much of an inbound transfer is swapped into the native asset
    pub swap_policy: SwapPolicy,
    /// Protocol fee charged on the swapped amount, in basis points
    pub fee_bps: u64,
    /// Maximum tolerated shortfall of the executed swap against its quote
    pub max_slippage_bps: u64,
    /// Whether token pairs may be created automatically for inbound vouchers
    pub auto_register_pairs: bool,
    /// Move the unswapped remainder into the token representation after a swap
    pub convert_remainder: bool,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            enable_onboarding: false,
            whitelisted_channels: vec![],
            swap_policy: SwapPolicy::TopUp {
                threshold: Uint128::new(DEFAULT_AUTO_SWAP_THRESHOLD),
            },
            fee_bps: 0,
            max_slippage_bps: DEFAULT_MAX_SLIPPAGE_BPS,
            auto_register_pairs: false,
            convert_remainder: false,
        }
    }
}

impl Params {
    /// Whether a packet arriving on `channel` passes the channel policy.
    ///
    /// An empty whitelist places no restriction on channels.
    pub fn channel_allowed(&self, channel: &str) -> bool {
        self.whitelisted_channels.is_empty()
            || self.whitelisted_channels.iter().any(|c| c == channel)
    }
}

/// Swap amount policy applied by the conversion engine
#[cw_serde]
pub enum SwapPolicy {
    /// Swap just enough to lift the receiver's native balance to `threshold`
    TopUp { threshold: Uint128 },
    /// Swap a fixed share of the inbound amount, crediting at most `max_native`
    FixedFraction { bps: u64, max_native: Uint128 },
}

impl SwapPolicy {
    pub fn validate(&self) -> StdResult<()> {
        match self {
            SwapPolicy::TopUp { threshold } => {
                if threshold.is_zero() {
                    return Err(StdError::generic_err("Top-up threshold must be non-zero"));
                }
            }
            SwapPolicy::FixedFraction { bps, max_native } => {
                if *bps == 0 || *bps > BPS_DENOMINATOR {
                    return Err(StdError::generic_err(format!(
                        "Swap fraction {} must be within 1..={}",
                        bps, BPS_DENOMINATOR
                    )));
                }
                if max_native.is_zero() {
                    return Err(StdError::generic_err("Native cap must be non-zero"));
                }
            }
        }
        Ok(())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SwapPolicy::TopUp { .. } => "top_up",
            SwapPolicy::FixedFraction { .. } => "fixed_fraction",
        }
    }
}

// ============================================================================
// Pipeline records
// ============================================================================

/// One inbound transfer after the transfer handler credited it
#[cw_serde]
pub struct InboundTransfer {
    /// Local ledger denom of the credited asset (voucher or unwrapped native denom)
    pub denom: String,
    pub amount: Uint128,
    /// Sender on the counterparty chain, not validated locally
    pub sender: String,
    pub receiver: Addr,
    /// Channel on this chain the packet arrived through
    pub source_channel: String,
    pub sequence: u64,
}

/// Result of the eligibility evaluation
#[cw_serde]
pub struct Decision {
    pub eligible: bool,
    pub reason: Option<OnboardingErrorKind>,
}

impl Decision {
    pub fn eligible() -> Self {
        Self {
            eligible: true,
            reason: None,
        }
    }

    pub fn skip(reason: OnboardingErrorKind) -> Self {
        Self {
            eligible: false,
            reason: Some(reason),
        }
    }
}

/// Observable result of the onboarding step for one packet
#[cw_serde]
#[derive(Default)]
pub struct ConversionOutcome {
    pub attempted: bool,
    pub succeeded: bool,
    pub native_amount_credited: Uint128,
    /// Source asset debited by the swap, fee excluded
    pub source_amount_debited: Uint128,
    /// Protocol fee debited from the receiver in the source asset
    pub fee_amount: Uint128,
    /// Vouchers moved into the token representation
    pub token_amount_converted: Uint128,
    pub reason: Option<OnboardingErrorKind>,
}

impl ConversionOutcome {
    pub fn skipped(reason: Option<OnboardingErrorKind>) -> Self {
        Self {
            reason,
            ..Self::default()
        }
    }

    pub fn failed(reason: OnboardingErrorKind) -> Self {
        Self {
            attempted: true,
            reason: Some(reason),
            ..Self::default()
        }
    }
}

/// Mapping between a ledger denom and its smart contract token
#[cw_serde]
pub struct TokenPair {
    pub denom: String,
    /// `0x` prefixed hex address of the token contract
    pub contract_address: String,
    pub enabled: bool,
}

impl TokenPair {
    /// Ledger denom under which the token representation is held
    pub fn token_denom(&self) -> String {
        format!("erc20/{}", self.contract_address)
    }
}

/// Every reason the onboarding step did not run or did not complete.
///
/// Only `UnderlyingTransferFailed` ever reaches a packet acknowledgement.
#[cw_serde]
#[derive(Error, Copy, Eq)]
pub enum OnboardingErrorKind {
    #[error("onboarding is disabled")]
    FeatureDisabled,
    #[error("channel is not whitelisted")]
    ChannelNotWhitelisted,
    #[error("asset has no enabled token pair and cannot be registered")]
    AssetNotConvertible,
    #[error("nothing left to convert after fees")]
    ZeroAmount,
    #[error("receiver already holds enough native asset")]
    ReceiverFunded,
    #[error("token pair registration denied")]
    RegistrationDenied,
    #[error("token pair registration failed")]
    RegistrationFailed,
    #[error("swap failed")]
    SwapFailed,
    #[error("underlying transfer failed")]
    UnderlyingTransferFailed,
}

impl OnboardingErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OnboardingErrorKind::FeatureDisabled => "feature_disabled",
            OnboardingErrorKind::ChannelNotWhitelisted => "channel_not_whitelisted",
            OnboardingErrorKind::AssetNotConvertible => "asset_not_convertible",
            OnboardingErrorKind::ZeroAmount => "zero_amount",
            OnboardingErrorKind::ReceiverFunded => "receiver_funded",
            OnboardingErrorKind::RegistrationDenied => "registration_denied",
            OnboardingErrorKind::RegistrationFailed => "registration_failed",
            OnboardingErrorKind::SwapFailed => "swap_failed",
            OnboardingErrorKind::UnderlyingTransferFailed => "underlying_transfer_failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_whitelist_allows_every_channel() {
        let params = Params::default();
        assert!(params.channel_allowed("channel-0"));
        assert!(params.channel_allowed("channel-99"));

        let params = Params {
            whitelisted_channels: vec!["channel-1".to_string()],
            ..Params::default()
        };
        assert!(params.channel_allowed("channel-1"));
        assert!(!params.channel_allowed("channel-0"));
    }

    #[test]
    fn test_swap_policy_validate() {
        assert!(Params::default().swap_policy.validate().is_ok());

        let zero = SwapPolicy::TopUp {
            threshold: Uint128::zero(),
        };
        assert!(zero.validate().is_err());

        let too_big = SwapPolicy::FixedFraction {
            bps: 10_001,
            max_native: Uint128::new(1),
        };
        assert!(too_big.validate().is_err());

        let ok = SwapPolicy::FixedFraction {
            bps: 2_500,
            max_native: Uint128::new(1_000),
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_error_kind_wire_name() {
        let json = cosmwasm_std::to_json_vec(&OnboardingErrorKind::ChannelNotWhitelisted).unwrap();
        assert_eq!(json, br#""channel_not_whitelisted""#.to_vec());
        assert_eq!(
            OnboardingErrorKind::SwapFailed.as_str(),
            "swap_failed"
        );
    }
}
