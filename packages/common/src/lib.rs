//! Common - Shared Types for the Onboarding Middleware
//!
//! This package provides the value types exchanged between the onboarding
//! contract, its callers, and its tests:
//! - `ics20` - ICS-20 fungible token packet data and acknowledgements
//! - `onboarding` - params, decisions, outcomes and token pairs

pub mod ics20;
pub mod onboarding;

pub use ics20::{FungibleTokenPacketData, Ics20Ack};
pub use onboarding::{
    ConversionOutcome, Decision, InboundTransfer, OnboardingErrorKind, Params, SwapPolicy,
    TokenPair,
};
