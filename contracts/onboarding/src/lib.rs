//! Onboarding Contract - Native Gas Top-Up for Inbound IBC Transfers
//!
//! An account that receives bridged assets usually holds none of the native
//! fee asset and cannot transact. This contract terminates ICS-20 channels
//! and, on every inbound transfer, swaps a bounded part of the received asset
//! into the native asset for the receiver.
//!
//! # Packet Flow
//! 1. The transfer handler credits the voucher (or releases escrow)
//! 2. The eligibility rules run against the current params
//! 3. If eligible, a token pair is ensured for the denom
//! 4. A capped swap into the native asset runs through the liquidity pools
//! 5. The transfer handler's acknowledgement is returned unchanged
//!
//! # Guarantees
//! - Onboarding never changes the acknowledgement of a credited transfer
//! - A failed swap leaves no partial debit behind
//! - Native credited never exceeds the swap policy's cap

pub mod cache;
pub mod contract;
pub mod conversion;
pub mod eligibility;
pub mod error;
mod execute;
pub mod fee_manager;
pub mod hash;
pub mod ibc;
pub mod interceptor;
pub mod ledger;
pub mod liquidity;
pub mod msg;
pub mod params;
mod query;
pub mod registrar;
pub mod state;
pub mod transfer;

pub use crate::error::ContractError;
pub use crate::interceptor::{OnboardingMiddleware, PacketState, Processed};
pub use crate::transfer::{PacketReceiver, Receipt};
