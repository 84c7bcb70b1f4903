//! Error types for the onboarding contract
//!
//! `ContractError` is returned by execute handlers and the channel handshake.
//! The collaborator errors below never escape a packet receive: the
//! interceptor folds them into acknowledgements or onboarding outcomes.

use cosmwasm_std::{StdError, Uint128};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    // ========================================================================
    // Authorization Errors
    // ========================================================================

    #[error("Unauthorized: only the governance authority can perform this action")]
    Unauthorized,

    #[error("Unauthorized: only pending admin can accept")]
    UnauthorizedPendingAdmin,

    // ========================================================================
    // Admin Errors
    // ========================================================================

    #[error("No pending admin change")]
    NoPendingAdmin,

    #[error("Timelock not expired: {remaining_seconds} seconds remaining")]
    TimelockNotExpired { remaining_seconds: u64 },

    // ========================================================================
    // Params Errors
    // ========================================================================

    #[error("Duplicate whitelisted channel: {channel}")]
    DuplicateChannel { channel: String },

    #[error("Invalid params: {reason}")]
    InvalidParams { reason: String },

    // ========================================================================
    // Registry & Pool Errors
    // ========================================================================

    #[error("Token pair already registered: {denom}")]
    TokenPairExists { denom: String },

    #[error("Token pair not found: {denom}")]
    TokenPairNotFound { denom: String },

    #[error("Invalid pool reserves for {denom}")]
    InvalidPool { denom: String },

    // ========================================================================
    // IBC Handshake Errors
    // ========================================================================

    #[error("Only unordered channels are supported")]
    InvalidChannelOrder,

    #[error("Invalid channel version: expected {expected}, got {got}")]
    InvalidChannelVersion { expected: String, got: String },
}

/// Failure of the wrapped transfer handler. Becomes an error acknowledgement.
#[derive(Error, Debug, PartialEq)]
pub enum TransferError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("invalid packet data: {reason}")]
    InvalidPacketData { reason: String },

    #[error("invalid amount: {amount}")]
    InvalidAmount { amount: String },

    #[error("amount exceeds ledger range: {amount}")]
    AmountOverflow { amount: String },

    #[error("invalid receiver: {receiver}")]
    InvalidReceiver { receiver: String },

    #[error("unknown channel: {channel}")]
    UnknownChannel { channel: String },

    #[error("insufficient escrow for {denom}: have {available}, need {requested}")]
    InsufficientEscrow {
        denom: String,
        available: Uint128,
        requested: Uint128,
    },
}

/// Failure reported by the liquidity collaborator
#[derive(Error, Debug, PartialEq)]
pub enum LiquidityError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("no pool for {source_denom} -> {target_denom}")]
    NoPool {
        source_denom: String,
        target_denom: String,
    },

    #[error("insufficient liquidity: requested {requested}, reserve {reserve}")]
    InsufficientLiquidity { requested: Uint128, reserve: Uint128 },

    #[error("slippage exceeded: minimum {min_out}, got {out}")]
    SlippageExceeded { min_out: Uint128, out: Uint128 },

    #[error("insufficient balance: have {available}, need {requested}")]
    InsufficientBalance {
        available: Uint128,
        requested: Uint128,
    },

    #[error("native credit {credited} exceeds cap {cap}")]
    CapExceeded { credited: Uint128, cap: Uint128 },
}

/// Failure reported by the token pair registry collaborator
#[derive(Error, Debug, PartialEq)]
pub enum RegistryError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("registration denied for {denom}")]
    Denied { denom: String },

    #[error("token pair already exists for {denom}")]
    AlreadyExists { denom: String },
}
