//! Message types for the onboarding contract
//!
//! Instantiation, governance execute messages and queries. Packets do not
//! arrive through these messages but through the IBC entry points.

use common::{Decision, InboundTransfer, Params, TokenPair};
use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, IbcEndpoint, Timestamp, Uint128};

// ============================================================================
// Instantiate & Migrate
// ============================================================================

/// Migrate message
#[cw_serde]
pub struct MigrateMsg {}

/// Instantiate message
#[cw_serde]
pub struct InstantiateMsg {
    /// Governance authority
    pub admin: String,
    /// Denom of the native gas asset
    pub native_denom: String,
    /// Receives the protocol fee charged on swaps
    pub fee_collector: String,
    /// Initial params (onboarding disabled when omitted)
    pub params: Option<Params>,
}

// ============================================================================
// Execute Messages
// ============================================================================

/// Execute messages. All of them are restricted to the governance authority
/// except `AcceptAdmin`, which the pending admin sends.
#[cw_serde]
pub enum ExecuteMsg {
    // ========================================================================
    // Params
    // ========================================================================
    /// Replace the onboarding params, bumping their version
    UpdateParams { params: Params },

    // ========================================================================
    // Token Pairs
    // ========================================================================
    /// Register a token pair for a denom outside the automatic policy
    RegisterTokenPair { denom: String },

    /// Enable or disable conversion of a registered denom
    ToggleTokenPair { denom: String, enabled: bool },

    // ========================================================================
    // Liquidity
    // ========================================================================
    /// Provision (or reprice) the pool between `denom` and the native asset
    SetPool {
        denom: String,
        source_reserve: Uint128,
        native_reserve: Uint128,
    },

    // ========================================================================
    // Admin Operations
    // ========================================================================
    /// Propose a new admin (starts 7-day timelock)
    ProposeAdmin { new_admin: String },

    /// Accept admin role (only callable by pending admin after timelock)
    AcceptAdmin {},

    /// Cancel pending admin proposal
    CancelAdminProposal {},
}

// ============================================================================
// Query Messages
// ============================================================================

/// Query messages
#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    // ========================================================================
    // Core Queries
    // ========================================================================
    /// Returns contract configuration
    #[returns(ConfigResponse)]
    Config {},

    /// Returns the current params and their version
    #[returns(ParamsResponse)]
    Params {},

    /// Returns onboarding statistics
    #[returns(StatsResponse)]
    Stats {},

    /// Returns pending admin proposal details
    #[returns(Option<PendingAdminResponse>)]
    PendingAdmin {},

    // ========================================================================
    // Ledger & Liquidity
    // ========================================================================
    /// Returns the ledger balance of an account
    #[returns(BalanceResponse)]
    Balance { address: String, denom: String },

    /// Returns the pool of a source denom
    #[returns(PoolResponse)]
    Pool { denom: String },

    // ========================================================================
    // Token Pairs
    // ========================================================================
    /// Returns the token pair of a denom
    #[returns(TokenPair)]
    TokenPair { denom: String },

    /// Returns registered token pairs
    #[returns(TokenPairsResponse)]
    TokenPairs {
        start_after: Option<String>,
        limit: Option<u32>,
    },

    // ========================================================================
    // ICS-20
    // ========================================================================
    /// Returns the trace of a voucher, by hash (with or without `ibc/`)
    #[returns(DenomTraceResponse)]
    DenomTrace { hash: String },

    /// Returns a connected channel
    #[returns(ChannelResponse)]
    Channel { id: String },

    /// Returns every connected channel
    #[returns(ChannelsResponse)]
    Channels {},

    // ========================================================================
    // Simulation
    // ========================================================================
    /// Dry-run the eligibility rules for a transfer against current state
    #[returns(Decision)]
    Evaluate { transfer: InboundTransfer },
}

// ============================================================================
// Query Responses
// ============================================================================

#[cw_serde]
pub struct ConfigResponse {
    pub admin: Addr,
    pub native_denom: String,
    pub fee_collector: Addr,
}

#[cw_serde]
pub struct ParamsResponse {
    pub version: u64,
    pub params: Params,
}

#[cw_serde]
pub struct StatsResponse {
    pub total_packets_received: u64,
    pub total_packets_failed: u64,
    pub total_onboarded: u64,
    pub total_native_credited: Uint128,
}

#[cw_serde]
pub struct PendingAdminResponse {
    pub new_address: Addr,
    pub execute_after: Timestamp,
}

#[cw_serde]
pub struct BalanceResponse {
    pub address: Addr,
    pub denom: String,
    pub amount: Uint128,
}

#[cw_serde]
pub struct PoolResponse {
    pub denom: String,
    pub source_reserve: Uint128,
    pub native_reserve: Uint128,
}

#[cw_serde]
pub struct TokenPairsResponse {
    pub pairs: Vec<TokenPair>,
}

#[cw_serde]
pub struct DenomTraceResponse {
    /// Voucher denom, `ibc/<HASH>`
    pub denom: String,
    pub path: String,
    pub base_denom: String,
}

#[cw_serde]
pub struct ChannelResponse {
    pub id: String,
    pub counterparty_endpoint: IbcEndpoint,
    pub connection_id: String,
}

#[cw_serde]
pub struct ChannelsResponse {
    pub channels: Vec<ChannelResponse>,
}
