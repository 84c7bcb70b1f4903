//! State definitions for the onboarding contract
//!
//! Governance configuration lives here together with the storage of every
//! collaborator the contract hosts: the voucher ledger, the liquidity pools,
//! the token pair registry and the ICS-20 channel/denom bookkeeping.

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, IbcEndpoint, Timestamp, Uint128};
use cw_storage_plus::{Item, Map};

use common::{Params, TokenPair};

// ============================================================================
// Core Configuration
// ============================================================================

/// Contract configuration, fixed at instantiation except for the admin
#[cw_serde]
pub struct Config {
    /// Governance authority, the only account allowed to change params
    pub admin: Addr,
    /// Denom of the native gas asset
    pub native_denom: String,
    /// Receives the protocol fee charged on swaps
    pub fee_collector: Addr,
}

/// Params together with a version bumped on every governance write
#[cw_serde]
pub struct VersionedParams {
    pub version: u64,
    pub params: Params,
}

/// Pending admin change proposal
#[cw_serde]
pub struct PendingAdmin {
    /// Proposed new admin address
    pub new_address: Addr,
    /// Block time when the change can be executed
    pub execute_after: Timestamp,
}

/// Onboarding statistics
#[cw_serde]
#[derive(Default)]
pub struct Stats {
    /// Packets whose transfer was credited
    pub total_packets_received: u64,
    /// Packets rejected by the transfer handler
    pub total_packets_failed: u64,
    /// Packets for which a swap completed
    pub total_onboarded: u64,
    /// Native asset credited by swaps
    pub total_native_credited: Uint128,
}

// ============================================================================
// Collaborator Records
// ============================================================================

/// Constant product pool between one source denom and the native asset
#[cw_serde]
pub struct Pool {
    pub denom: String,
    pub source_reserve: Uint128,
    pub native_reserve: Uint128,
}

/// Origin of an `ibc/` voucher denom
#[cw_serde]
pub struct DenomTrace {
    /// `port/channel` hops prepended on this chain, e.g. `transfer/channel-0`
    pub path: String,
    /// Denom on the origin chain
    pub base_denom: String,
}

impl DenomTrace {
    pub fn full_path(&self) -> String {
        format!("{}/{}", self.path, self.base_denom)
    }
}

/// Connected ICS-20 channel
#[cw_serde]
pub struct ChannelInfo {
    /// Local channel id
    pub id: String,
    /// Counterparty port and channel
    pub counterparty_endpoint: IbcEndpoint,
    /// Connection the channel rides on
    pub connection_id: String,
}

// ============================================================================
// Constants
// ============================================================================

/// Contract name for cw2 migration info
pub const CONTRACT_NAME: &str = "crates.io:onboarding";

/// Contract version for cw2 migration info
pub const CONTRACT_VERSION: &str = "0.1.0";

/// 7 days in seconds for admin change timelock
pub const ADMIN_TIMELOCK_DURATION: u64 = 604_800;

// ============================================================================
// Core State Storage
// ============================================================================

/// Primary config storage
pub const CONFIG: Item<Config> = Item::new("config");

/// Governance controlled onboarding params
pub const PARAMS: Item<VersionedParams> = Item::new("params");

/// Pending admin proposal (if any)
pub const PENDING_ADMIN: Item<PendingAdmin> = Item::new("pending_admin");

/// Onboarding statistics
pub const STATS: Item<Stats> = Item::new("stats");

// ============================================================================
// Collaborator Storage
// ============================================================================

/// Ledger balances
/// Key: (account, denom), Value: balance
pub const BALANCES: Map<(&Addr, &str), Uint128> = Map::new("balances");

/// Liquidity pools against the native asset
/// Key: source denom, Value: Pool
pub const POOLS: Map<&str, Pool> = Map::new("pools");

/// Token pair registry
/// Key: ledger denom, Value: TokenPair
pub const TOKEN_PAIRS: Map<&str, TokenPair> = Map::new("token_pairs");

/// Voucher denom traces
/// Key: uppercase hex hash (without `ibc/`), Value: DenomTrace
pub const DENOM_TRACES: Map<&str, DenomTrace> = Map::new("denom_traces");

/// Tokens escrowed per channel for outbound transfers of native denoms.
/// Only released on receive; no outbound path fills it.
/// Key: (channel id, denom), Value: escrowed amount
pub const CHANNEL_ESCROW: Map<(&str, &str), Uint128> = Map::new("channel_escrow");

/// Connected ICS-20 channels
/// Key: local channel id, Value: ChannelInfo
pub const CHANNELS: Map<&str, ChannelInfo> = Map::new("channels");
