//! Query handlers for the onboarding contract.

use cosmwasm_std::{Deps, Order, StdResult};
use cw_storage_plus::Bound;

use common::{Decision, InboundTransfer, TokenPair};

use crate::eligibility::{evaluate, ReceiverView};
use crate::hash::VOUCHER_PREFIX;
use crate::ledger::{Bank, Ledger};
use crate::msg::{
    BalanceResponse, ChannelResponse, ChannelsResponse, ConfigResponse, DenomTraceResponse,
    ParamsResponse, PendingAdminResponse, PoolResponse, StatsResponse, TokenPairsResponse,
};
use crate::params::get_params;
use crate::registrar::{PairRegistry, TokenRegistry};
use crate::state::{
    ChannelInfo, CHANNELS, CONFIG, DENOM_TRACES, PENDING_ADMIN, POOLS, STATS, TOKEN_PAIRS,
};

// ============================================================================
// Core Queries
// ============================================================================

pub fn query_config(deps: Deps) -> StdResult<ConfigResponse> {
    let config = CONFIG.load(deps.storage)?;
    Ok(ConfigResponse {
        admin: config.admin,
        native_denom: config.native_denom,
        fee_collector: config.fee_collector,
    })
}

pub fn query_params(deps: Deps) -> StdResult<ParamsResponse> {
    let versioned = get_params(deps.storage)?;
    Ok(ParamsResponse {
        version: versioned.version,
        params: versioned.params,
    })
}

pub fn query_stats(deps: Deps) -> StdResult<StatsResponse> {
    let stats = STATS.load(deps.storage)?;
    Ok(StatsResponse {
        total_packets_received: stats.total_packets_received,
        total_packets_failed: stats.total_packets_failed,
        total_onboarded: stats.total_onboarded,
        total_native_credited: stats.total_native_credited,
    })
}

/// Query pending admin proposal.
pub fn query_pending_admin(deps: Deps) -> StdResult<Option<PendingAdminResponse>> {
    let pending = PENDING_ADMIN.may_load(deps.storage)?;
    Ok(pending.map(|p| PendingAdminResponse {
        new_address: p.new_address,
        execute_after: p.execute_after,
    }))
}

// ============================================================================
// Ledger & Liquidity Queries
// ============================================================================

pub fn query_balance(deps: Deps, address: String, denom: String) -> StdResult<BalanceResponse> {
    let address = deps.api.addr_validate(&address)?;
    let amount = Bank.balance(deps.storage, &address, &denom)?;
    Ok(BalanceResponse {
        address,
        denom,
        amount,
    })
}

pub fn query_pool(deps: Deps, denom: String) -> StdResult<PoolResponse> {
    let pool = POOLS.load(deps.storage, &denom)?;
    Ok(PoolResponse {
        denom: pool.denom,
        source_reserve: pool.source_reserve,
        native_reserve: pool.native_reserve,
    })
}

// ============================================================================
// Token Pair Queries
// ============================================================================

pub fn query_token_pair(deps: Deps, denom: String) -> StdResult<TokenPair> {
    TOKEN_PAIRS.load(deps.storage, &denom)
}

/// Query token pairs with pagination.
pub fn query_token_pairs(
    deps: Deps,
    start_after: Option<String>,
    limit: Option<u32>,
) -> StdResult<TokenPairsResponse> {
    let limit = limit.unwrap_or(10).min(50) as usize;
    let start = start_after.as_deref().map(Bound::exclusive);

    let pairs = TOKEN_PAIRS
        .range(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .map(|item| item.map(|(_, pair)| pair))
        .collect::<StdResult<Vec<_>>>()?;

    Ok(TokenPairsResponse { pairs })
}

// ============================================================================
// ICS-20 Queries
// ============================================================================

pub fn query_denom_trace(deps: Deps, hash: String) -> StdResult<DenomTraceResponse> {
    let hash = hash
        .strip_prefix(VOUCHER_PREFIX)
        .unwrap_or(&hash)
        .to_uppercase();
    let trace = DENOM_TRACES.load(deps.storage, &hash)?;
    Ok(DenomTraceResponse {
        denom: format!("{}{}", VOUCHER_PREFIX, hash),
        path: trace.path,
        base_denom: trace.base_denom,
    })
}

fn channel_response(info: ChannelInfo) -> ChannelResponse {
    ChannelResponse {
        id: info.id,
        counterparty_endpoint: info.counterparty_endpoint,
        connection_id: info.connection_id,
    }
}

pub fn query_channel(deps: Deps, id: String) -> StdResult<ChannelResponse> {
    CHANNELS.load(deps.storage, &id).map(channel_response)
}

pub fn query_channels(deps: Deps) -> StdResult<ChannelsResponse> {
    let channels = CHANNELS
        .range(deps.storage, None, None, Order::Ascending)
        .map(|item| item.map(|(_, info)| channel_response(info)))
        .collect::<StdResult<Vec<_>>>()?;
    Ok(ChannelsResponse { channels })
}

// ============================================================================
// Simulation Queries
// ============================================================================

/// Evaluate the eligibility rules for a hypothetical credited transfer.
pub fn query_evaluate(deps: Deps, transfer: InboundTransfer) -> StdResult<Decision> {
    let config = CONFIG.load(deps.storage)?;
    let params = get_params(deps.storage)?.params;
    let view = ReceiverView {
        pair: PairRegistry.get_pair(deps.storage, &transfer.denom)?,
        may_register: PairRegistry.may_register(&params, &transfer.denom),
        native_balance: Bank.balance(deps.storage, &transfer.receiver, &config.native_denom)?,
    };
    Ok(evaluate(&params, &transfer, &view))
}
