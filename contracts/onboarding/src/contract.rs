//! Onboarding Contract - Entry Points
//!
//! The implementation is modularized into:
//! - `execute/` - Governance execute handlers
//! - `query` - Query handlers
//! - `ibc` - Channel handshake and packet entry points

#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;
use cosmwasm_std::{to_json_binary, Binary, Deps, DepsMut, Env, MessageInfo, Response, StdResult};
use cw2::set_contract_version;

use common::Params;

use crate::error::ContractError;
use crate::execute::{
    execute_accept_admin, execute_cancel_admin_proposal, execute_propose_admin,
    execute_register_token_pair, execute_set_pool, execute_toggle_token_pair,
    execute_update_params,
};
use crate::msg::{ExecuteMsg, InstantiateMsg, MigrateMsg, QueryMsg};
use crate::params::validate_params;
use crate::query::{
    query_balance, query_channel, query_channels, query_config, query_denom_trace,
    query_evaluate, query_params, query_pending_admin, query_pool, query_stats, query_token_pair,
    query_token_pairs,
};
use crate::state::{
    Config, Stats, VersionedParams, CONFIG, CONTRACT_NAME, CONTRACT_VERSION, PARAMS, STATS,
};

// ============================================================================
// Instantiate
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let admin = deps.api.addr_validate(&msg.admin)?;
    let fee_collector = deps.api.addr_validate(&msg.fee_collector)?;
    if msg.native_denom.is_empty() {
        return Err(ContractError::InvalidParams {
            reason: "native_denom must not be empty".to_string(),
        });
    }

    let config = Config {
        admin,
        native_denom: msg.native_denom,
        fee_collector,
    };
    CONFIG.save(deps.storage, &config)?;

    let params = msg.params.unwrap_or_default();
    validate_params(&params)?;
    PARAMS.save(deps.storage, &VersionedParams { version: 1, params })?;

    STATS.save(deps.storage, &Stats::default())?;

    Ok(Response::new()
        .add_attribute("method", "instantiate")
        .add_attribute("admin", config.admin)
        .add_attribute("native_denom", config.native_denom)
        .add_attribute("fee_collector", config.fee_collector))
}

// ============================================================================
// Execute
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        // Params
        ExecuteMsg::UpdateParams { params } => execute_update_params(deps, info, params),

        // Token pairs
        ExecuteMsg::RegisterTokenPair { denom } => execute_register_token_pair(deps, info, denom),
        ExecuteMsg::ToggleTokenPair { denom, enabled } => {
            execute_toggle_token_pair(deps, info, denom, enabled)
        }

        // Liquidity
        ExecuteMsg::SetPool {
            denom,
            source_reserve,
            native_reserve,
        } => execute_set_pool(deps, info, denom, source_reserve, native_reserve),

        // Admin operations
        ExecuteMsg::ProposeAdmin { new_admin } => execute_propose_admin(deps, env, info, new_admin),
        ExecuteMsg::AcceptAdmin {} => execute_accept_admin(deps, env, info),
        ExecuteMsg::CancelAdminProposal {} => execute_cancel_admin_proposal(deps, info),
    }
}

// ============================================================================
// Query
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        // Core queries
        QueryMsg::Config {} => to_json_binary(&query_config(deps)?),
        QueryMsg::Params {} => to_json_binary(&query_params(deps)?),
        QueryMsg::Stats {} => to_json_binary(&query_stats(deps)?),
        QueryMsg::PendingAdmin {} => to_json_binary(&query_pending_admin(deps)?),

        // Ledger & liquidity
        QueryMsg::Balance { address, denom } => {
            to_json_binary(&query_balance(deps, address, denom)?)
        }
        QueryMsg::Pool { denom } => to_json_binary(&query_pool(deps, denom)?),

        // Token pairs
        QueryMsg::TokenPair { denom } => to_json_binary(&query_token_pair(deps, denom)?),
        QueryMsg::TokenPairs { start_after, limit } => {
            to_json_binary(&query_token_pairs(deps, start_after, limit)?)
        }

        // ICS-20
        QueryMsg::DenomTrace { hash } => to_json_binary(&query_denom_trace(deps, hash)?),
        QueryMsg::Channel { id } => to_json_binary(&query_channel(deps, id)?),
        QueryMsg::Channels {} => to_json_binary(&query_channels(deps)?),

        // Simulation
        QueryMsg::Evaluate { transfer } => to_json_binary(&query_evaluate(deps, transfer)?),
    }
}

// ============================================================================
// Migrate
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    // Back-fill state introduced after the first release
    if PARAMS.may_load(deps.storage)?.is_none() {
        PARAMS.save(
            deps.storage,
            &VersionedParams {
                version: 1,
                params: Params::default(),
            },
        )?;
    }
    if STATS.may_load(deps.storage)?.is_none() {
        STATS.save(deps.storage, &Stats::default())?;
    }

    Ok(Response::new()
        .add_attribute("action", "migrate")
        .add_attribute("version", CONTRACT_VERSION))
}
