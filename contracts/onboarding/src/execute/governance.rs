//! Governance handlers.
//!
//! This module handles:
//! - Params updates
//! - Manual token pair registration and toggling
//! - Liquidity pool provisioning

use cosmwasm_std::{DepsMut, Event, MessageInfo, Response, Uint128};

use common::{Params, TokenPair};

use crate::error::{ContractError, RegistryError};
use crate::hash::token_pair_address;
use crate::interceptor::PAIR_REGISTERED_EVENT;
use crate::params::set_params;
use crate::registrar::{PairRegistry, TokenRegistry};
use crate::state::{Pool, POOLS, TOKEN_PAIRS};
use super::admin::ensure_admin;

// ============================================================================
// Params
// ============================================================================

pub fn execute_update_params(
    deps: DepsMut,
    info: MessageInfo,
    params: Params,
) -> Result<Response, ContractError> {
    let versioned = set_params(deps.storage, &info.sender, params)?;

    Ok(Response::new()
        .add_attribute("method", "update_params")
        .add_attribute("version", versioned.version.to_string())
        .add_attribute(
            "enable_onboarding",
            versioned.params.enable_onboarding.to_string(),
        )
        .add_attribute(
            "whitelisted_channels",
            versioned.params.whitelisted_channels.join(","),
        )
        .add_attribute("swap_policy", versioned.params.swap_policy.as_str()))
}

// ============================================================================
// Token Pairs
// ============================================================================

/// Register a token pair for any denom, including ones the automatic policy
/// would not register (e.g. native denoms).
pub fn execute_register_token_pair(
    deps: DepsMut,
    info: MessageInfo,
    denom: String,
) -> Result<Response, ContractError> {
    ensure_admin(deps.storage, &info.sender)?;
    if denom.is_empty() {
        return Err(ContractError::InvalidParams {
            reason: "denom must not be empty".to_string(),
        });
    }
    if TOKEN_PAIRS.has(deps.storage, &denom) {
        return Err(ContractError::TokenPairExists { denom });
    }

    let pair = match PairRegistry.create_pair(deps.storage, &denom) {
        Ok(pair) => pair,
        Err(RegistryError::AlreadyExists { denom }) => {
            return Err(ContractError::TokenPairExists { denom })
        }
        Err(RegistryError::Denied { .. }) => {
            let pair = TokenPair {
                contract_address: token_pair_address(&denom),
                denom: denom.clone(),
                enabled: true,
            };
            TOKEN_PAIRS.save(deps.storage, &denom, &pair)?;
            pair
        }
        Err(RegistryError::Std(err)) => return Err(err.into()),
    };

    Ok(Response::new()
        .add_event(
            Event::new(PAIR_REGISTERED_EVENT)
                .add_attribute("denom", &pair.denom)
                .add_attribute("contract_address", &pair.contract_address),
        )
        .add_attribute("method", "register_token_pair")
        .add_attribute("denom", pair.denom)
        .add_attribute("contract_address", pair.contract_address))
}

pub fn execute_toggle_token_pair(
    deps: DepsMut,
    info: MessageInfo,
    denom: String,
    enabled: bool,
) -> Result<Response, ContractError> {
    ensure_admin(deps.storage, &info.sender)?;

    let mut pair = TOKEN_PAIRS
        .may_load(deps.storage, &denom)?
        .ok_or_else(|| ContractError::TokenPairNotFound {
            denom: denom.clone(),
        })?;
    pair.enabled = enabled;
    TOKEN_PAIRS.save(deps.storage, &denom, &pair)?;

    Ok(Response::new()
        .add_attribute("method", "toggle_token_pair")
        .add_attribute("denom", denom)
        .add_attribute("enabled", enabled.to_string()))
}

// ============================================================================
// Liquidity
// ============================================================================

/// Set the reserves of the `denom`/native pool. Zero reserves disable it.
pub fn execute_set_pool(
    deps: DepsMut,
    info: MessageInfo,
    denom: String,
    source_reserve: Uint128,
    native_reserve: Uint128,
) -> Result<Response, ContractError> {
    let config = ensure_admin(deps.storage, &info.sender)?;
    if denom.is_empty() || denom == config.native_denom {
        return Err(ContractError::InvalidPool { denom });
    }
    if source_reserve.is_zero() != native_reserve.is_zero() {
        return Err(ContractError::InvalidPool { denom });
    }

    POOLS.save(
        deps.storage,
        &denom,
        &Pool {
            denom: denom.clone(),
            source_reserve,
            native_reserve,
        },
    )?;

    Ok(Response::new()
        .add_attribute("method", "set_pool")
        .add_attribute("denom", denom)
        .add_attribute("source_reserve", source_reserve)
        .add_attribute("native_reserve", native_reserve))
}
