//! Params store.
//!
//! Params are read once per packet and passed down by reference, so a
//! governance write can only affect packets processed after it.

use std::collections::BTreeSet;

use cosmwasm_std::{Addr, StdResult, Storage};

use common::onboarding::BPS_DENOMINATOR;
use common::Params;

use crate::error::ContractError;
use crate::fee_manager::validate_fee;
use crate::state::{VersionedParams, CONFIG, PARAMS};

pub fn get_params(storage: &dyn Storage) -> StdResult<VersionedParams> {
    PARAMS.load(storage)
}

/// Replace the params. Only the governance authority may call this.
pub fn set_params(
    storage: &mut dyn Storage,
    sender: &Addr,
    params: Params,
) -> Result<VersionedParams, ContractError> {
    let config = CONFIG.load(storage)?;
    if *sender != config.admin {
        return Err(ContractError::Unauthorized);
    }
    validate_params(&params)?;

    let version = PARAMS
        .may_load(storage)?
        .map(|current| current.version + 1)
        .unwrap_or(1);
    let versioned = VersionedParams { version, params };
    PARAMS.save(storage, &versioned)?;
    Ok(versioned)
}

pub fn validate_params(params: &Params) -> Result<(), ContractError> {
    let mut seen = BTreeSet::new();
    for channel in &params.whitelisted_channels {
        if !seen.insert(channel.as_str()) {
            return Err(ContractError::DuplicateChannel {
                channel: channel.clone(),
            });
        }
    }

    let invalid = |e: cosmwasm_std::StdError| ContractError::InvalidParams {
        reason: e.to_string(),
    };
    validate_fee(params.fee_bps).map_err(invalid)?;
    params.swap_policy.validate().map_err(invalid)?;

    if params.max_slippage_bps > BPS_DENOMINATOR {
        return Err(ContractError::InvalidParams {
            reason: format!(
                "Slippage {} exceeds {}",
                params.max_slippage_bps, BPS_DENOMINATOR
            ),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Config;
    use cosmwasm_std::testing::MockStorage;
    use cosmwasm_std::Uint128;
    use common::SwapPolicy;

    fn setup() -> MockStorage {
        let mut store = MockStorage::new();
        CONFIG
            .save(
                &mut store,
                &Config {
                    admin: Addr::unchecked("gov"),
                    native_denom: "aalthea".to_string(),
                    fee_collector: Addr::unchecked("collector"),
                },
            )
            .unwrap();
        PARAMS
            .save(
                &mut store,
                &VersionedParams {
                    version: 0,
                    params: Params::default(),
                },
            )
            .unwrap();
        store
    }

    #[test]
    fn test_set_params_bumps_version() {
        let mut store = setup();
        let gov = Addr::unchecked("gov");

        let params = Params {
            enable_onboarding: true,
            whitelisted_channels: vec!["channel-0".to_string(), "channel-1".to_string()],
            ..Params::default()
        };
        let written = set_params(&mut store, &gov, params.clone()).unwrap();
        assert_eq!(written.version, 1);
        assert_eq!(get_params(&store).unwrap().params, params);

        let written = set_params(&mut store, &gov, Params::default()).unwrap();
        assert_eq!(written.version, 2);
        assert!(get_params(&store).unwrap().params.whitelisted_channels.is_empty());
    }

    #[test]
    fn test_set_params_unauthorized() {
        let mut store = setup();
        let err = set_params(&mut store, &Addr::unchecked("mallory"), Params::default())
            .unwrap_err();
        assert_eq!(err, ContractError::Unauthorized);
        assert_eq!(get_params(&store).unwrap().version, 0);
    }

    #[test]
    fn test_validate_params() {
        let dup = Params {
            whitelisted_channels: vec!["channel-0".to_string(), "channel-0".to_string()],
            ..Params::default()
        };
        assert_eq!(
            validate_params(&dup).unwrap_err(),
            ContractError::DuplicateChannel {
                channel: "channel-0".to_string()
            }
        );

        let fee = Params {
            fee_bps: 101,
            ..Params::default()
        };
        assert!(matches!(
            validate_params(&fee).unwrap_err(),
            ContractError::InvalidParams { .. }
        ));

        let policy = Params {
            swap_policy: SwapPolicy::TopUp {
                threshold: Uint128::zero(),
            },
            ..Params::default()
        };
        assert!(validate_params(&policy).is_err());

        let slippage = Params {
            max_slippage_bps: 10_001,
            ..Params::default()
        };
        assert!(validate_params(&slippage).is_err());

        assert!(validate_params(&Params::default()).is_ok());
    }
}
