//! Token pair registrar.
//!
//! `ensure_pair` guarantees a token pair exists for a denom before its
//! conversion. It is idempotent: an existing pair is returned untouched, and
//! a concurrent creation reported by the registry as `AlreadyExists` resolves
//! to the pair that won.

use cosmwasm_std::{StdResult, Storage};

use common::{OnboardingErrorKind, Params, TokenPair};

use crate::error::RegistryError;
use crate::hash::{is_voucher, token_pair_address};
use crate::state::TOKEN_PAIRS;

pub trait TokenRegistry {
    fn get_pair(&self, storage: &dyn Storage, denom: &str) -> StdResult<Option<TokenPair>>;

    fn create_pair(&self, storage: &mut dyn Storage, denom: &str)
        -> Result<TokenPair, RegistryError>;

    /// Governance policy for automatic registration of `denom`
    fn may_register(&self, params: &Params, denom: &str) -> bool;
}

/// Registry over `TOKEN_PAIRS`. Only voucher denoms can be registered.
#[derive(Clone, Copy, Debug, Default)]
pub struct PairRegistry;

impl TokenRegistry for PairRegistry {
    fn get_pair(&self, storage: &dyn Storage, denom: &str) -> StdResult<Option<TokenPair>> {
        TOKEN_PAIRS.may_load(storage, denom)
    }

    fn create_pair(
        &self,
        storage: &mut dyn Storage,
        denom: &str,
    ) -> Result<TokenPair, RegistryError> {
        if !is_voucher(denom) {
            return Err(RegistryError::Denied {
                denom: denom.to_string(),
            });
        }
        if TOKEN_PAIRS.has(storage, denom) {
            return Err(RegistryError::AlreadyExists {
                denom: denom.to_string(),
            });
        }

        let pair = TokenPair {
            denom: denom.to_string(),
            contract_address: token_pair_address(denom),
            enabled: true,
        };
        TOKEN_PAIRS.save(storage, denom, &pair)?;
        Ok(pair)
    }

    fn may_register(&self, params: &Params, denom: &str) -> bool {
        params.auto_register_pairs && is_voucher(denom)
    }
}

/// Pair returned by `ensure_pair`
#[derive(Clone, Debug, PartialEq)]
pub struct Registration {
    pub pair: TokenPair,
    /// True when this call created the pair
    pub created: bool,
}

pub fn ensure_pair<R: TokenRegistry>(
    registry: &R,
    storage: &mut dyn Storage,
    params: &Params,
    denom: &str,
) -> Result<Registration, OnboardingErrorKind> {
    match registry.get_pair(storage, denom) {
        Ok(Some(pair)) => {
            return Ok(Registration {
                pair,
                created: false,
            })
        }
        Ok(None) => {}
        Err(_) => return Err(OnboardingErrorKind::RegistrationFailed),
    }

    if !registry.may_register(params, denom) {
        return Err(OnboardingErrorKind::RegistrationDenied);
    }

    match registry.create_pair(storage, denom) {
        Ok(pair) => Ok(Registration {
            pair,
            created: true,
        }),
        Err(RegistryError::AlreadyExists { .. }) => match registry.get_pair(storage, denom) {
            Ok(Some(pair)) => Ok(Registration {
                pair,
                created: false,
            }),
            _ => Err(OnboardingErrorKind::RegistrationFailed),
        },
        Err(RegistryError::Denied { .. }) => Err(OnboardingErrorKind::RegistrationDenied),
        Err(RegistryError::Std(_)) => Err(OnboardingErrorKind::RegistrationFailed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cosmwasm_std::testing::MockStorage;
    use cosmwasm_std::StdError;

    const VOUCHER: &str = "ibc/27394FB092D2ECCD56123C74F36E4C1F926001CEADA9CA97EA622B25F41E5EB2";

    fn auto_register() -> Params {
        Params {
            auto_register_pairs: true,
            ..Params::default()
        }
    }

    #[test]
    fn test_ensure_pair_creates_once() {
        let mut store = MockStorage::new();
        let params = auto_register();

        let first = ensure_pair(&PairRegistry, &mut store, &params, VOUCHER).unwrap();
        assert!(first.created);
        assert!(first.pair.enabled);
        assert_eq!(first.pair.contract_address, token_pair_address(VOUCHER));

        let second = ensure_pair(&PairRegistry, &mut store, &params, VOUCHER).unwrap();
        assert!(!second.created);
        assert_eq!(second.pair, first.pair);

        let count = TOKEN_PAIRS
            .range(&store, None, None, cosmwasm_std::Order::Ascending)
            .count();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_existing_pair_returned_even_when_policy_forbids() {
        let mut store = MockStorage::new();
        PairRegistry.create_pair(&mut store, VOUCHER).unwrap();

        let res = ensure_pair(&PairRegistry, &mut store, &Params::default(), VOUCHER).unwrap();
        assert!(!res.created);
    }

    #[test]
    fn test_policy_denies() {
        let mut store = MockStorage::new();

        let err = ensure_pair(&PairRegistry, &mut store, &Params::default(), VOUCHER).unwrap_err();
        assert_eq!(err, OnboardingErrorKind::RegistrationDenied);

        // Native denoms are never registered automatically
        let err = ensure_pair(&PairRegistry, &mut store, &auto_register(), "uatom").unwrap_err();
        assert_eq!(err, OnboardingErrorKind::RegistrationDenied);
        let count = TOKEN_PAIRS
            .range(&store, None, None, cosmwasm_std::Order::Ascending)
            .count();
        assert_eq!(count, 0);
    }

    /// Registry that loses the creation race: the pair appears between the
    /// lookup and the create call.
    struct RacingRegistry;

    impl TokenRegistry for RacingRegistry {
        fn get_pair(&self, storage: &dyn Storage, denom: &str) -> StdResult<Option<TokenPair>> {
            PairRegistry.get_pair(storage, denom)
        }

        fn create_pair(
            &self,
            storage: &mut dyn Storage,
            denom: &str,
        ) -> Result<TokenPair, RegistryError> {
            PairRegistry.create_pair(storage, denom)?;
            Err(RegistryError::AlreadyExists {
                denom: denom.to_string(),
            })
        }

        fn may_register(&self, _params: &Params, _denom: &str) -> bool {
            true
        }
    }

    #[test]
    fn test_already_exists_resolves_to_success() {
        let mut store = MockStorage::new();
        let res = ensure_pair(&RacingRegistry, &mut store, &Params::default(), VOUCHER).unwrap();
        assert!(!res.created);
        assert_eq!(res.pair.denom, VOUCHER);
    }

    struct BrokenRegistry;

    impl TokenRegistry for BrokenRegistry {
        fn get_pair(&self, _storage: &dyn Storage, _denom: &str) -> StdResult<Option<TokenPair>> {
            Ok(None)
        }

        fn create_pair(
            &self,
            _storage: &mut dyn Storage,
            _denom: &str,
        ) -> Result<TokenPair, RegistryError> {
            Err(StdError::generic_err("registry unavailable").into())
        }

        fn may_register(&self, _params: &Params, _denom: &str) -> bool {
            true
        }
    }

    #[test]
    fn test_registry_error_is_registration_failed() {
        let mut store = MockStorage::new();
        let err = ensure_pair(&BrokenRegistry, &mut store, &Params::default(), VOUCHER).unwrap_err();
        assert_eq!(err, OnboardingErrorKind::RegistrationFailed);
    }
}
