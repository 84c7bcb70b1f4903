//! Ledger collaborator.
//!
//! The contract keeps the balances of every denom it handles (vouchers, the
//! native gas asset, token representations) in its own storage so that
//! crediting, debiting and swapping are synchronous and share the atomic
//! scope of the packet being processed.

use cosmwasm_std::{Addr, StdResult, Storage, Uint128};

use crate::state::BALANCES;

pub trait Ledger {
    fn balance(&self, storage: &dyn Storage, account: &Addr, denom: &str) -> StdResult<Uint128>;

    fn credit(
        &self,
        storage: &mut dyn Storage,
        account: &Addr,
        denom: &str,
        amount: Uint128,
    ) -> StdResult<()>;

    /// Fails with an overflow error when the balance is too small
    fn debit(
        &self,
        storage: &mut dyn Storage,
        account: &Addr,
        denom: &str,
        amount: Uint128,
    ) -> StdResult<()>;

    fn transfer(
        &self,
        storage: &mut dyn Storage,
        from: &Addr,
        to: &Addr,
        denom: &str,
        amount: Uint128,
    ) -> StdResult<()> {
        self.debit(storage, from, denom, amount)?;
        self.credit(storage, to, denom, amount)
    }
}

/// Storage backed ledger over `BALANCES`
#[derive(Clone, Copy, Debug, Default)]
pub struct Bank;

impl Ledger for Bank {
    fn balance(&self, storage: &dyn Storage, account: &Addr, denom: &str) -> StdResult<Uint128> {
        Ok(BALANCES
            .may_load(storage, (account, denom))?
            .unwrap_or_default())
    }

    fn credit(
        &self,
        storage: &mut dyn Storage,
        account: &Addr,
        denom: &str,
        amount: Uint128,
    ) -> StdResult<()> {
        if amount.is_zero() {
            return Ok(());
        }
        let balance = self.balance(storage, account, denom)?;
        BALANCES.save(storage, (account, denom), &balance.checked_add(amount)?)
    }

    fn debit(
        &self,
        storage: &mut dyn Storage,
        account: &Addr,
        denom: &str,
        amount: Uint128,
    ) -> StdResult<()> {
        if amount.is_zero() {
            return Ok(());
        }
        let remaining = self.balance(storage, account, denom)?.checked_sub(amount)?;
        if remaining.is_zero() {
            BALANCES.remove(storage, (account, denom));
        } else {
            BALANCES.save(storage, (account, denom), &remaining)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cosmwasm_std::testing::MockStorage;

    #[test]
    fn test_credit_debit() {
        let mut store = MockStorage::new();
        let alice = Addr::unchecked("alice");

        Bank.credit(&mut store, &alice, "uatom", Uint128::new(100))
            .unwrap();
        Bank.debit(&mut store, &alice, "uatom", Uint128::new(40))
            .unwrap();
        assert_eq!(
            Bank.balance(&store, &alice, "uatom").unwrap(),
            Uint128::new(60)
        );

        let err = Bank
            .debit(&mut store, &alice, "uatom", Uint128::new(61))
            .unwrap_err();
        assert!(err.to_string().contains("Overflow"), "{}", err);
        assert_eq!(
            Bank.balance(&store, &alice, "uatom").unwrap(),
            Uint128::new(60)
        );
    }

    #[test]
    fn test_transfer_moves_balance() {
        let mut store = MockStorage::new();
        let alice = Addr::unchecked("alice");
        let bob = Addr::unchecked("bob");

        Bank.credit(&mut store, &alice, "aalthea", Uint128::new(5))
            .unwrap();
        Bank.transfer(&mut store, &alice, &bob, "aalthea", Uint128::new(5))
            .unwrap();

        assert!(Bank.balance(&store, &alice, "aalthea").unwrap().is_zero());
        assert_eq!(
            Bank.balance(&store, &bob, "aalthea").unwrap(),
            Uint128::new(5)
        );
    }
}
