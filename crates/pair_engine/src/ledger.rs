//! In-memory token ledger
//!
//! Stand-in for the trusted chain primitive of the host layer: atomic
//! transfers and balance queries, nothing more. Not production token logic.

use std::collections::BTreeMap;

use crate::error::EngineError;
use crate::id::{AccountId, TokenId};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenLedger {
    balances: BTreeMap<(AccountId, TokenId), u128>,
}

impl TokenLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance_of(&self, account: AccountId, token: TokenId) -> u128 {
        self.balances.get(&(account, token)).copied().unwrap_or(0)
    }

    /// Host-level issuance (test tokens, liquidity-token mints).
    pub fn credit(&mut self, account: AccountId, token: TokenId, amount: u128) {
        if amount == 0 {
            return;
        }
        *self.balances.entry((account, token)).or_insert(0) += amount;
    }

    /// Move `amount` of `token` between accounts; fails without mutating
    /// when the source balance is short.
    pub fn transfer(
        &mut self,
        from: AccountId,
        to: AccountId,
        token: TokenId,
        amount: u128,
    ) -> Result<(), EngineError> {
        self.debit(from, token, amount)?;
        self.credit(to, token, amount);
        Ok(())
    }

    /// Destroy `amount` of `token` held by `account` (liquidity-token
    /// redemption).
    pub fn burn_from(
        &mut self,
        account: AccountId,
        token: TokenId,
        amount: u128,
    ) -> Result<(), EngineError> {
        self.debit(account, token, amount)
    }

    fn debit(
        &mut self,
        account: AccountId,
        token: TokenId,
        amount: u128,
    ) -> Result<(), EngineError> {
        if amount == 0 {
            return Ok(());
        }
        let held = self.balance_of(account, token);
        let remaining = held.checked_sub(amount).ok_or(EngineError::InsufficientFunds {
            account,
            token,
            held,
            needed: amount,
        })?;
        if remaining == 0 {
            self.balances.remove(&(account, token));
        } else {
            self.balances.insert((account, token), remaining);
        }
        Ok(())
    }

    /// All nonzero balances, for persistence.
    pub fn entries(&self) -> impl Iterator<Item = (AccountId, TokenId, u128)> + '_ {
        self.balances
            .iter()
            .map(|(&(account, token), &amount)| (account, token, amount))
    }
}
