//! Exchange registry: the ledger plus exactly one pair per unordered
//! token set.
//!
//! Callers name tokens in any order; amounts are mapped onto the pair's
//! canonical `token0 < token1` orientation here.

use std::collections::BTreeMap;

use log::info;

use crate::error::EngineError;
use crate::events::{BurnEvent, MintEvent, SwapEvent, SyncEvent};
use crate::id::{sort_tokens, AccountId, TokenId};
use crate::ledger::TokenLedger;
use crate::pair::Pair;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Exchange {
    ledger: TokenLedger,
    pairs: BTreeMap<(TokenId, TokenId), Pair>,
}

impl Exchange {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ledger(&self) -> &TokenLedger {
        &self.ledger
    }

    pub fn pairs(&self) -> impl Iterator<Item = &Pair> {
        self.pairs.values()
    }

    /// Credit test tokens to an account (the chain host's token issuance).
    pub fn faucet(&mut self, account: AccountId, token: TokenId, amount: u128) {
        self.ledger.credit(account, token, amount);
    }

    /// Register the unique pair for an unordered token set.
    pub fn create_pair(&mut self, a: TokenId, b: TokenId) -> Result<&Pair, EngineError> {
        if a == b {
            return Err(EngineError::IdenticalTokens(a));
        }
        let key = sort_tokens(a, b);
        if self.pairs.contains_key(&key) {
            return Err(EngineError::PairExists(key.0, key.1));
        }
        let pair = Pair::new(key.0, key.1);
        info!("create pair={} token0={} token1={}", pair.account(), key.0, key.1);
        Ok(self.pairs.entry(key).or_insert(pair))
    }

    pub fn pair(&self, a: TokenId, b: TokenId) -> Result<&Pair, EngineError> {
        let key = sort_tokens(a, b);
        self.pairs
            .get(&key)
            .ok_or(EngineError::PairNotFound(key.0, key.1))
    }

    pub fn set_fee_collector(
        &mut self,
        a: TokenId,
        b: TokenId,
        collector: Option<AccountId>,
    ) -> Result<(), EngineError> {
        let (pair, _) = self.pair_mut(a, b)?;
        pair.set_fee_collector(collector);
        Ok(())
    }

    /// Deposit `amount_a` of `a` and `amount_b` of `b`, minting liquidity
    /// to `sender`.
    pub fn mint(
        &mut self,
        sender: AccountId,
        a: TokenId,
        amount_a: u128,
        b: TokenId,
        amount_b: u128,
        now: u64,
    ) -> Result<MintEvent, EngineError> {
        let (amount0, amount1) = if sort_tokens(a, b).0 == a {
            (amount_a, amount_b)
        } else {
            (amount_b, amount_a)
        };
        let (pair, ledger) = self.pair_mut(a, b)?;
        pair.mint(ledger, sender, amount0, amount1, now)
    }

    /// Redeem `liquidity` of the pair's token, paying both sides to `to`.
    pub fn burn(
        &mut self,
        sender: AccountId,
        to: AccountId,
        a: TokenId,
        b: TokenId,
        liquidity: u128,
        now: u64,
    ) -> Result<BurnEvent, EngineError> {
        let (pair, ledger) = self.pair_mut(a, b)?;
        pair.burn(ledger, sender, to, liquidity, now)
    }

    /// Trade: sell `amount_in` of `token_in` for at least the declared
    /// `amount_out` of the other token, delivered to `to`.
    #[allow(clippy::too_many_arguments)]
    pub fn swap(
        &mut self,
        sender: AccountId,
        to: AccountId,
        token_in: TokenId,
        amount_in: u128,
        token_out: TokenId,
        amount_out: u128,
        now: u64,
    ) -> Result<SwapEvent, EngineError> {
        let in_is_token0 = sort_tokens(token_in, token_out).0 == token_in;
        let (pair, ledger) = self.pair_mut(token_in, token_out)?;
        let (a0in, a1in, a0out, a1out) = if in_is_token0 {
            (amount_in, 0, 0, amount_out)
        } else {
            (0, amount_in, amount_out, 0)
        };
        pair.swap(ledger, sender, to, a0in, a1in, a0out, a1out, now)
    }

    /// Force a reserve/price refresh with no balance change.
    pub fn sync(&mut self, a: TokenId, b: TokenId, now: u64) -> Result<SyncEvent, EngineError> {
        let (pair, ledger) = self.pair_mut(a, b)?;
        pair.sync(ledger, now)
    }

    fn pair_mut(
        &mut self,
        a: TokenId,
        b: TokenId,
    ) -> Result<(&mut Pair, &mut TokenLedger), EngineError> {
        let key = sort_tokens(a, b);
        match self.pairs.get_mut(&key) {
            Some(pair) => Ok((pair, &mut self.ledger)),
            None => Err(EngineError::PairNotFound(key.0, key.1)),
        }
    }

    pub(crate) fn from_parts(
        ledger: TokenLedger,
        pairs: impl IntoIterator<Item = Pair>,
    ) -> Result<Self, EngineError> {
        let mut exchange = Self {
            ledger,
            pairs: BTreeMap::new(),
        };
        for pair in pairs {
            let key = (pair.token0(), pair.token1());
            if exchange.pairs.insert(key, pair).is_some() {
                return Err(EngineError::Snapshot(format!(
                    "duplicate pair for tokens {} / {}",
                    key.0, key.1
                )));
            }
        }
        Ok(exchange)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_pair_per_unordered_token_set() {
        let a = TokenId::from_seed("alpha");
        let b = TokenId::from_seed("beta");
        let mut exchange = Exchange::new();
        exchange.create_pair(a, b).unwrap();
        assert!(matches!(
            exchange.create_pair(b, a).unwrap_err(),
            EngineError::PairExists(..)
        ));
        assert!(matches!(
            exchange.create_pair(a, a).unwrap_err(),
            EngineError::IdenticalTokens(_)
        ));
        // lookup works in either order
        let p1 = exchange.pair(a, b).unwrap().account();
        let p2 = exchange.pair(b, a).unwrap().account();
        assert_eq!(p1, p2);
    }

    #[test]
    fn amounts_follow_canonical_orientation() {
        let a = TokenId::from_seed("alpha");
        let b = TokenId::from_seed("beta");
        let lp = AccountId::from_seed("lp");
        let mut exchange = Exchange::new();
        exchange.create_pair(a, b).unwrap();
        exchange.faucet(lp, a, 10_000_000);
        exchange.faucet(lp, b, 40_000_000);

        let event = exchange.mint(lp, a, 10_000_000, b, 40_000_000, 0).unwrap();
        let pair = exchange.pair(a, b).unwrap();
        let (reserve_a, reserve_b) = if pair.token0() == a {
            (pair.fetch_state().reserve0, pair.fetch_state().reserve1)
        } else {
            (pair.fetch_state().reserve1, pair.fetch_state().reserve0)
        };
        assert_eq!(reserve_a, 10_000_000);
        assert_eq!(reserve_b, 40_000_000);
        assert_eq!(event.liquidity, 20_000_000 - pair_model::MINIMUM_LIQUIDITY);
    }
}
