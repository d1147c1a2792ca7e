//! One pair instance: the four public operations over model state and
//! staged ledger effects.

use log::{debug, info};
use pair_model::{PairState, SwapAmounts};

use crate::error::EngineError;
use crate::events::{BurnEvent, MintEvent, SwapEvent, SyncEvent};
use crate::id::{derive_pair_id, AccountId, TokenId, BURN_ADDRESS};
use crate::ledger::TokenLedger;

/// A deployed pair: two pooled token types, the pool account holding the
/// reserves, and the pair's own liquidity token (sharing the contract id).
///
/// Operations stage their ledger effects against a copy and commit copy and
/// model state together, mirroring the all-or-nothing transaction semantics
/// of the chain host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pair {
    token0: TokenId,
    token1: TokenId,
    account: AccountId,
    liquidity_token: TokenId,
    fee_collector: Option<AccountId>,
    state: PairState,
}

impl Pair {
    /// Caller (the registry) guarantees `token0 < token1`.
    pub(crate) fn new(token0: TokenId, token1: TokenId) -> Self {
        let id = derive_pair_id(token0, token1);
        Self {
            token0,
            token1,
            account: AccountId(id),
            liquidity_token: TokenId(id),
            fee_collector: None,
            state: PairState::new(),
        }
    }

    pub fn token0(&self) -> TokenId {
        self.token0
    }

    pub fn token1(&self) -> TokenId {
        self.token1
    }

    /// Pool account holding the reserves; also the pair's contract id.
    pub fn account(&self) -> AccountId {
        self.account
    }

    pub fn liquidity_token(&self) -> TokenId {
        self.liquidity_token
    }

    pub fn fee_collector(&self) -> Option<AccountId> {
        self.fee_collector
    }

    pub fn set_fee_collector(&mut self, collector: Option<AccountId>) {
        self.fee_collector = collector;
    }

    /// Read-only snapshot of the numeric state.
    pub fn fetch_state(&self) -> &PairState {
        &self.state
    }

    pub(crate) fn restore(
        token0: TokenId,
        token1: TokenId,
        fee_collector: Option<AccountId>,
        state: PairState,
    ) -> Self {
        let mut pair = Self::new(token0, token1);
        pair.fee_collector = fee_collector;
        pair.state = state;
        pair
    }

    /// Deposit `amount0`/`amount1` and mint liquidity to `sender`. The
    /// first mint's locked share goes to [`BURN_ADDRESS`]; a protocol-fee
    /// share, when enabled, goes to the collector before the caller's own
    /// liquidity is added.
    pub fn mint(
        &mut self,
        ledger: &mut TokenLedger,
        sender: AccountId,
        amount0: u128,
        amount1: u128,
        now: u64,
    ) -> Result<MintEvent, EngineError> {
        let mut staged = ledger.clone();
        staged.transfer(sender, self.account, self.token0, amount0)?;
        staged.transfer(sender, self.account, self.token1, amount1)?;

        let balance0 = staged.balance_of(self.account, self.token0);
        let balance1 = staged.balance_of(self.account, self.token1);
        let (next, outcome) =
            pair_model::mint(&self.state, balance0, balance1, now, self.fee_on())?;

        staged.credit(BURN_ADDRESS, self.liquidity_token, outcome.locked);
        if let Some(collector) = self.fee_collector {
            staged.credit(collector, self.liquidity_token, outcome.fee_liquidity);
        }
        staged.credit(sender, self.liquidity_token, outcome.liquidity);

        self.state = next;
        *ledger = staged;

        let event = MintEvent {
            sender,
            amount0: outcome.amount0,
            amount1: outcome.amount1,
            liquidity: outcome.liquidity,
        };
        info!(
            "mint pair={} sender={} amount0={} amount1={} liquidity={}",
            self.account, sender, event.amount0, event.amount1, event.liquidity
        );
        Ok(event)
    }

    /// Redeem `liquidity` for the proportional share of both reserves,
    /// paid to `to`. The liquidity tokens are destroyed.
    pub fn burn(
        &mut self,
        ledger: &mut TokenLedger,
        sender: AccountId,
        to: AccountId,
        liquidity: u128,
        now: u64,
    ) -> Result<BurnEvent, EngineError> {
        let mut staged = ledger.clone();
        staged.transfer(sender, self.account, self.liquidity_token, liquidity)?;

        let balance0 = staged.balance_of(self.account, self.token0);
        let balance1 = staged.balance_of(self.account, self.token1);
        let (next, outcome) =
            pair_model::burn(&self.state, liquidity, balance0, balance1, now, self.fee_on())?;

        staged.burn_from(self.account, self.liquidity_token, liquidity)?;
        if let Some(collector) = self.fee_collector {
            staged.credit(collector, self.liquidity_token, outcome.fee_liquidity);
        }
        staged.transfer(self.account, to, self.token0, outcome.amount0)?;
        staged.transfer(self.account, to, self.token1, outcome.amount1)?;

        self.state = next;
        *ledger = staged;

        let event = BurnEvent {
            sender,
            amount0: outcome.amount0,
            amount1: outcome.amount1,
            liquidity,
        };
        info!(
            "burn pair={} sender={} amount0={} amount1={} liquidity={}",
            self.account, sender, event.amount0, event.amount1, liquidity
        );
        Ok(event)
    }

    /// Trade against the pool. Outputs are transferred to `to` before the
    /// invariant check (flash-swap call ordering); the declared inputs are
    /// pulled from `sender` within the same staged transaction. On any
    /// fault the staged transfers are discarded.
    #[allow(clippy::too_many_arguments)]
    pub fn swap(
        &mut self,
        ledger: &mut TokenLedger,
        sender: AccountId,
        to: AccountId,
        amount0_in: u128,
        amount1_in: u128,
        amount0_out: u128,
        amount1_out: u128,
        now: u64,
    ) -> Result<SwapEvent, EngineError> {
        let amounts = SwapAmounts {
            amount0_in,
            amount1_in,
            amount0_out,
            amount1_out,
        };
        pair_model::swap_preconditions(&self.state, &amounts)?;

        let mut staged = ledger.clone();
        staged.transfer(sender, self.account, self.token0, amount0_in)?;
        staged.transfer(sender, self.account, self.token1, amount1_in)?;
        // outputs leave first; the K check below sees the post-transfer
        // balances
        staged.transfer(self.account, to, self.token0, amount0_out)?;
        staged.transfer(self.account, to, self.token1, amount1_out)?;

        let balance0 = staged.balance_of(self.account, self.token0);
        let balance1 = staged.balance_of(self.account, self.token1);
        let next = pair_model::swap(&self.state, &amounts, balance0, balance1, now)?;

        self.state = next;
        *ledger = staged;

        let event = SwapEvent {
            sender,
            to,
            amount0_in,
            amount1_in,
            amount0_out,
            amount1_out,
        };
        info!(
            "swap pair={} sender={} to={} in=({}, {}) out=({}, {})",
            self.account, sender, to, amount0_in, amount1_in, amount0_out, amount1_out
        );
        Ok(event)
    }

    /// Force a reserve/price refresh from the pool's actual balances.
    pub fn sync(&mut self, ledger: &TokenLedger, now: u64) -> Result<SyncEvent, EngineError> {
        let balance0 = ledger.balance_of(self.account, self.token0);
        let balance1 = ledger.balance_of(self.account, self.token1);
        self.state = pair_model::sync(&self.state, balance0, balance1, now)?;
        debug!(
            "sync pair={} reserve0={} reserve1={}",
            self.account, balance0, balance1
        );
        Ok(SyncEvent {
            reserve0: balance0,
            reserve1: balance1,
        })
    }

    fn fee_on(&self) -> bool {
        self.fee_collector.is_some()
    }
}
