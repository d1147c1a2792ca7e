//! Scenario tests for the pair state machine, driven through the exchange
//! registry with a manual clock.

use pair_engine::{sort_tokens, AccountId, EngineError, Exchange, TokenId, BURN_ADDRESS};
use pair_model::{PairError, PairState, MAX_RESERVE, MINIMUM_LIQUIDITY, U256};

const E18: u128 = 1_000_000_000_000_000_000;

struct Fixture {
    exchange: Exchange,
    token0: TokenId,
    token1: TokenId,
    wallet: AccountId,
}

impl Fixture {
    fn new() -> Self {
        let (token0, token1) = sort_tokens(
            TokenId::from_seed("token-a"),
            TokenId::from_seed("token-b"),
        );
        let wallet = AccountId::from_seed("wallet");
        let mut exchange = Exchange::new();
        exchange.create_pair(token0, token1).unwrap();
        Fixture {
            exchange,
            token0,
            token1,
            wallet,
        }
    }

    fn fund(&mut self, amount0: u128, amount1: u128) {
        self.exchange.faucet(self.wallet, self.token0, amount0);
        self.exchange.faucet(self.wallet, self.token1, amount1);
    }

    fn mint(&mut self, amount0: u128, amount1: u128, now: u64) -> Result<pair_engine::MintEvent, EngineError> {
        self.fund(amount0, amount1);
        self.exchange
            .mint(self.wallet, self.token0, amount0, self.token1, amount1, now)
    }

    fn state(&self) -> PairState {
        *self
            .exchange
            .pair(self.token0, self.token1)
            .unwrap()
            .fetch_state()
    }

    fn liquidity_token(&self) -> TokenId {
        self.exchange
            .pair(self.token0, self.token1)
            .unwrap()
            .liquidity_token()
    }

    fn pool_account(&self) -> AccountId {
        self.exchange
            .pair(self.token0, self.token1)
            .unwrap()
            .account()
    }

    fn balance(&self, account: AccountId, token: TokenId) -> u128 {
        self.exchange.ledger().balance_of(account, token)
    }
}

fn encode_price(reserve0: u128, reserve1: u128) -> (U256, U256) {
    (
        (U256::from(reserve1) << 112) / U256::from(reserve0),
        (U256::from(reserve0) << 112) / U256::from(reserve1),
    )
}

#[test]
fn mint_initial_liquidity() {
    let mut fx = Fixture::new();
    let event = fx.mint(E18, 4 * E18, 0).unwrap();

    assert_eq!(event.sender, fx.wallet);
    assert_eq!(event.amount0, E18);
    assert_eq!(event.amount1, 4 * E18);
    assert_eq!(event.liquidity, 2 * E18 - MINIMUM_LIQUIDITY);

    let state = fx.state();
    assert_eq!(state.total_supply, 2 * E18);
    assert_eq!(state.reserve0, E18);
    assert_eq!(state.reserve1, 4 * E18);

    let pool = fx.pool_account();
    assert_eq!(fx.balance(pool, fx.token0), E18);
    assert_eq!(fx.balance(pool, fx.token1), 4 * E18);
    let lp_token = fx.liquidity_token();
    assert_eq!(fx.balance(fx.wallet, lp_token), 2 * E18 - MINIMUM_LIQUIDITY);
    assert_eq!(fx.balance(BURN_ADDRESS, lp_token), MINIMUM_LIQUIDITY);
}

#[test]
fn mint_into_active_pool() {
    let mut fx = Fixture::new();
    fx.mint(E18, 4 * E18, 0).unwrap();

    let event = fx.mint(E18, 4 * E18, 0).unwrap();
    assert_eq!(event.liquidity, 2 * E18);

    let state = fx.state();
    assert_eq!(state.total_supply, 4 * E18);
    assert_eq!(state.reserve0, 2 * E18);
    assert_eq!(state.reserve1, 8 * E18);
    let lp_token = fx.liquidity_token();
    assert_eq!(fx.balance(fx.wallet, lp_token), 4 * E18 - MINIMUM_LIQUIDITY);
}

#[test]
fn mint_enforces_max_reserve() {
    for (amount0, amount1) in [
        (MAX_RESERVE + 1, MAX_RESERVE),
        (MAX_RESERVE, MAX_RESERVE + 1),
        (MAX_RESERVE + 1, MAX_RESERVE + 1),
    ] {
        let mut fx = Fixture::new();
        let before = fx.exchange.clone();
        let err = fx.mint(amount0, amount1, 0).unwrap_err();
        assert_eq!(err, EngineError::Pair(PairError::ReserveOverflow));
        // the failed operation must not have touched pair state
        assert_eq!(fx.state(), *before.pair(fx.token0, fx.token1).unwrap().fetch_state());
        let pool = fx.pool_account();
        assert_eq!(fx.balance(pool, fx.token0), 0);
        assert_eq!(fx.balance(pool, fx.token1), 0);
    }

    let mut fx = Fixture::new();
    assert!(fx.mint(MAX_RESERVE, MAX_RESERVE, 0).is_ok());
}

#[test]
fn swap_token0_for_token1() {
    let mut fx = Fixture::new();
    fx.mint(5 * E18, 10 * E18, 0).unwrap();

    let expected_out = 1_662_497_915_624_478_906u128;
    fx.exchange.faucet(fx.wallet, fx.token0, E18);
    let before = fx.balance(fx.wallet, fx.token1);

    let event = fx
        .exchange
        .swap(fx.wallet, fx.wallet, fx.token0, E18, fx.token1, expected_out, 0)
        .unwrap();
    assert_eq!(event.sender, fx.wallet);
    assert_eq!(event.to, fx.wallet);
    assert_eq!(event.amount0_in, E18);
    assert_eq!(event.amount1_in, 0);
    assert_eq!(event.amount0_out, 0);
    assert_eq!(event.amount1_out, expected_out);

    let state = fx.state();
    assert_eq!(state.reserve0, 6 * E18);
    assert_eq!(state.reserve1, 10 * E18 - expected_out);
    let pool = fx.pool_account();
    assert_eq!(fx.balance(pool, fx.token0), 6 * E18);
    assert_eq!(fx.balance(pool, fx.token1), 10 * E18 - expected_out);
    assert_eq!(fx.balance(fx.wallet, fx.token1) - before, expected_out);
}

#[test]
fn swap_token1_for_token0() {
    let mut fx = Fixture::new();
    fx.mint(5 * E18, 10 * E18, 0).unwrap();

    let expected_out = 453_305_446_940_074_565u128;
    fx.exchange.faucet(fx.wallet, fx.token1, E18);
    let before = fx.balance(fx.wallet, fx.token0);

    let event = fx
        .exchange
        .swap(fx.wallet, fx.wallet, fx.token1, E18, fx.token0, expected_out, 0)
        .unwrap();
    assert_eq!(event.amount0_in, 0);
    assert_eq!(event.amount1_in, E18);
    assert_eq!(event.amount0_out, expected_out);
    assert_eq!(event.amount1_out, 0);

    let state = fx.state();
    assert_eq!(state.reserve0, 5 * E18 - expected_out);
    assert_eq!(state.reserve1, 11 * E18);
    assert_eq!(fx.balance(fx.wallet, fx.token0) - before, expected_out);
}

#[test]
fn swap_one_unit_past_quote_fails_with_invalid_k() {
    let mut fx = Fixture::new();
    fx.mint(5 * E18, 10 * E18, 0).unwrap();

    let expected_out = 1_662_497_915_624_478_906u128;
    fx.exchange.faucet(fx.wallet, fx.token0, E18);
    let before = fx.exchange.clone();

    let err = fx
        .exchange
        .swap(
            fx.wallet,
            fx.wallet,
            fx.token0,
            E18,
            fx.token1,
            expected_out + 1,
            0,
        )
        .unwrap_err();
    assert_eq!(err, EngineError::Pair(PairError::InvalidK));
    assert_eq!(fx.exchange, before);

    assert!(fx
        .exchange
        .swap(fx.wallet, fx.wallet, fx.token0, E18, fx.token1, expected_out, 0)
        .is_ok());
}

#[test]
fn swap_to_another_address() {
    let mut fx = Fixture::new();
    fx.mint(5 * E18, 10 * E18, 0).unwrap();

    let recipient = AccountId::from_seed("recipient");
    let expected_out = 453_305_446_940_074_565u128;
    fx.exchange.faucet(fx.wallet, fx.token1, E18);

    let event = fx
        .exchange
        .swap(fx.wallet, recipient, fx.token1, E18, fx.token0, expected_out, 0)
        .unwrap();
    assert_eq!(event.to, recipient);
    assert_eq!(fx.balance(recipient, fx.token0), expected_out);

    let state = fx.state();
    assert_eq!(state.reserve0, 5 * E18 - expected_out);
    assert_eq!(state.reserve1, 11 * E18);
}

#[test]
fn swap_cannot_drain_a_reserve() {
    let mut fx = Fixture::new();
    fx.mint(5 * E18, 10 * E18, 0).unwrap();
    fx.exchange.faucet(fx.wallet, fx.token0, 100 * E18);

    let err = fx
        .exchange
        .swap(fx.wallet, fx.wallet, fx.token0, 100 * E18, fx.token1, 10 * E18, 0)
        .unwrap_err();
    assert_eq!(err, EngineError::Pair(PairError::InsufficientLiquidity));
}

#[test]
fn burn_redeems_proportional_share() {
    let mut fx = Fixture::new();
    fx.mint(3 * E18, 3 * E18, 0).unwrap();

    let liquidity = 3 * E18 - MINIMUM_LIQUIDITY;
    let token0_before = fx.balance(fx.wallet, fx.token0);
    let token1_before = fx.balance(fx.wallet, fx.token1);

    let event = fx
        .exchange
        .burn(fx.wallet, fx.wallet, fx.token0, fx.token1, liquidity, 0)
        .unwrap();
    assert_eq!(event.sender, fx.wallet);
    assert_eq!(event.amount0, 3 * E18 - MINIMUM_LIQUIDITY);
    assert_eq!(event.amount1, 3 * E18 - MINIMUM_LIQUIDITY);
    assert_eq!(event.liquidity, liquidity);

    let state = fx.state();
    assert_eq!(state.total_supply, MINIMUM_LIQUIDITY);
    assert_eq!(state.reserve0, MINIMUM_LIQUIDITY);
    assert_eq!(state.reserve1, MINIMUM_LIQUIDITY);

    let pool = fx.pool_account();
    assert_eq!(fx.balance(pool, fx.token0), MINIMUM_LIQUIDITY);
    assert_eq!(fx.balance(pool, fx.token1), MINIMUM_LIQUIDITY);
    assert_eq!(fx.balance(fx.wallet, fx.liquidity_token()), 0);
    assert_eq!(
        fx.balance(fx.wallet, fx.token0) - token0_before,
        3 * E18 - MINIMUM_LIQUIDITY
    );
    assert_eq!(
        fx.balance(fx.wallet, fx.token1) - token1_before,
        3 * E18 - MINIMUM_LIQUIDITY
    );
}

#[test]
fn price_accumulators_track_elapsed_time() {
    let mut fx = Fixture::new();
    fx.mint(3 * E18, 3 * E18, 10).unwrap();

    // forced sync one second later
    fx.exchange.sync(fx.token0, fx.token1, 11).unwrap();
    let initial_price = encode_price(3 * E18, 3 * E18);
    let state = fx.state();
    assert_eq!(state.price0_cumulative_last, initial_price.0);
    assert_eq!(state.price1_cumulative_last, initial_price.1);
    assert_eq!(state.block_timestamp_last, 11);

    // a swap five seconds later accumulates at the pre-swap price
    fx.exchange.faucet(fx.wallet, fx.token0, 3 * E18);
    fx.exchange
        .swap(fx.wallet, fx.wallet, fx.token0, 3 * E18, fx.token1, E18, 16)
        .unwrap();
    let state = fx.state();
    assert_eq!(
        state.price0_cumulative_last,
        initial_price.0 * U256::from(6u64)
    );
    assert_eq!(
        state.price1_cumulative_last,
        initial_price.1 * U256::from(6u64)
    );
    assert_eq!(state.reserve0, 6 * E18);
    assert_eq!(state.reserve1, 2 * E18);

    // after the swap the new ratio accrues
    let new_price = encode_price(6 * E18, 2 * E18);
    fx.exchange.sync(fx.token0, fx.token1, 21).unwrap();
    let state = fx.state();
    assert_eq!(
        state.price0_cumulative_last,
        initial_price.0 * U256::from(6u64) + new_price.0 * U256::from(5u64)
    );
    assert_eq!(
        state.price1_cumulative_last,
        initial_price.1 * U256::from(6u64) + new_price.1 * U256::from(5u64)
    );
}

#[test]
fn clock_regression_is_a_fault() {
    let mut fx = Fixture::new();
    fx.mint(E18, E18, 100).unwrap();
    let err = fx.exchange.sync(fx.token0, fx.token1, 99).unwrap_err();
    assert_eq!(err, EngineError::Pair(PairError::ClockOutOfOrder));
}

#[test]
fn protocol_fee_accrues_to_collector() {
    let mut fx = Fixture::new();
    let collector = AccountId::from_seed("fee-collector");
    fx.exchange
        .set_fee_collector(fx.token0, fx.token1, Some(collector))
        .unwrap();
    fx.mint(1000 * E18, 1000 * E18, 0).unwrap();

    // fee-bearing volume grows k
    fx.exchange.faucet(fx.wallet, fx.token0, E18);
    let out = pair_model::pricing::get_amount_out(E18, 1000 * E18, 1000 * E18).unwrap();
    fx.exchange
        .swap(fx.wallet, fx.wallet, fx.token0, E18, fx.token1, out, 0)
        .unwrap();

    // the next supply change mints the collector's share first
    fx.exchange
        .burn(fx.wallet, fx.wallet, fx.token0, fx.token1, E18, 0)
        .unwrap();
    let lp_token = fx.liquidity_token();
    assert!(fx.balance(collector, lp_token) > 0);
}

#[test]
fn insufficient_funds_fail_without_side_effects() {
    let mut fx = Fixture::new();
    fx.mint(E18, E18, 0).unwrap();
    let before = fx.exchange.clone();

    // wallet holds no spare token0 after the mint
    let err = fx
        .exchange
        .swap(fx.wallet, fx.wallet, fx.token0, E18, fx.token1, E18 / 2, 0)
        .unwrap_err();
    assert!(matches!(err, EngineError::InsufficientFunds { .. }));
    assert_eq!(fx.exchange, before);
}
