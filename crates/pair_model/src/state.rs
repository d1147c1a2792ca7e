//! Pair state record

use crate::math::U256;

/// Numeric state of one pair, mutated exclusively by the transition
/// functions in [`crate::transitions`].
///
/// Token identities and the fee-collector account are host concerns and
/// live in the engine layer; this record is the contract's numeric core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PairState {
    /// Pool holdings of token0, `< 2^112`
    pub reserve0: u128,
    /// Pool holdings of token1, `< 2^112`
    pub reserve1: u128,
    /// Outstanding liquidity tokens
    pub total_supply: u128,
    /// Timestamp (seconds) of the last reserve refresh
    pub block_timestamp_last: u64,
    /// Time-integrated token0 price (token1/token0, Q112), wraps at 2^256
    pub price0_cumulative_last: U256,
    /// Time-integrated token1 price (token0/token1, Q112), wraps at 2^256
    pub price1_cumulative_last: U256,
    /// `reserve0 * reserve1` after the last supply change; zero while the
    /// protocol fee is off
    pub k_last: U256,
}

impl PairState {
    /// Fresh pair as the factory creates it: zero reserves, zero supply.
    pub fn new() -> Self {
        Self::default()
    }

    /// Constant product of the current reserves.
    pub fn k(&self) -> U256 {
        crate::math::wide_mul(self.reserve0, self.reserve1)
    }
}
