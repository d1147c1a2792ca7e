//! Pure constant product pair model (x·y=k with a 0.3% fee)
//!
//! This crate contains the numeric core of the pair contract as total
//! functions over plain data: reserve accounting, liquidity issuance and
//! redemption, swap invariant checking, and time-weighted price
//! accumulation. No I/O, no host types, no panics on untrusted input.
//!
//! The host engine (`pair_engine`) owns token transfers and balance reads;
//! it feeds observed pool balances and the block timestamp into the
//! transition functions here and commits the returned state atomically.

#![cfg_attr(not(test), no_std)]
#![forbid(unsafe_code)]

pub mod math;
pub mod pricing;
pub mod state;
pub mod transitions;

pub use math::U256;
pub use state::PairState;
pub use transitions::{
    burn, mint, swap, swap_preconditions, sync, BurnOutcome, MintOutcome, SwapAmounts,
};

/// Liquidity permanently locked on the first mint (credited to a sink
/// account, never redeemable).
pub const MINIMUM_LIQUIDITY: u128 = 1_000;

/// Largest representable reserve: reserves must stay below 2^112.
pub const MAX_RESERVE: u128 = (1 << 112) - 1;

/// Swap fee of 0.3% = 3/1000, fixed policy constants.
pub const FEE_NUMERATOR: u128 = 3;
pub const FEE_DENOMINATOR: u128 = 1_000;

/// Error types for pair transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairError {
    /// A reserve would reach or exceed 2^112
    ReserveOverflow,
    /// First mint's geometric-mean liquidity does not exceed the lock
    InsufficientInitialLiquidity,
    /// Computed liquidity to mint is zero
    InsufficientLiquidityMinted,
    /// Computed redemption amount is zero, or more liquidity offered than exists
    InsufficientLiquidityBurned,
    /// Swap requested zero output on both sides
    InsufficientOutputAmount,
    /// Swap declared zero input on both sides
    InsufficientInputAmount,
    /// Swap output would drain a reserve to zero or below
    InsufficientLiquidity,
    /// Fee-adjusted constant product decreased
    InvalidK,
    /// Supplied timestamp precedes the last sync (host fault)
    ClockOutOfOrder,
    /// Arithmetic overflow in a 256-bit intermediate
    Overflow,
}

impl core::fmt::Display for PairError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg = match self {
            PairError::ReserveOverflow => "reserve would exceed the 2^112 bound",
            PairError::InsufficientInitialLiquidity => {
                "initial liquidity does not exceed the minimum-liquidity lock"
            }
            PairError::InsufficientLiquidityMinted => "computed liquidity to mint is zero",
            PairError::InsufficientLiquidityBurned => "computed redemption amount is zero",
            PairError::InsufficientOutputAmount => "swap requested no output",
            PairError::InsufficientInputAmount => "swap declared no input",
            PairError::InsufficientLiquidity => "swap output would drain a reserve",
            PairError::InvalidK => "fee-adjusted constant product decreased",
            PairError::ClockOutOfOrder => "timestamp precedes the last sync",
            PairError::Overflow => "arithmetic overflow",
        };
        f.write_str(msg)
    }
}

impl core::error::Error for PairError {}
