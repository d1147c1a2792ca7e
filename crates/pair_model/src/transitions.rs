//! Pair state machine: mint, burn, swap, sync as pure transitions
//!
//! Every function takes the current [`PairState`] plus host-observed pool
//! balances and the block timestamp, and returns the next state. Nothing is
//! mutated on error; the host commits the returned state (and its staged
//! token transfers) atomically or discards everything.

use crate::math::{self, U256};
use crate::{PairError, PairState, FEE_DENOMINATOR, FEE_NUMERATOR, MAX_RESERVE, MINIMUM_LIQUIDITY};

/// Declared swap legs. At least one input and one output must be nonzero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SwapAmounts {
    pub amount0_in: u128,
    pub amount1_in: u128,
    pub amount0_out: u128,
    pub amount1_out: u128,
}

/// Result of a mint transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MintOutcome {
    /// Liquidity credited to the caller
    pub liquidity: u128,
    /// Liquidity locked forever on the first mint (zero afterwards)
    pub locked: u128,
    /// Protocol-fee liquidity credited to the collector (zero when off)
    pub fee_liquidity: u128,
    /// Token0 contributed, inferred from the balance delta
    pub amount0: u128,
    /// Token1 contributed, inferred from the balance delta
    pub amount1: u128,
}

/// Result of a burn transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BurnOutcome {
    /// Token0 owed to the redeemer
    pub amount0: u128,
    /// Token1 owed to the redeemer
    pub amount1: u128,
    /// Protocol-fee liquidity credited to the collector (zero when off)
    pub fee_liquidity: u128,
}

/// Refresh reserves from observed balances and advance the price
/// accumulators by the elapsed time.
///
/// Idempotent at equal timestamps: `elapsed == 0` leaves the accumulators
/// untouched while still mirroring the balances into the reserves.
pub fn sync(
    state: &PairState,
    balance0: u128,
    balance1: u128,
    now: u64,
) -> Result<PairState, PairError> {
    if now < state.block_timestamp_last {
        return Err(PairError::ClockOutOfOrder);
    }
    if balance0 > MAX_RESERVE || balance1 > MAX_RESERVE {
        return Err(PairError::ReserveOverflow);
    }
    let elapsed = now - state.block_timestamp_last;
    let mut next = *state;
    if elapsed > 0 && state.reserve0 != 0 && state.reserve1 != 0 {
        // Q112 price times elapsed seconds. The product fits 256 bits under
        // the block-cadence assumption; the running accumulator itself wraps
        // and consumers take differences.
        let price0 = math::price_q112(state.reserve1, state.reserve0);
        let price1 = math::price_q112(state.reserve0, state.reserve1);
        let elapsed = U256::from(elapsed);
        next.price0_cumulative_last = state
            .price0_cumulative_last
            .overflowing_add(price0.overflowing_mul(elapsed).0)
            .0;
        next.price1_cumulative_last = state
            .price1_cumulative_last
            .overflowing_add(price1.overflowing_mul(elapsed).0)
            .0;
    }
    next.reserve0 = balance0;
    next.reserve1 = balance1;
    next.block_timestamp_last = now;
    Ok(next)
}

/// Mint liquidity against tokens already deposited into the pool account.
///
/// Contributed amounts are inferred from the balance deltas, never taken as
/// declared inputs. The first mint locks [`MINIMUM_LIQUIDITY`] units; later
/// mints issue `min(amount0·S/reserve0, amount1·S/reserve1)`, penalizing
/// unbalanced deposits.
pub fn mint(
    state: &PairState,
    balance0: u128,
    balance1: u128,
    now: u64,
    fee_on: bool,
) -> Result<(PairState, MintOutcome), PairError> {
    if balance0 > MAX_RESERVE || balance1 > MAX_RESERVE {
        return Err(PairError::ReserveOverflow);
    }
    // Balances below reserves would mean the host lost pool funds.
    let amount0 = balance0
        .checked_sub(state.reserve0)
        .ok_or(PairError::Overflow)?;
    let amount1 = balance1
        .checked_sub(state.reserve1)
        .ok_or(PairError::Overflow)?;

    let mut working = *state;
    let fee_liquidity = mint_protocol_fee(&mut working, fee_on)?;

    let (liquidity, locked) = if working.total_supply == 0 {
        let root = math::to_u128(math::sqrt(math::wide_mul(amount0, amount1)))?;
        if root <= MINIMUM_LIQUIDITY {
            return Err(PairError::InsufficientInitialLiquidity);
        }
        (root - MINIMUM_LIQUIDITY, MINIMUM_LIQUIDITY)
    } else {
        if working.reserve0 == 0 || working.reserve1 == 0 {
            return Err(PairError::InsufficientLiquidity);
        }
        let by0 = math::wide_mul(amount0, working.total_supply) / U256::from(working.reserve0);
        let by1 = math::wide_mul(amount1, working.total_supply) / U256::from(working.reserve1);
        (math::to_u128(by0.min(by1))?, 0)
    };
    if liquidity == 0 {
        return Err(PairError::InsufficientLiquidityMinted);
    }

    working.total_supply = working
        .total_supply
        .checked_add(locked)
        .and_then(|s| s.checked_add(liquidity))
        .ok_or(PairError::Overflow)?;

    let mut next = sync(&working, balance0, balance1, now)?;
    if fee_on {
        next.k_last = next.k();
    }
    Ok((
        next,
        MintOutcome {
            liquidity,
            locked,
            fee_liquidity,
            amount0,
            amount1,
        },
    ))
}

/// Redeem `liquidity` units already deposited into the pool account for a
/// proportional share of the current balances (floor division), so accrued
/// trading fees flow to redeemers.
pub fn burn(
    state: &PairState,
    liquidity: u128,
    balance0: u128,
    balance1: u128,
    now: u64,
    fee_on: bool,
) -> Result<(PairState, BurnOutcome), PairError> {
    let mut working = *state;
    let fee_liquidity = mint_protocol_fee(&mut working, fee_on)?;

    if liquidity == 0 || liquidity > working.total_supply {
        return Err(PairError::InsufficientLiquidityBurned);
    }
    let supply = U256::from(working.total_supply);
    let amount0 = math::to_u128(math::wide_mul(liquidity, balance0) / supply)?;
    let amount1 = math::to_u128(math::wide_mul(liquidity, balance1) / supply)?;
    if amount0 == 0 || amount1 == 0 {
        return Err(PairError::InsufficientLiquidityBurned);
    }

    working.total_supply -= liquidity;

    let mut next = sync(&working, balance0 - amount0, balance1 - amount1, now)?;
    if fee_on {
        next.k_last = next.k();
    }
    Ok((
        next,
        BurnOutcome {
            amount0,
            amount1,
            fee_liquidity,
        },
    ))
}

/// Checks that precede the optimistic output transfer: the swap must name
/// an input and an output, and cannot drain a reserve to zero or below.
pub fn swap_preconditions(state: &PairState, amounts: &SwapAmounts) -> Result<(), PairError> {
    if amounts.amount0_out == 0 && amounts.amount1_out == 0 {
        return Err(PairError::InsufficientOutputAmount);
    }
    if amounts.amount0_in == 0 && amounts.amount1_in == 0 {
        return Err(PairError::InsufficientInputAmount);
    }
    if amounts.amount0_out >= state.reserve0 || amounts.amount1_out >= state.reserve1 {
        return Err(PairError::InsufficientLiquidity);
    }
    Ok(())
}

/// Validate a swap against balances observed after the optimistic output
/// transfer and the input deposit, then refresh the reserves.
///
/// The economic core: with each balance scaled by 1000 and 0.3% of the
/// declared input removed, the constant product must not fall below
/// `reserve0 · reserve1 · 1000²`.
pub fn swap(
    state: &PairState,
    amounts: &SwapAmounts,
    balance0: u128,
    balance1: u128,
    now: u64,
) -> Result<PairState, PairError> {
    swap_preconditions(state, amounts)?;
    if balance0 > MAX_RESERVE || balance1 > MAX_RESERVE {
        return Err(PairError::ReserveOverflow);
    }

    // A declared input larger than the observed balance can only make the
    // check stricter; underflow here means the caller lied about deposits.
    let adjusted0 = (U256::from(balance0) * U256::from(FEE_DENOMINATOR))
        .checked_sub(U256::from(amounts.amount0_in) * U256::from(FEE_NUMERATOR))
        .ok_or(PairError::InvalidK)?;
    let adjusted1 = (U256::from(balance1) * U256::from(FEE_DENOMINATOR))
        .checked_sub(U256::from(amounts.amount1_in) * U256::from(FEE_NUMERATOR))
        .ok_or(PairError::InvalidK)?;

    let k_scaled = state.k() * U256::from(FEE_DENOMINATOR * FEE_DENOMINATOR);
    if adjusted0 * adjusted1 < k_scaled {
        return Err(PairError::InvalidK);
    }

    sync(state, balance0, balance1, now)
}

/// Mint the protocol's share of liquidity growth since `k_last` to the
/// collector, diluting existing holders. Applied before the caller's own
/// supply change; clears `k_last` while the fee is off.
fn mint_protocol_fee(state: &mut PairState, fee_on: bool) -> Result<u128, PairError> {
    if !fee_on {
        state.k_last = U256::zero();
        return Ok(0);
    }
    if state.k_last.is_zero() {
        return Ok(0);
    }
    let root_k = math::sqrt(state.k());
    let root_k_last = math::sqrt(state.k_last);
    if root_k <= root_k_last {
        return Ok(0);
    }
    // 1/6 of the geometric-mean growth:
    // S · (√k − √k_last) / (5·√k + √k_last)
    let numerator = U256::from(state.total_supply) * (root_k - root_k_last);
    let denominator = root_k * U256::from(5u8) + root_k_last;
    let fee = math::to_u128(numerator / denominator)?;
    state.total_supply = state
        .total_supply
        .checked_add(fee)
        .ok_or(PairError::Overflow)?;
    Ok(fee)
}
