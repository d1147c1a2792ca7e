//! Quote helpers for routing against a pair (periphery-library math)
//!
//! Outputs produced by [`get_amount_out`] are the largest that still pass
//! the swap K check; one unit more must fail it.

use crate::math::{self, U256};
use crate::{PairError, FEE_DENOMINATOR, FEE_NUMERATOR};

/// Largest output obtainable for `amount_in`, net of the 0.3% fee (floor).
pub fn get_amount_out(
    amount_in: u128,
    reserve_in: u128,
    reserve_out: u128,
) -> Result<u128, PairError> {
    if amount_in == 0 {
        return Err(PairError::InsufficientInputAmount);
    }
    if reserve_in == 0 || reserve_out == 0 {
        return Err(PairError::InsufficientLiquidity);
    }
    let amount_in_with_fee = U256::from(amount_in) * U256::from(FEE_DENOMINATOR - FEE_NUMERATOR);
    let numerator = amount_in_with_fee * U256::from(reserve_out);
    let denominator = U256::from(reserve_in) * U256::from(FEE_DENOMINATOR) + amount_in_with_fee;
    math::to_u128(numerator / denominator)
}

/// Smallest input that yields `amount_out`, gross of the 0.3% fee
/// (rounded up).
pub fn get_amount_in(
    amount_out: u128,
    reserve_in: u128,
    reserve_out: u128,
) -> Result<u128, PairError> {
    if amount_out == 0 {
        return Err(PairError::InsufficientOutputAmount);
    }
    if reserve_in == 0 || reserve_out == 0 || amount_out >= reserve_out {
        return Err(PairError::InsufficientLiquidity);
    }
    let numerator =
        U256::from(reserve_in) * U256::from(amount_out) * U256::from(FEE_DENOMINATOR);
    let denominator =
        U256::from(reserve_out - amount_out) * U256::from(FEE_DENOMINATOR - FEE_NUMERATOR);
    math::to_u128(numerator / denominator + U256::one())
}

/// Fee-free proportional quote for balanced liquidity adds:
/// `amount_a · reserve_b / reserve_a`.
pub fn quote(amount_a: u128, reserve_a: u128, reserve_b: u128) -> Result<u128, PairError> {
    if amount_a == 0 {
        return Err(PairError::InsufficientInputAmount);
    }
    if reserve_a == 0 || reserve_b == 0 {
        return Err(PairError::InsufficientLiquidity);
    }
    math::to_u128(math::wide_mul(amount_a, reserve_b) / U256::from(reserve_a))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transitions::{mint, swap, SwapAmounts};
    use crate::PairState;
    use proptest::prelude::*;

    const E18: u128 = 1_000_000_000_000_000_000;

    // (amount_in, reserve_in, reserve_out, expected_out) reference table
    const SWAP_CASES: &[(u128, u128, u128, u128)] = &[
        (1, 5, 10, 1_662_497_915_624_478_906),
        (1, 10, 5, 453_305_446_940_074_565),
        (2, 5, 10, 2_851_015_155_847_869_602),
        (2, 10, 5, 831_248_957_812_239_453),
        (1, 10, 10, 906_610_893_880_149_131),
        (1, 100, 100, 987_158_034_397_061_298),
        (1, 1000, 1000, 996_006_981_039_903_216),
    ];

    #[test]
    fn get_amount_out_reference_table() {
        for &(amount_in, reserve_in, reserve_out, expected) in SWAP_CASES {
            let out = get_amount_out(amount_in * E18, reserve_in * E18, reserve_out * E18).unwrap();
            assert_eq!(out, expected);
        }
    }

    #[test]
    fn quoted_output_is_the_swap_boundary() {
        for &(amount_in, reserve_in, reserve_out, expected) in SWAP_CASES {
            let (state, _) = mint(
                &PairState::new(),
                reserve_in * E18,
                reserve_out * E18,
                0,
                false,
            )
            .unwrap();
            let amounts = SwapAmounts {
                amount0_in: amount_in * E18,
                amount1_out: expected,
                ..Default::default()
            };
            let balance0 = reserve_in * E18 + amount_in * E18;
            assert!(swap(&state, &amounts, balance0, reserve_out * E18 - expected, 0).is_ok());

            let greedy = SwapAmounts {
                amount1_out: expected + 1,
                ..amounts
            };
            assert_eq!(
                swap(&state, &greedy, balance0, reserve_out * E18 - expected - 1, 0).unwrap_err(),
                crate::PairError::InvalidK
            );
        }
    }

    #[test]
    fn get_amount_in_covers_get_amount_out() {
        let out = get_amount_out(E18, 5 * E18, 10 * E18).unwrap();
        let back = get_amount_in(out, 5 * E18, 10 * E18).unwrap();
        // rounding up means the required input never undershoots
        assert!(back <= E18);
        assert!(get_amount_out(back, 5 * E18, 10 * E18).unwrap() >= out);
    }

    #[test]
    fn rejects_empty_reserves_and_zero_amounts() {
        assert_eq!(
            get_amount_out(0, E18, E18).unwrap_err(),
            crate::PairError::InsufficientInputAmount
        );
        assert_eq!(
            get_amount_out(E18, 0, E18).unwrap_err(),
            crate::PairError::InsufficientLiquidity
        );
        assert_eq!(
            get_amount_in(E18, E18, E18).unwrap_err(),
            crate::PairError::InsufficientLiquidity
        );
        assert_eq!(quote(2 * E18, E18, 3 * E18).unwrap(), 6 * E18);
    }

    proptest! {
        // K never decreases across a quoted swap, and strictly increases
        // for fee-bearing volume.
        #[test]
        fn k_is_monotone_for_quoted_swaps(
            reserve_in in 1_000_000u128..=u64::MAX as u128,
            reserve_out in 1_000_000u128..=u64::MAX as u128,
            amount_in in 1_000u128..=u64::MAX as u128,
        ) {
            let out = get_amount_out(amount_in, reserve_in, reserve_out).unwrap();
            prop_assume!(out > 0);
            let k_before = crate::math::wide_mul(reserve_in, reserve_out);
            let k_after = crate::math::wide_mul(reserve_in + amount_in, reserve_out - out);
            prop_assert!(k_after > k_before);
        }

        // burn never returns more than the matching mint deposited
        #[test]
        fn burn_bounded_by_mint(
            amount0 in 100_000u128..=u64::MAX as u128,
            amount1 in 100_000u128..=u64::MAX as u128,
        ) {
            let (state, outcome) = mint(&PairState::new(), amount0, amount1, 0, false).unwrap();
            let (after, redeemed) = crate::transitions::burn(
                &state, outcome.liquidity, amount0, amount1, 0, false,
            ).unwrap();
            prop_assert!(redeemed.amount0 <= amount0);
            prop_assert!(redeemed.amount1 <= amount1);
            prop_assert_eq!(after.total_supply, crate::MINIMUM_LIQUIDITY);
        }
    }
}
