//! Fixed-width arithmetic: 256-bit intermediates, Q112 prices, integer sqrt

use crate::PairError;
use uint::construct_uint;

construct_uint! {
    /// 256-bit unsigned integer for wide intermediates and accumulators
    pub struct U256(4);
}

/// Q112 fixed-point shift used by the price accumulators
pub const Q112_SHIFT: usize = 112;

/// Widening u128 × u128 product; cannot overflow 256 bits
#[inline]
pub fn wide_mul(a: u128, b: u128) -> U256 {
    U256::from(a) * U256::from(b)
}

/// Narrow a 256-bit value back to u128 with explicit overflow detection
#[inline]
pub fn to_u128(value: U256) -> Result<u128, PairError> {
    if value > U256::from(u128::MAX) {
        return Err(PairError::Overflow);
    }
    Ok(value.as_u128())
}

/// Relative price `numerator / denominator` in Q112 fixed point,
/// truncating. Caller guarantees `denominator != 0`.
#[inline]
pub fn price_q112(numerator: u128, denominator: u128) -> U256 {
    (U256::from(numerator) << Q112_SHIFT) / U256::from(denominator)
}

/// Floor integer square root (Babylonian method)
pub fn sqrt(y: U256) -> U256 {
    if y.is_zero() {
        return U256::zero();
    }
    if y <= U256::from(3u8) {
        return U256::one();
    }
    let mut z = y;
    let mut x = y / 2u64 + 1u64;
    while x < z {
        z = x;
        x = (y / x + x) / 2u64;
    }
    z
}
