//! Price conversions for setting up pools and showing prices to people.
//!
//! `encode_price_sqrt` and `expand_to_18_decimals` are exact. The inversion
//! and float helpers are approximations for display and must never feed back
//! into amount or tick computations.

use alloy_primitives::{U256, U512};
use clmm_types::{ArithmeticError, MathResult};

use crate::full_math::narrow;

/// sqrt(reserve1 / reserve0) as Q64.96, rounded down
///
/// Computed as the integer square root of `(reserve1 << 192) / reserve0`,
/// which floors to the same value as the exact real root.
pub fn encode_price_sqrt(reserve1: U256, reserve0: U256) -> MathResult<U256> {
    if reserve0.is_zero() {
        return Err(ArithmeticError::DivisionByZero.into());
    }
    let ratio_x192 = (U512::from(reserve1) << 192) / U512::from(reserve0);
    narrow(sqrt_u512(ratio_x192))
}

/// Approximate sqrt price of the inverted pair: 2^192 / sqrt_price
///
/// Imprecise: the floor division drifts a few units from the sqrt ratio of
/// the opposite tick. For display and tests only.
pub fn invert_price_sqrt_x96(sqrt_price_x96: U256) -> MathResult<U256> {
    if sqrt_price_x96.is_zero() {
        return Err(ArithmeticError::DivisionByZero.into());
    }
    narrow((U512::from(1u8) << 192) / U512::from(sqrt_price_x96))
}

/// Approximate price token1/token0 in raw units, as a float. Display only.
pub fn approx_float_price(sqrt_price_x96: U256) -> f64 {
    let sqrt_price = u256_to_f64(sqrt_price_x96) / 2f64.powi(96);
    sqrt_price * sqrt_price
}

/// Approximate price token1/token0 adjusted for token decimals. Display only.
pub fn approx_display_price(sqrt_price_x96: U256, decimals0: u8, decimals1: u8) -> f64 {
    let shift = decimals0 as i32 - decimals1 as i32;
    approx_float_price(sqrt_price_x96) * 10f64.powi(shift)
}

/// n * 10^18
pub fn expand_to_18_decimals(n: U256) -> MathResult<U256> {
    n.checked_mul(U256::from(1_000_000_000_000_000_000u64))
        .ok_or_else(|| ArithmeticError::Overflow.into())
}

/// Floor square root by Newton iteration
fn sqrt_u512(value: U512) -> U512 {
    if value.is_zero() {
        return U512::ZERO;
    }

    // 2^ceil(bits / 2) is never below the root, so the iteration only descends
    let mut result = U512::from(1u8) << value.bit_len().div_ceil(2);
    loop {
        let next = (result + value / result) >> 1;
        if next >= result {
            return result;
        }
        result = next;
    }
}

fn u256_to_f64(value: U256) -> f64 {
    value
        .as_limbs()
        .iter()
        .rev()
        .fold(0.0, |acc, &limb| acc * 2f64.powi(64) + limb as f64)
}
