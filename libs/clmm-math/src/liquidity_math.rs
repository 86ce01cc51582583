use alloy_primitives::U256;
use clmm_types::{ArithmeticError, MathResult, Q96};

use crate::full_math::mul_div;
use crate::sqrt_price_math::{get_amount0_delta, get_amount1_delta};

/// Calculate the largest liquidity the given amounts can back in a price range
///
/// Below the range only token0 counts, above it only token1; in range the
/// scarcer side decides.
pub fn get_liquidity_for_amounts(
    sqrt_ratio_x96: U256,
    sqrt_ratio_a_x96: U256,
    sqrt_ratio_b_x96: U256,
    amount0: U256,
    amount1: U256,
) -> MathResult<u128> {
    let (sqrt_ratio_lower, sqrt_ratio_upper) = sort(sqrt_ratio_a_x96, sqrt_ratio_b_x96);

    if sqrt_ratio_x96 <= sqrt_ratio_lower {
        get_liquidity_for_amount0(sqrt_ratio_lower, sqrt_ratio_upper, amount0)
    } else if sqrt_ratio_x96 < sqrt_ratio_upper {
        let liquidity0 = get_liquidity_for_amount0(sqrt_ratio_x96, sqrt_ratio_upper, amount0)?;
        let liquidity1 = get_liquidity_for_amount1(sqrt_ratio_lower, sqrt_ratio_x96, amount1)?;
        Ok(liquidity0.min(liquidity1))
    } else {
        get_liquidity_for_amount1(sqrt_ratio_lower, sqrt_ratio_upper, amount1)
    }
}

/// Calculate liquidity from amount0
/// L = amount0 * sqrt_pa * sqrt_pb / (sqrt_pb - sqrt_pa)
pub fn get_liquidity_for_amount0(
    sqrt_ratio_a_x96: U256,
    sqrt_ratio_b_x96: U256,
    amount0: U256,
) -> MathResult<u128> {
    let (sqrt_ratio_lower, sqrt_ratio_upper) = sort(sqrt_ratio_a_x96, sqrt_ratio_b_x96);

    let intermediate = mul_div(sqrt_ratio_lower, sqrt_ratio_upper, Q96)?;
    to_liquidity(mul_div(
        amount0,
        intermediate,
        sqrt_ratio_upper - sqrt_ratio_lower,
    )?)
}

/// Calculate liquidity from amount1
/// L = amount1 / (sqrt_pb - sqrt_pa)
pub fn get_liquidity_for_amount1(
    sqrt_ratio_a_x96: U256,
    sqrt_ratio_b_x96: U256,
    amount1: U256,
) -> MathResult<u128> {
    let (sqrt_ratio_lower, sqrt_ratio_upper) = sort(sqrt_ratio_a_x96, sqrt_ratio_b_x96);

    to_liquidity(mul_div(amount1, Q96, sqrt_ratio_upper - sqrt_ratio_lower)?)
}

/// Get the token amounts a liquidity position holds at the current price, rounded down
pub fn get_amounts_for_liquidity(
    sqrt_ratio_x96: U256,
    sqrt_ratio_a_x96: U256,
    sqrt_ratio_b_x96: U256,
    liquidity: u128,
) -> MathResult<(U256, U256)> {
    let (sqrt_ratio_lower, sqrt_ratio_upper) = sort(sqrt_ratio_a_x96, sqrt_ratio_b_x96);

    if sqrt_ratio_x96 <= sqrt_ratio_lower {
        // Below range - all token0
        let amount0 = get_amount0_delta(sqrt_ratio_lower, sqrt_ratio_upper, liquidity, false)?;
        Ok((amount0, U256::ZERO))
    } else if sqrt_ratio_x96 < sqrt_ratio_upper {
        let amount0 = get_amount0_delta(sqrt_ratio_x96, sqrt_ratio_upper, liquidity, false)?;
        let amount1 = get_amount1_delta(sqrt_ratio_lower, sqrt_ratio_x96, liquidity, false)?;
        Ok((amount0, amount1))
    } else {
        // Above range - all token1
        let amount1 = get_amount1_delta(sqrt_ratio_lower, sqrt_ratio_upper, liquidity, false)?;
        Ok((U256::ZERO, amount1))
    }
}

/// Add signed liquidity delta to unsigned liquidity
pub fn add_delta(liquidity: u128, delta: i128) -> MathResult<u128> {
    if delta < 0 {
        liquidity
            .checked_sub(delta.unsigned_abs())
            .ok_or_else(|| ArithmeticError::Underflow.into())
    } else {
        liquidity
            .checked_add(delta as u128)
            .ok_or_else(|| ArithmeticError::Overflow.into())
    }
}

fn to_liquidity(value: U256) -> MathResult<u128> {
    u128::try_from(value).map_err(|_| ArithmeticError::Overflow.into())
}

fn sort(a: U256, b: U256) -> (U256, U256) {
    if a > b {
        (b, a)
    } else {
        (a, b)
    }
}
