use alloy_primitives::{U256, U512};
use clmm_types::{ArithmeticError, MathResult, MAX_UINT160, Q96};

use crate::full_math::{
    add_in_256, div_rounding_up, div_rounding_up_wide, mul_div, mul_div_rounding_up,
    multiply_in_256, narrow,
};

/// Calculate amount0 delta between two prices
/// delta_x = L * (sqrt_pb - sqrt_pa) / (sqrt_pa * sqrt_pb)
///
/// The floor variant divides by the upper price first and the lower price
/// second; the two truncations are part of the result.
pub fn get_amount0_delta(
    sqrt_ratio_a_x96: U256,
    sqrt_ratio_b_x96: U256,
    liquidity: u128,
    round_up: bool,
) -> MathResult<U256> {
    let (sqrt_ratio_lower, sqrt_ratio_upper) = sort(sqrt_ratio_a_x96, sqrt_ratio_b_x96);

    if sqrt_ratio_lower.is_zero() {
        return Err(ArithmeticError::DivisionByZero.into());
    }

    let numerator1 = U256::from(liquidity) << 96;
    let numerator2 = sqrt_ratio_upper - sqrt_ratio_lower;

    if round_up {
        div_rounding_up(
            mul_div_rounding_up(numerator1, numerator2, sqrt_ratio_upper)?,
            sqrt_ratio_lower,
        )
    } else {
        let product = U512::from(numerator1) * U512::from(numerator2);
        narrow(product / U512::from(sqrt_ratio_upper) / U512::from(sqrt_ratio_lower))
    }
}

/// Calculate amount1 delta between two prices
/// delta_y = L * (sqrt_pb - sqrt_pa)
pub fn get_amount1_delta(
    sqrt_ratio_a_x96: U256,
    sqrt_ratio_b_x96: U256,
    liquidity: u128,
    round_up: bool,
) -> MathResult<U256> {
    let (sqrt_ratio_lower, sqrt_ratio_upper) = sort(sqrt_ratio_a_x96, sqrt_ratio_b_x96);
    let liquidity = U256::from(liquidity);

    if round_up {
        mul_div_rounding_up(liquidity, sqrt_ratio_upper - sqrt_ratio_lower, Q96)
    } else {
        mul_div(liquidity, sqrt_ratio_upper - sqrt_ratio_lower, Q96)
    }
}

/// Get next sqrt price from an input amount of token0 or token1
///
/// Rounds so that the price never moves further than the input pays for.
pub fn get_next_sqrt_price_from_input(
    sqrt_price_x96: U256,
    liquidity: u128,
    amount_in: U256,
    zero_for_one: bool,
) -> MathResult<U256> {
    check_inputs(sqrt_price_x96, liquidity)?;

    if zero_for_one {
        get_next_sqrt_price_from_amount0_rounding_up(sqrt_price_x96, liquidity, amount_in, true)
    } else {
        get_next_sqrt_price_from_amount1_rounding_down(sqrt_price_x96, liquidity, amount_in, true)
    }
}

/// Get next sqrt price from an output amount of token0 or token1
pub fn get_next_sqrt_price_from_output(
    sqrt_price_x96: U256,
    liquidity: u128,
    amount_out: U256,
    zero_for_one: bool,
) -> MathResult<U256> {
    check_inputs(sqrt_price_x96, liquidity)?;

    if zero_for_one {
        get_next_sqrt_price_from_amount1_rounding_down(sqrt_price_x96, liquidity, amount_out, false)
    } else {
        get_next_sqrt_price_from_amount0_rounding_up(sqrt_price_x96, liquidity, amount_out, false)
    }
}

/// Calculate next sqrt price given a token0 amount
/// sqrt_price_next = L * sqrt_price / (L + amount * sqrt_price)  [if add]
/// sqrt_price_next = L * sqrt_price / (L - amount * sqrt_price)  [if remove]
///
/// The product and the add-side denominator are computed mod 2^256; a wrap in
/// either sends the add path to L / (L / sqrt_price + amount).
pub fn get_next_sqrt_price_from_amount0_rounding_up(
    sqrt_price_x96: U256,
    liquidity: u128,
    amount: U256,
    add: bool,
) -> MathResult<U256> {
    if amount.is_zero() {
        return Ok(sqrt_price_x96);
    }

    let numerator1 = U256::from(liquidity) << 96;
    let product = multiply_in_256(amount, sqrt_price_x96);
    let product_wrapped = product / amount != sqrt_price_x96;

    if add {
        if !product_wrapped {
            let denominator = add_in_256(numerator1, product);
            if denominator >= numerator1 {
                return mul_div_rounding_up(numerator1, sqrt_price_x96, denominator);
            }
        }

        let per_price = numerator1
            .checked_div(sqrt_price_x96)
            .ok_or(ArithmeticError::DivisionByZero)?;
        // Can exceed 256 bits for amounts near U256::MAX
        let denominator = U512::from(per_price) + U512::from(amount);
        div_rounding_up_wide(U512::from(numerator1), denominator)
    } else {
        if product_wrapped {
            return Err(ArithmeticError::Overflow.into());
        }
        if numerator1 <= product {
            return Err(ArithmeticError::Underflow.into());
        }
        mul_div_rounding_up(numerator1, sqrt_price_x96, numerator1 - product)
    }
}

/// Calculate next sqrt price given a token1 amount
/// sqrt_price_next = sqrt_price + amount / L  [if add]
/// sqrt_price_next = sqrt_price - amount / L  [if remove]
pub fn get_next_sqrt_price_from_amount1_rounding_down(
    sqrt_price_x96: U256,
    liquidity: u128,
    amount: U256,
    add: bool,
) -> MathResult<U256> {
    let liquidity = U256::from(liquidity);

    if add {
        let quotient = if amount <= MAX_UINT160 {
            (amount << 96usize)
                .checked_div(liquidity)
                .ok_or(ArithmeticError::DivisionByZero)?
        } else {
            mul_div(amount, Q96, liquidity)?
        };
        sqrt_price_x96
            .checked_add(quotient)
            .ok_or_else(|| ArithmeticError::Overflow.into())
    } else {
        let quotient = mul_div_rounding_up(amount, Q96, liquidity)?;
        sqrt_price_x96
            .checked_sub(quotient)
            .ok_or_else(|| ArithmeticError::Underflow.into())
    }
}

fn check_inputs(sqrt_price_x96: U256, liquidity: u128) -> MathResult<()> {
    if sqrt_price_x96.is_zero() || liquidity == 0 {
        return Err(ArithmeticError::DivisionByZero.into());
    }
    Ok(())
}

fn sort(a: U256, b: U256) -> (U256, U256) {
    if a > b {
        (b, a)
    } else {
        (a, b)
    }
}
