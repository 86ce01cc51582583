use alloy_primitives::{uint, I256, U256};
use clmm_types::{
    ArithmeticError, MathResult, RangeError, MAX_SQRT_RATIO, MAX_TICK, MIN_SQRT_RATIO, MIN_TICK,
    Q128,
};
use tracing::trace;

use crate::full_math::most_significant_bit;

/// (1/sqrt(1.0001))^(2^i) as 128.128 fixed point, indexed by bit position of |tick|
const SQRT_1_0001_POWERS: [U256; 20] = uint!([
    0xfffcb933bd6fad37aa2d162d1a594001_U256,
    0xfff97272373d413259a46990580e213a_U256,
    0xfff2e50f5f656932ef12357cf3c7fdcc_U256,
    0xffe5caca7e10e4e61c3624eaa0941cd0_U256,
    0xffcb9843d60f6159c9db58835c926644_U256,
    0xff973b41fa98c081472e6896dfb254c0_U256,
    0xff2ea16466c96a3843ec78b326b52861_U256,
    0xfe5dee046a99a2a811c461f1969c3053_U256,
    0xfcbe86c7900a88aedcffc83b479aa3a4_U256,
    0xf987a7253ac413176f2b074cf7815e54_U256,
    0xf3392b0822b70005940c7a398e4b70f3_U256,
    0xe7159475a2c29b7443b29c7fa6e889d9_U256,
    0xd097f3bdfd2022b8845ad8f792aa5825_U256,
    0xa9f746462d870fdf8a65dc1f90e061e5_U256,
    0x70d869a156d2a1b890bb3df62baf32f7_U256,
    0x31be135f97d08fd981231505542fcfa6_U256,
    0x9aa508b5b7a84e1c677de54f3e99bc9_U256,
    0x5d6af8dedb81196699c329225ee604_U256,
    0x2216e584f5fa1ea926041bedfe98_U256,
    0x48a170391f7dc42444e8fa2_U256,
]);

/// 2^64 / log2(sqrt(1.0001)): turns a 64.64 log2 into a 128.128 log base sqrt(1.0001)
const LOG_SQRT_10001_FACTOR: U256 = uint!(255738958999603826347141_U256);

/// Error bound below the true tick, 128.128
const TICK_LOW_CORRECTION: U256 = uint!(3402992956809132418596140100660247210_U256);

/// Error bound above the true tick, 128.128
const TICK_HIGH_CORRECTION: U256 = uint!(291339464771989622907027621153398088495_U256);

/// Calculate sqrt(1.0001^tick) * 2^96
///
/// Exact for every tick in [MIN_TICK, MAX_TICK]; the result is rounded up so
/// that `get_tick_at_sqrt_ratio` maps it back to the same tick.
pub fn get_sqrt_ratio_at_tick(tick: i32) -> MathResult<U256> {
    if !(MIN_TICK..=MAX_TICK).contains(&tick) {
        return Err(RangeError::TickOutOfBounds(tick).into());
    }

    let abs_tick = tick.unsigned_abs();

    // 128.128 accumulator of (1/sqrt(1.0001))^|tick|
    let mut ratio = if abs_tick & 0x1 != 0 {
        SQRT_1_0001_POWERS[0]
    } else {
        Q128
    };
    for (bit, factor) in SQRT_1_0001_POWERS.iter().enumerate().skip(1) {
        if abs_tick & (1 << bit) != 0 {
            ratio = mul_shift_128(ratio, *factor);
        }
    }

    // We computed for a negative tick
    if tick > 0 {
        ratio = U256::MAX / ratio;
    }

    // 128.128 -> 64.96, rounding up
    let remainder = ratio & U256::from(u32::MAX);
    let mut sqrt_price_x96 = ratio >> 32;
    if !remainder.is_zero() {
        sqrt_price_x96 += U256::from(1u8);
    }
    Ok(sqrt_price_x96)
}

/// Get the greatest tick whose sqrt ratio is <= `sqrt_price_x96`
///
/// `sqrt_price_x96` must lie in [MIN_SQRT_RATIO, MAX_SQRT_RATIO).
pub fn get_tick_at_sqrt_ratio(sqrt_price_x96: U256) -> MathResult<i32> {
    if sqrt_price_x96 < MIN_SQRT_RATIO || sqrt_price_x96 >= MAX_SQRT_RATIO {
        return Err(RangeError::SqrtPriceOutOfBounds(sqrt_price_x96).into());
    }

    let ratio = sqrt_price_x96 << 32;
    let msb = most_significant_bit(ratio)
        .ok_or(RangeError::SqrtPriceOutOfBounds(sqrt_price_x96))?;

    // Normalize so the leading bit sits at position 127
    let mut r = if msb >= 128 {
        ratio >> (msb - 127)
    } else {
        ratio << (127 - msb)
    };

    // 64.64 base-2 logarithm: integer part from msb, fraction by repeated squaring
    let mut log_2: i128 = ((msb as i128) - 128) << 64;
    for i in 0..14 {
        r = (r * r) >> 127;
        let f = (r >> 128usize).as_limbs()[0];
        log_2 |= (f as i128) << (63 - i);
        r >>= f as usize;
    }

    let log_2 = I256::try_from(log_2).map_err(|_| ArithmeticError::Overflow)?;
    let log_sqrt10001 = log_2 * I256::from_raw(LOG_SQRT_10001_FACTOR);

    let tick_low = to_tick((log_sqrt10001 - I256::from_raw(TICK_LOW_CORRECTION)).asr(128))?;
    let tick_high = to_tick((log_sqrt10001 + I256::from_raw(TICK_HIGH_CORRECTION)).asr(128))?;

    let tick = if tick_low == tick_high {
        tick_low
    } else if get_sqrt_ratio_at_tick(tick_high)? <= sqrt_price_x96 {
        tick_high
    } else {
        tick_low
    };

    trace!(
        %sqrt_price_x96,
        tick_low,
        tick_high,
        tick,
        "resolved tick at sqrt ratio"
    );

    Ok(tick)
}

/// Lowest usable tick for a spacing: ceil(MIN_TICK / spacing) * spacing
pub fn get_min_tick(tick_spacing: i32) -> MathResult<i32> {
    check_spacing(tick_spacing)?;
    // Truncating division rounds toward zero, i.e. up for negative ticks
    Ok((MIN_TICK / tick_spacing) * tick_spacing)
}

/// Highest usable tick for a spacing: floor(MAX_TICK / spacing) * spacing
pub fn get_max_tick(tick_spacing: i32) -> MathResult<i32> {
    check_spacing(tick_spacing)?;
    Ok((MAX_TICK / tick_spacing) * tick_spacing)
}

/// Maximum liquidity that can reference a single initialized tick
///
/// Splits the u128 range evenly across every usable tick so that the sum over
/// all ticks can never overflow.
pub fn get_max_liquidity_per_tick(tick_spacing: i32) -> MathResult<u128> {
    let min_tick = get_min_tick(tick_spacing)?;
    let max_tick = get_max_tick(tick_spacing)?;
    let num_ticks = ((max_tick - min_tick) / tick_spacing) as u128 + 1;
    Ok(u128::MAX / num_ticks)
}

/// Round a tick to the nearest multiple of `tick_spacing`, clamped to the usable range
///
/// Halfway values round up.
pub fn nearest_usable_tick(tick: i32, tick_spacing: i32) -> MathResult<i32> {
    check_spacing(tick_spacing)?;
    if !(MIN_TICK..=MAX_TICK).contains(&tick) {
        return Err(RangeError::TickOutOfBounds(tick).into());
    }

    // Widened: rounding up near MAX_TICK with a huge spacing exceeds i32
    let (tick, spacing) = (tick as i64, tick_spacing as i64);
    let remainder = tick.rem_euclid(spacing);
    let rounded_down = tick - remainder;
    let rounded = if remainder >= spacing - remainder {
        rounded_down + spacing
    } else {
        rounded_down
    };

    let min_tick = get_min_tick(tick_spacing)? as i64;
    let max_tick = get_max_tick(tick_spacing)? as i64;
    Ok(rounded.clamp(min_tick, max_tick) as i32)
}

fn check_spacing(tick_spacing: i32) -> MathResult<()> {
    if tick_spacing <= 0 {
        return Err(RangeError::InvalidSpacing(tick_spacing).into());
    }
    Ok(())
}

/// (x * y) >> 128 for x <= 2^128 and y < 2^128; the product always fits 256 bits
fn mul_shift_128(x: U256, y: U256) -> U256 {
    (x * y) >> 128
}

fn to_tick(value: I256) -> MathResult<i32> {
    i32::try_from(value).map_err(|_| ArithmeticError::Overflow.into())
}
