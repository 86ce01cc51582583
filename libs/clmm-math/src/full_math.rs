use alloy_primitives::{U256, U512};
use clmm_types::{ArithmeticError, MathResult};

/// Multiply and divide with 512-bit intermediate precision (rounds down)
/// Returns floor((a * b) / denominator)
pub fn mul_div(a: U256, b: U256, denominator: U256) -> MathResult<U256> {
    if denominator.is_zero() {
        return Err(ArithmeticError::DivisionByZero.into());
    }
    let product = U512::from(a) * U512::from(b);
    narrow(product / U512::from(denominator))
}

/// Multiply and divide with 512-bit intermediate precision (rounds up)
/// Returns ceil((a * b) / denominator)
pub fn mul_div_rounding_up(a: U256, b: U256, denominator: U256) -> MathResult<U256> {
    if denominator.is_zero() {
        return Err(ArithmeticError::DivisionByZero.into());
    }
    let product = U512::from(a) * U512::from(b);
    div_rounding_up_wide(product, U512::from(denominator))
}

/// Unsigned division with rounding up
pub fn div_rounding_up(a: U256, b: U256) -> MathResult<U256> {
    if b.is_zero() {
        return Err(ArithmeticError::DivisionByZero.into());
    }
    let quotient = a / b;
    if (a % b).is_zero() {
        Ok(quotient)
    } else {
        // quotient < a here, so the increment cannot wrap
        Ok(quotient + U256::from(1u8))
    }
}

/// ceil(numerator / denominator) over 512-bit operands, narrowed to 256 bits
pub(crate) fn div_rounding_up_wide(numerator: U512, denominator: U512) -> MathResult<U256> {
    if denominator.is_zero() {
        return Err(ArithmeticError::DivisionByZero.into());
    }
    let mut quotient = numerator / denominator;
    if !(numerator % denominator).is_zero() {
        quotient += U512::from(1u8);
    }
    narrow(quotient)
}

/// Narrow a 512-bit value back to 256 bits, failing if any high limb is set
pub(crate) fn narrow(value: U512) -> MathResult<U256> {
    let limbs = value.as_limbs();
    if limbs[4..].iter().any(|&limb| limb != 0) {
        return Err(ArithmeticError::Overflow.into());
    }
    Ok(U256::from_limbs([limbs[0], limbs[1], limbs[2], limbs[3]]))
}

/// 0-based index of the highest set bit, `None` for zero
pub fn most_significant_bit(x: U256) -> Option<usize> {
    x.bit_len().checked_sub(1)
}

/// (x * y) mod 2^256
pub fn multiply_in_256(x: U256, y: U256) -> U256 {
    x.wrapping_mul(y)
}

/// (x + y) mod 2^256
pub fn add_in_256(x: U256, y: U256) -> U256 {
    x.wrapping_add(y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clmm_types::{MathError, Q96};

    fn u(v: u128) -> U256 {
        U256::from(v)
    }

    // === mul_div tests ===

    #[test]
    fn test_mul_div_basic() {
        // (10 * 20) / 5 = 40
        assert_eq!(mul_div(u(10), u(20), u(5)).unwrap(), u(40));
    }

    #[test]
    fn test_mul_div_phantom_overflow() {
        // a * b exceeds 256 bits but the quotient fits
        let max = U256::MAX;
        assert_eq!(mul_div(max, max, max).unwrap(), max);
        assert_eq!(mul_div(max, Q96, Q96).unwrap(), max);
    }

    #[test]
    fn test_mul_div_rounds_down() {
        assert_eq!(mul_div(u(1), u(1), u(2)).unwrap(), u(0));
        assert_eq!(mul_div(u(3), u(1), u(2)).unwrap(), u(1));
        assert_eq!(mul_div(u(5), u(1), u(3)).unwrap(), u(1));
    }

    #[test]
    fn test_mul_div_zero_denominator() {
        assert_eq!(
            mul_div(u(10), u(20), U256::ZERO),
            Err(MathError::Arithmetic(ArithmeticError::DivisionByZero))
        );
    }

    #[test]
    fn test_mul_div_quotient_overflow() {
        assert_eq!(
            mul_div(U256::MAX, u(2), u(1)),
            Err(MathError::Arithmetic(ArithmeticError::Overflow))
        );
    }

    // === mul_div_rounding_up tests ===

    #[test]
    fn test_mul_div_rounding_up_exact() {
        assert_eq!(mul_div_rounding_up(u(10), u(20), u(5)).unwrap(), u(40));
    }

    #[test]
    fn test_mul_div_rounding_up_with_remainder() {
        // 30 / 7 = 4.28 -> 5
        assert_eq!(mul_div_rounding_up(u(10), u(3), u(7)).unwrap(), u(5));
        assert_eq!(mul_div_rounding_up(u(1), u(1), u(2)).unwrap(), u(1));
        assert_eq!(mul_div_rounding_up(u(1), u(1), u(3)).unwrap(), u(1));
    }

    #[test]
    fn test_mul_div_rounding_up_vs_down_difference() {
        // 77 / 13 = 5.92
        let down = mul_div(u(7), u(11), u(13)).unwrap();
        let up = mul_div_rounding_up(u(7), u(11), u(13)).unwrap();
        assert_eq!(down, u(5));
        assert_eq!(up, u(6));
    }

    #[test]
    fn test_mul_div_rounding_up_at_max() {
        let max = U256::MAX;
        assert_eq!(mul_div_rounding_up(max, u(1), u(1)).unwrap(), max);
        assert_eq!(mul_div_rounding_up(max, u(2), u(2)).unwrap(), max);
        // MAX^2 / (MAX - 1) = MAX + 1 + 1 / (MAX - 1)
        assert_eq!(
            mul_div_rounding_up(max, max, max - u(1)),
            Err(MathError::Arithmetic(ArithmeticError::Overflow))
        );
    }

    #[test]
    fn test_mul_div_rounding_up_zero_denominator() {
        assert_eq!(
            mul_div_rounding_up(u(10), u(20), U256::ZERO),
            Err(MathError::Arithmetic(ArithmeticError::DivisionByZero))
        );
    }

    // === div_rounding_up tests ===

    #[test]
    fn test_div_rounding_up_exact() {
        assert_eq!(div_rounding_up(u(9), u(3)).unwrap(), u(3));
        assert_eq!(div_rounding_up(u(100), u(10)).unwrap(), u(10));
    }

    #[test]
    fn test_div_rounding_up_with_remainder() {
        assert_eq!(div_rounding_up(u(10), u(3)).unwrap(), u(4));
        assert_eq!(div_rounding_up(u(11), u(3)).unwrap(), u(4));
        assert_eq!(div_rounding_up(u(1), u(2)).unwrap(), u(1));
    }

    #[test]
    fn test_div_rounding_up_edges() {
        assert_eq!(div_rounding_up(U256::ZERO, u(5)).unwrap(), U256::ZERO);
        assert_eq!(div_rounding_up(U256::MAX, u(1)).unwrap(), U256::MAX);
        assert_eq!(
            div_rounding_up(U256::MAX, u(2)).unwrap(),
            U256::from(1u8) << 255
        );
        assert_eq!(
            div_rounding_up(u(1), U256::ZERO),
            Err(MathError::Arithmetic(ArithmeticError::DivisionByZero))
        );
    }

    // === narrowing ===

    #[test]
    fn test_narrow() {
        assert_eq!(narrow(U512::from(U256::MAX)).unwrap(), U256::MAX);
        assert_eq!(
            narrow(U512::from(U256::MAX) + U512::from(1u8)),
            Err(MathError::Arithmetic(ArithmeticError::Overflow))
        );
    }

    // === most_significant_bit ===

    #[test]
    fn test_most_significant_bit() {
        assert_eq!(most_significant_bit(U256::ZERO), None);
        assert_eq!(most_significant_bit(u(1)), Some(0));
        assert_eq!(most_significant_bit(u(2)), Some(1));
        assert_eq!(most_significant_bit(u(3)), Some(1));
        assert_eq!(most_significant_bit(Q96), Some(96));
        assert_eq!(most_significant_bit(U256::MAX), Some(255));
    }

    // === wrapping helpers ===

    #[test]
    fn test_multiply_in_256_wraps() {
        assert_eq!(multiply_in_256(u(6), u(7)), u(42));
        // 2^128 * 2^128 = 2^256 = 0 mod 2^256
        let half = U256::from(1u8) << 128;
        assert_eq!(multiply_in_256(half, half), U256::ZERO);
        // (2^256 - 1) * 2 = 2^256 - 2
        assert_eq!(multiply_in_256(U256::MAX, u(2)), U256::MAX - u(1));
    }

    #[test]
    fn test_add_in_256_wraps() {
        assert_eq!(add_in_256(u(2), u(3)), u(5));
        assert_eq!(add_in_256(U256::MAX, u(1)), U256::ZERO);
        assert_eq!(add_in_256(U256::MAX, U256::MAX), U256::MAX - u(1));
    }
}
