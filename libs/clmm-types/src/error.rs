use alloy_primitives::U256;
use thiserror::Error;

/// An input lies outside the domain an operation is defined on
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeError {
    #[error("tick {0} is outside [MIN_TICK, MAX_TICK]")]
    TickOutOfBounds(i32),
    #[error("sqrt price {0} is outside [MIN_SQRT_RATIO, MAX_SQRT_RATIO)")]
    SqrtPriceOutOfBounds(U256),
    #[error("fee {0} must be below the fee denominator")]
    InvalidFee(u32),
    #[error("tick spacing {0} must be positive")]
    InvalidSpacing(i32),
}

/// Integer arithmetic that has no defined result
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticError {
    #[error("division by zero")]
    DivisionByZero,
    #[error("subtraction underflow")]
    Underflow,
    #[error("result does not fit the target width")]
    Overflow,
}

/// Error returned by every fallible math routine.
///
/// All variants are precondition violations on the caller's side; none are
/// transient and retrying with the same input yields the same error.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathError {
    #[error(transparent)]
    Range(#[from] RangeError),
    #[error(transparent)]
    Arithmetic(#[from] ArithmeticError),
}

pub type MathResult<T> = Result<T, MathError>;
