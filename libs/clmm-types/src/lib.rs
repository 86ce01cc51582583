mod error;
mod pool;
mod swap;

pub use error::*;
pub use pool::*;
pub use swap::*;

use alloy_primitives::{uint, U256};

/// Q96 constant (2^96) for Q64.96 fixed-point prices
pub const Q96: U256 = U256::from_limbs([0, 1 << 32, 0, 0]);

/// Q128 constant (2^128), the unit of the 128.128 accumulator in tick math
pub const Q128: U256 = U256::from_limbs([0, 0, 1, 0]);

/// 2^128 - 1
pub const MAX_UINT128: U256 = U256::from_limbs([u64::MAX, u64::MAX, 0, 0]);

/// 2^160 - 1
pub const MAX_UINT160: U256 = U256::from_limbs([u64::MAX, u64::MAX, u32::MAX as u64, 0]);

/// 2^256 - 1
pub const MAX_UINT256: U256 = U256::MAX;

/// Minimum tick index
pub const MIN_TICK: i32 = -887272;

/// Maximum tick index
pub const MAX_TICK: i32 = -MIN_TICK;

/// Minimum sqrt price, equal to `get_sqrt_ratio_at_tick(MIN_TICK)`
pub const MIN_SQRT_RATIO: U256 = uint!(4295128739_U256);

/// Maximum sqrt price, equal to `get_sqrt_ratio_at_tick(MAX_TICK)`.
/// Exclusive upper bound for `get_tick_at_sqrt_ratio`.
pub const MAX_SQRT_RATIO: U256 =
    uint!(1461446703485210103287273052203988822378723970342_U256);

/// Fees are expressed in parts of this denominator (1 = 0.01%)
pub const FEE_DENOMINATOR: u32 = 10000;

/// Raw fee value meaning "not set, leave the default"
pub const IMPOSSIBLE_FEE: u32 = FEE_DENOMINATOR + 1;

/// Fee rate in parts of `FEE_DENOMINATOR`
pub type FeePips = u32;
