pub mod full_math;
pub mod invariants;
pub mod liquidity_math;
pub mod price;
pub mod sqrt_price_math;
pub mod swap_math;
pub mod tick_math;

pub use full_math::*;
pub use liquidity_math::*;
pub use price::*;
pub use sqrt_price_math::*;
pub use swap_math::*;
pub use tick_math::*;
