use alloy_primitives::U256;

use crate::{FeePips, MathResult, RangeError, FEE_DENOMINATOR, IMPOSSIBLE_FEE};

/// Snapshot of the pool fields the math routines read.
///
/// Values arrive as plain integers from whatever client queried the pool;
/// nothing here is trusted until `check_pool_state` has run over it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PoolState {
    /// Current sqrt(price) as Q64.96
    pub sqrt_price_x96: U256,
    /// Current tick index
    pub tick: i32,
    /// Total liquidity currently in range
    pub liquidity: u128,
}

impl PoolState {
    pub fn new(sqrt_price_x96: U256, tick: i32) -> Self {
        Self {
            sqrt_price_x96,
            tick,
            liquidity: 0,
        }
    }
}

/// Fee configuration as stored by the pool, in raw 16-bit fields.
///
/// Any raw value of `IMPOSSIBLE_FEE` or above means the field is unset and
/// the pool default applies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PoolFees {
    /// Share of the LP fee routed to the protocol, in FEE_DENOMINATOR parts
    pub protocol_fee: u16,
    /// Base liquidity provider fee
    pub lp_fee_base: u16,
    /// Current LP fee, in case of dynamic adjustment
    pub lp_fee_current: u16,
}

/// Decode a raw fee field. Returns `None` for the "unset" sentinel range.
pub fn decode_fee(raw: u16) -> Option<FeePips> {
    let raw = raw as u32;
    if raw >= IMPOSSIBLE_FEE {
        None
    } else {
        Some(raw)
    }
}

impl PoolFees {
    /// All three fields unset
    pub fn unset() -> Self {
        let sentinel = IMPOSSIBLE_FEE as u16;
        Self {
            protocol_fee: sentinel,
            lp_fee_base: sentinel,
            lp_fee_current: sentinel,
        }
    }

    pub fn protocol(&self) -> Option<FeePips> {
        decode_fee(self.protocol_fee)
    }

    pub fn lp_base(&self) -> Option<FeePips> {
        decode_fee(self.lp_fee_base)
    }

    pub fn lp_current(&self) -> Option<FeePips> {
        decode_fee(self.lp_fee_current)
    }

    /// The fee a swap step is charged: the current fee if set, otherwise the base fee
    pub fn effective_lp_fee(&self) -> Option<FeePips> {
        self.lp_current().or_else(|| self.lp_base())
    }

    /// Reject set values that are not a valid rate
    pub fn validate(&self) -> MathResult<()> {
        for fee in [self.protocol(), self.lp_base(), self.lp_current()]
            .into_iter()
            .flatten()
        {
            if fee >= FEE_DENOMINATOR {
                return Err(RangeError::InvalidFee(fee).into());
            }
        }
        Ok(())
    }
}
