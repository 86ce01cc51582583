use alloy_primitives::U256;

/// Result of a single bounded swap step
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SwapStepResult {
    /// The sqrt price after this step, never past the target
    pub sqrt_ratio_next_x96: U256,
    /// Amount of input token consumed, excluding the fee
    pub amount_in: U256,
    /// Amount of output token produced
    pub amount_out: U256,
    /// Fee amount taken from the input
    pub fee_amount: U256,
}
