// ============================================================================
// INVARIANTS MODULE
// ============================================================================
//
// Pure predicates over pool snapshots and swap steps. Callers that receive
// pool state from outside (node queries, cached snapshots) run
// `check_pool_state` before handing the values to the math routines; tests
// use the step predicates to assert properties of `compute_swap_step`.
//
// INVARIANT CATEGORIES:
//
// 1. PRICE INVARIANTS
//    - Price is within [MIN_SQRT_RATIO, MAX_SQRT_RATIO)
//    - Tick is within [MIN_TICK, MAX_TICK] and consistent with the price
//
// 2. LIQUIDITY INVARIANTS
//    - Liquidity deltas never underflow or overflow
//
// 3. SWAP STEP INVARIANTS
//    - Price moves in the swap direction and never past the target
//    - Exact input steps never spend more than the remaining amount
//
// ============================================================================

use alloy_primitives::{I256, U256};
use clmm_types::{
    MathResult, PoolState, RangeError, SwapStepResult, MAX_SQRT_RATIO, MAX_TICK, MIN_SQRT_RATIO,
    MIN_TICK,
};

use crate::tick_math::get_tick_at_sqrt_ratio;

// ============================================================================
// PRICE INVARIANTS
// ============================================================================

/// Invariant: sqrt_price is within the domain of `get_tick_at_sqrt_ratio`
///
/// Property:
///   MIN_SQRT_RATIO <= sqrt_price_x96 < MAX_SQRT_RATIO
pub fn price_in_bounds(state: &PoolState) -> bool {
    state.sqrt_price_x96 >= MIN_SQRT_RATIO && state.sqrt_price_x96 < MAX_SQRT_RATIO
}

/// Invariant: tick is within valid bounds
///
/// Property:
///   MIN_TICK <= tick <= MAX_TICK
pub fn tick_in_bounds(state: &PoolState) -> bool {
    state.tick >= MIN_TICK && state.tick <= MAX_TICK
}

/// Invariant: tick is exactly the tick of the current price
///
/// Property:
///   tick == get_tick_at_sqrt_ratio(sqrt_price_x96)
///
/// False when the price itself is out of bounds.
pub fn tick_matches_price(state: &PoolState) -> bool {
    get_tick_at_sqrt_ratio(state.sqrt_price_x96).is_ok_and(|tick| tick == state.tick)
}

/// Check a pool snapshot, returning the first violated invariant as an error
pub fn check_pool_state(state: &PoolState) -> MathResult<()> {
    if !price_in_bounds(state) {
        return Err(RangeError::SqrtPriceOutOfBounds(state.sqrt_price_x96).into());
    }
    if !tick_in_bounds(state) || !tick_matches_price(state) {
        return Err(RangeError::TickOutOfBounds(state.tick).into());
    }
    Ok(())
}

// ============================================================================
// LIQUIDITY INVARIANTS
// ============================================================================

/// Invariant: liquidity delta doesn't cause underflow or overflow
///
/// Property:
///   if delta < 0 then liquidity >= |delta|, else liquidity + delta <= u128::MAX
pub fn liquidity_delta_valid(liquidity: u128, delta: i128) -> bool {
    if delta < 0 {
        liquidity >= delta.unsigned_abs()
    } else {
        liquidity.checked_add(delta as u128).is_some()
    }
}

/// Invariant: tick is on spacing
///
/// Property:
///   tick % tick_spacing == 0
pub fn tick_on_spacing(tick: i32, tick_spacing: i32) -> bool {
    tick_spacing > 0 && tick % tick_spacing == 0
}

// ============================================================================
// SWAP STEP INVARIANTS
// ============================================================================

/// Invariant: the step moves in the swap direction and stops at the target
///
/// Property:
///   - zero_for_one => target <= next <= current
///   - !zero_for_one => current <= next <= target
pub fn step_within_target(current: U256, target: U256, step: &SwapStepResult) -> bool {
    let next = step.sqrt_ratio_next_x96;
    if current >= target {
        target <= next && next <= current
    } else {
        current <= next && next <= target
    }
}

/// Invariant: exact input steps never spend more than was left
///
/// Property (amount_remaining >= 0):
///   amount_in + fee_amount <= amount_remaining
///   amount_in + fee_amount == amount_remaining if the target was not reached
pub fn exact_in_conserved(amount_remaining: I256, target: U256, step: &SwapStepResult) -> bool {
    if amount_remaining.is_negative() {
        return true;
    }
    let remaining = amount_remaining.unsigned_abs();
    match step.amount_in.checked_add(step.fee_amount) {
        Some(spent) if step.sqrt_ratio_next_x96 == target => spent <= remaining,
        Some(spent) => spent == remaining,
        None => false,
    }
}

/// Invariant: exact output steps never pay out more than requested
///
/// Property (amount_remaining < 0):
///   amount_out <= |amount_remaining|
pub fn exact_out_bounded(amount_remaining: I256, step: &SwapStepResult) -> bool {
    !amount_remaining.is_negative() || step.amount_out <= amount_remaining.unsigned_abs()
}

// ============================================================================
// TESTS
// ============================================================================
