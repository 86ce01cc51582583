use alloy_primitives::{I256, U256};
use clmm_types::{
    ArithmeticError, FeePips, MathResult, RangeError, SwapStepResult, FEE_DENOMINATOR,
};
use tracing::trace;

use crate::full_math::{mul_div, mul_div_rounding_up};
use crate::sqrt_price_math::{
    get_amount0_delta, get_amount1_delta, get_next_sqrt_price_from_input,
    get_next_sqrt_price_from_output,
};

/// Compute the result of swapping within a single tick range
///
/// # Arguments
/// * `sqrt_ratio_current_x96` - Current sqrt price
/// * `sqrt_ratio_target_x96` - Price that cannot be crossed (next tick boundary or price limit);
///   the swap direction is inferred from it
/// * `liquidity` - Available liquidity in this range
/// * `amount_remaining` - Remaining amount to swap (positive = exact input, negative = exact output)
/// * `fee_pips` - Fee in parts of FEE_DENOMINATOR (e.g., 30 = 0.3%)
///
/// # Invariants
/// For exact input, `amount_in + fee_amount` never exceeds `amount_remaining`,
/// and equals it whenever the target is not reached.
pub fn compute_swap_step(
    sqrt_ratio_current_x96: U256,
    sqrt_ratio_target_x96: U256,
    liquidity: u128,
    amount_remaining: I256,
    fee_pips: FeePips,
) -> MathResult<SwapStepResult> {
    if fee_pips >= FEE_DENOMINATOR {
        return Err(RangeError::InvalidFee(fee_pips).into());
    }
    if liquidity == 0
        && !amount_remaining.is_zero()
        && sqrt_ratio_current_x96 != sqrt_ratio_target_x96
    {
        return Err(ArithmeticError::DivisionByZero.into());
    }

    let zero_for_one = sqrt_ratio_current_x96 >= sqrt_ratio_target_x96;
    let exact_in = !amount_remaining.is_negative();
    let amount_remaining_abs = amount_remaining.unsigned_abs();

    let fee_denominator = U256::from(FEE_DENOMINATOR);
    let fee = U256::from(fee_pips);

    let sqrt_ratio_next_x96: U256;
    let mut amount_in = U256::ZERO;
    let mut amount_out = U256::ZERO;

    if exact_in {
        let amount_remaining_less_fee =
            mul_div(amount_remaining_abs, fee_denominator - fee, fee_denominator)?;

        // Max amount we can swap in to reach the target
        amount_in = if zero_for_one {
            get_amount0_delta(sqrt_ratio_target_x96, sqrt_ratio_current_x96, liquidity, true)?
        } else {
            get_amount1_delta(sqrt_ratio_current_x96, sqrt_ratio_target_x96, liquidity, true)?
        };

        sqrt_ratio_next_x96 = if amount_remaining_less_fee >= amount_in {
            sqrt_ratio_target_x96
        } else {
            get_next_sqrt_price_from_input(
                sqrt_ratio_current_x96,
                liquidity,
                amount_remaining_less_fee,
                zero_for_one,
            )?
        };
    } else {
        // Max amount we can take out before reaching the target
        amount_out = if zero_for_one {
            get_amount1_delta(sqrt_ratio_target_x96, sqrt_ratio_current_x96, liquidity, false)?
        } else {
            get_amount0_delta(sqrt_ratio_current_x96, sqrt_ratio_target_x96, liquidity, false)?
        };

        sqrt_ratio_next_x96 = if amount_remaining_abs >= amount_out {
            sqrt_ratio_target_x96
        } else {
            get_next_sqrt_price_from_output(
                sqrt_ratio_current_x96,
                liquidity,
                amount_remaining_abs,
                zero_for_one,
            )?
        };
    }

    let reached_target = sqrt_ratio_next_x96 == sqrt_ratio_target_x96;

    // The max computed above is final only on its own side and only at the target
    if zero_for_one {
        if !(reached_target && exact_in) {
            amount_in =
                get_amount0_delta(sqrt_ratio_next_x96, sqrt_ratio_current_x96, liquidity, true)?;
        }
        if !(reached_target && !exact_in) {
            amount_out =
                get_amount1_delta(sqrt_ratio_next_x96, sqrt_ratio_current_x96, liquidity, false)?;
        }
    } else {
        if !(reached_target && exact_in) {
            amount_in =
                get_amount1_delta(sqrt_ratio_current_x96, sqrt_ratio_next_x96, liquidity, true)?;
        }
        if !(reached_target && !exact_in) {
            amount_out =
                get_amount0_delta(sqrt_ratio_current_x96, sqrt_ratio_next_x96, liquidity, false)?;
        }
    }

    // Cap output at remaining for exact output swaps
    if !exact_in && amount_out > amount_remaining_abs {
        amount_out = amount_remaining_abs;
    }

    let fee_amount = if exact_in && !reached_target {
        // Didn't reach target: whatever the price move didn't use is fee
        amount_remaining_abs
            .checked_sub(amount_in)
            .ok_or(ArithmeticError::Underflow)?
    } else {
        mul_div_rounding_up(amount_in, fee, fee_denominator - fee)?
    };

    trace!(
        zero_for_one,
        exact_in,
        reached_target,
        %sqrt_ratio_next_x96,
        %amount_in,
        %amount_out,
        %fee_amount,
        "computed swap step"
    );

    Ok(SwapStepResult {
        sqrt_ratio_next_x96,
        amount_in,
        amount_out,
        fee_amount,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clmm_types::{MathError, Q96};
    use rstest::rstest;

    fn n(s: &str) -> U256 {
        s.parse().unwrap()
    }

    fn amount(v: i128) -> I256 {
        I256::try_from(v).unwrap()
    }

    const E18: i128 = 1_000_000_000_000_000_000;

    // === Golden steps ===

    #[rstest]
    // exact in, target reached
    #[case(
        "79228162514264337593543950336",
        "79623317895830914510639640423",
        2_000_000_000_000_000_000,
        E18,
        6,
        ["79623317895830914510639640423", "9975124224178055", "9925619580021728", "5988667735148"]
    )]
    // exact out, target reached
    #[case(
        "79228162514264337593543950336",
        "79623317895830914510639640423",
        2_000_000_000_000_000_000,
        -E18,
        6,
        ["79623317895830914510639640423", "9975124224178055", "9925619580021728", "5988667735148"]
    )]
    // exact in, amount runs out first
    #[case(
        "79228162514264337593543950336",
        "250541448375047931186413801569",
        2_000_000_000_000_000_000,
        E18,
        6,
        ["118818475322642227089037862318", "999400000000000000", "666399946655997866", "600000000000000"]
    )]
    // exact out, amount runs out first
    #[case(
        "79228162514264337593543950336",
        "250541448375047931186413801569",
        2_000_000_000_000_000_000,
        -E18,
        6,
        ["158456325028528675187087900672", "2000000000000000000", "1000000000000000000", "1200720432259356"]
    )]
    // zero for one, exact in
    #[case(
        "79228162514264337593543950336",
        "78435880889121694217608510832",
        1_000_000_000_000_000_000_000,
        1_000_000_000_000_000,
        30,
        ["79228083523865064300074843162", "997000000000000", "996999005991991", "3000000000000"]
    )]
    // zero for one, exact out
    #[case(
        "79228162514264337593543950336",
        "78435880889121694217608510832",
        1_000_000_000_000_000_000_000,
        -1_000_000_000_000_000,
        30,
        ["79228083286101823329206356792", "1000001000001001", "1000000000000000", "3009030090274"]
    )]
    // output capped at remaining
    #[case(
        "417332158212080721273783715441582",
        "1452870262520218020823638996",
        159344665391607089467575320103,
        -1,
        1,
        ["417332158212080721273783715441581", "1", "1", "1"]
    )]
    // entire input taken as fee
    #[case(
        "2413",
        "79887613182836312",
        1985041575832132834610021537970,
        10,
        1872,
        ["2413", "0", "0", "10"]
    )]
    fn test_compute_swap_step_golden(
        #[case] current: &str,
        #[case] target: &str,
        #[case] liquidity: u128,
        #[case] remaining: i128,
        #[case] fee_pips: u32,
        #[case] expected: [&str; 4],
    ) {
        let step = compute_swap_step(n(current), n(target), liquidity, amount(remaining), fee_pips)
            .unwrap();
        assert_eq!(
            step,
            SwapStepResult {
                sqrt_ratio_next_x96: n(expected[0]),
                amount_in: n(expected[1]),
                amount_out: n(expected[2]),
                fee_amount: n(expected[3]),
            }
        );
    }

    // === Exact input ===

    #[test]
    fn test_exact_in_capped_at_target_spends_less() {
        let target = n("79623317895830914510639640423");
        let step = compute_swap_step(Q96, target, 2 * E18 as u128, amount(E18), 6).unwrap();
        assert_eq!(step.sqrt_ratio_next_x96, target);
        assert!(step.amount_in + step.fee_amount < U256::from(E18 as u128));
    }

    #[test]
    fn test_exact_in_not_reaching_target_consumes_everything() {
        let target = n("250541448375047931186413801569");
        let step = compute_swap_step(Q96, target, 2 * E18 as u128, amount(E18), 6).unwrap();
        assert!(step.sqrt_ratio_next_x96 < target);
        assert_eq!(step.amount_in + step.fee_amount, U256::from(E18 as u128));
    }

    #[test]
    fn test_zero_fee_charges_nothing_at_target() {
        let target = n("79623317895830914510639640423");
        let step = compute_swap_step(Q96, target, 2 * E18 as u128, amount(E18), 0).unwrap();
        assert_eq!(step.fee_amount, U256::ZERO);
    }

    // === Exact output ===

    #[test]
    fn test_exact_out_never_exceeds_requested() {
        let target = n("250541448375047931186413801569");
        let step = compute_swap_step(Q96, target, 2 * E18 as u128, amount(-E18), 6).unwrap();
        assert_eq!(step.amount_out, U256::from(E18 as u128));
    }

    // === Edge cases ===

    #[rstest]
    #[case(12345)]
    #[case(-12345)]
    #[case(0)]
    fn test_no_op_step(#[case] remaining: i128) {
        let step = compute_swap_step(Q96, Q96, E18 as u128, amount(remaining), 30).unwrap();
        assert_eq!(
            step,
            SwapStepResult {
                sqrt_ratio_next_x96: Q96,
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_zero_liquidity_is_rejected() {
        let target = n("79623317895830914510639640423");
        assert_eq!(
            compute_swap_step(Q96, target, 0, amount(E18), 30),
            Err(MathError::Arithmetic(ArithmeticError::DivisionByZero))
        );
        assert_eq!(
            compute_swap_step(Q96, target, 0, amount(-E18), 30),
            Err(MathError::Arithmetic(ArithmeticError::DivisionByZero))
        );
    }

    #[test]
    fn test_zero_liquidity_with_nothing_to_do_is_allowed() {
        let target = n("79623317895830914510639640423");
        let step = compute_swap_step(Q96, target, 0, I256::ZERO, 30).unwrap();
        assert_eq!(step.amount_in, U256::ZERO);
        assert_eq!(step.amount_out, U256::ZERO);
    }

    #[rstest]
    #[case(10000)]
    #[case(10001)]
    #[case(u32::MAX)]
    fn test_invalid_fee(#[case] fee_pips: u32) {
        assert_eq!(
            compute_swap_step(Q96, Q96, E18 as u128, amount(1), fee_pips),
            Err(MathError::Range(RangeError::InvalidFee(fee_pips)))
        );
    }
}
