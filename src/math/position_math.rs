// Liquidity <-> token-amount math for a single concentrated-liquidity position.
// -----------------------------------------------------------------------------
// Notes:
// - Three regions relative to [tick_lower, tick_upper): below (all token0), in range (both),
//   at/above (all token1). Pa, Pb, Pc are 1.0001^tick for lower, upper and current.
// - Amounts are raw token units. Inputs arrive as decimal strings from the contract-read
//   layer; outputs are fixed-decimal strings the contract-write layer converts to integers.
// - f64 is used for the curve; anything that comes out negative from rounding is clamped to
//   zero, and amounts handed back for a deposit are always rounded down.
// - The multiplier and distribution helpers are display approximations (linear in ticks),
//   not the exact sqrt-curve values. Do not size transactions from them.

use std::str::FromStr;

use num_bigint::BigUint;
use num_traits::{FromPrimitive, ToPrimitive, Zero};
use rust_decimal::Decimal;

use crate::error::{MathError, Result};
use crate::math::format::to_fixed_decimal;
use crate::math::tick_math::{tick_to_price, MAX_TICK};
use crate::models::{
    LiquidityAmounts, PositionAnalysis, PositionRange, TokenAmounts, TokenDistribution,
};

/// Fraction digits kept on computed raw amounts.
pub const AMOUNT_DECIMALS: u32 = 8;

pub const MIN_LIQUIDITY_MULTIPLIER: f64 = 1.0;
pub const MAX_LIQUIDITY_MULTIPLIER: f64 = 1000.0;
const FULL_RANGE_WIDTH: f64 = 2.0 * MAX_TICK as f64;

// --------------------------------- Helpers ---------------------------------

#[inline]
fn sqrt_price(tick: i32) -> f64 {
    tick_to_price(tick).sqrt()
}

fn parse_liquidity(liquidity: &str) -> Result<BigUint> {
    BigUint::from_str(liquidity.trim())
        .map_err(|_| MathError::InvalidInput(format!("liquidity must be a raw integer, got {:?}", liquidity)))
}

/// Desired amounts may carry a fraction. Negative values clamp to zero.
fn parse_amount(amount: &str) -> Result<f64> {
    let value: f64 = amount
        .trim()
        .parse()
        .map_err(|_| MathError::InvalidInput(format!("amount must be numeric, got {:?}", amount)))?;
    if !value.is_finite() {
        return Err(MathError::InvalidInput(format!("amount must be finite, got {:?}", amount)));
    }
    Ok(value.max(0.0))
}

/// `L * (1/sqrt_a - 1/sqrt_b)`
#[inline]
fn amount0_for_liquidity(liquidity: f64, sqrt_a: f64, sqrt_b: f64) -> f64 {
    (liquidity * (1.0 / sqrt_a - 1.0 / sqrt_b)).max(0.0)
}

/// `L * (sqrt_b - sqrt_a)`
#[inline]
fn amount1_for_liquidity(liquidity: f64, sqrt_a: f64, sqrt_b: f64) -> f64 {
    (liquidity * (sqrt_b - sqrt_a)).max(0.0)
}

// None when the interval is empty: that side cannot bound liquidity.
fn liquidity_for_amount0(sqrt_a: f64, sqrt_b: f64, amount0: f64) -> Option<f64> {
    let denom = 1.0 / sqrt_a - 1.0 / sqrt_b;
    (denom > 0.0 && denom.is_finite()).then(|| amount0 / denom)
}

fn liquidity_for_amount1(sqrt_a: f64, sqrt_b: f64, amount1: f64) -> Option<f64> {
    let denom = sqrt_b - sqrt_a;
    (denom > 0.0 && denom.is_finite()).then(|| amount1 / denom)
}

fn liquidity_to_string(liquidity: f64) -> String {
    if !liquidity.is_finite() || liquidity <= 0.0 {
        return "0".to_string();
    }
    BigUint::from_f64(liquidity.floor())
        .map(|l| l.to_string())
        .unwrap_or_else(|| "0".to_string())
}

/// `(amount, liquidity)` for a one-sided deposit. No amount is spent when nothing is minted.
fn one_sided_deposit(amount: f64, liquidity: Option<f64>) -> (String, String) {
    let liquidity = liquidity_to_string(liquidity.unwrap_or(0.0));
    if liquidity == "0" {
        return ("0".to_string(), liquidity);
    }
    (to_fixed_decimal(amount, AMOUNT_DECIMALS), liquidity)
}

// ------------------------------- Range checks --------------------------------

/// `tick_lower <= current_tick < tick_upper`
pub fn is_in_range(current_tick: i32, tick_lower: i32, tick_upper: i32) -> bool {
    current_tick >= tick_lower && current_tick < tick_upper
}

// ------------------------------ Amount math ----------------------------------

/// Token amounts held by `liquidity` (raw integer string) over `[tick_lower, tick_upper)`
/// when the pool sits at `current_tick`.
pub fn get_token_amounts(
    liquidity: &str,
    current_tick: i32,
    tick_lower: i32,
    tick_upper: i32,
) -> Result<TokenAmounts> {
    let liquidity = parse_liquidity(liquidity)?;
    if liquidity.is_zero() {
        return Ok(TokenAmounts::zero());
    }
    let l = liquidity.to_f64().unwrap_or(0.0);

    let sqrt_a = sqrt_price(tick_lower);
    let sqrt_b = sqrt_price(tick_upper);

    let (amount0, amount1) = if current_tick < tick_lower {
        (amount0_for_liquidity(l, sqrt_a, sqrt_b), 0.0)
    } else if current_tick >= tick_upper {
        (0.0, amount1_for_liquidity(l, sqrt_a, sqrt_b))
    } else {
        let sqrt_c = sqrt_price(current_tick);
        (
            amount0_for_liquidity(l, sqrt_c, sqrt_b),
            amount1_for_liquidity(l, sqrt_a, sqrt_c),
        )
    };
    log::debug!(
        "amounts for L={} at tick {} in [{}, {}): {} / {}",
        liquidity, current_tick, tick_lower, tick_upper, amount0, amount1
    );

    Ok(TokenAmounts {
        amount0: to_fixed_decimal(amount0, AMOUNT_DECIMALS),
        amount1: to_fixed_decimal(amount1, AMOUNT_DECIMALS),
    })
}

/// Liquidity a deposit of up to the desired amounts can mint, and the amounts it consumes.
///
/// Out of range only one token counts and its desired amount is passed through, unless the
/// floored liquidity is zero (empty range, dust) in which case nothing is spent. In range the
/// smaller of the two per-side liquidities binds, and both amounts are recomputed from the
/// floored liquidity and rounded down, never above what was desired.
pub fn calculate_liquidity_amounts(
    amount0_desired: &str,
    amount1_desired: &str,
    current_tick: i32,
    tick_lower: i32,
    tick_upper: i32,
) -> Result<LiquidityAmounts> {
    let amount0 = parse_amount(amount0_desired)?;
    let amount1 = parse_amount(amount1_desired)?;

    let sqrt_a = sqrt_price(tick_lower);
    let sqrt_b = sqrt_price(tick_upper);

    if current_tick < tick_lower {
        let (amount0, liquidity) = one_sided_deposit(amount0, liquidity_for_amount0(sqrt_a, sqrt_b, amount0));
        return Ok(LiquidityAmounts { amount0, amount1: "0".to_string(), liquidity });
    }
    if current_tick >= tick_upper {
        let (amount1, liquidity) = one_sided_deposit(amount1, liquidity_for_amount1(sqrt_a, sqrt_b, amount1));
        return Ok(LiquidityAmounts { amount0: "0".to_string(), amount1, liquidity });
    }

    let sqrt_c = sqrt_price(current_tick);
    let liquidity0 = liquidity_for_amount0(sqrt_c, sqrt_b, amount0).unwrap_or(f64::INFINITY);
    let liquidity1 = liquidity_for_amount1(sqrt_a, sqrt_c, amount1).unwrap_or(f64::INFINITY);
    let mut liquidity = liquidity0.min(liquidity1);
    if !liquidity.is_finite() {
        liquidity = 0.0;
    }
    let liquidity = liquidity.floor();

    let used0 = amount0_for_liquidity(liquidity, sqrt_c, sqrt_b).min(amount0);
    let used1 = amount1_for_liquidity(liquidity, sqrt_a, sqrt_c).min(amount1);
    log::debug!(
        "deposit at tick {} in [{}, {}): L0={} L1={} -> L={} ({} / {})",
        current_tick, tick_lower, tick_upper, liquidity0, liquidity1, liquidity, used0, used1
    );

    Ok(LiquidityAmounts {
        amount0: to_fixed_decimal(used0, AMOUNT_DECIMALS),
        amount1: to_fixed_decimal(used1, AMOUNT_DECIMALS),
        liquidity: liquidity_to_string(liquidity),
    })
}

/// Amount of the other token that pairs with `input_amount` for an in-range deposit.
/// Out of range one side is inactive, so the paired amount is `"0"`.
pub fn calculate_optimal_amount(
    input_amount: &str,
    is_token0: bool,
    current_tick: i32,
    tick_lower: i32,
    tick_upper: i32,
) -> Result<String> {
    let amount = parse_amount(input_amount)?;
    if !is_in_range(current_tick, tick_lower, tick_upper) {
        return Ok("0".to_string());
    }

    let sqrt_a = sqrt_price(tick_lower);
    let sqrt_b = sqrt_price(tick_upper);
    let sqrt_c = sqrt_price(current_tick);

    let other = if is_token0 {
        liquidity_for_amount0(sqrt_c, sqrt_b, amount)
            .map(|l| amount1_for_liquidity(l, sqrt_a, sqrt_c))
    } else {
        // at tick_lower the position holds no token1, so token1 cannot size it
        liquidity_for_amount1(sqrt_a, sqrt_c, amount)
            .map(|l| amount0_for_liquidity(l, sqrt_c, sqrt_b))
    };
    Ok(to_fixed_decimal(other.unwrap_or(0.0), AMOUNT_DECIMALS))
}

// ------------------------------ Display helpers -------------------------------

/// Approximate capital efficiency versus a full-range position: `2 * 887272 / width`,
/// clamped to `[1, 1000]`. Linear in tick width, so it is only a display figure.
/// An empty or inverted range gets the maximum.
pub fn calculate_liquidity_multiplier(tick_lower: i32, tick_upper: i32) -> f64 {
    let width = tick_upper as i64 - tick_lower as i64;
    if width <= 0 {
        return MAX_LIQUIDITY_MULTIPLIER;
    }
    (FULL_RANGE_WIDTH / width as f64).clamp(MIN_LIQUIDITY_MULTIPLIER, MAX_LIQUIDITY_MULTIPLIER)
}

/// Rough value split between the tokens. Inside the range this interpolates linearly by tick
/// position, which is NOT the true sqrt-curve split; kept that way so displayed numbers stay
/// stable. Percentages carry two decimals and always sum to exactly 100.
pub fn get_token_distribution(current_tick: i32, tick_lower: i32, tick_upper: i32) -> TokenDistribution {
    if current_tick < tick_lower {
        return TokenDistribution { token0_percent: Decimal::ONE_HUNDRED, token1_percent: Decimal::ZERO };
    }
    if current_tick >= tick_upper {
        return TokenDistribution { token0_percent: Decimal::ZERO, token1_percent: Decimal::ONE_HUNDRED };
    }

    let through = (current_tick as i64 - tick_lower as i64) as f64 / (tick_upper as i64 - tick_lower as i64) as f64;
    let token1_percent = Decimal::from_f64(through * 100.0)
        .unwrap_or(Decimal::ZERO)
        .round_dp(2)
        .clamp(Decimal::ZERO, Decimal::ONE_HUNDRED);

    TokenDistribution {
        token0_percent: Decimal::ONE_HUNDRED - token1_percent,
        token1_percent,
    }
}

/// Everything the position view shows for one position in a single pass.
pub fn analyze_position(liquidity: &str, current_tick: i32, range: PositionRange) -> Result<PositionAnalysis> {
    let PositionRange { tick_lower, tick_upper } = range;
    let amounts = get_token_amounts(liquidity, current_tick, tick_lower, tick_upper)?;

    Ok(PositionAnalysis {
        range,
        current_tick,
        in_range: range.contains(current_tick),
        amounts,
        distribution: get_token_distribution(current_tick, tick_lower, tick_upper),
        liquidity_multiplier: calculate_liquidity_multiplier(tick_lower, tick_upper),
        price_lower: tick_to_price(tick_lower),
        price_upper: tick_to_price(tick_upper),
        current_price: tick_to_price(current_tick),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amount(s: &str) -> f64 {
        s.parse().unwrap()
    }

    #[test]
    fn zero_liquidity_short_circuits() {
        assert_eq!(get_token_amounts("0", 10, 0, 100).unwrap(), TokenAmounts::zero());
    }

    #[test]
    fn liquidity_must_be_raw_integer() {
        assert!(matches!(get_token_amounts("1.5", 0, -10, 10), Err(MathError::InvalidInput(_))));
        assert!(matches!(get_token_amounts("-1", 0, -10, 10), Err(MathError::InvalidInput(_))));
        assert!(matches!(get_token_amounts("abc", 0, -10, 10), Err(MathError::InvalidInput(_))));
    }

    #[test]
    fn amounts_in_each_region() {
        let below = get_token_amounts("1000000", -100, 0, 100).unwrap();
        assert!(amount(&below.amount0) > 0.0);
        assert_eq!(below.amount1, "0");

        let above = get_token_amounts("1000000", 100, 0, 100).unwrap();
        assert_eq!(above.amount0, "0");
        assert!(amount(&above.amount1) > 0.0);

        let inside = get_token_amounts("1000000", 50, 0, 100).unwrap();
        assert!(amount(&inside.amount0) > 0.0);
        assert!(amount(&inside.amount1) > 0.0);
    }

    #[test]
    fn amounts_are_cut_below_the_curve_value() {
        let (sqrt_a, sqrt_c, sqrt_b) = (sqrt_price(-600), sqrt_price(120), sqrt_price(600));
        for l in 1_000_000u64..1_002_000 {
            let amounts = get_token_amounts(&l.to_string(), 120, -600, 600).unwrap();
            let exact0 = Decimal::from_f64_retain(amount0_for_liquidity(l as f64, sqrt_c, sqrt_b)).unwrap();
            let exact1 = Decimal::from_f64_retain(amount1_for_liquidity(l as f64, sqrt_a, sqrt_c)).unwrap();
            assert!(amounts.amount0.parse::<Decimal>().unwrap() <= exact0, "L={} amount0 {}", l, amounts.amount0);
            assert!(amounts.amount1.parse::<Decimal>().unwrap() <= exact1, "L={} amount1 {}", l, amounts.amount1);
        }
        let amounts = get_token_amounts("1001342", 120, -600, 600).unwrap();
        assert_eq!(amounts.amount1, "35618.48108793");
    }

    #[test]
    fn symmetric_range_at_zero_holds_equal_amounts() {
        // sqrt prices around tick 0 are reciprocal, so both sides match
        let amounts = get_token_amounts("1000000000000", 0, -1000, 1000).unwrap();
        let (a0, a1) = (amount(&amounts.amount0), amount(&amounts.amount1));
        assert!((a0 - a1).abs() / a0 < 1e-9, "{} vs {}", a0, a1);
    }

    #[test]
    fn below_range_deposit_passes_amount0_through() {
        let result = calculate_liquidity_amounts("100", "50", 1000, 2000, 3000).unwrap();
        assert_eq!(result.amount0, "100");
        assert_eq!(result.amount1, "0");
        assert_ne!(result.liquidity, "0");
    }

    #[test]
    fn above_range_deposit_passes_amount1_through() {
        let result = calculate_liquidity_amounts("100", "50", 3000, 2000, 3000).unwrap();
        assert_eq!(result.amount0, "0");
        assert_eq!(result.amount1, "50");
        assert_ne!(result.liquidity, "0");
    }

    #[test]
    fn empty_range_deposit_spends_nothing() {
        let zero = LiquidityAmounts {
            amount0: "0".to_string(),
            amount1: "0".to_string(),
            liquidity: "0".to_string(),
        };
        // at/above an empty range
        assert_eq!(calculate_liquidity_amounts("5", "5", 10, 10, 10).unwrap(), zero);
        // below an empty range
        assert_eq!(calculate_liquidity_amounts("5", "5", 0, 10, 10).unwrap(), zero);
        // inverted range
        assert_eq!(calculate_liquidity_amounts("5", "5", 50, 20, 10).unwrap(), zero);
    }

    #[test]
    fn in_range_deposit_trims_the_oversupplied_side() {
        let result = calculate_liquidity_amounts("1000000", "1", 0, -1000, 1000).unwrap();
        // token1 binds, token0 is cut far below what was offered
        assert!(amount(&result.amount1) <= 1.0);
        assert!(amount(&result.amount0) < 1000000.0);
        assert!(amount(&result.amount0) <= 2.0);
    }

    #[test]
    fn in_range_deposit_never_exceeds_desired() {
        let result = calculate_liquidity_amounts("123456789", "987654321", 120, -600, 600).unwrap();
        assert!(amount(&result.amount0) <= 123456789.0);
        assert!(amount(&result.amount1) <= 987654321.0);
        assert!(amount(&result.liquidity) > 0.0);
    }

    #[test]
    fn in_range_deposit_with_one_side_missing_mints_nothing() {
        let result = calculate_liquidity_amounts("1000", "0", 10, -100, 100).unwrap();
        assert_eq!(result, LiquidityAmounts {
            amount0: "0".to_string(),
            amount1: "0".to_string(),
            liquidity: "0".to_string(),
        });
    }

    #[test]
    fn deposit_at_lower_tick_needs_only_token0() {
        let result = calculate_liquidity_amounts("1000", "0", -100, -100, 100).unwrap();
        assert_eq!(result.amount1, "0");
        assert!(amount(&result.amount0) > 0.0);
    }

    #[test]
    fn deposit_rejects_non_numeric_amounts() {
        assert!(calculate_liquidity_amounts("ten", "5", 0, -10, 10).is_err());
        assert!(calculate_liquidity_amounts("1", "inf", 0, -10, 10).is_err());
    }

    #[test]
    fn optimal_amount_pairs_both_ways() {
        let other1 = calculate_optimal_amount("1000000", true, 0, -1000, 1000).unwrap();
        let back0 = calculate_optimal_amount(&other1, false, 0, -1000, 1000).unwrap();
        assert!((amount(&back0) - 1000000.0).abs() < 1.0, "{}", back0);
    }

    #[test]
    fn optimal_amount_out_of_range_is_zero() {
        assert_eq!(calculate_optimal_amount("500", true, -2000, -1000, 1000).unwrap(), "0");
        assert_eq!(calculate_optimal_amount("500", false, 1000, -1000, 1000).unwrap(), "0");
        assert_eq!(calculate_optimal_amount("500", false, -1000, -1000, 1000).unwrap(), "0");
    }

    #[test]
    fn multiplier_bounds() {
        assert_eq!(calculate_liquidity_multiplier(-887_272, 887_272), 1.0);
        assert_eq!(calculate_liquidity_multiplier(0, 0), MAX_LIQUIDITY_MULTIPLIER);
        assert_eq!(calculate_liquidity_multiplier(10, -10), MAX_LIQUIDITY_MULTIPLIER);
        assert_eq!(calculate_liquidity_multiplier(0, 10), MAX_LIQUIDITY_MULTIPLIER);
        assert_eq!(calculate_liquidity_multiplier(i32::MIN, i32::MAX), 1.0);
        let m = calculate_liquidity_multiplier(-8_872, 8_872);
        assert!((m - 887_272.0 / 8_872.0).abs() < 1e-9, "{}", m);
    }

    #[test]
    fn distribution_regions() {
        let below = get_token_distribution(-5, 0, 100);
        assert_eq!((below.token0_percent, below.token1_percent), (Decimal::ONE_HUNDRED, Decimal::ZERO));
        let above = get_token_distribution(100, 0, 100);
        assert_eq!((above.token0_percent, above.token1_percent), (Decimal::ZERO, Decimal::ONE_HUNDRED));
        let quarter = get_token_distribution(25, 0, 100);
        assert_eq!(quarter.token1_percent, Decimal::from(25));
        assert_eq!(quarter.token0_percent, Decimal::from(75));
    }

    #[test]
    fn distribution_sums_to_hundred_for_awkward_widths() {
        for tick in 0..7 {
            let d = get_token_distribution(tick, 0, 7);
            assert_eq!(d.token0_percent + d.token1_percent, Decimal::ONE_HUNDRED);
        }
    }

    #[test]
    fn analysis_combines_views() {
        let range = PositionRange::new(-600, 600, 60).unwrap();
        let analysis = analyze_position("5000000", 0, range).unwrap();
        assert!(analysis.in_range);
        assert!(analysis.price_lower < analysis.current_price && analysis.current_price < analysis.price_upper);
        assert_eq!(analysis.distribution.token1_percent, Decimal::from(50));
        assert!(analysis.liquidity_multiplier > 1.0);
    }

    #[test]
    fn strict_range_validation() {
        assert!(PositionRange::new(0, 0, 10).is_err());
        assert!(PositionRange::new(5, 100, 10).is_err());
        assert!(PositionRange::new(-887_280, 0, 10).is_err());
        assert_eq!(PositionRange::new(-100, 100, 10).unwrap().width(), 200);
    }
}
