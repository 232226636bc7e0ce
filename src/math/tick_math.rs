// Tick <-> price <-> sqrtPriceX96 conversions for concentrated-liquidity pools
// ---------------------------------------------------------------------------
// Notes:
// - Prices are raw ratios (token1 smallest units per token0 smallest unit) unless a
//   function takes decimals explicitly.
// - tick <-> price goes through f64 ln/pow. The floor in price_to_tick means a round trip
//   can land one tick below the original; callers compare with a one-tick tolerance.
// - sqrtPriceX96 values are BigUint end-to-end. get_sqrt_ratio_at_tick is the exact
//   on-chain Q128.128 bit-decomposition, so it matches what the pool contract reports.

use num_bigint::BigUint;
use num_traits::{FromPrimitive, One, ToPrimitive};

use crate::error::{MathError, Result};

pub const MIN_TICK: i32 = -887_272;
pub const MAX_TICK: i32 = 887_272;

/// sqrt ratio at MIN_TICK.
pub const MIN_SQRT_RATIO: u64 = 4_295_128_739;

pub const DEFAULT_TICK_SPACING: i32 = 10;

const TICK_BASE: f64 = 1.0001;
const Q96_F64: f64 = 79_228_162_514_264_337_593_543_950_336.0; // 2^96

// sqrt(1.0001^-(2^i)) in Q128.128 for i = 1..=19; bit 0 seeds the ratio.
const RATIO_ODD_TICK: u128 = 0xfffcb933bd6fad37aa2d162d1a594001;
const RATIO_FACTORS: [u128; 19] = [
    0xfff97272373d413259a46990580e213a,
    0xfff2e50f5f656932ef12357cf3c7fdcc,
    0xffe5caca7e10e4e61c3624eaa0941cd0,
    0xffcb9843d60f6159c9db58835c926644,
    0xff973b41fa98c081472e6896dfb254c0,
    0xff2ea16466c96a3843ec78b326b52861,
    0xfe5dee046a99a2a811c461f1969c3053,
    0xfcbe86c7900a88aedcffc83b479aa3a4,
    0xf987a7253ac413176f2b074cf7815e54,
    0xf3392b0822b70005940c7a398e4b70f3,
    0xe7159475a2c29b7443b29c7fa6e889d9,
    0xd097f3bdfd2022b8845ad8f792aa5825,
    0xa9f746462d870fdf8a65dc1f90e061e5,
    0x70d869a156d2a1b890bb3df62baf32f7,
    0x31be135f97d08fd981231505542fcfa6,
    0x09aa508b5b7a84e1c677de54f3e99bc9,
    0x005d6af8dedb81196699c329225ee604,
    0x00002216e584f5fa1ea926041bedfe98,
    0x00000000048a170391f7dc42444e8fa2,
];

// -------------------------------- Fee tiers --------------------------------

/// Fee tiers in hundredths of a basis point, as the factory contract stores them.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FeeTier {
    Lowest,
    Low,
    Medium,
    High,
}

impl FeeTier {
    pub fn from_fee(fee: u32) -> Option<Self> {
        match fee {
            100 => Some(FeeTier::Lowest),
            500 => Some(FeeTier::Low),
            2500 => Some(FeeTier::Medium),
            10000 => Some(FeeTier::High),
            _ => None,
        }
    }

    pub fn fee(self) -> u32 {
        match self {
            FeeTier::Lowest => 100,
            FeeTier::Low => 500,
            FeeTier::Medium => 2500,
            FeeTier::High => 10000,
        }
    }

    pub fn tick_spacing(self) -> i32 {
        match self {
            FeeTier::Lowest => 1,
            FeeTier::Low => 10,
            FeeTier::Medium => 50,
            FeeTier::High => 200,
        }
    }
}

/// Tick spacing for a fee tier. Unknown tiers fall back to [`DEFAULT_TICK_SPACING`]
/// rather than failing; validate with [`FeeTier::from_fee`] if that matters.
pub fn get_tick_spacing(fee: u32) -> i32 {
    match FeeTier::from_fee(fee) {
        Some(tier) => tier.tick_spacing(),
        None => {
            log::debug!("unknown fee tier {}, using tick spacing {}", fee, DEFAULT_TICK_SPACING);
            DEFAULT_TICK_SPACING
        }
    }
}

// ------------------------------ Tick <-> price ------------------------------

/// `floor(ln(price) / ln(1.0001))`, clamped to `[MIN_TICK, MAX_TICK]`.
pub fn price_to_tick(price: f64) -> Result<i32> {
    if !(price > 0.0) {
        return Err(MathError::InvalidInput(format!("price must be positive, got {}", price)));
    }
    let tick = (price.ln() / TICK_BASE.ln()).floor();
    Ok(tick.clamp(MIN_TICK as f64, MAX_TICK as f64) as i32)
}

/// `1.0001^tick`.
///
/// No range check: ticks outside `[MIN_TICK, MAX_TICK]` still produce a number (or
/// overflow to infinity / underflow to zero far outside it). Callers keep ticks valid.
pub fn tick_to_price(tick: i32) -> f64 {
    TICK_BASE.powf(tick as f64)
}

/// Tick for a human price (token1 per one whole token0).
pub fn human_price_to_tick(price: f64, decimals0: u8, decimals1: u8) -> Result<i32> {
    let raw = price * 10f64.powi(decimals1 as i32 - decimals0 as i32);
    price_to_tick(raw)
}

/// Human price (token1 per one whole token0) at `tick`.
pub fn tick_to_human_price(tick: i32, decimals0: u8, decimals1: u8) -> f64 {
    tick_to_price(tick) * 10f64.powi(decimals0 as i32 - decimals1 as i32)
}

// ------------------------------ Tick spacing --------------------------------

/// Rounds half away from zero to the nearest multiple of `tick_spacing`, then clamps to the
/// outermost aligned ticks inside `[MIN_TICK, MAX_TICK]`. The result is always a multiple
/// of the spacing. A non-positive spacing is treated as 1.
pub fn get_nearest_valid_tick(tick: i32, tick_spacing: i32) -> i32 {
    let spacing = tick_spacing.max(1);
    let (lo, hi) = aligned_bounds(spacing);
    let rounded = (tick as f64 / spacing as f64).round() as i64 * spacing as i64;
    rounded.clamp(lo as i64, hi as i64) as i32
}

/// Widest tick-aligned range for `tick_spacing`.
pub fn get_full_range_ticks(tick_spacing: i32) -> (i32, i32) {
    (
        get_nearest_valid_tick(MIN_TICK, tick_spacing),
        get_nearest_valid_tick(MAX_TICK, tick_spacing),
    )
}

fn aligned_bounds(spacing: i32) -> (i32, i32) {
    let hi = (MAX_TICK / spacing) * spacing;
    (-hi, hi)
}

/// Symmetric multiplicative band around `current_price`: `[p / (1 + pct/100), p * (1 + pct/100)]`.
///
/// The returned prices are the ones realized at the aligned ticks, which generally differ
/// a little from the requested band. If alignment collapses the band to a single tick, the
/// upper bound moves out by one spacing (the lower bound when already at the top).
pub fn get_price_range_from_percentage(
    current_price: f64,
    percent: f64,
    tick_spacing: i32,
) -> Result<crate::models::PriceRange> {
    let factor = 1.0 + percent / 100.0;
    if !(factor > 0.0) || !factor.is_finite() {
        return Err(MathError::InvalidInput(format!("percentage {} gives a non-positive band", percent)));
    }
    let spacing = tick_spacing.max(1);

    let lower = get_nearest_valid_tick(price_to_tick(current_price / factor)?, spacing);
    let upper = get_nearest_valid_tick(price_to_tick(current_price * factor)?, spacing);
    let (mut min_tick, mut max_tick) = (lower.min(upper), lower.max(upper));

    if min_tick == max_tick {
        let (_, full_max) = get_full_range_ticks(spacing);
        if max_tick + spacing <= full_max {
            max_tick += spacing;
        } else {
            min_tick -= spacing;
        }
    }

    Ok(crate::models::PriceRange {
        min_tick,
        max_tick,
        min_price: tick_to_price(min_tick),
        max_price: tick_to_price(max_tick),
    })
}

// ------------------------------ sqrtPriceX96 ---------------------------------

fn sqrt_ratio_unchecked(tick: i32) -> BigUint {
    let abs_tick = tick.unsigned_abs();

    // Q128.128
    let mut ratio = if abs_tick & 0x1 != 0 {
        BigUint::from(RATIO_ODD_TICK)
    } else {
        BigUint::one() << 128
    };
    for (i, factor) in RATIO_FACTORS.iter().enumerate() {
        if abs_tick & (0x2 << i) != 0 {
            ratio = (ratio * BigUint::from(*factor)) >> 128;
        }
    }

    if tick > 0 {
        ratio = ((BigUint::one() << 256) - 1u32) / ratio;
    }
    // Q128.128 -> Q64.96, rounding up
    (ratio + ((BigUint::one() << 32) - 1u32)) >> 32
}

/// `sqrt(1.0001^tick) * 2^96`, exactly as the pool contract computes it.
pub fn get_sqrt_ratio_at_tick(tick: i32) -> Result<BigUint> {
    if !(MIN_TICK..=MAX_TICK).contains(&tick) {
        return Err(MathError::OutOfRange { tick });
    }
    Ok(sqrt_ratio_unchecked(tick))
}

/// sqrt ratio at MAX_TICK.
pub fn max_sqrt_ratio() -> BigUint {
    sqrt_ratio_unchecked(MAX_TICK)
}

/// Greatest tick whose sqrt ratio is `<= sqrt_price_x96` (binary search over the exact table).
pub fn sqrt_price_x96_to_tick(sqrt_price_x96: &BigUint) -> Result<i32> {
    if *sqrt_price_x96 < BigUint::from(MIN_SQRT_RATIO) || *sqrt_price_x96 > max_sqrt_ratio() {
        return Err(MathError::SqrtPriceOutOfRange(sqrt_price_x96.to_string()));
    }
    let mut lo = MIN_TICK;
    let mut hi = MAX_TICK;
    while lo < hi {
        let mid = lo + (hi - lo + 1) / 2;
        if sqrt_ratio_unchecked(mid) <= *sqrt_price_x96 {
            lo = mid;
        } else {
            hi = mid - 1;
        }
    }
    Ok(lo)
}

/// Raw price encoded by a sqrtPriceX96 value.
pub fn sqrt_price_x96_to_price(sqrt_price_x96: &BigUint) -> f64 {
    let s = sqrt_price_x96.to_f64().unwrap_or(0.0) / Q96_F64;
    s * s
}

/// `floor(sqrt(price) * 2^96)`, restricted to the representable sqrt-ratio range.
pub fn price_to_sqrt_price_x96(price: f64) -> Result<BigUint> {
    if !(price > 0.0) || !price.is_finite() {
        return Err(MathError::InvalidInput(format!("price must be positive and finite, got {}", price)));
    }
    let scaled = (price.sqrt() * Q96_F64).floor();
    let sqrt_price = BigUint::from_f64(scaled)
        .ok_or_else(|| MathError::InvalidInput(format!("price {} is not representable", price)))?;
    if sqrt_price < BigUint::from(MIN_SQRT_RATIO) || sqrt_price > max_sqrt_ratio() {
        return Err(MathError::SqrtPriceOutOfRange(sqrt_price.to_string()));
    }
    Ok(sqrt_price)
}
