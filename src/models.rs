use rust_decimal::Decimal;

use serde::{Deserialize, Serialize};

use crate::error::{MathError, Result};
use crate::math::tick_math::{MAX_TICK, MIN_TICK};

/// A `(tick_lower, tick_upper)` pair. Construction through [`PositionRange::new`] is strict;
/// the math functions themselves take raw ticks and degrade gracefully instead.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionRange {
    pub tick_lower: i32,
    pub tick_upper: i32,
}

impl PositionRange {
    /// Validates ordering, bounds and alignment to `tick_spacing`.
    pub fn new(tick_lower: i32, tick_upper: i32, tick_spacing: i32) -> Result<Self> {
        let spacing = tick_spacing.max(1);
        let in_bounds = |t: i32| (MIN_TICK..=MAX_TICK).contains(&t);
        if tick_lower >= tick_upper
            || !in_bounds(tick_lower)
            || !in_bounds(tick_upper)
            || tick_lower % spacing != 0
            || tick_upper % spacing != 0
        {
            return Err(MathError::InvalidRange { tick_lower, tick_upper });
        }
        Ok(Self { tick_lower, tick_upper })
    }

    /// In range means `tick_lower <= tick < tick_upper`.
    pub fn contains(&self, tick: i32) -> bool {
        tick >= self.tick_lower && tick < self.tick_upper
    }

    pub fn width(&self) -> i32 {
        self.tick_upper - self.tick_lower
    }
}

/// Raw (smallest-unit) token amounts as fixed-decimal strings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenAmounts {
    pub amount0: String,
    pub amount1: String,
}

impl TokenAmounts {
    pub fn zero() -> Self {
        Self { amount0: "0".to_string(), amount1: "0".to_string() }
    }
}

/// Amounts actually consumed by a deposit plus the integer liquidity they mint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidityAmounts {
    pub amount0: String,
    pub amount1: String,
    pub liquidity: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min_tick: i32,
    pub max_tick: i32,
    /// Realized price at `min_tick`, not the requested band edge.
    pub min_price: f64,
    /// Realized price at `max_tick`.
    pub max_price: f64,
}

/// Percent split of position value between the two tokens. Always sums to exactly 100.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenDistribution {
    pub token0_percent: Decimal,
    pub token1_percent: Decimal,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PositionAnalysis {
    pub range: PositionRange,
    pub current_tick: i32,
    pub in_range: bool,
    pub amounts: TokenAmounts,
    pub distribution: TokenDistribution,
    pub liquidity_multiplier: f64,
    pub price_lower: f64,
    pub price_upper: f64,
    pub current_price: f64,
}
