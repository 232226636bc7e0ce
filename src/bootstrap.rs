use crate::config::Config;
use crate::math::tick_math::{get_tick_spacing, FeeTier};

pub struct AppState {
    pub price_display_decimals: u32,
    pub default_fee_tier: u32,
    pub default_tick_spacing: i32,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        if FeeTier::from_fee(config.default_fee_tier).is_none() {
            log::warn!(
                "DEFAULT_FEE_TIER {} is not a known fee tier, tick spacing falls back to {}",
                config.default_fee_tier,
                get_tick_spacing(config.default_fee_tier)
            );
        }

        AppState {
            price_display_decimals: config.price_display_decimals,
            default_fee_tier: config.default_fee_tier,
            default_tick_spacing: get_tick_spacing(config.default_fee_tier),
        }
    }

    /// Spacing for an optional per-request fee tier.
    pub fn tick_spacing_for(&self, fee_tier: Option<u32>) -> i32 {
        fee_tier.map(get_tick_spacing).unwrap_or(self.default_tick_spacing)
    }
}
