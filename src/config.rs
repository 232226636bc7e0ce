use std::env;
use std::str::FromStr;

use anyhow::{Context, Result};

use crate::math::format::DEFAULT_PRICE_DECIMALS;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub bind_address: String,

    // Display defaults for requests that leave them out
    pub price_display_decimals: u32,
    pub default_fee_tier: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8000,
            bind_address: "0.0.0.0".to_string(),
            price_display_decimals: DEFAULT_PRICE_DECIMALS,
            default_fee_tier: 2500,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Service config file first, then a local .env
        dotenv::from_filename("config/service.env").ok();
        dotenv::dotenv().ok();

        let defaults = Config::default();
        Ok(Config {
            port: var_or("PORT", defaults.port)?,
            bind_address: env::var("BIND_ADDRESS").unwrap_or(defaults.bind_address),
            price_display_decimals: var_or("PRICE_DISPLAY_DECIMALS", defaults.price_display_decimals)?,
            default_fee_tier: var_or("DEFAULT_FEE_TIER", defaults.default_fee_tier)?,
        })
    }
}

fn var_or<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} has an invalid value: {:?}", name, raw)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_vars_fall_back_to_defaults() {
        let value: u32 = var_or("CLMM_TEST_SURELY_UNSET_VAR", 42).unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    fn malformed_vars_are_reported() {
        env::set_var("CLMM_TEST_BAD_PORT", "eighty");
        let err = var_or::<u16>("CLMM_TEST_BAD_PORT", 8000).unwrap_err();
        assert!(err.to_string().contains("CLMM_TEST_BAD_PORT"));
        env::remove_var("CLMM_TEST_BAD_PORT");
    }
}
