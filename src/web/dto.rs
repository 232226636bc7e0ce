use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Deserialize, rocket::FromForm)]
pub struct PriceQuery {
    pub price: f64,
    pub fee_tier: Option<u32>,
}

#[derive(Deserialize, rocket::FromForm)]
pub struct TickQuery {
    pub tick: i32,
}

#[derive(Deserialize, rocket::FromForm)]
pub struct FullRangeQuery {
    pub fee_tier: Option<u32>,
}

#[derive(Deserialize, rocket::FromForm)]
pub struct PercentageRangeQuery {
    pub price: f64,
    pub percent: f64,
    pub fee_tier: Option<u32>,
}

#[derive(Deserialize, rocket::FromForm)]
pub struct PositionQuery {
    pub liquidity: String,
    pub current_tick: i32,
    pub tick_lower: i32,
    pub tick_upper: i32,
}

#[derive(Deserialize, rocket::FromForm)]
pub struct DepositQuery {
    pub amount0: String,
    pub amount1: String,
    pub current_tick: i32,
    pub tick_lower: i32,
    pub tick_upper: i32,
}

#[derive(Deserialize, rocket::FromForm)]
pub struct OptimalAmountQuery {
    pub amount: String,
    pub is_token0: bool,
    pub current_tick: i32,
    pub tick_lower: i32,
    pub tick_upper: i32,
}

#[derive(Serialize)]
pub struct TickFromPriceResponse {
    pub price: f64,
    pub tick: i32,
    pub tick_spacing: i32,
    pub nearest_valid_tick: i32,
    pub realized_price: f64,     // price at nearest_valid_tick
    pub formatted_price: String,
}

#[derive(Serialize)]
pub struct TickToPriceResponse {
    pub tick: i32,
    pub price: f64,
    pub formatted_price: String,
    pub sqrt_price_x96: String,
}

#[derive(Serialize)]
pub struct RangeResponse {
    pub tick_spacing: i32,
    pub min_tick: i32,
    pub max_tick: i32,
    pub min_price: f64,
    pub max_price: f64,
    pub formatted_min_price: String,
    pub formatted_max_price: String,
    pub liquidity_multiplier: f64,
}

#[derive(Serialize)]
pub struct PositionResponse {
    pub amount0: String,
    pub amount1: String,
    pub in_range: bool,
    #[serde(with = "rust_decimal::serde::float")]
    pub token0_percent: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub token1_percent: Decimal,
    pub liquidity_multiplier: f64,
    pub price_lower: f64,
    pub price_upper: f64,
    pub current_price: f64,
}

#[derive(Serialize)]
pub struct DepositResponse {
    pub amount0: String,
    pub amount1: String,
    pub liquidity: String,
}

#[derive(Serialize)]
pub struct OptimalAmountResponse {
    pub input_amount: String,
    pub is_token0: bool,
    pub other_amount: String,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp_utc: String,
}
