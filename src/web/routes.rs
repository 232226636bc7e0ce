use rocket::response::status::BadRequest;
use rocket::serde::json::Json;
use rocket::{get, State};
use std::sync::Arc;

use crate::bootstrap::AppState;
use crate::error::MathError;
use crate::math::format::format_price;
use crate::math::position_math::{
    analyze_position, calculate_liquidity_amounts, calculate_liquidity_multiplier, calculate_optimal_amount,
};
use crate::math::tick_math::{
    get_full_range_ticks, get_nearest_valid_tick, get_price_range_from_percentage, get_sqrt_ratio_at_tick,
    price_to_tick, tick_to_price,
};
use crate::models::PositionRange;
use crate::web::dto::{
    DepositQuery, DepositResponse, ErrorResponse, FullRangeQuery, HealthResponse, OptimalAmountQuery,
    OptimalAmountResponse, PercentageRangeQuery, PositionQuery, PositionResponse, PriceQuery, RangeResponse,
    TickFromPriceResponse, TickQuery, TickToPriceResponse,
};

type ApiResult<T> = Result<Json<T>, BadRequest<Json<ErrorResponse>>>;

fn bad_request(route: &str, e: MathError) -> BadRequest<Json<ErrorResponse>> {
    log::warn!("{} rejected: {}", route, e);
    BadRequest(Json(ErrorResponse { error: e.to_string() }))
}

fn range_response(app_state: &AppState, tick_spacing: i32, min_tick: i32, max_tick: i32) -> RangeResponse {
    let (min_price, max_price) = (tick_to_price(min_tick), tick_to_price(max_tick));
    RangeResponse {
        tick_spacing,
        min_tick,
        max_tick,
        min_price,
        max_price,
        formatted_min_price: format_price(min_price, app_state.price_display_decimals),
        formatted_max_price: format_price(max_price, app_state.price_display_decimals),
        liquidity_multiplier: calculate_liquidity_multiplier(min_tick, max_tick),
    }
}

#[get("/api/v1/ticks/from-price?<query..>")]
pub fn tick_from_price(query: PriceQuery, app_state: &State<Arc<AppState>>) -> ApiResult<TickFromPriceResponse> {
    let tick = price_to_tick(query.price).map_err(|e| bad_request("ticks/from-price", e))?;
    let tick_spacing = app_state.tick_spacing_for(query.fee_tier);
    let nearest_valid_tick = get_nearest_valid_tick(tick, tick_spacing);

    Ok(Json(TickFromPriceResponse {
        price: query.price,
        tick,
        tick_spacing,
        nearest_valid_tick,
        realized_price: tick_to_price(nearest_valid_tick),
        formatted_price: format_price(query.price, app_state.price_display_decimals),
    }))
}

#[get("/api/v1/ticks/to-price?<query..>")]
pub fn tick_to_price_route(query: TickQuery, app_state: &State<Arc<AppState>>) -> ApiResult<TickToPriceResponse> {
    // the sqrt-ratio conversion carries the range check tick_to_price leaves to callers
    let sqrt_price_x96 = get_sqrt_ratio_at_tick(query.tick).map_err(|e| bad_request("ticks/to-price", e))?;
    let price = tick_to_price(query.tick);

    Ok(Json(TickToPriceResponse {
        tick: query.tick,
        price,
        formatted_price: format_price(price, app_state.price_display_decimals),
        sqrt_price_x96: sqrt_price_x96.to_string(),
    }))
}

#[get("/api/v1/ranges/full?<query..>")]
pub fn full_range(query: FullRangeQuery, app_state: &State<Arc<AppState>>) -> Json<RangeResponse> {
    let tick_spacing = app_state.tick_spacing_for(query.fee_tier);
    let (min_tick, max_tick) = get_full_range_ticks(tick_spacing);
    Json(range_response(app_state, tick_spacing, min_tick, max_tick))
}

#[get("/api/v1/ranges/percentage?<query..>")]
pub fn percentage_range(query: PercentageRangeQuery, app_state: &State<Arc<AppState>>) -> ApiResult<RangeResponse> {
    let tick_spacing = app_state.tick_spacing_for(query.fee_tier);
    let range = get_price_range_from_percentage(query.price, query.percent, tick_spacing)
        .map_err(|e| bad_request("ranges/percentage", e))?;
    Ok(Json(range_response(app_state, tick_spacing, range.min_tick, range.max_tick)))
}

#[get("/api/v1/positions/amounts?<query..>")]
pub fn position_amounts(query: PositionQuery) -> ApiResult<PositionResponse> {
    let range = PositionRange { tick_lower: query.tick_lower, tick_upper: query.tick_upper };
    let analysis = analyze_position(&query.liquidity, query.current_tick, range)
        .map_err(|e| bad_request("positions/amounts", e))?;

    Ok(Json(PositionResponse {
        amount0: analysis.amounts.amount0,
        amount1: analysis.amounts.amount1,
        in_range: analysis.in_range,
        token0_percent: analysis.distribution.token0_percent,
        token1_percent: analysis.distribution.token1_percent,
        liquidity_multiplier: analysis.liquidity_multiplier,
        price_lower: analysis.price_lower,
        price_upper: analysis.price_upper,
        current_price: analysis.current_price,
    }))
}

#[get("/api/v1/positions/deposit?<query..>")]
pub fn position_deposit(query: DepositQuery) -> ApiResult<DepositResponse> {
    let amounts = calculate_liquidity_amounts(
        &query.amount0,
        &query.amount1,
        query.current_tick,
        query.tick_lower,
        query.tick_upper,
    )
    .map_err(|e| bad_request("positions/deposit", e))?;

    Ok(Json(DepositResponse {
        amount0: amounts.amount0,
        amount1: amounts.amount1,
        liquidity: amounts.liquidity,
    }))
}

#[get("/api/v1/positions/optimal?<query..>")]
pub fn position_optimal(query: OptimalAmountQuery) -> ApiResult<OptimalAmountResponse> {
    let other_amount = calculate_optimal_amount(
        &query.amount,
        query.is_token0,
        query.current_tick,
        query.tick_lower,
        query.tick_upper,
    )
    .map_err(|e| bad_request("positions/optimal", e))?;

    Ok(Json(OptimalAmountResponse {
        input_amount: query.amount,
        is_token0: query.is_token0,
        other_amount,
    }))
}

#[get("/health")]
pub fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK",
        timestamp_utc: chrono::Utc::now().to_rfc3339(),
    })
}
