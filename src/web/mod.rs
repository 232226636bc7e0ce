pub mod dto;
pub mod routes;

use std::sync::Arc;

use rocket::{routes, Build, Rocket};

use crate::bootstrap::AppState;
use crate::config::Config;
use crate::web::routes::{
    full_range, health, percentage_range, position_amounts, position_deposit, position_optimal, tick_from_price,
    tick_to_price_route,
};

/// Rocket instance with every route mounted and state built from `config`.
pub fn build_rocket(config: &Config) -> Rocket<Build> {
    let app_state = Arc::new(AppState::new(config));

    let figment = rocket::Config::figment()
        .merge(("port", config.port))
        .merge(("address", config.bind_address.clone()));

    rocket::custom(figment).manage(app_state).mount(
        "/",
        routes![
            tick_from_price,
            tick_to_price_route,
            full_range,
            percentage_range,
            position_amounts,
            position_deposit,
            position_optimal,
            health,
        ],
    )
}
