use rocket::launch;

use clmm_position_math::config::Config;
use clmm_position_math::web::build_rocket;

#[launch]
fn rocket() -> _ {
    env_logger::init();

    // Load configuration
    let config = Config::from_env().expect("Failed to load configuration");
    log::info!(
        "starting position math service on {}:{} (default fee tier {})",
        config.bind_address,
        config.port,
        config.default_fee_tier
    );

    build_rocket(&config)
}
