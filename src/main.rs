use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};

use selah_server::{app_state::AppState, config::Config, handlers};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env();
    if std::env::var("APP_ENV").as_deref() == Ok("production") {
        config.validate_for_production();
    }

    let state = AppState::new(config.clone()).expect("failed to build application state");
    let bind_addr = (config.web_server_host.clone(), config.web_server_port);

    log::info!("starting HTTP server on {}:{}", bind_addr.0, bind_addr.1);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(Logger::default())
            .wrap(Cors::permissive())
            .service(handlers::generate_study)
            .service(handlers::generate_rooms)
            .service(handlers::health_check)
    })
    .bind(bind_addr)?
    .run()
    .await
}
