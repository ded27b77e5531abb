use actix_cors::Cors;
use actix_web::{App, HttpServer, web};
use std::sync::Arc;
use todo_api::data::memory::DocumentStore;
use todo_api::infrastructure::config::Config;
use todo_api::infrastructure::logging::init_logging;
use todo_api::infrastructure::security::TokenService;
use todo_api::presentation::handlers::AppState;
use todo_api::presentation::middleware::RequestLoggingMiddleware;
use todo_api::presentation::routes::{ROUTES, configure};
use tracing::{error, info};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    init_logging();
    info!("Logging initialized");

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            std::process::exit(1);
        }
    };
    info!(?config, "Configuration loaded");

    let store = match DocumentStore::connect(&config.database_url) {
        Ok(store) => store,
        Err(e) => {
            error!(error = %e, "Something went wrong while connecting to the database");
            std::process::exit(1);
        }
    };
    info!(database = %store.database(), "Established a connection to the database");

    let tokens = Arc::new(TokenService::new(&config.jwt_secret));
    let state = web::Data::new(AppState::new(
        &store,
        Arc::clone(&tokens),
        config.enforce_todo_ownership,
    ));

    let server = HttpServer::new(move || {
        tracing::trace!("Creating new application instance");
        let tokens = Arc::clone(&tokens);
        App::new()
            .app_data(state.clone())
            .wrap(Cors::permissive())
            .wrap(RequestLoggingMiddleware)
            .configure(|cfg| configure(cfg, tokens))
    });

    let server = server.bind((config.host.as_str(), config.port))?;
    info!(
        host = %config.host,
        port = config.port,
        routes = %ROUTES,
        "Server listening"
    );
    server.run().await
}
