use crate::infrastructure::security::TokenService;
use crate::presentation::auth::{signin, signup};
use crate::presentation::handlers::{
    ApiError, create_todo, delete_todo, health_check, list_completed_todos, list_todos,
    update_todo,
};
use crate::presentation::middleware::JwtAuthMiddleware;
use actix_web::web;
use std::sync::Arc;

pub const ROUTES: &str = "GET /health, POST /signup, POST /signin, GET /todos, POST /todo, \
     PATCH /todo/{id}, DELETE /todo/{id}, GET /todos/completed";

/// Malformed JSON bodies answer with the regular error envelope.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        ApiError::Validation {
            message: "Invalid request body".to_string(),
            errors: vec![err.to_string()],
        }
        .into()
    })
}

/// Registers every endpoint. Todo resources sit behind the token gate;
/// signup, signin and health are public.
pub fn configure(cfg: &mut web::ServiceConfig, tokens: Arc<TokenService>) {
    let gate = JwtAuthMiddleware::new(tokens);

    cfg.app_data(json_config())
        .route("/health", web::get().to(health_check))
        .route("/signup", web::post().to(signup))
        .route("/signin", web::post().to(signin))
        .service(
            web::resource("/todos")
                .route(web::get().to(list_todos))
                .wrap(gate.clone()),
        )
        .service(
            web::resource("/todos/completed")
                .route(web::get().to(list_completed_todos))
                .wrap(gate.clone()),
        )
        .service(
            web::resource("/todo")
                .route(web::post().to(create_todo))
                .wrap(gate.clone()),
        )
        .service(
            web::resource("/todo/{id}")
                .route(web::patch().to(update_todo))
                .route(web::delete().to(delete_todo))
                .wrap(gate),
        );
}
