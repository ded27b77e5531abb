#![allow(unused_macros, dead_code)]

pub const SECRET: &str = "test-secret-key-for-todo-tests";
pub const PASSWORD: &str = "Passw0rd!";

macro_rules! setup_app {
    () => {
        setup_app!(false)
    };
    ($enforce_ownership:expr) => {{
        let store = todo_api::data::memory::DocumentStore::named("test");
        let tokens = std::sync::Arc::new(todo_api::infrastructure::security::TokenService::new(
            common::SECRET,
        ));
        let state = actix_web::web::Data::new(todo_api::presentation::handlers::AppState::new(
            &store,
            std::sync::Arc::clone(&tokens),
            $enforce_ownership,
        ));

        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(state)
                .wrap(todo_api::presentation::middleware::RequestLoggingMiddleware)
                .configure(|cfg| todo_api::presentation::routes::configure(cfg, tokens)),
        )
        .await
    }};
}

/// Signs a user up, signs them in and evaluates to the issued token.
macro_rules! register_and_login {
    ($app:expr, $username:expr, $email:expr) => {{
        let req = actix_web::test::TestRequest::post()
            .uri("/signup")
            .set_json(serde_json::json!({
                "username": $username,
                "email": $email,
                "password": common::PASSWORD,
            }))
            .to_request();
        let resp = actix_web::test::call_service(&$app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::OK, "signup failed");

        let req = actix_web::test::TestRequest::post()
            .uri("/signin")
            .set_json(serde_json::json!({
                "email": $email,
                "password": common::PASSWORD,
            }))
            .to_request();
        let body: serde_json::Value = actix_web::test::call_and_read_body_json(&$app, req).await;
        body["data"].as_str().expect("token in signin response").to_string()
    }};
}

/// Creates a todo and evaluates to the stored document.
macro_rules! create_todo {
    ($app:expr, $token:expr, $payload:expr) => {{
        let req = actix_web::test::TestRequest::post()
            .uri("/todo")
            .insert_header(("Authorization", $token.as_str()))
            .set_json($payload)
            .to_request();
        let resp = actix_web::test::call_service(&$app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::OK, "create failed");
        let body: serde_json::Value = actix_web::test::read_body_json(resp).await;
        body["data"].clone()
    }};
}
