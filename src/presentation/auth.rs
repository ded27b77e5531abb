use crate::domain::user::{CreateUser, LoginRequest};
use crate::presentation::handlers::{ApiError, AppState};
use crate::presentation::response::ApiResponse;
use actix_web::{HttpResponse, web};
use tracing::{info, instrument};

#[instrument(skip(state, req), fields(email = %req.email))]
pub async fn signup(
    state: web::Data<AppState>,
    req: web::Json<CreateUser>,
) -> Result<HttpResponse, ApiError> {
    info!(username = %req.username, "Signup request received");

    let user = state.auth_service.register_user(req.into_inner()).await?;

    info!(user_id = %user.id, "User signed up");
    Ok(HttpResponse::Ok().json(ApiResponse::ok("Successfully created a user", user)))
}

#[instrument(skip(state, req), fields(email = %req.email))]
pub async fn signin(
    state: web::Data<AppState>,
    req: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    info!("Signin request received");

    let token = state.auth_service.login(req.into_inner()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok("Successfully logged in user", token)))
}
