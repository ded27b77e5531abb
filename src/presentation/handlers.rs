use crate::application::auth_service::AuthService;
use crate::application::todo_service::TodoService;
use crate::data::memory::DocumentStore;
use crate::data::todo_repository::InMemoryTodoRepository;
use crate::data::user_repository::InMemoryUserRepository;
use crate::domain::error::DomainError;
use crate::domain::repository::{TodoRepository, UserRepository};
use crate::domain::todo::{CreateTodo, UpdateTodo};
use crate::infrastructure::security::TokenService;
use crate::presentation::middleware::AuthenticatedUser;
use crate::presentation::response::ApiResponse;
use actix_web::http::StatusCode;
use actix_web::{FromRequest, HttpMessage, HttpResponse, ResponseError, web};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::pin::Pin;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, instrument, warn};

// AppState holding the services
pub struct AppState {
    pub auth_service: AuthService<dyn UserRepository>,
    pub todo_service: TodoService<dyn TodoRepository>,
}

impl AppState {
    pub fn new(store: &DocumentStore, tokens: Arc<TokenService>, enforce_todo_ownership: bool) -> Self {
        Self::with_repositories(
            Arc::new(InMemoryUserRepository::with_collection(store.users())),
            Arc::new(InMemoryTodoRepository::with_collection(store.todos())),
            tokens,
            enforce_todo_ownership,
        )
    }

    pub fn with_repositories(
        users: Arc<dyn UserRepository>,
        todos: Arc<dyn TodoRepository>,
        tokens: Arc<TokenService>,
        enforce_todo_ownership: bool,
    ) -> Self {
        Self {
            auth_service: AuthService::new(users, tokens),
            todo_service: TodoService::new(todos, enforce_todo_ownership),
        }
    }
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{message}: {errors:?}")]
    Validation { message: String, errors: Vec<String> },
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Access denied, No Token Provided")]
    MissingToken,
    #[error("Access denied, Invalid Token: {0}")]
    InvalidToken(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
    #[error("Database error: {0}")]
    Database(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Message placed in the response envelope.
    fn client_message(&self) -> String {
        match self {
            ApiError::Validation { message, .. } => message.clone(),
            ApiError::BadRequest(msg) | ApiError::NotFound(msg) | ApiError::ServiceUnavailable(msg) => {
                msg.clone()
            }
            ApiError::MissingToken => "Access denied, No Token Provided".to_string(),
            ApiError::InvalidToken(_) => "Access denied, Invalid Token".to_string(),
            ApiError::Database(_) | ApiError::Internal(_) => "Internal server error".to_string(),
        }
    }

    fn client_errors(&self) -> Option<Vec<String>> {
        match self {
            ApiError::Validation { errors, .. } => Some(errors.clone()),
            ApiError::InvalidToken(reason) => Some(vec![reason.clone()]),
            _ => None,
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation { .. } | ApiError::BadRequest(_) | ApiError::MissingToken => {
                StatusCode::BAD_REQUEST
            }
            ApiError::InvalidToken(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Database(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        if status.is_server_error() {
            error!(error = %self, status = %status, "Request failed");
        } else {
            warn!(error = %self, status = %status, "Request rejected");
        }

        HttpResponse::build(status).json(ApiResponse::failure(
            self.client_message(),
            self.client_errors(),
        ))
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast_ref::<DomainError>() {
            Some(DomainError::InvalidCredentials(errors)) => ApiError::Validation {
                message: "Invalid Credentials".to_string(),
                errors: errors.clone(),
            },
            Some(e @ DomainError::EmailTaken) | Some(e @ DomainError::UserNotFound) => {
                ApiError::BadRequest(e.to_string())
            }
            Some(e @ DomainError::NoCompletedTodos) => ApiError::BadRequest(e.to_string()),
            Some(DomainError::InvalidTodo(msg)) => ApiError::Validation {
                message: "Invalid todo".to_string(),
                errors: vec![msg.clone()],
            },
            Some(e @ DomainError::TodoNotFound) => ApiError::NotFound(e.to_string()),
            Some(DomainError::TodoCreationFailed(_)) => ApiError::ServiceUnavailable(
                "Something went wrong while creating a todo".to_string(),
            ),
            Some(DomainError::Internal(msg)) => ApiError::Internal(msg.clone()),
            None => ApiError::Database(err.to_string()),
        }
    }
}

// AuthenticatedUser extractor, populated by JwtAuthMiddleware
impl FromRequest for AuthenticatedUser {
    type Error = ApiError;
    type Future = Pin<Box<dyn std::future::Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(
        req: &actix_web::HttpRequest,
        _payload: &mut actix_web::dev::Payload,
    ) -> Self::Future {
        let user = req.extensions().get::<AuthenticatedUser>().cloned();
        Box::pin(async move {
            user.ok_or_else(|| ApiError::InvalidToken("User not authenticated".to_string()))
        })
    }
}

// Handlers

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    timestamp: String,
}

#[instrument]
pub async fn health_check() -> HttpResponse {
    info!("Health check requested");
    let response = HealthResponse {
        status: "ok".to_string(),
        timestamp: Utc::now().to_rfc3339(),
    };
    HttpResponse::Ok().json(response)
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub id: String,
    pub deleted: bool,
}

#[instrument(skip(state, user), fields(user_id = %user.user_id))]
pub async fn list_todos(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let todos = state.todo_service.list(&user.user_id).await?;

    let message = if todos.is_empty() {
        "No todos found"
    } else {
        "Successfully fetched all the todos"
    };
    info!(count = todos.len(), "Todos listed");
    Ok(HttpResponse::Ok().json(ApiResponse::ok(message, todos)))
}

#[instrument(skip(state, user, req), fields(user_id = %user.user_id, todo_id))]
pub async fn create_todo(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req: web::Json<CreateTodo>,
) -> Result<HttpResponse, ApiError> {
    let todo = state
        .todo_service
        .create(&user.user_id, req.into_inner())
        .await?;
    tracing::Span::current().record("todo_id", todo.id.as_str());

    Ok(HttpResponse::Ok().json(ApiResponse::ok("Successfully created the todo", todo)))
}

#[instrument(skip(state, user, req), fields(user_id = %user.user_id, todo_id = %*path))]
pub async fn update_todo(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
    req: web::Json<UpdateTodo>,
) -> Result<HttpResponse, ApiError> {
    let todo_id = path.into_inner();
    let todo = state
        .todo_service
        .update(&user.user_id, &todo_id, req.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok("Successfully updated the todo", todo)))
}

#[instrument(skip(state, user), fields(user_id = %user.user_id, todo_id = %*path))]
pub async fn delete_todo(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let todo_id = path.into_inner();
    let deleted = state.todo_service.delete(&user.user_id, &todo_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(
        "Successfully deleted the todo",
        DeleteResponse { id: todo_id, deleted },
    )))
}

#[instrument(skip(state, user), fields(user_id = %user.user_id))]
pub async fn list_completed_todos(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let todos = state.todo_service.list_completed(&user.user_id).await?;

    info!(count = todos.len(), "Completed todos listed");
    Ok(HttpResponse::Ok().json(ApiResponse::ok(
        "Successfully fetched all the completed todos",
        todos,
    )))
}
