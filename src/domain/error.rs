use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid Credentials")]
    InvalidCredentials(Vec<String>),
    #[error("User with this email already exists")]
    EmailTaken,
    #[error("User doesn't exist")]
    UserNotFound,
    #[error("Invalid todo: {0}")]
    InvalidTodo(String),
    #[error("Todo not found")]
    TodoNotFound,
    #[error("No completed todos found")]
    NoCompletedTodos,
    #[error("Something went wrong while creating a todo: {0}")]
    TodoCreationFailed(String),
    #[error("Internal error: {0}")]
    Internal(String),
}
