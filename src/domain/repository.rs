use crate::domain::todo::{Todo, TodoChanges, TodoFilter};
use crate::domain::user::{User, UserFilter};
use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Stores a new user. Fails with `DomainError::EmailTaken` when the email
    /// is already registered; the check and the insert are atomic.
    async fn create(&self, user: User) -> Result<User>;
    async fn find_one(&self, filter: &UserFilter) -> Result<Option<User>>;
    async fn find_many(&self, filter: &UserFilter) -> Result<Vec<User>>;
}

#[async_trait]
pub trait TodoRepository: Send + Sync {
    async fn create(&self, todo: Todo) -> Result<Todo>;
    async fn find_one(&self, filter: &TodoFilter) -> Result<Option<Todo>>;
    async fn find_many(&self, filter: &TodoFilter) -> Result<Vec<Todo>>;
    /// Applies `changes` to the first matching todo and returns it, or `None`.
    async fn update_one(&self, filter: &TodoFilter, changes: TodoChanges) -> Result<Option<Todo>>;
    /// Removes the first matching todo. Returns whether anything was removed.
    async fn delete_one(&self, filter: &TodoFilter) -> Result<bool>;
}
