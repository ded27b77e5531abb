use crate::domain::error::DomainError;
use crate::domain::repository::TodoRepository;
use crate::domain::todo::{CreateTodo, Todo, TodoChanges, TodoFilter, UpdateTodo, truthy};
use anyhow::Result;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

pub struct TodoService<R: TodoRepository + ?Sized> {
    repository: Arc<R>,
    enforce_ownership: bool,
}

impl<R: TodoRepository + ?Sized> TodoService<R> {
    /// With `enforce_ownership` off, updates and deletes address a todo by id
    /// alone, whoever owns it.
    pub fn new(repository: Arc<R>, enforce_ownership: bool) -> Self {
        Self {
            repository,
            enforce_ownership,
        }
    }

    fn target(&self, user_id: &str, todo_id: &str) -> TodoFilter {
        let filter = TodoFilter::by_id(todo_id);
        if self.enforce_ownership {
            filter.and_owner(user_id)
        } else {
            filter
        }
    }

    #[instrument(skip(self))]
    pub async fn list(&self, user_id: &str) -> Result<Vec<Todo>> {
        self.repository
            .find_many(&TodoFilter::owned_by(user_id))
            .await
    }

    /// Unlike [`list`](Self::list), an empty result is an error.
    #[instrument(skip(self))]
    pub async fn list_completed(&self, user_id: &str) -> Result<Vec<Todo>> {
        let todos = self
            .repository
            .find_many(&TodoFilter::owned_by(user_id).completed())
            .await?;

        if todos.is_empty() {
            return Err(DomainError::NoCompletedTodos.into());
        }
        Ok(todos)
    }

    #[instrument(skip(self, req))]
    pub async fn create(&self, user_id: &str, req: CreateTodo) -> Result<Todo> {
        let body = required_body(req.body)?;

        let todo = Todo {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            body,
            is_completed: truthy(&req.is_completed),
        };

        let todo = self.repository.create(todo).await.map_err(|e| {
            error!(error = %e, "Todo store rejected insert");
            DomainError::TodoCreationFailed(e.to_string())
        })?;

        info!(todo_id = %todo.id, is_completed = todo.is_completed, "Todo created");
        Ok(todo)
    }

    #[instrument(skip(self, req))]
    pub async fn update(&self, user_id: &str, todo_id: &str, req: UpdateTodo) -> Result<Todo> {
        let body = required_body(req.body)?;

        let todo = self
            .repository
            .update_one(&self.target(user_id, todo_id), TodoChanges { body: Some(body) })
            .await?
            .ok_or_else(|| {
                warn!(todo_id, "Todo not found for update");
                DomainError::TodoNotFound
            })?;

        info!(todo_id = %todo.id, "Todo updated");
        Ok(todo)
    }

    /// Returns whether a document was removed. Deleting a missing todo is
    /// not an error.
    #[instrument(skip(self))]
    pub async fn delete(&self, user_id: &str, todo_id: &str) -> Result<bool> {
        let deleted = self
            .repository
            .delete_one(&self.target(user_id, todo_id))
            .await?;

        info!(todo_id, deleted, "Todo delete processed");
        Ok(deleted)
    }
}

fn required_body(body: Option<String>) -> Result<String, DomainError> {
    match body {
        Some(body) if !body.trim().is_empty() => Ok(body),
        _ => Err(DomainError::InvalidTodo("Todo body is required".to_string())),
    }
}
