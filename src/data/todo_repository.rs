use crate::data::memory::Collection;
use crate::domain::repository::TodoRepository;
use crate::domain::todo::{Todo, TodoChanges, TodoFilter};
use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, instrument, trace};

#[derive(Clone)]
pub struct InMemoryTodoRepository {
    todos: Collection<Todo>,
}

impl InMemoryTodoRepository {
    pub fn new() -> Self {
        Self::with_collection(Collection::new("todos"))
    }

    pub fn with_collection(todos: Collection<Todo>) -> Self {
        Self { todos }
    }
}

impl Default for InMemoryTodoRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TodoRepository for InMemoryTodoRepository {
    #[instrument(skip(self, todo), fields(todo_id = %todo.id, user_id = %todo.user_id))]
    async fn create(&self, todo: Todo) -> Result<Todo> {
        let todo = self.todos.insert(todo).await;
        debug!(todo_id = %todo.id, "Todo saved to document store");
        Ok(todo)
    }

    #[instrument(skip(self))]
    async fn find_one(&self, filter: &TodoFilter) -> Result<Option<Todo>> {
        Ok(self.todos.find_one(|t| filter.matches(t)).await)
    }

    #[instrument(skip(self))]
    async fn find_many(&self, filter: &TodoFilter) -> Result<Vec<Todo>> {
        let todos = self.todos.find_many(|t| filter.matches(t)).await;
        trace!(count = todos.len(), "Todos matched filter");
        Ok(todos)
    }

    #[instrument(skip(self, changes))]
    async fn update_one(&self, filter: &TodoFilter, changes: TodoChanges) -> Result<Option<Todo>> {
        let updated = self
            .todos
            .update_one(|t| filter.matches(t), |t| changes.apply(t))
            .await;
        debug!(updated = updated.is_some(), "Todo update applied");
        Ok(updated)
    }

    #[instrument(skip(self))]
    async fn delete_one(&self, filter: &TodoFilter) -> Result<bool> {
        let deleted = self.todos.delete_one(|t| filter.matches(t)).await;
        debug!(deleted, "Todo delete applied");
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn todo(id: &str, user_id: &str, done: bool) -> Todo {
        Todo {
            id: id.to_string(),
            user_id: user_id.to_string(),
            body: format!("body of {id}"),
            is_completed: done,
        }
    }

    async fn seeded() -> InMemoryTodoRepository {
        let repo = InMemoryTodoRepository::new();
        repo.create(todo("t1", "alice", false)).await.unwrap();
        repo.create(todo("t2", "alice", true)).await.unwrap();
        repo.create(todo("t3", "bob", true)).await.unwrap();
        repo
    }

    #[tokio::test]
    async fn test_find_many_scopes_by_owner() {
        let repo = seeded().await;

        let alice = repo.find_many(&TodoFilter::owned_by("alice")).await.unwrap();
        assert_eq!(alice.len(), 2);
        assert!(alice.iter().all(|t| t.user_id == "alice"));

        let nobody = repo.find_many(&TodoFilter::owned_by("carol")).await.unwrap();
        assert!(nobody.is_empty());
    }

    #[tokio::test]
    async fn test_find_many_completed_for_owner() {
        let repo = seeded().await;

        let done = repo
            .find_many(&TodoFilter::owned_by("alice").completed())
            .await
            .unwrap();
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].id, "t2");
    }

    #[tokio::test]
    async fn test_update_one_changes_body_only() {
        let repo = seeded().await;

        let updated = repo
            .update_one(
                &TodoFilter::by_id("t2"),
                TodoChanges {
                    body: Some("rewritten".to_string()),
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.body, "rewritten");
        assert!(updated.is_completed);

        let stored = repo.find_one(&TodoFilter::by_id("t2")).await.unwrap().unwrap();
        assert_eq!(stored, updated);
    }

    #[tokio::test]
    async fn test_update_one_returns_none_when_nothing_matches() {
        let repo = seeded().await;

        let missing = repo
            .update_one(&TodoFilter::by_id("nope"), TodoChanges::default())
            .await
            .unwrap();
        assert!(missing.is_none());

        let foreign = repo
            .update_one(&TodoFilter::by_id("t3").and_owner("alice"), TodoChanges::default())
            .await
            .unwrap();
        assert!(foreign.is_none());
    }

    #[tokio::test]
    async fn test_delete_one_reports_whether_a_document_was_removed() {
        let repo = seeded().await;

        assert!(repo.delete_one(&TodoFilter::by_id("t1")).await.unwrap());
        assert!(!repo.delete_one(&TodoFilter::by_id("t1")).await.unwrap());
        assert!(repo.find_one(&TodoFilter::by_id("t1")).await.unwrap().is_none());
    }
}
