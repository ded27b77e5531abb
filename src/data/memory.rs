use crate::domain::todo::Todo;
use crate::domain::user::User;
use anyhow::{Result, bail};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, instrument};

/// A stored document with a string primary key.
pub trait Document: Clone + Send + Sync + 'static {
    fn id(&self) -> &str;
}

impl Document for User {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Document for Todo {
    fn id(&self) -> &str {
        &self.id
    }
}

/// In-process document collection. Documents keep insertion order; every
/// operation takes the lock once, so each call is atomic on its own.
pub struct Collection<D: Document> {
    name: String,
    documents: Arc<RwLock<Vec<D>>>,
}

impl<D: Document> Clone for Collection<D> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            documents: Arc::clone(&self.documents),
        }
    }
}

impl<D: Document> Collection<D> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            documents: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Inserts a document, replacing any existing one with the same id.
    pub async fn insert(&self, document: D) -> D {
        let mut documents = self.documents.write().await;
        match documents.iter_mut().find(|d| d.id() == document.id()) {
            Some(existing) => *existing = document.clone(),
            None => documents.push(document.clone()),
        }
        document
    }

    /// Inserts `document` unless some stored document matches `conflict`.
    /// The check and the insert happen under one write lock. Returns `None`
    /// on conflict.
    pub async fn insert_unless<F>(&self, conflict: F, document: D) -> Option<D>
    where
        F: Fn(&D) -> bool,
    {
        let mut documents = self.documents.write().await;
        if documents.iter().any(|d| conflict(d)) {
            return None;
        }
        documents.push(document.clone());
        Some(document)
    }

    pub async fn find_one<F>(&self, predicate: F) -> Option<D>
    where
        F: Fn(&D) -> bool,
    {
        let documents = self.documents.read().await;
        documents.iter().find(|d| predicate(*d)).cloned()
    }

    pub async fn find_many<F>(&self, predicate: F) -> Vec<D>
    where
        F: Fn(&D) -> bool,
    {
        let documents = self.documents.read().await;
        documents.iter().filter(|d| predicate(*d)).cloned().collect()
    }

    /// Mutates the first matching document in place and returns the result.
    pub async fn update_one<F, U>(&self, predicate: F, update: U) -> Option<D>
    where
        F: Fn(&D) -> bool,
        U: FnOnce(&mut D),
    {
        let mut documents = self.documents.write().await;
        let document = documents.iter_mut().find(|d| predicate(&**d))?;
        update(&mut *document);
        Some(document.clone())
    }

    pub async fn delete_one<F>(&self, predicate: F) -> bool
    where
        F: Fn(&D) -> bool,
    {
        let mut documents = self.documents.write().await;
        match documents.iter().position(|d| predicate(d)) {
            Some(index) => {
                documents.remove(index);
                true
            }
            None => false,
        }
    }

    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

const MEMORY_SCHEME: &str = "memory://";

/// Handle to a named database holding the `users` and `todos` collections.
#[derive(Clone)]
pub struct DocumentStore {
    database: String,
    users: Collection<User>,
    todos: Collection<Todo>,
}

impl DocumentStore {
    /// Opens a store for `connection_string`. Only the in-process
    /// `memory://<database>` backend is available.
    #[instrument(skip_all)]
    pub fn connect(connection_string: &str) -> Result<Self> {
        let Some(rest) = connection_string.strip_prefix(MEMORY_SCHEME) else {
            bail!("unsupported document store connection string: {connection_string}");
        };
        let database = rest.trim_matches('/');
        if database.is_empty() {
            bail!("connection string is missing a database name: {connection_string}");
        }

        info!(database = %database, "Opened in-memory document store");
        Ok(Self::named(database))
    }

    pub fn named(database: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            users: Collection::new("users"),
            todos: Collection::new("todos"),
        }
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    pub fn users(&self) -> Collection<User> {
        self.users.clone()
    }

    pub fn todos(&self) -> Collection<Todo> {
        self.todos.clone()
    }
}
