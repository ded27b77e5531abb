use crate::data::memory::Collection;
use crate::domain::error::DomainError;
use crate::domain::repository::UserRepository;
use crate::domain::user::{User, UserFilter};
use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, instrument, trace, warn};

#[derive(Clone)]
pub struct InMemoryUserRepository {
    users: Collection<User>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::with_collection(Collection::new("users"))
    }

    pub fn with_collection(users: Collection<User>) -> Self {
        Self { users }
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    #[instrument(skip(self, user), fields(user_id = %user.id, email = %user.email))]
    async fn create(&self, user: User) -> Result<User> {
        trace!("Inserting user document");
        let email = user.email.clone();
        let Some(user) = self.users.insert_unless(|u| u.email == email, user).await else {
            warn!(email = %email, "Email already registered");
            return Err(DomainError::EmailTaken.into());
        };
        debug!(
            user_id = %user.id,
            collection = self.users.name(),
            "User saved to document store"
        );
        Ok(user)
    }

    #[instrument(skip(self))]
    async fn find_one(&self, filter: &UserFilter) -> Result<Option<User>> {
        let user = self.users.find_one(|u| filter.matches(u)).await;
        match &user {
            Some(u) => debug!(user_id = %u.id, email = %u.email, "User found in storage"),
            None => trace!("User not found in storage"),
        }
        Ok(user)
    }

    #[instrument(skip(self))]
    async fn find_many(&self, filter: &UserFilter) -> Result<Vec<User>> {
        let users = self.users.find_many(|u| filter.matches(u)).await;
        trace!(count = users.len(), "Users matched filter");
        Ok(users)
    }
}
