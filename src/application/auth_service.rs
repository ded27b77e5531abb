use crate::domain::error::DomainError;
use crate::domain::repository::UserRepository;
use crate::domain::user::{CreateUser, LoginRequest, User, UserFilter};
use crate::domain::validation::{validate_email, validate_password, validate_signup};
use crate::infrastructure::security::{TokenService, hash_password, verify_password};
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, trace, warn};
use uuid::Uuid;

pub struct AuthService<R: UserRepository + ?Sized> {
    user_repository: Arc<R>,
    tokens: Arc<TokenService>,
}

impl<R: UserRepository + ?Sized> AuthService<R> {
    pub fn new(user_repository: Arc<R>, tokens: Arc<TokenService>) -> Self {
        Self {
            user_repository,
            tokens,
        }
    }

    #[instrument(skip(self, req), fields(email = %req.email, username = %req.username))]
    pub async fn register_user(&self, req: CreateUser) -> Result<User> {
        trace!("Starting user registration");

        validate_signup(&req.username, &req.email, &req.password).into_result()?;

        if self
            .user_repository
            .find_one(&UserFilter::by_email(&req.email))
            .await?
            .is_some()
        {
            warn!(email = %req.email, "User already exists");
            return Err(DomainError::EmailTaken.into());
        }

        let password_hash = hash_password(&req.password).map_err(|e| {
            error!(error = %e, "Failed to hash password");
            DomainError::Internal(format!("Failed to hash password: {}", e))
        })?;

        let user = User {
            id: Uuid::new_v4().to_string(),
            username: req.username,
            email: req.email,
            password_hash,
        };

        debug!(user_id = %user.id, "Saving user to repository");
        let user = self.user_repository.create(user).await?;

        info!(user_id = %user.id, email = %user.email, "User registered successfully");
        Ok(user)
    }

    /// Checks credential format, then the stored hash, and issues a token.
    #[instrument(skip(self, req), fields(email = %req.email))]
    pub async fn login(&self, req: LoginRequest) -> Result<String> {
        trace!("Starting login");

        validate_email(&req.email).into_result()?;
        validate_password(&req.password).into_result()?;

        let user = self
            .user_repository
            .find_one(&UserFilter::by_email(&req.email))
            .await?
            .ok_or_else(|| {
                warn!(email = %req.email, "User not found during login");
                DomainError::UserNotFound
            })?;

        let is_valid = verify_password(&req.password, &user.password_hash).map_err(|e| {
            error!(error = %e, "Failed to verify password");
            DomainError::Internal(format!("Failed to verify password: {}", e))
        })?;

        if !is_valid {
            warn!(user_id = %user.id, "Invalid password during login");
            return Err(DomainError::UserNotFound.into());
        }

        let token = self.tokens.issue(&user.id).map_err(|e| {
            error!(error = %e, "Failed to generate token");
            DomainError::Internal(e.to_string())
        })?;

        info!(user_id = %user.id, "Login successful");
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::user_repository::InMemoryUserRepository;

    fn service() -> AuthService<InMemoryUserRepository> {
        AuthService::new(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(TokenService::new("auth-service-secret")),
        )
    }

    fn signup(username: &str, email: &str, password: &str) -> CreateUser {
        CreateUser {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    fn login(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    fn domain_error(err: anyhow::Error) -> DomainError {
        err.downcast::<DomainError>().expect("domain error")
    }

    #[tokio::test]
    async fn test_register_stores_hash_not_password() {
        let service = service();
        let user = service
            .register_user(signup("grace_h", "grace@example.com", "C0bol!rocks"))
            .await
            .unwrap();

        assert_eq!(user.username, "grace_h");
        assert_ne!(user.password_hash, "C0bol!rocks");
        assert!(user.password_hash.starts_with("$argon2id$"));
    }

    #[tokio::test]
    async fn test_register_collects_all_violations() {
        let err = service()
            .register_user(signup("abc", "not-an-email", "weak"))
            .await
            .unwrap_err();

        match domain_error(err) {
            DomainError::InvalidCredentials(errors) => {
                assert!(errors.contains(&"Username should contain at least 6 characters".to_string()));
                assert!(errors.contains(&"Invalid email".to_string()));
                assert!(errors.contains(&"Password should include at least one number".to_string()));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_register_rejects_duplicate_email() {
        let service = service();
        service
            .register_user(signup("first_user", "dup@example.com", "Passw0rd!"))
            .await
            .unwrap();

        let err = service
            .register_user(signup("second_user", "dup@example.com", "Passw0rd!"))
            .await
            .unwrap_err();
        assert!(matches!(domain_error(err), DomainError::EmailTaken));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_signups_with_same_email_store_one_user() {
        let repository = Arc::new(InMemoryUserRepository::new());
        let service = Arc::new(AuthService::new(
            Arc::clone(&repository),
            Arc::new(TokenService::new("auth-service-secret")),
        ));

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let service = Arc::clone(&service);
                tokio::spawn(async move {
                    service
                        .register_user(signup(&format!("racer_{i}"), "same@example.com", "Passw0rd!"))
                        .await
                })
            })
            .collect();

        let mut created = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => created += 1,
                Err(err) => assert!(matches!(domain_error(err), DomainError::EmailTaken)),
            }
        }
        assert_eq!(created, 1);

        let stored = repository
            .find_many(&UserFilter::by_email("same@example.com"))
            .await
            .unwrap();
        assert_eq!(stored.len(), 1);
    }

    #[tokio::test]
    async fn test_login_issues_token_for_user() {
        let tokens = Arc::new(TokenService::new("shared"));
        let service = AuthService::new(Arc::new(InMemoryUserRepository::new()), tokens.clone());
        let user = service
            .register_user(signup("linus_t", "linus@example.com", "Kern3l#dev"))
            .await
            .unwrap();

        let token = service
            .login(login("linus@example.com", "Kern3l#dev"))
            .await
            .unwrap();
        assert_eq!(tokens.verify(&token).unwrap(), user.id);
    }

    #[tokio::test]
    async fn test_login_unknown_email_and_wrong_password_look_the_same() {
        let service = service();
        service
            .register_user(signup("ada_love", "ada@example.com", "Engine#1843"))
            .await
            .unwrap();

        let unknown = service
            .login(login("nobody@example.com", "Engine#1843"))
            .await
            .unwrap_err();
        assert!(matches!(domain_error(unknown), DomainError::UserNotFound));

        let wrong = service
            .login(login("ada@example.com", "Engine#1844"))
            .await
            .unwrap_err();
        assert!(matches!(domain_error(wrong), DomainError::UserNotFound));
    }

    #[tokio::test]
    async fn test_login_checks_email_format_before_password() {
        let err = service()
            .login(login("bad-email", "weak"))
            .await
            .unwrap_err();

        match domain_error(err) {
            DomainError::InvalidCredentials(errors) => assert_eq!(errors, ["Invalid email"]),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
