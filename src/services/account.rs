//! Account orchestration: registration, login, profile management.

use std::sync::Arc;

use tokio::task;
use tracing::info;
use uuid::Uuid;

use crate::auth::{password, TokenKey};
use crate::db::UserRepository;
use crate::error::{AppError, AppResult};
use crate::models::{validate_profile_update, validate_registration, Account};

/// Orchestrates the hasher, token issuer and storage. Stateless apart from
/// the injected collaborators; cheap to clone. Storage errors are surfaced
/// as-is, never retried.
#[derive(Clone)]
pub struct AccountService {
    repo: Arc<dyn UserRepository>,
    token_key: TokenKey,
}

impl AccountService {
    pub fn new(repo: Arc<dyn UserRepository>, token_key: TokenKey) -> Self {
        Self { repo, token_key }
    }

    /// Registers a new account. Input is re-validated here regardless of
    /// what the HTTP layer already checked.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> AppResult<Account> {
        validate_registration(username, email, password).map_err(AppError::Validation)?;
        let password_hash = hash_blocking(password.to_string()).await?;
        let account = self.repo.create(username, email, &password_hash).await?;
        info!(email = %account.email, "account registered");
        Ok(account)
    }

    /// Exchanges credentials for a session token. A missing account and a
    /// wrong password are indistinguishable to the caller.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<String> {
        let account = match self.repo.get_by_email(email).await {
            Ok(account) => account,
            Err(AppError::NotFound) => return Err(AppError::InvalidCredentials),
            Err(e) => return Err(e),
        };
        if !verify_blocking(password.to_string(), account.password_hash.clone()).await? {
            return Err(AppError::InvalidCredentials);
        }
        let token = self.token_key.issue(account.id)?;
        info!(email = %account.email, "account logged in");
        Ok(token)
    }

    pub async fn get_account(&self, id: Uuid) -> AppResult<Account> {
        self.repo.get_by_id(id).await
    }

    /// Overwrites username and email; re-hashes the password only when a
    /// non-empty new one was supplied.
    pub async fn update_profile(
        &self,
        id: Uuid,
        username: &str,
        email: &str,
        password: Option<&str>,
    ) -> AppResult<Account> {
        // An empty string means "keep the current password".
        let password = password.filter(|p| !p.is_empty());
        validate_profile_update(username, email, password).map_err(AppError::Validation)?;

        let mut account = self.repo.get_by_id(id).await?;
        account.username = username.to_string();
        account.email = email.to_string();
        if let Some(password) = password {
            account.password_hash = hash_blocking(password.to_string()).await?;
        }
        let account = self.repo.update(&account).await?;
        info!(user_id = %account.id, "account updated");
        Ok(account)
    }

    pub async fn delete_account(&self, id: Uuid) -> AppResult<()> {
        self.repo.delete(id).await?;
        info!(user_id = %id, "account deleted");
        Ok(())
    }
}

// Argon2 is deliberately slow; run it off the async worker threads so
// concurrent requests are not serialized behind a hash.
async fn hash_blocking(password: String) -> AppResult<String> {
    task::spawn_blocking(move || password::hash(&password))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("hash task: {}", e)))?
}

async fn verify_blocking(password: String, digest: String) -> AppResult<bool> {
    task::spawn_blocking(move || password::verify(&password, &digest))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("verify task: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryUserRepository;

    fn service() -> AccountService {
        AccountService::new(
            Arc::new(MemoryUserRepository::new()),
            TokenKey::new("test-secret-at-least-32-characters!!".to_string()),
        )
    }

    #[tokio::test]
    async fn register_stores_a_digest_not_the_plaintext() {
        let svc = service();
        let account = svc.register("alice", "a@x.com", "secret1").await.unwrap();
        assert_ne!(account.password_hash, "secret1");
        assert!(password::verify("secret1", &account.password_hash));
    }

    #[tokio::test]
    async fn register_validates_at_its_own_boundary() {
        let svc = service();
        let err = svc.register("alice", "a@x.com", "12345").await.unwrap_err();
        let AppError::Validation(fields) = err else {
            panic!("expected a validation error");
        };
        assert_eq!(fields[0].field, "password");
    }

    #[tokio::test]
    async fn register_rejects_duplicate_email() {
        let svc = service();
        svc.register("alice", "a@x.com", "secret1").await.unwrap();
        let err = svc.register("bob", "a@x.com", "secret2").await.unwrap_err();
        assert!(matches!(err, AppError::Duplicate));
    }

    #[tokio::test]
    async fn login_yields_a_token_for_the_account() {
        let svc = service();
        let account = svc.register("alice", "a@x.com", "secret1").await.unwrap();
        let token = svc.login("a@x.com", "secret1").await.unwrap();
        assert_eq!(svc.token_key.verify(&token).unwrap(), account.id);
    }

    #[tokio::test]
    async fn login_failures_are_indistinguishable() {
        let svc = service();
        svc.register("alice", "a@x.com", "secret1").await.unwrap();
        let wrong_password = svc.login("a@x.com", "wrong!!").await.unwrap_err();
        let unknown_email = svc.login("b@x.com", "secret1").await.unwrap_err();
        assert!(matches!(wrong_password, AppError::InvalidCredentials));
        assert!(matches!(unknown_email, AppError::InvalidCredentials));
    }

    #[tokio::test]
    async fn update_keeps_hash_when_password_omitted_or_empty() {
        let svc = service();
        let account = svc.register("alice", "a@x.com", "secret1").await.unwrap();
        let updated = svc
            .update_profile(account.id, "alicia", "a2@x.com", None)
            .await
            .unwrap();
        assert_eq!(updated.username, "alicia");
        assert_eq!(updated.email, "a2@x.com");
        assert_eq!(updated.password_hash, account.password_hash);

        let updated = svc
            .update_profile(account.id, "alicia", "a2@x.com", Some(""))
            .await
            .unwrap();
        assert_eq!(updated.password_hash, account.password_hash);
    }

    #[tokio::test]
    async fn update_rehashes_a_new_password() {
        let svc = service();
        let account = svc.register("alice", "a@x.com", "secret1").await.unwrap();
        let updated = svc
            .update_profile(account.id, "alice", "a@x.com", Some("secret2"))
            .await
            .unwrap();
        assert!(password::verify("secret2", &updated.password_hash));
        assert!(!password::verify("secret1", &updated.password_hash));
    }

    #[tokio::test]
    async fn missing_account_is_not_found() {
        let svc = service();
        let id = Uuid::new_v4();
        assert!(matches!(
            svc.get_account(id).await.unwrap_err(),
            AppError::NotFound
        ));
        assert!(matches!(
            svc.update_profile(id, "alice", "a@x.com", None)
                .await
                .unwrap_err(),
            AppError::NotFound
        ));
        assert!(matches!(
            svc.delete_account(id).await.unwrap_err(),
            AppError::NotFound
        ));
    }
}
