//! In-memory repository mirroring the PostgreSQL semantics. Backs the test
//! suite and lets the service run without a database.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::Account;

use super::UserRepository;

#[derive(Default)]
pub struct MemoryUserRepository {
    accounts: Mutex<HashMap<Uuid, Account>>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn create(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> AppResult<Account> {
        let mut accounts = self.accounts.lock().unwrap();
        if accounts
            .values()
            .any(|a| a.username == username || a.email == email)
        {
            return Err(AppError::Duplicate);
        }
        let now = Utc::now();
        let account = Account {
            id: Uuid::new_v4(),
            username: username.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: now,
            updated_at: now,
        };
        accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn get_by_id(&self, id: Uuid) -> AppResult<Account> {
        self.accounts
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or(AppError::NotFound)
    }

    async fn get_by_email(&self, email: &str) -> AppResult<Account> {
        self.accounts
            .lock()
            .unwrap()
            .values()
            .find(|a| a.email == email)
            .cloned()
            .ok_or(AppError::NotFound)
    }

    async fn update(&self, account: &Account) -> AppResult<Account> {
        let mut accounts = self.accounts.lock().unwrap();
        if accounts.values().any(|a| {
            a.id != account.id && (a.username == account.username || a.email == account.email)
        }) {
            return Err(AppError::Duplicate);
        }
        let stored = accounts.get_mut(&account.id).ok_or(AppError::NotFound)?;
        stored.username = account.username.clone();
        stored.email = account.email.clone();
        stored.password_hash = account.password_hash.clone();
        stored.updated_at = Utc::now();
        Ok(stored.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.accounts
            .lock()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or(AppError::NotFound)
    }
}
