//! Account entity and field validation.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;
use validator::ValidateEmail;

use crate::error::FieldError;

pub const USERNAME_MIN: usize = 3;
pub const USERNAME_MAX: usize = 50;
pub const PASSWORD_MIN: usize = 6;

/// A stored account. `password_hash` is the salted one-way digest of the
/// password; the plaintext is never stored and never leaves the service
/// layer after hashing.
#[derive(Debug, Clone, FromRow)]
pub struct Account {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Wire shape of an account. Deliberately has no hash field.
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Account> for AccountResponse {
    fn from(a: Account) -> Self {
        Self {
            id: a.id,
            username: a.username,
            email: a.email,
            created_at: a.created_at,
            updated_at: a.updated_at,
        }
    }
}

/// Validates registration input, collecting every failing field rather than
/// stopping at the first.
pub fn validate_registration(
    username: &str,
    email: &str,
    password: &str,
) -> Result<(), Vec<FieldError>> {
    let mut errors = identity_errors(username, email);
    check_password(password, &mut errors);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates a profile update. `password` is optional; when present it must
/// meet the same policy as registration.
pub fn validate_profile_update(
    username: &str,
    email: &str,
    password: Option<&str>,
) -> Result<(), Vec<FieldError>> {
    let mut errors = identity_errors(username, email);
    if let Some(password) = password {
        check_password(password, &mut errors);
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn identity_errors(username: &str, email: &str) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if username.is_empty() {
        errors.push(FieldError::new("username", "required"));
    } else {
        let len = username.chars().count();
        if !(USERNAME_MIN..=USERNAME_MAX).contains(&len) {
            errors.push(FieldError::new(
                "username",
                format!("must be {USERNAME_MIN}-{USERNAME_MAX} characters"),
            ));
        }
    }
    if email.is_empty() {
        errors.push(FieldError::new("email", "required"));
    } else if !email.validate_email() {
        errors.push(FieldError::new("email", "not a valid email address"));
    }
    errors
}

fn check_password(password: &str, errors: &mut Vec<FieldError>) {
    if password.is_empty() {
        errors.push(FieldError::new("password", "required"));
    } else if password.chars().count() < PASSWORD_MIN {
        errors.push(FieldError::new(
            "password",
            format!("must be at least {PASSWORD_MIN} characters"),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_accepts_valid_input() {
        assert!(validate_registration("alice", "a@x.com", "secret1").is_ok());
    }

    #[test]
    fn registration_collects_all_failing_fields() {
        let errors = validate_registration("ab", "not-an-email", "12345").unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["username", "email", "password"]);
    }

    #[test]
    fn empty_fields_are_all_reported() {
        let errors = validate_registration("", "", "").unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.iter().all(|e| e.message == "required"));
    }

    #[test]
    fn username_bounds_are_inclusive() {
        assert!(validate_registration("abc", "a@x.com", "secret1").is_ok());
        assert!(validate_registration(&"x".repeat(50), "a@x.com", "secret1").is_ok());
        assert!(validate_registration(&"x".repeat(51), "a@x.com", "secret1").is_err());
    }

    #[test]
    fn update_without_password_skips_password_policy() {
        assert!(validate_profile_update("alice", "a@x.com", None).is_ok());
        assert!(validate_profile_update("alice", "a@x.com", Some("12345")).is_err());
        assert!(validate_profile_update("alice", "a@x.com", Some("123456")).is_ok());
    }

    #[test]
    fn response_carries_no_hash() {
        let account = Account {
            id: Uuid::new_v4(),
            username: "alice".into(),
            email: "a@x.com".into(),
            password_hash: "$argon2id$...".into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let value = serde_json::to_value(AccountResponse::from(account)).unwrap();
        assert!(value.get("password_hash").is_none());
        assert!(value.get("password").is_none());
    }
}
