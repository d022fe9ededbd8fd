//! Domain entities and their validation.

mod account;

pub use account::{
    validate_profile_update, validate_registration, Account, AccountResponse, PASSWORD_MIN,
    USERNAME_MAX, USERNAME_MIN,
};
