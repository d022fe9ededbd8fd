//! Application services.

mod account;

pub use account::AccountService;
