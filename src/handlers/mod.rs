//! HTTP plumbing shared across route modules.

pub mod http;

pub use http::AppState;
