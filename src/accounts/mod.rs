//! Bearer-gated account profile endpoints.

mod handlers;

pub use handlers::{delete_account, get_account, update_account};
