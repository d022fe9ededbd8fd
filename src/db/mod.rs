//! Storage layer: connection pool and account repositories.

mod memory;
mod pool;
mod repository;

pub use memory::MemoryUserRepository;
pub use pool::{create_pool, DbPool};
pub use repository::{PgUserRepository, UserRepository};
