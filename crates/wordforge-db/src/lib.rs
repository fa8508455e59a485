//! Wordforge DB - Database abstractions
//!
//! SQLx-based database layer for Wordforge services.
//!
//! # Example
//!
//! ```rust,ignore
//! use wordforge_db::{create_pool, Repositories};
//!
//! let pool = create_pool("postgres://localhost/wordforge").await?;
//! let repos = Repositories::new(pool);
//!
//! // Use repositories
//! let account = repos.users.find_by_email("customer@example.com").await?;
//! ```

pub mod error;
pub mod models;
pub mod pg;
pub mod pool;
pub mod repo;

pub use error::{DbError, DbResult};
pub use pg::Repositories;
pub use pool::{create_pool, create_pool_with_size, DbPool};
pub use repo::*;
