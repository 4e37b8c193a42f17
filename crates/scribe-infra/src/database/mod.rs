//! PostgreSQL adapters built on SeaORM.

mod connections;
mod error;
mod post_repo;
mod postgres_base;
mod postgres_repo;
mod tag_repo;
mod transaction;

pub mod entity;

pub use connections::{DatabaseConfig, connect};
pub use post_repo::PostgresPostRepository;
pub use postgres_base::PostgresBaseRepository;
pub use postgres_repo::PostgresUserRepository;
pub use tag_repo::PostgresTagRepository;
pub use transaction::SeaOrmTransactionManager;
