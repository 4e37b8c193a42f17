//! In-memory adapters used when no database is configured.

mod repos;
mod store;

pub use repos::{InMemoryPostRepository, InMemoryTagRepository, InMemoryUserRepository};
pub use store::{InMemoryStore, InMemoryTransactionManager, InMemoryTx};

#[cfg(test)]
mod tests;
