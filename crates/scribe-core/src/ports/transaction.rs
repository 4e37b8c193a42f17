//! Transaction coordinator port.

use async_trait::async_trait;
use futures::future::BoxFuture;

use crate::error::DomainError;

/// Future returned by a unit of work, borrowing the transaction handle.
pub type TxFuture<'c, T> = BoxFuture<'c, Result<T, DomainError>>;

/// Runs a unit of work atomically.
///
/// The work receives the transaction handle explicitly and passes it to every
/// store write it issues. Returning `Ok` commits, returning `Err` rolls back
/// and hands the error back unchanged. Dropping the returned future before it
/// completes (e.g. a cancelled request) must roll back as well.
#[async_trait]
pub trait TransactionManager: Send + Sync {
    /// Execution handle scoped to one open transaction.
    type Tx: Send + Sync + 'static;

    async fn run_in_transaction<T, F>(&self, work: F) -> Result<T, DomainError>
    where
        T: Send + 'static,
        F: for<'c> FnOnce(&'c Self::Tx) -> TxFuture<'c, T> + Send + 'static;
}
