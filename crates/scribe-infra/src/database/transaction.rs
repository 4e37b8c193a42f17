use async_trait::async_trait;
use sea_orm::{DatabaseTransaction, DbConn, TransactionTrait};

use scribe_core::DomainError;
use scribe_core::ports::{TransactionManager, TxFuture};

use super::error::map_db_err;

/// Runs units of work inside a database transaction.
///
/// A `DatabaseTransaction` dropped without commit is rolled back by SeaORM,
/// which covers cancelled requests.
pub struct SeaOrmTransactionManager {
    db: DbConn,
}

impl SeaOrmTransactionManager {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TransactionManager for SeaOrmTransactionManager {
    type Tx = DatabaseTransaction;

    async fn run_in_transaction<T, F>(&self, work: F) -> Result<T, DomainError>
    where
        T: Send + 'static,
        F: for<'c> FnOnce(&'c DatabaseTransaction) -> TxFuture<'c, T> + Send + 'static,
    {
        let tx = self
            .db
            .begin()
            .await
            .map_err(|e| map_db_err(e).into_domain("failed to begin transaction"))?;

        let result = work(&tx).await;
        match result {
            Ok(value) => {
                tx.commit()
                    .await
                    .map_err(|e| map_db_err(e).into_domain("failed to commit transaction"))?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::error!(error = %rollback_err, "transaction rollback failed");
                }
                Err(err)
            }
        }
    }
}
