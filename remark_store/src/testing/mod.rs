//! Test support.

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::{
    error::{StoreError, StoreResult},
    executor::{QueryExecutor, QueryExecutorArc, QueryOutput},
    sql::{SqlDialect, SqlStatement},
    value::Value,
};

/// Executor wrapper that records every statement it forwards.
///
/// Can be told to fail a specific call, counted from 1, without forwarding it.
/// May report a dialect other than the wrapped executor's. SQLite also accepts
/// `$n` placeholders, so Postgres style statements still run against it.
#[derive(Debug)]
pub struct RecordingExecutor {
    inner: QueryExecutorArc,
    dialect: SqlDialect,
    statements: Mutex<Vec<SqlStatement>>,
    fail_call: AtomicUsize,
}

impl RecordingExecutor {
    pub fn new(inner: QueryExecutorArc) -> Arc<Self> {
        let dialect = inner.dialect();
        Self::with_dialect(inner, dialect)
    }

    pub fn with_dialect(inner: QueryExecutorArc, dialect: SqlDialect) -> Arc<Self> {
        Arc::new(Self {
            inner,
            dialect,
            statements: Mutex::new(Vec::new()),
            fail_call: AtomicUsize::new(0),
        })
    }

    /// All statements executed so far, including failed ones.
    pub fn statements(&self) -> Vec<SqlStatement> {
        self.statements.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.statements.lock().len()
    }

    /// Counts executed statements whose text starts with `prefix`.
    pub fn count_starting_with(&self, prefix: &str) -> usize {
        self.statements
            .lock()
            .iter()
            .filter(|statement| statement.sql.starts_with(prefix))
            .count()
    }

    pub fn clear(&self) {
        self.statements.lock().clear();
    }

    /// Makes the `call`-th call from now fail with [`StoreError::QueryFailed`].
    pub fn fail_nth_call(&self, call: usize) {
        let offset = self.call_count();
        self.fail_call.store(offset + call, Ordering::SeqCst);
    }
}

#[async_trait]
impl QueryExecutor for RecordingExecutor {
    fn dialect(&self) -> SqlDialect {
        self.dialect
    }

    async fn execute(&self, sql: &str, arguments: &[Value]) -> StoreResult<QueryOutput> {
        let call = {
            let mut statements = self.statements.lock();
            statements.push(SqlStatement::new(sql, arguments.to_vec()));
            statements.len()
        };
        if self
            .fail_call
            .compare_exchange(call, 0, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
        {
            return Err(StoreError::QueryFailed);
        }
        self.inner.execute(sql, arguments).await
    }
}

#[cfg(all(test, feature = "sqlite"))]
mod tests {
    use super::*;
    use crate::executor::sqlite::SqliteExecutor;

    #[tokio::test]
    async fn it_works() {
        let executor = RecordingExecutor::new(Arc::new(SqliteExecutor::open_memory().unwrap()));

        executor
            .execute("CREATE TABLE t (id TEXT)", &[])
            .await
            .unwrap();
        executor
            .execute("SELECT * FROM t WHERE id = ?", &["x".into()])
            .await
            .unwrap();
        assert_eq!(executor.call_count(), 2);
        assert_eq!(executor.count_starting_with("SELECT"), 1);
        assert_eq!(
            executor.statements()[1],
            SqlStatement::new("SELECT * FROM t WHERE id = ?", vec!["x".into()])
        );

        executor.fail_nth_call(2);
        assert!(executor.execute("SELECT * FROM t", &[]).await.is_ok());
        assert_eq!(
            executor.execute("SELECT * FROM t", &[]).await,
            Err(StoreError::QueryFailed)
        );
        assert!(executor.execute("SELECT * FROM t", &[]).await.is_ok());

        executor.clear();
        assert_eq!(executor.call_count(), 0);
    }

    #[tokio::test]
    async fn indexed_placeholders() {
        let executor = RecordingExecutor::with_dialect(
            Arc::new(SqliteExecutor::open_memory().unwrap()),
            SqlDialect::Postgres,
        );
        assert_eq!(executor.dialect(), SqlDialect::Postgres);

        executor
            .execute("CREATE TABLE t (id TEXT, label TEXT)", &[])
            .await
            .unwrap();
        executor
            .execute(
                "INSERT INTO t (id, label) VALUES ($1, $2)",
                &["x".into(), "first".into()],
            )
            .await
            .unwrap();
        let output = executor
            .execute("SELECT label FROM t WHERE id = $1", &["x".into()])
            .await
            .unwrap();
        assert_eq!(output.rows[0].get_string("label").unwrap(), "first");
    }
}
