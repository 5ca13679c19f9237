use std::{fmt::Debug, sync::Arc};

use async_trait::async_trait;

use crate::{
    error::StoreResult,
    row::Row,
    sql::{SqlDialect, SqlStatement},
    value::Value,
};

#[cfg(feature = "sqlite")]
pub mod sqlite;

/// Result of a single statement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryOutput {
    /// Rows produced by the statement, in store order.
    pub rows: Vec<Row>,
    /// Number of rows changed by a statement that produces no columns.
    pub changes: usize,
}

/// Executes parameterized statements against a relational store.
///
/// Each call is one autocommit round trip. Arguments are bound to the
/// statement's placeholders by position and are not counted beforehand, so a
/// mismatch is reported by the store. Every failure surfaces as
/// [`StoreError::QueryFailed`](crate::error::StoreError::QueryFailed) after
/// being logged.
#[async_trait]
pub trait QueryExecutor: Debug + Send + Sync {
    /// Dialect statements for this store are written in.
    fn dialect(&self) -> SqlDialect;

    async fn execute(&self, sql: &str, arguments: &[Value]) -> StoreResult<QueryOutput>;

    async fn execute_statement(&self, statement: &SqlStatement) -> StoreResult<QueryOutput> {
        self.execute(&statement.sql, &statement.arguments).await
    }
}

pub type QueryExecutorArc = Arc<dyn QueryExecutor>;
