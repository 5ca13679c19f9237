use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use rusqlite::{Connection, params_from_iter};
use tracing::{debug, error, instrument};

use crate::{
    error::{StoreError, StoreResult},
    executor::{QueryExecutor, QueryOutput},
    row::Row,
    sql::SqlDialect,
    value::Value,
};

/// Query executor backed by a single SQLite connection.
///
/// Statements run on the blocking thread pool, one at a time.
#[derive(Debug, Clone)]
pub struct SqliteExecutor {
    connection: Arc<Mutex<Connection>>,
}

impl SqliteExecutor {
    /// Opens (or creates) a SQLite database at the given file path.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Open`] if the database cannot be opened.
    #[instrument]
    pub fn open(path: &str) -> StoreResult<Self> {
        let open_error = |err: rusqlite::Error| {
            error!(error = %err, "failed to open database");
            StoreError::Open { path: path.into() }
        };
        let connection = Connection::open(path).map_err(open_error)?;
        connection
            .execute_batch("PRAGMA journal_mode=WAL;")
            .map_err(open_error)?;
        debug!("opened database");
        Ok(Self::new(connection))
    }

    /// Opens an in-memory SQLite database.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Open`] if the database cannot be created.
    pub fn open_memory() -> StoreResult<Self> {
        let connection = Connection::open_in_memory().map_err(|err| {
            error!(error = %err, "failed to open in-memory database");
            StoreError::Open {
                path: ":memory:".into(),
            }
        })?;
        debug!("opened in-memory database");
        Ok(Self::new(connection))
    }

    fn new(connection: Connection) -> Self {
        Self {
            connection: Arc::new(Mutex::new(connection)),
        }
    }
}

#[async_trait]
impl QueryExecutor for SqliteExecutor {
    fn dialect(&self) -> SqlDialect {
        SqlDialect::Sqlite
    }

    async fn execute(&self, sql: &str, arguments: &[Value]) -> StoreResult<QueryOutput> {
        debug!(sql, ?arguments, "executing statement");

        let connection = Arc::clone(&self.connection);
        let owned_sql = sql.to_string();
        let owned_arguments = arguments.to_vec();
        let result = tokio::task::spawn_blocking(move || {
            run(&connection.lock(), &owned_sql, &owned_arguments)
        })
        .await;

        match result {
            Ok(Ok(output)) => Ok(output),
            Ok(Err(err)) => {
                error!(error = %err, sql, "database query error");
                Err(StoreError::QueryFailed)
            }
            Err(err) => {
                error!(error = %err, sql, "database worker failed");
                Err(StoreError::QueryFailed)
            }
        }
    }
}

fn run(connection: &Connection, sql: &str, arguments: &[Value]) -> rusqlite::Result<QueryOutput> {
    let mut statement = connection.prepare(sql)?;

    if statement.column_count() == 0 {
        let changes = statement.execute(params_from_iter(arguments.iter()))?;
        return Ok(QueryOutput {
            rows: Vec::new(),
            changes,
        });
    }

    let columns: Vec<String> = statement
        .column_names()
        .into_iter()
        .map(String::from)
        .collect();

    let mut rows = statement.query(params_from_iter(arguments.iter()))?;
    let mut output = Vec::new();
    while let Some(row) = rows.next()? {
        let mut record = Row::new();
        for (index, name) in columns.iter().enumerate() {
            record.insert(name.as_str(), Value::from(row.get_ref(index)?));
        }
        output.push(record);
    }

    Ok(QueryOutput {
        rows: output,
        changes: 0,
    })
}
