//! Table definitions.

use remark_store::{error::StoreResult, executor::QueryExecutor};
use tracing::info;

const MIGRATIONS: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS authors (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        email TEXT NOT NULL,
        external_id TEXT NULL
    )",
    "CREATE TABLE IF NOT EXISTS comments (
        id TEXT PRIMARY KEY,
        author_id TEXT NOT NULL,
        content TEXT NOT NULL,
        comment_id TEXT NULL,
        page_id TEXT NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS comments_page_id ON comments (page_id)",
];

/// Creates the tables if they do not exist yet. Safe to run repeatedly.
///
/// # Errors
///
/// Returns [`remark_store::error::StoreError::QueryFailed`] if a statement fails.
pub async fn migrate(executor: &dyn QueryExecutor) -> StoreResult<()> {
    for statement in MIGRATIONS {
        executor.execute(statement, &[]).await?;
    }
    info!("schema is up to date");
    Ok(())
}
