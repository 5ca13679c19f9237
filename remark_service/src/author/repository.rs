use remark_common::id::generator::IdGeneratorArc;
use remark_store::{
    executor::QueryExecutorArc,
    sql::{SqlSelectBuilder, SqlStatement},
};
use tracing::info;

use crate::{
    error::AppResult,
    model::{Author, AuthorId, non_empty},
};

/// Input data for creating an author.
#[derive(Debug, Clone, Copy)]
pub struct AuthorInsert<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub external_id: Option<&'a str>,
}

/// Replacement values for an existing author.
#[derive(Debug, Clone, Copy)]
pub struct AuthorUpdate<'a> {
    pub id: &'a AuthorId,
    pub name: &'a str,
    pub email: &'a str,
    pub external_id: Option<&'a str>,
}

/// Author persistence over a query executor.
///
/// Store failures are passed through as they are.
#[derive(Debug, Clone)]
pub struct AuthorRepository {
    executor: QueryExecutorArc,
    id_generator: IdGeneratorArc,
}

impl AuthorRepository {
    pub fn new(executor: QueryExecutorArc, id_generator: IdGeneratorArc) -> Self {
        Self {
            executor,
            id_generator,
        }
    }

    fn select(&self) -> SqlSelectBuilder {
        let mut builder = SqlSelectBuilder::new(self.executor.dialect(), Author::TABLE);
        builder.set_columns(Author::COLUMNS);
        builder
    }

    /// Lists all authors in store order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    #[tracing::instrument(skip(self))]
    pub async fn list_authors(&self) -> AppResult<Vec<Author>> {
        let output = self
            .executor
            .execute_statement(&self.select().build())
            .await?;
        Ok(output
            .rows
            .iter()
            .map(Author::try_from)
            .collect::<Result<Vec<_>, _>>()?)
    }

    /// Gets an author by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    #[tracing::instrument(skip(self))]
    pub async fn get_author(&self, id: &AuthorId) -> AppResult<Option<Author>> {
        let output = self
            .executor
            .execute_statement(&self.select().filter_equal("id", id).build())
            .await?;
        Ok(output.rows.first().map(Author::try_from).transpose()?)
    }

    /// Gets all authors with the given ids in a single query.
    /// Unknown ids are skipped and no query is made for an empty list.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    #[tracing::instrument(skip(self))]
    pub async fn get_authors(&self, ids: &[AuthorId]) -> AppResult<Vec<Author>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let output = self
            .executor
            .execute_statement(&self.select().filter_in("id", ids).build())
            .await?;
        Ok(output
            .rows
            .iter()
            .map(Author::try_from)
            .collect::<Result<Vec<_>, _>>()?)
    }

    /// Creates an author with a newly generated id. An empty external id is
    /// stored as absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    #[tracing::instrument(skip(self))]
    pub async fn insert_author(&self, input: AuthorInsert<'_>) -> AppResult<Author> {
        let author = Author {
            id: AuthorId::generate(&self.id_generator),
            name: input.name.to_string(),
            email: input.email.to_string(),
            external_id: non_empty(input.external_id).map(ToString::to_string),
        };

        self.executor
            .execute_statement(&SqlStatement::with_dialect(
                self.executor.dialect(),
                "INSERT INTO authors (id, name, email, external_id) VALUES (?, ?, ?, ?)",
                vec![
                    (&author.id).into(),
                    author.name.as_str().into(),
                    author.email.as_str().into(),
                    author.external_id.as_deref().into(),
                ],
            ))
            .await?;

        info!(author_id = %author.id, "created author");
        Ok(author)
    }

    /// Replaces the name, email and external id of an author.
    ///
    /// Returns the number of changed rows, which is 0 for an unknown id.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    #[tracing::instrument(skip(self))]
    pub async fn update_author(&self, update: AuthorUpdate<'_>) -> AppResult<usize> {
        let output = self
            .executor
            .execute_statement(&SqlStatement::with_dialect(
                self.executor.dialect(),
                "UPDATE authors SET name = ?, email = ?, external_id = ? WHERE id = ?",
                vec![
                    update.name.into(),
                    update.email.into(),
                    non_empty(update.external_id).into(),
                    update.id.into(),
                ],
            ))
            .await?;

        info!(author_id = %update.id, changes = output.changes, "updated author");
        Ok(output.changes)
    }

    /// Deletes an author. Deleting an unknown id is not an error.
    ///
    /// Comments written by the author are kept.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    #[tracing::instrument(skip(self))]
    pub async fn delete_author(&self, id: &AuthorId) -> AppResult<()> {
        let output = self
            .executor
            .execute_statement(&SqlStatement::with_dialect(
                self.executor.dialect(),
                "DELETE FROM authors WHERE id = ?",
                vec![id.into()],
            ))
            .await?;

        info!(author_id = %id, changes = output.changes, "deleted author");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use remark_common::id::generator::IdGenerator;
    use remark_store::{
        error::StoreError, executor::sqlite::SqliteExecutor, testing::RecordingExecutor,
    };

    use super::*;
    use crate::{error::AppError, schema};

    async fn setup() -> (Arc<RecordingExecutor>, AuthorRepository) {
        let sqlite = SqliteExecutor::open_memory().unwrap();
        schema::migrate(&sqlite).await.unwrap();
        let executor = RecordingExecutor::new(Arc::new(sqlite));
        let repository = AuthorRepository::new(executor.clone(), Arc::new(IdGenerator::new()));
        (executor, repository)
    }

    fn ana() -> AuthorInsert<'static> {
        AuthorInsert {
            name: "Ana",
            email: "ana@example.com",
            external_id: None,
        }
    }

    #[tokio::test]
    async fn it_works() {
        let (_, repository) = setup().await;

        let author = repository.insert_author(ana()).await.unwrap();
        assert_eq!(author.id.as_str().len(), 26);
        assert!(author.id.create_time().is_some());

        let fetched = repository.get_author(&author.id).await.unwrap();
        assert_eq!(fetched.as_ref(), Some(&author));
        assert_eq!(fetched.unwrap().external_id, None);

        let other = repository
            .insert_author(AuthorInsert {
                name: "Bo",
                email: "bo@example.com",
                external_id: Some("ext-1"),
            })
            .await
            .unwrap();
        let authors = repository.list_authors().await.unwrap();
        assert_eq!(authors, vec![author.clone(), other.clone()]);

        assert_eq!(
            repository
                .get_author(&other.id)
                .await
                .unwrap()
                .unwrap()
                .external_id
                .as_deref(),
            Some("ext-1")
        );
    }

    #[tokio::test]
    async fn get_missing() {
        let (_, repository) = setup().await;
        assert_eq!(
            repository.get_author(&AuthorId::new("missing")).await.unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn get_authors() {
        let (executor, repository) = setup().await;
        let a = repository.insert_author(ana()).await.unwrap();
        let b = repository.insert_author(ana()).await.unwrap();
        executor.clear();

        assert!(repository.get_authors(&[]).await.unwrap().is_empty());
        assert_eq!(executor.call_count(), 0);

        let authors = repository
            .get_authors(&[b.id.clone(), AuthorId::new("missing"), a.id.clone()])
            .await
            .unwrap();
        assert_eq!(authors.len(), 2);
        assert!(authors.contains(&a) && authors.contains(&b));

        let statements = executor.statements();
        assert_eq!(statements.len(), 1);
        assert_eq!(
            statements[0].sql,
            "SELECT id, name, email, external_id FROM authors WHERE 1=1 AND id IN (?, ?, ?)"
        );
    }

    #[tokio::test]
    async fn update() {
        let (_, repository) = setup().await;
        let author = repository.insert_author(ana()).await.unwrap();

        let changes = repository
            .update_author(AuthorUpdate {
                id: &author.id,
                name: "Ana Maria",
                email: "am@example.com",
                external_id: Some("ext"),
            })
            .await
            .unwrap();
        assert_eq!(changes, 1);

        let updated = repository.get_author(&author.id).await.unwrap().unwrap();
        assert_eq!(updated.name, "Ana Maria");
        assert_eq!(updated.email, "am@example.com");
        assert_eq!(updated.external_id.as_deref(), Some("ext"));

        let changes = repository
            .update_author(AuthorUpdate {
                id: &author.id,
                name: "Ana",
                email: "ana@example.com",
                external_id: None,
            })
            .await
            .unwrap();
        assert_eq!(changes, 1);
        let updated = repository.get_author(&author.id).await.unwrap().unwrap();
        assert_eq!(updated.external_id, None);

        let changes = repository
            .update_author(AuthorUpdate {
                id: &AuthorId::new("missing"),
                name: "X",
                email: "x@example.com",
                external_id: None,
            })
            .await
            .unwrap();
        assert_eq!(changes, 0);
    }

    #[tokio::test]
    async fn delete() {
        let (_, repository) = setup().await;
        let author = repository.insert_author(ana()).await.unwrap();

        repository
            .delete_author(&AuthorId::new("missing"))
            .await
            .unwrap();
        assert_eq!(repository.list_authors().await.unwrap().len(), 1);

        repository.delete_author(&author.id).await.unwrap();
        assert!(repository.get_author(&author.id).await.unwrap().is_none());
        repository.delete_author(&author.id).await.unwrap();
    }

    #[tokio::test]
    async fn failures() {
        let (executor, repository) = setup().await;

        executor.fail_nth_call(1);
        assert!(matches!(
            repository.insert_author(ana()).await,
            Err(AppError::Store(StoreError::QueryFailed))
        ));
        assert!(repository.list_authors().await.unwrap().is_empty());

        executor.fail_nth_call(1);
        assert!(matches!(
            repository.get_author(&AuthorId::new("a")).await,
            Err(AppError::Store(StoreError::QueryFailed))
        ));
    }

    #[tokio::test]
    async fn empty_external_id() {
        let (_, repository) = setup().await;

        let author = repository
            .insert_author(AuthorInsert {
                external_id: Some(""),
                ..ana()
            })
            .await
            .unwrap();
        assert_eq!(author.external_id, None);
        assert_eq!(
            repository.get_author(&author.id).await.unwrap(),
            Some(author.clone())
        );

        repository
            .update_author(AuthorUpdate {
                id: &author.id,
                name: "Ana",
                email: "ana@example.com",
                external_id: Some(""),
            })
            .await
            .unwrap();
        assert_eq!(
            repository.get_author(&author.id).await.unwrap(),
            Some(author)
        );
    }
}
