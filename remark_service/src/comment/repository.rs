use std::collections::HashMap;

use itertools::Itertools;
use remark_common::id::generator::IdGeneratorArc;
use remark_store::{
    executor::QueryExecutorArc,
    sql::{SqlSelectBuilder, SqlStatement},
};
use tracing::{debug, info};

use crate::{
    author::repository::AuthorRepository,
    error::{AppError, AppResult},
    model::{
        AuthorId, Comment, CommentId, EnrichedComment, comment::CommentListQuery, non_empty,
    },
};

/// Input data for creating a comment.
#[derive(Debug, Clone, Copy)]
pub struct CommentInsert<'a> {
    pub author_id: &'a AuthorId,
    pub content: &'a str,
    pub page_id: &'a str,
    pub comment_id: Option<&'a str>,
}

/// Comment persistence over a query executor.
///
/// Authors are resolved through the author repository sharing the same
/// executor.
#[derive(Debug, Clone)]
pub struct CommentRepository {
    executor: QueryExecutorArc,
    id_generator: IdGeneratorArc,
    author_repository: AuthorRepository,
}

impl CommentRepository {
    pub fn new(
        executor: QueryExecutorArc,
        id_generator: IdGeneratorArc,
        author_repository: AuthorRepository,
    ) -> Self {
        Self {
            executor,
            id_generator,
            author_repository,
        }
    }

    fn select(&self) -> SqlSelectBuilder {
        let mut builder = SqlSelectBuilder::new(self.executor.dialect(), Comment::TABLE);
        builder.set_columns(Comment::COLUMNS);
        builder
    }

    /// Lists comments matching every given filter, each with its author.
    ///
    /// Filters are applied in the order author, page, comment id. Authors are
    /// fetched with one query for all distinct author ids in the page, and no
    /// query at all when nothing matched. Comments whose author no longer
    /// exists get no author.
    ///
    /// # Errors
    ///
    /// Returns an error if either query fails.
    #[tracing::instrument(skip(self))]
    pub async fn list_comments(&self, query: &CommentListQuery) -> AppResult<Vec<EnrichedComment>> {
        let statement = self
            .select()
            .filter_equal_opt(
                "author_id",
                non_empty(query.author_id.as_ref().map(AuthorId::as_str)),
            )
            .filter_equal_opt("page_id", non_empty(query.page_id.as_deref()))
            .filter_equal_opt("comment_id", non_empty(query.comment_id.as_deref()))
            .set_limit(query.limit)
            .set_offset(query.offset)
            .build();

        let output = self.executor.execute_statement(&statement).await?;
        let comments = output
            .rows
            .iter()
            .map(Comment::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        let author_ids: Vec<AuthorId> = comments
            .iter()
            .map(|comment| comment.author_id.clone())
            .unique()
            .collect();
        let authors: HashMap<AuthorId, _> = self
            .author_repository
            .get_authors(&author_ids)
            .await?
            .into_iter()
            .map(|author| (author.id.clone(), author))
            .collect();
        debug!(
            comments = comments.len(),
            authors = authors.len(),
            "resolved comment authors"
        );

        Ok(comments
            .into_iter()
            .map(|comment| {
                let author = authors.get(&comment.author_id).cloned();
                EnrichedComment { comment, author }
            })
            .collect())
    }

    /// Gets a comment by id together with its author.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::CommentNotFound`] for an unknown id and
    /// [`AppError::AuthorNotFound`] if the comment's author does not exist.
    #[tracing::instrument(skip(self))]
    pub async fn get_comment(&self, id: &CommentId) -> AppResult<EnrichedComment> {
        let output = self
            .executor
            .execute_statement(&self.select().filter_equal("id", id).build())
            .await?;
        let comment = output
            .rows
            .first()
            .map(Comment::try_from)
            .transpose()?
            .ok_or_else(|| AppError::CommentNotFound(id.clone()))?;

        let author = self
            .author_repository
            .get_author(&comment.author_id)
            .await?
            .ok_or_else(|| AppError::AuthorNotFound(comment.author_id.clone()))?;

        Ok(EnrichedComment {
            comment,
            author: Some(author),
        })
    }

    /// Creates a comment with a newly generated id.
    ///
    /// The author is not checked to exist. An empty comment id is stored as
    /// absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    #[tracing::instrument(skip(self))]
    pub async fn insert_comment(&self, input: CommentInsert<'_>) -> AppResult<Comment> {
        let comment = Comment {
            id: CommentId::generate(&self.id_generator),
            author_id: input.author_id.clone(),
            content: input.content.to_string(),
            page_id: input.page_id.to_string(),
            comment_id: non_empty(input.comment_id).map(ToString::to_string),
        };

        self.executor
            .execute_statement(&SqlStatement::with_dialect(
                self.executor.dialect(),
                "INSERT INTO comments (id, author_id, content, comment_id, page_id) VALUES (?, ?, ?, ?, ?)",
                vec![
                    (&comment.id).into(),
                    (&comment.author_id).into(),
                    comment.content.as_str().into(),
                    comment.comment_id.as_deref().into(),
                    comment.page_id.as_str().into(),
                ],
            ))
            .await?;

        info!(comment_id = %comment.id, page_id = %comment.page_id, "created comment");
        Ok(comment)
    }

    /// Deletes a comment. Deleting an unknown id is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    #[tracing::instrument(skip(self))]
    pub async fn delete_comment(&self, id: &CommentId) -> AppResult<()> {
        let output = self
            .executor
            .execute_statement(&SqlStatement::with_dialect(
                self.executor.dialect(),
                "DELETE FROM comments WHERE id = ?",
                vec![id.into()],
            ))
            .await?;

        info!(comment_id = %id, changes = output.changes, "deleted comment");
        Ok(())
    }
}
