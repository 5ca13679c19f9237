//! Authors and page comments for an embeddable comment widget.
//!
//! Repositories talk to the store through an explicitly passed
//! [`QueryExecutorArc`]. Listing comments resolves their authors with a single
//! batched lookup.

pub mod author;
pub mod comment;
pub mod config;
pub mod error;
pub mod model;
pub mod schema;
pub mod tracing;

use author::repository::AuthorRepository;
use comment::repository::CommentRepository;
use remark_common::id::generator::IdGeneratorArc;
use remark_store::executor::QueryExecutorArc;

/// Creates the author and comment repositories over one executor.
pub fn create_repositories(
    executor: QueryExecutorArc,
    id_generator: IdGeneratorArc,
) -> (AuthorRepository, CommentRepository) {
    let author_repository = AuthorRepository::new(executor.clone(), id_generator.clone());
    let comment_repository =
        CommentRepository::new(executor, id_generator, author_repository.clone());
    (author_repository, comment_repository)
}
