use remark_store::{error::StoreError, row::Row};
use serde::{Deserialize, Serialize};

use super::{AuthorId, CommentId, author::Author, get_optional_non_empty};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub author_id: AuthorId,
    pub content: String,
    pub page_id: String,
    /// Caller-defined grouping key. Only used for filtering.
    pub comment_id: Option<String>,
}

impl Comment {
    pub const TABLE: &str = "comments";
    pub const COLUMNS: [&str; 5] = ["id", "author_id", "content", "comment_id", "page_id"];
}

impl TryFrom<&Row> for Comment {
    type Error = StoreError;

    fn try_from(row: &Row) -> Result<Self, Self::Error> {
        Ok(Self {
            id: CommentId::new(row.get_string("id")?),
            author_id: AuthorId::new(row.get_string("author_id")?),
            content: row.get_string("content")?,
            page_id: row.get_string("page_id")?,
            comment_id: get_optional_non_empty(row, "comment_id")?,
        })
    }
}

/// Comment with its author resolved.
///
/// The author is `None` when the referenced author no longer exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedComment {
    #[serde(flatten)]
    pub comment: Comment,
    pub author: Option<Author>,
}

/// Filters and pagination for listing comments.
///
/// Empty strings are treated the same as absent filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentListQuery {
    pub author_id: Option<AuthorId>,
    pub page_id: Option<String>,
    pub comment_id: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl CommentListQuery {
    pub fn for_page<S: Into<String>>(page_id: S) -> Self {
        Self {
            page_id: Some(page_id.into()),
            ..Default::default()
        }
    }
}
