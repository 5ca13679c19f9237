use std::sync::Arc;

use remark_common::id::generator::IdGenerator;
use remark_service::{
    author::repository::{AuthorInsert, AuthorRepository},
    comment::repository::{CommentInsert, CommentRepository},
    create_repositories,
    error::AppError,
    model::{AuthorId, CommentId, comment::CommentListQuery},
    schema,
};
use remark_store::{executor::sqlite::SqliteExecutor, testing::RecordingExecutor};

async fn setup() -> (Arc<RecordingExecutor>, AuthorRepository, CommentRepository) {
    let sqlite = SqliteExecutor::open_memory().unwrap();
    schema::migrate(&sqlite).await.unwrap();
    let executor = RecordingExecutor::new(Arc::new(sqlite));
    let (authors, comments) = create_repositories(executor.clone(), Arc::new(IdGenerator::new()));
    (executor, authors, comments)
}

#[tokio::test]
async fn comment_lifecycle() {
    let (executor, authors, comments) = setup().await;

    let ana = authors
        .insert_author(AuthorInsert {
            name: "Ana",
            email: "a@x",
            external_id: None,
        })
        .await
        .unwrap();

    let c1 = comments
        .insert_comment(CommentInsert {
            author_id: &ana.id,
            content: "Hi",
            page_id: "p1",
            comment_id: None,
        })
        .await
        .unwrap();
    assert_eq!(c1.author_id, ana.id);
    assert_eq!(c1.content, "Hi");
    assert_eq!(c1.comment_id, None);

    executor.clear();
    let listed = comments
        .list_comments(&CommentListQuery::for_page("p1"))
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].comment, c1);
    assert_eq!(listed[0].author.as_ref(), Some(&ana));
    assert_eq!(executor.call_count(), 2);

    let json = serde_json::to_value(&listed[0]).unwrap();
    assert_eq!(json["page_id"], "p1");
    assert_eq!(json["author"]["name"], "Ana");
    assert!(json["author"]["external_id"].is_null());

    authors.delete_author(&ana.id).await.unwrap();

    executor.clear();
    let listed = comments
        .list_comments(&CommentListQuery::for_page("p1"))
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].comment.id, c1.id);
    assert_eq!(listed[0].author, None);
    assert_eq!(executor.call_count(), 2);

    assert!(matches!(
        comments.get_comment(&c1.id).await,
        Err(AppError::AuthorNotFound(id)) if id == ana.id
    ));
}

#[tokio::test]
async fn absent_ids() {
    let (_, authors, comments) = setup().await;

    assert!(authors.list_authors().await.unwrap().is_empty());
    authors
        .delete_author(&AuthorId::new("missing"))
        .await
        .unwrap();
    comments
        .delete_comment(&CommentId::new("missing"))
        .await
        .unwrap();
    assert!(authors.list_authors().await.unwrap().is_empty());
    assert!(
        comments
            .list_comments(&CommentListQuery::default())
            .await
            .unwrap()
            .is_empty()
    );

    let err = comments
        .get_comment(&CommentId::new("missing"))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    assert!(matches!(err, AppError::CommentNotFound(_)));
}

#[tokio::test]
async fn ids_follow_insert_order() {
    let (_, authors, comments) = setup().await;
    let ana = authors
        .insert_author(AuthorInsert {
            name: "Ana",
            email: "a@x",
            external_id: Some("ext"),
        })
        .await
        .unwrap();

    let mut previous: Option<CommentId> = None;
    for n in 0..20 {
        let comment = comments
            .insert_comment(CommentInsert {
                author_id: &ana.id,
                content: &format!("comment {n}"),
                page_id: "p1",
                comment_id: Some("thread"),
            })
            .await
            .unwrap();
        if let Some(previous) = previous {
            assert!(previous < comment.id);
        }
        previous = Some(comment.id);
    }

    let listed = comments
        .list_comments(&CommentListQuery {
            comment_id: Some("thread".into()),
            limit: Some(5),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(listed.len(), 5);
    assert!(
        listed
            .iter()
            .all(|enriched| enriched.author.as_ref().map(|author| &author.id) == Some(&ana.id))
    );
}
