//! Integration tests for the Diesel adapters against a temporary SQLite file.

use std::sync::Arc;

use backend::domain::ports::{
    CommentRepository, PersistenceError, PostRepository, SchemaMigrator, UserRepository,
};
use backend::domain::{
    CommentDraft, ExternalProfile, IdentityLinkingService, Post, PostDraft, UserDraft,
};
use backend::outbound::persistence::{DbPool, DieselBlogStore, DieselUserRepository, PoolConfig};
use diesel::prelude::*;
use diesel::sql_types::BigInt;
use rstest::{fixture, rstest};
use tempfile::TempDir;

struct TestDb {
    _dir: TempDir,
    url: String,
    pool: DbPool,
}

impl TestDb {
    fn store(&self) -> DieselBlogStore {
        DieselBlogStore::new(self.pool.clone())
    }

    fn users(&self) -> DieselUserRepository {
        DieselUserRepository::new(self.pool.clone())
    }

    fn count(&self, table: &str) -> i64 {
        #[derive(QueryableByName)]
        struct Count {
            #[diesel(sql_type = BigInt)]
            count: i64,
        }
        let mut conn = SqliteConnection::establish(&self.url).expect("open sqlite");
        diesel::sql_query(format!("SELECT COUNT(*) AS count FROM {table}"))
            .get_result::<Count>(&mut conn)
            .expect("count rows")
            .count
    }
}

#[fixture]
fn db() -> TestDb {
    let dir = TempDir::new().expect("temp dir");
    let url = dir
        .path()
        .join("blog.db")
        .to_str()
        .expect("utf-8 path")
        .to_owned();
    let pool = DbPool::new(&PoolConfig::new(url.as_str()).with_max_size(4)).expect("pool");
    TestDb {
        _dir: dir,
        url,
        pool,
    }
}

async fn migrated(db: &TestDb) -> DieselBlogStore {
    let store = db.store();
    store.create_schema().await.expect("create schema");
    store
}

fn draft(user_id: i32, title: &str) -> PostDraft {
    PostDraft::try_new(user_id, title, "body text").expect("post draft")
}

#[rstest]
#[tokio::test]
async fn saved_post_round_trips(db: TestDb) {
    let store = migrated(&db).await;
    let saved = store.save_post(&draft(1, "t")).await.expect("save");
    assert!(saved.id > 0);

    let fetched = store.get_post(saved.id).await.expect("get");
    assert_eq!(fetched, saved);
    assert_eq!(store.get_posts().await.expect("list"), vec![saved]);
}

#[rstest]
#[tokio::test]
async fn explicit_ids_are_kept_and_duplicates_conflict(db: TestDb) {
    let store = migrated(&db).await;
    let mut explicit = draft(7, "seeded");
    explicit.id = Some(61);
    let saved = store.save_post(&explicit).await.expect("save");
    assert_eq!(saved.id, 61);

    let err = store.save_post(&explicit).await.expect_err("duplicate id");
    assert!(matches!(err, PersistenceError::Conflict { .. }), "{err:?}");
}

#[rstest]
#[tokio::test]
async fn missing_rows_are_not_found(db: TestDb) {
    let store = migrated(&db).await;
    assert!(matches!(
        store.get_post(999).await,
        Err(PersistenceError::NotFound { .. })
    ));
    assert!(matches!(
        store.get_comment(999).await,
        Err(PersistenceError::NotFound { .. })
    ));
    assert!(matches!(
        store.delete_post(999).await,
        Err(PersistenceError::NotFound { .. })
    ));
    let ghost = Post {
        user_id: 1,
        id: 999,
        title: "t".to_owned(),
        body: "b".to_owned(),
    };
    assert!(matches!(
        store.update_post(&ghost).await,
        Err(PersistenceError::NotFound { .. })
    ));
    assert!(store.get_posts().await.expect("list").is_empty());
}

#[rstest]
#[tokio::test]
async fn update_replaces_content_and_keeps_identity(db: TestDb) {
    let store = migrated(&db).await;
    let saved = store.save_post(&draft(1, "old")).await.expect("save");
    let updated = store
        .update_post(&Post {
            title: "new".to_owned(),
            user_id: 2,
            ..saved.clone()
        })
        .await
        .expect("update");
    assert_eq!(updated.id, saved.id);
    assert_eq!(store.get_post(saved.id).await.expect("get").title, "new");
    assert_eq!(db.count("posts"), 1);
}

#[rstest]
#[tokio::test]
async fn delete_cascades_to_comments(db: TestDb) {
    let store = migrated(&db).await;
    let doomed = store.save_post(&draft(1, "doomed")).await.expect("save");
    let kept = store.save_post(&draft(1, "kept")).await.expect("save");
    let mut doomed_comments = Vec::new();
    for body in ["one", "two"] {
        let comment = CommentDraft::try_new(doomed.id, "n", "e@x", body).expect("draft");
        doomed_comments.push(store.save_comment(&comment).await.expect("save comment"));
    }
    let survivor = store
        .save_comment(&CommentDraft::try_new(kept.id, "n", "e@x", "stay").expect("draft"))
        .await
        .expect("save comment");

    store.delete_post(doomed.id).await.expect("delete");

    assert!(matches!(
        store.get_post(doomed.id).await,
        Err(PersistenceError::NotFound { .. })
    ));
    for comment in doomed_comments {
        assert!(matches!(
            store.get_comment(comment.id).await,
            Err(PersistenceError::NotFound { .. })
        ));
    }
    assert_eq!(store.get_comments().await.expect("list"), vec![survivor]);
}

#[rstest]
#[tokio::test]
async fn comments_filter_by_post(db: TestDb) {
    let store = migrated(&db).await;
    let first = store.save_post(&draft(1, "first")).await.expect("save");
    let second = store.save_post(&draft(1, "second")).await.expect("save");
    for (post_id, body) in [(first.id, "a"), (second.id, "b"), (first.id, "c")] {
        let comment = CommentDraft::try_new(post_id, "n", "e@x", body).expect("draft");
        store.save_comment(&comment).await.expect("save comment");
    }

    let on_first = store.get_comments_by_post_id(first.id).await.expect("filter");
    assert_eq!(on_first.len(), 2);
    assert!(on_first.iter().all(|comment| comment.post_id == first.id));
    assert!(store.get_comments_by_post_id(404).await.expect("filter").is_empty());
}

#[rstest]
#[tokio::test]
async fn comment_on_missing_post_is_a_query_error(db: TestDb) {
    let store = migrated(&db).await;
    let orphan = CommentDraft::try_new(404, "n", "e@x", "b").expect("draft");
    let err = store.save_comment(&orphan).await.expect_err("foreign key");
    assert!(matches!(err, PersistenceError::Query { .. }), "{err:?}");
}

#[rstest]
#[tokio::test]
async fn create_schema_is_idempotent(db: TestDb) {
    let store = migrated(&db).await;
    let saved = store.save_post(&draft(1, "t")).await.expect("save");
    store.create_schema().await.expect("second run");
    assert_eq!(store.get_post(saved.id).await.expect("get"), saved);
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_logins_share_one_user(db: TestDb) {
    migrated(&db).await;
    let service = IdentityLinkingService::new(Arc::new(db.users()));
    let profile = ExternalProfile {
        external_id: "fb-42".to_owned(),
        email: "ada@example.com".to_owned(),
        name: "Ada".to_owned(),
    };

    let mut handles = Vec::new();
    for _ in 0..8 {
        let service = service.clone();
        let profile = profile.clone();
        handles.push(tokio::spawn(async move {
            service.resolve_external_user("facebook", &profile).await
        }));
    }
    let mut ids = Vec::new();
    for handle in handles {
        ids.push(handle.await.expect("join").expect("resolve").id);
    }
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 1);
    assert_eq!(db.count("external_identities"), 1);
    assert_eq!(db.count("users"), 1);

    let linked = db
        .users()
        .find_external_identity("facebook", "fb-42")
        .await
        .expect("lookup")
        .expect("identity");
    assert_eq!(ids.first().copied(), Some(linked.user_id()));
}

#[rstest]
#[tokio::test]
async fn saved_users_get_ids_and_reject_duplicates(db: TestDb) {
    migrated(&db).await;
    let users = db.users();
    let mut user_draft = UserDraft {
        id: None,
        email: "ada@example.com".to_owned(),
        name: "Ada".to_owned(),
    };
    let assigned = users.save_user(&user_draft).await.expect("save user");
    assert!(assigned.id > 0);
    assert_eq!(
        users.find_user(assigned.id).await.expect("find"),
        Some(assigned.clone())
    );

    user_draft.id = Some(assigned.id);
    user_draft.email = "grace@example.com".to_owned();
    let err = users.save_user(&user_draft).await.expect_err("duplicate id");
    assert!(matches!(err, PersistenceError::Conflict { .. }), "{err:?}");
    assert_eq!(db.count("users"), 1);
}

#[rstest]
#[tokio::test]
async fn providers_namespace_external_ids(db: TestDb) {
    migrated(&db).await;
    let users = db.users();
    let profile = ExternalProfile {
        external_id: "123".to_owned(),
        email: "ada@example.com".to_owned(),
        name: "Ada".to_owned(),
    };
    let google = users.link_external_identity("google", &profile).await.expect("link");
    let facebook = users.link_external_identity("facebook", &profile).await.expect("link");
    assert_ne!(google.id, facebook.id);
    assert_eq!(
        users.find_user(google.id).await.expect("find"),
        Some(google)
    );
}
