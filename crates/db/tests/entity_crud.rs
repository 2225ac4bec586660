//! Integration tests for the repository layer against a real database:
//! user uniqueness, post CRUD, and the session lifecycle.

use assert_matches::assert_matches;
use chrono::{Duration, Utc};
use sqlx::PgPool;

use lireddit_db::is_unique_violation;
use lireddit_db::models::post::CreatePost;
use lireddit_db::models::session::CreateSession;
use lireddit_db::models::user::CreateUser;
use lireddit_db::repositories::{PostRepo, SessionRepo, UserRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_user(username: &str) -> CreateUser {
    CreateUser {
        username: username.to_string(),
        password_hash: "$argon2id$fake-hash-for-tests".to_string(),
    }
}

fn new_session(token_hash: &str, ttl: Duration) -> CreateSession {
    CreateSession {
        token_hash: token_hash.to_string(),
        user_id: None,
        expires_at: Utc::now() + ttl,
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn test_user_create_and_find(pool: PgPool) {
    let created = UserRepo::create(&pool, &new_user("alice"))
        .await
        .expect("create should succeed");
    assert_eq!(created.username, "alice");

    let by_id = UserRepo::find_by_id(&pool, created.id)
        .await
        .expect("lookup should succeed")
        .expect("row must exist");
    assert_eq!(by_id.username, "alice");

    let by_name = UserRepo::find_by_username(&pool, "alice")
        .await
        .expect("lookup should succeed")
        .expect("row must exist");
    assert_eq!(by_name.id, created.id);

    // Username matching is exact.
    let missing = UserRepo::find_by_username(&pool, "Alice")
        .await
        .expect("lookup should succeed");
    assert!(missing.is_none());
}

#[sqlx::test]
async fn test_duplicate_username_is_unique_violation(pool: PgPool) {
    UserRepo::create(&pool, &new_user("alice"))
        .await
        .expect("first create should succeed");

    let err = UserRepo::create(&pool, &new_user("alice"))
        .await
        .expect_err("duplicate username must fail");

    assert_matches!(err, sqlx::Error::Database(_));
    assert!(is_unique_violation(&err), "must be recognized as 23505");
}

#[sqlx::test]
async fn test_other_errors_are_not_unique_violations(pool: PgPool) {
    let err = sqlx::query("SELECT * FROM no_such_table")
        .execute(&pool)
        .await
        .expect_err("query must fail");
    assert!(!is_unique_violation(&err));
}

// ---------------------------------------------------------------------------
// Posts
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn test_post_crud(pool: PgPool) {
    let first = PostRepo::create(&pool, &CreatePost { title: "first".into() })
        .await
        .expect("create should succeed");
    assert_eq!(first.created_at, first.updated_at);

    let second = PostRepo::create(&pool, &CreatePost { title: "second".into() })
        .await
        .expect("create should succeed");

    let all = PostRepo::list(&pool).await.expect("list should succeed");
    assert_eq!(
        all.iter().map(|p| p.id).collect::<Vec<_>>(),
        vec![first.id, second.id],
        "list must be id ascending"
    );

    // Give the database clock room to move before the update.
    std::thread::sleep(std::time::Duration::from_millis(5));

    let updated = PostRepo::update_title(&pool, first.id, "renamed")
        .await
        .expect("update should succeed")
        .expect("row must exist");
    assert_eq!(updated.title, "renamed");
    assert!(updated.updated_at > first.updated_at);
    assert_eq!(updated.created_at, first.created_at);

    let missing = PostRepo::update_title(&pool, 9999, "x")
        .await
        .expect("update should succeed");
    assert!(missing.is_none());

    assert!(PostRepo::delete(&pool, first.id).await.expect("delete should succeed"));
    assert!(PostRepo::find_by_id(&pool, first.id)
        .await
        .expect("lookup should succeed")
        .is_none());
    assert!(!PostRepo::delete(&pool, first.id).await.expect("delete should succeed"));
}

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn test_session_lifecycle(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("alice"))
        .await
        .expect("create should succeed");

    let session = SessionRepo::create(&pool, &new_session("hash-a", Duration::days(3650)))
        .await
        .expect("create should succeed");
    assert!(session.user_id.is_none());

    let found = SessionRepo::find_by_token_hash(&pool, "hash-a")
        .await
        .expect("lookup should succeed")
        .expect("row must exist");
    assert_eq!(found.id, session.id);

    let updated = SessionRepo::set_user(&pool, session.id, Some(user.id))
        .await
        .expect("update should succeed");
    assert!(updated);

    let found = SessionRepo::find_by_token_hash(&pool, "hash-a")
        .await
        .expect("lookup should succeed")
        .expect("row must exist");
    assert_eq!(found.user_id, Some(user.id));
}

#[sqlx::test]
async fn test_expired_sessions_are_invisible_and_swept(pool: PgPool) {
    SessionRepo::create(&pool, &new_session("hash-live", Duration::days(1)))
        .await
        .expect("create should succeed");
    SessionRepo::create(&pool, &new_session("hash-dead", Duration::days(-1)))
        .await
        .expect("create should succeed");

    let dead = SessionRepo::find_by_token_hash(&pool, "hash-dead")
        .await
        .expect("lookup should succeed");
    assert!(dead.is_none(), "expired sessions must not resolve");

    let removed = SessionRepo::cleanup_expired(&pool)
        .await
        .expect("cleanup should succeed");
    assert_eq!(removed, 1);

    let live = SessionRepo::find_by_token_hash(&pool, "hash-live")
        .await
        .expect("lookup should succeed");
    assert!(live.is_some(), "live sessions must survive the sweep");
}

#[sqlx::test]
async fn test_deleting_a_user_cascades_to_sessions(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("alice"))
        .await
        .expect("create should succeed");

    let mut input = new_session("hash-a", Duration::days(1));
    input.user_id = Some(user.id);
    SessionRepo::create(&pool, &input)
        .await
        .expect("create should succeed");

    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(user.id)
        .execute(&pool)
        .await
        .expect("delete should succeed");

    let gone = SessionRepo::find_by_token_hash(&pool, "hash-a")
        .await
        .expect("lookup should succeed");
    assert!(gone.is_none());
}
