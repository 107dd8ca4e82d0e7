//! Shared fixtures for integration tests: a temp-dir database and row seeders.

#![allow(dead_code)]

use board_insights::db::Database;
use sqlx::SqlitePool;
use tempfile::TempDir;

pub async fn setup_db() -> (Database, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.sqlite");
    let db = Database::new(&db_path)
        .await
        .expect("Failed to create database");
    (db, temp_dir)
}

pub async fn insert_user(pool: &SqlitePool, id: i64, first_name: &str, email: Option<&str>) {
    sqlx::query("INSERT INTO users (id, first_name, last_name) VALUES (?, ?, 'Tester')")
        .bind(id)
        .bind(first_name)
        .execute(pool)
        .await
        .expect("Failed to insert user");

    if let Some(email) = email {
        sqlx::query("INSERT INTO user_emails (user_id, email, is_primary) VALUES (?, ?, 1)")
            .bind(id)
            .bind(email)
            .execute(pool)
            .await
            .expect("Failed to insert email");
    }
}

pub async fn insert_token(pool: &SqlitePool, user_id: i64, token: &str) {
    sqlx::query("INSERT INTO auth_tokens (user_id, token) VALUES (?, ?)")
        .bind(user_id)
        .bind(token)
        .execute(pool)
        .await
        .expect("Failed to insert token");
}

pub async fn insert_category(pool: &SqlitePool, id: i64, organization_id: i64, deleted: bool) {
    sqlx::query(
        "INSERT INTO organization_categories (id, organization_id, name, deleted) VALUES (?, ?, 'General', ?)",
    )
    .bind(id)
    .bind(organization_id)
    .bind(deleted)
    .execute(pool)
    .await
    .expect("Failed to insert category");
}

/// A live, active board with no organization.
pub async fn insert_board(pool: &SqlitePool, id: i64, title: &str, owner_id: i64) {
    insert_org_board(pool, id, title, owner_id, None, None, 1).await;
}

pub async fn insert_org_board(
    pool: &SqlitePool,
    id: i64,
    title: &str,
    owner_id: i64,
    organization_id: Option<i64>,
    category_id: Option<i64>,
    status: i64,
) {
    sqlx::query(
        r"
        INSERT INTO boards (id, title, user_id, organization_id, organization_category_id, status)
        VALUES (?, ?, ?, ?, ?, ?)
        ",
    )
    .bind(id)
    .bind(title)
    .bind(owner_id)
    .bind(organization_id)
    .bind(category_id)
    .bind(status)
    .execute(pool)
    .await
    .expect("Failed to insert board");
}

pub async fn delete_board(pool: &SqlitePool, id: i64) {
    sqlx::query("UPDATE boards SET deleted = 1 WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .expect("Failed to delete board");
}

pub async fn follow(pool: &SqlitePool, board_id: i64, user_id: i64, status: i64) {
    sqlx::query("INSERT INTO board_followers (board_id, user_id, status) VALUES (?, ?, ?)")
        .bind(board_id)
        .bind(user_id)
        .bind(status)
        .execute(pool)
        .await
        .expect("Failed to insert follower");
}

pub async fn add_admin(pool: &SqlitePool, board_id: i64, user_id: i64, status: i64) {
    sqlx::query("INSERT INTO board_admins (board_id, user_id, status) VALUES (?, ?, ?)")
        .bind(board_id)
        .bind(user_id)
        .bind(status)
        .execute(pool)
        .await
        .expect("Failed to insert admin");
}

pub async fn insert_points_type(pool: &SqlitePool, id: i64, deleted: bool) {
    sqlx::query("INSERT INTO points_types (id, name, deleted) VALUES (?, 'vote', ?)")
        .bind(id)
        .bind(deleted)
        .execute(pool)
        .await
        .expect("Failed to insert points type");
}

pub async fn award(
    pool: &SqlitePool,
    user_id: i64,
    board_id: i64,
    points_type_id: i64,
    points: i64,
    deleted: bool,
) {
    sqlx::query(
        r"
        INSERT INTO users_points (user_id, board_id, points_type_id, points, deleted)
        VALUES (?, ?, ?, ?, ?)
        ",
    )
    .bind(user_id)
    .bind(board_id)
    .bind(points_type_id)
    .bind(points)
    .bind(deleted)
    .execute(pool)
    .await
    .expect("Failed to insert points");
}

#[derive(Default)]
pub struct PinRow<'a> {
    pub id: i64,
    pub board_id: i64,
    pub user_id: i64,
    pub title: Option<&'a str>,
    pub user_note: Option<&'a str>,
    pub body: Option<&'a str>,
    pub url_web: Option<&'a str>,
    pub deleted: bool,
}

pub async fn insert_pin(pool: &SqlitePool, pin: PinRow<'_>) {
    sqlx::query(
        r"
        INSERT INTO pins (id, board_id, user_id, title, user_note, body, url_web, deleted)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        ",
    )
    .bind(pin.id)
    .bind(pin.board_id)
    .bind(pin.user_id)
    .bind(pin.title)
    .bind(pin.user_note)
    .bind(pin.body)
    .bind(pin.url_web)
    .bind(pin.deleted)
    .execute(pool)
    .await
    .expect("Failed to insert pin");
}

/// A live pin with only a title.
pub async fn insert_simple_pin(pool: &SqlitePool, id: i64, board_id: i64, user_id: i64) {
    insert_pin(
        pool,
        PinRow {
            id,
            board_id,
            user_id,
            title: Some("Pinned"),
            ..PinRow::default()
        },
    )
    .await;
}

pub async fn insert_comment(
    pool: &SqlitePool,
    id: i64,
    pin_id: i64,
    user_id: i64,
    body: &str,
    deleted: bool,
) {
    sqlx::query("INSERT INTO comments (id, pin_id, user_id, body, deleted) VALUES (?, ?, ?, ?, ?)")
        .bind(id)
        .bind(pin_id)
        .bind(user_id)
        .bind(body)
        .bind(deleted)
        .execute(pool)
        .await
        .expect("Failed to insert comment");
}

pub async fn insert_pin_vote(pool: &SqlitePool, id: i64, pin_id: i64, user_id: i64) {
    sqlx::query("INSERT INTO pin_votes (id, pin_id, user_id) VALUES (?, ?, ?)")
        .bind(id)
        .bind(pin_id)
        .bind(user_id)
        .execute(pool)
        .await
        .expect("Failed to insert pin vote");
}

pub async fn insert_comment_vote(
    pool: &SqlitePool,
    id: i64,
    comment_id: i64,
    pin_id: i64,
    user_id: i64,
    deleted: bool,
) {
    sqlx::query(
        "INSERT INTO comment_votes (id, comment_id, pin_id, user_id, deleted) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(comment_id)
    .bind(pin_id)
    .bind(user_id)
    .bind(deleted)
    .execute(pool)
    .await
    .expect("Failed to insert comment vote");
}
