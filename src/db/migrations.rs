use anyhow::{Context, Result};
use sqlx::SqlitePool;
use tracing::debug;

/// Run all pending migrations.
pub async fn run(pool: &SqlitePool) -> Result<()> {
    create_migration_table(pool).await?;
    let current_version = get_schema_version(pool).await?;

    if current_version < 1 {
        debug!("Running migration v1");
        run_migration_v1(pool).await?;
        set_schema_version(pool, 1).await?;
    }

    Ok(())
}

async fn create_migration_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS _schema_version (
            version INTEGER PRIMARY KEY
        )
        ",
    )
    .execute(pool)
    .await
    .context("Failed to create schema version table")?;

    Ok(())
}

async fn get_schema_version(pool: &SqlitePool) -> Result<i32> {
    let row: Option<(i32,)> = sqlx::query_as("SELECT version FROM _schema_version LIMIT 1")
        .fetch_optional(pool)
        .await
        .context("Failed to get schema version")?;

    Ok(row.map_or(0, |(v,)| v))
}

async fn set_schema_version(pool: &SqlitePool, version: i32) -> Result<()> {
    sqlx::query("DELETE FROM _schema_version")
        .execute(pool)
        .await?;
    sqlx::query("INSERT INTO _schema_version (version) VALUES (?)")
        .bind(version)
        .execute(pool)
        .await?;
    Ok(())
}

/// Statements for the initial board-store schema, one table per statement.
const V1_STATEMENTS: &[&str] = &[
    r"
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY,
        first_name TEXT,
        last_name TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS user_emails (
        id INTEGER PRIMARY KEY,
        user_id INTEGER NOT NULL REFERENCES users(id),
        email TEXT NOT NULL,
        is_primary INTEGER NOT NULL DEFAULT 0
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS auth_tokens (
        id INTEGER PRIMARY KEY,
        user_id INTEGER NOT NULL REFERENCES users(id),
        token TEXT NOT NULL UNIQUE,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS organization_categories (
        id INTEGER PRIMARY KEY,
        organization_id INTEGER NOT NULL,
        name TEXT NOT NULL,
        deleted INTEGER NOT NULL DEFAULT 0
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS boards (
        id INTEGER PRIMARY KEY,
        title TEXT NOT NULL,
        user_id INTEGER NOT NULL,
        organization_id INTEGER,
        organization_category_id INTEGER,
        status INTEGER NOT NULL DEFAULT 1,
        deleted INTEGER NOT NULL DEFAULT 0
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS board_followers (
        id INTEGER PRIMARY KEY,
        board_id INTEGER NOT NULL REFERENCES boards(id),
        user_id INTEGER NOT NULL,
        status INTEGER NOT NULL DEFAULT 0
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS board_admins (
        id INTEGER PRIMARY KEY,
        board_id INTEGER NOT NULL REFERENCES boards(id),
        user_id INTEGER NOT NULL,
        status INTEGER NOT NULL DEFAULT 1
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS points_types (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        deleted INTEGER NOT NULL DEFAULT 0
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS users_points (
        id INTEGER PRIMARY KEY,
        user_id INTEGER NOT NULL,
        board_id INTEGER NOT NULL,
        points_type_id INTEGER NOT NULL REFERENCES points_types(id),
        points INTEGER NOT NULL,
        deleted INTEGER NOT NULL DEFAULT 0
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS pins (
        id INTEGER PRIMARY KEY,
        board_id INTEGER NOT NULL REFERENCES boards(id),
        user_id INTEGER NOT NULL,
        title TEXT,
        user_note TEXT,
        body TEXT,
        url_web TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        deleted INTEGER NOT NULL DEFAULT 0
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS comments (
        id INTEGER PRIMARY KEY,
        pin_id INTEGER NOT NULL REFERENCES pins(id),
        user_id INTEGER NOT NULL,
        body TEXT NOT NULL DEFAULT '',
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        deleted INTEGER NOT NULL DEFAULT 0
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS pin_votes (
        id INTEGER PRIMARY KEY,
        pin_id INTEGER NOT NULL REFERENCES pins(id),
        user_id INTEGER NOT NULL
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS comment_votes (
        id INTEGER PRIMARY KEY,
        comment_id INTEGER NOT NULL REFERENCES comments(id),
        pin_id INTEGER NOT NULL REFERENCES pins(id),
        user_id INTEGER NOT NULL,
        deleted INTEGER NOT NULL DEFAULT 0
    )
    ",
    "CREATE INDEX IF NOT EXISTS idx_pins_board ON pins(board_id, deleted)",
    "CREATE INDEX IF NOT EXISTS idx_comments_pin ON comments(pin_id, deleted)",
    "CREATE INDEX IF NOT EXISTS idx_users_points_board ON users_points(board_id, user_id)",
    "CREATE INDEX IF NOT EXISTS idx_board_followers_user ON board_followers(user_id, board_id)",
];

async fn run_migration_v1(pool: &SqlitePool) -> Result<()> {
    debug!("Running migration v1: creating board store schema");

    let mut tx = pool.begin().await.context("Failed to begin migration v1")?;
    for statement in V1_STATEMENTS {
        sqlx::query(statement)
            .execute(&mut *tx)
            .await
            .context("Failed to apply migration v1 statement")?;
    }
    tx.commit().await.context("Failed to commit migration v1")?;

    Ok(())
}
