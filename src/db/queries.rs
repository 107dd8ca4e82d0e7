use anyhow::{Context, Result};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use super::models::{
    AdminBoard, AuthToken, BoardAdmin, BoardFollower, BoardSummary, CommentBody, CommentRef,
    CommentVoteFilter, CommentVoteRef, PinContent, PinRef, PinVoteRef, User, UserPoints,
};
use crate::constants::{
    private_board_title, ADMIN_STATUS_APPROVED, BOARD_STATUS_ACTIVE, BOARD_STATUS_PENDING,
    FOLLOWER_STATUS_ACTIVE,
};

// ========== Query Helpers ==========

/// Append `(?, ?, ...)` binding every id.
fn push_id_list(builder: &mut QueryBuilder<'_, Sqlite>, ids: &[i64]) {
    builder.push("(");
    let mut separated = builder.separated(", ");
    for id in ids {
        separated.push_bind(*id);
    }
    separated.push_unseparated(")");
}

// ========== Users ==========

/// Get the token rows matching an API token.
pub async fn lookup_user_by_token(pool: &SqlitePool, token: &str) -> Result<Vec<AuthToken>> {
    sqlx::query_as("SELECT id, user_id, token, created_at FROM auth_tokens WHERE token = ?")
        .bind(token)
        .fetch_all(pool)
        .await
        .context("Failed to look up auth token")
}

/// Get a user by id.
pub async fn get_user_by_id(pool: &SqlitePool, user_id: i64) -> Result<Option<User>> {
    sqlx::query_as("SELECT id, first_name, last_name, created_at FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_optional(pool)
        .await
        .context("Failed to fetch user by id")
}

// ========== Boards ==========

/// Boards the user follows, excluding deleted boards.
pub async fn get_boards_followed_by_user(
    pool: &SqlitePool,
    user_id: i64,
) -> Result<Vec<BoardSummary>> {
    sqlx::query_as(
        r"
        SELECT b.id AS board_id, b.title, b.user_id AS board_owner_id
        FROM board_followers f
        JOIN boards b ON b.id = f.board_id
        WHERE f.user_id = ? AND b.deleted = 0
        ORDER BY f.id
        ",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
    .context("Failed to fetch boards followed by user")
}

/// Boards the user owns, excluding deleted boards.
pub async fn get_boards_owned_by_user(
    pool: &SqlitePool,
    user_id: i64,
) -> Result<Vec<BoardSummary>> {
    sqlx::query_as(
        r"
        SELECT id AS board_id, title, user_id AS board_owner_id
        FROM boards
        WHERE user_id = ? AND deleted = 0
        ORDER BY id
        ",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
    .context("Failed to fetch boards owned by user")
}

/// Boards on which the user has an admin row, whatever its status.
pub async fn get_boards_admin_by_user(pool: &SqlitePool, user_id: i64) -> Result<Vec<AdminBoard>> {
    sqlx::query_as("SELECT board_id FROM board_admins WHERE user_id = ? ORDER BY id")
        .bind(user_id)
        .fetch_all(pool)
        .await
        .context("Failed to fetch boards administered by user")
}

/// Live boards in an organization that the user owns or actively follows.
///
/// Excludes the user's private bookmarks board and boards whose category is
/// deleted. One row per board, ordered by title.
pub async fn get_boards_owned_or_followed(
    pool: &SqlitePool,
    user_id: i64,
    organization_id: i64,
) -> Result<Vec<BoardSummary>> {
    sqlx::query_as(
        r"
        SELECT b.id AS board_id, b.title, b.user_id AS board_owner_id
        FROM boards b
        INNER JOIN organization_categories cat
            ON b.organization_category_id = cat.id AND cat.deleted = 0
        LEFT JOIN board_followers f ON b.id = f.board_id
        WHERE (b.user_id = ? OR (f.user_id = ? AND f.status = ?))
          AND b.deleted = 0
          AND b.title != ?
          AND b.status IN (?, ?)
          AND b.organization_id = ?
        GROUP BY b.id
        ORDER BY b.title
        ",
    )
    .bind(user_id)
    .bind(user_id)
    .bind(FOLLOWER_STATUS_ACTIVE)
    .bind(private_board_title(user_id))
    .bind(BOARD_STATUS_ACTIVE)
    .bind(BOARD_STATUS_PENDING)
    .bind(organization_id)
    .fetch_all(pool)
    .await
    .context("Failed to fetch boards owned or followed in organization")
}

/// Whether the user owns the (non-deleted) board.
pub async fn is_board_owner(pool: &SqlitePool, user_id: i64, board_id: i64) -> Result<bool> {
    let row: Option<(i64,)> =
        sqlx::query_as("SELECT id FROM boards WHERE user_id = ? AND id = ? AND deleted = 0")
            .bind(user_id)
            .bind(board_id)
            .fetch_optional(pool)
            .await
            .context("Failed to check board ownership")?;

    Ok(row.is_some())
}

/// Approved admins of a board.
pub async fn get_board_admins(pool: &SqlitePool, board_id: i64) -> Result<Vec<BoardAdmin>> {
    sqlx::query_as("SELECT user_id FROM board_admins WHERE board_id = ? AND status = ? ORDER BY id")
        .bind(board_id)
        .bind(ADMIN_STATUS_APPROVED)
        .fetch_all(pool)
        .await
        .context("Failed to fetch board admins")
}

/// Followers of a board with a primary email, each with their live point
/// subtotal on that board.
pub async fn get_board_followers(pool: &SqlitePool, board_id: i64) -> Result<Vec<BoardFollower>> {
    sqlx::query_as(
        r"
        SELECT
            u.id,
            u.first_name,
            u.last_name,
            e.email,
            (
                SELECT SUM(up.points)
                FROM users_points up
                WHERE up.user_id = u.id
                  AND up.deleted = 0
                  AND up.board_id = ?
            ) AS points
        FROM users u
        JOIN board_followers f ON u.id = f.user_id
        LEFT JOIN user_emails e ON e.user_id = u.id
        WHERE f.board_id = ? AND e.is_primary = 1
        ORDER BY f.id
        ",
    )
    .bind(board_id)
    .bind(board_id)
    .fetch_all(pool)
    .await
    .context("Failed to fetch board followers")
}

// ========== Points ==========

/// Per-user point totals on a board, ascending by total.
///
/// Only live records of live points types count. Equal totals are ordered by
/// user id.
pub async fn get_all_points_on_board(pool: &SqlitePool, board_id: i64) -> Result<Vec<UserPoints>> {
    sqlx::query_as(
        r"
        SELECT up.user_id, SUM(up.points) AS total
        FROM users_points up
        JOIN points_types pt ON up.points_type_id = pt.id
        WHERE up.board_id = ?
          AND up.deleted = 0
          AND pt.deleted = 0
        GROUP BY up.user_id
        ORDER BY total, up.user_id
        ",
    )
    .bind(board_id)
    .fetch_all(pool)
    .await
    .context("Failed to aggregate points on board")
}

// ========== Pins ==========

/// Live pins on a board.
pub async fn get_pin_ids_on_board(pool: &SqlitePool, board_id: i64) -> Result<Vec<PinRef>> {
    sqlx::query_as(
        "SELECT id, user_id, created_at FROM pins WHERE board_id = ? AND deleted = 0 ORDER BY id",
    )
    .bind(board_id)
    .fetch_all(pool)
    .await
    .context("Failed to fetch pins on board")
}

/// Live pins a user posted on a board.
pub async fn get_pin_ids_on_board_by_user(
    pool: &SqlitePool,
    board_id: i64,
    user_id: i64,
) -> Result<Vec<PinRef>> {
    sqlx::query_as(
        r"
        SELECT id, user_id, created_at
        FROM pins
        WHERE board_id = ? AND user_id = ? AND deleted = 0
        ORDER BY id
        ",
    )
    .bind(board_id)
    .bind(user_id)
    .fetch_all(pool)
    .await
    .context("Failed to fetch pins on board by user")
}

/// Text columns of the live pins on a board.
pub async fn get_pin_contents_on_board(
    pool: &SqlitePool,
    board_id: i64,
) -> Result<Vec<PinContent>> {
    sqlx::query_as(
        r"
        SELECT id, board_id, title, user_note, body, url_web
        FROM pins
        WHERE board_id = ? AND deleted = 0
        ORDER BY id
        ",
    )
    .bind(board_id)
    .fetch_all(pool)
    .await
    .context("Failed to fetch pin contents on board")
}

// ========== Comments ==========
//
// Comments reference boards only through their pin, so board-scoped lookups
// take the pin ids resolved beforehand.

/// Live comments on any of the given pins.
pub async fn get_comment_ids_on_pins(pool: &SqlitePool, pin_ids: &[i64]) -> Result<Vec<CommentRef>> {
    if pin_ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut builder = QueryBuilder::<Sqlite>::new(
        "SELECT id, user_id, pin_id, created_at FROM comments WHERE deleted = 0 AND pin_id IN ",
    );
    push_id_list(&mut builder, pin_ids);
    builder.push(" ORDER BY id");

    builder
        .build_query_as::<CommentRef>()
        .fetch_all(pool)
        .await
        .context("Failed to fetch comments on pins")
}

/// Live comments by one user on any of the given pins.
pub async fn get_comment_ids_on_pins_by_user(
    pool: &SqlitePool,
    pin_ids: &[i64],
    user_id: i64,
) -> Result<Vec<CommentRef>> {
    if pin_ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut builder = QueryBuilder::<Sqlite>::new(
        "SELECT id, user_id, pin_id, created_at FROM comments WHERE deleted = 0 AND user_id = ",
    );
    builder.push_bind(user_id);
    builder.push(" AND pin_id IN ");
    push_id_list(&mut builder, pin_ids);
    builder.push(" ORDER BY id");

    builder
        .build_query_as::<CommentRef>()
        .fetch_all(pool)
        .await
        .context("Failed to fetch comments on pins by user")
}

/// Bodies of live comments on the given pins, grouped by pin in comment order.
pub async fn get_comment_bodies_on_pins(
    pool: &SqlitePool,
    pin_ids: &[i64],
) -> Result<Vec<CommentBody>> {
    if pin_ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut builder =
        QueryBuilder::<Sqlite>::new("SELECT pin_id, body FROM comments WHERE deleted = 0 AND pin_id IN ");
    push_id_list(&mut builder, pin_ids);
    builder.push(" ORDER BY pin_id, id");

    builder
        .build_query_as::<CommentBody>()
        .fetch_all(pool)
        .await
        .context("Failed to fetch comment bodies on pins")
}

// ========== Votes ==========

/// Votes on any of the given pins.
pub async fn get_pin_votes_on_pins(pool: &SqlitePool, pin_ids: &[i64]) -> Result<Vec<PinVoteRef>> {
    if pin_ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut builder =
        QueryBuilder::<Sqlite>::new("SELECT id, user_id, pin_id FROM pin_votes WHERE pin_id IN ");
    push_id_list(&mut builder, pin_ids);
    builder.push(" ORDER BY id");

    builder
        .build_query_as::<PinVoteRef>()
        .fetch_all(pool)
        .await
        .context("Failed to fetch pin votes")
}

/// Votes on comments attached to any of the given pins.
///
/// With [`CommentVoteFilter::IncludeAll`] no deletion filter is applied, so
/// deleted votes and votes on deleted comments are returned.
/// [`CommentVoteFilter::ExcludeDeleted`] drops both.
pub async fn get_comment_votes_on_pins(
    pool: &SqlitePool,
    pin_ids: &[i64],
    filter: CommentVoteFilter,
) -> Result<Vec<CommentVoteRef>> {
    if pin_ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut builder =
        QueryBuilder::<Sqlite>::new("SELECT id, user_id, comment_id FROM comment_votes WHERE pin_id IN ");
    push_id_list(&mut builder, pin_ids);
    if filter == CommentVoteFilter::ExcludeDeleted {
        builder.push(" AND deleted = 0 AND comment_id IN (SELECT id FROM comments WHERE deleted = 0)");
    }
    builder.push(" ORDER BY id");

    builder
        .build_query_as::<CommentVoteRef>()
        .fetch_all(pool)
        .await
        .context("Failed to fetch comment votes")
}
