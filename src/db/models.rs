use serde::{Deserialize, Serialize};

/// A platform user.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub created_at: String,
}

/// An API token issued to a user.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AuthToken {
    pub id: i64,
    pub user_id: i64,
    pub token: String,
    pub created_at: String,
}

/// The board columns carried into a board stat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct BoardSummary {
    pub board_id: i64,
    pub title: String,
    pub board_owner_id: i64,
}

/// An approved admin of a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct BoardAdmin {
    pub user_id: i64,
}

/// A board on which a user holds an admin row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct AdminBoard {
    pub board_id: i64,
}

/// A follower of a board with their point subtotal on it.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct BoardFollower {
    pub id: i64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    /// `None` when the follower has no live points on the board.
    pub points: Option<i64>,
}

/// Cumulative points of one user on one board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserPoints {
    pub user_id: i64,
    pub total: i64,
}

/// Identifying columns of a pin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct PinRef {
    pub id: i64,
    pub user_id: i64,
    pub created_at: String,
}

/// Identifying columns of a comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct CommentRef {
    pub id: i64,
    pub user_id: i64,
    pub pin_id: i64,
    pub created_at: String,
}

/// A vote cast on a pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct PinVoteRef {
    pub id: i64,
    pub user_id: i64,
    pub pin_id: i64,
}

/// A vote cast on a comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct CommentVoteRef {
    pub id: i64,
    pub user_id: i64,
    pub comment_id: i64,
}

/// Raw body of a live comment, keyed by its pin.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct CommentBody {
    pub pin_id: i64,
    pub body: String,
}

/// Text-bearing columns of a pin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct PinContent {
    pub id: i64,
    pub board_id: i64,
    pub title: Option<String>,
    pub user_note: Option<String>,
    pub body: Option<String>,
    pub url_web: Option<String>,
}

impl PinContent {
    /// Title, note and body joined by newlines, skipping blank parts.
    #[must_use]
    pub fn user_content(&self) -> String {
        [&self.title, &self.user_note, &self.body]
            .into_iter()
            .filter_map(|part| part.as_deref())
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// The linked URL, if one is set and non-blank.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.url_web
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}

/// Whether comment votes honour their `deleted` column.
///
/// Votes on comments have historically been returned regardless of deletion;
/// `IncludeAll` keeps that behaviour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CommentVoteFilter {
    #[default]
    IncludeAll,
    ExcludeDeleted,
}
