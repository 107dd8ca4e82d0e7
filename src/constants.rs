//! Shared constants used across the application.

/// User agent string used when scraping linked articles.
///
/// A realistic browser user agent; many publishers reject obvious bot agents.
pub const SCRAPER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Largest linked page body read when scraping (5 MB).
pub const MAX_ARTICLE_BYTES: usize = 5 * 1024 * 1024;

/// Default semantic-analysis endpoint (MeaningCloud topics extraction).
pub const DEFAULT_SEMANTIC_API_URL: &str = "https://api.meaningcloud.com/topics-2.0";

/// Title prefix of each user's reserved private board; the user id follows a space.
pub const PRIVATE_BOARD_TITLE_PREFIX: &str = "Private Bookmarks";

/// `boards.status` values counted as live (active, pending).
pub const BOARD_STATUS_ACTIVE: i64 = 1;
pub const BOARD_STATUS_PENDING: i64 = 2;

/// `board_followers.status` of an active follow.
pub const FOLLOWER_STATUS_ACTIVE: i64 = 0;

/// `board_admins.status` of an approved admin.
pub const ADMIN_STATUS_APPROVED: i64 = 1;

/// Title of the private board reserved for `user_id`.
#[must_use]
pub fn private_board_title(user_id: i64) -> String {
    format!("{PRIVATE_BOARD_TITLE_PREFIX} {user_id}")
}
