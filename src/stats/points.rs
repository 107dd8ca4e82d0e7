//! Per-user point totals and rank-based percentiles on a board.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::db::{get_all_points_on_board, UserPoints};

/// Where one user stands among everyone holding points on a board.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankSummary {
    pub users_points: i64,
    pub percentile: i64,
    pub followers: usize,
    pub avg: i64,
}

/// Point totals per user on a board, ascending by total.
///
/// # Errors
///
/// Returns an error if the aggregate query fails.
pub async fn compute_board_points(pool: &SqlitePool, board_id: i64) -> Result<Vec<UserPoints>> {
    get_all_points_on_board(pool, board_id).await
}

/// Rank `user_id` within `points`, which must be ordered ascending by total.
///
/// A user absent from `points` (including when `points` is empty) gets zero
/// points and a zero percentile. The average is zero for an empty board.
#[must_use]
pub fn rank_user(points: &[UserPoints], user_id: i64) -> RankSummary {
    let followers = points.len();
    if followers == 0 {
        return RankSummary::default();
    }

    let sum: i64 = points.iter().map(|p| p.total).sum();
    let avg = sum.div_euclid(followers as i64);

    let Some(position) = points.iter().position(|p| p.user_id == user_id) else {
        return RankSummary {
            users_points: 0,
            percentile: 0,
            followers,
            avg,
        };
    };

    RankSummary {
        users_points: points[position].total,
        percentile: percentile_at(position, followers),
        followers,
        avg,
    }
}

/// `floor(100 - position * 100 / followers)` in exact integer arithmetic.
fn percentile_at(position: usize, followers: usize) -> i64 {
    debug_assert!(position < followers);
    ((followers - position) * 100 / followers) as i64
}
