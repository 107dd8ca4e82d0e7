//! Board statistics: a board joined with its admins and the requesting
//! user's standing on it.

mod points;

pub use points::{compute_board_points, rank_user, RankSummary};

use anyhow::Result;
use futures_util::future::try_join_all;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::debug;

use crate::db::{
    get_board_admins, get_boards_followed_by_user, get_boards_owned_by_user,
    get_boards_owned_or_followed, BoardAdmin, BoardSummary,
};

/// A board with its approved admins and one user's rank on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardStat {
    #[serde(flatten)]
    pub board: BoardSummary,
    pub board_admins: Vec<BoardAdmin>,
    #[serde(flatten)]
    pub rank: RankSummary,
}

/// Compute the stat for one board from `user_id`'s point of view.
///
/// # Errors
///
/// Returns an error if the points or admin query fails.
pub async fn add_stats(pool: &SqlitePool, board: BoardSummary, user_id: i64) -> Result<BoardStat> {
    let (points, board_admins) = tokio::try_join!(
        compute_board_points(pool, board.board_id),
        get_board_admins(pool, board.board_id),
    )?;

    let rank = rank_user(&points, user_id);
    debug!(
        board_id = board.board_id,
        user_id,
        followers = rank.followers,
        percentile = rank.percentile,
        "Computed board stat"
    );

    Ok(BoardStat {
        board,
        board_admins,
        rank,
    })
}

/// Stats for every board, computed concurrently, in input order.
async fn stats_for_boards(
    pool: &SqlitePool,
    boards: Vec<BoardSummary>,
    user_id: i64,
) -> Result<Vec<BoardStat>> {
    try_join_all(boards.into_iter().map(|board| add_stats(pool, board, user_id))).await
}

/// Stats for the boards `user_id` owns.
///
/// # Errors
///
/// Returns an error if any underlying query fails.
pub async fn board_stats_owned_by(pool: &SqlitePool, user_id: i64) -> Result<Vec<BoardStat>> {
    let boards = get_boards_owned_by_user(pool, user_id).await?;
    stats_for_boards(pool, boards, user_id).await
}

/// Stats for the boards `user_id` follows.
///
/// # Errors
///
/// Returns an error if any underlying query fails.
pub async fn board_stats_followed_by(pool: &SqlitePool, user_id: i64) -> Result<Vec<BoardStat>> {
    let boards = get_boards_followed_by_user(pool, user_id).await?;
    stats_for_boards(pool, boards, user_id).await
}

/// Stats for the live boards of an organization that `user_id` owns or
/// actively follows, ordered by title.
///
/// # Errors
///
/// Returns an error if any underlying query fails.
pub async fn board_stats_owned_or_admin_by(
    pool: &SqlitePool,
    user_id: i64,
    organization_id: i64,
) -> Result<Vec<BoardStat>> {
    let boards = get_boards_owned_or_followed(pool, user_id, organization_id).await?;
    stats_for_boards(pool, boards, user_id).await
}
