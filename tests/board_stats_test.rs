//! Integration tests for per-board statistics.

mod common;

use board_insights::stats::{
    board_stats_followed_by, board_stats_owned_by, board_stats_owned_or_admin_by, RankSummary,
};
use common::*;

#[tokio::test]
async fn test_empty_board_reports_zeros() {
    let (db, _temp_dir) = setup_db().await;
    let pool = db.pool();

    insert_board(pool, 1, "Quiet", 7).await;

    let stats = board_stats_owned_by(pool, 7).await.unwrap();
    assert_eq!(stats.len(), 1);
    assert_eq!(stats[0].board.board_id, 1);
    assert!(stats[0].board_admins.is_empty());
    assert_eq!(stats[0].rank, RankSummary::default());
}

#[tokio::test]
async fn test_owned_board_ranks_owner_among_point_holders() {
    let (db, _temp_dir) = setup_db().await;
    let pool = db.pool();

    insert_board(pool, 1, "Team", 2).await;
    insert_points_type(pool, 1, false).await;
    add_admin(pool, 1, 3, 1).await;
    add_admin(pool, 1, 4, 0).await;

    award(pool, 1, 1, 1, 10, false).await;
    award(pool, 2, 1, 1, 15, false).await;
    award(pool, 2, 1, 1, 5, false).await;
    award(pool, 3, 1, 1, 5, false).await;

    let stats = board_stats_owned_by(pool, 2).await.unwrap();
    assert_eq!(stats.len(), 1);
    let stat = &stats[0];

    assert_eq!(
        stat.board_admins.iter().map(|a| a.user_id).collect::<Vec<_>>(),
        vec![3]
    );
    assert_eq!(
        stat.rank,
        RankSummary {
            users_points: 20,
            percentile: 33,
            followers: 3,
            avg: 11,
        }
    );
}

#[tokio::test]
async fn test_followed_boards_rank_user_without_points_at_zero() {
    let (db, _temp_dir) = setup_db().await;
    let pool = db.pool();

    insert_board(pool, 1, "Team", 2).await;
    insert_board(pool, 2, "Other", 2).await;
    insert_points_type(pool, 1, false).await;
    follow(pool, 1, 9, 0).await;
    follow(pool, 2, 9, 0).await;

    award(pool, 9, 1, 1, 4, false).await;
    award(pool, 5, 1, 1, 8, false).await;
    award(pool, 5, 2, 1, 8, false).await;

    let stats = board_stats_followed_by(pool, 9).await.unwrap();
    assert_eq!(stats.len(), 2);

    assert_eq!(stats[0].board.board_id, 1);
    assert_eq!(stats[0].rank.users_points, 4);
    assert_eq!(stats[0].rank.percentile, 100);
    assert_eq!(stats[0].rank.followers, 2);
    assert_eq!(stats[0].rank.avg, 6);

    assert_eq!(stats[1].board.board_id, 2);
    assert_eq!(stats[1].rank.users_points, 0);
    assert_eq!(stats[1].rank.percentile, 0);
    assert_eq!(stats[1].rank.followers, 1);
}

#[tokio::test]
async fn test_organization_stats_exclude_private_board() {
    let (db, _temp_dir) = setup_db().await;
    let pool = db.pool();

    insert_category(pool, 10, 100, false).await;
    insert_org_board(pool, 1, "Roadmap", 7, Some(100), Some(10), 1).await;
    insert_org_board(pool, 2, "Private Bookmarks 7", 7, Some(100), Some(10), 1).await;
    insert_org_board(pool, 3, "Design", 8, Some(100), Some(10), 1).await;
    follow(pool, 3, 7, 0).await;

    let stats = board_stats_owned_or_admin_by(pool, 7, 100).await.unwrap();
    let titles: Vec<&str> = stats.iter().map(|s| s.board.title.as_str()).collect();
    assert_eq!(titles, vec!["Design", "Roadmap"]);
}

#[tokio::test]
async fn test_stats_serialize_flat() {
    let (db, _temp_dir) = setup_db().await;
    let pool = db.pool();

    insert_board(pool, 1, "Team", 7).await;

    let stats = board_stats_owned_by(pool, 7).await.unwrap();
    let json = serde_json::to_value(&stats).unwrap();
    assert_eq!(json[0]["board_id"], 1);
    assert_eq!(json[0]["title"], "Team");
    assert_eq!(json[0]["board_owner_id"], 7);
    assert_eq!(json[0]["followers"], 0);
    assert!(json[0]["board_admins"].as_array().unwrap().is_empty());
}
