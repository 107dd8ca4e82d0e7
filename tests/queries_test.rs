//! Integration tests for board-store queries.

mod common;

use board_insights::db::{
    get_all_points_on_board, get_board_admins, get_board_followers, get_boards_admin_by_user,
    get_boards_followed_by_user, get_boards_owned_by_user, get_boards_owned_or_followed,
    get_comment_bodies_on_pins, get_comment_ids_on_pins, get_comment_ids_on_pins_by_user,
    get_pin_contents_on_board, get_pin_ids_on_board, get_pin_ids_on_board_by_user,
    get_user_by_id, is_board_owner, lookup_user_by_token,
};
use common::*;

#[tokio::test]
async fn test_lookup_user_by_token() {
    let (db, _temp_dir) = setup_db().await;
    let pool = db.pool();

    insert_user(pool, 1, "Ada", Some("ada@example.com")).await;
    insert_token(pool, 1, "secret-token").await;

    let rows = lookup_user_by_token(pool, "secret-token").await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].user_id, 1);

    assert!(lookup_user_by_token(pool, "nope").await.unwrap().is_empty());

    let user = get_user_by_id(pool, 1).await.unwrap().expect("user exists");
    assert_eq!(user.first_name.as_deref(), Some("Ada"));
    assert!(get_user_by_id(pool, 99).await.unwrap().is_none());
}

#[tokio::test]
async fn test_owned_and_followed_boards_skip_deleted() {
    let (db, _temp_dir) = setup_db().await;
    let pool = db.pool();

    insert_board(pool, 1, "Mine", 7).await;
    insert_board(pool, 2, "Old", 7).await;
    delete_board(pool, 2).await;
    insert_board(pool, 3, "Theirs", 8).await;
    follow(pool, 3, 7, 0).await;
    follow(pool, 2, 7, 0).await;

    let owned = get_boards_owned_by_user(pool, 7).await.unwrap();
    assert_eq!(owned.len(), 1);
    assert_eq!(owned[0].board_id, 1);
    assert_eq!(owned[0].board_owner_id, 7);

    let followed = get_boards_followed_by_user(pool, 7).await.unwrap();
    assert_eq!(followed.len(), 1);
    assert_eq!(followed[0].title, "Theirs");
    assert_eq!(followed[0].board_owner_id, 8);

    assert!(is_board_owner(pool, 7, 1).await.unwrap());
    assert!(!is_board_owner(pool, 7, 3).await.unwrap());
    assert!(!is_board_owner(pool, 7, 404).await.unwrap());
}

#[tokio::test]
async fn test_admin_queries() {
    let (db, _temp_dir) = setup_db().await;
    let pool = db.pool();

    insert_board(pool, 1, "Team", 1).await;
    add_admin(pool, 1, 5, 1).await;
    add_admin(pool, 1, 6, 0).await;

    let admins = get_board_admins(pool, 1).await.unwrap();
    let admin_ids: Vec<i64> = admins.iter().map(|a| a.user_id).collect();
    assert_eq!(admin_ids, vec![5]);

    // Any admin row counts here, approved or not.
    let boards = get_boards_admin_by_user(pool, 6).await.unwrap();
    assert_eq!(boards.len(), 1);
    assert_eq!(boards[0].board_id, 1);
}

#[tokio::test]
async fn test_owned_or_followed_in_organization() {
    let (db, _temp_dir) = setup_db().await;
    let pool = db.pool();

    insert_category(pool, 10, 100, false).await;
    insert_category(pool, 11, 100, true).await;

    insert_org_board(pool, 1, "Zeta", 7, Some(100), Some(10), 1).await;
    insert_org_board(pool, 2, "Alpha", 8, Some(100), Some(10), 2).await;
    insert_org_board(pool, 3, "Private Bookmarks 7", 7, Some(100), Some(10), 1).await;
    insert_org_board(pool, 4, "Hidden category", 7, Some(100), Some(11), 1).await;
    insert_org_board(pool, 5, "Other org", 7, Some(200), Some(10), 1).await;
    insert_org_board(pool, 6, "Archived", 7, Some(100), Some(10), 3).await;
    insert_org_board(pool, 7, "Inactive follow", 9, Some(100), Some(10), 1).await;

    follow(pool, 2, 7, 0).await;
    follow(pool, 2, 8, 0).await;
    follow(pool, 1, 8, 0).await;
    follow(pool, 7, 7, 1).await;

    let boards = get_boards_owned_or_followed(pool, 7, 100).await.unwrap();
    let titles: Vec<&str> = boards.iter().map(|b| b.title.as_str()).collect();
    assert_eq!(titles, vec!["Alpha", "Zeta"]);
}

#[tokio::test]
async fn test_followers_with_point_subtotals() {
    let (db, _temp_dir) = setup_db().await;
    let pool = db.pool();

    insert_user(pool, 1, "Ada", Some("ada@example.com")).await;
    insert_user(pool, 2, "Bob", Some("bob@example.com")).await;
    insert_user(pool, 3, "Cy", None).await;
    insert_board(pool, 1, "Team", 1).await;
    insert_board(pool, 2, "Elsewhere", 1).await;
    insert_points_type(pool, 1, false).await;

    follow(pool, 1, 1, 0).await;
    follow(pool, 1, 2, 0).await;
    follow(pool, 1, 3, 0).await;

    award(pool, 1, 1, 1, 5, false).await;
    award(pool, 1, 1, 1, 3, false).await;
    award(pool, 1, 1, 1, 100, true).await;
    award(pool, 1, 2, 1, 50, false).await;

    let followers = get_board_followers(pool, 1).await.unwrap();
    assert_eq!(followers.len(), 2, "followers without a primary email are skipped");

    assert_eq!(followers[0].id, 1);
    assert_eq!(followers[0].email.as_deref(), Some("ada@example.com"));
    assert_eq!(followers[0].points, Some(8));

    assert_eq!(followers[1].id, 2);
    assert_eq!(followers[1].points, None);
}

#[tokio::test]
async fn test_points_aggregate_ascending_and_skip_deleted_types() {
    let (db, _temp_dir) = setup_db().await;
    let pool = db.pool();

    insert_board(pool, 1, "Team", 1).await;
    insert_points_type(pool, 1, false).await;
    insert_points_type(pool, 2, true).await;

    award(pool, 10, 1, 1, 10, false).await;
    award(pool, 11, 1, 1, 4, false).await;
    award(pool, 11, 1, 2, 40, false).await;
    award(pool, 12, 1, 1, 4, false).await;
    award(pool, 13, 1, 1, 1, true).await;

    let points = get_all_points_on_board(pool, 1).await.unwrap();
    let pairs: Vec<(i64, i64)> = points.iter().map(|p| (p.user_id, p.total)).collect();
    assert_eq!(pairs, vec![(11, 4), (12, 4), (10, 10)]);
}

#[tokio::test]
async fn test_pin_and_comment_queries() {
    let (db, _temp_dir) = setup_db().await;
    let pool = db.pool();

    insert_board(pool, 1, "Team", 1).await;
    insert_simple_pin(pool, 1, 1, 5).await;
    insert_simple_pin(pool, 2, 1, 6).await;
    insert_pin(
        pool,
        PinRow {
            id: 3,
            board_id: 1,
            user_id: 5,
            deleted: true,
            ..PinRow::default()
        },
    )
    .await;

    let pins = get_pin_ids_on_board(pool, 1).await.unwrap();
    assert_eq!(pins.iter().map(|p| p.id).collect::<Vec<_>>(), vec![1, 2]);

    let by_user = get_pin_ids_on_board_by_user(pool, 1, 5).await.unwrap();
    assert_eq!(by_user.iter().map(|p| p.id).collect::<Vec<_>>(), vec![1]);

    let contents = get_pin_contents_on_board(pool, 1).await.unwrap();
    assert_eq!(contents.len(), 2);
    assert_eq!(contents[0].title.as_deref(), Some("Pinned"));

    insert_comment(pool, 1, 1, 5, "first", false).await;
    insert_comment(pool, 2, 2, 6, "second", false).await;
    insert_comment(pool, 3, 1, 6, "gone", true).await;

    let comments = get_comment_ids_on_pins(pool, &[1, 2]).await.unwrap();
    assert_eq!(comments.iter().map(|c| c.id).collect::<Vec<_>>(), vec![1, 2]);

    let by_user = get_comment_ids_on_pins_by_user(pool, &[1, 2], 6).await.unwrap();
    assert_eq!(by_user.iter().map(|c| c.id).collect::<Vec<_>>(), vec![2]);

    let bodies = get_comment_bodies_on_pins(pool, &[1]).await.unwrap();
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0].body, "first");
}

#[tokio::test]
async fn test_empty_id_lists_return_nothing() {
    let (db, _temp_dir) = setup_db().await;
    let pool = db.pool();

    assert!(get_comment_ids_on_pins(pool, &[]).await.unwrap().is_empty());
    assert!(get_comment_ids_on_pins_by_user(pool, &[], 1)
        .await
        .unwrap()
        .is_empty());
    assert!(get_comment_bodies_on_pins(pool, &[]).await.unwrap().is_empty());
}
