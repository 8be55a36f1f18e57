mod common;

use axum::http::StatusCode;
use common::{location, texts, TestApp};
use yatube::models::Follow;

#[tokio::test]
async fn following_is_idempotent() {
    let app = TestApp::new().await;
    let leo = app.user("leo").await;
    let mia = app.user("mia").await;
    let cookie = app.login("mia").await;

    for _ in 0..2 {
        let response = app.post_form("/profile/leo/follow/", Some(&cookie), "").await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/profile/leo/");
    }

    let edges: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM follows")
        .fetch_one(&app.state.db_pool)
        .await
        .unwrap();
    assert_eq!(edges, 1);
    assert!(Follow::is_following(&app.state.db_pool, mia.id, leo.id).await.unwrap());

    let profile = app.get_json("/profile/leo/", Some(&cookie)).await;
    assert_eq!(profile["following"], true);
}

#[tokio::test]
async fn nobody_follows_themselves() {
    let app = TestApp::new().await;
    let cookie = app.login("leo").await;

    let response = app.get("/profile/leo/follow/", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let edges: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM follows")
        .fetch_one(&app.state.db_pool)
        .await
        .unwrap();
    assert_eq!(edges, 0);

    let profile = app.get_json("/profile/leo/", Some(&cookie)).await;
    assert_eq!(profile["following"], false);
}

#[tokio::test]
async fn unfollowing() {
    let app = TestApp::new().await;
    app.user("leo").await;
    let cookie = app.login("mia").await;

    // nothing to remove yet
    let response = app.get("/profile/leo/unfollow/", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    app.get("/profile/leo/follow/", Some(&cookie)).await;
    app.get("/profile/leo/unfollow/", Some(&cookie)).await;

    let profile = app.get_json("/profile/leo/", Some(&cookie)).await;
    assert_eq!(profile["following"], false);
}

#[tokio::test]
async fn following_unknown_users_is_not_found() {
    let app = TestApp::new().await;
    let cookie = app.login("mia").await;

    let response = app.get("/profile/ghost/follow/", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn feed_has_only_followed_authors() {
    let app = TestApp::new().await;
    let leo = app.user("leo").await;
    let max = app.user("max").await;
    app.post(&leo, "from leo", None).await;
    app.post(&max, "from max", None).await;

    let mia = app.login("mia").await;
    let tom = app.login("tom").await;
    app.get("/profile/leo/follow/", Some(&mia)).await;

    let feed = app.get_json("/follow/", Some(&mia)).await;
    assert_eq!(texts(&feed["page"]), ["from leo"]);
    assert_eq!(feed["authors"][0]["username"], "leo");

    let empty = app.get_json("/follow/", Some(&tom)).await;
    assert!(texts(&empty["page"]).is_empty());
}

#[tokio::test]
async fn feed_needs_a_login() {
    let app = TestApp::new().await;

    let response = app.get("/follow/", None).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/auth/login/?next=%2Ffollow%2F");
}
