mod common;

use serde_json::Value;

#[tokio::test]
async fn follow_and_unfollow() {
    let Some(app) = common::spawn_app().await else {
        common::skip_notice("follow_and_unfollow");
        return;
    };
    let (follower_id, follower_token) = common::create_test_user(&app, "follower").await;
    let (followed_id, _followed_token) = common::create_test_user(&app, "followed").await;

    let resp = app
        .client
        .post(app.url(&format!("/users/{}/follow", followed_id)))
        .bearer_auth(&follower_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = app
        .client
        .get(app.url(&format!("/users/{}/followers", followed_id)))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    let followers = body["data"].as_array().unwrap();
    assert_eq!(followers.len(), 1);
    assert_eq!(followers[0]["id"].as_i64().unwrap() as i32, follower_id);

    let resp = app
        .client
        .delete(app.url(&format!("/users/{}/follow", followed_id)))
        .bearer_auth(&follower_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = app
        .client
        .get(app.url(&format!("/users/{}/following", follower_id)))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn self_follow_is_rejected() {
    let Some(app) = common::spawn_app().await else {
        common::skip_notice("self_follow_is_rejected");
        return;
    };
    let (user_id, token) = common::create_test_user(&app, "narcissist").await;

    let resp = app
        .client
        .post(app.url(&format!("/users/{}/follow", user_id)))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn duplicate_follow_is_conflict() {
    let Some(app) = common::spawn_app().await else {
        common::skip_notice("duplicate_follow_is_conflict");
        return;
    };
    let (_follower_id, follower_token) = common::create_test_user(&app, "dup_follower").await;
    let (followed_id, _t) = common::create_test_user(&app, "dup_followed").await;

    app.client
        .post(app.url(&format!("/users/{}/follow", followed_id)))
        .bearer_auth(&follower_token)
        .send()
        .await
        .unwrap();

    let resp = app
        .client
        .post(app.url(&format!("/users/{}/follow", followed_id)))
        .bearer_auth(&follower_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 409);
}
