mod common;

use sea_orm::EntityTrait;
use serde_json::Value;
use wayfare::models::Post;

async fn likes_count(app: &common::TestApp, post_id: uuid::Uuid) -> i32 {
    Post::find_by_id(post_id)
        .one(&app.db)
        .await
        .unwrap()
        .unwrap()
        .likes_count
}

#[tokio::test]
async fn like_and_unlike_maintain_counter() {
    let Some(app) = common::spawn_app().await else {
        common::skip_notice("like_and_unlike_maintain_counter");
        return;
    };
    let (_author, author_token) = common::create_test_user(&app, "liked_author").await;
    let (_fan, fan_token) = common::create_test_user(&app, "like_fan").await;
    let post_id = common::create_test_post(&app, &author_token, "Likeable").await;

    let resp = app
        .client
        .post(app.url(&format!("/posts/{}/like", post_id)))
        .bearer_auth(&fan_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(likes_count(&app, post_id).await, 1);

    let resp = app
        .client
        .delete(app.url(&format!("/posts/{}/like", post_id)))
        .bearer_auth(&fan_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(likes_count(&app, post_id).await, 0);
}

#[tokio::test]
async fn double_like_is_conflict_and_counts_once() {
    let Some(app) = common::spawn_app().await else {
        common::skip_notice("double_like_is_conflict_and_counts_once");
        return;
    };
    let (_author, author_token) = common::create_test_user(&app, "dl_author").await;
    let (_fan, fan_token) = common::create_test_user(&app, "dl_fan").await;
    let post_id = common::create_test_post(&app, &author_token, "Once only").await;

    let resp = app
        .client
        .post(app.url(&format!("/posts/{}/like", post_id)))
        .bearer_auth(&fan_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = app
        .client
        .post(app.url(&format!("/posts/{}/like", post_id)))
        .bearer_auth(&fan_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 409);
    assert_eq!(likes_count(&app, post_id).await, 1);
}

#[tokio::test]
async fn unlike_without_like_is_not_found() {
    let Some(app) = common::spawn_app().await else {
        common::skip_notice("unlike_without_like_is_not_found");
        return;
    };
    let (_author, author_token) = common::create_test_user(&app, "ul_author").await;
    let (_fan, fan_token) = common::create_test_user(&app, "ul_fan").await;
    let post_id = common::create_test_post(&app, &author_token, "Never liked").await;

    let resp = app
        .client
        .delete(app.url(&format!("/posts/{}/like", post_id)))
        .bearer_auth(&fan_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    assert_eq!(likes_count(&app, post_id).await, 0);
}

#[tokio::test]
async fn like_of_missing_post_is_not_found() {
    let Some(app) = common::spawn_app().await else {
        common::skip_notice("like_of_missing_post_is_not_found");
        return;
    };
    let (_fan, fan_token) = common::create_test_user(&app, "ghost_fan").await;

    let resp = app
        .client
        .post(app.url(&format!("/posts/{}/like", uuid::Uuid::new_v4())))
        .bearer_auth(&fan_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn like_status_visible_to_anonymous_and_authed() {
    let Some(app) = common::spawn_app().await else {
        common::skip_notice("like_status_visible_to_anonymous_and_authed");
        return;
    };
    let (_author, author_token) = common::create_test_user(&app, "ls_author").await;
    let (_fan, fan_token) = common::create_test_user(&app, "ls_fan").await;
    let post_id = common::create_test_post(&app, &author_token, "Status").await;

    app.client
        .post(app.url(&format!("/posts/{}/like", post_id)))
        .bearer_auth(&fan_token)
        .send()
        .await
        .unwrap();

    let resp = app
        .client
        .get(app.url(&format!("/posts/{}/likes", post_id)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["count"], 1);
    assert!(body["data"]["liked"].is_null());
}
