mod common;

use serde_json::Value;

#[tokio::test]
async fn create_reply_and_list_comments() {
    let Some(app) = common::spawn_app().await else {
        common::skip_notice("create_reply_and_list_comments");
        return;
    };
    let (_author, author_token) = common::create_test_user(&app, "c_author").await;
    let (_user, user_token) = common::create_test_user(&app, "c_user").await;
    let post_id = common::create_test_post(&app, &author_token, "Discussable").await;

    let resp = app
        .client
        .post(app.url(&format!("/posts/{}/comments", post_id)))
        .bearer_auth(&user_token)
        .json(&serde_json::json!({ "content": "Great place" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    let parent_id = body["data"]["id"].as_i64().unwrap();

    let resp = app
        .client
        .post(app.url(&format!("/posts/{}/comments", post_id)))
        .bearer_auth(&author_token)
        .json(&serde_json::json!({ "content": "Thanks!", "parent_id": parent_id }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = app
        .client
        .get(app.url(&format!("/posts/{}/comments", post_id)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    let comments = body["data"].as_array().unwrap();
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[1]["parent_id"].as_i64().unwrap(), parent_id);
}

#[tokio::test]
async fn reply_must_target_parent_on_same_post() {
    let Some(app) = common::spawn_app().await else {
        common::skip_notice("reply_must_target_parent_on_same_post");
        return;
    };
    let (_author, author_token) = common::create_test_user(&app, "xp_author").await;
    let post_a = common::create_test_post(&app, &author_token, "Post A").await;
    let post_b = common::create_test_post(&app, &author_token, "Post B").await;

    let resp = app
        .client
        .post(app.url(&format!("/posts/{}/comments", post_a)))
        .bearer_auth(&author_token)
        .json(&serde_json::json!({ "content": "on A" }))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    let parent_on_a = body["data"]["id"].as_i64().unwrap();

    let resp = app
        .client
        .post(app.url(&format!("/posts/{}/comments", post_b)))
        .bearer_auth(&author_token)
        .json(&serde_json::json!({ "content": "reply on B", "parent_id": parent_on_a }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn soft_delete_hides_comment_but_keeps_replies() {
    let Some(app) = common::spawn_app().await else {
        common::skip_notice("soft_delete_hides_comment_but_keeps_replies");
        return;
    };
    let (_author, author_token) = common::create_test_user(&app, "sd_author").await;
    let (_user, user_token) = common::create_test_user(&app, "sd_user").await;
    let post_id = common::create_test_post(&app, &author_token, "Threaded").await;

    let resp = app
        .client
        .post(app.url(&format!("/posts/{}/comments", post_id)))
        .bearer_auth(&user_token)
        .json(&serde_json::json!({ "content": "root comment" }))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    let root_id = body["data"]["id"].as_i64().unwrap();

    app.client
        .post(app.url(&format!("/posts/{}/comments", post_id)))
        .bearer_auth(&author_token)
        .json(&serde_json::json!({ "content": "a reply", "parent_id": root_id }))
        .send()
        .await
        .unwrap();

    let resp = app
        .client
        .delete(app.url(&format!("/comments/{}", root_id)))
        .bearer_auth(&user_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    // Root is hidden; the reply survives and still references it
    let resp = app
        .client
        .get(app.url(&format!("/posts/{}/comments", post_id)))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    let comments = body["data"].as_array().unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0]["content"], "a reply");
    assert_eq!(comments[0]["parent_id"].as_i64().unwrap(), root_id);
}

#[tokio::test]
async fn only_author_can_edit_or_delete() {
    let Some(app) = common::spawn_app().await else {
        common::skip_notice("only_author_can_edit_or_delete");
        return;
    };
    let (_author, author_token) = common::create_test_user(&app, "own_author").await;
    let (_user, user_token) = common::create_test_user(&app, "own_user").await;
    let post_id = common::create_test_post(&app, &author_token, "Owned comments").await;

    let resp = app
        .client
        .post(app.url(&format!("/posts/{}/comments", post_id)))
        .bearer_auth(&user_token)
        .json(&serde_json::json!({ "content": "mine" }))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    let comment_id = body["data"]["id"].as_i64().unwrap();

    let resp = app
        .client
        .put(app.url(&format!("/comments/{}", comment_id)))
        .bearer_auth(&author_token)
        .json(&serde_json::json!({ "content": "hijacked" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    let resp = app
        .client
        .put(app.url(&format!("/comments/{}", comment_id)))
        .bearer_auth(&user_token)
        .json(&serde_json::json!({ "content": "edited" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["content"], "edited");
}
