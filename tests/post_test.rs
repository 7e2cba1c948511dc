mod common;

use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use serde_json::Value;
use wayfare::models::{comment, like, paragraph, place_tag, Comment, Like, Paragraph, Place, PlaceTag, Post};

#[tokio::test]
async fn create_and_get_post() {
    let Some(app) = common::spawn_app().await else {
        common::skip_notice("create_and_get_post");
        return;
    };
    let (_user_id, token) = common::create_test_user(&app, "creator").await;

    let post_id = common::create_test_post(&app, &token, "A quiet courtyard").await;

    let resp = app
        .client
        .get(app.url(&format!("/posts/{}", post_id)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();

    assert_eq!(body["data"]["post"]["title"], "A quiet courtyard");
    assert_eq!(body["data"]["post"]["is_approved"], true);
    assert_eq!(body["data"]["post"]["likes_count"], 0);
    assert_eq!(body["data"]["place"]["name"], "Test Place");

    let paragraphs = body["data"]["paragraphs"].as_array().unwrap();
    assert_eq!(paragraphs.len(), 2);
    assert_eq!(paragraphs[0]["position"], 0);
    assert_eq!(paragraphs[1]["position"], 1);

    assert_eq!(body["data"]["photos"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"]["tags"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn paragraphs_come_back_in_position_order() {
    let Some(app) = common::spawn_app().await else {
        common::skip_notice("paragraphs_come_back_in_position_order");
        return;
    };
    let (_user_id, token) = common::create_test_user(&app, "ordering").await;

    // Submitted out of order on purpose
    let resp = app
        .client
        .post(app.url("/posts"))
        .bearer_auth(&token)
        .json(&serde_json::json!({
            "title": "Ordered",
            "place": { "name": "P", "latitude": 0.0, "longitude": 0.0 },
            "paragraphs": [
                { "position": 2, "content": "third" },
                { "position": 0, "content": "first" },
                { "position": 1, "content": "second" }
            ]
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    let post_id = body["data"]["id"].as_str().unwrap();

    let resp = app
        .client
        .get(app.url(&format!("/posts/{}", post_id)))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    let contents: Vec<&str> = body["data"]["paragraphs"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["content"].as_str().unwrap())
        .collect();
    assert_eq!(contents, vec!["first", "second", "third"]);
}

#[tokio::test]
async fn update_replaces_children_wholesale() {
    let Some(app) = common::spawn_app().await else {
        common::skip_notice("update_replaces_children_wholesale");
        return;
    };
    let (_user_id, token) = common::create_test_user(&app, "updater").await;
    let post_id = common::create_test_post(&app, &token, "Before").await;

    let resp = app
        .client
        .put(app.url(&format!("/posts/{}", post_id)))
        .bearer_auth(&token)
        .json(&serde_json::json!({
            "title": "After",
            "place": {
                "name": "Renamed Place",
                "latitude": 48.85,
                "longitude": 2.35
            },
            "tags": ["replaced"],
            "paragraphs": [
                { "position": 0, "content": "Only paragraph now" }
            ],
            "photos": []
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = app
        .client
        .get(app.url(&format!("/posts/{}", post_id)))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["post"]["title"], "After");
    assert_eq!(body["data"]["place"]["name"], "Renamed Place");
    assert_eq!(body["data"]["paragraphs"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"]["photos"].as_array().unwrap().len(), 0);
    let tags = body["data"]["tags"].as_array().unwrap();
    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0]["name"], "replaced");
}

#[tokio::test]
async fn update_of_foreign_post_reads_as_not_found() {
    let Some(app) = common::spawn_app().await else {
        common::skip_notice("update_of_foreign_post_reads_as_not_found");
        return;
    };
    let (_owner_id, owner_token) = common::create_test_user(&app, "owner").await;
    let (_other_id, other_token) = common::create_test_user(&app, "other").await;
    let post_id = common::create_test_post(&app, &owner_token, "Mine").await;

    let resp = app
        .client
        .put(app.url(&format!("/posts/{}", post_id)))
        .bearer_auth(&other_token)
        .json(&serde_json::json!({
            "title": "Stolen",
            "place": { "name": "X", "latitude": 0.0, "longitude": 0.0 },
            "paragraphs": []
        }))
        .send()
        .await
        .unwrap();
    // Ownership miss is indistinguishable from a missing post
    assert_eq!(resp.status(), 404);

    let resp = app
        .client
        .delete(app.url(&format!("/posts/{}", post_id)))
        .bearer_auth(&other_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn delete_removes_children_and_orphaned_place() {
    let Some(app) = common::spawn_app().await else {
        common::skip_notice("delete_removes_children_and_orphaned_place");
        return;
    };
    let (_user_id, token) = common::create_test_user(&app, "deleter").await;
    let (_fan_id, fan_token) = common::create_test_user(&app, "fan").await;
    let post_id = common::create_test_post(&app, &token, "Doomed").await;

    // Someone likes and comments on it first
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
        .post(app.url(&format!("/posts/{}/comments", post_id)))
        .bearer_auth(&fan_token)
        .json(&serde_json::json!({ "content": "nice spot" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = app
        .client
        .get(app.url(&format!("/posts/{}", post_id)))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    let place_id: uuid::Uuid = body["data"]["place"]["id"].as_str().unwrap().parse().unwrap();

    let resp = app
        .client
        .delete(app.url(&format!("/posts/{}", post_id)))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    // Everything hanging off the post is gone, and the place was orphan-collected
    assert!(Post::find_by_id(post_id).one(&app.db).await.unwrap().is_none());
    assert!(Place::find_by_id(place_id).one(&app.db).await.unwrap().is_none());
    assert_eq!(
        Like::find().filter(like::Column::PostId.eq(post_id)).count(&app.db).await.unwrap(),
        0
    );
    assert_eq!(
        Comment::find().filter(comment::Column::PostId.eq(post_id)).count(&app.db).await.unwrap(),
        0
    );
    assert_eq!(
        Paragraph::find().filter(paragraph::Column::PostId.eq(post_id)).count(&app.db).await.unwrap(),
        0
    );
    assert_eq!(
        PlaceTag::find().filter(place_tag::Column::PlaceId.eq(place_id)).count(&app.db).await.unwrap(),
        0
    );
}

#[tokio::test]
async fn shared_place_survives_deletion_of_one_post() {
    let Some(app) = common::spawn_app().await else {
        common::skip_notice("shared_place_survives_deletion_of_one_post");
        return;
    };
    let (_user_id, token) = common::create_test_user(&app, "sharer").await;
    let first = common::create_test_post(&app, &token, "First visit").await;
    let second = common::create_test_post(&app, &token, "Second visit").await;

    // Point the second post at the first post's place
    let resp = app
        .client
        .get(app.url(&format!("/posts/{}", first)))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    let place_id = body["data"]["place"]["id"].as_str().unwrap().to_string();

    let resp = app
        .client
        .put(app.url(&format!("/posts/{}/place", second)))
        .bearer_auth(&token)
        .json(&serde_json::json!({ "place_id": place_id }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    // Deleting the first post must keep the still-referenced place
    let resp = app
        .client
        .delete(app.url(&format!("/posts/{}", first)))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let place_uuid: uuid::Uuid = place_id.parse().unwrap();
    assert!(Place::find_by_id(place_uuid).one(&app.db).await.unwrap().is_some());
}

#[tokio::test]
async fn attach_to_missing_place_is_not_found() {
    let Some(app) = common::spawn_app().await else {
        common::skip_notice("attach_to_missing_place_is_not_found");
        return;
    };
    let (_user_id, token) = common::create_test_user(&app, "attacher").await;
    let post_id = common::create_test_post(&app, &token, "Floating").await;

    let resp = app
        .client
        .put(app.url(&format!("/posts/{}/place", post_id)))
        .bearer_auth(&token)
        .json(&serde_json::json!({ "place_id": uuid::Uuid::new_v4() }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn create_requires_auth_and_valid_payload() {
    let Some(app) = common::spawn_app().await else {
        common::skip_notice("create_requires_auth_and_valid_payload");
        return;
    };
    let (_user_id, token) = common::create_test_user(&app, "validator").await;

    // No token
    let resp = app
        .client
        .post(app.url("/posts"))
        .json(&serde_json::json!({
            "title": "t",
            "place": { "name": "p", "latitude": 0.0, "longitude": 0.0 },
            "paragraphs": []
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);

    // Empty title
    let resp = app
        .client
        .post(app.url("/posts"))
        .bearer_auth(&token)
        .json(&serde_json::json!({
            "title": "",
            "place": { "name": "p", "latitude": 0.0, "longitude": 0.0 },
            "paragraphs": []
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    // Latitude out of range
    let resp = app
        .client
        .post(app.url("/posts"))
        .bearer_auth(&token)
        .json(&serde_json::json!({
            "title": "ok",
            "place": { "name": "p", "latitude": 120.0, "longitude": 0.0 },
            "paragraphs": []
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn duplicate_tags_collapse_to_one_link() {
    let Some(app) = common::spawn_app().await else {
        common::skip_notice("duplicate_tags_collapse_to_one_link");
        return;
    };
    let (_user_id, token) = common::create_test_user(&app, "tagger").await;

    let resp = app
        .client
        .post(app.url("/posts"))
        .bearer_auth(&token)
        .json(&serde_json::json!({
            "title": "Tagged",
            "place": { "name": "T", "latitude": 0.0, "longitude": 0.0 },
            "tags": ["cafe", "  cafe ", "", "view"],
            "paragraphs": []
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    let post_id = body["data"]["id"].as_str().unwrap();

    let resp = app
        .client
        .get(app.url(&format!("/posts/{}", post_id)))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    let names: Vec<&str> = body["data"]["tags"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(names.len(), 2);
    assert!(names.contains(&"cafe"));
    assert!(names.contains(&"view"));
}
