mod common;

use serde_json::Value;

#[tokio::test]
async fn add_list_and_remove_favourite() {
    let Some(app) = common::spawn_app().await else {
        common::skip_notice("add_list_and_remove_favourite");
        return;
    };
    let (_author, author_token) = common::create_test_user(&app, "fav_author").await;
    let (_user, user_token) = common::create_test_user(&app, "fav_user").await;
    let post_id = common::create_test_post(&app, &author_token, "Keep this one").await;

    let resp = app
        .client
        .post(app.url(&format!("/posts/{}/favourite", post_id)))
        .bearer_auth(&user_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = app
        .client
        .get(app.url("/favourites"))
        .bearer_auth(&user_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    let items = body["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["title"], "Keep this one");

    let resp = app
        .client
        .delete(app.url(&format!("/posts/{}/favourite", post_id)))
        .bearer_auth(&user_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = app
        .client
        .get(app.url("/favourites"))
        .bearer_auth(&user_token)
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn duplicate_favourite_is_conflict() {
    let Some(app) = common::spawn_app().await else {
        common::skip_notice("duplicate_favourite_is_conflict");
        return;
    };
    let (_author, author_token) = common::create_test_user(&app, "dup_fav_author").await;
    let (_user, user_token) = common::create_test_user(&app, "dup_fav_user").await;
    let post_id = common::create_test_post(&app, &author_token, "Twice?").await;

    let resp = app
        .client
        .post(app.url(&format!("/posts/{}/favourite", post_id)))
        .bearer_auth(&user_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = app
        .client
        .post(app.url(&format!("/posts/{}/favourite", post_id)))
        .bearer_auth(&user_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 409);
}

#[tokio::test]
async fn remove_absent_favourite_is_not_found() {
    let Some(app) = common::spawn_app().await else {
        common::skip_notice("remove_absent_favourite_is_not_found");
        return;
    };
    let (_author, author_token) = common::create_test_user(&app, "abs_fav_author").await;
    let (_user, user_token) = common::create_test_user(&app, "abs_fav_user").await;
    let post_id = common::create_test_post(&app, &author_token, "Not saved").await;

    let resp = app
        .client
        .delete(app.url(&format!("/posts/{}/favourite", post_id)))
        .bearer_auth(&user_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}
