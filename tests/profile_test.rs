mod common;

use serde_json::Value;

#[tokio::test]
async fn update_own_profile_fields() {
    let Some(app) = common::spawn_app().await else {
        common::skip_notice("update_own_profile_fields");
        return;
    };
    let (_id, token) = common::create_test_user(&app, "pf_user").await;

    let resp = app
        .client
        .put(app.url("/profile"))
        .bearer_auth(&token)
        .json(&serde_json::json!({
            "bio": "Wanders and writes", "avatar_url": "https://cdn.example/me.png"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["bio"], "Wanders and writes");

    // Empty string clears the field
    let resp = app
        .client
        .put(app.url("/profile"))
        .bearer_auth(&token)
        .json(&serde_json::json!({ "bio": "" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert!(body["data"]["bio"].is_null());

    let resp = app
        .client
        .get(app.url("/profile"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(
        body["data"]["avatar_url"],
        "https://cdn.example/me.png"
    );
}

#[tokio::test]
async fn taken_username_is_conflict() {
    let Some(app) = common::spawn_app().await else {
        common::skip_notice("taken_username_is_conflict");
        return;
    };
    let (other_id, _other_token) = common::create_test_user(&app, "pn_taken").await;
    let (_id, token) = common::create_test_user(&app, "pn_user").await;

    // Fetch the exact username of the first user
    let resp = app
        .client
        .get(app.url(&format!("/users/{}", other_id)))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    let taken = body["data"]["username"].as_str().unwrap().to_string();

    let resp = app
        .client
        .put(app.url("/profile"))
        .bearer_auth(&token)
        .json(&serde_json::json!({ "username": taken }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 409);
}

#[tokio::test]
async fn public_profile_omits_email() {
    let Some(app) = common::spawn_app().await else {
        common::skip_notice("public_profile_omits_email");
        return;
    };
    let (id, _token) = common::create_test_user(&app, "pp_user").await;

    let resp = app
        .client
        .get(app.url(&format!("/users/{}", id)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert!(body["data"]["username"].as_str().is_some());
    assert!(body["data"].get("email").is_none());

    let resp = app
        .client
        .get(app.url("/users/999999999"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn profile_requires_auth() {
    let Some(app) = common::spawn_app().await else {
        common::skip_notice("profile_requires_auth");
        return;
    };

    let resp = app.client.get(app.url("/profile")).send().await.unwrap();
    assert_eq!(resp.status(), 401);
}
