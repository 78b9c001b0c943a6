use chrono::{Duration, Utc};
use diesel::RunQueryDsl;
use shareit::{models::NewBooking, schema::bookings};

use crate::helpers::TestApp;

#[actix_web::test]
async fn owner_can_create_and_fetch_item(){
    let app = TestApp::spawn_app().await;
    let owner_id = app.create_user().await;

    let item_id = app.create_item(owner_id, "Drill", "A cordless drill", true).await;

    let response = app.api_client.get(app.url(&format!("/items/{}", item_id)))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let body = response.json::<serde_json::Value>().await.unwrap();
    assert_eq!(body["name"], "Drill");
    assert_eq!(body["owner"].as_i64().unwrap(), owner_id);
    assert_eq!(body["comments"].as_array().unwrap().len(), 0);
    assert!(body["lastBooking"].is_null());
    assert!(body["nextBooking"].is_null());
}

#[actix_web::test]
async fn create_item_for_unknown_user_returns_404(){
    let app = TestApp::spawn_app().await;

    let response = app.api_client.post(app.url("/items"))
        .header("X-Sharer-User-Id", 4242)
        .json(&serde_json::json!({
            "name": "Drill",
            "description": "A cordless drill",
            "available": true
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 404);
}

#[actix_web::test]
async fn create_item_with_unknown_request_returns_404(){
    let app = TestApp::spawn_app().await;
    let owner_id = app.create_user().await;

    let response = app.api_client.post(app.url("/items"))
        .header("X-Sharer-User-Id", owner_id)
        .json(&serde_json::json!({
            "name": "Drill",
            "description": "A cordless drill",
            "available": true,
            "requestId": 4242
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 404);
}

#[actix_web::test]
async fn non_owner_cannot_update_item(){
    let app = TestApp::spawn_app().await;
    let owner_id = app.create_user().await;
    let other_id = app.create_user().await;
    let item_id = app.create_item(owner_id, "Drill", "A cordless drill", true).await;

    let response = app.api_client.patch(app.url(&format!("/items/{}", item_id)))
        .header("X-Sharer-User-Id", other_id)
        .json(&serde_json::json!({"name": "Stolen drill"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);

    let body = response.json::<serde_json::Value>().await.unwrap();
    assert!(body["error validation"].is_string());
}

#[actix_web::test]
async fn owner_update_changes_only_provided_fields(){
    let app = TestApp::spawn_app().await;
    let owner_id = app.create_user().await;
    let item_id = app.create_item(owner_id, "Drill", "A cordless drill", true).await;

    let response = app.api_client.patch(app.url(&format!("/items/{}", item_id)))
        .header("X-Sharer-User-Id", owner_id)
        .json(&serde_json::json!({"available": false}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let body = response.json::<serde_json::Value>().await.unwrap();
    assert_eq!(body["name"], "Drill");
    assert_eq!(body["available"], false);
}

#[actix_web::test]
async fn search_matches_name_and_description_case_insensitively(){
    let app = TestApp::spawn_app().await;
    let owner_id = app.create_user().await;

    app.create_item(owner_id, "Cordless DRILL", "Works fine", true).await;
    app.create_item(owner_id, "Hammer", "Goes well with a drill", true).await;
    app.create_item(owner_id, "Broken drill", "Do not lend this", false).await;
    app.create_item(owner_id, "Ladder", "Three meters tall", true).await;

    let response = app.api_client.get(app.url("/items/search"))
        .header("X-Sharer-User-Id", owner_id)
        .query(&[("text", "drill")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    // The unavailable drill is excluded
    let body = response.json::<serde_json::Value>().await.unwrap();
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[actix_web::test]
async fn empty_search_returns_empty_list(){
    let app = TestApp::spawn_app().await;
    let owner_id = app.create_user().await;
    app.create_item(owner_id, "Drill", "A cordless drill", true).await;

    let response = app.api_client.get(app.url("/items/search"))
        .header("X-Sharer-User-Id", owner_id)
        .query(&[("text", "")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let body = response.json::<serde_json::Value>().await.unwrap();
    assert_eq!(body.as_array().unwrap().len(), 0);
}

#[actix_web::test]
async fn comment_without_finished_booking_is_rejected(){
    let app = TestApp::spawn_app().await;
    let owner_id = app.create_user().await;
    let commenter_id = app.create_user().await;
    let item_id = app.create_item(owner_id, "Drill", "A cordless drill", true).await;

    let response = app.api_client.post(app.url(&format!("/items/{}/comment", item_id)))
        .header("X-Sharer-User-Id", commenter_id)
        .json(&serde_json::json!({"text": "Never used it"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);
}

#[actix_web::test]
async fn comment_after_finished_booking_is_posted(){
    let app = TestApp::spawn_app().await;
    let owner_id = app.create_user().await;
    let booker_id = app.create_user().await;
    let item_id = app.create_item(owner_id, "Drill", "A cordless drill", true).await;

    let now = Utc::now().naive_utc();
    let mut conn = app.pool.get().unwrap();
    diesel::insert_into(bookings::table)
        .values(&NewBooking{
            start_date: now - Duration::days(3),
            end_date: now - Duration::days(1),
            item_id,
            booker_id,
            status: "APPROVED".to_string()
        })
        .execute(&mut conn)
        .unwrap();

    let response = app.api_client.post(app.url(&format!("/items/{}/comment", item_id)))
        .header("X-Sharer-User-Id", booker_id)
        .json(&serde_json::json!({"text": "Great drill"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let body = response.json::<serde_json::Value>().await.unwrap();
    assert_eq!(body["text"], "Great drill");
    assert_eq!(body["author"].as_i64().unwrap(), booker_id);
    assert_eq!(body["item"].as_i64().unwrap(), item_id);

    // The comment shows up on the item afterwards
    let item = app.api_client.get(app.url(&format!("/items/{}", item_id)))
        .send()
        .await
        .unwrap()
        .json::<serde_json::Value>()
        .await
        .unwrap();
    assert_eq!(item["comments"].as_array().unwrap().len(), 1);
    assert!(item["lastBooking"].is_object());
}

#[actix_web::test]
async fn listing_own_items_includes_details(){
    let app = TestApp::spawn_app().await;
    let owner_id = app.create_user().await;
    app.create_item(owner_id, "Drill", "A cordless drill", true).await;
    app.create_item(owner_id, "Ladder", "Three meters tall", true).await;

    let response = app.api_client.get(app.url("/items"))
        .header("X-Sharer-User-Id", owner_id)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let body = response.json::<serde_json::Value>().await.unwrap();
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert!(items.iter().all(|item| item["owner"].as_i64().unwrap() == owner_id));
}
