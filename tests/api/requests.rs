use crate::helpers::TestApp;

async fn create_request(app: &TestApp, user_id: i64, description: &str) -> serde_json::Value{
    let response = app.api_client.post(app.url("/requests"))
        .header("X-Sharer-User-Id", user_id)
        .json(&serde_json::json!({"description": description}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    response.json::<serde_json::Value>().await.unwrap()
}

#[actix_web::test]
async fn request_is_created_with_timestamp_and_requester(){
    let app = TestApp::spawn_app().await;
    let user_id = app.create_user().await;

    let request = create_request(&app, user_id, "Need a drill for the weekend").await;

    assert!(request["id"].as_i64().unwrap() > 0);
    assert_eq!(request["description"], "Need a drill for the weekend");
    assert_eq!(request["userId"].as_i64().unwrap(), user_id);
    assert!(request["created"].is_string());
}

#[actix_web::test]
async fn request_by_unknown_user_returns_404(){
    let app = TestApp::spawn_app().await;

    let response = app.api_client.post(app.url("/requests"))
        .header("X-Sharer-User-Id", 4242)
        .json(&serde_json::json!({"description": "Need a drill"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 404);
}

#[actix_web::test]
async fn own_requests_are_listed_newest_first(){
    let app = TestApp::spawn_app().await;
    let user_id = app.create_user().await;
    let other_id = app.create_user().await;

    let first = create_request(&app, user_id, "Need a drill").await;
    let second = create_request(&app, user_id, "Need a ladder").await;
    create_request(&app, other_id, "Need a hammer").await;

    let response = app.api_client.get(app.url("/requests"))
        .header("X-Sharer-User-Id", user_id)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let body = response.json::<Vec<serde_json::Value>>().await.unwrap();
    assert_eq!(body.len(), 2);
    assert_eq!(body[0]["id"], second["id"]);
    assert_eq!(body[1]["id"], first["id"]);
    assert!(body[0]["items"].as_array().unwrap().is_empty());
}

#[actix_web::test]
async fn listing_all_excludes_own_requests(){
    let app = TestApp::spawn_app().await;
    let user_id = app.create_user().await;
    let other_id = app.create_user().await;

    create_request(&app, user_id, "Need a drill").await;
    let foreign = create_request(&app, other_id, "Need a ladder").await;

    let response = app.api_client.get(app.url("/requests/all"))
        .header("X-Sharer-User-Id", user_id)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let body = response.json::<Vec<serde_json::Value>>().await.unwrap();
    assert_eq!(body.len(), 1);
    assert_eq!(body[0]["id"], foreign["id"]);
}

#[actix_web::test]
async fn request_details_list_items_offered_against_it(){
    let app = TestApp::spawn_app().await;
    let requester_id = app.create_user().await;
    let owner_id = app.create_user().await;

    let request = create_request(&app, requester_id, "Need a drill").await;
    let request_id = request["id"].as_i64().unwrap();

    let item = app.api_client.post(app.url("/items"))
        .header("X-Sharer-User-Id", owner_id)
        .json(&serde_json::json!({
            "name": "Drill",
            "description": "A cordless drill",
            "available": true,
            "requestId": request_id
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(item.status().as_u16(), 200);

    let response = app.api_client.get(app.url(&format!("/requests/{}", request_id)))
        .header("X-Sharer-User-Id", requester_id)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let body = response.json::<serde_json::Value>().await.unwrap();
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["name"], "Drill");
    assert_eq!(items[0]["userId"].as_i64().unwrap(), owner_id);
}

#[actix_web::test]
async fn fetching_unknown_request_returns_404(){
    let app = TestApp::spawn_app().await;
    let user_id = app.create_user().await;

    let response = app.api_client.get(app.url("/requests/4242"))
        .header("X-Sharer-User-Id", user_id)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 404);

    let body = response.json::<serde_json::Value>().await.unwrap();
    assert!(body["notFound"].is_string());
}
