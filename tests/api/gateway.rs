use chrono::{Duration, Utc};
use wiremock::{
    matchers::{header, method, path, query_param},
    Mock,
    ResponseTemplate
};

use crate::helpers::GatewayApp;

#[actix_web::test]
async fn valid_user_creation_is_forwarded(){
    let app = GatewayApp::spawn_gateway().await;

    let stub_body = serde_json::json!({
        "id": 1,
        "name": "Alice",
        "email": "alice@example.com"
    });
    Mock::given(method("POST"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&stub_body))
        .expect(1)
        .mount(&app.server_stub)
        .await;

    let response = app.api_client.post(app.url("/users"))
        .json(&serde_json::json!({
            "name": "Alice",
            "email": "alice@example.com"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(response.json::<serde_json::Value>().await.unwrap(), stub_body);
}

#[actix_web::test]
async fn malformed_email_never_reaches_the_server(){
    let app = GatewayApp::spawn_gateway().await;

    Mock::given(method("POST"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.server_stub)
        .await;

    let response = app.api_client.post(app.url("/users"))
        .json(&serde_json::json!({
            "name": "Alice",
            "email": "not-an-email"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);
}

#[actix_web::test]
async fn booking_with_end_before_start_is_rejected(){
    let app = GatewayApp::spawn_gateway().await;

    Mock::given(method("POST"))
        .and(path("/bookings"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.server_stub)
        .await;

    let now = Utc::now().naive_utc();
    let response = app.api_client.post(app.url("/bookings"))
        .header("X-Sharer-User-Id", 1)
        .json(&serde_json::json!({
            "itemId": 1,
            "start": (now + Duration::days(2)).format("%Y-%m-%dT%H:%M:%S").to_string(),
            "end": (now + Duration::days(1)).format("%Y-%m-%dT%H:%M:%S").to_string()
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);
}

#[actix_web::test]
async fn unknown_booking_state_is_rejected_before_forwarding(){
    let app = GatewayApp::spawn_gateway().await;

    Mock::given(method("GET"))
        .and(path("/bookings"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.server_stub)
        .await;

    let response = app.api_client.get(app.url("/bookings"))
        .header("X-Sharer-User-Id", 1)
        .query(&[("state", "SOMETIMES")])
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);

    let body = response.json::<serde_json::Value>().await.unwrap();
    assert_eq!(body["error"], "Unknown state: SOMETIMES");
}

#[actix_web::test]
async fn blank_search_is_answered_without_forwarding(){
    let app = GatewayApp::spawn_gateway().await;

    Mock::given(method("GET"))
        .and(path("/items/search"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.server_stub)
        .await;

    let response = app.api_client.get(app.url("/items/search"))
        .header("X-Sharer-User-Id", 1)
        .query(&[("text", "   ")])
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);

    let body = response.json::<serde_json::Value>().await.unwrap();
    assert_eq!(body.as_array().unwrap().len(), 0);
}

#[actix_web::test]
async fn sharer_header_is_propagated(){
    let app = GatewayApp::spawn_gateway().await;

    Mock::given(method("GET"))
        .and(path("/items"))
        .and(header("X-Sharer-User-Id", "7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&app.server_stub)
        .await;

    let response = app.api_client.get(app.url("/items"))
        .header("X-Sharer-User-Id", 7)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);
}

#[actix_web::test]
async fn state_filter_is_normalized_and_forwarded(){
    let app = GatewayApp::spawn_gateway().await;

    Mock::given(method("GET"))
        .and(path("/bookings"))
        .and(query_param("state", "FUTURE"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&app.server_stub)
        .await;

    let response = app.api_client.get(app.url("/bookings"))
        .header("X-Sharer-User-Id", 1)
        .query(&[("state", "future")])
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);
}

#[actix_web::test]
async fn server_error_responses_are_relayed(){
    let app = GatewayApp::spawn_gateway().await;

    let stub_body = serde_json::json!({"notFound": "No user with id 4242"});
    Mock::given(method("GET"))
        .and(path("/users/4242"))
        .respond_with(ResponseTemplate::new(404).set_body_json(&stub_body))
        .expect(1)
        .mount(&app.server_stub)
        .await;

    let response = app.api_client.get(app.url("/users/4242"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 404);
    assert_eq!(response.json::<serde_json::Value>().await.unwrap(), stub_body);
}

#[actix_web::test]
async fn blank_item_name_is_rejected(){
    let app = GatewayApp::spawn_gateway().await;

    Mock::given(method("POST"))
        .and(path("/items"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.server_stub)
        .await;

    let response = app.api_client.post(app.url("/items"))
        .header("X-Sharer-User-Id", 1)
        .json(&serde_json::json!({
            "name": "",
            "description": "A cordless drill",
            "available": true
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);
}
