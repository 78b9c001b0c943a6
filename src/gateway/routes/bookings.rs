use actix_web::{error::ErrorBadRequest, web, HttpResponse};
use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    gateway::client::ServerClient,
    models::BookingState,
    sharer::SharerId
};

#[derive(Deserialize, Serialize, Debug)]
pub struct BookItemRequestBody{
    #[serde(rename = "itemId")]
    pub item_id: i64,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime
}

impl BookItemRequestBody{
    // validator derive cannot compare two fields, done by hand
    fn validate(&self) -> Result<(), String>{
        if self.item_id <= 0 {
            return Err("itemId must be positive".to_string());
        }

        if self.start >= self.end {
            return Err("start must be before end".to_string());
        }

        if self.start < Utc::now().naive_utc() {
            return Err("start must not be in the past".to_string());
        }

        Ok(())
    }
}

#[derive(Deserialize, Debug)]
pub struct StateQuery{
    pub state: Option<String>,
    pub from: Option<i64>,
    pub size: Option<i64>
}

impl StateQuery{
    fn forward_query(&self) -> Result<Vec<(&'static str, String)>, actix_web::Error>{
        let raw = self.state.as_deref().unwrap_or("all");
        let state = BookingState::from(raw).ok_or_else(|| ErrorBadRequest(
            serde_json::json!({"error": format!("Unknown state: {}", raw)})
        ))?;

        let from = self.from.unwrap_or(0);
        let size = self.size.unwrap_or(10);

        if from < 0 || size <= 0 {
            return Err(ErrorBadRequest(
                serde_json::json!({"error": "from must be non-negative and size positive"})
            ));
        }

        Ok(vec![
            ("state", state.as_str().to_string()),
            ("from", from.to_string()),
            ("size", size.to_string())
        ])
    }
}

#[tracing::instrument(
    "Gateway: creating booking",
    skip(client)
)]
pub async fn create_booking(
    client: web::Data<ServerClient>,
    sharer: SharerId,
    body: web::Json<BookItemRequestBody>
) -> Result<HttpResponse, actix_web::Error>{
    let body = body.into_inner();
    body.validate()
        .map_err(|msg| ErrorBadRequest(serde_json::json!({"error": msg})))?;

    Ok(client.post("/bookings", Some(sharer.0), &body).await?)
}

#[derive(Deserialize, Debug)]
pub struct ApproveQuery{
    pub approved: bool
}

#[tracing::instrument(
    "Gateway: approving booking",
    skip(client)
)]
pub async fn approve_booking(
    client: web::Data<ServerClient>,
    sharer: SharerId,
    path: web::Path<i64>,
    query: web::Query<ApproveQuery>
) -> Result<HttpResponse, actix_web::Error>{
    Ok(client.patch::<serde_json::Value>(
        &format!("/bookings/{}", path.into_inner()),
        Some(sharer.0),
        None,
        &[("approved", query.approved.to_string())]
    ).await?)
}

#[tracing::instrument(
    "Gateway: canceling booking",
    skip(client)
)]
pub async fn cancel_booking(
    client: web::Data<ServerClient>,
    sharer: SharerId,
    path: web::Path<i64>
) -> Result<HttpResponse, actix_web::Error>{
    Ok(client.patch::<serde_json::Value>(
        &format!("/bookings/{}/canceled", path.into_inner()),
        Some(sharer.0),
        None,
        &[]
    ).await?)
}

#[tracing::instrument(
    "Gateway: getting booking by id",
    skip(client)
)]
pub async fn get_booking(
    client: web::Data<ServerClient>,
    sharer: SharerId,
    path: web::Path<i64>
) -> Result<HttpResponse, actix_web::Error>{
    Ok(client.get(&format!("/bookings/{}", path.into_inner()), Some(sharer.0), &[]).await?)
}

#[tracing::instrument(
    "Gateway: listing bookings of the caller",
    skip(client)
)]
pub async fn get_bookings(
    client: web::Data<ServerClient>,
    sharer: SharerId,
    query: web::Query<StateQuery>
) -> Result<HttpResponse, actix_web::Error>{
    let forward = query.forward_query()?;

    Ok(client.get("/bookings", Some(sharer.0), &forward).await?)
}

#[tracing::instrument(
    "Gateway: listing bookings of the caller's items",
    skip(client)
)]
pub async fn get_owner_bookings(
    client: web::Data<ServerClient>,
    sharer: SharerId,
    query: web::Query<StateQuery>
) -> Result<HttpResponse, actix_web::Error>{
    let forward = query.forward_query()?;

    Ok(client.get("/bookings/owner", Some(sharer.0), &forward).await?)
}
