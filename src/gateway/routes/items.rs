use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    gateway::{client::ServerClient, routes::validation_error},
    sharer::SharerId
};

#[derive(Deserialize, Serialize, Validate, Debug)]
pub struct ItemBody{
    #[validate(length(min = 1, message = "name must not be blank"))]
    pub name: String,
    #[validate(length(min = 1, message = "description must not be blank"))]
    pub description: String,
    pub available: bool,
    #[serde(rename = "requestId", skip_serializing_if = "Option::is_none")]
    pub request_id: Option<i64>
}

#[derive(Deserialize, Serialize, Debug)]
pub struct ItemPatchBody{
    pub name: Option<String>,
    pub description: Option<String>,
    pub available: Option<bool>
}

#[derive(Deserialize, Serialize, Validate, Debug)]
pub struct CommentBody{
    #[validate(length(min = 1, message = "text must not be blank"))]
    pub text: String
}

#[derive(Deserialize, Debug)]
pub struct SearchQuery{
    pub text: String
}

#[tracing::instrument(
    "Gateway: creating item",
    skip(client)
)]
pub async fn create_item(
    client: web::Data<ServerClient>,
    sharer: SharerId,
    body: web::Json<ItemBody>
) -> Result<HttpResponse, actix_web::Error>{
    let body = body.into_inner();
    body.validate().map_err(validation_error)?;

    Ok(client.post("/items", Some(sharer.0), &body).await?)
}

#[tracing::instrument(
    "Gateway: getting item by id",
    skip(client)
)]
pub async fn get_item(
    client: web::Data<ServerClient>,
    path: web::Path<i64>
) -> Result<HttpResponse, actix_web::Error>{
    Ok(client.get(&format!("/items/{}", path.into_inner()), None, &[]).await?)
}

#[tracing::instrument(
    "Gateway: listing items of the caller",
    skip(client)
)]
pub async fn get_own_items(
    client: web::Data<ServerClient>,
    sharer: SharerId
) -> Result<HttpResponse, actix_web::Error>{
    Ok(client.get("/items", Some(sharer.0), &[]).await?)
}

#[tracing::instrument(
    "Gateway: updating item",
    skip(client)
)]
pub async fn patch_item(
    client: web::Data<ServerClient>,
    sharer: SharerId,
    path: web::Path<i64>,
    body: web::Json<ItemPatchBody>
) -> Result<HttpResponse, actix_web::Error>{
    Ok(client.patch(
        &format!("/items/{}", path.into_inner()),
        Some(sharer.0),
        Some(&body.into_inner()),
        &[]
    ).await?)
}

#[tracing::instrument(
    "Gateway: searching items",
    skip(client)
)]
pub async fn search_items(
    client: web::Data<ServerClient>,
    sharer: SharerId,
    query: web::Query<SearchQuery>
) -> Result<HttpResponse, actix_web::Error>{
    let text = query.into_inner().text;

    // Blank search never reaches the server
    if text.trim().is_empty() {
        return Ok(HttpResponse::Ok().json(Vec::<serde_json::Value>::new()));
    }

    Ok(client.get("/items/search", Some(sharer.0), &[("text", text)]).await?)
}

#[tracing::instrument(
    "Gateway: creating comment",
    skip(client)
)]
pub async fn create_comment(
    client: web::Data<ServerClient>,
    sharer: SharerId,
    path: web::Path<i64>,
    body: web::Json<CommentBody>
) -> Result<HttpResponse, actix_web::Error>{
    let body = body.into_inner();
    body.validate().map_err(validation_error)?;

    Ok(client.post(
        &format!("/items/{}/comment", path.into_inner()),
        Some(sharer.0),
        &body
    ).await?)
}
