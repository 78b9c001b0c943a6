use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    gateway::{client::ServerClient, routes::validation_error},
    sharer::SharerId
};

#[derive(Deserialize, Serialize, Validate, Debug)]
pub struct RequestAddBody{
    #[validate(length(min = 1, message = "description must not be blank"))]
    pub description: String
}

#[tracing::instrument(
    "Gateway: creating item request",
    skip(client)
)]
pub async fn create_request(
    client: web::Data<ServerClient>,
    sharer: SharerId,
    body: web::Json<RequestAddBody>
) -> Result<HttpResponse, actix_web::Error>{
    let body = body.into_inner();
    body.validate().map_err(validation_error)?;

    Ok(client.post("/requests", Some(sharer.0), &body).await?)
}

#[tracing::instrument(
    "Gateway: listing requests of the caller",
    skip(client)
)]
pub async fn get_own_requests(
    client: web::Data<ServerClient>,
    sharer: SharerId
) -> Result<HttpResponse, actix_web::Error>{
    Ok(client.get("/requests", Some(sharer.0), &[]).await?)
}

#[tracing::instrument(
    "Gateway: listing requests of other users",
    skip(client)
)]
pub async fn get_other_requests(
    client: web::Data<ServerClient>,
    sharer: SharerId
) -> Result<HttpResponse, actix_web::Error>{
    Ok(client.get("/requests/all", Some(sharer.0), &[]).await?)
}

#[tracing::instrument(
    "Gateway: getting request by id",
    skip(client)
)]
pub async fn get_request(
    client: web::Data<ServerClient>,
    sharer: SharerId,
    path: web::Path<i64>
) -> Result<HttpResponse, actix_web::Error>{
    Ok(client.get(&format!("/requests/{}", path.into_inner()), Some(sharer.0), &[]).await?)
}
