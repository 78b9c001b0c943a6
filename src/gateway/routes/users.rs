use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::gateway::{client::ServerClient, routes::validation_error};

#[derive(Deserialize, Serialize, Validate, Debug)]
pub struct UserRequestBody{
    #[validate(length(min = 1, message = "name must not be blank"))]
    pub name: String,
    #[validate(email(message = "email must be well-formed"), length(min = 1, message = "email must not be blank"))]
    pub email: String
}

#[derive(Deserialize, Serialize, Validate, Debug)]
pub struct UserPatchBody{
    pub name: Option<String>,
    #[validate(email(message = "email must be well-formed"))]
    pub email: Option<String>
}

#[tracing::instrument(
    "Gateway: creating user",
    skip(client)
)]
pub async fn create_user(
    client: web::Data<ServerClient>,
    body: web::Json<UserRequestBody>
) -> Result<HttpResponse, actix_web::Error>{
    let body = body.into_inner();
    body.validate().map_err(validation_error)?;

    Ok(client.post("/users", None, &body).await?)
}

#[tracing::instrument(
    "Gateway: getting user by id",
    skip(client)
)]
pub async fn get_user(
    client: web::Data<ServerClient>,
    path: web::Path<i64>
) -> Result<HttpResponse, actix_web::Error>{
    Ok(client.get(&format!("/users/{}", path.into_inner()), None, &[]).await?)
}

#[tracing::instrument(
    "Gateway: listing users",
    skip(client)
)]
pub async fn get_users(
    client: web::Data<ServerClient>
) -> Result<HttpResponse, actix_web::Error>{
    Ok(client.get("/users", None, &[]).await?)
}

#[tracing::instrument(
    "Gateway: updating user",
    skip(client)
)]
pub async fn patch_user(
    client: web::Data<ServerClient>,
    path: web::Path<i64>,
    body: web::Json<UserPatchBody>
) -> Result<HttpResponse, actix_web::Error>{
    let body = body.into_inner();
    body.validate().map_err(validation_error)?;

    Ok(client.patch(&format!("/users/{}", path.into_inner()), None, Some(&body), &[]).await?)
}

#[tracing::instrument(
    "Gateway: deleting user",
    skip(client)
)]
pub async fn delete_user(
    client: web::Data<ServerClient>,
    path: web::Path<i64>
) -> Result<HttpResponse, actix_web::Error>{
    Ok(client.delete(&format!("/users/{}", path.into_inner()), None).await?)
}
