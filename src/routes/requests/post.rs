use actix_web::{error::ErrorInternalServerError, web, HttpResponse};
use serde::Deserialize;

use crate::{
    db_interaction::requests::insert_request,
    sharer::SharerId,
    utils::{get_pooled_connection, DbPool}
};

#[derive(Deserialize, Debug)]
pub struct CreateRequestBody{
    pub description: String
}

#[tracing::instrument(
    "Creating item request",
    skip(pool, body)
)]
pub async fn create_request(
    pool: web::Data<DbPool>,
    sharer: SharerId,
    body: web::Json<CreateRequestBody>
) -> Result<HttpResponse, actix_web::Error>{
    let conn = get_pooled_connection(&pool)
        .await
        .map_err(ErrorInternalServerError)?;

    let request = insert_request(conn, sharer.0, body.into_inner().description).await?;

    Ok(HttpResponse::Ok().json(request))
}
