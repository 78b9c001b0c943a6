use actix_web::{error::ErrorInternalServerError, web, HttpResponse};
use serde::Deserialize;

use crate::{
    db_interaction::comments::insert_comment,
    sharer::SharerId,
    utils::{get_pooled_connection, DbPool}
};

#[derive(Deserialize, Debug)]
pub struct CreateCommentBody{
    pub text: String
}

#[tracing::instrument(
    "Creating comment",
    skip(pool, body)
)]
pub async fn create_comment(
    pool: web::Data<DbPool>,
    sharer: SharerId,
    path: web::Path<i64>,
    body: web::Json<CreateCommentBody>
) -> Result<HttpResponse, actix_web::Error>{
    let item_id = path.into_inner();

    let conn = get_pooled_connection(&pool)
        .await
        .map_err(ErrorInternalServerError)?;

    let comment = insert_comment(conn, sharer.0, item_id, body.into_inner().text).await?;

    Ok(HttpResponse::Ok().json(comment))
}
