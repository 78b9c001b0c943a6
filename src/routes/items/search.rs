use actix_web::{error::ErrorInternalServerError, web, HttpResponse};
use serde::Deserialize;

use crate::{
    db_interaction::items::search_items,
    sharer::SharerId,
    utils::{get_pooled_connection, DbPool}
};

#[derive(Deserialize, Debug)]
pub struct SearchQuery{
    pub text: String
}

#[tracing::instrument(
    "Searching items",
    skip(pool)
)]
pub async fn search(
    pool: web::Data<DbPool>,
    sharer: SharerId,
    query: web::Query<SearchQuery>
) -> Result<HttpResponse, actix_web::Error>{
    let conn = get_pooled_connection(&pool)
        .await
        .map_err(ErrorInternalServerError)?;

    let items = search_items(conn, sharer.0, query.into_inner().text).await?;

    Ok(HttpResponse::Ok().json(items))
}
