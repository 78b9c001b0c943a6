use actix_web::{error::ErrorInternalServerError, web, HttpResponse};
use serde::Deserialize;

use crate::{
    db_interaction::users::insert_user,
    models::NewUser,
    utils::{get_pooled_connection, DbPool}
};

#[derive(Deserialize, Debug)]
pub struct CreateUserBody{
    pub name: String,
    pub email: String
}

#[tracing::instrument(
    "Creating user",
    skip(pool)
)]
pub async fn create_user(
    pool: web::Data<DbPool>,
    body: web::Json<CreateUserBody>
) -> Result<HttpResponse, actix_web::Error>{
    let conn = get_pooled_connection(&pool)
        .await
        .map_err(ErrorInternalServerError)?;

    let body = body.into_inner();
    let user = insert_user(conn, NewUser{ name: body.name, email: body.email }).await?;

    Ok(HttpResponse::Ok().json(user))
}
