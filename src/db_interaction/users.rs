use std::{error::Error, fmt::Debug};

use actix_web::{HttpResponse, ResponseError};
use anyhow::Context;
use diesel::{Connection, ExpressionMethods, OptionalExtension, QueryDsl, RunQueryDsl};
use thiserror::Error;

use crate::{
    models::{NewUser, User},
    schema::users,
    telemetry::spawn_blocking_with_tracing,
    utils::{error_fmt_chain, DbConnection}
};

// Changes requested by PATCH /users/{userId}, absent fields stay untouched
#[derive(Debug, Default)]
pub struct UserChanges{
    pub name: Option<String>,
    pub email: Option<String>
}

pub fn find_user(conn: &mut DbConnection, user_id: i64) -> Result<Option<User>, diesel::result::Error>{
    users::table
        .find(user_id)
        .first::<User>(conn)
        .optional()
}

#[tracing::instrument(
    "Loading all users",
    skip_all
)]
pub async fn get_all_users(mut conn: DbConnection) -> Result<Vec<User>, anyhow::Error>{
    let res = spawn_blocking_with_tracing(move || {
        users::table
            .order(users::id.asc())
            .load::<User>(&mut conn)
            .context("Failed to load users")
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(res)
}

#[derive(Error)]
pub enum UserFetchError{
    #[error("Tokio threadpool error occured")]
    ThreadpoolError(#[from] tokio::task::JoinError),
    #[error("Failed to run query")]
    RunQueryError(#[from] diesel::result::Error),
    #[error("Failed to find user with id {0}")]
    NotFound(i64)
}

impl Debug for UserFetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

impl ResponseError for UserFetchError {
    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        match self {
            UserFetchError::NotFound(_) => HttpResponse::NotFound()
                .json(serde_json::json!({"notFound": self.to_string()})),
            _ => HttpResponse::InternalServerError()
                .json(serde_json::json!({"error": self.to_string()}))
        }
    }
}

#[tracing::instrument(
    "Loading user by id",
    skip(conn)
)]
pub async fn get_user_by_id(
    mut conn: DbConnection,
    user_id: i64
) -> Result<User, UserFetchError>{
    let res = spawn_blocking_with_tracing(move || {
        find_user(&mut conn, user_id)?
            .ok_or(UserFetchError::NotFound(user_id))
    })
    .await??;

    Ok(res)
}

#[derive(Error)]
pub enum UserInsertError{
    #[error("Tokio threadpool error occured")]
    ThreadpoolError(#[from] tokio::task::JoinError),
    #[error("Failed to run query")]
    RunQueryError(#[from] diesel::result::Error),
    #[error("Email {0} is already in use")]
    EmailTaken(String)
}

impl Debug for UserInsertError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

impl ResponseError for UserInsertError {
    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        match self {
            UserInsertError::EmailTaken(_) => HttpResponse::Conflict()
                .json(serde_json::json!({"conflict": self.to_string()})),
            _ => HttpResponse::InternalServerError()
                .json(serde_json::json!({"error": self.to_string()}))
        }
    }
}

#[tracing::instrument(
    "Inserting user",
    skip(conn)
)]
pub async fn insert_user(
    mut conn: DbConnection,
    new_user: NewUser
) -> Result<User, UserInsertError>{
    let res = spawn_blocking_with_tracing(move || {
        let email = new_user.email.clone();

        diesel::insert_into(users::table)
            .values(&new_user)
            .get_result::<User>(&mut conn)
            .map_err(|e| match e {
                diesel::result::Error::DatabaseError(
                    diesel::result::DatabaseErrorKind::UniqueViolation,
                    _
                ) => UserInsertError::EmailTaken(email),
                other => UserInsertError::RunQueryError(other)
            })
    })
    .await??;

    Ok(res)
}

#[derive(Error)]
pub enum UserUpdateError{
    #[error("Tokio threadpool error occured")]
    ThreadpoolError(#[from] tokio::task::JoinError),
    #[error("Failed to run query")]
    RunQueryError(#[from] diesel::result::Error),
    #[error("Failed to find user with id {0}")]
    NotFound(i64),
    #[error("Email {0} is already in use")]
    EmailTaken(String)
}

impl Debug for UserUpdateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

impl ResponseError for UserUpdateError {
    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        match self {
            UserUpdateError::NotFound(_) => HttpResponse::NotFound()
                .json(serde_json::json!({"notFound": self.to_string()})),
            UserUpdateError::EmailTaken(_) => HttpResponse::Conflict()
                .json(serde_json::json!({"conflict": self.to_string()})),
            _ => HttpResponse::InternalServerError()
                .json(serde_json::json!({"error": self.to_string()}))
        }
    }
}

#[tracing::instrument(
    "Updating user",
    skip(conn, changes)
)]
pub async fn update_user(
    mut conn: DbConnection,
    user_id: i64,
    changes: UserChanges
) -> Result<User, UserUpdateError>{
    let res = spawn_blocking_with_tracing(move || {
        conn.transaction::<User, UserUpdateError, _>(|conn| {
            let old_user = users::table
                .find(user_id)
                .first::<User>(conn)
                .optional()?
                .ok_or(UserUpdateError::NotFound(user_id))?;

            let name = changes.name.unwrap_or(old_user.name);
            let email = changes.email.unwrap_or(old_user.email);

            diesel::update(users::table.find(user_id))
                .set((users::name.eq(&name), users::email.eq(&email)))
                .get_result::<User>(conn)
                .map_err(|e| match e {
                    diesel::result::Error::DatabaseError(
                        diesel::result::DatabaseErrorKind::UniqueViolation,
                        _
                    ) => UserUpdateError::EmailTaken(email),
                    other => UserUpdateError::RunQueryError(other)
                })
        })
    })
    .await??;

    Ok(res)
}

#[derive(Error)]
pub enum UserDeleteError{
    #[error("Tokio threadpool error occured")]
    ThreadpoolError(#[from] tokio::task::JoinError),
    #[error("Failed to run query")]
    RunQueryError(#[from] diesel::result::Error),
    #[error("Failed to find user with id {0}")]
    NotFound(i64)
}

impl Debug for UserDeleteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

impl ResponseError for UserDeleteError {
    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        match self {
            UserDeleteError::NotFound(_) => HttpResponse::NotFound()
                .json(serde_json::json!({"notFound": self.to_string()})),
            _ => HttpResponse::InternalServerError()
                .json(serde_json::json!({"error": self.to_string()}))
        }
    }
}

#[tracing::instrument(
    "Deleting user",
    skip(conn)
)]
pub async fn delete_user(
    mut conn: DbConnection,
    user_id: i64
) -> Result<(), UserDeleteError>{
    spawn_blocking_with_tracing(move || {
        let affected_rows = diesel::delete(users::table.find(user_id))
            .execute(&mut conn)?;

        if affected_rows == 0 {
            return Err(UserDeleteError::NotFound(user_id));
        }

        Ok(())
    })
    .await??;

    Ok(())
}
