use std::{error::Error, fmt::Debug};

use actix_web::{HttpResponse, ResponseError};
use chrono::{NaiveDateTime, Utc};
use diesel::{Connection, ExpressionMethods, OptionalExtension, QueryDsl, RunQueryDsl};
use serde::Serialize;
use thiserror::Error;

use crate::{
    db_interaction::users::find_user,
    models::{Item, ItemRequest, NewItemRequest},
    schema::{items, requests},
    telemetry::spawn_blocking_with_tracing,
    utils::{error_fmt_chain, DbConnection}
};

#[derive(Serialize, Debug)]
pub struct RequestDto{
    pub id: i64,
    pub created: NaiveDateTime,
    #[serde(rename = "userId")]
    pub user_id: i64,
    pub description: String
}

impl From<ItemRequest> for RequestDto{
    fn from(request: ItemRequest) -> Self{
        RequestDto{
            id: request.id,
            created: request.created,
            user_id: request.requester_id,
            description: request.description
        }
    }
}

// Item offered in response to a request
#[derive(Serialize, Debug)]
pub struct ShortItemDto{
    pub id: i64,
    #[serde(rename = "userId")]
    pub user_id: i64,
    pub name: String,
    pub description: String
}

impl From<Item> for ShortItemDto{
    fn from(item: Item) -> Self{
        ShortItemDto{
            id: item.id,
            user_id: item.owner_id,
            name: item.name,
            description: item.description
        }
    }
}

// Request together with the items posted as answers to it
#[derive(Serialize, Debug)]
pub struct FullRequestDto{
    pub id: i64,
    #[serde(rename = "userId")]
    pub user_id: i64,
    pub description: String,
    pub created: NaiveDateTime,
    pub items: Vec<ShortItemDto>
}

pub fn find_request(
    conn: &mut DbConnection,
    request_id: i64
) -> Result<Option<ItemRequest>, diesel::result::Error>{
    requests::table
        .find(request_id)
        .first::<ItemRequest>(conn)
        .optional()
}

fn items_for_request(
    conn: &mut DbConnection,
    request_id: i64
) -> Result<Vec<ShortItemDto>, diesel::result::Error>{
    let found = items::table
        .filter(items::request_id.eq(request_id))
        .order(items::id.asc())
        .load::<Item>(conn)?;

    Ok(found.into_iter().map(ShortItemDto::from).collect())
}

fn full_request(
    conn: &mut DbConnection,
    request: ItemRequest
) -> Result<FullRequestDto, diesel::result::Error>{
    let items = items_for_request(conn, request.id)?;

    Ok(FullRequestDto{
        id: request.id,
        user_id: request.requester_id,
        description: request.description,
        created: request.created,
        items
    })
}

#[derive(Error)]
pub enum RequestStoreError{
    #[error("Tokio threadpool error occured")]
    ThreadpoolError(#[from] tokio::task::JoinError),
    #[error("Failed to run query")]
    RunQueryError(#[from] diesel::result::Error),
    #[error("Failed to find user with id {0}")]
    UserNotFound(i64)
}

impl Debug for RequestStoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

impl ResponseError for RequestStoreError {
    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        match self {
            RequestStoreError::UserNotFound(_) =>
                HttpResponse::NotFound().json(serde_json::json!({"notFound": self.to_string()})),
            _ => HttpResponse::InternalServerError()
                .json(serde_json::json!({"error": self.to_string()}))
        }
    }
}

#[tracing::instrument(
    "Inserting item request",
    skip(conn, description)
)]
pub async fn insert_request(
    mut conn: DbConnection,
    user_id: i64,
    description: String
) -> Result<RequestDto, RequestStoreError>{
    let res = spawn_blocking_with_tracing(move || {
        conn.transaction::<ItemRequest, RequestStoreError, _>(|conn| {
            let requester = find_user(conn, user_id)?
                .ok_or(RequestStoreError::UserNotFound(user_id))?;

            let new_request = NewItemRequest{
                description,
                requester_id: requester.id,
                created: Utc::now().naive_utc()
            };

            let request = diesel::insert_into(requests::table)
                .values(&new_request)
                .get_result::<ItemRequest>(conn)?;

            Ok(request)
        })
    })
    .await??;

    Ok(res.into())
}

#[tracing::instrument(
    "Listing requests of a user",
    skip(conn)
)]
pub async fn requests_by_user(
    mut conn: DbConnection,
    user_id: i64
) -> Result<Vec<FullRequestDto>, RequestStoreError>{
    let res = spawn_blocking_with_tracing(move || {
        let found = requests::table
            .filter(requests::requester_id.eq(user_id))
            .order(requests::created.desc())
            .load::<ItemRequest>(&mut conn)?;

        let mut ret = Vec::with_capacity(found.len());
        for request in found {
            ret.push(full_request(&mut conn, request)?);
        }

        Ok::<Vec<FullRequestDto>, RequestStoreError>(ret)
    })
    .await??;

    Ok(res)
}

#[tracing::instrument(
    "Listing requests of other users",
    skip(conn)
)]
pub async fn requests_of_others(
    mut conn: DbConnection,
    user_id: i64
) -> Result<Vec<RequestDto>, RequestStoreError>{
    let res = spawn_blocking_with_tracing(move || {
        find_user(&mut conn, user_id)?
            .ok_or(RequestStoreError::UserNotFound(user_id))?;

        let found = requests::table
            .filter(requests::requester_id.ne(user_id))
            .order(requests::created.desc())
            .load::<ItemRequest>(&mut conn)?;

        Ok::<Vec<RequestDto>, RequestStoreError>(found.into_iter().map(RequestDto::from).collect())
    })
    .await??;

    Ok(res)
}

#[derive(Error)]
pub enum RequestFetchError{
    #[error("Tokio threadpool error occured")]
    ThreadpoolError(#[from] tokio::task::JoinError),
    #[error("Failed to run query")]
    RunQueryError(#[from] diesel::result::Error),
    #[error("Failed to find user with id {0}")]
    UserNotFound(i64),
    #[error("Failed to find request with id {0}")]
    NotFound(i64)
}

impl Debug for RequestFetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

impl ResponseError for RequestFetchError {
    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        match self {
            RequestFetchError::UserNotFound(_) | RequestFetchError::NotFound(_) =>
                HttpResponse::NotFound().json(serde_json::json!({"notFound": self.to_string()})),
            _ => HttpResponse::InternalServerError()
                .json(serde_json::json!({"error": self.to_string()}))
        }
    }
}

#[tracing::instrument(
    "Loading request by id",
    skip(conn)
)]
pub async fn get_request_by_id(
    mut conn: DbConnection,
    user_id: i64,
    request_id: i64
) -> Result<FullRequestDto, RequestFetchError>{
    let res = spawn_blocking_with_tracing(move || {
        find_user(&mut conn, user_id)?
            .ok_or(RequestFetchError::UserNotFound(user_id))?;

        let request = find_request(&mut conn, request_id)?
            .ok_or(RequestFetchError::NotFound(request_id))?;

        Ok::<FullRequestDto, RequestFetchError>(full_request(&mut conn, request)?)
    })
    .await??;

    Ok(res)
}
