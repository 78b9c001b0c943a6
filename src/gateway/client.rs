use std::{error::Error, fmt::Debug};

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use reqwest::Method;
use serde::Serialize;
use thiserror::Error;

use crate::{sharer::SHARER_HEADER, utils::error_fmt_chain};

#[derive(Error)]
pub enum ForwardError{
    #[error("Failed to reach the shareit server")]
    RequestFailed(#[from] reqwest::Error)
}

impl Debug for ForwardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

impl ResponseError for ForwardError {
    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        HttpResponse::InternalServerError()
            .json(serde_json::json!({"error": self.to_string()}))
    }
}

// Thin HTTP client towards the core server. Responses are relayed
// verbatim, status code included.
#[derive(Clone, Debug)]
pub struct ServerClient{
    http: reqwest::Client,
    base_url: String
}

impl ServerClient {
    pub fn new(base_url: String) -> Self{
        ServerClient{
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string()
        }
    }

    async fn send<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        user_id: Option<i64>,
        body: Option<&B>,
        query: &[(&str, String)]
    ) -> Result<HttpResponse, ForwardError>{
        let mut request = self.http.request(method, format!("{}{}", self.base_url, path));

        if let Some(user_id) = user_id {
            request = request.header(SHARER_HEADER, user_id);
        }

        if !query.is_empty() {
            request = request.query(query);
        }

        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;

        let status = StatusCode::from_u16(response.status().as_u16())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = response.bytes().await?;

        Ok(HttpResponse::build(status)
            .content_type("application/json")
            .body(bytes.to_vec()))
    }

    pub async fn get(
        &self,
        path: &str,
        user_id: Option<i64>,
        query: &[(&str, String)]
    ) -> Result<HttpResponse, ForwardError>{
        self.send::<serde_json::Value>(Method::GET, path, user_id, None, query).await
    }

    pub async fn post<B: Serialize>(
        &self,
        path: &str,
        user_id: Option<i64>,
        body: &B
    ) -> Result<HttpResponse, ForwardError>{
        self.send(Method::POST, path, user_id, Some(body), &[]).await
    }

    pub async fn patch<B: Serialize>(
        &self,
        path: &str,
        user_id: Option<i64>,
        body: Option<&B>,
        query: &[(&str, String)]
    ) -> Result<HttpResponse, ForwardError>{
        self.send(Method::PATCH, path, user_id, body, query).await
    }

    pub async fn delete(
        &self,
        path: &str,
        user_id: Option<i64>
    ) -> Result<HttpResponse, ForwardError>{
        self.send::<serde_json::Value>(Method::DELETE, path, user_id, None, &[]).await
    }
}
