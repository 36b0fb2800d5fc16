//! HTTP client for the remote meal-ordering API
//!
//! `ApiClient` centralizes outgoing-request authentication and the recovery
//! path for authentication failures: every request asks the session for a
//! valid token first, and a 401 response triggers one refresh-and-retry
//! cycle before giving up. The per-resource modules (`menus`, `products`,
//! `orders`, `users`) are thin typed wrappers with no logic beyond query
//! construction and envelope unwrapping.

pub mod auth;
pub mod error;
pub mod menus;
pub mod orders;
pub mod products;
pub mod query;
pub mod users;

pub use error::ApiError;
pub use query::Query;

use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

use crate::config::MensaConfig;
use crate::session::Session;

/// The `{ data, meta }` wrapper the backend returns around resource payloads
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
    #[serde(default)]
    pub meta: Option<Meta>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Meta {
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(rename = "pageSize", default)]
    pub page_size: Option<u32>,
    #[serde(rename = "pageCount", default)]
    pub page_count: Option<u32>,
    #[serde(default)]
    pub total: Option<u64>,
}

/// Offset/limit paging for list endpoints
#[derive(Debug, Clone, Copy)]
pub struct PageRequest {
    pub start: u32,
    pub limit: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { start: 0, limit: 25 }
    }
}

/// Authenticated HTTP client against the configured base URL
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
    session: Session,
}

impl ApiClient {
    /// Build a client from the loaded configuration
    pub fn new(config: &MensaConfig, session: Session) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base: config.base_url()?,
            session,
        })
    }

    /// Build a client against an explicit base URL (tests)
    pub fn with_base(base: Url, session: Session) -> Self {
        Self {
            http: reqwest::Client::new(),
            base,
            session,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &Query,
    ) -> Result<T, ApiError> {
        self.request(Method::GET, path, query, None).await
    }

    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &Query,
        body: serde_json::Value,
    ) -> Result<T, ApiError> {
        self.request(Method::POST, path, query, Some(body)).await
    }

    pub(crate) async fn put<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &Query,
        body: serde_json::Value,
    ) -> Result<T, ApiError> {
        self.request(Method::PUT, path, query, Some(body)).await
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let resp = self.send_once(Method::DELETE, path, &Query::new(), &None).await?;
        let resp = match self.recover_unauthorized(resp).await? {
            Some(resp) => resp,
            None => self.send_once(Method::DELETE, path, &Query::new(), &None).await?,
        };
        expect_success(resp).await
    }

    /// Send a request with bearer authentication and one 401 recovery cycle
    ///
    /// The retry is bounded by an explicit flag: a 401 on the resubmitted
    /// request is surfaced to the caller, never retried again.
    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &Query,
        body: Option<serde_json::Value>,
    ) -> Result<T, ApiError> {
        let mut retried = false;
        loop {
            let resp = self.send_once(method.clone(), path, query, &body).await?;

            if resp.status() == StatusCode::UNAUTHORIZED && !retried {
                retried = true;
                match self.session.refresh_access_token().await {
                    Ok(_) => continue,
                    Err(err) => {
                        tracing::warn!("token refresh failed, clearing session: {}", err);
                        self.session.logout();
                        return Err(ApiError::SessionExpired);
                    }
                }
            }

            return decode_response(resp, "Request failed").await;
        }
    }

    async fn send_once(
        &self,
        method: Method,
        path: &str,
        query: &Query,
        body: &Option<serde_json::Value>,
    ) -> Result<reqwest::Response, ApiError> {
        let url = self
            .base
            .join(path)
            .map_err(|e| ApiError::Transport(format!("invalid request path {}: {}", path, e)))?;

        let mut req = self.http.request(method, url);
        if !query.is_empty() {
            req = req.query(query.params());
        }
        if let Some(body) = body {
            req = req.json(body);
        }
        let had_token = self.session.is_authenticated();
        match self.session.ensure_valid_token().await {
            Some(token) => req = req.bearer_auth(token),
            None => {
                // The session died while obtaining a token (failed refresh
                // clears it); sending unauthenticated would only earn a 401
                // and a second doomed refresh
                if had_token && !self.session.is_authenticated() {
                    return Err(ApiError::SessionExpired);
                }
            }
        }

        req.send().await.map_err(ApiError::transport)
    }

    /// 401 recovery for body-less requests: returns `None` when the request
    /// should be resubmitted with the refreshed token.
    async fn recover_unauthorized(
        &self,
        resp: reqwest::Response,
    ) -> Result<Option<reqwest::Response>, ApiError> {
        if resp.status() != StatusCode::UNAUTHORIZED {
            return Ok(Some(resp));
        }
        match self.session.refresh_access_token().await {
            Ok(_) => Ok(None),
            Err(err) => {
                tracing::warn!("token refresh failed, clearing session: {}", err);
                self.session.logout();
                Err(ApiError::SessionExpired)
            }
        }
    }
}

/// Map a response onto the error taxonomy, or deserialize its body
pub(crate) async fn decode_response<T: DeserializeOwned>(
    resp: reqwest::Response,
    fallback: &str,
) -> Result<T, ApiError> {
    let status = resp.status();
    if status.is_success() {
        return resp.json().await.map_err(ApiError::transport);
    }

    let body = resp.text().await.unwrap_or_default();
    Err(status_error(status, &body, fallback))
}

/// Check a response where no body is expected
pub(crate) async fn expect_success(resp: reqwest::Response) -> Result<(), ApiError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(());
    }
    let body = resp.text().await.unwrap_or_default();
    Err(status_error(status, &body, "Request failed"))
}

fn status_error(status: StatusCode, body: &str, fallback: &str) -> ApiError {
    match status {
        StatusCode::BAD_REQUEST => {
            ApiError::Validation(error::message_from_body(body, fallback))
        }
        StatusCode::UNAUTHORIZED => ApiError::Unauthorized,
        StatusCode::NOT_FOUND => ApiError::NotFound,
        status => ApiError::Remote {
            status: status.as_u16(),
            message: error::message_from_body(
                body,
                status.canonical_reason().unwrap_or("unknown error"),
            ),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_deserializes_with_and_without_meta() {
        let with_meta: Envelope<Vec<i32>> = serde_json::from_str(
            r#"{"data":[1,2],"meta":{"pagination":{"page":1,"pageSize":25,"pageCount":1,"total":2}}}"#,
        )
        .unwrap();
        assert_eq!(with_meta.data, vec![1, 2]);
        let pagination = with_meta.meta.unwrap().pagination.unwrap();
        assert_eq!(pagination.total, Some(2));

        let bare: Envelope<Vec<i32>> = serde_json::from_str(r#"{"data":[]}"#).unwrap();
        assert!(bare.data.is_empty());
        assert!(bare.meta.is_none());
    }

    #[test]
    fn test_status_error_mapping() {
        assert!(matches!(
            status_error(StatusCode::BAD_REQUEST, "{}", "fallback"),
            ApiError::Validation(msg) if msg == "fallback"
        ));
        assert!(matches!(
            status_error(StatusCode::UNAUTHORIZED, "", ""),
            ApiError::Unauthorized
        ));
        assert!(matches!(
            status_error(StatusCode::NOT_FOUND, "", ""),
            ApiError::NotFound
        ));
        assert!(matches!(
            status_error(StatusCode::INTERNAL_SERVER_ERROR, "", ""),
            ApiError::Remote { status: 500, .. }
        ));
    }
}
