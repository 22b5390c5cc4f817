//! Shared HTTP client carrying the base URL and default headers.
//!
//! SYSTEM CONTEXT
//! ==============
//! One instance is created at bootstrap and cloned into pages. Clones share
//! the header map, so a login in one place authorizes every later request.
//! The `Authorization` header follows the session token through a session
//! subscription installed by bootstrap.
//!
//! Client-side (`csr`): requests go out through `gloo-net`.
//! Natively there is no transport; sends fail with [`ApiError::Unavailable`]
//! while header and URL handling stay fully testable.
//!
//! ERROR HANDLING
//! ==============
//! Callers get `Result<_, ApiError>`; non-2xx responses carry the backend's
//! `detail` message when it sent one.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "http_test.rs"]
mod http_test;

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::util::storage::{ACCESS_TOKEN_KEY, SharedStore, get_non_empty};

pub const AUTHORIZATION: &str = "Authorization";
const CONTENT_TYPE: &str = "Content-Type";
const JSON_MEDIA_TYPE: &str = "application/json";

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),
    #[error("request failed with status {status}{}", detail_suffix(.detail.as_deref()))]
    Status { status: u16, detail: Option<String> },
    #[error("unexpected response body: {0}")]
    Decode(String),
    #[error("token does not carry a role")]
    MissingRole,
    #[error("{0}")]
    InvalidInput(String),
    #[error("HTTP is only available in the browser")]
    Unavailable,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// Fully resolved request: absolute URL and header snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreparedRequest {
    pub method: Method,
    pub url: String,
    pub headers: BTreeMap<String, String>,
}

/// Cheaply cloneable client; clones share base URL and headers.
#[derive(Clone)]
pub struct HttpClient {
    base_url: Rc<str>,
    headers: Rc<RefCell<BTreeMap<String, String>>>,
    storage: SharedStore,
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.base_url)
            .field("authorized", &self.authorization().is_some())
            .finish_non_exhaustive()
    }
}

impl HttpClient {
    /// Create a client, applying any token persisted by an earlier page load.
    #[must_use]
    pub fn new(base_url: &str, storage: SharedStore) -> Self {
        let client = Self {
            base_url: Rc::from(base_url.trim_end_matches('/')),
            headers: Rc::new(RefCell::new(BTreeMap::new())),
            storage,
        };
        match get_non_empty(client.storage.as_ref(), ACCESS_TOKEN_KEY) {
            Some(token) => {
                log::debug!("restoring persisted bearer token");
                client.insert_bearer(&token);
            }
            None => log::debug!("no persisted bearer token"),
        }
        client
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Set or remove the bearer token, in headers and in storage.
    pub fn set_auth_token(&self, token: Option<&str>) {
        match token {
            Some(token) => {
                self.storage.set(ACCESS_TOKEN_KEY, token);
                self.insert_bearer(token);
                log::debug!("bearer token set");
            }
            None => {
                self.storage.remove(ACCESS_TOKEN_KEY);
                self.headers.borrow_mut().remove(AUTHORIZATION);
                log::debug!("bearer token removed");
            }
        }
    }

    /// Current `Authorization` header value.
    #[must_use]
    pub fn authorization(&self) -> Option<String> {
        self.header(AUTHORIZATION)
    }

    #[must_use]
    pub fn header(&self, name: &str) -> Option<String> {
        self.headers.borrow().get(name).cloned()
    }

    /// Add or replace a default header sent with every request.
    pub fn set_header(&self, name: &str, value: &str) {
        self.headers
            .borrow_mut()
            .insert(name.to_owned(), value.to_owned());
    }

    /// Absolute URL for `path` with exactly one slash at the join.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    #[must_use]
    pub fn prepare(&self, method: Method, path: &str) -> PreparedRequest {
        PreparedRequest {
            method,
            url: self.endpoint(path),
            headers: self.headers.borrow().clone(),
        }
    }

    /// `GET path`, decoding a JSON response.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let request = self.prepare(Method::Get, path);
        send(request, Body::Empty).await
    }

    /// `POST path` with a JSON body, decoding a JSON response.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let json = serde_json::to_string(body).map_err(|e| ApiError::InvalidInput(e.to_string()))?;
        let request = self.prepare(Method::Post, path);
        send(request, Body::Json(json)).await
    }

    /// `POST path` with a urlencoded form body, decoding a JSON response.
    ///
    /// # Errors
    ///
    /// See [`ApiError`].
    pub async fn post_form<T: DeserializeOwned>(
        &self,
        path: &str,
        fields: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let fields = fields
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        let request = self.prepare(Method::Post, path);
        send(request, Body::Form(fields)).await
    }

    fn insert_bearer(&self, token: &str) {
        self.headers
            .borrow_mut()
            .insert(AUTHORIZATION.to_owned(), bearer(token));
    }
}

#[must_use]
pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

fn detail_suffix(detail: Option<&str>) -> String {
    detail.map(|d| format!(": {d}")).unwrap_or_default()
}

/// Error for a non-2xx response, using FastAPI's `{"detail": ...}` body.
#[must_use]
pub fn status_error(status: u16, body: &str) -> ApiError {
    let detail = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("detail").cloned())
        .map(|d| match d {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        });
    ApiError::Status { status, detail }
}

#[cfg_attr(not(feature = "csr"), allow(dead_code))]
enum Body {
    Empty,
    Json(String),
    Form(Vec<(String, String)>),
}

#[cfg(feature = "csr")]
async fn send<T: DeserializeOwned>(request: PreparedRequest, body: Body) -> Result<T, ApiError> {
    use gloo_net::http::{Request, RequestBuilder};

    let mut builder: RequestBuilder = match request.method {
        Method::Get => Request::get(&request.url),
        Method::Post => Request::post(&request.url),
    };
    for (name, value) in &request.headers {
        builder = builder.header(name, value);
    }

    let built = match body {
        Body::Empty => builder.build(),
        Body::Json(json) => builder.header(CONTENT_TYPE, JSON_MEDIA_TYPE).body(json),
        Body::Form(fields) => {
            let params = web_sys::UrlSearchParams::new()
                .map_err(|_| ApiError::InvalidInput("form encoding unavailable".to_owned()))?;
            for (k, v) in &fields {
                params.append(k, v);
            }
            builder.body(params)
        }
    }
    .map_err(|e| ApiError::Network(e.to_string()))?;

    let resp = built
        .send()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;
    if !resp.ok() {
        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();
        log::warn!("{:?} {} failed with {status}", request.method, request.url);
        return Err(status_error(status, &text));
    }
    resp.json::<T>()
        .await
        .map_err(|e| ApiError::Decode(e.to_string()))
}

#[cfg(not(feature = "csr"))]
async fn send<T: DeserializeOwned>(request: PreparedRequest, body: Body) -> Result<T, ApiError> {
    let _ = (request, body);
    Err(ApiError::Unavailable)
}
