//! The authenticated HTTP client.
//!
//! [`ApiClient`] centralizes credential attachment and the one-shot recovery
//! from an expired access token:
//!
//! - every outbound request gets `Authorization: Bearer <access token>` when
//!   the session holds one;
//! - a `401` on a first attempt triggers one refresh (`POST /token/refresh/`)
//!   followed by one re-issue of the original request, whose outcome —
//!   success or failure — is final;
//! - a refresh failure clears the session and surfaces as
//!   [`ApiError::RefreshFailed`];
//! - requests to the token-issue, token-refresh, and registration endpoints
//!   are exempt from the retry flow, since they manage the session itself.
//!
//! Each logical request is built once as a [`PreparedRequest`] carrying its
//! own `retried` flag, so concurrent in-flight requests recover
//! independently. Concurrent first-time `401`s may each call the refresh
//! endpoint; the session handle serializes the resulting writes.

use std::time::Duration;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::models::RefreshResponse;
use crate::session::SessionHandle;

/// Base address of the backend API when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/api";

/// Fixed per-request timeout applied uniformly to all requests.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Endpoints that precede or replace the session; never retried.
const AUTH_PATHS: [&str; 3] = ["/token/", "/token/refresh/", "/register/"];

fn is_auth_path(path: &str) -> bool {
    AUTH_PATHS.iter().any(|p| path.starts_with(p))
}

/// Body of a prepared request. Multipart fields are kept as plain data so the
/// form can be rebuilt if the request is re-issued after a refresh.
#[derive(Debug, Clone)]
pub(crate) enum Payload {
    Empty,
    Json(Value),
    Form(Vec<FormField>),
}

/// One field of a multipart form.
#[derive(Debug, Clone)]
pub(crate) enum FormField {
    Text {
        name: String,
        value: String,
    },
    File {
        name: String,
        file_name: String,
        bytes: Vec<u8>,
    },
}

/// A logical request, constructed once. The `retried` flag enforces the
/// at-most-one-retry invariant.
#[derive(Debug, Clone)]
pub(crate) struct PreparedRequest {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    payload: Payload,
    retried: bool,
}

impl PreparedRequest {
    pub(crate) fn new(method: Method, path: &str) -> Self {
        Self {
            method,
            path: path.to_string(),
            query: Vec::new(),
            payload: Payload::Empty,
            retried: false,
        }
    }

    pub(crate) fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    pub(crate) fn with_json(mut self, body: Value) -> Self {
        self.payload = Payload::Json(body);
        self
    }

    pub(crate) fn with_form(mut self, fields: Vec<FormField>) -> Self {
        self.payload = Payload::Form(fields);
        self
    }
}

/// HTTP client bound to a base URL and a session.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: SessionHandle,
}

impl ApiClient {
    /// Creates a client. A trailing slash on `base_url` is dropped.
    #[must_use]
    pub fn new(base_url: &str, session: SessionHandle) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        }
    }

    /// The session this client reads credentials from.
    #[must_use]
    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Issues a request once. Injects the bearer header when the session
    /// holds an access token; applies the fixed timeout.
    async fn send(&self, req: &PreparedRequest) -> Result<reqwest::Response, reqwest::Error> {
        let mut builder = self
            .http
            .request(req.method.clone(), self.endpoint(&req.path))
            .timeout(REQUEST_TIMEOUT);
        if let Some(token) = self.session.access_token() {
            builder = builder.bearer_auth(token);
        }
        if !req.query.is_empty() {
            builder = builder.query(&req.query);
        }
        builder = match &req.payload {
            Payload::Empty => builder,
            Payload::Json(body) => builder.json(body),
            Payload::Form(fields) => builder.multipart(build_form(fields)),
        };
        builder.send().await
    }

    /// Runs a prepared request through the full interception flow and
    /// returns the successful response body.
    pub(crate) async fn execute(&self, mut req: PreparedRequest) -> Result<String, ApiError> {
        let resp = self.send(&req).await.map_err(ApiError::Network)?;

        if resp.status() == reqwest::StatusCode::UNAUTHORIZED
            && !req.retried
            && !is_auth_path(&req.path)
        {
            req.retried = true;
            debug!(path = %req.path, "access token rejected, refreshing");
            if let Err(err) = self.refresh().await {
                if let Err(clear_err) = self.session.clear() {
                    warn!(error = %clear_err, "failed to clear session after refresh failure");
                }
                return Err(err);
            }
            // One re-issue with the new token; its outcome is final.
            let resp = self.send(&req).await.map_err(ApiError::Network)?;
            return into_result(resp).await;
        }

        into_result(resp).await
    }

    /// Exchanges the current refresh token for a new access/refresh pair and
    /// persists it into the session.
    pub async fn refresh(&self) -> Result<(), ApiError> {
        let Some(refresh) = self.session.refresh_token() else {
            return Err(ApiError::refresh_failed("no refresh token in session"));
        };

        let resp = self
            .http
            .post(self.endpoint("/token/refresh/"))
            .timeout(REQUEST_TIMEOUT)
            .json(&serde_json::json!({ "refresh": refresh }))
            .send()
            .await
            .map_err(|err| ApiError::refresh_failed(err.to_string()))?;

        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(ApiError::refresh_failed(format!(
                "HTTP {status}: {}",
                extract_message(&body)
            )));
        }

        let tokens: RefreshResponse = serde_json::from_str(&body)
            .map_err(|err| ApiError::refresh_failed(format!("bad token response: {err}")))?;
        self.session.update_tokens(tokens.access, tokens.refresh)?;
        debug!("access token refreshed");
        Ok(())
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Vec<(String, String)>,
    ) -> Result<T, ApiError> {
        let body = self
            .execute(PreparedRequest::new(Method::GET, path).with_query(query))
            .await?;
        decode(&body)
    }

    pub(crate) async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: Value,
    ) -> Result<T, ApiError> {
        let body = self
            .execute(PreparedRequest::new(Method::POST, path).with_json(body))
            .await?;
        decode(&body)
    }

    pub(crate) async fn post_form<T: DeserializeOwned>(
        &self,
        path: &str,
        fields: Vec<FormField>,
    ) -> Result<T, ApiError> {
        let body = self
            .execute(PreparedRequest::new(Method::POST, path).with_form(fields))
            .await?;
        decode(&body)
    }

    pub(crate) async fn put_form<T: DeserializeOwned>(
        &self,
        path: &str,
        fields: Vec<FormField>,
    ) -> Result<T, ApiError> {
        let body = self
            .execute(PreparedRequest::new(Method::PUT, path).with_form(fields))
            .await?;
        decode(&body)
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.execute(PreparedRequest::new(Method::DELETE, path))
            .await?;
        Ok(())
    }
}

fn build_form(fields: &[FormField]) -> reqwest::multipart::Form {
    let mut form = reqwest::multipart::Form::new();
    for field in fields {
        form = match field {
            FormField::Text { name, value } => form.text(name.clone(), value.clone()),
            FormField::File {
                name,
                file_name,
                bytes,
            } => form.part(
                name.clone(),
                reqwest::multipart::Part::bytes(bytes.clone()).file_name(file_name.clone()),
            ),
        };
    }
    form
}

/// Maps a response to its body or to the error taxonomy.
async fn into_result(resp: reqwest::Response) -> Result<String, ApiError> {
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();

    if status.is_success() {
        return Ok(body);
    }

    let (message, fields) = error_details(&body);
    match status.as_u16() {
        401 => Err(ApiError::unauthorized(message)),
        s if status.is_client_error() => Err(ApiError::Validation {
            status: s,
            message,
            fields,
        }),
        s => Err(ApiError::server(s, message)),
    }
}

/// Pulls a readable message and the offending field names out of a backend
/// error body. The backend answers either `{"detail": "..."}` or a
/// field-error map like `{"name": ["category with this name already
/// exists."]}`; the field keys survive message localization.
fn error_details(body: &str) -> (String, Vec<String>) {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) {
        if let Some(detail) = map.get("detail").and_then(|v| v.as_str()) {
            return (detail.to_string(), Vec::new());
        }
        let mut fields = Vec::new();
        let mut msgs = Vec::new();
        for (field, errors) in &map {
            let Some(list) = errors.as_array() else {
                continue;
            };
            let joined: Vec<&str> = list.iter().filter_map(|e| e.as_str()).collect();
            if !joined.is_empty() {
                fields.push(field.clone());
                msgs.push(format!("{field}: {}", joined.join("; ")));
            }
        }
        if !msgs.is_empty() {
            return (msgs.join("; "), fields);
        }
    }
    (body.to_string(), Vec::new())
}

fn extract_message(body: &str) -> String {
    error_details(body).0
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|err| ApiError::decode(err.to_string()))
}
