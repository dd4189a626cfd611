//! Typed REST calls for the accounts and token endpoints.
//!
//! ERROR HANDLING
//! ==============
//! Transport and session failures pass through as [`ApiError::Http`];
//! non-2xx responses become [`ApiError::Rejected`] with the message and
//! per-field errors parsed out of the backend's JSON body. Callers own all
//! user-facing presentation.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::collections::BTreeMap;
use std::rc::Rc;

use thiserror::Error;

use super::http::{HttpClient, HttpError, HttpResponse};
use super::types::{AccountUser, AuthResponse, LoginRequest, RegisterRequest, Role};

pub(crate) const PROFILE_ENDPOINT: &str = "accounts/profile/";
pub(crate) const LOGIN_ENDPOINT: &str = "accounts/login/";
pub(crate) const REGISTER_ENDPOINT: &str = "accounts/register/";
pub(crate) const LOGOUT_ENDPOINT: &str = "accounts/logout/";
pub(crate) const REFRESH_ENDPOINT: &str = "token/refresh/";

/// Failures surfaced by typed endpoint calls.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ApiError {
    /// Transport-level failure, including a terminated session.
    #[error(transparent)]
    Http(#[from] HttpError),
    /// The backend answered with a non-2xx status and a JSON error body.
    #[error("{message}")]
    Rejected {
        status: u16,
        message: String,
        /// Per-field validation errors (registration), empty otherwise.
        field_errors: BTreeMap<String, Vec<String>>,
    },
}

impl ApiError {
    /// Whether this failure already forced the session teardown, meaning
    /// the caller should not render it as a form error.
    pub fn is_session_expired(&self) -> bool {
        matches!(self, Self::Http(HttpError::SessionExpired))
    }
}

/// Typed client over the shared [`HttpClient`].
#[derive(Clone)]
pub struct ApiClient {
    http: Rc<HttpClient>,
}

impl ApiClient {
    pub fn new(http: Rc<HttpClient>) -> Self {
        Self { http }
    }

    /// The underlying pipeline, exposed so the application shell can
    /// install the session-invalidated hook.
    pub fn http(&self) -> &Rc<HttpClient> {
        &self.http
    }

    /// GET `accounts/profile/`: the bearer-authenticated identity probe.
    pub async fn fetch_profile(&self) -> Result<AccountUser, ApiError> {
        let resp = self.http.get(PROFILE_ENDPOINT).await?;
        expect_json(&resp)
    }

    /// POST `accounts/login/`.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        role_hint: Option<Role>,
    ) -> Result<AuthResponse, ApiError> {
        let body = LoginRequest {
            username: username.to_owned(),
            password: password.to_owned(),
            role: role_hint,
        };
        let resp = self.http.post(LOGIN_ENDPOINT, request_body(&body)?).await?;
        expect_json(&resp)
    }

    /// POST `accounts/register/`.
    pub async fn register(&self, payload: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        let resp = self.http.post(REGISTER_ENDPOINT, request_body(payload)?).await?;
        expect_json(&resp)
    }

    /// POST `accounts/logout/` with the refresh token to revoke. Callers
    /// treat failures as non-fatal; this method only reports them.
    pub async fn logout_notify(&self, refresh: &str) -> Result<(), ApiError> {
        let resp = self
            .http
            .post(LOGOUT_ENDPOINT, serde_json::json!({ "refresh": refresh }))
            .await?;
        if resp.is_success() {
            Ok(())
        } else {
            Err(rejected(&resp))
        }
    }
}

fn request_body<T: serde::Serialize>(payload: &T) -> Result<serde_json::Value, ApiError> {
    serde_json::to_value(payload)
        .map_err(|err| ApiError::Http(HttpError::Network(format!("request serialization: {err}"))))
}

fn expect_json<T: serde::de::DeserializeOwned>(resp: &HttpResponse) -> Result<T, ApiError> {
    if resp.is_success() {
        Ok(resp.json()?)
    } else {
        Err(rejected(resp))
    }
}

fn rejected(resp: &HttpResponse) -> ApiError {
    let (message, field_errors) = parse_rejection(resp.status, &resp.body);
    ApiError::Rejected {
        status: resp.status,
        message,
        field_errors,
    }
}

/// Pull a human-readable message and any per-field error map out of a
/// backend error body. The backend uses `detail` for auth-style errors,
/// `error` for ad-hoc ones, and `{field: [messages]}` maps for validation.
pub(crate) fn parse_rejection(status: u16, body: &str) -> (String, BTreeMap<String, Vec<String>>) {
    let fallback = format!("request failed with status {status}");
    let Ok(serde_json::Value::Object(map)) = serde_json::from_str::<serde_json::Value>(body) else {
        return (fallback, BTreeMap::new());
    };

    for key in ["detail", "error"] {
        if let Some(serde_json::Value::String(message)) = map.get(key) {
            return (message.clone(), BTreeMap::new());
        }
    }

    let mut field_errors = BTreeMap::new();
    for (field, value) in &map {
        let messages: Vec<String> = match value {
            serde_json::Value::String(message) => vec![message.clone()],
            serde_json::Value::Array(items) => items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_owned))
                .collect(),
            _ => Vec::new(),
        };
        if !messages.is_empty() {
            field_errors.insert(field.clone(), messages);
        }
    }

    if field_errors.is_empty() {
        (fallback, field_errors)
    } else {
        ("please correct the highlighted fields".to_owned(), field_errors)
    }
}
