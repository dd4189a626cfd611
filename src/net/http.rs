//! HTTP client with bearer attachment and refresh-on-401 interception.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every network call the application makes goes through [`HttpClient`].
//! Requests pass an ordered list of request stages (bearer attachment is
//! one of them), then a [`Transport`]. An unauthorized response hands the
//! original request descriptor to the refresh stage, which repairs the
//! session and replays the request at most once. The client never
//! navigates; it fires an injected `on_invalidated` hook and leaves the
//! redirect to the application shell.
//!
//! ERROR HANDLING
//! ==============
//! Non-2xx responses other than the unauthorized signal are returned to
//! callers unmodified; only transport failures and terminal session
//! failures surface as `Err`.

#[cfg(test)]
#[path = "http_test.rs"]
mod http_test;

use std::cell::RefCell;
use std::rc::Rc;

use futures::future::{LocalBoxFuture, Shared};
use thiserror::Error;

use crate::session::store::{TokenPair, TokenStore};

use super::refresh;

/// HTTP method subset the backend contract uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// Descriptor of an outgoing request.
///
/// Kept as plain data so the refresh stage can hold the original call and
/// replay it after a token rotation.
#[derive(Clone, Debug, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

impl HttpRequest {
    /// A GET request with the default `Accept` header.
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            headers: vec![("Accept".to_owned(), "application/json".to_owned())],
            body: None,
        }
    }

    /// A POST request carrying a JSON body and the default content headers.
    pub fn post(url: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            method: Method::Post,
            url: url.into(),
            headers: vec![
                ("Accept".to_owned(), "application/json".to_owned()),
                ("Content-Type".to_owned(), "application/json".to_owned()),
            ],
            body: Some(body),
        }
    }

    /// First header value with the given name, if present.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Response descriptor handed back by a [`Transport`].
#[derive(Clone, Debug, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub status_text: String,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Deserialize the body, mapping parse failures to [`HttpError::Decode`].
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, HttpError> {
        serde_json::from_str(&self.body).map_err(|err| HttpError::Decode(err.to_string()))
    }
}

/// Failures surfaced by the transport layer.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum HttpError {
    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(String),
    /// A response arrived but its body was not what the caller expected.
    #[error("malformed response body: {0}")]
    Decode(String),
    /// The session could not be repaired; the caller's request is rejected
    /// and the application is being sent back to the login entry point.
    #[error("session expired")]
    SessionExpired,
}

/// Pluggable request transport. The browser build uses
/// [`super::gloo::GlooTransport`]; tests inject mocks.
pub trait Transport {
    fn send(&self, req: HttpRequest) -> LocalBoxFuture<'_, Result<HttpResponse, HttpError>>;
}

/// One step of the request pipeline: transform a request before it is sent.
pub type RequestStage = Rc<dyn Fn(HttpRequest) -> HttpRequest>;

/// Decides whether a response is the "authorization expired" signal that
/// should trigger the refresh protocol.
pub type UnauthorizedPredicate = Rc<dyn Fn(&HttpResponse) -> bool>;

/// The default unauthorized signal: status 401 with the exact status text
/// `"Unauthorized"`. Deliberately narrow; inject a different predicate via
/// [`HttpClient::set_unauthorized_predicate`] to change the policy.
pub fn default_unauthorized(resp: &HttpResponse) -> bool {
    resp.status == 401 && resp.status_text == "Unauthorized"
}

/// Attach the bearer credential when one is held; otherwise leave the
/// request untouched.
pub(crate) fn attach_bearer(mut req: HttpRequest, token: Option<String>) -> HttpRequest {
    if let Some(token) = token {
        req.headers.push(("Authorization".to_owned(), format!("Bearer {token}")));
    }
    req
}

/// Bearer-attachment stage reading the current access token on every call,
/// so a mid-session token rotation is picked up without reconfiguration.
pub fn bearer_stage(tokens: Rc<dyn TokenStore>) -> RequestStage {
    Rc::new(move |req| attach_bearer(req, tokens.access_token()))
}

/// Single choke point for all REST traffic.
pub struct HttpClient {
    transport: Rc<dyn Transport>,
    tokens: Rc<dyn TokenStore>,
    base_url: String,
    request_stages: Vec<RequestStage>,
    unauthorized: RefCell<UnauthorizedPredicate>,
    on_invalidated: RefCell<Option<Rc<dyn Fn()>>>,
    refresh_in_flight: RefCell<Option<Shared<LocalBoxFuture<'static, Result<TokenPair, HttpError>>>>>,
}

impl HttpClient {
    pub fn new(transport: Rc<dyn Transport>, tokens: Rc<dyn TokenStore>, base_url: String) -> Self {
        let request_stages = vec![bearer_stage(tokens.clone())];
        Self {
            transport,
            tokens,
            base_url,
            request_stages,
            unauthorized: RefCell::new(Rc::new(default_unauthorized)),
            on_invalidated: RefCell::new(None),
            refresh_in_flight: RefCell::new(None),
        }
    }

    /// Replace the unauthorized-signal predicate.
    pub fn set_unauthorized_predicate(&self, predicate: UnauthorizedPredicate) {
        *self.unauthorized.borrow_mut() = predicate;
    }

    /// Install the hook fired when the session becomes unrecoverable. The
    /// application shell translates this into the `/login` redirect.
    pub fn set_on_invalidated(&self, hook: Rc<dyn Fn()>) {
        *self.on_invalidated.borrow_mut() = Some(hook);
    }

    /// Resolve an endpoint path against the configured base URL.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Run a request through the pipeline, intercepting the unauthorized
    /// signal with the refresh protocol. See the module docs for the exact
    /// state machine.
    pub async fn execute(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        let prepared = self.apply_stages(req.clone());
        let resp = self.transport.send(prepared).await?;
        let expired_auth = (self.unauthorized.borrow().clone())(&resp);
        if !expired_auth {
            return Ok(resp);
        }
        refresh::repair_unauthorized(self, req).await
    }

    /// GET `path` relative to the base URL.
    pub async fn get(&self, path: &str) -> Result<HttpResponse, HttpError> {
        self.execute(HttpRequest::get(self.url(path))).await
    }

    /// POST a JSON body to `path` relative to the base URL.
    pub async fn post(&self, path: &str, body: serde_json::Value) -> Result<HttpResponse, HttpError> {
        self.execute(HttpRequest::post(self.url(path), body)).await
    }

    pub(crate) fn apply_stages(&self, req: HttpRequest) -> HttpRequest {
        self.request_stages.iter().fold(req, |req, stage| stage(req))
    }

    pub(crate) fn transport(&self) -> Rc<dyn Transport> {
        self.transport.clone()
    }

    pub(crate) fn tokens(&self) -> Rc<dyn TokenStore> {
        self.tokens.clone()
    }

    pub(crate) fn refresh_slot(
        &self,
    ) -> &RefCell<Option<Shared<LocalBoxFuture<'static, Result<TokenPair, HttpError>>>>> {
        &self.refresh_in_flight
    }

    /// Tear the session down: clear both persisted tokens and notify the
    /// shell. The hook fires only when credentials were actually held, so
    /// concurrent failures collapse into a single notification.
    pub(crate) fn invalidate_session(&self) {
        let had_credentials =
            self.tokens.access_token().is_some() || self.tokens.refresh_token().is_some();
        self.tokens.clear();
        if !had_credentials {
            return;
        }
        log::warn!("session invalidated; credentials cleared");
        let hook = self.on_invalidated.borrow().clone();
        if let Some(hook) = hook {
            hook();
        }
    }
}
