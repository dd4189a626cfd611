//! Test doubles for the network pipeline.
//!
//! `MockTransport` answers requests from a handler closure and records
//! every call, so tests can assert on attached headers, call counts, and
//! ordering. `yielding` mode suspends each response for one poll, which is
//! what lets concurrency tests overlap two in-flight requests on a
//! single-threaded executor.

use std::cell::{Cell, RefCell};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use futures::FutureExt;
use futures::future::LocalBoxFuture;

use crate::session::store::MemoryTokenStore;

use super::http::{HttpClient, HttpError, HttpRequest, HttpResponse, Transport};

type Handler = Box<dyn Fn(&HttpRequest, usize) -> Result<HttpResponse, HttpError>>;

pub(crate) struct MockTransport {
    handler: Handler,
    calls: RefCell<Vec<HttpRequest>>,
    yield_once: Cell<bool>,
}

impl MockTransport {
    pub(crate) fn new(
        handler: impl Fn(&HttpRequest, usize) -> Result<HttpResponse, HttpError> + 'static,
    ) -> Rc<Self> {
        Rc::new(Self {
            handler: Box::new(handler),
            calls: RefCell::new(Vec::new()),
            yield_once: Cell::new(false),
        })
    }

    /// Like [`MockTransport::new`], but every response suspends for one
    /// poll before resolving.
    pub(crate) fn yielding(
        handler: impl Fn(&HttpRequest, usize) -> Result<HttpResponse, HttpError> + 'static,
    ) -> Rc<Self> {
        let transport = Self::new(handler);
        transport.yield_once.set(true);
        transport
    }

    pub(crate) fn calls(&self) -> Vec<HttpRequest> {
        self.calls.borrow().clone()
    }

    /// How many recorded requests hit a URL containing `fragment`.
    pub(crate) fn calls_to(&self, fragment: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|req| req.url.contains(fragment))
            .count()
    }
}

impl Transport for MockTransport {
    fn send(&self, req: HttpRequest) -> LocalBoxFuture<'_, Result<HttpResponse, HttpError>> {
        let index = {
            let mut calls = self.calls.borrow_mut();
            calls.push(req.clone());
            calls.len() - 1
        };
        let result = (self.handler)(&req, index);
        let suspend = self.yield_once.get();
        async move {
            if suspend {
                YieldOnce::default().await;
            }
            result
        }
        .boxed_local()
    }
}

/// Returns `Pending` exactly once, waking immediately.
#[derive(Default)]
struct YieldOnce {
    yielded: bool,
}

impl Future for YieldOnce {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.yielded {
            Poll::Ready(())
        } else {
            self.yielded = true;
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    }
}

/// A fully wired pipeline over a mock transport and in-memory tokens.
pub(crate) struct Harness {
    pub(crate) client: Rc<HttpClient>,
    pub(crate) tokens: Rc<MemoryTokenStore>,
    pub(crate) transport: Rc<MockTransport>,
}

pub(crate) fn harness(
    handler: impl Fn(&HttpRequest, usize) -> Result<HttpResponse, HttpError> + 'static,
) -> Harness {
    harness_with(MockTransport::new(handler))
}

pub(crate) fn harness_with(transport: Rc<MockTransport>) -> Harness {
    let tokens = Rc::new(MemoryTokenStore::new());
    let client = Rc::new(HttpClient::new(
        transport.clone(),
        tokens.clone(),
        "/api".to_owned(),
    ));
    Harness {
        client,
        tokens,
        transport,
    }
}

pub(crate) fn ok_json(body: &serde_json::Value) -> HttpResponse {
    HttpResponse {
        status: 200,
        status_text: "OK".to_owned(),
        body: body.to_string(),
    }
}

pub(crate) fn response(status: u16, status_text: &str, body: &str) -> HttpResponse {
    HttpResponse {
        status,
        status_text: status_text.to_owned(),
        body: body.to_owned(),
    }
}

pub(crate) fn unauthorized() -> HttpResponse {
    response(401, "Unauthorized", r#"{"detail":"token_not_valid"}"#)
}

/// A structurally valid three-segment token whose payload carries `exp`.
pub(crate) fn make_token(exp: i64) -> String {
    let payload = URL_SAFE_NO_PAD.encode(serde_json::json!({ "exp": exp }).to_string());
    format!("eyJhbGciOiJIUzI1NiJ9.{payload}.sig")
}

pub(crate) fn user_json(username: &str, role: &str) -> serde_json::Value {
    serde_json::json!({
        "id": 7,
        "username": username,
        "role": role,
        "email": format!("{username}@example.com"),
        "phone": null,
    })
}
