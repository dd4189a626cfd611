//! Browser transport backed by `gloo-net`.
//!
//! Client-side (hydrate): real HTTP calls. Native builds (tests, SSR):
//! a failing stub, since these requests are only meaningful in the
//! browser and the rest of the pipeline is exercised with mock transports.

use futures::FutureExt;
use futures::future::LocalBoxFuture;

use super::http::{HttpError, HttpRequest, HttpResponse, Transport};
#[cfg(feature = "hydrate")]
use super::http::Method;

/// [`Transport`] implementation over `gloo_net::http`.
#[derive(Clone, Copy, Debug, Default)]
pub struct GlooTransport;

impl GlooTransport {
    pub fn new() -> Self {
        Self
    }
}

impl Transport for GlooTransport {
    fn send(&self, req: HttpRequest) -> LocalBoxFuture<'_, Result<HttpResponse, HttpError>> {
        #[cfg(feature = "hydrate")]
        {
            send_browser(req).boxed_local()
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = req;
            async { Err(HttpError::Network("no browser transport available".to_owned())) }
                .boxed_local()
        }
    }
}

#[cfg(feature = "hydrate")]
async fn send_browser(req: HttpRequest) -> Result<HttpResponse, HttpError> {
    let mut builder = match req.method {
        Method::Get => gloo_net::http::Request::get(&req.url),
        Method::Post => gloo_net::http::Request::post(&req.url),
    };
    for (name, value) in &req.headers {
        builder = builder.header(name, value);
    }

    let request = match req.body {
        Some(body) => builder
            .body(body.to_string())
            .map_err(|err| HttpError::Network(err.to_string()))?,
        None => builder
            .build()
            .map_err(|err| HttpError::Network(err.to_string()))?,
    };

    let resp = request
        .send()
        .await
        .map_err(|err| HttpError::Network(err.to_string()))?;

    Ok(HttpResponse {
        status: resp.status(),
        status_text: resp.status_text(),
        body: resp.text().await.unwrap_or_default(),
    })
}
