//! The refresh-and-retry stage of the request pipeline.
//!
//! SYSTEM CONTEXT
//! ==============
//! Invoked by `HttpClient::execute` when a response matches the
//! unauthorized predicate. Exactly one refresh call runs at a time:
//! concurrent victims of an expired access token share the in-flight
//! refresh future and each replays its own original request once. A
//! refresh token that is missing, already expired locally, or rejected by
//! the server tears the session down without retrying.

use futures::FutureExt;
use futures::future::{LocalBoxFuture, Shared};

use crate::session::store::TokenPair;
use crate::session::token;

use super::api;
use super::http::{HttpClient, HttpError, HttpRequest, HttpResponse};
use super::types::RefreshResponse;

/// Attempt to repair an unauthorized response by rotating tokens, then
/// replay `original` exactly once. Any failure along the way invalidates
/// the session and rejects the original caller with
/// [`HttpError::SessionExpired`].
pub(super) async fn repair_unauthorized(
    client: &HttpClient,
    original: HttpRequest,
) -> Result<HttpResponse, HttpError> {
    let Some(refresh_token) = client.tokens().refresh_token() else {
        client.invalidate_session();
        return Err(HttpError::SessionExpired);
    };

    // A refresh token that is already past its expiry claim cannot mint a
    // new access token; skip the network round-trip entirely. A token that
    // fails to decode is treated the same way.
    if token::is_expired(&refresh_token, token::now_epoch_secs()) {
        log::warn!("refresh token expired locally; skipping refresh call");
        client.invalidate_session();
        return Err(HttpError::SessionExpired);
    }

    let shared = in_flight_refresh(client, refresh_token);
    let outcome = shared.await;
    client.refresh_slot().borrow_mut().take();

    match outcome {
        Ok(_) => {
            // Replay once with the rotated token. Whatever comes back,
            // success or failure, even a second 401, is the final answer;
            // retries never recurse into another refresh.
            let prepared = client.apply_stages(original);
            client.transport().send(prepared).await
        }
        Err(err) => {
            client.invalidate_session();
            Err(err)
        }
    }
}

/// Join the in-flight refresh future, starting one if none exists.
fn in_flight_refresh(
    client: &HttpClient,
    refresh_token: String,
) -> Shared<LocalBoxFuture<'static, Result<TokenPair, HttpError>>> {
    let mut slot = client.refresh_slot().borrow_mut();
    if let Some(existing) = slot.as_ref() {
        return existing.clone();
    }

    let transport = client.transport();
    let tokens = client.tokens();
    let url = client.url(api::REFRESH_ENDPOINT);
    let fut = async move {
        let req = HttpRequest::post(url, serde_json::json!({ "refresh": refresh_token }));
        let resp = transport.send(req).await.map_err(|err| {
            log::warn!("token refresh failed: {err}");
            HttpError::SessionExpired
        })?;
        if !resp.is_success() {
            log::warn!("token refresh rejected: HTTP {}", resp.status);
            return Err(HttpError::SessionExpired);
        }
        let rotated: RefreshResponse = resp.json().map_err(|err| {
            log::warn!("token refresh returned malformed body: {err}");
            HttpError::SessionExpired
        })?;
        let pair = TokenPair {
            access: rotated.access,
            refresh: rotated.refresh,
        };
        tokens.set(pair.clone());
        Ok(pair)
    }
    .boxed_local()
    .shared();

    *slot = Some(fut.clone());
    fut
}
