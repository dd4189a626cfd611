use std::cell::Cell;
use std::rc::Rc;

use futures::executor::block_on;

use super::*;
use crate::net::api::REFRESH_ENDPOINT;
use crate::net::testing::{
    MockTransport, harness, harness_with, make_token, ok_json, response, unauthorized,
};
use crate::session::token;

fn seed_tokens(h: &crate::net::testing::Harness, access: &str, refresh_exp_offset: i64) {
    h.tokens.set(TokenPair {
        access: access.to_owned(),
        refresh: make_token(token::now_epoch_secs() + refresh_exp_offset),
    });
}

fn install_invalidation_counter(h: &crate::net::testing::Harness) -> Rc<Cell<u32>> {
    let fired = Rc::new(Cell::new(0));
    let fired_hook = fired.clone();
    h.client
        .set_on_invalidated(Rc::new(move || fired_hook.set(fired_hook.get() + 1)));
    fired
}

// =============================================================
// Request construction and bearer attachment
// =============================================================

#[test]
fn url_joins_base_and_path() {
    let h = harness(|_, _| Ok(ok_json(&serde_json::json!({}))));
    assert_eq!(h.client.url("accounts/login/"), "/api/accounts/login/");
    assert_eq!(h.client.url("/accounts/login/"), "/api/accounts/login/");
}

#[test]
fn get_carries_accept_header_and_post_adds_content_type() {
    let get = HttpRequest::get("/api/x");
    assert_eq!(get.header("Accept"), Some("application/json"));
    assert_eq!(get.header("Content-Type"), None);

    let post = HttpRequest::post("/api/x", serde_json::json!({}));
    assert_eq!(post.header("Accept"), Some("application/json"));
    assert_eq!(post.header("Content-Type"), Some("application/json"));
}

#[test]
fn attaches_exact_bearer_token_when_present() {
    let h = harness(|_, _| Ok(ok_json(&serde_json::json!({}))));
    seed_tokens(&h, "tok-abc", 3600);

    block_on(h.client.get("accounts/profile/")).unwrap();

    let calls = h.transport.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].header("Authorization"), Some("Bearer tok-abc"));
}

#[test]
fn no_authorization_header_without_token() {
    let h = harness(|_, _| Ok(ok_json(&serde_json::json!({}))));

    block_on(h.client.get("accounts/profile/")).unwrap();

    assert_eq!(h.transport.calls()[0].header("Authorization"), None);
}

// =============================================================
// Pass-through of non-auth failures
// =============================================================

#[test]
fn generic_server_errors_pass_through_without_retry() {
    let h = harness(|_, _| Ok(response(500, "Internal Server Error", "boom")));
    seed_tokens(&h, "tok", 3600);

    let resp = block_on(h.client.get("orders/")).unwrap();

    assert_eq!(resp.status, 500);
    assert_eq!(h.transport.calls().len(), 1);
    assert!(h.tokens.access_token().is_some());
}

#[test]
fn network_errors_propagate_unmodified() {
    let h = harness(|_, _| Err(HttpError::Network("connection refused".to_owned())));
    seed_tokens(&h, "tok", 3600);

    let err = block_on(h.client.get("orders/")).unwrap_err();

    assert_eq!(err, HttpError::Network("connection refused".to_owned()));
    assert_eq!(h.transport.calls().len(), 1);
}

#[test]
fn default_predicate_ignores_401_with_other_status_text() {
    let h = harness(|_, _| Ok(response(401, "Token Invalid", "{}")));
    seed_tokens(&h, "tok", 3600);

    let resp = block_on(h.client.get("orders/")).unwrap();

    assert_eq!(resp.status, 401);
    assert_eq!(h.transport.calls_to(REFRESH_ENDPOINT), 0);
    assert!(h.tokens.access_token().is_some());
}

#[test]
fn unauthorized_predicate_is_injectable() {
    let h = harness(|req, _| {
        if req.url.contains(REFRESH_ENDPOINT) {
            Ok(ok_json(&serde_json::json!({
                "access": "new-a",
                "refresh": make_token(token::now_epoch_secs() + 7200),
            })))
        } else if req.header("Authorization") == Some("Bearer new-a") {
            Ok(ok_json(&serde_json::json!({})))
        } else {
            // Same 401, but with a status text the default predicate rejects.
            Ok(response(401, "Authorization Denied", "{}"))
        }
    });
    seed_tokens(&h, "old", 3600);
    h.client
        .set_unauthorized_predicate(Rc::new(|resp: &HttpResponse| resp.status == 401));

    let resp = block_on(h.client.get("orders/")).unwrap();

    assert_eq!(resp.status, 200);
    assert_eq!(h.transport.calls_to(REFRESH_ENDPOINT), 1);
}

// =============================================================
// Refresh protocol: success path
// =============================================================

fn refreshing_handler(req: &HttpRequest) -> Result<HttpResponse, HttpError> {
    if req.url.contains(REFRESH_ENDPOINT) {
        Ok(ok_json(&serde_json::json!({
            "access": "new-a",
            "refresh": make_token(token::now_epoch_secs() + 7200),
        })))
    } else if req.header("Authorization") == Some("Bearer new-a") {
        Ok(ok_json(&serde_json::json!({ "ok": true })))
    } else {
        Ok(unauthorized())
    }
}

#[test]
fn expired_access_with_valid_refresh_retries_exactly_once() {
    let h = harness(|req, _| refreshing_handler(req));
    seed_tokens(&h, "old", 3600);

    let resp = block_on(h.client.get("accounts/profile/")).unwrap();

    assert_eq!(resp.status, 200);
    assert_eq!(h.transport.calls_to(REFRESH_ENDPOINT), 1);
    assert_eq!(h.transport.calls_to("accounts/profile/"), 2);
    // Rotated credentials persisted and used for the replay.
    assert_eq!(h.tokens.access_token().as_deref(), Some("new-a"));
    let calls = h.transport.calls();
    assert_eq!(calls.last().unwrap().header("Authorization"), Some("Bearer new-a"));
}

#[test]
fn retry_failure_is_returned_without_second_refresh() {
    let h = harness(|req, _| {
        if req.url.contains(REFRESH_ENDPOINT) {
            Ok(ok_json(&serde_json::json!({
                "access": "new-a",
                "refresh": make_token(token::now_epoch_secs() + 7200),
            })))
        } else if req.header("Authorization") == Some("Bearer new-a") {
            // The replay itself fails authorization again.
            Ok(unauthorized())
        } else {
            Ok(unauthorized())
        }
    });
    seed_tokens(&h, "old", 3600);

    let resp = block_on(h.client.get("orders/")).unwrap();

    // The retry's 401 is the final answer; no refresh recursion.
    assert_eq!(resp.status, 401);
    assert_eq!(h.transport.calls_to(REFRESH_ENDPOINT), 1);
    assert_eq!(h.transport.calls_to("orders/"), 2);
}

#[test]
fn retry_generic_failure_is_final_result() {
    let h = harness(|req, _| {
        if req.url.contains(REFRESH_ENDPOINT) {
            Ok(ok_json(&serde_json::json!({
                "access": "new-a",
                "refresh": make_token(token::now_epoch_secs() + 7200),
            })))
        } else if req.header("Authorization") == Some("Bearer new-a") {
            Ok(response(503, "Service Unavailable", ""))
        } else {
            Ok(unauthorized())
        }
    });
    seed_tokens(&h, "old", 3600);

    let resp = block_on(h.client.get("orders/")).unwrap();

    assert_eq!(resp.status, 503);
    assert_eq!(h.transport.calls_to(REFRESH_ENDPOINT), 1);
}

// =============================================================
// Refresh protocol: terminal failures
// =============================================================

#[test]
fn expired_refresh_token_skips_refresh_and_clears_session() {
    let h = harness(|_, _| Ok(unauthorized()));
    h.tokens.set(TokenPair {
        access: "old".to_owned(),
        refresh: make_token(token::now_epoch_secs() - 10),
    });
    let fired = install_invalidation_counter(&h);

    let err = block_on(h.client.get("orders/")).unwrap_err();

    assert_eq!(err, HttpError::SessionExpired);
    assert_eq!(h.transport.calls_to(REFRESH_ENDPOINT), 0);
    assert_eq!(h.tokens.access_token(), None);
    assert_eq!(h.tokens.refresh_token(), None);
    assert_eq!(fired.get(), 1);
}

#[test]
fn undecodable_refresh_token_is_treated_as_expired() {
    let h = harness(|_, _| Ok(unauthorized()));
    h.tokens.set(TokenPair {
        access: "old".to_owned(),
        refresh: "not-a-jwt".to_owned(),
    });
    let fired = install_invalidation_counter(&h);

    let err = block_on(h.client.get("orders/")).unwrap_err();

    assert_eq!(err, HttpError::SessionExpired);
    assert_eq!(h.transport.calls_to(REFRESH_ENDPOINT), 0);
    assert_eq!(fired.get(), 1);
}

#[test]
fn missing_credentials_reject_without_invalidation_signal() {
    let h = harness(|_, _| Ok(unauthorized()));
    let fired = install_invalidation_counter(&h);

    let err = block_on(h.client.get("orders/")).unwrap_err();

    // Nothing was held, so there is no session to tear down or announce.
    assert_eq!(err, HttpError::SessionExpired);
    assert_eq!(fired.get(), 0);
    assert_eq!(h.transport.calls_to(REFRESH_ENDPOINT), 0);
}

#[test]
fn rejected_refresh_clears_all_fields_atomically() {
    let h = harness(|req, _| {
        if req.url.contains(REFRESH_ENDPOINT) {
            Ok(response(401, "Unauthorized", r#"{"detail":"refresh expired"}"#))
        } else {
            Ok(unauthorized())
        }
    });
    seed_tokens(&h, "old", 3600);
    let fired = install_invalidation_counter(&h);

    let err = block_on(h.client.get("orders/")).unwrap_err();

    assert_eq!(err, HttpError::SessionExpired);
    assert_eq!(h.transport.calls_to(REFRESH_ENDPOINT), 1);
    assert_eq!(h.tokens.access_token(), None);
    assert_eq!(h.tokens.refresh_token(), None);
    assert_eq!(fired.get(), 1);
}

#[test]
fn network_error_during_refresh_forces_logout() {
    let h = harness(|req, _| {
        if req.url.contains(REFRESH_ENDPOINT) {
            Err(HttpError::Network("offline".to_owned()))
        } else {
            Ok(unauthorized())
        }
    });
    seed_tokens(&h, "old", 3600);
    let fired = install_invalidation_counter(&h);

    let err = block_on(h.client.get("orders/")).unwrap_err();

    assert_eq!(err, HttpError::SessionExpired);
    assert_eq!(fired.get(), 1);
}

#[test]
fn malformed_refresh_body_forces_logout() {
    let h = harness(|req, _| {
        if req.url.contains(REFRESH_ENDPOINT) {
            Ok(response(200, "OK", "not json"))
        } else {
            Ok(unauthorized())
        }
    });
    seed_tokens(&h, "old", 3600);

    let err = block_on(h.client.get("orders/")).unwrap_err();

    assert_eq!(err, HttpError::SessionExpired);
    assert_eq!(h.tokens.access_token(), None);
}

// =============================================================
// Concurrent refresh deduplication
// =============================================================

#[test]
fn concurrent_401_victims_share_one_refresh_call() {
    let transport = MockTransport::yielding(|req, _| refreshing_handler(req));
    let h = harness_with(transport);
    seed_tokens(&h, "old", 3600);

    let (a, b) = block_on(async {
        futures::join!(h.client.get("orders/"), h.client.get("produce/"))
    });

    assert_eq!(a.unwrap().status, 200);
    assert_eq!(b.unwrap().status, 200);
    assert_eq!(h.transport.calls_to(REFRESH_ENDPOINT), 1);
    // Each victim still replays its own request exactly once.
    assert_eq!(h.transport.calls_to("orders/"), 2);
    assert_eq!(h.transport.calls_to("produce/"), 2);
}

#[test]
fn concurrent_refresh_failure_invalidates_once() {
    let transport = MockTransport::yielding(|req, _| {
        if req.url.contains(REFRESH_ENDPOINT) {
            Ok(response(500, "Internal Server Error", ""))
        } else {
            Ok(unauthorized())
        }
    });
    let h = harness_with(transport);
    seed_tokens(&h, "old", 3600);
    let fired = install_invalidation_counter(&h);

    let (a, b) = block_on(async {
        futures::join!(h.client.get("orders/"), h.client.get("produce/"))
    });

    assert_eq!(a.unwrap_err(), HttpError::SessionExpired);
    assert_eq!(b.unwrap_err(), HttpError::SessionExpired);
    assert_eq!(h.transport.calls_to(REFRESH_ENDPOINT), 1);
    assert_eq!(fired.get(), 1);
}
