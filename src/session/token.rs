//! Local JWT expiry inspection.
//!
//! The client never verifies signatures; tokens are opaque credentials
//! minted by the backend. It only decodes the base64url payload segment to
//! read the `exp` claim, so a refresh known to be dead is never sent over
//! the wire.

#[cfg(test)]
#[path = "token_test.rs"]
mod token_test;

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Deserialize;
use thiserror::Error;

/// Why a token's expiry could not be read.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("token is not a three-segment JWT")]
    Malformed,
    #[error("token payload is not valid base64: {0}")]
    Base64(String),
    #[error("token payload is not valid JSON: {0}")]
    Json(String),
    #[error("token payload carries no exp claim")]
    MissingExpiry,
}

#[derive(Deserialize)]
struct ExpiryClaims {
    exp: Option<i64>,
}

/// Decode the `exp` claim (epoch seconds) from a three-segment signed token.
pub fn decode_expiry(token: &str) -> Result<i64, TokenError> {
    let mut segments = token.split('.');
    let (Some(_), Some(payload), Some(_), None) =
        (segments.next(), segments.next(), segments.next(), segments.next())
    else {
        return Err(TokenError::Malformed);
    };

    let raw = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|err| TokenError::Base64(err.to_string()))?;
    let claims: ExpiryClaims =
        serde_json::from_slice(&raw).map_err(|err| TokenError::Json(err.to_string()))?;
    claims.exp.ok_or(TokenError::MissingExpiry)
}

/// Whether `token` is expired at `now_secs`. A token whose expiry cannot
/// be decoded counts as expired, since it cannot be trusted to refresh
/// anything.
pub fn is_expired(token: &str, now_secs: i64) -> bool {
    match decode_expiry(token) {
        Ok(exp) => exp <= now_secs,
        Err(err) => {
            log::warn!("treating undecodable token as expired: {err}");
            true
        }
    }
}

/// Current wall-clock time in epoch seconds.
pub fn now_epoch_secs() -> i64 {
    #[cfg(feature = "hydrate")]
    {
        #[allow(clippy::cast_possible_truncation)]
        {
            (js_sys::Date::now() / 1000.0) as i64
        }
    }
    #[cfg(not(feature = "hydrate"))]
    {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| i64::try_from(elapsed.as_secs()).unwrap_or(i64::MAX))
    }
}
