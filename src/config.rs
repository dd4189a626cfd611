//! Build-time configuration.
//!
//! Values come from `.env` via `build.rs` (`cargo:rustc-env`), so they are
//! baked into the WASM bundle rather than read at runtime.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

/// Base URL used when `API_BASE_URL` is not set at build time.
pub const DEFAULT_API_BASE_URL: &str = "/api";

/// The backend base URL all endpoint paths are resolved against.
pub fn api_base_url() -> String {
    normalize_base_url(option_env!("API_BASE_URL").unwrap_or(DEFAULT_API_BASE_URL))
}

/// Trim whitespace and trailing slashes; empty input falls back to the default.
pub(crate) fn normalize_base_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        DEFAULT_API_BASE_URL.to_owned()
    } else {
        trimmed.to_owned()
    }
}
