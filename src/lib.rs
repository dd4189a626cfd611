//! # agrilink-client
//!
//! Leptos + WASM frontend for the AgriLink marketplace, where farmers,
//! suppliers, and consumers trade produce, supplies, and equipment.
//!
//! This crate contains pages, components, the session/auth state, the REST
//! client with its token-refresh interceptor, and the role-aware route
//! guard. All network access flows through `net::HttpClient`; the current
//! user lives in `session::SessionState` provided via context.

pub mod app;
pub mod components;
pub mod config;
pub mod net;
pub mod pages;
pub mod session;
pub mod util;

/// Browser entry point: hydrate the server-rendered document body.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    leptos::mount::hydrate_body(app::App);
}
