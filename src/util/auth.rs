//! Route-authorization decisions.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every protected route applies the same decision function on every
//! evaluation. The function is pure, with no memory of previous
//! navigations, so re-running it on each render is always safe.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;

use crate::net::types::Role;
use crate::session::state::SessionState;

/// Outcome of evaluating a navigation against the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RouteDecision {
    /// Bootstrap still running: render a neutral waiting view, decide later.
    Pending,
    /// No authenticated user: go to the login entry point.
    Login,
    /// Wrong role for this subtree: silently correct to the user's own home.
    Home(&'static str),
    /// Render the protected content.
    Allow,
}

/// The dashboard entry point for a role. Unrecognized roles fall back to
/// the public landing page.
pub fn role_home(role: Role) -> &'static str {
    match role {
        Role::Farmer => "/farmer",
        Role::Supplier => "/supplier",
        Role::Consumer => "/consumer",
        Role::Unknown => "/",
    }
}

/// Evaluate a navigation: consumes only the session snapshot and the
/// route's required role.
pub fn decide(state: &SessionState, required: Option<Role>) -> RouteDecision {
    if state.loading {
        return RouteDecision::Pending;
    }
    let Some(user) = &state.user else {
        return RouteDecision::Login;
    };
    match required {
        Some(role) if user.role != role => RouteDecision::Home(role_home(user.role)),
        _ => RouteDecision::Allow,
    }
}

/// Install the redirect side effect for a guarded route: re-evaluates on
/// every session change and navigates on `Login`/`Home` decisions.
pub fn install_guard_redirect<F>(
    session: RwSignal<SessionState>,
    required: Option<Role>,
    navigate: F,
) where
    F: Fn(&str, NavigateOptions) + Clone + 'static,
{
    Effect::new(move || match decide(&session.get(), required) {
        RouteDecision::Login => navigate("/login", NavigateOptions::default()),
        RouteDecision::Home(path) => navigate(path, NavigateOptions::default()),
        RouteDecision::Pending | RouteDecision::Allow => {}
    });
}
