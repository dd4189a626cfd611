//! Role-aware route guard component.

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::net::types::Role;
use crate::session::state::SessionState;
use crate::util::auth::{RouteDecision, decide, install_guard_redirect};

/// Gate a protected subtree behind a required role.
///
/// While the session is still bootstrapping this renders a neutral waiting
/// view and makes no redirect decision; once settled, unauthenticated
/// users go to `/login` and wrong-role users are silently corrected to
/// their own dashboard.
#[component]
pub fn RequireRole(role: Role, children: ChildrenFn) -> impl IntoView {
    let session = expect_context::<RwSignal<SessionState>>();
    let navigate = use_navigate();
    install_guard_redirect(session, Some(role), navigate);

    view! {
        <Show
            when=move || decide(&session.get(), Some(role)) == RouteDecision::Allow
            fallback=move || {
                view! {
                    <div class="guard-wait">
                        <p>{move || if session.get().loading { "Loading..." } else { "Redirecting..." }}</p>
                    </div>
                }
            }
        >
            {children()}
        </Show>
    }
}
