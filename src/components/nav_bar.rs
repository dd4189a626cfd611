//! Header toolbar for authenticated dashboard pages.

use leptos::prelude::*;

use crate::app::Services;
use crate::session::state::SessionState;

/// Dashboard header: brand, current identity, and logout.
#[component]
pub fn NavBar() -> impl IntoView {
    let session = expect_context::<RwSignal<SessionState>>();
    let services = expect_context::<Services>();

    let self_identity = move || {
        session
            .get()
            .user
            .map(|user| (user.username, user.role.label()))
            .unwrap_or_else(|| ("guest".to_owned(), "Member"))
    };

    let on_logout = move |_| {
        #[cfg(feature = "hydrate")]
        {
            let controller = services.session.clone();
            leptos::task::spawn_local(async move {
                let state = controller.logout().await;
                session.set(state);
                if let Some(window) = web_sys::window() {
                    let _ = window.location().set_href("/login");
                }
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = &services;
        }
    };

    view! {
        <header class="nav-bar toolbar">
            <a class="toolbar__brand" href="/">
                "AgriLink"
            </a>

            <span class="toolbar__spacer"></span>

            <span class="toolbar__self">
                {move || self_identity().0}
                " ("
                <span class="toolbar__self-role">{move || self_identity().1}</span>
                ")"
            </span>

            <button class="btn toolbar__logout" on:click=on_logout title="Logout">
                "Logout"
            </button>
        </header>
    }
}
