//! Login page with username/password form and an optional role hint.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::app::Services;
#[cfg(any(test, feature = "hydrate"))]
use crate::net::api::ApiError;
use crate::net::types::Role;
use crate::session::state::SessionState;
#[cfg(feature = "hydrate")]
use crate::util::auth::role_home;

/// Trim both fields and require them to be present.
fn validate_login_input(username: &str, password: &str) -> Result<(String, String), &'static str> {
    let username = username.trim();
    if username.is_empty() || password.is_empty() {
        return Err("Enter both username and password.");
    }
    Ok((username.to_owned(), password.to_owned()))
}

/// Message shown when a login attempt fails. Presentation only; the
/// error itself arrives untouched from the session controller.
#[cfg(any(test, feature = "hydrate"))]
fn login_error_message(err: &ApiError) -> String {
    format!("Sign-in failed: {err}")
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let session = expect_context::<RwSignal<SessionState>>();
    let services = expect_context::<Services>();
    let navigate = use_navigate();

    let username = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let role_value = RwSignal::new(String::new());
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let (username_value, password_value) =
            match validate_login_input(&username.get(), &password.get()) {
                Ok(values) => values,
                Err(message) => {
                    info.set(message.to_owned());
                    return;
                }
            };
        let role_hint = Role::parse(&role_value.get());
        busy.set(true);
        info.set("Signing in...".to_owned());

        #[cfg(feature = "hydrate")]
        {
            let controller = services.session.clone();
            let navigate = navigate.clone();
            leptos::task::spawn_local(async move {
                match controller.login(&username_value, &password_value, role_hint).await {
                    Ok(user) => {
                        let home = role_home(user.role);
                        session.update(|state| state.user = Some(user));
                        navigate(home, Default::default());
                    }
                    Err(err) => {
                        info.set(login_error_message(&err));
                        busy.set(false);
                    }
                }
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (&services, &navigate, role_hint, username_value, password_value);
        }
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"AgriLink"</h1>
                <p class="login-card__subtitle">"Sign in to your marketplace account"</p>
                <form class="login-form" on:submit=on_submit>
                    <input
                        class="login-input"
                        type="text"
                        placeholder="Username"
                        prop:value=move || username.get()
                        on:input=move |ev| username.set(event_target_value(&ev))
                    />
                    <input
                        class="login-input"
                        type="password"
                        placeholder="Password"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                    <select
                        class="login-input"
                        on:change=move |ev| role_value.set(event_target_value(&ev))
                    >
                        <option value="">"I am a... (optional)"</option>
                        <option value="farmer">"Farmer"</option>
                        <option value="supplier">"Supplier"</option>
                        <option value="consumer">"Consumer"</option>
                    </select>
                    <button class="login-button" type="submit" disabled=move || busy.get()>
                        "Sign In"
                    </button>
                </form>
                <Show when=move || !info.get().is_empty()>
                    <p class="login-message">{move || info.get()}</p>
                </Show>
                <div class="login-divider"></div>
                <p class="login-card__subtitle">
                    "New to AgriLink? " <a href="/register">"Create an account"</a>
                </p>
            </div>
        </div>
    }
}
