//! Registration page creating a marketplace account with a chosen role.

#[cfg(test)]
#[path = "register_test.rs"]
mod register_test;

#[cfg(any(test, feature = "hydrate"))]
use std::collections::BTreeMap;

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::app::Services;
#[cfg(any(test, feature = "hydrate"))]
use crate::net::api::ApiError;
use crate::net::types::{RegisterRequest, Role};
use crate::session::state::SessionState;
#[cfg(feature = "hydrate")]
use crate::util::auth::role_home;

/// Assemble the registration payload, rejecting incomplete input before
/// it reaches the network. Optional contact fields collapse to `None`.
fn build_register_request(
    username: &str,
    password: &str,
    email: &str,
    phone: &str,
    address: &str,
    role_value: &str,
) -> Result<RegisterRequest, &'static str> {
    let username = username.trim();
    let email = email.trim();
    if username.is_empty() || password.is_empty() || email.is_empty() {
        return Err("Username, password, and email are required.");
    }
    let Some(role) = Role::parse(role_value) else {
        return Err("Choose a role to register as.");
    };
    let optional = |value: &str| {
        let value = value.trim();
        if value.is_empty() { None } else { Some(value.to_owned()) }
    };
    Ok(RegisterRequest {
        username: username.to_owned(),
        password: password.to_owned(),
        role,
        email: email.to_owned(),
        phone: optional(phone),
        address: optional(address),
    })
}

/// Flatten the backend's per-field error map into display lines.
#[cfg(any(test, feature = "hydrate"))]
fn field_error_lines(field_errors: &BTreeMap<String, Vec<String>>) -> Vec<String> {
    field_errors
        .iter()
        .flat_map(|(field, messages)| {
            messages.iter().map(move |message| format!("{field}: {message}"))
        })
        .collect()
}

/// Split a registration failure into a banner message and field lines.
#[cfg(any(test, feature = "hydrate"))]
fn register_failure(err: &ApiError) -> (String, Vec<String>) {
    match err {
        ApiError::Rejected { field_errors, message, .. } if !field_errors.is_empty() => {
            (message.clone(), field_error_lines(field_errors))
        }
        other => (format!("Registration failed: {other}"), Vec::new()),
    }
}

#[component]
pub fn RegisterPage() -> impl IntoView {
    let session = expect_context::<RwSignal<SessionState>>();
    let services = expect_context::<Services>();
    let navigate = use_navigate();

    let username = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let phone = RwSignal::new(String::new());
    let address = RwSignal::new(String::new());
    let role_value = RwSignal::new(String::new());
    let info = RwSignal::new(String::new());
    let field_lines = RwSignal::new(Vec::<String>::new());
    let busy = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let payload = match build_register_request(
            &username.get(),
            &password.get(),
            &email.get(),
            &phone.get(),
            &address.get(),
            &role_value.get(),
        ) {
            Ok(payload) => payload,
            Err(message) => {
                info.set(message.to_owned());
                return;
            }
        };
        busy.set(true);
        info.set("Creating your account...".to_owned());
        field_lines.set(Vec::new());

        #[cfg(feature = "hydrate")]
        {
            let controller = services.session.clone();
            let navigate = navigate.clone();
            leptos::task::spawn_local(async move {
                match controller.register(&payload).await {
                    Ok(user) => {
                        let home = role_home(user.role);
                        session.update(|state| state.user = Some(user));
                        navigate(home, Default::default());
                    }
                    Err(err) => {
                        let (banner, lines) = register_failure(&err);
                        info.set(banner);
                        field_lines.set(lines);
                        busy.set(false);
                    }
                }
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (&services, &navigate, payload);
        }
    };

    view! {
        <div class="register-page">
            <div class="login-card">
                <h1>"Join AgriLink"</h1>
                <p class="login-card__subtitle">"Create a farmer, supplier, or consumer account"</p>
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
                    <input
                        class="login-input"
                        type="email"
                        placeholder="Email"
                        prop:value=move || email.get()
                        on:input=move |ev| email.set(event_target_value(&ev))
                    />
                    <input
                        class="login-input"
                        type="tel"
                        placeholder="Phone (optional)"
                        prop:value=move || phone.get()
                        on:input=move |ev| phone.set(event_target_value(&ev))
                    />
                    <input
                        class="login-input"
                        type="text"
                        placeholder="Address (optional)"
                        prop:value=move || address.get()
                        on:input=move |ev| address.set(event_target_value(&ev))
                    />
                    <select
                        class="login-input"
                        on:change=move |ev| role_value.set(event_target_value(&ev))
                    >
                        <option value="">"Register as..."</option>
                        <option value="farmer">"Farmer"</option>
                        <option value="supplier">"Supplier"</option>
                        <option value="consumer">"Consumer"</option>
                    </select>
                    <button class="login-button" type="submit" disabled=move || busy.get()>
                        "Create Account"
                    </button>
                </form>
                <Show when=move || !info.get().is_empty()>
                    <p class="login-message">{move || info.get()}</p>
                </Show>
                <Show when=move || !field_lines.get().is_empty()>
                    <ul class="login-field-errors">
                        {move || {
                            field_lines
                                .get()
                                .into_iter()
                                .map(|line| view! { <li>{line}</li> })
                                .collect::<Vec<_>>()
                        }}
                    </ul>
                </Show>
                <div class="login-divider"></div>
                <p class="login-card__subtitle">
                    "Already have an account? " <a href="/login">"Sign in"</a>
                </p>
            </div>
        </div>
    }
}
