//! Root application component with routing and context providers.
//!
//! SYSTEM CONTEXT
//! ==============
//! The shell constructs the service graph once (token store → transport →
//! HTTP client → API client → session controller), provides it via
//! context together with the `RwSignal<SessionState>`, kicks off the
//! one-time session bootstrap, and subscribes to the client's
//! session-invalidated signal, translating it into the `/login` redirect
//! so the transport layer stays routing-agnostic.

use std::rc::Rc;

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{Route, Router, Routes},
};

use crate::config;
use crate::net::api::ApiClient;
use crate::net::gloo::GlooTransport;
use crate::net::http::{HttpClient, Transport};
use crate::pages::dashboard::{ConsumerDashboard, FarmerDashboard, SupplierDashboard};
use crate::pages::landing::LandingPage;
use crate::pages::login::LoginPage;
use crate::pages::register::RegisterPage;
use crate::session::controller::SessionController;
use crate::session::state::SessionState;
use crate::session::store::{LocalStorageTokenStore, TokenStore};

/// Service graph shared by pages and components.
#[derive(Clone)]
pub struct Services {
    pub api: ApiClient,
    pub session: SessionController,
}

impl Services {
    /// Wire the production service graph against the browser transport
    /// and `localStorage`-backed credentials.
    pub fn new() -> Self {
        let tokens: Rc<dyn TokenStore> = Rc::new(LocalStorageTokenStore::new());
        let transport: Rc<dyn Transport> = Rc::new(GlooTransport::new());
        let http = Rc::new(HttpClient::new(transport, tokens.clone(), config::api_base_url()));
        let api = ApiClient::new(http);
        let session = SessionController::new(api.clone(), tokens);
        Self { api, session }
    }
}

impl Default for Services {
    fn default() -> Self {
        Self::new()
    }
}

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Root application component.
///
/// Provides the session signal and service contexts and sets up
/// client-side routing.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let session = RwSignal::new(SessionState::default());
    let services = Services::new();

    provide_context(session);
    provide_context(services.clone());

    // Session-invalidated subscriber: clear the user and fall back to the
    // login entry point. `loading` is left alone; only bootstrap ends it.
    services.api.http().set_on_invalidated(Rc::new(move || {
        session.update(|state| state.user = None);
        #[cfg(feature = "hydrate")]
        {
            if let Some(window) = web_sys::window() {
                let _ = window.location().set_href("/login");
            }
        }
    }));

    // One-time bootstrap: validate any persisted credentials, then end the
    // loading phase whatever the outcome.
    #[cfg(feature = "hydrate")]
    {
        let controller = services.session.clone();
        leptos::task::spawn_local(async move {
            let state = controller.bootstrap().await;
            session.set(state);
        });
    }

    view! {
        <Stylesheet id="leptos" href="/pkg/agrilink.css"/>
        <Title text="AgriLink"/>

        <Router>
            <Routes fallback=|| "Page not found.".into_view()>
                <Route path=StaticSegment("") view=LandingPage/>
                <Route path=StaticSegment("login") view=LoginPage/>
                <Route path=StaticSegment("register") view=RegisterPage/>
                <Route path=StaticSegment("farmer") view=FarmerDashboard/>
                <Route path=StaticSegment("supplier") view=SupplierDashboard/>
                <Route path=StaticSegment("consumer") view=ConsumerDashboard/>
            </Routes>
        </Router>
    }
}
