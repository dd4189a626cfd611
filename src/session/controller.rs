//! Operations that move the session between states.
//!
//! SYSTEM CONTEXT
//! ==============
//! The controller is the only code that turns API responses into session
//! mutations: `currentUser` is never synthesized client-side, and tokens
//! always move together with it. The Leptos layer applies the returned
//! snapshots to the `RwSignal<SessionState>` context.

#[cfg(test)]
#[path = "controller_test.rs"]
mod controller_test;

use std::rc::Rc;

use crate::net::api::{ApiClient, ApiError};
use crate::net::types::{AccountUser, RegisterRequest, Role};

use super::state::SessionState;
use super::store::{TokenPair, TokenStore};

/// Drives bootstrap, login, registration, and logout.
#[derive(Clone)]
pub struct SessionController {
    api: ApiClient,
    tokens: Rc<dyn TokenStore>,
}

impl SessionController {
    pub fn new(api: ApiClient, tokens: Rc<dyn TokenStore>) -> Self {
        Self { api, tokens }
    }

    /// One-time startup validation of any persisted session.
    ///
    /// Always returns a snapshot with `loading == false`: with no stored
    /// token it completes immediately, otherwise it validates the token by
    /// fetching the profile. Any failure clears the persisted credentials
    /// so a dead session cannot linger across reloads.
    pub async fn bootstrap(&self) -> SessionState {
        if self.tokens.access_token().is_none() {
            return SessionState::anonymous();
        }
        match self.api.fetch_profile().await {
            Ok(user) => {
                log::info!("session restored for {}", user.username);
                SessionState::authenticated(user)
            }
            Err(err) => {
                log::warn!("session bootstrap failed: {err}");
                self.tokens.clear();
                SessionState::anonymous()
            }
        }
    }

    /// Authenticate and persist the returned credentials. Failures are
    /// propagated untouched and leave both the store and any prior session
    /// state as they were.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        role_hint: Option<Role>,
    ) -> Result<AccountUser, ApiError> {
        let auth = self.api.login(username, password, role_hint).await?;
        self.tokens.set(TokenPair {
            access: auth.access,
            refresh: auth.refresh,
        });
        Ok(auth.user)
    }

    /// Create an account server-side; on success the backend returns a
    /// ready-to-use session, handled exactly like a login.
    pub async fn register(&self, payload: &RegisterRequest) -> Result<AccountUser, ApiError> {
        let auth = self.api.register(payload).await?;
        self.tokens.set(TokenPair {
            access: auth.access,
            refresh: auth.refresh,
        });
        Ok(auth.user)
    }

    /// Tear the session down. The backend is told best-effort (an
    /// unreachable backend never blocks local cleanup) and this method
    /// never fails.
    pub async fn logout(&self) -> SessionState {
        if let Some(refresh) = self.tokens.refresh_token() {
            if let Err(err) = self.api.logout_notify(&refresh).await {
                log::warn!("logout notification failed (ignored): {err}");
            }
        }
        self.tokens.clear();
        SessionState::anonymous()
    }
}
