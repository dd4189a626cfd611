//! Session state for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! Provided as an `RwSignal<SessionState>` context by the application
//! shell; consumed by the route guard and every identity-aware component.

#[cfg(test)]
#[path = "state_test.rs"]
mod state_test;

use crate::net::types::AccountUser;

/// Snapshot of "who is logged in".
///
/// `loading` is `true` only during the initial bootstrap validation; it
/// flips to `false` exactly once per application lifetime, whatever the
/// bootstrap outcome, and stays `false` for all later request activity.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionState {
    pub user: Option<AccountUser>,
    pub loading: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            user: None,
            loading: true,
        }
    }
}

impl SessionState {
    /// Post-bootstrap state with no authenticated user.
    pub fn anonymous() -> Self {
        Self {
            user: None,
            loading: false,
        }
    }

    /// Post-bootstrap state for an authenticated user.
    pub fn authenticated(user: AccountUser) -> Self {
        Self {
            user: Some(user),
            loading: false,
        }
    }
}
