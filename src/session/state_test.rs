use super::*;
use crate::net::types::Role;

fn user() -> AccountUser {
    AccountUser {
        id: 1,
        username: "alice".to_owned(),
        role: Role::Farmer,
        email: None,
        phone: None,
    }
}

#[test]
fn default_state_is_loading_with_no_user() {
    let state = SessionState::default();
    assert!(state.loading);
    assert!(state.user.is_none());
}

#[test]
fn anonymous_state_has_finished_loading() {
    let state = SessionState::anonymous();
    assert!(!state.loading);
    assert!(state.user.is_none());
}

#[test]
fn authenticated_state_holds_user_and_finished_loading() {
    let state = SessionState::authenticated(user());
    assert!(!state.loading);
    assert_eq!(state.user.unwrap().username, "alice");
}
