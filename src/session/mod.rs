//! Session lifecycle: token persistence, expiry decoding, and the
//! controller behind login/registration/logout/bootstrap.
//!
//! SYSTEM CONTEXT
//! ==============
//! `store` owns the persisted credential cell, `token` decodes expiry
//! claims, `state` is the signal-wrapped "who is logged in" snapshot, and
//! `controller` drives the operations that mutate it.

pub mod controller;
pub mod state;
pub mod store;
pub mod token;
