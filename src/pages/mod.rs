//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each page owns route-scoped orchestration and delegates rendering
//! details to `components`. Form handling is split into pure, unit-tested
//! helpers plus thin `view!` markup.

pub mod dashboard;
pub mod landing;
pub mod login;
pub mod register;
