//! Wire DTOs for the accounts and token endpoints.
//!
//! DESIGN
//! ======
//! These types mirror the backend payloads so serde round-trips stay
//! lossless. Anything the backend may extend (notably `role`) degrades
//! gracefully instead of failing deserialization.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

/// Marketplace role attached to every account.
///
/// `Unknown` absorbs role values introduced server-side before this client
/// learns about them; guard logic sends such users to the public landing
/// page rather than erroring.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Farmer,
    Supplier,
    Consumer,
    #[serde(other)]
    Unknown,
}

impl Role {
    /// Parse a form-select value. Empty or unrecognized input is `None`,
    /// letting login forms treat the role as an optional hint.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "farmer" => Some(Self::Farmer),
            "supplier" => Some(Self::Supplier),
            "consumer" => Some(Self::Consumer),
            _ => None,
        }
    }

    /// Human-readable label for headers and nav chrome.
    pub fn label(self) -> &'static str {
        match self {
            Self::Farmer => "Farmer",
            Self::Supplier => "Supplier",
            Self::Consumer => "Consumer",
            Self::Unknown => "Member",
        }
    }
}

/// An authenticated account as returned by `accounts/profile/` and inside
/// login/registration responses.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AccountUser {
    /// Numeric account identifier.
    pub id: i64,
    /// Login name, also used as the display name.
    pub username: String,
    /// Marketplace role deciding which dashboard subtree this user may enter.
    pub role: Role,
    /// Contact email, if the account has one.
    #[serde(default)]
    pub email: Option<String>,
    /// Contact phone number, if the account has one.
    #[serde(default)]
    pub phone: Option<String>,
}

/// Body of `POST accounts/login/`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    /// Optional role hint some login forms collect; omitted when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

/// Body of `POST accounts/register/`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub role: Role,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// Successful response of both `accounts/login/` and `accounts/register/`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct AuthResponse {
    pub access: String,
    pub refresh: String,
    pub user: AccountUser,
}

/// Successful response of `POST token/refresh/`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct RefreshResponse {
    pub access: String,
    pub refresh: String,
}
