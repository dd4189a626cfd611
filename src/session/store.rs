//! Persisted credential storage.
//!
//! DESIGN
//! ======
//! The access and refresh tokens form one logical cell: they are written
//! and cleared together, never individually, so no observer can see a
//! half-torn-down session. `localStorage` backs the browser build; an
//! in-memory cell backs native tests and SSR.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::cell::RefCell;

/// Access/refresh credentials minted by login, registration, or refresh.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// The single mutable credential cell shared by the request pipeline and
/// the session controller. Last writer wins.
pub trait TokenStore {
    fn access_token(&self) -> Option<String>;
    fn refresh_token(&self) -> Option<String>;
    /// Replace both tokens in one step.
    fn set(&self, pair: TokenPair);
    /// Drop both tokens in one step.
    fn clear(&self);
}

/// `localStorage` key for the access token.
pub const ACCESS_TOKEN_KEY: &str = "access_token";
/// `localStorage` key for the refresh token.
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";

/// Browser-backed store surviving page reloads. Native builds no-op and
/// report no credentials.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalStorageTokenStore;

impl LocalStorageTokenStore {
    pub fn new() -> Self {
        Self
    }

    #[cfg(feature = "hydrate")]
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }

    #[cfg(feature = "hydrate")]
    fn read(key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok()?
    }
}

impl TokenStore for LocalStorageTokenStore {
    fn access_token(&self) -> Option<String> {
        #[cfg(feature = "hydrate")]
        {
            Self::read(ACCESS_TOKEN_KEY)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            None
        }
    }

    fn refresh_token(&self) -> Option<String> {
        #[cfg(feature = "hydrate")]
        {
            Self::read(REFRESH_TOKEN_KEY)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            None
        }
    }

    fn set(&self, pair: TokenPair) {
        #[cfg(feature = "hydrate")]
        {
            if let Some(storage) = Self::storage() {
                let _ = storage.set_item(ACCESS_TOKEN_KEY, &pair.access);
                let _ = storage.set_item(REFRESH_TOKEN_KEY, &pair.refresh);
            }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = pair;
        }
    }

    fn clear(&self) {
        #[cfg(feature = "hydrate")]
        {
            if let Some(storage) = Self::storage() {
                let _ = storage.remove_item(ACCESS_TOKEN_KEY);
                let _ = storage.remove_item(REFRESH_TOKEN_KEY);
            }
        }
    }
}

/// In-memory store for native tests and server rendering.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    cell: RefCell<Option<TokenPair>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pair(pair: TokenPair) -> Self {
        Self {
            cell: RefCell::new(Some(pair)),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn access_token(&self) -> Option<String> {
        self.cell.borrow().as_ref().map(|pair| pair.access.clone())
    }

    fn refresh_token(&self) -> Option<String> {
        self.cell.borrow().as_ref().map(|pair| pair.refresh.clone())
    }

    fn set(&self, pair: TokenPair) {
        *self.cell.borrow_mut() = Some(pair);
    }

    fn clear(&self) {
        self.cell.borrow_mut().take();
    }
}
