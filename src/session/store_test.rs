use super::*;

fn pair() -> TokenPair {
    TokenPair {
        access: "acc".to_owned(),
        refresh: "ref".to_owned(),
    }
}

// =============================================================
// Persisted key contract
// =============================================================

#[test]
fn storage_keys_match_backend_contract() {
    assert_eq!(ACCESS_TOKEN_KEY, "access_token");
    assert_eq!(REFRESH_TOKEN_KEY, "refresh_token");
}

// =============================================================
// MemoryTokenStore
// =============================================================

#[test]
fn memory_store_starts_empty() {
    let store = MemoryTokenStore::new();
    assert_eq!(store.access_token(), None);
    assert_eq!(store.refresh_token(), None);
}

#[test]
fn memory_store_sets_both_tokens_together() {
    let store = MemoryTokenStore::new();
    store.set(pair());
    assert_eq!(store.access_token().as_deref(), Some("acc"));
    assert_eq!(store.refresh_token().as_deref(), Some("ref"));
}

#[test]
fn memory_store_clears_both_tokens_together() {
    let store = MemoryTokenStore::with_pair(pair());
    store.clear();
    assert_eq!(store.access_token(), None);
    assert_eq!(store.refresh_token(), None);
}

#[test]
fn memory_store_last_writer_wins() {
    let store = MemoryTokenStore::with_pair(pair());
    store.set(TokenPair {
        access: "acc-2".to_owned(),
        refresh: "ref-2".to_owned(),
    });
    assert_eq!(store.access_token().as_deref(), Some("acc-2"));
    assert_eq!(store.refresh_token().as_deref(), Some("ref-2"));
}

// =============================================================
// LocalStorageTokenStore (native stub)
// =============================================================

#[test]
fn local_storage_store_reports_no_tokens_off_browser() {
    let store = LocalStorageTokenStore::new();
    store.set(pair());
    assert_eq!(store.access_token(), None);
    assert_eq!(store.refresh_token(), None);
    store.clear();
}
