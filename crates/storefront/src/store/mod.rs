//! # Storage Layer
//!
//! Everything the storefront persists goes through the [`KeyValueStore`] trait:
//! an opaque get/set/remove/list store of string blobs. Nothing above this
//! layer knows whether the bytes end up in memory or on disk.
//!
//! ## Layout
//!
//! Each key holds one JSON document, always rewritten whole:
//!
//! ```text
//! products      [Product, ...]
//! blogs         [BlogPost, ...]
//! banners       [Banner, ...]
//! flashcards    [FlashcardDeck, ...]
//! auth_token    "uuid"
//! auth_user     {email, name}
//! auth_expiry   "rfc3339"
//! cart_items    [CartItem, ...]
//! chat_history  [ChatMessage, ...]
//! ```
//!
//! There are no partial writes and no transactions. A read-modify-write is
//! atomic per call only because the client is single-threaded; across calls the
//! last writer wins.
//!
//! ## Implementations
//!
//! - [`mem_backend::MemBackend`]: in-memory, with write-error simulation for tests.
//! - [`fs_backend::FsBackend`]: one `<key>.json` file per key, written atomically.

use crate::error::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;

pub mod backend;
pub mod fs_backend;
pub mod mem_backend;

pub use backend::KeyValueStore;

/// Well-known storage keys that are not entity collections.
/// Entity collections use [`crate::model::Entity::COLLECTION`].
pub mod keys {
    pub const AUTH_TOKEN: &str = "auth_token";
    pub const AUTH_USER: &str = "auth_user";
    pub const AUTH_EXPIRY: &str = "auth_expiry";
    pub const CART_ITEMS: &str = "cart_items";
    pub const CHAT_HISTORY: &str = "chat_history";
}

/// Read and decode a JSON blob. Returns Ok(None) if the key is absent.
pub fn load_json<T, S>(store: &S, key: &str) -> Result<Option<T>>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    match store.get(key)? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

/// Encode and store a JSON blob, replacing whatever was there.
pub fn save_json<T, S>(store: &S, key: &str, value: &T) -> Result<()>
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw)
}

#[cfg(test)]
mod tests {
    use super::mem_backend::MemBackend;
    use super::*;
    use crate::error::StoreError;

    #[test]
    fn json_helpers_roundtrip_through_backend() {
        let backend = MemBackend::new();
        save_json(&backend, keys::CART_ITEMS, &vec![1u64, 2, 3]).unwrap();
        let loaded: Option<Vec<u64>> = load_json(&backend, keys::CART_ITEMS).unwrap();
        assert_eq!(loaded, Some(vec![1, 2, 3]));
    }

    #[test]
    fn corrupt_blob_is_a_serialization_error() {
        let backend = MemBackend::new();
        backend.set("products", "{not json").unwrap();
        let loaded: Result<Option<Vec<u64>>> = load_json(&backend, "products");
        assert!(matches!(loaded, Err(StoreError::Serialization(_))));
    }

    #[test]
    fn absent_key_loads_as_none() {
        let backend = MemBackend::new();
        let loaded: Option<Vec<u64>> = load_json(&backend, "flashcards").unwrap();
        assert!(loaded.is_none());
    }
}
