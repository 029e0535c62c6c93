use crate::error::Result;
use std::rc::Rc;

/// Abstract interface for the key-value store every collection lives in.
///
/// Values are opaque strings (JSON blobs in practice). The trait handles the
/// "how" of storage (filesystem vs memory); typed reads and writes live in
/// [`super::load_json`] / [`super::save_json`] and the stores built on them.
///
/// All methods take `&self`: backends use interior mutability so that one
/// backend can be shared by the admin store, the session provider and the cart.
pub trait KeyValueStore {
    /// Read a value. Returns Ok(None) if the key was never written.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value stored under `key`.
    /// MUST be atomic per key: readers see the old or the new blob, never a mix.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a key. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<()>;

    /// List every key currently stored.
    fn keys(&self) -> Result<Vec<String>>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Rc<T> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }

    fn keys(&self) -> Result<Vec<String>> {
        (**self).keys()
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }

    fn keys(&self) -> Result<Vec<String>> {
        (**self).keys()
    }
}
