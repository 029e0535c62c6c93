use super::backend::KeyValueStore;
use crate::error::{Result, StoreError};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

/// In-memory key-value backend for tests and ephemeral sessions.
///
/// Uses `RefCell` for interior mutability since the storefront client is
/// single-threaded. This avoids the overhead of `RwLock` while still allowing
/// the `KeyValueStore` trait to use `&self` for all methods.
#[derive(Default)]
pub struct MemBackend {
    entries: RefCell<BTreeMap<String, String>>,
    simulate_write_error: Cell<bool>,
    writes: Cell<usize>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.set(simulate);
    }

    /// Number of successful `set` calls so far.
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }

    /// Test helper: raw snapshot of a stored blob.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }
}

impl KeyValueStore for MemBackend {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        if self.simulate_write_error.get() {
            return Err(StoreError::Store("Simulated write error".to_string()));
        }
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        if self.simulate_write_error.get() {
            return Err(StoreError::Store("Simulated write error".to_string()));
        }
        self.entries.borrow_mut().remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.entries.borrow().keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_set_remove() {
        let backend = MemBackend::new();
        assert_eq!(backend.get("cart_items").unwrap(), None);

        backend.set("cart_items", "[]").unwrap();
        assert_eq!(backend.get("cart_items").unwrap().as_deref(), Some("[]"));
        assert_eq!(backend.keys().unwrap(), vec!["cart_items".to_string()]);

        backend.remove("cart_items").unwrap();
        assert_eq!(backend.get("cart_items").unwrap(), None);
        // Absent key is fine
        backend.remove("cart_items").unwrap();
    }

    #[test]
    fn simulated_write_error_leaves_value_untouched() {
        let backend = MemBackend::new();
        backend.set("products", "[1]").unwrap();
        backend.set_simulate_write_error(true);

        assert!(backend.set("products", "[2]").is_err());
        assert_eq!(backend.raw("products").as_deref(), Some("[1]"));
        assert_eq!(backend.write_count(), 1);
    }
}
