//! # Domain Model
//!
//! Four entity kinds live in the store: [`Product`], [`BlogPost`], [`Banner`] and
//! [`FlashcardDeck`]. They are plain records: an integer id, display fields, a
//! category and `created_at`/`updated_at` stamps.
//!
//! ## The Entity Trait
//!
//! Listing, caching and admin CRUD are written once, generically, against
//! [`Entity`]. The trait exposes only what those layers need:
//!
//! - **Identity**: `id()` and the storage key of the collection (`COLLECTION`).
//! - **Filtering**: `category()`, `search_fields()`, and optionally `price()`.
//! - **Sorting**: `created_at()`, `price()`, `rating()`.
//! - **Mutation**: `from_draft` builds a new record, `apply_patch` merges a partial update.
//!
//! ## Drafts and Patches
//!
//! Each entity pairs with a `Draft` (everything a create needs, minus id and
//! timestamps) and a `Patch` (every field optional). Both implement [`Validate`],
//! which is checked before anything touches storage. A failed check names the
//! offending field so callers can render the message next to it.
//!
//! ## Immutability
//!
//! Fetched entities are never mutated in place by listing code. Only the admin
//! store rewrites a collection, and it always rewrites the whole array.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Result, StoreError};

pub mod banner;
pub mod blog;
pub mod flashcard;
pub mod product;

pub use banner::{Banner, BannerDraft, BannerPatch};
pub use blog::{BlogDraft, BlogPatch, BlogPost};
pub use flashcard::{Flashcard, FlashcardDeck, FlashcardDeckDraft, FlashcardDeckPatch};
pub use product::{Product, ProductDraft, ProductPatch};

/// Client-side validation of create/update input.
pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub trait Entity: Clone + Serialize + DeserializeOwned {
    type Draft: Validate;
    type Patch: Validate;

    /// Storage key of the collection, also used in error messages and cache keys.
    const COLLECTION: &'static str;

    fn id(&self) -> u64;

    fn category(&self) -> &str;

    fn created_at(&self) -> DateTime<Utc>;

    /// Text fields matched by free-text search.
    fn search_fields(&self) -> Vec<&str>;

    fn price(&self) -> Option<f64> {
        None
    }

    fn rating(&self) -> Option<f64> {
        None
    }

    fn from_draft(id: u64, draft: Self::Draft, now: DateTime<Utc>) -> Self;

    /// Merge the present fields of `patch` and stamp `updated_at`.
    fn apply_patch(&mut self, patch: Self::Patch, now: DateTime<Utc>);
}

pub(crate) fn require_text(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(StoreError::validation(field, "is required"));
    }
    Ok(())
}

pub(crate) fn require_price(field: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(StoreError::validation(
            field,
            "must be a non-negative number",
        ));
    }
    Ok(())
}

pub(crate) fn require_rating(field: &'static str, value: f64) -> Result<()> {
    if !(0.0..=5.0).contains(&value) {
        return Err(StoreError::validation(field, "must be between 0 and 5"));
    }
    Ok(())
}

/// Validates an optional patch field with the same rule as its draft counterpart.
pub(crate) fn check_opt<T>(
    value: &Option<T>,
    check: impl FnOnce(&T) -> Result<()>,
) -> Result<()> {
    match value {
        Some(v) => check(v),
        None => Ok(()),
    }
}
