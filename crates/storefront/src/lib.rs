//! # Storefront Architecture
//!
//! Storefront is a **UI-agnostic data layer** for a small shop: a product
//! catalog, a blog, promotional banners and flashcard decks, plus the cart,
//! sign-in and support chat around them. The CLI in `storefront-cli` is one
//! client; nothing in this crate knows about terminals.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - One facade: listings, admin CRUD, session, cart, chat    │
//! │  - Applies page parameters and test flags                   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Fetch Layer (cache.rs, executor.rs, simulate.rs)           │
//! │  - Result cache: staleness window, de-dup, retries          │
//! │  - Simulated latency and injected failures                  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Core (query/, admin.rs, session.rs, cart.rs, chat.rs)      │
//! │  - Pure filter/sort/paginate                                │
//! │  - Whole-collection read-modify-write CRUD                  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - KeyValueStore trait of JSON blobs                        │
//! │  - MemBackend (testing), FsBackend (production)             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Single-Threaded by Construction
//!
//! Everything runs on one thread: shared state is `Rc` plus `Cell`/`RefCell`,
//! and futures are not `Send`. Drive the API from a current-thread tokio
//! runtime. Concurrency here means interleaved futures, never parallelism.
//!
//! ## Testing Strategy
//!
//! 1. **Core** modules carry most of the unit tests, against `MemBackend`.
//! 2. **Fetch** tests run under a paused tokio clock, so 700 ms of simulated
//!    latency costs nothing and staleness windows can be stepped through.
//! 3. **Properties** of the list query live in `tests/` as proptest suites.
//!
//! ## Module Overview
//!
//! - [`api`]: The facade, entry point for all operations
//! - [`query`]: `ListQuery`, the pure pipeline, and page-parameter parsing
//! - [`cache`]: Keyed result cache with retries
//! - [`executor`]: Simulated fetch in front of the pure query
//! - [`simulate`]: Latency and test flags
//! - [`listing`]: Loading/ready/failed state for listing pages
//! - [`admin`]: CRUD over entity collections
//! - [`session`]: Roles and the stored session
//! - [`cart`], [`chat`]: Shopper-side state
//! - [`model`]: Entities, drafts and patches
//! - [`seed`]: Built-in catalog for fresh stores
//! - [`store`]: Storage abstraction and implementations
//! - [`config`]: Configuration loading
//! - [`error`]: Error types

pub mod admin;
pub mod api;
pub mod cache;
pub mod cart;
pub mod chat;
pub mod config;
pub mod error;
pub mod executor;
pub mod listing;
pub mod model;
pub mod query;
pub mod seed;
pub mod session;
pub mod simulate;
pub mod store;

pub use api::StorefrontApi;
pub use error::{Result, StoreError};
