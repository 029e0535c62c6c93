//! # CLI Behavior
//!
//! This is **one possible UI client** for storefront, not the application itself.
//! The CLI is the only place that knows about terminal I/O, exit codes, and output formatting.
//!
//! For the overall architecture, see the crate-level documentation in [`crate`].
//!
//! ## Listing
//!
//! `storefront products`, `blog` and `decks` take the same filters. Page
//! parameters can also be passed raw, the way a browser URL would carry them:
//!
//! ```text
//! storefront products --query "category=audio&sort=price-asc&page=2"
//! ```
//!
//! Explicit flags win over `--query`. The `forceError`, `forceEmpty` and
//! `forceSlow` parameters only take effect with `STOREFRONT_DEV_TOGGLES=true`.
//!
//! ## Sessions
//!
//! `storefront login <email>` stores a session in the data directory. Signing
//! in with the configured admin email unlocks `storefront admin ...`.
//!
//! ## Output
//!
//! Tables by default; `--json` prints the API's return value as JSON.
//! Logs go to stderr, filtered by `STOREFRONT_LOG` (default `warn`, `-v` for debug).
//!
//! ## Module Structure
//!
//! - `commands`: Setup, dispatch and per-command handlers
//! - `render`: Output formatting (tables, JSON, messages)
//! - `setup`: Argument parsing via clap, help text
//! - `styles`: Terminal styling

mod commands;
mod render;
pub mod setup;
mod styles;

pub use commands::run;
