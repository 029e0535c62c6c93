//! # Storefront CLI
//!
//! The binary is intentionally thin: the CLI lives in `src/cli/`, while this
//! file only invokes `cli::run()` and handles process termination.
//!
//! ## Workspace Structure
//!
//! - `crates/storefront/`: core library with UI-agnostic logic
//! - `crates/storefront-cli/`: this CLI tool, depends on the `storefront` library
//!
//! ## Layering
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (crates/storefront-cli/src/cli/)                 │
//! │  - clap argument parsing (setup.rs)                         │
//! │  - Context wiring + dispatch (commands.rs)                  │
//! │  - Terminal rendering (render.rs, styles.rs)                │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (crates/storefront/src/api.rs)                   │
//! │  - Listings through the result cache                        │
//! │  - Admin CRUD, session, cart, chat                          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything from `api.rs` inward is UI agnostic. The CLI layer owns argument
//! parsing, logging setup, the runtime, rendering and exit codes.
//!
//! ## Testing Approach
//!
//! - **Library**: unit tests per module plus property tests of the list query.
//! - **CLI (`src/cli/`)**: clap parsing and rendering tests, and end-to-end runs
//!   of the binary against a temporary data directory (`tests/`).

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
