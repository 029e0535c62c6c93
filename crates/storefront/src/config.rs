//! # Configuration
//!
//! Storefront configuration is a [`confique`] struct, loaded in layers.
//!
//! ## Resolution Order
//!
//! 1. **Environment variables**: `STOREFRONT_LATENCY_MS`, `STOREFRONT_DEV_TOGGLES`, etc.
//! 2. **Config file**: `storefront.toml` in the data directory, if present.
//! 3. **Compiled defaults**: via `#[config(default = ...)]`.
//!
//! ## Data Directory
//!
//! [`data_dir`] picks where the file backend writes its blobs:
//! an explicit path, then `STOREFRONT_DATA`, then the OS data directory
//! (via `directories`).
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `latency_ms` | `700` | Base simulated latency |
//! | `jitter_ms` | `300` | Random extra latency, upper bound |
//! | `slow_latency_ms` | `1200` | Latency under the slow test flag |
//! | `stale_secs` | `60` | Result cache staleness window |
//! | `max_retries` | `3` | Retries for network-style failures |
//! | `page_size` | `12` | Default listing page size |
//! | `admin_email` | `admin@storefront.test` | Email that signs in as admin |
//! | `session_hours` | `24` | Session lifetime |
//! | `dev_toggles` | `false` | Honour `force*` page parameters |

use confique::Config;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cache::CachePolicy;
use crate::error::{Result, StoreError};

pub const CONFIG_FILE: &str = "storefront.toml";
pub const DATA_ENV: &str = "STOREFRONT_DATA";

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct StorefrontConfig {
    #[config(default = 700, env = "STOREFRONT_LATENCY_MS")]
    pub latency_ms: u64,

    #[config(default = 300, env = "STOREFRONT_JITTER_MS")]
    pub jitter_ms: u64,

    #[config(default = 1200, env = "STOREFRONT_SLOW_LATENCY_MS")]
    pub slow_latency_ms: u64,

    /// Cached list results younger than this are served without a fetch.
    #[config(default = 60, env = "STOREFRONT_STALE_SECS")]
    pub stale_secs: u64,

    #[config(default = 3, env = "STOREFRONT_MAX_RETRIES")]
    pub max_retries: u32,

    #[config(default = 12, env = "STOREFRONT_PAGE_SIZE")]
    pub page_size: u32,

    /// Signing in with this email yields an admin session.
    #[config(default = "admin@storefront.test", env = "STOREFRONT_ADMIN_EMAIL")]
    pub admin_email: String,

    #[config(default = 24, env = "STOREFRONT_SESSION_HOURS")]
    pub session_hours: i64,

    #[config(default = false, env = "STOREFRONT_DEV_TOGGLES")]
    pub dev_toggles: bool,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            latency_ms: 700,
            jitter_ms: 300,
            slow_latency_ms: 1200,
            stale_secs: 60,
            max_retries: 3,
            page_size: 12,
            admin_email: "admin@storefront.test".to_string(),
            session_hours: 24,
            dev_toggles: false,
        }
    }
}

impl StorefrontConfig {
    /// Load from the environment and `<data_dir>/storefront.toml`.
    /// A missing file is fine; a malformed one is an error.
    pub fn load(data_dir: &Path) -> Result<Self> {
        Self::builder()
            .env()
            .file(data_dir.join(CONFIG_FILE))
            .load()
            .map_err(|e| StoreError::Config(e.to_string()))
    }

    pub fn cache_policy(&self) -> CachePolicy {
        CachePolicy {
            stale_time: Duration::from_secs(self.stale_secs),
            max_retries: self.max_retries,
            ..CachePolicy::default()
        }
    }

    pub fn session_lifetime(&self) -> chrono::Duration {
        chrono::Duration::hours(self.session_hours.max(1))
    }

    pub fn is_admin_email(&self, email: &str) -> bool {
        email.trim().eq_ignore_ascii_case(self.admin_email.trim())
    }

    /// A config with no simulated latency, for tests and scripted runs.
    pub fn instant() -> Self {
        Self {
            latency_ms: 0,
            jitter_ms: 0,
            slow_latency_ms: 0,
            ..Self::default()
        }
    }
}

/// Resolve the data directory: `explicit`, then `$STOREFRONT_DATA`, then the OS default.
pub fn data_dir(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    if let Some(path) = std::env::var_os(DATA_ENV).filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    ProjectDirs::from("", "", "storefront")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| StoreError::Config("Could not determine a data directory".to_string()))
}
