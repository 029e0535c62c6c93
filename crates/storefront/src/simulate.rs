//! Simulated network latency and failure injection.
//!
//! Every "remote" call in the storefront (list queries, admin CRUD, chat
//! replies) awaits [`Simulator::simulate`] first. The simulator sleeps for the
//! configured latency, plus random jitter, so callers get a real loading window.
//! Then it applies whatever [`TestFlags`] are active.
//!
//! The flags are development hooks. They are set explicitly by the caller
//! (usually from parsed page parameters) and never read from the environment.

use rand::Rng;
use std::cell::Cell;
use std::time::Duration;
use tracing::debug;

use crate::config::StorefrontConfig;
use crate::error::{Result, StoreError};

/// Test-only toggles that alter simulated behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TestFlags {
    /// Reject with a generic network error after the delay.
    pub force_error: bool,
    /// Resolve list queries with an empty page.
    pub force_empty: bool,
    /// Use the slow latency instead of the normal one.
    pub force_slow: bool,
}

impl TestFlags {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn error() -> Self {
        Self {
            force_error: true,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationConfig {
    pub latency: Duration,
    /// Upper bound of the random extra delay added to every call.
    pub jitter: Duration,
    pub slow_latency: Duration,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            latency: Duration::from_millis(700),
            jitter: Duration::from_millis(300),
            slow_latency: Duration::from_millis(1200),
        }
    }
}

impl SimulationConfig {
    /// No delay at all. Used by tests and scripted CLI runs.
    pub fn instant() -> Self {
        Self {
            latency: Duration::ZERO,
            jitter: Duration::ZERO,
            slow_latency: Duration::ZERO,
        }
    }

    pub fn from_config(config: &StorefrontConfig) -> Self {
        Self {
            latency: Duration::from_millis(config.latency_ms),
            jitter: Duration::from_millis(config.jitter_ms),
            slow_latency: Duration::from_millis(config.slow_latency_ms),
        }
    }
}

pub struct Simulator {
    config: SimulationConfig,
    flags: Cell<TestFlags>,
}

impl Simulator {
    pub fn new(config: SimulationConfig) -> Self {
        Self {
            config,
            flags: Cell::new(TestFlags::default()),
        }
    }

    pub fn instant() -> Self {
        Self::new(SimulationConfig::instant())
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn flags(&self) -> TestFlags {
        self.flags.get()
    }

    pub fn set_flags(&self, flags: TestFlags) {
        self.flags.set(flags);
    }

    pub fn clear_flags(&self) {
        self.flags.set(TestFlags::default());
    }

    /// The delay the next call will wait for.
    pub fn next_delay(&self) -> Duration {
        let base = if self.flags.get().force_slow {
            self.config.slow_latency
        } else {
            self.config.latency
        };
        let jitter_ms = self.config.jitter.as_millis() as u64;
        if jitter_ms == 0 {
            return base;
        }
        base + Duration::from_millis(rand::thread_rng().gen_range(0..=jitter_ms))
    }

    /// Wait out the simulated latency, then fail if a forced error is active.
    pub async fn simulate(&self, operation: &str) -> Result<()> {
        let delay = self.next_delay();
        debug!(operation, delay_ms = delay.as_millis() as u64, "simulating latency");
        tokio::time::sleep(delay).await;

        if self.flags.get().force_error {
            debug!(operation, "forced error flag set");
            return Err(StoreError::NetworkSimulated(format!(
                "{} failed: simulated network error",
                operation
            )));
        }
        Ok(())
    }
}
