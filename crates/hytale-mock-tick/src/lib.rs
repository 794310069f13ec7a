//! Fixed-period tick scheduler for the Hytale mock server.
//!
//! The server has exactly one periodic job: advancing the uptime counter
//! once per second. This crate owns the timing half of that job so the
//! registry never has to know about clocks.
//!
//! # Integration
//!
//! The scheduler is meant to sit inside a `tokio::select!` loop next to a
//! shutdown signal:
//!
//! ```ignore
//! let mut scheduler = TickScheduler::new(TickConfig::every(Duration::from_secs(1)));
//! loop {
//!     tokio::select! {
//!         _ = shutdown.cancelled() => break,
//!         _ = scheduler.wait_for_tick() => { registry.tick().await; }
//!     }
//! }
//! ```
//!
//! `wait_for_tick` is cancel-safe: dropping the future before it resolves
//! leaves the next deadline untouched.
//!
//! # Overruns
//!
//! If the task wakes up late (the runtime was stalled, the host was
//! suspended...), the [`TickPolicy`] decides what happens to the periods
//! that were missed:
//!
//! ```text
//!  deadline:   1s    2s    3s    4s
//!  woke at:                3.5s
//!
//!  Skip            → tick 1 at 3.5s, next at 4.5s        (2 skipped)
//!  CatchUp{max:5}  → ticks 1,2,3 at 3.5s, next at 4s      (0 skipped)
//!  CatchUp{max:1}  → ticks 1,2 at 3.5s, next at 4s        (1 skipped)
//! ```

use std::time::Duration;

use tokio::time::{self, Instant};
use tracing::{debug, trace, warn};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// What to do with periods missed because a tick fired late.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TickPolicy {
    /// Drop every missed period and schedule the next tick one period
    /// from now.
    #[default]
    Skip,
    /// Deliver up to `max_catchup` missed ticks back-to-back, then drop
    /// the rest.
    CatchUp {
        /// Hard cap on consecutive catch-up ticks after one stall.
        max_catchup: u32,
    },
}

/// Configuration for a [`TickScheduler`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickConfig {
    /// Time between two ticks.
    pub period: Duration,
    /// Overrun handling.
    pub policy: TickPolicy,
}

impl Default for TickConfig {
    /// One tick per second, [`TickPolicy::Skip`].
    fn default() -> Self {
        Self {
            period: Duration::from_secs(1),
            policy: TickPolicy::default(),
        }
    }
}

impl TickConfig {
    /// Shortest accepted period. Anything below is clamped up.
    pub const MIN_PERIOD: Duration = Duration::from_millis(1);

    /// A config ticking every `period` with the default policy.
    pub fn every(period: Duration) -> Self {
        Self {
            period,
            ..Default::default()
        }
    }

    /// Returns the config with `policy` replaced.
    pub fn with_policy(mut self, policy: TickPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Fixes out-of-range values so the config is safe to use.
    ///
    /// Called automatically by [`TickScheduler::new`]. A period shorter
    /// than [`Self::MIN_PERIOD`] (including zero) would spin the task, so
    /// it is clamped.
    pub fn validated(mut self) -> Self {
        if self.period < Self::MIN_PERIOD {
            warn!(
                period_us = self.period.as_micros() as u64,
                "tick period below 1ms, clamping"
            );
            self.period = Self::MIN_PERIOD;
        }
        self
    }
}

// ---------------------------------------------------------------------------
// Tick info (returned to caller each tick)
// ---------------------------------------------------------------------------

/// Information about a fired tick, returned by [`TickScheduler::wait_for_tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickInfo {
    /// Monotonically increasing tick number (starts at 1).
    pub tick: u64,
    /// `true` if this tick fired more than 10% of a period late.
    pub overrun: bool,
    /// Missed periods that will never be delivered (0 in normal operation).
    pub ticks_skipped: u64,
}

// ---------------------------------------------------------------------------
// Metrics
// ---------------------------------------------------------------------------

/// Running totals for a scheduler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickMetrics {
    /// Ticks delivered.
    pub total_ticks: u64,
    /// Ticks that fired late.
    pub total_overruns: u64,
    /// Missed periods dropped by the policy.
    pub total_skipped: u64,
}

// ---------------------------------------------------------------------------
// Scheduler
// ---------------------------------------------------------------------------

/// Fixed-period tick scheduler. One per periodic task.
#[derive(Debug)]
pub struct TickScheduler {
    config: TickConfig,
    tick_count: u64,
    /// When the next tick should fire (Tokio instant for `sleep_until`).
    next_tick: Instant,
    metrics: TickMetrics,
}

impl TickScheduler {
    /// Creates a scheduler whose first tick fires one period from now.
    pub fn new(config: TickConfig) -> Self {
        let config = config.validated();
        debug!(
            period_ms = config.period.as_secs_f64() * 1000.0,
            policy = ?config.policy,
            "tick scheduler created"
        );
        Self {
            next_tick: Instant::now() + config.period,
            config,
            tick_count: 0,
            metrics: TickMetrics::default(),
        }
    }

    /// Waits until the next tick is due and returns its [`TickInfo`].
    pub async fn wait_for_tick(&mut self) -> TickInfo {
        let next = self.next_tick;
        let period = self.config.period;

        time::sleep_until(next).await;

        let now = Instant::now();
        self.tick_count += 1;

        let late_by = now.saturating_duration_since(next);
        let overrun = late_by > period / 10;
        // Whole periods that elapsed past this tick's deadline.
        let behind = (late_by.as_nanos() / period.as_nanos()) as u64;

        let (next_tick, ticks_skipped) = match self.config.policy {
            TickPolicy::Skip => {
                if behind > 0 {
                    warn!(
                        tick = self.tick_count,
                        skipped = behind,
                        late_ms = late_by.as_secs_f64() * 1000.0,
                        "tick overrun, skipping ahead"
                    );
                }
                // Schedule from now, not from the missed deadline.
                (now + period, behind)
            }
            TickPolicy::CatchUp { max_catchup } => {
                let max_catchup = u64::from(max_catchup);
                let ticks_skipped = behind.saturating_sub(max_catchup);
                if behind > 0 {
                    warn!(
                        tick = self.tick_count,
                        behind,
                        catching_up = behind.min(max_catchup),
                        skipping = ticks_skipped,
                        "tick overrun, catching up"
                    );
                }
                // Jump the deadline past the dropped periods; the ones that
                // remain are already due and fire back-to-back.
                let jump = u32::try_from(ticks_skipped + 1).unwrap_or(u32::MAX);
                (next + period * jump, ticks_skipped)
            }
        };
        self.next_tick = next_tick;

        if overrun {
            self.metrics.total_overruns += 1;
        }
        self.metrics.total_skipped += ticks_skipped;
        self.metrics.total_ticks += 1;

        trace!(tick = self.tick_count, overrun, "tick fired");

        TickInfo {
            tick: self.tick_count,
            overrun,
            ticks_skipped,
        }
    }

    /// Ticks delivered so far.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Snapshot of current metrics.
    pub fn metrics(&self) -> TickMetrics {
        self.metrics
    }

    /// The (validated) configuration.
    pub fn config(&self) -> &TickConfig {
        &self.config
    }
}
