//! Daily YouTube API quota governor
//!
//! Counts units consumed against a fixed daily budget. The window is keyed
//! by the UTC calendar date and rolls over lazily: every call first compares
//! today's date with the window date and resets the counter when they
//! differ. There is no timer task.
//!
//! Consumption is all-or-nothing. A request that would push the counter
//! past the budget is rejected with [`QuotaExceeded`] and leaves the counter
//! untouched. Units are committed at authorization; a remote call that later
//! fails does not give them back.

use crate::clock::{Clock, SystemClock};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Default YouTube Data API daily allowance
pub const DEFAULT_DAILY_BUDGET: u64 = 10_000;

// ============================================================================
// Types
// ============================================================================

/// Governor configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaConfig {
    /// Units available per UTC day
    #[serde(default = "default_daily_budget")]
    pub daily_budget: u64,
}

fn default_daily_budget() -> u64 {
    DEFAULT_DAILY_BUDGET
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            daily_budget: DEFAULT_DAILY_BUDGET,
        }
    }
}

/// Rejection returned when a consumption would exceed the daily budget
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error(
    "YouTube API quota exceeded: {used}/{limit} units used today, {requested} more requested for {operation}"
)]
pub struct QuotaExceeded {
    /// Units already consumed in the current window
    pub used: u64,
    /// Daily budget
    pub limit: u64,
    /// Units the rejected call asked for
    pub requested: u64,
    /// Label of the rejected operation
    pub operation: String,
}

/// Snapshot of the current window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaStatus {
    /// Units consumed today
    pub used: u64,
    /// Units still available today
    pub remaining: u64,
    /// Daily budget
    pub limit: u64,
}

#[derive(Debug)]
struct QuotaWindow {
    used: u64,
    window_date: NaiveDate,
}

// ============================================================================
// Governor
// ============================================================================

/// Process-local daily quota counter.
///
/// Shared as `Arc<QuotaGovernor>`; all methods take `&self`. The
/// check-then-increment pair and the rollover run under a single mutex so
/// concurrent tool calls on the multi-threaded runtime cannot overshoot the
/// budget.
pub struct QuotaGovernor {
    daily_budget: u64,
    window: Mutex<QuotaWindow>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for QuotaGovernor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuotaGovernor")
            .field("daily_budget", &self.daily_budget)
            .field("status", &self.status())
            .finish()
    }
}

impl QuotaGovernor {
    /// Create a governor on the wall clock
    #[must_use]
    pub fn new(config: QuotaConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a governor on an explicit clock
    #[must_use]
    pub fn with_clock(config: QuotaConfig, clock: Arc<dyn Clock>) -> Self {
        let daily_budget = if config.daily_budget == 0 {
            warn!("Daily quota budget of 0 is not usable, falling back to {DEFAULT_DAILY_BUDGET}");
            DEFAULT_DAILY_BUDGET
        } else {
            config.daily_budget
        };

        Self {
            daily_budget,
            window: Mutex::new(QuotaWindow {
                used: 0,
                window_date: clock.today(),
            }),
            clock,
        }
    }

    /// Daily budget
    #[must_use]
    pub fn daily_budget(&self) -> u64 {
        self.daily_budget
    }

    /// Whether `units` would currently be accepted. Does not consume.
    #[must_use]
    pub fn check(&self, units: u64) -> bool {
        let mut window = self.lock_window();
        self.roll_over(&mut window);
        fits(window.used, units, self.daily_budget)
    }

    /// Authorize and record `units` for `operation`.
    ///
    /// Zero units always fit and record nothing.
    pub fn consume(&self, units: u64, operation: &str) -> Result<(), QuotaExceeded> {
        if units == 0 {
            return Ok(());
        }
        let mut window = self.lock_window();
        self.roll_over(&mut window);

        if !fits(window.used, units, self.daily_budget) {
            debug!(
                operation,
                units,
                used = window.used,
                limit = self.daily_budget,
                "Quota request rejected"
            );
            return Err(QuotaExceeded {
                used: window.used,
                limit: self.daily_budget,
                requested: units,
                operation: operation.to_string(),
            });
        }

        window.used += units;
        let used = window.used;
        drop(window);

        info!(
            operation,
            units,
            used,
            remaining = self.daily_budget - used,
            "Quota consumed"
        );
        Ok(())
    }

    /// Current usage after applying any pending rollover
    #[must_use]
    pub fn status(&self) -> QuotaStatus {
        let mut window = self.lock_window();
        self.roll_over(&mut window);
        QuotaStatus {
            used: window.used,
            remaining: self.daily_budget - window.used,
            limit: self.daily_budget,
        }
    }

    fn lock_window(&self) -> std::sync::MutexGuard<'_, QuotaWindow> {
        // A poisoned lock still holds a consistent counter: the only
        // mutation is a single add after the budget check.
        self.window.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn roll_over(&self, window: &mut QuotaWindow) {
        let today = self.clock.today();
        if today != window.window_date {
            info!(
                previous_date = %window.window_date,
                previous_used = window.used,
                date = %today,
                "Quota window reset"
            );
            window.used = 0;
            window.window_date = today;
        }
    }
}

fn fits(used: u64, units: u64, budget: u64) -> bool {
    used.checked_add(units).is_some_and(|total| total <= budget)
}
