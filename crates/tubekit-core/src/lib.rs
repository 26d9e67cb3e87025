//! Tubekit Core
//!
//! Process-local building blocks shared by the YouTube service and the
//! tool layer:
//! - Quota: daily unit budget for the YouTube API with lazy UTC rollover
//! - Cache: durable SQLite key/value store with per-entry expiry
//! - Calendar: local content plan store
//! - Shutdown: signal handling and cancellation

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cache;
pub mod calendar;
pub mod clock;
pub mod error;
pub mod quota;
pub mod shutdown;

pub use cache::{cache_key, CacheConfig, ExpiringCache};
pub use calendar::{
    CalendarStore, ContentPlan, ContentPlanUpdate, NewContentPlan, PlanFilter, PlanListing,
    PlanStatus,
};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{Error, Result};
pub use quota::{QuotaConfig, QuotaExceeded, QuotaGovernor, QuotaStatus};
pub use shutdown::{wait_for_shutdown_signal, ShutdownController};
