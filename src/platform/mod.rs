//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Wall-clock time (`performance.now()` on web, `Instant` natively)
//! - Frame scheduling (fixed-step accumulator)

pub mod clock;
pub mod scheduler;

#[cfg(target_arch = "wasm32")]
pub use clock::PerformanceClock;
#[cfg(not(target_arch = "wasm32"))]
pub use clock::SystemClock;
pub use clock::{Clock, ManualClock, Ticker};
pub use scheduler::FixedStep;
