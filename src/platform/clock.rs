//! Clocks and frame timing

use std::cell::Cell;
use std::rc::Rc;

/// Monotonic time source in seconds
pub trait Clock {
    fn now(&self) -> f64;
}

/// Hand-driven clock for tests and headless runs.
///
/// Clones share the same time, so a test can keep a handle while a `Ticker`
/// owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    time: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, seconds: f64) {
        self.time.set(self.time.get() + seconds);
    }

    pub fn set(&self, seconds: f64) {
        self.time.set(seconds);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        self.time.get()
    }
}

/// Native wall clock
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct SystemClock {
    start: std::time::Instant,
}

#[cfg(not(target_arch = "wasm32"))]
impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: std::time::Instant::now(),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Clock for SystemClock {
    fn now(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

/// Browser high resolution clock (`performance.now()`)
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone)]
pub struct PerformanceClock {
    performance: web_sys::Performance,
}

#[cfg(target_arch = "wasm32")]
impl PerformanceClock {
    /// `None` when the page has no `performance` object
    pub fn new() -> Option<Self> {
        let performance = web_sys::window()?.performance()?;
        Some(Self { performance })
    }
}

#[cfg(target_arch = "wasm32")]
impl Clock for PerformanceClock {
    fn now(&self) -> f64 {
        self.performance.now() / 1000.0
    }
}

/// Measures the wall time between successive frames
#[derive(Debug, Clone)]
pub struct Ticker<C: Clock> {
    clock: C,
    last: Option<f64>,
}

impl<C: Clock> Ticker<C> {
    pub fn new(clock: C) -> Self {
        Self { clock, last: None }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Seconds since the previous call (0 on the first call)
    pub fn lap(&mut self) -> f32 {
        let now = self.clock.now();
        let elapsed = self.last.map_or(0.0, |last| (now - last).max(0.0));
        self.last = Some(now);
        elapsed as f32
    }

    /// Forget the previous timestamp, e.g. after the page was hidden
    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_shared_between_clones() {
        let clock = ManualClock::new();
        let handle = clock.clone();
        handle.advance(1.5);
        assert_eq!(clock.now(), 1.5);
        handle.set(0.25);
        assert_eq!(clock.now(), 0.25);
    }

    #[test]
    fn test_ticker_laps() {
        let clock = ManualClock::new();
        let mut ticker = Ticker::new(clock.clone());
        assert_eq!(ticker.lap(), 0.0);
        clock.advance(0.5);
        assert_eq!(ticker.lap(), 0.5);
        assert_eq!(ticker.lap(), 0.0);

        // Time going backwards never yields a negative lap
        clock.set(0.1);
        assert_eq!(ticker.lap(), 0.0);

        ticker.reset();
        clock.advance(3.0);
        assert_eq!(ticker.lap(), 0.0);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
