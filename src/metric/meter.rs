//! Event throughput with exponentially-weighted moving averages.
//!
//! A `Meter` counts marked events and keeps 1, 5 and 15 minute moving
//! averages of the event rate. Averages advance in fixed five second ticks.
//! There is no background thread: every `mark` and every `snapshot` first
//! catches the averages up on whatever ticks have elapsed, so reads are
//! always current without the caller having to nudge the meter.

use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};
use time;

const TICK_SECS: u64 = 5;

lazy_static! {
    static ref M1_ALPHA: f64 = alpha(1.0);
    static ref M5_ALPHA: f64 = alpha(5.0);
    static ref M15_ALPHA: f64 = alpha(15.0);
}

fn alpha(minutes: f64) -> f64 {
    1.0 - (-(TICK_SECS as f64) / 60.0 / minutes).exp()
}

/// Exponentially-weighted moving average of a per-second rate
#[derive(Debug, Clone)]
pub struct Ewma {
    alpha: f64,
    rate: f64,
    uncounted: i64,
    init: bool,
}

impl Ewma {
    /// Create an `Ewma` with smoothing constant `alpha`
    pub fn new(alpha: f64) -> Ewma {
        Ewma {
            alpha: alpha,
            rate: 0.0,
            uncounted: 0,
            init: false,
        }
    }

    /// Add `n` events to the current tick
    pub fn update(&mut self, n: i64) {
        self.uncounted = self.uncounted.saturating_add(n);
    }

    /// Fold the current tick into the average
    pub fn tick(&mut self) {
        let instant_rate = self.uncounted as f64 / TICK_SECS as f64;
        self.uncounted = 0;
        if self.init {
            self.rate += self.alpha * (instant_rate - self.rate);
        } else {
            self.init = true;
            self.rate = instant_rate;
        }
    }

    /// Events per second
    pub fn rate(&self) -> f64 {
        self.rate
    }
}

#[derive(Debug)]
struct MeterState {
    count: i64,
    m1: Ewma,
    m5: Ewma,
    m15: Ewma,
    last_tick: Instant,
}

/// Rates read out of a `Meter` at a single moment, in events per second.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeterSnapshot {
    pub count: i64,
    pub rate1: f64,
    pub rate5: f64,
    pub rate15: f64,
    pub rate_mean: f64,
}

/// Counts events and tracks their rate
#[derive(Debug)]
pub struct Meter {
    start: Instant,
    state: Mutex<MeterState>,
}

impl Default for Meter {
    fn default() -> Meter {
        Meter::new()
    }
}

impl Meter {
    /// Create a new `Meter`, starting its clock now
    pub fn new() -> Meter {
        let now = Instant::now();
        Meter {
            start: now,
            state: Mutex::new(MeterState {
                count: 0,
                m1: Ewma::new(*M1_ALPHA),
                m5: Ewma::new(*M5_ALPHA),
                m15: Ewma::new(*M15_ALPHA),
                last_tick: now,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<MeterState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn catch_up(state: &mut MeterState, now: Instant) {
        if now <= state.last_tick {
            return;
        }
        let elapsed = now.duration_since(state.last_tick).as_secs();
        let ticks = elapsed / TICK_SECS;
        if ticks == 0 {
            return;
        }
        state.last_tick += Duration::from_secs(ticks * TICK_SECS);
        for _ in 0..ticks {
            Meter::tick_state(state);
        }
    }

    fn tick_state(state: &mut MeterState) {
        state.m1.tick();
        state.m5.tick();
        state.m15.tick();
    }

    /// Record `n` events
    pub fn mark(&self, n: i64) {
        let mut state = self.lock();
        Meter::catch_up(&mut state, Instant::now());
        state.count = state.count.saturating_add(n);
        state.m1.update(n);
        state.m5.update(n);
        state.m15.update(n);
    }

    /// Total number of marked events
    pub fn count(&self) -> i64 {
        self.lock().count
    }

    #[cfg(test)]
    fn tick(&self) {
        let mut state = self.lock();
        Meter::tick_state(&mut state);
    }

    /// Read count and rates, advancing the averages to the present first
    pub fn snapshot(&self) -> MeterSnapshot {
        let now = Instant::now();
        let mut state = self.lock();
        Meter::catch_up(&mut state, now);
        let elapsed = time::duration_secs(now.duration_since(self.start));
        let rate_mean = if elapsed > 0.0 {
            state.count as f64 / elapsed
        } else {
            0.0
        };
        MeterSnapshot {
            count: state.count,
            rate1: state.m1.rate(),
            rate5: state.m5.rate(),
            rate15: state.m15.rate(),
            rate_mean: rate_mean,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_count() {
        let meter = Meter::new();
        meter.mark(222);
        meter.mark(444);
        assert_eq!(666, meter.count());
        assert_eq!(666, meter.snapshot().count);
    }

    #[test]
    fn test_rates_before_first_tick_are_zero() {
        let meter = Meter::new();
        meter.mark(10);
        let snap = meter.snapshot();
        assert_eq!(0.0, snap.rate1);
        assert_eq!(0.0, snap.rate5);
        assert_eq!(0.0, snap.rate15);
        assert!(snap.rate_mean >= 0.0);
    }

    #[test]
    fn test_first_tick_sets_instant_rate() {
        let meter = Meter::new();
        meter.mark(60);
        meter.tick();
        let snap = meter.snapshot();
        assert_eq!(12.0, snap.rate1);
        assert_eq!(12.0, snap.rate5);
        assert_eq!(12.0, snap.rate15);
    }

    #[test]
    fn test_idle_ticks_decay() {
        let meter = Meter::new();
        meter.mark(60);
        meter.tick();
        for _ in 0..12 {
            meter.tick();
        }
        let snap = meter.snapshot();
        // one minute idle: the 1min average decays by a factor of e
        assert!((snap.rate1 - 12.0 * (-1.0f64).exp()).abs() < 1e-9);
        assert!(snap.rate1 < snap.rate5);
        assert!(snap.rate5 < snap.rate15);
    }

    #[test]
    fn test_ewma_alpha() {
        let mut ewma = Ewma::new(*M1_ALPHA);
        ewma.update(3);
        ewma.tick();
        assert_eq!(0.6, ewma.rate());
        ewma.tick();
        assert!((ewma.rate() - 0.6 * (1.0 - *M1_ALPHA)).abs() < 1e-12);
    }
}
