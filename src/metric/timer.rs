use metric::histogram::{Histogram, HistogramSnapshot};
use metric::meter::{Meter, MeterSnapshot};
use metric::sample::Sample;
use std::time::{Duration, Instant};
use time;

/// Durations of an operation together with how often it happens
///
/// Durations are recorded in nanoseconds. A `Timer` is a `Histogram` of
/// those durations plus a `Meter` marked once per recording.
#[derive(Debug, Default)]
pub struct Timer {
    histogram: Histogram,
    meter: Meter,
}

/// A `Timer` read at a single moment
///
/// Duration statistics in `durations` are in nanoseconds.
#[derive(Debug, Clone, PartialEq)]
pub struct TimerSnapshot {
    pub durations: HistogramSnapshot,
    pub rates: MeterSnapshot,
}

impl TimerSnapshot {
    pub fn count(&self) -> i64 {
        self.durations.count()
    }
}

impl Timer {
    pub fn new() -> Timer {
        Timer::default()
    }

    /// Create a `Timer` whose durations are kept in `sample`
    pub fn with_sample(sample: Sample) -> Timer {
        Timer {
            histogram: Histogram::with_sample(sample),
            meter: Meter::new(),
        }
    }

    /// Record one duration
    pub fn update(&self, d: Duration) {
        self.histogram.update(time::duration_ns(d));
        self.meter.mark(1);
    }

    /// Record the time elapsed since `start`
    pub fn update_since(&self, start: Instant) {
        self.update(start.elapsed())
    }

    /// Run `f`, recording how long it took, and hand back its result
    pub fn time<F, T>(&self, f: F) -> T
    where
        F: FnOnce() -> T,
    {
        let start = Instant::now();
        let res = f();
        self.update_since(start);
        res
    }

    pub fn count(&self) -> i64 {
        self.histogram.count()
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            durations: self.histogram.snapshot(),
            rates: self.meter.snapshot(),
        }
    }
}
