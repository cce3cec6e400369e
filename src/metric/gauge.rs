use std::sync::atomic::{AtomicI64, Ordering};

/// A point-in-time reading
///
/// The last call to `update` wins.
#[derive(Debug, Default)]
pub struct Gauge {
    value: AtomicI64,
}

impl Gauge {
    /// Create a new `Gauge` reading zero
    pub fn new() -> Gauge {
        Gauge::default()
    }

    /// Replace the gauge's reading
    pub fn update(&self, v: i64) {
        self.value.store(v, Ordering::Relaxed);
    }

    /// Return the last reading
    pub fn value(&self) -> i64 {
        self.value.load(Ordering::Relaxed)
    }
}
