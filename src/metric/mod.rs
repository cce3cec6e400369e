//! Metric primitives.
//!
//! Application code records into these types; the reporter only ever reads
//! them. Each primitive is internally synchronised so a single instance can
//! be shared between recording threads and the reporter through an `Arc`.

mod counter;
mod gauge;
mod healthcheck;
mod histogram;
mod meter;
mod sample;
mod timer;

pub use self::counter::Counter;
pub use self::gauge::Gauge;
pub use self::healthcheck::Healthcheck;
pub use self::histogram::{Histogram, HistogramSnapshot};
pub use self::meter::{Ewma, Meter, MeterSnapshot};
pub use self::sample::{Sample, SampleSnapshot, DEFAULT_RESERVOIR_SIZE};
pub use self::timer::{Timer, TimerSnapshot};

use std::sync::Arc;

/// Any metric that may live in a `Registry`
///
/// Cloning a `Metric` clones the handle, not the underlying state.
#[derive(Debug, Clone)]
pub enum Metric {
    /// A running total
    Counter(Arc<Counter>),
    /// A last-write-wins reading
    Gauge(Arc<Gauge>),
    /// A distribution of values
    Histogram(Arc<Histogram>),
    /// An event rate
    Meter(Arc<Meter>),
    /// A distribution of durations plus their rate
    Timer(Arc<Timer>),
    /// A health probe, not reportable as series
    Healthcheck(Arc<Healthcheck>),
}

impl Metric {
    /// A short, lowercase name for the metric's kind
    pub fn kind(&self) -> &'static str {
        match *self {
            Metric::Counter(_) => "counter",
            Metric::Gauge(_) => "gauge",
            Metric::Histogram(_) => "histogram",
            Metric::Meter(_) => "meter",
            Metric::Timer(_) => "timer",
            Metric::Healthcheck(_) => "healthcheck",
        }
    }

    pub fn counter(&self) -> Option<Arc<Counter>> {
        match *self {
            Metric::Counter(ref c) => Some(c.clone()),
            _ => None,
        }
    }

    pub fn gauge(&self) -> Option<Arc<Gauge>> {
        match *self {
            Metric::Gauge(ref g) => Some(g.clone()),
            _ => None,
        }
    }

    pub fn histogram(&self) -> Option<Arc<Histogram>> {
        match *self {
            Metric::Histogram(ref h) => Some(h.clone()),
            _ => None,
        }
    }

    pub fn meter(&self) -> Option<Arc<Meter>> {
        match *self {
            Metric::Meter(ref m) => Some(m.clone()),
            _ => None,
        }
    }

    pub fn timer(&self) -> Option<Arc<Timer>> {
        match *self {
            Metric::Timer(ref t) => Some(t.clone()),
            _ => None,
        }
    }

    pub fn healthcheck(&self) -> Option<Arc<Healthcheck>> {
        match *self {
            Metric::Healthcheck(ref h) => Some(h.clone()),
            _ => None,
        }
    }
}

macro_rules! metric_from {
    ($kind:ident) => {
        impl From<$kind> for Metric {
            fn from(m: $kind) -> Metric {
                Metric::$kind(Arc::new(m))
            }
        }

        impl From<Arc<$kind>> for Metric {
            fn from(m: Arc<$kind>) -> Metric {
                Metric::$kind(m)
            }
        }
    }
}

metric_from!(Counter);
metric_from!(Gauge);
metric_from!(Histogram);
metric_from!(Meter);
metric_from!(Timer);
metric_from!(Healthcheck);

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_handles_share_state() {
        let counter = Arc::new(Counter::new());
        let metric = Metric::from(counter.clone());
        counter.inc(3);
        assert_eq!(3, metric.counter().map(|c| c.count()).unwrap_or(0));
        assert_eq!("counter", metric.kind());
        assert!(metric.gauge().is_none());
    }

    #[test]
    fn test_from_owned() {
        assert_eq!("gauge", Metric::from(Gauge::new()).kind());
        assert_eq!("histogram", Metric::from(Histogram::new()).kind());
        assert_eq!("meter", Metric::from(Meter::new()).kind());
        assert_eq!("timer", Metric::from(Timer::new()).kind());
        assert_eq!("healthcheck", Metric::from(Healthcheck::new(|_| ())).kind());
    }
}
