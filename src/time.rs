//! Clock helpers.

use chrono::Utc;
use std::time::{Duration, Instant};

/// Wall-clock time in whole unix seconds
pub fn now() -> i64 {
    Utc::now().timestamp()
}

/// Nanoseconds in `d`, saturating at `i64::MAX`
pub fn duration_ns(d: Duration) -> i64 {
    let ns = d.as_secs()
        .saturating_mul(1_000_000_000)
        .saturating_add(u64::from(d.subsec_nanos()));
    if ns > i64::max_value() as u64 {
        i64::max_value()
    } else {
        ns as i64
    }
}

/// Fractional seconds in `d`
pub fn duration_secs(d: Duration) -> f64 {
    d.as_secs() as f64 + f64::from(d.subsec_nanos()) / 1_000_000_000.0
}

/// Fixed-rate tick schedule
///
/// Ticks fall at `origin + k * interval`. A tick that passes while the
/// caller is busy is dropped, not queued: `next` always lands in the
/// future relative to the `now` it is given.
#[derive(Debug, Clone)]
pub struct Schedule {
    interval: Duration,
    next: Instant,
}

impl Schedule {
    /// Start a schedule whose first tick is one `interval` after `origin`
    pub fn new(origin: Instant, interval: Duration) -> Schedule {
        Schedule {
            interval: interval,
            next: origin + interval,
        }
    }

    /// The instant of the upcoming tick
    pub fn deadline(&self) -> Instant {
        self.next
    }

    /// Move past the tick that just fired, skipping any that `now` has
    /// already overrun. Returns the number of ticks skipped.
    pub fn advance(&mut self, now: Instant) -> u64 {
        let mut skipped = 0;
        self.next += self.interval;
        if self.interval == Duration::from_secs(0) {
            return skipped;
        }
        while self.next <= now {
            self.next += self.interval;
            skipped += 1;
        }
        skipped
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_duration_ns() {
        assert_eq!(23_000_000, duration_ns(Duration::from_millis(23)));
        assert_eq!(1_000_000_007, duration_ns(Duration::new(1, 7)));
        assert_eq!(
            i64::max_value(),
            duration_ns(Duration::from_secs(u64::max_value()))
        );
    }

    #[test]
    fn test_duration_secs() {
        assert_eq!(1.5, duration_secs(Duration::from_millis(1500)));
    }

    #[test]
    fn test_schedule_fixed_rate() {
        let origin = Instant::now();
        let interval = Duration::from_secs(10);
        let mut sched = Schedule::new(origin, interval);
        assert_eq!(origin + interval, sched.deadline());

        // a quick cycle keeps the grid
        assert_eq!(0, sched.advance(origin + Duration::from_secs(11)));
        assert_eq!(origin + Duration::from_secs(20), sched.deadline());

        // a slow cycle overruns two ticks, which are dropped
        assert_eq!(2, sched.advance(origin + Duration::from_secs(45)));
        assert_eq!(origin + Duration::from_secs(50), sched.deadline());
    }
}
