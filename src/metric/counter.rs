use std::sync::atomic::{AtomicI64, Ordering};

/// A monotonic-ish running total
///
/// `Counter` holds a signed total that application code increments and
/// decrements. Reads are plain atomic loads and have no side effects.
#[derive(Debug, Default)]
pub struct Counter {
    count: AtomicI64,
}

impl Counter {
    /// Create a new `Counter` at zero
    pub fn new() -> Counter {
        Counter::default()
    }

    /// Add `i` to the total
    pub fn inc(&self, i: i64) {
        self.count.fetch_add(i, Ordering::Relaxed);
    }

    /// Subtract `i` from the total
    pub fn dec(&self, i: i64) {
        self.count.fetch_sub(i, Ordering::Relaxed);
    }

    /// Reset the total to zero
    pub fn clear(&self) {
        self.count.store(0, Ordering::Relaxed);
    }

    /// Return the current total
    pub fn count(&self) -> i64 {
        self.count.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod test {
    use quickcheck::{QuickCheck, TestResult};
    use super::*;

    #[test]
    fn test_inc_dec() {
        let counter = Counter::new();
        counter.inc(444);
        counter.inc(222);
        assert_eq!(666, counter.count());
        counter.dec(6);
        assert_eq!(660, counter.count());
        counter.clear();
        assert_eq!(0, counter.count());
    }

    #[test]
    fn test_count_is_sum_of_increments() {
        fn inner(incs: Vec<i32>) -> TestResult {
            let counter = Counter::new();
            let mut total: i64 = 0;
            for i in incs {
                counter.inc(i as i64);
                total += i as i64;
            }
            assert_eq!(total, counter.count());
            TestResult::passed()
        }
        QuickCheck::new()
            .tests(1000)
            .max_tests(10000)
            .quickcheck(inner as fn(Vec<i32>) -> TestResult);
    }
}
