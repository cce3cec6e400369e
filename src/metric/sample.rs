//! Uniform reservoir sampling and the statistics computed over a sample.
//!
//! `Sample` keeps at most `reservoir_size` values chosen uniformly from the
//! full stream using Vitter's algorithm R. The total number of updates is
//! tracked separately so that `count` reflects everything ever recorded, not
//! just what survived in the reservoir.

use rand::{self, Rng};
use std::sync::{Mutex, MutexGuard};

/// The reservoir size used when none is specified.
pub const DEFAULT_RESERVOIR_SIZE: usize = 1028;

#[derive(Debug)]
struct Reservoir {
    count: i64,
    values: Vec<i64>,
}

/// A uniform sample of an `i64` stream
#[derive(Debug)]
pub struct Sample {
    reservoir_size: usize,
    inner: Mutex<Reservoir>,
}

impl Default for Sample {
    fn default() -> Sample {
        Sample::new(DEFAULT_RESERVOIR_SIZE)
    }
}

impl Sample {
    /// Create a new `Sample` holding at most `reservoir_size` values
    ///
    /// A zero `reservoir_size` is bumped to one.
    pub fn new(reservoir_size: usize) -> Sample {
        let reservoir_size = if reservoir_size == 0 { 1 } else { reservoir_size };
        Sample {
            reservoir_size: reservoir_size,
            inner: Mutex::new(Reservoir {
                count: 0,
                values: Vec::with_capacity(reservoir_size),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<Reservoir> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Record a value into the sample
    pub fn update(&self, v: i64) {
        let mut res = self.lock();
        res.count = res.count.saturating_add(1);
        if res.values.len() < self.reservoir_size {
            res.values.push(v);
        } else {
            let r = rand::thread_rng().gen_range(0, res.count);
            if (r as usize) < self.reservoir_size {
                res.values[r as usize] = v;
            }
        }
    }

    /// Drop all recorded values and reset the update count
    pub fn clear(&self) {
        let mut res = self.lock();
        res.count = 0;
        res.values.clear();
    }

    /// The total number of updates, including those evicted from the
    /// reservoir
    pub fn count(&self) -> i64 {
        self.lock().count
    }

    /// The number of values currently held in the reservoir
    pub fn size(&self) -> usize {
        self.lock().values.len()
    }

    /// A copy of the values currently held, in reservoir order
    pub fn values(&self) -> Vec<i64> {
        self.lock().values.clone()
    }

    /// Copy the sample out for inspection
    pub fn snapshot(&self) -> SampleSnapshot {
        let res = self.lock();
        SampleSnapshot::new(res.count, res.values.clone())
    }
}

/// A frozen, sorted copy of a `Sample`
///
/// All statistics are zero for a snapshot with no values.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSnapshot {
    count: i64,
    values: Vec<i64>,
}

impl SampleSnapshot {
    /// Build a snapshot from a total update count and the surviving values
    pub fn new(count: i64, mut values: Vec<i64>) -> SampleSnapshot {
        values.sort();
        SampleSnapshot {
            count: count,
            values: values,
        }
    }

    /// Total number of updates recorded
    pub fn count(&self) -> i64 {
        self.count
    }

    /// The sampled values, ascending
    pub fn values(&self) -> &[i64] {
        &self.values
    }

    pub fn min(&self) -> i64 {
        self.values.first().cloned().unwrap_or(0)
    }

    pub fn max(&self) -> i64 {
        self.values.last().cloned().unwrap_or(0)
    }

    pub fn sum(&self) -> f64 {
        self.values.iter().fold(0.0, |acc, v| acc + *v as f64)
    }

    pub fn mean(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        self.sum() / self.values.len() as f64
    }

    /// Population variance of the sampled values
    pub fn variance(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let mean = self.mean();
        let sq_sum = self.values.iter().fold(0.0, |acc, v| {
            let d = *v as f64 - mean;
            acc + d * d
        });
        sq_sum / self.values.len() as f64
    }

    pub fn stddev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// Estimate the value at quantile `p`, `0.0 <= p <= 1.0`
    ///
    /// The rank is `p * (n + 1)`, interpolated linearly between neighbours
    /// and clamped to the smallest and largest sampled values.
    pub fn percentile(&self, p: f64) -> f64 {
        let size = self.values.len();
        if size == 0 {
            return 0.0;
        }
        let pos = p * (size + 1) as f64;
        // NaN fails every comparison, so it lands on the smallest value
        if !(pos >= 1.0) {
            self.values[0] as f64
        } else if pos >= size as f64 {
            self.values[size - 1] as f64
        } else {
            let idx = pos as usize;
            let lower = self.values[idx - 1] as f64;
            let upper = self.values[idx] as f64;
            lower + (pos - pos.floor()) * (upper - lower)
        }
    }

    /// `percentile` for each of `ps`, in order
    pub fn percentiles(&self, ps: &[f64]) -> Vec<f64> {
        ps.iter().map(|p| self.percentile(*p)).collect()
    }
}

#[cfg(test)]
mod test {
    use quickcheck::{QuickCheck, TestResult};
    use super::*;

    fn powers_of_two() -> SampleSnapshot {
        SampleSnapshot::new(5, vec![16, 1, 8, 2, 4])
    }

    #[test]
    fn test_snapshot_stats() {
        let snap = powers_of_two();
        assert_eq!(5, snap.count());
        assert_eq!(&[1i64, 2, 4, 8, 16][..], snap.values());
        assert_eq!(1, snap.min());
        assert_eq!(16, snap.max());
        assert_eq!(6.2, snap.mean());
        assert!((snap.stddev() - 5.455_272_678_794_342).abs() < 1e-9);
    }

    #[test]
    fn test_percentiles_interpolate() {
        let snap = powers_of_two();
        assert_eq!(
            vec![4.0, 12.0, 16.0, 16.0, 16.0],
            snap.percentiles(&[0.5, 0.75, 0.95, 0.99, 0.999])
        );
        assert_eq!(1.0, snap.percentile(0.0));
        assert_eq!(1.5, snap.percentile(0.25));
    }

    #[test]
    fn test_percentile_of_nan_is_min() {
        let snap = SampleSnapshot::new(3, vec![3, 1, 2]);
        assert_eq!(1.0, snap.percentile(::std::f64::NAN));
        assert_eq!(1.0, snap.percentile(-0.5));
        assert_eq!(3.0, snap.percentile(1.5));
    }

    #[test]
    fn test_empty_snapshot_is_zeroed() {
        let snap = SampleSnapshot::new(0, Vec::new());
        assert_eq!(0, snap.min());
        assert_eq!(0, snap.max());
        assert_eq!(0.0, snap.mean());
        assert_eq!(0.0, snap.stddev());
        assert_eq!(vec![0.0, 0.0], snap.percentiles(&[0.5, 0.99]));
    }

    #[test]
    fn test_reservoir_is_bounded() {
        let sample = Sample::new(100);
        for i in 0..10_000 {
            sample.update(i);
        }
        assert_eq!(10_000, sample.count());
        assert_eq!(100, sample.size());
        let snap = sample.snapshot();
        assert!(snap.values().iter().all(|v| *v >= 0 && *v < 10_000));
    }

    #[test]
    fn test_clear() {
        let sample = Sample::default();
        sample.update(10);
        sample.update(3);
        assert_eq!(vec![10, 3], sample.values());
        sample.clear();
        assert_eq!(0, sample.count());
        assert_eq!(0, sample.size());
    }

    #[test]
    fn test_percentile_within_bounds() {
        fn inner(values: Vec<i32>, p: u16) -> TestResult {
            if values.is_empty() {
                return TestResult::discard();
            }
            let p = (p % 1001) as f64 / 1000.0;
            let values: Vec<i64> = values.into_iter().map(|v| v as i64).collect();
            let snap = SampleSnapshot::new(values.len() as i64, values);
            let q = snap.percentile(p);
            assert!(q >= snap.min() as f64);
            assert!(q <= snap.max() as f64);
            TestResult::passed()
        }
        QuickCheck::new()
            .tests(1000)
            .max_tests(10000)
            .quickcheck(inner as fn(Vec<i32>, u16) -> TestResult);
    }
}
