use metric::sample::{Sample, SampleSnapshot};

/// Statistics read out of a `Histogram` at a single moment.
pub type HistogramSnapshot = SampleSnapshot;

/// Distribution of an `i64` stream
///
/// `Histogram` keeps a uniform reservoir of recorded values from which
/// count, extrema, mean, standard deviation and quantiles are derived.
#[derive(Debug, Default)]
pub struct Histogram {
    sample: Sample,
}

impl Histogram {
    /// Create a `Histogram` with the default reservoir size
    pub fn new() -> Histogram {
        Histogram::default()
    }

    /// Create a `Histogram` over the given `Sample`
    pub fn with_sample(sample: Sample) -> Histogram {
        Histogram { sample: sample }
    }

    /// Record a value
    pub fn update(&self, v: i64) {
        self.sample.update(v)
    }

    /// Forget all recorded values
    pub fn clear(&self) {
        self.sample.clear()
    }

    /// Total number of recorded values
    pub fn count(&self) -> i64 {
        self.sample.count()
    }

    pub fn snapshot(&self) -> HistogramSnapshot {
        self.sample.snapshot()
    }
}
