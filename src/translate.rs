//! Translation of metrics into series.
//!
//! Every metric kind maps to a fixed, ordered list of series named
//! `<name>.<suffix>`. Identifiers may carry tags in a bracketed suffix,
//! `namespace.metric[tag1:value1,tag2:value2]`; these are split off here and
//! attached to each resulting series.

use metric::{Counter, Gauge, Histogram, Meter, Metric, Timer};
use series::{Kind, Series};

/// Quantiles reported for histograms and timers. The first is the median.
pub const QUANTILES: [f64; 5] = [0.5, 0.75, 0.95, 0.99, 0.999];

const QUANTILE_SUFFIXES: [&'static str; 5] = [
    "median",
    "percentile.75",
    "percentile.95",
    "percentile.99",
    "percentile.999",
];

const NANOS_PER_MILLI: f64 = 1_000_000.0;

/// Split an identifier into its dotted name and tags
///
/// `my.counter[a:1,b:2]` becomes `("my.counter", ["a:1", "b:2"])`. The name
/// must be made of ASCII word characters and dots, the identifier must end
/// with the closing bracket and the bracket body must be non-empty. Anything
/// else is returned whole as the name, with no tags. Tags are not trimmed,
/// validated or deduplicated.
pub fn split_name_and_tags(id: &str) -> (&str, Vec<&str>) {
    let open = match id.find('[') {
        Some(idx) => idx,
        None => return (id, Vec::new()),
    };
    let name = &id[..open];
    let rest = &id[open + 1..];
    if name.is_empty() || !name.chars().all(is_name_char) || !rest.ends_with(']') {
        return (id, Vec::new());
    }
    let body = &rest[..rest.len() - 1];
    if body.is_empty() {
        return (id, Vec::new());
    }
    (name, body.split(',').collect())
}

#[inline]
fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '.'
}

/// Convert nanoseconds to fractional milliseconds
#[inline]
pub fn millis(nanos: f64) -> f64 {
    nanos / NANOS_PER_MILLI
}

/// Series builder shared by every metric kind of one identifier
struct Builder<'a> {
    timestamp: i64,
    name: &'a str,
    host: &'a str,
    tags: Vec<String>,
    out: Vec<Series>,
}

impl<'a> Builder<'a> {
    fn new(timestamp: i64, id: &'a str, host: &'a str, extra_tags: &[String]) -> Builder<'a> {
        let (name, tags) = split_name_and_tags(id);
        let mut tags: Vec<String> = tags.into_iter().map(|t| t.to_string()).collect();
        tags.extend_from_slice(extra_tags);
        Builder {
            timestamp: timestamp,
            name: name,
            host: host,
            tags: tags,
            out: Vec::with_capacity(14),
        }
    }

    fn push<V>(&mut self, suffix: &str, kind: Kind, value: V) -> &mut Self
    where
        V: Into<::series::Value>,
    {
        let mut metric = String::with_capacity(self.name.len() + 1 + suffix.len());
        metric.push_str(self.name);
        metric.push('.');
        metric.push_str(suffix);
        self.out.push(Series::new(
            metric,
            kind,
            self.timestamp,
            value,
            self.host,
            &self.tags,
        ));
        self
    }

    fn counter_i(&mut self, suffix: &str, v: i64) -> &mut Self {
        self.push(suffix, Kind::Counter, v)
    }

    fn counter_f(&mut self, suffix: &str, v: f64) -> &mut Self {
        self.push(suffix, Kind::Counter, v)
    }

    fn gauge_i(&mut self, suffix: &str, v: i64) -> &mut Self {
        self.push(suffix, Kind::Gauge, v)
    }

    fn finish(self) -> Vec<Series> {
        self.out
    }
}

/// Translate one metric into its series
///
/// `timestamp` is in unix seconds and is shared by every point. `host` is
/// copied verbatim into each series. `extra_tags` follow the tags parsed out
/// of `id`. Healthchecks produce no series.
pub fn series(
    timestamp: i64,
    id: &str,
    metric: &Metric,
    host: &str,
    extra_tags: &[String],
) -> Vec<Series> {
    let b = Builder::new(timestamp, id, host, extra_tags);
    match *metric {
        Metric::Counter(ref c) => counter_series(b, c),
        Metric::Gauge(ref g) => gauge_series(b, g),
        Metric::Histogram(ref h) => histogram_series(b, h),
        Metric::Meter(ref m) => meter_series(b, m),
        Metric::Timer(ref t) => timer_series(b, t),
        Metric::Healthcheck(_) => Vec::new(),
    }
}

fn counter_series(mut b: Builder, counter: &Counter) -> Vec<Series> {
    b.counter_i("count", counter.count());
    b.finish()
}

fn gauge_series(mut b: Builder, gauge: &Gauge) -> Vec<Series> {
    b.gauge_i("value", gauge.value());
    b.finish()
}

fn histogram_series(mut b: Builder, h: &Histogram) -> Vec<Series> {
    let snap = h.snapshot();
    let ps = snap.percentiles(&QUANTILES);
    b.counter_i("count", snap.count())
        .counter_i("min", snap.min())
        .counter_i("max", snap.max())
        .counter_f("mean", snap.mean())
        .counter_f("stddev", snap.stddev());
    for (suffix, p) in QUANTILE_SUFFIXES.iter().zip(ps) {
        b.counter_f(suffix, p);
    }
    b.finish()
}

fn meter_series(mut b: Builder, m: &Meter) -> Vec<Series> {
    let snap = m.snapshot();
    b.counter_i("count", snap.count)
        .counter_f("rate.1min", snap.rate1)
        .counter_f("rate.5min", snap.rate5)
        .counter_f("rate.15min", snap.rate15)
        .counter_f("rate.mean", snap.rate_mean);
    b.finish()
}

fn timer_series(mut b: Builder, t: &Timer) -> Vec<Series> {
    let snap = t.snapshot();
    let durs = &snap.durations;
    let ps = durs.percentiles(&QUANTILES);
    b.counter_i("count", durs.count())
        .counter_f("min", millis(durs.min() as f64))
        .counter_f("max", millis(durs.max() as f64))
        .counter_f("mean", millis(durs.mean()))
        .counter_f("stddev", millis(durs.stddev()));
    for (suffix, p) in QUANTILE_SUFFIXES.iter().zip(ps) {
        b.counter_f(suffix, millis(p));
    }
    b.counter_f("rate.1min", snap.rates.rate1)
        .counter_f("rate.5min", snap.rates.rate5)
        .counter_f("rate.15min", snap.rates.rate15)
        .counter_f("rate.mean", snap.rates.rate_mean);
    b.finish()
}
