//! Periodic reporting of a `Registry` to a `Sink`.
//!
//! Each report cycle reads the wall clock once, translates every registered
//! metric into series stamped with that time, and hands the whole batch to
//! the sink in one call. Cycles are driven by a fixed-rate schedule: ticks
//! are measured from when reporting started, not from when the previous
//! cycle finished. Cycles never overlap; ticks that pass while a cycle is
//! still running are dropped. A failed cycle is logged and the next tick
//! proceeds as normal.

use metric::{Counter, Gauge, Metric, Timer};
use registry::Registry;
use series::Series;
use sink::{self, Sink};
use std::sync::Arc;
use std::thread::sleep;
use std::time::{Duration, Instant};
use thread;
use time;
use translate;

/// Handle to a reporter running on its own thread
pub type ReporterHandle = thread::ThreadHandle;

struct SelfTelemetry {
    report: Arc<Timer>,
    failures: Arc<Counter>,
    series: Arc<Gauge>,
}

/// Ships the metrics of a `Registry` through a `Sink`
pub struct Reporter<S> {
    sink: S,
    registry: Arc<Registry>,
    host: String,
    tags: Vec<String>,
    telemetry: Option<SelfTelemetry>,
}

impl<S> Reporter<S>
where
    S: Sink,
{
    /// Create an un-started `Reporter`
    ///
    /// `host` is stamped verbatim on every series. Call `start` or `spawn`
    /// to begin periodic reporting.
    pub fn new<H>(sink: S, registry: Arc<Registry>, host: H) -> Reporter<S>
    where
        H: Into<String>,
    {
        Reporter {
            sink: sink,
            registry: registry,
            host: host.into(),
            tags: Vec::new(),
            telemetry: None,
        }
    }

    /// Tags appended to every series, after those parsed from identifiers
    pub fn tags(mut self, tags: Vec<String>) -> Reporter<S> {
        self.tags = tags;
        self
    }

    /// Record the reporter's own activity into its registry
    ///
    /// Registers `<prefix>.report` (a timer of whole cycles),
    /// `<prefix>.failures` (a counter of failed deliveries) and
    /// `<prefix>.series` (a gauge of the last batch size). These ship
    /// alongside everything else in the registry.
    pub fn self_telemetry(mut self, prefix: &str) -> Reporter<S> {
        let report = self.registry
            .get_or_register(format!("{}.report", prefix), Timer::new)
            .timer();
        let failures = self.registry
            .get_or_register(format!("{}.failures", prefix), Counter::new)
            .counter();
        let series = self.registry
            .get_or_register(format!("{}.series", prefix), Gauge::new)
            .gauge();
        match (report, failures, series) {
            (Some(report), Some(failures), Some(series)) => {
                self.telemetry = Some(SelfTelemetry {
                    report: report,
                    failures: failures,
                    series: series,
                });
            }
            _ => {
                warn!(
                    "metrics under {} are already registered with other kinds, \
                     self telemetry disabled",
                    prefix
                );
            }
        }
        self
    }

    /// Translate every registered metric into series, stamped now
    pub fn series(&self) -> Vec<Series> {
        self.series_at(time::now())
    }

    /// Translate every registered metric into series stamped `timestamp`
    ///
    /// Series come out grouped by metric, in registration order. Metrics
    /// that have no series form, such as healthchecks, are skipped.
    pub fn series_at(&self, timestamp: i64) -> Vec<Series> {
        let mut series = Vec::new();
        self.registry.each(|id, metric: &Metric| {
            series.extend(translate::series(
                timestamp,
                id,
                metric,
                &self.host,
                &self.tags,
            ));
        });
        series
    }

    /// Run a single report cycle
    pub fn report(&mut self) -> Result<(), sink::Error> {
        let start = Instant::now();
        let series = self.series();
        let res = self.sink.post_series(&series);
        if let Some(ref telem) = self.telemetry {
            telem.series.update(series.len() as i64);
            if res.is_err() {
                telem.failures.inc(1);
            }
            telem.report.update_since(start);
        }
        res
    }

    fn cycle(&mut self) {
        match self.report() {
            Ok(()) => trace!("report cycle complete"),
            Err(e) => error!("Datadog series error: {}", e),
        }
    }

    /// Report every `interval`, waiting on `wait` between cycles
    ///
    /// `wait` sleeps until the given deadline and returns `false` to stop
    /// the loop.
    fn run<F>(&mut self, interval: Duration, mut wait: F)
    where
        F: FnMut(Instant) -> bool,
    {
        let mut schedule = time::Schedule::new(Instant::now(), interval);
        loop {
            if !wait(schedule.deadline()) {
                debug!("reporter stopping");
                return;
            }
            self.cycle();
            let skipped = schedule.advance(Instant::now());
            if skipped > 0 {
                warn!(
                    "report cycle overran its interval, skipped {} tick(s)",
                    skipped
                );
            }
        }
    }

    /// Report every `interval`, blocking the calling thread forever
    ///
    /// Errors are logged and reporting continues.
    pub fn start(&mut self, interval: Duration) {
        info!("reporting every {:?} as host {}", interval, self.host);
        self.run(interval, |deadline| {
            let now = Instant::now();
            if deadline > now {
                sleep(deadline - now);
            }
            true
        })
    }
}

impl<S> Reporter<S>
where
    S: Sink + Send + 'static,
{
    /// Report every `interval` on a new thread
    ///
    /// Reporting stops when the returned handle is shut down. A cycle in
    /// progress at that point is allowed to finish.
    pub fn spawn(mut self, interval: Duration) -> ReporterHandle {
        info!("reporting every {:?} as host {}", interval, self.host);
        thread::spawn(move |poll| self.run(interval, |deadline| poll.wait_until(deadline)))
    }
}
