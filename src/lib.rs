//! Ship in-process metrics to Datadog as time series.
//!
//! Application code records into counters, gauges, histograms, meters and
//! timers held in a `Registry`. A `Reporter` periodically turns every
//! registered metric into a flat set of named, timestamped series and posts
//! the batch to the Datadog series API.
//!
//! Identifiers may carry tags in a bracketed suffix:
//! `my.service.requests[env:prod,region:us]` reports as
//! `my.service.requests.*` tagged `env:prod` and `region:us`.
//!
//! ```
//! extern crate datadog_metrics;
//!
//! use datadog_metrics::metric::Counter;
//! use datadog_metrics::registry::Registry;
//! use datadog_metrics::reporter::Reporter;
//! use datadog_metrics::sink::Console;
//! use std::sync::Arc;
//!
//! let registry = Arc::new(Registry::new());
//! let requests = Arc::new(Counter::new());
//! registry.register("my.requests[env:prod]", requests.clone()).unwrap();
//! requests.inc(3);
//!
//! let reporter = Reporter::new(Console::new(), registry, "web-1");
//! let series = reporter.series();
//! assert_eq!("my.requests.count", series[0].metric);
//! assert_eq!(vec!["env:prod".to_string()], series[0].tags);
//! ```
#![allow(unknown_lints)]
#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]
extern crate chrono;
extern crate clap;
extern crate rand;
extern crate reqwest;
extern crate serde;
extern crate serde_json;
extern crate toml;

#[macro_use]
extern crate log;

#[macro_use]
extern crate lazy_static;

#[macro_use]
extern crate serde_derive;

#[cfg(test)]
extern crate quickcheck;

pub mod config;
pub mod metric;
pub mod registry;
pub mod reporter;
pub mod series;
pub mod sink;
pub mod thread;
pub mod time;
pub mod translate;
