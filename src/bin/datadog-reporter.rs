#![allow(unknown_lints)]

extern crate chrono;
extern crate datadog_metrics;
extern crate fern;

#[macro_use]
extern crate log;

use chrono::Utc;
use datadog_metrics::config;
use datadog_metrics::registry::Registry;
use datadog_metrics::reporter::Reporter;
use datadog_metrics::sink::{Console, Datadog, Sink};
use std::process;
use std::sync::Arc;
use std::time::Duration;

fn main() {
    let args = match config::parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };

    let level = match args.verbose {
        0 => log::LevelFilter::Error,
        1 => log::LevelFilter::Warn,
        2 => log::LevelFilter::Info,
        3 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    let logging = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}][{}][{}][{}] {}",
                record.module_path().unwrap_or("unknown"),
                record.line().unwrap_or(0),
                Utc::now().to_rfc3339(),
                record.level(),
                message
            ))
        })
        .level(level)
        .chain(std::io::stdout())
        .apply();
    if let Err(e) = logging {
        eprintln!("could not set up logging: {}", e);
        process::exit(1);
    }

    info!("datadog-reporter - {}", args.version);

    let sink: Box<dyn Sink + Send> = if let Some(config) = args.datadog {
        match Datadog::new(config) {
            Ok(dd) => Box::new(dd),
            Err(e) => {
                error!("could not create datadog sink: {}", e);
                process::exit(1);
            }
        }
    } else if args.console {
        Box::new(Console::new())
    } else {
        error!("no sink configured");
        process::exit(1);
    };

    let registry = Arc::new(Registry::new());
    let mut reporter = Reporter::new(sink, registry, args.host)
        .tags(args.tags)
        .self_telemetry(&args.self_telemetry);

    reporter.start(Duration::from_secs(args.interval));
}
