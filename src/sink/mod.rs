//! Sinks accept batches of series and deliver them somewhere.
//!
//! A sink is handed one whole report at a time. It either delivers the batch
//! or reports why it could not; it never retries on its own.

use reqwest;
use serde_json;
use series::Series;
use std::error;
use std::fmt;

mod console;
mod datadog;

pub use self::console::Console;
pub use self::datadog::{Datadog, DatadogConfig, DEFAULT_ENDPOINT, SERIES_PATH};

/// Delivery failures
#[derive(Debug)]
pub enum Error {
    /// The batch could not be encoded.
    Json(serde_json::Error),
    /// The request could not be made or completed.
    Http(reqwest::Error),
    /// The backend answered with a status other than 200 or 202.
    BadResponse(u16, String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::Json(ref e) => write!(f, "could not encode series: {}", e),
            Error::Http(ref e) => write!(f, "request failed: {}", e),
            Error::BadResponse(code, ref status) => {
                write!(f, "bad response: '{} {}'", code, status)
            }
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            Error::Json(ref e) => Some(e),
            Error::Http(ref e) => Some(e),
            Error::BadResponse(..) => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Error {
        Error::Json(e)
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Error {
        Error::Http(e)
    }
}

/// A 'sink' is a destination for series.
pub trait Sink {
    /// Deliver one report's worth of series.
    fn post_series(&mut self, series: &[Series]) -> Result<(), Error>;
}

impl<'a, S: Sink + ?Sized> Sink for &'a mut S {
    fn post_series(&mut self, series: &[Series]) -> Result<(), Error> {
        (**self).post_series(series)
    }
}

impl<S: Sink + ?Sized> Sink for Box<S> {
    fn post_series(&mut self, series: &[Series]) -> Result<(), Error> {
        (**self).post_series(series)
    }
}
