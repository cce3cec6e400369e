//! Series records, the unit of data shipped to Datadog.
//!
//! A `Series` is one named, timestamped data point. On the wire it looks
//! like:
//!
//! ```json
//! {"metric":"my.counter.count","points":[[1346340794,666]],"type":"counter","host":"hostname","tags":["env:prod"]}
//! ```
//!
//! The series API expects an object, not an array, so batches are always
//! wrapped in a `SeriesMessage` with a single `series` field.

use serde_json;

/// The value of a single point
///
/// Integer fields stay integers on the wire; everything derived is a float.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Int(i64),
    Float(f64),
}

impl Value {
    pub fn as_f64(&self) -> f64 {
        match *self {
            Value::Int(i) => i as f64,
            Value::Float(f) => f,
        }
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Value {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Value {
        Value::Float(f)
    }
}

/// A `(unix seconds, value)` pair, serialized as a two element array
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point(pub i64, pub Value);

impl Point {
    pub fn timestamp(&self) -> i64 {
        self.0
    }

    pub fn value(&self) -> Value {
        self.1
    }
}

/// The Datadog metric type of a series
///
/// Only `counter` and `gauge` are ever sent. Every derived statistic goes
/// out as a `counter`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Counter,
    Gauge,
}

impl Kind {
    pub fn as_str(&self) -> &'static str {
        match *self {
            Kind::Counter => "counter",
            Kind::Gauge => "gauge",
        }
    }
}

/// One named, timestamped data point
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub metric: String,
    pub points: Vec<Point>,
    #[serde(rename = "type")]
    pub kind: Kind,
    pub host: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl Series {
    /// Create a single-point series
    pub fn new<S, V>(
        metric: S,
        kind: Kind,
        timestamp: i64,
        value: V,
        host: &str,
        tags: &[String],
    ) -> Series
    where
        S: Into<String>,
        V: Into<Value>,
    {
        Series {
            metric: metric.into(),
            points: vec![Point(timestamp, value.into())],
            kind: kind,
            host: host.to_string(),
            tags: tags.to_vec(),
        }
    }
}

/// The request body for a batch of series
#[derive(Debug, Serialize)]
pub struct SeriesMessage<'a> {
    pub series: &'a [Series],
}

/// Serialize a batch of series into a request body
pub fn to_body(series: &[Series]) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(&SeriesMessage { series: series })
}
