use chrono;
use series::{Series, Value};
use sink::{Error, Sink};
use std::io::{self, Write};

/// Console sink
///
/// Writes every series it is handed as one line of text. Handy for
/// checking what a reporter would send without an API key.
pub struct Console {
    out: Box<dyn Write + Send>,
}

impl Console {
    /// Create a new `Console` printing to stdout
    pub fn new() -> Console {
        Console::with_writer(io::stdout())
    }

    /// Create a new `Console` printing to `out`
    pub fn with_writer<W>(out: W) -> Console
    where
        W: Write + Send + 'static,
    {
        Console { out: Box::new(out) }
    }
}

/// Format a single series line.
fn fmt_line(series: &Series, s: &mut String) {
    s.push_str("    ");
    s.push_str(&series.metric);
    s.push_str(" ");
    s.push_str(series.kind.as_str());
    for point in &series.points {
        s.push_str(" ");
        s.push_str(&point.timestamp().to_string());
        s.push_str("=");
        match point.value() {
            Value::Int(i) => s.push_str(&i.to_string()),
            Value::Float(f) => s.push_str(&f.to_string()),
        }
    }
    s.push_str(" host=");
    s.push_str(&series.host);
    if !series.tags.is_empty() {
        s.push_str(" tags=");
        s.push_str(&series.tags.join(","));
    }
    s.push_str("\n");
}

impl Sink for Console {
    fn post_series(&mut self, series: &[Series]) -> Result<(), Error> {
        let now = chrono::Utc::now();
        let mut buf = String::with_capacity(128 * (series.len() + 1));
        buf.push_str("Flushing series: ");
        buf.push_str(&now.to_rfc3339());
        buf.push_str("\n");
        for s in series {
            fmt_line(s, &mut buf);
        }
        if let Err(e) = self.out.write_all(buf.as_bytes()) {
            warn!("console sink could not write: {}", e);
        }
        Ok(())
    }
}
