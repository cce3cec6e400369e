use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use series::{self, Series};
use sink::{Error, Sink};
use std::time::Duration;

/// The Datadog API root used when none is configured.
pub const DEFAULT_ENDPOINT: &'static str = "https://app.datadoghq.com/api";
/// Path of the series intake, relative to the API root.
pub const SERIES_PATH: &'static str = "/v1/series";

/// Datadog sink
///
/// POSTs each batch of series to the Datadog series API, authenticated by
/// API key. A 200 or 202 response is success; anything else is an error.
pub struct Datadog {
    api_key: String,
    endpoint: String,
    client: Client,
}

/// Configuration for the `Datadog` sink
#[derive(Debug, Clone)]
pub struct DatadogConfig {
    /// The Datadog API key.
    pub api_key: String,
    /// API root, without a trailing slash.
    pub endpoint: String,
    /// Request timeout, in seconds.
    pub timeout: u64,
}

impl Default for DatadogConfig {
    fn default() -> DatadogConfig {
        DatadogConfig {
            api_key: String::new(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: 30,
        }
    }
}

impl Datadog {
    /// Create a new `Datadog` sink
    pub fn new(config: DatadogConfig) -> Result<Datadog, Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()?;
        Ok(Datadog {
            api_key: config.api_key,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            client: client,
        })
    }

    /// The authenticated URL series are POSTed to, for instance
    /// `https://app.datadoghq.com/api/v1/series?api_key=9775a026f1ca7d1...`
    pub fn series_url(&self) -> String {
        let mut url =
            String::with_capacity(self.endpoint.len() + SERIES_PATH.len() + 9 + self.api_key.len());
        url.push_str(&self.endpoint);
        url.push_str(SERIES_PATH);
        url.push_str("?api_key=");
        url.push_str(&self.api_key);
        url
    }

    /// The request body for a batch of series
    pub fn series_body(&self, series: &[Series]) -> Result<Vec<u8>, Error> {
        Ok(series::to_body(series)?)
    }
}

impl Sink for Datadog {
    fn post_series(&mut self, series: &[Series]) -> Result<(), Error> {
        let body = self.series_body(series)?;
        debug!("posting {} series in {} bytes", series.len(), body.len());
        let resp = self.client
            .post(self.series_url())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()?;
        let status = resp.status();
        match status.as_u16() {
            200 | 202 => Ok(()),
            code => Err(Error::BadResponse(
                code,
                status.canonical_reason().unwrap_or("").to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod test {
    use series::Kind;
    use super::*;

    #[test]
    fn test_series_endpoint() {
        let mut config = DatadogConfig::default();
        config.api_key = "secret".to_string();
        let dd = Datadog::new(config).unwrap();
        assert_eq!(
            "https://app.datadoghq.com/api/v1/series?api_key=secret",
            dd.series_url()
        );
    }

    #[test]
    fn test_series_endpoint_trailing_slash() {
        let config = DatadogConfig {
            api_key: "k".to_string(),
            endpoint: "http://127.0.0.1:8125/api/".to_string(),
            timeout: 1,
        };
        let dd = Datadog::new(config).unwrap();
        assert_eq!("http://127.0.0.1:8125/api/v1/series?api_key=k", dd.series_url());
    }

    #[test]
    fn test_series_body_wraps_batch() {
        let mut config = DatadogConfig::default();
        config.api_key = "k".to_string();
        let dd = Datadog::new(config).unwrap();
        let batch = vec![Series::new("a.count", Kind::Counter, 5, 1i64, "h", &[])];
        let body = String::from_utf8(dd.series_body(&batch).unwrap()).unwrap();
        assert_eq!(
            r#"{"series":[{"metric":"a.count","points":[[5,1]],"type":"counter","host":"h"}]}"#,
            body
        );
    }
}
