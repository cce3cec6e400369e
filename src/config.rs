//! Provides the CLI option parser
//!
//! Used to parse the argv/config file into a struct that
//! the reporter can consume and use as configuration data.

use clap::{App, Arg};
use sink::DatadogConfig;
use std::env;
use std::error;
use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use toml;

const VERSION: Option<&'static str> = option_env!("CARGO_PKG_VERSION");

/// Upper bound, in seconds, for `interval` and `timeout`.
pub const MAX_SECONDS: u64 = 86_400;

fn default_version() -> String {
    VERSION.unwrap_or("unknown").to_string()
}

/// Configuration errors
#[derive(Debug)]
pub enum Error {
    /// The configuration file could not be read.
    Io(io::Error),
    /// The configuration file is not valid TOML.
    Toml(toml::de::Error),
    /// The configuration file is valid TOML but not a valid configuration.
    Invalid(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::Io(ref e) => write!(f, "could not read config file: {}", e),
            Error::Toml(ref e) => write!(f, "could not parse config file: {}", e),
            Error::Invalid(ref msg) => write!(f, "invalid config: {}", msg),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            Error::Io(ref e) => Some(e),
            Error::Toml(ref e) => Some(e),
            Error::Invalid(_) => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Error {
        Error::Io(e)
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Error {
        Error::Toml(e)
    }
}

fn invalid<S: Into<String>>(msg: S) -> Error {
    Error::Invalid(msg.into())
}

/// Configuration struct for the reporter executable
///
/// This struct is what we construct from parsing the configuration. It is
/// not intended to be created by external clients. Please see documentation
/// on `parse_args` in this module for more details.
#[derive(Debug)]
pub struct Args {
    /// The host identity stamped on every series.
    pub host: String,
    /// Seconds between report cycles.
    pub interval: u64,
    /// Tags appended to every series.
    pub tags: Vec<String>,
    /// Prefix for the reporter's own metrics. The daemon's registry holds
    /// nothing else, so these can not be turned off.
    pub self_telemetry: String,
    /// The verbosity setting. The higher the value the more chatty the
    /// reporter gets.
    pub verbose: u64,
    /// Version string. This is set automatically.
    pub version: String,
    /// See `sink::Datadog` for more.
    pub datadog: Option<DatadogConfig>,
    /// Print series to stdout instead. See `sink::Console`.
    pub console: bool,
}

impl Default for Args {
    fn default() -> Self {
        Args {
            host: "localhost".to_string(),
            interval: 10,
            tags: Vec::new(),
            self_telemetry: "datadog_reporter".to_string(),
            verbose: 0,
            version: default_version(),
            datadog: None,
            console: false,
        }
    }
}

/// Parse the reporter configuration arguments
///
/// This function will read the environment arguments and construct an
/// `Args`. Most configuration is stored in an on-disk file. See
/// `datadog-reporter --help` for more information.
pub fn parse_args() -> Result<Args, Error> {
    let args = App::new("datadog-reporter")
        .version(VERSION.unwrap_or("unknown"))
        .about("ship the reporter's own telemetry to Datadog as series")
        .arg(
            Arg::with_name("config-file")
                .long("config")
                .short("C")
                .value_name("config")
                .required(true)
                .help("The config file to feed in.")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .multiple(true)
                .help("Turn on verbose output."),
        )
        .get_matches();

    let verb = args.occurrences_of("verbose");

    match args.value_of("config-file") {
        Some(filename) => {
            let mut fp = File::open(filename)?;
            let mut buffer = String::new();
            fp.read_to_string(&mut buffer)?;
            parse_config_file(&buffer, verb)
        }
        None => Err(invalid("no config file given")),
    }
}

/// Read a string that may be given inline or pulled from the environment
///
/// Accepts either `key = "value"` or
/// `key = { environment = true, value = "ENV_VAR" }`.
fn string_or_env(value: &toml::Value, key: &str) -> Result<String, Error> {
    if let Some(s) = value.as_str() {
        return Ok(s.to_string());
    }
    let tbl = match value.as_table() {
        Some(tbl) => tbl,
        None => return Err(invalid(format!("{} must be a string or a table", key))),
    };
    let from_env = tbl.get("environment")
        .and_then(|ev| ev.as_bool())
        .unwrap_or(false);
    if !from_env {
        return Err(invalid(format!(
            "{} table must have environment / value keys",
            key
        )));
    }
    let env_key = tbl.get("value")
        .and_then(|v| v.as_str())
        .ok_or_else(|| invalid(format!("{}.value must be a string", key)))?;
    env::var_os(env_key)
        .ok_or_else(|| invalid(format!("{} could not be read from ${}", key, env_key)))?
        .into_string()
        .map_err(|_| invalid(format!("${} is not valid unicode", env_key)))
}

/// Read a number of seconds in `1..=MAX_SECONDS`
fn positive_integer(value: &toml::Value, key: &str) -> Result<u64, Error> {
    match value.as_integer() {
        Some(i) if i > 0 && i as u64 <= MAX_SECONDS => Ok(i as u64),
        Some(i) if i > 0 => Err(invalid(format!(
            "{} must be at most {} seconds, got {}",
            key, MAX_SECONDS, i
        ))),
        _ => Err(invalid(format!("{} must be a positive integer", key))),
    }
}

fn string_array(value: &toml::Value, key: &str) -> Result<Vec<String>, Error> {
    let arr = value
        .as_array()
        .ok_or_else(|| invalid(format!("{} must be an array", key)))?;
    arr.iter()
        .map(|v| {
            v.as_str()
                .map(|s| s.to_string())
                .ok_or_else(|| invalid(format!("{} must contain only strings", key)))
        })
        .collect()
}

fn parse_datadog(snk: &toml::Value) -> Result<DatadogConfig, Error> {
    let mut res = DatadogConfig::default();

    res.api_key = match snk.get("api-key") {
        Some(key) => string_or_env(key, "sinks.datadog.api-key")?,
        None => return Err(invalid("sinks.datadog.api-key is required")),
    };
    if res.api_key.is_empty() {
        return Err(invalid("sinks.datadog.api-key can not be empty"));
    }

    if let Some(ep) = snk.get("endpoint") {
        res.endpoint = ep.as_str()
            .ok_or_else(|| invalid("sinks.datadog.endpoint must be a string"))?
            .to_string();
    }

    if let Some(to) = snk.get("timeout") {
        res.timeout = positive_integer(to, "sinks.datadog.timeout")?;
    }

    Ok(res)
}

/// Parse the reporter configuration file.
///
/// The file must configure exactly one sink, either `[sinks.datadog]` or
/// `[sinks.console]`.
pub fn parse_config_file(buffer: &str, verbosity: u64) -> Result<Args, Error> {
    let mut args = Args::default();
    let value: toml::Value = toml::from_str(buffer)?;

    args.verbose = verbosity;

    if let Some(host) = value.get("host") {
        args.host = string_or_env(host, "host")?;
    }

    if let Some(fi) = value.get("interval") {
        args.interval = positive_integer(fi, "interval")?;
    }

    if let Some(tags) = value.get("tags") {
        args.tags = string_array(tags, "tags")?;
    }

    if let Some(st) = value.get("self-telemetry") {
        args.self_telemetry = match st.as_bool() {
            Some(false) => {
                return Err(invalid(
                    "self-telemetry can not be disabled, it is all the reporter ships",
                ))
            }
            Some(true) => args.self_telemetry,
            None => st.as_str()
                .ok_or_else(|| invalid("self-telemetry must be true or a string"))?
                .to_string(),
        };
    }

    // sinks
    //
    if let Some(sinks) = value.get("sinks") {
        let sinks = sinks
            .as_table()
            .ok_or_else(|| invalid("sinks must be in table format"))?;

        args.console = sinks.contains_key("console");

        args.datadog = match sinks.get("datadog") {
            Some(snk) => Some(parse_datadog(snk)?),
            None => None,
        };
    }

    match (args.datadog.is_some(), args.console) {
        (true, true) => Err(invalid("only one sink may be configured")),
        (false, false) => Err(invalid("no sink configured")),
        _ => Ok(args),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::env;

    #[test]
    fn config_file_datadog() {
        let config = r#"
host = "i-0abc"
interval = 15
tags = ["env:prod", "region:us"]

[sinks.datadog]
api-key = "secret"
timeout = 5
"#;
        let args = parse_config_file(config, 4).unwrap();
        assert_eq!("i-0abc", args.host);
        assert_eq!(15, args.interval);
        assert_eq!(vec!["env:prod", "region:us"], args.tags);
        assert_eq!(4, args.verbose);
        assert_eq!("datadog_reporter", args.self_telemetry);
        assert!(!args.console);
        let dd = args.datadog.unwrap();
        assert_eq!("secret", dd.api_key);
        assert_eq!("https://app.datadoghq.com/api", dd.endpoint);
        assert_eq!(5, dd.timeout);
    }

    #[test]
    fn config_file_defaults() {
        let args = parse_config_file("[sinks.console]\n", 0).unwrap();
        assert_eq!("localhost", args.host);
        assert_eq!(10, args.interval);
        assert!(args.tags.is_empty());
        assert!(args.datadog.is_none());
        assert!(args.console);
    }

    #[test]
    fn config_file_api_key_from_environment() {
        env::set_var("DATADOG_METRICS_TEST_API_KEY", "from-env");
        let config = r#"
[sinks.datadog]
api-key = { environment = true, value = "DATADOG_METRICS_TEST_API_KEY" }
endpoint = "http://127.0.0.1:9999/api"
"#;
        let dd = parse_config_file(config, 0).unwrap().datadog.unwrap();
        assert_eq!("from-env", dd.api_key);
        assert_eq!("http://127.0.0.1:9999/api", dd.endpoint);
    }

    #[test]
    fn config_file_missing_environment() {
        let config = r#"
[sinks.datadog]
api-key = { environment = true, value = "DATADOG_METRICS_TEST_UNSET_VARIABLE" }
"#;
        match parse_config_file(config, 0) {
            Err(Error::Invalid(_)) => {}
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn config_file_self_telemetry() {
        let on = parse_config_file("self-telemetry = true\n[sinks.console]\n", 0).unwrap();
        assert_eq!("datadog_reporter", on.self_telemetry);
        let named = parse_config_file("self-telemetry = \"svc\"\n[sinks.console]\n", 0).unwrap();
        assert_eq!("svc", named.self_telemetry);
        match parse_config_file("self-telemetry = false\n[sinks.console]\n", 0) {
            Err(Error::Invalid(_)) => {}
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn config_file_rejects_bad_input() {
        let cases = [
            "",
            "[sinks.console]\n[sinks.datadog]\napi-key = \"k\"\n",
            "interval = 0\n[sinks.console]\n",
            "interval = 86401\n[sinks.console]\n",
            "interval = 9223372036854775807\n[sinks.console]\n",
            "[sinks.datadog]\napi-key = \"k\"\ntimeout = 9223372036854775807\n",
            "interval = \"ten\"\n[sinks.console]\n",
            "tags = [1, 2]\n[sinks.console]\n",
            "[sinks.datadog]\n",
            "[sinks.datadog]\napi-key = \"\"\n",
        ];
        for case in &cases {
            match parse_config_file(case, 0) {
                Err(Error::Invalid(_)) => {}
                other => panic!("{:?} gave {:?}", case, other),
            }
        }
    }

    #[test]
    fn config_file_accepts_longest_interval() {
        let config = format!("interval = {}\n[sinks.console]\n", MAX_SECONDS);
        let args = parse_config_file(&config, 0).unwrap();
        assert_eq!(MAX_SECONDS, args.interval);
    }

    #[test]
    fn config_file_not_toml() {
        match parse_config_file("host = ", 0) {
            Err(Error::Toml(_)) => {}
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
