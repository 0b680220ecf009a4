use std::time::Duration;

use serde::Deserialize;
use faktory_exporter_core::{ExporterError, Result};

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExporterConfig {
    #[serde(default)]
    pub faktory: FaktorySection,

    #[serde(default)]
    pub web: WebSection,
}

impl ExporterConfig {
    pub fn validate(&self) -> Result<()> {
        self.faktory.validate()?;
        self.web.validate()?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FaktorySection {
    /// `tcp://[:password@]host[:port]`. Parsed when the client is built.
    #[serde(default = "default_url")]
    pub url: String,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for FaktorySection {
    fn default() -> Self {
        Self {
            url: default_url(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl FaktorySection {
    pub fn validate(&self) -> Result<()> {
        if !(100..=60000).contains(&self.timeout_ms) {
            return Err(ExporterError::Config(
                "faktory.timeout_ms must be between 100 and 60000".into(),
            ));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WebSection {
    #[serde(default = "default_listen_address")]
    pub listen_address: String,

    #[serde(default = "default_telemetry_path")]
    pub telemetry_path: String,
}

impl Default for WebSection {
    fn default() -> Self {
        Self {
            listen_address: default_listen_address(),
            telemetry_path: default_telemetry_path(),
        }
    }
}

impl WebSection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr()?;
        if !self.telemetry_path.starts_with('/') {
            return Err(ExporterError::Config(
                "web.telemetry_path must start with '/'".into(),
            ));
        }
        if self.telemetry_path == "/" || self.telemetry_path == "/healthz" {
            return Err(ExporterError::Config(format!(
                "web.telemetry_path {:?} is reserved",
                self.telemetry_path
            )));
        }
        if self.telemetry_path.contains([':', '*', '{', '}']) {
            return Err(ExporterError::Config(
                "web.telemetry_path must be a literal path".into(),
            ));
        }
        Ok(())
    }

    /// `host:port` to bind; the host is resolved by the listener. A bare
    /// `:port` binds every interface.
    pub fn listen_addr(&self) -> Result<String> {
        let bad = || {
            ExporterError::Config(format!(
                "web.listen_address {:?} is not host:port or :port",
                self.listen_address
            ))
        };

        let (host, port) = self.listen_address.rsplit_once(':').ok_or_else(bad)?;
        port.parse::<u16>().map_err(|_| bad())?;

        let bracketed = host.starts_with('[') && host.ends_with(']') && host.len() > 2;
        if !bracketed && host.contains([':', '[', ']']) {
            return Err(bad());
        }
        if host.contains(char::is_whitespace) {
            return Err(bad());
        }

        let host = if host.is_empty() { "0.0.0.0" } else { host };
        Ok(format!("{host}:{port}"))
    }
}

fn default_url() -> String {
    "tcp://localhost:7419".into()
}
fn default_timeout_ms() -> u64 {
    5000
}
fn default_listen_address() -> String {
    ":9386".into()
}
fn default_telemetry_path() -> String {
    "/metrics".into()
}
