//! Command-line flags. Flag names follow the Prometheus exporter convention
//! (`--web.listen-address`, ...). Unset flags fall back to the config file,
//! then to built-in defaults.

use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(
    name = "faktory_exporter",
    version,
    about = "Prometheus exporter for Faktory job servers"
)]
pub struct Cli {
    /// Optional YAML config file.
    #[arg(long = "config.file")]
    pub config_file: Option<PathBuf>,

    /// URL of the faktory instance [default: tcp://localhost:7419].
    #[arg(long = "faktory.url")]
    pub faktory_url: Option<String>,

    /// Network timeout for the faktory connection, in milliseconds [default: 5000].
    #[arg(long = "faktory.timeout-ms")]
    pub faktory_timeout_ms: Option<u64>,

    /// Address on which to expose metrics and web interface [default: :9386].
    #[arg(long = "web.listen-address")]
    pub listen_address: Option<String>,

    /// Path under which to expose metrics [default: /metrics].
    #[arg(long = "web.telemetry-path")]
    pub telemetry_path: Option<String>,

    /// Log filter used when RUST_LOG is not set.
    #[arg(long = "log.level", default_value = "info")]
    pub log_level: String,
}
