//! Exporter config loader (strict parsing).
//!
//! Layering: built-in defaults, then the optional YAML file, then CLI flags.

pub mod cli;
pub mod schema;

use std::fs;
use std::path::Path;

use faktory_exporter_core::{ExporterError, Result};

pub use cli::Cli;
pub use schema::{ExporterConfig, FaktorySection, WebSection};

pub fn load_from_file(path: &Path) -> Result<ExporterConfig> {
    let cfg = parse_file(path)?;
    cfg.validate()?;
    Ok(cfg)
}

pub fn load_from_str(s: &str) -> Result<ExporterConfig> {
    let cfg = parse_str(s)?;
    cfg.validate()?;
    Ok(cfg)
}

fn parse_file(path: &Path) -> Result<ExporterConfig> {
    let s = fs::read_to_string(path).map_err(|e| {
        ExporterError::Config(format!("read config {} failed: {e}", path.display()))
    })?;
    parse_str(&s)
}

fn parse_str(s: &str) -> Result<ExporterConfig> {
    serde_yaml::from_str(s).map_err(|e| ExporterError::Config(format!("invalid yaml: {e}")))
}

/// Build the effective config from flags (and the file they point at).
/// Validation runs once, on the merged result.
pub fn resolve(cli: &Cli) -> Result<ExporterConfig> {
    let mut cfg = match &cli.config_file {
        Some(path) => parse_file(path)?,
        None => ExporterConfig::default(),
    };

    if let Some(url) = &cli.faktory_url {
        cfg.faktory.url = url.clone();
    }
    if let Some(ms) = cli.faktory_timeout_ms {
        cfg.faktory.timeout_ms = ms;
    }
    if let Some(addr) = &cli.listen_address {
        cfg.web.listen_address = addr.clone();
    }
    if let Some(path) = &cli.telemetry_path {
        cfg.web.telemetry_path = path.clone();
    }

    cfg.validate()?;
    Ok(cfg)
}
