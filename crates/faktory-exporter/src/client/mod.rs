//! Upstream status source.
//!
//! The collector only sees [`StatusSource`]; [`FaktoryClient`] is the real
//! implementation speaking Faktory's wire protocol over TCP.

pub mod faktory;
pub mod resp;
pub mod url;

use async_trait::async_trait;

use faktory_exporter_core::{Result, StatusDocument};

pub use faktory::{hash_password, FaktoryClient};
pub use url::ConnectionUrl;

/// Something that can produce a fresh status document on demand.
#[async_trait]
pub trait StatusSource: Send {
    /// Fetch the current status. Failures are reported as
    /// `ExporterError::Fetch`.
    async fn fetch_status(&mut self) -> Result<StatusDocument>;
}
