//! faktory-exporter core: the status document model, its validating decoder,
//! and the error surface shared by the exporter.
//!
//! This crate carries no network or runtime dependencies. It only knows how
//! to turn the untyped `INFO` payload of a Faktory server into a typed
//! [`Stats`] record, and how scrape failures are classified.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here. A malformed
//! upstream payload must surface as a [`DecodeError`], never as a crash of
//! the exporter process.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod status;

pub use error::{DecodeError, ErrorCode, ExporterError, Result};
pub use status::{decode, Stats, StatusDocument};
