//! Faktory `INFO` payload: the raw document and its typed projection.
//!
//! - [`StatusDocument`]: whatever JSON object the server sent, unvalidated.
//! - [`Stats`]: the fixed set of numbers the exporter publishes.
//! - [`decode`]: all-or-nothing validation from one to the other.

pub mod decode;
pub mod document;

pub use decode::{decode, Stats};
pub use document::StatusDocument;
