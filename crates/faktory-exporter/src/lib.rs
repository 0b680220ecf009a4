//! Faktory exporter library entry.
//!
//! This crate wires the Faktory client, the scrape collector, and the HTTP
//! surface together. It is consumed by the binary (`main.rs`) and by
//! integration tests.

pub mod app_state;
pub mod client;
pub mod collector;
pub mod config;
pub mod obs;
pub mod ops;
pub mod router;
