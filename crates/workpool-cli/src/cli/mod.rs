//! Building blocks of the `workpool` binary.
//!
//! - [`config`] - CLI/environment parsing into a validated [`config::DemoConfig`].
//! - [`demo`] - The scenarios run against the pool.
//! - [`telemetry`] - Console logging setup.

pub mod config;
pub mod demo;
pub mod telemetry;
