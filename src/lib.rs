//! Core library for the `hammer` CLI.
//!
//! `hammer` sends requests to one URL at an adjustable rate from an
//! adjustable number of workers and shows what came back over a sliding
//! window. The library exposes the engine (rate controller, worker pool,
//! window aggregator and controller), the request executors, CLI and config
//! types, and the dashboard. The primary user-facing interface is the
//! `hammer` binary; library APIs may change with it.
pub mod args;
pub mod config;
pub mod engine;
pub mod error;
pub mod executor;
pub mod shutdown;
pub mod ui;

#[cfg(feature = "fuzzing")]
pub mod fuzzing;
