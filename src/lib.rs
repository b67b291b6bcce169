//! Symlinker - configure, create and track filesystem links
//!
//! This library provides the link configuration store and the host it
//! talks to: a link engine over the local filesystem and a JSON ledger of
//! the links created.
//!
//! # Features
//! - **cli**: Command-line front end (default)
//!
//! # Architecture
//! - `link`: Link types, the draft configuration and the store
//! - `host`: Host boundary, link engine, record repository, dialogs
//! - `interfaces`: User interfaces (CLI)
//! - `config`: Configuration management
//! - `system`: Logging setup

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod errors;
pub mod host;
pub mod interfaces;
pub mod link;
pub mod system;
pub mod utils;
