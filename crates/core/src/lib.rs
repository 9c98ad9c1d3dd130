//! Core types and configuration for the order book pipeline.
//!
//! This crate provides shared types used across all other crates:
//! - Data frame helpers for snapshot tables
//! - The snapshot schema and its cast policy
//! - Configuration structures
//! - Common error types

pub mod config;
pub mod error;
pub mod frame;
pub mod schema;

pub use config::Config;
pub use error::{Error, Result};
pub use polars::prelude::DataFrame;
pub use schema::CastPolicy;
