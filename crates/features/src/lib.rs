//! Feature computation for the order book pipeline.
//!
//! This crate handles:
//! - Top-of-book price features (mid price, spread, spread ratio)
//! - Depth aggregation and order imbalance
//!
//! Every feature is row-local.

pub mod price;
pub mod imbalance;
pub mod engine;

pub use engine::{FeatureEngine, FeatureSummary, SkipReason, FEATURE_COLUMNS};
