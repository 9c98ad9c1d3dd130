//! Data ingestion and normalization for the order book pipeline.
//!
//! This crate handles:
//! - CSV reading with whole-file schema inference
//! - Per-day, per-stock file loading and concatenation
//! - Cleaning (time ordering, missing-value fill, schema casts)

pub mod reader;
pub mod loader;
pub mod cleaner;

pub use reader::read_csv;
pub use loader::{get_stock, merge_days, LoadEvent, LoadOutcome, Loader, StockTables};
pub use cleaner::{CleanStats, Cleaner};
