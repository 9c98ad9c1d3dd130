//! Order book snapshot pipeline.
//!
//! This crate provides:
//! - Data quality validation
//! - Event reporting and the per-stock data report
//! - CSV output
//! - The sequential per-stock runner
//! - A placeholder prediction model over a directory of test files

pub mod validation;
pub mod report;
pub mod writer;
pub mod runner;
pub mod predictor;

pub use validation::{Severity, ValidationIssue, ValidationReport, Validator};
pub use report::{DataReport, MemoryReporter, PipelineEvent, Reporter, StockSummary, TracingReporter};
pub use writer::{write_csv, write_report, write_table};
pub use runner::{Pipeline, PipelineOutcome};
pub use predictor::{predict_directory, BaselineModel, Model, PredictedFile};
