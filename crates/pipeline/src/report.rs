//! Pipeline events, the reporting interface and the per-stock data report.
//!
//! Stages never print. They return what happened, and the runner forwards
//! it to a [`Reporter`].

use crate::validation::{Severity, ValidationReport};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use lob_core::frame::f64_values;
use lob_core::schema::{RETURN_5MIN, TIME};
use lob_core::DataFrame;
use lob_features::FeatureSummary;
use lob_ingestion::{CleanStats, LoadEvent};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{error, info, warn};

/// Something worth reporting during a run.
#[derive(Debug, Clone)]
pub enum PipelineEvent {
    /// Outcome of one `(day, stock)` file.
    Load(LoadEvent),
    /// A stock's day files were concatenated.
    Merged { stock: String, rows: usize },
    /// A stock's table was cleaned.
    Cleaned { stock: String, stats: CleanStats },
    /// Features were appended to a stock's table.
    Features { stock: String, summary: FeatureSummary },
    /// A stock's table was validated.
    Validated(ValidationReport),
    /// The per-stock summary.
    Report(DataReport),
    /// A file was written.
    Saved { stock: Option<String>, path: PathBuf },
}

/// Receives pipeline events.
pub trait Reporter {
    fn report(&mut self, event: &PipelineEvent);
}

/// Reporter that emits `tracing` events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&mut self, event: &PipelineEvent) {
        match event {
            PipelineEvent::Load(LoadEvent::Loaded { day, stock, rows, .. }) => {
                info!(day, stock = %stock, rows, "loaded day file");
            }
            PipelineEvent::Load(LoadEvent::Missing { path, .. }) => {
                warn!(path = %path.display(), "file does not exist");
            }
            PipelineEvent::Load(LoadEvent::Failed { path, reason, .. }) => {
                error!(path = %path.display(), reason = %reason, "failed to load file");
            }
            PipelineEvent::Merged { stock, rows } if *rows == 0 => {
                warn!(stock = %stock, "no data");
            }
            PipelineEvent::Merged { stock, rows } => {
                info!(stock = %stock, rows, "merged day files");
            }
            PipelineEvent::Cleaned { stock, stats } => {
                if stats.missing_cells > 0 {
                    info!(stock = %stock, missing = stats.missing_cells, dropped = stats.rows_dropped, "filled missing values");
                }
                info!(stock = %stock, rows = stats.rows_out, "cleaned");
            }
            PipelineEvent::Features { stock, summary } => {
                for (name, reason) in &summary.skipped {
                    warn!(stock = %stock, feature = %name, reason = ?reason, "feature skipped");
                }
                info!(stock = %stock, added = summary.added.len(), "features computed");
            }
            PipelineEvent::Validated(report) => {
                for issue in &report.issues {
                    match issue.severity() {
                        Severity::Error => error!(stock = %report.stock, "{issue}"),
                        Severity::Warning => warn!(stock = %report.stock, "{issue}"),
                    }
                }
                if report.passed() {
                    info!(stock = %report.stock, "data quality check passed");
                }
            }
            PipelineEvent::Report(report) => {
                info!("data quality report ({} stocks)", report.stocks.len());
                for s in &report.stocks {
                    info!(
                        stock = %s.stock,
                        rows = s.rows,
                        columns = s.columns,
                        time_min = ?s.time_min,
                        time_max = ?s.time_max,
                        valid_returns = ?s.valid_returns,
                        "stock summary"
                    );
                }
            }
            PipelineEvent::Saved { path, .. } => {
                info!(path = %path.display(), "saved");
            }
        }
    }
}

/// Reporter that keeps every event, for tests and embedding.
#[derive(Debug, Default, Clone)]
pub struct MemoryReporter {
    pub events: Vec<PipelineEvent>,
}

impl Reporter for MemoryReporter {
    fn report(&mut self, event: &PipelineEvent) {
        self.events.push(event.clone());
    }
}

/// Summary line for one non-empty stock.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockSummary {
    pub stock: String,
    pub rows: usize,
    pub columns: usize,
    pub time_min: Option<f64>,
    pub time_max: Option<f64>,
    /// Non-missing `Return5min` cells, `None` without that column.
    pub valid_returns: Option<usize>,
}

impl StockSummary {
    pub fn from_frame(stock: &str, df: &DataFrame) -> Self {
        let times: Vec<f64> = f64_values(df, TIME)
            .map(|values| values.into_iter().flatten().collect())
            .unwrap_or_default();
        Self {
            stock: stock.to_string(),
            rows: df.height(),
            columns: df.width(),
            time_min: times.iter().copied().reduce(f64::min),
            time_max: times.iter().copied().reduce(f64::max),
            valid_returns: df
                .column(RETURN_5MIN)
                .ok()
                .map(|c| c.len() - c.null_count()),
        }
    }
}

/// Per-stock summary of a run.
#[derive(Debug, Clone, Serialize)]
pub struct DataReport {
    pub generated_at: DateTime<Utc>,
    pub stocks: Vec<StockSummary>,
}

impl DataReport {
    /// Summaries for every stock with a non-empty frame, in map order.
    pub fn build(tables: &IndexMap<String, DataFrame>) -> Self {
        Self {
            generated_at: Utc::now(),
            stocks: tables
                .iter()
                .filter(|(_, df)| df.height() > 0)
                .map(|(stock, df)| StockSummary::from_frame(stock, df))
                .collect(),
        }
    }
}
