//! Data quality checks on a processed table.
//!
//! Only an empty table or an absent required column fails validation.
//! Unsorted time and missing values are warnings.

use lob_core::config::ValidationConfig;
use lob_core::frame::{f64_values, has_column};
use lob_core::schema::TIME;
use lob_core::DataFrame;
use serde::Serialize;
use std::fmt;

/// How serious an issue is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
    Warning,
    Error,
}

/// A single quality finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ValidationIssue {
    /// The table has no rows.
    Empty,
    /// A required column is absent.
    MissingColumn(String),
    /// `Time` decreases at `row` (compared with `row - 1`).
    UnsortedTime { row: usize },
    /// Missing cells across the required columns.
    MissingValues { count: usize },
}

impl ValidationIssue {
    pub fn severity(&self) -> Severity {
        match self {
            ValidationIssue::Empty | ValidationIssue::MissingColumn(_) => Severity::Error,
            ValidationIssue::UnsortedTime { .. } | ValidationIssue::MissingValues { .. } => {
                Severity::Warning
            }
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::Empty => write!(f, "table is empty"),
            ValidationIssue::MissingColumn(name) => write!(f, "missing required column {name}"),
            ValidationIssue::UnsortedTime { row } => write!(f, "Time decreases at row {row}"),
            ValidationIssue::MissingValues { count } => {
                write!(f, "{count} missing values in required columns")
            }
        }
    }
}

/// Outcome of validating one stock's table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub stock: String,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    /// False only when an error-severity issue was found.
    pub fn passed(&self) -> bool {
        !self.issues.iter().any(|i| i.severity() == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.severity() == Severity::Warning)
    }
}

/// Checks required columns, time ordering and missing values.
#[derive(Debug, Clone)]
pub struct Validator {
    required_columns: Vec<String>,
}

impl Validator {
    pub fn new(config: &ValidationConfig) -> Self {
        Self {
            required_columns: config.required_columns.clone(),
        }
    }

    pub fn validate(&self, df: &DataFrame, stock: &str) -> ValidationReport {
        let mut report = ValidationReport {
            stock: stock.to_string(),
            issues: Vec::new(),
        };

        if df.height() == 0 {
            report.issues.push(ValidationIssue::Empty);
            return report;
        }

        for name in &self.required_columns {
            if !has_column(df, name) {
                report.issues.push(ValidationIssue::MissingColumn(name.clone()));
            }
        }
        if !report.issues.is_empty() {
            return report;
        }

        if let Some(row) = first_time_decrease(df) {
            report.issues.push(ValidationIssue::UnsortedTime { row });
        }

        let missing: usize = self
            .required_columns
            .iter()
            .filter_map(|name| df.column(name).ok())
            .map(|c| c.null_count())
            .sum();
        if missing > 0 {
            report.issues.push(ValidationIssue::MissingValues { count: missing });
        }

        report
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(&ValidationConfig::default())
    }
}

/// First row whose `Time` is smaller than the previous present value.
fn first_time_decrease(df: &DataFrame) -> Option<usize> {
    let times = f64_values(df, TIME).ok()?;
    let mut prev: Option<f64> = None;
    for (row, t) in times.into_iter().enumerate() {
        let Some(t) = t else { continue };
        if prev.is_some_and(|p| t < p) {
            return Some(row);
        }
        prev = Some(t);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    fn frame(times: &[i64]) -> DataFrame {
        df!(
            "Time" => times,
            "LastPrice" => vec![100i64; times.len()]
        )
        .unwrap()
    }

    #[test]
    fn test_clean_frame_passes() {
        let report = Validator::default().validate(&frame(&[1, 2, 2, 3]), "A");
        assert!(report.passed());
        assert!(report.issues.is_empty());
    }

    #[test]
    fn test_empty_fails() {
        let report = Validator::default().validate(&DataFrame::default(), "B");
        assert!(!report.passed());
        assert_eq!(report.issues, vec![ValidationIssue::Empty]);
    }

    #[test]
    fn test_missing_required_column_fails() {
        let df = df!("Time" => [1i64]).unwrap();
        let report = Validator::default().validate(&df, "C");
        assert!(!report.passed());
        assert_eq!(report.issues, vec![ValidationIssue::MissingColumn("LastPrice".into())]);
    }

    #[test]
    fn test_unsorted_time_is_only_a_warning() {
        let report = Validator::default().validate(&frame(&[1, 3, 2]), "D");
        assert!(report.passed());
        assert_eq!(report.issues, vec![ValidationIssue::UnsortedTime { row: 2 }]);
        assert_eq!(report.warnings().count(), 1);
    }

    #[test]
    fn test_missing_values_are_counted() {
        let df = df!(
            "Time" => [Some(1i64), None, Some(3)],
            "LastPrice" => [None, Some(1i64), Some(2)]
        )
        .unwrap();
        let report = Validator::default().validate(&df, "E");
        assert!(report.passed());
        assert_eq!(report.issues, vec![ValidationIssue::MissingValues { count: 2 }]);
    }
}
