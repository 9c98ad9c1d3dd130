//! Snapshot cleaning: time ordering, missing-value fill, schema casts.

use lob_core::frame::{has_column, null_cells};
use lob_core::schema::TIME;
use lob_core::{CastPolicy, Result};
use polars::prelude::*;
use tracing::debug;

/// Statistics about one cleaning pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CleanStats {
    /// Rows before cleaning.
    pub rows_in: usize,
    /// Rows after cleaning.
    pub rows_out: usize,
    /// Missing cells found before filling.
    pub missing_cells: usize,
    /// Rows still missing a value after both fill passes.
    pub rows_dropped: usize,
    /// Whether a `Time` column was present to sort on.
    pub sorted: bool,
    /// Columns converted by the cast policy.
    pub cast_columns: Vec<String>,
}

/// Cleans a per-stock frame.
#[derive(Debug, Clone, Default)]
pub struct Cleaner {
    policy: CastPolicy,
}

impl Cleaner {
    /// Sort by `Time`, fill missing values, drop rows that stay incomplete,
    /// then apply the cast policy. An empty frame passes through unchanged.
    pub fn clean(&self, df: DataFrame) -> Result<(DataFrame, CleanStats)> {
        let mut stats = CleanStats {
            rows_in: df.height(),
            ..CleanStats::default()
        };
        if df.height() == 0 {
            return Ok((df, stats));
        }

        let (sorted, did_sort) = sort_by_time(df)?;
        stats.sorted = did_sort;

        stats.missing_cells = null_cells(&sorted);
        let mut cleaned = if stats.missing_cells > 0 {
            debug!(missing = stats.missing_cells, "filling missing values");
            fill_missing(sorted)?
        } else {
            sorted
        };
        stats.rows_dropped = stats.rows_in - cleaned.height();

        stats.cast_columns = self.policy.apply(&mut cleaned)?;
        stats.rows_out = cleaned.height();
        Ok((cleaned, stats))
    }
}

/// Stable ascending sort on `Time` with missing times last. Returns the
/// frame unchanged (and `false`) when there is no `Time` column.
pub fn sort_by_time(df: DataFrame) -> Result<(DataFrame, bool)> {
    if !has_column(&df, TIME) {
        return Ok((df, false));
    }
    let sorted = df.sort(
        [TIME],
        SortMultipleOptions::default()
            .with_maintain_order(true)
            .with_nulls_last(true),
    )?;
    Ok((sorted, true))
}

/// Forward-fill then backward-fill every column, then drop any row that
/// still has a missing cell.
pub fn fill_missing(df: DataFrame) -> Result<DataFrame> {
    let filled = df
        .fill_null(FillNullStrategy::Forward(None))?
        .fill_null(FillNullStrategy::Backward(None))?;
    Ok(filled.lazy().drop_nulls(None).collect()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lob_core::frame::i64_values;
    use lob_core::Error;

    fn raw() -> DataFrame {
        df!(
            "Time" => [30i64, 10, 20, 10],
            "LastPrice" => [Some(103i64), None, Some(102), Some(100)],
            "tag" => ["d", "a", "c", "b"]
        )
        .unwrap()
    }

    fn tags(df: &DataFrame) -> Vec<String> {
        df.column("tag")
            .unwrap()
            .str()
            .unwrap()
            .iter()
            .map(|v| v.unwrap_or_default().to_string())
            .collect()
    }

    #[test]
    fn test_sort_is_stable() {
        let (sorted, did_sort) = sort_by_time(raw()).unwrap();
        assert!(did_sort);
        assert_eq!(tags(&sorted), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_missing_time_sorts_last() {
        let df = df!("Time" => [None, Some(2i64), Some(1)], "tag" => ["x", "b", "a"]).unwrap();
        let (sorted, _) = sort_by_time(df).unwrap();
        assert_eq!(tags(&sorted), vec!["a", "b", "x"]);
    }

    #[test]
    fn test_clean_fills_then_casts() {
        let (cleaned, stats) = Cleaner::default().clean(raw()).unwrap();

        assert_eq!(stats.rows_in, 4);
        assert_eq!(stats.rows_out, 4);
        assert_eq!(stats.missing_cells, 1);
        assert_eq!(stats.rows_dropped, 0);
        assert_eq!(stats.cast_columns, vec!["Time", "LastPrice"]);

        // Leading gap after sorting is only reachable by the backward pass.
        assert_eq!(cleaned.column("LastPrice").unwrap().dtype(), &DataType::Int32);
        assert_eq!(
            i64_values(&cleaned, "LastPrice").unwrap(),
            vec![Some(100), Some(100), Some(102), Some(103)]
        );

        let times: Vec<i64> = i64_values(&cleaned, "Time").unwrap().into_iter().flatten().collect();
        assert!(times.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_all_missing_column_drops_every_row() {
        let df = df!(
            "Time" => [1i64, 2],
            "Return5min" => [None::<f64>, None]
        )
        .unwrap();

        let (cleaned, stats) = Cleaner::default().clean(df).unwrap();

        assert_eq!(cleaned.height(), 0);
        assert_eq!(stats.rows_dropped, 2);
    }

    #[test]
    fn test_empty_passes_through() {
        let (cleaned, stats) = Cleaner::default().clean(DataFrame::default()).unwrap();
        assert_eq!(cleaned.width(), 0);
        assert_eq!(stats, CleanStats::default());
    }

    #[test]
    fn test_missing_time_skips_sort() {
        let df = df!("LastPrice" => [3i64, 1]).unwrap();
        let (cleaned, stats) = Cleaner::default().clean(df).unwrap();
        assert!(!stats.sorted);
        assert_eq!(i64_values(&cleaned, "LastPrice").unwrap()[0], Some(3));
    }

    #[test]
    fn test_non_numeric_cast_fails() {
        let df = df!("Time" => [1i64], "BidPrice1" => ["n/a-ish"]).unwrap();
        let err = Cleaner::default().clean(df).unwrap_err();
        assert!(matches!(err, Error::Cast { ref column, .. } if column == "BidPrice1"));
    }

    #[test]
    fn test_row_count_never_grows() {
        let (cleaned, _) = Cleaner::default().clean(raw()).unwrap();
        assert!(cleaned.height() <= raw().height());
    }
}
