//! Small read helpers over [`DataFrame`].

use crate::error::Result;
use polars::prelude::{DataFrame, DataType};

/// Whether `df` has a column called `name`.
pub fn has_column(df: &DataFrame, name: &str) -> bool {
    df.get_column_index(name).is_some()
}

/// Column names in frame order.
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names().iter().map(|name| name.to_string()).collect()
}

/// Missing cells across every column.
pub fn null_cells(df: &DataFrame) -> usize {
    df.get_columns().iter().map(|c| c.null_count()).sum()
}

/// Values of `name` as `f64`. Cells that do not convert are `None`.
pub fn f64_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let column = df.column(name)?.cast(&DataType::Float64)?;
    Ok(column.f64()?.iter().collect())
}

/// Values of `name` as `i64`. Cells that do not convert are `None`.
pub fn i64_values(df: &DataFrame, name: &str) -> Result<Vec<Option<i64>>> {
    let column = df.column(name)?.cast(&DataType::Int64)?;
    Ok(column.i64()?.iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    #[test]
    fn test_helpers() {
        let df = df!(
            "Time" => [93000000i64, 93000003, 93000006],
            "LastPrice" => [Some(100.0f64), None, Some(101.5)],
            "stock" => ["A", "A", "A"]
        )
        .unwrap();

        assert!(has_column(&df, "LastPrice"));
        assert!(!has_column(&df, "Return5min"));
        assert_eq!(column_names(&df), vec!["Time", "LastPrice", "stock"]);
        assert_eq!(null_cells(&df), 1);
        assert_eq!(f64_values(&df, "LastPrice").unwrap(), vec![Some(100.0), None, Some(101.5)]);
        assert_eq!(i64_values(&df, "Time").unwrap()[2], Some(93000006));
        assert!(f64_values(&df, "Missing").is_err());
    }
}
