//! Per-day, per-stock snapshot loading.
//!
//! Files live at `<base>/<day>/<stock>.csv`. A missing or unreadable file is
//! not fatal: it contributes no rows and is recorded as a [`LoadEvent`].

use crate::reader::read_csv;
use indexmap::IndexMap;
use lob_core::config::{DataConfig, DayRange};
use lob_core::schema::{DAY, STOCK};
use lob_core::Result;
use polars::prelude::*;
use std::path::PathBuf;
use tracing::debug;

/// Stock symbol to concatenated frame, in configured symbol order.
pub type StockTables = IndexMap<String, DataFrame>;

/// What happened to one `(day, stock)` file.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadEvent {
    /// File read and tagged.
    Loaded {
        day: u32,
        stock: String,
        path: PathBuf,
        rows: usize,
    },
    /// No file at the expected path.
    Missing {
        day: u32,
        stock: String,
        path: PathBuf,
    },
    /// File exists but could not be read or parsed.
    Failed {
        day: u32,
        stock: String,
        path: PathBuf,
        reason: String,
    },
}

/// Result of loading every configured `(day, stock)` pair.
#[derive(Debug, Clone, Default)]
pub struct LoadOutcome {
    /// One entry per configured symbol, possibly empty.
    pub tables: StockTables,
    /// Events in load order (day-major).
    pub events: Vec<LoadEvent>,
}

/// Snapshot loader over a fixed directory layout.
#[derive(Debug, Clone)]
pub struct Loader {
    base_path: PathBuf,
    day_range: DayRange,
    symbols: Vec<String>,
}

impl Loader {
    /// Create a loader from the data section of the configuration.
    pub fn new(config: &DataConfig) -> Self {
        Self {
            base_path: config.base_path.clone(),
            day_range: config.day_range,
            symbols: config.stock_symbols.clone(),
        }
    }

    /// Expected location of a day file.
    pub fn path_for(&self, day: u32, stock: &str) -> PathBuf {
        self.base_path.join(day.to_string()).join(format!("{stock}.csv"))
    }

    /// Load one file and tag its rows with `day` and `stock`. Never fails:
    /// problems are reported in the returned event with an empty frame.
    pub fn load_single(&self, day: u32, stock: &str) -> (DataFrame, LoadEvent) {
        let path = self.path_for(day, stock);
        if !path.is_file() {
            let event = LoadEvent::Missing {
                day,
                stock: stock.to_string(),
                path,
            };
            return (DataFrame::default(), event);
        }

        match read_csv(&path).and_then(|df| tag(df, day, stock)) {
            Ok(df) => {
                debug!(day, stock, rows = df.height(), "read day file");
                let event = LoadEvent::Loaded {
                    day,
                    stock: stock.to_string(),
                    path,
                    rows: df.height(),
                };
                (df, event)
            }
            Err(e) => {
                let event = LoadEvent::Failed {
                    day,
                    stock: stock.to_string(),
                    path,
                    reason: e.to_string(),
                };
                (DataFrame::default(), event)
            }
        }
    }

    /// Load every configured day for every configured stock and concatenate
    /// each stock's days in day order.
    pub fn load_all(&self) -> Result<LoadOutcome> {
        let mut parts: IndexMap<String, Vec<DataFrame>> = self
            .symbols
            .iter()
            .map(|s| (s.clone(), Vec::new()))
            .collect();
        let mut events = Vec::new();

        for day in self.day_range.days() {
            for stock in &self.symbols {
                let (df, event) = self.load_single(day, stock);
                events.push(event);
                if df.height() > 0 {
                    parts.entry(stock.clone()).or_default().push(df);
                }
            }
        }

        let mut tables = StockTables::new();
        for (stock, days) in parts {
            tables.insert(stock, merge_days(days)?);
        }
        Ok(LoadOutcome { tables, events })
    }
}

/// Concatenate day frames in the order given. Columns are unioned, a column
/// absent from a day is missing for that day's rows, and differing column
/// types are widened to a common type. No days gives an empty frame.
pub fn merge_days(days: Vec<DataFrame>) -> Result<DataFrame> {
    if days.len() <= 1 {
        return Ok(days.into_iter().next().unwrap_or_default());
    }
    let frames: Vec<LazyFrame> = days.into_iter().map(|df| df.lazy()).collect();
    let merged = concat_lf_diagonal(
        frames,
        UnionArgs {
            rechunk: true,
            to_supertypes: true,
            ..Default::default()
        },
    )?
    .collect()?;
    Ok(merged)
}

/// Frame for `symbol`, or an empty frame if it was never loaded.
pub fn get_stock(tables: &StockTables, symbol: &str) -> DataFrame {
    tables.get(symbol).cloned().unwrap_or_default()
}

fn tag(mut df: DataFrame, day: u32, stock: &str) -> Result<DataFrame> {
    let rows = df.height();
    df.with_column(Column::new(DAY.into(), vec![i64::from(day); rows]))?;
    df.with_column(Column::new(STOCK.into(), vec![stock; rows]))?;
    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lob_core::frame::{column_names, i64_values};
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    const HEADER: &str = "Time,BidPrice1,AskPrice1,LastPrice";

    fn write_day(root: &Path, day: u32, stock: &str, body: &str) {
        let dir = root.join(day.to_string());
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(format!("{stock}.csv")), format!("{HEADER}\n{body}")).unwrap();
    }

    fn loader(root: &Path, symbols: &[&str]) -> Loader {
        Loader::new(&DataConfig {
            base_path: root.to_path_buf(),
            day_range: DayRange::new(1, 5),
            stock_symbols: symbols.iter().map(|s| s.to_string()).collect(),
        })
    }

    #[test]
    fn test_partial_days_in_day_order() {
        let dir = TempDir::new().unwrap();
        // Day 2 written first to make sure ordering comes from the day loop.
        write_day(dir.path(), 2, "A", "200000,105,106,105\n200003,106,107,106\n");
        write_day(dir.path(), 1, "A", "100000,100,101,100\n");

        let outcome = loader(dir.path(), &["A"]).load_all().unwrap();
        let a = get_stock(&outcome.tables, "A");

        assert_eq!(a.height(), 3);
        assert_eq!(i64_values(&a, "day").unwrap(), vec![Some(1), Some(2), Some(2)]);
        assert_eq!(
            i64_values(&a, "Time").unwrap(),
            vec![Some(100000), Some(200000), Some(200003)]
        );
        assert_eq!(a.column("stock").unwrap().dtype(), &DataType::String);

        let missing = outcome
            .events
            .iter()
            .filter(|e| matches!(e, LoadEvent::Missing { .. }))
            .count();
        assert_eq!(missing, 3);
    }

    #[test]
    fn test_stock_without_files_is_empty() {
        let dir = TempDir::new().unwrap();
        write_day(dir.path(), 1, "A", "100000,100,101,100\n");

        let outcome = loader(dir.path(), &["A", "B"]).load_all().unwrap();

        assert_eq!(outcome.tables.len(), 2);
        assert_eq!(outcome.tables["B"].height(), 0);
        assert_eq!(get_stock(&outcome.tables, "Z").height(), 0);
    }

    #[test]
    fn test_tables_follow_configured_symbol_order() {
        let dir = TempDir::new().unwrap();
        write_day(dir.path(), 1, "A", "100000,100,101,100\n");
        write_day(dir.path(), 1, "E", "100000,100,101,100\n");

        let outcome = loader(dir.path(), &["E", "A"]).load_all().unwrap();

        assert_eq!(outcome.tables.keys().collect::<Vec<_>>(), vec!["E", "A"]);
    }

    #[test]
    fn test_zero_byte_file_is_a_failure() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("1")).unwrap();
        fs::write(dir.path().join("1").join("A.csv"), "").unwrap();

        let (df, event) = loader(dir.path(), &["A"]).load_single(1, "A");

        assert_eq!(df.height(), 0);
        assert!(matches!(event, LoadEvent::Failed { day: 1, .. }));
    }

    #[test]
    fn test_header_only_file_loads_without_rows() {
        let dir = TempDir::new().unwrap();
        write_day(dir.path(), 1, "A", "");
        write_day(dir.path(), 2, "A", "200000,105,106,105\n");

        let l = loader(dir.path(), &["A"]);
        let (_, event) = l.load_single(1, "A");
        assert!(matches!(event, LoadEvent::Loaded { rows: 0, .. }));

        let outcome = l.load_all().unwrap();
        let a = &outcome.tables["A"];
        assert_eq!(a.height(), 1);
        assert_eq!(a.column("BidPrice1").unwrap().dtype(), &DataType::Int64);
    }

    #[test]
    fn test_merge_days_unions_columns() {
        let day1 = df!("Time" => [1i64], "LastPrice" => [100i64]).unwrap();
        let day2 = df!("Time" => [2i64], "Return5min" => [0.5f64], "LastPrice" => [100.5f64]).unwrap();

        let merged = merge_days(vec![day1, day2]).unwrap();

        assert_eq!(merged.height(), 2);
        assert_eq!(column_names(&merged), vec!["Time", "LastPrice", "Return5min"]);
        assert_eq!(merged.column("LastPrice").unwrap().dtype(), &DataType::Float64);
        assert_eq!(merged.column("Return5min").unwrap().null_count(), 1);
        assert_eq!(merge_days(Vec::new()).unwrap().height(), 0);
    }

    #[test]
    fn test_path_layout() {
        let l = loader(Path::new("/data"), &["C"]);
        assert_eq!(l.path_for(3, "C"), PathBuf::from("/data/3/C.csv"));
    }
}
