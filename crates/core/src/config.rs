//! Configuration structures for the order book pipeline.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Main configuration for the pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Input data layout.
    pub data: DataConfig,
    /// Quality checks.
    pub validation: ValidationConfig,
    /// Processed output.
    pub output: OutputConfig,
    /// Placeholder predictor.
    pub predictor: PredictorConfig,
}

impl Config {
    /// Load a configuration from a JSON file. Missing sections and fields
    /// take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path.as_ref())?;
        let config: Config = serde_json::from_reader(std::io::BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints serde cannot express.
    pub fn validate(&self) -> Result<()> {
        let range = &self.data.day_range;
        if range.start > range.end {
            return Err(Error::config(format!(
                "day_range start {} is after end {}",
                range.start, range.end
            )));
        }
        if self.data.stock_symbols.is_empty() {
            return Err(Error::config("stock_symbols must not be empty"));
        }
        let mut seen = HashSet::new();
        for symbol in &self.data.stock_symbols {
            if symbol.trim().is_empty() {
                return Err(Error::config("stock symbol must not be blank"));
            }
            if !seen.insert(symbol) {
                return Err(Error::config(format!("duplicate stock symbol {symbol}")));
            }
        }
        if self.validation.required_columns.is_empty() {
            return Err(Error::config("required_columns must not be empty"));
        }
        Ok(())
    }
}

/// Inclusive range of trading days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayRange {
    pub start: u32,
    pub end: u32,
}

impl DayRange {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Days in ascending order.
    pub fn days(&self) -> impl Iterator<Item = u32> {
        self.start..=self.end
    }
}

impl Default for DayRange {
    fn default() -> Self {
        Self { start: 1, end: 5 }
    }
}

/// Input layout: `<base_path>/<day>/<stock>.csv`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Root of the day directories.
    pub base_path: PathBuf,
    /// Days to load.
    pub day_range: DayRange,
    /// Stock symbols to load. Loaded tables, the data report and written
    /// files follow this order.
    pub stock_symbols: Vec<String>,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            base_path: PathBuf::from("./data"),
            day_range: DayRange::default(),
            stock_symbols: ["A", "B", "C", "D", "E"].map(String::from).to_vec(),
        }
    }
}

/// Data quality configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Columns whose absence fails validation.
    pub required_columns: Vec<String>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            required_columns: vec!["Time".to_string(), "LastPrice".to_string()],
        }
    }
}

/// Processed output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory receiving `stock_<symbol>_processed.csv`.
    pub output_dir: PathBuf,
    /// Also write `data_report.json`.
    pub write_report: bool,
}

impl OutputConfig {
    /// File name for a stock's processed table.
    pub fn processed_file_name(symbol: &str) -> String {
        format!("stock_{symbol}_processed.csv")
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("./output"),
            write_report: true,
        }
    }
}

/// Placeholder predictor I/O.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictorConfig {
    /// Directory scanned for test CSV files.
    pub input_dir: PathBuf,
    /// Directory receiving mirrored prediction files.
    pub output_dir: PathBuf,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("./data"),
            output_dir: PathBuf::from("./output"),
        }
    }
}
