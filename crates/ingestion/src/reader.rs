//! CSV to [`DataFrame`] reading.
//!
//! Column types are inferred over the whole file: integers, then floats,
//! then text. A column with rows but no values at all is read as floats.

use lob_core::{Error, Result};
use polars::prelude::*;
use std::path::Path;

/// Cell contents read as missing, in addition to empty fields.
pub const MISSING_TOKENS: &[&str] = &["NA", "N/A", "NaN", "nan", "null", "NULL", "None"];

fn missing_values() -> NullValues {
    NullValues::AllColumns(MISSING_TOKENS.iter().map(|t| PlSmallStr::from(*t)).collect())
}

/// Read a headed CSV file. A file without a header row is an error.
pub fn read_csv(path: impl AsRef<Path>) -> Result<DataFrame> {
    let path = path.as_ref();
    let mut df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .map_parse_options(|opts| opts.with_null_values(Some(missing_values())))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    if df.width() == 0 {
        return Err(Error::data(format!("{} has no header row", path.display())));
    }
    widen_all_missing(&mut df)?;
    Ok(df)
}

/// All-missing columns come out of inference as text.
fn widen_all_missing(df: &mut DataFrame) -> Result<()> {
    if df.height() == 0 {
        return Ok(());
    }
    let names: Vec<PlSmallStr> = df
        .get_columns()
        .iter()
        .filter(|c| c.dtype() == &DataType::String && c.null_count() == c.len())
        .map(|c| c.name().clone())
        .collect();
    for name in names {
        let widened = df.column(&name)?.cast(&DataType::Float64)?;
        df.with_column(widened)?;
    }
    Ok(())
}
