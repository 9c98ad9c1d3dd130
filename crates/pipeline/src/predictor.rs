//! Placeholder prediction over a directory of test files.
//!
//! A [`Model`] maps a snapshot frame to a `Time, Predict` frame. The only
//! implementation here is [`BaselineModel`], which predicts
//! `AskVolume1 + BidVolume1`.

use crate::writer::write_csv;
use lob_core::frame::has_column;
use lob_core::schema::{ASK_VOLUME_1, BID_VOLUME_1, TIME};
use lob_core::{DataFrame, Error, Result};
use lob_features::imbalance::{total_dtype, total_volume};
use lob_ingestion::read_csv;
use polars::prelude::{col, IntoLazy};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const PREDICT: &str = "Predict";

/// Something that can score a snapshot frame.
pub trait Model {
    /// Return a frame with exactly `Time` and `Predict`, one row per input
    /// row, in input order.
    fn predict(&self, df: &DataFrame) -> Result<DataFrame>;
}

/// `Predict = AskVolume1 + BidVolume1`.
#[derive(Debug, Default, Clone, Copy)]
pub struct BaselineModel;

impl Model for BaselineModel {
    fn predict(&self, df: &DataFrame) -> Result<DataFrame> {
        if let Some(name) = [TIME, ASK_VOLUME_1, BID_VOLUME_1]
            .into_iter()
            .find(|name| !has_column(df, name))
        {
            return Err(Error::data(format!("missing column {name}")));
        }

        let levels = [ASK_VOLUME_1, BID_VOLUME_1];
        let dtype = total_dtype(
            levels
                .iter()
                .map(|name| df.column(name).map(|c| c.dtype()))
                .collect::<std::result::Result<Vec<_>, _>>()?,
        );
        let prediction = df
            .clone()
            .lazy()
            .select([col(TIME), total_volume(&levels, &dtype).alias(PREDICT)])
            .collect()?;
        Ok(prediction)
    }
}

/// One scored file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictedFile {
    pub input: PathBuf,
    pub output: PathBuf,
    pub rows: usize,
}

/// Score every `.csv` file under `input_dir` and write the result to the
/// same relative path under `output_dir`.
pub fn predict_directory(
    model: &dyn Model,
    input_dir: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
) -> Result<Vec<PredictedFile>> {
    let input_dir = input_dir.as_ref();
    let output_dir = output_dir.as_ref();

    let mut files = Vec::new();
    collect_csv_files(input_dir, &mut files)?;
    files.sort();

    let mut predicted = Vec::with_capacity(files.len());
    for input in files {
        let relative = input
            .strip_prefix(input_dir)
            .map_err(|e| Error::Other(e.to_string()))?;
        let output = output_dir.join(relative);

        let table = read_csv(&input)?;
        let prediction = model.predict(&table)?;
        if let Some(parent) = output.parent() {
            fs::create_dir_all(parent)?;
        }
        write_csv(&prediction, &output)?;

        info!(input = %input.display(), output = %output.display(), rows = prediction.height(), "predicted");
        predicted.push(PredictedFile {
            rows: prediction.height(),
            input,
            output,
        });
    }
    Ok(predicted)
}

fn collect_csv_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_csv_files(&path, out)?;
        } else if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("csv")) {
            out.push(path);
        }
    }
    Ok(())
}
