//! Book depth aggregation and order imbalance as column expressions.

use polars::prelude::*;

/// Row-wise sum of the given level columns, each cast to `dtype` first.
/// A missing level gives a missing total.
pub fn total_volume<S: AsRef<str>>(levels: &[S], dtype: &DataType) -> Expr {
    levels
        .iter()
        .map(|level| col(level.as_ref()).cast(dtype.clone()))
        .reduce(|acc, level| acc + level)
        .unwrap_or_else(|| lit(0).cast(dtype.clone()))
}

/// Integer levels sum as `Int64`, anything else as `Float64`.
pub fn total_dtype<'a>(levels: impl IntoIterator<Item = &'a DataType>) -> DataType {
    if levels.into_iter().all(DataType::is_integer) {
        DataType::Int64
    } else {
        DataType::Float64
    }
}

/// `(bid - ask) / (bid + ask)`, `0` when there is no resting volume.
pub fn order_imbalance(bid_total: Expr, ask_total: Expr) -> Expr {
    let bid = bid_total.cast(DataType::Float64);
    let ask = ask_total.cast(DataType::Float64);
    let total = bid.clone() + ask.clone();
    when(total.clone().gt(lit(0.0)))
        .then((bid - ask) / total)
        .otherwise(lit(0.0))
}
