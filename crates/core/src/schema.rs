//! Snapshot column names and the per-column cast policy.

use crate::error::{Error, Result};
use polars::prelude::{Column, DataFrame, DataType};

pub const TIME: &str = "Time";
pub const LAST_PRICE: &str = "LastPrice";
pub const RETURN_5MIN: &str = "Return5min";
pub const DAY: &str = "day";
pub const STOCK: &str = "stock";

pub const BID_PRICE_1: &str = "BidPrice1";
pub const ASK_PRICE_1: &str = "AskPrice1";
pub const BID_VOLUME_1: &str = "BidVolume1";
pub const ASK_VOLUME_1: &str = "AskVolume1";

/// Number of book levels per side in a snapshot.
pub const BOOK_DEPTH: usize = 5;

/// `BidVolume1..=BidVolume5`.
pub fn bid_volume_columns() -> Vec<String> {
    (1..=BOOK_DEPTH).map(|i| format!("BidVolume{i}")).collect()
}

/// `AskVolume1..=AskVolume5`.
pub fn ask_volume_columns() -> Vec<String> {
    (1..=BOOK_DEPTH).map(|i| format!("AskVolume{i}")).collect()
}

/// One entry of the cast policy: cast `column` to `target` if present.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnCast {
    pub column: String,
    pub target: DataType,
}

/// Explicit table of optional casts applied after cleaning.
#[derive(Debug, Clone, PartialEq)]
pub struct CastPolicy {
    casts: Vec<ColumnCast>,
}

impl CastPolicy {
    /// The documented snapshot schema: prices, volumes and counts are
    /// 32-bit, trade amounts 64-bit, the return label a 32-bit float.
    pub fn snapshot() -> Self {
        let mut int32 = vec![TIME.to_string()];
        for side in ["Bid", "Ask"] {
            int32.extend((1..=BOOK_DEPTH).map(|i| format!("{side}Price{i}")));
            int32.extend((1..=BOOK_DEPTH).map(|i| format!("{side}Volume{i}")));
        }
        int32.extend(
            [
                "OrderBuyNum",
                "OrderSellNum",
                "OrderBuyVolume",
                "OrderSellVolume",
                "TradeBuyNum",
                "TradeSellVolume",
                LAST_PRICE,
            ]
            .map(String::from),
        );

        let int64 = ["TradeBuyAmount", "TradeSellAmount"].map(String::from);

        let mut casts: Vec<ColumnCast> = int32
            .into_iter()
            .map(|column| ColumnCast { column, target: DataType::Int32 })
            .collect();
        casts.extend(int64.into_iter().map(|column| ColumnCast { column, target: DataType::Int64 }));
        casts.push(ColumnCast {
            column: RETURN_5MIN.to_string(),
            target: DataType::Float32,
        });
        Self { casts }
    }

    pub fn casts(&self) -> &[ColumnCast] {
        &self.casts
    }

    /// Target type for `column`, if the policy covers it.
    pub fn target_for(&self, column: &str) -> Option<&DataType> {
        self.casts.iter().find(|c| c.column == column).map(|c| &c.target)
    }

    /// Apply every cast whose column exists in `df`. Returns the names of
    /// the columns that were cast.
    ///
    /// A value the target cannot hold exactly is an error: text that is not
    /// a number, a fraction cast to an integer, or an integer out of range.
    pub fn apply(&self, df: &mut DataFrame) -> Result<Vec<String>> {
        let mut applied = Vec::new();
        for cast in &self.casts {
            let Ok(column) = df.column(&cast.column) else {
                continue;
            };
            let converted = cast_column(column, &cast.target)?;
            df.with_column(converted)?;
            applied.push(cast.column.clone());
        }
        Ok(applied)
    }
}

impl Default for CastPolicy {
    fn default() -> Self {
        Self::snapshot()
    }
}

fn cast_column(column: &Column, target: &DataType) -> Result<Column> {
    let name = column.name().to_string();

    // Float to integer truncates under a strict cast, so check that first.
    if target.is_integer() && column.dtype().is_float() {
        let values = column.cast(&DataType::Float64)?;
        let fraction = values
            .f64()?
            .iter()
            .enumerate()
            .find_map(|(row, v)| v.filter(|x| x.fract() != 0.0).map(|x| (row, x)));
        if let Some((row, value)) = fraction {
            return Err(Error::cast(
                name,
                target.clone(),
                format!("row {row}: {value} is not a whole number"),
            ));
        }
    }

    column
        .strict_cast(target)
        .map_err(|e| Error::cast(name, target.clone(), e.to_string()))
}
