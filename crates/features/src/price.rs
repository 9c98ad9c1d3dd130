//! Top-of-book price features as column expressions.

use polars::prelude::*;

/// `(bid + ask) / 2`, always floating point.
pub fn mid_price(bid: &str, ask: &str) -> Expr {
    (col(bid).cast(DataType::Float64) + col(ask).cast(DataType::Float64)) / lit(2.0)
}

/// `ask - bid`. Integer prices give an integer spread.
pub fn spread(bid: &str, ask: &str) -> Expr {
    col(ask) - col(bid)
}

/// `spread / mid`. A zero mid gives a non-finite ratio.
pub fn spread_ratio(bid: &str, ask: &str) -> Expr {
    spread(bid, ask).cast(DataType::Float64) / mid_price(bid, ask)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use lob_core::frame::{f64_values, i64_values};

    fn eval(df: DataFrame) -> DataFrame {
        df.lazy()
            .select([
                mid_price("bid", "ask").alias("mid"),
                spread("bid", "ask").alias("spread"),
                spread_ratio("bid", "ask").alias("ratio"),
            ])
            .collect()
            .unwrap()
    }

    #[test]
    fn test_integer_book() {
        let out = eval(df!("bid" => [100i32, 200], "ask" => [102i32, 201]).unwrap());

        assert_eq!(f64_values(&out, "mid").unwrap(), vec![Some(101.0), Some(200.5)]);
        assert!(out.column("spread").unwrap().dtype().is_integer());
        assert_eq!(i64_values(&out, "spread").unwrap()[1], Some(1));
        assert_relative_eq!(f64_values(&out, "ratio").unwrap()[0].unwrap(), 2.0 / 101.0);
    }

    #[test]
    fn test_float_book_and_missing() {
        let out = eval(df!("bid" => [Some(10.5f64), None], "ask" => [11.0f64, 12.0]).unwrap());

        assert_eq!(out.column("spread").unwrap().dtype(), &DataType::Float64);
        let spread = f64_values(&out, "spread").unwrap();
        assert_relative_eq!(spread[0].unwrap(), 0.5);
        assert_eq!(spread[1], None);
    }
}
