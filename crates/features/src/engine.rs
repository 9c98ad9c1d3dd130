//! Feature computation engine.
//!
//! Appends derived columns to a cleaned frame. Existing columns are never
//! modified or replaced.

use crate::imbalance::{order_imbalance, total_dtype, total_volume};
use crate::price::{mid_price, spread, spread_ratio};
use lob_core::schema::{ask_volume_columns, bid_volume_columns, ASK_PRICE_1, BID_PRICE_1};
use lob_core::Result;
use polars::prelude::*;
use std::collections::HashMap;
use tracing::debug;

pub const MID_PRICE: &str = "mid_price";
pub const SPREAD: &str = "spread";
pub const SPREAD_RATIO: &str = "spread_ratio";
pub const TOTAL_BID_VOLUME: &str = "total_bid_volume";
pub const TOTAL_ASK_VOLUME: &str = "total_ask_volume";
pub const ORDER_IMBALANCE: &str = "order_imbalance";

/// Every column the engine can add, in append order.
pub const FEATURE_COLUMNS: [&str; 6] = [
    MID_PRICE,
    SPREAD,
    SPREAD_RATIO,
    TOTAL_BID_VOLUME,
    TOTAL_ASK_VOLUME,
    ORDER_IMBALANCE,
];

/// Why a feature was not added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Prerequisite columns are absent.
    MissingInputs(Vec<String>),
    /// A column with the feature's name already exists.
    AlreadyPresent,
}

/// What one engine pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureSummary {
    pub added: Vec<String>,
    pub skipped: Vec<(String, SkipReason)>,
}

/// Feature computation engine.
#[derive(Debug, Clone, Default)]
pub struct FeatureEngine;

impl FeatureEngine {
    pub fn new() -> Self {
        Self
    }

    /// Append price and depth features. An empty frame passes through.
    pub fn compute(&self, df: DataFrame) -> Result<(DataFrame, FeatureSummary)> {
        if df.height() == 0 {
            return Ok((df, FeatureSummary::default()));
        }

        let mut plan = FeaturePlan::new(&df);
        self.add_price_features(&mut plan);
        self.add_depth_features(&mut plan);

        let FeaturePlan { exprs, summary, .. } = plan;
        let out = if exprs.is_empty() {
            df
        } else {
            df.lazy().with_columns(exprs).collect()?
        };

        debug!(added = ?summary.added, "features computed");
        Ok((out, summary))
    }

    fn add_price_features(&self, plan: &mut FeaturePlan) {
        let missing = plan.missing_columns(&[BID_PRICE_1, ASK_PRICE_1].map(String::from));
        if !missing.is_empty() {
            plan.skip_all(&[MID_PRICE, SPREAD, SPREAD_RATIO], &missing);
            return;
        }

        plan.append(MID_PRICE, mid_price(BID_PRICE_1, ASK_PRICE_1));
        plan.append(SPREAD, spread(BID_PRICE_1, ASK_PRICE_1));
        plan.append(SPREAD_RATIO, spread_ratio(BID_PRICE_1, ASK_PRICE_1));
    }

    fn add_depth_features(&self, plan: &mut FeaturePlan) {
        let bid_cols = bid_volume_columns();
        let ask_cols = ask_volume_columns();
        let required: Vec<String> = bid_cols.iter().chain(&ask_cols).cloned().collect();
        let missing = plan.missing_columns(&required);
        if !missing.is_empty() {
            plan.skip_all(&[TOTAL_BID_VOLUME, TOTAL_ASK_VOLUME, ORDER_IMBALANCE], &missing);
            return;
        }

        let dtype = total_dtype(required.iter().filter_map(|c| plan.dtypes.get(c)));
        let bid_total = total_volume(&bid_cols, &dtype);
        let ask_total = total_volume(&ask_cols, &dtype);

        plan.append(TOTAL_BID_VOLUME, bid_total.clone());
        plan.append(TOTAL_ASK_VOLUME, ask_total.clone());
        plan.append(ORDER_IMBALANCE, order_imbalance(bid_total, ask_total));
    }
}

/// Expressions to add, built against the input frame's columns.
struct FeaturePlan {
    dtypes: HashMap<String, DataType>,
    exprs: Vec<Expr>,
    summary: FeatureSummary,
}

impl FeaturePlan {
    fn new(df: &DataFrame) -> Self {
        Self {
            dtypes: df
                .get_columns()
                .iter()
                .map(|c| (c.name().to_string(), c.dtype().clone()))
                .collect(),
            exprs: Vec::new(),
            summary: FeatureSummary::default(),
        }
    }

    fn append(&mut self, name: &str, expr: Expr) {
        if self.dtypes.contains_key(name) {
            self.summary.skipped.push((name.to_string(), SkipReason::AlreadyPresent));
            return;
        }
        self.exprs.push(expr.alias(name));
        self.summary.added.push(name.to_string());
    }

    fn missing_columns(&self, required: &[String]) -> Vec<String> {
        required
            .iter()
            .filter(|c| !self.dtypes.contains_key(*c))
            .cloned()
            .collect()
    }

    fn skip_all(&mut self, names: &[&str], missing: &[String]) {
        for name in names {
            self.summary
                .skipped
                .push((name.to_string(), SkipReason::MissingInputs(missing.to_vec())));
        }
    }
}
