//! Pipeline runner.
//!
//! Drives Loader → Cleaner → FeatureEngine → Validator/Reporter → Writer
//! sequentially for every configured stock.

use crate::report::{DataReport, PipelineEvent, Reporter};
use crate::validation::{ValidationReport, Validator};
use crate::writer::{write_report, write_table};
use indexmap::IndexMap;
use lob_core::config::OutputConfig;
use lob_core::{Config, DataFrame, Result};
use lob_features::FeatureEngine;
use lob_ingestion::{Cleaner, Loader};
use std::path::PathBuf;

/// Everything a run produced.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    /// Cleaned frames with features, for every stock that had raw data,
    /// in configured symbol order.
    pub processed: IndexMap<String, DataFrame>,
    /// One report per processed stock.
    pub validations: Vec<ValidationReport>,
    /// Per-stock summary.
    pub report: DataReport,
    /// Files written, processed tables first.
    pub written: Vec<PathBuf>,
}

/// The snapshot processing pipeline.
pub struct Pipeline {
    config: Config,
    loader: Loader,
    cleaner: Cleaner,
    engine: FeatureEngine,
    validator: Validator,
}

impl Pipeline {
    /// Create a pipeline, rejecting an invalid configuration.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            loader: Loader::new(&config.data),
            cleaner: Cleaner::default(),
            engine: FeatureEngine::new(),
            validator: Validator::new(&config.validation),
            config,
        })
    }

    /// Run every stage. Load problems are reported and skipped; cleaning,
    /// feature and write errors end the run.
    pub fn run(&self, reporter: &mut dyn Reporter) -> Result<PipelineOutcome> {
        let loaded = self.loader.load_all()?;
        for event in loaded.events {
            reporter.report(&PipelineEvent::Load(event));
        }

        let mut processed = IndexMap::new();
        for (stock, raw) in loaded.tables {
            reporter.report(&PipelineEvent::Merged {
                stock: stock.clone(),
                rows: raw.height(),
            });
            if raw.height() == 0 {
                continue;
            }
            let table = self.process_stock(&stock, raw, reporter)?;
            processed.insert(stock, table);
        }

        let validations: Vec<ValidationReport> = processed
            .iter()
            .map(|(stock, table)| self.validator.validate(table, stock))
            .collect();
        for validation in &validations {
            reporter.report(&PipelineEvent::Validated(validation.clone()));
        }

        let report = DataReport::build(&processed);
        reporter.report(&PipelineEvent::Report(report.clone()));

        let written = self.save(&processed, &report, reporter)?;

        Ok(PipelineOutcome {
            processed,
            validations,
            report,
            written,
        })
    }

    /// Clean one stock's raw table and append features.
    pub fn process_stock(
        &self,
        stock: &str,
        raw: DataFrame,
        reporter: &mut dyn Reporter,
    ) -> Result<DataFrame> {
        let (cleaned, stats) = self.cleaner.clean(raw)?;
        reporter.report(&PipelineEvent::Cleaned {
            stock: stock.to_string(),
            stats,
        });

        let (table, summary) = self.engine.compute(cleaned)?;
        reporter.report(&PipelineEvent::Features {
            stock: stock.to_string(),
            summary,
        });
        Ok(table)
    }

    fn save(
        &self,
        processed: &IndexMap<String, DataFrame>,
        report: &DataReport,
        reporter: &mut dyn Reporter,
    ) -> Result<Vec<PathBuf>> {
        let output_dir = &self.config.output.output_dir;
        let mut written = Vec::new();

        for (stock, df) in processed.iter().filter(|(_, df)| df.height() > 0) {
            let path = write_table(df, output_dir, &OutputConfig::processed_file_name(stock))?;
            reporter.report(&PipelineEvent::Saved {
                stock: Some(stock.clone()),
                path: path.clone(),
            });
            written.push(path);
        }

        if self.config.output.write_report {
            let path = write_report(report, output_dir)?;
            reporter.report(&PipelineEvent::Saved {
                stock: None,
                path: path.clone(),
            });
            written.push(path);
        }
        Ok(written)
    }
}
