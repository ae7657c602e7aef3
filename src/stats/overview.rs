//! Data Overview Module
//! Shape, column types, missing values and describe-style summaries.

use crate::data::{is_numeric_dtype, DataQualityReport, DerivedTable, IncomeBins};
use crate::stats::StatsCalculator;
use polars::prelude::*;
use rayon::prelude::*;
use serde::Serialize;

/// Describe-style summary of a numeric column.
#[derive(Debug, Clone, Serialize)]
pub struct Describe {
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub max: f64,
}

/// Per-column summary.
#[derive(Debug, Clone, Serialize)]
pub struct ColumnSummary {
    pub name: String,
    pub dtype: String,
    pub missing: usize,
    pub describe: Option<Describe>,
}

impl ColumnSummary {
    fn from_column(column: &Column) -> PolarsResult<Self> {
        let describe = if is_numeric_dtype(column.dtype()) {
            let as_f64 = column.cast(&DataType::Float64)?;
            let values: Vec<f64> = as_f64
                .f64()?
                .into_iter()
                .flatten()
                .filter(|v| !v.is_nan())
                .collect();
            let stats = StatsCalculator::compute_descriptive_stats(&values);
            Some(Describe {
                count: stats.count,
                mean: stats.mean,
                std: stats.std,
                min: stats.min,
                p25: stats.q1,
                p50: stats.median,
                p75: stats.q3,
                max: stats.max,
            })
        } else {
            None
        };

        Ok(Self {
            name: column.name().to_string(),
            dtype: column.dtype().to_string(),
            missing: column.null_count(),
            describe,
        })
    }
}

/// Everything the Data Overview section shows.
#[derive(Debug, Clone, Serialize)]
pub struct OverviewReport {
    pub rows: usize,
    pub columns: usize,
    pub column_summaries: Vec<ColumnSummary>,
    pub income_bins: Option<IncomeBins>,
    pub quality: DataQualityReport,
}

impl OverviewReport {
    /// Summarize each column in parallel.
    pub fn build(table: &DerivedTable) -> PolarsResult<Self> {
        let column_summaries = table
            .df
            .get_columns()
            .par_iter()
            .map(ColumnSummary::from_column)
            .collect::<PolarsResult<Vec<_>>>()?;

        Ok(Self {
            rows: table.df.height(),
            columns: table.df.width(),
            column_summaries,
            income_bins: table.income_bins,
            quality: table.quality.clone(),
        })
    }

    pub fn numeric_summaries(&self) -> impl Iterator<Item = (&str, &Describe)> {
        self.column_summaries
            .iter()
            .filter_map(|c| c.describe.as_ref().map(|d| (c.name.as_str(), d)))
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
