//! Statistics Calculator Module
//! Descriptive statistics, histograms, category counts and grouped box statistics.

use polars::prelude::*;
use serde::Serialize;
use std::collections::HashMap;

/// Whisker reach in multiples of the interquartile range.
pub const WHISKER_IQR: f64 = 1.5;

/// Distribution summary for one group of values.
#[derive(Debug, Clone, Serialize)]
pub struct GroupStats {
    pub group_name: String,
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
    pub q1: f64,
    pub q3: f64,
    pub whisker_low: f64,
    pub whisker_high: f64,
}

impl Default for GroupStats {
    fn default() -> Self {
        Self {
            group_name: String::new(),
            count: 0,
            mean: f64::NAN,
            median: f64::NAN,
            std: f64::NAN,
            min: f64::NAN,
            max: f64::NAN,
            q1: f64::NAN,
            q3: f64::NAN,
            whisker_low: f64::NAN,
            whisker_high: f64::NAN,
        }
    }
}

/// Equal-width histogram.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    pub start: f64,
    pub bin_width: f64,
    pub counts: Vec<usize>,
}

impl Histogram {
    pub fn bin_center(&self, idx: usize) -> f64 {
        self.start + (idx as f64 + 0.5) * self.bin_width
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

/// Row counts per category value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CategoryCounts {
    pub counts: Vec<(String, usize)>,
    pub missing: usize,
}

/// Handles statistical calculations.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Compute descriptive statistics for an array of values.
    pub fn compute_descriptive_stats(values: &[f64]) -> GroupStats {
        let n = values.len();
        if n == 0 {
            return GroupStats::default();
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let mean = values.iter().sum::<f64>() / n as f64;

        // Sample standard deviation, undefined for a single value.
        let std = if n > 1 {
            (values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64).sqrt()
        } else {
            f64::NAN
        };

        let q1 = Self::percentile(&sorted, 25.0);
        let median = Self::percentile(&sorted, 50.0);
        let q3 = Self::percentile(&sorted, 75.0);
        let iqr = q3 - q1;
        let whisker_low = sorted
            .iter()
            .copied()
            .find(|&v| v >= q1 - WHISKER_IQR * iqr)
            .unwrap_or(q1);
        let whisker_high = sorted
            .iter()
            .rev()
            .copied()
            .find(|&v| v <= q3 + WHISKER_IQR * iqr)
            .unwrap_or(q3);

        GroupStats {
            group_name: String::new(),
            count: n,
            mean,
            median,
            std,
            min: sorted[0],
            max: sorted[n - 1],
            q1,
            q3,
            whisker_low,
            whisker_high,
        }
    }

    /// Calculate percentile using linear interpolation (NumPy compatible).
    pub fn percentile(sorted_values: &[f64], p: f64) -> f64 {
        let n = sorted_values.len();
        if n == 0 {
            return f64::NAN;
        }
        if n == 1 {
            return sorted_values[0];
        }

        let rank = (p / 100.0) * (n - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = (rank.ceil() as usize).min(n - 1);
        let frac = rank - lower as f64;

        if lower == upper {
            sorted_values[lower]
        } else {
            sorted_values[lower] * (1.0 - frac) + sorted_values[upper] * frac
        }
    }

    /// Non-missing, finite values of a numeric column.
    pub fn column_values(df: &DataFrame, column: &str) -> PolarsResult<Vec<f64>> {
        let as_f64 = df.column(column)?.cast(&DataType::Float64)?;
        Ok(as_f64
            .f64()?
            .into_iter()
            .flatten()
            .filter(|v| v.is_finite())
            .collect())
    }

    /// Bucket values into `bins` equal-width bins over the observed range.
    pub fn histogram(values: &[f64], bins: usize) -> Histogram {
        let bins = bins.max(1);
        let Some((min, max)) = values.iter().fold(None, |acc: Option<(f64, f64)>, &v| {
            Some(match acc {
                None => (v, v),
                Some((lo, hi)) => (lo.min(v), hi.max(v)),
            })
        }) else {
            return Histogram {
                start: 0.0,
                bin_width: 1.0,
                counts: Vec::new(),
            };
        };

        if min == max {
            return Histogram {
                start: min - 0.5,
                bin_width: 1.0,
                counts: vec![values.len()],
            };
        }

        let bin_width = (max - min) / bins as f64;
        let mut counts = vec![0usize; bins];
        for &v in values {
            let idx = (((v - min) / bin_width).floor() as usize).min(bins - 1);
            counts[idx] += 1;
        }

        Histogram {
            start: min,
            bin_width,
            counts,
        }
    }

    /// Count rows per value of a category column.
    ///
    /// Values listed in `order` come first in that order; the rest follow alphabetically.
    pub fn category_counts(
        df: &DataFrame,
        column: &str,
        order: &[String],
    ) -> PolarsResult<CategoryCounts> {
        let as_str = df.column(column)?.cast(&DataType::String)?;
        let mut counts: HashMap<String, usize> = HashMap::new();
        let mut missing = 0;

        for value in as_str.str()?.into_iter() {
            match value {
                Some(v) => *counts.entry(v.to_string()).or_default() += 1,
                None => missing += 1,
            }
        }

        let keys: Vec<String> = counts.keys().cloned().collect();
        let counts = Self::order_labels(keys, order)
            .into_iter()
            .map(|label| {
                let count = counts.get(&label).copied().unwrap_or(0);
                (label, count)
            })
            .collect();

        Ok(CategoryCounts { counts, missing })
    }

    /// Split a numeric column by a category column and summarize each group.
    ///
    /// Rows with a missing group or value are skipped. Groups named in `order`
    /// are always present, even when empty.
    pub fn grouped_stats(
        df: &DataFrame,
        group_col: &str,
        value_col: &str,
        order: &[String],
    ) -> PolarsResult<Vec<GroupStats>> {
        let groups = df.column(group_col)?.cast(&DataType::String)?;
        let values = df.column(value_col)?.cast(&DataType::Float64)?;

        let mut data_by_group: HashMap<String, Vec<f64>> = HashMap::new();
        for (g, v) in groups.str()?.into_iter().zip(values.f64()?.into_iter()) {
            if let (Some(g), Some(v)) = (g, v) {
                if v.is_finite() {
                    data_by_group.entry(g.to_string()).or_default().push(v);
                }
            }
        }

        let keys: Vec<String> = data_by_group.keys().cloned().collect();
        Ok(Self::order_labels(keys, order)
            .into_iter()
            .map(|group| {
                let values = data_by_group.get(&group).map(Vec::as_slice).unwrap_or(&[]);
                let mut stats = Self::compute_descriptive_stats(values);
                stats.group_name = group;
                stats
            })
            .collect())
    }

    /// Preferred labels first, then anything else sorted.
    fn order_labels(found: Vec<String>, preferred: &[String]) -> Vec<String> {
        let mut rest: Vec<String> = found
            .into_iter()
            .filter(|label| !preferred.contains(label))
            .collect();
        rest.sort();

        let mut ordered = preferred.to_vec();
        ordered.extend(rest);
        ordered
    }
}
