//! Correlation Module
//! Pearson correlation matrix over the numeric columns of a table.

use crate::data::is_numeric_dtype;
use polars::prelude::*;
use rayon::prelude::*;
use serde::Serialize;
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Significance threshold for correlation p-values
pub const SIGNIFICANCE_THRESHOLD: f64 = 0.05;

/// Pairwise Pearson correlations with two-sided p-values.
///
/// Each pair uses only the rows where both columns have a value. Undefined
/// entries (fewer than two rows, or a constant column) are NaN.
#[derive(Debug, Clone, Serialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Vec<Vec<f64>>,
    pub p_values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    /// Correlate every numeric column with every other one.
    pub fn compute(df: &DataFrame) -> PolarsResult<Self> {
        let mut columns = Vec::new();
        let mut data: Vec<Vec<Option<f64>>> = Vec::new();

        for col in df.get_columns() {
            if !is_numeric_dtype(col.dtype()) {
                continue;
            }
            let as_f64 = col.cast(&DataType::Float64)?;
            columns.push(col.name().to_string());
            data.push(as_f64.f64()?.into_iter().collect());
        }

        let n = columns.len();
        let pairs: Vec<(usize, usize)> = (0..n)
            .flat_map(|i| (i..n).map(move |j| (i, j)))
            .collect();

        let results: Vec<(usize, usize, f64, f64)> = pairs
            .par_iter()
            .map(|&(i, j)| {
                let (r, count) = pearson(&data[i], &data[j]);
                // A defined self-correlation is exactly 1.
                let r = if i == j && !r.is_nan() { 1.0 } else { r };
                (i, j, r, correlation_p_value(r, count))
            })
            .collect();

        let mut values = vec![vec![f64::NAN; n]; n];
        let mut p_values = vec![vec![f64::NAN; n]; n];
        for (i, j, r, p) in results {
            values[i][j] = r;
            values[j][i] = r;
            p_values[i][j] = p;
            p_values[j][i] = p;
        }

        Ok(Self {
            columns,
            values,
            p_values,
        })
    }

    pub fn get(&self, row: &str, col: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == row)?;
        let j = self.columns.iter().position(|c| c == col)?;
        Some(self.values[i][j])
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Distinct column pairs with p-value at or below `alpha`, strongest first.
    pub fn significant_pairs(&self, alpha: f64) -> Vec<(String, String, f64, f64)> {
        let mut pairs = Vec::new();
        for i in 0..self.columns.len() {
            for j in (i + 1)..self.columns.len() {
                let p = self.p_values[i][j];
                if p <= alpha {
                    pairs.push((
                        self.columns[i].clone(),
                        self.columns[j].clone(),
                        self.values[i][j],
                        p,
                    ));
                }
            }
        }
        pairs.sort_by(|a, b| {
            b.2.abs()
                .partial_cmp(&a.2.abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        pairs
    }
}

/// Pearson correlation over pairwise-complete observations.
///
/// Returns the coefficient and the number of rows used.
pub fn pearson(x: &[Option<f64>], y: &[Option<f64>]) -> (f64, usize) {
    let pairs: Vec<(f64, f64)> = x
        .iter()
        .zip(y.iter())
        .filter_map(|(a, b)| match (a, b) {
            (Some(a), Some(b)) if a.is_finite() && b.is_finite() => Some((*a, *b)),
            _ => None,
        })
        .collect();

    let n = pairs.len();
    if n < 2 {
        return (f64::NAN, n);
    }

    let mean_x = pairs.iter().map(|(a, _)| a).sum::<f64>() / n as f64;
    let mean_y = pairs.iter().map(|(_, b)| b).sum::<f64>() / n as f64;

    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (a, b) in &pairs {
        let dx = a - mean_x;
        let dy = b - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return (f64::NAN, n);
    }

    let r = cov / (var_x.sqrt() * var_y.sqrt());
    (r.clamp(-1.0, 1.0), n)
}

/// Two-sided p-value for H0: no correlation, using Student's t with n - 2 dof.
pub fn correlation_p_value(r: f64, n: usize) -> f64 {
    if r.is_nan() || n < 3 {
        return f64::NAN;
    }
    if r.abs() >= 1.0 {
        return 0.0;
    }

    let dof = (n - 2) as f64;
    let t = r * (dof / (1.0 - r * r)).sqrt();
    match StudentsT::new(0.0, 1.0, dof) {
        Ok(dist) => 2.0 * (1.0 - dist.cdf(t.abs())),
        Err(_) => f64::NAN,
    }
}
