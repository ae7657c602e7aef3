//! Feature Deriver Module
//! Appends the derived customer features: age bucket, income tier and
//! purchase-frequency score.

use crate::data::loader::is_numeric_dtype;
use polars::prelude::*;
use serde::Serialize;
use thiserror::Error;

pub const AGE_COL: &str = "age";
pub const INCOME_COL: &str = "income";
pub const PURCHASE_FREQUENCY_COL: &str = "purchase_frequency";

pub const AGE_GROUP_COL: &str = "age_group";
pub const INCOME_LEVEL_COL: &str = "income_level";
pub const PURCHASE_FREQUENCY_SCORE_COL: &str = "purchase_frequency_score";

/// Number of columns the deriver appends.
pub const DERIVED_COLUMN_COUNT: usize = 3;

#[derive(Error, Debug)]
pub enum DeriveError {
    #[error("Required column '{0}' is missing")]
    MissingColumn(String),
    #[error("Column '{column}' has type {dtype}, expected {expected}")]
    InvalidColumnType {
        column: String,
        dtype: DataType,
        expected: &'static str,
    },
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// Age bucket. Buckets are closed on the right; the first one also includes 18.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AgeGroup {
    Young,
    Adult,
    MiddleAged,
    Senior,
}

impl AgeGroup {
    pub const ALL: [AgeGroup; 4] = [
        AgeGroup::Young,
        AgeGroup::Adult,
        AgeGroup::MiddleAged,
        AgeGroup::Senior,
    ];

    /// Bucket boundaries: [18,30], (30,45], (45,60], (60,100].
    pub const EDGES: [f64; 5] = [18.0, 30.0, 45.0, 60.0, 100.0];

    pub fn label(self) -> &'static str {
        match self {
            AgeGroup::Young => "18-30",
            AgeGroup::Adult => "31-45",
            AgeGroup::MiddleAged => "46-60",
            AgeGroup::Senior => "60+",
        }
    }

    pub fn labels() -> Vec<String> {
        Self::ALL.iter().map(|g| g.label().to_string()).collect()
    }

    /// Bucket an age. Values outside [18, 100] have no bucket.
    pub fn from_age(age: f64) -> Option<Self> {
        if age.is_nan() || age < Self::EDGES[0] || age > Self::EDGES[4] {
            return None;
        }
        Self::ALL
            .iter()
            .zip(Self::EDGES.iter().skip(1))
            .find(|(_, upper)| age <= **upper)
            .map(|(group, _)| *group)
    }
}

/// Income tier relative to the loaded dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum IncomeLevel {
    Low,
    Medium,
    High,
}

impl IncomeLevel {
    pub const ALL: [IncomeLevel; 3] = [IncomeLevel::Low, IncomeLevel::Medium, IncomeLevel::High];

    pub fn label(self) -> &'static str {
        match self {
            IncomeLevel::Low => "Low",
            IncomeLevel::Medium => "Medium",
            IncomeLevel::High => "High",
        }
    }

    pub fn labels() -> Vec<String> {
        Self::ALL.iter().map(|l| l.label().to_string()).collect()
    }
}

/// Equal-width income bucket edges computed from the observed income range.
///
/// `edges[0]..edges[3]` span the range; buckets are `[e0, e1)`, `[e1, e2)`
/// and `[e2, e3]`. Edges move with the data: a different dataset gives
/// different tiers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IncomeBins {
    pub edges: [f64; 4],
}

impl IncomeBins {
    /// Compute edges from the non-missing incomes. Returns None when there are none.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let (min, max) = values
            .iter()
            .filter(|v| v.is_finite())
            .fold(None, |acc: Option<(f64, f64)>, &v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })?;

        // A constant column gets a range widened by 0.1% so its values fall in the middle tier.
        let (min, max) = if min == max {
            let pad = if min == 0.0 { 0.001 } else { min.abs() * 0.001 };
            (min - pad, max + pad)
        } else {
            (min, max)
        };

        let width = (max - min) / 3.0;
        Some(Self {
            edges: [min, min + width, min + 2.0 * width, max],
        })
    }

    pub fn classify(&self, income: f64) -> Option<IncomeLevel> {
        let [lo, e1, e2, hi] = self.edges;
        if !income.is_finite() || income < lo || income > hi {
            None
        } else if income < e1 {
            Some(IncomeLevel::Low)
        } else if income < e2 {
            Some(IncomeLevel::Medium)
        } else {
            Some(IncomeLevel::High)
        }
    }
}

/// Purchase frequency vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PurchaseFrequency {
    Rare,
    Occasional,
    Frequent,
}

impl PurchaseFrequency {
    pub const ALL: [PurchaseFrequency; 3] = [
        PurchaseFrequency::Rare,
        PurchaseFrequency::Occasional,
        PurchaseFrequency::Frequent,
    ];

    /// Exact match against the vocabulary; anything else is unknown.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "rare" => Some(PurchaseFrequency::Rare),
            "occasional" => Some(PurchaseFrequency::Occasional),
            "frequent" => Some(PurchaseFrequency::Frequent),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PurchaseFrequency::Rare => "rare",
            PurchaseFrequency::Occasional => "occasional",
            PurchaseFrequency::Frequent => "frequent",
        }
    }

    pub fn labels() -> Vec<String> {
        Self::ALL.iter().map(|f| f.label().to_string()).collect()
    }

    pub fn score(self) -> i32 {
        match self {
            PurchaseFrequency::Rare => 1,
            PurchaseFrequency::Occasional => 2,
            PurchaseFrequency::Frequent => 3,
        }
    }
}

/// Rows the deriver could not classify. These stay in the table with missing
/// derived values.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DataQualityReport {
    /// Ages present but outside [18, 100].
    pub unbucketed_ages: usize,
    /// purchase_frequency values outside the vocabulary.
    pub unknown_frequencies: usize,
    /// Age buckets without any rows.
    pub empty_age_groups: Vec<String>,
}

impl DataQualityReport {
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.unbucketed_ages > 0 {
            warnings.push(format!(
                "{} rows have an age outside 18-100 and no age group",
                self.unbucketed_ages
            ));
        }
        if self.unknown_frequencies > 0 {
            warnings.push(format!(
                "{} rows have an unknown purchase frequency and no score",
                self.unknown_frequencies
            ));
        }
        for group in &self.empty_age_groups {
            warnings.push(format!("No data for {}", group));
        }
        warnings
    }
}

/// Augmented table plus what was learned while deriving it.
#[derive(Debug, Clone)]
pub struct DerivedTable {
    pub df: DataFrame,
    pub income_bins: Option<IncomeBins>,
    pub quality: DataQualityReport,
}

/// Computes derived feature columns.
pub struct FeatureDeriver;

impl FeatureDeriver {
    /// Append `age_group`, `income_level` and `purchase_frequency_score`.
    ///
    /// Existing derived columns are overwritten in place, so running this on
    /// its own output changes nothing.
    pub fn derive(df: &DataFrame) -> Result<DerivedTable, DeriveError> {
        let ages = Self::numeric_values(df, AGE_COL)?;
        let incomes = Self::numeric_values(df, INCOME_COL)?;
        let frequencies = Self::string_values(df, PURCHASE_FREQUENCY_COL)?;

        let mut quality = DataQualityReport::default();

        let age_groups: Vec<Option<AgeGroup>> = ages
            .iter()
            .map(|age| age.and_then(AgeGroup::from_age))
            .collect();
        quality.unbucketed_ages = ages
            .iter()
            .zip(age_groups.iter())
            .filter(|(age, group)| age.is_some() && group.is_none())
            .count();
        quality.empty_age_groups = AgeGroup::ALL
            .iter()
            .filter(|g| !age_groups.contains(&Some(**g)))
            .map(|g| g.label().to_string())
            .collect();

        let observed: Vec<f64> = incomes.iter().flatten().copied().collect();
        let income_bins = IncomeBins::from_values(&observed);
        match &income_bins {
            Some(bins) => log::debug!("income bucket edges: {:?}", bins.edges),
            None => log::warn!("no income values, income levels left missing"),
        }
        let income_levels: Vec<Option<&str>> = incomes
            .iter()
            .map(|income| {
                let bins = income_bins.as_ref()?;
                bins.classify((*income)?).map(IncomeLevel::label)
            })
            .collect();

        let scores: Vec<Option<i32>> = frequencies
            .iter()
            .map(|f| f.as_deref().and_then(PurchaseFrequency::parse).map(PurchaseFrequency::score))
            .collect();
        quality.unknown_frequencies = frequencies
            .iter()
            .zip(scores.iter())
            .filter(|(f, score)| f.is_some() && score.is_none())
            .count();

        for warning in quality.warnings() {
            log::warn!("{}", warning);
        }

        let age_labels: Vec<Option<&str>> = age_groups
            .iter()
            .map(|g| g.map(AgeGroup::label))
            .collect();

        let mut out = df.clone();
        out.with_column(Column::new(AGE_GROUP_COL.into(), age_labels))?;
        out.with_column(Column::new(INCOME_LEVEL_COL.into(), income_levels))?;
        out.with_column(Column::new(PURCHASE_FREQUENCY_SCORE_COL.into(), scores))?;

        Ok(DerivedTable {
            df: out,
            income_bins,
            quality,
        })
    }

    fn required_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column, DeriveError> {
        df.column(name)
            .map_err(|_| DeriveError::MissingColumn(name.to_string()))
    }

    fn numeric_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>, DeriveError> {
        let column = Self::required_column(df, name)?;
        if !is_numeric_dtype(column.dtype()) {
            return Err(DeriveError::InvalidColumnType {
                column: name.to_string(),
                dtype: column.dtype().clone(),
                expected: "numeric",
            });
        }
        let as_f64 = column.cast(&DataType::Float64)?;
        Ok(as_f64.f64()?.into_iter().collect())
    }

    fn string_values(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>, DeriveError> {
        let column = Self::required_column(df, name)?;
        match column.dtype() {
            DataType::String => {}
            // A column with no values at all is inferred as Null; treat it as all missing.
            DataType::Null => return Ok(vec![None; column.len()]),
            other => {
                return Err(DeriveError::InvalidColumnType {
                    column: name.to_string(),
                    dtype: other.clone(),
                    expected: "string",
                })
            }
        }
        Ok(column
            .str()?
            .into_iter()
            .map(|v| v.map(str::to_string))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn customers(ages: &[i64], incomes: &[f64], frequencies: &[&str]) -> DataFrame {
        DataFrame::new(vec![
            Column::new("age".into(), ages.to_vec()),
            Column::new("gender".into(), vec!["Female"; ages.len()]),
            Column::new("income".into(), incomes.to_vec()),
            Column::new("purchase_frequency".into(), frequencies.to_vec()),
        ])
        .unwrap()
    }

    fn strings(df: &DataFrame, name: &str) -> Vec<Option<String>> {
        df.column(name)
            .unwrap()
            .str()
            .unwrap()
            .into_iter()
            .map(|v| v.map(str::to_string))
            .collect()
    }

    fn some(s: &str) -> Option<String> {
        Some(s.to_string())
    }

    #[test]
    fn adds_three_columns_and_keeps_rows() {
        let df = customers(&[25, 40, 70], &[1.0, 2.0, 3.0], &["rare", "frequent", "x"]);
        let derived = FeatureDeriver::derive(&df).unwrap();

        assert_eq!(derived.df.width(), df.width() + DERIVED_COLUMN_COUNT);
        assert_eq!(derived.df.height(), df.height());
    }

    #[test]
    fn age_boundaries_belong_to_lower_bucket() {
        let df = customers(
            &[18, 30, 31, 45, 46, 60, 61, 100, 17, 101],
            &[1.0; 10],
            &["rare"; 10],
        );
        let derived = FeatureDeriver::derive(&df).unwrap();

        assert_eq!(
            strings(&derived.df, AGE_GROUP_COL),
            vec![
                some("18-30"),
                some("18-30"),
                some("31-45"),
                some("31-45"),
                some("46-60"),
                some("46-60"),
                some("60+"),
                some("60+"),
                None,
                None,
            ]
        );
        assert_eq!(derived.quality.unbucketed_ages, 2);
        assert!(derived.quality.empty_age_groups.is_empty());
    }

    #[test]
    fn frequency_scores_tolerate_unknown_values() {
        let df = customers(
            &[20, 20, 20, 20],
            &[1.0, 2.0, 3.0, 4.0],
            &["rare", "occasional", "frequent", "unknown_value"],
        );
        let derived = FeatureDeriver::derive(&df).unwrap();

        let scores: Vec<Option<i32>> = derived
            .df
            .column(PURCHASE_FREQUENCY_SCORE_COL)
            .unwrap()
            .i32()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(scores, vec![Some(1), Some(2), Some(3), None]);
        assert_eq!(derived.quality.unknown_frequencies, 1);
    }

    #[test]
    fn income_levels_use_observed_range() {
        let bins = IncomeBins::from_values(&[10.0, 20.0, 30.0, 100.0]).unwrap();
        assert_eq!(bins.edges, [10.0, 40.0, 70.0, 100.0]);

        assert_eq!(bins.classify(25.0), Some(IncomeLevel::Low));
        assert_eq!(bins.classify(40.0), Some(IncomeLevel::Medium));
        assert_eq!(bins.classify(50.0), Some(IncomeLevel::Medium));
        assert_eq!(bins.classify(70.0), Some(IncomeLevel::High));
        assert_eq!(bins.classify(90.0), Some(IncomeLevel::High));
        assert_eq!(bins.classify(100.0), Some(IncomeLevel::High));
        assert_eq!(bins.classify(9.0), None);

        let df = customers(&[20; 4], &[10.0, 20.0, 30.0, 100.0], &["rare"; 4]);
        let derived = FeatureDeriver::derive(&df).unwrap();
        assert_eq!(
            strings(&derived.df, INCOME_LEVEL_COL),
            vec![some("Low"), some("Low"), some("Low"), some("High")]
        );
    }

    #[test]
    fn income_edges_change_with_dataset() {
        let first = IncomeBins::from_values(&[10.0, 100.0]).unwrap();
        let second = IncomeBins::from_values(&[10.0, 400.0]).unwrap();
        assert!(first.edges != second.edges);

        // 90 is High in the first dataset but Low in the second.
        assert_eq!(first.classify(90.0), Some(IncomeLevel::High));
        assert_eq!(second.classify(90.0), Some(IncomeLevel::Low));
    }

    #[test]
    fn constant_income_lands_in_medium() {
        let bins = IncomeBins::from_values(&[500.0, 500.0]).unwrap();
        assert_eq!(bins.classify(500.0), Some(IncomeLevel::Medium));
        assert_eq!(IncomeBins::from_values(&[]), None);
    }

    #[test]
    fn rerun_overwrites_derived_columns() {
        let df = customers(&[25, 50, 80], &[10.0, 55.0, 100.0], &["rare", "occasional", "?"]);
        let once = FeatureDeriver::derive(&df).unwrap();
        let twice = FeatureDeriver::derive(&once.df).unwrap();

        assert_eq!(twice.df.width(), once.df.width());
        assert_eq!(twice.df.height(), once.df.height());
        assert!(twice.df.equals_missing(&once.df));
        assert_eq!(twice.income_bins, once.income_bins);
    }

    #[test]
    fn missing_required_column_fails() {
        let df = DataFrame::new(vec![
            Column::new("age".into(), vec![20i64]),
            Column::new("purchase_frequency".into(), vec!["rare"]),
        ])
        .unwrap();

        let err = FeatureDeriver::derive(&df).unwrap_err();
        assert!(matches!(err, DeriveError::MissingColumn(ref c) if c == "income"));
    }

    #[test]
    fn non_numeric_age_fails() {
        let df = DataFrame::new(vec![
            Column::new("age".into(), vec!["twenty"]),
            Column::new("income".into(), vec![1.0]),
            Column::new("purchase_frequency".into(), vec!["rare"]),
        ])
        .unwrap();

        let err = FeatureDeriver::derive(&df).unwrap_err();
        assert!(matches!(err, DeriveError::InvalidColumnType { ref column, .. } if column == "age"));
    }

    #[test]
    fn empty_age_groups_are_reported() {
        let df = customers(&[20, 35], &[1.0, 2.0], &["rare", "rare"]);
        let derived = FeatureDeriver::derive(&df).unwrap();

        assert_eq!(derived.quality.empty_age_groups, vec!["46-60", "60+"]);
        assert!(derived
            .quality
            .warnings()
            .contains(&"No data for 60+".to_string()));
    }
}
