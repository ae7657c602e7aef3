//! Section Analysis Module
//! Precomputes the statistics behind the Demographic and Behavioral sections.

use crate::data::{
    AgeGroup, DerivedTable, IncomeLevel, PurchaseFrequency, AGE_COL, AGE_GROUP_COL, INCOME_COL,
    INCOME_LEVEL_COL, PURCHASE_FREQUENCY_COL, PURCHASE_FREQUENCY_SCORE_COL,
};
use crate::stats::{CategoryCounts, CorrelationMatrix, GroupStats, Histogram, StatsCalculator};
use polars::prelude::*;

pub const GENDER_COL: &str = "gender";
pub const EDUCATION_COL: &str = "education";
pub const PURCHASE_AMOUNT_COL: &str = "purchase_amount";

/// Optional columns feed individual charts; a missing one hides that chart only.
fn optional<T>(what: &str, result: PolarsResult<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("skipping {}: {}", what, e);
            None
        }
    }
}

/// Demographic Analysis section data.
#[derive(Debug, Clone)]
pub struct DemographicStats {
    pub age_histogram: Histogram,
    pub income_histogram: Histogram,
    pub gender_counts: Option<CategoryCounts>,
    pub income_by_education: Option<Vec<GroupStats>>,
    pub age_group_counts: CategoryCounts,
    pub income_level_counts: CategoryCounts,
}

impl DemographicStats {
    pub fn compute(table: &DerivedTable, bins: usize) -> PolarsResult<Self> {
        let df = &table.df;
        let ages = StatsCalculator::column_values(df, AGE_COL)?;
        let incomes = StatsCalculator::column_values(df, INCOME_COL)?;

        Ok(Self {
            age_histogram: StatsCalculator::histogram(&ages, bins),
            income_histogram: StatsCalculator::histogram(&incomes, bins),
            gender_counts: optional(
                "gender distribution",
                StatsCalculator::category_counts(df, GENDER_COL, &[]),
            ),
            income_by_education: optional(
                "income by education",
                StatsCalculator::grouped_stats(df, EDUCATION_COL, INCOME_COL, &[]),
            ),
            age_group_counts: StatsCalculator::category_counts(
                df,
                AGE_GROUP_COL,
                &AgeGroup::labels(),
            )?,
            income_level_counts: StatsCalculator::category_counts(
                df,
                INCOME_LEVEL_COL,
                &IncomeLevel::labels(),
            )?,
        })
    }
}

/// Behavioral Analysis section data.
#[derive(Debug, Clone)]
pub struct BehavioralStats {
    pub amount_by_frequency: Option<Vec<GroupStats>>,
    pub score_by_age_group: Vec<GroupStats>,
    pub correlation: CorrelationMatrix,
}

impl BehavioralStats {
    pub fn compute(table: &DerivedTable) -> PolarsResult<Self> {
        let df = &table.df;

        Ok(Self {
            amount_by_frequency: optional(
                "purchase amount by frequency",
                StatsCalculator::grouped_stats(
                    df,
                    PURCHASE_FREQUENCY_COL,
                    PURCHASE_AMOUNT_COL,
                    &PurchaseFrequency::labels(),
                ),
            ),
            score_by_age_group: StatsCalculator::grouped_stats(
                df,
                AGE_GROUP_COL,
                PURCHASE_FREQUENCY_SCORE_COL,
                &AgeGroup::labels(),
            )?,
            correlation: CorrelationMatrix::compute(df)?,
        })
    }
}
