//! Stats module - Descriptive statistics and section analyses

mod analysis;
mod calculator;
mod correlation;
mod overview;

pub use analysis::{BehavioralStats, DemographicStats};
pub use calculator::{CategoryCounts, GroupStats, Histogram, StatsCalculator};
pub use correlation::{CorrelationMatrix, SIGNIFICANCE_THRESHOLD};
pub use overview::{Describe, OverviewReport};
