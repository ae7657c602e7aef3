//! Dashboard Module
//! Section selection, precomputed section data and exports.

use crate::charts::StaticChartRenderer;
use crate::data::DerivedTable;
use crate::stats::{BehavioralStats, DemographicStats, OverviewReport};
use anyhow::Context;
use polars::prelude::PolarsResult;
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// The four views offered by the section selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Section {
    #[default]
    DataOverview,
    DemographicAnalysis,
    BehavioralAnalysis,
    Recommendations,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::DataOverview,
        Section::DemographicAnalysis,
        Section::BehavioralAnalysis,
        Section::Recommendations,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Section::DataOverview => "Data Overview",
            Section::DemographicAnalysis => "Demographic Analysis",
            Section::BehavioralAnalysis => "Behavioral Analysis",
            Section::Recommendations => "Recommendations",
        }
    }
}

/// Augmented table plus the statistics every section renders.
///
/// Built once per load; sections only read from it.
pub struct DashboardData {
    pub table: Arc<DerivedTable>,
    pub overview: OverviewReport,
    pub demographics: DemographicStats,
    pub behavior: BehavioralStats,
}

impl DashboardData {
    pub fn build(table: Arc<DerivedTable>, histogram_bins: usize) -> PolarsResult<Self> {
        let overview = OverviewReport::build(&table)?;
        let demographics = DemographicStats::compute(&table, histogram_bins)?;
        let behavior = BehavioralStats::compute(&table)?;

        Ok(Self {
            table,
            overview,
            demographics,
            behavior,
        })
    }

    /// Write the overview report as pretty JSON.
    pub fn export_summary(&self, path: &Path) -> anyhow::Result<()> {
        let json = self
            .overview
            .to_json()
            .context("failed to serialize overview report")?;
        fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
        log::info!("summary written to {}", path.display());
        Ok(())
    }

    /// Render the correlation heatmap to PNG.
    pub fn export_heatmap(&self, path: &Path) -> anyhow::Result<()> {
        StaticChartRenderer::render_heatmap_png(&self.behavior.correlation, path, 1200, 1000)
            .with_context(|| format!("failed to render heatmap to {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::load_dataset;
    use pretty_assertions::assert_eq;

    const DATASET: &str = "\
age,gender,income,education,purchase_frequency,purchase_amount,satisfaction
25,Male,40000,Bachelor,frequent,320.0,3
34,Female,52000,Master,occasional,210.5,4
47,Female,88000,PhD,rare,150.0,2
63,Male,61000,Bachelor,rare,90.0,5
19,Female,23000,High School,frequent,280.0,4
";

    fn dashboard(dir: &Path) -> DashboardData {
        let path = dir.join("customer_data.csv");
        fs::write(&path, DATASET).unwrap();
        let table = Arc::new(load_dataset(&path).unwrap());
        DashboardData::build(table, 30).unwrap()
    }

    #[test]
    fn sections_in_selector_order() {
        let titles: Vec<&str> = Section::ALL.iter().map(|s| s.title()).collect();
        assert_eq!(
            titles,
            vec![
                "Data Overview",
                "Demographic Analysis",
                "Behavioral Analysis",
                "Recommendations",
            ]
        );
        assert_eq!(Section::default(), Section::DataOverview);
    }

    #[test]
    fn builds_every_section_from_one_load() {
        let dir = tempfile::tempdir().unwrap();
        let data = dashboard(dir.path());

        assert_eq!((data.overview.rows, data.overview.columns), (5, 10));
        assert_eq!(data.demographics.age_histogram.total(), 5);
        assert_eq!(data.demographics.income_by_education.as_ref().unwrap().len(), 4);
        assert_eq!(data.behavior.amount_by_frequency.as_ref().unwrap().len(), 3);
        assert_eq!(
            data.behavior.correlation.columns,
            vec![
                "age",
                "income",
                "purchase_amount",
                "satisfaction",
                "purchase_frequency_score",
            ]
        );
    }

    #[test]
    fn exports_summary_json() {
        let dir = tempfile::tempdir().unwrap();
        let data = dashboard(dir.path());
        let out = dir.path().join("summary.json");

        data.export_summary(&out).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(value["rows"], 5);
        assert_eq!(value["column_summaries"].as_array().unwrap().len(), 10);
    }
}
