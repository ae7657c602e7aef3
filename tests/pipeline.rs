use customer_insights::dashboard::DashboardData;
use customer_insights::data::{
    DatasetCache, FeatureDeriver, LoaderError, PipelineError, AGE_GROUP_COL, INCOME_LEVEL_COL,
    PURCHASE_FREQUENCY_SCORE_COL,
};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;

const DATASET: &str = "\
age,gender,income,education,purchase_frequency,purchase_amount,satisfaction
30,Male,10,Bachelor,rare,120.0,3
31,Female,20,Master,occasional,180.0,4
60,Female,30,PhD,frequent,260.0,2
61,Male,100,Bachelor,unknown_value,90.0,5
17,Female,25,High School,frequent,300.0,4
101,Male,50,Master,rare,75.0,1
";

fn write(dir: &Path, contents: &str) -> std::path::PathBuf {
    let path = dir.join("customer_data.csv");
    fs::write(&path, contents).unwrap();
    path
}

fn strings(table: &polars::prelude::DataFrame, name: &str) -> Vec<Option<String>> {
    table
        .column(name)
        .unwrap()
        .str()
        .unwrap()
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect()
}

#[test]
fn csv_to_augmented_table() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), DATASET);

    let mut cache = DatasetCache::new();
    let table = cache.get_or_load(&path).unwrap();

    assert_eq!(table.df.shape(), (6, 10));
    assert_eq!(
        strings(&table.df, AGE_GROUP_COL),
        vec![
            Some("18-30".to_string()),
            Some("31-45".to_string()),
            Some("46-60".to_string()),
            Some("60+".to_string()),
            None,
            None,
        ]
    );

    // Edges over [10, 100]: [10, 40), [40, 70), [70, 100].
    assert_eq!(table.income_bins.unwrap().edges, [10.0, 40.0, 70.0, 100.0]);
    assert_eq!(
        strings(&table.df, INCOME_LEVEL_COL),
        vec![
            Some("Low".to_string()),
            Some("Low".to_string()),
            Some("Low".to_string()),
            Some("High".to_string()),
            Some("Low".to_string()),
            Some("Medium".to_string()),
        ]
    );

    let scores: Vec<Option<i32>> = table
        .df
        .column(PURCHASE_FREQUENCY_SCORE_COL)
        .unwrap()
        .i32()
        .unwrap()
        .into_iter()
        .collect();
    assert_eq!(scores, vec![Some(1), Some(2), Some(3), None, Some(3), Some(1)]);

    assert_eq!(table.quality.unbucketed_ages, 2);
    assert_eq!(table.quality.unknown_frequencies, 1);
}

#[test]
fn deriving_the_output_again_overwrites() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), DATASET);

    let mut cache = DatasetCache::new();
    let table = cache.get_or_load(&path).unwrap();
    let again = FeatureDeriver::derive(&table.df).unwrap();

    assert_eq!(again.df.shape(), table.df.shape());
    assert!(again.df.equals_missing(&table.df));
}

#[test]
fn missing_source_halts_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("customer_data.csv");

    let mut cache = DatasetCache::new();
    let err = cache.get_or_load(&path).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Load(LoaderError::SourceNotFound { .. })
    ));
}

#[test]
fn malformed_row_halts_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(
        dir.path(),
        "age,gender,income,education,purchase_frequency,purchase_amount,satisfaction\n\
         30,Male,10,Bachelor,rare,120.0,3\n\
         31,Female,20,Master,occasional,180.0,4,oops,more\n",
    );

    let mut cache = DatasetCache::new();
    let err = cache.get_or_load(&path).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Load(LoaderError::SourceLoadError { .. })
    ));
}

#[test]
fn dashboard_sections_share_the_cached_table() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), DATASET);

    let mut cache = DatasetCache::new();
    let table = cache.get_or_load(&path).unwrap();
    let data = DashboardData::build(table.clone(), 10).unwrap();

    assert!(std::sync::Arc::ptr_eq(&data.table, &table));
    assert_eq!(data.overview.quality.empty_age_groups, Vec::<String>::new());
    assert_eq!(data.demographics.income_histogram.counts.len(), 10);
}
