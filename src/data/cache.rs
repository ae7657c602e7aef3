//! Dataset Cache Module
//! Memoizes the loaded and augmented customer table per source path.

use crate::data::features::{DeriveError, DerivedTable, FeatureDeriver};
use crate::data::loader::{DataLoader, LoaderError};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Load(#[from] LoaderError),
    #[error("Error preparing data: {0}")]
    Derive(#[from] DeriveError),
}

/// Run the full pipeline: load the CSV, then derive features.
pub fn load_dataset(path: &Path) -> Result<DerivedTable, PipelineError> {
    let df = DataLoader::load_csv(path)?;
    Ok(FeatureDeriver::derive(&df)?)
}

/// Cache of augmented tables keyed by source path.
///
/// Entries live until `invalidate` or `reload` is called. Failed loads are
/// not stored, so the next `get_or_load` reads the source again.
#[derive(Default)]
pub struct DatasetCache {
    entries: HashMap<PathBuf, Arc<DerivedTable>>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached table for `path`, loading it on first use.
    pub fn get_or_load(&mut self, path: &Path) -> Result<Arc<DerivedTable>, PipelineError> {
        if let Some(table) = self.entries.get(path) {
            log::debug!("cache hit for {}", path.display());
            return Ok(Arc::clone(table));
        }

        log::debug!("cache miss for {}", path.display());
        let table = Arc::new(load_dataset(path)?);
        self.entries.insert(path.to_path_buf(), Arc::clone(&table));
        Ok(table)
    }

    /// Drop the entry for `path` and load it again.
    pub fn reload(&mut self, path: &Path) -> Result<Arc<DerivedTable>, PipelineError> {
        self.invalidate(path);
        self.get_or_load(path)
    }

    pub fn invalidate(&mut self, path: &Path) -> bool {
        self.entries.remove(path).is_some()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.entries.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const HEADER: &str =
        "age,gender,income,education,purchase_frequency,purchase_amount,satisfaction\n";

    fn write_dataset(path: &Path, rows: &[&str]) {
        let mut contents = HEADER.to_string();
        for row in rows {
            contents.push_str(row);
            contents.push('\n');
        }
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn second_lookup_shares_cached_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("customer_data.csv");
        write_dataset(&path, &["25,Male,40000,Bachelor,rare,120.5,3"]);

        let mut cache = DatasetCache::new();
        let first = cache.get_or_load(&path).unwrap();
        let second = cache.get_or_load(&path).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
        assert_eq!(first.df.width(), 10);
    }

    #[test]
    fn cached_table_ignores_source_changes_until_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("customer_data.csv");
        write_dataset(&path, &["25,Male,40000,Bachelor,rare,120.5,3"]);

        let mut cache = DatasetCache::new();
        assert_eq!(cache.get_or_load(&path).unwrap().df.height(), 1);

        write_dataset(
            &path,
            &[
                "25,Male,40000,Bachelor,rare,120.5,3",
                "61,Female,90000,PhD,frequent,300.0,5",
            ],
        );
        assert_eq!(cache.get_or_load(&path).unwrap().df.height(), 1);
        assert_eq!(cache.reload(&path).unwrap().df.height(), 2);
    }

    #[test]
    fn failures_are_not_cached() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("customer_data.csv");

        let mut cache = DatasetCache::new();
        let err = cache.get_or_load(&path).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Load(LoaderError::SourceNotFound { .. })
        ));
        assert!(!cache.contains(&path));

        write_dataset(&path, &["40,Female,60000,Master,occasional,200.0,4"]);
        assert!(cache.get_or_load(&path).is_ok());
        assert!(cache.contains(&path));
    }

    #[test]
    fn missing_required_column_halts_pipeline() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("customer_data.csv");
        fs::write(&path, "age,gender\n25,Male\n").unwrap();

        let err = load_dataset(&path).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Derive(DeriveError::MissingColumn(_))
        ));
    }

    #[test]
    fn invalidate_removes_entry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("customer_data.csv");
        write_dataset(&path, &["25,Male,40000,Bachelor,rare,120.5,3"]);

        let mut cache = DatasetCache::new();
        cache.get_or_load(&path).unwrap();
        assert!(cache.invalidate(&path));
        assert!(!cache.invalidate(&path));
        assert!(cache.is_empty());
    }
}
