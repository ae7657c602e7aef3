//! CSV Data Loader Module
//! Reads the customer dataset into a Polars DataFrame.

use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Error: '{}' not found. Please ensure the file is in the project directory.", .path.display())]
    SourceNotFound { path: PathBuf },
    #[error("Error loading data from '{}': {source}", .path.display())]
    SourceLoadError {
        path: PathBuf,
        #[source]
        source: PolarsError,
    },
}

/// Loads CSV files with Polars.
pub struct DataLoader;

impl DataLoader {
    /// Load a CSV file with a header row.
    ///
    /// Parse errors are never ignored: a malformed row fails the whole load.
    pub fn load_csv(path: &Path) -> Result<DataFrame, LoaderError> {
        if !path.exists() {
            log::error!("data source {} does not exist", path.display());
            return Err(LoaderError::SourceNotFound {
                path: path.to_path_buf(),
            });
        }

        let result = LazyCsvReader::new(path)
            .with_has_header(true)
            .with_infer_schema_length(Some(10000))
            .with_ignore_errors(false)
            .finish()
            .and_then(|lazy| lazy.collect());

        match result {
            Ok(df) => {
                log::info!(
                    "loaded {} rows, {} columns from {}",
                    df.height(),
                    df.width(),
                    path.display()
                );
                Ok(df)
            }
            Err(PolarsError::IO { error, .. }) if error.kind() == std::io::ErrorKind::NotFound => {
                log::error!("data source {} vanished while reading", path.display());
                Err(LoaderError::SourceNotFound {
                    path: path.to_path_buf(),
                })
            }
            Err(source) => {
                log::error!("failed to parse {}: {}", path.display(), source);
                Err(LoaderError::SourceLoadError {
                    path: path.to_path_buf(),
                    source,
                })
            }
        }
    }

    /// Get list of column names.
    pub fn get_columns(df: &DataFrame) -> Vec<String> {
        df.get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    /// Get list of numeric column names.
    pub fn get_numeric_columns(df: &DataFrame) -> Vec<String> {
        df.get_columns()
            .iter()
            .filter(|col| is_numeric_dtype(col.dtype()))
            .map(|col| col.name().to_string())
            .collect()
    }
}

/// Whether a column of this type takes part in numeric statistics.
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Float32
            | DataType::Float64
            | DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
    )
}
