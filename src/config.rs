//! Application Configuration
//! Compile-time defaults for the dashboard. There is no runtime configuration surface.

use std::path::PathBuf;

/// Dataset location, relative to the working directory.
pub const DEFAULT_DATA_PATH: &str = "customer_data.csv";

/// Bin count used for the age and income histograms.
pub const DEFAULT_HISTOGRAM_BINS: usize = 30;

/// Dashboard settings.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_path: PathBuf,
    pub histogram_bins: usize,
    pub window_title: String,
    pub window_size: [f32; 2],
    pub min_window_size: [f32; 2],
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
            window_title: "Customer Behavior Analysis".to_string(),
            window_size: [1400.0, 850.0],
            min_window_size: [1000.0, 650.0],
        }
    }
}
