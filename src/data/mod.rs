//! Data module - CSV loading, feature derivation and caching

mod cache;
mod features;
mod loader;

pub use cache::{load_dataset, DatasetCache, PipelineError};
pub use features::{
    AgeGroup, DataQualityReport, DeriveError, DerivedTable, FeatureDeriver, IncomeBins,
    IncomeLevel, PurchaseFrequency, AGE_COL, AGE_GROUP_COL, INCOME_COL, INCOME_LEVEL_COL,
    PURCHASE_FREQUENCY_COL, PURCHASE_FREQUENCY_SCORE_COL,
};
pub use loader::{is_numeric_dtype, DataLoader, LoaderError};
