//! Customer Insights - Customer Behavior Analysis Dashboard
//!
//! Loads a customer dataset, derives age, income and purchase-frequency
//! features, and shows descriptive statistics and charts per section.

pub mod charts;
pub mod config;
pub mod dashboard;
pub mod data;
pub mod gui;
pub mod stats;
