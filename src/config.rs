//! Runtime configuration shared by the dashboard and the report commands.

use crate::data::DEFAULT_TOP_ARTICLES;
use std::path::PathBuf;

/// Default location of the transaction log.
pub const DEFAULT_DATA_PATH: &str = "data/data.csv";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    /// Transaction CSV the store is built from.
    pub data_path: PathBuf,
    /// Row limit of the top-articles chart.
    pub top_articles: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            top_articles: DEFAULT_TOP_ARTICLES,
        }
    }
}
