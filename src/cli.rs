//! Command line parsing and logging setup.

use crate::config::{DashboardConfig, DEFAULT_DATA_PATH};
use crate::data::DEFAULT_TOP_ARTICLES;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ecommerce-dashboard", version, about = "E-commerce transaction dashboard")]
pub struct Cli {
    /// Transaction CSV to load
    #[arg(long, env = "DASHBOARD_DATA", default_value = DEFAULT_DATA_PATH)]
    pub data: PathBuf,

    /// Number of articles in the top-revenue ranking
    #[arg(long, default_value_t = DEFAULT_TOP_ARTICLES)]
    pub top: usize,

    /// Log filter (e.g. `debug`, `ecommerce_dashboard=trace`); overrides RUST_LOG
    #[arg(long)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Open the interactive dashboard (default)
    Dashboard,
    /// Print the sorted country list as JSON
    Countries,
    /// Print the aggregates of one country as JSON
    Report {
        #[arg(long)]
        country: String,
        /// Also print the quantity series of this article
        #[arg(long)]
        product: Option<String>,
    },
}

impl Cli {
    pub fn config(&self) -> DashboardConfig {
        DashboardConfig {
            data_path: self.data.clone(),
            top_articles: self.top,
        }
    }

    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Dashboard)
    }
}

/// Initialize `env_logger`: `RUST_LOG` first, `--log-level` on top, `info`
/// when neither is set.
pub fn init_logging(log_level: Option<&str>) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if let Some(filters) = log_level {
        builder.parse_filters(filters);
    }
    // A second initialization (tests) is harmless.
    let _ = builder.try_init();
}
