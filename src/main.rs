//! E-commerce Dashboard - Transaction Analytics & Interactive Charts

use anyhow::{anyhow, Context};
use clap::Parser;
use ecommerce_dashboard::cli::{init_logging, Cli, Command};
use ecommerce_dashboard::data::TransactionStore;
use ecommerce_dashboard::gui::DashboardApp;
use ecommerce_dashboard::report;
use eframe::egui;
use std::io;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref());

    let config = cli.config();
    let store = TransactionStore::load(&config.data_path)
        .with_context(|| format!("loading {}", config.data_path.display()))?;

    match cli.command() {
        Command::Countries => report::write_countries(&store, &mut io::stdout().lock()),
        Command::Report { country, product } => report::write_report(
            &store,
            &config,
            &country,
            product.as_deref(),
            &mut io::stdout().lock(),
        ),
        Command::Dashboard => {
            // Configure native options
            let options = eframe::NativeOptions {
                viewport: egui::ViewportBuilder::default()
                    .with_inner_size([1400.0, 800.0])
                    .with_min_inner_size([1200.0, 700.0])
                    .with_title("E-commerce Dashboard"),
                ..Default::default()
            };

            // Run the application
            eframe::run_native(
                "E-commerce Dashboard",
                options,
                Box::new(move |cc| Ok(Box::new(DashboardApp::new(cc, store, config)))),
            )
            .map_err(|e| anyhow!("dashboard failed: {e}"))
        }
    }
}
