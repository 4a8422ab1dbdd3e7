//! Dashboard Main Application
//! Main window with control panel and chart viewer. Holds the selection state
//! and re-queries the store whenever it changes.

use crate::charts::{CountryView, ProductSeries};
use crate::config::DashboardConfig;
use crate::data::TransactionStore;
use crate::gui::{ChartViewer, ChartViewerAction, ControlPanel, ControlPanelAction};
use egui::SidePanel;
use log::{error, info};

/// Main application window.
pub struct DashboardApp {
    store: TransactionStore,
    config: DashboardConfig,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
}

impl DashboardApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        store: TransactionStore,
        config: DashboardConfig,
    ) -> Self {
        let mut app = Self {
            store,
            control_panel: ControlPanel::new(),
            chart_viewer: ChartViewer::new(),
            config,
        };
        app.control_panel.data_path = Some(app.config.data_path.clone());
        app.reset_selection();
        app
    }

    /// Start over from the store's country list, e.g. after loading a file.
    fn reset_selection(&mut self) {
        self.chart_viewer.clear();
        self.control_panel
            .set_status(&self.store.report().to_string());

        match self.store.list_countries() {
            Ok(countries) => {
                self.control_panel.update_countries(countries);
                self.handle_country_changed();
            }
            Err(e) => {
                error!("Listing countries failed: {}", e);
                self.control_panel.update_countries(Vec::new());
                self.chart_viewer.set_error(e.to_string());
            }
        }
    }

    /// Re-query every country-level aggregate.
    fn handle_country_changed(&mut self) {
        let Some(country) = self.control_panel.selected_country.clone() else {
            self.chart_viewer.clear();
            return;
        };

        match CountryView::query(&self.store, &country, self.config.top_articles) {
            Ok(view) => {
                self.chart_viewer.set_country_view(view);
                self.handle_product_changed();
            }
            Err(e) => {
                error!("Querying {} failed: {}", country, e);
                self.chart_viewer.clear();
                self.chart_viewer.set_error(e.to_string());
            }
        }
    }

    /// Re-query both quantity series for the selected article.
    fn handle_product_changed(&mut self) {
        let (Some(country), Some(product)) = (
            self.control_panel.selected_country.clone(),
            self.chart_viewer.selected_product.clone(),
        ) else {
            return;
        };

        match ProductSeries::query(&self.store, &country, &product) {
            Ok(series) => self.chart_viewer.set_series(series),
            Err(e) => {
                error!("Querying {} in {} failed: {}", product, country, e);
                self.chart_viewer.set_error(e.to_string());
            }
        }
    }

    /// Load another CSV. The old store is kept if the new one fails to load.
    fn handle_browse_csv(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        else {
            return;
        };

        match TransactionStore::load(&path) {
            Ok(store) => {
                info!("Switched data source to {}", path.display());
                self.store = store;
                self.config.data_path = path.clone();
                self.control_panel.data_path = Some(path);
                self.reset_selection();
            }
            Err(e) => {
                error!("Loading {} failed: {}", path.display(), e);
                self.control_panel.set_status(&format!("Error: {}", e));
            }
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(260.0)
            .max_width(320.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    match self.control_panel.show(ui) {
                        ControlPanelAction::BrowseCsv => self.handle_browse_csv(),
                        ControlPanelAction::CountryChanged => self.handle_country_changed(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Chart Viewer
        egui::CentralPanel::default().show(ctx, |ui| {
            if self.chart_viewer.show(ui) == ChartViewerAction::ProductChanged {
                self.handle_product_changed();
            }
        });
    }
}
