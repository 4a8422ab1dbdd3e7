//! Chart Viewer Widget
//! Central panel: top articles, revenue share and the article time series for
//! the selected country.

use crate::charts::{ChartPlotter, CountryView, ProductSeries};
use egui::{Color32, ComboBox, RichText, ScrollArea};

/// Display data for the current selection. Replaced wholesale on every
/// selection change, never edited in place.
#[derive(Default)]
pub struct ChartViewer {
    pub country_view: Option<CountryView>,
    pub selected_product: Option<String>,
    pub series: Option<ProductSeries>,
    pub error: Option<String>,
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Show a new country; its first product becomes the selection.
    pub fn set_country_view(&mut self, view: CountryView) {
        self.selected_product = view.products.first().cloned();
        self.country_view = Some(view);
        self.series = None;
        self.error = None;
    }

    pub fn set_series(&mut self, series: ProductSeries) {
        self.series = Some(series);
    }

    pub fn set_error(&mut self, error: String) {
        self.error = Some(error);
    }

    /// Draw the chart viewer
    pub fn show(&mut self, ui: &mut egui::Ui) -> ChartViewerAction {
        let mut action = ChartViewerAction::None;

        ui.heading("Dashboard E-commerce");
        ui.add_space(5.0);

        if let Some(error) = &self.error {
            ui.label(
                RichText::new(format!("Error: {}", error)).color(Color32::from_rgb(220, 53, 69)),
            );
        }

        let Some(view) = &self.country_view else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(20.0));
            });
            return action;
        };

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.label(
                    RichText::new(format!("Top Articles in {}", view.country))
                        .size(18.0)
                        .strong(),
                );
                ui.add_space(8.0);

                ui.columns(2, |columns| {
                    ChartPlotter::draw_top_articles_chart(
                        &mut columns[0],
                        &view.country,
                        &view.top_articles,
                    );

                    match (&view.revenue_share, &view.revenue_share_error) {
                        (Some(share), _) => {
                            ChartPlotter::draw_revenue_share_table(&mut columns[1], share)
                        }
                        (None, Some(error)) => {
                            columns[1].label(RichText::new(error).color(Color32::GRAY));
                        }
                        (None, None) => {}
                    }
                });

                ui.add_space(15.0);
                ui.separator();
                ui.add_space(10.0);

                if view.products.is_empty() {
                    ui.label(
                        RichText::new("No articles sold in this country.")
                            .color(Color32::from_rgb(100, 149, 237)),
                    );
                    return;
                }

                ui.horizontal(|ui| {
                    ui.label("Select Article:");
                    ComboBox::from_id_salt("article")
                        .width(360.0)
                        .selected_text(self.selected_product.clone().unwrap_or_default())
                        .show_ui(ui, |ui| {
                            for product in &view.products {
                                let is_selected =
                                    self.selected_product.as_deref() == Some(product.as_str());
                                if ui.selectable_label(is_selected, product).clicked()
                                    && !is_selected
                                {
                                    self.selected_product = Some(product.clone());
                                    action = ChartViewerAction::ProductChanged;
                                }
                            }
                        });
                });

                ui.add_space(8.0);

                if let Some(series) = &self.series {
                    ui.label(
                        RichText::new(format!("Quantity Over Time: {}", series.product))
                            .size(13.0)
                            .strong(),
                    );
                    ChartPlotter::draw_quantity_series(ui, series);
                }
            });

        action
    }
}

/// Actions triggered by the chart viewer
#[derive(Debug, Clone, PartialEq)]
pub enum ChartViewerAction {
    None,
    ProductChanged,
}
