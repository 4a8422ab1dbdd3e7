//! Chart Plotter Module
//! Draws the dashboard charts and tables using egui_plot.

use crate::charts::framing::{date_to_x, short_label, x_to_date_label, LABEL_MAX_CHARS};
use crate::charts::ProductSeries;
use crate::data::{ArticleRevenue, DailyQuantity, RevenueShare};
use egui::{Color32, RichText};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, Points};

/// Selected country in the time series.
pub const COUNTRY_COLOR: Color32 = Color32::from_rgb(220, 53, 69); // Red
/// Rest of the world in the time series.
pub const GLOBAL_COLOR: Color32 = Color32::BLACK;
/// Revenue bars.
pub const BAR_COLOR: Color32 = Color32::from_rgb(52, 152, 219); // Blue

const TOP_ARTICLES_HEIGHT: f32 = 350.0;
const SERIES_HEIGHT: f32 = 350.0;

/// Creates the dashboard charts using egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Horizontal bar chart of article revenue, largest at the top.
    /// Y-axis: article (first 40 characters), X-axis: revenue
    pub fn draw_top_articles_chart(ui: &mut egui::Ui, country: &str, articles: &[ArticleRevenue]) {
        if articles.is_empty() {
            ui.label(RichText::new("No sales recorded for this country.").color(Color32::GRAY));
            return;
        }

        let n = articles.len();
        // Row index on the y axis, counted from the bottom.
        let labels: Vec<String> = articles
            .iter()
            .rev()
            .map(|a| short_label(&a.description, LABEL_MAX_CHARS))
            .collect();

        let bars: Vec<Bar> = articles
            .iter()
            .enumerate()
            .map(|(rank, article)| {
                Bar::new((n - 1 - rank) as f64, article.revenue)
                    .name(format!("{}: {:.2}", article.description, article.revenue))
                    .fill(BAR_COLOR)
                    .width(0.7)
            })
            .collect();

        Plot::new(format!("top_articles_{}", country))
            .height(TOP_ARTICLES_HEIGHT)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .x_axis_label("Revenue (USD)")
            .y_axis_formatter(move |mark, _range| {
                let value = mark.value;
                if value < 0.0 || value.fract() != 0.0 {
                    return String::new();
                }
                labels.get(value as usize).cloned().unwrap_or_default()
            })
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).horizontal().color(BAR_COLOR));
            });
    }

    /// Global revenue versus the selected country.
    pub fn draw_revenue_share_table(ui: &mut egui::Ui, share: &RevenueShare) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                egui::Grid::new(ui.make_persistent_id(format!("revenue_share_{}", share.country)))
                    .striped(true)
                    .min_col_width(90.0)
                    .spacing([12.0, 4.0])
                    .show(ui, |ui| {
                        ui.label(RichText::new("Country").strong().size(12.0));
                        ui.label(RichText::new("Revenue").strong().size(12.0));
                        ui.label(RichText::new("% of total").strong().size(12.0));
                        ui.end_row();

                        ui.label("Total Global Revenue");
                        ui.label(format!("{:.2}", share.total_revenue));
                        ui.label("");
                        ui.end_row();

                        ui.label(RichText::new(&share.country).color(COUNTRY_COLOR));
                        ui.label(format!("{:.2}", share.country_revenue));
                        ui.label(share.formatted_share());
                        ui.end_row();
                    });
            });
    }

    /// Country versus global quantity over time.
    /// X-axis: date, Y-axis: quantity sold that day
    pub fn draw_quantity_series(ui: &mut egui::Ui, series: &ProductSeries) {
        let Some(frame) = series.frame else {
            ui.label(
                RichText::new("No quantities to plot for this article.").color(Color32::GRAY),
            );
            return;
        };

        ui.label(
            RichText::new(format!("{} vs Global Quantity Over Time", series.country))
                .size(14.0)
                .strong(),
        );

        Plot::new(format!("quantity_{}_{}", series.country, series.product))
            .height(SERIES_HEIGHT)
            .legend(Legend::default())
            .allow_scroll(false)
            .x_axis_label("Date")
            .y_axis_label("Quantity")
            .include_x(date_to_x(frame.first_date))
            .include_x(date_to_x(frame.extended_date))
            .include_y(frame.y_min)
            .include_y(frame.y_max)
            .x_axis_formatter(|mark, _range| x_to_date_label(mark.value))
            .label_formatter(|name, value| {
                let date = x_to_date_label(value.x);
                if name.is_empty() {
                    format!("{}\n{:.0}", date, value.y)
                } else {
                    format!("{}\n{}\n{:.0}", name, date, value.y)
                }
            })
            .show(ui, |plot_ui| {
                plot_ui.line(
                    Line::new(Self::to_points(&series.local))
                        .color(COUNTRY_COLOR)
                        .width(3.0)
                        .name(&series.country),
                );
                plot_ui.points(
                    Points::new(Self::to_points(&series.local))
                        .radius(3.0)
                        .color(COUNTRY_COLOR),
                );

                plot_ui.line(
                    Line::new(Self::to_points(&series.global))
                        .color(GLOBAL_COLOR)
                        .width(2.0)
                        .name("Global"),
                );
                plot_ui.points(
                    Points::new(Self::to_points(&series.global))
                        .radius(2.0)
                        .color(GLOBAL_COLOR),
                );
            });
    }

    fn to_points(series: &[DailyQuantity]) -> PlotPoints {
        series
            .iter()
            .map(|point| [date_to_x(point.date), point.quantity as f64])
            .collect()
    }
}
