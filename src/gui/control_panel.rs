//! Control Panel Widget
//! Left side panel with the data source and the country selection.

use egui::{Color32, ComboBox, RichText, ScrollArea};
use std::path::PathBuf;

/// Left side control panel with file selection and country selector.
pub struct ControlPanel {
    pub data_path: Option<PathBuf>,
    pub countries: Vec<String>,
    pub selected_country: Option<String>,
    pub status: String,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            data_path: None,
            countries: Vec::new(),
            selected_country: None,
            status: "Ready".to_string(),
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the country list; the first country becomes the selection.
    pub fn update_countries(&mut self, countries: Vec<String>) {
        self.selected_country = countries.first().cloned();
        self.countries = countries;
    }

    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("📊 E-commerce")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(RichText::new("Dashboard").size(11.0).color(Color32::GRAY));
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Data Source Section =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let path_text = self
                        .data_path
                        .as_ref()
                        .and_then(|p| p.file_name())
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| "No file loaded".to_string());

                    ui.label(RichText::new(&path_text).size(12.0).color(
                        if self.data_path.is_some() {
                            ui.visuals().text_color()
                        } else {
                            Color32::GRAY
                        },
                    ));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("📂 Browse").clicked() {
                            action = ControlPanelAction::BrowseCsv;
                        }
                    });
                });
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Country Section =====
        ui.label(RichText::new("🌍 Select Country").size(14.0).strong());
        ui.add_space(5.0);

        let selected_text = self.selected_country.clone().unwrap_or_default();
        ComboBox::from_id_salt("country")
            .width(220.0)
            .selected_text(selected_text)
            .show_ui(ui, |ui| {
                for country in &self.countries {
                    let is_selected = self.selected_country.as_deref() == Some(country.as_str());
                    if ui.selectable_label(is_selected, country).clicked() && !is_selected {
                        self.selected_country = Some(country.clone());
                        action = ControlPanelAction::CountryChanged;
                    }
                }
            });

        ui.add_space(8.0);

        // Every country, selected one highlighted
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(5.0)
            .show(ui, |ui| {
                ScrollArea::vertical().max_height(320.0).show(ui, |ui| {
                    for country in &self.countries {
                        let is_selected =
                            self.selected_country.as_deref() == Some(country.as_str());
                        let text = if is_selected {
                            RichText::new(country).strong().color(Color32::from_rgb(52, 152, 219))
                        } else {
                            RichText::new(country).color(Color32::GRAY)
                        };
                        if ui.selectable_label(is_selected, text).clicked() && !is_selected {
                            self.selected_country = Some(country.clone());
                            action = ControlPanelAction::CountryChanged;
                        }
                    }
                });
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Status Section =====
        let status_color = if self.status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    BrowseCsv,
    CountryChanged,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_country_is_selected_after_update() {
        let mut panel = ControlPanel::new();
        panel.update_countries(vec!["Belgium".into(), "France".into()]);
        assert_eq!(panel.selected_country.as_deref(), Some("Belgium"));

        panel.update_countries(Vec::new());
        assert!(panel.selected_country.is_none());
    }
}
